//! # tessera configuration
//!
//! Runtime settings for the tessera pipeline, loaded with the precedence
//! `defaults < file < environment < command-line`.
//!
//! ```toml
//! # Unset export settings fall back to the lowercased type name and
//! # http://example.org/<type>/
//! [export]
//! prefix = "imdb"
//! base_iri = "http://www.imdb.org/"
//!
//! [integrate]
//! unified_namespace = "http://example.org/unified/"
//! unified_prefix = "unified"
//! enrichment_file = "ontology.ttl"
//!
//! [[integrate.relations]]
//! name = "sharesSameGenre"
//! comment = "Indicates films that share a genre"
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tessera_config::{ConfigOverrides, TesseraConfig};
//!
//! let config = TesseraConfig::load(None, ConfigOverrides::default())?;
//! println!("exporting films under {}", config.export.namespace_for("Film"));
//! # Ok::<(), tessera_config::ConfigError>(())
//! ```

#![warn(missing_docs)]

mod config;
mod loader;

pub use config::*;
pub use loader::*;
