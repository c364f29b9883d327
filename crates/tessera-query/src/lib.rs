//! # tessera-query
//!
//! Runs SPARQL against one graph under RDFS entailment. The graph is first
//! closed under the RDFS rules in [`entailment`], then loaded into an
//! in-memory oxigraph store and queried there.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tessera_graph::{load_graph, GraphFormat};
//! use tessera_query::{execute, QueryOutput};
//!
//! let graph = load_graph(Path::new("combined.ttl"), GraphFormat::Turtle)?;
//! if let QueryOutput::Solutions { rows, .. } = execute("SELECT * WHERE { ?s ?p ?o }", &graph)? {
//!     println!("{} rows", rows.len());
//! }
//! # Ok::<(), tessera_core::TesseraError>(())
//! ```

pub mod entailment;
pub mod executor;

pub use entailment::materialize;
pub use executor::{execute, render_cell, QueryEngine, QueryOutput, UNBOUND};
