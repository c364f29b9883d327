//! # tessera-core
//!
//! Shared data model for the tessera pipeline:
//!
//! - [`schema`]: the schema registry. Per record type, an ordered list of
//!   field descriptors loaded from declarative TOML files.
//! - [`record`]: immutable typed records produced by ingestion.
//! - [`graph`]: IRIs, literals, triples and the set-valued [`Graph`] that
//!   every stage reads from and adds to.
//! - [`error`]: the error taxonomy (schema, parse, I/O, syntax, query).
//!
//! ## Data flow
//!
//! ```text
//! SchemaRegistry -> ingestion -> Records -> exporter -> Graph (one per source)
//! Graph x N -> entity matcher -> ontology unifier -> combined Graph
//! ```

pub mod error;
pub mod graph;
pub mod record;
pub mod schema;

pub use error::{ParseError, SchemaError, TesseraError, TesseraResult};
pub use graph::{vocab, Graph, Iri, Literal, NamedGraph, PrefixMap, Term, Triple};
pub use record::{Record, RecordBuilder, Value};
pub use schema::{FieldDescriptor, FieldKind, SchemaDescriptor, SchemaRegistry};

/// Equivalence requires a normalized edit-distance ratio strictly above this
pub const SIMILARITY_THRESHOLD: f64 = 0.85;
