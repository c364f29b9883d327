//! # tessera-graph
//!
//! Graph text in and out of the pipeline:
//!
//! - [`exporter`]: records of one schema become a class/property block plus
//!   one statement group per record.
//! - [`writer`]: deterministic Turtle rendering of any [`Graph`](tessera_core::Graph).
//! - [`loader`]: Turtle, N-Triples, N-Quads, TriG and RDF/XML parsing through
//!   oxigraph.
//! - [`convert`]: re-serialization with a caller-supplied prefix map.
//! - [`clean`]: repair of N-Triples dumps with whitespace in IRIs, with
//!   prefixes discovered from namespace usage.
//! - [`remote`]: CONSTRUCT queries against a SPARQL endpoint.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tessera_core::schema::descriptor::load_descriptor;
//! use tessera_graph::GraphExporter;
//! use tessera_ingest::CsvIngestor;
//!
//! let schema = load_descriptor(Path::new("imdb.toml"))?;
//! let records = CsvIngestor::new(&schema).ingest_file(Path::new("imdb.csv"))?;
//! GraphExporter::new(&schema, "imdb", "http://www.imdb.org/")
//!     .export_to_path(&records, Path::new("imdb.ttl"))?;
//! # Ok::<(), tessera_core::TesseraError>(())
//! ```

pub mod clean;
pub mod convert;
pub mod exporter;
pub mod loader;
pub mod ox;
pub mod remote;
pub mod writer;

pub use clean::{clean_file, clean_ntriples, CleanReport};
pub use convert::{convert, parse_prefix_map, read_prefix_map};
pub use exporter::{normalize_identifier, GraphExporter, IdentifierStrategy};
pub use loader::{load_graph, parse_graph, GraphFormat};
pub use remote::SparqlEndpoint;
pub use writer::TurtleWriter;
