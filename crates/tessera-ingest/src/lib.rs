//! # tessera-ingest
//!
//! Turns delimited text into typed [`Record`](tessera_core::Record)s using a
//! [`SchemaDescriptor`](tessera_core::SchemaDescriptor).
//!
//! For every data row and every header column:
//!
//! 1. blank cells leave the field unset;
//! 2. the column resolves to a field case-insensitively, or the run fails with
//!    a schema error;
//! 3. a cell equal to one of the field's ignore sentinels leaves it unset;
//! 4. the field's strip text is removed, then the value is coerced to the
//!    field kind (lists element-wise). A failed coercion aborts with a parse
//!    error naming column, row and value.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tessera_core::schema::descriptor::load_descriptor;
//! use tessera_ingest::CsvIngestor;
//!
//! let schema = load_descriptor(Path::new("imdb.toml"))?;
//! let records = CsvIngestor::new(&schema).ingest_file(Path::new("imdb.csv"))?;
//! # Ok::<(), tessera_core::TesseraError>(())
//! ```

pub mod coerce;
pub mod reader;

pub use reader::CsvIngestor;
