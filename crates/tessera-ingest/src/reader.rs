//! Row-by-row record construction

use crate::coerce::coerce;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tessera_core::{
    FieldDescriptor, ParseError, Record, SchemaDescriptor, SchemaError, TesseraError,
    TesseraResult,
};
use tracing::{debug, info};

/// Reads delimited text into [`Record`]s under one schema
///
/// The first line is the header. Every following non-empty line becomes one
/// record, in input order. The first schema or coercion failure aborts the
/// whole run; there is no partial-row recovery.
#[derive(Debug, Clone, Copy)]
pub struct CsvIngestor<'s> {
    schema: &'s SchemaDescriptor,
}

/// A header cell and the field it resolves to
struct Column<'s> {
    header: String,
    field: Result<&'s FieldDescriptor, SchemaError>,
}

impl<'s> CsvIngestor<'s> {
    pub fn new(schema: &'s SchemaDescriptor) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s SchemaDescriptor {
        self.schema
    }

    /// Ingest in-memory text
    pub fn ingest_str(&self, text: &str) -> TesseraResult<Vec<Record>> {
        self.ingest_reader(text.as_bytes(), Path::new("<input>"))
    }

    /// Ingest a file; the handle is closed on every exit path
    pub fn ingest_file(&self, path: &Path) -> TesseraResult<Vec<Record>> {
        let file = File::open(path).map_err(|e| TesseraError::io(path, e))?;
        let records = self.ingest_reader(file, path)?;
        info!(
            records = records.len(),
            type_name = self.schema.type_name(),
            "ingested {}",
            path.display()
        );
        Ok(records)
    }

    /// Ingest any byte source; `origin` names it in errors
    pub fn ingest_reader<R: Read>(&self, source: R, origin: &Path) -> TesseraResult<Vec<Record>> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers().map_err(|e| read_error(origin, e))?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        let columns = self.resolve_header(headers);

        let mut records = Vec::new();
        let mut ignored = 0usize;
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| read_error(origin, e))?;
            if row.len() <= 1 && row.iter().all(str::is_empty) {
                continue;
            }
            // the header sits on line 1, so line n holds data row n - 1
            let number = row
                .position()
                .map_or(index + 1, |p| (p.line() as usize).saturating_sub(1));
            records.push(self.build_record(&columns, &row, number, &mut ignored)?);
        }

        debug!(
            rows = records.len(),
            ignored_cells = ignored,
            "finished reading {}",
            origin.display()
        );
        Ok(records)
    }

    fn resolve_header(&self, headers: &StringRecord) -> Vec<Column<'s>> {
        headers
            .iter()
            .map(|name| {
                let name = unquote(name.trim_start_matches('\u{feff}'));
                Column {
                    field: self.schema.field_for_column(name),
                    header: name.to_string(),
                }
            })
            .collect()
    }

    fn build_record(
        &self,
        columns: &[Column<'s>],
        row: &StringRecord,
        number: usize,
        ignored: &mut usize,
    ) -> TesseraResult<Record> {
        // Missing trailing cells read as blank
        let cells = row.iter().chain(std::iter::repeat(""));
        let mut builder = Record::builder();

        for (column, raw) in columns.iter().zip(cells) {
            let raw = unquote(raw);
            if raw.is_empty() {
                continue;
            }
            let field = column.field.as_ref().map_err(|e| e.clone())?;

            if field.is_ignored(raw) {
                *ignored += 1;
                continue;
            }

            let text = match &field.strip {
                Some(strip) => raw.replace(strip.as_str(), ""),
                None => raw.to_string(),
            };

            let value = coerce(&field.kind, &text).map_err(|value| ParseError {
                column: column.header.clone(),
                row: number,
                value,
                expected: field.kind.element().to_string(),
            })?;
            builder.set(field.name.clone(), value);
        }

        Ok(builder.build())
    }
}

/// Quotes that follow padding are literal to the CSV grammar; drop one layer
fn unquote(cell: &str) -> &str {
    match cell.strip_prefix('"').and_then(|c| c.strip_suffix('"')) {
        Some(inner) => inner.trim(),
        None => cell,
    }
}

fn read_error(origin: &Path, error: csv::Error) -> TesseraError {
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(e) => TesseraError::io(origin, e),
        _ => TesseraError::syntax(origin.display().to_string(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use tessera_core::{FieldKind, Value};

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "Film",
            vec![
                FieldDescriptor::new("a", FieldKind::String),
                FieldDescriptor::new("b", FieldKind::Integer).with_ignore("None"),
            ],
        )
        .unwrap()
    }

    fn text_schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "Row",
            ["a", "b", "c"]
                .into_iter()
                .map(|name| FieldDescriptor::new(name, FieldKind::String))
                .collect(),
        )
        .unwrap()
    }

    #[test_case("x,5", &[Some("x"), Some("5"), None] ; "plain")]
    #[test_case("\"x, y\",5", &[Some("x, y"), Some("5"), None] ; "quoted comma preserved")]
    #[test_case(" a , \"b\" ,c ", &[Some("a"), Some("b"), Some("c")] ; "trimmed and unquoted")]
    #[test_case("a,,", &[Some("a"), None, None] ; "trailing empties unset")]
    #[test_case("\"\",z", &[None, Some("z"), None] ; "quoted empty unset")]
    #[test_case("\"Heat \"\"Director's cut\"\"\"", &[Some("Heat \"Director's cut\""), None, None] ; "doubled quotes unescaped")]
    fn test_row_cells(line: &str, expected: &[Option<&str>]) {
        let schema = text_schema();
        let records = CsvIngestor::new(&schema)
            .ingest_str(&format!("a,b,c\n{line}\n"))
            .unwrap();
        assert_eq!(records.len(), 1);
        for (name, expected) in ["a", "b", "c"].iter().zip(expected) {
            let expected = expected.map(|s| Value::String(s.to_string()));
            assert_eq!(records[0].get(name), expected.as_ref(), "field {name}");
        }
    }

    #[test]
    fn test_short_rows_leave_trailing_fields_unset() {
        let schema = schema();
        let records = CsvIngestor::new(&schema).ingest_str("a,b\nx\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("a"), Some(&Value::String("x".into())));
        assert!(!records[0].is_set("b"));
    }

    #[test]
    fn test_blank_lines_are_skipped_but_counted() {
        let schema = schema();
        let err = CsvIngestor::new(&schema)
            .ingest_str("a,b\nx,1\n\ny,oops\n")
            .unwrap_err();
        match err {
            TesseraError::Parse(e) => {
                assert_eq!(e.row, 3);
                assert_eq!(e.column, "b");
                assert_eq!(e.value, "oops");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        let schema = schema();
        assert!(CsvIngestor::new(&schema).ingest_str("").unwrap().is_empty());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let schema = schema();
        let records = CsvIngestor::new(&schema)
            .ingest_str("\u{feff}a,b\nx,2\n")
            .unwrap();
        assert_eq!(records[0].get("a"), Some(&Value::String("x".into())));
    }
}
