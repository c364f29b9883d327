//! Declarative schema descriptor files
//!
//! A descriptor is a TOML document naming the record type and listing its
//! fields in column order. Loading one never executes code.
//!
//! ```toml
//! name = "ImdbFilm"
//! identifier = "name"
//!
//! [[fields]]
//! name = "name"
//! kind = "string"
//! ignore = "No Rate"
//! replace = "_"
//!
//! [[fields]]
//! name = "votes"
//! kind = "integer"
//! strip = ","
//! ignore = ["No Votes", "-"]
//! ```

use super::{FieldDescriptor, FieldKind, SchemaDescriptor};
use crate::error::{SchemaError, TesseraError, TesseraResult};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    name: String,
    identifier: Option<String>,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    name: String,
    kind: String,
    column: Option<String>,
    #[serde(default)]
    ignore: Sentinels,
    strip: Option<String>,
    replace: Option<String>,
    range: Option<String>,
}

/// `ignore` accepts a single string or a list of strings
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Sentinels {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl Sentinels {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Parse descriptor text; `origin` names the source in errors
pub fn parse_descriptor(text: &str, origin: &str) -> Result<SchemaDescriptor, SchemaError> {
    let raw: RawSchema = toml::from_str(text).map_err(|e| SchemaError::InvalidDescriptor {
        origin: origin.to_string(),
        message: e.message().to_string(),
    })?;

    if raw.name.trim().is_empty() {
        return Err(SchemaError::InvalidDescriptor {
            origin: origin.to_string(),
            message: "type name must not be empty".to_string(),
        });
    }

    let mut fields = Vec::with_capacity(raw.fields.len());
    for field in raw.fields {
        let kind = FieldKind::parse(&field.name, &field.kind)?;
        let mut descriptor = FieldDescriptor::new(field.name, kind);
        descriptor.column = field.column;
        descriptor.ignore = field.ignore.into_vec();
        descriptor.strip = field.strip.filter(|s| !s.is_empty());
        descriptor.identifier_replacement = field.replace;
        descriptor.range_override = field.range;
        fields.push(descriptor);
    }

    let schema = SchemaDescriptor::new(raw.name, fields)?;
    let schema = match raw.identifier {
        Some(identifier) => schema.with_identifier(identifier)?,
        None => schema,
    };

    debug!(
        type_name = schema.type_name(),
        fields = schema.fields().len(),
        "loaded schema descriptor from {}",
        origin
    );
    Ok(schema)
}

/// Read and parse a descriptor file
pub fn load_descriptor(path: &Path) -> TesseraResult<SchemaDescriptor> {
    let text = std::fs::read_to_string(path).map_err(|e| TesseraError::io(path, e))?;
    Ok(parse_descriptor(&text, &path.display().to_string())?)
}
