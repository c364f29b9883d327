//! Schema registry
//!
//! A schema is the explicit, declarative replacement for reflection-driven
//! field typing: for each record type it holds an ordered list of
//! [`FieldDescriptor`]s. Field kinds form a closed set ([`FieldKind`]); a kind
//! that cannot be represented is rejected when the schema is built, never while
//! rows are being read.
//!
//! Schemas are usually loaded from TOML descriptor files, see [`descriptor`].

pub mod descriptor;

use crate::error::{SchemaError, TesseraResult};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// The kind a raw CSV value is coerced to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    Date,
    /// Identifying text of an entity of the named class
    Reference(String),
    /// Comma separated list of a non-list kind
    ListOf(Box<FieldKind>),
}

impl FieldKind {
    /// Parse a kind name: `string`, `integer`, `long`, `double`, `boolean`,
    /// `date`, `ref<Class>`, `list<kind>`.
    ///
    /// `field` is only used for error reporting.
    pub fn parse(field: &str, text: &str) -> Result<Self, SchemaError> {
        let unsupported = |reason: &str| SchemaError::UnsupportedKind {
            field: field.to_string(),
            kind: text.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = text.trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(inner) = strip_generic(trimmed, "list") {
            let element = Self::parse(field, inner)?;
            if element.is_list() {
                return Err(unsupported("lists of lists are not representable"));
            }
            return Ok(Self::ListOf(Box::new(element)));
        }

        if let Some(class) = strip_generic(trimmed, "ref") {
            let class = class.trim();
            if class.is_empty() {
                return Err(unsupported("reference kind needs a class name"));
            }
            return Ok(Self::Reference(class.to_string()));
        }

        match lower.as_str() {
            "string" | "text" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "long" => Ok(Self::Long),
            "double" | "float" => Ok(Self::Double),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            _ => Err(unsupported("unknown kind name")),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::ListOf(_))
    }

    /// Element kind for lists, the kind itself otherwise
    pub fn element(&self) -> &FieldKind {
        match self {
            Self::ListOf(inner) => inner,
            other => other,
        }
    }

    /// True when values of this kind (or its element kind) export as literals
    pub fn is_scalar(&self) -> bool {
        !matches!(self.element(), Self::Reference(_))
    }

    fn validate(&self, field: &str) -> Result<(), SchemaError> {
        if let Self::ListOf(inner) = self {
            if inner.is_list() {
                return Err(SchemaError::UnsupportedKind {
                    field: field.to_string(),
                    kind: self.to_string(),
                    reason: "lists of lists are not representable".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Long => f.write_str("long"),
            Self::Double => f.write_str("double"),
            Self::Boolean => f.write_str("boolean"),
            Self::Date => f.write_str("date"),
            Self::Reference(class) => write!(f, "ref<{}>", class),
            Self::ListOf(inner) => write!(f, "list<{}>", inner),
        }
    }
}

fn strip_generic<'a>(text: &'a str, head: &str) -> Option<&'a str> {
    let open = text.find('<')?;
    if !text[..open].trim().eq_ignore_ascii_case(head) || !text.ends_with('>') {
        return None;
    }
    Some(&text[open + 1..text.len() - 1])
}

/// One field of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Source column header, when it differs from `name`
    pub column: Option<String>,
    /// Raw values that leave the field unset (exact, case-sensitive)
    pub ignore: Vec<String>,
    /// Literal text removed before coercion
    pub strip: Option<String>,
    /// Replaces spaces when this field derives a resource identifier
    pub identifier_replacement: Option<String>,
    /// Explicit range IRI or CURIE
    pub range_override: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            column: None,
            ignore: Vec::new(),
            strip: None,
            identifier_replacement: None,
            range_override: None,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_ignore(mut self, sentinel: impl Into<String>) -> Self {
        self.ignore.push(sentinel.into());
        self
    }

    pub fn with_strip(mut self, text: impl Into<String>) -> Self {
        self.strip = Some(text.into());
        self
    }

    pub fn with_identifier_replacement(mut self, text: impl Into<String>) -> Self {
        self.identifier_replacement = Some(text.into());
        self
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range_override = Some(range.into());
        self
    }

    /// Header this field is read from
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    /// Whether a raw value is one of the ignore sentinels
    pub fn is_ignored(&self, raw: &str) -> bool {
        self.ignore.iter().any(|sentinel| sentinel == raw)
    }
}

/// A named record type with its ordered, name-unique fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    identifier: Option<String>,
}

impl SchemaDescriptor {
    /// Build a schema, rejecting duplicate fields, duplicate columns and
    /// unrepresentable kinds
    pub fn new(
        type_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        let type_name = type_name.into();
        let mut names = HashSet::new();
        let mut columns = HashSet::new();

        for field in &fields {
            field.kind.validate(&field.name)?;
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name,
                    field: field.name.clone(),
                });
            }
            if !columns.insert(field.column_name().to_lowercase()) {
                return Err(SchemaError::DuplicateColumn {
                    type_name,
                    column: field.column_name().to_string(),
                });
            }
        }

        Ok(Self {
            type_name,
            fields,
            identifier: None,
        })
    }

    /// Designate the field whose value names each record's resource
    pub fn with_identifier(mut self, field: impl Into<String>) -> Result<Self, SchemaError> {
        let field = field.into();
        if self.field(&field).is_none() {
            return Err(SchemaError::UnknownIdentifier {
                type_name: self.type_name,
                field,
            });
        }
        self.identifier = Some(field);
        Ok(self)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve a source column header, case-insensitively
    pub fn field_for_column(&self, column: &str) -> Result<&FieldDescriptor, SchemaError> {
        let wanted = column.trim();
        let lowered = wanted.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.column_name().to_lowercase() == lowered)
            .ok_or_else(|| SchemaError::UnknownColumn {
                type_name: self.type_name.clone(),
                column: wanted.to_string(),
            })
    }
}

/// Static mapping from type name to schema, built at load time
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SchemaDescriptor>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: SchemaDescriptor) -> Result<(), SchemaError> {
        if self.schemas.contains_key(schema.type_name()) {
            return Err(SchemaError::DuplicateType(schema.type_name().to_string()));
        }
        self.schemas.insert(schema.type_name().to_string(), schema);
        Ok(())
    }

    /// Load a descriptor file and register it, returning the registered schema
    pub fn load_file(&mut self, path: &Path) -> TesseraResult<&SchemaDescriptor> {
        let schema = descriptor::load_descriptor(path)?;
        let name = schema.type_name().to_string();
        self.register(schema)?;
        Ok(self.get(&name)?)
    }

    pub fn get(&self, type_name: &str) -> Result<&SchemaDescriptor, SchemaError> {
        self.schemas
            .get(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("string", FieldKind::String)]
    #[test_case("Integer", FieldKind::Integer)]
    #[test_case("long", FieldKind::Long)]
    #[test_case("double", FieldKind::Double)]
    #[test_case("bool", FieldKind::Boolean)]
    #[test_case("date", FieldKind::Date)]
    #[test_case("ref<Genre>", FieldKind::Reference("Genre".into()))]
    #[test_case("list<string>", FieldKind::ListOf(Box::new(FieldKind::String)))]
    #[test_case("list< ref<Person> >", FieldKind::ListOf(Box::new(FieldKind::Reference("Person".into()))))]
    fn test_kind_parsing(text: &str, expected: FieldKind) {
        assert_eq!(FieldKind::parse("f", text).unwrap(), expected);
    }

    #[test]
    fn test_kind_rejects_unrepresentable() {
        assert!(matches!(
            FieldKind::parse("f", "list<list<string>>"),
            Err(SchemaError::UnsupportedKind { .. })
        ));
        assert!(FieldKind::parse("f", "decimal").is_err());
        assert!(FieldKind::parse("f", "ref<>").is_err());
    }

    #[test]
    fn test_kind_display_round_trips_names() {
        let kind = FieldKind::ListOf(Box::new(FieldKind::Reference("Genre".into())));
        assert_eq!(kind.to_string(), "list<ref<Genre>>");
        assert!(!kind.is_scalar());
        assert!(FieldKind::ListOf(Box::new(FieldKind::Long)).is_scalar());
    }

    #[test]
    fn test_duplicate_field_is_schema_error() {
        let result = SchemaDescriptor::new(
            "Film",
            vec![
                FieldDescriptor::new("title", FieldKind::String),
                FieldDescriptor::new("title", FieldKind::Integer),
            ],
        );
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateField {
                type_name: "Film".into(),
                field: "title".into()
            }
        );
    }

    #[test]
    fn test_column_alias_collision_is_schema_error() {
        let result = SchemaDescriptor::new(
            "Film",
            vec![
                FieldDescriptor::new("rating", FieldKind::Double).with_column("score"),
                FieldDescriptor::new("score", FieldKind::Double),
            ],
        );
        assert!(matches!(result, Err(SchemaError::DuplicateColumn { .. })));
    }

    #[test]
    fn test_nested_list_rejected_at_registration() {
        let nested = FieldKind::ListOf(Box::new(FieldKind::ListOf(Box::new(FieldKind::String))));
        let result = SchemaDescriptor::new("T", vec![FieldDescriptor::new("x", nested)]);
        assert!(matches!(result, Err(SchemaError::UnsupportedKind { .. })));
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let schema = SchemaDescriptor::new(
            "Film",
            vec![
                FieldDescriptor::new("title", FieldKind::String),
                FieldDescriptor::new("rating", FieldKind::Double).with_column("IMDB Score"),
            ],
        )
        .unwrap();

        assert_eq!(schema.field_for_column("TITLE").unwrap().name, "title");
        assert_eq!(schema.field_for_column("imdb score").unwrap().name, "rating");
        assert!(matches!(
            schema.field_for_column("rating"),
            Err(SchemaError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_identifier_must_be_declared() {
        let schema =
            SchemaDescriptor::new("Film", vec![FieldDescriptor::new("title", FieldKind::String)])
                .unwrap();
        assert!(schema.clone().with_identifier("name").is_err());
        assert_eq!(
            schema.with_identifier("title").unwrap().identifier(),
            Some("title")
        );
    }

    #[test]
    fn test_registry_rejects_duplicate_types() {
        let mut registry = SchemaRegistry::new();
        let schema = SchemaDescriptor::new("Film", vec![]).unwrap();
        registry.register(schema.clone()).unwrap();
        assert_eq!(
            registry.register(schema),
            Err(SchemaError::DuplicateType("Film".into()))
        );
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["Film"]);
        assert!(registry.get("Show").is_err());
    }
}
