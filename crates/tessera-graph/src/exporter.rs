//! Record sequence to graph export
//!
//! One export run produces, in order:
//!
//! 1. the schema block: a class declaration for the type, then for every field
//!    a property declaration with domain and range;
//! 2. the instance block: per record, `subject a Type` followed by one
//!    statement per set scalar field (or one per element for list fields), in
//!    field-declaration order.
//!
//! The graph keeps insertion order, so exporting the same records twice gives
//! byte-identical text.

use crate::writer::TurtleWriter;
use std::path::Path;
use tessera_core::vocab::{rdf, rdfs, STANDARD_PREFIXES};
use tessera_core::{
    FieldDescriptor, FieldKind, Graph, Iri, Literal, Record, SchemaDescriptor, SchemaError, Term,
    TesseraResult, Triple, Value,
};
use tracing::{debug, info, warn};

/// Space replacement used when a field does not name its own
pub const DEFAULT_REPLACEMENT: &str = "_";

/// How each record's subject identifier is derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierStrategy {
    /// 1-based record ordinal
    Counter,
    /// Normalized value of the named field
    Field(String),
}

/// Strip everything except letters, digits and spaces, then replace spaces
///
/// ```
/// use tessera_graph::exporter::normalize_identifier;
/// assert_eq!(normalize_identifier("Star Wars: Episode IV", "_"), "Star_Wars_Episode_IV");
/// ```
pub fn normalize_identifier(text: &str, replacement: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect::<String>()
        .replace(' ', replacement)
}

/// Exports records of one schema under one namespace
#[derive(Debug, Clone)]
pub struct GraphExporter<'s> {
    schema: &'s SchemaDescriptor,
    prefix: String,
    namespace: String,
    strategy: IdentifierStrategy,
}

impl<'s> GraphExporter<'s> {
    /// Create an exporter; the strategy defaults to the schema's designated
    /// identifier field, or the counter when it has none
    pub fn new(
        schema: &'s SchemaDescriptor,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        let strategy = match schema.identifier() {
            Some(field) => IdentifierStrategy::Field(field.to_string()),
            None => IdentifierStrategy::Counter,
        };
        Self {
            schema,
            prefix: prefix.into(),
            namespace: namespace.into(),
            strategy,
        }
    }

    pub fn with_strategy(mut self, strategy: IdentifierStrategy) -> Result<Self, SchemaError> {
        if let IdentifierStrategy::Field(field) = &strategy {
            if self.schema.field(field).is_none() {
                return Err(SchemaError::UnknownIdentifier {
                    type_name: self.schema.type_name().to_string(),
                    field: field.clone(),
                });
            }
        }
        self.strategy = strategy;
        Ok(self)
    }

    pub fn strategy(&self) -> &IdentifierStrategy {
        &self.strategy
    }

    /// Build the export graph: schema block, then one block per record
    pub fn build_graph(&self, records: &[Record]) -> Result<Graph, SchemaError> {
        let mut graph = Graph::new();
        graph.prefixes_mut().bind(self.prefix.as_str(), self.namespace.as_str());
        for (name, namespace) in STANDARD_PREFIXES {
            graph.prefixes_mut().bind_if_absent(name, namespace);
        }

        let class = self.local(self.schema.type_name());
        self.schema_block(&mut graph, &class)?;

        let mut fallbacks = 0usize;
        for (index, record) in records.iter().enumerate() {
            let subject = self.subject(record, index + 1, &mut fallbacks);
            self.instance_block(&mut graph, &class, subject, record);
        }

        if fallbacks > 0 {
            warn!(
                records = fallbacks,
                type_name = self.schema.type_name(),
                "identifying field unset, used record ordinal instead"
            );
        }
        debug!(triples = graph.len(), records = records.len(), "built export graph");
        Ok(graph)
    }

    /// Render the export as Turtle text
    pub fn export(&self, records: &[Record]) -> TesseraResult<String> {
        let graph = self.build_graph(records)?;
        Ok(TurtleWriter::new(&graph).render())
    }

    /// Export to a file, written and flushed once at the end
    pub fn export_to_path(&self, records: &[Record], path: &Path) -> TesseraResult<usize> {
        let graph = self.build_graph(records)?;
        let triples = TurtleWriter::new(&graph).write_to_path(path)?;
        info!(
            triples,
            records = records.len(),
            type_name = self.schema.type_name(),
            "exported {}",
            path.display()
        );
        Ok(triples)
    }

    fn schema_block(&self, graph: &mut Graph, class: &Iri) -> Result<(), SchemaError> {
        graph.add(Triple::new(class.clone(), rdf::TYPE, Iri::new(rdfs::CLASS)));
        for field in self.schema.fields() {
            let property = self.local(&field.name);
            let range = self.range(graph, field)?;
            graph.add(Triple::new(property.clone(), rdf::TYPE, Iri::new(rdf::PROPERTY)));
            graph.add(Triple::new(property.clone(), rdfs::DOMAIN, class.clone()));
            graph.add(Triple::new(property, rdfs::RANGE, range));
        }
        Ok(())
    }

    fn range(&self, graph: &Graph, field: &FieldDescriptor) -> Result<Iri, SchemaError> {
        if let Some(range) = &field.range_override {
            return graph.prefixes().expand(range);
        }
        Ok(match field.kind.element() {
            FieldKind::Reference(class) => self.local(class),
            _ => Iri::new(rdfs::LITERAL),
        })
    }

    fn instance_block(&self, graph: &mut Graph, class: &Iri, subject: Iri, record: &Record) {
        graph.add(Triple::new(subject.clone(), rdf::TYPE, class.clone()));
        for field in self.schema.fields() {
            let Some(value) = record.get(&field.name) else {
                continue;
            };
            let predicate = self.local(&field.name);
            for element in value.elements() {
                let object = self.object(field, element);
                graph.add(Triple::new(subject.clone(), predicate.clone(), object));
            }
        }
    }

    fn object(&self, field: &FieldDescriptor, value: &Value) -> Term {
        match value {
            Value::String(s) => Literal::string(s.as_str()).into(),
            Value::Integer(v) => Literal::integer(i64::from(*v)).into(),
            Value::Long(v) => Literal::integer(*v).into(),
            Value::Double(v) => Literal::double(*v).into(),
            Value::Boolean(v) => Literal::boolean(*v).into(),
            Value::Date(d) => Literal::date(*d).into(),
            Value::Reference(text) => self.local(&normalize_identifier(text, replacement(field))).into(),
            // Nested lists are rejected when the schema is built
            Value::List(_) => Literal::string(value.to_string()).into(),
        }
    }

    fn subject(&self, record: &Record, ordinal: usize, fallbacks: &mut usize) -> Iri {
        if let IdentifierStrategy::Field(name) = &self.strategy {
            let replacement = self.schema.field(name).map_or(DEFAULT_REPLACEMENT, replacement);
            let id = record
                .get(name)
                .map(|value| normalize_identifier(&value.identifying_text(), replacement))
                .filter(|id| !id.is_empty());
            match id {
                Some(id) => return self.local(&id),
                None => *fallbacks += 1,
            }
        }
        self.local(&ordinal.to_string())
    }

    fn local(&self, name: &str) -> Iri {
        Iri::new(format!("{}{}", self.namespace, name))
    }
}

fn replacement(field: &FieldDescriptor) -> &str {
    field
        .identifier_replacement
        .as_deref()
        .unwrap_or(DEFAULT_REPLACEMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const NS: &str = "http://www.imdb.org/";

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "ImdbFilm",
            vec![
                FieldDescriptor::new("name", FieldKind::String).with_identifier_replacement("-"),
                FieldDescriptor::new("date", FieldKind::Integer).with_range("xsd:gYear"),
                FieldDescriptor::new(
                    "director",
                    FieldKind::ListOf(Box::new(FieldKind::Reference("Person".into()))),
                ),
            ],
        )
        .unwrap()
    }

    fn film(name: &str) -> Record {
        Record::builder()
            .with("name", Value::String(name.into()))
            .with("date", Value::Integer(1977))
            .with(
                "director",
                Value::List(vec![Value::Reference("George Lucas".into())]),
            )
            .build()
    }

    #[test_case("Star Wars", "_", "Star_Wars")]
    #[test_case("Amélie (2001)", "_", "Amélie_2001")]
    #[test_case("  a  b ", "-", "--a--b-")]
    #[test_case("!!!", "_", "")]
    fn test_normalize_identifier(text: &str, replacement: &str, expected: &str) {
        assert_eq!(normalize_identifier(text, replacement), expected);
    }

    #[test]
    fn test_schema_block_declarations() {
        let schema = schema();
        let graph = GraphExporter::new(&schema, "imdb", NS).build_graph(&[]).unwrap();

        let class = Term::iri(format!("{NS}ImdbFilm"));
        assert!(graph.contains(&Triple::new(class.clone(), rdf::TYPE, Iri::new(rdfs::CLASS))));
        // class + 3 statements per field
        assert_eq!(graph.len(), 1 + 3 * 3);

        let range_of = |field: &str| {
            let property = Term::iri(format!("{NS}{field}"));
            let range = graph
                .objects_where(&property, |p| p.as_str() == rdfs::RANGE)
                .next()
                .and_then(Term::as_iri)
                .map(|iri| iri.as_str().to_string());
            range
        };
        assert_eq!(range_of("name").as_deref(), Some(rdfs::LITERAL));
        assert_eq!(range_of("date").as_deref(), Some("http://www.w3.org/2001/XMLSchema#gYear"));
        assert_eq!(range_of("director"), Some(format!("{NS}Person")));
    }

    #[test]
    fn test_unknown_range_prefix_is_schema_error() {
        let schema = SchemaDescriptor::new(
            "Film",
            vec![FieldDescriptor::new("year", FieldKind::Integer).with_range("dbo:year")],
        )
        .unwrap();
        let err = GraphExporter::new(&schema, "ex", NS).build_graph(&[]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownPrefix(_)));
    }

    #[test]
    fn test_counter_and_field_subjects() {
        let schema = schema();
        let records = vec![film("Star Wars"), film("Alien")];

        let counter = GraphExporter::new(&schema, "imdb", NS)
            .with_strategy(IdentifierStrategy::Counter)
            .unwrap()
            .export(&records)
            .unwrap();
        assert!(counter.contains("imdb:1 a imdb:ImdbFilm .\n"));
        assert!(counter.contains("imdb:2 a imdb:ImdbFilm .\n"));

        let by_name = GraphExporter::new(&schema, "imdb", NS)
            .with_strategy(IdentifierStrategy::Field("name".into()))
            .unwrap()
            .export(&records)
            .unwrap();
        assert!(by_name.contains("imdb:Star-Wars a imdb:ImdbFilm .\n"));
        assert!(by_name.contains("imdb:Star-Wars imdb:director imdb:George_Lucas .\n"));
        assert!(by_name.contains("imdb:Star-Wars imdb:date 1977 .\n"));
    }

    #[test]
    fn test_unset_identifying_field_falls_back_to_ordinal() {
        let schema = schema();
        let records = vec![Record::builder().with("date", Value::Integer(2000)).build()];
        let text = GraphExporter::new(&schema, "imdb", NS)
            .with_strategy(IdentifierStrategy::Field("name".into()))
            .unwrap()
            .export(&records)
            .unwrap();
        assert!(text.contains("imdb:1 a imdb:ImdbFilm .\n"));
    }

    #[test]
    fn test_unknown_identifier_field_rejected() {
        let schema = schema();
        let result = GraphExporter::new(&schema, "imdb", NS)
            .with_strategy(IdentifierStrategy::Field("rating".into()));
        assert!(matches!(result, Err(SchemaError::UnknownIdentifier { .. })));
    }
}
