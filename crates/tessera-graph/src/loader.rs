//! Graph loading through oxigraph's RDF parsers
//!
//! Quads from N-Quads and TriG sources are flattened into one graph; the graph
//! name is dropped. Prefix declarations are scanned from the source text so
//! writers can reuse the document's own prefixed names.

use crate::ox;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Quad;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tessera_core::{Graph, PrefixMap, TesseraError, TesseraResult, Triple};
use tracing::{debug, info};

static PREFIX_DECL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*@?prefix\s+([\p{L}][\p{L}\p{N}_.\-]*)?:\s*<([^>]*)>").expect("prefix regex")
});

/// Serialization formats accepted by [`load_graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Turtle,
    NTriples,
    NQuads,
    TriG,
    RdfXml,
}

impl GraphFormat {
    /// Guess from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "ttl" => Some(Self::Turtle),
            "nt" => Some(Self::NTriples),
            "nq" => Some(Self::NQuads),
            "trig" => Some(Self::TriG),
            "rdf" | "owl" | "xml" => Some(Self::RdfXml),
            _ => None,
        }
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            Self::Turtle => RdfFormat::Turtle,
            Self::NTriples => RdfFormat::NTriples,
            Self::NQuads => RdfFormat::NQuads,
            Self::TriG => RdfFormat::TriG,
            Self::RdfXml => RdfFormat::RdfXml,
        }
    }

    fn declares_prefixes(self) -> bool {
        matches!(self, Self::Turtle | Self::TriG)
    }
}

impl FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', '/'], "").as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "nt" => Ok(Self::NTriples),
            "nquads" | "nq" => Ok(Self::NQuads),
            "trig" => Ok(Self::TriG),
            "rdfxml" | "xml" | "rdf" => Ok(Self::RdfXml),
            _ => Err(format!("unknown graph format: {}", s)),
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Turtle => "turtle",
            Self::NTriples => "ntriples",
            Self::NQuads => "nquads",
            Self::TriG => "trig",
            Self::RdfXml => "rdfxml",
        };
        f.write_str(name)
    }
}

/// Read and parse a graph file
pub fn load_graph(path: &Path, format: GraphFormat) -> TesseraResult<Graph> {
    let text = fs::read_to_string(path).map_err(|e| TesseraError::io(path, e))?;
    let graph = parse_graph(&text, format, &path.display().to_string())?;
    info!(
        triples = graph.len(),
        format = %format,
        "loaded {}",
        path.display()
    );
    Ok(graph)
}

/// Parse graph text; `origin` names the source in errors
pub fn parse_graph(text: &str, format: GraphFormat, origin: &str) -> TesseraResult<Graph> {
    let mut graph = Graph::new();
    if format.declares_prefixes() {
        *graph.prefixes_mut() = scan_prefixes(text);
    }

    let mut skipped = 0usize;
    for quad in RdfParser::from_format(format.rdf_format()).for_reader(text.as_bytes()) {
        let quad = quad.map_err(|e| TesseraError::syntax(origin, e))?;
        match convert_quad(quad) {
            Some(triple) => {
                graph.add(triple);
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "ignored quoted-triple statements in {}", origin);
    }
    Ok(graph)
}

/// `@prefix` and `PREFIX` declarations in document order
pub fn scan_prefixes(text: &str) -> PrefixMap {
    let mut prefixes = PrefixMap::new();
    for captures in PREFIX_DECL_REGEX.captures_iter(text) {
        let name = captures.get(1).map_or("", |m| m.as_str());
        prefixes.bind(name, &captures[2]);
    }
    prefixes
}

fn convert_quad(quad: Quad) -> Option<Triple> {
    ox::from_parts(quad.subject, quad.predicate, quad.object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::vocab::{rdf, xsd};
    use tessera_core::{Iri, Term};
    use test_case::test_case;

    const TURTLE: &str = r#"
@prefix ex: <http://example.org/> .
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
@prefix : <http://default.org/> .

ex:Heat a ex:Film ;
    ex:title "Heat" ;
    ex:year 1995 ;
    rdfs:label "Heat"@en .
:x ex:knows [ ex:name "anon" ] .
"#;

    #[test]
    fn test_parse_turtle() {
        let graph = parse_graph(TURTLE, GraphFormat::Turtle, "inline").unwrap();
        assert_eq!(graph.len(), 6);

        let heat = Term::iri("http://example.org/Heat");
        assert!(graph.contains(&Triple::new(heat.clone(), rdf::TYPE, Iri::new("http://example.org/Film"))));
        let year = graph
            .objects_where(&heat, |p| p.local_name() == "year")
            .find_map(Term::as_literal)
            .unwrap();
        assert_eq!(year.lexical(), "1995");
        assert_eq!(year.datatype().as_str(), xsd::INTEGER);

        let label = graph
            .objects_where(&heat, |p| p.local_name() == "label")
            .find_map(Term::as_literal)
            .unwrap();
        assert_eq!(label.language(), Some("en"));
    }

    #[test]
    fn test_scanned_prefixes() {
        let prefixes = scan_prefixes(TURTLE);
        assert_eq!(prefixes.get("ex"), Some("http://example.org/"));
        assert_eq!(prefixes.get("rdfs"), Some("http://www.w3.org/2000/01/rdf-schema#"));
        assert_eq!(prefixes.get(""), Some("http://default.org/"));
    }

    #[test]
    fn test_ntriples_and_syntax_error() {
        let nt = "<http://e/a> <http://e/p> \"v\" .\n";
        assert_eq!(parse_graph(nt, GraphFormat::NTriples, "a.nt").unwrap().len(), 1);

        let err = parse_graph("<http://e/a> <http://e/p> .", GraphFormat::NTriples, "bad.nt").unwrap_err();
        assert_eq!(err.category(), "syntax");
    }

    #[test_case("turtle", GraphFormat::Turtle)]
    #[test_case("N-Triples", GraphFormat::NTriples)]
    #[test_case("nquads", GraphFormat::NQuads)]
    #[test_case("TriG", GraphFormat::TriG)]
    #[test_case("rdf/xml", GraphFormat::RdfXml)]
    fn test_format_names(name: &str, expected: GraphFormat) {
        assert_eq!(name.parse::<GraphFormat>().unwrap(), expected);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(GraphFormat::from_path(Path::new("a/b.TTL")), Some(GraphFormat::Turtle));
        assert_eq!(GraphFormat::from_path(Path::new("a/b.csv")), None);
    }
}
