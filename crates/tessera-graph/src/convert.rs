//! Re-serialize an existing graph as Turtle under a caller-supplied prefix map

use crate::loader::{load_graph, GraphFormat};
use crate::writer::TurtleWriter;
use std::fs;
use std::path::Path;
use tessera_core::{PrefixMap, SchemaError, TesseraError, TesseraResult};
use tracing::info;

/// Parse a prefix-map file: one `shortName,fullIRI` pair per line
///
/// Blank lines and lines starting with `#` are skipped. A line without a comma,
/// or with an empty IRI, is a schema error naming the line.
pub fn parse_prefix_map(text: &str, origin: &str) -> Result<PrefixMap, SchemaError> {
    let mut prefixes = PrefixMap::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let invalid = |message: &str| SchemaError::InvalidDescriptor {
            origin: format!("{}:{}", origin, index + 1),
            message: message.to_string(),
        };

        let (name, namespace) = line
            .split_once(',')
            .ok_or_else(|| invalid("expected 'shortName,fullIRI'"))?;
        let name = name.trim().trim_end_matches(':');
        let namespace = namespace.trim().trim_start_matches('<').trim_end_matches('>');
        if namespace.is_empty() {
            return Err(invalid("missing namespace IRI"));
        }
        if name.contains(char::is_whitespace) {
            return Err(invalid("prefix names cannot contain whitespace"));
        }
        prefixes.bind(name, namespace);
    }
    Ok(prefixes)
}

/// Read a prefix-map file
pub fn read_prefix_map(path: &Path) -> TesseraResult<PrefixMap> {
    let text = fs::read_to_string(path).map_err(|e| TesseraError::io(path, e))?;
    Ok(parse_prefix_map(&text, &path.display().to_string())?)
}

/// Load `input` in `format` and write it to `output` as Turtle using only the
/// prefixes from `prefix_file`. Returns the number of triples written.
pub fn convert(
    input: &Path,
    format: GraphFormat,
    prefix_file: &Path,
    output: &Path,
) -> TesseraResult<usize> {
    let prefixes = read_prefix_map(prefix_file)?;
    let mut graph = load_graph(input, format)?;
    *graph.prefixes_mut() = prefixes;

    let triples = TurtleWriter::new(&graph).write_to_path(output)?;
    info!(
        triples,
        prefixes = graph.prefixes().len(),
        "converted {} to {}",
        input.display(),
        output.display()
    );
    Ok(triples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix_map() {
        let text = "\
# common vocabularies
imdb,http://www.imdb.org/
 rdfs , <http://www.w3.org/2000/01/rdf-schema#>

owl:,http://www.w3.org/2002/07/owl#
";
        let prefixes = parse_prefix_map(text, "prefixes.csv").unwrap();
        assert_eq!(prefixes.len(), 3);
        assert_eq!(prefixes.get("imdb"), Some("http://www.imdb.org/"));
        assert_eq!(prefixes.get("rdfs"), Some("http://www.w3.org/2000/01/rdf-schema#"));
        assert_eq!(prefixes.get("owl"), Some("http://www.w3.org/2002/07/owl#"));
    }

    #[test]
    fn test_malformed_line_names_position() {
        let err = parse_prefix_map("imdb,http://www.imdb.org/\nbroken line\n", "p.csv").unwrap_err();
        match err {
            SchemaError::InvalidDescriptor { origin, .. } => assert_eq!(origin, "p.csv:2"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse_prefix_map("imdb,\n", "p.csv").is_err());
    }
}
