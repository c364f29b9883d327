use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tessera_graph::SparqlEndpoint;

/// Send the CONSTRUCT query in `query` to `endpoint` and write the answer to `output`
pub fn execute(endpoint: &str, query: &Path, output: &Path) -> Result<()> {
    let text = fs::read_to_string(query)
        .with_context(|| format!("Failed to read query {}", query.display()))?;

    let triples = SparqlEndpoint::new(endpoint)
        .construct_to_path(&text, output)
        .with_context(|| format!("Failed to run {} against {}", query.display(), endpoint))?;

    println!("Saved {} triples from {} to {}", triples, endpoint, output.display());
    Ok(())
}
