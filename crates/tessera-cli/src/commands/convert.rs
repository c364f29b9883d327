use anyhow::{Context, Result};
use std::path::Path;
use tessera_graph::GraphFormat;

/// Re-serialize `input` as Turtle with the prefixes listed in `prefixes`
pub fn execute(input: &Path, prefixes: &Path, output: &Path, format: Option<GraphFormat>) -> Result<()> {
    let format = format
        .or_else(|| GraphFormat::from_path(input))
        .unwrap_or(GraphFormat::Turtle);

    let triples = tessera_graph::convert(input, format, prefixes, output)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!(
        "Converted {} ({}, {} triples) to {}",
        input.display(),
        format,
        triples,
        output.display()
    );
    Ok(())
}
