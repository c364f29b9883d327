use anyhow::{Context, Result};
use std::path::Path;
use tessera_config::TesseraConfig;
use tessera_core::SchemaRegistry;
use tessera_graph::{GraphExporter, IdentifierStrategy};
use tessera_ingest::CsvIngestor;
use tracing::debug;

/// Ingest `input` against the descriptor at `schema` and write Turtle to `output`
///
/// `strategy` replaces the descriptor's own identifier choice when given.
pub fn execute(
    config: &TesseraConfig,
    input: &Path,
    schema: &Path,
    output: &Path,
    strategy: Option<IdentifierStrategy>,
) -> Result<()> {
    let mut registry = SchemaRegistry::new();
    let type_name = registry
        .load_file(schema)
        .with_context(|| format!("Failed to load schema descriptor {}", schema.display()))?
        .type_name()
        .to_string();
    let schema = registry.get(&type_name)?;
    debug!(types = registry.len(), "registered {}", type_name);
    let records = CsvIngestor::new(schema)
        .ingest_file(input)
        .with_context(|| format!("Failed to ingest {}", input.display()))?;
    debug!(records = records.len(), "ingested {}", input.display());

    let mut exporter = GraphExporter::new(
        schema,
        config.export.prefix_for(&type_name),
        config.export.namespace_for(&type_name),
    );
    if let Some(strategy) = strategy {
        exporter = exporter.with_strategy(strategy)?;
    }

    let triples = exporter
        .export_to_path(&records, output)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    println!(
        "Exported {} {} records ({} triples) to {}",
        records.len(),
        schema.type_name(),
        triples,
        output.display()
    );
    Ok(())
}
