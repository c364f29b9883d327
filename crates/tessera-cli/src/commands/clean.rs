use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use std::path::Path;
use tessera_graph::CleanReport;

/// Namespaces listed after a run
const SHOWN_NAMESPACES: usize = 20;

/// Repair the N-Triples dump at `input` and write it to `output` as Turtle
pub fn execute(input: &Path, output: &Path) -> Result<()> {
    let report = tessera_graph::clean_file(input, output)
        .with_context(|| format!("Failed to clean {}", input.display()))?;

    if !report.namespaces.is_empty() {
        println!("{}", namespace_table(&report));
    }
    println!(
        "Cleaned {} lines ({} repaired, {} skipped); wrote {} triples to {}",
        report.lines,
        report.repaired,
        report.skipped,
        report.triples,
        output.display()
    );
    Ok(())
}

fn namespace_table(report: &CleanReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Namespace", "Occurrences"]);
    for (namespace, count) in report.namespaces.iter().take(SHOWN_NAMESPACES) {
        table.add_row(vec![
            Cell::new(namespace),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
