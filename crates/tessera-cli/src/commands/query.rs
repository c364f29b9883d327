use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::Path;
use tessera_graph::{load_graph, GraphFormat, TurtleWriter};
use tessera_query::{render_cell, QueryEngine, QueryOutput};

/// Evaluate the query in `query` against `graph` and print the results
pub fn execute(query: &Path, graph: &Path) -> Result<()> {
    let text = std::fs::read_to_string(query)
        .with_context(|| format!("Failed to read query {}", query.display()))?;
    let format = GraphFormat::from_path(graph).unwrap_or(GraphFormat::Turtle);
    let graph = load_graph(graph, format)?;

    let output = QueryEngine::new(&graph)?.execute(&text)?;
    match &output {
        QueryOutput::Solutions { variables, rows } => {
            println!("{}", solutions_table(variables, rows));
            println!("{} results", rows.len());
        }
        QueryOutput::Boolean(value) => println!("{value}"),
        QueryOutput::Graph(graph) => print!("{}", TurtleWriter::new(graph).render()),
    }
    Ok(())
}

/// One column per variable; unbound cells show `N/A`
pub fn solutions_table(variables: &[String], rows: &[Vec<Option<String>>]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(variables.to_vec());
    for row in rows {
        table.add_row(row.iter().map(|cell| render_cell(cell.as_deref())).collect::<Vec<_>>());
    }
    table
}
