//! Optional merge of a hand-written sibling ontology

use crate::combined::CombinedGraph;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tessera_core::TesseraResult;
use tessera_graph::{load_graph, GraphFormat};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// The file was merged; `added` counts statements that were new
    Merged { path: PathBuf, added: usize },
    /// Nothing at the expected location; not an error
    NotFound { path: PathBuf },
}

/// Where the enrichment file is expected for a given output target
pub fn enrichment_path(output: &Path, file_name: &str) -> PathBuf {
    output
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(file_name)
}

/// Merge `<output dir>/<file_name>` into the combined graph when it exists
///
/// The file is read as Turtle unless its extension names another format.
/// A file that exists but does not parse is a syntax error.
pub fn enrich(
    combined: &mut CombinedGraph,
    output: &Path,
    file_name: &str,
) -> TesseraResult<EnrichmentOutcome> {
    let path = enrichment_path(output, file_name);
    // the enrichment file sits next to the output, so a matching name means it is the output
    if !path.is_file() || output.file_name() == Some(OsStr::new(file_name)) {
        info!("no enrichment ontology at {}", path.display());
        return Ok(EnrichmentOutcome::NotFound { path });
    }

    let format = GraphFormat::from_path(&path).unwrap_or(GraphFormat::Turtle);
    let ontology = load_graph(&path, format)?;
    let added = combined.merge(&ontology);
    info!(added, "merged enrichment ontology {}", path.display());
    Ok(EnrichmentOutcome::Merged { path, added })
}
