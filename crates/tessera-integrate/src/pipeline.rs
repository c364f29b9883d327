//! One integration run from dataset files to the combined output file

use crate::combined::CombinedGraph;
use crate::enrich::{enrich, EnrichmentOutcome};
use crate::matcher::{EntityMatcher, MatchReport};
use crate::stats::IntegrationStats;
use crate::unifier::{OntologyUnifier, UnificationReport};
use std::collections::HashSet;
use std::path::PathBuf;
use tessera_config::IntegrateConfig;
use tessera_core::{NamedGraph, SchemaError, TesseraResult};
use tessera_graph::{load_graph, GraphFormat, TurtleWriter};
use tracing::info;

/// Everything the caller supplies for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationRequest {
    pub output: PathBuf,
    /// `(name, file)` pairs; order decides equivalence edge direction
    pub datasets: Vec<(String, PathBuf)>,
    pub identifying_property: String,
    pub unified_class: String,
    pub classes_to_unify: Vec<String>,
}

impl IntegrationRequest {
    /// Reject duplicate dataset names
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        for (name, _) in &self.datasets {
            if !names.insert(name.as_str()) {
                return Err(SchemaError::DuplicateDataset(name.clone()));
            }
        }
        Ok(())
    }
}

/// Reports from every stage of a completed run
#[derive(Debug, Clone)]
pub struct IntegrationSummary {
    pub matches: MatchReport,
    pub unification: UnificationReport,
    pub enrichment: EnrichmentOutcome,
    pub stats: IntegrationStats,
}

/// Match and unify already-loaded datasets
///
/// This is the in-memory core of [`integrate`]; it performs no I/O.
pub fn integrate_graphs(
    datasets: &[NamedGraph],
    request: &IntegrationRequest,
    config: &IntegrateConfig,
) -> (CombinedGraph, MatchReport, UnificationReport) {
    let mut combined =
        CombinedGraph::from_datasets(datasets, &config.unified_prefix, &config.unified_namespace);

    let matches = EntityMatcher::new(&request.identifying_property, request.classes_to_unify.clone())
        .index(datasets)
        .link(&mut combined);

    let unification = OntologyUnifier::new(
        &config.unified_namespace,
        &request.unified_class,
        request.classes_to_unify.clone(),
    )
    .with_relations(config.relations.clone())
    .unify(&mut combined);

    (combined, matches, unification)
}

/// Load, match, unify, enrich, then write the combined graph once
pub fn integrate(
    request: &IntegrationRequest,
    config: &IntegrateConfig,
) -> TesseraResult<IntegrationSummary> {
    request.validate()?;

    let datasets = request
        .datasets
        .iter()
        .map(|(name, path)| {
            let format = GraphFormat::from_path(path).unwrap_or(GraphFormat::Turtle);
            load_graph(path, format).map(|graph| NamedGraph::new(name.as_str(), graph))
        })
        .collect::<TesseraResult<Vec<_>>>()?;

    let (mut combined, matches, unification) = integrate_graphs(&datasets, request, config);
    let enrichment = enrich(&mut combined, &request.output, &config.enrichment_file)?;

    TurtleWriter::new(combined.graph()).write_to_path(&request.output)?;
    info!(
        triples = combined.len(),
        "integration complete, output written to {}",
        request.output.display()
    );

    let stats = IntegrationStats::collect(&datasets, &combined);
    Ok(IntegrationSummary {
        matches,
        unification,
        enrichment,
        stats,
    })
}
