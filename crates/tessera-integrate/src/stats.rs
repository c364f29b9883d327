//! Integration statistics

use crate::combined::CombinedGraph;
use tessera_core::vocab::{owl, rdf, rdfs};
use tessera_core::{Graph, NamedGraph};

/// Triple counts per dataset and for the combined graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationStats {
    /// `(dataset name, triples)` in dataset order
    pub datasets: Vec<(String, usize)>,
    pub combined_triples: usize,
    pub same_as: usize,
    /// `x a rdfs:Class` statements
    pub classes: usize,
    /// `x a rdf:Property` statements
    pub properties: usize,
}

impl IntegrationStats {
    pub fn collect(datasets: &[NamedGraph], combined: &CombinedGraph) -> Self {
        let graph = combined.graph();
        Self {
            datasets: datasets
                .iter()
                .map(|d| (d.name().to_string(), d.graph().len()))
                .collect(),
            combined_triples: graph.len(),
            same_as: graph.with_predicate(owl::SAME_AS).count(),
            classes: count_typed(graph, rdfs::CLASS),
            properties: count_typed(graph, rdf::PROPERTY),
        }
    }
}

fn count_typed(graph: &Graph, class: &str) -> usize {
    graph.typed_with(|c| c.as_str() == class).count()
}
