//! The combined graph threaded through every integration stage

use tessera_core::vocab::{owl, STANDARD_PREFIXES};
use tessera_core::{Graph, NamedGraph, PrefixMap, Triple};

/// Union of all dataset graphs plus everything the stages derive
///
/// Stages receive it by `&mut` and may only add statements; there is no way to
/// remove one, so every stage's output survives to the writer.
#[derive(Debug, Clone, Default)]
pub struct CombinedGraph {
    graph: Graph,
}

impl CombinedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with every dataset's triples and prefixes, in dataset order, then
    /// bind the standard, `owl` and unified prefixes
    pub fn from_datasets(datasets: &[NamedGraph], unified_prefix: &str, unified_namespace: &str) -> Self {
        let mut combined = Self::new();
        for dataset in datasets {
            combined.merge(dataset.graph());
        }
        let prefixes = combined.graph.prefixes_mut();
        for (name, namespace) in STANDARD_PREFIXES {
            prefixes.bind_if_absent(name, namespace);
        }
        prefixes.bind_if_absent("owl", owl::NS);
        prefixes.bind_if_absent(unified_prefix, unified_namespace);
        combined
    }

    pub fn add(&mut self, triple: Triple) -> bool {
        self.graph.add(triple)
    }

    pub fn extend<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator<Item = Triple>,
    {
        self.graph.extend(triples)
    }

    /// Add another graph's triples and any prefixes not yet bound
    pub fn merge(&mut self, other: &Graph) -> usize {
        self.graph.prefixes_mut().merge(other.prefixes());
        self.graph.extend(other.iter().cloned())
    }

    pub fn prefixes(&self) -> &PrefixMap {
        self.graph.prefixes()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }
}
