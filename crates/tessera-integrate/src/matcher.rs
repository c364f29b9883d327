//! Cross-dataset entity matching
//!
//! The matcher moves through three states, each a distinct type:
//!
//! ```text
//! EntityMatcher --index()--> IndexedDatasets --link()--> MatchReport
//! ```
//!
//! Indexing collects, per dataset, the IRI subjects typed with one of the
//! classes to unify, together with their normalized identifying value.
//! Linking compares every resource of dataset `i` with every resource of
//! dataset `j > i` and adds one directed `owl:sameAs` edge from the `i`
//! resource to the `j` resource for each equivalent pair. No reverse edge and
//! no transitive closure is produced.
//!
//! The comparison is a plain cross product, quadratic in both dataset count
//! and resources per dataset.

use crate::combined::CombinedGraph;
use std::collections::HashSet;
use tessera_core::vocab::owl;
use tessera_core::{Iri, NamedGraph, Term, Triple, SIMILARITY_THRESHOLD};
use tracing::{debug, info, warn};

/// Lowercase, drop everything but `[a-z0-9]` and whitespace, collapse
/// whitespace runs to one space, trim
pub fn normalize_value(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_ascii_whitespace())
        .collect::<String>()
        .split_ascii_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1 - distance / max(len)`; 1.0 when both are empty
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Equal after normalization, or similar strictly above the threshold
pub fn is_equivalent(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_value(a), normalize_value(b));
    equivalent_normalized(&a, &b)
}

fn equivalent_normalized(a: &str, b: &str) -> bool {
    a == b || similarity_ratio(a, b) > SIMILARITY_THRESHOLD
}

/// Matcher configuration, before any dataset is indexed
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    identifying_property: String,
    classes: Vec<String>,
}

/// A resource eligible for matching
#[derive(Debug, Clone)]
pub struct Candidate<'d> {
    pub resource: &'d Iri,
    /// Normalized identifying value, `None` when the resource has none
    pub identifier: Option<String>,
}

/// Candidates of one dataset
#[derive(Debug, Clone)]
pub struct DatasetIndex<'d> {
    pub name: &'d str,
    pub candidates: Vec<Candidate<'d>>,
}

/// Matcher state after indexing
#[derive(Debug, Clone)]
pub struct IndexedDatasets<'d> {
    datasets: Vec<DatasetIndex<'d>>,
}

/// One equivalence edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equivalence {
    pub from_dataset: String,
    pub from: Iri,
    pub to_dataset: String,
    pub to: Iri,
}

/// Outcome of a matching run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchReport {
    /// Cross-dataset resource pairs considered
    pub pairs_compared: usize,
    /// Pairs skipped because a side had no identifying value
    pub skipped_missing_identifier: usize,
    /// Pairs skipped because both datasets contain the same resource
    pub skipped_shared_resource: usize,
    /// Edges in the order they were found
    pub equivalences: Vec<Equivalence>,
}

impl EntityMatcher {
    pub fn new(identifying_property: impl Into<String>, classes: Vec<String>) -> Self {
        Self {
            identifying_property: identifying_property.into(),
            classes,
        }
    }

    /// Build the per-dataset candidate index; dataset order is kept
    pub fn index<'d>(self, datasets: &'d [NamedGraph]) -> IndexedDatasets<'d> {
        let datasets = datasets
            .iter()
            .map(|dataset| {
                let index = self.index_one(dataset);
                debug!(
                    dataset = dataset.name(),
                    candidates = index.candidates.len(),
                    "indexed dataset"
                );
                index
            })
            .collect();
        IndexedDatasets { datasets }
    }

    fn index_one<'d>(&self, dataset: &'d NamedGraph) -> DatasetIndex<'d> {
        let graph = dataset.graph();
        let classes = self.classes.clone();
        let mut seen = HashSet::new();
        let candidates = graph
            .typed_with(move |class| classes.iter().any(|c| c == class.local_name()))
            .filter_map(|t| t.subject.as_iri())
            .filter(|resource| seen.insert(*resource))
            .map(|resource| {
                let subject = Term::Iri(resource.clone());
                let identifier = graph
                    .objects_where(&subject, |p| p.local_name() == self.identifying_property)
                    .find_map(Term::as_literal)
                    .map(|literal| normalize_value(literal.lexical()));
                Candidate { resource, identifier }
            })
            .collect();

        DatasetIndex {
            name: dataset.name(),
            candidates,
        }
    }
}

impl<'d> IndexedDatasets<'d> {
    pub fn datasets(&self) -> &[DatasetIndex<'d>] {
        &self.datasets
    }

    /// Compare every cross-dataset pair and add the equivalence edges
    pub fn link(self, combined: &mut CombinedGraph) -> MatchReport {
        let mut report = MatchReport::default();

        for (i, first) in self.datasets.iter().enumerate() {
            for second in &self.datasets[i + 1..] {
                for a in &first.candidates {
                    for b in &second.candidates {
                        report.pairs_compared += 1;
                        let (Some(id_a), Some(id_b)) = (&a.identifier, &b.identifier) else {
                            report.skipped_missing_identifier += 1;
                            continue;
                        };
                        if !equivalent_normalized(id_a, id_b) {
                            continue;
                        }
                        if a.resource == b.resource {
                            report.skipped_shared_resource += 1;
                            continue;
                        }
                        combined.add(Triple::new(a.resource.clone(), owl::SAME_AS, b.resource.clone()));
                        report.equivalences.push(Equivalence {
                            from_dataset: first.name.to_string(),
                            from: a.resource.clone(),
                            to_dataset: second.name.to_string(),
                            to: b.resource.clone(),
                        });
                    }
                }
            }
        }

        if report.skipped_missing_identifier > 0 {
            info!(
                "skipped {} candidate pairs without identifying property",
                report.skipped_missing_identifier
            );
        }
        if report.skipped_shared_resource > 0 {
            warn!(
                "{} matching resources appear in more than one dataset; no owl:sameAs added for them",
                report.skipped_shared_resource
            );
        }
        info!(
            pairs = report.pairs_compared,
            "added {} owl:sameAs relationships",
            report.equivalences.len()
        );
        report
    }
}
