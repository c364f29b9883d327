//! # tessera-integrate
//!
//! Merges several exported datasets into one combined graph:
//!
//! 1. every dataset is loaded as a read-only [`NamedGraph`](tessera_core::NamedGraph)
//!    and its triples seed the [`CombinedGraph`];
//! 2. the [`matcher`] links equivalent resources across datasets with
//!    `owl:sameAs`;
//! 3. the [`unifier`] introduces a unified class and unified properties for
//!    colliding property names;
//! 4. a sibling ontology file is merged when present ([`enrich`]);
//! 5. the combined graph is written once.
//!
//! Stages only ever add statements to the combined graph.

pub mod combined;
pub mod enrich;
pub mod matcher;
pub mod pipeline;
pub mod stats;
pub mod unifier;

pub use combined::CombinedGraph;
pub use enrich::EnrichmentOutcome;
pub use matcher::{is_equivalent, normalize_value, similarity_ratio, EntityMatcher, MatchReport};
pub use pipeline::{integrate, integrate_graphs, IntegrationRequest, IntegrationSummary};
pub use stats::IntegrationStats;
pub use unifier::{OntologyUnifier, UnificationReport};
