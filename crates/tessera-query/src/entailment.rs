//! Forward-chaining RDFS entailment
//!
//! Applies, until nothing new is derived:
//!
//! | rule   | if                                   | then               |
//! |--------|--------------------------------------|--------------------|
//! | rdfs2  | `p rdfs:domain c`, `x p y`           | `x a c`            |
//! | rdfs3  | `p rdfs:range c`, `x p y`, y not literal | `y a c`        |
//! | rdfs5  | `p subPropertyOf q`, `q subPropertyOf r` | `p subPropertyOf r` |
//! | rdfs7  | `p subPropertyOf q`, `x p y`         | `x q y`            |
//! | rdfs9  | `c subClassOf d`, `x a c`            | `x a d`            |
//! | rdfs11 | `c subClassOf d`, `d subClassOf e`   | `c subClassOf e`   |
//!
//! `owl:sameAs` has no special meaning here.

use tessera_core::vocab::{rdf, rdfs};
use tessera_core::{Graph, Iri, Term, Triple};
use tracing::debug;

/// The input graph plus every statement the rules entail
pub fn materialize(graph: &Graph) -> Graph {
    let mut entailed = graph.clone();
    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let derived = derive(&entailed);
        if entailed.extend(derived) == 0 {
            break;
        }
    }
    debug!(
        asserted = graph.len(),
        entailed = entailed.len() - graph.len(),
        rounds,
        "materialized RDFS entailment"
    );
    entailed
}

/// One pass of every rule over the current graph
fn derive(graph: &Graph) -> Vec<Triple> {
    let domains = schema_pairs(graph, rdfs::DOMAIN);
    let ranges = schema_pairs(graph, rdfs::RANGE);
    let sub_properties = schema_pairs(graph, rdfs::SUB_PROPERTY_OF);
    let sub_classes = schema_pairs(graph, rdfs::SUB_CLASS_OF);

    let mut derived = Vec::new();

    for triple in graph.iter() {
        let predicate = &triple.predicate;

        // rdfs2, rdfs3
        for (_, class) in domains.iter().filter(|(p, _)| p == predicate) {
            derived.push(Triple::new(triple.subject.clone(), rdf::TYPE, class.clone()));
        }
        if !triple.object.is_literal() {
            for (_, class) in ranges.iter().filter(|(p, _)| p == predicate) {
                derived.push(Triple::new(triple.object.clone(), rdf::TYPE, class.clone()));
            }
        }

        // rdfs7
        for (_, super_property) in sub_properties.iter().filter(|(p, _)| p == predicate) {
            if let Term::Iri(super_property) = super_property {
                derived.push(Triple::new(
                    triple.subject.clone(),
                    super_property.clone(),
                    triple.object.clone(),
                ));
            }
        }

        // rdfs9
        if predicate.as_str() == rdf::TYPE {
            if let Term::Iri(class) = &triple.object {
                for (_, super_class) in sub_classes.iter().filter(|(c, _)| c == class) {
                    derived.push(Triple::new(triple.subject.clone(), rdf::TYPE, super_class.clone()));
                }
            }
        }
    }

    // rdfs5, rdfs11
    derived.extend(transitive_step(&sub_properties, rdfs::SUB_PROPERTY_OF));
    derived.extend(transitive_step(&sub_classes, rdfs::SUB_CLASS_OF));

    derived.retain(|t| !graph.contains(t));
    derived
}

/// `(subject IRI, object)` of every statement with `predicate`
fn schema_pairs(graph: &Graph, predicate: &str) -> Vec<(Iri, Term)> {
    graph
        .with_predicate(predicate)
        .filter_map(|t| Some((t.subject.as_iri()?.clone(), t.object.clone())))
        .collect()
}

fn transitive_step(pairs: &[(Iri, Term)], predicate: &str) -> Vec<Triple> {
    let mut derived = Vec::new();
    for (a, b) in pairs {
        let Term::Iri(b) = b else { continue };
        for (_, c) in pairs.iter().filter(|(x, _)| x == b) {
            derived.push(Triple::new(a.clone(), predicate, c.clone()));
        }
    }
    derived
}
