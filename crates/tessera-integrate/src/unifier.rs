//! Ontology unification
//!
//! Properties declared (via `rdfs:domain`) on two or more of the classes to
//! unify, under the same local name, are collisions. Each collision gets one
//! unified property that the originals become `rdfs:subPropertyOf`; every
//! class to unify becomes `rdfs:subClassOf` the unified class. Configured
//! relationship properties are declared in the unified namespace alongside.
//!
//! The unifier only derives statements from what is already in the graph and
//! the graph is set-valued, so a second run adds nothing.

use crate::combined::CombinedGraph;
use tessera_config::RelationConfig;
use tessera_core::vocab::{rdf, rdfs};
use tessera_core::{Graph, Iri, Literal, Triple};
use tracing::{debug, info};

/// Properties sharing one local name across classes, first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub local_name: String,
    pub properties: Vec<Iri>,
}

/// What one unification run derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnificationReport {
    pub unified_class: Iri,
    pub collisions: Vec<Collision>,
    /// Classes linked to the unified class
    pub subclasses: Vec<Iri>,
    /// Relationship properties declared in the unified namespace
    pub relations: Vec<Iri>,
    /// Statements that were not yet in the graph
    pub triples_added: usize,
}

impl UnificationReport {
    pub fn unified_properties(&self) -> usize {
        self.collisions.len()
    }
}

/// Unifies the listed classes under one class in one namespace
#[derive(Debug, Clone)]
pub struct OntologyUnifier {
    namespace: String,
    unified_class: String,
    classes: Vec<String>,
    relations: Vec<RelationConfig>,
}

impl OntologyUnifier {
    pub fn new(
        namespace: impl Into<String>,
        unified_class: impl Into<String>,
        classes: Vec<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            unified_class: unified_class.into(),
            classes,
            relations: Vec::new(),
        }
    }

    pub fn with_relations(mut self, relations: Vec<RelationConfig>) -> Self {
        self.relations = relations;
        self
    }

    pub fn unified_class_iri(&self) -> Iri {
        self.local(&self.unified_class)
    }

    /// Per class to unify, the properties whose domain has that local name
    pub fn property_groups(&self, graph: &Graph) -> Vec<Vec<Iri>> {
        self.classes
            .iter()
            .map(|class| {
                let mut properties: Vec<Iri> = Vec::new();
                let declared = graph
                    .with_predicate(rdfs::DOMAIN)
                    .filter(|t| t.object.local_name() == Some(class.as_str()))
                    .filter_map(|t| t.subject.as_iri());
                for property in declared {
                    if !properties.contains(property) {
                        properties.push(property.clone());
                    }
                }
                properties
            })
            .collect()
    }

    /// Local-name collisions between every pair of property groups
    pub fn collisions(groups: &[Vec<Iri>]) -> Vec<Collision> {
        let mut collisions: Vec<Collision> = Vec::new();
        for (i, first) in groups.iter().enumerate() {
            for second in &groups[i + 1..] {
                for a in first {
                    for b in second.iter().filter(|b| b.local_name() == a.local_name()) {
                        let key = a.local_name();
                        let index = match collisions.iter().position(|c| c.local_name == key) {
                            Some(index) => index,
                            None => {
                                collisions.push(Collision {
                                    local_name: key.to_string(),
                                    properties: Vec::new(),
                                });
                                collisions.len() - 1
                            }
                        };
                        let entry = &mut collisions[index].properties;
                        for property in [a, b] {
                            if !entry.contains(property) {
                                entry.push(property.clone());
                            }
                        }
                    }
                }
            }
        }
        collisions
    }

    /// Run property and class synthesis over the combined graph
    pub fn unify(&self, combined: &mut CombinedGraph) -> UnificationReport {
        let groups = self.property_groups(combined.graph());
        let collisions = Self::collisions(&groups);
        let unified_class = self.unified_class_iri();

        let mut derived = Vec::new();
        for collision in &collisions {
            let unified = self.local(&collision.local_name);
            derived.push(Triple::new(unified.clone(), rdf::TYPE, Iri::new(rdf::PROPERTY)));
            derived.push(Triple::new(unified.clone(), rdfs::LABEL, Literal::string(collision.local_name.as_str())));
            let originals: Vec<&str> = collision.properties.iter().map(Iri::as_str).collect();
            derived.push(Triple::new(
                unified.clone(),
                rdfs::COMMENT,
                Literal::string(format!("Unifies {}", originals.join(", "))),
            ));
            derived.push(Triple::new(unified.clone(), rdfs::DOMAIN, unified_class.clone()));
            derived.push(Triple::new(unified.clone(), rdfs::RANGE, Iri::new(rdfs::LITERAL)));
            for property in &collision.properties {
                derived.push(Triple::new(property.clone(), rdfs::SUB_PROPERTY_OF, unified.clone()));
            }
            debug!(
                property = %unified,
                originals = collision.properties.len(),
                "unified property"
            );
        }

        derived.push(Triple::new(unified_class.clone(), rdf::TYPE, Iri::new(rdfs::CLASS)));
        derived.push(Triple::new(
            unified_class.clone(),
            rdfs::LABEL,
            Literal::string(self.unified_class.as_str()),
        ));
        derived.push(Triple::new(
            unified_class.clone(),
            rdfs::COMMENT,
            Literal::string(format!(
                "{} class integrating {}",
                self.unified_class,
                self.classes.join(", ")
            )),
        ));

        let mut relations = Vec::new();
        for relation in &self.relations {
            let property = self.local(&relation.name);
            derived.push(Triple::new(property.clone(), rdf::TYPE, Iri::new(rdf::PROPERTY)));
            if let Some(comment) = &relation.comment {
                derived.push(Triple::new(property.clone(), rdfs::COMMENT, Literal::string(comment.as_str())));
            }
            relations.push(property);
        }

        let subclasses = self.classes_to_link(combined.graph());
        for class in &subclasses {
            derived.push(Triple::new(class.clone(), rdfs::SUB_CLASS_OF, unified_class.clone()));
        }

        let triples_added = combined.extend(derived);
        info!(
            unified_class = %unified_class,
            properties = collisions.len(),
            subclasses = subclasses.len(),
            relations = relations.len(),
            triples_added,
            "unified ontology"
        );

        UnificationReport {
            unified_class,
            collisions,
            subclasses,
            relations,
            triples_added,
        }
    }

    /// Objects of `rdf:type` statements whose local name is a class to unify
    fn classes_to_link(&self, graph: &Graph) -> Vec<Iri> {
        let mut classes: Vec<Iri> = Vec::new();
        let typed = graph
            .typed_with(|class| self.classes.iter().any(|c| c == class.local_name()))
            .filter_map(|t| t.object.as_iri());
        for class in typed {
            if !classes.contains(class) {
                classes.push(class.clone());
            }
        }
        classes
    }

    fn local(&self, name: &str) -> Iri {
        Iri::new(format!("{}{}", self.namespace, name))
    }
}
