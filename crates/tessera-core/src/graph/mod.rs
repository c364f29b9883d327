//! Set-valued in-memory graph
//!
//! [`Graph`] is the minimal contract the pipeline needs from a triple store:
//! load (by adding), pattern lookup and add. Triples are set-valued, so adding
//! a statement that is already present is a no-op; iteration follows insertion
//! order, which keeps every writer deterministic.
//!
//! Graphs only grow; there is no removal API.

mod term;
pub mod vocab;

pub use term::{Iri, Literal, Term, Triple};

use crate::error::SchemaError;
use std::collections::HashSet;
use vocab::rdf;

/// Ordered namespace prefix bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `namespace`, replacing an earlier binding of the same name
    pub fn bind(&mut self, name: impl Into<String>, namespace: impl Into<String>) {
        let name = name.into();
        let namespace = namespace.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = namespace,
            None => self.entries.push((name, namespace)),
        }
    }

    /// Bind only if the name is still free
    pub fn bind_if_absent(&mut self, name: &str, namespace: &str) {
        if self.get(name).is_none() {
            self.entries.push((name.to_string(), namespace.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ns)| ns.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, ns)| (n.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another map; existing names win
    pub fn merge(&mut self, other: &PrefixMap) {
        for (name, namespace) in other.iter() {
            self.bind_if_absent(name, namespace);
        }
    }

    /// Expand `prefix:local`, `<iri>` or an absolute IRI
    pub fn expand(&self, text: &str) -> Result<Iri, SchemaError> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            return Ok(Iri::new(inner));
        }
        if text.contains("://") || text.starts_with("urn:") {
            return Ok(Iri::new(text));
        }
        let (prefix, local) = text
            .split_once(':')
            .ok_or_else(|| SchemaError::UnknownPrefix(text.to_string()))?;
        let namespace = self
            .get(prefix)
            .ok_or_else(|| SchemaError::UnknownPrefix(text.to_string()))?;
        Ok(Iri::new(format!("{}{}", namespace, local)))
    }
}

/// A set of triples with prefix bindings
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    index: HashSet<Triple>,
    prefixes: PrefixMap,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple; returns false if it was already present
    pub fn add(&mut self, triple: Triple) -> bool {
        if self.index.contains(&triple) {
            return false;
        }
        self.index.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Add many triples, returning how many were new
    pub fn extend<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator<Item = Triple>,
    {
        triples
            .into_iter()
            .map(|t| self.add(t))
            .filter(|added| *added)
            .count()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.index.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    pub fn prefixes_mut(&mut self) -> &mut PrefixMap {
        &mut self.prefixes
    }

    /// Pattern lookup; `None` matches anything
    pub fn matching<'a>(
        &'a self,
        subject: Option<&'a Term>,
        predicate: Option<&'a str>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| {
            subject.map_or(true, |s| &t.subject == s)
                && predicate.map_or(true, |p| t.predicate.as_str() == p)
                && object.map_or(true, |o| &t.object == o)
        })
    }

    /// All statements with the given predicate
    pub fn with_predicate<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.matching(None, Some(predicate), None)
    }

    /// Objects of `subject`'s statements whose predicate satisfies `accept`
    pub fn objects_where<'a, F>(&'a self, subject: &'a Term, accept: F) -> impl Iterator<Item = &'a Term> + 'a
    where
        F: Fn(&Iri) -> bool + 'a,
    {
        self.matching(Some(subject), None, None)
            .filter(move |t| accept(&t.predicate))
            .map(|t| &t.object)
    }

    /// `rdf:type` statements whose class IRI satisfies `accept`
    pub fn typed_with<'a, F>(&'a self, accept: F) -> impl Iterator<Item = &'a Triple> + 'a
    where
        F: Fn(&Iri) -> bool + 'a,
    {
        self.with_predicate(rdf::TYPE)
            .filter(move |t| t.object.as_iri().map_or(false, &accept))
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

/// A graph loaded from one named source; read-only once built
#[derive(Debug, Clone)]
pub struct NamedGraph {
    name: String,
    graph: Graph,
}

impl NamedGraph {
    pub fn new(name: impl Into<String>, graph: Graph) -> Self {
        Self {
            name: name.into(),
            graph,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::vocab::rdfs;
    use super::*;

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Iri::new(s), p, Iri::new(o))
    }

    #[test]
    fn test_add_is_set_valued_and_ordered() {
        let mut graph = Graph::new();
        assert!(graph.add(t("http://e/a", rdf::TYPE, "http://e/Foo")));
        assert!(graph.add(t("http://e/b", rdf::TYPE, "http://e/Foo")));
        assert!(!graph.add(t("http://e/a", rdf::TYPE, "http://e/Foo")));
        assert_eq!(graph.len(), 2);

        let subjects: Vec<_> = graph.iter().map(|t| t.subject.local_name().unwrap()).collect();
        assert_eq!(subjects, vec!["a", "b"]);
    }

    #[test]
    fn test_extend_counts_new_triples() {
        let mut graph = Graph::new();
        graph.add(t("http://e/a", rdf::TYPE, "http://e/Foo"));
        let added = graph.extend(vec![
            t("http://e/a", rdf::TYPE, "http://e/Foo"),
            t("http://e/Foo", rdf::TYPE, rdfs::CLASS),
        ]);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_pattern_lookup() {
        let mut graph = Graph::new();
        graph.add(t("http://e/a", rdf::TYPE, "http://e/Foo"));
        graph.add(t("http://e/Foo", rdf::TYPE, rdfs::CLASS));
        graph.add(t("http://e/name", rdfs::DOMAIN, "http://e/Foo"));

        assert_eq!(graph.with_predicate(rdf::TYPE).count(), 2);
        let foo_instances: Vec<_> = graph.typed_with(|c| c.local_name() == "Foo").collect();
        assert_eq!(foo_instances.len(), 1);

        let a = Term::iri("http://e/a");
        assert_eq!(graph.objects_where(&a, |p| p.as_str() == rdf::TYPE).count(), 1);
    }

    #[test]
    fn test_prefix_expansion() {
        let mut prefixes = PrefixMap::new();
        prefixes.bind("xsd", vocab::xsd::NS);
        prefixes.bind("", "http://example.org/");

        assert_eq!(prefixes.expand("xsd:date").unwrap().as_str(), vocab::xsd::DATE);
        assert_eq!(prefixes.expand(":Film").unwrap().as_str(), "http://example.org/Film");
        assert_eq!(
            prefixes.expand("<http://x.org/y>").unwrap().as_str(),
            "http://x.org/y"
        );
        assert!(matches!(
            prefixes.expand("dbo:Film"),
            Err(SchemaError::UnknownPrefix(_))
        ));
    }

    #[test]
    fn test_prefix_merge_keeps_existing() {
        let mut a = PrefixMap::new();
        a.bind("ex", "http://a/");
        let mut b = PrefixMap::new();
        b.bind("ex", "http://b/");
        b.bind("owl", vocab::owl::NS);
        a.merge(&b);
        assert_eq!(a.get("ex"), Some("http://a/"));
        assert_eq!(a.len(), 2);
    }
}
