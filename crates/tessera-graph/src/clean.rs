//! Repair and compact N-Triples dumps
//!
//! Public dumps often carry IRIs with raw spaces or tabs, which strict
//! N-Triples parsers reject. Cleaning percent-encodes that whitespace line by
//! line, drops lines whose IRIs cannot be repaired, then re-serializes the
//! result as Turtle with prefixes discovered from the namespaces the dump uses
//! most.

use crate::loader::{parse_graph, GraphFormat};
use crate::writer::{is_prefix_name, TurtleWriter};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tessera_core::vocab::{owl, rdf, rdfs, xsd};
use tessera_core::{Graph, PrefixMap, TesseraError, TesseraResult};
use tracing::{debug, info};

static IRI_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]+)>").expect("iri regex"));

/// Lines scanned for namespace discovery
pub const DISCOVERY_LINE_LIMIT: usize = 100_000;

/// Vocabularies bound before any discovered namespace
const WELL_KNOWN_PREFIXES: [(&str, &str); 7] = [
    ("rdf", rdf::NS),
    ("rdfs", rdfs::NS),
    ("owl", owl::NS),
    ("xsd", xsd::NS),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
];

/// Conventional names for namespaces of common linked-data sources, most
/// specific first
const KNOWN_NAMESPACES: [(&str, &str); 21] = [
    ("linkedmdb.org/resource/movie/", "movie"),
    ("linkedmdb.org/resource/actor/", "actor"),
    ("linkedmdb.org/resource/director/", "director"),
    ("linkedmdb.org/resource/writer/", "writer"),
    ("linkedmdb.org/resource/producer/", "producer"),
    ("linkedmdb.org/resource/film/", "film"),
    ("linkedmdb.org/resource/country/", "country"),
    ("linkedmdb.org/resource/film_genre/", "genre"),
    ("linkedmdb.org/resource/performance/", "perf"),
    ("linkedmdb.org/resource/oddlinker/", "oddlinker"),
    ("linkedmdb.org/resource/interlink/", "interlink"),
    ("linkedmdb.org/resource/", "lmdb"),
    ("dbpedia.org/ontology/", "dbo"),
    ("dbpedia.org/property/", "dbp"),
    ("dbpedia.org/resource/", "dbr"),
    ("wikidata.org/entity/", "wd"),
    ("wikidata.org/prop/direct/", "wdt"),
    ("freebase.com/", "freebase"),
    ("schema.org/", "schema"),
    ("purl.org/dc/terms/", "dcterms"),
    ("xmlns.com/foaf/0.1/", "foaf"),
];

/// What a cleaning run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Lines read, including blank and comment lines
    pub lines: usize,
    /// Lines whose IRIs needed percent-encoding
    pub repaired: usize,
    /// Lines dropped because an IRI was never closed
    pub skipped: usize,
    /// Statements in the cleaned graph
    pub triples: usize,
    /// Discovered namespaces with their occurrence counts, most used first
    pub namespaces: Vec<(String, usize)>,
}

/// Percent-encode whitespace inside the IRIs of one N-Triples line
///
/// Lines whose IRIs are already clean come back borrowed. `None` means the
/// line needed repair but has an unterminated `<` and must be dropped.
pub fn clean_line(line: &str) -> Option<Cow<'_, str>> {
    if !has_whitespace_iri(line) {
        return Some(Cow::Borrowed(line));
    }

    let mut out = String::with_capacity(line.len() + 8);
    let mut rest = line;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..=start]);
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        for c in after[..end].chars() {
            match c {
                ' ' => out.push_str("%20"),
                '\t' => out.push_str("%09"),
                '\n' | '\r' => {}
                c => out.push(c),
            }
        }
        out.push('>');
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(Cow::Owned(out))
}

/// True when some closed `<...>` on the line holds a space or tab
fn has_whitespace_iri(line: &str) -> bool {
    let mut rest = line;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            return false;
        };
        if after[..end].contains([' ', '\t']) {
            return true;
        }
        rest = &after[end + 1..];
    }
    false
}

/// Namespace of an IRI: everything up to the last `/` or `#`
///
/// IRIs ending in the separator, or without one past the scheme, have none.
pub fn namespace_of(iri: &str) -> Option<&str> {
    let split = iri.rfind(['/', '#'])?;
    (split > 0 && split < iri.len() - 1).then(|| &iri[..=split])
}

/// Count namespace occurrences over the first `limit` lines, most used first
///
/// Ties are ordered by namespace so discovery is deterministic.
pub fn discover_namespaces(text: &str, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in text.lines().take(limit) {
        for captures in IRI_REF_REGEX.captures_iter(line) {
            if let Some(namespace) = captures.get(1).and_then(|m| namespace_of(m.as_str())) {
                *counts.entry(namespace).or_default() += 1;
            }
        }
    }

    let mut namespaces: Vec<_> = counts
        .into_iter()
        .map(|(namespace, count)| (namespace.to_string(), count))
        .collect();
    namespaces.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    namespaces
}

/// Short prefix name for a discovered namespace
///
/// Known linked-data sources get their conventional names. Anything else is
/// named after its last path segment, or `ns` when that segment cannot be a
/// Turtle prefix name.
pub fn prefix_name_for(namespace: &str) -> String {
    if let Some((_, name)) = KNOWN_NAMESPACES
        .iter()
        .find(|(fragment, _)| namespace.contains(fragment))
    {
        return (*name).to_string();
    }

    let path = namespace
        .split_once("://")
        .map_or(namespace, |(_, rest)| rest)
        .trim_end_matches(['/', '#']);
    match path.rsplit_once('/') {
        Some((_, segment)) if !segment.is_empty() && is_prefix_name(segment) => segment.to_string(),
        _ => "ns".to_string(),
    }
}

/// Well-known vocabularies, then discovered namespaces by descending use
///
/// A namespace is skipped when its name is already taken or it is already
/// bound under another name.
pub fn discovered_prefixes(namespaces: &[(String, usize)]) -> PrefixMap {
    let mut prefixes = PrefixMap::new();
    for (name, namespace) in WELL_KNOWN_PREFIXES {
        prefixes.bind(name, namespace);
    }
    for (namespace, _) in namespaces {
        let name = prefix_name_for(namespace);
        let bound = prefixes.iter().any(|(_, ns)| ns == namespace);
        if bound || prefixes.get(&name).is_some() {
            debug!(%namespace, %name, "prefix not bound");
            continue;
        }
        prefixes.bind(name, namespace.as_str());
    }
    prefixes
}

/// Clean N-Triples text into a graph carrying discovered prefixes
///
/// Blank lines and `#` comments are dropped. A line that still fails to
/// parse after cleaning is a syntax error naming `origin`.
pub fn clean_ntriples(text: &str, origin: &str) -> TesseraResult<(Graph, CleanReport)> {
    let mut report = CleanReport {
        namespaces: discover_namespaces(text, DISCOVERY_LINE_LIMIT),
        ..Default::default()
    };

    let mut cleaned = String::with_capacity(text.len());
    for line in text.lines() {
        report.lines += 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match clean_line(line) {
            Some(Cow::Borrowed(line)) => cleaned.push_str(line),
            Some(Cow::Owned(line)) => {
                report.repaired += 1;
                cleaned.push_str(&line);
            }
            None => {
                report.skipped += 1;
                continue;
            }
        }
        cleaned.push('\n');
    }

    let mut graph = parse_graph(&cleaned, GraphFormat::NTriples, origin)?;
    *graph.prefixes_mut() = discovered_prefixes(&report.namespaces);
    report.triples = graph.len();
    Ok((graph, report))
}

/// Clean an N-Triples file and write it to `output` as Turtle
pub fn clean_file(input: &Path, output: &Path) -> TesseraResult<CleanReport> {
    let text = fs::read_to_string(input).map_err(|e| TesseraError::io(input, e))?;
    let (graph, report) = clean_ntriples(&text, &input.display().to_string())?;
    TurtleWriter::new(&graph).write_to_path(output)?;
    info!(
        lines = report.lines,
        repaired = report.repaired,
        skipped = report.skipped,
        triples = report.triples,
        "cleaned {} into {}",
        input.display(),
        output.display()
    );
    Ok(report)
}
