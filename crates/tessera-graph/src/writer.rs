//! Turtle text writer
//!
//! Renders a [`Graph`] as `@prefix` declaration lines followed by one
//! ` .`-terminated statement per triple, in graph insertion order. IRIs are
//! compacted to prefixed names when the remainder after a bound namespace is a
//! safe local name; everything else is written in angle brackets.

use regex::Regex;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;
use tessera_core::vocab::{rdf, xsd};
use tessera_core::{Graph, Iri, Literal, TesseraError, TesseraResult, Term};
use tracing::debug;

/// Turtle `PN_CHARS_BASE`
const PN_CHARS_BASE: &str = r"A-Za-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}";

/// Turtle `PN_CHARS` minus `PN_CHARS_U`
const PN_CHARS_EXTRA: &str = r"\-0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

/// `PN_LOCAL` without `:` and percent escapes
static LOCAL_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let first = format!("[{PN_CHARS_BASE}_0-9]");
    let inner = format!("[{PN_CHARS_BASE}_{PN_CHARS_EXTRA}.]");
    let last = format!("[{PN_CHARS_BASE}_{PN_CHARS_EXTRA}]");
    Regex::new(&format!("^(?:{first}(?:{inner}*{last})?)?$")).expect("local name regex")
});

/// `PN_PREFIX`, empty allowed
static PREFIX_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let first = format!("[{PN_CHARS_BASE}]");
    let inner = format!("[{PN_CHARS_BASE}_{PN_CHARS_EXTRA}.]");
    let last = format!("[{PN_CHARS_BASE}_{PN_CHARS_EXTRA}]");
    Regex::new(&format!("^(?:{first}(?:{inner}*{last})?)?$")).expect("prefix name regex")
});

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("integer regex"));

static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]*\.[0-9]+$").expect("decimal regex"));

static DOUBLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)[eE][+-]?[0-9]+$").expect("double regex")
});

/// Whether `name` can be declared with `@prefix`
pub fn is_prefix_name(name: &str) -> bool {
    PREFIX_NAME_REGEX.is_match(name)
}

/// Serializes one graph as Turtle
pub struct TurtleWriter<'g> {
    graph: &'g Graph,
    /// Bindings tried for compaction, longest namespace first
    compaction: Vec<(&'g str, &'g str)>,
}

impl<'g> TurtleWriter<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let mut compaction: Vec<_> = graph
            .prefixes()
            .iter()
            .filter(|(name, _)| is_prefix_name(name))
            .collect();
        compaction.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        Self { graph, compaction }
    }

    /// Render the whole document into memory
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut declared = 0usize;
        for (name, namespace) in self.graph.prefixes().iter() {
            if PREFIX_NAME_REGEX.is_match(name) {
                let _ = writeln!(out, "@prefix {}: <{}> .", name, namespace);
                declared += 1;
            }
        }
        if declared > 0 {
            out.push('\n');
        }

        for triple in self.graph.iter() {
            self.push_term(&mut out, &triple.subject);
            out.push(' ');
            if triple.predicate.as_str() == rdf::TYPE {
                out.push('a');
            } else {
                out.push_str(&self.iri(&triple.predicate));
            }
            out.push(' ');
            self.push_term(&mut out, &triple.object);
            out.push_str(" .\n");
        }
        out
    }

    /// Render, then write and flush the target once
    pub fn write_to_path(&self, path: &Path) -> TesseraResult<usize> {
        let text = self.render();
        let file = File::create(path).map_err(|e| TesseraError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| TesseraError::io(path, e))?;
        debug!(triples = self.graph.len(), bytes = text.len(), "wrote {}", path.display());
        Ok(self.graph.len())
    }

    /// Prefixed name when one applies, `<iri>` otherwise
    pub fn iri(&self, iri: &Iri) -> String {
        let text = iri.as_str();
        self.compaction
            .iter()
            .find_map(|(name, namespace)| {
                let local = text.strip_prefix(namespace)?;
                LOCAL_NAME_REGEX
                    .is_match(local)
                    .then(|| format!("{}:{}", name, local))
            })
            .unwrap_or_else(|| format!("<{}>", text))
    }

    fn push_term(&self, out: &mut String, term: &Term) {
        match term {
            Term::Iri(iri) => out.push_str(&self.iri(iri)),
            Term::Blank(id) => {
                out.push_str("_:");
                out.push_str(id);
            }
            Term::Literal(literal) => self.push_literal(out, literal),
        }
    }

    fn push_literal(&self, out: &mut String, literal: &Literal) {
        let lexical = literal.lexical();
        let datatype = literal.datatype().as_str();

        let bare = match datatype {
            xsd::INTEGER => INTEGER_REGEX.is_match(lexical),
            xsd::DECIMAL => DECIMAL_REGEX.is_match(lexical),
            xsd::DOUBLE => DOUBLE_REGEX.is_match(lexical),
            xsd::BOOLEAN => lexical == "true" || lexical == "false",
            _ => false,
        };
        if bare {
            out.push_str(lexical);
            return;
        }

        out.push('"');
        out.push_str(&escape(lexical));
        out.push('"');
        if let Some(language) = literal.language() {
            out.push('@');
            out.push_str(language);
        } else if datatype != xsd::STRING {
            out.push_str("^^");
            out.push_str(&self.iri(literal.datatype()));
        }
    }
}

/// Escape a lexical form for a double-quoted Turtle string
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
