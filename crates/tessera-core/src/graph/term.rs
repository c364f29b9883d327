//! IRIs, literals, terms and triples

use super::vocab::{rdf, xsd};
use chrono::NaiveDate;
use std::fmt;

/// An absolute IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Final path segment: the text after the last `#` or `/`, or after the
    /// last `:` for IRIs that have neither
    pub fn local_name(&self) -> &str {
        &self.0[self.split_at()..]
    }

    /// Everything up to and including the separator before [`Iri::local_name`]
    pub fn namespace(&self) -> &str {
        &self.0[..self.split_at()]
    }

    fn split_at(&self) -> usize {
        self.0
            .rfind(['#', '/'])
            .or_else(|| self.0.rfind(':'))
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A literal: lexical form, datatype and optional language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: Iri,
    language: Option<String>,
}

impl Literal {
    /// Plain `xsd:string` literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(value, xsd::STRING)
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    pub fn language_tagged(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Iri::new(rdf::LANG_STRING),
            language: Some(language.into()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), xsd::INTEGER)
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), xsd::BOOLEAN)
    }

    /// Doubles keep a decimal point or exponent so the lexical form stays a
    /// number when written bare
    pub fn double(value: f64) -> Self {
        if !value.is_finite() {
            let lexical = if value.is_nan() {
                "NaN"
            } else if value > 0.0 {
                "INF"
            } else {
                "-INF"
            };
            return Self::typed(lexical, xsd::DOUBLE);
        }
        let lexical = format!("{:?}", value);
        if lexical.contains(['e', 'E']) {
            Self::typed(lexical, xsd::DOUBLE)
        } else {
            Self::typed(lexical, xsd::DECIMAL)
        }
    }

    pub fn date(value: NaiveDate) -> Self {
        Self::typed(value.format("%Y-%m-%d").to_string(), xsd::DATE)
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Subject or object of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(Iri),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<Iri>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Local name of an IRI term, `None` for blank nodes and literals
    pub fn local_name(&self) -> Option<&str> {
        self.as_iri().map(Iri::local_name)
    }
}

impl From<Iri> for Term {
    fn from(value: Iri) -> Self {
        Self::Iri(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

/// A graph statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Iri>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}
