//! Conversions between tessera terms and oxigraph's model
//!
//! Quoted triples have no tessera counterpart and convert to `None`.

use oxigraph::model::{
    BlankNode, GraphName, Literal as OxLiteral, NamedNode, Quad, Subject, Term as OxTerm,
};
use tessera_core::{Iri, Literal, Term, Triple};

#[allow(unreachable_patterns)]
pub fn from_subject(subject: Subject) -> Option<Term> {
    match subject {
        Subject::NamedNode(node) => Some(Term::Iri(Iri::new(node.into_string()))),
        Subject::BlankNode(node) => Some(Term::Blank(node.as_str().to_string())),
        _ => None,
    }
}

#[allow(unreachable_patterns)]
pub fn from_term(term: OxTerm) -> Option<Term> {
    match term {
        OxTerm::NamedNode(node) => Some(Term::Iri(Iri::new(node.into_string()))),
        OxTerm::BlankNode(node) => Some(Term::Blank(node.as_str().to_string())),
        OxTerm::Literal(literal) => Some(Term::Literal(match literal.language() {
            Some(language) => Literal::language_tagged(literal.value(), language),
            None => Literal::typed(literal.value(), literal.datatype().as_str()),
        })),
        _ => None,
    }
}

pub fn from_parts(subject: Subject, predicate: NamedNode, object: OxTerm) -> Option<Triple> {
    Some(Triple::new(
        from_subject(subject)?,
        predicate.into_string(),
        from_term(object)?,
    ))
}

/// Default-graph quad for a triple; fails on IRIs, blank node ids or
/// language tags oxigraph rejects
pub fn to_quad(triple: &Triple) -> Result<Quad, String> {
    let subject: Subject = match &triple.subject {
        Term::Iri(iri) => named(iri)?.into(),
        Term::Blank(id) => blank(id)?.into(),
        Term::Literal(literal) => {
            return Err(format!("literal '{}' cannot be a subject", literal.lexical()))
        }
    };
    let object: OxTerm = match &triple.object {
        Term::Iri(iri) => named(iri)?.into(),
        Term::Blank(id) => blank(id)?.into(),
        Term::Literal(literal) => match literal.language() {
            Some(language) => OxLiteral::new_language_tagged_literal(literal.lexical(), language)
                .map_err(|e| e.to_string())?
                .into(),
            None => OxLiteral::new_typed_literal(literal.lexical(), named(literal.datatype())?).into(),
        },
    };
    Ok(Quad::new(subject, named(&triple.predicate)?, object, GraphName::DefaultGraph))
}

fn named(iri: &Iri) -> Result<NamedNode, String> {
    NamedNode::new(iri.as_str()).map_err(|e| format!("invalid IRI <{}>: {}", iri, e))
}

fn blank(id: &str) -> Result<BlankNode, String> {
    BlankNode::new(id).map_err(|e| format!("invalid blank node id '{}': {}", id, e))
}
