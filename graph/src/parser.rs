//! Adapter from the external RDF parser (sophia) to decoded [`Triple`]s.
//!
//! The graph never parses Turtle itself: this module drives a sophia
//! [`TripleParser`] and converts each emitted triple into the crate's
//! [`Triple`] shape, in the order the parser produces them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sophia_iri::Iri;
use sophia_api::parser::TripleParser;
use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple as SophiaTriple;
use sophia_turtle::parser::nt::NTriplesParser;
use sophia_turtle::parser::turtle::TurtleParser;

use crate::error::{GraphError, Result};
use crate::iri::iris::XSD_STRING;
use crate::model::{Object, Triple};

/// Concrete RDF syntaxes accepted by [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfFormat {
    /// Turtle 1.1.
    #[default]
    Turtle,
    /// N-Triples.
    NTriples,
}

impl RdfFormat {
    /// Guesses the format from a file extension (`.nt` is N-Triples,
    /// everything else Turtle).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("nt") => RdfFormat::NTriples,
            _ => RdfFormat::Turtle,
        }
    }
}

/// Options forwarded to the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Input syntax.
    pub format: RdfFormat,
    /// Base IRI for resolving relative references (Turtle only).
    pub base_iri: Option<String>,
}

impl ParseOptions {
    /// Options for the given format with no base IRI.
    #[must_use]
    pub fn new(format: RdfFormat) -> Self {
        Self {
            format,
            base_iri: None,
        }
    }

    /// Sets the base IRI.
    #[must_use]
    pub fn with_base_iri(mut self, base: impl Into<String>) -> Self {
        self.base_iri = Some(base.into());
        self
    }
}

/// Decodes `data` and feeds every triple to `sink`. Returns the number of
/// triples decoded.
///
/// # Errors
///
/// Returns [`GraphError::InvalidArgument`] for an invalid base IRI and
/// [`GraphError::Syntax`] when the parser rejects the input. Triples decoded
/// before a syntax error have already been passed to `sink`.
pub fn decode(data: &str, options: &ParseOptions, mut sink: impl FnMut(Triple)) -> Result<usize> {
    let mut decoded = 0usize;
    let mut feed = |triple: Triple| {
        decoded += 1;
        sink(triple);
    };

    match options.format {
        RdfFormat::Turtle => {
            let base = options
                .base_iri
                .as_ref()
                .map(|b| {
                    Iri::new(b.clone())
                        .map_err(|e| GraphError::InvalidArgument(format!("base IRI {b:?}: {e}")))
                })
                .transpose()?;
            let parser = TurtleParser { base };
            drain(parser.parse_str(data), &mut feed)?;
        }
        RdfFormat::NTriples => {
            let parser = NTriplesParser {};
            drain(parser.parse_str(data), &mut feed)?;
        }
    }

    Ok(decoded)
}

fn drain<S: TripleSource>(mut source: S, feed: &mut impl FnMut(Triple)) -> Result<()> {
    source
        .for_each_triple(|t| feed(convert(&t)))
        .map_err(|e| GraphError::Syntax(e.to_string()))
}

fn convert<T: SophiaTriple>(t: &T) -> Triple {
    Triple {
        subject: resource_string(t.s()),
        predicate: resource_string(t.p()),
        object: object(t.o()),
    }
}

/// Subjects and predicates are plain strings; blank nodes become `_:id`, which
/// fails IRI validation downstream.
fn resource_string<T: Term>(term: T) -> String {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| iri.as_str().to_owned())
            .unwrap_or_default(),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| format!("_:{}", id.as_str()))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn object<T: Term>(term: T) -> Object {
    match term.kind() {
        TermKind::Iri => Object::iri(
            term.iri()
                .map(|iri| iri.as_str().to_owned())
                .unwrap_or_default(),
        ),
        TermKind::BlankNode => Object::BlankNode {
            id: term
                .bnode_id()
                .map(|id| id.as_str().to_owned())
                .unwrap_or_default(),
        },
        TermKind::Literal => {
            let lexical = term
                .lexical_form()
                .map(|l| String::from(&*l))
                .unwrap_or_default();
            let language = term.language_tag().map(|tag| tag.as_str().to_owned());
            let datatype = if language.is_some() {
                None
            } else {
                term.datatype()
                    .map(|dt| dt.as_str().to_owned())
                    .filter(|dt| dt != XSD_STRING)
            };
            Object::Literal {
                lexical,
                datatype,
                language,
            }
        }
        // Quoted triples and variables have no representation in the index.
        _ => Object::literal(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &str, options: &ParseOptions) -> (Result<usize>, Vec<Triple>) {
        let mut out = Vec::new();
        let res = decode(data, options, |t| out.push(t));
        (res, out)
    }

    #[test]
    fn decodes_turtle_in_document_order() {
        let ttl = r#"
            @prefix ex: <http://example.org/> .
            ex:alice ex:knows ex:bob ;
                     ex:name "Alice" ;
                     ex:age "42"^^<http://www.w3.org/2001/XMLSchema#integer> ;
                     ex:motto "bonjour"@fr .
        "#;
        let (res, triples) = collect(ttl, &ParseOptions::default());
        assert_eq!(res.ok(), Some(4));
        assert_eq!(triples[0].subject, "http://example.org/alice");
        assert_eq!(triples[0].object, Object::iri("http://example.org/bob"));
        assert_eq!(triples[1].object, Object::literal("Alice"));
        assert_eq!(
            triples[2].object,
            Object::typed("42", "http://www.w3.org/2001/XMLSchema#integer")
        );
        assert_eq!(
            triples[3].object,
            Object::Literal {
                lexical: "bonjour".into(),
                datatype: None,
                language: Some("fr".into()),
            }
        );
    }

    #[test]
    fn blank_node_subjects_are_rendered_with_prefix() {
        let ttl = "[] <http://example.org/p> <http://example.org/o> .";
        let (res, triples) = collect(ttl, &ParseOptions::default());
        assert!(res.is_ok());
        assert!(triples[0].subject.starts_with("_:"));
    }

    #[test]
    fn decodes_ntriples() {
        let nt = "<http://example.org/a> <http://example.org/p> \"x\" .\n";
        let (res, triples) = collect(nt, &ParseOptions::new(RdfFormat::NTriples));
        assert_eq!(res.ok(), Some(1));
        assert_eq!(triples[0].object, Object::literal("x"));
    }

    #[test]
    fn resolves_relative_iris_against_base() {
        let ttl = "<a> <p> <b> .";
        let options = ParseOptions::default().with_base_iri("http://example.org/");
        let (res, triples) = collect(ttl, &options);
        assert!(res.is_ok(), "{res:?}");
        assert_eq!(triples[0].subject, "http://example.org/a");
        assert_eq!(triples[0].object, Object::iri("http://example.org/b"));
    }

    #[test]
    fn rejects_invalid_base_iri() {
        let options = ParseOptions::default().with_base_iri("not a base");
        let (res, _) = collect("", &options);
        assert!(matches!(res, Err(GraphError::InvalidArgument(_))));
    }

    #[test]
    fn syntax_error_keeps_earlier_triples() {
        let ttl = "<http://example.org/a> <http://example.org/p> <http://example.org/b> .\n\
                   <http://example.org/c> <http://example.org/p> .\n";
        let (res, triples) = collect(ttl, &ParseOptions::default());
        assert!(matches!(res, Err(GraphError::Syntax(_))));
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(RdfFormat::from_path(Path::new("a.nt")), RdfFormat::NTriples);
        assert_eq!(RdfFormat::from_path(Path::new("a.ttl")), RdfFormat::Turtle);
        assert_eq!(RdfFormat::from_path(Path::new("noext")), RdfFormat::Turtle);
    }
}
