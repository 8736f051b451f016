//! N-Triples serializer for a graph instance.
//!
//! Writes the forward index only; inverse entries are derived from it and
//! would duplicate every IRI-valued triple. Nodes and values come out in
//! ingestion order, so two instances fed the same input dump identically.
//!
//! Two kinds of forward entries are left out, so a dump always parses back:
//! - synthetic field nodes (`urn:custom-field:`), as subject or object. They
//!   belong to the field registry of one instance, and ingestion refuses them;
//! - IRI objects that are not valid IRIs. They are kept forward-only in the
//!   index but have no N-Triples form.

use tracing::debug;

use crate::builder::TypeBuilder;
use crate::graph::SemanticGraph;
use crate::iri::iris::XSD_STRING;
use crate::iri::{is_custom_field_iri, is_valid_iri};
use crate::model::Object;

/// Serializes the forward index of `graph` to an N-Triples string.
#[must_use]
pub fn to_ntriples<B: TypeBuilder>(graph: &SemanticGraph<B>) -> String {
    let mut out = String::with_capacity(graph.triple_count() * 96);

    for (subject, node) in graph.nodes() {
        if is_custom_field_iri(subject) {
            continue;
        }
        for predicate in node.predicates() {
            for value in node.objects(predicate) {
                match object(value) {
                    Some(obj) => triple(&mut out, subject, predicate, &obj),
                    None => debug!(%subject, %predicate, %value, "skipping object with no N-Triples form"),
                }
            }
        }
    }

    out
}

fn triple(out: &mut String, subj: &str, pred: &str, obj: &str) {
    out.push('<');
    out.push_str(subj);
    out.push_str("> <");
    out.push_str(pred);
    out.push_str("> ");
    out.push_str(obj);
    out.push_str(" .\n");
}

fn object(value: &Object) -> Option<String> {
    let obj = match value {
        Object::Iri { value } if is_valid_iri(value) && !is_custom_field_iri(value) => {
            format!("<{value}>")
        }
        Object::Iri { .. } => return None,
        Object::BlankNode { id } => format!("_:{id}"),
        Object::Literal {
            lexical,
            datatype,
            language,
        } => {
            let escaped = escape(lexical);
            match (language, datatype) {
                (Some(lang), _) => format!("\"{escaped}\"@{lang}"),
                (None, Some(dt)) if dt != XSD_STRING => format!("\"{escaped}\"^^<{dt}>"),
                _ => format!("\"{escaped}\""),
            }
        }
    };
    Some(obj)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphConfig, SemanticGraph};
    use crate::iri::iris::{OWL_CLASS, RDFS_COMMENT, RDF_TYPE, XSD_INTEGER};
    use crate::model::Triple;
    use crate::resolvers::ResolverBundle;

    fn graph() -> SemanticGraph {
        let resolvers = ResolverBundle::new()
            .resolve_resource(|_, _, _| None)
            .resolve_source_class_iri(|_| None);
        SemanticGraph::new(resolvers, GraphConfig::default()).expect("graph")
    }

    #[test]
    fn every_line_ends_with_period() {
        let nt = to_ntriples(&graph());
        assert!(!nt.is_empty(), "seed vocabulary should dump");
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
    }

    #[test]
    fn line_count_matches_forward_triples() {
        let g = graph();
        assert_eq!(to_ntriples(&g).lines().count(), g.triple_count());
    }

    #[test]
    fn literals_are_escaped_and_typed() {
        let mut g = graph();
        let s = "http://example.org/Person";
        g.add_triple(&Triple::new(s, RDF_TYPE, Object::iri(OWL_CLASS)));
        g.add_triple(&Triple::new(s, RDFS_COMMENT, Object::literal("say \"hi\"\nthen go")));
        g.add_triple(&Triple::new(s, "http://example.org/rank", Object::typed("3", XSD_INTEGER)));

        let nt = to_ntriples(&g);
        assert!(nt.contains(&format!("<{s}> <{RDF_TYPE}> <{OWL_CLASS}> .")));
        assert!(nt.contains(r#""say \"hi\"\nthen go" ."#));
        assert!(nt.contains(&format!("\"3\"^^<{XSD_INTEGER}> .")));
    }

    #[test]
    fn objects_that_are_not_iris_are_left_out() {
        let mut g = graph();
        let s = "http://example.org/s";
        g.add_triple(&Triple::new(s, "http://example.org/p", Object::iri("bad object")));
        g.add_triple(&Triple::new(s, "http://example.org/q", Object::iri("http://example.org/o")));

        let nt = to_ntriples(&g);
        assert!(!nt.contains("bad object"), "invalid IRI written out");
        assert_eq!(nt.lines().count(), g.triple_count() - 1);
    }

    #[test]
    fn synthetic_field_nodes_are_left_out() {
        let mut g = graph();
        g.add_field_on_object_type(crate::iri::iris::OWL_THING, "extra", serde_json::json!({}))
            .expect("owl:Thing present");

        let nt = to_ntriples(&g);
        assert!(!nt.contains("urn:custom-field:"), "synthetic field exported");
        assert_eq!(nt.lines().count(), g.triple_count() - 1);
    }
}
