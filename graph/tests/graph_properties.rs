//! Graph Invariant Integration Tests
//!
//! Drives the public API of a graph instance and checks the indexing and
//! registry guarantees: idempotent ingestion, forward/inverse consistency,
//! self-loops, invalid-IRI no-ops, local-name memoization, field
//! registration and seed isolation.

use semantic_graph::iri::iris::{OWL_THING, RDFS_DOMAIN, RDF_TYPE};
use semantic_graph::vocabulary;
use semantic_graph::{Direction, GraphConfig, GraphError, Object, ResolverBundle, SemanticGraph, Triple};
use serde_json::json;

const EX: &str = "http://example.org/";

fn ex(local: &str) -> String {
    format!("{EX}{local}")
}

fn resolvers() -> ResolverBundle {
    ResolverBundle::new()
        .resolve_resource(|_, _, _| None)
        .resolve_source_class_iri(|_| None)
}

fn graph() -> SemanticGraph {
    SemanticGraph::new(resolvers(), GraphConfig::default()).expect("graph should build")
}

// ============================================================================
// Ingestion
// ============================================================================

#[test]
fn test_indexing_twice_is_idempotent() {
    let mut g = graph();
    let t = Triple::new(ex("alice"), ex("knows"), Object::iri(ex("bob")));

    assert!(g.add_triple(&t), "first insert changes the index");
    let after_first = g.objects(&ex("alice"), &ex("knows")).len();
    assert!(!g.add_triple(&t), "second insert is a no-op");
    assert_eq!(g.objects(&ex("alice"), &ex("knows")).len(), after_first);
    assert_eq!(g.subjects(&ex("bob"), &ex("knows")), vec![ex("alice").as_str()]);
}

#[test]
fn test_inverse_entry_exists_exactly_once() {
    let mut g = graph();
    for o in ["bob", "carol", "bob"] {
        g.add_triple(&Triple::new(ex("alice"), ex("knows"), Object::iri(ex(o))));
    }
    g.add_triple(&Triple::new(ex("dave"), ex("knows"), Object::iri(ex("bob"))));

    let knowers = g.subjects(&ex("bob"), &ex("knows"));
    assert_eq!(knowers, vec![ex("alice").as_str(), ex("dave").as_str()]);
    assert_eq!(
        g.objects(&ex("alice"), &ex("knows")),
        &[Object::iri(ex("bob")), Object::iri(ex("carol"))],
        "forward values keep ingestion order"
    );
}

#[test]
fn test_self_loop_has_forward_and_inverse_entries() {
    let mut g = graph();
    let x = ex("x");
    g.add_triple(&Triple::new(x.as_str(), ex("likes"), Object::iri(x.as_str())));

    let node = g.node(&x).expect("x indexed");
    assert_eq!(node.values(Direction::Forward, &ex("likes")), &[Object::iri(x.as_str())]);
    assert_eq!(node.values(Direction::Inverse, &ex("likes")), &[Object::iri(x.as_str())]);
    assert_eq!(node.predicates().count(), 1);
    assert_eq!(node.inverse_predicates().count(), 1);
}

#[test]
fn test_literal_objects_get_no_inverse_entry() {
    let mut g = graph();
    let before = g.len();
    g.add_triple(&Triple::new(ex("alice"), ex("name"), Object::literal("Alice")));

    assert_eq!(g.len(), before + 1, "only the subject node is created");
    assert_eq!(g.node(&ex("alice")).and_then(|n| n.literal(&ex("name"))), Some("Alice"));
}

#[test]
fn test_invalid_subject_or_predicate_is_a_no_op() {
    let mut g = graph();
    let before = (g.len(), g.triple_count());

    let bad_subject = Triple::new("not an iri", ex("p"), Object::iri(ex("o")));
    let bad_predicate = Triple::new(ex("s"), "no-colon", Object::iri(ex("o")));
    let blank_subject = Triple::new("_:b0", ex("p"), Object::iri(ex("o")));

    for t in [bad_subject, bad_predicate, blank_subject] {
        assert!(!g.add_triple(&t), "{t:?} should be skipped");
    }
    assert_eq!((g.len(), g.triple_count()), before);
    assert!(!g.contains("not an iri"));
    assert!(!g.contains(&ex("o")), "no inverse node for a skipped triple");
}

#[test]
fn test_invalid_iri_object_is_stored_forward_only() {
    let mut g = graph();
    g.add_triple(&Triple::new(ex("s"), ex("p"), Object::iri("bad object")));

    assert_eq!(g.objects(&ex("s"), &ex("p")), &[Object::iri("bad object")]);
    assert!(!g.contains("bad object"));
}

// ============================================================================
// Local names
// ============================================================================

#[test]
fn test_local_name_is_memoized() {
    let g = graph();
    let first = g.get_local_name(OWL_THING).expect("owl:Thing present");
    let second = g.get_local_name(OWL_THING).expect("owl:Thing present");

    assert_eq!(first, "Thing");
    assert!(
        std::ptr::eq(first, second),
        "second call should return the memoized string, not a recomputed one"
    );
}

#[test]
fn test_local_name_of_unknown_node_is_not_found() {
    let g = graph();
    let err = g.get_local_name(&ex("missing")).expect_err("absent node");
    assert!(matches!(err, GraphError::NotFound(iri) if iri == ex("missing")));
}

// ============================================================================
// Field extension registry
// ============================================================================

#[test]
fn test_field_on_unknown_class_fails_and_leaves_graph_unchanged() {
    let mut g = graph();
    let before = (g.len(), g.triple_count());

    let err = g
        .add_field_on_object_type(&ex("Nope"), "extra", json!({ "type": "string" }))
        .expect_err("unknown class");
    assert!(matches!(err, GraphError::NotFound(_)));
    assert_eq!((g.len(), g.triple_count()), before);

    let err = g
        .extend_field_on_object_type(&ex("Nope"), &ex("p"), json!({ "deprecated": true }))
        .expect_err("unknown class");
    assert!(matches!(err, GraphError::NotFound(_)));
}

#[test]
fn test_field_name_must_form_an_iri() {
    let mut g = graph();
    for bad in ["", "has space", "a#b"] {
        let err = g
            .add_field_on_object_type(OWL_THING, bad, json!({}))
            .expect_err("invalid field name");
        assert!(matches!(err, GraphError::InvalidArgument(_)), "{bad:?}: {err}");
    }
}

#[test]
fn test_custom_field_end_to_end() {
    let mut g = graph();
    let class = OWL_THING;

    let field = g
        .add_field_on_object_type(class, "extra", json!({ "type": "string" }))
        .expect("class exists");
    assert!(field.starts_with("urn:custom-field:"));
    assert!(field.ends_with("#extra"));

    assert_eq!(g.objects(&field, RDFS_DOMAIN), &[Object::iri(class)]);
    assert!(g.subjects(class, RDFS_DOMAIN).contains(&field.as_str()));
    assert_eq!(
        g.node(&field).and_then(|n| n.field_config()),
        Some(&json!({ "type": "string" }))
    );

    g.extend_field_on_object_type(class, &field, json!({ "deprecated": true }))
        .expect("class exists");
    let extensions = g
        .node(class)
        .and_then(|n| n.extensions())
        .expect("extension map created");
    assert_eq!(extensions.get(&field), Some(&json!({ "deprecated": true })));

    let shape = g.get_object_type(class).expect("owl:Thing resolves");
    let extra = shape.field("extra").expect("custom field on the object type");
    assert_eq!(extra.type_expr, "String");
    assert!(extra.is_deprecated());
}

#[test]
fn test_registering_a_name_twice_mints_two_fields() {
    let mut g = graph();
    let a = g
        .add_field_on_object_type(OWL_THING, "extra", json!({}))
        .expect("class exists");
    let b = g
        .add_field_on_object_type(OWL_THING, "extra", json!({}))
        .expect("class exists");
    assert_ne!(a, b);
}

#[test]
fn test_ingested_triples_cannot_forge_custom_fields() {
    let mut g = graph();
    let forged = Triple::new("urn:custom-field:00000000#extra", RDFS_DOMAIN, Object::iri(OWL_THING));
    assert!(!g.add_triple(&forged));
    assert!(!g.contains("urn:custom-field:00000000#extra"));

    let forged_object = Triple::new(ex("s"), RDFS_DOMAIN, Object::iri("urn:custom-field:forged#x"));
    assert!(!g.add_triple(&forged_object), "object in reserved namespace should be dropped");
    assert!(!g.contains("urn:custom-field:forged#x"));
    assert!(!g.contains(&ex("s")), "no subject node for a dropped triple");

    let err = g
        .add_field_on_object_type("urn:custom-field:forged#x", "y", json!({}))
        .expect_err("forged node must not exist");
    assert!(matches!(err, GraphError::NotFound(_)));
}

#[test]
fn test_ingested_triples_may_point_at_minted_fields() {
    let mut g = graph();
    let field = g
        .add_field_on_object_type(OWL_THING, "extra", json!({}))
        .expect("class exists");

    let link = Triple::new(ex("doc"), ex("mentions"), Object::iri(field.as_str()));
    assert!(g.add_triple(&link));
    assert_eq!(g.subjects(&field, &ex("mentions")), vec![ex("doc").as_str()]);
}

// ============================================================================
// Seed isolation
// ============================================================================

/// Instances share seed nodes copy-on-write: a mutation made through one
/// instance is visible to neither the seed nor an instance built afterwards.
#[test]
fn test_seed_mutation_is_not_shared() {
    let mut first = graph();
    first
        .extend_field_on_object_type(OWL_THING, &ex("p"), json!({ "deprecated": true }))
        .expect("owl:Thing present");
    first.add_triple(&Triple::new(OWL_THING, RDF_TYPE, Object::iri(ex("Marker"))));

    let second = graph();
    let thing = second.node(OWL_THING).expect("owl:Thing present");
    assert!(thing.extensions().is_none(), "extension leaked into a new instance");
    assert!(!thing.has_iri(RDF_TYPE, &ex("Marker")), "triple leaked into a new instance");

    let seed = vocabulary::seed().expect("seed loads");
    let seed_thing = seed.node(OWL_THING).expect("owl:Thing in seed");
    assert!(seed_thing.extensions().is_none());
    assert!(!seed_thing.has_iri(RDF_TYPE, &ex("Marker")));

    assert!(first.node(OWL_THING).is_some_and(|n| n.has_iri(RDF_TYPE, &ex("Marker"))));
}

#[test]
fn test_new_instance_starts_from_the_seed() {
    let g = graph();
    let seed = vocabulary::seed().expect("seed loads");
    assert_eq!(g.len(), seed.node_count());
    assert_eq!(g.triple_count(), seed.triple_count());
}
