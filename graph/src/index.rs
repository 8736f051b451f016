//! The triple index: `upsert` and `index_triple`.
//!
//! `upsert` is the only mutation primitive and never deduplicates.
//! `index_triple` is the guarded entry point: it drops triples whose subject
//! or predicate is not a valid IRI, skips triples already present in the
//! forward index, and mirrors IRI objects into the inverse index. As long as
//! every mutation goes through `index_triple`, each forward entry with an IRI
//! object has exactly one matching inverse entry.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::iri::is_valid_iri;
use crate::model::{Direction, NodeMap, Object, Triple};

/// Appends `value` under `predicate` on the given side of `subject`, creating
/// the node and the value sequence as needed.
///
/// A node shared with another map (e.g. the seed) is cloned before it is
/// modified, so the other map never observes the write.
pub fn upsert(
    nodes: &mut NodeMap,
    subject: &str,
    direction: Direction,
    predicate: &str,
    value: Object,
) {
    let node = nodes.entry(subject.to_owned()).or_default();
    Arc::make_mut(node)
        .edges_mut(direction)
        .entry(predicate.to_owned())
        .or_default()
        .push(value);
}

/// Returns `true` if `(subject, predicate, object)` is already in the forward index.
#[must_use]
pub fn contains_triple(nodes: &NodeMap, subject: &str, predicate: &str, object: &Object) -> bool {
    nodes
        .get(subject)
        .is_some_and(|node| node.objects(predicate).contains(object))
}

/// Indexes one triple. Returns `true` if the index changed.
///
/// Invalid subjects or predicates and duplicate triples are silent no-ops.
pub fn index_triple(nodes: &mut NodeMap, triple: &Triple) -> bool {
    let Triple {
        subject,
        predicate,
        object,
    } = triple;

    if !(is_valid_iri(subject) && is_valid_iri(predicate)) {
        debug!(%subject, %predicate, "skipping triple with invalid subject or predicate");
        return false;
    }
    if contains_triple(nodes, subject, predicate, object) {
        return false;
    }

    upsert(nodes, subject, Direction::Forward, predicate, object.clone());

    if let Some(target) = object.as_valid_iri() {
        upsert(
            nodes,
            target,
            Direction::Inverse,
            predicate,
            Object::iri(subject.as_str()),
        );
    }

    trace!(%subject, %predicate, %object, "indexed triple");
    true
}
