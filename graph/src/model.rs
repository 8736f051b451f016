//! Core data model: object terms, triples and indexed nodes.
//!
//! A [`Node`] holds the outgoing (forward) edges of a subject and the
//! incoming (inverse) edges pointing at it. Both are keyed by predicate IRI
//! and keep values in ingestion order. A [`NodeMap`] maps node IRIs to shared
//! `Arc<Node>` values; cloning the map is a shallow copy.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::iri::is_valid_iri;

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Object {
    /// An IRI reference. Only valid IRIs receive an inverse entry.
    Iri {
        /// The referenced IRI.
        value: String,
    },
    /// A blank node label (without the `_:` prefix).
    BlankNode {
        /// The blank node identifier.
        id: String,
    },
    /// A literal value.
    Literal {
        /// The lexical form.
        lexical: String,
        /// The datatype IRI, if typed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        /// The language tag, if language-tagged.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl Object {
    /// An IRI object.
    pub fn iri(value: impl Into<String>) -> Self {
        Object::Iri {
            value: value.into(),
        }
    }

    /// A plain (untyped, untagged) literal.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Object::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// A typed literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Object::Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Returns the IRI if this object is one (valid or not).
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Object::Iri { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the IRI if this object is a syntactically valid IRI.
    #[must_use]
    pub fn as_valid_iri(&self) -> Option<&str> {
        self.as_iri().filter(|iri| is_valid_iri(iri))
    }

    /// Returns the lexical form if this object is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Object::Literal { lexical, .. } => Some(lexical),
            _ => None,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Iri { value } => write!(f, "<{value}>"),
            Object::BlankNode { id } => write!(f, "_:{id}"),
            Object::Literal {
                lexical,
                datatype,
                language,
            } => {
                write!(f, "{lexical:?}")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A decoded (subject, predicate, object) fact, as emitted by any upstream
/// parser. Subject and predicate are plain strings: they are validated at
/// indexing time, not at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject IRI (blank nodes are rendered `_:id`).
    pub subject: String,
    /// Predicate IRI.
    pub predicate: String,
    /// Object term.
    pub object: Object,
}

impl Triple {
    /// Builds a triple.
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Object) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// Which side of a node an edge is stored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `subject --predicate--> value`, stored on the subject.
    Forward,
    /// `value --predicate--> node`, stored on the object.
    Inverse,
}

/// An indexed graph node.
#[derive(Debug, Clone, Default)]
pub struct Node {
    outgoing: IndexMap<String, Vec<Object>>,
    incoming: IndexMap<String, Vec<Object>>,
    local_name: OnceLock<String>,
    field_config: Option<Value>,
    extensions: Option<IndexMap<String, Value>>,
}

impl Node {
    pub(crate) fn edges_mut(&mut self, direction: Direction) -> &mut IndexMap<String, Vec<Object>> {
        match direction {
            Direction::Forward => &mut self.outgoing,
            Direction::Inverse => &mut self.incoming,
        }
    }

    /// Values stored under `predicate` on the given side, in ingestion order.
    #[must_use]
    pub fn values(&self, direction: Direction, predicate: &str) -> &[Object] {
        let edges = match direction {
            Direction::Forward => &self.outgoing,
            Direction::Inverse => &self.incoming,
        };
        edges.get(predicate).map(Vec::as_slice).unwrap_or_default()
    }

    /// Forward values of `predicate`.
    #[must_use]
    pub fn objects(&self, predicate: &str) -> &[Object] {
        self.values(Direction::Forward, predicate)
    }

    /// Subjects pointing at this node via `predicate`.
    pub fn subjects<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.values(Direction::Inverse, predicate)
            .iter()
            .filter_map(Object::as_iri)
    }

    /// Forward IRI values of `predicate`, skipping literals and blank nodes.
    pub fn object_iris<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.objects(predicate).iter().filter_map(Object::as_iri)
    }

    /// First literal value of `predicate`, if any.
    #[must_use]
    pub fn literal(&self, predicate: &str) -> Option<&str> {
        self.objects(predicate).iter().find_map(Object::as_literal)
    }

    /// Returns `true` if `rdf:type`-like `predicate` has `value` as an IRI object.
    #[must_use]
    pub fn has_iri(&self, predicate: &str, value: &str) -> bool {
        self.object_iris(predicate).any(|iri| iri == value)
    }

    /// Predicates of the forward index, in first-seen order.
    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.outgoing.keys().map(String::as_str)
    }

    /// Predicates of the inverse index, in first-seen order.
    pub fn inverse_predicates(&self) -> impl Iterator<Item = &str> {
        self.incoming.keys().map(String::as_str)
    }

    /// Number of forward values across all predicates.
    #[must_use]
    pub fn forward_len(&self) -> usize {
        self.outgoing.values().map(Vec::len).sum()
    }

    /// Memoized local name: `derive` runs only on the first call.
    pub(crate) fn local_name_or_init(&self, derive: impl FnOnce() -> String) -> &str {
        self.local_name.get_or_init(derive)
    }

    /// The caller-supplied configuration of a synthetic field node.
    #[must_use]
    pub fn field_config(&self) -> Option<&Value> {
        self.field_config.as_ref()
    }

    pub(crate) fn set_field_config(&mut self, config: Value) {
        self.field_config = Some(config);
    }

    /// Field extensions registered on this class, keyed by property IRI.
    #[must_use]
    pub fn extensions(&self) -> Option<&IndexMap<String, Value>> {
        self.extensions.as_ref()
    }

    pub(crate) fn extensions_mut(&mut self) -> &mut IndexMap<String, Value> {
        self.extensions.get_or_insert_with(IndexMap::new)
    }
}

/// Top-level mapping from node IRI to node. Nodes are shared between maps
/// until one of them mutates a node (copy-on-write).
pub type NodeMap = IndexMap<String, Arc<Node>>;
