//! Base vocabulary: the process-wide seed graph.
//!
//! The RDF, RDFS and OWL vocabularies are embedded at compile time and parsed
//! on first use. Every triple goes through [`index_triple`], so the seed obeys
//! the same forward/inverse invariants as any instance. The seed is never
//! mutated after loading: instances copy its node map shallowly and clone a
//! node before writing to it.

use std::sync::OnceLock;

use tracing::info;

use crate::error::{GraphError, Result};
use crate::index::index_triple;
use crate::model::{Node, NodeMap};
use crate::parser::{decode, ParseOptions};

/// The seed documents, in load order: `(name, turtle source)`.
pub const BASE_DOCUMENTS: &[(&str, &str)] = &[
    ("rdf.ttl", include_str!("../ontologies/rdf.ttl")),
    ("rdfs.ttl", include_str!("../ontologies/rdfs.ttl")),
    ("owl.ttl", include_str!("../ontologies/owl.ttl")),
];

/// The loaded, immutable base vocabulary.
#[derive(Debug)]
pub struct SeedGraph {
    nodes: NodeMap,
    triple_count: usize,
}

impl SeedGraph {
    /// The seed's node map. Cloning it yields a shallow copy.
    #[must_use]
    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    /// Looks up a seed node.
    #[must_use]
    pub fn node(&self, iri: &str) -> Option<&Node> {
        self.nodes.get(iri).map(|node| &**node)
    }

    /// Number of nodes (subjects and IRI objects).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct triples indexed.
    #[must_use]
    pub fn triple_count(&self) -> usize {
        self.triple_count
    }
}

static SEED: OnceLock<std::result::Result<SeedGraph, String>> = OnceLock::new();

/// Returns the process-wide seed, loading it on first call.
///
/// # Errors
///
/// Returns [`GraphError::FatalStartup`] if the embedded vocabulary failed to
/// parse. The failure is sticky: every later call reports it again.
pub fn seed() -> Result<&'static SeedGraph> {
    SEED.get_or_init(|| load(BASE_DOCUMENTS).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|msg| GraphError::FatalStartup(msg.clone()))
}

/// Parses `documents` in order into a fresh seed graph.
///
/// # Errors
///
/// Returns [`GraphError::FatalStartup`] naming the first document that fails
/// to parse.
pub fn load(documents: &[(&str, &str)]) -> Result<SeedGraph> {
    let mut nodes = NodeMap::new();
    let mut triple_count = 0usize;

    for (name, source) in documents {
        decode(source, &ParseOptions::default(), |t| {
            if index_triple(&mut nodes, &t) {
                triple_count += 1;
            }
        })
        .map_err(|e| GraphError::FatalStartup(format!("{name}: {e}")))?;
    }

    info!(
        documents = documents.len(),
        nodes = nodes.len(),
        triples = triple_count,
        "loaded base vocabulary"
    );

    Ok(SeedGraph {
        nodes,
        triple_count,
    })
}
