//! Optional identity wiring for relay-style pagination.
//!
//! Decoding opaque global ids belongs to an external collaborator
//! ([`GlobalIdDecoder`]). When relay support is enabled the graph uses it to
//! route node lookups to the resolver bundle, and routes type resolution of
//! runtime values through `resolveSourceClassIri` and the object-type cache.

use serde_json::Value;

use crate::builder::TypeBuilder;
use crate::error::Result;
use crate::graph::SemanticGraph;

/// A decoded global id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalId {
    /// Type name encoded in the id.
    pub type_name: String,
    /// Application-level id.
    pub id: String,
}

/// Decodes opaque global ids. Implemented for any matching closure.
pub trait GlobalIdDecoder {
    /// Decodes `global_id`, or returns `None` if it is malformed.
    fn from_global_id(&self, global_id: &str) -> Option<GlobalId>;
}

impl<F> GlobalIdDecoder for F
where
    F: Fn(&str) -> Option<GlobalId>,
{
    fn from_global_id(&self, global_id: &str) -> Option<GlobalId> {
        self(global_id)
    }
}

/// Relay entry points of a graph with relay support enabled.
pub struct RelayNode<'g, B: TypeBuilder> {
    graph: &'g SemanticGraph<B>,
    decoder: &'g dyn GlobalIdDecoder,
}

impl<'g, B: TypeBuilder> RelayNode<'g, B> {
    pub(crate) fn new(graph: &'g SemanticGraph<B>, decoder: &'g dyn GlobalIdDecoder) -> Self {
        Self { graph, decoder }
    }

    /// Resolves a node by global id through the resolver bundle. A malformed
    /// id resolves to `None`.
    #[must_use]
    pub fn resolve_node(&self, global_id: &str, context: &Value, info: &Value) -> Option<Value> {
        let decoded = self.decoder.from_global_id(global_id)?;
        self.graph
            .resolvers()
            .resolve_resource(&decoded.id, context, info)
    }

    /// Resolves the object type of a runtime value. Returns `Ok(None)` when the
    /// resolver cannot classify the value.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`](crate::GraphError::NotFound) if the
    /// class IRI the resolver returns is not a node in the graph.
    pub fn resolve_type(&self, value: &Value) -> Result<Option<B::Descriptor>> {
        match self.graph.resolvers().resolve_source_class_iri(value) {
            Some(iri) => self.graph.get_object_type(&iri).map(Some),
            None => Ok(None),
        }
    }
}
