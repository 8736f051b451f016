//! Graph instances and the field extension registry.
//!
//! A [`SemanticGraph`] starts as a shallow copy of the seed vocabulary's node
//! map. Nodes stay shared with the seed until this instance writes to one, at
//! which point the node is cloned (copy-on-write); the seed and other
//! instances never observe the write. The only state written to a shared node
//! in place is its memoized local name, which is a pure function of the IRI.

use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::builder::{ShapeBuilder, TypeBuilder};
use crate::cache::{CacheStats, TypeCache};
use crate::error::{GraphError, Result};
use crate::index::index_triple;
use crate::iri::iris::RDFS_DOMAIN;
use crate::iri::{is_custom_field_iri, is_valid_iri, local_name, Prefixes, CUSTOM_FIELD_NAMESPACE};
use crate::model::{Node, NodeMap, Object, Triple};
use crate::parser::{decode, ParseOptions};
use crate::relay::{GlobalIdDecoder, RelayNode};
use crate::resolve::{ClassResolution, Hierarchy, TypeKind};
use crate::resolvers::{validate_resolvers, ResolverBundle, Resolvers};
use crate::vocabulary;

/// Graph configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Extra prefixes, merged over the built-in `rdf`/`rdfs`/`owl`/`xsd`.
    pub prefixes: IndexMap<String, String>,
    /// Enables relay identity wiring. Requires a [`GlobalIdDecoder`].
    pub relay: bool,
}

impl GraphConfig {
    /// Reads a configuration from a JSON value. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] if `value` is not a JSON object
    /// or a recognised key has the wrong type.
    pub fn from_json(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(GraphError::InvalidArgument(format!(
                "expected graph config to be an object, got {value}"
            )));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| GraphError::InvalidArgument(format!("graph config: {e}")))
    }
}

/// Counts returned by [`SemanticGraph::parse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Triples produced by the parser.
    pub decoded: usize,
    /// Triples that changed the index.
    pub indexed: usize,
}

/// Assembles a [`SemanticGraph`].
pub struct GraphBuilder<B = ShapeBuilder> {
    resolvers: ResolverBundle,
    config: GraphConfig,
    type_builder: B,
    global_ids: Option<Box<dyn GlobalIdDecoder>>,
}

impl GraphBuilder<ShapeBuilder> {
    /// Starts a builder with the default configuration and [`ShapeBuilder`].
    #[must_use]
    pub fn new(resolvers: ResolverBundle) -> Self {
        Self {
            resolvers,
            config: GraphConfig::default(),
            type_builder: ShapeBuilder,
            global_ids: None,
        }
    }
}

impl<B: TypeBuilder> GraphBuilder<B> {
    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the type builder.
    #[must_use]
    pub fn type_builder<B2: TypeBuilder>(self, type_builder: B2) -> GraphBuilder<B2> {
        GraphBuilder {
            resolvers: self.resolvers,
            config: self.config,
            type_builder,
            global_ids: self.global_ids,
        }
    }

    /// Supplies the global id decoder used when relay support is enabled.
    #[must_use]
    pub fn global_ids(mut self, decoder: impl GlobalIdDecoder + 'static) -> Self {
        self.global_ids = Some(Box::new(decoder));
        self
    }

    /// Validates the parts and builds the graph.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Configuration`] if the resolver bundle lacks a required
    ///   capability, or relay is enabled without a global id decoder.
    /// - [`GraphError::FatalStartup`] if the seed vocabulary failed to load.
    pub fn build(self) -> Result<SemanticGraph<B>> {
        let resolvers = validate_resolvers(self.resolvers)?;

        if self.config.relay && self.global_ids.is_none() {
            return Err(GraphError::Configuration(
                "relay is enabled but no global id decoder was supplied".into(),
            ));
        }

        let seed = vocabulary::seed()?;
        let prefixes = Prefixes::merged(&self.config.prefixes);

        Ok(SemanticGraph {
            nodes: seed.nodes().clone(),
            prefixes,
            config: self.config,
            resolvers,
            type_builder: self.type_builder,
            global_ids: self.global_ids,
            cache: TypeCache::default(),
        })
    }
}

/// An in-memory semantic graph seeded with the base vocabulary.
pub struct SemanticGraph<B: TypeBuilder = ShapeBuilder> {
    nodes: NodeMap,
    prefixes: Prefixes,
    config: GraphConfig,
    resolvers: Resolvers,
    type_builder: B,
    global_ids: Option<Box<dyn GlobalIdDecoder>>,
    cache: TypeCache<B::Descriptor>,
}

impl SemanticGraph<ShapeBuilder> {
    /// Builds a graph with the default [`ShapeBuilder`].
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::build`].
    pub fn new(resolvers: ResolverBundle, config: GraphConfig) -> Result<Self> {
        GraphBuilder::new(resolvers).config(config).build()
    }

    /// Builds a graph from a JSON configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] if `config` is not an object,
    /// otherwise see [`GraphBuilder::build`].
    pub fn from_json_config(resolvers: ResolverBundle, config: &Value) -> Result<Self> {
        Self::new(resolvers, GraphConfig::from_json(config)?)
    }

    /// Starts a [`GraphBuilder`].
    #[must_use]
    pub fn builder(resolvers: ResolverBundle) -> GraphBuilder<ShapeBuilder> {
        GraphBuilder::new(resolvers)
    }
}

impl<B: TypeBuilder> SemanticGraph<B> {
    // Ingestion

    /// Indexes one triple. Returns `true` if the index changed.
    ///
    /// Triples with an invalid subject or predicate and duplicates are
    /// dropped. So are triples that touch the reserved custom-field namespace:
    /// any subject there, and any IRI object there that the field registry
    /// did not mint.
    pub fn add_triple(&mut self, triple: &Triple) -> bool {
        let changed = self.ingest(triple);
        if changed {
            self.invalidate();
        }
        changed
    }

    fn ingest(&mut self, triple: &Triple) -> bool {
        if is_custom_field_iri(&triple.subject) {
            debug!(subject = %triple.subject, "dropping triple in reserved custom-field namespace");
            return false;
        }
        if let Some(object) = triple.object.as_iri() {
            if is_custom_field_iri(object) && !self.is_minted_field(object) {
                debug!(%object, "dropping triple pointing into reserved custom-field namespace");
                return false;
            }
        }
        index_triple(&mut self.nodes, triple)
    }

    /// Only the field registry creates nodes carrying a field config.
    fn is_minted_field(&self, iri: &str) -> bool {
        self.node(iri).is_some_and(|n| n.field_config().is_some())
    }

    /// Decodes `data` and indexes every triple in parser order.
    ///
    /// There is no rollback: on a syntax error the triples decoded before it
    /// stay indexed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Syntax`] when the parser rejects the input and
    /// [`GraphError::InvalidArgument`] for an invalid base IRI.
    pub fn parse(&mut self, data: &str, options: &ParseOptions) -> Result<IngestReport> {
        let mut indexed = 0usize;
        let outcome = decode(data, options, |t| {
            if self.ingest(&t) {
                indexed += 1;
            }
        });

        if indexed > 0 {
            self.invalidate();
        }

        match outcome {
            Ok(decoded) => {
                debug!(decoded, indexed, "parsed document");
                Ok(IngestReport { decoded, indexed })
            }
            Err(e) => {
                warn!(indexed, error = %e, "parse stopped early; earlier triples remain indexed");
                Err(e)
            }
        }
    }

    /// Reads a file and [`parse`](Self::parse)s it.
    ///
    /// Only UTF-8 input is supported; there is no encoding parameter. A file
    /// that is not valid UTF-8 fails like an unreadable one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the file cannot be read (including
    /// invalid UTF-8), otherwise as [`parse`](Self::parse).
    pub fn parse_file(&mut self, path: impl AsRef<Path>, options: &ParseOptions) -> Result<IngestReport> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&data, options)
    }

    fn invalidate(&self) {
        if !self.cache.is_empty() {
            debug!("index changed; clearing type cache");
            self.cache.clear();
        }
    }

    // Reads

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, iri: &str) -> Option<&Node> {
        self.nodes.get(iri).map(|node| &**node)
    }

    /// Returns `true` if `iri` is a node.
    #[must_use]
    pub fn contains(&self, iri: &str) -> bool {
        self.nodes.contains_key(iri)
    }

    /// Forward values of `(subject, predicate)`, in ingestion order.
    #[must_use]
    pub fn objects(&self, subject: &str, predicate: &str) -> &[Object] {
        self.node(subject)
            .map(|n| n.objects(predicate))
            .unwrap_or_default()
    }

    /// Subjects with a `predicate` edge to `object`, in ingestion order.
    #[must_use]
    pub fn subjects(&self, object: &str, predicate: &str) -> Vec<&str> {
        self.node(object)
            .map(|n| n.subjects(predicate).collect())
            .unwrap_or_default()
    }

    /// Iterates over `(iri, node)` pairs.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(iri, node)| (iri.as_str(), &**node))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of forward triples.
    #[must_use]
    pub fn triple_count(&self) -> usize {
        self.nodes.values().map(|n| n.forward_len()).sum()
    }

    /// The configuration the graph was built with.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// The merged prefix table.
    #[must_use]
    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// The validated resolver bundle.
    #[must_use]
    pub fn resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    /// Type cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Relay entry points, when relay support is enabled.
    #[must_use]
    pub fn relay(&self) -> Option<RelayNode<'_, B>> {
        match (&self.global_ids, self.config.relay) {
            (Some(decoder), true) => Some(RelayNode::new(self, &**decoder)),
            _ => None,
        }
    }

    // Derivations

    /// Short display name of a node, memoized on the node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `iri` is not a node.
    pub fn get_local_name(&self, iri: &str) -> Result<&str> {
        let node = self
            .nodes
            .get(iri)
            .ok_or_else(|| GraphError::NotFound(iri.to_owned()))?;
        Ok(node.local_name_or_init(|| local_name(iri)))
    }

    /// Hierarchy view over this graph.
    #[must_use]
    pub fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy::new(&self.nodes, &self.prefixes)
    }

    /// Resolves (and caches) the class at `iri`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `iri` is not a node.
    pub fn resolve_class(&self, iri: &str) -> Result<Rc<ClassResolution>> {
        self.cache
            .class_or_try_insert(iri, || self.hierarchy().resolve_class(iri))
    }

    fn resolve_type(&self, kind: TypeKind, iri: &str) -> Result<B::Descriptor> {
        self.cache.descriptor_or_try_insert(kind, iri, || {
            let class = self.resolve_class(iri)?;
            let plan = self.hierarchy().plan(kind, class, self.config.relay);
            Ok(self.type_builder.build(&plan))
        })
    }

    /// Object type of the class at `iri`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `iri` is not a node.
    pub fn get_object_type(&self, iri: &str) -> Result<B::Descriptor> {
        self.resolve_type(TypeKind::Object, iri)
    }

    /// Interface type of the class at `iri`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `iri` is not a node.
    pub fn get_interface_type(&self, iri: &str) -> Result<B::Descriptor> {
        self.resolve_type(TypeKind::Interface, iri)
    }

    /// Pagination edge type of the class at `iri`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `iri` is not a node.
    pub fn get_edge_type(&self, iri: &str) -> Result<B::Descriptor> {
        self.resolve_type(TypeKind::Edge, iri)
    }

    /// Pagination connection type of the class at `iri`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `iri` is not a node.
    pub fn get_connection_type(&self, iri: &str) -> Result<B::Descriptor> {
        self.resolve_type(TypeKind::Connection, iri)
    }

    // Field extension registry

    /// Attaches a synthetic field to the class at `class_iri` and returns the
    /// minted field IRI.
    ///
    /// Every call mints a fresh `urn:custom-field:<uuid>#<field_name>` node, so
    /// registering the same name twice yields two distinct fields.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NotFound`] if `class_iri` is not a node; the graph is
    ///   left unchanged.
    /// - [`GraphError::InvalidArgument`] if `field_name` does not form a valid
    ///   IRI fragment.
    pub fn add_field_on_object_type(
        &mut self,
        class_iri: &str,
        field_name: &str,
        field_config: Value,
    ) -> Result<String> {
        if !self.contains(class_iri) {
            return Err(GraphError::NotFound(class_iri.to_owned()));
        }

        let iri = format!("{CUSTOM_FIELD_NAMESPACE}{}#{field_name}", Uuid::new_v4());
        if field_name.is_empty() || !is_valid_iri(&iri) {
            return Err(GraphError::InvalidArgument(format!(
                "field name {field_name:?} does not form a valid IRI"
            )));
        }

        let node = self.nodes.entry(iri.clone()).or_default();
        Arc::make_mut(node).set_field_config(field_config);
        index_triple(
            &mut self.nodes,
            &Triple::new(iri.as_str(), RDFS_DOMAIN, Object::iri(class_iri)),
        );
        self.invalidate();

        debug!(class = %class_iri, field = %iri, "registered custom field");
        Ok(iri)
    }

    /// Registers (or replaces) the field extension for `property_iri` on the
    /// class at `class_iri`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `class_iri` is not a node.
    pub fn extend_field_on_object_type(
        &mut self,
        class_iri: &str,
        property_iri: &str,
        extension: Value,
    ) -> Result<()> {
        let node = self
            .nodes
            .get_mut(class_iri)
            .ok_or_else(|| GraphError::NotFound(class_iri.to_owned()))?;
        Arc::make_mut(node)
            .extensions_mut()
            .insert(property_iri.to_owned(), extension);
        self.invalidate();
        Ok(())
    }
}

impl<B: TypeBuilder> fmt::Display for SemanticGraph<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[SemanticGraph]")
    }
}

impl<B: TypeBuilder> fmt::Debug for SemanticGraph<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticGraph")
            .field("nodes", &self.nodes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
