//! In-memory semantic graph with ontology-driven type resolution.
//!
//! The `semantic-graph` crate keeps subject–predicate–object triples in a
//! bidirectional index seeded with the RDF, RDFS and OWL vocabularies, and
//! maps class nodes to output type descriptors (object, interface, edge and
//! connection shapes) through a pluggable resolver layer.
//!
//! # Entry Point
//!
//! ```
//! use semantic_graph::{GraphConfig, ResolverBundle, SemanticGraph};
//!
//! # fn main() -> semantic_graph::Result<()> {
//! let resolvers = ResolverBundle::new()
//!     .resolve_resource(|_id, _ctx, _info| None)
//!     .resolve_source_class_iri(|_value| None);
//! let graph = SemanticGraph::new(resolvers, GraphConfig::default())?;
//! assert_eq!(graph.get_local_name("http://www.w3.org/2002/07/owl#Thing")?, "Thing");
//! # Ok(())
//! # }
//! ```
//!
//! # Ingestion
//!
//! ```
//! use semantic_graph::{GraphConfig, ParseOptions, ResolverBundle, SemanticGraph};
//!
//! # fn main() -> semantic_graph::Result<()> {
//! # let resolvers = ResolverBundle::new()
//! #     .resolve_resource(|_, _, _| None)
//! #     .resolve_source_class_iri(|_| None);
//! let mut graph = SemanticGraph::new(resolvers, GraphConfig::default())?;
//! let report = graph.parse(
//!     "<http://example.org/Person> a <http://www.w3.org/2002/07/owl#Class> .",
//!     &ParseOptions::default(),
//! )?;
//! assert_eq!(report.indexed, 1);
//! let person = graph.get_object_type("http://example.org/Person")?;
//! assert_eq!(person.name, "Person");
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod builder;
pub mod cache;
pub mod error;
pub mod graph;
pub mod index;
pub mod iri;
pub mod model;
pub mod parser;
pub mod relay;
pub mod resolve;
pub mod resolvers;
pub mod serializer;
pub mod vocabulary;

pub use builder::{FieldShape, ShapeBuilder, TypeBuilder, TypeShape};
pub use cache::CacheStats;
pub use error::{GraphError, Result};
pub use graph::{GraphBuilder, GraphConfig, IngestReport, SemanticGraph};
pub use iri::{is_valid_iri, Prefixes};
pub use model::{Direction, Node, Object, Triple};
pub use parser::{ParseOptions, RdfFormat};
pub use relay::{GlobalId, GlobalIdDecoder, RelayNode};
pub use resolve::{ClassResolution, FieldKind, FieldResolution, ScalarKind, TypeKind, TypePlan};
pub use resolvers::{validate_resolvers, ResolverBundle, Resolvers};
