//! Class-hierarchy resolution.
//!
//! Given a class node, [`Hierarchy`] works out which ontology nodes shape its
//! output types: its ancestors and descendants over `rdfs:subClassOf`, the
//! properties whose `rdfs:domain` is the class or one of its ancestors, and the
//! field extensions registered along the way. The result is a
//! [`ClassResolution`] from which [`TypePlan`]s are cut for each output kind.
//! Building the actual descriptors is left to a
//! [`TypeBuilder`](crate::builder::TypeBuilder).

use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::iri::iris::*;
use crate::iri::{local_name, to_pascal_case, Prefixes};
use crate::model::{Node, NodeMap};

/// The four output type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    /// Concrete object type.
    Object,
    /// Abstract interface type.
    Interface,
    /// Pagination edge wrapping an object.
    Edge,
    /// Pagination connection over edges.
    Connection,
}

impl TypeKind {
    /// Suffix appended to the class type name.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            TypeKind::Object => "",
            TypeKind::Interface => "Interface",
            TypeKind::Edge => "Edge",
            TypeKind::Connection => "Connection",
        }
    }
}

/// Scalar output types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarKind {
    /// Text.
    String,
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Boolean.
    Boolean,
}

impl ScalarKind {
    /// Maps an XSD datatype IRI to a scalar. Unknown datatypes are strings.
    #[must_use]
    pub fn from_datatype(iri: &str) -> Self {
        match iri {
            XSD_BOOLEAN => ScalarKind::Boolean,
            XSD_INTEGER | XSD_INT | XSD_LONG | XSD_NON_NEGATIVE_INTEGER | XSD_POSITIVE_INTEGER => {
                ScalarKind::Int
            }
            XSD_DECIMAL | XSD_FLOAT | XSD_DOUBLE => ScalarKind::Float,
            _ => ScalarKind::String,
        }
    }

    /// Output type name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Boolean => "Boolean",
        }
    }
}

/// What a field points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldKind {
    /// A scalar value.
    Scalar {
        /// The scalar type.
        scalar: ScalarKind,
    },
    /// A reference to another class.
    Object {
        /// The range class IRI.
        class_iri: String,
        /// The range class type name.
        type_name: String,
    },
    /// A synthetic field whose shape is the caller's configuration.
    Custom,
}

/// One field of a resolved class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResolution {
    /// Property (or synthetic field) IRI.
    pub iri: String,
    /// Field name: the local name of `iri`.
    pub name: String,
    /// `rdfs:comment` of the property.
    pub description: Option<String>,
    /// Class whose `rdfs:domain` introduced the field.
    pub declared_on: String,
    /// `rdfs:range` values.
    pub ranges: Vec<String>,
    /// Target of the field.
    pub kind: FieldKind,
    /// `true` unless the property is an `owl:FunctionalProperty` or synthetic.
    pub list: bool,
    /// Caller configuration of a synthetic field.
    pub config: Option<Value>,
    /// Nearest extension registered for this field on the class or an ancestor.
    pub extension: Option<Value>,
}

/// Everything the core derives about a class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassResolution {
    /// Class IRI.
    pub iri: String,
    /// Local name of the IRI.
    pub local_name: String,
    /// Base output type name (prefix + PascalCase local name).
    pub type_name: String,
    /// `rdfs:comment` of the class.
    pub description: Option<String>,
    /// Transitive superclasses, nearest first.
    pub ancestors: Vec<String>,
    /// Transitive subclasses, nearest first.
    pub descendants: Vec<String>,
    /// Fields, own domain first, then each ancestor's.
    pub fields: Vec<FieldResolution>,
}

/// A named reference to another output type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    /// Class IRI.
    pub iri: String,
    /// Output type name.
    pub name: String,
}

/// Input handed to a type builder for one output type.
#[derive(Debug, Clone)]
pub struct TypePlan {
    /// Output kind.
    pub kind: TypeKind,
    /// Output type name.
    pub name: String,
    /// The resolved class.
    pub class: Rc<ClassResolution>,
    /// Interfaces an object type implements (the class and its ancestors).
    pub interfaces: Vec<TypeRef>,
    /// Object types implementing an interface (the class and its descendants).
    pub implementors: Vec<TypeRef>,
    /// Whether the relay node interface applies.
    pub node_interface: bool,
    /// For edges, the object type wrapped; for connections, the edge type.
    pub item: Option<TypeRef>,
}

/// Read-only view of a node map for hierarchy queries.
#[derive(Debug, Clone, Copy)]
pub struct Hierarchy<'g> {
    nodes: &'g NodeMap,
    prefixes: &'g Prefixes,
}

impl<'g> Hierarchy<'g> {
    /// Wraps a node map and its prefix table.
    #[must_use]
    pub fn new(nodes: &'g NodeMap, prefixes: &'g Prefixes) -> Self {
        Self { nodes, prefixes }
    }

    fn node(&self, iri: &str) -> Option<&'g Node> {
        self.nodes.get(iri).map(|node| &**node)
    }

    /// Local name, memoized on the node when there is one.
    #[must_use]
    pub fn local_name(&self, iri: &str) -> String {
        match self.node(iri) {
            Some(node) => node.local_name_or_init(|| local_name(iri)).to_owned(),
            None => local_name(iri),
        }
    }

    /// Output type name: the PascalCase prefix of the best-matching namespace
    /// (if any) followed by the PascalCase local name.
    #[must_use]
    pub fn type_name(&self, iri: &str) -> String {
        let base = to_pascal_case(&self.local_name(iri));
        match self.prefixes.prefix_of(iri) {
            Some((prefix, _)) => format!("{}{base}", to_pascal_case(prefix)),
            None => base,
        }
    }

    /// Returns `true` if the node is typed as, or behaves like, a class.
    #[must_use]
    pub fn is_class(&self, iri: &str) -> bool {
        self.node(iri).is_some_and(|node| {
            node.has_iri(RDF_TYPE, OWL_CLASS)
                || node.has_iri(RDF_TYPE, RDFS_CLASS)
                || !node.objects(RDFS_SUBCLASS_OF).is_empty()
                || node.subjects(RDFS_SUBCLASS_OF).next().is_some()
        })
    }

    /// Returns `true` for XSD datatypes, `rdfs:Literal` and declared datatypes.
    #[must_use]
    pub fn is_datatype(&self, iri: &str) -> bool {
        iri.starts_with(XSD)
            || iri == RDFS_LITERAL
            || self
                .ancestors(iri)
                .iter()
                .any(|a| a == RDFS_LITERAL)
            || self
                .node(iri)
                .is_some_and(|node| node.has_iri(RDF_TYPE, RDFS_DATATYPE))
    }

    /// Transitive superclasses of `iri`, nearest first. Cycles are cut.
    #[must_use]
    pub fn ancestors(&self, iri: &str) -> Vec<String> {
        self.walk(iri, |node| node.object_iris(RDFS_SUBCLASS_OF).collect())
    }

    /// Transitive subclasses of `iri`, nearest first. Cycles are cut.
    #[must_use]
    pub fn descendants(&self, iri: &str) -> Vec<String> {
        self.walk(iri, |node| node.subjects(RDFS_SUBCLASS_OF).collect())
    }

    fn walk(&self, start: &str, next: impl Fn(&'g Node) -> Vec<&'g str>) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([start]);
        let mut queue: VecDeque<&str> = VecDeque::from([start]);
        let mut out = Vec::new();

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.node(current) else {
                continue;
            };
            for neighbour in next(node) {
                if seen.insert(neighbour) {
                    out.push(neighbour.to_owned());
                    queue.push_back(neighbour);
                }
            }
        }
        out
    }

    /// Resolves the class at `iri`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `iri` is not a node.
    pub fn resolve_class(&self, iri: &str) -> Result<ClassResolution> {
        let node = self
            .node(iri)
            .ok_or_else(|| GraphError::NotFound(iri.to_owned()))?;

        let ancestors = self.ancestors(iri);
        let lineage: Vec<&str> = std::iter::once(iri)
            .chain(ancestors.iter().map(String::as_str))
            .collect();

        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for class in &lineage {
            let Some(class_node) = self.node(class) else {
                continue;
            };
            for property in class_node.subjects(RDFS_DOMAIN) {
                if seen.insert(property) {
                    fields.push(self.resolve_field(property, class, &lineage));
                }
            }
        }

        Ok(ClassResolution {
            iri: iri.to_owned(),
            local_name: self.local_name(iri),
            type_name: self.type_name(iri),
            description: node.literal(RDFS_COMMENT).map(str::to_owned),
            descendants: self.descendants(iri),
            ancestors,
            fields,
        })
    }

    fn resolve_field(&self, property: &str, declared_on: &str, lineage: &[&str]) -> FieldResolution {
        let node = self.node(property);
        let ranges: Vec<String> = node
            .map(|n| n.object_iris(RDFS_RANGE).map(str::to_owned).collect())
            .unwrap_or_default();
        let config = node.and_then(Node::field_config).cloned();

        let kind = if config.is_some() {
            FieldKind::Custom
        } else if let Some(class_iri) = ranges
            .iter()
            .find(|r| !self.is_datatype(r) && self.is_class(r))
        {
            FieldKind::Object {
                class_iri: class_iri.clone(),
                type_name: self.type_name(class_iri),
            }
        } else {
            FieldKind::Scalar {
                scalar: ranges
                    .first()
                    .map_or(ScalarKind::String, |r| ScalarKind::from_datatype(r)),
            }
        };

        let functional = node.is_some_and(|n| n.has_iri(RDF_TYPE, OWL_FUNCTIONAL_PROPERTY));

        let extension = lineage.iter().find_map(|class| {
            self.node(class)
                .and_then(Node::extensions)
                .and_then(|ext| ext.get(property))
                .cloned()
        });

        FieldResolution {
            iri: property.to_owned(),
            name: self.local_name(property),
            description: node.and_then(|n| n.literal(RDFS_COMMENT)).map(str::to_owned),
            declared_on: declared_on.to_owned(),
            ranges,
            list: config.is_none() && !functional,
            kind,
            config,
            extension,
        }
    }

    /// Cuts the plan for one output kind out of a class resolution.
    #[must_use]
    pub fn plan(&self, kind: TypeKind, class: Rc<ClassResolution>, relay: bool) -> TypePlan {
        let type_ref = |iri: &str, kind: TypeKind| TypeRef {
            iri: iri.to_owned(),
            name: format!("{}{}", self.type_name(iri), kind.suffix()),
        };
        let lineage = std::iter::once(class.iri.as_str()).chain(class.ancestors.iter().map(String::as_str));
        let family = std::iter::once(class.iri.as_str()).chain(class.descendants.iter().map(String::as_str));

        let (interfaces, implementors, item) = match kind {
            TypeKind::Object => (
                lineage.map(|iri| type_ref(iri, TypeKind::Interface)).collect(),
                Vec::new(),
                None,
            ),
            TypeKind::Interface => (
                Vec::new(),
                family.map(|iri| type_ref(iri, TypeKind::Object)).collect(),
                None,
            ),
            TypeKind::Edge => (Vec::new(), Vec::new(), Some(type_ref(&class.iri, TypeKind::Object))),
            TypeKind::Connection => (Vec::new(), Vec::new(), Some(type_ref(&class.iri, TypeKind::Edge))),
        };

        TypePlan {
            kind,
            name: format!("{}{}", class.type_name, kind.suffix()),
            node_interface: relay && kind == TypeKind::Object,
            class,
            interfaces,
            implementors,
            item,
        }
    }
}
