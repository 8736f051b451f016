//! Type builders turn [`TypePlan`]s into output-type descriptors.
//!
//! The graph decides *which* ontology nodes shape a type; a [`TypeBuilder`]
//! decides what the descriptor looks like. [`ShapeBuilder`] is the built-in
//! builder: it produces plain, serialisable [`TypeShape`] values.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::resolve::{FieldKind, FieldResolution, TypeKind, TypePlan};

/// Builds output-type descriptors from resolved plans.
pub trait TypeBuilder {
    /// The descriptor produced. Cached per `(kind, class IRI)`.
    type Descriptor: Clone;

    /// Builds an object type.
    fn object_type(&self, plan: &TypePlan) -> Self::Descriptor;

    /// Builds an interface type.
    fn interface_type(&self, plan: &TypePlan) -> Self::Descriptor;

    /// Builds a pagination edge type.
    fn edge_type(&self, plan: &TypePlan) -> Self::Descriptor;

    /// Builds a pagination connection type.
    fn connection_type(&self, plan: &TypePlan) -> Self::Descriptor;

    /// Dispatches on `plan.kind`.
    fn build(&self, plan: &TypePlan) -> Self::Descriptor {
        match plan.kind {
            TypeKind::Object => self.object_type(plan),
            TypeKind::Interface => self.interface_type(plan),
            TypeKind::Edge => self.edge_type(plan),
            TypeKind::Connection => self.connection_type(plan),
        }
    }
}

/// A field of a [`TypeShape`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldShape {
    /// Field name.
    pub name: String,
    /// Output type expression, e.g. `String`, `[Person]`, `ID!`.
    #[serde(rename = "type")]
    pub type_expr: String,
    /// Property IRI, absent for structural fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    /// Field description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Caller configuration merged with any registered extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl FieldShape {
    fn structural(name: &str, type_expr: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            type_expr: type_expr.into(),
            iri: None,
            description: None,
            config: None,
        }
    }

    /// Returns `true` if the merged configuration marks the field deprecated.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.config
            .as_ref()
            .and_then(|c| c.get("deprecated"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A plain output-type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeShape {
    /// Type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Source class IRI.
    pub class_iri: String,
    /// Description taken from the class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in resolution order.
    pub fields: Vec<FieldShape>,
    /// Implemented interfaces (object types only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    /// Possible concrete types (interfaces only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub possible_types: Vec<String>,
}

impl TypeShape {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Name of the relay node interface.
pub const NODE_INTERFACE: &str = "Node";

/// Name of the pagination info type.
pub const PAGE_INFO: &str = "PageInfo";

/// The built-in builder producing [`TypeShape`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeBuilder;

impl ShapeBuilder {
    fn shape(plan: &TypePlan, fields: Vec<FieldShape>) -> TypeShape {
        TypeShape {
            name: plan.name.clone(),
            kind: plan.kind,
            class_iri: plan.class.iri.clone(),
            description: plan.class.description.clone(),
            fields,
            interfaces: Vec::new(),
            possible_types: Vec::new(),
        }
    }

    fn class_fields(plan: &TypePlan) -> Vec<FieldShape> {
        plan.class.fields.iter().map(field_shape).collect()
    }
}

impl TypeBuilder for ShapeBuilder {
    type Descriptor = TypeShape;

    fn object_type(&self, plan: &TypePlan) -> TypeShape {
        let mut fields = Vec::with_capacity(plan.class.fields.len() + 1);
        if plan.node_interface {
            fields.push(FieldShape::structural("id", "ID!"));
        }
        fields.extend(Self::class_fields(plan));

        let mut shape = Self::shape(plan, fields);
        shape.interfaces = plan.interfaces.iter().map(|t| t.name.clone()).collect();
        if plan.node_interface {
            shape.interfaces.push(NODE_INTERFACE.to_owned());
        }
        shape
    }

    fn interface_type(&self, plan: &TypePlan) -> TypeShape {
        let mut shape = Self::shape(plan, Self::class_fields(plan));
        shape.possible_types = plan.implementors.iter().map(|t| t.name.clone()).collect();
        shape
    }

    fn edge_type(&self, plan: &TypePlan) -> TypeShape {
        let node = plan.item.as_ref().map_or_else(|| plan.class.type_name.clone(), |t| t.name.clone());
        Self::shape(
            plan,
            vec![
                FieldShape::structural("cursor", "String!"),
                FieldShape::structural("node", node),
            ],
        )
    }

    fn connection_type(&self, plan: &TypePlan) -> TypeShape {
        let edge = plan
            .item
            .as_ref()
            .map_or_else(|| format!("{}Edge", plan.class.type_name), |t| t.name.clone());
        Self::shape(
            plan,
            vec![
                FieldShape::structural("edges", format!("[{edge}]")),
                FieldShape::structural("pageInfo", format!("{PAGE_INFO}!")),
            ],
        )
    }
}

fn field_shape(field: &FieldResolution) -> FieldShape {
    let base = match &field.kind {
        FieldKind::Scalar { scalar } => scalar.name().to_owned(),
        FieldKind::Object { type_name, .. } => type_name.clone(),
        FieldKind::Custom => field
            .config
            .as_ref()
            .and_then(|c| c.get("type"))
            .and_then(Value::as_str)
            .map_or_else(|| "String".to_owned(), custom_type_name),
    };
    let type_expr = if field.list { format!("[{base}]") } else { base };

    FieldShape {
        name: field.name.clone(),
        type_expr,
        iri: Some(field.iri.clone()),
        description: field.description.clone(),
        config: merge_config(field.config.as_ref(), field.extension.as_ref()),
    }
}

/// Custom field types are written in lower case by callers (`"string"`);
/// output type names are capitalised.
fn custom_type_name(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "String".to_owned(),
    }
}

/// Shallow merge: keys of `extension` override keys of `config`. Non-object
/// extensions replace the configuration outright.
fn merge_config(config: Option<&Value>, extension: Option<&Value>) -> Option<Value> {
    match (config, extension) {
        (None, None) => None,
        (Some(c), None) => Some(c.clone()),
        (None, Some(e)) => Some(e.clone()),
        (Some(Value::Object(c)), Some(Value::Object(e))) => {
            let mut merged: Map<String, Value> = c.clone();
            merged.extend(e.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(Value::Object(merged))
        }
        (Some(_), Some(e)) => Some(e.clone()),
    }
}
