//! Resolver bundles and the resolver contract validator.
//!
//! A [`ResolverBundle`] collects capabilities by name as the caller supplies
//! them. [`validate_resolvers`] checks the required set and turns the bundle
//! into [`Resolvers`], where the required capabilities are always present.
//! Everything else the caller registers is opaque to the core and only stored
//! for downstream type builders.

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{GraphError, Result};

/// Name of the resource-lookup capability.
pub const RESOLVE_RESOURCE: &str = "resolveResource";
/// Name of the runtime-value classification capability.
pub const RESOLVE_SOURCE_CLASS_IRI: &str = "resolveSourceClassIri";

/// Capabilities every bundle must provide.
pub const REQUIRED_CAPABILITIES: &[&str] = &[RESOLVE_RESOURCE, RESOLVE_SOURCE_CLASS_IRI];

/// Looks up an application value by external id: `(id, context, info)`.
pub type ResolveResourceFn = Box<dyn Fn(&str, &Value, &Value) -> Option<Value>>;

/// Returns the most specific class IRI for a runtime value.
pub type ResolveSourceClassIriFn = Box<dyn Fn(&Value) -> Option<String>>;

/// An unvalidated set of resolver capabilities.
#[derive(Default)]
pub struct ResolverBundle {
    resolve_resource: Option<ResolveResourceFn>,
    resolve_source_class_iri: Option<ResolveSourceClassIriFn>,
    extras: IndexMap<String, Box<dyn Any>>,
}

impl ResolverBundle {
    /// An empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the `resolveResource` capability.
    #[must_use]
    pub fn resolve_resource(
        mut self,
        f: impl Fn(&str, &Value, &Value) -> Option<Value> + 'static,
    ) -> Self {
        self.resolve_resource = Some(Box::new(f));
        self
    }

    /// Registers the `resolveSourceClassIri` capability.
    #[must_use]
    pub fn resolve_source_class_iri(mut self, f: impl Fn(&Value) -> Option<String> + 'static) -> Self {
        self.resolve_source_class_iri = Some(Box::new(f));
        self
    }

    /// Registers an additional, opaque capability.
    #[must_use]
    pub fn with_capability<T: Any>(mut self, name: impl Into<String>, value: T) -> Self {
        self.extras.insert(name.into(), Box::new(value));
        self
    }

    /// Names of all registered capabilities, required ones first.
    #[must_use]
    pub fn capabilities(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(2 + self.extras.len());
        if self.resolve_resource.is_some() {
            names.push(RESOLVE_RESOURCE);
        }
        if self.resolve_source_class_iri.is_some() {
            names.push(RESOLVE_SOURCE_CLASS_IRI);
        }
        names.extend(self.extras.keys().map(String::as_str));
        names
    }
}

impl fmt::Debug for ResolverBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverBundle")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

/// A validated resolver bundle.
pub struct Resolvers {
    resolve_resource: ResolveResourceFn,
    resolve_source_class_iri: ResolveSourceClassIriFn,
    extras: IndexMap<String, Box<dyn Any>>,
}

impl Resolvers {
    /// Looks up an application value by external id.
    #[must_use]
    pub fn resolve_resource(&self, id: &str, context: &Value, info: &Value) -> Option<Value> {
        (self.resolve_resource)(id, context, info)
    }

    /// Classifies a runtime value.
    #[must_use]
    pub fn resolve_source_class_iri(&self, value: &Value) -> Option<String> {
        (self.resolve_source_class_iri)(value)
    }

    /// Returns an opaque capability, if registered with type `T`.
    #[must_use]
    pub fn capability<T: Any>(&self, name: &str) -> Option<&T> {
        self.extras.get(name).and_then(|c| c.downcast_ref::<T>())
    }

    /// Returns `true` if `name` is a registered capability.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        REQUIRED_CAPABILITIES.contains(&name) || self.extras.contains_key(name)
    }
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolvers")
            .field("extras", &self.extras.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Checks that `bundle` provides every required capability.
///
/// # Errors
///
/// Returns [`GraphError::Configuration`] listing each missing capability.
pub fn validate_resolvers(bundle: ResolverBundle) -> Result<Resolvers> {
    let ResolverBundle {
        resolve_resource,
        resolve_source_class_iri,
        extras,
    } = bundle;

    match (resolve_resource, resolve_source_class_iri) {
        (Some(resolve_resource), Some(resolve_source_class_iri)) => Ok(Resolvers {
            resolve_resource,
            resolve_source_class_iri,
            extras,
        }),
        (resource, class) => {
            let missing: Vec<&str> = [
                (resource.is_none(), RESOLVE_RESOURCE),
                (class.is_none(), RESOLVE_SOURCE_CLASS_IRI),
            ]
            .into_iter()
            .filter_map(|(absent, name)| absent.then_some(name))
            .collect();
            Err(GraphError::Configuration(format!(
                "resolver bundle is missing required capabilities: {}",
                missing.join(", ")
            )))
        }
    }
}
