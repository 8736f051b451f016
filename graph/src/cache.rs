//! Type resolution cache.
//!
//! Memoizes class resolutions and built descriptors per node IRI. Entries are
//! computed outside of any `RefCell` borrow so a builder may safely call back
//! into the graph. The graph clears the cache whenever its index changes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;
use crate::resolve::{ClassResolution, TypeKind};

/// Hit/miss counters, mainly for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: usize,
    /// Lookups that had to compute.
    pub misses: usize,
    /// Times the cache was cleared.
    pub invalidations: usize,
}

/// Per-graph memo of derived artifacts.
#[derive(Debug)]
pub struct TypeCache<D> {
    classes: RefCell<HashMap<String, Rc<ClassResolution>>>,
    descriptors: RefCell<HashMap<(TypeKind, String), D>>,
    stats: Cell<CacheStats>,
}

impl<D> Default for TypeCache<D> {
    fn default() -> Self {
        Self {
            classes: RefCell::new(HashMap::new()),
            descriptors: RefCell::new(HashMap::new()),
            stats: Cell::new(CacheStats::default()),
        }
    }
}

impl<D: Clone> TypeCache<D> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, hit: bool) {
        let mut stats = self.stats.get();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        self.stats.set(stats);
    }

    /// Returns the cached class resolution for `iri`, computing it with `f` on
    /// a miss.
    ///
    /// # Errors
    ///
    /// Propagates the error from `f`; nothing is cached in that case.
    pub fn class_or_try_insert(
        &self,
        iri: &str,
        f: impl FnOnce() -> Result<ClassResolution>,
    ) -> Result<Rc<ClassResolution>> {
        if let Some(hit) = self.classes.borrow().get(iri) {
            self.record(true);
            return Ok(Rc::clone(hit));
        }
        self.record(false);
        let class = Rc::new(f()?);
        self.classes
            .borrow_mut()
            .insert(iri.to_owned(), Rc::clone(&class));
        Ok(class)
    }

    /// Returns the cached descriptor of `kind` for `iri`, building it with `f`
    /// on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the error from `f`; nothing is cached in that case.
    pub fn descriptor_or_try_insert(
        &self,
        kind: TypeKind,
        iri: &str,
        f: impl FnOnce() -> Result<D>,
    ) -> Result<D> {
        let key = (kind, iri.to_owned());
        if let Some(hit) = self.descriptors.borrow().get(&key) {
            self.record(true);
            return Ok(hit.clone());
        }
        self.record(false);
        let descriptor = f()?;
        self.descriptors.borrow_mut().insert(key, descriptor.clone());
        Ok(descriptor)
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.classes.borrow_mut().clear();
        self.descriptors.borrow_mut().clear();
        let mut stats = self.stats.get();
        stats.invalidations += 1;
        self.stats.set(stats);
    }

    /// Number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.borrow().len()
    }

    /// Returns `true` if neither a descriptor nor a class resolution is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.classes.borrow().is_empty()
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }
}
