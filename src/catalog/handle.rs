//! Shared handle publishing the current catalog

use std::sync::{Arc, PoisonError, RwLock};

use super::Catalog;

/// Cheaply cloneable handle to the current catalog
///
/// Readers take an `Arc` snapshot and keep querying it even while a reload
/// publishes a replacement; a published catalog is swapped in whole.
#[derive(Debug, Clone, Default)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// The catalog published most recently
    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the current catalog, returning the previous one
    pub fn publish(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
