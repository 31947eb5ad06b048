use super::Catalog;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Shared pointer to the current catalog snapshot.
///
/// Readers take an `Arc<Catalog>` and keep it for the whole request, so a
/// concurrent [`replace`](Self::replace) never changes what they see.
#[derive(Clone)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        // The guarded value is a single Arc, so a poisoned lock still holds a
        // complete snapshot.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new snapshot. Returns whether the source content changed.
    pub fn replace(&self, catalog: Catalog) -> bool {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let changed = guard.fingerprint() != catalog.fingerprint();
        info!(
            items = catalog.len(),
            changed,
            origin = catalog.origin(),
            "Catalog snapshot replaced"
        );
        *guard = Arc::new(catalog);
        changed
    }
}
