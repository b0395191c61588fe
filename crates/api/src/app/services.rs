use std::sync::{Mutex, PoisonError};

use pharmacy_core::DomainResult;
use pharmacy_infra::{PharmacyStore, seed};

/// State shared by every handler.
///
/// Each request takes the lock for the whole of its store operation, so an
/// order's stock check and its commit are never interleaved with another write.
#[derive(Debug, Default)]
pub struct AppServices {
    store: Mutex<PharmacyStore>,
}

impl AppServices {
    pub fn new(seed_demo: bool) -> DomainResult<Self> {
        let mut store = PharmacyStore::new();
        if seed_demo {
            seed::seed_demo(&mut store)?;
        }
        Ok(Self::from_store(store))
    }

    pub fn from_store(store: PharmacyStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    pub fn with_store<R>(&self, f: impl FnOnce(&mut PharmacyStore) -> R) -> R {
        // Store mutations build their results from clones with checked
        // arithmetic and swap them in last, so a poisoned lock still guards
        // consistent data.
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }
}
