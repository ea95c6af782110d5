//
// import_cache/resolved.rs
//
// Memoized visible-symbol lists, one per framework
//

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::types::SymbolDescriptor;

/// Shared, read-only list of symbols visible from one framework.
pub type VisibleSymbols = Arc<[SymbolDescriptor]>;

/// Resolved-list cache with interior mutability.
///
/// Lookups fill the cache through `&self`, so readers holding a shared
/// reference to the import cache can memoize. Any write to the registries
/// must call `invalidate_all`; there is no finer-grained invalidation.
#[derive(Debug, Default)]
pub struct ResolvedListCache {
    inner: RwLock<HashMap<String, VisibleSymbols>>,
}

impl ResolvedListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, framework: &str) -> Option<VisibleSymbols> {
        self.inner.read().ok()?.get(framework).cloned()
    }

    pub fn insert(&self, framework: String, symbols: VisibleSymbols) {
        if let Ok(mut guard) = self.inner.write() {
            guard.insert(framework, symbols);
        }
    }

    /// Return the memoized list for `framework`, computing it on a miss
    pub fn get_or_compute(
        &self,
        framework: &str,
        compute: impl FnOnce() -> Vec<SymbolDescriptor>,
    ) -> VisibleSymbols {
        if let Some(hit) = self.get(framework) {
            return hit;
        }
        let list: VisibleSymbols = compute().into();
        self.insert(framework.to_string(), list.clone());
        list
    }

    /// Invalidate all entries
    pub fn invalidate_all(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
