//
// import_cache/cache.rs
//
// The import cache: framework registry, namespace cache and resolved lists
// kept consistent across register/refresh/reset events
//

use std::sync::Arc;

use super::namespace_cache::NamespaceCache;
use super::registry::FrameworkRegistry;
use super::resolved::{ResolvedListCache, VisibleSymbols};
use super::types::{FileDescriptor, FrameworkDescriptor, ResyncParams, SymbolDescriptor};

/// Summary counts, used for logging and `scan-stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub frameworks: usize,
    pub namespaces: usize,
    pub symbols: usize,
    /// Symbols that fall under a registered framework root
    pub owned_symbols: usize,
}

/// In-memory symbol cache.
///
/// Every write clears the resolved-list memo. Reads never touch the
/// registries, only the memo.
#[derive(Debug, Default)]
pub struct ImportCache {
    frameworks: FrameworkRegistry,
    namespaces: NamespaceCache,
    resolved: ResolvedListCache,
}

impl ImportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all state and rebuild from a complete snapshot.
    ///
    /// Frameworks are replayed before files so ownership is decided against
    /// the final set of roots.
    pub fn reset(&mut self, params: ResyncParams) {
        self.frameworks.clear();
        self.namespaces.clear();
        self.resolved.invalidate_all();

        for framework in &params.frameworks_info {
            self.register_framework(framework);
        }
        for file in &params.namespaces_info {
            self.register(file);
        }

        let stats = self.stats();
        log::info!(
            "Import cache rebuilt: {} frameworks, {} namespaces, {} symbols \
             ({} under a framework root)",
            stats.frameworks,
            stats.namespaces,
            stats.symbols,
            stats.owned_symbols
        );
    }

    /// Register a framework, merging its dependencies into any existing entry
    pub fn register_framework(&mut self, framework: &FrameworkDescriptor) {
        log::trace!(
            "Registering framework '{}' with dependencies {:?}",
            framework.name,
            framework.dependencies
        );
        self.frameworks.register_framework(framework);
        self.resolved.invalidate_all();
    }

    /// Register every exported method of one file
    pub fn register(&mut self, file: &FileDescriptor) {
        if file.namespace.is_empty() {
            log::debug!("Skipping file without namespace: {:?}", file.path);
            return;
        }
        self.namespaces.ensure(&file.namespace);

        for symbol in file.symbols() {
            if self.frameworks.assign(symbol.clone()).is_none() {
                log::trace!(
                    "Symbol {}.{} at {} is outside every framework root",
                    symbol.namespace,
                    symbol.method,
                    symbol.path
                );
            }
            self.namespaces.push(symbol);
        }
        self.resolved.invalidate_all();
    }

    /// Re-derive one namespace from the given files.
    ///
    /// Symbols of `namespace` not present in `files` are gone afterwards.
    pub fn refresh_namespace(&mut self, namespace: &str, files: &[FileDescriptor]) {
        let removed = self.frameworks.remove_namespace(namespace);
        self.namespaces.clear_namespace(namespace);
        self.resolved.invalidate_all();
        log::trace!(
            "Refreshing namespace '{}': removed {} symbols, re-registering {} files",
            namespace,
            removed,
            files.len()
        );

        for file in files {
            self.register(file);
        }
    }

    /// Name of the framework owning `caller_path`, if any
    pub fn framework_for(&self, caller_path: &str) -> Option<&str> {
        self.frameworks.owner_of(caller_path)
    }

    /// Symbols importable from `caller_path`: the owning framework's own
    /// symbols followed by those of each directly declared dependency.
    ///
    /// Dependencies of dependencies are not included. Outside every
    /// framework the list is empty. The returned list is shared; callers
    /// only ever get read access to it.
    pub fn visible_symbols(&self, caller_path: &str) -> VisibleSymbols {
        match self.frameworks.owner_of(caller_path) {
            Some(name) => self.framework_symbols(name),
            None => Arc::from(Vec::new()),
        }
    }

    /// Resolved list of the framework `name` (empty if unknown)
    pub fn framework_symbols(&self, name: &str) -> VisibleSymbols {
        self.resolved.get_or_compute(name, || {
            let Some(entry) = self.frameworks.get(name) else {
                return Vec::new();
            };
            let mut list = entry.elements.clone();
            for dep in &entry.dependencies {
                if dep == name {
                    continue;
                }
                if let Some(dep_entry) = self.frameworks.get(dep) {
                    list.extend(dep_entry.elements.iter().cloned());
                }
            }
            list
        })
    }

    /// Whether completions inside `caller_path` should use CommonJS syntax
    pub fn is_common_js(&self, caller_path: &str) -> bool {
        self.frameworks
            .owner_of(caller_path)
            .and_then(|name| self.frameworks.get(name))
            .map(|entry| entry.is_common_js())
            .unwrap_or(false)
    }

    /// First visible symbol whose method or namespace is `name`
    pub fn find_visible(&self, name: &str, caller_path: &str) -> Option<SymbolDescriptor> {
        self.visible_symbols(caller_path)
            .iter()
            .find(|s| s.method == name || s.namespace == name)
            .cloned()
    }

    pub fn namespace(&self, namespace: &str) -> &[SymbolDescriptor] {
        self.namespaces.get(namespace)
    }

    pub fn namespaces(&self) -> &NamespaceCache {
        &self.namespaces
    }

    pub fn frameworks(&self) -> &FrameworkRegistry {
        &self.frameworks
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            frameworks: self.frameworks.len(),
            namespaces: self.namespaces.len(),
            symbols: self.namespaces.symbol_count(),
            owned_symbols: self.frameworks.element_count(),
        }
    }
}
