//
// import_cache/namespace_cache.rs
//
// Namespace name -> symbols, independent of which framework owns them
//

use indexmap::IndexMap;

use super::types::SymbolDescriptor;

#[derive(Debug, Clone, Default)]
pub struct NamespaceCache {
    inner: IndexMap<String, Vec<SymbolDescriptor>>,
}

impl NamespaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `namespace` has an entry, even if it ends up with no symbols
    pub fn ensure(&mut self, namespace: &str) {
        if !self.inner.contains_key(namespace) {
            self.inner.insert(namespace.to_string(), Vec::new());
        }
    }

    pub fn push(&mut self, symbol: SymbolDescriptor) {
        self.inner
            .entry(symbol.namespace.clone())
            .or_default()
            .push(symbol);
    }

    /// Drop every symbol of `namespace`, keeping the (now empty) entry
    pub fn clear_namespace(&mut self, namespace: &str) {
        self.inner.insert(namespace.to_string(), Vec::new());
    }

    pub fn get(&self, namespace: &str) -> &[SymbolDescriptor] {
        self.inner.get(namespace).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (&String, &Vec<SymbolDescriptor>)> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn symbol_count(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(namespace: &str, method: &str) -> SymbolDescriptor {
        SymbolDescriptor {
            namespace: namespace.into(),
            method: method.into(),
            path: format!("/p/{}", namespace),
            common_js: false,
        }
    }

    #[test]
    fn test_push_and_get() {
        let mut cache = NamespaceCache::new();
        cache.push(symbol("A", "f"));
        cache.push(symbol("A", "g"));
        cache.push(symbol("B", "h"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("A").len(), 2);
        assert_eq!(cache.symbol_count(), 3);
        assert!(cache.get("missing").is_empty());
    }

    #[test]
    fn test_ensure_creates_empty_entry() {
        let mut cache = NamespaceCache::new();
        cache.ensure("Empty");
        assert_eq!(cache.len(), 1);
        assert!(cache.get("Empty").is_empty());
    }

    #[test]
    fn test_clear_namespace() {
        let mut cache = NamespaceCache::new();
        cache.push(symbol("A", "f"));
        cache.push(symbol("B", "g"));
        cache.clear_namespace("A");

        assert!(cache.get("A").is_empty());
        assert_eq!(cache.get("B").len(), 1);
        assert_eq!(cache.len(), 2);
    }
}
