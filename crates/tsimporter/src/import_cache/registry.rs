//
// import_cache/registry.rs
//
// Framework registry: project roots, their declared dependencies and the
// symbols physically located under each root
//

use indexmap::{IndexMap, IndexSet};

use super::types::{normalize_path, FrameworkDescriptor, SymbolDescriptor};

/// State kept for one registered framework
#[derive(Debug, Clone, Default)]
pub struct FrameworkEntry {
    /// Direct dependencies, in the order they were first declared
    pub dependencies: IndexSet<String>,
    /// Symbols owned by this framework, in registration order
    pub elements: Vec<SymbolDescriptor>,
    /// Absolute root directory, when the watcher reported one
    pub root: Option<String>,
    /// Module system from the project config, when known
    pub common_js: Option<bool>,
}

impl FrameworkEntry {
    /// Whether imports inside this framework use CommonJS syntax.
    ///
    /// Falls back to the most recently registered element when the project
    /// config did not say.
    pub fn is_common_js(&self) -> bool {
        self.common_js
            .or_else(|| self.elements.last().map(|e| e.common_js))
            .unwrap_or(false)
    }
}

/// Registered frameworks keyed by name, iterated in registration order
#[derive(Debug, Clone, Default)]
pub struct FrameworkRegistry {
    frameworks: IndexMap<String, FrameworkEntry>,
}

impl FrameworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry if needed and union in the declared dependencies.
    ///
    /// Dependencies are never removed here; only `clear` drops them.
    pub fn register_framework(&mut self, framework: &FrameworkDescriptor) {
        if framework.name.is_empty() {
            log::debug!("Ignoring framework descriptor without a name");
            return;
        }

        let entry = self.frameworks.entry(framework.name.clone()).or_default();
        for dep in &framework.dependencies {
            if !dep.is_empty() {
                entry.dependencies.insert(dep.clone());
            }
        }
        if let Some(root) = &framework.root {
            entry.root = Some(normalize_path(root).trim_end_matches('/').to_string());
        }
        if framework.common_js.is_some() {
            entry.common_js = framework.common_js;
        }
    }

    /// Append a symbol to the framework that owns its path.
    ///
    /// Returns the owning framework name, or `None` if the symbol lies
    /// outside every known root.
    pub fn assign(&mut self, symbol: SymbolDescriptor) -> Option<String> {
        let owner = self.owner_of(&symbol.path)?.to_string();
        if let Some(entry) = self.frameworks.get_mut(&owner) {
            entry.elements.push(symbol);
        }
        Some(owner)
    }

    /// Remove every element of `namespace` from every framework.
    ///
    /// Returns the number of elements removed.
    pub fn remove_namespace(&mut self, namespace: &str) -> usize {
        let mut removed = 0;
        for entry in self.frameworks.values_mut() {
            let before = entry.elements.len();
            entry.elements.retain(|e| e.namespace != namespace);
            removed += before - entry.elements.len();
        }
        removed
    }

    /// Name of the framework whose root most closely encloses `path`.
    ///
    /// Frameworks with a known root match when the root is a segment-wise
    /// prefix of the path's directory. Frameworks known only by name match
    /// when a directory segment equals the name. The deepest match wins;
    /// on equal depth the earlier registration wins.
    pub fn owner_of(&self, path: &str) -> Option<&str> {
        let normalized = normalize_path(path);
        let dirs = directory_segments(&normalized);

        let mut best: Option<(&str, usize)> = None;
        for (name, entry) in &self.frameworks {
            let depth = match &entry.root {
                Some(root) => rooted_match_depth(root, &dirs),
                None => named_match_depth(name, &dirs),
            };
            let Some(depth) = depth else {
                continue;
            };
            if best.map_or(true, |(_, best_depth)| depth > best_depth) {
                best = Some((name.as_str(), depth));
            }
        }

        best.map(|(name, _)| name)
    }

    pub fn get(&self, name: &str) -> Option<&FrameworkEntry> {
        self.frameworks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frameworks.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FrameworkEntry)> {
        self.frameworks.iter()
    }

    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }

    /// Total number of symbols owned by any framework
    pub fn element_count(&self) -> usize {
        self.frameworks.values().map(|e| e.elements.len()).sum()
    }

    pub fn clear(&mut self) {
        self.frameworks.clear();
    }
}

/// Directory segments of a file path (the file name itself is dropped).
fn directory_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    segments
}

fn rooted_match_depth(root: &str, dirs: &[&str]) -> Option<usize> {
    let root_segments: Vec<&str> = root.split('/').filter(|s| !s.is_empty()).collect();
    if root_segments.is_empty() || root_segments.len() > dirs.len() {
        return None;
    }
    if root_segments.iter().zip(dirs).all(|(a, b)| a == b) {
        Some(root_segments.len())
    } else {
        None
    }
}

fn named_match_depth(name: &str, dirs: &[&str]) -> Option<usize> {
    dirs.iter().rposition(|segment| *segment == name).map(|i| i + 1)
}
