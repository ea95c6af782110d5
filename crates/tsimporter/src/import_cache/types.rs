//
// import_cache/types.rs
//
// Descriptors exchanged with the editor-side watcher
//

use serde::{Deserialize, Serialize};

/// Extensions stripped from a file path before it is stored on a symbol.
/// Longest suffixes first so `.d.ts` wins over `.ts`.
const SOURCE_EXTENSIONS: [&str; 9] = [
    ".d.ts", ".d.mts", ".d.cts", ".tsx", ".jsx", ".mts", ".cts", ".ts", ".js",
];

/// One scanned source file, as reported by the watcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub namespace: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "commonJS", default)]
    pub common_js: bool,
}

impl FileDescriptor {
    pub fn new(
        namespace: impl Into<String>,
        methods: Vec<String>,
        path: impl Into<String>,
        common_js: bool,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            methods,
            path: path.into(),
            common_js,
        }
    }

    /// Expand the file into one symbol per exported method.
    ///
    /// Files with an empty namespace or path produce nothing.
    pub fn symbols(&self) -> Vec<SymbolDescriptor> {
        if self.namespace.is_empty() || self.path.is_empty() {
            log::debug!(
                "Skipping file descriptor with missing namespace or path: {:?}",
                self.path
            );
            return Vec::new();
        }

        let path = strip_source_extension(&normalize_path(&self.path));
        self.methods
            .iter()
            .map(|method| SymbolDescriptor {
                namespace: self.namespace.clone(),
                method: method.clone(),
                path: path.clone(),
                common_js: self.common_js,
            })
            .collect()
    }
}

/// One importable member of one file.
///
/// An empty `method` means the whole namespace is the importable unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    pub namespace: String,
    pub method: String,
    /// File path with the source extension removed
    pub path: String,
    #[serde(rename = "commonJS")]
    pub common_js: bool,
}

impl SymbolDescriptor {
    /// The name a user types to pick this symbol
    pub fn label(&self) -> &str {
        if self.method.is_empty() {
            &self.namespace
        } else {
            &self.method
        }
    }
}

/// One project root discovered from a project config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDescriptor {
    pub name: String,
    /// The watcher historically spells this `dependancies`
    #[serde(default, alias = "dependancies")]
    pub dependencies: Vec<String>,
    /// Absolute directory holding the project config, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Module system declared by the project config, when known
    #[serde(rename = "commonJS", default, skip_serializing_if = "Option::is_none")]
    pub common_js: Option<bool>,
}

impl FrameworkDescriptor {
    pub fn new(name: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            dependencies,
            root: None,
            common_js: None,
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(normalize_path(&root.into()));
        self
    }

    pub fn with_common_js(mut self, common_js: bool) -> Self {
        self.common_js = Some(common_js);
        self
    }
}

/// Payload of the `resync` notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResyncParams {
    #[serde(default)]
    pub frameworks_info: Vec<FrameworkDescriptor>,
    #[serde(default)]
    pub namespaces_info: Vec<FileDescriptor>,
}

/// Payload of the `refreshNamespace` notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshNamespaceParams {
    pub namespace: String,
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
}

/// Use forward slashes regardless of the platform the watcher runs on.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Remove a trailing TypeScript/JavaScript extension, if any.
pub fn strip_source_extension(path: &str) -> String {
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    for ext in SOURCE_EXTENSIONS {
        if let Some(base) = path.strip_suffix(ext) {
            // Leave dotfiles such as "/a/.ts" untouched
            if base.len() > file_start {
                return base.to_string();
            }
        }
    }
    path.to_string()
}
