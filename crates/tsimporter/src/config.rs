//
// config.rs
//
// Server settings read from `workspace/didChangeConfiguration` and
// `initializationOptions`
//

/// Settings section name
pub const SECTION: &str = "tsImporter";

/// Section name used by older clients
pub const LEGACY_SECTION: &str = "StiTSImporter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterConfig {
    /// Show the owning namespace as completion detail
    pub show_namespace_on_imports: bool,
    /// Let the server scan workspace folders itself on startup
    pub index_workspace: bool,
    /// Project configs under any of these folders are ignored by the scanner
    pub ignore_listed_folders: Vec<String>,
    /// Key in a project config listing dependency frameworks
    pub framework_key: String,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            show_namespace_on_imports: true,
            index_workspace: false,
            ignore_listed_folders: Vec::new(),
            framework_key: "frameworks".to_string(),
        }
    }
}

impl ImporterConfig {
    /// True if `path` lies under one of the ignored folders (case insensitive)
    pub fn is_ignored(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.ignore_listed_folders
            .iter()
            .any(|folder| path.contains(&folder.to_lowercase()))
    }

    /// Settings that change what the scanner produces
    pub fn scan_settings_changed(&self, other: &ImporterConfig) -> bool {
        self.index_workspace != other.index_workspace
            || self.ignore_listed_folders != other.ignore_listed_folders
            || self.framework_key != other.framework_key
    }
}

/// Parse settings, starting from `ImporterConfig::default()`.
///
/// Reads the `tsImporter` section, falling back to `StiTSImporter`. Only keys
/// present in the payload are applied. Returns `None` when neither section is
/// present.
pub fn parse_importer_config(settings: &serde_json::Value) -> Option<ImporterConfig> {
    let section = settings
        .get(SECTION)
        .or_else(|| settings.get(LEGACY_SECTION))?;

    let mut config = ImporterConfig::default();

    if let Some(v) = section
        .get("showNamespaceOnImports")
        .and_then(|v| v.as_bool())
    {
        config.show_namespace_on_imports = v;
    }
    if let Some(v) = section.get("indexWorkspace").and_then(|v| v.as_bool()) {
        config.index_workspace = v;
    }
    if let Some(v) = section
        .get("ignoreListedFolders")
        .or_else(|| section.get("IgnoreListedFolders"))
    {
        config.ignore_listed_folders = parse_folder_list(v);
    }
    if let Some(v) = section
        .get("frameworkKey")
        .or_else(|| section.get("TSConfigFrameworkName"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        config.framework_key = v.to_string();
    }

    log::info!("Importer configuration:");
    log::info!("  show_namespace_on_imports: {}", config.show_namespace_on_imports);
    log::info!("  index_workspace: {}", config.index_workspace);
    log::info!("  ignore_listed_folders: {:?}", config.ignore_listed_folders);
    log::info!("  framework_key: {}", config.framework_key);

    Some(config)
}

/// Accepts either `"a, b"` or `["a", "b"]`
fn parse_folder_list(value: &serde_json::Value) -> Vec<String> {
    let raw: Vec<&str> = match value {
        serde_json::Value::String(s) => s.split(',').collect(),
        serde_json::Value::Array(items) => items.iter().filter_map(|v| v.as_str()).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
