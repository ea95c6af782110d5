//
// scanner/project_config.rs
//
// Turn a `tsconfig.json` into a framework description
//

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::config::ImporterConfig;
use crate::import_cache::{normalize_path, FrameworkDescriptor};

/// File name that marks a framework root
pub const PROJECT_CONFIG_FILE: &str = "tsconfig.json";

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+").unwrap())
}

/// What one project config says about its framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Directory containing the config
    pub name: String,
    pub root: String,
    pub dependencies: Vec<String>,
    pub common_js: bool,
}

impl ProjectConfig {
    pub fn to_descriptor(&self) -> FrameworkDescriptor {
        FrameworkDescriptor::new(self.name.clone(), self.dependencies.clone())
            .with_root(self.root.clone())
            .with_common_js(self.common_js)
    }
}

/// Read a project config found at `path`.
///
/// Returns `None` for ignored folders and for paths without a parent
/// directory. Content that is not valid JSON yields a framework with no
/// dependencies.
pub fn parse_project_config(
    path: &str,
    content: &str,
    settings: &ImporterConfig,
) -> Option<ProjectConfig> {
    if settings.is_ignored(path) {
        log::trace!("Ignoring project config in listed folder: {}", path);
        return None;
    }

    let path = normalize_path(path);
    let (root, _) = path.rsplit_once('/')?;
    let name = root.rsplit('/').next().filter(|n| !n.is_empty())?;

    let mut config = ProjectConfig {
        name: name.to_string(),
        root: root.to_string(),
        dependencies: Vec::new(),
        common_js: false,
    };

    let json: Value = match serde_json::from_str(content) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not parse project config {}: {}", path, e);
            return Some(config);
        }
    };

    config.dependencies = match json.get("workflowFiles").and_then(Value::as_array) {
        Some(entries) => workflow_dependencies(entries),
        None => json
            .get(&settings.framework_key)
            .and_then(Value::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };

    config.common_js = json
        .pointer("/compilerOptions/module")
        .and_then(Value::as_str)
        .is_some_and(|module| module.eq_ignore_ascii_case("commonjs"));

    Some(config)
}

/// Entries written as `!{name}` name a dependency
fn workflow_dependencies(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(Value::as_str)
        .filter(|entry| entry.contains("!{"))
        .filter_map(|entry| word_pattern().find(entry))
        .map(|m| m.as_str().to_string())
        .collect()
}
