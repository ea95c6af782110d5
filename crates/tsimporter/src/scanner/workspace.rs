//
// scanner/workspace.rs
//
// Walk workspace folders and build a complete resync snapshot
//

use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::{DirEntry, WalkDir};

use super::project_config::{parse_project_config, PROJECT_CONFIG_FILE};
use super::source::scan_source;
use crate::config::ImporterConfig;
use crate::import_cache::{FrameworkRegistry, ResyncParams};

/// Files found under the workspace roots, before any of them is read
#[derive(Debug, Default)]
pub struct WorkspaceFiles {
    pub project_configs: Vec<PathBuf>,
    pub sources: Vec<PathBuf>,
}

/// Scan `roots` the way the editor-side watcher does and return the result
/// as one `resync` payload.
///
/// Unreadable files are skipped with a warning.
pub fn scan_workspace(roots: &[PathBuf], settings: &ImporterConfig) -> ResyncParams {
    let files = discover_files(roots);
    log::info!(
        "Discovered {} project configs and {} source files",
        files.project_configs.len(),
        files.sources.len()
    );
    build_snapshot(&files, settings)
}

/// List project configs and `.ts` sources under `roots`, sorted by path
pub fn discover_files(roots: &[PathBuf]) -> WorkspaceFiles {
    let mut files = WorkspaceFiles::default();

    for root in roots {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_skipped_directory(entry));
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read directory entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if name == PROJECT_CONFIG_FILE {
                files.project_configs.push(entry.into_path());
            } else if is_source_file(name) {
                files.sources.push(entry.into_path());
            }
        }
    }

    files
}

/// Read every discovered file and assemble the snapshot.
///
/// Frameworks are registered in a scratch registry first so each source file
/// can inherit the module system of the framework that owns it.
pub fn build_snapshot(files: &WorkspaceFiles, settings: &ImporterConfig) -> ResyncParams {
    let mut params = ResyncParams::default();
    let mut registry = FrameworkRegistry::new();

    for path in &files.project_configs {
        let content = match read_file(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("{:#}", e);
                String::new()
            }
        };
        let Some(config) = parse_project_config(&path.to_string_lossy(), &content, settings)
        else {
            continue;
        };
        let descriptor = config.to_descriptor();
        registry.register_framework(&descriptor);
        params.frameworks_info.push(descriptor);
    }

    for path in &files.sources {
        let text = match read_file(path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{:#}", e);
                continue;
            }
        };
        let path = path.to_string_lossy();
        let common_js = registry
            .owner_of(&path)
            .and_then(|name| registry.get(name))
            .is_some_and(|entry| entry.is_common_js());
        if let Some(file) = scan_source(&text, &path, common_js) {
            params.namespaces_info.push(file);
        }
    }

    params
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// `.ts` but not a declaration file
fn is_source_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".ts") && !lower.ends_with(".d.ts")
}

fn is_skipped_directory(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| {
                matches!(
                    name,
                    "node_modules" | ".git" | ".svn" | ".hg" | ".vscode" | ".idea"
                )
            })
}
