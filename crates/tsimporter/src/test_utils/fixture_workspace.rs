//! Deterministic fixture workspace generator for benchmarks and tests.
//!
//! Generates synthetic TypeScript workspaces with controlled characteristics:
//! framework count, files per framework, exports per file and how many
//! sibling frameworks each one depends on.
//!
//! Output is deterministic so benchmark runs are comparable.

use std::fmt::Write;
use std::path::Path;
use tempfile::TempDir;

use crate::import_cache::{FileDescriptor, FrameworkDescriptor, ResyncParams};

/// Configuration for generating a fixture workspace.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    pub framework_count: usize,
    pub files_per_framework: usize,
    pub exports_per_file: usize,
    /// Framework `i` depends on frameworks `i+1 ..= i+n` (when they exist)
    pub dependencies_per_framework: usize,
    /// Every n-th framework uses CommonJS; 0 means none
    pub common_js_every: usize,
}

impl FixtureConfig {
    /// Small workspace: 3 frameworks, 5 files each, 5 exports per file.
    pub fn small() -> Self {
        Self {
            framework_count: 3,
            files_per_framework: 5,
            exports_per_file: 5,
            dependencies_per_framework: 1,
            common_js_every: 0,
        }
    }

    /// Medium workspace: 10 frameworks, 20 files each, 10 exports per file.
    pub fn medium() -> Self {
        Self {
            framework_count: 10,
            files_per_framework: 20,
            exports_per_file: 10,
            dependencies_per_framework: 3,
            common_js_every: 4,
        }
    }

    /// Large workspace: 30 frameworks, 50 files each, 20 exports per file.
    pub fn large() -> Self {
        Self {
            framework_count: 30,
            files_per_framework: 50,
            exports_per_file: 20,
            dependencies_per_framework: 5,
            common_js_every: 3,
        }
    }

    fn is_common_js(&self, framework: usize) -> bool {
        self.common_js_every > 0 && framework % self.common_js_every == self.common_js_every - 1
    }

    fn dependencies(&self, framework: usize) -> Vec<String> {
        (framework + 1..=framework + self.dependencies_per_framework)
            .filter(|&dep| dep < self.framework_count)
            .map(framework_name)
            .collect()
    }
}

pub fn framework_name(index: usize) -> String {
    format!("fw_{}", index)
}

pub fn namespace_name(framework: usize, file: usize) -> String {
    format!("Fw{}.File{}", framework, file)
}

pub fn export_name(framework: usize, file: usize, export: usize) -> String {
    format!("fn_{}_{}_{}", framework, file, export)
}

fn generate_project_config(index: usize, config: &FixtureConfig) -> String {
    let deps: Vec<String> = config
        .dependencies(index)
        .iter()
        .map(|d| format!("\"{}\"", d))
        .collect();
    let module = if config.is_common_js(index) {
        "commonjs"
    } else {
        "none"
    };
    format!(
        "{{\n  \"compilerOptions\": {{ \"module\": \"{}\" }},\n  \"frameworks\": [{}]\n}}\n",
        module,
        deps.join(", ")
    )
}

/// Generate the content of a single source file deterministically.
fn generate_ts_file_content(framework: usize, file: usize, config: &FixtureConfig) -> String {
    let mut content = String::new();
    writeln!(content, "namespace {} {{", namespace_name(framework, file)).unwrap();
    for export in 0..config.exports_per_file {
        writeln!(
            content,
            "    export function {}(x: number): number {{",
            export_name(framework, file, export)
        )
        .unwrap();
        writeln!(content, "        return x * {};", export + 1).unwrap();
        writeln!(content, "    }}").unwrap();
    }
    writeln!(content, "    const internal = {};", file).unwrap();
    writeln!(content, "}}").unwrap();
    content
}

/// Create a temporary fixture workspace from the given configuration.
///
/// Layout: `fw_<i>/tsconfig.json` and `fw_<i>/file_<j>.ts`.
pub fn create_fixture_workspace(config: &FixtureConfig) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for fixture workspace");
    write_fixture_workspace(temp_dir.path(), config);
    temp_dir
}

/// Write fixture files into an existing directory.
pub fn write_fixture_workspace(dir: &Path, config: &FixtureConfig) {
    for i in 0..config.framework_count {
        let framework_dir = dir.join(framework_name(i));
        std::fs::create_dir_all(&framework_dir)
            .unwrap_or_else(|e| panic!("Failed to create {}: {}", framework_dir.display(), e));
        std::fs::write(
            framework_dir.join("tsconfig.json"),
            generate_project_config(i, config),
        )
        .unwrap_or_else(|e| panic!("Failed to write tsconfig for framework {}: {}", i, e));

        for j in 0..config.files_per_framework {
            let filename = format!("file_{}.ts", j);
            std::fs::write(framework_dir.join(&filename), generate_ts_file_content(i, j, config))
                .unwrap_or_else(|e| panic!("Failed to write fixture file {}: {}", filename, e));
        }
    }
}

/// The snapshot the watcher would send for the same workspace rooted at
/// `root`, built without touching the disk.
pub fn fixture_snapshot(root: &str, config: &FixtureConfig) -> ResyncParams {
    let mut params = ResyncParams::default();
    for i in 0..config.framework_count {
        let framework_root = format!("{}/{}", root, framework_name(i));
        params.frameworks_info.push(
            FrameworkDescriptor::new(framework_name(i), config.dependencies(i))
                .with_root(framework_root.clone())
                .with_common_js(config.is_common_js(i)),
        );
        for j in 0..config.files_per_framework {
            params.namespaces_info.push(FileDescriptor::new(
                namespace_name(i, j),
                (0..config.exports_per_file)
                    .map(|k| export_name(i, j, k))
                    .collect(),
                format!("{}/file_{}.ts", framework_root, j),
                config.is_common_js(i),
            ));
        }
    }
    params
}
