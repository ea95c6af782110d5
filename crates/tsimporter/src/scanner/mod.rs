//
// scanner/mod.rs
//
// Server-side workspace scanning: project configs become frameworks,
// source files become file descriptors
//

pub mod project_config;
pub mod source;
pub mod workspace;

pub use project_config::{parse_project_config, ProjectConfig, PROJECT_CONFIG_FILE};
pub use source::scan_source;
pub use workspace::{build_snapshot, discover_files, scan_workspace, WorkspaceFiles};
