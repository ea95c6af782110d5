//
// import_cache/path_resolve.rs
//
// Relative module specifiers for CommonJS/ES import clauses
//

use super::types::normalize_path;

/// Module specifier that imports `target` (an extension-less file path)
/// from the file at `from_file`.
///
/// The result always uses `/` and starts with `.`, e.g. `./utils` or
/// `../shared/utils`.
pub fn relative_module_path(target: &str, from_file: &str) -> String {
    let target = normalize_path(target);
    let from_file = normalize_path(from_file);

    let mut from_dirs: Vec<&str> = from_file.split('/').filter(|s| !s.is_empty()).collect();
    from_dirs.pop();
    let to: Vec<&str> = target
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    let mut common = 0;
    while common < from_dirs.len() && common < to.len() && from_dirs[common] == to[common] {
        common += 1;
    }

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from_dirs.len() {
        parts.push("..");
    }
    parts.extend_from_slice(&to[common..]);

    if parts.is_empty() {
        return ".".to_string();
    }

    let spec = parts.join("/");
    if spec.starts_with('.') {
        spec
    } else {
        format!("./{}", spec)
    }
}
