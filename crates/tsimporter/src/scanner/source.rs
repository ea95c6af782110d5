//
// scanner/source.rs
//
// Extract the namespace and exported members of a TypeScript source file
//

use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::import_cache::{normalize_path, FileDescriptor};

struct SourcePatterns {
    /// `namespace Foo.Bar {` / `export declare module Foo {`
    namespace: Regex,
    /// `export [declare] [default] [abstract] [async] <keyword> name`
    export_decl: Regex,
    /// `export { a, b as c }` and `export type { T }`
    export_list: Regex,
}

fn patterns() -> &'static SourcePatterns {
    static PATTERNS: OnceLock<SourcePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SourcePatterns {
        namespace: Regex::new(concat!(
            r"(?m)^\s*(?:export\s+)?(?:declare\s+)?(?:namespace|module)\s+",
            r"([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)",
        ))
        .unwrap(),
        export_decl: Regex::new(concat!(
            r"\bexport\s+(?:declare\s+)?(?:default\s+)?(?:abstract\s+)?(?:async\s+)?",
            r"(?:const\s+enum|function\s*\*?|class|const|let|var|enum|interface|type)",
            r"\s+([A-Za-z_$][\w$]*)",
        ))
        .unwrap(),
        export_list: Regex::new(r"\bexport\s+(?:type\s+)?\{([^}]*)\}").unwrap(),
    })
}

/// Describe one source file.
///
/// The namespace is the first `namespace`/`module` declaration, or the file
/// stem when there is none. Members are listed in source order, each once.
/// Returns `None` for an empty path.
pub fn scan_source(text: &str, path: &str, common_js: bool) -> Option<FileDescriptor> {
    if path.is_empty() {
        return None;
    }
    let path = normalize_path(path);

    let namespace = match patterns().namespace.captures(text) {
        Some(caps) => caps[1].to_string(),
        None => file_stem(&path)?,
    };

    let mut found: Vec<(usize, String)> = Vec::new();
    for caps in patterns().export_decl.captures_iter(text) {
        let name = caps.get(1)?;
        found.push((name.start(), name.as_str().to_string()));
    }
    for caps in patterns().export_list.captures_iter(text) {
        let list = caps.get(1)?;
        let mut offset = list.start();
        for item in list.as_str().split(',') {
            if let Some(name) = exported_name(item) {
                found.push((offset, name.to_string()));
            }
            offset += item.len() + 1;
        }
    }
    found.sort_by_key(|(pos, _)| *pos);

    let methods: IndexSet<String> = found.into_iter().map(|(_, name)| name).collect();

    Some(FileDescriptor::new(
        namespace,
        methods.into_iter().collect(),
        path,
        common_js,
    ))
}

/// `a` -> `a`, `a as b` -> `b`, `type T` -> `T`; `default` is not importable by name
fn exported_name(item: &str) -> Option<&str> {
    let item = item.trim();
    let item = item.strip_prefix("type ").map(str::trim).unwrap_or(item);
    let name = match item.rsplit_once(" as ") {
        Some((_, alias)) => alias.trim(),
        None => item,
    };
    let valid = !name.is_empty()
        && name != "default"
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    valid.then_some(name)
}

fn file_stem(path: &str) -> Option<String> {
    let name = Path::new(path).file_name()?.to_str()?;
    let stem = name.split('.').next().filter(|s| !s.is_empty()).unwrap_or(name);
    Some(stem.to_string())
}
