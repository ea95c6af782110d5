//
// import_cache/property_tests.rs
//
// Property-based tests for the import cache
//

#![cfg(test)]

use proptest::prelude::*;

use super::cache::ImportCache;
use super::types::{FileDescriptor, FrameworkDescriptor, ResyncParams, SymbolDescriptor};
use crate::completion_engine::CompletionEngine;

// ============================================================================
// Generators
// ============================================================================

const FRAMEWORKS: &[&str] = &["api", "web", "shared", "core", "auth"];
const NAMESPACES: &[&str] = &["Api.Routes", "Web.Views", "Shared.Utils", "Core"];

fn framework_name() -> impl Strategy<Value = String> {
    prop::sample::select(FRAMEWORKS).prop_map(|s| s.to_string())
}

fn framework() -> impl Strategy<Value = FrameworkDescriptor> {
    (
        framework_name(),
        prop::collection::vec(framework_name(), 0..3),
    )
        .prop_map(|(name, deps)| FrameworkDescriptor::new(name, deps))
}

/// A file under one of the known roots, or under a directory no framework owns
fn file() -> impl Strategy<Value = FileDescriptor> {
    (
        prop::sample::select(NAMESPACES),
        prop::collection::vec("[a-z][a-zA-Z]{0,6}", 0..4),
        prop::option::of(framework_name()),
        "[a-z]{1,6}",
    )
        .prop_map(|(namespace, methods, dir, stem)| {
            let dir = dir.unwrap_or_else(|| "loose".to_string());
            FileDescriptor::new(namespace, methods, format!("/proj/{}/{}.ts", dir, stem), false)
        })
}

fn snapshot() -> impl Strategy<Value = ResyncParams> {
    (
        prop::collection::vec(framework(), 0..5),
        prop::collection::vec(file(), 0..8),
    )
        .prop_map(|(frameworks_info, namespaces_info)| ResyncParams {
            frameworks_info,
            namespaces_info,
        })
}

/// Observable state of a cache: what every framework sees, plus every namespace
fn observe(cache: &ImportCache) -> Vec<(String, Vec<SymbolDescriptor>)> {
    let mut out = Vec::new();
    for name in FRAMEWORKS {
        let caller = format!("/proj/{}/caller.ts", name);
        out.push((name.to_string(), cache.visible_symbols(&caller).to_vec()));
    }
    for namespace in NAMESPACES {
        out.push((namespace.to_string(), cache.namespace(namespace).to_vec()));
    }
    out
}

fn directory_of(symbol: &SymbolDescriptor) -> &str {
    symbol.path.split('/').nth(2).unwrap_or("")
}

// ============================================================================
// Property 1: reset fully discards prior state
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_reset_discards_prior_state(
        before in snapshot(),
        extra in prop::collection::vec(file(), 0..6),
        after in snapshot(),
    ) {
        let mut dirty = ImportCache::new();
        dirty.reset(before);
        for f in &extra {
            dirty.register(f);
        }
        // Warm the memo so stale entries would show up
        let _ = observe(&dirty);
        dirty.reset(after.clone());

        let mut fresh = ImportCache::new();
        fresh.reset(after);

        prop_assert_eq!(observe(&dirty), observe(&fresh));
        prop_assert_eq!(dirty.stats(), fresh.stats());
    }
}

// ============================================================================
// Property 2: refreshNamespace never leaves stale symbols behind
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_refresh_namespace_no_stale_symbols(
        initial in snapshot(),
        namespace in prop::sample::select(NAMESPACES),
        replacement in prop::collection::vec(file(), 0..4),
    ) {
        let mut cache = ImportCache::new();
        cache.reset(initial);
        let _ = observe(&cache);

        let files: Vec<FileDescriptor> = replacement
            .into_iter()
            .map(|mut f| {
                f.namespace = namespace.to_string();
                f
            })
            .collect();
        cache.refresh_namespace(namespace, &files);

        let allowed: Vec<SymbolDescriptor> = files.iter().flat_map(|f| f.symbols()).collect();
        for name in FRAMEWORKS {
            let visible = cache.visible_symbols(&format!("/proj/{}/caller.ts", name));
            for symbol in visible.iter().filter(|s| s.namespace == namespace) {
                prop_assert!(allowed.contains(symbol), "stale symbol {:?}", symbol);
            }
        }
        prop_assert_eq!(cache.namespace(namespace).to_vec(), allowed);
    }
}

// ============================================================================
// Property 3: repeated framework registration unions dependencies
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_framework_dependencies_union(
        name in framework_name(),
        first in prop::collection::vec(framework_name(), 0..4),
        second in prop::collection::vec(framework_name(), 0..4),
    ) {
        let mut cache = ImportCache::new();
        cache.register_framework(&FrameworkDescriptor::new(name.clone(), first.clone()));
        cache.register_framework(&FrameworkDescriptor::new(name.clone(), second.clone()));

        let entry = cache.frameworks().get(&name).unwrap();
        for dep in first.iter().chain(second.iter()) {
            prop_assert!(entry.dependencies.contains(dep));
        }
        for dep in &entry.dependencies {
            prop_assert!(first.contains(dep) || second.contains(dep));
        }
    }
}

// ============================================================================
// Property 4: visible = own + direct dependencies, each exactly once
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_visible_symbols_are_own_plus_direct_dependencies(params in snapshot()) {
        let mut cache = ImportCache::new();
        cache.reset(params.clone());

        let all: Vec<SymbolDescriptor> = params
            .namespaces_info
            .iter()
            .flat_map(|f| f.symbols())
            .collect();

        for name in FRAMEWORKS {
            let visible = cache.visible_symbols(&format!("/proj/{}/caller.ts", name));
            let Some(entry) = cache.frameworks().get(name) else {
                prop_assert!(visible.is_empty());
                continue;
            };

            let mut expected: Vec<SymbolDescriptor> = all
                .iter()
                .filter(|s| directory_of(s) == *name)
                .cloned()
                .collect();
            for dep in entry.dependencies.iter().filter(|d| d.as_str() != *name) {
                if cache.frameworks().contains(dep) {
                    expected.extend(
                        all.iter()
                            .filter(|s| directory_of(s) == dep.as_str())
                            .cloned(),
                    );
                }
            }

            prop_assert_eq!(visible.to_vec(), expected);
        }
    }
}

// ============================================================================
// Property 5: completions skip the caller's own file and keep the first of
// each label
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_completion_excludes_self_and_dedupes(
        params in snapshot(),
        pick in any::<prop::sample::Index>(),
    ) {
        let caller = if params.namespaces_info.is_empty() {
            "/proj/api/caller.ts".to_string()
        } else {
            params.namespaces_info[pick.index(params.namespaces_info.len())].path.clone()
        };

        let mut cache = ImportCache::new();
        cache.reset(params);

        let mut expected: Vec<String> = Vec::new();
        for symbol in cache.visible_symbols(&caller).iter() {
            if caller.contains(&symbol.path) {
                continue;
            }
            if !expected.iter().any(|l| l == symbol.label()) {
                expected.push(symbol.label().to_string());
            }
        }

        let mut engine = CompletionEngine::new();
        let labels: Vec<String> = engine
            .complete(&cache, &caller, "import ", 0, true)
            .into_iter()
            .map(|item| item.label)
            .collect();

        let own_path = crate::import_cache::strip_source_extension(&caller);
        for symbol in cache.visible_symbols(&caller).iter().filter(|s| s.path == own_path) {
            let shadowed = cache
                .visible_symbols(&caller)
                .iter()
                .any(|s| s.path != own_path && s.label() == symbol.label());
            prop_assert!(shadowed || !labels.iter().any(|l| l == symbol.label()));
        }
        prop_assert_eq!(labels, expected);
    }
}
