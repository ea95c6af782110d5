//! Time-budget regression tests for tsimporter.
//!
//! Wall-clock thresholds for cache rebuilds, resolved-list construction,
//! completion and the workspace scan. Only compiled in release mode, since
//! debug timings are not meaningful.
//!
//! Run with:
//!
//! ```text
//! cargo test --release -p tsimporter --features test-support --test performance_budgets
//! ```
//!
//! When the `CI` environment variable is set, thresholds are multiplied by a
//! relaxation factor (default 3x, configurable via `TSIMPORTER_PERF_CI_FACTOR`).

#![cfg(not(debug_assertions))]

use std::time::{Duration, Instant};

use tsimporter::completion_engine::CompletionEngine;
use tsimporter::config::ImporterConfig;
use tsimporter::import_cache::{FrameworkDescriptor, ImportCache};
use tsimporter::scanner::scan_workspace;
use tsimporter::test_utils::fixture_workspace::{
    create_fixture_workspace, fixture_snapshot, framework_name, FixtureConfig,
};

// ---------------------------------------------------------------------------
// Harness helpers
// ---------------------------------------------------------------------------

/// Run `f` three times and return the median duration.
fn median_of_3<F: FnMut()>(mut f: F) -> Duration {
    let mut times = [Duration::ZERO; 3];
    for t in &mut times {
        let start = Instant::now();
        f();
        *t = start.elapsed();
    }
    times.sort();
    times[1]
}

fn ci_factor_from(ci: Option<&str>, factor: Option<&str>) -> f64 {
    let is_ci = ci.is_some_and(|v| !v.is_empty());
    if is_ci {
        factor
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|&f| f >= 1.0)
            .unwrap_or(3.0)
    } else {
        1.0
    }
}

fn ci_factor() -> f64 {
    ci_factor_from(
        std::env::var("CI").ok().as_deref(),
        std::env::var("TSIMPORTER_PERF_CI_FACTOR").ok().as_deref(),
    )
}

fn assert_within_budget(label: &str, measured: Duration, budget_ms: u64) {
    let factor = ci_factor();
    let threshold = Duration::from_secs_f64(budget_ms as f64 * factor / 1000.0);
    assert!(
        measured <= threshold,
        "Time budget exceeded for '{label}': \
         measured {measured:.1?}, threshold {threshold:.1?} \
         (base {budget_ms}ms x {factor:.1})",
    );
}

#[test]
fn ci_factor_defaults() {
    assert!((ci_factor_from(None, None) - 1.0).abs() < f64::EPSILON);
    assert!((ci_factor_from(Some("true"), None) - 3.0).abs() < f64::EPSILON);
    assert!((ci_factor_from(Some("true"), Some("5.0")) - 5.0).abs() < f64::EPSILON);
    assert!((ci_factor_from(Some("true"), Some("0.5")) - 3.0).abs() < f64::EPSILON);
}

#[test]
#[should_panic(expected = "Time budget exceeded")]
fn assert_within_budget_panics_for_slow_op() {
    assert_within_budget("slow_op", Duration::from_secs(1), 5);
}

// ---------------------------------------------------------------------------
// Import cache budgets
// ---------------------------------------------------------------------------

const ROOT: &str = "/budget";

fn caller() -> String {
    format!("{}/{}/caller.ts", ROOT, framework_name(0))
}

#[test]
fn resync_large_under_100ms() {
    let snapshot = fixture_snapshot(ROOT, &FixtureConfig::large());
    let measured = median_of_3(|| {
        let mut cache = ImportCache::new();
        cache.reset(snapshot.clone());
    });
    assert_within_budget("resync_large", measured, 100);
}

#[test]
fn cold_visible_list_large_under_20ms() {
    let mut cache = ImportCache::new();
    cache.reset(fixture_snapshot(ROOT, &FixtureConfig::large()));
    let framework = FrameworkDescriptor::new(framework_name(0), vec![]);
    let caller = caller();

    let measured = median_of_3(|| {
        cache.register_framework(&framework);
        assert!(!cache.visible_symbols(&caller).is_empty());
    });
    assert_within_budget("cold_visible_large", measured, 20);
}

#[test]
fn completion_large_under_20ms() {
    let mut cache = ImportCache::new();
    cache.reset(fixture_snapshot(ROOT, &FixtureConfig::large()));
    let caller = caller();
    let mut engine = CompletionEngine::new();

    let measured = median_of_3(|| {
        assert!(!engine.complete(&cache, &caller, "import ", 0, true).is_empty());
    });
    assert_within_budget("completion_large", measured, 20);
}

#[test]
fn scan_medium_workspace_under_500ms() {
    let workspace = create_fixture_workspace(&FixtureConfig::medium());
    let roots = vec![workspace.path().to_path_buf()];
    let settings = ImporterConfig::default();

    let measured = median_of_3(|| {
        assert!(!scan_workspace(&roots, &settings).namespaces_info.is_empty());
    });
    assert_within_budget("scan_medium", measured, 500);
}
