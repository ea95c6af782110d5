// cli/scan_stats.rs: `tsimporter scan-stats` subcommand
//
// Scans a directory the way the server does with `indexWorkspace` on, builds
// an import cache from the result and reports timings and counts.
//
// Phases measured:
//   1. discover: walking the tree for project configs and sources
//   2. read: reading and scanning every discovered file
//   3. cache: rebuilding the import cache from the snapshot
//   4. resolve: computing the visible list of every framework

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::config::ImporterConfig;
use crate::import_cache::{ImportCache, ResyncParams};
use crate::perf::ScopeTimer;
use crate::scanner::{build_snapshot, discover_files};

/// Parsed arguments for the `scan-stats` subcommand.
#[derive(Debug)]
pub struct ScanStatsArgs {
    pub path: PathBuf,
    pub csv: bool,
    pub namespaces: bool,
    pub settings: ImporterConfig,
}

/// Result of running a single phase.
pub struct PhaseResult {
    pub name: String,
    pub duration: Duration,
    pub peak_rss_bytes: Option<u64>,
    pub detail: String,
}

/// Everything the command measured, plus the cache it built
pub struct ScanStats {
    pub phases: Vec<PhaseResult>,
    pub cache: ImportCache,
}

/// Parse `scan-stats` arguments from the remaining CLI args.
///
/// Expected usage:
///
/// ```text
/// tsimporter scan-stats <path> [--csv] [--namespaces]
///                              [--ignore <folders>] [--framework-key <key>]
/// ```
pub fn parse_args(args: &mut impl Iterator<Item = String>) -> anyhow::Result<ScanStatsArgs> {
    let mut path: Option<PathBuf> = None;
    let mut csv = false;
    let mut namespaces = false;
    let mut settings = ImporterConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--csv" => csv = true,
            "--namespaces" => namespaces = true,
            "--ignore" => {
                let folders = args.next().context("--ignore requires a folder list")?;
                settings.ignore_listed_folders = folders
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "--framework-key" => {
                settings.framework_key = args.next().context("--framework-key requires a key")?;
            }
            other if other.starts_with('-') => bail!("Unknown flag: '{}'", other),
            _ => {
                if path.is_some() {
                    bail!("Multiple paths provided; expected exactly one");
                }
                path = Some(PathBuf::from(arg));
            }
        }
    }

    let path = path.context("Missing required <path> argument")?;
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }

    Ok(ScanStatsArgs {
        path,
        csv,
        namespaces,
        settings,
    })
}

/// Run all phases against `args.path`.
pub fn run_scan_stats(args: &ScanStatsArgs) -> ScanStats {
    let mut phases = Vec::new();
    let roots = vec![args.path.clone()];

    let files = {
        let timer = ScopeTimer::start("scan-stats:discover");
        let files = discover_files(&roots);
        phases.push(phase(
            "discover",
            timer.stop(),
            format!(
                "{} project configs, {} sources",
                files.project_configs.len(),
                files.sources.len()
            ),
        ));
        files
    };

    let snapshot: ResyncParams = {
        let timer = ScopeTimer::start("scan-stats:read");
        let snapshot = build_snapshot(&files, &args.settings);
        let methods: usize = snapshot.namespaces_info.iter().map(|f| f.methods.len()).sum();
        phases.push(phase(
            "read",
            timer.stop(),
            format!(
                "{} frameworks, {} files, {} exported members",
                snapshot.frameworks_info.len(),
                snapshot.namespaces_info.len(),
                methods
            ),
        ));
        snapshot
    };

    let mut cache = ImportCache::new();
    {
        let timer = ScopeTimer::start("scan-stats:cache");
        cache.reset(snapshot);
        let stats = cache.stats();
        phases.push(phase(
            "cache",
            timer.stop(),
            format!(
                "{} namespaces, {} symbols, {} under a framework root",
                stats.namespaces, stats.symbols, stats.owned_symbols
            ),
        ));
    }

    {
        let timer = ScopeTimer::start("scan-stats:resolve");
        let names: Vec<String> = cache.frameworks().iter().map(|(n, _)| n.clone()).collect();
        let visible: usize = names.iter().map(|n| cache.framework_symbols(n).len()).sum();
        phases.push(phase(
            "resolve",
            timer.stop(),
            format!("{} frameworks, {} visible symbols in total", names.len(), visible),
        ));
    }

    ScanStats { phases, cache }
}

fn phase(name: &str, duration: Duration, detail: String) -> PhaseResult {
    PhaseResult {
        name: name.to_string(),
        duration,
        peak_rss_bytes: crate::perf::peak_rss_bytes(),
        detail,
    }
}

/// Print phase results in human-readable format.
pub fn print_results(results: &[PhaseResult]) {
    println!("=== tsimporter Scan Stats ===\n");
    for result in results {
        let rss_str = match result.peak_rss_bytes {
            Some(bytes) => format_bytes(bytes),
            None => "N/A".to_string(),
        };
        println!(
            "  {:<10} {:>10.2?}   RSS: {:<10}  ({})",
            result.name, result.duration, rss_str, result.detail
        );
    }

    if results.len() > 1 {
        let total: Duration = results.iter().map(|r| r.duration).sum();
        println!("\n  {:<10} {:>10.2?}", "TOTAL", total);
    }
    println!();
}

/// Print phase results in CSV format.
pub fn print_results_csv(results: &[PhaseResult]) {
    println!("phase,duration_ms,peak_rss_bytes,detail");
    for result in results {
        let rss = result
            .peak_rss_bytes
            .map_or(String::new(), |b| b.to_string());
        println!(
            "{},{:.3},{},\"{}\"",
            result.name,
            result.duration.as_secs_f64() * 1000.0,
            rss,
            result.detail.replace('"', "\"\"")
        );
    }
}

/// Per-framework and per-namespace breakdown
pub fn print_breakdown(cache: &ImportCache) {
    println!("Frameworks:");
    for (name, entry) in cache.frameworks().iter() {
        let deps: Vec<&str> = entry.dependencies.iter().map(String::as_str).collect();
        println!(
            "  {:<24} own: {:<6} visible: {:<6} commonJS: {:<5} deps: [{}]",
            name,
            entry.elements.len(),
            cache.framework_symbols(name).len(),
            entry.is_common_js(),
            deps.join(", ")
        );
    }
    println!("\nNamespaces:");
    for (namespace, symbols) in cache.namespaces().namespaces() {
        println!("  {:<32} {}", namespace, symbols.len());
    }
    println!();
}

/// Format a byte count as a human-readable string (e.g., "12.3 MB").
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
