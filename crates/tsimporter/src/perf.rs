// perf.rs - Timing for workspace scans and cache rebuilds
//
// Off unless TSIMPORTER_PERF is set:
//   TSIMPORTER_PERF=1        log how long each timed scope took
//   TSIMPORTER_PERF=verbose  additionally warn when a scope runs past its limit

use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfMode {
    Off,
    Basic,
    Verbose,
}

impl PerfMode {
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim) else {
            return PerfMode::Off;
        };
        if value.eq_ignore_ascii_case("verbose") {
            PerfMode::Verbose
        } else if value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false") {
            PerfMode::Off
        } else {
            PerfMode::Basic
        }
    }

    pub fn is_on(self) -> bool {
        self != PerfMode::Off
    }
}

/// Mode read from the environment once per process
pub fn mode() -> PerfMode {
    static MODE: OnceLock<PerfMode> = OnceLock::new();
    *MODE.get_or_init(|| PerfMode::parse(std::env::var("TSIMPORTER_PERF").ok().as_deref()))
}

/// Times a scope and logs the result when it ends.
///
/// ```
/// use tsimporter::perf::ScopeTimer;
///
/// let timer = ScopeTimer::start("resync");
/// let took = timer.stop();
/// assert!(took.as_secs() < 60);
/// ```
pub struct ScopeTimer {
    label: &'static str,
    started: Instant,
    limit: Option<Duration>,
    report: bool,
}

impl ScopeTimer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
            limit: None,
            report: mode().is_on(),
        }
    }

    /// Warn in verbose mode when the scope outlives `limit`
    pub fn warn_after(mut self, limit: Duration) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// End the scope, log it, and hand back the measured duration
    pub fn stop(mut self) -> Duration {
        let took = self.started.elapsed();
        self.log(took);
        self.report = false;
        took
    }

    fn log(&self, took: Duration) {
        if !self.report {
            return;
        }
        log::info!("[PERF] {} took {:?}", self.label, took);
        match self.limit {
            Some(limit) if took > limit && mode() == PerfMode::Verbose => {
                log::warn!("[PERF] {} ran past its {:?} limit ({:?})", self.label, limit, took);
            }
            _ => {}
        }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        self.log(self.started.elapsed());
    }
}

/// Counters kept for the lifetime of the server
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServerTimings {
    pub workspace_scans: u32,
    pub last_scan: Option<Duration>,
    pub last_scan_files: usize,
    pub resyncs: u32,
}

impl ServerTimings {
    pub fn log_summary(&self) {
        log::info!("[PERF] resync notifications: {}", self.resyncs);
        match self.last_scan {
            Some(took) => log::info!(
                "[PERF] workspace scans: {} (last: {:?}, {} files)",
                self.workspace_scans,
                took,
                self.last_scan_files
            ),
            None => log::info!("[PERF] workspace scans: none"),
        }
    }
}

fn timings() -> &'static Mutex<ServerTimings> {
    static TIMINGS: OnceLock<Mutex<ServerTimings>> = OnceLock::new();
    TIMINGS.get_or_init(|| Mutex::new(ServerTimings::default()))
}

fn update(apply: impl FnOnce(&mut ServerTimings)) {
    if !mode().is_on() {
        return;
    }
    if let Ok(mut timings) = timings().lock() {
        apply(&mut timings);
    }
}

pub fn record_workspace_scan(took: Duration, files: usize) {
    update(|t| {
        t.workspace_scans += 1;
        t.last_scan = Some(took);
        t.last_scan_files = files;
    });
}

pub fn record_resync() {
    update(|t| t.resyncs += 1);
}

pub fn snapshot() -> ServerTimings {
    timings().lock().map(|t| t.clone()).unwrap_or_default()
}

/// Log the counters gathered so far, if timing is on
pub fn log_summary() {
    if mode().is_on() {
        snapshot().log_summary();
    }
}

/// High-water mark of resident memory for this process, in bytes.
///
/// `getrusage` on macOS (where `ru_maxrss` is already in bytes), `VmHWM`
/// from `/proc/self/status` on Linux, nothing elsewhere.
pub fn peak_rss_bytes() -> Option<u64> {
    #[cfg(target_os = "macos")]
    {
        macos_max_rss()
    }
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|status| parse_vm_hwm(&status))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

#[cfg(target_os = "macos")]
fn macos_max_rss() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::uninit();
    // SAFETY: getrusage only writes to the pointer; the struct is read only on success.
    let usage = unsafe {
        if libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) != 0 {
            return None;
        }
        usage.assume_init()
    };
    u64::try_from(usage.ru_maxrss).ok()
}

/// `VmHWM:    12345 kB` -> bytes
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_hwm(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmHWM:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}
