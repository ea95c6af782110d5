// lib.rs: exposes the server's modules to the binary, integration tests
// and benchmarks.

pub mod backend;
pub mod cli;
pub mod completion_engine;
pub mod completion_items;
pub mod config;
pub mod handlers;
pub mod import_cache;
pub mod perf;
pub mod protocol;
pub mod scanner;
pub mod state;
// test_utils is available in test builds and when the `test-support` feature is enabled.
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
