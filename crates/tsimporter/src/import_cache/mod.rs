//
// import_cache/mod.rs
//
// Symbol cache behind auto-import completions
//

pub mod cache;
pub mod namespace_cache;
pub mod path_resolve;
pub mod registry;
pub mod resolved;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use cache::*;
pub use namespace_cache::*;
pub use path_resolve::*;
pub use registry::*;
pub use resolved::*;
pub use types::*;
