//
// cli/mod.rs
//
// Subcommands run instead of the language server
//

pub mod scan_stats;
