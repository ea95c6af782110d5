//
// main.rs
//
// Entry point: serve LSP over stdio, or run a CLI subcommand
//

use std::env;

use tsimporter::backend;
use tsimporter::cli::scan_stats;

fn print_usage() {
    println!(
        "tsimporter {}, an auto-import language server for TypeScript.",
        env!("CARGO_PKG_VERSION")
    );
    print!(
        r#"
Usage: tsimporter [OPTIONS]
       tsimporter scan-stats <path> [--csv] [--namespaces]
                                    [--ignore <folders>] [--framework-key <key>]

Available options:

--stdio                      Start the LSP server using stdio transport
--version                    Print the version
--help                       Print this help message

Subcommands:

scan-stats                   Scan a directory and report cache statistics

"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut argv = env::args();
    argv.next(); // skip executable name

    let mut use_stdio = false;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--stdio" => use_stdio = true,
            "--version" => {
                println!("tsimporter {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_usage();
                return Ok(());
            }
            "scan-stats" => {
                env_logger::init();
                let args = scan_stats::parse_args(&mut argv)?;
                let stats = scan_stats::run_scan_stats(&args);
                if args.csv {
                    scan_stats::print_results_csv(&stats.phases);
                } else {
                    scan_stats::print_results(&stats.phases);
                }
                if args.namespaces {
                    scan_stats::print_breakdown(&stats.cache);
                }
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("Unknown argument: '{other}'"));
            }
        }
    }

    if !use_stdio {
        print_usage();
        return Ok(());
    }

    env_logger::init();

    backend::start_lsp().await
}
