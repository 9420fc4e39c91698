//! Featured links acceptance test runner
//!
//! A standalone binary that runs the scenarios against a live documentation
//! site, one at a time by default.
//!
//! Usage:
//!   `featured-links-tests [OPTIONS] [FILTER]`
//!
//! Environment variables:
//!   DOCS_BASE_URL           - Site under test (required)
//!   DOCS_FIXTURES           - Fixture file replacing the embedded table
//!   DOCS_ENTERPRISE_LATEST  - Release used as the latest enterprise release
//!   DOCS_TEST_TIMEOUT_SECS  - Per-scenario timeout (default 180)

use docs_harness::HarnessConfig;
use docs_harness::config::BASE_URL_VAR;
use featured_links_tests::runner::{list_scenarios, print_summary};
use featured_links_tests::{RunOptions, Suite, collect_scenarios, run_scenarios};
use owo_colors::OwoColorize;
use std::sync::Arc;

enum Command {
    List,
    Run,
}

fn print_help() {
    println!("Featured links acceptance tests");
    println!();
    println!("Usage: featured-links-tests [OPTIONS] [FILTER]");
    println!();
    println!("Options:");
    println!("  -l, --list          List all scenarios without running them");
    println!("  -f, --filter NAME   Only run scenarios containing NAME");
    println!("  -j, --jobs N        Run up to N scenarios at once (default 1)");
    println!("      --fail-fast     Stop after the first failure");
    println!("  -h, --help          Show this help");
    println!();
    println!("Environment variables:");
    println!("  DOCS_BASE_URL           Site under test (required)");
    println!("  DOCS_RETRIES            Attempts per request on connection reset");
    println!("  DOCS_REQUEST_TIMEOUT_SECS  Per-request timeout");
    println!("  DOCS_TEST_TIMEOUT_SECS  Per-scenario timeout");
    println!("  DOCS_FIXTURES           Fixture file replacing the embedded table");
    println!("  DOCS_ENTERPRISE_LATEST  Release used as the latest enterprise release");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), message);
    std::process::exit(1);
}

fn parse_args(args: &[String]) -> (Command, RunOptions) {
    let mut command = Command::Run;
    let mut options = RunOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--list" | "-l" => command = Command::List,
            "--fail-fast" => options.fail_fast = true,
            "--filter" | "-f" => {
                i += 1;
                if i < args.len() {
                    options.filter = Some(args[i].clone());
                }
            }
            "--jobs" | "-j" => {
                i += 1;
                options.jobs = args
                    .get(i)
                    .and_then(|v| v.parse::<usize>().ok())
                    .filter(|&n| n > 0)
                    .unwrap_or_else(|| fail("--jobs expects a positive number"));
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument treated as filter
                options.filter = Some(arg.to_string());
            }
            other => fail(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    (command, options)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("featured_links_tests=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (command, options) = parse_args(&args);
    let scenarios = collect_scenarios();

    if let Command::List = command {
        list_scenarios(&scenarios, options.filter.as_deref());
        return Ok(());
    }

    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            eprintln!("  Set {BASE_URL_VAR} to the root of the site under test, e.g.:");
            eprintln!("    export {BASE_URL_VAR}=http://localhost:4000");
            std::process::exit(1);
        }
    };
    let suite = Arc::new(Suite::from_config(&config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    println!();
    println!("{}", "Running featured links scenarios...".bold());
    println!();

    let summary = runtime.block_on(run_scenarios(suite, &scenarios, &options));

    // Timed-out scenarios may still be running on the blocking pool.
    runtime.shutdown_background();

    println!();
    print_summary(&summary);

    if !summary.success() {
        std::process::exit(1);
    }
    Ok(())
}
