//! Scenario runner.
//!
//! Scenarios run on the blocking pool under a per-scenario timeout. A
//! scenario that times out is abandoned; its thread is left to finish on
//! its own. Failures are recorded and the run continues unless
//! `fail_fast` is set.
//!
//! Assertion panics are reported in the result lines, so the panic hook
//! stays quiet on threads that are running a scenario. Other threads keep
//! whatever hook was installed before the first run.

use crate::scenarios::Scenario;
use crate::suite::Suite;
use futures::StreamExt;
use owo_colors::OwoColorize;
use std::cell::Cell;
use std::panic;
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub filter: Option<String>,
    /// Scenarios in flight at once
    pub jobs: usize,
    pub fail_fast: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            filter: None,
            jobs: 1,
            fail_fast: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    TimedOut(Duration),
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub reports: Vec<ScenarioReport>,
}

impl Summary {
    pub fn passed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome == Outcome::Passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    pub fn success(&self) -> bool {
        self.failed() == 0
    }
}

fn matches_filter(scenario: &Scenario, filter: Option<&str>) -> bool {
    filter.is_none_or(|f| scenario.full_name().contains(f))
}

/// List all scenarios
pub fn list_scenarios(scenarios: &[Scenario], filter: Option<&str>) {
    for scenario in scenarios.iter().filter(|s| matches_filter(s, filter)) {
        println!("{}", scenario.full_name());
    }
}

/// Run the selected scenarios and print one line per result.
pub async fn run_scenarios(
    suite: Arc<Suite>,
    scenarios: &[Scenario],
    options: &RunOptions,
) -> Summary {
    let mut summary = Summary::default();
    let selected: Vec<Scenario> = scenarios
        .iter()
        .filter(|s| matches_filter(s, options.filter.as_deref()))
        .copied()
        .collect();

    install_panic_hook();

    let jobs = options.jobs.max(1);
    let mut results = futures::stream::iter(
        selected
            .into_iter()
            .map(|scenario| run_one(Arc::clone(&suite), scenario)),
    )
    .buffer_unordered(jobs);

    while let Some(report) = results.next().await {
        print_report(&report);
        let failed = report.outcome != Outcome::Passed;
        summary.reports.push(report);
        if failed && options.fail_fast {
            info!("Stopping after first failure");
            break;
        }
    }

    summary
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as running a scenario until dropped.
struct QuietPanics;

impl QuietPanics {
    fn enter() -> Self {
        QUIET_PANICS.with(|quiet| quiet.set(true));
        QuietPanics
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        QUIET_PANICS.with(|quiet| quiet.set(false));
    }
}

// Installed once per process; never swapped back.
fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

async fn run_one(suite: Arc<Suite>, scenario: Scenario) -> ScenarioReport {
    let name = scenario.full_name();
    let timeout = suite.test_timeout;
    debug!(%name, "Starting scenario");

    let start = Instant::now();
    let func = scenario.func;
    let handle = tokio::task::spawn_blocking(move || {
        let _quiet = QuietPanics::enter();
        func(&suite)
    });

    let outcome = match tokio::time::timeout(timeout, handle).await {
        Err(_) => Outcome::TimedOut(timeout),
        Ok(Ok(Ok(()))) => Outcome::Passed,
        Ok(Ok(Err(report))) => Outcome::Failed(format!("{report:?}")),
        Ok(Err(join_err)) if join_err.is_panic() => {
            Outcome::Failed(panic_message(join_err.into_panic()))
        }
        Ok(Err(join_err)) => Outcome::Failed(format!("scenario task failed: {join_err}")),
    };

    ScenarioReport {
        name,
        outcome,
        elapsed: start.elapsed(),
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn print_report(report: &ScenarioReport) {
    let secs = report.elapsed.as_secs_f64();
    match &report.outcome {
        Outcome::Passed => {
            println!("{} {} ... {} ({secs:.2}s)", "test".bold(), report.name, "PASS".green());
        }
        Outcome::Failed(msg) => {
            println!("{} {} ... {} ({secs:.2}s)", "test".bold(), report.name, "FAIL".red());
            for line in msg.lines() {
                println!("  {}", line.red());
            }
        }
        Outcome::TimedOut(limit) => {
            println!("{} {} ... {} ({secs:.2}s)", "test".bold(), report.name, "TIMEOUT".red());
            println!("  {}", format!("did not finish within {limit:?}").red());
        }
    }
}

pub fn print_summary(summary: &Summary) {
    let passed = summary.passed();
    let failed = summary.failed();
    if failed > 0 {
        println!(
            "Results: {} passed, {} failed",
            passed.to_string().green(),
            failed.to_string().red()
        );
    } else {
        println!("Results: {} passed, {} failed", passed.to_string().green(), failed);
    }
}
