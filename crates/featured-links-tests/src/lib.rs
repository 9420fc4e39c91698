//! Acceptance tests for featured links on documentation landing pages.
//!
//! Scenarios fetch pages from a running documentation site and check the
//! curated link lists it renders, both as markup and through the
//! page-context JSON projection. Expected content lives in
//! `fixtures/featured-links.json`.

pub mod fixtures;
pub mod runner;
pub mod scenarios;
pub mod suite;

pub use fixtures::Fixtures;
pub use runner::{Outcome, RunOptions, ScenarioReport, Summary, run_scenarios};
pub use scenarios::{Scenario, collect_scenarios};
pub use suite::Suite;
