//! Helpers for acceptance-testing a documentation site over HTTP.
//!
//! Two ways of looking at a page are provided:
//!
//! - [`DocsClient::fetch_document`] returns the rendered markup as a
//!   [`Document`] that can be queried with CSS selectors.
//! - [`DocsClient::fetch_json`] returns a [`JsonProjection`] of the page's
//!   render context at a dotted key path.
//!
//! Alongside them live the data sources the assertions lean on: the
//! enterprise [`VersionRegistry`] and [`Script`] detection for localized text.

pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod json;
pub mod locale;
pub mod releases;
pub mod script;

pub use client::DocsClient;
pub use config::HarnessConfig;
pub use dom::{Document, Element, Selection};
pub use error::{Error, Result};
pub use json::{FeaturedLink, JsonProjection, Shape};
pub use locale::Locale;
pub use releases::{Release, VersionRegistry};
pub use script::Script;
