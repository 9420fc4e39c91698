//! Error types for fetching and inspecting documentation pages.

/// Errors that can occur while talking to the site under test.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The request never produced a response.
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body could not be read.
    #[error("reading body of {url} failed: {message}")]
    Body { url: String, message: String },

    /// A CSS selector did not parse.
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// A page-context projection did not have the expected shape.
    #[error("unexpected JSON from {url}: {message}")]
    Json { url: String, message: String },

    /// Invalid harness configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error while reading local files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
