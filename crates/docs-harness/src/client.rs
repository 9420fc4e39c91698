//! Blocking HTTP client for the documentation site under test.

use crate::config::HarnessConfig;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::json::JsonProjection;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Query parameter selecting a key path in the page context.
pub const JSON_QUERY_PARAM: &str = "json";

#[derive(Clone)]
pub struct DocsClient {
    agent: ureq::Agent,
    base_url: String,
    retries: usize,
}

impl DocsClient {
    pub fn new(config: &HarnessConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.request_timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: config.base_url.clone(),
            retries: config.retries.max(1),
        }
    }

    /// Absolute URL for a site path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Fetch `path` and parse it as HTML.
    pub fn fetch_document(&self, path: &str) -> Result<Document> {
        let url = self.url_for(path);
        let body = self.get(&url, None)?;
        Ok(Document::parse(url, &body))
    }

    /// Fetch the page-context value at `query` for `path`.
    pub fn fetch_json(&self, path: &str, query: &str) -> Result<JsonProjection> {
        let url = self.url_for(path);
        let body = self.get(&url, Some(query))?;
        Ok(JsonProjection::new(
            format!("{url}?{JSON_QUERY_PARAM}={query}"),
            body,
        ))
    }

    fn get(&self, url: &str, json_query: Option<&str>) -> Result<String> {
        // Connection resets show up under load on some platforms.
        fn is_connection_reset(err: &ureq::Error) -> bool {
            match err {
                ureq::Error::Io(io) => {
                    io.kind() == std::io::ErrorKind::ConnectionReset
                        || io.to_string().contains("Connection reset by peer")
                }
                _ => false,
            }
        }

        fn format_error_chain(err: &dyn std::error::Error) -> String {
            let mut out = err.to_string();
            let mut cur = err.source();
            while let Some(e) = cur {
                out.push_str("\n  caused by: ");
                out.push_str(&e.to_string());
                cur = e.source();
            }
            out
        }

        for attempt in 0..self.retries {
            let mut request = self.agent.get(url);
            if let Some(query) = json_query {
                request = request.query(JSON_QUERY_PARAM, query);
            }
            debug!(%url, ?json_query, attempt, "Issuing GET request");

            match request.call() {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    debug!(%url, status, "Received response");
                    if !(200..300).contains(&status) {
                        return Err(Error::Status {
                            url: url.to_string(),
                            status,
                        });
                    }
                    return resp
                        .into_body()
                        .read_to_string()
                        .map_err(|e| Error::Body {
                            url: url.to_string(),
                            message: e.to_string(),
                        });
                }
                Err(e) if is_connection_reset(&e) && attempt + 1 < self.retries => {
                    warn!(%url, attempt = attempt + 1, max = self.retries, "Connection reset, retrying");
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    error!(%url, error = ?e, "GET failed");
                    return Err(Error::Transport {
                        url: url.to_string(),
                        message: format_error_chain(&e),
                    });
                }
            }
        }

        Err(Error::Transport {
            url: url.to_string(),
            message: format!("gave up after {} attempts", self.retries),
        })
    }
}
