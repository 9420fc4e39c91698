//! Locale path prefixes.

use crate::script::Script;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    code: String,
}

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The URL prefix for this locale, e.g. `/ja`.
    pub fn prefix(&self) -> String {
        format!("/{}", self.code)
    }

    /// Whether `href` points into this locale's tree.
    pub fn owns(&self, href: &str) -> bool {
        let prefix = self.prefix();
        match href.strip_prefix(&prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// The script translated content in this locale is written in, if it is
    /// distinguishable from Latin text.
    pub fn script(&self) -> Option<Script> {
        self.code.parse().ok()
    }
}
