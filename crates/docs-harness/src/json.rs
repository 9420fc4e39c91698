//! Page-context JSON projections.
//!
//! The site answers `?json=<dotted.key.path>` with the value found at that
//! key path in the page's render context. Shallow keys under `featuredLinks`
//! hold enriched link objects; the same keys under `page.` hold the raw
//! paths from the page's frontmatter.

use crate::error::{Error, Result};
use facet::Facet;

/// A featured link as exposed by the enriched projection.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct FeaturedLink {
    pub href: String,
    pub title: String,
    #[facet(default)]
    pub intro: Option<String>,
}

/// What the elements of a projected array look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Every element is an object
    Objects,
    /// Every element is a string
    Strings,
    Empty,
    Mixed,
    /// The projection is not an array at all
    NotArray,
}

/// The body of a page-context query.
pub struct JsonProjection {
    url: String,
    body: String,
}

impl JsonProjection {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The projection as a dynamic value.
    pub fn value(&self) -> Result<facet_value::Value> {
        facet_json::from_str(&self.body).map_err(|e| self.json_error(format!("{e}")))
    }

    /// Decode an array of enriched link objects.
    pub fn links(&self) -> Result<Vec<FeaturedLink>> {
        facet_json::from_str::<Vec<FeaturedLink>>(&self.body)
            .map_err(|e| self.json_error(format!("expected an array of links: {e}")))
    }

    /// Decode an array of raw path strings.
    pub fn raw_paths(&self) -> Result<Vec<String>> {
        facet_json::from_str::<Vec<String>>(&self.body)
            .map_err(|e| self.json_error(format!("expected an array of paths: {e}")))
    }

    pub fn shape(&self) -> Result<Shape> {
        let value = self.value()?;
        let Some(items) = value.as_array() else {
            return Ok(Shape::NotArray);
        };

        let mut objects = 0usize;
        let mut strings = 0usize;
        let mut total = 0usize;
        for item in items.iter() {
            total += 1;
            if item.as_object().is_some() {
                objects += 1;
            } else if item.as_string().is_some() {
                strings += 1;
            }
        }

        Ok(match (total, objects, strings) {
            (0, _, _) => Shape::Empty,
            (n, o, _) if o == n => Shape::Objects,
            (n, _, s) if s == n => Shape::Strings,
            _ => Shape::Mixed,
        })
    }

    fn json_error(&self, message: String) -> Error {
        Error::Json {
            url: self.url.clone(),
            message,
        }
    }
}
