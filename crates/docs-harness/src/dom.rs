//! Parsed markup with CSS-selector queries.
//!
//! A thin layer over `scraper` shaped after what page assertions need:
//! count matches, pick the n-th match, read attributes and the text of
//! specific child elements.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// A fetched and parsed HTML page.
pub struct Document {
    html: Html,
    url: String,
}

impl Document {
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
            url: url.into(),
        }
    }

    /// The URL this document was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Selection<'_>> {
        let parsed = parse_selector(selector)?;
        Ok(Selection {
            elements: self.html.select(&parsed).collect(),
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// An ordered set of matched elements.
pub struct Selection<'a> {
    elements: Vec<ElementRef<'a>>,
}

impl<'a> Selection<'a> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The element at `index`, if there is one.
    pub fn nth(&self, index: usize) -> Option<Element<'a>> {
        self.elements.get(index).copied().map(Element)
    }

    pub fn iter(&self) -> impl Iterator<Item = Element<'a>> + '_ {
        self.elements.iter().copied().map(Element)
    }

    /// Concatenated text of every matched element.
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .flat_map(|el| el.text())
            .collect::<String>()
    }
}

/// A single matched element.
#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Text of the element and all its descendants.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    /// Concatenated text of the direct children named `tag`.
    pub fn children_text(&self, tag: &str) -> String {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name().eq_ignore_ascii_case(tag))
            .flat_map(|child| child.text())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<!DOCTYPE html>
<html>
<body>
  <ul data-testid="article-list">
    <li><a href="/en/first"><h4>First link</h4><p>Intro for the first.</p></a></li>
    <li><a href="/en/second"><h4>Second</h4><p>Another <em>intro</em>.</p><div><h4>nested</h4></div></a></li>
  </ul>
  <footer><a href="/en/elsewhere">Elsewhere</a></footer>
</body>
</html>"#;

    #[test]
    fn counts_scoped_matches() {
        let doc = Document::parse("http://test/en", LISTING);
        let links = doc.select("[data-testid=article-list] a").unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(doc.select("a").unwrap().len(), 3);
    }

    #[test]
    fn missing_container_is_empty() {
        let doc = Document::parse("http://test/en", LISTING);
        let missing = doc.select(".featured-links").unwrap();
        assert!(missing.is_empty());
        assert!(missing.nth(0).is_none());
    }

    #[test]
    fn reads_attributes_and_child_text() {
        let doc = Document::parse("http://test/en", LISTING);
        let links = doc.select("[data-testid=article-list] a").unwrap();
        let first = links.nth(0).unwrap();
        assert_eq!(first.attr("href"), Some("/en/first"));
        assert_eq!(first.children_text("h4"), "First link");
        assert_eq!(first.children_text("p"), "Intro for the first.");
    }

    #[test]
    fn child_text_ignores_grandchildren() {
        let doc = Document::parse("http://test/en", LISTING);
        let second = doc
            .select("[data-testid=article-list] a")
            .unwrap()
            .nth(1)
            .unwrap();
        assert_eq!(second.children_text("h4"), "Second");
        assert_eq!(second.children_text("p"), "Another intro.");
    }

    #[test]
    fn selection_text_concatenates() {
        let doc = Document::parse("http://test/en", LISTING);
        let text = doc.select("[data-testid=article-list] a").unwrap().text();
        assert!(text.contains("First link"));
        assert!(text.contains("Another intro."));
        assert!(!text.contains("Elsewhere"));
    }

    #[test]
    fn bad_selector_is_an_error() {
        let doc = Document::parse("http://test/en", LISTING);
        let err = doc.select("[[nope").err().unwrap();
        assert!(matches!(err, Error::Selector { .. }));
    }
}
