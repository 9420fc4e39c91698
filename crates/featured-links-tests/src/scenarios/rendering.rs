//! Assertions against server-rendered markup.

use super::link_at;
use crate::fixtures::Listing;
use crate::suite::Suite;
use docs_harness::{Document, Locale};
use eyre::{Result, eyre};
use tracing::info;

pub fn non_listing_page_has_no_featured_links(suite: &Suite) -> Result<()> {
    let fx = &suite.fixtures.non_listing_page;
    let doc = suite.client.fetch_document(&fx.path)?;
    let matches = doc.select(&fx.container)?;
    assert_eq!(
        matches.len(),
        0,
        "{} should not render any `{}` element",
        doc.url(),
        fx.container
    );
    Ok(())
}

pub fn default_locale_listing_shape(suite: &Suite) -> Result<()> {
    check_listing(suite, &suite.fixtures.default_locale_listing)?;
    Ok(())
}

pub fn localized_listing_shape(suite: &Suite) -> Result<()> {
    let fx = &suite.fixtures.localized_listing;
    let locale = Locale::new(fx.locale.as_str());
    let script = locale.script().ok_or_else(|| {
        eyre!(
            "localized_listing: locale {:?} has no script distinguishable from Latin text",
            locale.code()
        )
    })?;

    let doc = suite.client.fetch_document(&fx.path)?;
    let links = doc.select(&fx.links)?;
    assert_eq!(
        links.len(),
        fx.count,
        "expected {} featured links on {}",
        fx.count,
        doc.url()
    );

    for (index, link) in links.iter().enumerate() {
        let href = link.attr("href").unwrap_or_default();
        assert!(
            locale.owns(href),
            "link {index} on {} points to {href:?}, outside {}",
            doc.url(),
            locale.prefix()
        );
    }

    let first = link_at(&doc, &links, &fx.links, 0)?;
    let heading = first.children_text("h4");
    let intro = first.children_text("p");
    assert!(
        script.present_in(&heading),
        "heading of the first link on {} has no {script} text: {heading:?}",
        doc.url()
    );
    assert!(
        script.present_in(&intro),
        "intro of the first link on {} has no {script} text: {intro:?}",
        doc.url()
    );
    Ok(())
}

pub fn version_scoped_listing_shape(suite: &Suite) -> Result<()> {
    let listing = &suite.fixtures.version_scoped_listing;
    let doc = check_listing(suite, listing)?;

    let latest = suite.latest().to_string();
    let links = doc.select(&listing.links)?;
    let first = link_at(&doc, &links, &listing.links, 0)?;
    let href = first.attr("href").unwrap_or_default();
    let locale = locale_of(&listing.path)?;
    let scoped_prefix = format!("{}/enterprise-server@{latest}/", locale.prefix());

    assert!(
        href.contains(&latest),
        "first link on {} should embed release {latest}: {href:?}",
        doc.url()
    );
    assert!(
        href.starts_with(&scoped_prefix) && href.len() > scoped_prefix.len(),
        "first link on {} should be under {scoped_prefix}: {href:?}",
        doc.url()
    );
    Ok(())
}

// If this fails, check whether the content has changed and update the fixtures.
pub fn version_filtered_article_list(suite: &Suite) -> Result<()> {
    let fx = &suite.fixtures.version_filtered_articles;
    let page = suite.versioned(&fx.path);
    let doc = suite.client.fetch_document(&page)?;
    let links = doc.select(&fx.links)?;

    assert!(
        links.len() > fx.more_than,
        "Product article links are not rendered as expected on {page}: {} links, expected more than {}",
        links.len(),
        fx.more_than
    );

    let text = links.text();
    for title in &fx.included {
        assert!(
            text.contains(title.as_str()),
            "Enterprise article link {title:?} is not rendered as expected on {page}"
        );
    }
    for title in &fx.excluded {
        assert!(
            !text.contains(title.as_str()),
            "Dotcom-only article link {title:?} is rendered, but should not be, on {page}"
        );
    }
    Ok(())
}

pub fn listing_is_idempotent(suite: &Suite) -> Result<()> {
    let listing = &suite.fixtures.default_locale_listing;
    let path = suite.versioned(&listing.path);

    let first = snapshot(&suite.client.fetch_document(&path)?, &listing.links)?;
    let second = snapshot(&suite.client.fetch_document(&path)?, &listing.links)?;
    info!(links = first.len(), %path, "Compared two fetches");

    assert!(!first.is_empty(), "{path} rendered no `{}` links", listing.links);
    assert_eq!(
        first, second,
        "repeated fetches of {path} rendered different link lists"
    );
    Ok(())
}

/// Check count and pinned entries of a listing; returns the fetched page.
fn check_listing(suite: &Suite, listing: &Listing) -> Result<Document> {
    let path = suite.versioned(&listing.path);
    let doc = suite.client.fetch_document(&path)?;
    {
        let links = doc.select(&listing.links)?;

        assert_eq!(
            links.len(),
            listing.count,
            "expected {} `{}` links on {}",
            listing.count,
            listing.links,
            doc.url()
        );

        for pin in &listing.pinned {
            let link = link_at(&doc, &links, &listing.links, pin.index)?;
            let expected_href = suite.versioned(&pin.href);
            assert_eq!(
                link.attr("href"),
                Some(expected_href.as_str()),
                "href of link {} on {}",
                pin.index,
                doc.url()
            );

            let heading = link.children_text("h4");
            assert!(
                heading.starts_with(&pin.heading),
                "heading of link {} on {} should start with {:?}, got {heading:?}",
                pin.index,
                doc.url(),
                pin.heading
            );

            let intro = link.children_text("p");
            assert!(
                intro.starts_with(&pin.intro),
                "intro of link {} on {} should start with {:?}, got {intro:?}",
                pin.index,
                doc.url(),
                pin.intro
            );
        }
    }

    Ok(doc)
}

fn snapshot(doc: &Document, selector: &str) -> Result<Vec<(String, String, String)>> {
    Ok(doc
        .select(selector)?
        .iter()
        .map(|link| {
            (
                link.attr("href").unwrap_or_default().to_string(),
                link.children_text("h4"),
                link.children_text("p"),
            )
        })
        .collect())
}

/// The locale a site path belongs to, from its first segment.
fn locale_of(path: &str) -> Result<Locale> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(Locale::new)
        .ok_or_else(|| eyre!("{path:?} has no locale segment"))
}
