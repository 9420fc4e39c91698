//! Scenario registry.
//!
//! Each scenario is an independent check against the live site. Content
//! mismatches panic through the standard assertion macros; fetch problems
//! come back as errors.

pub mod page_context;
pub mod rendering;

use crate::suite::Suite;
use docs_harness::{Document, Element, Selection};
use eyre::{Result, eyre};

pub type ScenarioFn = fn(&Suite) -> Result<()>;

/// A scenario case
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub group: &'static str,
    pub func: ScenarioFn,
}

impl Scenario {
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.group, self.name)
    }
}

pub fn collect_scenarios() -> Vec<Scenario> {
    vec![
        // rendering
        Scenario {
            name: "non_listing_page_has_no_featured_links",
            group: "rendering",
            func: rendering::non_listing_page_has_no_featured_links,
        },
        Scenario {
            name: "default_locale_listing_shape",
            group: "rendering",
            func: rendering::default_locale_listing_shape,
        },
        Scenario {
            name: "localized_listing_shape",
            group: "rendering",
            func: rendering::localized_listing_shape,
        },
        Scenario {
            name: "version_scoped_listing_shape",
            group: "rendering",
            func: rendering::version_scoped_listing_shape,
        },
        Scenario {
            name: "version_filtered_article_list",
            group: "rendering",
            func: rendering::version_filtered_article_list,
        },
        Scenario {
            name: "listing_is_idempotent",
            group: "rendering",
            func: rendering::listing_is_idempotent,
        },
        // page_context
        Scenario {
            name: "enriched_links",
            group: "page_context",
            func: page_context::enriched_links,
        },
        Scenario {
            name: "raw_links",
            group: "page_context",
            func: page_context::raw_links,
        },
        Scenario {
            name: "raw_links_omit_derived_fields",
            group: "page_context",
            func: page_context::raw_links_omit_derived_fields,
        },
        Scenario {
            name: "projection_matches_markup",
            group: "page_context",
            func: page_context::projection_matches_markup,
        },
    ]
}

/// The link at `index`, or an error naming the page and selector.
pub(crate) fn link_at<'a>(
    doc: &Document,
    links: &Selection<'a>,
    selector: &str,
    index: usize,
) -> Result<Element<'a>> {
    links.nth(index).ok_or_else(|| {
        eyre!(
            "{} has no element {index} for `{selector}` (found {})",
            doc.url(),
            links.len()
        )
    })
}
