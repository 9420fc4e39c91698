//! Runs every scenario against a local stand-in for the documentation site.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use docs_harness::HarnessConfig;
use featured_links_tests::scenarios::{ScenarioFn, page_context, rendering};
use featured_links_tests::{Outcome, RunOptions, Suite, collect_scenarios, run_scenarios};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// A way the stub site can get its content wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Defect {
    /// Article pages render a featured-links block
    FeaturedLinksOnArticle,
    /// The default-locale listing loses its last link
    ShortDefaultListing,
    /// The last default-locale link points at a different article
    MovedLastDefaultLink,
    /// Default-locale headings start with whitespace
    IndentedHeadings,
    /// Localized links leave out the locale prefix
    UnprefixedLocalizedLinks,
    /// The first insights link is not scoped to a release
    UnscopedInsightsLink,
    /// The insights listing loses its last link
    ShortInsightsListing,
    /// Dotcom-only articles show up on enterprise pages
    LeakedDotcomArticles,
    /// The enriched projection carries someone else's intro
    WrongEnrichedIntro,
    /// The raw projection answers with enriched objects
    RawLinksAsObjects,
    /// The raw projection answers with locale-prefixed paths
    PrefixedRawLinks,
}

#[derive(Default)]
struct StubOptions {
    defect: Option<Defect>,
    delay: Option<Duration>,
}

impl StubOptions {
    fn with(defect: Defect) -> Self {
        Self {
            defect: Some(defect),
            ..Self::default()
        }
    }

    fn has(&self, defect: Defect) -> bool {
        self.defect == Some(defect)
    }
}

fn link(href: &str, title: &str, intro: &str) -> String {
    format!(r#"<li><a href="{href}"><h4>{title}</h4><p>{intro}</p></a></li>"#)
}

fn page(body: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>Docs</title></head><body>{body}</body></html>")
}

fn english_landing(options: &StubOptions) -> String {
    let indent = if options.has(Defect::IndentedHeadings) { "\n    " } else { "" };
    let mut links = vec![link(
        "/en/github/getting-started-with-github/set-up-git",
        &format!("{indent}Set up Git"),
        "At the heart of GitHub is an open source version control system (VCS) called Git.",
    )];
    for n in 1..8 {
        links.push(link(
            &format!("/en/github/topic-{n}"),
            &format!("{indent}Topic {n}"),
            &format!("About topic {n}."),
        ));
    }
    if !options.has(Defect::ShortDefaultListing) {
        let last_href = if options.has(Defect::MovedLastDefaultLink) {
            "/en/github/managing-your-work-on-github"
        } else {
            "/en/github/working-with-github-pages"
        };
        links.push(link(
            last_href,
            &format!("{indent}GitHub Pages"),
            "You can create a website directly from a repository on GitHub.",
        ));
    }
    page(&format!(
        r#"<ul data-testid="article-list">{}</ul>"#,
        links.concat()
    ))
}

fn japanese_landing(options: &StubOptions) -> String {
    let prefix = if options.has(Defect::UnprefixedLocalizedLinks) { "" } else { "/ja" };
    let links: Vec<String> = (0..9)
        .map(|n| {
            link(
                &format!("{prefix}/github/article-{n}"),
                "Git のセットアップ",
                "GitHub の中心には Git というオープンソースのバージョン管理システムがあります。",
            )
        })
        .collect();
    page(&format!(
        r#"<div class="featured-links"><ul>{}</ul></div>"#,
        links.concat()
    ))
}

fn article(options: &StubOptions) -> String {
    let featured = if options.has(Defect::FeaturedLinksOnArticle) {
        format!(
            r#"<div class="featured-links"><ul>{}</ul></div>"#,
            link("/en/github/authenticating-to-github", "Authentication", "")
        )
    } else {
        String::new()
    };
    page(&format!(
        "<article><h1>Set up Git</h1><p>Install Git.</p>{featured}</article>"
    ))
}

fn insights_landing(options: &StubOptions) -> String {
    let first_href = if options.has(Defect::UnscopedInsightsLink) {
        "/en/insights/installing-and-configuring-github-insights/about-github-insights"
    } else {
        "/en/enterprise-server@3.0/insights/installing-and-configuring-github-insights/about-github-insights"
    };
    let mut links = vec![link(
        first_href,
        "About GitHub Insights",
        "GitHub Insights provides metrics, analytical reports, and recommendations.",
    )];
    let count = if options.has(Defect::ShortInsightsListing) { 5 } else { 6 };
    for n in 1..count {
        links.push(link(
            &format!("/en/enterprise-server@3.0/insights/topic-{n}"),
            &format!("Insights topic {n}"),
            "More about insights.",
        ));
    }
    page(&format!(
        r#"<ul data-testid="article-list">{}</ul>"#,
        links.concat()
    ))
}

fn packages_landing(options: &StubOptions) -> String {
    let mut titles = vec![
        "About GitHub Packages",
        "Working with a GitHub Packages registry",
        "Managing container images",
        "Publishing packages",
    ];
    if options.has(Defect::LeakedDotcomArticles) {
        titles.push("Migrating to the Container registry from the Docker registry");
    }
    let links: String = titles
        .iter()
        .enumerate()
        .map(|(n, title)| link(&format!("/en/enterprise-server@3.0/packages/{n}"), title, ""))
        .collect();
    page(&format!(
        r#"<ul data-testid="product-articles-list">{links}</ul>"#
    ))
}

const ENRICHED: &str = r#"[{"href":"/en/github/getting-started-with-github/set-up-git","title":"Set up Git","intro":"At the heart of GitHub is an open source version control system (VCS) called Git."},{"href":"/en/github/authenticating-to-github","title":"Authentication","intro":"Keep your account secure."}]"#;

const ENRICHED_WRONG_INTRO: &str = r#"[{"href":"/en/github/getting-started-with-github/set-up-git","title":"Set up Git","intro":"Keep your account secure."}]"#;

const RAW: &str =
    r#"["/github/getting-started-with-github/set-up-git","/github/authenticating-to-github"]"#;

const RAW_PREFIXED: &str =
    r#"["/en/github/getting-started-with-github/set-up-git","/en/github/authenticating-to-github"]"#;

fn json(body: &'static str) -> Response {
    ([("content-type", "application/json")], body).into_response()
}

async fn serve(
    State(options): State<Arc<StubOptions>>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(delay) = options.delay {
        tokio::time::sleep(delay).await;
    }

    match (uri.path(), params.get("json").map(String::as_str)) {
        ("/en", Some("featuredLinks.gettingStarted")) => {
            if options.has(Defect::WrongEnrichedIntro) {
                json(ENRICHED_WRONG_INTRO)
            } else {
                json(ENRICHED)
            }
        }
        ("/en", Some("page.featuredLinks.gettingStarted")) => {
            if options.has(Defect::RawLinksAsObjects) {
                json(ENRICHED)
            } else if options.has(Defect::PrefixedRawLinks) {
                json(RAW_PREFIXED)
            } else {
                json(RAW)
            }
        }
        (_, Some(_)) => StatusCode::NOT_FOUND.into_response(),
        ("/en", None) => Html(english_landing(&options)).into_response(),
        ("/ja", None) => Html(japanese_landing(&options)).into_response(),
        ("/en/github/getting-started-with-github/set-up-git", None) => {
            Html(article(&options)).into_response()
        }
        ("/en/enterprise/3.0/user/insights", None) => {
            Html(insights_landing(&options)).into_response()
        }
        ("/en/enterprise-server@3.0/packages", None) => {
            Html(packages_landing(&options)).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn spawn_site(options: StubOptions) -> String {
    let router = Router::new()
        .fallback(serve)
        .with_state(Arc::new(options));

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    format!("http://{addr}")
}

fn suite_for(options: StubOptions) -> Suite {
    let base = spawn_site(options);
    Suite::from_config(&HarnessConfig::new(base)).unwrap()
}

fn panic_text(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_default()
}

/// Run `scenario` against a site with `defect` and return how it failed,
/// whether through an assertion or an error.
fn failure_of(defect: Defect, scenario: ScenarioFn) -> String {
    let suite = suite_for(StubOptions::with(defect));
    match panic::catch_unwind(AssertUnwindSafe(|| scenario(&suite))) {
        Err(payload) => panic_text(payload),
        Ok(Err(report)) => format!("{report:?}"),
        Ok(Ok(())) => panic!("scenario passed against a site with {defect:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn every_scenario_passes_against_a_well_behaved_site() {
    let suite = Arc::new(suite_for(StubOptions::default()));
    let scenarios = collect_scenarios();
    let options = RunOptions {
        jobs: 4,
        ..RunOptions::default()
    };

    let summary = run_scenarios(suite, &scenarios, &options).await;

    for report in &summary.reports {
        assert_eq!(report.outcome, Outcome::Passed, "{} did not pass", report.name);
    }
    assert_eq!(summary.reports.len(), scenarios.len());
    assert!(summary.success());
}

#[test]
fn featured_links_on_an_article_are_caught() {
    let message = failure_of(
        Defect::FeaturedLinksOnArticle,
        rendering::non_listing_page_has_no_featured_links,
    );
    assert!(message.contains("should not render any `.featured-links` element"));
    assert!(message.contains("/en/github/getting-started-with-github/set-up-git"));
}

#[test]
fn default_listing_must_have_nine_links() {
    let message = failure_of(
        Defect::ShortDefaultListing,
        rendering::default_locale_listing_shape,
    );
    assert!(message.contains("expected 9 `[data-testid=article-list] a` links"));
}

#[test]
fn default_listing_pins_the_last_href() {
    let message = failure_of(
        Defect::MovedLastDefaultLink,
        rendering::default_locale_listing_shape,
    );
    assert!(message.contains("href of link 8"));
    assert!(message.contains("/en/github/managing-your-work-on-github"));
}

#[test]
fn heading_prefix_is_compared_verbatim() {
    let message = failure_of(
        Defect::IndentedHeadings,
        rendering::default_locale_listing_shape,
    );
    assert!(message.contains("heading of link 0"));
    assert!(message.contains("should start with \"Set up Git\""));
}

#[test]
fn localized_links_must_carry_the_locale_prefix() {
    let message = failure_of(
        Defect::UnprefixedLocalizedLinks,
        rendering::localized_listing_shape,
    );
    assert!(message.contains("outside /ja"));
}

#[test]
fn version_scoped_link_must_embed_the_release() {
    let message = failure_of(
        Defect::UnscopedInsightsLink,
        rendering::version_scoped_listing_shape,
    );
    assert!(message.contains("href of link 0"));
    assert!(message.contains("/en/enterprise-server@3.0/insights/"));
}

#[test]
fn version_scoped_listing_must_have_six_links() {
    let message = failure_of(
        Defect::ShortInsightsListing,
        rendering::version_scoped_listing_shape,
    );
    assert!(message.contains("expected 6"));
    assert!(message.contains("/en/enterprise/3.0/user/insights"));
}

#[test]
fn version_filtering_catches_leaked_articles() {
    let message = failure_of(
        Defect::LeakedDotcomArticles,
        rendering::version_filtered_article_list,
    );
    assert!(message.contains("Migrating to the Container registry"));
    assert!(message.contains("/en/enterprise-server@3.0/packages"));
}

#[test]
fn enriched_intro_prefix_is_checked() {
    let message = failure_of(Defect::WrongEnrichedIntro, page_context::enriched_links);
    assert!(message.contains("intro of the first link"));
    assert!(message.contains("Keep your account secure."));
}

#[test]
fn raw_projection_must_hold_strings() {
    let message = failure_of(Defect::RawLinksAsObjects, page_context::raw_links);
    assert!(message.contains("expected an array of paths"));

    let message = failure_of(
        Defect::RawLinksAsObjects,
        page_context::raw_links_omit_derived_fields,
    );
    assert!(message.contains("should return bare paths"));
}

#[test]
fn raw_projection_must_not_carry_the_locale() {
    let message = failure_of(Defect::PrefixedRawLinks, page_context::raw_links);
    assert!(message.contains("first raw path"));

    let message = failure_of(
        Defect::PrefixedRawLinks,
        page_context::raw_links_omit_derived_fields,
    );
    assert!(message.contains("carries the /en prefix"));
}

#[test]
fn missing_pages_are_fetch_errors_not_assertions() {
    let base = spawn_site(StubOptions::default());
    let mut config = HarnessConfig::new(base);
    config.latest_release = Some("2.22".to_string());
    let suite = Suite::from_config(&config).unwrap();

    // No 2.22 pages exist on the stub, so the fetch itself fails.
    let err = rendering::version_scoped_listing_shape(&suite).unwrap_err();
    assert!(err.to_string().contains("404"));
    assert!(err.to_string().contains("/en/enterprise/2.22/user/insights"));
}

#[test]
fn deprecated_latest_override_is_rejected() {
    let mut config = HarnessConfig::new("http://127.0.0.1:9");
    config.latest_release = Some("2.19".to_string());
    let err = Suite::from_config(&config).err().unwrap();
    assert!(format!("{err:#}").contains("2.19 is deprecated"));
}

#[test]
fn projection_scenarios_pass_individually() {
    let suite = suite_for(StubOptions::default());
    page_context::enriched_links(&suite).unwrap();
    page_context::raw_links(&suite).unwrap();
    page_context::raw_links_omit_derived_fields(&suite).unwrap();
    page_context::projection_matches_markup(&suite).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_pages_time_out_without_stopping_the_run() {
    let base = spawn_site(StubOptions {
        delay: Some(Duration::from_secs(2)),
        ..StubOptions::default()
    });
    let mut config = HarnessConfig::new(base);
    config.test_timeout = Duration::from_millis(200);
    let suite = Arc::new(Suite::from_config(&config).unwrap());

    let options = RunOptions {
        filter: Some("rendering::".to_string()),
        jobs: 2,
        fail_fast: false,
    };
    let summary = run_scenarios(suite, &collect_scenarios(), &options).await;

    assert_eq!(summary.reports.len(), 6);
    for report in &summary.reports {
        assert!(
            matches!(report.outcome, Outcome::TimedOut(_)),
            "{} should have timed out, got {:?}",
            report.name,
            report.outcome
        );
    }
    assert_eq!(summary.failed(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn fail_fast_stops_after_the_first_failure() {
    let suite = Arc::new(suite_for(StubOptions::with(Defect::LeakedDotcomArticles)));

    // Scenarios run in registration order with one job; the idempotence
    // check comes after the failing one and must not run.
    let options = RunOptions {
        filter: Some("rendering::".to_string()),
        jobs: 1,
        fail_fast: true,
    };
    let summary = run_scenarios(suite, &collect_scenarios(), &options).await;

    assert_eq!(summary.reports.len(), 5);
    assert_eq!(summary.passed(), 4);
    let last = summary.reports.last().unwrap();
    assert_eq!(last.name, "rendering::version_filtered_article_list");
    match &last.outcome {
        Outcome::Failed(message) => assert!(message.contains("Dotcom-only")),
        other => panic!("expected a failure, got {other:?}"),
    }
    assert!(
        !summary
            .reports
            .iter()
            .any(|r| r.name == "rendering::listing_is_idempotent")
    );
}
