// src/checker/html.rs
// =============================================================================
// Scans a rendered page for the things the validator cares about.
//
// We use the `scraper` crate to parse the HTML and query it with CSS
// selectors, and the `url` crate to resolve attribute values to absolute
// URLs the way a browser's `a.href` / `img.src` properties do:
// - relative values resolve against the page URL, or against <base href>
//   when the page declares one
// - an anchor whose href cannot be resolved is dropped
// - an image whose src cannot be resolved keeps its raw value (a browser
//   would fail to load it, so it must still be reported)
//
// `scraper::Html` is not Send, so everything is copied out into a plain
// `PageScan` before the caller goes back to awaiting network calls.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

/// The heading the documentation site's 404 template renders.
pub const NOT_FOUND_MARKER: &str = "<h1>404 - Not found</h1>";

/// Everything the crawler needs from one loaded page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    /// Resolved absolute targets of every `a[href]`, in document order
    pub anchors: Vec<String>,
    /// Resolved sources of every `img[src]`, in document order
    pub images: Vec<String>,
    /// Whether the raw markup contains the 404 heading
    pub not_found: bool,
}

/// Parses `html` served at `page_url` and collects anchors, images and the
/// 404 marker.
///
/// Parameters:
///   html: the rendered page markup
///   page_url: the URL the page was served from (after redirects), used to
///             resolve relative hrefs and srcs unless the page has <base href>
///
/// Returns: a `PageScan`. Anchors are not filtered by scheme or scope here;
/// the crawler decides what is in scope.
///
/// Example:
///   html = "<a href='../about/'>About</a><img src='logo.png'>"
///   page_url = "http://localhost:8000/guide/intro/"
///   anchors = ["http://localhost:8000/guide/about/"]
///   images = ["http://localhost:8000/guide/intro/logo.png"]
pub fn scan_page(html: &str, page_url: &str) -> PageScan {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    // Constant selectors; parsing them cannot fail
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let image_selector = Selector::parse("img[src]").unwrap();

    let anchors = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve(base.as_ref(), href))
        .collect();

    let images = document
        .select(&image_selector)
        .filter_map(|element| element.value().attr("src"))
        .map(|src| resolve(base.as_ref(), src).unwrap_or_else(|| src.to_string()))
        .collect();

    PageScan {
        anchors,
        images,
        not_found: html.contains(NOT_FOUND_MARKER),
    }
}

// The URL relative references resolve against: <base href> if present and
// valid, otherwise the page URL itself. None when the page URL is unusable.
fn document_base(document: &Html, page_url: &str) -> Option<Url> {
    let page = Url::parse(page_url).ok()?;

    let base_selector = Selector::parse("base[href]").unwrap();
    let declared = document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page.join(href.trim()).ok());

    Some(declared.unwrap_or(page))
}

fn resolve(base: Option<&Url>, value: &str) -> Option<String> {
    let value = value.trim();
    match base {
        Some(base) => base.join(value).ok().map(|url| url.to_string()),
        None => Url::parse(value).ok().map(|url| url.to_string()),
    }
}
