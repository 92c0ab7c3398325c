// src/checker/scope.rs
// =============================================================================
// URL normalization and the crawl-scope test.
//
// Normalization only removes the fragment (`#section`). Two links that differ
// only by fragment are the same page, so they share one visited-set entry.
//
// Scope is a plain string prefix match against the base URL exactly as it
// was given. "http://localhost:8000" therefore also matches
// "http://localhost:8000-other/", and a base with a trailing slash will not
// match the bare origin. That is the long-standing behavior and is kept.
// =============================================================================

use url::Url;

/// Strips the fragment from a URL.
///
/// Parseable URLs are re-serialized by the `url` crate, which also
/// canonicalizes them (so "http://host" and "http://host/" compare equal).
/// Anything unparseable falls back to cutting at the first '#'.
pub fn normalize(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => match raw.split_once('#') {
            Some((head, _)) => head.to_string(),
            None => raw.to_string(),
        },
    }
}

/// True when `url` lies inside the crawl scope.
pub fn in_scope(url: &str, base_url: &str) -> bool {
    url.starts_with(base_url)
}
