// src/checker/report.rs
// =============================================================================
// Defect records and their one-line report format.
//
// Each defect renders as a single line tagged by a bracketed kind:
//
//   [404] <page> (linked from <referrer>)
//   [Broken IMG] <image src> on <page>
//   [Broken LINK] <target> on <page> (status 500)
//   [Broken LINK] <target> on <page> (error <text>)
//
// Records are never merged: the same broken target seen from two pages is
// two lines.
// =============================================================================

use std::fmt;

/// Why a same-scope link was reported as broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkFailure {
    /// The server answered with a status of 400 or above
    Status(u16),
    /// The request never produced a response (DNS, refused, timeout, ...)
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    /// The page rendered the site's 404 template
    NotFound { url: String, source: String },
    /// An <img> never finished loading or has zero natural width
    BrokenImage { src: String, page: String },
    BrokenLink {
        url: String,
        page: String,
        failure: LinkFailure,
    },
}

impl Defect {
    pub fn tag(&self) -> &'static str {
        match self {
            Defect::NotFound { .. } => "[404]",
            Defect::BrokenImage { .. } => "[Broken IMG]",
            Defect::BrokenLink { .. } => "[Broken LINK]",
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::NotFound { url, source } => {
                write!(f, "{} {} (linked from {})", self.tag(), url, source)
            }
            Defect::BrokenImage { src, page } => write!(f, "{} {} on {}", self.tag(), src, page),
            Defect::BrokenLink { url, page, failure } => match failure {
                LinkFailure::Status(code) => {
                    write!(f, "{} {} on {} (status {})", self.tag(), url, page, code)
                }
                LinkFailure::Error(text) => {
                    write!(f, "{} {} on {} (error {})", self.tag(), url, page, text)
                }
            },
        }
    }
}
