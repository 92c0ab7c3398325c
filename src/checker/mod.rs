// src/checker/mod.rs
// =============================================================================
// Everything needed to judge a single page.
//
// Submodules:
// - html: scans rendered markup for anchors, images and the 404 marker
// - scope: fragment stripping and the base-URL prefix test
// - report: defect records and their report-line format
// - session: the rendering session (page loads, image loads, link checks)
// =============================================================================

mod html;
mod report;
mod scope;
mod session;

pub use html::{scan_page, PageScan};
pub use report::{Defect, LinkFailure};
pub use scope::{in_scope, normalize};
pub use session::{HttpSession, LoadedPage, Session};
