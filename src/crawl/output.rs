// src/crawl/output.rs
// =============================================================================
// The three append-only report files.
//
// Every write opens the file in append mode, writes, flushes and closes it
// again. Nothing is held open across iterations, so whatever was written
// before a crash or Ctrl-C is already on disk. Files are never truncated:
// running the crawler twice leaves two sets of records.
// =============================================================================

use crate::checker::Defect;
use crate::config::OutputPaths;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct OutputFiles {
    paths: OutputPaths,
}

impl OutputFiles {
    pub fn new(paths: OutputPaths) -> Self {
        Self { paths }
    }

    /// Appends one visited URL to the traversal log.
    pub async fn record_visit(&self, url: &str) -> Result<()> {
        append(&self.paths.log_file, format!("{}\n", url).as_bytes()).await
    }

    /// Appends one defect line to the report.
    pub async fn record_defect(&self, defect: &Defect) -> Result<()> {
        append(&self.paths.broken_file, format!("{}\n", defect).as_bytes()).await
    }

    /// Appends raw page HTML to the contents dump, with no separator.
    pub async fn record_contents(&self, html: &str) -> Result<()> {
        append(&self.paths.contents_file, html.as_bytes()).await
    }
}

async fn append(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    file.write_all(bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::LinkFailure;
    use tempfile::TempDir;

    fn outputs(dir: &TempDir) -> OutputFiles {
        OutputFiles::new(OutputPaths {
            log_file: dir.path().join("visited.log"),
            broken_file: dir.path().join("broken-links.txt"),
            contents_file: dir.path().join("contents.txt"),
        })
    }

    #[tokio::test]
    async fn test_appends_never_truncate() {
        let dir = TempDir::new().unwrap();
        let out = outputs(&dir);

        out.record_visit("http://localhost:8000/").await.unwrap();
        out.record_visit("http://localhost:8000/a/").await.unwrap();
        // A second writer over the same paths keeps appending
        outputs(&dir).record_visit("http://localhost:8000/").await.unwrap();

        let log = std::fs::read_to_string(dir.path().join("visited.log")).unwrap();
        assert_eq!(
            log,
            "http://localhost:8000/\nhttp://localhost:8000/a/\nhttp://localhost:8000/\n"
        );
    }

    #[tokio::test]
    async fn test_contents_have_no_delimiters() {
        let dir = TempDir::new().unwrap();
        let out = outputs(&dir);

        out.record_contents("<html>a</html>").await.unwrap();
        out.record_contents("<html>b</html>").await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("contents.txt")).unwrap();
        assert_eq!(contents, "<html>a</html><html>b</html>");
    }

    #[tokio::test]
    async fn test_defect_lines() {
        let dir = TempDir::new().unwrap();
        let out = outputs(&dir);

        out.record_defect(&Defect::BrokenLink {
            url: "http://localhost:8000/x/".into(),
            page: "http://localhost:8000/".into(),
            failure: LinkFailure::Status(404),
        })
        .await
        .unwrap();

        let report = std::fs::read_to_string(dir.path().join("broken-links.txt")).unwrap();
        assert_eq!(
            report,
            "[Broken LINK] http://localhost:8000/x/ on http://localhost:8000/ (status 404)\n"
        );
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let out = OutputFiles::new(OutputPaths {
            log_file: dir.path().join("no-such-dir").join("visited.log"),
            broken_file: dir.path().join("broken-links.txt"),
            contents_file: dir.path().join("contents.txt"),
        });
        assert!(out.record_visit("http://localhost:8000/").await.is_err());
    }
}
