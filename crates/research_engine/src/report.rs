use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use research_core::ResearchResult;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::render::{render_result_html, MarkdownRenderer};

pub const REPORT_FILENAME: &str = "answer.html";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report directory unusable: {0}")]
    ReportDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes the latest answer as a standalone HTML page, replacing the
/// previous one atomically.
pub struct ReportWriter {
    dir: PathBuf,
    renderer: Box<dyn MarkdownRenderer>,
}

impl ReportWriter {
    pub fn new(dir: PathBuf, renderer: Box<dyn MarkdownRenderer>) -> Self {
        Self { dir, renderer }
    }

    pub fn write(&self, query: &str, result: &ResearchResult) -> Result<PathBuf, ReportError> {
        prepare_dir(&self.dir)?;

        let mut title = String::with_capacity(query.len());
        let _ = pulldown_cmark_escape::escape_html(&mut title, query);
        let page = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            title,
            render_result_html(self.renderer.as_ref(), result)
        );

        let target = self.dir.join(REPORT_FILENAME);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(page.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| ReportError::Io(e.error))?;
        Ok(target)
    }
}

fn prepare_dir(dir: &Path) -> Result<(), ReportError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ReportError::ReportDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ReportError::ReportDir("path is not a directory".into()));
        }
        Ok(())
    } else {
        fs::create_dir_all(dir).map_err(|e| ReportError::ReportDir(e.to_string()))
    }
}
