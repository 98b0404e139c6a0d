//! Source document loading.
//!
//! PDFs are converted with `pdftotext -layout` (poppler-utils), which keeps
//! table columns aligned. Any other file is read as UTF-8 text.

use crate::error::{CliError, Result};
use sheetfill_domain::SourceDocument;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// PDF text extraction via the `pdftotext` binary.
#[derive(Debug, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        PdfTextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    /// Extract the text of a PDF held in memory.
    pub fn extract_bytes(&self, pdf_bytes: &[u8]) -> Result<String> {
        let mut tmpfile = tempfile::NamedTempFile::new()?;
        tmpfile.write_all(pdf_bytes)?;
        tmpfile.flush()?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CliError::Document("pdftotext not found; install poppler-utils".to_string())
                } else {
                    CliError::Document(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::Document(format!(
                "pdftotext exited with {}: {}",
                code,
                stderr.trim()
            )));
        }

        // Form feeds separate pages
        Ok(String::from_utf8_lossy(&output.stdout).replace('\x0c', "\n"))
    }
}

/// Load one document, choosing the reader by extension.
pub fn load_document(path: &Path) -> Result<SourceDocument> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        let bytes = std::fs::read(path)?;
        PdfTextExtractor::new().extract_bytes(&bytes)?
    } else {
        std::fs::read_to_string(path)?
    };

    debug!("Loaded {} ({} chars)", name, text.chars().count());
    Ok(SourceDocument::new(name, text))
}

/// Load every document that can be read, in order; failures are skipped.
pub fn load_documents(paths: &[PathBuf]) -> Vec<SourceDocument> {
    paths
        .iter()
        .filter_map(|path| match load_document(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}
