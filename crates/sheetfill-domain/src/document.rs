//! Source documents supplied alongside a template

use serde::{Deserialize, Serialize};

/// Plain text extracted from one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// File name, used to delimit the document in model context
    pub name: String,
    /// Extracted text
    pub text: String,
}

impl SourceDocument {
    /// Create a document from a name and its text
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
