//! Prompt construction for financial figure extraction

use sheetfill_domain::SourceDocument;

/// Builds the extraction prompt from template rows and document text
pub struct PromptBuilder<'a> {
    row_names: Vec<&'a str>,
    documents: &'a [SourceDocument],
    max_context_chars: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(
        row_names: impl IntoIterator<Item = &'a str>,
        documents: &'a [SourceDocument],
        max_context_chars: usize,
    ) -> Self {
        Self {
            row_names: row_names.into_iter().collect(),
            documents,
            max_context_chars,
        }
    }

    /// Concatenated document text with name markers, cut at the budget
    pub fn context(&self) -> String {
        let mut context = String::new();
        for doc in self.documents {
            context.push_str(&format!(
                "\n--- Start of {} ---\n{}\n--- End of {} ---\n",
                doc.name, doc.text, doc.name
            ));
        }
        truncate_chars(&context, self.max_context_chars).to_string()
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("REQUIRED ROWS TO EXTRACT:\n");
        for name in &self.row_names {
            prompt.push_str(&format!("- {}\n", name));
        }
        prompt.push('\n');

        prompt.push_str("DOCUMENT TEXT:\n");
        prompt.push_str(&self.context());
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

/// Prefix of `text` holding at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are an expert financial analyst. Your task is to extract financial data from the provided documents and populate a structured JSON list.

INSTRUCTIONS:
1. Read the provided document text carefully.
2. Extract values for each row listed below.
3. For each row, populate the values for the defined years/columns.
4. If a value is explicitly mentioned, use it.
5. If a value can be calculated (e.g., Total = Sum of parts), calculate it.
6. If a value is not found, use null.
7. OUTPUT FORMAT: A JSON object with a key "financial_data" containing a list of row objects.
   Each row object must have "row_name" and "values"."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Generate the JSON response matching the schema.
Use each row name exactly as listed above. Return ONLY valid JSON, no markdown code blocks, no explanations."#;
