//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{Extractor, ExtractorConfig, ExtractionSource, FallbackReason};
    use sheetfill_domain::{NormalizedRecord, RowValues, Scalar, SourceDocument};
    use sheetfill_llm::{LlmError, MockProvider};

    fn revenue_template() -> NormalizedRecord {
        let mut revenue = RowValues::new();
        revenue.insert("2023", Some(Scalar::Number(100.0)));
        revenue.insert("2024", None);
        let mut record = NormalizedRecord::new();
        record.insert("Revenue", revenue);
        record
    }

    fn multi_row_template() -> NormalizedRecord {
        ["Revenue", "Cost of sales", "Gross profit", "Net income"]
            .into_iter()
            .map(|name| {
                let row: RowValues = [("2023", None::<Scalar>), ("2024", None)].into_iter().collect();
                (name, row)
            })
            .collect()
    }

    fn docs() -> Vec<SourceDocument> {
        vec![SourceDocument::new(
            "annual_report.pdf",
            "Revenue was 100 in 2023 and 150 in 2024.",
        )]
    }

    fn extractor(llm: MockProvider) -> Extractor<MockProvider> {
        Extractor::new(llm, ExtractorConfig::default()).unwrap()
    }

    fn number(record: &NormalizedRecord, row: &str, col: &str) -> Option<f64> {
        record
            .get(row)?
            .get(col)?
            .as_ref()
            .and_then(Scalar::as_f64)
    }

    #[tokio::test]
    async fn test_full_extraction_flow() {
        let llm = MockProvider::new(
            r#"{"financial_data":[{"row_name":"Revenue","values":{"2023":100,"2024":150}}]}"#,
        );
        let outcome = extractor(llm)
            .extract(&revenue_template(), &docs())
            .await
            .unwrap();

        assert_eq!(outcome.source, ExtractionSource::Model);
        assert_eq!(number(&outcome.record, "Revenue", "2023"), Some(100.0));
        assert_eq!(number(&outcome.record, "Revenue", "2024"), Some(150.0));
    }

    #[tokio::test]
    async fn test_empty_response_falls_back_to_placeholder() {
        let llm = MockProvider::new("");
        let outcome = extractor(llm)
            .extract(&revenue_template(), &docs())
            .await
            .unwrap();

        assert_eq!(
            outcome.source,
            ExtractionSource::Placeholder(FallbackReason::EmptyResponse)
        );
        assert_eq!(number(&outcome.record, "Revenue", "2023"), Some(100.0));
        let generated = number(&outcome.record, "Revenue", "2024").unwrap();
        assert!((0.0..=1_000_000.0).contains(&generated));
    }

    #[tokio::test]
    async fn test_extraction_with_invalid_json() {
        let llm = MockProvider::new("This is not JSON");
        let outcome = extractor(llm)
            .extract(&revenue_template(), &docs())
            .await
            .unwrap();

        assert_eq!(
            outcome.source,
            ExtractionSource::Placeholder(FallbackReason::SchemaViolation)
        );
        assert_eq!(outcome.record.null_count(), 0);
    }

    #[tokio::test]
    async fn test_no_documents_skips_model() {
        let llm = MockProvider::new("{}");
        let handle = llm.clone();
        let outcome = extractor(llm)
            .extract(&revenue_template(), &[])
            .await
            .unwrap();

        assert_eq!(
            outcome.source,
            ExtractionSource::Placeholder(FallbackReason::NoDocuments)
        );
        assert_eq!(handle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failures_fall_back() {
        let cases = [
            (LlmError::Communication("refused".into()), FallbackReason::Network),
            (LlmError::RateLimitExceeded, FallbackReason::Network),
            (LlmError::EmptyResponse, FallbackReason::EmptyResponse),
            (
                LlmError::ModelNotAvailable("gemini-x".into()),
                FallbackReason::ProviderUnavailable,
            ),
            (
                LlmError::InvalidResponse("truncated".into()),
                FallbackReason::SchemaViolation,
            ),
        ];

        for (error, reason) in cases {
            let outcome = extractor(MockProvider::failing(error))
                .extract(&revenue_template(), &docs())
                .await
                .unwrap();
            assert_eq!(outcome.source, ExtractionSource::Placeholder(reason));
            assert_eq!(outcome.record.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_output_rows_match_template_rows() {
        let template = multi_row_template();
        let responses = [
            r#"{"financial_data":[]}"#,
            r#"{"financial_data":[{"row_name":"Revenue","values":{"2024":1}}]}"#,
            r#"{"financial_data":[{"row_name":"Made up","values":{"2024":1}},{"row_name":"Net income","values":null}]}"#,
            "not json",
        ];

        for response in responses {
            let outcome = extractor(MockProvider::new(response))
                .extract(&template, &docs())
                .await
                .unwrap();
            assert_eq!(
                outcome.record.row_names().collect::<Vec<_>>(),
                template.row_names().collect::<Vec<_>>(),
                "row set changed for response {}",
                response
            );
            let template_columns = template.column_names();
            assert!(outcome
                .record
                .column_names()
                .iter()
                .all(|col| template_columns.contains(col)));
        }
    }

    #[tokio::test]
    async fn test_context_budget_reaches_prompt() {
        let mut llm = MockProvider::new(r#"{"financial_data":[]}"#);
        let config = ExtractorConfig {
            max_context_chars: 10,
            ..Default::default()
        };
        let documents = vec![SourceDocument::new("a.txt", "x".repeat(100))];
        let record = revenue_template();

        // Only the exact truncated prompt gets the real answer
        let prompt = crate::PromptBuilder::new(record.row_names(), &documents, 10).build();
        llm.add_response(
            prompt,
            r#"{"financial_data":[{"row_name":"Revenue","values":{"2024":5}}]}"#,
        );

        let extractor = Extractor::new(llm, config).unwrap();
        let outcome = extractor.extract(&record, &documents).await.unwrap();
        assert_eq!(number(&outcome.record, "Revenue", "2024"), Some(5.0));
    }

    #[tokio::test]
    async fn test_empty_record_with_open_schema() {
        let llm = MockProvider::new(r#"{"financial_data":[]}"#);
        let handle = llm.clone();
        let outcome = extractor(llm)
            .extract(&NormalizedRecord::new(), &docs())
            .await
            .unwrap();

        assert!(outcome.record.is_empty());
        let schema: serde_json::Value =
            serde_json::from_str(&handle.last_schema().unwrap()).unwrap();
        assert_eq!(
            schema,
            serde_json::json!({"type": "OBJECT", "properties": {}, "nullable": true})
        );
    }
}
