//! Parse model output and reconcile it onto the template rows

use serde_json::Value;
use sheetfill_domain::{NormalizedRecord, RowValues, Scalar};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a response could not be used
#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum ParseError {
    /// Nothing but whitespace or an empty code fence
    #[error("empty response")]
    Empty,

    /// Not JSON, or JSON of the wrong shape
    #[error("{0}")]
    Schema(String),
}

/// Model rows keyed by `row_name`; `None` means the model sent `values: null`
pub(crate) type ModelRows = HashMap<String, Option<RowValues>>;

/// Parse a `{"financial_data": [...]}` response
pub(crate) fn parse_model_response(response: &str) -> Result<ModelRows, ParseError> {
    let json_str = extract_json(response);
    if json_str.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| ParseError::Schema(format!("JSON parse error: {}", e)))?;

    let items = json
        .get("financial_data")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::Schema("Expected a 'financial_data' array".to_string()))?;

    let mut rows = ModelRows::new();
    for (idx, item) in items.iter().enumerate() {
        let (name, values) = parse_row(item).map_err(|e| ParseError::Schema(format!("row {}: {}", idx, e)))?;
        if rows.insert(name.clone(), values).is_some() {
            debug!("Model returned row '{}' more than once, keeping the last", name);
        }
    }
    Ok(rows)
}

/// Strip a surrounding markdown code fence, if any
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line, then the closing fence
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_row(item: &Value) -> Result<(String, Option<RowValues>), String> {
    let obj = item
        .as_object()
        .ok_or_else(|| "row is not a JSON object".to_string())?;

    let name = obj
        .get("row_name")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing or invalid 'row_name'".to_string())?
        .to_string();

    let values = match obj.get("values") {
        Some(Value::Object(map)) => {
            let mut row = RowValues::new();
            for (col, value) in map {
                row.insert(col.clone(), parse_value(value).map_err(|e| format!("'{}': {}", col, e))?);
            }
            Some(row)
        }
        Some(Value::Null) => None,
        Some(_) => return Err("'values' is not an object".to_string()),
        None => return Err("missing 'values'".to_string()),
    };

    Ok((name, values))
}

fn parse_value(value: &Value) -> Result<Option<Scalar>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(|f| Some(Scalar::Number(f)))
            .ok_or_else(|| format!("unrepresentable number {}", n)),
        Value::String(s) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| Some(Scalar::Number(f)))
            .ok_or_else(|| format!("expected a number, got \"{}\"", s)),
        other => Err(format!("expected a number, got {}", other)),
    }
}

/// Lay model rows onto the template's row set
///
/// Every template row appears exactly once in template order:
///
/// - matched (exact name): the template columns the model returned, in
///   template order. Columns the model left out are absent, so the cells
///   they map to are never touched.
/// - sent with `values: null`: no columns at all, the row stays as it is.
/// - omitted by the model: every template column, all null.
///
/// Rows the model invented and columns outside the template are dropped.
pub(crate) fn reconcile(template: &NormalizedRecord, mut model: ModelRows) -> NormalizedRecord {
    let mut filled = NormalizedRecord::new();
    for (name, shape) in template.iter() {
        let row = match model.remove(name) {
            Some(Some(values)) => shape
                .columns()
                .filter_map(|col| values.get(col).map(|value| (col, value.clone())))
                .collect(),
            Some(None) => {
                debug!("Model sent no values for row '{}', leaving it untouched", name);
                RowValues::new()
            }
            None => {
                debug!("Model omitted row '{}'", name);
                RowValues::nulls_like(shape)
            }
        };
        filled.insert(name, row);
    }

    if !model.is_empty() {
        let mut extra: Vec<_> = model.into_keys().collect();
        extra.sort();
        warn!("Ignoring {} rows not in the template: {:?}", extra.len(), extra);
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> NormalizedRecord {
        let mut revenue = RowValues::new();
        revenue.insert("2023", Some(Scalar::Number(100.0)));
        revenue.insert("2024", None);
        let mut costs = RowValues::new();
        costs.insert("2023", None);
        costs.insert("2024", None);

        let mut record = NormalizedRecord::new();
        record.insert("Revenue", revenue);
        record.insert("Costs", costs);
        record
    }

    #[test]
    fn test_parse_valid_response() {
        let response = r#"{"financial_data": [
            {"row_name": "Revenue", "values": {"2023": 100, "2024": 150.5}}
        ]}"#;
        let rows = parse_model_response(response).unwrap();
        let revenue = rows["Revenue"].as_ref().unwrap();
        assert_eq!(revenue.get("2024"), Some(&Some(Scalar::Number(150.5))));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"financial_data\": [{\"row_name\": \"Costs\", \"values\": null}]}\n```";
        let rows = parse_model_response(response).unwrap();
        assert_eq!(rows.get("Costs"), Some(&None));
    }

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json(r#"  {"a": 1} "#), r#"{"a": 1}"#);
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), r#"{"a": 1}"#);
        assert_eq!(extract_json("```json\n```"), "");
    }

    #[test]
    fn test_parse_empty_response() {
        assert_eq!(parse_model_response(""), Err(ParseError::Empty));
        assert_eq!(parse_model_response("  \n "), Err(ParseError::Empty));
        assert_eq!(parse_model_response("```json\n```"), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_model_response("This is not JSON"),
            Err(ParseError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_missing_financial_data() {
        assert!(matches!(
            parse_model_response(r#"{"rows": []}"#),
            Err(ParseError::Schema(_))
        ));
        assert!(matches!(
            parse_model_response(r#"[{"row_name": "Revenue", "values": {}}]"#),
            Err(ParseError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_row_missing_fields() {
        assert!(parse_model_response(r#"{"financial_data": [{"row_name": "Revenue"}]}"#).is_err());
        assert!(parse_model_response(r#"{"financial_data": [{"values": {}}]}"#).is_err());
        assert!(parse_model_response(r#"{"financial_data": [{"row_name": "R", "values": 3}]}"#).is_err());
    }

    #[test]
    fn test_parse_value_coercion() {
        let rows = parse_model_response(
            r#"{"financial_data": [{"row_name": "R", "values": {"a": "1,250.5", "b": null}}]}"#,
        )
        .unwrap();
        let row = rows["R"].as_ref().unwrap();
        assert_eq!(row.get("a"), Some(&Some(Scalar::Number(1250.5))));
        assert_eq!(row.get("b"), Some(&None));

        assert!(parse_model_response(
            r#"{"financial_data": [{"row_name": "R", "values": {"a": "n/a"}}]}"#
        )
        .is_err());
        assert!(parse_model_response(
            r#"{"financial_data": [{"row_name": "R", "values": {"a": true}}]}"#
        )
        .is_err());
    }

    #[test]
    fn test_parse_duplicate_rows_last_wins() {
        let rows = parse_model_response(
            r#"{"financial_data": [
                {"row_name": "R", "values": {"a": 1}},
                {"row_name": "R", "values": {"a": 2}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows["R"].as_ref().unwrap().get("a"), Some(&Some(Scalar::Number(2.0))));
    }

    #[test]
    fn test_reconcile_fills_missing_rows_with_nulls() {
        let model = parse_model_response(
            r#"{"financial_data": [{"row_name": "Revenue", "values": {"2023": 100, "2024": 150}}]}"#,
        )
        .unwrap();
        let filled = reconcile(&template(), model);

        assert_eq!(filled.row_names().collect::<Vec<_>>(), vec!["Revenue", "Costs"]);
        assert_eq!(
            filled.get("Revenue").unwrap().get("2024"),
            Some(&Some(Scalar::Number(150.0)))
        );
        let costs = filled.get("Costs").unwrap();
        assert_eq!(costs.len(), 2);
        assert_eq!(costs.null_count(), 2);
    }

    #[test]
    fn test_reconcile_is_exact_match_only() {
        let model = parse_model_response(
            r#"{"financial_data": [
                {"row_name": "revenue", "values": {"2024": 1}},
                {"row_name": "Invented", "values": {"2024": 2}}
            ]}"#,
        )
        .unwrap();
        let filled = reconcile(&template(), model);

        assert_eq!(filled.len(), 2);
        assert!(!filled.contains_row("Invented"));
        assert!(!filled.contains_row("revenue"));
        assert_eq!(filled.get("Revenue").unwrap().null_count(), 2);
    }

    #[test]
    fn test_reconcile_keeps_only_returned_template_columns() {
        let model = parse_model_response(
            r#"{"financial_data": [{"row_name": "Revenue", "values": {"2030": 9, "2024": 7}}]}"#,
        )
        .unwrap();
        let filled = reconcile(&template(), model);
        let revenue = filled.get("Revenue").unwrap();

        // 2023 was left out by the model, so the template figure is not overwritten
        assert_eq!(revenue.columns().collect::<Vec<_>>(), vec!["2024"]);
        assert_eq!(revenue.get("2023"), None);
        assert_eq!(revenue.get("2024"), Some(&Some(Scalar::Number(7.0))));
    }

    #[test]
    fn test_reconcile_explicit_null_is_kept() {
        let model = parse_model_response(
            r#"{"financial_data": [{"row_name": "Revenue", "values": {"2023": null}}]}"#,
        )
        .unwrap();
        let filled = reconcile(&template(), model);
        assert_eq!(filled.get("Revenue").unwrap().get("2023"), Some(&None));
    }

    #[test]
    fn test_reconcile_null_values_leaves_row_untouched() {
        let model =
            parse_model_response(r#"{"financial_data": [{"row_name": "Revenue", "values": null}]}"#)
                .unwrap();
        let filled = reconcile(&template(), model);

        let revenue = filled.get("Revenue").unwrap();
        assert!(revenue.is_empty());
        // Costs was omitted entirely
        assert_eq!(filled.get("Costs").unwrap().null_count(), 2);
        assert_eq!(filled.row_names().collect::<Vec<_>>(), vec!["Revenue", "Costs"]);
    }
}
