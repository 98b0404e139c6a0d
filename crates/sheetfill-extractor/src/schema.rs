//! Schema synthesis for model responses
//!
//! The schema describes one generic row object (`row_name` plus a `values`
//! map) instead of listing every template row as its own property. Row names
//! reach the model through the prompt.

use serde_json::{json, Map, Value};
use sheetfill_domain::NormalizedRecord;

/// Shape of one row the model must return
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionSchema {
    columns: Vec<String>,
    open: bool,
}

impl ExtractionSchema {
    /// Derive the schema from the first row of `record`
    ///
    /// Rows are assumed to share the same columns; only the first row is
    /// inspected. A record without rows yields an open schema.
    pub fn synthesize(record: &NormalizedRecord) -> Self {
        match record.first_row() {
            Some((_, values)) => Self {
                columns: values.columns().map(str::to_string).collect(),
                open: false,
            },
            None => Self {
                columns: Vec::new(),
                open: true,
            },
        }
    }

    /// Column names each row carries, in template order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True when the schema places no constraint on the response
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Render in the model's response-schema dialect
    pub fn to_response_schema(&self) -> Value {
        if self.open {
            return json!({"type": "OBJECT", "properties": {}, "nullable": true});
        }

        let properties: Map<String, Value> = self
            .columns
            .iter()
            .map(|col| (col.clone(), json!({"type": "NUMBER", "nullable": true})))
            .collect();

        let row = json!({
            "type": "OBJECT",
            "properties": {
                "row_name": {
                    "type": "STRING",
                    "description": "The exact name of the row as requested."
                },
                "values": {
                    "type": "OBJECT",
                    "properties": properties,
                    "required": self.columns,
                    "nullable": true
                }
            },
            "required": ["row_name", "values"]
        });

        json!({
            "type": "OBJECT",
            "properties": {
                "financial_data": {
                    "type": "ARRAY",
                    "items": row
                }
            },
            "required": ["financial_data"]
        })
    }

    /// The response schema as JSON text
    pub fn render(&self) -> String {
        self.to_response_schema().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetfill_domain::{RowValues, Scalar};

    fn row(cols: &[&str]) -> RowValues {
        cols.iter().map(|c| (*c, None::<Scalar>)).collect()
    }

    #[test]
    fn test_synthesize_uses_first_row() {
        let mut record = NormalizedRecord::new();
        record.insert("Revenue", row(&["2023", "2024"]));
        record.insert("Costs", row(&["2022"]));

        let schema = ExtractionSchema::synthesize(&record);
        assert!(!schema.is_open());
        assert_eq!(schema.columns(), ["2023", "2024"]);
    }

    #[test]
    fn test_response_schema_shape() {
        let mut record = NormalizedRecord::new();
        record.insert("Revenue", row(&["2023", "2024"]));

        let value = ExtractionSchema::synthesize(&record).to_response_schema();
        let items = &value["properties"]["financial_data"]["items"];
        assert_eq!(value["properties"]["financial_data"]["type"], "ARRAY");
        assert_eq!(items["properties"]["row_name"]["type"], "STRING");

        let values = &items["properties"]["values"];
        assert_eq!(values["nullable"], true);
        assert_eq!(values["properties"]["2024"]["type"], "NUMBER");
        assert_eq!(values["properties"]["2024"]["nullable"], true);
        assert_eq!(values["required"], json!(["2023", "2024"]));
        assert_eq!(value["required"], json!(["financial_data"]));
    }

    #[test]
    fn test_row_names_are_not_schema_properties() {
        let mut record = NormalizedRecord::new();
        record.insert("Revenue", row(&["2023"]));
        assert!(!ExtractionSchema::synthesize(&record).render().contains("Revenue"));
    }

    #[test]
    fn test_empty_record_gives_open_schema() {
        let schema = ExtractionSchema::synthesize(&NormalizedRecord::new());
        assert!(schema.is_open());
        assert_eq!(
            schema.to_response_schema(),
            json!({"type": "OBJECT", "properties": {}, "nullable": true})
        );
    }

    #[test]
    fn test_row_without_columns_is_not_open() {
        let mut record = NormalizedRecord::new();
        record.insert("Revenue", RowValues::new());
        let schema = ExtractionSchema::synthesize(&record);
        assert!(!schema.is_open());
        assert!(schema.columns().is_empty());
    }
}
