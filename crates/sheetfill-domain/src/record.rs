//! Normalized record - the interchange format between conversion stages

use crate::cell::Scalar;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Values of one record row, keyed by column name
///
/// Keeps insertion order. A `None` value is a known column with no value
/// (JSON `null`), which is different from the column being absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowValues(IndexMap<String, Option<Scalar>>);

impl RowValues {
    /// Create an empty row
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Build a row with the same columns as `shape`, every value null
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetfill_domain::{RowValues, Scalar};
    ///
    /// let mut row = RowValues::new();
    /// row.insert("2023", Some(Scalar::Number(100.0)));
    /// let blank = RowValues::nulls_like(&row);
    /// assert_eq!(blank.get("2023"), Some(&None));
    /// ```
    pub fn nulls_like(shape: &RowValues) -> Self {
        shape.columns().map(|c| (c.to_string(), None)).collect()
    }

    /// Set a column value; a later write to the same column wins
    pub fn insert(&mut self, column: impl Into<String>, value: Option<Scalar>) {
        self.0.insert(column.into(), value);
    }

    /// Value for a column: `None` if the column is absent, `Some(None)` if null
    pub fn get(&self, column: &str) -> Option<&Option<Scalar>> {
        self.0.get(column)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate `(column, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Option<Scalar>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable iteration over values
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Option<Scalar>> {
        self.0.values_mut()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of null values
    pub fn null_count(&self) -> usize {
        self.0.values().filter(|v| v.is_none()).count()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Scalar>)> for RowValues {
    fn from_iter<I: IntoIterator<Item = (K, Option<Scalar>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Row identifier → column name → value
///
/// Row identifiers are unique: inserting an existing identifier replaces its
/// values (last write wins) and keeps the position of the first insertion.
/// Serializes as a plain JSON object of objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord(IndexMap<String, RowValues>);

impl NormalizedRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert or replace a row, returning the replaced values
    pub fn insert(&mut self, row: impl Into<String>, values: RowValues) -> Option<RowValues> {
        self.0.insert(row.into(), values)
    }

    /// Values for a row identifier
    pub fn get(&self, row: &str) -> Option<&RowValues> {
        self.0.get(row)
    }

    /// True if the record holds this row identifier
    pub fn contains_row(&self, row: &str) -> bool {
        self.0.contains_key(row)
    }

    /// Row identifiers in insertion order
    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The first row in insertion order
    pub fn first_row(&self) -> Option<(&str, &RowValues)> {
        self.0.first().map(|(k, v)| (k.as_str(), v))
    }

    /// Union of column names across all rows, in first-seen order
    pub fn column_names(&self) -> Vec<String> {
        let mut seen = IndexSet::new();
        for values in self.0.values() {
            for column in values.columns() {
                seen.insert(column.to_string());
            }
        }
        seen.into_iter().collect()
    }

    /// Iterate `(row, values)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate rows with mutable values; identifiers stay fixed
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut RowValues)> {
        self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the record has no rows
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of null cells across all rows
    pub fn null_count(&self) -> usize {
        self.0.values().map(RowValues::null_count).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, RowValues)> for NormalizedRecord {
    fn from_iter<I: IntoIterator<Item = (K, RowValues)>>(iter: I) -> Self {
        let mut record = NormalizedRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for NormalizedRecord {
    type Item = (String, RowValues);
    type IntoIter = indexmap::map::IntoIter<String, RowValues>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(pairs: &[(&str, Option<f64>)]) -> RowValues {
        pairs
            .iter()
            .map(|(k, v)| (*k, v.map(Scalar::Number)))
            .collect()
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut record = NormalizedRecord::new();
        record.insert("Revenue", row(&[("2023", Some(1.0))]));
        record.insert("Costs", row(&[("2023", Some(2.0))]));
        let replaced = record.insert("Revenue", row(&[("2023", Some(3.0))]));

        assert!(replaced.is_some());
        assert_eq!(record.len(), 2);
        assert_eq!(record.row_names().collect::<Vec<_>>(), vec!["Revenue", "Costs"]);
        assert_eq!(
            record.get("Revenue").unwrap().get("2023"),
            Some(&Some(Scalar::Number(3.0)))
        );
    }

    #[test]
    fn test_column_union_first_seen_order() {
        let mut record = NormalizedRecord::new();
        record.insert("A", row(&[("2023", None), ("2024", None)]));
        record.insert("B", row(&[("2024", None), ("2025", None)]));
        assert_eq!(record.column_names(), vec!["2023", "2024", "2025"]);
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = r#"{"Revenue":{"2023":100.0,"2024":null}}"#;
        let record: NormalizedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.null_count(), 1);
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn test_nulls_like_keeps_columns() {
        let shape = row(&[("2023", Some(1.0)), ("2024", Some(2.0))]);
        let blank = RowValues::nulls_like(&shape);
        assert_eq!(blank.columns().collect::<Vec<_>>(), vec!["2023", "2024"]);
        assert_eq!(blank.null_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_nulls_like_matches_shape(
            values in prop::collection::vec(("[a-z0-9]{1,6}", prop::option::of(-1e6f64..1e6)), 0..12)
        ) {
            let shape: RowValues = values
                .iter()
                .map(|(k, v)| (k.clone(), v.map(Scalar::Number)))
                .collect();
            let blank = RowValues::nulls_like(&shape);

            prop_assert_eq!(blank.len(), shape.len());
            prop_assert_eq!(blank.null_count(), shape.len());
            prop_assert!(blank.columns().eq(shape.columns()));
        }
    }
}
