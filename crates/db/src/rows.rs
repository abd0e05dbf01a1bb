//! Decoded result sets and row projections.

use crate::wire::StmtResult;
use serde_json::Value;
use std::collections::HashMap;

/// The decoded result of one statement.
///
/// Holds the column names, the rows as bare JSON values (type envelopes
/// already unwrapped), and the affected-row count for writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    cols: Vec<String>,
    rows: Vec<Vec<Value>>,
    affected_row_count: u64,
}

impl ResultSet {
    pub(crate) fn from_wire(result: StmtResult) -> Self {
        let cols = result
            .cols
            .iter()
            .enumerate()
            .map(|(i, col)| col.name.clone().unwrap_or_else(|| format!("col{i}")))
            .collect();
        let rows = result
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(|c| c.value).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self {
            cols,
            rows,
            affected_row_count: result.affected_row_count,
        }
    }

    /// Column names in statement order. Missing names come back as `col{i}`.
    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    pub fn affected_row_count(&self) -> u64 {
        self.affected_row_count
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Project into name-to-value mappings.
    ///
    /// Duplicate column names collapse last-write-wins, standard mapping
    /// semantics. Callers that need every cell of an ambiguous result should
    /// use [`ResultSet::into_tuples`] instead.
    pub fn into_rows(self) -> Vec<Row> {
        let cols = self.cols;
        self.rows
            .into_iter()
            .map(|row| cols.iter().cloned().zip(row).collect())
            .collect()
    }

    /// Project into positional tuples, one `Vec` per row.
    pub fn into_tuples(self) -> Vec<Vec<Value>> {
        self.rows
    }
}

/// One result row as a column-name-to-value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(HashMap<String, Value>);

impl Row {
    /// The bare value for a column, if present.
    pub fn get(&self, col: &str) -> Option<&Value> {
        self.0.get(col)
    }

    /// Integer accessor. The remote store serializes 64-bit integers as JSON
    /// strings, so numeric strings are accepted too.
    pub fn i64(&self, col: &str) -> Option<i64> {
        match self.get(col)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn f64(&self, col: &str) -> Option<f64> {
        match self.get(col)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn text(&self, col: &str) -> Option<&str> {
        self.get(col)?.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
