//! RowPredicate: evaluates filter conditions against table rows
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::models::{FilterCondition, FilterValue, split_batch};
use crate::core::types::FilterMode;

/// Conjunction of the constraining conditions of a filter panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPredicate {
    conditions: Vec<FilterCondition>,
}

impl RowPredicate {
    /// Keep the visible conditions that constrain rows
    ///
    /// A value-bearing mode with an empty value imposes no constraint.
    pub fn from_conditions(conditions: &[FilterCondition]) -> Self {
        Self {
            conditions: conditions.iter().filter(|c| c.is_active()).cloned().collect(),
        }
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// True when no condition constrains rows
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate against one row's cells (column key -> display text)
    pub fn evaluate_row(&self, row_data: &BTreeMap<String, String>) -> bool {
        self.conditions.iter().all(|cond| {
            let cell = row_data.get(&cond.key).map(|s| s.as_str()).unwrap_or("");
            evaluate_condition(cond, cell)
        })
    }

    /// Indices of the rows that match
    pub fn filter_rows(&self, rows: &[BTreeMap<String, String>]) -> Vec<usize> {
        rows.iter()
            .enumerate()
            .filter(|(_, row)| self.evaluate_row(row))
            .map(|(idx, _)| idx)
            .collect()
    }
}

fn evaluate_condition(cond: &FilterCondition, cell: &str) -> bool {
    let cell = cell.trim();
    match cond.mode {
        FilterMode::IsEmpty => cell.is_empty(),
        FilterMode::IsNotEmpty => !cell.is_empty(),
        FilterMode::Equal => equals(&cond.value, cell),
        FilterMode::NotEqual => !equals(&cond.value, cell),
        FilterMode::Contains => contains(&cond.value, cell),
        FilterMode::NotContains => !contains(&cond.value, cell),
        FilterMode::Batch => {
            let cell = fold(cell);
            batch_tokens(&cond.value).iter().any(|token| fold(token) == cell)
        }
    }
}

fn equals(value: &FilterValue, cell: &str) -> bool {
    match value {
        FilterValue::Empty => true,
        FilterValue::Text(v) | FilterValue::Select(v) => fold(v) == fold(cell),
        FilterValue::Number(n) => cell
            .parse::<f64>()
            .map(|c| (c - n).abs() < f64::EPSILON)
            .unwrap_or(false),
        FilterValue::DateRange { from, to } => match parse_cell_date(cell) {
            Some(date) => from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t),
            None => false,
        },
    }
}

fn contains(value: &FilterValue, cell: &str) -> bool {
    match value {
        FilterValue::Text(v) | FilterValue::Select(v) => fold(cell).contains(&fold(v)),
        other => equals(other, cell),
    }
}

/// Case folding shared by every text comparison
fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Tokens of a batch value
fn batch_tokens(value: &FilterValue) -> Vec<String> {
    match value {
        FilterValue::Empty => Vec::new(),
        FilterValue::Text(v) | FilterValue::Select(v) => split_batch(v).map(str::to_string).collect(),
        other => vec![other.to_string()],
    }
}

/// Read a `YYYY-MM-DD` date from the start of a cell (timestamps included)
fn parse_cell_date(cell: &str) -> Option<NaiveDate> {
    let prefix = cell.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}
