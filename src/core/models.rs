use crate::core::types::{FieldType, FilterMode, SchemeId};
use crate::error::ValueError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a select field's closed option set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Catalog entry for one filterable field of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterFieldConfig {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Start/end placeholders of a date range input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_placeholder: Option<[String; 2]>,
}

impl FilterFieldConfig {
    /// Start/end placeholders, falling back to generic labels
    pub fn range_placeholders(&self) -> (&str, &str) {
        match &self.range_placeholder {
            Some([start, end]) => (start.as_str(), end.as_str()),
            None => ("Start date", "End date"),
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Check that a value fits this field's type and option set
    pub fn check_value(&self, value: &FilterValue) -> Result<(), ValueError> {
        let Some(found) = value.field_type() else {
            return Ok(());
        };
        if found != self.field_type {
            return Err(ValueError::TypeMismatch {
                key: self.key.clone(),
                expected: self.field_type,
                found,
            });
        }
        match value {
            FilterValue::Select(v) if !self.has_option(v) => {
                // a batch list holds several declared options
                match split_batch(v).find(|token| !self.has_option(token)) {
                    Some(token) => Err(ValueError::UnknownOption {
                        key: self.key.clone(),
                        value: token.to_string(),
                    }),
                    None if split_batch(v).next().is_none() => Err(ValueError::UnknownOption {
                        key: self.key.clone(),
                        value: v.clone(),
                    }),
                    None => Ok(()),
                }
            }
            FilterValue::DateRange {
                from: Some(from),
                to: Some(to),
            } if from > to => Err(ValueError::InvertedRange {
                key: self.key.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Parse raw text input into a typed value for this field
    ///
    /// Blank input yields `FilterValue::Empty`. Date ranges are written as
    /// `YYYY-MM-DD..YYYY-MM-DD`; either side may be left open.
    pub fn parse_value(&self, raw: &str) -> Result<FilterValue, ValueError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(FilterValue::Empty);
        }
        let unparsable = || ValueError::Unparsable {
            key: self.key.clone(),
            raw: raw.to_string(),
            expected: self.field_type,
        };
        let value = match self.field_type {
            FieldType::Text => FilterValue::Text(trimmed.to_string()),
            FieldType::Select => FilterValue::Select(trimmed.to_string()),
            FieldType::Number => FilterValue::Number(trimmed.parse::<f64>().map_err(|_| unparsable())?),
            FieldType::DateRange => {
                let (from, to) = trimmed.split_once("..").ok_or_else(unparsable)?;
                let parse_bound = |s: &str| -> Result<Option<NaiveDate>, ValueError> {
                    let s = s.trim();
                    if s.is_empty() {
                        Ok(None)
                    } else {
                        NaiveDate::parse_from_str(s, "%Y-%m-%d")
                            .map(Some)
                            .map_err(|_| unparsable())
                    }
                };
                FilterValue::DateRange {
                    from: parse_bound(from)?,
                    to: parse_bound(to)?,
                }
            }
        };
        self.check_value(&value)?;
        Ok(value)
    }
}

/// Tokens of a BATCH list, split on commas, semicolons and whitespace
pub fn split_batch(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

/// Value of a filter condition, tagged by the field type it belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FilterValue {
    #[default]
    Empty,
    Text(String),
    Select(String),
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Number(f64),
}

impl FilterValue {
    /// Field type this value belongs to; `None` for `Empty`
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Empty => None,
            Self::Text(_) => Some(FieldType::Text),
            Self::Select(_) => Some(FieldType::Select),
            Self::DateRange { .. } => Some(FieldType::DateRange),
            Self::Number(_) => Some(FieldType::Number),
        }
    }

    /// True when the value imposes no constraint
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) | Self::Select(s) => s.trim().is_empty(),
            Self::DateRange { from, to } => from.is_none() && to.is_none(),
            Self::Number(n) => n.is_nan(),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) | Self::Select(s) => write!(f, "{s}"),
            Self::DateRange { from, to } => {
                if let Some(from) = from {
                    write!(f, "{}", from.format("%Y-%m-%d"))?;
                }
                write!(f, "..")?;
                if let Some(to) = to {
                    write!(f, "{}", to.format("%Y-%m-%d"))?;
                }
                Ok(())
            }
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Current mode, value and visibility of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub key: String,
    pub mode: FilterMode,
    pub value: FilterValue,
    pub visible: bool,
}

impl FilterCondition {
    pub fn new(key: impl Into<String>, visible: bool) -> Self {
        Self {
            key: key.into(),
            mode: FilterMode::Equal,
            value: FilterValue::Empty,
            visible,
        }
    }

    /// True when this condition would constrain rows
    pub fn is_active(&self) -> bool {
        self.visible && (!self.mode.requires_value() || !self.value.is_empty())
    }

    /// One-line summary, e.g. `shipCompany equals COSCO`
    pub fn summary(&self) -> String {
        if self.mode.requires_value() {
            format!("{} {} {}", self.key, self.mode.label(), self.value)
        } else {
            format!("{} {}", self.key, self.mode.label())
        }
    }
}

/// Named snapshot of every condition of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterScheme {
    pub id: SchemeId,
    pub name: String,
    pub conditions: Vec<FilterCondition>,
    pub is_default: bool,
}

impl FilterScheme {
    pub fn visible_count(&self) -> usize {
        self.conditions.iter().filter(|c| c.visible).count()
    }
}

/// Catalog entry for one table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
}

/// Column with its current visibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub key: String,
    pub label: String,
    pub visible: bool,
}

/// Everything a view declares: filter fields, columns and their defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCatalog {
    pub fields: Vec<FilterFieldConfig>,
    /// Field keys visible after initialization
    #[serde(default)]
    pub default_visible: Vec<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    /// Column keys visible after a reset
    #[serde(default)]
    pub default_columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn select_field() -> FilterFieldConfig {
        FilterFieldConfig {
            key: "shipCompany".to_string(),
            label: "Ship company".to_string(),
            field_type: FieldType::Select,
            options: ["SITC", "COSCO"]
                .iter()
                .map(|v| SelectOption {
                    label: v.to_string(),
                    value: v.to_string(),
                })
                .collect(),
            placeholder: None,
            range_placeholder: None,
        }
    }

    fn date_field() -> FilterFieldConfig {
        FilterFieldConfig {
            key: "etd".to_string(),
            label: "ETD".to_string(),
            field_type: FieldType::DateRange,
            options: vec![],
            placeholder: None,
            range_placeholder: None,
        }
    }

    #[test]
    fn test_check_value_rejects_mismatched_type() {
        let err = select_field()
            .check_value(&FilterValue::Number(3.0))
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::TypeMismatch {
                key: "shipCompany".to_string(),
                expected: FieldType::Select,
                found: FieldType::Number,
            }
        );
        assert!(select_field().check_value(&FilterValue::Empty).is_ok());
    }

    #[test]
    fn test_check_value_rejects_unknown_option() {
        let field = select_field();
        assert!(field.check_value(&FilterValue::Select("COSCO".into())).is_ok());
        assert!(matches!(
            field.check_value(&FilterValue::Select("EMC".into())),
            Err(ValueError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_select_accepts_option_list() {
        let field = select_field();
        assert_eq!(
            field.parse_value(" SITC, COSCO ").unwrap(),
            FilterValue::Select("SITC, COSCO".into())
        );
        assert!(field.check_value(&FilterValue::Select("SITC;COSCO".into())).is_ok());
        assert_eq!(
            field.check_value(&FilterValue::Select("SITC,EMC".into())),
            Err(ValueError::UnknownOption {
                key: "shipCompany".to_string(),
                value: "EMC".to_string(),
            })
        );
        assert!(field.check_value(&FilterValue::Select(" , ".into())).is_err());
    }

    #[test]
    fn test_parse_date_range() {
        let field = date_field();
        let value = field.parse_value("2024-03-01..2024-03-31").unwrap();
        assert_eq!(
            value,
            FilterValue::DateRange {
                from: NaiveDate::from_ymd_opt(2024, 3, 1),
                to: NaiveDate::from_ymd_opt(2024, 3, 31),
            }
        );
        assert_eq!(value.to_string(), "2024-03-01..2024-03-31");

        let open = field.parse_value("..2024-03-31").unwrap();
        assert_eq!(
            open,
            FilterValue::DateRange {
                from: None,
                to: NaiveDate::from_ymd_opt(2024, 3, 31),
            }
        );
    }

    #[test]
    fn test_parse_date_range_errors() {
        let field = date_field();
        assert!(matches!(
            field.parse_value("2024-03-31..2024-03-01"),
            Err(ValueError::InvertedRange { .. })
        ));
        assert!(matches!(
            field.parse_value("next week"),
            Err(ValueError::Unparsable { .. })
        ));
        assert_eq!(field.parse_value("   ").unwrap(), FilterValue::Empty);
    }

    #[test]
    fn test_condition_summary_and_activity() {
        let mut cond = FilterCondition::new("shipCompany", true);
        assert!(!cond.is_active());
        cond.value = FilterValue::Select("COSCO".into());
        assert!(cond.is_active());
        assert_eq!(cond.summary(), "shipCompany equals COSCO");

        cond.mode = FilterMode::IsEmpty;
        assert_eq!(cond.summary(), "shipCompany is empty");
        cond.visible = false;
        assert!(!cond.is_active());
    }

    #[test]
    fn test_filter_value_serialization_is_tagged() {
        let json = serde_json::to_string(&FilterValue::Text("Ningbo".into())).unwrap();
        assert_eq!(json, r#"{"type":"text","value":"Ningbo"}"#);
        let restored: FilterValue = serde_json::from_str(r#"{"type":"number","value":12.5}"#).unwrap();
        assert_eq!(restored, FilterValue::Number(12.5));
    }
}
