use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Key of a view (one tab or screen, e.g. "fcl" or "precarriage")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewKey(String);

impl ViewKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for filter schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemeId(Uuid);

impl SchemeId {
    /// Create a new unique scheme ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the ID as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SchemeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SchemeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s).map_err(|e| e.to_string())?))
    }
}

/// Input type of a filterable field; binds the rendering contract downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FieldType {
    Text,
    Select,
    DateRange,
    Number,
}

impl FieldType {
    /// Modes a rendering layer should offer for this field type
    pub fn supported_modes(&self) -> &'static [FilterMode] {
        match self {
            Self::Text => FilterMode::all(),
            Self::Select => &[
                FilterMode::Equal,
                FilterMode::NotEqual,
                FilterMode::IsEmpty,
                FilterMode::IsNotEmpty,
                FilterMode::Batch,
            ],
            Self::DateRange | Self::Number => &[
                FilterMode::Equal,
                FilterMode::NotEqual,
                FilterMode::IsEmpty,
                FilterMode::IsNotEmpty,
            ],
        }
    }
}

/// Comparison mode of a filter condition
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterMode {
    #[default]
    Equal,
    NotEqual,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
    Batch,
}

impl FilterMode {
    /// Display label for the mode selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equal => "equals",
            Self::NotEqual => "not equal",
            Self::Contains => "contains",
            Self::NotContains => "does not contain",
            Self::IsEmpty => "is empty",
            Self::IsNotEmpty => "is not empty",
            Self::Batch => "batch",
        }
    }

    /// Returns true if this mode compares against the condition's value
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }

    /// All modes in display order
    pub fn all() -> &'static [FilterMode] {
        &[
            Self::Equal,
            Self::NotEqual,
            Self::Contains,
            Self::NotContains,
            Self::IsEmpty,
            Self::IsNotEmpty,
            Self::Batch,
        ]
    }
}
