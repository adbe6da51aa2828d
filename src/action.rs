use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::models::FilterValue;
use crate::core::types::{FilterMode, SchemeId, ViewKey};

/// Commands a host page dispatches into a view session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    // Filters
    SetMode { key: String, mode: FilterMode },
    SetValue { key: String, value: FilterValue },
    SetValueText { key: String, text: String },
    SetVisibility { key: String, visible: bool },
    ClearValues,
    Reset,

    // Schemes
    SaveScheme { name: String },
    ApplyScheme { id: SchemeId },
    /// Apply the most recently saved scheme with this name
    ApplySchemeNamed { name: String },
    DeleteScheme { id: SchemeId },

    // Columns
    ToggleColumn { key: String, visible: bool },
    SelectAllColumns,
    ClearAllColumns,
    ReorderColumn { key: String, before: String },
    ResetColumns,

    // Drag
    ColumnDragStart { key: String },
    ColumnDragOver { key: String },
    ColumnDrop,
    ColumnDragEnd,
    FieldDragStart { key: String },
    FieldDragOver { key: String },
    FieldDrop,
    FieldDragEnd,

    // View
    SwitchView { view: ViewKey },
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::SetMode { .. } => "Change a filter's comparison mode",
            Action::SetValue { .. } | Action::SetValueText { .. } => "Change a filter's value",
            Action::SetVisibility { .. } => "Show or hide a filter",
            Action::ClearValues => "Clear all filter values",
            Action::Reset => "Restore default filters",
            Action::SaveScheme { .. } => "Save filters as a scheme",
            Action::ApplyScheme { .. } | Action::ApplySchemeNamed { .. } => "Apply a saved scheme",
            Action::DeleteScheme { .. } => "Delete a saved scheme",
            Action::ToggleColumn { .. } => "Show or hide a column",
            Action::SelectAllColumns => "Show all columns",
            Action::ClearAllColumns => "Hide all columns",
            Action::ReorderColumn { .. } => "Move a column",
            Action::ResetColumns => "Restore default columns",
            Action::ColumnDragStart { .. } | Action::FieldDragStart { .. } => "Pick up for reordering",
            Action::ColumnDragOver { .. } | Action::FieldDragOver { .. } => "Hover a drop target",
            Action::ColumnDrop | Action::FieldDrop => "Drop at the hovered position",
            Action::ColumnDragEnd | Action::FieldDragEnd => "Cancel reordering",
            Action::SwitchView { .. } => "Switch to another view",
        }
    }

    /// Get category for grouping in help text
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::SetMode { .. }
            | Action::SetValue { .. }
            | Action::SetValueText { .. }
            | Action::SetVisibility { .. }
            | Action::ClearValues
            | Action::Reset => ActionCategory::Filters,

            Action::SaveScheme { .. }
            | Action::ApplyScheme { .. }
            | Action::ApplySchemeNamed { .. }
            | Action::DeleteScheme { .. } => ActionCategory::Schemes,

            Action::ToggleColumn { .. }
            | Action::SelectAllColumns
            | Action::ClearAllColumns
            | Action::ReorderColumn { .. }
            | Action::ResetColumns => ActionCategory::Columns,

            Action::ColumnDragStart { .. }
            | Action::ColumnDragOver { .. }
            | Action::ColumnDrop
            | Action::ColumnDragEnd
            | Action::FieldDragStart { .. }
            | Action::FieldDragOver { .. }
            | Action::FieldDrop
            | Action::FieldDragEnd => ActionCategory::Drag,

            Action::SwitchView { .. } => ActionCategory::View,
        }
    }
}

/// Action categories for organizing help text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ActionCategory {
    Filters,
    Schemes,
    Columns,
    Drag,
    View,
}
