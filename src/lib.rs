#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

pub mod action;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod services;

// Re-export commonly used types
pub use action::{Action, ActionCategory};
pub use self::core::{FieldType, FilterCondition, FilterFieldRegistry, FilterMode, FilterValue, SchemeId, ViewKey};
pub use services::{ColumnConfigStore, DragReorderController, FilterConditionStore, RowPredicate, SchemeStore, ViewSession};
