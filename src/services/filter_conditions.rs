//! FilterConditionStore: mode, value and visibility per field of the active view
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::models::{FilterCondition, FilterValue};
use crate::core::registry::FilterFieldRegistry;
use crate::core::types::{FilterMode, ViewKey};
use crate::error::ValueError;
use crate::services::drag_reorder::KeySequence;

/// Holds exactly one condition per field declared by the active view
///
/// Hidden fields are kept, not dropped. Operations naming an unknown key are
/// silent no-ops.
#[derive(Debug, Clone)]
pub struct FilterConditionStore {
    registry: Arc<FilterFieldRegistry>,
    view: ViewKey,
    conditions: Vec<FilterCondition>,
}

impl FilterConditionStore {
    /// Create a store initialized for `view`
    pub fn new(registry: Arc<FilterFieldRegistry>, view: ViewKey) -> Self {
        let conditions = default_conditions(&registry, &view);
        Self {
            registry,
            view,
            conditions,
        }
    }

    /// Replace the whole store with the declared defaults of `view`
    pub fn initialize(&mut self, view: ViewKey) {
        self.conditions = default_conditions(&self.registry, &view);
        debug!(
            "Initialized {} filter conditions for view '{}'",
            self.conditions.len(),
            view
        );
        self.view = view;
    }

    /// Same as [`initialize`](Self::initialize); the scheme side of a reset is
    /// handled by `ViewSession::reset`
    pub fn reset(&mut self, view: ViewKey) {
        self.initialize(view);
    }

    pub fn view(&self) -> &ViewKey {
        &self.view
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn get(&self, key: &str) -> Option<&FilterCondition> {
        self.conditions.iter().find(|c| c.key == key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut FilterCondition> {
        let found = self.conditions.iter_mut().find(|c| c.key == key);
        if found.is_none() {
            trace!("No condition '{}' in view '{}'", key, self.view);
        }
        found
    }

    /// Change the comparison mode; the value is retained in every mode
    pub fn set_mode(&mut self, key: &str, mode: FilterMode) -> bool {
        match self.get_mut(key) {
            Some(cond) if cond.mode != mode => {
                cond.mode = mode;
                true
            }
            _ => false,
        }
    }

    /// Change the value of a condition
    ///
    /// No-op while the condition is in `IS_EMPTY`/`IS_NOT_EMPTY` or when the key is
    /// unknown; the value is not validated then. A stored value must fit the field.
    pub fn set_value(&mut self, key: &str, value: FilterValue) -> Result<bool, ValueError> {
        if !self.accepts_value(key) {
            return Ok(false);
        }
        if let Some(field) = self.registry.get_field(&self.view, key) {
            field.check_value(&value)?;
        }
        Ok(match self.get_mut(key) {
            Some(cond) if cond.value != value => {
                cond.value = value;
                true
            }
            _ => false,
        })
    }

    /// Parse raw text input for the field and set it as the value
    pub fn set_value_text(&mut self, key: &str, raw: &str) -> Result<bool, ValueError> {
        if !self.accepts_value(key) {
            return Ok(false);
        }
        let Some(field) = self.registry.get_field(&self.view, key) else {
            return Ok(false);
        };
        let value = field.parse_value(raw)?;
        self.set_value(key, value)
    }

    /// Whether `key` names a declared field whose mode takes a value
    fn accepts_value(&self, key: &str) -> bool {
        match self.get(key) {
            Some(cond) if cond.mode.requires_value() => {
                self.registry.get_field(&self.view, key).is_some()
            }
            Some(cond) => {
                trace!("value ignored for '{}' in mode {}", key, cond.mode);
                false
            }
            None => {
                trace!("value ignored for unknown field '{}'", key);
                false
            }
        }
    }

    /// Show or hide a condition in the filter panel; mode and value are kept
    pub fn set_visibility(&mut self, key: &str, visible: bool) -> bool {
        match self.get_mut(key) {
            Some(cond) if cond.visible != visible => {
                cond.visible = visible;
                true
            }
            _ => false,
        }
    }

    /// Clear every value and mode, keeping visibility and field order
    pub fn clear_values(&mut self) {
        for cond in &mut self.conditions {
            cond.mode = FilterMode::Equal;
            cond.value = FilterValue::Empty;
        }
    }

    /// Visible conditions in field order
    pub fn get_visible(&self) -> Vec<FilterCondition> {
        self.conditions.iter().filter(|c| c.visible).cloned().collect()
    }

    /// Number of conditions that currently constrain rows
    pub fn active_count(&self) -> usize {
        self.conditions.iter().filter(|c| c.is_active()).count()
    }

    /// Deep copy of every condition, in field order
    pub fn snapshot(&self) -> Vec<FilterCondition> {
        self.conditions.clone()
    }

    /// Replace every condition at once (scheme restore)
    pub fn replace_all(&mut self, conditions: Vec<FilterCondition>) {
        self.conditions = conditions;
    }
}

impl KeySequence for FilterConditionStore {
    type Key = String;

    fn key_order(&self) -> Vec<String> {
        self.conditions.iter().map(|c| c.key.clone()).collect()
    }

    fn commit_order(&mut self, order: Vec<String>) {
        let mut remaining = std::mem::take(&mut self.conditions);
        let mut reordered = Vec::with_capacity(remaining.len());
        for key in &order {
            if let Some(idx) = remaining.iter().position(|c| &c.key == key) {
                reordered.push(remaining.remove(idx));
            }
        }
        // keys missing from `order` keep their relative place at the end
        reordered.extend(remaining);
        self.conditions = reordered;
    }
}

/// One condition per declared field: mode EQUAL, empty value, default visibility
pub fn default_conditions(registry: &FilterFieldRegistry, view: &ViewKey) -> Vec<FilterCondition> {
    let visible = registry.default_visible(view);
    registry
        .get_fields(view)
        .iter()
        .map(|f| FilterCondition::new(f.key.clone(), visible.contains(&f.key)))
        .collect()
}
