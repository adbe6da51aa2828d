//! SchemeStore: named, immutable snapshots of filter conditions
use tracing::{debug, info, trace};

use crate::core::models::{FilterCondition, FilterScheme};
use crate::core::types::SchemeId;
use crate::error::ValidationError;
use crate::services::filter_conditions::FilterConditionStore;

/// Name given to the regenerated default scheme
pub const DEFAULT_SCHEME_NAME: &str = "Default";

/// Schemes of one view session: the default scheme first, then user schemes
/// in creation order
#[derive(Debug, Clone)]
pub struct SchemeStore {
    default: FilterScheme,
    saved: Vec<FilterScheme>,
    active: SchemeId,
}

impl SchemeStore {
    /// Seed the store with a default scheme built from `defaults`
    pub fn new(defaults: Vec<FilterCondition>) -> Self {
        let default = default_scheme(defaults);
        let active = default.id;
        Self {
            default,
            saved: Vec::new(),
            active,
        }
    }

    /// Regenerate the default scheme and point the active scheme at it
    ///
    /// The default keeps its id so repeated resets converge on the same state.
    /// User schemes live for the whole session and are kept.
    pub fn reset(&mut self, defaults: Vec<FilterCondition>) {
        let id = self.default.id;
        self.default = FilterScheme {
            id,
            ..default_scheme(defaults)
        };
        self.active = id;
        debug!("Regenerated default scheme {}", self.default.id);
    }

    /// Snapshot `conditions` under `name` and make it the active scheme
    ///
    /// Names need not be unique; schemes are identified by id.
    pub fn save(
        &mut self,
        name: &str,
        conditions: &[FilterCondition],
    ) -> Result<FilterScheme, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankSchemeName);
        }
        let scheme = FilterScheme {
            id: SchemeId::new(),
            name: name.to_string(),
            conditions: conditions.to_vec(),
            is_default: false,
        };
        self.saved.push(scheme.clone());
        self.active = scheme.id;
        info!("Saved scheme '{}' ({})", scheme.name, scheme.id);
        Ok(scheme)
    }

    /// Restore the scheme `id` into `store` and mark it active
    ///
    /// Unknown ids leave both the store and the active pointer untouched.
    pub fn apply(&mut self, id: &SchemeId, store: &mut FilterConditionStore) -> bool {
        let Some(scheme) = self.get(id) else {
            trace!("apply ignored for unknown scheme {}", id);
            return false;
        };
        store.replace_all(scheme.conditions.clone());
        info!("Applied scheme '{}' ({})", scheme.name, scheme.id);
        self.active = *id;
        true
    }

    /// Delete a user scheme; the default scheme cannot be deleted
    pub fn delete(&mut self, id: &SchemeId) -> bool {
        let Some(idx) = self.saved.iter().position(|s| s.id == *id) else {
            trace!("delete ignored for scheme {}", id);
            return false;
        };
        let removed = self.saved.remove(idx);
        if self.active == removed.id {
            self.active = self.default.id;
        }
        debug!("Deleted scheme '{}' ({})", removed.name, removed.id);
        true
    }

    pub fn get(&self, id: &SchemeId) -> Option<&FilterScheme> {
        if self.default.id == *id {
            return Some(&self.default);
        }
        self.saved.iter().find(|s| s.id == *id)
    }

    /// Default scheme first, then user schemes in creation order
    pub fn list(&self) -> Vec<&FilterScheme> {
        std::iter::once(&self.default).chain(self.saved.iter()).collect()
    }

    pub fn default_scheme(&self) -> &FilterScheme {
        &self.default
    }

    pub fn active_id(&self) -> SchemeId {
        self.active
    }

    pub fn active(&self) -> &FilterScheme {
        self.get(&self.active).unwrap_or(&self.default)
    }
}

fn default_scheme(conditions: Vec<FilterCondition>) -> FilterScheme {
    FilterScheme {
        id: SchemeId::new(),
        name: DEFAULT_SCHEME_NAME.to_string(),
        conditions,
        is_default: true,
    }
}
