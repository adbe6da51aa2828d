//! ViewSession: owner of one view's filter, scheme and column stores
use std::sync::Arc;

use color_eyre::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::action::Action;
use crate::core::models::{ColumnConfig, FilterCondition, FilterScheme};
use crate::core::registry::FilterFieldRegistry;
use crate::core::types::{SchemeId, ViewKey};
use crate::error::ValidationError;
use crate::services::column_config::ColumnConfigStore;
use crate::services::drag_reorder::DragReorderController;
use crate::services::filter_conditions::FilterConditionStore;
use crate::services::predicate::RowPredicate;
use crate::services::schemes::SchemeStore;

/// State of one view, built by [`ViewSession::open`] and owned by the host page
///
/// Nothing is shared between sessions except the read-only registry, so two
/// views can never see each other's filters or layouts.
#[derive(Debug, Clone)]
pub struct ViewSession {
    registry: Arc<FilterFieldRegistry>,
    view: ViewKey,
    conditions: FilterConditionStore,
    schemes: SchemeStore,
    columns: ColumnConfigStore,
    column_drag: DragReorderController<String>,
    field_drag: DragReorderController<String>,
}

impl ViewSession {
    pub fn open(registry: Arc<FilterFieldRegistry>, view: ViewKey) -> Self {
        if !registry.contains_view(&view) {
            debug!("Opening session for uncatalogued view '{}'", view);
        }
        let conditions = FilterConditionStore::new(registry.clone(), view.clone());
        let schemes = SchemeStore::new(conditions.snapshot());
        let columns = ColumnConfigStore::new(registry.clone(), view.clone());
        Self {
            registry,
            view,
            conditions,
            schemes,
            columns,
            column_drag: DragReorderController::new(),
            field_drag: DragReorderController::new(),
        }
    }

    /// Discard every store and rebuild them for `view`
    pub fn switch_view(&mut self, view: ViewKey) {
        info!("Switching view '{}' -> '{}'", self.view, view);
        *self = Self::open(self.registry.clone(), view);
    }

    /// Restore default conditions and point the active scheme at the
    /// regenerated default scheme
    pub fn reset(&mut self) {
        self.field_drag.drag_end();
        self.conditions.reset(self.view.clone());
        self.schemes.reset(self.conditions.snapshot());
    }

    pub fn view(&self) -> &ViewKey {
        &self.view
    }

    pub fn registry(&self) -> &FilterFieldRegistry {
        &self.registry
    }

    pub fn conditions(&self) -> &FilterConditionStore {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut FilterConditionStore {
        &mut self.conditions
    }

    pub fn schemes(&self) -> &SchemeStore {
        &self.schemes
    }

    pub fn columns(&self) -> &ColumnConfigStore {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnConfigStore {
        &mut self.columns
    }

    pub fn column_drag(&self) -> &DragReorderController<String> {
        &self.column_drag
    }

    pub fn field_drag(&self) -> &DragReorderController<String> {
        &self.field_drag
    }

    /// Snapshot the live conditions as a new scheme
    pub fn save_scheme(&mut self, name: &str) -> Result<FilterScheme, ValidationError> {
        self.schemes.save(name, self.conditions.conditions())
    }

    pub fn apply_scheme(&mut self, id: &SchemeId) -> bool {
        self.schemes.apply(id, &mut self.conditions)
    }

    pub fn delete_scheme(&mut self, id: &SchemeId) -> bool {
        self.schemes.delete(id)
    }

    /// Row predicate of the current filter panel
    pub fn predicate(&self) -> RowPredicate {
        RowPredicate::from_conditions(self.conditions.conditions())
    }

    /// Dispatch a host command
    ///
    /// Returns Ok(true) if state changed, Ok(false) for a no-op, and Err for
    /// rejected input (blank scheme name, value that does not fit its field).
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        debug!("{}: {}", self.view, action);
        let changed = match action {
            Action::SetMode { key, mode } => self.conditions.set_mode(&key, mode),
            Action::SetValue { key, value } => self.conditions.set_value(&key, value)?,
            Action::SetValueText { key, text } => self.conditions.set_value_text(&key, &text)?,
            Action::SetVisibility { key, visible } => self.conditions.set_visibility(&key, visible),
            Action::ClearValues => {
                let before = self.conditions.snapshot();
                self.conditions.clear_values();
                before != self.conditions.snapshot()
            }
            Action::Reset => {
                self.reset();
                true
            }
            Action::SaveScheme { name } => {
                self.save_scheme(&name)?;
                true
            }
            Action::ApplyScheme { id } => self.apply_scheme(&id),
            Action::ApplySchemeNamed { name } => {
                let id = self
                    .schemes
                    .list()
                    .iter()
                    .rev()
                    .find(|s| s.name == name)
                    .map(|s| s.id);
                match id {
                    Some(id) => self.apply_scheme(&id),
                    None => false,
                }
            }
            Action::DeleteScheme { id } => self.delete_scheme(&id),
            Action::ToggleColumn { key, visible } => self.columns.toggle(&key, visible),
            Action::SelectAllColumns => self.columns.select_all(),
            Action::ClearAllColumns => self.columns.clear_all(),
            Action::ReorderColumn { key, before } => self.columns.reorder(&key, &before),
            Action::ResetColumns => {
                self.column_drag.drag_end();
                self.columns.reset()
            }
            Action::ColumnDragStart { key } => {
                self.column_drag.drag_start(key);
                false
            }
            Action::ColumnDragOver { key } => {
                self.column_drag.drag_over(key);
                false
            }
            Action::ColumnDrop => self.column_drag.drop_on(&mut self.columns).is_moved(),
            Action::ColumnDragEnd => {
                self.column_drag.drag_end();
                false
            }
            Action::FieldDragStart { key } => {
                self.field_drag.drag_start(key);
                false
            }
            Action::FieldDragOver { key } => {
                self.field_drag.drag_over(key);
                false
            }
            Action::FieldDrop => self.field_drag.drop_on(&mut self.conditions).is_moved(),
            Action::FieldDragEnd => {
                self.field_drag.drag_end();
                false
            }
            Action::SwitchView { view } => {
                self.switch_view(view);
                true
            }
        };
        Ok(changed)
    }

    /// Serializable read model of the session
    pub fn summary(&self) -> SessionSummary {
        let active = self.schemes.active_id();
        SessionSummary {
            view: self.view.clone(),
            visible_conditions: self.conditions.get_visible(),
            active_conditions: self.conditions.active_count(),
            schemes: self
                .schemes
                .list()
                .into_iter()
                .map(|s| SchemeSummary {
                    id: s.id,
                    name: s.name.clone(),
                    is_default: s.is_default,
                    active: s.id == active,
                    visible_conditions: s.visible_count(),
                })
                .collect(),
            visible_columns: self.columns.visible_columns().into_iter().cloned().collect(),
        }
    }
}

/// What a host page (or the CLI) needs to render a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub view: ViewKey,
    pub visible_conditions: Vec<FilterCondition>,
    pub active_conditions: usize,
    pub schemes: Vec<SchemeSummary>,
    pub visible_columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSummary {
    pub id: SchemeId,
    pub name: String,
    pub is_default: bool,
    pub active: bool,
    pub visible_conditions: usize,
}
