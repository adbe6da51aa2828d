//! ColumnConfigStore: visibility and display order of a view's table columns
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::models::{ColumnConfig, ColumnDef};
use crate::core::registry::FilterFieldRegistry;
use crate::core::types::ViewKey;
use crate::services::drag_reorder::{move_before, KeySequence};

/// Column layout of the active view
///
/// `order` is always a permutation of every column key; visibility never moves
/// a column, so a hidden column re-appears in its old slot.
#[derive(Debug, Clone)]
pub struct ColumnConfigStore {
    registry: Arc<FilterFieldRegistry>,
    view: ViewKey,
    columns: Vec<ColumnConfig>,
    order: Vec<String>,
}

impl ColumnConfigStore {
    pub fn new(registry: Arc<FilterFieldRegistry>, view: ViewKey) -> Self {
        let mut store = Self {
            registry,
            view,
            columns: Vec::new(),
            order: Vec::new(),
        };
        store.reset();
        store
    }

    pub fn view(&self) -> &ViewKey {
        &self.view
    }

    /// Restore the view's default visibility map and catalog order
    ///
    /// Returns true if the layout differed from the defaults.
    pub fn reset(&mut self) -> bool {
        let defaults = self.registry.default_columns(&self.view);
        let catalog = self.registry.columns(&self.view);
        let columns: Vec<ColumnConfig> = catalog
            .iter()
            .map(|ColumnDef { key, label }| ColumnConfig {
                key: key.clone(),
                label: label.clone(),
                visible: defaults.contains(key),
            })
            .collect();
        let order: Vec<String> = catalog.iter().map(|c| c.key.clone()).collect();
        let changed = columns != self.columns || order != self.order;
        self.columns = columns;
        self.order = order;
        debug!(
            "Reset {} columns for view '{}' ({} visible)",
            self.columns.len(),
            self.view,
            self.visible_count()
        );
        changed
    }

    pub fn toggle(&mut self, key: &str, visible: bool) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(col) if col.visible != visible => {
                col.visible = visible;
                true
            }
            Some(_) => false,
            None => {
                trace!("toggle ignored for unknown column '{}'", key);
                false
            }
        }
    }

    /// Show every column; returns true if any was hidden
    pub fn select_all(&mut self) -> bool {
        self.set_all(true)
    }

    /// Hide every column; returns true if any was shown
    pub fn clear_all(&mut self) -> bool {
        self.set_all(false)
    }

    fn set_all(&mut self, visible: bool) -> bool {
        let mut changed = false;
        for col in self.columns.iter_mut().filter(|c| c.visible != visible) {
            col.visible = visible;
            changed = true;
        }
        changed
    }

    /// Move `key` so it sits immediately before `before_key`
    ///
    /// The anchor is always the column that should follow `key` afterwards, so a
    /// column goes back to its old slot by reordering it before its old
    /// successor (reordering it before its old predecessor lands one slot
    /// early). A drag drop instead takes the target's index, see
    /// [`DragReorderController::drop_on`](crate::services::drag_reorder::DragReorderController::drop_on).
    pub fn reorder(&mut self, key: &str, before_key: &str) -> bool {
        match move_before(&self.order, &key.to_string(), &before_key.to_string()) {
            Some(next) => {
                self.order = next;
                true
            }
            None => {
                trace!("reorder({}, {}) ignored", key, before_key);
                false
            }
        }
    }

    /// Column keys in display order, hidden ones included
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Columns in catalog order with their visibility
    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key && c.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().filter(|c| c.visible).count()
    }

    /// Visible columns in display order; this is what the table renders
    pub fn visible_columns(&self) -> Vec<&ColumnConfig> {
        let by_key: HashMap<&str, &ColumnConfig> =
            self.columns.iter().map(|c| (c.key.as_str(), c)).collect();
        self.order
            .iter()
            .filter_map(|k| by_key.get(k.as_str()).copied())
            .filter(|c| c.visible)
            .collect()
    }
}

impl KeySequence for ColumnConfigStore {
    type Key = String;

    fn key_order(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Ignored unless `order` is a duplicate-free permutation of the current keys
    fn commit_order(&mut self, order: Vec<String>) {
        let current: HashSet<&str> = self.order.iter().map(String::as_str).collect();
        let proposed: HashSet<&str> = order.iter().map(String::as_str).collect();
        if order.len() != self.order.len() || proposed != current {
            debug!("Rejected column order for view '{}': not a permutation", self.view);
            return;
        }
        self.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::drag_reorder::DragReorderController;
    use pretty_assertions::assert_eq;

    fn store(view: &str) -> ColumnConfigStore {
        let registry = Arc::new(FilterFieldRegistry::builtin().unwrap());
        ColumnConfigStore::new(registry, ViewKey::from(view))
    }

    fn sorted(keys: &[String]) -> Vec<String> {
        let mut keys = keys.to_vec();
        keys.sort();
        keys
    }

    #[test]
    fn test_defaults_differ_per_view() {
        let fcl = store("fcl");
        let lcl = store("lcl");
        assert!(fcl.is_visible("price40hq"));
        assert!(!fcl.is_visible("remark"));
        assert!(!lcl.order().iter().any(|k| k == "price40hq"));
        assert_eq!(lcl.visible_count(), 6);
    }

    #[test]
    fn test_reorder_and_back() {
        let mut cols = store("fcl");
        let original = cols.order().to_vec();

        assert!(cols.reorder("voyageNo", "shipCompany"));
        assert_eq!(cols.order()[0], "voyageNo");
        assert_eq!(cols.order()[1], "shipCompany");

        // voyageNo originally sat before etd
        assert!(cols.reorder("voyageNo", "etd"));
        assert_eq!(cols.order(), original.as_slice());
    }

    #[test]
    fn test_reorder_noops() {
        let mut cols = store("fcl");
        let original = cols.order().to_vec();
        assert!(!cols.reorder("etd", "etd"));
        assert!(!cols.reorder("ghost", "etd"));
        assert!(!cols.reorder("etd", "ghost"));
        assert_eq!(cols.order(), original.as_slice());
    }

    #[test]
    fn test_visibility_never_moves_columns() {
        let mut cols = store("fcl");
        cols.reorder("validity", "departurePort");
        let order = cols.order().to_vec();

        cols.toggle("validity", false);
        cols.clear_all();
        cols.select_all();
        cols.toggle("departurePort", false);
        assert_eq!(cols.order(), order.as_slice());
        assert!(!cols.is_visible("departurePort"));
    }

    #[test]
    fn test_visible_columns_follow_order() {
        let mut cols = store("precarriage");
        cols.reorder("price", "pickupCity");
        cols.toggle("terminal", false);
        let keys: Vec<&str> = cols.visible_columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["price", "pickupCity", "truckType"]);
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut cols = store("air");
        let order = cols.order().to_vec();
        let visible = cols.visible_count();
        cols.select_all();
        cols.reorder("validity", "airline");

        cols.reset();
        assert_eq!(cols.order(), order.as_slice());
        assert_eq!(cols.visible_count(), visible);
    }

    #[test]
    fn test_commit_order_rejects_non_permutations() {
        let mut cols = store("fcl");
        let original = cols.key_order();

        let mut duplicated = original.clone();
        duplicated[1] = duplicated[0].clone();
        cols.commit_order(duplicated);
        assert_eq!(cols.key_order(), original);

        let mut short = original.clone();
        short.pop();
        cols.commit_order(short);
        let mut foreign = original.clone();
        foreign[0] = "ghost".to_string();
        cols.commit_order(foreign);
        assert_eq!(cols.key_order(), original);

        let mut reversed = original.clone();
        reversed.reverse();
        cols.commit_order(reversed.clone());
        assert_eq!(cols.key_order(), reversed);
    }

    #[test]
    fn test_bulk_visibility_reports_changes() {
        let mut cols = store("fcl");
        assert!(!cols.reset());
        assert!(cols.select_all());
        assert!(!cols.select_all());
        assert!(cols.clear_all());
        assert!(!cols.clear_all());
        assert!(cols.reset());
    }

    #[test]
    fn test_drag_reorder_keeps_permutation() {
        let mut cols = store("fcl");
        let keys = sorted(cols.order());
        let mut drag = DragReorderController::new();
        for (dragged, over) in [("remark", "shipCompany"), ("etd", "price40hq"), ("shipCompany", "remark")] {
            drag.drag_start(dragged.to_string());
            drag.drag_over(over.to_string());
            assert!(drag.drop_on(&mut cols).is_moved());
        }
        assert_eq!(sorted(cols.order()), keys);
        assert_eq!(cols.columns().len(), keys.len());
    }
}
