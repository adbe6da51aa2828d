use std::collections::HashSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use filterdeck::action::Action;
use filterdeck::core::{FieldType, FilterFieldRegistry, FilterMode, FilterValue, ViewKey};
use filterdeck::services::{
    ColumnConfigStore, DragReorderController, DragState, FilterConditionStore, KeySequence,
    SchemeStore, ViewSession,
};

fn registry() -> Arc<FilterFieldRegistry> {
    Arc::new(FilterFieldRegistry::builtin().expect("builtin catalog"))
}

fn fcl() -> ViewSession {
    ViewSession::open(registry(), ViewKey::from("fcl"))
}

fn visible_keys(session: &ViewSession) -> Vec<String> {
    session
        .conditions()
        .get_visible()
        .into_iter()
        .map(|c| c.key)
        .collect()
}

#[test]
fn fcl_catalog_and_default_conditions() {
    let registry = registry();
    let view = ViewKey::from("fcl");
    let fields = registry.get_fields(&view);
    assert_eq!(fields.len(), 8);

    let ship = registry.get_field(&view, "shipCompany").expect("shipCompany");
    assert_eq!(ship.field_type, FieldType::Select);
    let options: Vec<&str> = ship.options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(options, vec!["SITC", "COSCO", "MSK", "ONE"]);

    let store = FilterConditionStore::new(registry.clone(), view);
    assert_eq!(store.conditions().len(), 8);
    assert!(store
        .conditions()
        .iter()
        .all(|c| c.mode == FilterMode::Equal && c.value == FilterValue::Empty));
    let visible: Vec<String> = store.get_visible().into_iter().map(|c| c.key).collect();
    assert_eq!(
        visible,
        vec!["shipCompany", "transitType", "departurePort", "dischargePort"]
    );
}

#[test]
fn unknown_view_yields_empty_stores() {
    let session = ViewSession::open(registry(), ViewKey::from("rail"));
    assert!(session.conditions().conditions().is_empty());
    assert!(session.columns().order().is_empty());
    assert_eq!(session.schemes().list().len(), 1);
}

#[test]
fn empty_mode_keeps_value_visible() {
    let mut session = fcl();
    session.conditions_mut().set_visibility("etd", true);
    session
        .conditions_mut()
        .set_value_text("etd", "2024-06-01..2024-06-30")
        .unwrap();
    let before = session.conditions().get("etd").unwrap().value.clone();

    session.conditions_mut().set_mode("etd", FilterMode::IsEmpty);
    let etd = session
        .conditions()
        .get_visible()
        .into_iter()
        .find(|c| c.key == "etd")
        .expect("etd visible");
    assert_eq!(etd.mode, FilterMode::IsEmpty);
    assert_eq!(etd.value, before);

    // value edits are ignored while no value is needed
    assert_eq!(
        session
            .conditions_mut()
            .set_value_text("etd", "2025-01-01..2025-01-02"),
        Ok(false)
    );

    session.conditions_mut().set_mode("etd", FilterMode::Equal);
    assert_eq!(session.conditions().get("etd").unwrap().value, before);
}

#[test]
fn mode_round_trip_for_every_field() {
    let mut store = FilterConditionStore::new(registry(), ViewKey::from("fcl"));
    store.set_value_text("shipCompany", "MSK").unwrap();
    store.set_value_text("freight", "1200").unwrap();
    store.set_value_text("voyageNo", "2405E").unwrap();
    let keys: Vec<String> = store.key_order();
    for key in keys {
        let before = store.get(&key).unwrap().value.clone();
        store.set_mode(&key, FilterMode::IsEmpty);
        store.set_mode(&key, FilterMode::Equal);
        assert_eq!(store.get(&key).unwrap().value, before, "field {key}");
    }
}

#[test]
fn saved_scheme_restores_two_visible_conditions() {
    let mut session = fcl();
    session.conditions_mut().set_visibility("shipCompany", false);
    session.conditions_mut().set_visibility("transitType", false);
    session
        .conditions_mut()
        .set_value_text("departurePort", "Shanghai")
        .unwrap();
    assert_eq!(session.conditions().get_visible().len(), 2);

    let scheme = session.save_scheme("high-value").unwrap();
    let captured = session.conditions().snapshot();

    session.conditions_mut().set_visibility("etd", true);
    session
        .conditions_mut()
        .set_value_text("departurePort", "Ningbo")
        .unwrap();
    assert_eq!(session.conditions().get_visible().len(), 3);

    assert!(session.apply_scheme(&scheme.id));
    assert_eq!(visible_keys(&session), vec!["departurePort", "dischargePort"]);
    assert_eq!(session.conditions().snapshot(), captured);
    assert_eq!(session.schemes().active_id(), scheme.id);
}

#[test]
fn reset_twice_equals_reset_once() {
    let mut session = fcl();
    session.conditions_mut().set_visibility("boxType", true);
    session.conditions_mut().set_mode("voyageNo", FilterMode::Batch);
    session.save_scheme("mine").unwrap();

    session.reset();
    let conditions_once = session.conditions().snapshot();
    let schemes_once: Vec<_> = session.schemes().list().into_iter().cloned().collect();
    let active_once = session.schemes().active_id();

    session.reset();
    assert_eq!(session.conditions().snapshot(), conditions_once);
    let schemes_twice: Vec<_> = session.schemes().list().into_iter().cloned().collect();
    assert_eq!(schemes_twice, schemes_once);
    assert_eq!(session.schemes().active_id(), active_once);
    assert_eq!(session.schemes().active_id(), session.schemes().default_scheme().id);
}

#[test]
fn column_reorder_and_back() {
    let mut columns = ColumnConfigStore::new(registry(), ViewKey::from("fcl"));
    let original = columns.order().to_vec();
    let idx = original.iter().position(|k| k == "voyageNo").unwrap();
    let successor = original[idx + 1].clone();

    assert!(columns.reorder("voyageNo", "shipCompany"));
    let ship = columns.order().iter().position(|k| k == "shipCompany").unwrap();
    assert_eq!(columns.order()[ship - 1], "voyageNo");

    assert!(columns.reorder("voyageNo", &successor));
    assert_eq!(columns.order(), original.as_slice());
}

#[test]
fn restoring_a_column_by_anchor_or_by_drag() {
    let registry = registry();
    let mut columns = ColumnConfigStore::new(registry.clone(), ViewKey::from("fcl"));
    let original = columns.order().to_vec();
    let idx = original.iter().position(|k| k == "voyageNo").unwrap();
    let predecessor = original[idx - 1].clone();
    assert_eq!(predecessor, "transitType");

    columns.reorder("voyageNo", "shipCompany");
    let moved = columns.order().to_vec();

    // anchoring on the old predecessor lands one slot early
    let mut by_predecessor = columns.clone();
    assert!(by_predecessor.reorder("voyageNo", &predecessor));
    assert_eq!(by_predecessor.order()[idx - 1], "voyageNo");
    assert_eq!(by_predecessor.order()[idx], "transitType");
    assert_ne!(by_predecessor.order(), original.as_slice());

    // anchoring on the old successor restores the catalog order
    let mut by_successor = columns.clone();
    assert!(by_successor.reorder("voyageNo", "etd"));
    assert_eq!(by_successor.order(), original.as_slice());

    // dragging down onto the old predecessor takes its index, which also restores it
    let mut by_drag = columns.clone();
    let mut drag = DragReorderController::new();
    drag.drag_start("voyageNo".to_string());
    drag.drag_over(predecessor.clone());
    assert!(drag.drop_on(&mut by_drag).is_moved());
    assert_eq!(by_drag.order(), original.as_slice());

    assert_eq!(columns.order(), moved.as_slice());
}

#[test]
fn reorders_keep_a_permutation() {
    let mut columns = ColumnConfigStore::new(registry(), ViewKey::from("air"));
    let original: HashSet<String> = columns.order().iter().cloned().collect();
    let keys = columns.order().to_vec();
    let mut drag = DragReorderController::new();

    for (i, key) in keys.iter().enumerate() {
        let target = &keys[(i * 5 + 3) % keys.len()];
        columns.reorder(key, target);
        drag.drag_start(target.clone());
        drag.drag_over(key.clone());
        drag.drop_on(&mut columns);
    }

    let after: HashSet<String> = columns.order().iter().cloned().collect();
    assert_eq!(after, original);
    assert_eq!(columns.order().len(), original.len());
}

#[test]
fn toggling_visibility_never_moves_columns() {
    let mut columns = ColumnConfigStore::new(registry(), ViewKey::from("lcl"));
    columns.reorder("validity", "departurePort");
    let order = columns.order().to_vec();
    for key in &order {
        columns.toggle(key, false);
        assert_eq!(columns.order(), order.as_slice());
        columns.toggle(key, true);
        assert_eq!(columns.order(), order.as_slice());
    }
}

#[test]
fn drag_end_without_drop_changes_nothing() {
    let mut session = fcl();
    let order = session.columns().order().to_vec();
    session
        .handle_action(Action::ColumnDragStart { key: "voyageNo".into() })
        .unwrap();
    session
        .handle_action(Action::ColumnDragOver { key: "shipCompany".into() })
        .unwrap();
    assert!(session.column_drag().is_dragging());

    session.handle_action(Action::ColumnDragEnd).unwrap();
    assert_eq!(session.columns().order(), order.as_slice());
    assert_eq!(session.column_drag().state(), &DragState::Idle);
}

#[test]
fn views_are_isolated() {
    let registry = registry();
    let mut fcl = ViewSession::open(registry.clone(), ViewKey::from("fcl"));
    let lcl = ViewSession::open(registry, ViewKey::from("lcl"));
    let lcl_before = lcl.summary();

    fcl.columns_mut().clear_all();
    fcl.save_scheme("fcl only").unwrap();
    fcl.conditions_mut().set_visibility("etd", true);

    assert_eq!(lcl.summary(), lcl_before);
}

#[test]
fn scheme_store_drives_condition_store() {
    let registry = registry();
    let mut store = FilterConditionStore::new(registry, ViewKey::from("precarriage"));
    let mut schemes = SchemeStore::new(store.snapshot());
    store.set_value_text("terminal", "yangshan").unwrap();
    let saved = schemes.save("yangshan", store.conditions()).unwrap();
    store.clear_values();
    assert!(schemes.apply(&saved.id, &mut store));
    assert_eq!(
        store.get("terminal").unwrap().value,
        FilterValue::Select("yangshan".into())
    );
}
