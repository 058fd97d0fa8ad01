mod common;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use spark_pulse::{create_state, create_state_with_options, AddError, State, StateOptions};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

fn with_counter<T: 'static>(state: &State<T>) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    state.subscribe({
        let count = count.clone();
        move || count.set(count.get() + 1)
    });
    count
}

#[test]
fn counter_increments() {
    let state = create_state(json!({"count": 0}));
    let fired = with_counter(&state);

    state.set_state(|s| json!({"count": s["count"].as_i64().unwrap_or_default() + 1}));

    assert_eq!(state.get_state()["count"], json!(1));
    assert_eq!(fired.get(), 1);
}

#[test]
fn each_set_state_fires_once() {
    let state = create_state(0u32);
    let fired = with_counter(&state);

    for _ in 0..5 {
        state.set_state(|n| n + 1);
    }
    assert_eq!(*state.get_state(), 5);
    assert_eq!(fired.get(), 5);
}

#[test]
fn add_appends_without_mutating_previous_value() {
    let state = create_state(json!({"items": [1, 2]}));
    let previous = state.get_state();

    state.add(3).unwrap();

    assert_eq!(state.get_state()["items"], json!([1, 2, 3]));
    assert_eq!(*previous, json!({"items": [1, 2]}));
}

#[test]
fn add_into_empty_sequence() {
    let state = create_state(json!({"items": []}));
    state.add("x").unwrap();
    assert_eq!(state.get_state()["items"], json!(["x"]));
}

#[test]
fn add_on_scalar_state_is_a_noop() {
    let state = create_state(json!(5));
    let fired = with_counter(&state);

    let outcome = state.add("x");

    assert_eq!(outcome, Err(AddError::NotARecord));
    assert_eq!(*state.get_state(), json!(5));
    assert_eq!(fired.get(), 0);
}

#[test]
fn add_on_keyless_record_is_a_noop() {
    let state = create_state(json!({}));
    assert_eq!(state.add(json!({"nested": true})), Err(AddError::NoKeys));
    assert_eq!(*state.get_state(), json!({}));
}

#[test]
fn add_targets_first_key_in_insertion_order() {
    let state = create_state(json!({"log": ["a"], "count": 1}));
    state.add("b").unwrap();
    assert_eq!(*state.get_state(), json!({"log": ["a", "b"], "count": 1}));
}

#[test]
fn configured_target_ignores_key_order() {
    let state = create_state_with_options(
        json!({"title": "groceries", "items": ["milk"]}),
        StateOptions::new().accumulate_into("items").label("groceries"),
    );

    state.add("eggs").unwrap();
    state.add(json!({"name": "bread", "qty": 2})).unwrap();

    assert_eq!(
        *state.get_state(),
        json!({
            "title": "groceries",
            "items": ["milk", "eggs", {"name": "bread", "qty": 2}]
        })
    );
}

#[test]
fn typed_map_state_accumulates() {
    let mut initial: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    initial.insert("scores".to_string(), vec![10]);

    let state = create_state(initial);
    state.add(20).unwrap();
    state.add(30).unwrap();

    assert_eq!(state.get_state()["scores"], vec![10, 20, 30]);
}

#[test]
fn readers_see_committed_value_inside_listener() {
    let state: State<Value> = create_state(json!({"items": []}));
    let seen = Rc::new(Cell::new(0usize));

    state.subscribe({
        let state = state.clone();
        let seen = seen.clone();
        move || {
            let len = state.with(|s| s["items"].as_array().map_or(0, Vec::len));
            seen.set(len);
        }
    });

    state.add(1).unwrap();
    state.add(2).unwrap();
    assert_eq!(seen.get(), 2);
}
