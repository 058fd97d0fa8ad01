// ============================================================================
// spark-pulse - Records
// Keyed state shapes that `add` and `use_signal` can work on
// ============================================================================
//
// A state cell holds any `T`, but field projection (`use_signal`) and
// accumulation (`State::add`) only make sense for values that look like an
// object with string keys. `Record` captures that shape; `Accumulate` adds
// the "append into a sequence field" operation.
//
// Both operations are copy-on-write: they return a new record and leave
// `self` untouched, so a committed `Rc<T>` is never mutated in place.
// ============================================================================

use std::collections::BTreeMap;

use serde_json::{Map, Value};

// =============================================================================
// TRAITS
// =============================================================================

/// A value with string-keyed fields.
pub trait Record: Clone + 'static {
    /// Type of a single field.
    type Field: Clone + 'static;

    /// Whether this value currently has the record shape at all.
    ///
    /// Dynamic representations (like `serde_json::Value`) can hold scalars.
    fn is_record(&self) -> bool {
        true
    }

    /// The field stored under `key`, if any.
    fn field(&self, key: &str) -> Option<&Self::Field>;

    /// The first key in enumeration order.
    fn first_key(&self) -> Option<&str>;

    /// A shallow copy with `key` set to `value`. Absent keys are added.
    fn with_field(&self, key: &str, value: Self::Field) -> Self;
}

/// A record whose fields can collect payloads of type `P`.
pub trait Accumulate<P>: Record {
    /// A shallow copy where the field under `key` has `payload` appended.
    ///
    /// If the field is already a sequence it is copied and extended;
    /// otherwise it is replaced by a one-element sequence.
    fn accumulate(&self, key: &str, payload: P) -> Self;
}

// =============================================================================
// serde_json::Value
// =============================================================================
//
// Objects are records; everything else is not. With `preserve_order` the
// first key is the first inserted one, and re-inserting an existing key keeps
// its position.

impl Record for Value {
    type Field = Value;

    fn is_record(&self) -> bool {
        self.is_object()
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    fn first_key(&self) -> Option<&str> {
        self.as_object()?.keys().next().map(String::as_str)
    }

    fn with_field(&self, key: &str, value: Value) -> Value {
        let mut map = match self {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        map.insert(key.to_owned(), value);
        Value::Object(map)
    }
}

impl<P> Accumulate<P> for Value
where
    P: Into<Value>,
{
    fn accumulate(&self, key: &str, payload: P) -> Value {
        let items = match self.field(key) {
            Some(Value::Array(existing)) => {
                let mut items = existing.clone();
                items.push(payload.into());
                items
            }
            _ => vec![payload.into()],
        };
        self.with_field(key, Value::Array(items))
    }
}

// =============================================================================
// BTreeMap<String, Vec<V>>
// =============================================================================
//
// Statically typed variant: every field is already a sequence, and the first
// key is the smallest one.

impl<V> Record for BTreeMap<String, Vec<V>>
where
    V: Clone + 'static,
{
    type Field = Vec<V>;

    fn field(&self, key: &str) -> Option<&Vec<V>> {
        self.get(key)
    }

    fn first_key(&self) -> Option<&str> {
        self.keys().next().map(String::as_str)
    }

    fn with_field(&self, key: &str, value: Vec<V>) -> Self {
        let mut map = self.clone();
        map.insert(key.to_owned(), value);
        map
    }
}

impl<V> Accumulate<V> for BTreeMap<String, Vec<V>>
where
    V: Clone + 'static,
{
    fn accumulate(&self, key: &str, payload: V) -> Self {
        let mut items = self.get(key).cloned().unwrap_or_default();
        items.push(payload);
        self.with_field(key, items)
    }
}

// =============================================================================
// TESTS
// =============================================================================
