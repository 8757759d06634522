use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dep::{self, TrackKey};
use crate::value::{Object, TargetId, Value};

thread_local! {
    // raw object -> its canonical wrapper; never keeps either alive
    static WRAPPERS: RefCell<HashMap<TargetId, Weak<ReactiveInner>>> = RefCell::new(HashMap::new());
}

/// Tracked view over an [`Object`].
///
/// Reads register the active effect against `(object, key)`; writes that
/// change a value re-run every effect registered against it. Nested objects
/// come back wrapped, so tracking follows property paths.
#[derive(Clone)]
pub struct Reactive(Rc<ReactiveInner>);

struct ReactiveInner {
    target: Object,
}

/// Puts `value` under reactive control.
///
/// Objects get their canonical wrapper (the same one on every call while it
/// is alive); wrappers and non-object values are returned unchanged.
pub fn reactive(value: impl Into<Value>) -> Value {
    match value.into() {
        Value::Object(obj) => Value::Reactive(Reactive::new(&obj)),
        other => other,
    }
}

/// Strips a reactive wrapper, returning the underlying object.
pub fn to_raw(value: Value) -> Value {
    match value {
        Value::Reactive(r) => Value::Object(r.raw()),
        other => other,
    }
}

pub fn is_reactive(value: &Value) -> bool {
    matches!(value, Value::Reactive(_))
}

impl Reactive {
    /// Returns the canonical wrapper for `target`.
    pub fn new(target: &Object) -> Self {
        let id = target.id();
        WRAPPERS.with(|m| {
            let mut m = m.borrow_mut();
            if let Some(existing) = m.get(&id).and_then(Weak::upgrade) {
                return Reactive(existing);
            }
            let inner = Rc::new(ReactiveInner {
                target: target.clone(),
            });
            m.insert(id, Rc::downgrade(&inner));
            Reactive(inner)
        })
    }

    pub fn id(&self) -> TargetId {
        self.0.target.id()
    }

    pub fn raw(&self) -> Object {
        self.0.target.clone()
    }

    pub fn get(&self, key: &str) -> Value {
        log::trace!("get {:?}.{key}", self.id());
        dep::track(self.id(), TrackKey::property(key));
        reactive(self.0.target.get(key))
    }

    /// Writes `key`. Returns `false` (and notifies nobody) when the stored
    /// value already equals `value`.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let value = to_raw(value.into());
        let had_key = self.0.target.contains_key(key);
        if self.0.target.get(key) == value {
            return false;
        }
        log::trace!("set {:?}.{key} = {value:?}", self.id());
        let previous = self.0.target.insert(key, value);
        drop(previous);

        dep::trigger(self.id(), TrackKey::property(key));
        if !had_key {
            dep::trigger(self.id(), TrackKey::Iterate);
        }
        true
    }

    pub fn has(&self, key: &str) -> bool {
        log::trace!("has {:?}.{key}", self.id());
        dep::track(self.id(), TrackKey::property(key));
        self.0.target.contains_key(key)
    }

    /// Removes `key`, notifying only if it was present.
    pub fn delete(&self, key: &str) -> bool {
        log::trace!("delete {:?}.{key}", self.id());
        let Some(previous) = self.0.target.remove(key) else {
            return false;
        };
        drop(previous);
        dep::trigger(self.id(), TrackKey::property(key));
        dep::trigger(self.id(), TrackKey::Iterate);
        true
    }

    pub fn keys(&self) -> Vec<String> {
        dep::track(self.id(), TrackKey::Iterate);
        self.0.target.keys()
    }
}

impl PartialEq for Reactive {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Reactive {}

impl fmt::Debug for Reactive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reactive").field(&self.0.target).finish()
    }
}

pub(crate) fn forget_wrapper(target: TargetId) {
    let _ = WRAPPERS.try_with(|m| {
        if let Ok(mut m) = m.try_borrow_mut() {
            m.remove(&target);
        }
    });
}
