use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dep::{self, TrackKey};
use crate::reactive::{Reactive, reactive, to_raw};
use crate::value::{TargetId, Value};

/// Anything that behaves like a single reactive `value` slot.
pub trait RefLike {
    fn value(&self) -> Value;
    fn set_value(&self, value: Value);
}

/// A single reactive cell.
///
/// Reads and writes are tracked as the `(ref, "value")` entry. An object
/// stored in a ref is handed back wrapped.
#[derive(Clone)]
pub struct Ref(Rc<RefInner>);

pub(crate) struct RefInner {
    id: TargetId,
    raw: RefCell<Value>,
}

const VALUE_KEY: &str = "value";

impl Ref {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Rc::new(RefInner {
            id: TargetId::next(),
            raw: RefCell::new(to_raw(value.into())),
        }))
    }

    pub fn id(&self) -> TargetId {
        self.0.id
    }

    pub fn get(&self) -> Value {
        dep::track(self.0.id, TrackKey::property(VALUE_KEY));
        self.peek()
    }

    /// Reads without tracking.
    pub fn peek(&self) -> Value {
        reactive(self.0.raw.borrow().clone())
    }

    /// Stores `value`; returns `false` without notifying when it is equal to
    /// the current one.
    pub fn set(&self, value: impl Into<Value>) -> bool {
        let value = to_raw(value.into());
        if *self.0.raw.borrow() == value {
            return false;
        }
        log::trace!("set {:?}.value = {value:?}", self.0.id);
        let previous = self.0.raw.replace(value);
        drop(previous);
        dep::trigger(self.0.id, TrackKey::property(VALUE_KEY));
        true
    }

    pub fn update(&self, f: impl FnOnce(Value) -> Value) -> bool {
        let next = f(self.peek());
        self.set(next)
    }

    pub(crate) fn downgrade(&self) -> Weak<RefInner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_inner(inner: Rc<RefInner>) -> Self {
        Self(inner)
    }
}

impl RefLike for Ref {
    fn value(&self) -> Value {
        self.get()
    }

    fn set_value(&self, value: Value) {
        self.set(value);
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("id", &self.0.id)
            .field("value", &*self.0.raw.borrow())
            .finish()
    }
}

impl Drop for RefInner {
    fn drop(&mut self) {
        dep::forget_target(self.id);
    }
}

pub fn create_ref(value: impl Into<Value>) -> Ref {
    Ref::new(value)
}

/// A ref that forwards to one property of a reactive object.
#[derive(Clone, Debug)]
pub struct PropertyRef {
    source: Reactive,
    key: Rc<str>,
}

impl PropertyRef {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Value {
        self.source.get(&self.key)
    }

    pub fn set(&self, value: impl Into<Value>) -> bool {
        self.source.set(&self.key, value)
    }
}

impl RefLike for PropertyRef {
    fn value(&self) -> Value {
        self.get()
    }

    fn set_value(&self, value: Value) {
        self.set(value);
    }
}

pub fn to_ref(source: &Reactive, key: &str) -> PropertyRef {
    PropertyRef {
        source: source.clone(),
        key: key.into(),
    }
}

/// One [`PropertyRef`] per current key of `source`.
pub fn to_refs(source: &Reactive) -> BTreeMap<String, PropertyRef> {
    source
        .raw()
        .keys()
        .into_iter()
        .map(|key| {
            let r = to_ref(source, &key);
            (key, r)
        })
        .collect()
}
