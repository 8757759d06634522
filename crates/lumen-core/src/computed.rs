use std::rc::Rc;

use crate::effect::{Effect, effect};
use crate::refs::{Ref, RefLike};
use crate::value::Value;

/// Read-only ref kept up to date by an internal effect.
///
/// Whoever reads [`Computed::get`] depends on the backing cell, and the cell
/// is rewritten whenever anything `getter` read changes, so readers depend on
/// those sources transitively.
#[derive(Clone)]
pub struct Computed(Rc<ComputedInner>);

struct ComputedInner {
    cell: Ref,
    effect: Effect,
}

pub fn computed(getter: impl Fn() -> Value + 'static) -> Computed {
    let cell = Ref::new(Value::Undefined);
    let weak = cell.downgrade();
    let effect = effect(move || {
        let value = getter();
        if let Some(inner) = weak.upgrade() {
            Ref::from_inner(inner).set(value);
        }
    });
    Computed(Rc::new(ComputedInner { cell, effect }))
}

impl Computed {
    pub fn get(&self) -> Value {
        self.0.cell.get()
    }

    pub fn peek(&self) -> Value {
        self.0.cell.peek()
    }

    pub fn effect(&self) -> Effect {
        self.0.effect
    }
}

impl RefLike for Computed {
    fn value(&self) -> Value {
        self.get()
    }

    fn set_value(&self, _value: Value) {
        log::warn!("write to a computed value ignored");
    }
}

impl std::fmt::Debug for Computed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("value", &self.peek())
            .field("effect", &self.0.effect)
            .finish()
    }
}

impl Drop for ComputedInner {
    fn drop(&mut self) {
        self.effect.stop();
    }
}
