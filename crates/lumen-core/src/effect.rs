use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::dep::{self, TrackKey};
use crate::value::TargetId;

new_key_type! {
    pub struct EffectId;
}

struct EffectSlot {
    body: Rc<dyn Fn()>,
    // entries this observer is currently registered in
    deps: SmallVec<[(TargetId, TrackKey); 4]>,
}

thread_local! {
    static EFFECTS: RefCell<SlotMap<EffectId, EffectSlot>> = RefCell::new(SlotMap::with_key());
    // `None` frames come from `untracked`
    static EFFECT_STACK: RefCell<Vec<Option<EffectId>>> = const { RefCell::new(Vec::new()) };
}

/// Handle to a registered observer.
///
/// Dropping the handle does not stop the effect; call [`Effect::stop`] or
/// create it inside a [`crate::Scope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        is_alive(self.id)
    }

    /// Re-runs the body now, re-collecting its dependencies.
    pub fn run(&self) {
        run_effect(self.id);
    }

    /// Unregisters the effect from every dependency entry; it never runs again.
    pub fn stop(&self) {
        let removed = EFFECTS
            .try_with(|e| e.try_borrow_mut().ok().and_then(|mut e| e.remove(self.id)))
            .ok()
            .flatten();
        if let Some(slot) = removed {
            log::trace!("stop {:?}", self.id);
            dep::untrack(self.id, slot.deps);
        }
    }

    /// Number of dependency entries the effect is registered in.
    pub fn dependency_count(&self) -> usize {
        EFFECTS.with(|e| e.borrow().get(self.id).map_or(0, |slot| slot.deps.len()))
    }
}

/// Registers `f` as an observer and runs it once to collect its dependencies.
///
/// Afterwards `f` re-runs synchronously, inside the writer's call, every time
/// something it read during its last run is written.
pub fn effect(f: impl Fn() + 'static) -> Effect {
    let id = EFFECTS.with(|e| {
        e.borrow_mut().insert(EffectSlot {
            body: Rc::new(f),
            deps: SmallVec::new(),
        })
    });
    let handle = Effect { id };

    // auto-register cleanup in the current scope if one exists
    if let Some(scope) = crate::scope::current_scope() {
        scope.add_disposer(move || handle.stop());
    }

    run_effect(id);
    handle
}

/// Runs `f` with dependency tracking suspended.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _frame = StackFrame::push(None);
    f()
}

pub(crate) fn active_effect() -> Option<EffectId> {
    EFFECT_STACK.with(|s| s.borrow().last().copied().flatten())
}

pub(crate) fn is_alive(id: EffectId) -> bool {
    EFFECTS.with(|e| e.borrow().contains_key(id))
}

pub(crate) fn record_dependency(id: EffectId, target: TargetId, key: TrackKey) {
    EFFECTS.with(|e| {
        if let Some(slot) = e.borrow_mut().get_mut(id) {
            slot.deps.push((target, key));
        }
    });
}

pub(crate) fn run_triggered(id: EffectId) {
    // stopped by an earlier observer of the same pass
    if !is_alive(id) {
        return;
    }
    let running = EFFECT_STACK.with(|s| s.borrow().contains(&Some(id)));
    if running {
        log::warn!("{id:?} wrote to state it depends on while running; not re-entering");
        return;
    }
    run_effect(id);
}

fn run_effect(id: EffectId) {
    let Some((body, deps)) = EFFECTS.with(|e| {
        let mut e = e.borrow_mut();
        let slot = e.get_mut(id)?;
        Some((slot.body.clone(), std::mem::take(&mut slot.deps)))
    }) else {
        return;
    };
    // clear previous deps before recompute
    dep::untrack(id, deps);

    let _frame = StackFrame::push(Some(id));
    body();
}

struct StackFrame;

impl StackFrame {
    fn push(id: Option<EffectId>) -> Self {
        EFFECT_STACK.with(|s| s.borrow_mut().push(id));
        StackFrame
    }
}

impl Drop for StackFrame {
    fn drop(&mut self) {
        let _ = EFFECT_STACK.try_with(|s| s.borrow_mut().pop());
    }
}
