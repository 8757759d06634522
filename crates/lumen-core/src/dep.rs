//! Dependency store: `(target, key)` → observers that read it.
//!
//! Entries are created lazily by [`track`] and are not purged when they become
//! empty; [`trigger`] on an empty or unknown entry does nothing. Entries of a
//! target are dropped together with the target itself.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::effect::{self, EffectId};
use crate::value::TargetId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackKey {
    Property(Rc<str>),
    /// The key set of an object (`keys()` reads, property adds and deletes).
    Iterate,
}

impl TrackKey {
    pub fn property(name: &str) -> Self {
        TrackKey::Property(name.into())
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKey::Property(name) => f.write_str(name),
            TrackKey::Iterate => f.write_str("<iterate>"),
        }
    }
}

type Dep = BTreeSet<EffectId>;

thread_local! {
    static TARGET_MAP: RefCell<HashMap<TargetId, HashMap<TrackKey, Dep>>> =
        RefCell::new(HashMap::new());
}

/// Registers the active observer (if any) against `(target, key)`.
pub fn track(target: TargetId, key: TrackKey) {
    let Some(observer) = effect::active_effect() else {
        return;
    };
    if !effect::is_alive(observer) {
        return;
    }
    log::trace!("track {target:?}.{key} by {observer:?}");
    let inserted = TARGET_MAP.with(|m| {
        m.borrow_mut()
            .entry(target)
            .or_default()
            .entry(key.clone())
            .or_default()
            .insert(observer)
    });
    if inserted {
        effect::record_dependency(observer, target, key);
    }
}

/// Runs every observer registered against `(target, key)`.
///
/// Iterates a snapshot taken up front, so observers that re-register during
/// the pass are not picked up again by it.
pub fn trigger(target: TargetId, key: TrackKey) {
    let snapshot: Vec<EffectId> = TARGET_MAP.with(|m| {
        m.borrow()
            .get(&target)
            .and_then(|deps| deps.get(&key))
            .map(|dep| dep.iter().copied().collect())
            .unwrap_or_default()
    });
    if snapshot.is_empty() {
        return;
    }
    log::trace!("trigger {target:?}.{key} -> {} observer(s)", snapshot.len());
    for observer in snapshot {
        effect::run_triggered(observer);
    }
}

/// Number of observers currently registered against `(target, key)`.
pub fn observer_count(target: TargetId, key: &TrackKey) -> usize {
    TARGET_MAP.with(|m| {
        m.borrow()
            .get(&target)
            .and_then(|deps| deps.get(key))
            .map_or(0, BTreeSet::len)
    })
}

pub(crate) fn untrack(
    observer: EffectId,
    entries: impl IntoIterator<Item = (TargetId, TrackKey)>,
) {
    TARGET_MAP.with(|m| {
        let mut m = m.borrow_mut();
        for (target, key) in entries {
            if let Some(dep) = m.get_mut(&target).and_then(|deps| deps.get_mut(&key)) {
                dep.remove(&observer);
            }
        }
    });
}

pub(crate) fn forget_target(target: TargetId) {
    // may run from a destructor during thread teardown
    let _ = TARGET_MAP.try_with(|m| {
        if let Ok(mut m) = m.try_borrow_mut() {
            m.remove(&target);
        }
    });
}
