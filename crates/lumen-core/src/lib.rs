//! # Reactive state, effects, and scopes
//!
//! Lumen's reactivity is built around automatic dependency tracking:
//!
//! - [`reactive`]: wraps an [`Object`] so reads are recorded and writes notify.
//! - [`Ref`]: a single reactive cell.
//! - [`computed`]: a read-only ref derived from other reactive state.
//! - [`effect`]: a closure that re-runs whenever state it read changes.
//!
//! ## Objects and wrappers
//!
//! ```rust
//! use lumen_core::*;
//!
//! let raw = object! { "text" => "hello", "ok" => true };
//! let state = reactive(raw.clone());
//!
//! // the wrapper is canonical
//! assert_eq!(state, reactive(raw));
//! assert_eq!(state.get("text"), Value::from("hello"));
//! ```
//!
//! Nested objects are wrapped on read, so `state.get("a").get("b")` is tracked
//! at both levels.
//!
//! ## Effects
//!
//! An effect runs once immediately, recording every reactive read, and then
//! again synchronously whenever one of those reads is written. Each run starts
//! from a clean slate, so branches that are no longer taken stop notifying it:
//!
//! ```rust
//! use lumen_core::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let state = reactive(object! { "ok" => true, "text" => "hi" });
//! let runs = Rc::new(Cell::new(0));
//!
//! effect({
//!     let state = state.clone();
//!     let runs = runs.clone();
//!     move || {
//!         runs.set(runs.get() + 1);
//!         let _ = if state.get("ok").truthy() { state.get("text") } else { "not".into() };
//!     }
//! });
//!
//! state.set("ok", false);
//! state.set("text", "ignored");
//! assert_eq!(runs.get(), 2);
//! ```
//!
//! Writes are never batched: every dependent effect has finished running by
//! the time `set` returns.
//!
//! ## Scopes
//!
//! Effects created inside [`Scope::run`] are stopped when the scope is
//! disposed. Outside a scope an effect lives until [`Effect::stop`].

pub mod computed;
pub mod dep;
pub mod effect;
pub mod reactive;
pub mod refs;
pub mod scope;
pub mod value;

pub use computed::*;
pub use dep::TrackKey;
pub use effect::*;
pub use reactive::*;
pub use refs::*;
pub use scope::*;
pub use value::*;
