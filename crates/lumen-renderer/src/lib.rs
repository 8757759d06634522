//! # Virtual nodes and the patching renderer
//!
//! A [`VNode`] tree describes what a host should show. [`Renderer::render`]
//! turns it into host operations, diffing against the tree rendered into the
//! same [`Container`] last time:
//!
//! ```rust
//! use lumen_renderer::*;
//!
//! let renderer = Renderer::new(MemoryHost::new());
//! let app = Container::new(DomNode::element("div"));
//!
//! renderer.render(Some(h("p", "hello")), &app)?;
//! assert_eq!(app.node().to_html(), "<div><p>hello</p></div>");
//!
//! renderer.render(Some(h("p", "bye")), &app)?;
//! assert_eq!(app.node().to_html(), "<div><p>bye</p></div>");
//!
//! renderer.render(None, &app)?;
//! assert_eq!(app.node().to_html(), "<div></div>");
//! # Ok::<(), RenderError>(())
//! ```
//!
//! The renderer only talks to the host through the [`Host`] trait.
//! [`MemoryHost`] is an in-memory document that records every operation,
//! which makes it the host of choice for tests.
//!
//! ## Reactive rendering
//!
//! Rendering from inside a `lumen_core::effect` re-renders whenever state read
//! while building the tree changes. Re-renders run synchronously inside the
//! write, including writes made by event listeners during dispatch.

pub mod clock;
pub mod error;
pub mod event;
pub mod host;
pub mod memory;
pub mod renderer;
pub mod tests;
pub mod vnode;

pub use clock::*;
pub use error::*;
pub use event::*;
pub use host::*;
pub use memory::*;
pub use renderer::*;
pub use vnode::*;
