use std::rc::Rc;

use crate::vnode::PropValue;

/// Primitive node operations the renderer is built on.
///
/// Methods take `&self`: listeners invoked by a host may write reactive state
/// that re-renders into the same host while it is still dispatching.
pub trait Host {
    type Node: Clone + 'static;

    fn create_element(&self, tag: &str) -> Self::Node;
    fn create_text(&self, text: &str) -> Self::Node;
    fn create_comment(&self, text: &str) -> Self::Node;

    /// Replaces all content of `el` with `text`.
    fn set_element_text(&self, el: &Self::Node, text: &str);
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_comment(&self, node: &Self::Node, text: &str);

    /// Inserts `node` into `parent` before `anchor`, or at the end.
    fn insert(&self, node: &Self::Node, parent: &Self::Node, anchor: Option<&Self::Node>);
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn remove(&self, parent: &Self::Node, node: &Self::Node);

    /// Applies the change of `key` from `prev` to `next`; `next == None`
    /// removes it.
    fn patch_prop(
        &self,
        el: &Self::Node,
        key: &str,
        prev: Option<&PropValue>,
        next: Option<&PropValue>,
    );
}

impl<H: Host + ?Sized> Host for Rc<H> {
    type Node = H::Node;

    fn create_element(&self, tag: &str) -> Self::Node {
        (**self).create_element(tag)
    }

    fn create_text(&self, text: &str) -> Self::Node {
        (**self).create_text(text)
    }

    fn create_comment(&self, text: &str) -> Self::Node {
        (**self).create_comment(text)
    }

    fn set_element_text(&self, el: &Self::Node, text: &str) {
        (**self).set_element_text(el, text)
    }

    fn set_text(&self, node: &Self::Node, text: &str) {
        (**self).set_text(node, text)
    }

    fn set_comment(&self, node: &Self::Node, text: &str) {
        (**self).set_comment(node, text)
    }

    fn insert(&self, node: &Self::Node, parent: &Self::Node, anchor: Option<&Self::Node>) {
        (**self).insert(node, parent, anchor)
    }

    fn parent(&self, node: &Self::Node) -> Option<Self::Node> {
        (**self).parent(node)
    }

    fn remove(&self, parent: &Self::Node, node: &Self::Node) {
        (**self).remove(parent, node)
    }

    fn patch_prop(
        &self,
        el: &Self::Node,
        key: &str,
        prev: Option<&PropValue>,
        next: Option<&PropValue>,
    ) {
        (**self).patch_prop(el, key, prev, next)
    }
}
