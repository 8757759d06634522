use std::cell::RefCell;

use crate::error::RenderError;
use crate::host::Host;
use crate::vnode::{Children, Props, ShapeFlags, VNode, VNodeType};

/// A host mount point plus the tree last rendered into it.
pub struct Container<N> {
    node: N,
    vnode: RefCell<Option<VNode<N>>>,
}

impl<N> Container<N> {
    pub fn new(node: N) -> Self {
        Self {
            node,
            vnode: RefCell::new(None),
        }
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn has_vnode(&self) -> bool {
        self.vnode.borrow().is_some()
    }

    pub fn with_vnode<R>(&self, f: impl FnOnce(Option<&VNode<N>>) -> R) -> R {
        f(self.vnode.borrow().as_ref())
    }
}

/// Turns vnode trees into host operations, diffing against the previous tree.
pub struct Renderer<H: Host> {
    host: H,
}

impl<H: Host> Renderer<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Renders `vnode` into `container`; `None` tears down whatever is there.
    ///
    /// On success the container remembers `vnode` as the base of the next
    /// diff. A tree holding a component anywhere is rejected before the host
    /// is touched, and the container keeps its previous tree.
    pub fn render(
        &self,
        vnode: Option<VNode<H::Node>>,
        container: &Container<H::Node>,
    ) -> Result<(), RenderError> {
        if let Some(component) = vnode.as_ref().and_then(find_component) {
            return Err(RenderError::UnsupportedNodeType(component.kind().to_string()));
        }
        let previous = container.vnode.borrow_mut().take();
        let result = match (&vnode, &previous) {
            (Some(next), prev) => self.patch(prev.as_ref(), next, &container.node),
            (None, Some(prev)) => self.unmount(prev),
            (None, None) => Ok(()),
        };
        *container.vnode.borrow_mut() = match result {
            Ok(()) => vnode,
            Err(_) => previous,
        };
        result
    }

    fn patch(
        &self,
        old: Option<&VNode<H::Node>>,
        new: &VNode<H::Node>,
        container: &H::Node,
    ) -> Result<(), RenderError> {
        let old = match old {
            Some(old) if old.kind() != new.kind() => {
                log::debug!("type changed {} -> {}; remounting", old.kind(), new.kind());
                self.unmount(old)?;
                None
            }
            other => other,
        };

        match new.kind() {
            VNodeType::Element(_) => match old {
                None => self.mount_element(new, container),
                Some(old) => self.patch_element(old, new),
            },
            VNodeType::Text => {
                match old {
                    None => {
                        let el = self.host.create_text(new.content());
                        self.host.insert(&el, container, None);
                        new.set_el(Some(el));
                    }
                    Some(old) => {
                        let el = mounted(old)?;
                        if old.content() != new.content() {
                            self.host.set_text(&el, new.content());
                        }
                        new.set_el(Some(el));
                    }
                }
                Ok(())
            }
            VNodeType::Comment => {
                match old {
                    None => {
                        let el = self.host.create_comment(new.content());
                        self.host.insert(&el, container, None);
                        new.set_el(Some(el));
                    }
                    Some(old) => {
                        let el = mounted(old)?;
                        if old.content() != new.content() {
                            self.host.set_comment(&el, new.content());
                        }
                        new.set_el(Some(el));
                    }
                }
                Ok(())
            }
            VNodeType::Fragment => match old {
                None => {
                    if let Children::Nodes(children) = new.children() {
                        for child in children {
                            self.patch(None, child, container)?;
                        }
                    }
                    Ok(())
                }
                Some(old) => self.patch_children(old, new, container),
            },
            // Extension point for a component model.
            VNodeType::Component(_) => Err(RenderError::UnsupportedNodeType(new.kind().to_string())),
        }
    }

    fn mount_element(&self, vnode: &VNode<H::Node>, container: &H::Node) -> Result<(), RenderError> {
        let VNodeType::Element(tag) = vnode.kind() else {
            return Err(RenderError::UnsupportedNodeType(vnode.kind().to_string()));
        };
        log::debug!("mount <{tag}>");
        let el = self.host.create_element(tag);
        vnode.set_el(Some(el.clone()));

        match vnode.children() {
            Children::Text(text) => self.host.set_element_text(&el, text),
            Children::Nodes(children) => {
                for child in children {
                    self.patch(None, child, &el)?;
                }
            }
            Children::None => {}
        }

        if let Some(props) = vnode.props() {
            for (key, value) in props {
                self.host.patch_prop(&el, key, None, Some(value));
            }
        }

        self.host.insert(&el, container, None);
        Ok(())
    }

    fn patch_element(&self, old: &VNode<H::Node>, new: &VNode<H::Node>) -> Result<(), RenderError> {
        let el = mounted(old)?;
        new.set_el(Some(el.clone()));

        let empty = Props::new();
        let old_props = old.props().unwrap_or(&empty);
        let new_props = new.props().unwrap_or(&empty);

        for (key, next) in new_props {
            let prev = old_props.get(key);
            if prev != Some(next) {
                self.host.patch_prop(&el, key, prev, Some(next));
            }
        }
        for (key, prev) in old_props {
            if !new_props.contains_key(key) {
                self.host.patch_prop(&el, key, Some(prev), None);
            }
        }

        self.patch_children(old, new, &el)
    }

    /// Un-keyed children diff: old children are torn down and new ones
    /// mounted whenever the new side is a sequence.
    fn patch_children(
        &self,
        old: &VNode<H::Node>,
        new: &VNode<H::Node>,
        container: &H::Node,
    ) -> Result<(), RenderError> {
        let old_shape = old.shape();
        let new_shape = new.shape();

        if old_shape.contains(ShapeFlags::ARRAY_CHILDREN) {
            for child in old.children().as_nodes().unwrap_or_default() {
                self.unmount(child)?;
            }
        }

        if new_shape.contains(ShapeFlags::TEXT_CHILDREN) {
            let text = new.children().as_text().unwrap_or_default();
            self.host.set_element_text(container, text);
        } else if new_shape.contains(ShapeFlags::ARRAY_CHILDREN) {
            if !old_shape.contains(ShapeFlags::ARRAY_CHILDREN) {
                self.host.set_element_text(container, "");
            }
            for child in new.children().as_nodes().unwrap_or_default() {
                self.patch(None, child, container)?;
            }
        } else if old_shape.contains(ShapeFlags::TEXT_CHILDREN) {
            self.host.set_element_text(container, "");
        }
        Ok(())
    }

    /// Removes the vnode's host node from its parent. Fragments own no host
    /// node; their children are unmounted one by one.
    pub fn unmount(&self, vnode: &VNode<H::Node>) -> Result<(), RenderError> {
        let shape = vnode.shape();
        if shape.contains(ShapeFlags::FRAGMENT) {
            for child in vnode.children().as_nodes().unwrap_or_default() {
                self.unmount(child)?;
            }
            return Ok(());
        }
        if shape.contains(ShapeFlags::COMPONENT) {
            return Err(RenderError::UnsupportedNodeType(vnode.kind().to_string()));
        }
        let el = mounted(vnode)?;
        log::debug!("unmount {}", vnode.kind());
        if let Some(parent) = self.host.parent(&el) {
            self.host.remove(&parent, &el);
        }
        Ok(())
    }
}

/// First component vnode in `vnode`'s subtree, depth first.
fn find_component<N>(vnode: &VNode<N>) -> Option<&VNode<N>> {
    if vnode.shape().contains(ShapeFlags::COMPONENT) {
        return Some(vnode);
    }
    if !vnode.shape().contains(ShapeFlags::ARRAY_CHILDREN) {
        return None;
    }
    vnode
        .children()
        .as_nodes()
        .unwrap_or_default()
        .iter()
        .find_map(find_component)
}

fn mounted<N: Clone>(vnode: &VNode<N>) -> Result<N, RenderError> {
    vnode
        .el()
        .ok_or_else(|| RenderError::MissingElement(vnode.kind().to_string()))
}
