//! An in-memory document implementing [`Host`].
//!
//! Used for tests and headless rendering. Every host operation is recorded in
//! an operation log so callers can assert how much work a render did.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::rc::{Rc, Weak};

use web_time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::event::{Event, event_name};
use crate::host::Host;
use crate::vnode::PropValue;

/// One recorded host operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    CreateElement(String),
    CreateText(String),
    CreateComment(String),
    SetElementText(String),
    SetText(String),
    SetComment(String),
    Insert,
    Remove,
    PatchProp(String),
}

/// A DOM property value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomProp {
    Bool(bool),
    Str(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PropKind {
    Bool,
    Str,
}

/// Handle to a node of the in-memory document.
#[derive(Clone)]
pub struct DomNode(Rc<NodeData>);

struct NodeData {
    kind: NodeKind,
    parent: RefCell<Weak<NodeData>>,
    children: RefCell<Vec<DomNode>>,
}

enum NodeKind {
    Element(ElementData),
    Text(RefCell<String>),
    Comment(RefCell<String>),
}

struct ElementData {
    tag: String,
    class_name: RefCell<String>,
    attributes: RefCell<BTreeMap<String, String>>,
    properties: RefCell<BTreeMap<String, DomProp>>,
    // keyed by prop key (`onClick`)
    invokers: RefCell<BTreeMap<String, Rc<Invoker>>>,
}

/// Stable wrapper around the handlers bound to one `on*` prop.
///
/// Updating the prop swaps the handlers without re-binding, and the wrapper
/// remembers when it was bound so events older than the binding are dropped.
/// An event stamped with exactly the binding instant is still delivered; with
/// a coarse clock, a listener bound during dispatch can share the event's tick.
/// `TestClock::with_step` keeps the two readings apart.
struct Invoker {
    event: String,
    value: RefCell<PropValue>,
    attached: Instant,
}

impl Invoker {
    fn invoke(&self, event: &Event) -> bool {
        if event.time_stamp() < self.attached {
            log::debug!("`{}` listener bound after the event fired; skipping", self.event);
            return false;
        }
        let value = self.value.borrow().clone();
        match value {
            PropValue::Handler(f) => f(event),
            PropValue::Handlers(fs) => {
                for f in fs {
                    f(event);
                }
            }
            _ => return false,
        }
        true
    }
}

impl DomNode {
    fn new(kind: NodeKind) -> Self {
        Self(Rc::new(NodeData {
            kind,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        }))
    }

    /// A detached element, e.g. a mount point. Not recorded by any host.
    pub fn element(tag: &str) -> Self {
        Self::new(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            class_name: RefCell::new(String::new()),
            attributes: RefCell::new(BTreeMap::new()),
            properties: RefCell::new(BTreeMap::new()),
            invokers: RefCell::new(BTreeMap::new()),
        }))
    }

    fn text(content: &str) -> Self {
        Self::new(NodeKind::Text(RefCell::new(content.to_string())))
    }

    fn comment(content: &str) -> Self {
        Self::new(NodeKind::Comment(RefCell::new(content.to_string())))
    }

    fn as_element(&self) -> Option<&ElementData> {
        match &self.0.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &DomNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag.as_str())
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.kind, NodeKind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.0.kind, NodeKind::Comment(_))
    }

    pub fn parent(&self) -> Option<DomNode> {
        self.0.parent.borrow().upgrade().map(DomNode)
    }

    pub fn children(&self) -> Vec<DomNode> {
        self.0.children.borrow().clone()
    }

    pub fn child(&self, index: usize) -> Option<DomNode> {
        self.0.children.borrow().get(index).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match &self.0.kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => t.borrow().clone(),
            NodeKind::Element(_) => self
                .0
                .children
                .borrow()
                .iter()
                .filter(|c| !c.is_comment())
                .map(DomNode::text_content)
                .collect(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attributes.borrow().get(name).cloned())
    }

    pub fn property(&self, name: &str) -> Option<DomProp> {
        self.as_element()
            .and_then(|e| e.properties.borrow().get(name).cloned())
    }

    pub fn class_name(&self) -> String {
        self.as_element()
            .map(|e| e.class_name.borrow().clone())
            .unwrap_or_default()
    }

    pub fn has_listener(&self, event: &str) -> bool {
        self.as_element().is_some_and(|e| {
            e.invokers
                .borrow()
                .values()
                .any(|invoker| invoker.event == event)
        })
    }

    fn listeners_for(&self, event: &str) -> Vec<Rc<Invoker>> {
        self.as_element()
            .map(|e| {
                e.invokers
                    .borrow()
                    .values()
                    .filter(|invoker| invoker.event == event)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.0.children.borrow_mut().retain(|c| !c.ptr_eq(self));
        }
        *self.0.parent.borrow_mut() = Weak::new();
    }

    /// Serializes the subtree. Properties and listeners are not included.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.0.kind {
            NodeKind::Text(t) => out.push_str(&t.borrow()),
            NodeKind::Comment(t) => {
                let _ = write!(out, "<!--{}-->", t.borrow());
            }
            NodeKind::Element(e) => {
                let _ = write!(out, "<{}", e.tag);
                let class_name = e.class_name.borrow();
                if !class_name.is_empty() {
                    let _ = write!(out, " class=\"{class_name}\"");
                }
                for (name, value) in e.attributes.borrow().iter() {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                out.push('>');
                for child in self.0.children.borrow().iter() {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", e.tag);
            }
        }
    }
}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomNode({})", self.to_html())
    }
}

pub struct MemoryHost {
    clock: Box<dyn Clock>,
    ops: RefCell<Vec<Op>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            ops: RefCell::new(Vec::new()),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    pub fn count_ops(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.borrow().iter().filter(|op| pred(op)).count()
    }

    fn record(&self, op: Op) {
        log::trace!("host {op:?}");
        self.ops.borrow_mut().push(op);
    }

    /// Delivers `event` to `target` and then to each ancestor, stopping early
    /// if a listener stops propagation. Returns how many listeners ran.
    pub fn dispatch(&self, target: &DomNode, event: &Event) -> usize {
        let mut path = vec![target.clone()];
        let mut cursor = target.parent();
        while let Some(node) = cursor {
            cursor = node.parent();
            path.push(node);
        }

        let mut invoked = 0;
        for node in path {
            if event.is_propagation_stopped() {
                break;
            }
            // looked up per node: listeners bound by an earlier one are seen here
            for invoker in node.listeners_for(event.kind()) {
                if invoker.invoke(event) {
                    invoked += 1;
                }
            }
        }
        invoked
    }

    /// Dispatches a `click` stamped with the current time.
    pub fn click(&self, target: &DomNode) -> usize {
        let event = Event::new("click", self.now());
        self.dispatch(target, &event)
    }

    fn patch_event(&self, el: &ElementData, key: &str, name: String, next: Option<&PropValue>) {
        let existing = el.invokers.borrow().get(key).cloned();
        match (next.filter(|v| v.is_handler()), existing) {
            (Some(value), Some(invoker)) => {
                *invoker.value.borrow_mut() = value.clone();
            }
            (Some(value), None) => {
                let invoker = Rc::new(Invoker {
                    event: name,
                    value: RefCell::new(value.clone()),
                    attached: self.clock.now(),
                });
                el.invokers.borrow_mut().insert(key.to_string(), invoker);
            }
            (None, Some(_)) => {
                el.invokers.borrow_mut().remove(key);
            }
            (None, None) => {}
        }
    }
}

/// Which keys are DOM properties on an element with `tag`.
fn dom_property(tag: &str, key: &str) -> Option<PropKind> {
    let form_control = matches!(tag, "input" | "select" | "textarea" | "button");
    match key {
        // read-only on form controls, and not a property elsewhere
        "form" => None,
        "id" | "title" | "lang" | "dir" => Some(PropKind::Str),
        "hidden" => Some(PropKind::Bool),
        "disabled" if form_control || matches!(tag, "fieldset" | "option" | "optgroup") => {
            Some(PropKind::Bool)
        }
        "value" if form_control || tag == "option" => Some(PropKind::Str),
        "name" | "type" if form_control => Some(PropKind::Str),
        "placeholder" if matches!(tag, "input" | "textarea") => Some(PropKind::Str),
        "checked" if tag == "input" => Some(PropKind::Bool),
        "readOnly" | "required" if matches!(tag, "input" | "textarea") => Some(PropKind::Bool),
        "required" | "multiple" if tag == "select" => Some(PropKind::Bool),
        "selected" if tag == "option" => Some(PropKind::Bool),
        _ => None,
    }
}

impl Host for MemoryHost {
    type Node = DomNode;

    fn create_element(&self, tag: &str) -> DomNode {
        self.record(Op::CreateElement(tag.to_string()));
        DomNode::element(tag)
    }

    fn create_text(&self, text: &str) -> DomNode {
        self.record(Op::CreateText(text.to_string()));
        DomNode::text(text)
    }

    fn create_comment(&self, text: &str) -> DomNode {
        self.record(Op::CreateComment(text.to_string()));
        DomNode::comment(text)
    }

    fn set_element_text(&self, el: &DomNode, text: &str) {
        self.record(Op::SetElementText(text.to_string()));
        let old = std::mem::take(&mut *el.0.children.borrow_mut());
        for child in &old {
            *child.0.parent.borrow_mut() = Weak::new();
        }
        if !text.is_empty() {
            let node = DomNode::text(text);
            *node.0.parent.borrow_mut() = Rc::downgrade(&el.0);
            el.0.children.borrow_mut().push(node);
        }
    }

    fn set_text(&self, node: &DomNode, text: &str) {
        self.record(Op::SetText(text.to_string()));
        if let NodeKind::Text(t) = &node.0.kind {
            *t.borrow_mut() = text.to_string();
        }
    }

    fn set_comment(&self, node: &DomNode, text: &str) {
        self.record(Op::SetComment(text.to_string()));
        if let NodeKind::Comment(t) = &node.0.kind {
            *t.borrow_mut() = text.to_string();
        }
    }

    fn insert(&self, node: &DomNode, parent: &DomNode, anchor: Option<&DomNode>) {
        self.record(Op::Insert);
        node.detach();
        let mut children = parent.0.children.borrow_mut();
        let index = anchor
            .and_then(|a| children.iter().position(|c| c.ptr_eq(a)))
            .unwrap_or(children.len());
        children.insert(index, node.clone());
        *node.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
    }

    fn parent(&self, node: &DomNode) -> Option<DomNode> {
        node.parent()
    }

    fn remove(&self, parent: &DomNode, node: &DomNode) {
        self.record(Op::Remove);
        parent.0.children.borrow_mut().retain(|c| !c.ptr_eq(node));
        *node.0.parent.borrow_mut() = Weak::new();
    }

    fn patch_prop(
        &self,
        el: &DomNode,
        key: &str,
        _prev: Option<&PropValue>,
        next: Option<&PropValue>,
    ) {
        self.record(Op::PatchProp(key.to_string()));
        let Some(data) = el.as_element() else {
            log::warn!("patch_prop `{key}` on a non-element node");
            return;
        };

        if let Some(name) = event_name(key) {
            self.patch_event(data, key, name, next);
        } else if key == "class" {
            *data.class_name.borrow_mut() = next
                .filter(|v| v.truthy())
                .map(ToString::to_string)
                .unwrap_or_default();
        } else if let Some(kind) = dom_property(&data.tag, key) {
            let value = match kind {
                PropKind::Bool => DomProp::Bool(match next {
                    Some(PropValue::Str(s)) if s.is_empty() => true,
                    Some(v) => v.truthy(),
                    None => false,
                }),
                PropKind::Str => DomProp::Str(
                    next.filter(|v| !v.is_null())
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                ),
            };
            data.properties.borrow_mut().insert(key.to_string(), value);
        } else {
            match next {
                Some(v) if !v.is_null() => {
                    data.attributes
                        .borrow_mut()
                        .insert(key.to_string(), v.to_string());
                }
                _ => {
                    data.attributes.borrow_mut().remove(key);
                }
            }
        }
    }
}
