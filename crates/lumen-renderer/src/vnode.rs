use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::event::Event;

pub type EventHandler = Rc<dyn Fn(&Event)>;

pub type Props = BTreeMap<String, PropValue>;

/// Value of an attribute, DOM property, or event binding.
#[derive(Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Handler(EventHandler),
    Handlers(Vec<EventHandler>),
}

impl PropValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn is_handler(&self) -> bool {
        matches!(self, PropValue::Handler(_) | PropValue::Handlers(_))
    }

    pub fn truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::Str(s) => !s.is_empty(),
            PropValue::Handler(_) | PropValue::Handlers(_) => true,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => Rc::ptr_eq(a, b),
            (PropValue::Handlers(a), PropValue::Handlers(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => write!(f, "Null"),
            PropValue::Bool(b) => write!(f, "Bool({b})"),
            PropValue::Number(n) => write!(f, "Number({n})"),
            PropValue::Str(s) => write!(f, "Str({s:?})"),
            PropValue::Handler(_) => write!(f, "Handler(<callback>)"),
            PropValue::Handlers(h) => write!(f, "Handlers(<{} callbacks>)", h.len()),
        }
    }
}

// whole numbers below this print without a fraction
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Attribute serialization.
impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("null"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                write!(f, "{}", *n as i64)
            }
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Str(s) => f.write_str(s),
            PropValue::Handler(_) | PropValue::Handlers(_) => f.write_str("[function]"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(n.into())
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.into())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s.into())
    }
}

impl From<EventHandler> for PropValue {
    fn from(h: EventHandler) -> Self {
        PropValue::Handler(h)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(PropValue::Null, Into::into)
    }
}

/// Descriptor of a stateful component. Components are matched by identity.
#[derive(Debug)]
pub struct ComponentDescriptor {
    pub name: String,
}

#[derive(Clone, Debug)]
pub enum VNodeType {
    Element(Rc<str>),
    Text,
    Comment,
    Fragment,
    Component(Rc<ComponentDescriptor>),
}

impl PartialEq for VNodeType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VNodeType::Element(a), VNodeType::Element(b)) => a == b,
            (VNodeType::Text, VNodeType::Text)
            | (VNodeType::Comment, VNodeType::Comment)
            | (VNodeType::Fragment, VNodeType::Fragment) => true,
            (VNodeType::Component(a), VNodeType::Component(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for VNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VNodeType::Element(tag) => write!(f, "<{tag}>"),
            VNodeType::Text => f.write_str("text"),
            VNodeType::Comment => f.write_str("comment"),
            VNodeType::Fragment => f.write_str("fragment"),
            VNodeType::Component(c) => write!(f, "component `{}`", c.name),
        }
    }
}

pub enum Children<N> {
    None,
    Text(Rc<str>),
    Nodes(Vec<VNode<N>>),
}

impl<N> Children<N> {
    pub fn is_none(&self) -> bool {
        matches!(self, Children::None)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Children::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&[VNode<N>]> {
        match self {
            Children::Nodes(n) => Some(n),
            _ => None,
        }
    }
}

impl<N> Clone for Children<N> {
    fn clone(&self) -> Self {
        match self {
            Children::None => Children::None,
            Children::Text(t) => Children::Text(t.clone()),
            Children::Nodes(n) => Children::Nodes(n.clone()),
        }
    }
}

impl<N> fmt::Debug for Children<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Children::None => write!(f, "None"),
            Children::Text(t) => write!(f, "Text({t:?})"),
            Children::Nodes(n) => f.debug_list().entries(n).finish(),
        }
    }
}

impl<N> From<&str> for Children<N> {
    fn from(s: &str) -> Self {
        Children::Text(s.into())
    }
}

impl<N> From<String> for Children<N> {
    fn from(s: String) -> Self {
        Children::Text(s.into())
    }
}

impl<N> From<Vec<VNode<N>>> for Children<N> {
    fn from(nodes: Vec<VNode<N>>) -> Self {
        Children::Nodes(nodes)
    }
}

impl<N> From<VNode<N>> for Children<N> {
    fn from(node: VNode<N>) -> Self {
        Children::Nodes(vec![node])
    }
}

impl<N> From<Option<Vec<VNode<N>>>> for Children<N> {
    fn from(nodes: Option<Vec<VNode<N>>>) -> Self {
        nodes.map_or(Children::None, Children::Nodes)
    }
}

bitflags! {
    /// Summary of a vnode's type and children form.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ShapeFlags: u8 {
        const ELEMENT = 1;
        const TEXT = 1 << 1;
        const COMMENT = 1 << 2;
        const FRAGMENT = 1 << 3;
        const COMPONENT = 1 << 4;
        const TEXT_CHILDREN = 1 << 5;
        const ARRAY_CHILDREN = 1 << 6;
    }
}

/// Description of one node of the tree to render.
///
/// `N` is the host's node handle. `el` is filled in by the renderer once the
/// vnode is mounted and cannot be set from outside this crate.
pub struct VNode<N> {
    kind: VNodeType,
    props: Option<Props>,
    children: Children<N>,
    shape: ShapeFlags,
    el: RefCell<Option<N>>,
}

impl<N> VNode<N> {
    pub fn new(kind: VNodeType, props: Option<Props>, children: Children<N>) -> Self {
        let shape = shape_of(&kind, &children);
        Self {
            kind,
            props,
            children,
            shape,
            el: RefCell::new(None),
        }
    }

    pub fn element(tag: &str) -> Self {
        Self::new(VNodeType::Element(tag.into()), None, Children::None)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(VNodeType::Text, None, Children::Text(content.into().into()))
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self::new(VNodeType::Comment, None, Children::Text(content.into().into()))
    }

    pub fn fragment(children: Vec<VNode<N>>) -> Self {
        Self::new(VNodeType::Fragment, None, Children::Nodes(children))
    }

    pub fn component(descriptor: Rc<ComponentDescriptor>) -> Self {
        Self::new(VNodeType::Component(descriptor), None, Children::None)
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(key.into(), value.into());
        self
    }

    /// Binds `handler` to `event` (`"click"` → the `onClick` prop).
    pub fn on(self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        let mut chars = event.chars();
        let key = match chars.next() {
            Some(first) => format!("on{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => "on".to_string(),
        };
        let handler: EventHandler = Rc::new(handler);
        self.prop(key, handler)
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    pub fn with_children(mut self, children: impl Into<Children<N>>) -> Self {
        self.children = children.into();
        self.shape = shape_of(&self.kind, &self.children);
        self
    }

    pub fn kind(&self) -> &VNodeType {
        &self.kind
    }

    pub fn props(&self) -> Option<&Props> {
        self.props.as_ref()
    }

    pub fn children(&self) -> &Children<N> {
        &self.children
    }

    pub fn shape(&self) -> ShapeFlags {
        self.shape
    }

    /// Content of a text or comment vnode.
    pub fn content(&self) -> &str {
        self.children.as_text().unwrap_or_default()
    }
}

impl<N: Clone> VNode<N> {
    /// The mounted host node, if any.
    pub fn el(&self) -> Option<N> {
        self.el.borrow().clone()
    }

    pub(crate) fn set_el(&self, el: Option<N>) {
        *self.el.borrow_mut() = el;
    }
}

/// Clones the description only; the copy is not mounted.
impl<N> Clone for VNode<N> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            props: self.props.clone(),
            children: self.children.clone(),
            shape: self.shape,
            el: RefCell::new(None),
        }
    }
}

impl<N> fmt::Debug for VNode<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("kind", &self.kind)
            .field("props", &self.props)
            .field("children", &self.children)
            .field("mounted", &self.el.borrow().is_some())
            .finish()
    }
}

fn shape_of<N>(kind: &VNodeType, children: &Children<N>) -> ShapeFlags {
    let mut shape = match kind {
        VNodeType::Element(_) => ShapeFlags::ELEMENT,
        VNodeType::Text => ShapeFlags::TEXT,
        VNodeType::Comment => ShapeFlags::COMMENT,
        VNodeType::Fragment => ShapeFlags::FRAGMENT,
        VNodeType::Component(_) => ShapeFlags::COMPONENT,
    };
    match children {
        Children::Text(_) => shape |= ShapeFlags::TEXT_CHILDREN,
        Children::Nodes(_) => shape |= ShapeFlags::ARRAY_CHILDREN,
        Children::None => {}
    }
    shape
}

/// `h("div", "text")`, `h("ul", vec![...])`: element vnode with children.
pub fn h<N>(tag: &str, children: impl Into<Children<N>>) -> VNode<N> {
    VNode::element(tag).with_children(children)
}
