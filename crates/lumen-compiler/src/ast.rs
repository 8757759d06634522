use std::fmt;

use crate::error::TransformError;
use crate::js_ast::JsNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element(String),
    Text(String),
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Root => f.write_str("Root"),
            NodeKind::Element(tag) => write!(f, "Element: {tag}"),
            NodeKind::Text(content) => write!(f, "Text: {content}"),
        }
    }
}

/// A node of the markup AST.
///
/// `js_node` starts empty and is filled once by the transformer.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    kind: NodeKind,
    children: Vec<TemplateNode>,
    js_node: Option<JsNode>,
}

impl TemplateNode {
    fn new(kind: NodeKind, children: Vec<TemplateNode>) -> Self {
        Self {
            kind,
            children,
            js_node: None,
        }
    }

    pub fn root(children: Vec<TemplateNode>) -> Self {
        Self::new(NodeKind::Root, children)
    }

    pub fn element(tag: impl Into<String>, children: Vec<TemplateNode>) -> Self {
        Self::new(NodeKind::Element(tag.into()), children)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(content.into()), Vec::new())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    pub fn children(&self) -> &[TemplateNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<TemplateNode> {
        &mut self.children
    }

    pub fn js_node(&self) -> Option<&JsNode> {
        self.js_node.as_ref()
    }

    pub fn set_js_node(&mut self, node: JsNode) -> Result<(), TransformError> {
        if self.js_node.is_some() {
            return Err(TransformError::JsNodeAlreadySet(self.kind.to_string()));
        }
        self.js_node = Some(node);
        Ok(())
    }

    pub fn take_js_node(&mut self) -> Option<JsNode> {
        self.js_node.take()
    }

    /// Indented outline, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, indent: usize) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&"-".repeat(indent));
        out.push_str(&self.kind.to_string());
        for child in &self.children {
            child.dump_into(out, indent + 2);
        }
    }
}
