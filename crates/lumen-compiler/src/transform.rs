//! Markup AST → render-function AST.
//!
//! The [`Transformer`] walks the tree depth first. For each node it runs the
//! entry phase of every registered [`NodeTransform`] in order; an entry phase
//! may hand back an [`ExitFn`], and those run after the node's children are
//! done, last registered first. By then every child carries its own
//! `js_node`, so exit phases can assemble structure bottom-up.

use crate::ast::{NodeKind, TemplateNode};
use crate::error::TransformError;
use crate::js_ast::JsNode;

/// Deferred work for a node, run once its children are transformed.
pub type ExitFn = Box<dyn FnOnce(&mut TemplateNode) -> Result<(), TransformError>>;

pub trait NodeTransform {
    fn enter(&self, ctx: &mut TransformContext) -> Result<Option<ExitFn>, TransformError>;
}

impl<F> NodeTransform for F
where
    F: Fn(&mut TransformContext) -> Result<Option<ExitFn>, TransformError>,
{
    fn enter(&self, ctx: &mut TransformContext) -> Result<Option<ExitFn>, TransformError> {
        self(ctx)
    }
}

/// Traversal state shared with transforms.
pub struct TransformContext {
    current: Option<TemplateNode>,
    ancestors: Vec<NodeKind>,
    child_index: usize,
}

impl TransformContext {
    fn new() -> Self {
        Self {
            current: None,
            ancestors: Vec::new(),
            child_index: 0,
        }
    }

    /// The node being visited; `None` once it has been removed.
    pub fn current_node(&self) -> Option<&TemplateNode> {
        self.current.as_ref()
    }

    pub fn current_node_mut(&mut self) -> Option<&mut TemplateNode> {
        self.current.as_mut()
    }

    pub fn parent_kind(&self) -> Option<&NodeKind> {
        self.ancestors.last()
    }

    pub fn parent_tag(&self) -> Option<&str> {
        match self.ancestors.last() {
            Some(NodeKind::Element(tag)) => Some(tag),
            _ => None,
        }
    }

    /// Position of the current node among its parent's surviving children.
    pub fn child_index(&self) -> usize {
        self.child_index
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Puts `node` in place of the current node. Transforms that have not run
    /// yet, and the descent into children, see the replacement.
    pub fn replace_node(&mut self, node: TemplateNode) {
        self.current = Some(node);
    }

    /// Splices the current node out of its parent. Nothing else runs for it.
    pub fn remove_node(&mut self) -> Result<(), TransformError> {
        if self.ancestors.is_empty() {
            return Err(TransformError::CannotRemoveRoot);
        }
        self.current = None;
        Ok(())
    }
}

pub struct Transformer {
    transforms: Vec<Box<dyn NodeTransform>>,
}

impl Default for Transformer {
    /// Element, Text, Root, in that order.
    fn default() -> Self {
        Self::empty()
            .with(TransformElement)
            .with(TransformText)
            .with(TransformRoot)
    }
}

impl Transformer {
    pub fn empty() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    pub fn with(mut self, transform: impl NodeTransform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn push(&mut self, transform: impl NodeTransform + 'static) {
        self.transforms.push(Box::new(transform));
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transform(&self, ast: TemplateNode) -> Result<TemplateNode, TransformError> {
        let mut ctx = TransformContext::new();
        let ast = self
            .traverse(ast, &mut ctx)?
            .ok_or(TransformError::CannotRemoveRoot)?;
        log::debug!("template ast after transform:\n{}", ast.dump());
        Ok(ast)
    }

    /// Returns the node as it ends up, or `None` if a transform removed it.
    fn traverse(
        &self,
        node: TemplateNode,
        ctx: &mut TransformContext,
    ) -> Result<Option<TemplateNode>, TransformError> {
        ctx.current = Some(node);
        let mut exits = Vec::new();
        for transform in &self.transforms {
            if let Some(exit) = transform.enter(ctx)? {
                exits.push(exit);
            }
            if ctx.current.is_none() {
                return Ok(None);
            }
        }
        let Some(mut node) = ctx.current.take() else {
            return Ok(None);
        };

        let children = std::mem::take(node.children_mut());
        let mut kept = Vec::with_capacity(children.len());
        ctx.ancestors.push(node.kind().clone());
        for child in children {
            ctx.child_index = kept.len();
            if let Some(child) = self.traverse(child, ctx)? {
                kept.push(child);
            }
        }
        ctx.ancestors.pop();
        *node.children_mut() = kept;

        for exit in exits.into_iter().rev() {
            exit(&mut node)?;
        }
        Ok(Some(node))
    }
}

/// Runs the default transforms over `ast`.
pub fn transform(ast: TemplateNode) -> Result<TemplateNode, TransformError> {
    Transformer::default().transform(ast)
}

fn child_js(child: &TemplateNode) -> Result<JsNode, TransformError> {
    child
        .js_node()
        .cloned()
        .ok_or_else(|| TransformError::MissingJsNode(child.kind().to_string()))
}

/// `<tag>…</tag>` → `h('tag', child)` or `h('tag', [children…])`.
pub struct TransformElement;

impl NodeTransform for TransformElement {
    fn enter(&self, _ctx: &mut TransformContext) -> Result<Option<ExitFn>, TransformError> {
        Ok(Some(Box::new(|node: &mut TemplateNode| {
            let Some(tag) = node.tag() else {
                return Ok(());
            };
            let mut arguments = vec![JsNode::string_literal(tag)];
            match node.children() {
                [only] => arguments.push(child_js(only)?),
                children => {
                    let elements = children.iter().map(child_js).collect::<Result<_, _>>()?;
                    arguments.push(JsNode::array_expression(elements));
                }
            }
            node.set_js_node(JsNode::call_expression("h", arguments))
        })))
    }
}

/// Text → string literal.
pub struct TransformText;

impl NodeTransform for TransformText {
    fn enter(&self, ctx: &mut TransformContext) -> Result<Option<ExitFn>, TransformError> {
        if let Some(node) = ctx.current_node_mut()
            && let Some(content) = node.content()
        {
            let literal = JsNode::string_literal(content);
            node.set_js_node(literal)?;
        }
        Ok(None)
    }
}

/// Root → `function render () { return <root element> }`.
pub struct TransformRoot;

impl NodeTransform for TransformRoot {
    fn enter(&self, _ctx: &mut TransformContext) -> Result<Option<ExitFn>, TransformError> {
        Ok(Some(Box::new(|node: &mut TemplateNode| {
            if !node.is_root() {
                return Ok(());
            }
            let body = match node.children() {
                [] => return Err(TransformError::EmptyRoot),
                [only] => child_js(only)?,
                many => return Err(TransformError::MultipleRoots(many.len())),
            };
            node.set_js_node(JsNode::function_decl(
                "render",
                vec![JsNode::return_statement(body)],
            ))
        })))
    }
}
