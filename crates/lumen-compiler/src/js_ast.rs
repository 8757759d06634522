//! Render-function AST.
//!
//! Six node shapes, serialized with a `type` tag naming the shape:
//!
//! ```json
//! { "type": "CallExpression",
//!   "callee": { "type": "Identifier", "name": "h" },
//!   "arguments": [{ "type": "StringLiteral", "value": "p" }] }
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsNode {
    FunctionDecl {
        id: Box<JsNode>,
        params: Vec<JsNode>,
        body: Vec<JsNode>,
    },
    ReturnStatement {
        #[serde(rename = "return")]
        value: Box<JsNode>,
    },
    CallExpression {
        callee: Box<JsNode>,
        arguments: Vec<JsNode>,
    },
    ArrayExpression {
        elements: Vec<JsNode>,
    },
    StringLiteral {
        value: String,
    },
    Identifier {
        name: String,
    },
}

impl JsNode {
    pub fn string_literal(value: impl Into<String>) -> Self {
        JsNode::StringLiteral {
            value: value.into(),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        JsNode::Identifier { name: name.into() }
    }

    pub fn array_expression(elements: Vec<JsNode>) -> Self {
        JsNode::ArrayExpression { elements }
    }

    /// A call of the function named `callee`.
    pub fn call_expression(callee: &str, arguments: Vec<JsNode>) -> Self {
        JsNode::CallExpression {
            callee: Box::new(JsNode::identifier(callee)),
            arguments,
        }
    }

    pub fn return_statement(value: JsNode) -> Self {
        JsNode::ReturnStatement {
            value: Box::new(value),
        }
    }

    /// A parameterless function declaration.
    pub fn function_decl(name: &str, body: Vec<JsNode>) -> Self {
        JsNode::FunctionDecl {
            id: Box::new(JsNode::identifier(name)),
            params: Vec::new(),
            body,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            JsNode::FunctionDecl { .. } => "FunctionDecl",
            JsNode::ReturnStatement { .. } => "ReturnStatement",
            JsNode::CallExpression { .. } => "CallExpression",
            JsNode::ArrayExpression { .. } => "ArrayExpression",
            JsNode::StringLiteral { .. } => "StringLiteral",
            JsNode::Identifier { .. } => "Identifier",
        }
    }
}
