use crate::js_ast::JsNode;

const INDENT: &str = "  ";

struct CodegenContext {
    code: String,
    level: usize,
}

impl CodegenContext {
    fn push(&mut self, s: &str) {
        self.code.push_str(s);
    }

    fn newline(&mut self) {
        self.code.push('\n');
        for _ in 0..self.level {
            self.code.push_str(INDENT);
        }
    }

    fn indent(&mut self) {
        self.level += 1;
        self.newline();
    }

    fn deindent(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.newline();
    }

    fn node_list(&mut self, nodes: &[JsNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.node(node);
        }
    }

    fn node(&mut self, node: &JsNode) {
        match node {
            JsNode::FunctionDecl { id, params, body } => {
                self.push("function ");
                self.node(id);
                self.push(" (");
                self.node_list(params);
                self.push(") {");
                self.indent();
                for (i, statement) in body.iter().enumerate() {
                    if i > 0 {
                        self.newline();
                    }
                    self.node(statement);
                }
                self.deindent();
                self.push("}");
            }
            JsNode::ReturnStatement { value } => {
                self.push("return ");
                self.node(value);
            }
            JsNode::CallExpression { callee, arguments } => {
                self.node(callee);
                self.push("(");
                self.node_list(arguments);
                self.push(")");
            }
            JsNode::ArrayExpression { elements } => {
                self.push("[");
                self.node_list(elements);
                self.push("]");
            }
            JsNode::StringLiteral { value } => {
                self.push("'");
                for c in value.chars() {
                    match c {
                        '\'' => self.push("\\'"),
                        '\\' => self.push("\\\\"),
                        '\n' => self.push("\\n"),
                        c => self.code.push(c),
                    }
                }
                self.push("'");
            }
            JsNode::Identifier { name } => self.push(name),
        }
    }
}

/// Prints `node` as JavaScript source.
pub fn generate(node: &JsNode) -> String {
    let mut ctx = CodegenContext {
        code: String::new(),
        level: 0,
    };
    ctx.node(node);
    ctx.code
}
