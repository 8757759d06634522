//! # Template compiler
//!
//! Lowers markup into the source of a render function in three steps:
//! [`parse`] builds the markup AST, [`transform`] decorates it with a
//! render-function AST ([`JsNode`]), and [`generate`] prints that as code.
//!
//! ```rust
//! let code = lumen_compiler::compile("<div><p>Vue</p><p>Template</p></div>")?;
//! assert_eq!(
//!     code,
//!     "function render () {\n  return h('div', [h('p', 'Vue'), h('p', 'Template')])\n}"
//! );
//! # Ok::<(), lumen_compiler::CompileError>(())
//! ```
//!
//! Custom passes implement [`NodeTransform`] and are registered on a
//! [`Transformer`] ahead of or after the defaults.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod js_ast;
pub mod parser;
pub mod transform;

pub use ast::*;
pub use codegen::*;
pub use error::*;
pub use js_ast::*;
pub use parser::*;
pub use transform::*;

/// Compiles a template with the default transforms.
pub fn compile(template: &str) -> Result<String, CompileError> {
    compile_with(&Transformer::default(), template)
}

pub fn compile_with(transformer: &Transformer, template: &str) -> Result<String, CompileError> {
    let ast = transformer.transform(parse(template)?)?;
    let js = ast
        .js_node()
        .ok_or_else(|| TransformError::MissingJsNode(ast.kind().to_string()))?;
    Ok(generate(js))
}
