use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("template ended inside a tag")]
    UnexpectedEof,
    #[error("expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },
    #[error("<{0}> is never closed")]
    UnclosedTag(String),
    #[error("</{0}> closes nothing")]
    UnexpectedClose(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("template has {0} root nodes, expected one")]
    MultipleRoots(usize),
    #[error("template has no root node")]
    EmptyRoot,
    /// A child was expected to carry its render-function node already.
    #[error("{0} has no render-function node")]
    MissingJsNode(String),
    #[error("{0} already has a render-function node")]
    JsNodeAlreadySet(String),
    #[error("the root node cannot be removed")]
    CannotRemoveRoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}
