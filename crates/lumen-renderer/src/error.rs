use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Component and other non-host types reached the patch state machine.
    #[error("cannot render {0}: only elements, text, comments and fragments are supported")]
    UnsupportedNodeType(String),
    /// A vnode that should have been mounted has no host node.
    #[error("{0} vnode has no mounted host node")]
    MissingElement(String),
}
