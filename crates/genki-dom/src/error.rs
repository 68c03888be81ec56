//! Error types for the document model.

/// Result type alias for document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;

/// Errors that can occur while building or mutating a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Markup could not be parsed.
    #[error("HTML parse error at byte {offset}: {message}")]
    Parse {
        /// What went wrong.
        message: String,
        /// Byte offset into the source where the problem was detected.
        offset: usize,
    },

    /// The node ID is invalid or the node has been removed.
    #[error("Invalid or removed node")]
    InvalidNode,

    /// The operation requires an element node.
    #[error("Node is not an element")]
    NotAnElement,

    /// The operation requires a node that can hold children.
    #[error("Node cannot have children")]
    NotAContainer,

    /// Attempted to insert a node into its own subtree.
    #[error("Cannot insert a node into itself or one of its descendants")]
    CircularInsert,
}

impl DomError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, offset: usize) -> Self {
        Self::Parse {
            message: message.into(),
            offset,
        }
    }
}
