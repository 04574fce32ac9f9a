//! View hierarchy error types

use thiserror::Error;

/// Errors raised by structural view-hierarchy mutations
#[derive(Error, Debug)]
pub enum ViewError {
    /// A view cannot become a subview of itself or of one of its descendants
    #[error("cannot insert a view into itself or its own descendant")]
    HierarchyCycle,

    /// Subview insertion index past the end of the child list
    #[error("subview index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for view hierarchy operations
pub type Result<T> = std::result::Result<T, ViewError>;
