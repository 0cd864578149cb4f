//! Error types for the Lineage system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every error falls into one of three caller-visible categories
//! (invalid input, conflict, allocation failure), each of which maps to a
//! [`Status`] code.

use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

use crate::id::{EntityId, GroupId};

/// Result type for Lineage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Lineage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: InvalidInput) -> Self {
        Self::new(ErrorKind::InvalidInput(reason))
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(reason: Conflict) -> Self {
        Self::new(ErrorKind::Conflict(reason))
    }

    /// Creates an allocation failure error.
    #[must_use]
    pub fn allocation(reason: AllocationFailure) -> Self {
        Self::new(ErrorKind::Allocation(reason))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns the caller-facing status code for this error.
    #[must_use]
    pub fn status(&self) -> Status {
        match self.kind {
            ErrorKind::InvalidInput(_) => Status::InvalidInput,
            ErrorKind::Conflict(_) | ErrorKind::Internal(_) => Status::Failure,
            ErrorKind::Allocation(_) => Status::AllocationError,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Self::allocation(AllocationFailure::Reserve {
            reason: err.to_string(),
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The caller supplied malformed arguments.
    #[error("invalid input: {0}")]
    InvalidInput(InvalidInput),

    /// The arguments are well-formed but clash with existing state.
    #[error("conflict: {0}")]
    Conflict(Conflict),

    /// A node or record could not be allocated.
    #[error("allocation failure: {0}")]
    Allocation(AllocationFailure),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons an input is rejected before any state is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// Ids must be strictly positive.
    #[error("id must be positive, got {raw}")]
    NonPositiveId {
        /// The rejected raw value.
        raw: i64,
    },

    /// Ids that must be pairwise distinct were not.
    #[error("ids must be pairwise distinct, got {ids:?}")]
    DuplicateIds {
        /// The ids as supplied.
        ids: [u64; 3],
    },
}

/// Reasons a well-formed request clashes with current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
    /// A group with this id already exists.
    #[error("group already exists: {0}")]
    GroupExists(GroupId),

    /// No group with this id exists.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The group was merged away and no longer accepts entities or merges.
    #[error("{group} was absorbed into {into}")]
    GroupAbsorbed {
        /// The inert group.
        group: GroupId,
        /// The group that absorbed it.
        into: GroupId,
    },

    /// An entity with this id already exists.
    #[error("entity already exists: {0}")]
    EntityExists(EntityId),

    /// No entity with this id exists.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The forest already holds a node for this key.
    #[error("forest node already exists: {0}")]
    NodeExists(String),

    /// The forest holds no node for this key.
    #[error("forest node not found: {0}")]
    NodeNotFound(String),

    /// Both keys already resolve to the same root.
    #[error("forest nodes already share a root: {0}")]
    AlreadyJoined(String),
}

/// Reasons a node or record could not be allocated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationFailure {
    /// The allocator refused to grow a buffer.
    #[error("reserve failed: {reason}")]
    Reserve {
        /// Allocator message.
        reason: String,
    },

    /// The configured forest node ceiling was reached.
    #[error("node limit ({limit}) reached")]
    NodeLimit {
        /// The configured limit.
        limit: usize,
    },

    /// The configured entity ceiling was reached.
    #[error("entity limit ({limit}) reached")]
    EntityLimit {
        /// The configured limit.
        limit: usize,
    },
}

/// Caller-facing outcome codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The operation succeeded.
    Success,
    /// The request conflicted with existing state.
    Failure,
    /// The request was malformed.
    InvalidInput,
    /// Allocation failed; no state was changed.
    AllocationError,
}

impl Status {
    /// Returns the status of an operation result.
    #[must_use]
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => err.status(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::AllocationError => "ALLOCATION_ERROR",
        };
        f.write_str(name)
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// The operation that failed.
    pub operation: Option<String>,
    /// Call frames, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
