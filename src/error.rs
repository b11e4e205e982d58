//! Unified error types for model-hierarchy.
//!
//! Every fallible operation in the library returns [`HierarchyError`]. Provider
//! failures carry enough structure (status code, body, context chain) for the
//! presentation layer to log them and pick a user-facing message.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for model-hierarchy operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HierarchyError {
    /// A named resource could not be resolved
    #[error("{what} '{name}' not found")]
    NotFound { what: &'static str, name: String },

    /// The remote provider answered with a non-success status
    #[error("Provider request failed ({context}): status {status}: {body}")]
    ProviderRequestFailed {
        context: String,
        status: u16,
        body: String,
    },

    /// A client-supplied node identifier could not be decoded
    #[error("Malformed node identifier '{id}': {reason}")]
    MalformedIdentifier { id: String, reason: String },

    /// The node kind has no children to expand
    #[error("Node '{id}' cannot be expanded")]
    UnsupportedExpansion { id: String },

    /// The provider violated the paging or parent-reference contract
    #[error("Provider protocol error: {context}")]
    ProviderProtocol {
        context: String,
        #[source]
        source: ProtocolErrorKind,
    },

    /// Transport-level failure talking to the provider
    #[error("Network error ({context}): {message}")]
    Network { context: String, message: String },

    /// The provider answered but the payload was unusable
    #[error("Invalid provider response ({context}): {message}")]
    InvalidResponse { context: String, message: String },

    /// The request context deadline passed
    #[error("Deadline exceeded after {elapsed:?}")]
    DeadlineExceeded { elapsed: Duration },

    /// The request context was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific provider protocol violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolErrorKind {
    #[error("pagination did not terminate within {limit} pages")]
    PageLimitExceeded { limit: usize },

    #[error("cursor '{cursor}' was returned twice")]
    RepeatedCursor { cursor: String },

    #[error("parent references form a cycle through '{node_id}'")]
    Cycle { node_id: String },

    #[error("occurrence '{child_id}' references unknown parent '{parent_id}'")]
    OrphanedOccurrence { child_id: String, parent_id: String },

    #[error("{count} {what}s match '{name}'")]
    AmbiguousMatch {
        what: &'static str,
        name: String,
        count: usize,
    },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for model-hierarchy operations
pub type Result<T> = std::result::Result<T, HierarchyError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl HierarchyError {
    /// Create a protocol error with context
    pub fn protocol(context: impl Into<String>, source: ProtocolErrorKind) -> Self {
        Self::ProviderProtocol {
            context: context.into(),
            source,
        }
    }

    /// Create a malformed-identifier error
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a request-failed error from a status and body
    pub fn request_failed(context: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::ProviderRequestFailed {
            context: context.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a network error
    pub fn network(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for errors caused by the caller's input rather than the provider.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedIdentifier { .. } | Self::UnsupportedExpansion { .. }
        )
    }

    /// The protocol violation kind, if this is a protocol error.
    #[must_use]
    pub const fn protocol_kind(&self) -> Option<&ProtocolErrorKind> {
        match self {
            Self::ProviderProtocol { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for HierarchyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for HierarchyError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_response("JSON deserialization", err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are prepended to the error's existing context, so a failure
/// deep inside pagination reads like
/// `"hierarchy for 'Widget': occurrence page 3: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (only evaluated on error).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<HierarchyError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Variants without a context field are returned unchanged.
fn add_context_to_error(err: HierarchyError, new_ctx: &str) -> HierarchyError {
    match err {
        HierarchyError::ProviderRequestFailed {
            context,
            status,
            body,
        } => HierarchyError::ProviderRequestFailed {
            context: chain_context(new_ctx, &context),
            status,
            body,
        },
        HierarchyError::ProviderProtocol { context, source } => HierarchyError::ProviderProtocol {
            context: chain_context(new_ctx, &context),
            source,
        },
        HierarchyError::Network { context, message } => HierarchyError::Network {
            context: chain_context(new_ctx, &context),
            message,
        },
        HierarchyError::InvalidResponse { context, message } => HierarchyError::InvalidResponse {
            context: chain_context(new_ctx, &context),
            message,
        },
        HierarchyError::Io {
            path,
            message,
            source,
        } => HierarchyError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        HierarchyError::Config(msg) => HierarchyError::Config(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an invalid-response error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| HierarchyError::invalid_response(context, "missing field"))
    }
}
