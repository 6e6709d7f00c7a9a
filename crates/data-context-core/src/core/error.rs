// crates/data-context-core/src/core/error.rs
// ============================================================================
// Module: Data Context Errors
// Description: Error family shared by the resolver, registry, and stores.
// Purpose: Surface configuration and usage failures as typed, message-bearing errors.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every data context failure is a [`DataContextError`]. Each variant carries
//! the human-readable message shown to callers; [`DataContextError::kind`]
//! exposes the closed set of failure kinds for programmatic matching.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Closed set of data context failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataContextErrorKind {
    /// Name split into more than three components.
    TooManyComponents,
    /// Name contained an empty component.
    InvalidName,
    /// No datasource exists to resolve against.
    NoDatasourceConfigured,
    /// Named datasource or generator is not configured.
    UnknownDatasourceOrGenerator,
    /// More than one existing asset matched the name.
    AmbiguousExistingMatch,
    /// No existing asset matched and the creation target is ambiguous.
    AmbiguousCreateTarget,
    /// Requested item does not exist.
    NotFound,
    /// Item already exists and overwrite was not requested.
    AlreadyExists,
    /// Delimiter is not an accepted single character.
    InvalidDelimiter,
    /// Component or project configuration is invalid.
    Config,
    /// Filesystem access failed.
    Io,
    /// Store backend failed.
    Store,
}

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Data context error carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataContextError {
    /// Name split into more than three components.
    #[error("{0}")]
    TooManyComponents(String),
    /// Name contained an empty component.
    #[error("{0}")]
    InvalidName(String),
    /// No datasource exists to resolve against.
    #[error("{0}")]
    NoDatasourceConfigured(String),
    /// Named datasource or generator is not configured.
    #[error("{0}")]
    UnknownDatasourceOrGenerator(String),
    /// More than one existing asset matched the name.
    #[error("{0}")]
    AmbiguousExistingMatch(String),
    /// No existing asset matched and the creation target is ambiguous.
    #[error("{0}")]
    AmbiguousCreateTarget(String),
    /// Requested item does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Item already exists and overwrite was not requested.
    #[error("{0}")]
    AlreadyExists(String),
    /// Delimiter is not an accepted single character.
    #[error("{0}")]
    InvalidDelimiter(String),
    /// Component or project configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(String),
    /// Store backend failed.
    #[error("store error: {0}")]
    Store(String),
}

impl DataContextError {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> DataContextErrorKind {
        match self {
            Self::TooManyComponents(_) => DataContextErrorKind::TooManyComponents,
            Self::InvalidName(_) => DataContextErrorKind::InvalidName,
            Self::NoDatasourceConfigured(_) => DataContextErrorKind::NoDatasourceConfigured,
            Self::UnknownDatasourceOrGenerator(_) => {
                DataContextErrorKind::UnknownDatasourceOrGenerator
            }
            Self::AmbiguousExistingMatch(_) => DataContextErrorKind::AmbiguousExistingMatch,
            Self::AmbiguousCreateTarget(_) => DataContextErrorKind::AmbiguousCreateTarget,
            Self::NotFound(_) => DataContextErrorKind::NotFound,
            Self::AlreadyExists(_) => DataContextErrorKind::AlreadyExists,
            Self::InvalidDelimiter(_) => DataContextErrorKind::InvalidDelimiter,
            Self::Config(_) => DataContextErrorKind::Config,
            Self::Io(_) => DataContextErrorKind::Io,
            Self::Store(_) => DataContextErrorKind::Store,
        }
    }

    /// Returns the message carried by the error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::TooManyComponents(message)
            | Self::InvalidName(message)
            | Self::NoDatasourceConfigured(message)
            | Self::UnknownDatasourceOrGenerator(message)
            | Self::AmbiguousExistingMatch(message)
            | Self::AmbiguousCreateTarget(message)
            | Self::NotFound(message)
            | Self::AlreadyExists(message)
            | Self::InvalidDelimiter(message)
            | Self::Config(message)
            | Self::Io(message)
            | Self::Store(message) => message,
        }
    }
}
