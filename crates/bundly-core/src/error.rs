//! # Error Types
//!
//! Domain-specific error types for bundly-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bundly-core errors (this file)                                        │
//! │  └── DefinitionError  - Bundle document parsing failures               │
//! │                                                                         │
//! │  Everything past the parsing seam is infallible by design:             │
//! │  the evaluation passes absorb every per-bundle failure and return      │
//! │  an operation list (possibly empty). The host never sees an error.     │
//! │                                                                         │
//! │  Flow: DefinitionError → tracing warn! → "no bundle" → continue        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never String
//! 3. Errors exist for diagnostics only; the public evaluation contract
//!    never propagates them

use thiserror::Error;

// =============================================================================
// Definition Error
// =============================================================================

/// Failures while deserializing a bundle configuration document.
///
/// These occur at the [`crate::BundleDefinition::try_parse`] seam. The
/// tolerant [`crate::BundleDefinition::parse`] wrapper converts them into
/// `None` ("no bundle") after logging, so they never reach the host.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The document is not valid JSON, or its shape is incompatible with
    /// the bundle schema (e.g. missing `id`, non-object steps).
    #[error("malformed bundle document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document parsed but carries an empty bundle id.
    ///
    /// An id-less definition cannot participate in discovery deduplication,
    /// so it is rejected at the seam rather than half-accepted.
    #[error("bundle document has an empty id")]
    EmptyId,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DefinitionError.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_error_message() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DefinitionError::from(json_err);
        assert!(err.to_string().starts_with("malformed bundle document:"));
    }

    #[test]
    fn test_empty_id_error_message() {
        assert_eq!(
            DefinitionError::EmptyId.to_string(),
            "bundle document has an empty id"
        );
    }
}
