// Copyright (c) 2025 - Cowboy AI, LLC.

//! Error types for PKD validation operations
//!
//! Only input-level failures (bytes that cannot be parsed, envelopes with the
//! wrong content type) surface as `Err`. Lookup misses, signature failures and
//! policy findings are carried as values inside the result types, so the pure
//! operations never unwind.

use thiserror::Error;

/// Result type alias for PKD core operations
pub type Result<T> = std::result::Result<T, PkdError>;

/// Main error type for the validation core
#[derive(Error, Debug)]
pub enum PkdError {
    /// Malformed ASN.1 / X.509 input, with a byte-offset hint when available
    #[error("parse error at offset {}: {message}", .offset.map(|o| o.to_string()).unwrap_or_else(|| "?".into()))]
    Parse {
        /// Human-readable description of the decode failure
        message: String,
        /// Byte offset into the input where decoding stopped, if known
        offset: Option<usize>,
    },

    /// PEM decoding errors
    #[error("PEM error: {0}")]
    Pem(#[from] pem::PemError),

    /// CMS envelope carried an unexpected eContentType
    #[error("wrong content type: expected {expected}, found {found}")]
    WrongContentType {
        /// The OID the caller asserted
        expected: String,
        /// The OID actually present in the envelope
        found: String,
    },

    /// A structure was missing a field the caller requires
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal invariant violation; never aborts the process
    #[error("internal error: {0}")]
    Internal(String),
}

impl PkdError {
    /// Build a `Parse` error without an offset hint.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            offset: None,
        }
    }

    /// Build a `Parse` error from a `der` decode failure, preserving the
    /// decoder's position as the byte-offset hint.
    pub fn from_der_error(err: der::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
            offset: err.position().map(|p| u32::from(p) as usize),
        }
    }
}
