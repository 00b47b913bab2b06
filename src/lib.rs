// Copyright (c) 2025 - Cowboy AI, LLC.

//! # PKD Core - ICAO 9303 Certificate Validation
//!
//! This crate is the validation core of a Public Key Directory node: it
//! parses the artifacts national authorities publish (CSCA, DSC and MLSC
//! certificates, CRLs, CMS-wrapped Master Lists and Deviation Lists),
//! builds and validates trust chains per Doc 9303 Part 12, checks
//! revocation, and runs the passive-authentication sequence for e-passport
//! inspection systems.
//!
//! ## Features
//!
//! - **Format detection**: classify blobs as PEM, DER, CMS, CRL or LDIF
//! - **X.509 parsing**: decode certificates, extract DN and extension
//!   metadata, compute SHA-256 fingerprints
//! - **Trust chains**: leaf-to-root construction with CSCA key rollover and
//!   link-certificate support; signatures are the hard criterion, expiry is
//!   informational
//! - **Revocation**: per-country CRL lookup with RFC 5280 reason codes
//! - **CMS containers**: Master List, Deviation List and SOD parsing with
//!   RFC 5652 signed-attributes verification
//! - **Compliance**: ICAO algorithm and critical-extension checks
//! - **Passive authentication**: the 8-step verification orchestrator
//!
//! ## Architecture
//!
//! The core is pure and re-entrant: no singletons, no caches, no I/O. The
//! database- or LDAP-backed stores of a deployment are reached exclusively
//! through the capability traits in [`traits`]; in-memory implementations
//! for tests and bootstrap live in [`providers`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chain;
pub mod cms;
pub mod compliance;
pub mod crl;
pub mod crypto;
pub mod error;
pub mod format;
pub mod oid;
pub mod providers;
pub mod traits;
pub mod types;
pub mod verification;
pub mod x509;

// Re-export commonly used types
pub use error::{PkdError, Result};
pub use traits::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chain::{ChainErrorCode, TrustChainBuilder, TrustChainResult};
    pub use crate::cms::{
        extract_certificates_from_sod, parse_deviation_list, parse_master_list, parse_p7b,
        parse_sod, CmsEnvelope, CmsPayload, DeviationEntry,
    };
    pub use crate::compliance::{validate_algorithm_compliance, validate_extensions};
    pub use crate::crl::{Crl, CrlCheckResult, CrlChecker, CrlStatus};
    pub use crate::error::{PkdError, Result};
    pub use crate::format::detect_format;
    pub use crate::providers::{
        InMemoryCertificateStore, InMemoryCrlProvider, InMemoryCscaProvider,
    };
    pub use crate::traits::*;
    pub use crate::types::*;
    pub use crate::verification::{VerificationReport, VerificationStatus, Verifier};
    pub use crate::x509::{
        ops::{
            is_expired, is_link_certificate, is_not_yet_valid, is_self_signed, verify_signature,
        },
        parser::{parse_auto, parse_der, parse_pem, to_der, to_pem},
        Certificate, DnComponents,
    };
}
