// Copyright (c) 2025 - Cowboy AI, LLC.

//! Capability traits connecting the validation core to its stores
//!
//! The core performs no I/O of its own: CSCA lookup, CRL lookup and DSC
//! registration are injected capabilities. The ingestion service implements
//! them against the database, the passive-authentication service against
//! LDAP, and the test-suite against in-memory maps — all through the same
//! contracts. Implementations must be internally thread-safe; the core only
//! ever reads through them, with the single exception of the idempotent DSC
//! upsert.

use crate::crl::Crl;
use crate::types::RegisterOutcome;
use crate::x509::Certificate;

/// Source of trusted CSCA (and link) certificates
pub trait CscaProvider: Send + Sync {
    /// Every CSCA whose subject DN matches `issuer_dn`. DNs compare in
    /// canonical normalised form; multiple certificates share a DN across a
    /// key rollover. Returns owned copies.
    fn find_all_cscas_by_issuer_dn(&self, issuer_dn: &str) -> Vec<Certificate>;

    /// One CSCA matching both the DN and the country, when the caller
    /// already knows the issuing state.
    fn find_csca_by_issuer_dn(&self, issuer_dn: &str, country_code: &str)
        -> Option<Certificate>;
}

/// Source of per-country CRLs
pub trait CrlProvider: Send + Sync {
    /// The current CRL for an ISO 3166 alpha-2 (or legacy alpha-3) country
    /// code. Returns an owned copy.
    fn find_crl_by_country(&self, country_code: &str) -> Option<Crl>;
}

/// Sink for DSCs observed during passive authentication
pub trait CertificateStore: Send + Sync {
    /// Idempotent upsert keyed on the certificate fingerprint.
    fn register_dsc(&self, cert: &Certificate) -> RegisterOutcome;
}
