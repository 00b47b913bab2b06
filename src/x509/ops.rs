// Copyright (c) 2025 - Cowboy AI, LLC.

//! Pure certificate predicates
//!
//! Everything here is a pure function of its inputs: no logging, no I/O, no
//! shared state. Repeated invocation with the same inputs returns identical
//! results, which the ingestion pipeline and the online verification path
//! both rely on.

use chrono::{DateTime, Utc};
use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

use crate::crypto;
use crate::x509::Certificate;

/// True iff `cert`'s signature is cryptographically valid under `issuer`'s
/// public key. Every low-level failure collapses to `false`.
pub fn verify_signature(cert: &Certificate, issuer: &Certificate) -> bool {
    let Ok((_, parsed)) = X509Certificate::from_der(cert.der()) else {
        return false;
    };
    let tbs = parsed.tbs_certificate.as_ref();
    let signature = parsed.signature_value.data.as_ref();
    let sig_oid = parsed.signature_algorithm.algorithm.to_id_string();
    crypto::verify_with_issuer(issuer.der(), tbs, signature, &sig_oid, None)
}

/// True iff the certificate's notAfter lies in the past.
pub fn is_expired(cert: &Certificate) -> bool {
    is_expired_at(cert, Utc::now())
}

/// Expiration against a caller-supplied clock.
pub fn is_expired_at(cert: &Certificate, now: DateTime<Utc>) -> bool {
    now > cert.not_after()
}

/// True iff the certificate's notBefore lies in the future.
pub fn is_not_yet_valid(cert: &Certificate) -> bool {
    is_not_yet_valid_at(cert, Utc::now())
}

/// Validity-start check against a caller-supplied clock.
pub fn is_not_yet_valid_at(cert: &Certificate, now: DateTime<Utc>) -> bool {
    now < cert.not_before()
}

/// True iff subject DN and issuer DN normalise to the same string
/// (case-insensitive per RFC 4517).
pub fn is_self_signed(cert: &Certificate) -> bool {
    cert.is_self_signed()
}

/// True iff the certificate bridges a CSCA key rollover: a CA certificate
/// with keyCertSign whose subject differs from its issuer.
pub fn is_link_certificate(cert: &Certificate) -> bool {
    !cert.is_self_signed()
        && cert.is_ca()
        && cert.key_usage().map(|ku| ku.key_cert_sign).unwrap_or(false)
}

/// Stable canonical subject DN.
pub fn get_subject_dn(cert: &Certificate) -> &str {
    cert.subject_dn_normalized()
}

/// Stable canonical issuer DN.
pub fn get_issuer_dn(cert: &Certificate) -> &str {
    cert.issuer_dn_normalized()
}

/// SHA-256 fingerprint of the DER bytes.
pub fn get_certificate_fingerprint(cert: &Certificate) -> &str {
    cert.fingerprint()
}
