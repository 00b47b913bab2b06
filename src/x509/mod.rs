// Copyright (c) 2025 - Cowboy AI, LLC.

//! X.509 certificate decoding and metadata
//!
//! `Certificate` is the single in-memory form for every PKD artifact class
//! (CSCA, DSC, MLSC, link certificate, ...). It owns one DER byte vector and
//! the metadata extracted from it eagerly at parse time; no parser handles
//! escape this module. Classification is a tag on the value, not a subtype.

pub mod dn;
pub mod metadata;
pub mod ops;
pub mod parser;

pub use dn::DnComponents;

use chrono::{DateTime, Utc};

use crate::types::{CertificateTag, KeyUsageFlags, PublicKeyAlgorithm};

/// A decoded X.509 certificate
///
/// Immutable from the moment of parsing. The SHA-256 fingerprint of the DER
/// bytes is the primary identity: two values with equal fingerprints are the
/// same certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub(crate) der: Vec<u8>,
    pub(crate) fingerprint: String,
    pub(crate) serial_hex: String,
    pub(crate) version: u8,
    pub(crate) subject: DnComponents,
    pub(crate) issuer: DnComponents,
    pub(crate) subject_dn: String,
    pub(crate) issuer_dn: String,
    pub(crate) subject_dn_normalized: String,
    pub(crate) issuer_dn_normalized: String,
    pub(crate) not_before: DateTime<Utc>,
    pub(crate) not_after: DateTime<Utc>,
    pub(crate) public_key_algorithm: PublicKeyAlgorithm,
    pub(crate) key_size_bits: Option<u32>,
    pub(crate) ec_curve: Option<String>,
    pub(crate) signature_algorithm_oid: String,
    pub(crate) signature_algorithm: String,
    pub(crate) hash_algorithm: Option<String>,
    pub(crate) key_usage: Option<KeyUsageFlags>,
    pub(crate) extended_key_usage: Vec<String>,
    pub(crate) is_ca: bool,
    pub(crate) path_len_constraint: Option<u32>,
    pub(crate) subject_key_identifier: Option<String>,
    pub(crate) authority_key_identifier: Option<String>,
    pub(crate) crl_distribution_points: Vec<String>,
    pub(crate) ocsp_url: Option<String>,
    pub(crate) critical_extension_oids: Vec<String>,
    pub(crate) tag: CertificateTag,
    pub(crate) country: String,
    pub(crate) self_signed: bool,
}

impl Certificate {
    /// Raw DER bytes, the canonical representation.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// SHA-256 of the DER bytes, 64 lowercase hex characters.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Serial number, canonical unsigned big-endian hex with leading zeros
    /// stripped.
    pub fn serial_hex(&self) -> &str {
        &self.serial_hex
    }

    /// Raw X.509 version field: 0 for v1, 1 for v2, 2 for v3.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Structured subject attributes.
    pub fn subject(&self) -> &DnComponents {
        &self.subject
    }

    /// Structured issuer attributes.
    pub fn issuer(&self) -> &DnComponents {
        &self.issuer
    }

    /// Subject DN rendered in stored order, e.g. `C=KR, O=Gov, CN=Root`.
    pub fn subject_dn(&self) -> &str {
        &self.subject_dn
    }

    /// Issuer DN rendered in stored order.
    pub fn issuer_dn(&self) -> &str {
        &self.issuer_dn
    }

    /// Subject DN in the canonical comparison form (see [`dn::normalize_dn`]).
    pub fn subject_dn_normalized(&self) -> &str {
        &self.subject_dn_normalized
    }

    /// Issuer DN in the canonical comparison form.
    pub fn issuer_dn_normalized(&self) -> &str {
        &self.issuer_dn_normalized
    }

    /// Start of the validity period.
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the validity period.
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Public key algorithm family.
    pub fn public_key_algorithm(&self) -> PublicKeyAlgorithm {
        self.public_key_algorithm
    }

    /// RSA modulus length or EC curve size, in bits.
    pub fn key_size_bits(&self) -> Option<u32> {
        self.key_size_bits
    }

    /// Named curve, when the key is EC.
    pub fn ec_curve(&self) -> Option<&str> {
        self.ec_curve.as_deref()
    }

    /// Signature algorithm as a dotted OID.
    pub fn signature_algorithm_oid(&self) -> &str {
        &self.signature_algorithm_oid
    }

    /// Signature algorithm human name (falls back to the OID).
    pub fn signature_algorithm(&self) -> &str {
        &self.signature_algorithm
    }

    /// Hash algorithm implied by the signature algorithm.
    pub fn hash_algorithm(&self) -> Option<&str> {
        self.hash_algorithm.as_deref()
    }

    /// Decoded keyUsage bits, when the extension is present.
    pub fn key_usage(&self) -> Option<&KeyUsageFlags> {
        self.key_usage.as_ref()
    }

    /// Extended-key-usage entries: well-known names plus raw OIDs.
    pub fn extended_key_usage(&self) -> &[String] {
        &self.extended_key_usage
    }

    /// basicConstraints CA flag.
    pub fn is_ca(&self) -> bool {
        self.is_ca
    }

    /// basicConstraints path-length constraint.
    pub fn path_len_constraint(&self) -> Option<u32> {
        self.path_len_constraint
    }

    /// subjectKeyIdentifier as lowercase hex.
    pub fn subject_key_identifier(&self) -> Option<&str> {
        self.subject_key_identifier.as_deref()
    }

    /// authorityKeyIdentifier (keyIdentifier field) as lowercase hex.
    pub fn authority_key_identifier(&self) -> Option<&str> {
        self.authority_key_identifier.as_deref()
    }

    /// HTTP(S) CRL distribution-point URLs.
    pub fn crl_distribution_points(&self) -> &[String] {
        &self.crl_distribution_points
    }

    /// OCSP responder URL from authorityInfoAccess.
    pub fn ocsp_url(&self) -> Option<&str> {
        self.ocsp_url.as_deref()
    }

    /// OIDs of the extensions flagged critical, in certificate order.
    pub fn critical_extension_oids(&self) -> &[String] {
        &self.critical_extension_oids
    }

    /// Classification tag derived from the extensions.
    pub fn tag(&self) -> CertificateTag {
        self.tag
    }

    /// ISO 3166 country code from the subject `C=` attribute, uppercased.
    /// Empty when the subject carries no country.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Whether subject and issuer DN are equal under case-insensitive
    /// comparison.
    pub fn is_self_signed(&self) -> bool {
        self.self_signed
    }

    /// Return a copy carrying a different classification tag.
    ///
    /// Ingestion uses this when a deviation-list hit downgrades a DSC to
    /// DSC_NC; the certificate content itself is untouched.
    pub fn reclassified(mut self, tag: CertificateTag) -> Self {
        self.tag = tag;
        self
    }
}
