// Copyright (c) 2025 - Cowboy AI, LLC.

//! Certificate revocation lists
//!
//! Decoded CRL value type plus the per-country revocation checker. Entry
//! lookup is keyed on the serial's canonical representation (unsigned
//! big-endian, leading zeros stripped, lowercase hex) so serials match
//! regardless of how the issuer encoded them.

pub mod checker;

pub use checker::{CrlCheckResult, CrlChecker, CrlStatus};

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use x509_parser::extensions::ParsedExtension;
use x509_parser::prelude::FromDer;
use x509_parser::revocation_list::CertificateRevocationList;

use crate::error::{PkdError, Result};
use crate::x509::{dn, metadata, DnComponents};

/// One revoked-certificate entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationEntry {
    /// When the certificate was revoked
    pub revocation_date: DateTime<Utc>,
    /// CRLReason code (RFC 5280 §5.3.1), when the entry carries one
    pub reason_code: Option<u32>,
}

/// A decoded X.509 CRL
#[derive(Debug, Clone)]
pub struct Crl {
    der: Vec<u8>,
    fingerprint: String,
    issuer: DnComponents,
    issuer_dn: String,
    issuer_dn_normalized: String,
    country: String,
    this_update: DateTime<Utc>,
    next_update: Option<DateTime<Utc>>,
    entries: HashMap<String, RevocationEntry>,
}

impl Crl {
    /// Decode a DER CRL.
    pub fn parse_der(bytes: &[u8]) -> Result<Self> {
        let (_, crl) = CertificateRevocationList::from_der(bytes).map_err(|e| {
            PkdError::Parse {
                message: format!("CRL decode failed: {}", e),
                offset: None,
            }
        })?;

        let issuer = dn::components_from_name(crl.issuer());
        let issuer_dn = dn::dn_string(crl.issuer());
        let issuer_dn_normalized = dn::normalize_dn(&issuer_dn);
        let country = issuer
            .country
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .unwrap_or_default();

        let this_update = metadata::asn1_time_to_datetime(&crl.last_update());
        let next_update = crl
            .next_update()
            .map(|t| metadata::asn1_time_to_datetime(&t));

        let mut entries = HashMap::new();
        for revoked in crl.iter_revoked_certificates() {
            let serial = metadata::canonical_serial_hex(&revoked.user_certificate.to_bytes_be());
            let mut reason_code = None;
            for ext in revoked.extensions() {
                if let ParsedExtension::ReasonCode(code) = ext.parsed_extension() {
                    reason_code = Some(code.0 as u32);
                }
            }
            entries.insert(
                serial,
                RevocationEntry {
                    revocation_date: metadata::asn1_time_to_datetime(&revoked.revocation_date),
                    reason_code,
                },
            );
        }

        Ok(Self {
            fingerprint: metadata::fingerprint_hex(bytes),
            der: bytes.to_vec(),
            issuer,
            issuer_dn,
            issuer_dn_normalized,
            country,
            this_update,
            next_update,
            entries,
        })
    }

    /// Decode a PEM-armored CRL (`X509 CRL` block).
    pub fn parse_pem(bytes: &[u8]) -> Result<Self> {
        let blocks = pem::parse_many(bytes)?;
        for block in &blocks {
            if block.tag() == "X509 CRL" {
                return Self::parse_der(block.contents());
            }
        }
        Err(PkdError::parse("no X509 CRL block in PEM input"))
    }

    /// Raw DER bytes.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// SHA-256 of the DER bytes, 64 lowercase hex characters.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Structured issuer attributes.
    pub fn issuer(&self) -> &DnComponents {
        &self.issuer
    }

    /// Issuer DN rendered in stored order.
    pub fn issuer_dn(&self) -> &str {
        &self.issuer_dn
    }

    /// Issuer DN in canonical comparison form.
    pub fn issuer_dn_normalized(&self) -> &str {
        &self.issuer_dn_normalized
    }

    /// ISO 3166 country code from the issuer `C=` attribute.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// thisUpdate field.
    pub fn this_update(&self) -> DateTime<Utc> {
        self.this_update
    }

    /// nextUpdate field, absent on some legacy issuers.
    pub fn next_update(&self) -> Option<DateTime<Utc>> {
        self.next_update
    }

    /// Number of revoked entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// A CRL is expired iff nextUpdate lies in the past.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.next_update, Some(next) if next < now)
    }

    /// Look up a serial in canonical hex form.
    pub fn find_entry(&self, serial_hex: &str) -> Option<&RevocationEntry> {
        self.entries.get(serial_hex)
    }
}

/// Map an RFC 5280 CRLReason code to its name; unassigned codes render as
/// `unknown(N)`.
pub fn reason_name(code: u32) -> String {
    match code {
        0 => "unspecified".to_string(),
        1 => "keyCompromise".to_string(),
        2 => "cACompromise".to_string(),
        3 => "affiliationChanged".to_string(),
        4 => "superseded".to_string(),
        5 => "cessationOfOperation".to_string(),
        6 => "certificateHold".to_string(),
        8 => "removeFromCRL".to_string(),
        9 => "privilegeWithdrawn".to_string(),
        10 => "aACompromise".to_string(),
        other => format!("unknown({})", other),
    }
}
