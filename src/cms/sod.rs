// Copyright (c) 2025 - Cowboy AI, LLC.

//! Passport SOD (Security Object of the Document) parsing
//!
//! An EF.SOD is a SignedData envelope signed by a DSC; its eContent is the
//! LDS security object binding each Data Group to a hash:
//!
//! ```text
//! LDSSecurityObject ::= SEQUENCE {
//!   version              INTEGER,
//!   hashAlgorithm        AlgorithmIdentifier,
//!   dataGroupHashValues  SEQUENCE OF DataGroupHash }
//! DataGroupHash     ::= SEQUENCE {
//!   dataGroupNumber      INTEGER,
//!   dataGroupHashValue   OCTET STRING }
//! ```
//!
//! File images read straight off the chip carry the ICAO application tag
//! `0x77` around the ContentInfo; it is stripped transparently.

use chrono::{DateTime, Utc};
use der::asn1::OctetString;
use der::{Decode, Sequence};
use std::collections::BTreeMap;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::cms::decode_signed_data;
use crate::crypto::HashAlgorithm;
use crate::error::{PkdError, Result};
use crate::oid;
use crate::x509::Certificate;

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct DataGroupHash {
    data_group_number: u8,
    data_group_hash_value: OctetString,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct LdsSecurityObject {
    version: u8,
    hash_algorithm: AlgorithmIdentifierOwned,
    data_group_hash_values: Vec<DataGroupHash>,
}

/// A parsed passport security object
#[derive(Debug, Clone)]
pub struct Sod {
    /// eContentType of the envelope (normally the LDS security object OID)
    pub econtent_type: String,
    /// LDS security object version
    pub lds_version: u8,
    /// Digest algorithm the data-group hashes were computed with, as an OID
    pub hash_algorithm_oid: String,
    /// Human name of the data-group digest algorithm
    pub hash_algorithm: String,
    /// Signature algorithm of the DSC signer, as an OID
    pub signature_algorithm_oid: Option<String>,
    /// Signed hash per data-group number
    pub dg_hashes: BTreeMap<u8, Vec<u8>>,
    /// Certificates bundled in the envelope (the DSC, normally alone)
    pub certificates: Vec<Certificate>,
    /// Whether the SOD signature verified under the bundled DSC
    pub signature_verified: bool,
    /// signingTime signed attribute, when present
    pub signing_time: Option<DateTime<Utc>>,
}

impl Sod {
    /// The document-signer certificate: the bundled certificate classified
    /// as a DSC, or the first bundled certificate.
    pub fn dsc(&self) -> Option<&Certificate> {
        self.certificates
            .iter()
            .find(|c| c.tag() == crate::types::CertificateTag::Dsc)
            .or_else(|| self.certificates.first())
    }

    /// The data-group digest algorithm as a [`HashAlgorithm`], when it is
    /// one the core can compute.
    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> {
        HashAlgorithm::from_digest_oid(&self.hash_algorithm_oid)
    }
}

/// Strip the ICAO `0x77` application wrapper from an EF.SOD file image.
/// Bytes already starting at the ContentInfo pass through unchanged.
fn strip_application_wrapper(bytes: &[u8]) -> &[u8] {
    if bytes.first() != Some(&0x77) || bytes.len() < 2 {
        return bytes;
    }
    let len_byte = bytes[1];
    let header = if len_byte < 0x80 {
        2
    } else {
        2 + (len_byte & 0x7f) as usize
    };
    if bytes.len() > header {
        &bytes[header..]
    } else {
        bytes
    }
}

/// Parse an EF.SOD: decode the envelope, the LDS security object and verify
/// the DSC signature over the signed attributes.
pub fn parse_sod(bytes: &[u8]) -> Result<Sod> {
    let inner = strip_application_wrapper(bytes);
    let decoded = decode_signed_data(inner)?;

    let content = decoded
        .econtent
        .as_deref()
        .ok_or(PkdError::MissingField("eContent"))?;
    let lds = LdsSecurityObject::from_der(content).map_err(PkdError::from_der_error)?;

    let hash_algorithm_oid = lds.hash_algorithm.oid.to_string();
    let hash_algorithm = oid::digest_algorithm_name(&hash_algorithm_oid)
        .unwrap_or(hash_algorithm_oid.as_str())
        .to_string();

    let mut dg_hashes = BTreeMap::new();
    for dgh in &lds.data_group_hash_values {
        dg_hashes.insert(
            dgh.data_group_number,
            dgh.data_group_hash_value.as_bytes().to_vec(),
        );
    }

    Ok(Sod {
        econtent_type: decoded.econtent_type,
        lds_version: lds.version,
        hash_algorithm_oid,
        hash_algorithm,
        signature_algorithm_oid: decoded.signature_algorithm,
        dg_hashes,
        certificates: decoded.bundled_certificates,
        signature_verified: decoded.signature_verified,
        signing_time: decoded.signing_time,
    })
}

/// Extract the DSC certificate(s) embedded in a SOD's `certificates` field.
pub fn extract_certificates_from_sod(bytes: &[u8]) -> Result<Vec<Certificate>> {
    let inner = strip_application_wrapper(bytes);
    let decoded = decode_signed_data(inner)?;
    Ok(decoded.bundled_certificates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_application_wrapper_short_form() {
        let wrapped = [0x77, 0x03, 0x30, 0x01, 0x00];
        assert_eq!(strip_application_wrapper(&wrapped), &[0x30, 0x01, 0x00]);
    }

    #[test]
    fn test_strip_application_wrapper_long_form() {
        let wrapped = [0x77, 0x82, 0x01, 0x00, 0x30, 0x01];
        assert_eq!(strip_application_wrapper(&wrapped), &[0x30, 0x01]);
    }

    #[test]
    fn test_unwrapped_bytes_pass_through() {
        let plain = [0x30, 0x82, 0x01, 0x00];
        assert_eq!(strip_application_wrapper(&plain), &plain[..]);
    }

    #[test]
    fn test_parse_sod_rejects_garbage() {
        assert!(parse_sod(b"\x77\x02\x00\x00").is_err());
        assert!(parse_sod(b"garbage").is_err());
    }
}
