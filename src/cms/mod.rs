// Copyright (c) 2025 - Cowboy AI, LLC.

//! CMS SignedData envelopes for ICAO container formats
//!
//! Master Lists, Deviation Lists, generic PKCS #7 bundles and passport SODs
//! all arrive as RFC 5652 SignedData. This module decodes the envelope once
//! and verifies the signer the way RFC 5652 §5.4 demands: when signed
//! attributes are present the signature covers the re-encoded
//! `SET OF Attribute` (after checking the message-digest attribute against
//! the eContent digest), never the eContent directly. An envelope whose
//! signature does not verify is still returned, flagged, so that lists from
//! key-rolled signers remain inspectable.

pub mod deviation_list;
pub mod master_list;
pub mod sod;

pub use deviation_list::{parse_deviation_list, DefectCategory, DeviationEntry};
pub use master_list::parse_master_list;
pub use sod::{extract_certificates_from_sod, parse_sod, Sod};

use chrono::{DateTime, Utc};
use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerIdentifier};
use der::asn1::OctetString;
use der::{Decode, Encode};
use tracing::{debug, warn};

use crate::crypto::{self, HashAlgorithm};
use crate::error::{PkdError, Result};
use crate::oid;
use crate::x509::{dn, metadata, parser, Certificate};

/// Content-specific payload of a parsed envelope
#[derive(Debug, Clone)]
pub enum CmsPayload {
    /// CSCA Master List; the CSCAs themselves are in
    /// [`CmsEnvelope::certificates`]
    MasterList {
        /// CscaMasterList version field
        version: u8,
    },
    /// Deviation List entries
    DeviationList {
        /// Decoded deviations
        entries: Vec<DeviationEntry>,
    },
    /// Generic bundle; no content assertion was made
    Generic,
}

/// A parsed CMS SignedData envelope
#[derive(Debug, Clone)]
pub struct CmsEnvelope {
    /// eContentType as a dotted OID
    pub econtent_type: String,
    /// Declared digest algorithm of the (first) signer
    pub digest_algorithm: Option<String>,
    /// Declared signature algorithm of the (first) signer
    pub signature_algorithm: Option<String>,
    /// The signer certificate located through the SignerIdentifier
    pub signer_certificate: Option<Certificate>,
    /// signingTime signed attribute, when present
    pub signing_time: Option<DateTime<Utc>>,
    /// The certificate set relevant to the container: embedded CSCAs for a
    /// Master List, bundled certificates otherwise
    pub certificates: Vec<Certificate>,
    /// Whether the envelope signature verified under the signer's key
    pub signature_verified: bool,
    /// Content-specific payload
    pub payload: CmsPayload,
}

/// Decoded SignedData internals shared by the container parsers
pub(crate) struct DecodedSignedData {
    pub econtent_type: String,
    pub econtent: Option<Vec<u8>>,
    pub digest_algorithm: Option<String>,
    pub signature_algorithm: Option<String>,
    pub signing_time: Option<DateTime<Utc>>,
    pub bundled_certificates: Vec<Certificate>,
    pub signer_certificate: Option<Certificate>,
    pub signature_verified: bool,
}

/// Decode a ContentInfo/SignedData envelope and verify its (first) signer.
pub(crate) fn decode_signed_data(bytes: &[u8]) -> Result<DecodedSignedData> {
    let content_info = ContentInfo::from_der(bytes).map_err(PkdError::from_der_error)?;
    let content_type = content_info.content_type.to_string();
    if content_type != oid::PKCS7_SIGNED_DATA {
        return Err(PkdError::WrongContentType {
            expected: oid::PKCS7_SIGNED_DATA.to_string(),
            found: content_type,
        });
    }
    let signed_data: SignedData = content_info
        .content
        .decode_as()
        .map_err(PkdError::from_der_error)?;

    let econtent_type = signed_data.encap_content_info.econtent_type.to_string();
    let econtent = match &signed_data.encap_content_info.econtent {
        Some(any) => Some(
            any.decode_as::<OctetString>()
                .map_err(PkdError::from_der_error)?
                .as_bytes()
                .to_vec(),
        ),
        None => None,
    };

    let mut bundled_certificates = Vec::new();
    if let Some(cert_set) = &signed_data.certificates {
        for choice in cert_set.0.iter() {
            match choice {
                CertificateChoices::Certificate(cert) => {
                    let der = cert.to_der().map_err(PkdError::from_der_error)?;
                    match parser::parse_der(&der) {
                        Ok(parsed) => bundled_certificates.push(parsed),
                        Err(e) => warn!(error = %e, "skipping undecodable bundled certificate"),
                    }
                }
                _ => debug!("skipping non-certificate CertificateChoices entry"),
            }
        }
    }

    let signer_info = signed_data.signer_infos.0.iter().next();
    let mut digest_algorithm = None;
    let mut signature_algorithm = None;
    let mut signing_time = None;
    let mut signer_certificate = None;
    let mut signature_verified = false;

    if let Some(si) = signer_info {
        let digest_oid = si.digest_alg.oid.to_string();
        let sig_oid = si.signature_algorithm.oid.to_string();
        digest_algorithm = Some(digest_oid.clone());
        signature_algorithm = Some(sig_oid.clone());
        let digest_hint = HashAlgorithm::from_digest_oid(&digest_oid);

        signer_certificate = find_signer_certificate(&si.sid, &bundled_certificates);

        let mut message_digest_attr: Option<Vec<u8>> = None;
        let mut signed_attrs_der: Option<Vec<u8>> = None;
        if let Some(attrs) = &si.signed_attrs {
            signed_attrs_der = Some(attrs.to_der().map_err(PkdError::from_der_error)?);
            for attr in attrs.iter() {
                if attr.oid == oid::PKCS9_MESSAGE_DIGEST_OID {
                    if let Some(value) = attr.values.iter().next() {
                        if let Ok(os) = value.decode_as::<OctetString>() {
                            message_digest_attr = Some(os.as_bytes().to_vec());
                        }
                    }
                } else if attr.oid == oid::PKCS9_SIGNING_TIME_OID {
                    if let Some(value) = attr.values.iter().next() {
                        signing_time = decode_signing_time(value);
                    }
                }
            }
        }

        if let Some(signer) = &signer_certificate {
            let signature = si.signature.as_bytes();
            signature_verified = match (&signed_attrs_der, &econtent) {
                // RFC 5652 §5.4: with signed attributes the signature covers
                // the DER SET OF Attribute, and the message-digest attribute
                // must match the eContent digest.
                (Some(attrs_der), Some(content)) => {
                    let digest_ok = match (&message_digest_attr, digest_hint) {
                        (Some(attr_digest), Some(hash)) => {
                            hash.digest(content) == *attr_digest
                        }
                        _ => false,
                    };
                    digest_ok
                        && crypto::verify_with_issuer(
                            signer.der(),
                            attrs_der,
                            signature,
                            &sig_oid,
                            digest_hint,
                        )
                }
                (Some(attrs_der), None) => crypto::verify_with_issuer(
                    signer.der(),
                    attrs_der,
                    signature,
                    &sig_oid,
                    digest_hint,
                ),
                (None, Some(content)) => crypto::verify_with_issuer(
                    signer.der(),
                    content,
                    signature,
                    &sig_oid,
                    digest_hint,
                ),
                (None, None) => false,
            };
        }
    }

    if !signature_verified {
        debug!(econtent_type, "CMS envelope signature did not verify");
    }

    Ok(DecodedSignedData {
        econtent_type,
        econtent,
        digest_algorithm,
        signature_algorithm,
        signing_time,
        bundled_certificates,
        signer_certificate,
        signature_verified,
    })
}

fn find_signer_certificate(
    sid: &SignerIdentifier,
    candidates: &[Certificate],
) -> Option<Certificate> {
    match sid {
        SignerIdentifier::IssuerAndSerialNumber(isn) => {
            let issuer_der = isn.issuer.to_der().ok()?;
            let issuer_normalized = normalize_name_der(&issuer_der)?;
            let serial = metadata::canonical_serial_hex(isn.serial_number.as_bytes());
            candidates
                .iter()
                .find(|c| {
                    c.issuer_dn_normalized() == issuer_normalized && c.serial_hex() == serial
                })
                .cloned()
        }
        SignerIdentifier::SubjectKeyIdentifier(ski) => {
            let wanted = hex::encode(ski.0.as_bytes());
            candidates
                .iter()
                .find(|c| c.subject_key_identifier() == Some(wanted.as_str()))
                .cloned()
        }
    }
}

pub(crate) fn normalize_name_der(name_der: &[u8]) -> Option<String> {
    use x509_parser::prelude::FromDer;
    use x509_parser::x509::X509Name;
    let (_, name) = X509Name::from_der(name_der).ok()?;
    Some(dn::normalize_dn(&dn::dn_string(&name)))
}

fn decode_signing_time(value: &der::Any) -> Option<DateTime<Utc>> {
    let unix = if let Ok(utc) = value.decode_as::<der::asn1::UtcTime>() {
        utc.to_unix_duration().as_secs() as i64
    } else if let Ok(gen) = value.decode_as::<der::asn1::GeneralizedTime>() {
        gen.to_unix_duration().as_secs() as i64
    } else {
        return None;
    };
    DateTime::from_timestamp(unix, 0)
}

/// Parse a generic PKCS #7 certificate bundle.
///
/// No eContentType assertion is made; the embedded certificate set is
/// extracted and the envelope signature verified when a signer can be
/// located.
pub fn parse_p7b(bytes: &[u8]) -> Result<CmsEnvelope> {
    let decoded = decode_signed_data(bytes)?;
    Ok(CmsEnvelope {
        econtent_type: decoded.econtent_type,
        digest_algorithm: decoded.digest_algorithm,
        signature_algorithm: decoded.signature_algorithm,
        signer_certificate: decoded.signer_certificate,
        signing_time: decoded.signing_time,
        certificates: decoded.bundled_certificates,
        signature_verified: decoded.signature_verified,
        payload: CmsPayload::Generic,
    })
}
