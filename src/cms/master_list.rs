// Copyright (c) 2025 - Cowboy AI, LLC.

//! CSCA Master List parsing
//!
//! A Master List is a SignedData envelope with eContentType 2.23.136.1.1.2
//! whose content is `CscaMasterList ::= SEQUENCE { version INTEGER,
//! certList SET OF Certificate }`, signed by a Master List Signer
//! certificate.

use der::asn1::SetOfVec;
use der::{Decode, Encode, Sequence};
use tracing::{info, warn};

use crate::cms::{decode_signed_data, CmsEnvelope, CmsPayload};
use crate::error::{PkdError, Result};
use crate::oid;
use crate::x509::parser;

/// ASN.1 shape of the Master List eContent
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct CscaMasterList {
    version: u8,
    cert_list: SetOfVec<x509_cert::Certificate>,
}

/// Parse and verify a CSCA Master List.
///
/// Asserts the eContentType, extracts the embedded CSCAs into
/// [`CmsEnvelope::certificates`] and verifies the MLSC signature over the
/// signed attributes. A failed signature is reported through
/// `signature_verified`, not as an error, so lists from key-rolled signers
/// stay inspectable.
pub fn parse_master_list(bytes: &[u8]) -> Result<CmsEnvelope> {
    let decoded = decode_signed_data(bytes)?;
    if decoded.econtent_type != oid::ICAO_MASTER_LIST {
        return Err(PkdError::WrongContentType {
            expected: oid::ICAO_MASTER_LIST.to_string(),
            found: decoded.econtent_type,
        });
    }
    let content = decoded
        .econtent
        .as_deref()
        .ok_or(PkdError::MissingField("eContent"))?;

    let master_list = CscaMasterList::from_der(content).map_err(PkdError::from_der_error)?;

    let mut cscas = Vec::with_capacity(master_list.cert_list.len());
    for cert in master_list.cert_list.iter() {
        let der = cert.to_der().map_err(PkdError::from_der_error)?;
        match parser::parse_der(&der) {
            Ok(parsed) => cscas.push(parsed),
            Err(e) => warn!(error = %e, "skipping undecodable master-list entry"),
        }
    }

    info!(
        cscas = cscas.len(),
        verified = decoded.signature_verified,
        "parsed CSCA master list"
    );

    Ok(CmsEnvelope {
        econtent_type: decoded.econtent_type,
        digest_algorithm: decoded.digest_algorithm,
        signature_algorithm: decoded.signature_algorithm,
        signer_certificate: decoded.signer_certificate,
        signing_time: decoded.signing_time,
        certificates: cscas,
        signature_verified: decoded.signature_verified,
        payload: CmsPayload::MasterList {
            version: master_list.version,
        },
    })
}
