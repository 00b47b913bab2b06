// Copyright (c) 2025 - Cowboy AI, LLC.

//! Deviation List parsing
//!
//! A Deviation List is a SignedData envelope with eContentType 2.23.136.1.1.7
//! identifying certificates with known defects. The content decodes as
//!
//! ```text
//! DeviationList    ::= SEQUENCE { version INTEGER,
//!                                 deviations SET OF SignerDeviation }
//! SignerDeviation  ::= SEQUENCE { signerIdentifier IssuerAndSerialNumber,
//!                                 defects SET OF Defect }
//! Defect           ::= SEQUENCE { defectType OBJECT IDENTIFIER,
//!                                 description UTF8String OPTIONAL,
//!                                 parameters ANY OPTIONAL }
//! ```

use cms::cert::IssuerAndSerialNumber;
use der::asn1::{ObjectIdentifier, SetOfVec};
use der::{Any, Decode, Encode, Sequence};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cms::{decode_signed_data, normalize_name_der, CmsEnvelope, CmsPayload};
use crate::error::{PkdError, Result};
use crate::oid;
use crate::x509::metadata;

/// Defect classes per the ICAO technical report arcs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefectCategory {
    /// Certificate or key defects (2.23.136.1.1.7.1.1.*)
    CertOrKey,
    /// Logical data structure defects (…7.1.2.*)
    Lds,
    /// Machine-readable-zone defects (…7.1.3.*)
    Mrz,
    /// Chip defects (…7.1.4.*) and any unrecognised arc
    Chip,
}

/// One target-certificate deviation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationEntry {
    /// Issuer DN of the affected certificate, canonical comparison form
    pub target_issuer_dn: String,
    /// Serial of the affected certificate, canonical hex
    pub target_serial: String,
    /// Defect type as a dotted OID, preserved verbatim
    pub defect_oid: String,
    /// Mapped defect category
    pub category: DefectCategory,
    /// Optional human description from the list
    pub description: Option<String>,
    /// Raw DER of the defect parameters, when present
    pub parameters: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct DeviationList {
    version: u8,
    deviations: SetOfVec<Any>,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct SignerDeviation {
    signer_identifier: IssuerAndSerialNumber,
    defects: SetOfVec<Any>,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct Defect {
    defect_type: ObjectIdentifier,
    description: Option<String>,
    parameters: Option<Any>,
}

/// Map a defect-type OID onto its category by arc prefix. Unknown arcs fall
/// back to `Chip` with the OID preserved on the entry.
pub(crate) fn categorize_defect(defect_oid: &str) -> DefectCategory {
    let arc = oid::ICAO_DEFECT_ARC;
    if let Some(rest) = defect_oid.strip_prefix(arc) {
        if rest.starts_with(".1.") || rest == ".1" {
            return DefectCategory::CertOrKey;
        }
        if rest.starts_with(".2.") || rest == ".2" {
            return DefectCategory::Lds;
        }
        if rest.starts_with(".3.") || rest == ".3" {
            return DefectCategory::Mrz;
        }
        if rest.starts_with(".4.") || rest == ".4" {
            return DefectCategory::Chip;
        }
    }
    DefectCategory::Chip
}

/// Parse a Deviation List envelope.
///
/// Asserts the eContentType and flattens every (signer, defect) pair into a
/// [`DeviationEntry`]. Signature failures are reported through
/// `signature_verified`, not as errors.
pub fn parse_deviation_list(bytes: &[u8]) -> Result<CmsEnvelope> {
    let decoded = decode_signed_data(bytes)?;
    if decoded.econtent_type != oid::ICAO_DEVIATION_LIST {
        return Err(PkdError::WrongContentType {
            expected: oid::ICAO_DEVIATION_LIST.to_string(),
            found: decoded.econtent_type,
        });
    }
    let content = decoded
        .econtent
        .as_deref()
        .ok_or(PkdError::MissingField("eContent"))?;

    let list = DeviationList::from_der(content).map_err(PkdError::from_der_error)?;

    let mut entries = Vec::new();
    for raw in list.deviations.iter() {
        let dev_der = raw.to_der().map_err(PkdError::from_der_error)?;
        let deviation = match SignerDeviation::from_der(&dev_der) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "skipping undecodable deviation entry");
                continue;
            }
        };
        let issuer_der = deviation
            .signer_identifier
            .issuer
            .to_der()
            .map_err(PkdError::from_der_error)?;
        let target_issuer_dn = normalize_name_der(&issuer_der).unwrap_or_default();
        let target_serial = metadata::canonical_serial_hex(
            deviation.signer_identifier.serial_number.as_bytes(),
        );

        for defect_any in deviation.defects.iter() {
            let defect_der = defect_any.to_der().map_err(PkdError::from_der_error)?;
            let defect = match Defect::from_der(&defect_der) {
                Ok(d) => d,
                Err(e) => {
                    warn!(error = %e, "skipping undecodable defect");
                    continue;
                }
            };
            let defect_oid = defect.defect_type.to_string();
            entries.push(DeviationEntry {
                target_issuer_dn: target_issuer_dn.clone(),
                target_serial: target_serial.clone(),
                category: categorize_defect(&defect_oid),
                defect_oid,
                description: defect.description,
                parameters: defect
                    .parameters
                    .map(|p| p.to_der())
                    .transpose()
                    .map_err(PkdError::from_der_error)?,
            });
        }
    }

    Ok(CmsEnvelope {
        econtent_type: decoded.econtent_type,
        digest_algorithm: decoded.digest_algorithm,
        signature_algorithm: decoded.signature_algorithm,
        signer_certificate: decoded.signer_certificate,
        signing_time: decoded.signing_time,
        certificates: decoded.bundled_certificates,
        signature_verified: decoded.signature_verified,
        payload: CmsPayload::DeviationList { entries },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_categorization() {
        assert_eq!(
            categorize_defect("2.23.136.1.1.7.1.1.2"),
            DefectCategory::CertOrKey
        );
        assert_eq!(
            categorize_defect("2.23.136.1.1.7.1.2.1"),
            DefectCategory::Lds
        );
        assert_eq!(
            categorize_defect("2.23.136.1.1.7.1.3.1"),
            DefectCategory::Mrz
        );
        assert_eq!(
            categorize_defect("2.23.136.1.1.7.1.4.1"),
            DefectCategory::Chip
        );
        // Unknown arcs preserve the OID and land in Chip.
        assert_eq!(categorize_defect("1.2.3.4"), DefectCategory::Chip);
        assert_eq!(
            categorize_defect("2.23.136.1.1.7.1.9.1"),
            DefectCategory::Chip
        );
    }
}
