// Copyright (c) 2025 - Cowboy AI, LLC.

//! Algorithm and extension compliance checks
//!
//! Classifies signature algorithms against the ICAO approved list and
//! inspects critical extensions and key-usage bits per certificate role.
//! Findings are warnings on a result value, never errors: non-compliant
//! material is still ingested and surfaced, matching PKD operational
//! practice.

use serde::{Deserialize, Serialize};

use crate::oid;
use crate::types::CertificateRole;
use crate::x509::Certificate;

/// ICAO minimum RSA modulus length in bits.
pub const MIN_RSA_BITS: u32 = 2048;

/// Signature algorithms approved without reservation.
const APPROVED_SIGNATURE_OIDS: &[&str] = &[
    oid::SHA256_WITH_RSA,
    oid::SHA384_WITH_RSA,
    oid::SHA512_WITH_RSA,
    oid::ECDSA_WITH_SHA256,
    oid::ECDSA_WITH_SHA384,
    oid::ECDSA_WITH_SHA512,
    oid::RSASSA_PSS,
];

/// Deprecated but still accepted, with a warning.
const DEPRECATED_SIGNATURE_OIDS: &[&str] = &[oid::SHA1_WITH_RSA, oid::ECDSA_WITH_SHA1];

/// Critical-extension OIDs an ICAO inspection system is expected to
/// understand.
const RECOGNISED_CRITICAL_OIDS: &[&str] = &[
    oid::EXT_BASIC_CONSTRAINTS,
    oid::EXT_KEY_USAGE,
    oid::EXT_CERTIFICATE_POLICIES,
    oid::EXT_SUBJECT_KEY_IDENTIFIER,
    oid::EXT_AUTHORITY_KEY_IDENTIFIER,
    oid::EXT_NAME_CONSTRAINTS,
    oid::EXT_POLICY_CONSTRAINTS,
    oid::EXT_INHIBIT_ANY_POLICY,
    oid::EXT_SUBJECT_ALT_NAME,
    oid::EXT_ISSUER_ALT_NAME,
    oid::EXT_CRL_DISTRIBUTION_POINTS,
    oid::EXT_EXTENDED_KEY_USAGE,
];

/// Outcome of the signature-algorithm classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmCompliance {
    /// False only for unknown algorithms
    pub compliant: bool,
    /// Human name of the signature algorithm
    pub algorithm: String,
    /// Findings; empty when fully approved
    pub warnings: Vec<String>,
}

/// Outcome of the role-specific extension check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionValidation {
    /// True iff no warning was emitted
    pub valid: bool,
    /// Findings, one per defect
    pub warnings: Vec<String>,
}

/// Classify a certificate's signature algorithm and key size against the
/// ICAO approved list.
pub fn validate_algorithm_compliance(cert: &Certificate) -> AlgorithmCompliance {
    let sig_oid = cert.signature_algorithm_oid();
    let mut warnings = Vec::new();

    let compliant = if APPROVED_SIGNATURE_OIDS.contains(&sig_oid) {
        true
    } else if DEPRECATED_SIGNATURE_OIDS.contains(&sig_oid) {
        warnings.push("SHA-1 algorithm is deprecated".to_string());
        true
    } else {
        warnings.push(format!("Unknown signature algorithm: {}", sig_oid));
        false
    };

    if cert.public_key_algorithm() == crate::types::PublicKeyAlgorithm::Rsa {
        if let Some(bits) = cert.key_size_bits() {
            if bits < MIN_RSA_BITS {
                warnings.push(format!(
                    "RSA key size {} bits is below ICAO minimum of {} bits",
                    bits, MIN_RSA_BITS
                ));
            }
        }
    }

    AlgorithmCompliance {
        compliant,
        algorithm: cert.signature_algorithm().to_string(),
        warnings,
    }
}

/// Check the certificate's critical extensions and key-usage bits against
/// the expectations for `role`.
pub fn validate_extensions(cert: &Certificate, role: CertificateRole) -> ExtensionValidation {
    let mut warnings = Vec::new();

    for ext_oid in cert.critical_extension_oids() {
        if !RECOGNISED_CRITICAL_OIDS.contains(&ext_oid.as_str()) {
            warnings.push(format!("Unknown critical extension: {}", ext_oid));
        }
    }

    if let Some(ku) = cert.key_usage() {
        match role {
            CertificateRole::Dsc => {
                if !ku.digital_signature {
                    warnings
                        .push("DSC missing required digitalSignature key usage".to_string());
                }
            }
            CertificateRole::Csca => {
                if !ku.key_cert_sign {
                    warnings.push("CSCA missing required keyCertSign key usage".to_string());
                }
            }
            CertificateRole::Mlsc => {}
        }
    }

    ExtensionValidation {
        valid: warnings.is_empty(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approved_oids_cover_spec_list() {
        for o in APPROVED_SIGNATURE_OIDS {
            assert!(!DEPRECATED_SIGNATURE_OIDS.contains(o));
        }
        assert!(APPROVED_SIGNATURE_OIDS.contains(&oid::RSASSA_PSS));
    }

    #[test]
    fn test_recognised_critical_set_has_spec_entries() {
        for required in [
            oid::EXT_BASIC_CONSTRAINTS,
            oid::EXT_KEY_USAGE,
            oid::EXT_EXTENDED_KEY_USAGE,
            oid::EXT_CRL_DISTRIBUTION_POINTS,
        ] {
            assert!(RECOGNISED_CRITICAL_OIDS.contains(&required));
        }
    }
}
