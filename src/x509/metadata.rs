// Copyright (c) 2025 - Cowboy AI, LLC.

//! Metadata extraction from DER certificates
//!
//! All derived fields of [`Certificate`] are computed here, in one pass over
//! the `x509-parser` view of the DER bytes. The parser view never escapes;
//! the returned value owns only the DER vector and plain Rust data.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{
    DistributionPointName, GeneralName, ParsedExtension,
};
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;
use x509_parser::time::ASN1Time;

use crate::error::{PkdError, Result};
use crate::oid;
use crate::types::{CertificateTag, KeyUsageFlags, PublicKeyAlgorithm};
use crate::x509::{dn, Certificate};

/// Decode one DER certificate and extract every metadata field eagerly.
pub(crate) fn extract(der: Vec<u8>) -> Result<Certificate> {
    let (rem, cert) = X509Certificate::from_der(&der).map_err(|e| PkdError::Parse {
        message: format!("X.509 decode failed: {}", e),
        offset: None,
    })?;
    if !rem.is_empty() && !rem.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(PkdError::Parse {
            message: "trailing bytes after certificate".to_string(),
            offset: Some(der.len() - rem.len()),
        });
    }

    let fingerprint = fingerprint_hex(&der);
    let serial_hex = canonical_serial_hex(cert.raw_serial());
    let version = cert.version().0 as u8;

    let subject = dn::components_from_name(cert.subject());
    let issuer = dn::components_from_name(cert.issuer());
    let subject_dn = dn::dn_string(cert.subject());
    let issuer_dn = dn::dn_string(cert.issuer());
    let subject_dn_normalized = dn::normalize_dn(&subject_dn);
    let issuer_dn_normalized = dn::normalize_dn(&issuer_dn);
    let self_signed =
        !subject_dn_normalized.is_empty() && subject_dn_normalized == issuer_dn_normalized;

    let not_before = asn1_time_to_datetime(&cert.validity().not_before);
    let not_after = asn1_time_to_datetime(&cert.validity().not_after);

    let sig_oid = cert.signature_algorithm.algorithm.to_id_string();
    let signature_algorithm = oid::signature_algorithm_name(&sig_oid).to_string();
    let hash_algorithm = oid::hash_algorithm_name(&sig_oid).map(str::to_string);

    let (public_key_algorithm, key_size_bits, ec_curve) = public_key_info(&cert);

    let mut key_usage = None;
    let mut extended_key_usage = Vec::new();
    let mut eku_oids = Vec::new();
    let mut is_ca = false;
    let mut path_len_constraint = None;
    let mut subject_key_identifier = None;
    let mut authority_key_identifier = None;
    let mut crl_distribution_points = Vec::new();
    let mut ocsp_url = None;
    let mut critical_extension_oids = Vec::new();

    for ext in cert.extensions() {
        if ext.critical {
            critical_extension_oids.push(ext.oid.to_id_string());
        }
        match ext.parsed_extension() {
            ParsedExtension::KeyUsage(ku) => {
                key_usage = Some(KeyUsageFlags {
                    digital_signature: ku.digital_signature(),
                    non_repudiation: ku.non_repudiation(),
                    key_encipherment: ku.key_encipherment(),
                    data_encipherment: ku.data_encipherment(),
                    key_agreement: ku.key_agreement(),
                    key_cert_sign: ku.key_cert_sign(),
                    crl_sign: ku.crl_sign(),
                    encipher_only: ku.encipher_only(),
                    decipher_only: ku.decipher_only(),
                });
            }
            ParsedExtension::ExtendedKeyUsage(eku) => {
                if eku.any {
                    extended_key_usage.push("anyExtendedKeyUsage".to_string());
                }
                if eku.server_auth {
                    extended_key_usage.push("serverAuth".to_string());
                }
                if eku.client_auth {
                    extended_key_usage.push("clientAuth".to_string());
                }
                if eku.code_signing {
                    extended_key_usage.push("codeSigning".to_string());
                }
                if eku.email_protection {
                    extended_key_usage.push("emailProtection".to_string());
                }
                if eku.time_stamping {
                    extended_key_usage.push("timeStamping".to_string());
                }
                if eku.ocsp_signing {
                    extended_key_usage.push("OCSPSigning".to_string());
                }
                for other in &eku.other {
                    let o = other.to_id_string();
                    extended_key_usage.push(o.clone());
                    eku_oids.push(o);
                }
            }
            ParsedExtension::BasicConstraints(bc) => {
                is_ca = bc.ca;
                path_len_constraint = bc.path_len_constraint;
            }
            ParsedExtension::SubjectKeyIdentifier(ski) => {
                subject_key_identifier = Some(hex::encode(ski.0));
            }
            ParsedExtension::AuthorityKeyIdentifier(aki) => {
                if let Some(ki) = &aki.key_identifier {
                    authority_key_identifier = Some(hex::encode(ki.0));
                }
            }
            ParsedExtension::CRLDistributionPoints(points) => {
                for point in points.points.iter() {
                    if let Some(DistributionPointName::FullName(names)) =
                        &point.distribution_point
                    {
                        for name in names {
                            if let GeneralName::URI(uri) = name {
                                crl_distribution_points.push(uri.to_string());
                            }
                        }
                    }
                }
            }
            ParsedExtension::AuthorityInfoAccess(aia) => {
                for desc in &aia.accessdescs {
                    if desc.access_method.to_id_string() == oid::AD_OCSP {
                        if let GeneralName::URI(uri) = &desc.access_location {
                            ocsp_url = Some(uri.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let has_key_cert_sign = key_usage.map(|ku| ku.key_cert_sign).unwrap_or(false);
    let has_digital_signature = key_usage.map(|ku| ku.digital_signature).unwrap_or(false);
    let tag = classify(
        &eku_oids,
        is_ca,
        has_key_cert_sign,
        has_digital_signature,
        self_signed,
    );

    let country = subject
        .country
        .as_deref()
        .map(|c| c.trim().to_uppercase())
        .unwrap_or_default();

    Ok(Certificate {
        der,
        fingerprint,
        serial_hex,
        version,
        subject,
        issuer,
        subject_dn,
        issuer_dn,
        subject_dn_normalized,
        issuer_dn_normalized,
        not_before,
        not_after,
        public_key_algorithm,
        key_size_bits,
        ec_curve,
        signature_algorithm_oid: sig_oid,
        signature_algorithm,
        hash_algorithm,
        key_usage,
        extended_key_usage,
        is_ca,
        path_len_constraint,
        subject_key_identifier,
        authority_key_identifier,
        crl_distribution_points,
        ocsp_url,
        critical_extension_oids,
        tag,
        country,
        self_signed,
    })
}

/// SHA-256 over arbitrary bytes as 64 lowercase hex characters.
pub(crate) fn fingerprint_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Canonical serial representation: unsigned big-endian, leading zero octets
/// stripped, lowercase hex. The zero serial renders as `00`.
pub(crate) fn canonical_serial_hex(raw: &[u8]) -> String {
    let stripped: &[u8] = {
        let mut s = raw;
        while s.len() > 1 && s[0] == 0 {
            s = &s[1..];
        }
        s
    };
    if stripped.is_empty() {
        "00".to_string()
    } else {
        hex::encode(stripped)
    }
}

pub(crate) fn asn1_time_to_datetime(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}

fn public_key_info(
    cert: &X509Certificate<'_>,
) -> (PublicKeyAlgorithm, Option<u32>, Option<String>) {
    let spki = cert.public_key();
    let alg_oid = spki.algorithm.algorithm.to_id_string();

    if alg_oid == oid::EC_PUBLIC_KEY {
        let curve_oid = spki
            .algorithm
            .parameters
            .as_ref()
            .and_then(|p| p.as_oid().ok())
            .map(|o| o.to_id_string());
        let curve = curve_oid.as_deref().and_then(oid::curve_name).map(str::to_string);
        let bits = curve_oid.as_deref().and_then(oid::curve_bits);
        return (PublicKeyAlgorithm::Ecdsa, bits, curve);
    }
    if alg_oid == oid::ED25519 {
        return (PublicKeyAlgorithm::Ed25519, Some(256), None);
    }
    if alg_oid == oid::DSA {
        return (PublicKeyAlgorithm::Dsa, None, None);
    }

    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => {
            // Modulus bit length; the DER INTEGER may carry a leading zero
            // octet that must not count.
            let significant = rsa
                .modulus
                .iter()
                .skip_while(|&&b| b == 0)
                .count();
            (
                PublicKeyAlgorithm::Rsa,
                Some((significant * 8) as u32),
                None,
            )
        }
        _ => (PublicKeyAlgorithm::Other, None, None),
    }
}

/// Classification rules, in precedence order:
/// EKU markers first, then CA certificates, then signing leaves.
fn classify(
    eku_oids: &[String],
    is_ca: bool,
    key_cert_sign: bool,
    digital_signature: bool,
    self_signed: bool,
) -> CertificateTag {
    if eku_oids.iter().any(|o| o == oid::ICAO_EKU_MASTER_LIST_SIGNER) {
        return CertificateTag::Mlsc;
    }
    if eku_oids
        .iter()
        .any(|o| o == oid::ICAO_EKU_DEVIATION_LIST_SIGNER)
    {
        return CertificateTag::DlSigner;
    }
    if is_ca && key_cert_sign {
        return if self_signed {
            CertificateTag::Csca
        } else {
            CertificateTag::LinkCert
        };
    }
    if digital_signature && !is_ca {
        return CertificateTag::Dsc;
    }
    CertificateTag::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_serial_strips_leading_zeros() {
        assert_eq!(canonical_serial_hex(&[0x00, 0x64]), "64");
        assert_eq!(canonical_serial_hex(&[0x00, 0x00, 0x01, 0x02]), "0102");
        assert_eq!(canonical_serial_hex(&[0x64]), "64");
        assert_eq!(canonical_serial_hex(&[0x00]), "00");
        assert_eq!(canonical_serial_hex(&[]), "00");
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint_hex(b"abc");
        assert_eq!(fp.len(), 64);
        assert_eq!(
            fp,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_classify_precedence() {
        let mlsc_eku = vec![oid::ICAO_EKU_MASTER_LIST_SIGNER.to_string()];
        // EKU marker wins even on a CA certificate.
        assert_eq!(
            classify(&mlsc_eku, true, true, false, true),
            CertificateTag::Mlsc
        );
        assert_eq!(classify(&[], true, true, false, true), CertificateTag::Csca);
        assert_eq!(
            classify(&[], true, true, false, false),
            CertificateTag::LinkCert
        );
        assert_eq!(classify(&[], false, false, true, false), CertificateTag::Dsc);
        assert_eq!(
            classify(&[], false, false, false, false),
            CertificateTag::Unknown
        );
    }
}
