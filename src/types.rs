// Copyright (c) 2025 - Cowboy AI, LLC.

//! Common types used throughout the pkd-core crate

use serde::{Deserialize, Serialize};
use std::fmt;

/// File / blob format classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// PEM armored (RFC 7468)
    Pem,
    /// Raw DER
    Der,
    /// DER with `.cer` extension (PKD download convention)
    Cer,
    /// Opaque binary blob
    Bin,
    /// CMS SignedData carrying a CSCA Master List
    CmsMasterList,
    /// CMS SignedData carrying a Deviation List
    CmsDeviationList,
    /// Generic PKCS #7 certificate bundle
    CmsP7b,
    /// X.509 certificate revocation list
    Crl,
    /// LDAP data interchange format
    Ldif,
    /// No heuristic matched
    Unknown,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::Pem => "PEM",
            Format::Der => "DER",
            Format::Cer => "CER",
            Format::Bin => "BIN",
            Format::CmsMasterList => "CMS_ML",
            Format::CmsDeviationList => "CMS_DL",
            Format::CmsP7b => "CMS_P7B",
            Format::Crl => "CRL",
            Format::Ldif => "LDIF",
            Format::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Certificate classification per ICAO Doc 9303 Part 12
///
/// This is a tag on the single `Certificate` value type, not a type
/// hierarchy; consumers switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateTag {
    /// Country Signing CA root
    Csca,
    /// Document Signer Certificate
    Dsc,
    /// Non-conformant DSC (reclassified after a deviation-list hit)
    DscNc,
    /// Master List Signer Certificate
    Mlsc,
    /// Link certificate bridging a CSCA key rollover
    LinkCert,
    /// Deviation List Signer
    DlSigner,
    /// Nothing matched
    Unknown,
}

impl fmt::Display for CertificateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CertificateTag::Csca => "CSCA",
            CertificateTag::Dsc => "DSC",
            CertificateTag::DscNc => "DSC_NC",
            CertificateTag::Mlsc => "MLSC",
            CertificateTag::LinkCert => "LINK_CERT",
            CertificateTag::DlSigner => "DL_SIGNER",
            CertificateTag::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Public key algorithm families encountered in PKD material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicKeyAlgorithm {
    /// RSA
    Rsa,
    /// ECDSA over a named curve
    Ecdsa,
    /// DSA (legacy issuers only)
    Dsa,
    /// Ed25519
    Ed25519,
    /// Anything else, by OID
    Other,
}

/// Decoded keyUsage extension bits (RFC 5280 §4.2.1.3)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyUsageFlags {
    /// bit 0
    pub digital_signature: bool,
    /// bit 1
    pub non_repudiation: bool,
    /// bit 2
    pub key_encipherment: bool,
    /// bit 3
    pub data_encipherment: bool,
    /// bit 4
    pub key_agreement: bool,
    /// bit 5
    pub key_cert_sign: bool,
    /// bit 6
    pub crl_sign: bool,
    /// bit 7
    pub encipher_only: bool,
    /// bit 8
    pub decipher_only: bool,
}

impl KeyUsageFlags {
    /// Names of the set bits, in RFC 5280 order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.digital_signature {
            out.push("digitalSignature");
        }
        if self.non_repudiation {
            out.push("nonRepudiation");
        }
        if self.key_encipherment {
            out.push("keyEncipherment");
        }
        if self.data_encipherment {
            out.push("dataEncipherment");
        }
        if self.key_agreement {
            out.push("keyAgreement");
        }
        if self.key_cert_sign {
            out.push("keyCertSign");
        }
        if self.crl_sign {
            out.push("cRLSign");
        }
        if self.encipher_only {
            out.push("encipherOnly");
        }
        if self.decipher_only {
            out.push("decipherOnly");
        }
        out
    }
}

/// Outcome of the idempotent DSC upsert into a certificate store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterOutcome {
    /// The certificate was not present and has been stored
    Added,
    /// A certificate with the same fingerprint was already stored
    AlreadyPresent,
}

/// Role a certificate plays when its extensions are checked for compliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateRole {
    /// Document Signer
    Dsc,
    /// Country Signing CA
    Csca,
    /// Master List Signer
    Mlsc,
}

/// Truncate a DN fragment to 80 characters for logs and result messages.
pub(crate) fn truncate_dn(dn: &str) -> &str {
    if dn.len() <= 80 {
        dn
    } else {
        // Stay on a char boundary; DNs are overwhelmingly ASCII.
        let mut end = 80;
        while !dn.is_char_boundary(end) {
            end -= 1;
        }
        &dn[..end]
    }
}
