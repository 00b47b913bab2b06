// Copyright (c) 2025 - Cowboy AI, LLC.

//! OID constants for ICAO Doc 9303 and PKIX structures
//!
//! Everything in the core compares OIDs in dotted-decimal string form; the
//! `der`-typed constants are only needed where CMS structures are decoded.

use der::asn1::ObjectIdentifier;

// --- ICAO MRTD security object identifiers (2.23.136.1.1.*) ---

/// eContentType of a CSCA Master List
pub const ICAO_MASTER_LIST: &str = "2.23.136.1.1.2";
/// eContentType of a Deviation List
pub const ICAO_DEVIATION_LIST: &str = "2.23.136.1.1.7";
/// eContentType of the LDS security object inside an EF.SOD
pub const ICAO_LDS_SECURITY_OBJECT: &str = "2.23.136.1.1.1";
/// Extended-key-usage marker carried by Master List Signer certificates
pub const ICAO_EKU_MASTER_LIST_SIGNER: &str = "2.23.136.1.1.1";
/// Extended-key-usage marker carried by Deviation List Signer certificates
pub const ICAO_EKU_DEVIATION_LIST_SIGNER: &str = "2.23.136.1.1.10";
/// Prefix of the defect-type arc inside a Deviation List
pub const ICAO_DEFECT_ARC: &str = "2.23.136.1.1.7.1";

/// `der`-typed Master List eContentType
pub const ICAO_MASTER_LIST_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.23.136.1.1.2");
/// `der`-typed Deviation List eContentType
pub const ICAO_DEVIATION_LIST_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.23.136.1.1.7");
/// `der`-typed LDS security object eContentType
pub const ICAO_LDS_SECURITY_OBJECT_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.23.136.1.1.1");

// --- CMS / PKCS #7 ---

/// PKCS #7 id-signedData
pub const PKCS7_SIGNED_DATA: &str = "1.2.840.113549.1.7.2";
/// `der`-typed id-signedData
pub const PKCS7_SIGNED_DATA_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");
/// PKCS #9 content-type signed attribute
pub const PKCS9_CONTENT_TYPE_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.3");
/// PKCS #9 message-digest signed attribute
pub const PKCS9_MESSAGE_DIGEST_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.4");
/// PKCS #9 signing-time signed attribute
pub const PKCS9_SIGNING_TIME_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.5");

// --- Signature algorithms ---

/// rsaEncryption (bare, digest carried separately as in CMS)
pub const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
/// sha1WithRSAEncryption (deprecated)
pub const SHA1_WITH_RSA: &str = "1.2.840.113549.1.1.5";
/// sha256WithRSAEncryption
pub const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";
/// sha384WithRSAEncryption
pub const SHA384_WITH_RSA: &str = "1.2.840.113549.1.1.12";
/// sha512WithRSAEncryption
pub const SHA512_WITH_RSA: &str = "1.2.840.113549.1.1.13";
/// RSASSA-PSS
pub const RSASSA_PSS: &str = "1.2.840.113549.1.1.10";
/// ecdsa-with-SHA1 (deprecated)
pub const ECDSA_WITH_SHA1: &str = "1.2.840.10045.4.1";
/// ecdsa-with-SHA256
pub const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
/// ecdsa-with-SHA384
pub const ECDSA_WITH_SHA384: &str = "1.2.840.10045.4.3.3";
/// ecdsa-with-SHA512
pub const ECDSA_WITH_SHA512: &str = "1.2.840.10045.4.3.4";
/// Ed25519
pub const ED25519: &str = "1.3.101.112";

// --- Digest algorithms ---

/// SHA-1
pub const SHA1: &str = "1.3.14.3.2.26";
/// SHA-256
pub const SHA256: &str = "2.16.840.1.101.3.4.2.1";
/// SHA-384
pub const SHA384: &str = "2.16.840.1.101.3.4.2.2";
/// SHA-512
pub const SHA512: &str = "2.16.840.1.101.3.4.2.3";
/// `der`-typed SHA-256 (fixture and SOD default)
pub const SHA256_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");

// --- Public key algorithms ---

/// id-ecPublicKey
pub const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
/// id-dsa
pub const DSA: &str = "1.2.840.10040.4.1";

// --- Named curves ---

/// NIST P-256 (prime256v1)
pub const SECP256R1: &str = "1.2.840.10045.3.1.7";
/// NIST P-384
pub const SECP384R1: &str = "1.3.132.0.34";
/// NIST P-521
pub const SECP521R1: &str = "1.3.132.0.35";
/// brainpoolP256r1
pub const BRAINPOOL_P256R1: &str = "1.3.36.3.3.2.8.1.1.7";
/// brainpoolP384r1
pub const BRAINPOOL_P384R1: &str = "1.3.36.3.3.2.8.1.1.11";
/// brainpoolP512r1
pub const BRAINPOOL_P512R1: &str = "1.3.36.3.3.2.8.1.1.13";

// --- DN attribute types (2.5.4.*) ---

/// commonName
pub const AT_COMMON_NAME: &str = "2.5.4.3";
/// surname
pub const AT_SURNAME: &str = "2.5.4.4";
/// serialNumber
pub const AT_SERIAL_NUMBER: &str = "2.5.4.5";
/// countryName
pub const AT_COUNTRY: &str = "2.5.4.6";
/// localityName
pub const AT_LOCALITY: &str = "2.5.4.7";
/// stateOrProvinceName
pub const AT_STATE_OR_PROVINCE: &str = "2.5.4.8";
/// organizationName
pub const AT_ORGANIZATION: &str = "2.5.4.10";
/// organizationalUnitName
pub const AT_ORGANIZATIONAL_UNIT: &str = "2.5.4.11";
/// title
pub const AT_TITLE: &str = "2.5.4.12";
/// givenName
pub const AT_GIVEN_NAME: &str = "2.5.4.42";
/// pseudonym
pub const AT_PSEUDONYM: &str = "2.5.4.65";
/// emailAddress (PKCS #9)
pub const AT_EMAIL: &str = "1.2.840.113549.1.9.1";

// --- X.509 extensions (2.5.29.*) ---

/// subjectKeyIdentifier
pub const EXT_SUBJECT_KEY_IDENTIFIER: &str = "2.5.29.14";
/// keyUsage
pub const EXT_KEY_USAGE: &str = "2.5.29.15";
/// subjectAltName
pub const EXT_SUBJECT_ALT_NAME: &str = "2.5.29.17";
/// issuerAltName
pub const EXT_ISSUER_ALT_NAME: &str = "2.5.29.18";
/// basicConstraints
pub const EXT_BASIC_CONSTRAINTS: &str = "2.5.29.19";
/// nameConstraints
pub const EXT_NAME_CONSTRAINTS: &str = "2.5.29.30";
/// cRLDistributionPoints
pub const EXT_CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
/// certificatePolicies
pub const EXT_CERTIFICATE_POLICIES: &str = "2.5.29.32";
/// policyConstraints
pub const EXT_POLICY_CONSTRAINTS: &str = "2.5.29.36";
/// authorityKeyIdentifier
pub const EXT_AUTHORITY_KEY_IDENTIFIER: &str = "2.5.29.35";
/// extKeyUsage
pub const EXT_EXTENDED_KEY_USAGE: &str = "2.5.29.37";
/// inhibitAnyPolicy
pub const EXT_INHIBIT_ANY_POLICY: &str = "2.5.29.54";

/// id-ad-ocsp access method inside authorityInfoAccess
pub const AD_OCSP: &str = "1.3.6.1.5.5.7.48.1";

/// Human name for a signature-algorithm OID; falls back to the OID itself.
pub fn signature_algorithm_name(oid: &str) -> &str {
    match oid {
        RSA_ENCRYPTION => "rsaEncryption",
        SHA1_WITH_RSA => "sha1WithRSAEncryption",
        SHA256_WITH_RSA => "sha256WithRSAEncryption",
        SHA384_WITH_RSA => "sha384WithRSAEncryption",
        SHA512_WITH_RSA => "sha512WithRSAEncryption",
        RSASSA_PSS => "rsassa-pss",
        ECDSA_WITH_SHA1 => "ecdsa-with-SHA1",
        ECDSA_WITH_SHA256 => "ecdsa-with-SHA256",
        ECDSA_WITH_SHA384 => "ecdsa-with-SHA384",
        ECDSA_WITH_SHA512 => "ecdsa-with-SHA512",
        ED25519 => "Ed25519",
        other => other,
    }
}

/// Hash algorithm implied by a signature-algorithm OID, when it names one.
pub fn hash_algorithm_name(sig_oid: &str) -> Option<&'static str> {
    match sig_oid {
        SHA1_WITH_RSA | ECDSA_WITH_SHA1 => Some("SHA-1"),
        SHA256_WITH_RSA | ECDSA_WITH_SHA256 => Some("SHA-256"),
        SHA384_WITH_RSA | ECDSA_WITH_SHA384 => Some("SHA-384"),
        SHA512_WITH_RSA | ECDSA_WITH_SHA512 => Some("SHA-512"),
        ED25519 => Some("SHA-512"),
        _ => None,
    }
}

/// Human name for a digest-algorithm OID.
pub fn digest_algorithm_name(oid: &str) -> Option<&'static str> {
    match oid {
        SHA1 => Some("SHA-1"),
        SHA256 => Some("SHA-256"),
        SHA384 => Some("SHA-384"),
        SHA512 => Some("SHA-512"),
        _ => None,
    }
}

/// Curve name for a named-curve OID.
pub fn curve_name(oid: &str) -> Option<&'static str> {
    match oid {
        SECP256R1 => Some("P-256"),
        SECP384R1 => Some("P-384"),
        SECP521R1 => Some("P-521"),
        BRAINPOOL_P256R1 => Some("brainpoolP256r1"),
        BRAINPOOL_P384R1 => Some("brainpoolP384r1"),
        BRAINPOOL_P512R1 => Some("brainpoolP512r1"),
        _ => None,
    }
}

/// Key size in bits for a named-curve OID.
pub fn curve_bits(oid: &str) -> Option<u32> {
    match oid {
        SECP256R1 | BRAINPOOL_P256R1 => Some(256),
        SECP384R1 | BRAINPOOL_P384R1 => Some(384),
        SECP521R1 => Some(521),
        BRAINPOOL_P512R1 => Some(512),
        _ => None,
    }
}
