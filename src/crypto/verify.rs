// Copyright (c) 2025 - Cowboy AI, LLC.

//! Raw signature verification against a certificate's public key
//!
//! Dispatches on the signature-algorithm OID to the RSA (PKCS #1 v1.5 and
//! PSS), ECDSA (P-256 / P-384) and Ed25519 backends. CMS signers frequently
//! declare the bare `rsaEncryption` OID and carry the digest separately;
//! callers pass that digest as the hint.

use ed25519_dalek::Verifier as _;
use p256::ecdsa::signature::hazmat::PrehashVerifier as _;
use rsa::{BigUint, Pkcs1v15Sign, Pss, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;
use x509_parser::x509::SubjectPublicKeyInfo;

use crate::oid;

/// Hash algorithms used by the approved and deprecated ICAO signature
/// algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-1 (deprecated, still verified)
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Map a digest-algorithm OID.
    pub fn from_digest_oid(oid_str: &str) -> Option<Self> {
        match oid_str {
            oid::SHA1 => Some(Self::Sha1),
            oid::SHA256 => Some(Self::Sha256),
            oid::SHA384 => Some(Self::Sha384),
            oid::SHA512 => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Hash `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => sha1::Sha1::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

enum SignatureScheme {
    RsaPkcs1(HashAlgorithm),
    RsaPss(Option<HashAlgorithm>),
    Ecdsa(HashAlgorithm),
    Ed25519,
}

fn scheme_for(sig_oid: &str, digest_hint: Option<HashAlgorithm>) -> Option<SignatureScheme> {
    match sig_oid {
        oid::SHA1_WITH_RSA => Some(SignatureScheme::RsaPkcs1(HashAlgorithm::Sha1)),
        oid::SHA256_WITH_RSA => Some(SignatureScheme::RsaPkcs1(HashAlgorithm::Sha256)),
        oid::SHA384_WITH_RSA => Some(SignatureScheme::RsaPkcs1(HashAlgorithm::Sha384)),
        oid::SHA512_WITH_RSA => Some(SignatureScheme::RsaPkcs1(HashAlgorithm::Sha512)),
        // Bare rsaEncryption: the digest travels out-of-band (CMS digestAlgorithm).
        oid::RSA_ENCRYPTION => Some(SignatureScheme::RsaPkcs1(
            digest_hint.unwrap_or(HashAlgorithm::Sha256),
        )),
        oid::RSASSA_PSS => Some(SignatureScheme::RsaPss(digest_hint)),
        oid::ECDSA_WITH_SHA1 => Some(SignatureScheme::Ecdsa(HashAlgorithm::Sha1)),
        oid::ECDSA_WITH_SHA256 => Some(SignatureScheme::Ecdsa(HashAlgorithm::Sha256)),
        oid::ECDSA_WITH_SHA384 => Some(SignatureScheme::Ecdsa(HashAlgorithm::Sha384)),
        oid::ECDSA_WITH_SHA512 => Some(SignatureScheme::Ecdsa(HashAlgorithm::Sha512)),
        oid::ED25519 => Some(SignatureScheme::Ed25519),
        _ => None,
    }
}

/// Verify `signature` over `message` with the public key of the certificate
/// in `issuer_der`.
///
/// `sig_alg_oid` is the dotted signature-algorithm OID; `digest_hint` is the
/// CMS digestAlgorithm when the signature algorithm does not name a hash.
/// Any parse or crypto failure yields `false`.
pub fn verify_with_issuer(
    issuer_der: &[u8],
    message: &[u8],
    signature: &[u8],
    sig_alg_oid: &str,
    digest_hint: Option<HashAlgorithm>,
) -> bool {
    let Ok((_, issuer)) = X509Certificate::from_der(issuer_der) else {
        return false;
    };
    verify_raw_signature(issuer.public_key(), message, signature, sig_alg_oid, digest_hint)
}

/// Verify `signature` over `message` against a parsed SubjectPublicKeyInfo.
pub fn verify_raw_signature(
    spki: &SubjectPublicKeyInfo<'_>,
    message: &[u8],
    signature: &[u8],
    sig_alg_oid: &str,
    digest_hint: Option<HashAlgorithm>,
) -> bool {
    let Some(scheme) = scheme_for(sig_alg_oid, digest_hint) else {
        return false;
    };
    match scheme {
        SignatureScheme::RsaPkcs1(hash) => verify_rsa_pkcs1(spki, hash, message, signature),
        SignatureScheme::RsaPss(hash) => match hash {
            Some(h) => verify_rsa_pss(spki, h, message, signature),
            // PSS parameters vary per issuer; try the approved hashes.
            None => [
                HashAlgorithm::Sha256,
                HashAlgorithm::Sha384,
                HashAlgorithm::Sha512,
            ]
            .iter()
            .any(|h| verify_rsa_pss(spki, *h, message, signature)),
        },
        SignatureScheme::Ecdsa(hash) => verify_ecdsa(spki, hash, message, signature),
        SignatureScheme::Ed25519 => verify_ed25519(spki, message, signature),
    }
}

fn rsa_key_from_spki(spki: &SubjectPublicKeyInfo<'_>) -> Option<RsaPublicKey> {
    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => RsaPublicKey::new(
            BigUint::from_bytes_be(rsa.modulus),
            BigUint::from_bytes_be(rsa.exponent),
        )
        .ok(),
        _ => None,
    }
}

fn verify_rsa_pkcs1(
    spki: &SubjectPublicKeyInfo<'_>,
    hash: HashAlgorithm,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let Some(key) = rsa_key_from_spki(spki) else {
        return false;
    };
    let digest = hash.digest(message);
    let scheme = match hash {
        HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    };
    key.verify(scheme, &digest, signature).is_ok()
}

fn verify_rsa_pss(
    spki: &SubjectPublicKeyInfo<'_>,
    hash: HashAlgorithm,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let Some(key) = rsa_key_from_spki(spki) else {
        return false;
    };
    let digest = hash.digest(message);
    let scheme = match hash {
        // SHA-1 PSS is not on the ICAO approved list.
        HashAlgorithm::Sha1 => return false,
        HashAlgorithm::Sha256 => Pss::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pss::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pss::new::<Sha512>(),
    };
    key.verify(scheme, &digest, signature).is_ok()
}

fn verify_ecdsa(
    spki: &SubjectPublicKeyInfo<'_>,
    hash: HashAlgorithm,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let curve = spki
        .algorithm
        .parameters
        .as_ref()
        .and_then(|p| p.as_oid().ok())
        .map(|o| o.to_id_string());
    let point = spki.subject_public_key.data.as_ref();
    let digest = hash.digest(message);

    match curve.as_deref() {
        Some(oid::SECP256R1) => {
            let Ok(key) = p256::ecdsa::VerifyingKey::from_sec1_bytes(point) else {
                return false;
            };
            let Ok(sig) = p256::ecdsa::Signature::from_der(signature) else {
                return false;
            };
            key.verify_prehash(&digest, &sig).is_ok()
        }
        Some(oid::SECP384R1) => {
            let Ok(key) = p384::ecdsa::VerifyingKey::from_sec1_bytes(point) else {
                return false;
            };
            let Ok(sig) = p384::ecdsa::Signature::from_der(signature) else {
                return false;
            };
            key.verify_prehash(&digest, &sig).is_ok()
        }
        // P-521 and the brainpool curves have no backend here yet.
        _ => false,
    }
}

fn verify_ed25519(spki: &SubjectPublicKeyInfo<'_>, message: &[u8], signature: &[u8]) -> bool {
    let Ok(bytes) = <[u8; 32]>::try_from(spki.subject_public_key.data.as_ref()) else {
        return false;
    };
    let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&bytes) else {
        return false;
    };
    let Ok(sig) = ed25519_dalek::Signature::from_slice(signature) else {
        return false;
    };
    key.verify(message, &sig).is_ok()
}
