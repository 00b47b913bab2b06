// Copyright (c) 2025 - Cowboy AI, LLC.

//! Certificate parsing, metadata extraction, round-trips and the pure
//! certificate operations.

mod common;

use common::*;
use pkd_core::compliance::{validate_algorithm_compliance, validate_extensions};
use pkd_core::format::detect_format;
use pkd_core::types::{CertificateRole, CertificateTag, Format, PublicKeyAlgorithm};
use pkd_core::x509::ops;
use pkd_core::x509::parser::{
    compute_fingerprint, parse_auto, parse_der, parse_pem, to_der, to_pem, validate_structure,
};

#[test]
fn dsc_metadata_is_extracted() {
    let root = make_root("KR", "Gov", "Root");
    let dsc = make_dsc("KR", "DSC", 100, &root).parsed();

    assert_eq!(dsc.version(), 2, "X.509 v3 is stored as 2");
    assert_eq!(dsc.tag(), CertificateTag::Dsc);
    assert_eq!(dsc.country(), "KR");
    assert_eq!(dsc.serial_hex(), "64");
    assert_eq!(dsc.subject().common_name.as_deref(), Some("DSC"));
    assert_eq!(dsc.issuer().common_name.as_deref(), Some("Root"));
    assert_eq!(dsc.issuer().organization.as_deref(), Some("Gov"));
    assert!(!dsc.is_ca());
    assert!(!dsc.is_self_signed());
    assert_eq!(dsc.public_key_algorithm(), PublicKeyAlgorithm::Rsa);
    assert_eq!(dsc.key_size_bits(), Some(2048));
    assert_eq!(dsc.signature_algorithm(), "sha256WithRSAEncryption");
    assert_eq!(dsc.hash_algorithm(), Some("SHA-256"));
    assert_eq!(dsc.fingerprint().len(), 64);
    assert!(dsc.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
    assert!(validate_structure(&dsc));
}

#[test]
fn classification_covers_all_fixture_roles() {
    let root = make_root("KR", "Gov", "Root");
    assert_eq!(root.parsed().tag(), CertificateTag::Csca);
    assert!(root.parsed().is_self_signed());

    let link = make_link("KR", "Gov", "Root Gen2", new_rsa_key(), &root);
    assert_eq!(link.parsed().tag(), CertificateTag::LinkCert);
    assert!(ops::is_link_certificate(&link.parsed()));
    assert!(!link.parsed().is_self_signed());

    let mlsc = make_mlsc("KR", "ML Signer", &root);
    assert_eq!(mlsc.parsed().tag(), CertificateTag::Mlsc);

    let dls = make_dl_signer("KR", "DL Signer", &root);
    assert_eq!(dls.parsed().tag(), CertificateTag::DlSigner);
}

#[test]
fn der_round_trip_preserves_fingerprint() {
    let root = make_root("KR", "Gov", "Root");
    let cert = root.parsed();
    let reparsed = parse_der(&to_der(&cert)).unwrap();
    assert_eq!(reparsed.fingerprint(), cert.fingerprint());
    assert_eq!(compute_fingerprint(&reparsed), cert.fingerprint());
}

#[test]
fn pem_round_trip_preserves_fingerprint() {
    let root = make_root("KR", "Gov", "Root");
    let cert = root.parsed();
    let pem = to_pem(&cert);

    assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
    assert!(pem.ends_with("-----END CERTIFICATE-----\n"));
    for line in pem.lines() {
        assert!(line.len() <= 64);
    }

    let reparsed = parse_pem(pem.as_bytes()).unwrap();
    assert_eq!(reparsed.len(), 1);
    assert_eq!(reparsed[0].fingerprint(), cert.fingerprint());
}

#[test]
fn pem_with_multiple_blocks_parses_in_order() {
    let root = make_root("KR", "Gov", "Root");
    let dsc = make_dsc("KR", "DSC", 100, &root);
    let concatenated = format!("{}{}", to_pem(&root.parsed()), to_pem(&dsc.parsed()));

    let certs = parse_pem(concatenated.as_bytes()).unwrap();
    assert_eq!(certs.len(), 2);
    assert_eq!(certs[0].fingerprint(), root.parsed().fingerprint());
    assert_eq!(certs[1].fingerprint(), dsc.parsed().fingerprint());
}

#[test]
fn parse_auto_dispatches_on_content() {
    let root = make_root("KR", "Gov", "Root");
    let der = root.der();
    assert_eq!(detect_format(None, &der), Format::Der);

    let from_der = parse_auto(&der).unwrap();
    let from_pem = parse_auto(to_pem(&root.parsed()).as_bytes()).unwrap();
    assert_eq!(from_der[0].fingerprint(), from_pem[0].fingerprint());
}

#[test]
fn parse_der_rejects_trailing_garbage() {
    let root = make_root("KR", "Gov", "Root");
    let mut der = root.der();
    der.extend_from_slice(b"garbage");
    assert!(parse_der(&der).is_err());

    // Trailing whitespace is tolerated.
    let mut der_ws = root.der();
    der_ws.extend_from_slice(b"\n  \n");
    assert!(parse_der(&der_ws).is_ok());
}

#[test]
fn signature_verification_distinguishes_issuers() {
    let root = make_root("KR", "Gov", "Root");
    let other = make_root("DE", "Bund", "Other Root");
    let dsc = make_dsc("KR", "DSC", 100, &root).parsed();

    assert!(ops::verify_signature(&dsc, &root.parsed()));
    assert!(!ops::verify_signature(&dsc, &other.parsed()));
}

#[test]
fn self_signed_roots_self_verify() {
    let root = make_root("KR", "Gov", "Root").parsed();
    assert!(ops::is_self_signed(&root));
    assert!(ops::verify_signature(&root, &root));

    let corrupted = parse_der(&corrupt_signature(&root.der().to_vec())).unwrap();
    assert!(ops::is_self_signed(&corrupted));
    assert!(!ops::verify_signature(&corrupted, &corrupted));
}

#[test]
fn ecdsa_chain_verifies() {
    // The pack's EC material: P-256 keys with ecdsa-with-SHA256 signatures.
    let key = rcgen::KeyPair::generate().unwrap();
    let mut params = rcgen::CertificateParams::new(Vec::<String>::new()).unwrap();
    let mut dn = rcgen::DistinguishedName::new();
    dn.push(rcgen::DnType::CountryName, "DE");
    dn.push(rcgen::DnType::CommonName, "EC Root");
    params.distinguished_name = dn;
    params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
    params.key_usages = vec![rcgen::KeyUsagePurpose::KeyCertSign];
    let cert = params.self_signed(&key).unwrap();

    let parsed = parse_der(cert.der()).unwrap();
    assert_eq!(parsed.public_key_algorithm(), PublicKeyAlgorithm::Ecdsa);
    assert_eq!(parsed.ec_curve(), Some("P-256"));
    assert_eq!(parsed.key_size_bits(), Some(256));
    assert_eq!(parsed.signature_algorithm(), "ecdsa-with-SHA256");
    assert!(ops::verify_signature(&parsed, &parsed));
}

#[test]
fn expiry_predicates_follow_validity_window() {
    let root = make_root("KR", "Gov", "Root");
    let fresh = make_dsc("KR", "DSC", 1, &root).parsed();
    assert!(!ops::is_expired(&fresh));
    assert!(!ops::is_not_yet_valid(&fresh));

    let expired = make_dsc_with_validity(
        "KR",
        "Old DSC",
        2,
        &root,
        time::OffsetDateTime::now_utc() - time::Duration::days(400),
        time::OffsetDateTime::now_utc() - time::Duration::days(5),
    )
    .parsed();
    assert!(ops::is_expired(&expired));

    let future = make_dsc_with_validity(
        "KR",
        "Future DSC",
        3,
        &root,
        time::OffsetDateTime::now_utc() + time::Duration::days(5),
        time::OffsetDateTime::now_utc() + time::Duration::days(400),
    )
    .parsed();
    assert!(ops::is_not_yet_valid(&future));
}

#[test]
fn compliance_classifies_fixture_algorithms() {
    let root = make_root("KR", "Gov", "Root");
    let dsc = make_dsc("KR", "DSC", 100, &root).parsed();

    let algo = validate_algorithm_compliance(&dsc);
    assert!(algo.compliant);
    assert!(algo.warnings.is_empty());
    assert_eq!(algo.algorithm, "sha256WithRSAEncryption");

    let as_dsc = validate_extensions(&dsc, CertificateRole::Dsc);
    assert!(as_dsc.valid);

    // The same leaf checked as a CSCA lacks keyCertSign.
    let as_csca = validate_extensions(&dsc, CertificateRole::Csca);
    assert!(!as_csca.valid);
    assert!(as_csca.warnings[0].contains("keyCertSign"));
}

#[test]
fn pure_operations_are_idempotent() {
    let root = make_root("KR", "Gov", "Root");
    let dsc = make_dsc("KR", "DSC", 100, &root).parsed();
    let issuer = root.parsed();

    let verify = ops::verify_signature(&dsc, &issuer);
    let expired = ops::is_expired(&dsc);
    let fingerprint = dsc.fingerprint().to_string();
    for _ in 0..100 {
        assert_eq!(ops::verify_signature(&dsc, &issuer), verify);
        assert_eq!(ops::is_expired(&dsc), expired);
        assert_eq!(dsc.fingerprint(), fingerprint);
        assert_eq!(compute_fingerprint(&dsc), fingerprint);
    }
}
