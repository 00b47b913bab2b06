// Copyright (c) 2025 - Cowboy AI, LLC.

//! Shared fixtures for the integration tests
//!
//! Generates CSCA / link / DSC / MLSC certificates and CRLs with rcgen, and
//! assembles CMS SignedData envelopes (Master Lists, Deviation Lists, SODs)
//! from `cms`/`der` building blocks, signing them with the fixture RSA keys.

#![allow(dead_code)]

use cms::cert::{CertificateChoices, IssuerAndSerialNumber};
use cms::content_info::{CmsVersion, ContentInfo};
use cms::signed_data::{
    CertificateSet, EncapsulatedContentInfo, SignedData, SignerIdentifier, SignerInfo,
    SignerInfos,
};
use der::asn1::{Any, ObjectIdentifier, OctetString, SetOfVec, UtcTime};
use der::{Decode, Encode, Sequence};
use rcgen::{
    BasicConstraints, CertificateParams, CertificateRevocationListParams, DistinguishedName,
    DnType, ExtendedKeyUsagePurpose, IsCa, KeyIdMethod, KeyPair, KeyUsagePurpose,
    RevokedCertParams, SerialNumber,
};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};
use std::time::Duration as StdDuration;
use time::{Duration, OffsetDateTime};
use x509_cert::spki::AlgorithmIdentifierOwned;

use pkd_core::x509::parser;
use pkd_core::x509::Certificate;

/// OID constants mirrored from the crate under test.
pub const OID_ICAO_ML: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.23.136.1.1.2");
pub const OID_ICAO_DL: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.23.136.1.1.7");
pub const OID_LDS_SO: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.23.136.1.1.1");
pub const OID_SIGNED_DATA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");
pub const OID_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
pub const OID_SHA256_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
pub const OID_CONTENT_TYPE: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.3");
pub const OID_MESSAGE_DIGEST: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.4");
pub const OID_SIGNING_TIME: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.5");

/// An RSA key usable both by rcgen (certificate signing) and directly
/// (CMS envelope signing).
pub struct TestKey {
    pub rsa: RsaPrivateKey,
    pub rcgen: KeyPair,
}

pub fn new_rsa_key() -> TestKey {
    let mut rng = rand::thread_rng();
    let rsa = RsaPrivateKey::new(&mut rng, 2048).expect("RSA keygen");
    let pem = rsa.to_pkcs8_pem(LineEnding::LF).expect("PKCS#8 encode");
    let rcgen = KeyPair::from_pem(&pem).expect("rcgen key import");
    TestKey { rsa, rcgen }
}

/// Duplicate a key so two certificates can share key material
/// (key-rollover and cross-signing setups).
pub fn clone_key(key: &TestKey) -> TestKey {
    let pem = key.rsa.to_pkcs8_pem(LineEnding::LF).expect("PKCS#8 encode");
    TestKey {
        rsa: key.rsa.clone(),
        rcgen: KeyPair::from_pem(&pem).expect("rcgen key import"),
    }
}

/// A generated certificate plus the key material that controls it.
pub struct TestCert {
    pub cert: rcgen::Certificate,
    pub key: TestKey,
}

impl TestCert {
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }

    pub fn parsed(&self) -> Certificate {
        parser::parse_der(&self.der()).expect("fixture certificate parses")
    }
}

pub fn serial_bytes(serial: u64) -> Vec<u8> {
    let bytes = serial.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    bytes[first..].to_vec()
}

fn distinguished_name(country: &str, organization: Option<&str>, common_name: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CountryName, country);
    if let Some(o) = organization {
        dn.push(DnType::OrganizationName, o);
    }
    dn.push(DnType::CommonName, common_name);
    dn
}

fn ca_params(country: &str, organization: &str, common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("params");
    params.distinguished_name = distinguished_name(country, Some(organization), common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params.not_before = OffsetDateTime::now_utc() - Duration::days(30);
    params.not_after = OffsetDateTime::now_utc() + Duration::days(3650);
    params
}

/// Self-signed root CSCA.
pub fn make_root(country: &str, organization: &str, common_name: &str) -> TestCert {
    make_root_with_key(country, organization, common_name, new_rsa_key())
}

/// Self-signed root CSCA over a caller-supplied key (key-rollover setups).
pub fn make_root_with_key(
    country: &str,
    organization: &str,
    common_name: &str,
    key: TestKey,
) -> TestCert {
    let params = ca_params(country, organization, common_name);
    let cert = params.self_signed(&key.rcgen).expect("self-signed root");
    TestCert { cert, key }
}

/// CA certificate for `common_name` signed by `issuer`: a link certificate
/// bridging old and new CSCA generations.
pub fn make_link(
    country: &str,
    organization: &str,
    common_name: &str,
    key: TestKey,
    issuer: &TestCert,
) -> TestCert {
    let params = ca_params(country, organization, common_name);
    let cert = params
        .signed_by(&key.rcgen, &issuer.cert, &issuer.key.rcgen)
        .expect("link certificate");
    TestCert { cert, key }
}

/// Document signer with the given serial, signed by `issuer`.
pub fn make_dsc(country: &str, common_name: &str, serial: u64, issuer: &TestCert) -> TestCert {
    make_dsc_with_validity(
        country,
        common_name,
        serial,
        issuer,
        OffsetDateTime::now_utc() - Duration::days(10),
        OffsetDateTime::now_utc() + Duration::days(365),
    )
}

/// Document signer with an explicit validity window (expired-DSC setups).
pub fn make_dsc_with_validity(
    country: &str,
    common_name: &str,
    serial: u64,
    issuer: &TestCert,
    not_before: OffsetDateTime,
    not_after: OffsetDateTime,
) -> TestCert {
    let key = new_rsa_key();
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("params");
    params.distinguished_name = distinguished_name(country, None, common_name);
    params.is_ca = IsCa::NoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.serial_number = Some(SerialNumber::from(serial_bytes(serial)));
    params.not_before = not_before;
    params.not_after = not_after;
    let cert = params
        .signed_by(&key.rcgen, &issuer.cert, &issuer.key.rcgen)
        .expect("DSC");
    TestCert { cert, key }
}

/// Master List Signer: a leaf carrying the ICAO MLS extended key usage.
pub fn make_mlsc(country: &str, common_name: &str, issuer: &TestCert) -> TestCert {
    let key = new_rsa_key();
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("params");
    params.distinguished_name = distinguished_name(country, Some("Gov"), common_name);
    params.is_ca = IsCa::NoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages =
        vec![ExtendedKeyUsagePurpose::Other(vec![2, 23, 136, 1, 1, 1])];
    params.not_before = OffsetDateTime::now_utc() - Duration::days(10);
    params.not_after = OffsetDateTime::now_utc() + Duration::days(730);
    let cert = params
        .signed_by(&key.rcgen, &issuer.cert, &issuer.key.rcgen)
        .expect("MLSC");
    TestCert { cert, key }
}

/// Deviation List Signer: a leaf carrying the ICAO DLS extended key usage.
pub fn make_dl_signer(country: &str, common_name: &str, issuer: &TestCert) -> TestCert {
    let key = new_rsa_key();
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("params");
    params.distinguished_name = distinguished_name(country, Some("Gov"), common_name);
    params.is_ca = IsCa::NoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages =
        vec![ExtendedKeyUsagePurpose::Other(vec![2, 23, 136, 1, 1, 10])];
    params.not_before = OffsetDateTime::now_utc() - Duration::days(10);
    params.not_after = OffsetDateTime::now_utc() + Duration::days(730);
    let cert = params
        .signed_by(&key.rcgen, &issuer.cert, &issuer.key.rcgen)
        .expect("DL signer");
    TestCert { cert, key }
}

/// CRL signed by `issuer` revoking `entries`, with nextUpdate shifted by
/// `next_update_days` from now (negative values produce an expired CRL).
pub fn make_crl(
    issuer: &TestCert,
    entries: &[(u64, rcgen::RevocationReason)],
    next_update_days: i64,
) -> Vec<u8> {
    let revoked_certs = entries
        .iter()
        .map(|(serial, reason)| RevokedCertParams {
            serial_number: SerialNumber::from(serial_bytes(*serial)),
            revocation_time: OffsetDateTime::now_utc() - Duration::days(1),
            reason_code: Some(*reason),
            invalidity_date: None,
        })
        .collect();
    let params = CertificateRevocationListParams {
        this_update: OffsetDateTime::now_utc() - Duration::days(1),
        next_update: OffsetDateTime::now_utc() + Duration::days(next_update_days),
        crl_number: SerialNumber::from(vec![0x01]),
        issuing_distribution_point: None,
        revoked_certs,
        key_identifier_method: KeyIdMethod::Sha256,
    };
    let crl = params
        .signed_by(&issuer.cert, &issuer.key.rcgen)
        .expect("CRL");
    crl.der().to_vec()
}

/// Corrupt the final byte of a DER blob: the tail of the signature value.
/// The structure still parses; the signature no longer verifies.
pub fn corrupt_signature(der: &[u8]) -> Vec<u8> {
    let mut out = der.to_vec();
    let last = out.len() - 1;
    out[last] ^= 0xff;
    out
}

fn sha256_algorithm() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: OID_SHA256,
        parameters: None,
    }
}

/// Assemble and sign a CMS SignedData envelope per RFC 5652, with the
/// signed-attributes digest path.
pub fn build_signed_data(
    econtent_type: ObjectIdentifier,
    content: &[u8],
    signer: &TestCert,
    bundled_certs: &[Vec<u8>],
    tamper_signature: bool,
) -> Vec<u8> {
    let signer_x509 =
        x509_cert::Certificate::from_der(&signer.der()).expect("signer reparses");

    // Signed attributes: content-type, message-digest, signing-time.
    let content_digest = Sha256::digest(content);
    let attrs = vec![
        x509_cert::attr::Attribute {
            oid: OID_CONTENT_TYPE,
            values: SetOfVec::try_from(vec![Any::encode_from(&econtent_type).unwrap()])
                .unwrap(),
        },
        x509_cert::attr::Attribute {
            oid: OID_MESSAGE_DIGEST,
            values: SetOfVec::try_from(vec![Any::encode_from(
                &OctetString::new(content_digest.to_vec()).unwrap(),
            )
            .unwrap()])
            .unwrap(),
        },
        x509_cert::attr::Attribute {
            oid: OID_SIGNING_TIME,
            values: SetOfVec::try_from(vec![Any::encode_from(
                // 2025-01-01T00:00:00Z
                &UtcTime::from_unix_duration(StdDuration::from_secs(1_735_689_600)).unwrap(),
            )
            .unwrap()])
            .unwrap(),
        },
    ];
    let signed_attrs: SetOfVec<x509_cert::attr::Attribute> =
        SetOfVec::try_from(attrs).unwrap();

    // RFC 5652 §5.4: the signature covers the DER of the SET OF Attribute.
    let attrs_der = signed_attrs.to_der().unwrap();
    let attrs_digest = Sha256::digest(&attrs_der);
    let mut signature = signer
        .key
        .rsa
        .sign(Pkcs1v15Sign::new::<Sha256>(), &attrs_digest)
        .expect("CMS signature");
    if tamper_signature {
        let last = signature.len() - 1;
        signature[last] ^= 0xff;
    }

    let signer_info = SignerInfo {
        version: CmsVersion::V1,
        sid: SignerIdentifier::IssuerAndSerialNumber(IssuerAndSerialNumber {
            issuer: signer_x509.tbs_certificate.issuer.clone(),
            serial_number: signer_x509.tbs_certificate.serial_number.clone(),
        }),
        digest_alg: sha256_algorithm(),
        signed_attrs: Some(signed_attrs),
        signature_algorithm: AlgorithmIdentifierOwned {
            oid: OID_SHA256_RSA,
            parameters: None,
        },
        signature: OctetString::new(signature).unwrap(),
        unsigned_attrs: None,
    };

    let mut choices = vec![CertificateChoices::Certificate(signer_x509)];
    for der in bundled_certs {
        choices.push(CertificateChoices::Certificate(
            x509_cert::Certificate::from_der(der).expect("bundled cert reparses"),
        ));
    }

    let signed_data = SignedData {
        version: CmsVersion::V3,
        digest_algorithms: SetOfVec::try_from(vec![sha256_algorithm()]).unwrap(),
        encap_content_info: EncapsulatedContentInfo {
            econtent_type,
            econtent: Some(
                Any::encode_from(&OctetString::new(content.to_vec()).unwrap()).unwrap(),
            ),
        },
        certificates: Some(CertificateSet(SetOfVec::try_from(choices).unwrap())),
        crls: None,
        signer_infos: SignerInfos(SetOfVec::try_from(vec![signer_info]).unwrap()),
    };

    let content_info = ContentInfo {
        content_type: OID_SIGNED_DATA,
        content: Any::encode_from(&signed_data).unwrap(),
    };
    content_info.to_der().unwrap()
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct CscaMasterListContent {
    version: u8,
    cert_list: SetOfVec<x509_cert::Certificate>,
}

/// CMS Master List wrapping `cscas`, signed by `mlsc`.
pub fn build_master_list(cscas: &[Vec<u8>], mlsc: &TestCert, tamper_signature: bool) -> Vec<u8> {
    let certs: Vec<x509_cert::Certificate> = cscas
        .iter()
        .map(|der| x509_cert::Certificate::from_der(der).expect("CSCA reparses"))
        .collect();
    let content = CscaMasterListContent {
        version: 0,
        cert_list: SetOfVec::try_from(certs).unwrap(),
    };
    build_signed_data(
        OID_ICAO_ML,
        &content.to_der().unwrap(),
        mlsc,
        &[],
        tamper_signature,
    )
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct DataGroupHashContent {
    data_group_number: u8,
    data_group_hash_value: OctetString,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct LdsSecurityObjectContent {
    version: u8,
    hash_algorithm: AlgorithmIdentifierOwned,
    data_group_hash_values: Vec<DataGroupHashContent>,
}

/// EF.SOD signed by `dsc`, binding each data group to its SHA-256 hash.
pub fn build_sod(data_groups: &[(u8, Vec<u8>)], dsc: &TestCert, tamper_signature: bool) -> Vec<u8> {
    let hashes = data_groups
        .iter()
        .map(|(number, bytes)| DataGroupHashContent {
            data_group_number: *number,
            data_group_hash_value: OctetString::new(Sha256::digest(bytes).to_vec()).unwrap(),
        })
        .collect();
    let lds = LdsSecurityObjectContent {
        version: 0,
        hash_algorithm: sha256_algorithm(),
        data_group_hash_values: hashes,
    };
    build_signed_data(
        OID_LDS_SO,
        &lds.to_der().unwrap(),
        dsc,
        &[],
        tamper_signature,
    )
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct DefectContent {
    defect_type: ObjectIdentifier,
    description: Option<String>,
    parameters: Option<Any>,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct SignerDeviationContent {
    signer_identifier: IssuerAndSerialNumber,
    defects: SetOfVec<Any>,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct DeviationListContent {
    version: u8,
    deviations: SetOfVec<Any>,
}

/// Deviation List flagging `target` with one defect, signed by `signer`.
pub fn build_deviation_list(
    target: &TestCert,
    defect_oid: &str,
    description: Option<&str>,
    signer: &TestCert,
) -> Vec<u8> {
    let target_x509 =
        x509_cert::Certificate::from_der(&target.der()).expect("target reparses");
    let defect = DefectContent {
        defect_type: ObjectIdentifier::new_unwrap(defect_oid),
        description: description.map(str::to_string),
        parameters: None,
    };
    let deviation = SignerDeviationContent {
        signer_identifier: IssuerAndSerialNumber {
            issuer: target_x509.tbs_certificate.issuer.clone(),
            serial_number: target_x509.tbs_certificate.serial_number.clone(),
        },
        defects: SetOfVec::try_from(vec![any_of(&defect)]).unwrap(),
    };
    let list = DeviationListContent {
        version: 0,
        deviations: SetOfVec::try_from(vec![any_of(&deviation)]).unwrap(),
    };
    build_signed_data(OID_ICAO_DL, &list.to_der().unwrap(), signer, &[], false)
}

fn any_of<T: Encode>(value: &T) -> Any {
    Any::from_der(&value.to_der().unwrap()).unwrap()
}
