// Copyright (c) 2025 - Cowboy AI, LLC.

//! Format detection for PKD artifacts
//!
//! Classifies a byte blob as PEM, DER, CMS (Master List / Deviation List /
//! generic bundle), CRL or LDIF using the filename extension first and
//! content sniffing second. Detection never fails; `Format::Unknown` is the
//! failure mode.

use crate::types::Format;

/// DER encoding of OBJECT IDENTIFIER 2.23.136.1.1.2 (CSCA Master List)
const ML_OID_DER: &[u8] = &[0x06, 0x06, 0x67, 0x81, 0x08, 0x01, 0x01, 0x02];
/// DER encoding of OBJECT IDENTIFIER 2.23.136.1.1.7 (Deviation List)
const DL_OID_DER: &[u8] = &[0x06, 0x06, 0x67, 0x81, 0x08, 0x01, 0x01, 0x07];
/// DER encoding of OBJECT IDENTIFIER 1.2.840.113549.1.7.2 (signedData)
const SIGNED_DATA_OID_DER: &[u8] = &[
    0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x02,
];

/// How many leading bytes the OID probe inspects.
const SNIFF_WINDOW: usize = 1024;

/// Classify a blob by extension hint, then by content.
///
/// `filename_hint` may be a full filename or just an extension; pass `None`
/// when nothing is known. Idempotent, performs no I/O.
pub fn detect_format(filename_hint: Option<&str>, bytes: &[u8]) -> Format {
    if let Some(hint) = filename_hint {
        let by_ext = detect_by_extension(hint);
        if by_ext != Format::Unknown {
            return by_ext;
        }
    }
    detect_by_content(bytes)
}

fn detect_by_extension(hint: &str) -> Format {
    let lower = hint.to_ascii_lowercase();
    let ext = lower.rsplit('.').next().unwrap_or("");
    match ext {
        "pem" | "crt" => Format::Pem,
        "der" => Format::Der,
        "cer" => Format::Cer,
        "bin" => Format::Bin,
        "ml" => Format::CmsMasterList,
        "dvl" | "dl" => Format::CmsDeviationList,
        "p7b" | "p7c" => Format::CmsP7b,
        "crl" => Format::Crl,
        "ldif" => Format::Ldif,
        _ => Format::Unknown,
    }
}

fn detect_by_content(bytes: &[u8]) -> Format {
    if bytes.is_empty() {
        return Format::Unknown;
    }

    if bytes.starts_with(b"-----BEGIN ") {
        // Sub-type armored CRLs so they route to the CRL parser.
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(64)]);
        if head.contains("X509 CRL") {
            return Format::Crl;
        }
        return Format::Pem;
    }

    if bytes[0] == 0x30 && bytes.len() > 1 {
        let len_byte = bytes[1];
        // Long-form lengths (0x81..=0x84) cover every real-world artifact;
        // short-form still denotes a SEQUENCE from legacy encoders.
        if (0x81..=0x84).contains(&len_byte) || len_byte < 0x80 {
            let window = &bytes[..bytes.len().min(SNIFF_WINDOW)];
            if contains(window, ML_OID_DER) {
                return Format::CmsMasterList;
            }
            if contains(window, DL_OID_DER) {
                return Format::CmsDeviationList;
            }
            if contains(window, SIGNED_DATA_OID_DER) {
                return Format::CmsP7b;
            }
            return Format::Der;
        }
    }

    if bytes.starts_with(b"dn:") || bytes.starts_with(b"version:") {
        return Format::Ldif;
    }

    Format::Unknown
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
