// Copyright (c) 2025 - Cowboy AI, LLC.

//! Distinguished-name parsing and normalisation
//!
//! Components are extracted from the X.501 Name structure by attribute OID,
//! never by pattern-matching on rendered strings. The rendered-string helpers
//! (`normalize_dn`, `extract_dn_attribute`) exist because national issuers
//! emit both OpenSSL oneline form (`/C=KR/O=Gov/CN=X`) and RFC 2253 comma
//! form (`CN=X,O=Gov,C=KR`), and DN-keyed lookups must treat them as equal.

use serde::{Deserialize, Serialize};
use x509_parser::x509::X509Name;

use crate::oid;

/// Structured DN attributes, one field per RFC 4519 attribute type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnComponents {
    /// CN
    pub common_name: Option<String>,
    /// O
    pub organization: Option<String>,
    /// OU (may repeat)
    pub organizational_unit: Vec<String>,
    /// L
    pub locality: Option<String>,
    /// ST
    pub state_or_province: Option<String>,
    /// C
    pub country: Option<String>,
    /// emailAddress
    pub email: Option<String>,
    /// serialNumber
    pub serial_number: Option<String>,
    /// title
    pub title: Option<String>,
    /// givenName
    pub given_name: Option<String>,
    /// surname
    pub surname: Option<String>,
    /// pseudonym
    pub pseudonym: Option<String>,
}

/// Extract structured components from a parsed X.501 Name.
pub fn components_from_name(name: &X509Name<'_>) -> DnComponents {
    let mut out = DnComponents::default();
    for rdn in name.iter() {
        for atv in rdn.iter() {
            let value = match atv.as_str() {
                Ok(v) => v.to_string(),
                Err(_) => continue,
            };
            match atv.attr_type().to_id_string().as_str() {
                oid::AT_COMMON_NAME => out.common_name = Some(value),
                oid::AT_ORGANIZATION => out.organization = Some(value),
                oid::AT_ORGANIZATIONAL_UNIT => out.organizational_unit.push(value),
                oid::AT_LOCALITY => out.locality = Some(value),
                oid::AT_STATE_OR_PROVINCE => out.state_or_province = Some(value),
                oid::AT_COUNTRY => out.country = Some(value),
                oid::AT_EMAIL => out.email = Some(value),
                oid::AT_SERIAL_NUMBER => out.serial_number = Some(value),
                oid::AT_TITLE => out.title = Some(value),
                oid::AT_GIVEN_NAME => out.given_name = Some(value),
                oid::AT_SURNAME => out.surname = Some(value),
                oid::AT_PSEUDONYM => out.pseudonym = Some(value),
                _ => {}
            }
        }
    }
    out
}

/// Render a parsed Name as a comma-separated string in stored order,
/// e.g. `C=KR, O=Gov, CN=Root`. Unknown attribute types render as their
/// dotted OID.
pub fn dn_string(name: &X509Name<'_>) -> String {
    let mut parts = Vec::new();
    for rdn in name.iter() {
        for atv in rdn.iter() {
            let key = short_attribute_name(&atv.attr_type().to_id_string());
            let value = atv.as_str().unwrap_or("");
            parts.push(format!("{}={}", key, value));
        }
    }
    parts.join(", ")
}

fn short_attribute_name(oid_str: &str) -> String {
    match oid_str {
        oid::AT_COMMON_NAME => "CN".to_string(),
        oid::AT_ORGANIZATION => "O".to_string(),
        oid::AT_ORGANIZATIONAL_UNIT => "OU".to_string(),
        oid::AT_LOCALITY => "L".to_string(),
        oid::AT_STATE_OR_PROVINCE => "ST".to_string(),
        oid::AT_COUNTRY => "C".to_string(),
        oid::AT_EMAIL => "emailAddress".to_string(),
        oid::AT_SERIAL_NUMBER => "serialNumber".to_string(),
        oid::AT_TITLE => "title".to_string(),
        oid::AT_GIVEN_NAME => "GN".to_string(),
        oid::AT_SURNAME => "SN".to_string(),
        oid::AT_PSEUDONYM => "pseudonym".to_string(),
        other => other.to_string(),
    }
}

/// Split a rendered DN into `key=value` fragments.
///
/// Accepts both slash form and comma form. Quoting and backslash escapes are
/// respected: a separator inside double quotes or preceded by `\` does not
/// split.
fn split_rdns(dn: &str) -> Vec<String> {
    let trimmed = dn.trim();
    let separator = if trimmed.starts_with('/') { '/' } else { ',' };
    let body = trimmed.strip_prefix('/').unwrap_or(trimmed);

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for ch in body.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == separator && !in_quotes => {
                parts.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    parts.push(current);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Canonicalise a rendered DN for comparison.
///
/// Splits into RDNs, strips whitespace around `=` and separators, lowercases
/// per RFC 4517 caseIgnoreMatch, sorts the RDN set and joins with `|`. The
/// oneline and RFC 2253 renderings of the same Name normalise identically.
pub fn normalize_dn(dn: &str) -> String {
    let mut rdns: Vec<String> = split_rdns(dn)
        .iter()
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            let key = key.trim().to_lowercase();
            let value = value.trim().to_lowercase();
            if key.is_empty() {
                return None;
            }
            Some(format!("{}={}", key, value))
        })
        .collect();
    rdns.sort();
    rdns.join("|")
}

/// Find the value of one RDN (`C`, `CN`, `O`, ...) in a rendered DN of either
/// form. Returns the lowercased value, or an empty string when absent.
pub fn extract_dn_attribute(dn: &str, key: &str) -> String {
    let wanted = key.trim().to_lowercase();
    for part in split_rdns(dn) {
        if let Some((k, v)) = part.split_once('=') {
            if k.trim().to_lowercase() == wanted {
                return v.trim().to_lowercase();
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_equivalence_across_forms() {
        let slash = normalize_dn("/C=KR/O=Gov/CN=Test");
        let comma = normalize_dn("CN=Test,O=Gov,C=KR");
        let mixed_case = normalize_dn("/C=kr/o=gov/cn=test");
        assert_eq!(slash, comma);
        assert_eq!(slash, mixed_case);
        assert_eq!(slash, "c=kr|cn=test|o=gov");
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(
            normalize_dn("CN = Test , O = Gov , C = KR"),
            normalize_dn("CN=Test,O=Gov,C=KR")
        );
    }

    #[test]
    fn test_normalize_respects_escaped_comma() {
        let n = normalize_dn("CN=Doe\\, John,O=Gov,C=KR");
        assert!(n.contains("cn=doe, john"));
        assert_eq!(n.split('|').count(), 3);
    }

    #[test]
    fn test_normalize_respects_quotes() {
        let n = normalize_dn("CN=\"Doe, John\",O=Gov,C=KR");
        assert_eq!(n.split('|').count(), 3);
    }

    #[test]
    fn test_extract_attribute_both_forms() {
        assert_eq!(extract_dn_attribute("/C=KR/O=Gov/CN=Test", "C"), "kr");
        assert_eq!(extract_dn_attribute("CN=Test,O=Gov,C=KR", "c"), "kr");
        assert_eq!(extract_dn_attribute("CN=Test,O=Gov,C=KR", "CN"), "test");
        assert_eq!(extract_dn_attribute("CN=Test,O=Gov", "C"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize_dn("/C=KR/O=Gov/CN=Test");
        for _ in 0..100 {
            assert_eq!(normalize_dn("/C=KR/O=Gov/CN=Test"), once);
        }
    }
}
