// Copyright (c) 2025 - Cowboy AI, LLC.

//! Per-country revocation checking
//!
//! The checker owns nothing but a provider reference; a CRL is fetched per
//! call, the serial looked up, and the outcome reported as a value. Identical
//! inputs produce identical outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crl::reason_name;
use crate::traits::CrlProvider;
use crate::x509::Certificate;

/// Outcome classes of a revocation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrlStatus {
    /// Serial not present in the country's CRL
    Valid,
    /// Serial present; the certificate is revoked
    Revoked,
    /// No CRL published for the country
    CrlUnavailable,
    /// The CRL's nextUpdate has passed
    CrlExpired,
    /// The CRL could not be used
    CrlInvalid,
    /// Inputs were insufficient to perform the check
    NotChecked,
}

/// Result of one revocation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrlCheckResult {
    /// Outcome class
    pub status: CrlStatus,
    /// CRL thisUpdate (ISO 8601 UTC), when a CRL was found
    pub this_update: Option<DateTime<Utc>>,
    /// CRL nextUpdate, when present
    pub next_update: Option<DateTime<Utc>>,
    /// RFC 5280 reason name, when status is `Revoked`
    pub revocation_reason: Option<String>,
}

impl CrlCheckResult {
    fn bare(status: CrlStatus) -> Self {
        Self {
            status,
            this_update: None,
            next_update: None,
            revocation_reason: None,
        }
    }
}

/// Revocation checker over an injected CRL provider
pub struct CrlChecker<'a> {
    provider: &'a dyn CrlProvider,
}

impl<'a> CrlChecker<'a> {
    /// Build a checker over a provider.
    pub fn new(provider: &'a dyn CrlProvider) -> Self {
        Self { provider }
    }

    /// Check `cert` against the CRL of `country_code` at the current time.
    pub fn check(&self, cert: &Certificate, country_code: &str) -> CrlCheckResult {
        self.check_at(cert, country_code, Utc::now())
    }

    /// Check against a caller-supplied clock.
    pub fn check_at(
        &self,
        cert: &Certificate,
        country_code: &str,
        now: DateTime<Utc>,
    ) -> CrlCheckResult {
        if country_code.trim().is_empty() || cert.serial_hex().is_empty() {
            return CrlCheckResult::bare(CrlStatus::NotChecked);
        }

        let Some(crl) = self.provider.find_crl_by_country(country_code) else {
            return CrlCheckResult::bare(CrlStatus::CrlUnavailable);
        };

        let this_update = Some(crl.this_update());
        let next_update = crl.next_update();

        if crl.is_expired_at(now) {
            return CrlCheckResult {
                status: CrlStatus::CrlExpired,
                this_update,
                next_update,
                revocation_reason: None,
            };
        }

        match crl.find_entry(cert.serial_hex()) {
            None => CrlCheckResult {
                status: CrlStatus::Valid,
                this_update,
                next_update,
                revocation_reason: None,
            },
            Some(entry) => CrlCheckResult {
                status: CrlStatus::Revoked,
                this_update,
                next_update,
                revocation_reason: Some(
                    entry
                        .reason_code
                        .map(reason_name)
                        .unwrap_or_else(|| "unspecified".to_string()),
                ),
            },
        }
    }
}
