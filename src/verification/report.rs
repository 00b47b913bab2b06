// Copyright (c) 2025 - Cowboy AI, LLC.

//! Serialisable passive-authentication report
//!
//! The wire shape consumed by the REST gateway and the audit trail. Field
//! names serialise in camelCase to match the public API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::chain::ChainErrorCode;
use crate::crl::CrlCheckResult;

/// Overall verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Every hard step passed
    Valid,
    /// A hard step failed
    Invalid,
    /// Signatures verify but something informational is off
    Warning,
    /// An unexpected internal failure
    Error,
}

/// Status of one verification step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    /// The step succeeded
    Passed,
    /// The step failed
    Failed,
    /// The step produced a non-fatal finding
    Warning,
    /// The step could not run because a prerequisite failed
    Skipped,
}

/// One entry in the ordered step sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStep {
    /// 1-based step number
    pub step: u8,
    /// Step name, stable across releases
    pub name: String,
    /// Outcome
    pub status: StepStatus,
    /// Human-readable outcome message
    pub message: String,
    /// Step-specific detail object
    pub detail: serde_json::Value,
}

/// Certificate-chain section of the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainValidationReport {
    /// Whether the chain verified
    pub valid: bool,
    /// Whether the DSC is revoked
    pub revoked: bool,
    /// Whether a deviation list marks the DSC non-conformant
    pub dsc_non_conformant: bool,
    /// DSC subject DN
    pub dsc_subject: Option<String>,
    /// DSC issuer DN
    pub dsc_issuer: Option<String>,
    /// Selected CSCA subject DN
    pub csca_subject: Option<String>,
    /// Selected CSCA fingerprint
    pub csca_fingerprint: Option<String>,
    /// Stable error code on failure or informational finding
    pub error_code: Option<ChainErrorCode>,
    /// Accumulated chain errors
    pub validation_errors: Vec<String>,
    /// PKD conformance code (chain path + compliance summary)
    pub pkd_conformance_code: Option<String>,
    /// Human text for the conformance code
    pub pkd_conformance_text: Option<String>,
}

/// SOD-signature section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SodSignatureReport {
    /// Whether the CMS signature verified under the DSC
    pub valid: bool,
    /// Failure descriptions
    pub validation_errors: Vec<String>,
    /// Signature algorithm OID
    pub signature_algorithm: Option<String>,
    /// Data-group hash algorithm name
    pub hash_algorithm: Option<String>,
}

/// Comparison outcome for one data group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGroupDetail {
    /// Hash recorded in the SOD, lowercase hex
    pub expected_hash: String,
    /// Hash computed over the presented bytes, lowercase hex
    pub actual_hash: String,
    /// Whether the hashes match
    pub valid: bool,
}

/// Data-group section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGroupReport {
    /// Data groups presented by the inspection system
    pub total_groups: usize,
    /// Presented groups whose hash matched
    pub valid_groups: usize,
    /// Presented groups whose hash mismatched or was unsigned
    pub invalid_groups: usize,
    /// Per-group comparison, keyed `DG<n>`
    pub details: BTreeMap<String, DataGroupDetail>,
}

/// Complete passive-authentication report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Unique id of this verification run
    pub verification_id: String,
    /// When the verification started (UTC)
    pub verification_timestamp: DateTime<Utc>,
    /// Overall status
    pub status: VerificationStatus,
    /// ISO 3166 code of the issuing state, when determined
    pub issuing_country: Option<String>,
    /// Document number supplied by the caller, echoed back
    pub document_number: Option<String>,
    /// Wall-clock duration of the verification
    pub processing_duration_ms: u64,
    /// Chain section
    pub certificate_chain_validation: ChainValidationReport,
    /// SOD-signature section
    pub sod_signature_validation: SodSignatureReport,
    /// Data-group section
    pub data_group_validation: DataGroupReport,
    /// Revocation section
    pub crl_check: Option<CrlCheckResult>,
    /// Ordered step outcomes
    pub steps: Vec<VerificationStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&VerificationStatus::Valid).unwrap(),
            "\"VALID\""
        );
        assert_eq!(
            serde_json::to_string(&StepStatus::Skipped).unwrap(),
            "\"SKIPPED\""
        );
    }

    #[test]
    fn test_report_field_names_are_camel_case() {
        let report = ChainValidationReport::default();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("dscNonConformant").is_some());
        assert!(json.get("pkdConformanceCode").is_some());
    }
}
