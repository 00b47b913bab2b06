// Copyright (c) 2025 - Cowboy AI, LLC.

//! Passive-authentication orchestration
//!
//! Composes the SOD parser, trust-chain builder, CRL checker and compliance
//! checks into the canonical 8-step verification sequence an inspection
//! system runs against a presented passport. Chain-dependent steps are
//! skipped once their prerequisites fail; hash and revocation steps still
//! run whenever their own inputs exist.

pub mod report;

pub use report::{
    ChainValidationReport, DataGroupDetail, DataGroupReport, SodSignatureReport, StepStatus,
    VerificationReport, VerificationStatus, VerificationStep,
};

use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::chain::{ChainErrorCode, TrustChainBuilder, TrustChainResult};
use crate::cms::{parse_sod, Sod};
use crate::compliance;
use crate::crl::{CrlChecker, CrlStatus};
use crate::traits::{CertificateStore, CrlProvider, CscaProvider};
use crate::types::{CertificateRole, CertificateTag, RegisterOutcome};
use crate::x509::{ops, Certificate};

/// Passive-authentication verifier over injected providers
pub struct Verifier<'a> {
    cscas: &'a dyn CscaProvider,
    crls: &'a dyn CrlProvider,
    store: &'a dyn CertificateStore,
}

struct StepRecorder {
    steps: Vec<VerificationStep>,
}

impl StepRecorder {
    fn new() -> Self {
        Self { steps: Vec::with_capacity(8) }
    }

    fn record(
        &mut self,
        step: u8,
        name: &str,
        status: StepStatus,
        message: impl Into<String>,
        detail: serde_json::Value,
    ) {
        self.steps.push(VerificationStep {
            step,
            name: name.to_string(),
            status,
            message: message.into(),
            detail,
        });
    }

    fn skip(&mut self, step: u8, name: &str, reason: &str) {
        self.record(step, name, StepStatus::Skipped, reason, json!({}));
    }
}

impl<'a> Verifier<'a> {
    /// Build a verifier over the three capabilities.
    pub fn new(
        cscas: &'a dyn CscaProvider,
        crls: &'a dyn CrlProvider,
        store: &'a dyn CertificateStore,
    ) -> Self {
        Self { cscas, crls, store }
    }

    /// Run the full passive-authentication sequence.
    ///
    /// `data_groups` maps data-group numbers to the bytes the passport
    /// presented; `document_number` is echoed into the report.
    pub fn verify(
        &self,
        sod_bytes: &[u8],
        data_groups: &BTreeMap<u8, Vec<u8>>,
        document_number: Option<&str>,
    ) -> VerificationReport {
        let started = Instant::now();
        let timestamp = Utc::now();
        let verification_id = Uuid::new_v4().to_string();
        let mut rec = StepRecorder::new();

        let mut chain_report = ChainValidationReport::default();
        let mut sod_report = SodSignatureReport::default();
        let mut dg_report = DataGroupReport::default();
        let mut crl_result = None;
        let mut hard_failure = false;
        let mut warning = false;

        // Step 1: Parse SOD
        let sod = match parse_sod(sod_bytes) {
            Ok(sod) => {
                sod_report.signature_algorithm = sod.signature_algorithm_oid.clone();
                sod_report.hash_algorithm = Some(sod.hash_algorithm.clone());
                rec.record(
                    1,
                    "Parse SOD",
                    StepStatus::Passed,
                    "SOD decoded",
                    json!({
                        "hashAlgorithm": sod.hash_algorithm,
                        "signatureAlgorithm": sod.signature_algorithm_oid,
                        "signedDataGroups": sod.dg_hashes.keys().copied().collect::<Vec<u8>>(),
                    }),
                );
                Some(sod)
            }
            Err(e) => {
                hard_failure = true;
                rec.record(
                    1,
                    "Parse SOD",
                    StepStatus::Failed,
                    format!("SOD parse failed: {}", e),
                    json!({}),
                );
                None
            }
        };

        // Step 2: Extract DSC
        let dsc = match &sod {
            Some(sod) => match sod.dsc() {
                Some(dsc) => {
                    rec.record(
                        2,
                        "Extract DSC",
                        StepStatus::Passed,
                        "DSC extracted from SOD envelope",
                        json!({
                            "subject": dsc.subject_dn(),
                            "issuer": dsc.issuer_dn(),
                            "fingerprint": dsc.fingerprint(),
                            "serialNumber": dsc.serial_hex(),
                        }),
                    );
                    Some(dsc.clone())
                }
                None => {
                    hard_failure = true;
                    rec.record(
                        2,
                        "Extract DSC",
                        StepStatus::Failed,
                        "SOD carries no certificate",
                        json!({}),
                    );
                    None
                }
            },
            None => {
                rec.skip(2, "Extract DSC", "SOD unavailable");
                None
            }
        };

        if let Some(dsc) = &dsc {
            chain_report.dsc_subject = Some(dsc.subject_dn().to_string());
            chain_report.dsc_issuer = Some(dsc.issuer_dn().to_string());
            chain_report.dsc_non_conformant = dsc.tag() == CertificateTag::DscNc;
        }

        // Step 3: Build trust chain
        let chain = match &dsc {
            Some(dsc) => {
                let result = TrustChainBuilder::new(self.cscas).build(dsc);
                let status = if result.valid {
                    if result.dsc_expired || result.csca_expired {
                        warning = true;
                        StepStatus::Warning
                    } else {
                        StepStatus::Passed
                    }
                } else {
                    hard_failure = true;
                    StepStatus::Failed
                };
                let message = if result.valid {
                    format!("Chain valid: {}", result.path)
                } else {
                    result.message.clone()
                };
                rec.record(
                    3,
                    "Build trust chain",
                    status,
                    message,
                    serde_json::to_value(&result).unwrap_or_else(|_| json!({})),
                );
                self.fill_chain_report(&mut chain_report, dsc, &result);
                Some(result)
            }
            None => {
                rec.skip(3, "Build trust chain", "DSC unavailable");
                None
            }
        };

        // Step 4: Locate CSCA
        match &chain {
            Some(result) if result.root_subject.is_some() => {
                let subject = result.root_subject.clone().unwrap_or_default();
                rec.record(
                    4,
                    "Locate CSCA",
                    StepStatus::Passed,
                    format!("CSCA selected: {}", subject),
                    json!({
                        "subject": subject,
                        "fingerprint": result.root_fingerprint,
                    }),
                );
            }
            Some(result) => {
                rec.record(
                    4,
                    "Locate CSCA",
                    StepStatus::Failed,
                    result.message.clone(),
                    json!({}),
                );
            }
            None => rec.skip(4, "Locate CSCA", "trust chain unavailable"),
        }

        // Step 5: Verify SOD signature
        match (&sod, &dsc) {
            (Some(sod), Some(_)) => {
                if sod.signature_verified {
                    sod_report.valid = true;
                    rec.record(
                        5,
                        "Verify SOD signature",
                        StepStatus::Passed,
                        "CMS signed-attributes signature verified against DSC",
                        json!({ "signatureAlgorithm": sod.signature_algorithm_oid }),
                    );
                } else {
                    hard_failure = true;
                    sod_report
                        .validation_errors
                        .push("SOD signature verification failed".to_string());
                    rec.record(
                        5,
                        "Verify SOD signature",
                        StepStatus::Failed,
                        "SOD signature verification failed",
                        json!({}),
                    );
                }
            }
            _ => rec.skip(5, "Verify SOD signature", "SOD or DSC unavailable"),
        }

        // Step 6: Verify DG hashes
        match &sod {
            Some(sod) => {
                let (status, message) =
                    verify_data_groups(sod, data_groups, &mut dg_report);
                if status == StepStatus::Failed {
                    hard_failure = true;
                }
                rec.record(
                    6,
                    "Verify DG hashes",
                    status,
                    message,
                    serde_json::to_value(&dg_report).unwrap_or_else(|_| json!({})),
                );
            }
            None => rec.skip(6, "Verify DG hashes", "SOD unavailable"),
        }

        // Step 7: Check revocation
        match &dsc {
            Some(dsc) => {
                let country = issuing_country(dsc, chain.as_ref());
                let result = CrlChecker::new(self.crls).check(dsc, &country);
                let (status, message) = match result.status {
                    CrlStatus::Valid => {
                        (StepStatus::Passed, "DSC serial not present in CRL".to_string())
                    }
                    CrlStatus::Revoked => {
                        hard_failure = true;
                        chain_report.revoked = true;
                        (
                            StepStatus::Failed,
                            format!(
                                "DSC revoked: {}",
                                result.revocation_reason.as_deref().unwrap_or("unspecified")
                            ),
                        )
                    }
                    CrlStatus::CrlUnavailable => {
                        warning = true;
                        (
                            StepStatus::Warning,
                            format!("No CRL available for {}", country),
                        )
                    }
                    CrlStatus::CrlExpired => {
                        warning = true;
                        (StepStatus::Warning, "CRL is expired".to_string())
                    }
                    CrlStatus::CrlInvalid => {
                        warning = true;
                        (StepStatus::Warning, "CRL could not be used".to_string())
                    }
                    CrlStatus::NotChecked => {
                        warning = true;
                        (StepStatus::Warning, "revocation not checked".to_string())
                    }
                };
                rec.record(
                    7,
                    "Check revocation",
                    status,
                    message,
                    serde_json::to_value(&result).unwrap_or_else(|_| json!({})),
                );
                crl_result = Some(result);
            }
            None => rec.skip(7, "Check revocation", "DSC unavailable"),
        }

        // Step 8: Register DSC
        match &dsc {
            Some(dsc) => {
                let outcome = self.store.register_dsc(dsc);
                let message = match outcome {
                    RegisterOutcome::Added => "DSC registered",
                    RegisterOutcome::AlreadyPresent => "DSC already registered",
                };
                rec.record(
                    8,
                    "Register DSC",
                    StepStatus::Passed,
                    message,
                    json!({ "fingerprint": dsc.fingerprint(), "outcome": outcome }),
                );
            }
            None => rec.skip(8, "Register DSC", "DSC unavailable"),
        }

        let status = if hard_failure {
            VerificationStatus::Invalid
        } else if warning {
            VerificationStatus::Warning
        } else {
            VerificationStatus::Valid
        };

        let issuing_country = dsc
            .as_ref()
            .map(|d| issuing_country(d, chain.as_ref()))
            .filter(|c| !c.is_empty());

        let report = VerificationReport {
            verification_id,
            verification_timestamp: timestamp,
            status,
            issuing_country,
            document_number: document_number.map(str::to_string),
            processing_duration_ms: started.elapsed().as_millis() as u64,
            certificate_chain_validation: chain_report,
            sod_signature_validation: sod_report,
            data_group_validation: dg_report,
            crl_check: crl_result,
            steps: rec.steps,
        };

        info!(
            id = %report.verification_id,
            status = ?report.status,
            duration_ms = report.processing_duration_ms,
            "passive authentication finished"
        );
        report
    }

    fn fill_chain_report(
        &self,
        chain_report: &mut ChainValidationReport,
        dsc: &Certificate,
        result: &TrustChainResult,
    ) {
        chain_report.valid = result.valid;
        chain_report.csca_subject = result.root_subject.clone();
        chain_report.csca_fingerprint = result.root_fingerprint.clone();
        chain_report.error_code = result.error_code;
        if !result.message.is_empty() {
            chain_report.validation_errors.push(result.message.clone());
        }

        if result.valid {
            if ops::is_not_yet_valid(dsc) {
                chain_report.error_code = Some(ChainErrorCode::NotYetValid);
                chain_report
                    .validation_errors
                    .push("DSC validity period has not started".to_string());
            } else if result.dsc_expired || result.csca_expired {
                chain_report.error_code = Some(ChainErrorCode::CertificatesExpired);
                chain_report
                    .validation_errors
                    .push("chain contains expired certificates".to_string());
            }
        }

        let algorithm = compliance::validate_algorithm_compliance(dsc);
        let extensions = compliance::validate_extensions(dsc, CertificateRole::Dsc);
        let mut findings: Vec<String> = algorithm.warnings;
        findings.extend(extensions.warnings);

        let (code, text) = if !result.valid {
            (
                "ICAO_NON_CONFORMANT",
                if result.message.is_empty() {
                    "certificate chain did not validate".to_string()
                } else {
                    result.message.clone()
                },
            )
        } else if !algorithm.compliant || !findings.is_empty() {
            ("ICAO_CONFORMANT_WITH_FINDINGS", findings.join("; "))
        } else {
            (
                "ICAO_CONFORMANT",
                "certificate chain conforms to Doc 9303 Part 12".to_string(),
            )
        };
        chain_report.pkd_conformance_code = Some(code.to_string());
        chain_report.pkd_conformance_text = Some(text);
    }
}

fn issuing_country(dsc: &Certificate, chain: Option<&TrustChainResult>) -> String {
    if !dsc.country().is_empty() {
        return dsc.country().to_string();
    }
    chain
        .and_then(|c| c.root_subject.as_deref())
        .map(|s| crate::x509::dn::extract_dn_attribute(s, "C").to_uppercase())
        .unwrap_or_default()
}

fn verify_data_groups(
    sod: &Sod,
    data_groups: &BTreeMap<u8, Vec<u8>>,
    dg_report: &mut DataGroupReport,
) -> (StepStatus, String) {
    if data_groups.is_empty() {
        return (StepStatus::Passed, "no data groups presented".to_string());
    }
    let Some(hash) = sod.hash_algorithm() else {
        dg_report.total_groups = data_groups.len();
        dg_report.invalid_groups = data_groups.len();
        return (
            StepStatus::Failed,
            format!("unsupported SOD hash algorithm {}", sod.hash_algorithm_oid),
        );
    };

    dg_report.total_groups = data_groups.len();
    for (dg, bytes) in data_groups {
        let actual = hash.digest(bytes);
        let (expected_hex, valid) = match sod.dg_hashes.get(dg) {
            Some(expected) => (hex::encode(expected), *expected == actual),
            // A presented group the SOD never signed cannot be trusted.
            None => (String::new(), false),
        };
        if valid {
            dg_report.valid_groups += 1;
        } else {
            dg_report.invalid_groups += 1;
        }
        dg_report.details.insert(
            format!("DG{}", dg),
            DataGroupDetail {
                expected_hash: expected_hex,
                actual_hash: hex::encode(actual),
                valid,
            },
        );
    }

    if dg_report.invalid_groups == 0 {
        (
            StepStatus::Passed,
            format!("{} data group(s) verified", dg_report.valid_groups),
        )
    } else {
        (
            StepStatus::Failed,
            format!(
                "{} of {} data group(s) failed hash comparison",
                dg_report.invalid_groups, dg_report.total_groups
            ),
        )
    }
}
