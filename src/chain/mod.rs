// Copyright (c) 2025 - Cowboy AI, LLC.

//! Trust-chain construction and validation
//!
//! Builds the chain from a leaf DSC up to a self-signed root CSCA against an
//! injected [`CscaProvider`], following the Doc 9303 Part 12 hybrid model:
//! signature validity is the hard criterion, certificate expiration is
//! carried as information only. Key rollover is handled by discriminating
//! same-DN candidates on signature verification, and multi-hop link
//! certificates by requerying the provider as the chain climbs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::traits::CscaProvider;
use crate::types::truncate_dn;
use crate::x509::{ops, Certificate};

/// Default maximum chain length, leaf included.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Stable error codes for chain-validation outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainErrorCode {
    /// Provider returned no candidate for the leaf's issuer DN
    CscaNotFound,
    /// Candidates exist but none matches the issuer DN by subject
    CscaDnMismatch,
    /// The terminating root failed its own signature check
    CscaSelfSignatureFailed,
    /// No issuer could be located above some link in the chain
    ChainBroken,
    /// A located issuer's key does not verify the chain link
    TrustChainSignatureFailed,
    /// The leaf's validity period has not started (informational code)
    NotYetValid,
    /// One or more chain certificates are expired (informational code)
    CertificatesExpired,
    /// Issuer DNs repeat; the chain loops
    CircularReference,
    /// The chain exceeded the depth bound
    MaxDepthExceeded,
}

/// Role a certificate plays at its position in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainRole {
    /// The leaf document signer
    Dsc,
    /// A link certificate bridging a key rollover
    Link,
    /// A CA certificate that is not the self-signed terminus
    Csca,
    /// The self-signed trust anchor
    Root,
}

impl ChainRole {
    fn label(&self) -> &'static str {
        match self {
            ChainRole::Dsc => "DSC",
            ChainRole::Link => "Link",
            ChainRole::Csca => "CSCA",
            ChainRole::Root => "Root",
        }
    }
}

/// Descriptor of one chain position; identifiers only, no certificate data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    /// SHA-256 fingerprint of the certificate at this position
    pub fingerprint: String,
    /// Subject DN, rendered form
    pub subject: String,
    /// Issuer DN, rendered form
    pub issuer: String,
    /// Role label used in the path string
    pub role: ChainRole,
    /// Whether the signature toward the next link (or the self-signature,
    /// for the root) verified
    pub signature_valid: bool,
    /// Whether the certificate was expired at build time (informational)
    pub expired: bool,
}

/// Outcome of a trust-chain build
///
/// Carries identifiers and fingerprints only, so its lifetime is independent
/// of any certificate storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustChainResult {
    /// True iff every link signature (root self-signature included) verified
    pub valid: bool,
    /// Chain positions, leaf first
    pub links: Vec<ChainLink>,
    /// Human-readable path, e.g. `DSC → Link → Root`
    pub path: String,
    /// Chain length, leaf included
    pub depth: usize,
    /// The leaf was expired at build time (informational)
    pub dsc_expired: bool,
    /// Some non-leaf certificate was expired at build time (informational)
    pub csca_expired: bool,
    /// Subject DN of the selected root, when one was reached
    pub root_subject: Option<String>,
    /// Fingerprint of the selected root, when one was reached
    pub root_fingerprint: Option<String>,
    /// Stable error code on failure
    pub error_code: Option<ChainErrorCode>,
    /// Outcome message; empty on clean success
    pub message: String,
}

impl TrustChainResult {
    fn failure(
        links: Vec<ChainLink>,
        dsc_expired: bool,
        code: ChainErrorCode,
        message: String,
    ) -> Self {
        let csca_expired = links.iter().skip(1).any(|l| l.expired);
        Self {
            valid: false,
            path: path_string(&links),
            depth: links.len(),
            links,
            dsc_expired,
            csca_expired,
            root_subject: None,
            root_fingerprint: None,
            error_code: Some(code),
            message,
        }
    }
}

fn path_string(links: &[ChainLink]) -> String {
    links
        .iter()
        .map(|l| l.role.label())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Trust-chain builder over an injected CSCA provider
pub struct TrustChainBuilder<'a> {
    provider: &'a dyn CscaProvider,
}

impl<'a> TrustChainBuilder<'a> {
    /// Build over a provider.
    pub fn new(provider: &'a dyn CscaProvider) -> Self {
        Self { provider }
    }

    /// Build and validate the chain from `leaf` with the default depth bound.
    pub fn build(&self, leaf: &Certificate) -> TrustChainResult {
        self.build_with_depth(leaf, DEFAULT_MAX_DEPTH)
    }

    /// Build and validate the chain from `leaf`, bounding the chain length.
    pub fn build_with_depth(&self, leaf: &Certificate, max_depth: usize) -> TrustChainResult {
        let dsc_expired = ops::is_expired(leaf);

        if leaf.issuer_dn().is_empty() {
            return TrustChainResult::failure(
                vec![link_for(leaf, ChainRole::Dsc, false)],
                dsc_expired,
                ChainErrorCode::ChainBroken,
                "Failed to extract issuer DN".to_string(),
            );
        }

        let mut pool = self.provider.find_all_cscas_by_issuer_dn(leaf.issuer_dn());
        if pool.is_empty() {
            return TrustChainResult::failure(
                vec![link_for(leaf, ChainRole::Dsc, false)],
                dsc_expired,
                ChainErrorCode::CscaNotFound,
                format!("No CSCA found for issuer {}", truncate_dn(leaf.issuer_dn())),
            );
        }

        let mut chain: Vec<Certificate> = vec![leaf.clone()];
        let mut visited: HashSet<String> = HashSet::new();
        let mut dn_fallback_used = false;

        loop {
            if chain.len() > max_depth {
                return self.finish_failure(
                    &chain,
                    dsc_expired,
                    ChainErrorCode::MaxDepthExceeded,
                    "Maximum chain depth exceeded".to_string(),
                );
            }
            let current = chain.last().expect("chain is never empty");

            if ops::is_self_signed(current) {
                if !ops::verify_signature(current, current) {
                    let depth = chain.len();
                    return self.finish_failure(
                        &chain,
                        dsc_expired,
                        ChainErrorCode::CscaSelfSignatureFailed,
                        format!(
                            "Root CSCA self-signature verification failed at depth {}",
                            depth
                        ),
                    );
                }
                return self.finish_success(&chain, dsc_expired, dn_fallback_used);
            }

            let current_issuer = current.issuer_dn_normalized().to_string();
            if !visited.insert(current_issuer.clone()) {
                return self.finish_failure(
                    &chain,
                    dsc_expired,
                    ChainErrorCode::CircularReference,
                    "Circular reference detected".to_string(),
                );
            }

            let mut dn_matches: Vec<&Certificate> = pool
                .iter()
                .filter(|c| c.subject_dn_normalized() == current_issuer)
                .collect();

            if dn_matches.is_empty() {
                // Multi-hop link chains: the pool was seeded from the leaf's
                // issuer; climb by requerying for the current issuer.
                let extra = self.provider.find_all_cscas_by_issuer_dn(current.issuer_dn());
                let known: HashSet<String> =
                    pool.iter().map(|c| c.fingerprint().to_string()).collect();
                let fresh: Vec<Certificate> = extra
                    .into_iter()
                    .filter(|c| !known.contains(c.fingerprint()))
                    .collect();
                debug!(
                    issuer = truncate_dn(current.issuer_dn()),
                    candidates = fresh.len(),
                    "requeried provider for link-chain hop"
                );
                pool.extend(fresh);
                dn_matches = pool
                    .iter()
                    .filter(|c| c.subject_dn_normalized() == current_issuer)
                    .collect();
            }

            if dn_matches.is_empty() {
                let (code, message) = if chain.len() == 1 {
                    (
                        ChainErrorCode::CscaDnMismatch,
                        format!(
                            "No CSCA subject matches issuer {}",
                            truncate_dn(current.issuer_dn())
                        ),
                    )
                } else {
                    (
                        ChainErrorCode::ChainBroken,
                        format!("Chain broken: Issuer not found at depth {}", chain.len()),
                    )
                };
                return self.finish_failure(&chain, dsc_expired, code, message);
            }

            // Key rollover: same-DN candidates are discriminated by which key
            // actually verifies the current certificate.
            let verified = dn_matches
                .iter()
                .find(|candidate| ops::verify_signature(current, candidate));

            let next = match verified {
                Some(c) => (*c).clone(),
                None => {
                    dn_fallback_used = true;
                    debug!(
                        subject = truncate_dn(dn_matches[0].subject_dn()),
                        "issuer matched by DN only; signature did not verify"
                    );
                    dn_matches[0].clone()
                }
            };
            chain.push(next);
        }
    }

    fn finish_success(
        &self,
        chain: &[Certificate],
        dsc_expired: bool,
        dn_fallback_used: bool,
    ) -> TrustChainResult {
        // Hard requirement: re-verify every adjacent pair, the root's
        // self-signature included, before declaring the chain valid.
        let mut links = build_links(chain);
        let mut all_valid = true;
        for i in 0..chain.len() {
            let issuer = if i + 1 < chain.len() {
                &chain[i + 1]
            } else {
                &chain[i]
            };
            let ok = ops::verify_signature(&chain[i], issuer);
            links[i].signature_valid = ok;
            all_valid &= ok;
        }

        let csca_expired = chain.iter().skip(1).any(ops::is_expired);
        let root = chain.last().expect("chain is never empty");

        let (error_code, message) = if all_valid {
            (None, String::new())
        } else if dn_fallback_used {
            (
                Some(ChainErrorCode::TrustChainSignatureFailed),
                "Issuer matched by DN but signature verification failed".to_string(),
            )
        } else {
            (
                Some(ChainErrorCode::TrustChainSignatureFailed),
                "Trust chain signature verification failed".to_string(),
            )
        };

        TrustChainResult {
            valid: all_valid,
            path: path_string(&links),
            depth: links.len(),
            links,
            dsc_expired,
            csca_expired,
            root_subject: Some(root.subject_dn().to_string()),
            root_fingerprint: Some(root.fingerprint().to_string()),
            error_code,
            message,
        }
    }

    fn finish_failure(
        &self,
        chain: &[Certificate],
        dsc_expired: bool,
        code: ChainErrorCode,
        message: String,
    ) -> TrustChainResult {
        let mut links = build_links(chain);
        // Record what did verify up to the break so callers can display a
        // partial chain.
        for i in 0..chain.len().saturating_sub(1) {
            links[i].signature_valid = ops::verify_signature(&chain[i], &chain[i + 1]);
        }
        TrustChainResult::failure(links, dsc_expired, code, message)
    }
}

fn role_for(cert: &Certificate, position: usize) -> ChainRole {
    if position == 0 {
        ChainRole::Dsc
    } else if ops::is_self_signed(cert) {
        ChainRole::Root
    } else if ops::is_link_certificate(cert) {
        ChainRole::Link
    } else {
        ChainRole::Csca
    }
}

fn link_for(cert: &Certificate, role: ChainRole, signature_valid: bool) -> ChainLink {
    ChainLink {
        fingerprint: cert.fingerprint().to_string(),
        subject: cert.subject_dn().to_string(),
        issuer: cert.issuer_dn().to_string(),
        role,
        signature_valid,
        expired: ops::is_expired(cert),
    }
}

fn build_links(chain: &[Certificate]) -> Vec<ChainLink> {
    chain
        .iter()
        .enumerate()
        .map(|(i, c)| link_for(c, role_for(c, i), false))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(ChainRole::Dsc.label(), "DSC");
        assert_eq!(ChainRole::Link.label(), "Link");
        assert_eq!(ChainRole::Root.label(), "Root");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ChainErrorCode::CscaNotFound).unwrap();
        assert_eq!(json, "\"CSCA_NOT_FOUND\"");
        let json = serde_json::to_string(&ChainErrorCode::TrustChainSignatureFailed).unwrap();
        assert_eq!(json, "\"TRUST_CHAIN_SIGNATURE_FAILED\"");
    }
}
