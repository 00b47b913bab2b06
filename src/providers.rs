// Copyright (c) 2025 - Cowboy AI, LLC.

//! In-memory provider implementations
//!
//! Backing stores for the capability traits, keyed the same way the
//! production adapters key their queries: CSCAs by normalised subject DN,
//! CRLs by country, DSCs by fingerprint. Used by the test-suite and by
//! embedders that bootstrap from a master-list file before a directory is
//! available.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::crl::Crl;
use crate::traits::{CertificateStore, CrlProvider, CscaProvider};
use crate::types::RegisterOutcome;
use crate::x509::{dn, Certificate};

/// CSCA store keyed by normalised subject DN
#[derive(Default)]
pub struct InMemoryCscaProvider {
    by_subject: RwLock<HashMap<String, Vec<Certificate>>>,
}

impl InMemoryCscaProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a CSCA or link certificate to the pool.
    pub fn add(&self, cert: Certificate) {
        let key = cert.subject_dn_normalized().to_string();
        let mut map = self.by_subject.write().unwrap();
        let bucket = map.entry(key).or_default();
        // Dedupe on fingerprint so re-ingesting a master list is a no-op.
        if !bucket.iter().any(|c| c.fingerprint() == cert.fingerprint()) {
            bucket.push(cert);
        }
    }

    /// Number of stored certificates across all DNs.
    pub fn len(&self) -> usize {
        self.by_subject.read().unwrap().values().map(Vec::len).sum()
    }

    /// True when no certificate is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CscaProvider for InMemoryCscaProvider {
    fn find_all_cscas_by_issuer_dn(&self, issuer_dn: &str) -> Vec<Certificate> {
        let key = dn::normalize_dn(issuer_dn);
        self.by_subject
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    fn find_csca_by_issuer_dn(
        &self,
        issuer_dn: &str,
        country_code: &str,
    ) -> Option<Certificate> {
        let wanted = country_code.trim().to_uppercase();
        self.find_all_cscas_by_issuer_dn(issuer_dn)
            .into_iter()
            .find(|c| c.country() == wanted)
    }
}

/// CRL store keyed by uppercase country code
#[derive(Default)]
pub struct InMemoryCrlProvider {
    by_country: RwLock<HashMap<String, Crl>>,
}

impl InMemoryCrlProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the CRL for its issuer country.
    pub fn add(&self, crl: Crl) {
        let key = crl.country().to_string();
        self.by_country.write().unwrap().insert(key, crl);
    }

    /// Insert or replace a CRL under an explicit country code, for issuers
    /// whose CRL carries no `C=` attribute.
    pub fn add_for_country(&self, country_code: &str, crl: Crl) {
        let key = country_code.trim().to_uppercase();
        self.by_country.write().unwrap().insert(key, crl);
    }
}

impl CrlProvider for InMemoryCrlProvider {
    fn find_crl_by_country(&self, country_code: &str) -> Option<Crl> {
        let key = country_code.trim().to_uppercase();
        self.by_country.read().unwrap().get(&key).cloned()
    }
}

/// DSC store keyed by fingerprint
#[derive(Default)]
pub struct InMemoryCertificateStore {
    by_fingerprint: RwLock<HashMap<String, Certificate>>,
}

impl InMemoryCertificateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored certificates.
    pub fn len(&self) -> usize {
        self.by_fingerprint.read().unwrap().len()
    }

    /// True when no certificate is stored.
    pub fn is_empty(&self) -> bool {
        self.by_fingerprint.read().unwrap().is_empty()
    }

    /// Fetch a stored certificate by fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<Certificate> {
        self.by_fingerprint.read().unwrap().get(fingerprint).cloned()
    }
}

impl CertificateStore for InMemoryCertificateStore {
    fn register_dsc(&self, cert: &Certificate) -> RegisterOutcome {
        let mut map = self.by_fingerprint.write().unwrap();
        if map.contains_key(cert.fingerprint()) {
            RegisterOutcome::AlreadyPresent
        } else {
            map.insert(cert.fingerprint().to_string(), cert.clone());
            RegisterOutcome::Added
        }
    }
}
