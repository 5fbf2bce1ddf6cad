// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::{Arc, Mutex, PoisonError};

use cmpra_abstractions::VerificationContext;
use cmpra_common::Certificate;

use crate::chain::{build_certification_path, PathBuildError};
use crate::revocation::{check_chain, OcspClient, RevocationError, RevocationSettings};

/// Builds and validates a certification path for a presented certificate
/// against the configured trust store.
///
/// Configuration is re-read from the [`VerificationContext`] on every call,
/// so configuration changes take effect immediately. Operations on one
/// instance are serialized behind a per-instance lock; distinct instances
/// are independent.
pub struct TrustChainValidator {
    config: Arc<dyn VerificationContext>,
    ocsp_client: Option<Arc<dyn OcspClient>>,
    op_lock: Mutex<()>,
}

impl TrustChainValidator {
    pub fn new(config: Arc<dyn VerificationContext>) -> Self {
        Self {
            config,
            ocsp_client: None,
            op_lock: Mutex::new(()),
        }
    }

    /// Install the OCSP client consulted when the context configures an
    /// explicit responder. Engine-level configuration: transport, timeouts
    /// and retries belong to the client, not to this validator.
    pub fn with_ocsp_client(mut self, client: Arc<dyn OcspClient>) -> Self {
        self.ocsp_client = Some(client);
        self
    }

    /// Attempt to build and validate a certification path for `cert`.
    ///
    /// Returns the path ordered leaf first, trust anchor excluded, or `None`
    /// if no trustworthy path exists. All failure causes map to `None`
    /// uniformly; callers must not learn why validation failed.
    pub fn validate_cert_against_trust(
        &self,
        cert: &Certificate,
        additional_intermediate_certs: Option<&[Certificate]>,
    ) -> Option<Vec<Certificate>> {
        let _guard = self.op_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Trust unconfigured is not the same as trust unmet, but both end
        // in "no chain".
        let trust_anchors = self.config.trusted_certificates()?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                subject = cert.subject_dn(),
                issuer = cert.issuer_dn(),
                "validating certificate"
            );
            for inter in additional_intermediate_certs.unwrap_or_default() {
                tracing::debug!(subject = inter.subject_dn(), issuer = inter.issuer_dn(), "inter");
            }
            for anchor in &trust_anchors {
                tracing::debug!(subject = anchor.subject_dn(), issuer = anchor.issuer_dn(), "trust");
            }
        }

        if let Some(ku) = cert.key_usage() {
            if !ku.digital_signature {
                return None;
            }
        }
        if !self.config.is_leaf_cert_acceptable(cert) {
            return None;
        }

        // Candidate pool for path building: acceptable, structurally valid
        // intermediates, operator-trusted additional certs, and the target
        // itself.
        let mut pool: Vec<Certificate> = Vec::new();
        if let Some(inters) = additional_intermediate_certs {
            for candidate in inters {
                if self.config.is_intermediate_cert_acceptable(candidate)
                    && candidate.is_intermediate()
                    && !pool.contains(candidate)
                {
                    pool.push(candidate.clone());
                }
            }
        }
        for additional in self.config.additional_certs() {
            if !pool.contains(&additional) {
                pool.push(additional);
            }
        }
        if !pool.contains(cert) {
            pool.push(cert.clone());
        }

        let revocation = RevocationSettings::from_context(self.config.as_ref());

        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let chain = match build_certification_path(cert, &pool, &trust_anchors, now) {
            Ok(chain) => chain,
            Err(PathBuildError::UnsupportedAlgorithm(oid)) => {
                tracing::error!(%oid, "exception while building certificate path");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "certification path building failed");
                return None;
            }
        };

        if revocation.enabled() {
            match check_chain(&chain, &revocation, self.ocsp_client.as_deref(), now) {
                Ok(()) => {}
                Err(RevocationError::CheckerConfiguration(reason)) => {
                    tracing::error!(%reason, "invalid revocation checker configuration");
                    return None;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "revocation check failed");
                    return None;
                }
            }
        }

        // Re-validate policy against the path actually found; the builder
        // may have selected a different intermediate than the one offered.
        for chain_cert in &chain {
            if chain_cert == cert {
                continue;
            }
            if let Some(ku) = chain_cert.key_usage() {
                if !ku.key_cert_sign {
                    return None;
                }
            }
            if !self.config.is_intermediate_cert_acceptable(chain_cert) {
                return None;
            }
        }

        Some(chain)
    }
}
