// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Call-scoped revocation checking.
//!
//! Revocation configuration is assembled into a [`RevocationSettings`] value
//! on every validation call and handed to the checker explicitly; no
//! process-wide flags exist, so concurrently validating instances cannot
//! observe each other's configuration.
//!
//! The core never opens sockets. A configured OCSP responder takes
//! precedence as the checker's target, but the query itself goes through the
//! injectable [`OcspClient`]; network transport, timeouts and retries live
//! behind that trait. AIA/CDP discovery flags enable revocation checking but
//! supply no local data, so without an answering source they fail a
//! certificate unless soft-fail is configured. CRLs only answer while they
//! are fresh; one past its next-update leaves the status undetermined.

use std::collections::HashSet;

use cmpra_common::{Certificate, CertificateRevocationList};

use cmpra_abstractions::{RevocationCheckerOption, VerificationContext};

/// Revocation status of a single certificate, as reported by one source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CertStatus {
    Good,
    Revoked,
    /// The source has no authoritative answer for this certificate.
    Unknown,
}

#[derive(thiserror::Error, Debug)]
pub enum OcspError {
    #[error("{0}")]
    Message(String),
}

/// Client performing OCSP queries against a responder.
///
/// Contract: `Ok(CertStatus::Unknown)` and `Err(...)` both mean "no answer";
/// the checker then falls back to CRLs unless
/// [`RevocationCheckerOption::NoFallback`] is set.
pub trait OcspClient: Send + Sync {
    fn check(&self, cert: &Certificate, responder: &str) -> Result<CertStatus, OcspError>;
}

/// Revocation configuration snapshot for one validation call.
#[derive(Debug, Clone, Default)]
pub struct RevocationSettings {
    pub crls: Vec<CertificateRevocationList>,
    pub ocsp_responder: Option<String>,
    pub aia_enabled: bool,
    pub cdp_enabled: bool,
    pub options: HashSet<RevocationCheckerOption>,
}

impl RevocationSettings {
    /// Snapshot the revocation configuration from the verification context.
    pub fn from_context(config: &dyn VerificationContext) -> Self {
        Self {
            crls: config.crls(),
            ocsp_responder: config.ocsp_responder(),
            aia_enabled: config.is_aia_enabled(),
            cdp_enabled: config.is_cdp_enabled(),
            options: config.revocation_checker_options().unwrap_or_default(),
        }
    }

    /// Revocation checking is active iff at least one source is configured
    /// or discovery is enabled.
    pub fn enabled(&self) -> bool {
        self.aia_enabled
            || self.cdp_enabled
            || !self.crls.is_empty()
            || self.ocsp_responder.is_some()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RevocationError {
    #[error("certificate is revoked")]
    Revoked,

    #[error("revocation status could not be determined")]
    StatusUnknown,

    /// Environment failure, not a trust decision.
    #[error("invalid revocation checker configuration: {0}")]
    CheckerConfiguration(String),
}

/// Check revocation for every certificate of a resolved path.
pub fn check_chain(
    chain: &[Certificate],
    settings: &RevocationSettings,
    ocsp_client: Option<&dyn OcspClient>,
    now: i64,
) -> Result<(), RevocationError> {
    let only_end_entity = settings
        .options
        .contains(&RevocationCheckerOption::OnlyEndEntity);
    let soft_fail = settings.options.contains(&RevocationCheckerOption::SoftFail);

    for (index, cert) in chain.iter().enumerate() {
        if only_end_entity && index > 0 {
            break;
        }
        match resolve_status(cert, settings, ocsp_client, now)? {
            CertStatus::Good => {}
            CertStatus::Revoked => return Err(RevocationError::Revoked),
            CertStatus::Unknown => {
                if !soft_fail {
                    return Err(RevocationError::StatusUnknown);
                }
            }
        }
    }
    Ok(())
}

fn resolve_status(
    cert: &Certificate,
    settings: &RevocationSettings,
    ocsp_client: Option<&dyn OcspClient>,
    now: i64,
) -> Result<CertStatus, RevocationError> {
    if let Some(responder) = &settings.ocsp_responder {
        let Some(client) = ocsp_client else {
            return Err(RevocationError::CheckerConfiguration(
                "OCSP responder configured but no OCSP client installed".to_string(),
            ));
        };
        match client.check(cert, responder) {
            Ok(CertStatus::Good) => return Ok(CertStatus::Good),
            Ok(CertStatus::Revoked) => return Ok(CertStatus::Revoked),
            Ok(CertStatus::Unknown) => {}
            Err(e) => {
                tracing::debug!(subject = cert.subject_dn(), error = %e, "OCSP query failed");
            }
        }
        if settings
            .options
            .contains(&RevocationCheckerOption::NoFallback)
        {
            return Ok(CertStatus::Unknown);
        }
    }

    let mut covered = false;
    for crl in &settings.crls {
        // A CRL past its next-update answers nothing.
        if !crl.is_fresh_at(now) {
            continue;
        }
        if crl.revokes(cert) {
            return Ok(CertStatus::Revoked);
        }
        if crl.covers(cert) {
            covered = true;
        }
    }

    Ok(if covered {
        CertStatus::Good
    } else {
        CertStatus::Unknown
    })
}
