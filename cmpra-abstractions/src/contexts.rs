// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Collaborator contracts consumed by the trust core.
//!
//! These traits describe configuration and persistency collaborators owned by
//! the surrounding RA; the core only reads them. Configuration accessors are
//! re-fetched on every operation so configuration changes take effect
//! immediately, which is why they return owned values rather than references.

use std::collections::HashSet;

use cmpra_common::{Certificate, CertificateRevocationList};

use crate::protection::{CredentialDescriptor, ReprotectMode};

/// Options applied to the revocation checker, mirroring the PKIX checker
/// option set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RevocationCheckerOption {
    /// Only check revocation for the end-entity certificate.
    OnlyEndEntity,
    /// Treat an unanswerable revocation query as success instead of failure.
    SoftFail,
    /// Do not fall back to CRLs after an unanswered OCSP query.
    NoFallback,
}

/// Trust configuration for certification-path validation.
///
/// Contract:
/// - `trusted_certificates` returns `None` when trust is unconfigured, which
///   is distinct from an empty set and fails validation immediately.
/// - The acceptability predicates must be pure: no side effects, stable
///   answers for equal certificates within one validation call.
pub trait VerificationContext: Send + Sync {
    /// The configured trust anchors, or `None` if trust is unconfigured.
    fn trusted_certificates(&self) -> Option<Vec<Certificate>>;

    /// Policy predicate for the certificate under validation.
    fn is_leaf_cert_acceptable(&self, cert: &Certificate) -> bool;

    /// Policy predicate for intermediate certificates, applied both to the
    /// candidate pool and to the resolved path.
    fn is_intermediate_cert_acceptable(&self, cert: &Certificate) -> bool;

    /// Operator-trusted helper certificates joining the path-builder pool
    /// unconditionally.
    fn additional_certs(&self) -> Vec<Certificate> {
        Vec::new()
    }

    /// Configured CRLs. A non-empty set enables revocation checking.
    fn crls(&self) -> Vec<CertificateRevocationList> {
        Vec::new()
    }

    /// Whether Authority-Information-Access based discovery is enabled.
    fn is_aia_enabled(&self) -> bool {
        false
    }

    /// Whether CRL-Distribution-Point based discovery is enabled.
    fn is_cdp_enabled(&self) -> bool {
        false
    }

    /// Explicit OCSP responder URI. When configured it takes precedence as
    /// the revocation check's responder target.
    fn ocsp_responder(&self) -> Option<String> {
        None
    }

    /// Options applied to the revocation checker unconditionally when present.
    fn revocation_checker_options(&self) -> Option<HashSet<RevocationCheckerOption>> {
        None
    }
}

/// Protection configuration for outgoing messages.
pub trait MessageProtectionContext: Send + Sync {
    /// Credentials used to build the output protection provider.
    fn output_credentials(&self) -> CredentialDescriptor;

    /// How existing protection of forwarded messages is treated.
    fn reprotect_mode(&self) -> ReprotectMode;

    /// Whether already-transmitted extra certificates are stripped from
    /// outgoing messages.
    fn suppress_redundant_extra_certs(&self) -> bool {
        false
    }
}

/// Per-transaction persistency collaborator.
///
/// The sent-certificate ledger grows monotonically for the transaction's
/// lifetime; the core adds to it and never removes. Callers serialize access
/// (one active call at a time per transaction).
pub trait PersistencyContext: Send {
    /// The set of extra certificates already transmitted to the peer.
    fn sent_extra_certs(&mut self) -> &mut HashSet<Certificate>;
}
