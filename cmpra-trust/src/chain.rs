// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Certification-path construction.
//!
//! Walks from the target certificate towards a trust anchor, picking issuers
//! from the candidate pool first and the anchors second. An issuer qualifies
//! when its subject DN matches the current certificate's issuer DN and its
//! key verifies the certificate's signature. Anchors and targets are matched
//! by exact DER identity, never just by name or key.

use cmpra_common::Certificate;

use crate::sig::{verify_certificate_signature, SignatureCheckError};

/// Upper bound on the number of issuer links followed.
pub const MAX_PATH_DEPTH: usize = 16;

#[derive(thiserror::Error, Debug)]
pub enum PathBuildError {
    #[error("no certification path to a trust anchor")]
    NoPathFound,

    #[error("certificate in path is outside its validity period")]
    OutsideValidityPeriod,

    /// Environment failure, not a trust decision.
    #[error("unsupported certificate signature algorithm OID: {0}")]
    UnsupportedAlgorithm(String),
}

/// Build the certification path for `target`, ordered leaf first, trust
/// anchor excluded.
///
/// A target that is itself an anchor yields the single-element path
/// `[target]`.
pub fn build_certification_path(
    target: &Certificate,
    pool: &[Certificate],
    anchors: &[Certificate],
    now: i64,
) -> Result<Vec<Certificate>, PathBuildError> {
    if !target.is_valid_at(now) {
        return Err(PathBuildError::OutsideValidityPeriod);
    }

    if anchors.iter().any(|anchor| anchor == target) {
        return Ok(vec![target.clone()]);
    }

    let mut chain = vec![target.clone()];
    let mut current = target.clone();

    for _ in 0..MAX_PATH_DEPTH {
        // Prefer issuers from the candidate pool, then fall back to anchors.
        let mut found: Option<(Certificate, bool)> = None;

        for issuer in pool.iter().chain(anchors.iter()) {
            if issuer.subject_dn() != current.issuer_dn() {
                continue;
            }
            // No element repeats in a path.
            if chain.iter().any(|c| c == issuer) {
                continue;
            }

            match verify_certificate_signature(
                issuer.spki_der(),
                current.tbs_der(),
                current.signature_oid(),
                current.signature(),
            ) {
                Ok(()) => {
                    let is_anchor = anchors.iter().any(|anchor| anchor == issuer);
                    found = Some((issuer.clone(), is_anchor));
                    break;
                }
                Err(SignatureCheckError::UnsupportedAlgorithm(oid)) => {
                    return Err(PathBuildError::UnsupportedAlgorithm(oid));
                }
                // Wrong issuer candidate (same DN, different key); keep looking.
                Err(_) => continue,
            }
        }

        let Some((issuer, is_anchor)) = found else {
            return Err(PathBuildError::NoPathFound);
        };

        if is_anchor {
            return Ok(chain);
        }

        if !issuer.is_valid_at(now) {
            return Err(PathBuildError::OutsideValidityPeriod);
        }

        chain.push(issuer.clone());
        current = issuer;
    }

    Err(PathBuildError::NoPathFound)
}
