// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Certification-path building and validation for the CMP RA trust core.
//!
//! [`TrustChainValidator`] decides whether a presented certificate chains to
//! one of the configured trust anchors, applying the configured revocation
//! checking and role-appropriate key-usage policy along the path. Every
//! trust or validation failure is reported uniformly as "no chain" so error
//! detail cannot be used as a trust oracle.

mod chain;
mod revocation;
mod sig;
mod validator;

pub use chain::{build_certification_path, PathBuildError, MAX_PATH_DEPTH};
pub use revocation::{CertStatus, OcspClient, OcspError, RevocationError, RevocationSettings};
pub use sig::{verify_certificate_signature, SignatureCheckError};
pub use validator::TrustChainValidator;
