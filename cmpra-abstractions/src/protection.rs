// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Protection provider contract and configuration datatypes.

use cmpra_common::Certificate;

use crate::message::{PkiBody, PkiHeader, ProtectionValue};

/// How a forwarded message's existing protection is treated.
///
/// Invalid values are unrepresentable: the enum is exhaustive, so the
/// fatal-configuration-error case of a correctly validated configuration is
/// discharged at the type level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReprotectMode {
    /// Always re-sign/re-MAC with this RA's own credential.
    Reprotect,
    /// Remove protection and forward unprotected.
    Strip,
    /// Forward unchanged; fall back to [`Reprotect`](Self::Reprotect) when
    /// the inbound message carries no protection algorithm.
    Keep,
}

/// Protection algorithm identifier carried in the message header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProtectionAlg {
    /// ECDSA P-256 with SHA-256 over the protected part.
    EcdsaP256Sha256,
    /// Password-based HMAC-SHA256 over the protected part.
    PasswordBasedMac,
}

/// Output credentials from which a protection provider is built.
#[derive(Debug, Clone)]
pub enum CredentialDescriptor {
    /// Signature-based protection: a PKCS#8 DER private key plus the
    /// certificate chain of the protecting certificate, leaf first.
    Signature {
        signing_key_der: Vec<u8>,
        cert_chain: Vec<Certificate>,
    },
    /// MAC-based protection from a shared secret. The key is derived by
    /// iterating SHA-256 over the secret `iterations` times.
    SharedSecret { secret: Vec<u8>, iterations: u32 },
    /// No protection applied.
    None,
}

#[derive(thiserror::Error, Debug)]
pub enum ProtectError {
    #[error("invalid output credentials: {0}")]
    InvalidCredentials(String),

    #[error("failed to compute protection: {0}")]
    Computation(String),

    #[error("failed to encode protected part: {0}")]
    Encoding(String),
}

/// A provider that protects outgoing messages.
///
/// Contract:
/// - `protection_alg` returns `None` exactly when `protect` returns
///   `Ok(None)`, i.e. for the no-protection provider.
/// - `protect` covers the protected part of the message (header + body);
///   it never inspects extra certs.
/// - `protecting_certs` is the chain attached to outgoing messages so the
///   peer can validate the protection, leaf first; empty for MAC and
///   no-protection providers.
pub trait ProtectionProvider: Send + Sync {
    fn protection_alg(&self) -> Option<ProtectionAlg>;

    fn protect(
        &self,
        header: &PkiHeader,
        body: &PkiBody,
    ) -> Result<Option<ProtectionValue>, ProtectError>;

    fn protecting_certs(&self) -> Vec<Certificate> {
        Vec::new()
    }
}

/// The distinguished no-protection provider.
pub struct NoProtection;

impl ProtectionProvider for NoProtection {
    fn protection_alg(&self) -> Option<ProtectionAlg> {
        None
    }

    fn protect(
        &self,
        _header: &PkiHeader,
        _body: &PkiBody,
    ) -> Result<Option<ProtectionValue>, ProtectError> {
        Ok(None)
    }
}
