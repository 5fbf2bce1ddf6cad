// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(thiserror::Error, Debug)]
pub enum CertParseError {
    #[error("invalid certificate DER: {0}")]
    InvalidDer(String),

    #[error("invalid certificate extension: {0}")]
    InvalidExtension(String),
}

/// Key-usage bits relevant to RA policy checks.
///
/// Only the bits the validator inspects are captured; a present extension
/// with other bits set still round-trips through `digital_signature` /
/// `key_cert_sign` being false.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyUsage {
    pub digital_signature: bool,
    pub key_cert_sign: bool,
}

/// A parsed X.509 certificate.
///
/// Field extraction happens once, at construction. The raw DER is retained
/// and is the sole basis for equality and hashing, so two certificates are
/// "the same" only when their encodings are byte-identical.
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    subject_dn: String,
    issuer_dn: String,
    serial: Vec<u8>,
    spki_der: Vec<u8>,
    tbs_der: Vec<u8>,
    signature_oid: String,
    signature: Vec<u8>,
    not_before: i64,
    not_after: i64,
    key_usage: Option<KeyUsage>,
    is_ca: bool,
}

impl Certificate {
    /// Parse a certificate from its DER encoding.
    pub fn from_der(der: &[u8]) -> Result<Self, CertParseError> {
        let (_, cert) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| CertParseError::InvalidDer(e.to_string()))?;

        let key_usage = cert
            .key_usage()
            .map_err(|e| CertParseError::InvalidExtension(e.to_string()))?
            .map(|ku| KeyUsage {
                digital_signature: ku.value.digital_signature(),
                key_cert_sign: ku.value.key_cert_sign(),
            });

        let is_ca = cert
            .basic_constraints()
            .map_err(|e| CertParseError::InvalidExtension(e.to_string()))?
            .map(|bc| bc.value.ca)
            .unwrap_or(false);

        Ok(Self {
            der: der.to_vec(),
            subject_dn: cert.tbs_certificate.subject.to_string(),
            issuer_dn: cert.tbs_certificate.issuer.to_string(),
            serial: normalize_serial(cert.tbs_certificate.raw_serial()),
            spki_der: cert.tbs_certificate.subject_pki.raw.to_vec(),
            // `x509-parser` keeps the raw DER for TBSCertificate; expose it via `AsRef`.
            tbs_der: cert.tbs_certificate.as_ref().to_vec(),
            signature_oid: cert.signature_algorithm.algorithm.to_string(),
            signature: cert.signature_value.data.to_vec(),
            not_before: cert.validity().not_before.timestamp(),
            not_after: cert.validity().not_after.timestamp(),
            key_usage,
            is_ca,
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn subject_dn(&self) -> &str {
        &self.subject_dn
    }

    pub fn issuer_dn(&self) -> &str {
        &self.issuer_dn
    }

    /// Serial number, big-endian, with DER sign-padding stripped.
    pub fn serial(&self) -> &[u8] {
        &self.serial
    }

    pub fn spki_der(&self) -> &[u8] {
        &self.spki_der
    }

    pub fn tbs_der(&self) -> &[u8] {
        &self.tbs_der
    }

    pub fn signature_oid(&self) -> &str {
        &self.signature_oid
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn key_usage(&self) -> Option<KeyUsage> {
        self.key_usage
    }

    /// A CA certificate that is not self-issued, i.e. one that can link a
    /// path without being a root.
    pub fn is_intermediate(&self) -> bool {
        self.is_ca && !self.is_self_issued()
    }

    pub fn is_self_issued(&self) -> bool {
        self.subject_dn == self.issuer_dn
    }

    pub fn is_valid_at(&self, unix_ts: i64) -> bool {
        self.not_before <= unix_ts && unix_ts <= self.not_after
    }

    pub fn is_currently_valid(&self) -> bool {
        self.is_valid_at(time::OffsetDateTime::now_utc().unix_timestamp())
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl Hash for Certificate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.der.hash(state);
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject_dn)
            .field("issuer", &self.issuer_dn)
            .field("serial", &self.serial)
            .finish()
    }
}

/// Strip DER sign-padding so CRL serials and certificate serials compare equal.
pub(crate) fn normalize_serial(raw: &[u8]) -> Vec<u8> {
    let stripped: &[u8] = match raw.iter().position(|&b| b != 0) {
        Some(pos) => &raw[pos..],
        None => &raw[raw.len().saturating_sub(1)..],
    };
    stripped.to_vec()
}
