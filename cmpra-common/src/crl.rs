// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashSet;
use std::fmt;

use crate::certificate::{normalize_serial, CertParseError, Certificate};

/// A parsed certificate revocation list.
///
/// Answers revocation questions for certificates whose issuer DN matches the
/// CRL issuer. Like [`Certificate`], this is an immutable snapshot of the
/// parsed DER.
#[derive(Clone)]
pub struct CertificateRevocationList {
    der: Vec<u8>,
    issuer_dn: String,
    revoked_serials: HashSet<Vec<u8>>,
    next_update: Option<i64>,
}

impl CertificateRevocationList {
    /// Parse a CRL from its DER encoding.
    pub fn from_der(der: &[u8]) -> Result<Self, CertParseError> {
        let (_, crl) = x509_parser::parse_x509_crl(der)
            .map_err(|e| CertParseError::InvalidDer(e.to_string()))?;

        let revoked_serials = crl
            .iter_revoked_certificates()
            .map(|revoked| normalize_serial(revoked.raw_serial()))
            .collect();

        Ok(Self {
            der: der.to_vec(),
            issuer_dn: crl.issuer().to_string(),
            revoked_serials,
            next_update: crl.next_update().map(|t| t.timestamp()),
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn issuer_dn(&self) -> &str {
        &self.issuer_dn
    }

    pub fn next_update(&self) -> Option<i64> {
        self.next_update
    }

    /// Whether this CRL is usable at the given time. A CRL past its
    /// next-update is stale and answers nothing; a CRL without a
    /// next-update never goes stale.
    pub fn is_fresh_at(&self, unix_ts: i64) -> bool {
        self.next_update.map_or(true, |next| unix_ts <= next)
    }

    /// Whether this CRL is authoritative for the given certificate.
    pub fn covers(&self, cert: &Certificate) -> bool {
        self.issuer_dn == cert.issuer_dn()
    }

    /// Whether this CRL lists the given certificate as revoked.
    ///
    /// Only meaningful when [`covers`](Self::covers) holds; a non-covering
    /// CRL never revokes.
    pub fn revokes(&self, cert: &Certificate) -> bool {
        self.covers(cert) && self.revoked_serials.contains(cert.serial())
    }
}

impl fmt::Debug for CertificateRevocationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateRevocationList")
            .field("issuer", &self.issuer_dn)
            .field("revoked", &self.revoked_serials.len())
            .finish()
    }
}
