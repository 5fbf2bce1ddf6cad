// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Immutable PKI message value model.
//!
//! Wire parsing/encoding is out of scope for this core; the message is a
//! plain owned datatype assembled and consumed by the surrounding RA. Every
//! modification produces a new instance, never a mutation in place; the
//! redundant-cert ledger logic relies on the input message staying intact.

use cmpra_common::Certificate;

use crate::protection::ProtectionAlg;

/// Opaque protection value (signature or MAC bytes).
pub type ProtectionValue = Vec<u8>;

/// PKI message header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkiHeader {
    pub sender: String,
    pub recipient: String,
    pub transaction_id: Vec<u8>,
    pub sender_nonce: Option<Vec<u8>>,
    pub recip_nonce: Option<Vec<u8>>,
    /// Algorithm of the protection applied to the message, absent when the
    /// message is unprotected.
    pub protection_alg: Option<ProtectionAlg>,
    /// Message production time as a unix timestamp.
    pub message_time: Option<i64>,
}

impl PkiHeader {
    /// Copy of this header with the protection algorithm replaced.
    pub fn with_protection_alg(&self, alg: Option<ProtectionAlg>) -> Self {
        Self {
            protection_alg: alg,
            ..self.clone()
        }
    }
}

/// Opaque PKI message body: a CMP body-type tag plus its encoded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkiBody {
    pub body_type: u16,
    pub content: Vec<u8>,
}

impl PkiBody {
    pub fn new(body_type: u16, content: Vec<u8>) -> Self {
        Self { body_type, content }
    }
}

/// A complete PKI message: header + body + protection + extra certs.
///
/// `extra_certs` is `None` rather than `Some(vec![])` when the message
/// carries no auxiliary certificates, to avoid ambiguity in the wire
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkiMessage {
    header: PkiHeader,
    body: PkiBody,
    protection: Option<ProtectionValue>,
    extra_certs: Option<Vec<Certificate>>,
}

impl PkiMessage {
    pub fn new(
        header: PkiHeader,
        body: PkiBody,
        protection: Option<ProtectionValue>,
        extra_certs: Option<Vec<Certificate>>,
    ) -> Self {
        let extra_certs = extra_certs.filter(|certs| !certs.is_empty());
        Self {
            header,
            body,
            protection,
            extra_certs,
        }
    }

    pub fn header(&self) -> &PkiHeader {
        &self.header
    }

    pub fn body(&self) -> &PkiBody {
        &self.body
    }

    pub fn protection(&self) -> Option<&ProtectionValue> {
        self.protection.as_ref()
    }

    pub fn extra_certs(&self) -> Option<&[Certificate]> {
        self.extra_certs.as_deref()
    }

    /// New message equal to this one with the extra-cert bag replaced.
    /// An empty bag normalizes to "no extra certs".
    pub fn with_extra_certs(&self, extra_certs: Option<Vec<Certificate>>) -> Self {
        Self::new(
            self.header.clone(),
            self.body.clone(),
            self.protection.clone(),
            extra_certs,
        )
    }
}
