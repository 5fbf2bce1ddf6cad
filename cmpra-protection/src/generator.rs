// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Message assembly helpers.
//!
//! These functions build complete `PkiMessage` values from already-decided
//! protection and auxiliary-cert inputs; they own no policy themselves.

use cmpra_abstractions::{PkiBody, PkiHeader, PkiMessage, ProtectError, ProtectionProvider};
use cmpra_common::Certificate;

/// Build a new message from header and body, protected by `protector`, with
/// the protector's certificate chain and the optional `issuing_chain`
/// attached as extra certs (first occurrence wins).
pub fn generate_and_protect_message(
    header: PkiHeader,
    protector: &dyn ProtectionProvider,
    body: PkiBody,
    issuing_chain: Option<&[Certificate]>,
) -> Result<PkiMessage, ProtectError> {
    let header = header.with_protection_alg(protector.protection_alg());
    let protection = protector.protect(&header, &body)?;

    let mut extra_certs: Vec<Certificate> = Vec::new();
    for cert in protector.protecting_certs() {
        if !extra_certs.contains(&cert) {
            extra_certs.push(cert);
        }
    }
    for cert in issuing_chain.unwrap_or_default() {
        if !extra_certs.contains(cert) {
            extra_certs.push(cert.clone());
        }
    }

    Ok(PkiMessage::new(header, body, protection, Some(extra_certs)))
}

/// Derive the header for forwarding an inbound message: transaction and
/// nonce identifiers are preserved, the message time is refreshed, and the
/// protection algorithm is cleared for the protecting provider to set.
pub fn build_forwarding_header(inbound: &PkiMessage) -> PkiHeader {
    let header = inbound.header();
    PkiHeader {
        sender: header.sender.clone(),
        recipient: header.recipient.clone(),
        transaction_id: header.transaction_id.clone(),
        sender_nonce: header.sender_nonce.clone(),
        recip_nonce: header.recip_nonce.clone(),
        protection_alg: None,
        message_time: Some(time::OffsetDateTime::now_utc().unix_timestamp()),
    }
}
