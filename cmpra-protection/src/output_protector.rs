// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::{Arc, Mutex, PoisonError};

use cmpra_abstractions::{
    MessageProtectionContext, NoProtection, PersistencyContext, PkiBody, PkiHeader, PkiMessage,
    ProtectError, ProtectionProvider, ReprotectMode,
};
use cmpra_common::Certificate;

use crate::generator::{build_forwarding_header, generate_and_protect_message};
use crate::providers::ProtectionProviderFactory;

/// Sets the right protection for outgoing messages.
///
/// Constructed once per transaction-processing context. Public operations
/// are serialized behind a per-instance lock; the persistency collaborator
/// is shared with the surrounding transaction machinery through its own
/// lock.
pub struct MsgOutputProtector {
    inner: Mutex<Inner>,
}

struct Inner {
    protector: Box<dyn ProtectionProvider>,
    reprotect_mode: ReprotectMode,
    suppress_redundant_extra_certs: bool,
    persistency: Option<Arc<Mutex<dyn PersistencyContext>>>,
}

impl MsgOutputProtector {
    /// Build the protector from the configured output credentials.
    pub fn new(
        config: &dyn MessageProtectionContext,
        persistency: Option<Arc<Mutex<dyn PersistencyContext>>>,
    ) -> Result<Self, ProtectError> {
        Ok(Self {
            inner: Mutex::new(Inner {
                protector: ProtectionProviderFactory::create(&config.output_credentials())?,
                reprotect_mode: config.reprotect_mode(),
                suppress_redundant_extra_certs: config.suppress_redundant_extra_certs(),
                persistency,
            }),
        })
    }

    /// Generate and protect a new message.
    pub fn generate_and_protect_message(
        &self,
        header: PkiHeader,
        body: PkiBody,
    ) -> Result<PkiMessage, ProtectError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let msg = generate_and_protect_message(header, inner.protector.as_ref(), body, None)?;
        Ok(inner.strip_redundant_extra_certs(msg))
    }

    /// Protect and forward an inbound message, optionally attaching the
    /// trust chain of a freshly issued certificate to the extra certs.
    pub fn protect_and_forward_message(
        &self,
        inbound: &PkiMessage,
        issuing_chain: Option<&[Certificate]>,
    ) -> Result<PkiMessage, ProtectError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match inner.reprotect_mode {
            ReprotectMode::Reprotect => {
                let msg = generate_and_protect_message(
                    build_forwarding_header(inbound),
                    inner.protector.as_ref(),
                    inbound.body().clone(),
                    issuing_chain,
                )?;
                Ok(inner.strip_redundant_extra_certs(msg))
            }
            ReprotectMode::Strip => generate_and_protect_message(
                build_forwarding_header(inbound),
                &NoProtection,
                inbound.body().clone(),
                issuing_chain,
            ),
            ReprotectMode::Keep => {
                if inbound.header().protection_alg.is_none() {
                    // Message protection lost during processing, reprotect.
                    let msg = generate_and_protect_message(
                        build_forwarding_header(inbound),
                        inner.protector.as_ref(),
                        inbound.body().clone(),
                        issuing_chain,
                    )?;
                    return Ok(inner.strip_redundant_extra_certs(msg));
                }

                let mut extra_certs: Vec<Certificate> =
                    inbound.extra_certs().unwrap_or_default().to_vec();
                for cert in issuing_chain.unwrap_or_default() {
                    if !extra_certs.contains(cert) {
                        extra_certs.push(cert.clone());
                    }
                }

                let msg = PkiMessage::new(
                    inbound.header().clone(),
                    inbound.body().clone(),
                    inbound.protection().cloned(),
                    Some(extra_certs),
                );
                Ok(inner.strip_redundant_extra_certs(msg))
            }
        }
    }
}

impl Inner {
    /// Remove extra certs already transmitted within this transaction.
    ///
    /// The remaining certs are added to the sent-certificate ledger on every
    /// call, whether or not anything was removed, so later messages in the
    /// same transaction can rely on them having been seen.
    fn strip_redundant_extra_certs(&self, msg: PkiMessage) -> PkiMessage {
        if !self.suppress_redundant_extra_certs {
            return msg;
        }
        let Some(persistency) = &self.persistency else {
            return msg;
        };
        let extra_certs: Vec<Certificate> = match msg.extra_certs() {
            Some(certs) => certs.to_vec(),
            None => {
                tracing::debug!("no extra certs, no stripping");
                return msg;
            }
        };

        let mut persistency = persistency.lock().unwrap_or_else(PoisonError::into_inner);
        let ledger = persistency.sent_extra_certs();

        let remaining: Vec<Certificate> = extra_certs
            .iter()
            .filter(|cert| !ledger.contains(*cert))
            .cloned()
            .collect();

        let msg = if remaining.len() < extra_certs.len() {
            tracing::debug!(
                from = extra_certs.len(),
                to = remaining.len(),
                "dropped already-sent extra certs"
            );
            msg.with_extra_certs(Some(remaining.clone()))
        } else {
            msg
        };

        ledger.extend(remaining);
        msg
    }
}
