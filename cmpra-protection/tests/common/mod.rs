// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared test fixtures for message protection tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use cmpra_abstractions::{
    CredentialDescriptor, MessageProtectionContext, PersistencyContext, PkiBody, PkiHeader,
    PkiMessage, ProtectionAlg, ReprotectMode,
};
use cmpra_common::Certificate;
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair, SerialNumber};

pub struct TestProtectionContext {
    pub credentials: CredentialDescriptor,
    pub mode: ReprotectMode,
    pub suppress: bool,
}

impl MessageProtectionContext for TestProtectionContext {
    fn output_credentials(&self) -> CredentialDescriptor {
        self.credentials.clone()
    }

    fn reprotect_mode(&self) -> ReprotectMode {
        self.mode
    }

    fn suppress_redundant_extra_certs(&self) -> bool {
        self.suppress
    }
}

#[derive(Default)]
pub struct InMemoryPersistency {
    pub certs: HashSet<Certificate>,
}

impl PersistencyContext for InMemoryPersistency {
    fn sent_extra_certs(&mut self) -> &mut HashSet<Certificate> {
        &mut self.certs
    }
}

pub fn shared_persistency() -> Arc<Mutex<InMemoryPersistency>> {
    Arc::new(Mutex::new(InMemoryPersistency::default()))
}

/// Self-signed certificate usable as an extra cert or protecting cert.
pub fn self_signed(cn: &str, serial: u8) -> Certificate {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    params.distinguished_name = dn;
    params.serial_number = Some(SerialNumber::from(vec![serial]));
    let cert = params.self_signed(&key).unwrap();
    Certificate::from_der(cert.der()).unwrap()
}

/// Signature credentials backed by a fresh P-256 key and RA certificate.
pub fn signature_credentials() -> CredentialDescriptor {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "Test RA");
    params.distinguished_name = dn;
    params.serial_number = Some(SerialNumber::from(vec![0x7f]));
    let cert = params.self_signed(&key).unwrap();
    CredentialDescriptor::Signature {
        signing_key_der: key.serialize_der(),
        cert_chain: vec![Certificate::from_der(cert.der()).unwrap()],
    }
}

pub fn header() -> PkiHeader {
    PkiHeader {
        sender: "CN=Upstream".to_string(),
        recipient: "CN=Downstream".to_string(),
        transaction_id: vec![0x10, 0x20],
        sender_nonce: Some(vec![0x01]),
        recip_nonce: Some(vec![0x02]),
        protection_alg: None,
        message_time: Some(1_760_000_000),
    }
}

pub fn body() -> PkiBody {
    PkiBody::new(3, vec![0xde, 0xad])
}

/// An inbound message carrying the given protection state and extra certs.
pub fn inbound_message(
    protection_alg: Option<ProtectionAlg>,
    protection: Option<Vec<u8>>,
    extra_certs: Option<Vec<Certificate>>,
) -> PkiMessage {
    let mut h = header();
    h.protection_alg = protection_alg;
    PkiMessage::new(h, body(), protection, extra_certs)
}
