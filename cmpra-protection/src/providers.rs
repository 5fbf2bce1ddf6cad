// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Protection providers and their factory.
//!
//! Providers cover the protected part of a message: a deterministic CBOR
//! encoding of the header and body. Wire-format encoding of the full message
//! is out of scope; the CBOR protected part exists solely as the byte string
//! signatures and MACs are computed over.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use signature::Signer as _;

use cmpra_abstractions::{
    CredentialDescriptor, NoProtection, PkiBody, PkiHeader, ProtectError, ProtectionAlg,
    ProtectionProvider, ProtectionValue,
};
use cmpra_common::Certificate;

/// Builds a protection provider from configured output credentials.
pub struct ProtectionProviderFactory;

impl ProtectionProviderFactory {
    pub fn create(
        credentials: &CredentialDescriptor,
    ) -> Result<Box<dyn ProtectionProvider>, ProtectError> {
        match credentials {
            CredentialDescriptor::Signature {
                signing_key_der,
                cert_chain,
            } => Ok(Box::new(SignatureProtection::new(
                signing_key_der,
                cert_chain.clone(),
            )?)),
            CredentialDescriptor::SharedSecret { secret, iterations } => {
                Ok(Box::new(PasswordMacProtection::new(secret, *iterations)))
            }
            CredentialDescriptor::None => Ok(Box::new(NoProtection)),
        }
    }
}

/// ECDSA P-256 signature protection with the RA's own credential.
struct SignatureProtection {
    signing_key: p256::ecdsa::SigningKey,
    cert_chain: Vec<Certificate>,
}

impl SignatureProtection {
    fn new(signing_key_der: &[u8], cert_chain: Vec<Certificate>) -> Result<Self, ProtectError> {
        use p256::pkcs8::DecodePrivateKey as _;
        let signing_key = p256::ecdsa::SigningKey::from_pkcs8_der(signing_key_der)
            .map_err(|e| ProtectError::InvalidCredentials(format!("bad P-256 signing key: {e}")))?;
        Ok(Self {
            signing_key,
            cert_chain,
        })
    }
}

impl ProtectionProvider for SignatureProtection {
    fn protection_alg(&self) -> Option<ProtectionAlg> {
        Some(ProtectionAlg::EcdsaP256Sha256)
    }

    fn protect(
        &self,
        header: &PkiHeader,
        body: &PkiBody,
    ) -> Result<Option<ProtectionValue>, ProtectError> {
        let protected = encode_protected_part(header, body)?;
        let sig: p256::ecdsa::Signature = self.signing_key.sign(&protected);
        Ok(Some(sig.to_der().as_bytes().to_vec()))
    }

    fn protecting_certs(&self) -> Vec<Certificate> {
        self.cert_chain.clone()
    }
}

/// Password-based MAC protection: HMAC-SHA256 with a key derived by
/// iterating SHA-256 over the shared secret.
struct PasswordMacProtection {
    derived_key: Vec<u8>,
}

impl PasswordMacProtection {
    fn new(secret: &[u8], iterations: u32) -> Self {
        let mut key = secret.to_vec();
        for _ in 0..iterations.max(1) {
            key = Sha256::digest(&key).to_vec();
        }
        Self { derived_key: key }
    }
}

impl ProtectionProvider for PasswordMacProtection {
    fn protection_alg(&self) -> Option<ProtectionAlg> {
        Some(ProtectionAlg::PasswordBasedMac)
    }

    fn protect(
        &self,
        header: &PkiHeader,
        body: &PkiBody,
    ) -> Result<Option<ProtectionValue>, ProtectError> {
        let protected = encode_protected_part(header, body)?;
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&self.derived_key)
            .map_err(|e| ProtectError::Computation(e.to_string()))?;
        mac.update(&protected);
        Ok(Some(mac.finalize().into_bytes().to_vec()))
    }
}

/// Deterministic CBOR encoding of the protected part (header + body).
pub fn encode_protected_part(header: &PkiHeader, body: &PkiBody) -> Result<Vec<u8>, ProtectError> {
    let mut buf = Vec::new();
    let mut enc = minicbor::Encoder::new(&mut buf);
    encode_into(&mut enc, header, body).map_err(|e| ProtectError::Encoding(e.to_string()))?;
    Ok(buf)
}

fn encode_into(
    enc: &mut minicbor::Encoder<&mut Vec<u8>>,
    header: &PkiHeader,
    body: &PkiBody,
) -> Result<(), minicbor::encode::Error<core::convert::Infallible>> {
    enc.array(2)?;

    enc.array(7)?;
    enc.str(&header.sender)?;
    enc.str(&header.recipient)?;
    enc.bytes(&header.transaction_id)?;
    match &header.sender_nonce {
        Some(nonce) => enc.bytes(nonce)?,
        None => enc.null()?,
    };
    match &header.recip_nonce {
        Some(nonce) => enc.bytes(nonce)?,
        None => enc.null()?,
    };
    match header.protection_alg {
        Some(alg) => enc.u8(protection_alg_tag(alg))?,
        None => enc.null()?,
    };
    match header.message_time {
        Some(time) => enc.i64(time)?,
        None => enc.null()?,
    };

    enc.array(2)?;
    enc.u16(body.body_type)?;
    enc.bytes(&body.content)?;
    Ok(())
}

fn protection_alg_tag(alg: ProtectionAlg) -> u8 {
    match alg {
        ProtectionAlg::EcdsaP256Sha256 => 1,
        ProtectionAlg::PasswordBasedMac => 2,
    }
}
