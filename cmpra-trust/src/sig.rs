// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Certificate-signature verification, dispatched on the signature
//! algorithm OID.

use sha2::{Sha256, Sha384, Sha512};

use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use rsa::pkcs1v15;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::RsaPublicKey;
use signature::Verifier as _;

#[derive(thiserror::Error, Debug)]
pub enum SignatureCheckError {
    /// Environment failure: the algorithm itself is not supported, as
    /// opposed to a signature that fails to verify.
    #[error("unsupported certificate signature algorithm OID: {0}")]
    UnsupportedAlgorithm(String),

    #[error("{0}")]
    BadKeyOrSignature(String),

    #[error("certificate signature verification failed")]
    Invalid,
}

fn rsa_public_key_from_spki(spki_der: &[u8]) -> Result<RsaPublicKey, SignatureCheckError> {
    RsaPublicKey::from_public_key_der(spki_der)
        .map_err(|e| SignatureCheckError::BadKeyOrSignature(format!("bad RSA public key: {e}")))
}

/// Verify that `signature` over `tbs_der` was produced by the key in
/// `issuer_spki_der`, according to `signature_oid`.
pub fn verify_certificate_signature(
    issuer_spki_der: &[u8],
    tbs_der: &[u8],
    signature_oid: &str,
    signature: &[u8],
) -> Result<(), SignatureCheckError> {
    match signature_oid {
        // sha256WithRSAEncryption / sha384WithRSAEncryption / sha512WithRSAEncryption
        "1.2.840.113549.1.1.11" => {
            let key = rsa_public_key_from_spki(issuer_spki_der)?;
            let vk = pkcs1v15::VerifyingKey::<Sha256>::new(key);
            let sig = pkcs1v15::Signature::try_from(signature).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad RSA signature bytes: {e}"))
            })?;
            vk.verify(tbs_der, &sig)
                .map_err(|_| SignatureCheckError::Invalid)
        }
        "1.2.840.113549.1.1.12" => {
            let key = rsa_public_key_from_spki(issuer_spki_der)?;
            let vk = pkcs1v15::VerifyingKey::<Sha384>::new(key);
            let sig = pkcs1v15::Signature::try_from(signature).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad RSA signature bytes: {e}"))
            })?;
            vk.verify(tbs_der, &sig)
                .map_err(|_| SignatureCheckError::Invalid)
        }
        "1.2.840.113549.1.1.13" => {
            let key = rsa_public_key_from_spki(issuer_spki_der)?;
            let vk = pkcs1v15::VerifyingKey::<Sha512>::new(key);
            let sig = pkcs1v15::Signature::try_from(signature).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad RSA signature bytes: {e}"))
            })?;
            vk.verify(tbs_der, &sig)
                .map_err(|_| SignatureCheckError::Invalid)
        }

        // ecdsa-with-SHA256 / SHA384
        "1.2.840.10045.4.3.2" => {
            let pk = p256::PublicKey::from_public_key_der(issuer_spki_der).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad P-256 issuer public key: {e}"))
            })?;
            let ep = pk.to_encoded_point(false);
            let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes()).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad P-256 issuer public key: {e}"))
            })?;
            let sig = p256::ecdsa::Signature::from_der(signature).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad ECDSA signature bytes: {e}"))
            })?;
            vk.verify(tbs_der, &sig)
                .map_err(|_| SignatureCheckError::Invalid)
        }
        "1.2.840.10045.4.3.3" => {
            let pk = p384::PublicKey::from_public_key_der(issuer_spki_der).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad P-384 issuer public key: {e}"))
            })?;
            let ep = pk.to_encoded_point(false);
            let vk = p384::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes()).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad P-384 issuer public key: {e}"))
            })?;
            let sig = p384::ecdsa::Signature::from_der(signature).map_err(|e| {
                SignatureCheckError::BadKeyOrSignature(format!("bad ECDSA signature bytes: {e}"))
            })?;
            vk.verify(tbs_der, &sig)
                .map_err(|_| SignatureCheckError::Invalid)
        }

        _ => Err(SignatureCheckError::UnsupportedAlgorithm(
            signature_oid.to_string(),
        )),
    }
}
