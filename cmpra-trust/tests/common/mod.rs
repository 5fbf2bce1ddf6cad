// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared test fixtures: rcgen-backed certificate chains and a scriptable
//! verification context.

#![allow(dead_code)]

use std::collections::HashSet;

use cmpra_abstractions::{RevocationCheckerOption, VerificationContext};
use cmpra_common::{Certificate, CertificateRevocationList};
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose, SerialNumber,
};

pub struct TestCert {
    pub rc: rcgen::Certificate,
    pub key: KeyPair,
    pub parsed: Certificate,
}

fn params(cn: &str, serial: u8) -> CertificateParams {
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    params.distinguished_name = dn;
    params.serial_number = Some(SerialNumber::from(vec![serial]));
    params
}

pub fn root_ca(cn: &str, serial: u8) -> TestCert {
    let key = KeyPair::generate().unwrap();
    let mut params = params(cn, serial);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    let rc = params.self_signed(&key).unwrap();
    let parsed = Certificate::from_der(rc.der()).unwrap();
    TestCert { rc, key, parsed }
}

/// Root CA signing with Ed25519, an algorithm the path builder does not
/// support.
pub fn ed25519_root_ca(cn: &str, serial: u8) -> TestCert {
    let key = KeyPair::generate_for(&rcgen::PKCS_ED25519).unwrap();
    let mut params = params(cn, serial);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    let rc = params.self_signed(&key).unwrap();
    let parsed = Certificate::from_der(rc.der()).unwrap();
    TestCert { rc, key, parsed }
}

pub fn intermediate_ca(cn: &str, serial: u8, issuer: &TestCert) -> TestCert {
    intermediate_ca_with_usages(
        cn,
        serial,
        issuer,
        &[KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign],
    )
}

pub fn intermediate_ca_with_usages(
    cn: &str,
    serial: u8,
    issuer: &TestCert,
    usages: &[KeyUsagePurpose],
) -> TestCert {
    let key = KeyPair::generate().unwrap();
    let mut params = params(cn, serial);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = usages.to_vec();
    let rc = params.signed_by(&key, &issuer.rc, &issuer.key).unwrap();
    let parsed = Certificate::from_der(rc.der()).unwrap();
    TestCert { rc, key, parsed }
}

pub fn leaf(cn: &str, serial: u8, issuer: &TestCert) -> TestCert {
    leaf_with_usages(cn, serial, issuer, &[KeyUsagePurpose::DigitalSignature])
}

pub fn leaf_with_usages(
    cn: &str,
    serial: u8,
    issuer: &TestCert,
    usages: &[KeyUsagePurpose],
) -> TestCert {
    let key = KeyPair::generate().unwrap();
    let mut params = params(cn, serial);
    // rcgen only serializes the extensions block when something besides
    // key_usages is set; ExplicitNoCa forces it so the KeyUsage extension
    // actually lands in the certificate.
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = usages.to_vec();
    let rc = params.signed_by(&key, &issuer.rc, &issuer.key).unwrap();
    let parsed = Certificate::from_der(rc.der()).unwrap();
    TestCert { rc, key, parsed }
}

pub fn expired_leaf(cn: &str, serial: u8, issuer: &TestCert) -> TestCert {
    let key = KeyPair::generate().unwrap();
    let mut params = params(cn, serial);
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.not_before = rcgen::date_time_ymd(2020, 1, 1);
    params.not_after = rcgen::date_time_ymd(2021, 1, 1);
    let rc = params.signed_by(&key, &issuer.rc, &issuer.key).unwrap();
    let parsed = Certificate::from_der(rc.der()).unwrap();
    TestCert { rc, key, parsed }
}

/// CRL issued by `issuer` revoking the given serials.
pub fn crl_for(issuer: &TestCert, revoked_serials: &[&[u8]]) -> CertificateRevocationList {
    build_crl(issuer, revoked_serials, (2036, 1, 1))
}

/// CRL whose next-update already passed, revoking nothing.
pub fn stale_crl_for(issuer: &TestCert) -> CertificateRevocationList {
    build_crl(issuer, &[], (2020, 2, 1))
}

fn build_crl(
    issuer: &TestCert,
    revoked_serials: &[&[u8]],
    next_update: (i32, u8, u8),
) -> CertificateRevocationList {
    let (year, month, day) = next_update;
    let crl_params = rcgen::CertificateRevocationListParams {
        this_update: rcgen::date_time_ymd(2020, 1, 1),
        next_update: rcgen::date_time_ymd(year, month, day),
        crl_number: SerialNumber::from(vec![0x01]),
        issuing_distribution_point: None,
        revoked_certs: revoked_serials
            .iter()
            .map(|serial| rcgen::RevokedCertParams {
                serial_number: SerialNumber::from(serial.to_vec()),
                revocation_time: rcgen::date_time_ymd(2026, 1, 1),
                reason_code: Some(rcgen::RevocationReason::KeyCompromise),
                invalidity_date: None,
            })
            .collect(),
        key_identifier_method: rcgen::KeyIdMethod::Sha256,
    };
    let signed = crl_params.signed_by(&issuer.rc, &issuer.key).unwrap();
    CertificateRevocationList::from_der(signed.der()).unwrap()
}

/// Scriptable verification context.
#[derive(Default)]
pub struct TestContext {
    pub trust: Option<Vec<Certificate>>,
    pub additional: Vec<Certificate>,
    pub crls: Vec<CertificateRevocationList>,
    pub aia: bool,
    pub cdp: bool,
    pub ocsp: Option<String>,
    pub options: Option<HashSet<RevocationCheckerOption>>,
    pub rejected_leaves: Vec<Certificate>,
    pub rejected_intermediates: Vec<Certificate>,
}

impl TestContext {
    pub fn trusting(anchors: &[&Certificate]) -> Self {
        Self {
            trust: Some(anchors.iter().map(|c| (*c).clone()).collect()),
            ..Self::default()
        }
    }
}

impl VerificationContext for TestContext {
    fn trusted_certificates(&self) -> Option<Vec<Certificate>> {
        self.trust.clone()
    }

    fn is_leaf_cert_acceptable(&self, cert: &Certificate) -> bool {
        !self.rejected_leaves.contains(cert)
    }

    fn is_intermediate_cert_acceptable(&self, cert: &Certificate) -> bool {
        !self.rejected_intermediates.contains(cert)
    }

    fn additional_certs(&self) -> Vec<Certificate> {
        self.additional.clone()
    }

    fn crls(&self) -> Vec<CertificateRevocationList> {
        self.crls.clone()
    }

    fn is_aia_enabled(&self) -> bool {
        self.aia
    }

    fn is_cdp_enabled(&self) -> bool {
        self.cdp
    }

    fn ocsp_responder(&self) -> Option<String> {
        self.ocsp.clone()
    }

    fn revocation_checker_options(&self) -> Option<HashSet<RevocationCheckerOption>> {
        self.options.clone()
    }
}
