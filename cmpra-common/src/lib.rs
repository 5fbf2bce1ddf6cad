// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! X.509 certificate and CRL model for the CMP RA trust core.
//!
//! Thin typed wrappers over `x509-parser` exposing exactly the fields the
//! trust and protection layers need. Certificates are immutable once parsed
//! and compare by their exact DER encoding.

pub mod certificate;
pub mod crl;

pub use certificate::{CertParseError, Certificate, KeyUsage};
pub use crl::CertificateRevocationList;
