// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared interfaces and datatypes for the CMP RA trust core crates.
//!
//! This crate exists to prevent circular dependencies across:
//! - trust-chain validation (`cmpra-trust`)
//! - output message protection (`cmpra-protection`)
//!
//! It is intentionally kept small and stable. It carries the collaborator
//! contracts the core consumes (verification configuration, protection
//! configuration, per-transaction persistency) and the immutable PKI message
//! value model.

pub mod contexts;
pub mod message;
pub mod protection;

pub use contexts::{
    MessageProtectionContext, PersistencyContext, RevocationCheckerOption, VerificationContext,
};
pub use message::{PkiBody, PkiHeader, PkiMessage, ProtectionValue};
pub use protection::{
    CredentialDescriptor, NoProtection, ProtectError, ProtectionAlg, ProtectionProvider,
    ReprotectMode,
};
