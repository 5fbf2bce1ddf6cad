// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Outgoing message protection for the CMP RA trust core.
//!
//! [`MsgOutputProtector`] decides how messages leaving the RA are
//! cryptographically protected or re-protected, and removes auxiliary
//! certificates that were already transmitted within the same transaction.

mod generator;
mod output_protector;
mod providers;

pub use generator::{build_forwarding_header, generate_and_protect_message};
pub use output_protector::MsgOutputProtector;
pub use providers::{encode_protected_part, ProtectionProviderFactory};
