// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Protocol: Core Types
//!
//! Shared vocabulary for the token ledger workspace:
//!
//! - **identity**: [`Address`](identity::Address), the fixed-width account
//!   identity, and its zero sentinel.
//! - **amount**: the [`Amount`](amount::Amount) integer type and conversions
//!   between base units and human token quantities.
//! - **crypto**: BLAKE3 helpers for address derivation and state digests.
//! - **config**: protocol constants (decimals, default supply cap, limits).
//!
//! The state-transition rules themselves live in `ledger-contracts`.

pub mod amount;
pub mod config;
pub mod crypto;
pub mod identity;

pub use amount::Amount;
pub use identity::Address;
