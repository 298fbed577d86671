//! # Ledger Contracts
//!
//! The owner-gated fungible token ledger. One [`TokenLedger`] holds the
//! balances, delegated allowances, supply counters, and the administrative
//! owner of a single token:
//!
//! - **Token Ledger**: transfers, approvals, delegated transfers, and
//!   capped issuance, each applied atomically.
//! - **Ownership**: the single identity allowed to mint and to hand
//!   ownership over.
//! - **Calls**: operations as serializable data, dispatched by
//!   [`TokenLedger::execute`].
//! - **Shared Ledger**: a locked handle that serializes calls from many
//!   threads.
//!
//! ## Design Principles
//!
//! 1. All monetary arithmetic is checked. A failed `checked_add` or
//!    `checked_sub` rejects the call; no balance, allowance, or supply
//!    counter ever wraps or saturates. The only clamped figure is the
//!    `would_have` detail of a supply-cap rejection.
//! 2. Validate, compute, then write. A rejected call changes nothing.
//! 3. Privileged operations start with an explicit owner check.
//! 4. Every public type is serializable (serde) for logs, files, and wire
//!    transport.

pub mod call;
pub mod errors;
pub mod events;
pub mod ownership;
pub mod shared;
pub mod token_ledger;

pub use call::{Call, Submission};
pub use errors::{ErrorKind, InvariantViolation, LedgerError, LedgerResult};
pub use events::LedgerEvent;
pub use ownership::Ownership;
pub use shared::{Admission, SharedLedger};
pub use token_ledger::{Receipt, TokenLedger, TokenMetadata};
