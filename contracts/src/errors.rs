//! # Ledger Errors
//!
//! Every rejected call maps to exactly one [`LedgerError`] variant. The
//! variant name is the stable reason code reported to callers
//! ([`LedgerError::code`]); the `Display` text is for humans.

use ledger_protocol::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller supplied bad input.
    Validation,
    /// The caller lacks the privilege the operation requires.
    Authorization,
    /// A fixed-width counter would have wrapped. Never expected when the
    /// validation rules hold; indicates a broken internal contract.
    Arithmetic,
}

/// Reasons a ledger operation is rejected.
///
/// A rejected operation never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Construction with an initial supply of zero.
    #[error("initial supply must be greater than zero")]
    InvalidSupply,

    /// Construction metadata is empty or too long.
    #[error("invalid token metadata: {0}")]
    InvalidMetadata(String),

    /// Issuing would push total supply past the cap.
    #[error("supply cap exceeded: max {max}, would have {would_have}")]
    SupplyExceedsMaximum {
        /// The ledger's maximum supply.
        max: Amount,
        /// Total supply had the operation been applied, clamped to
        /// `Amount::MAX` when the true value does not fit.
        would_have: Amount,
    },

    #[error("transfer to the zero address")]
    TransferToZeroAddress,

    #[error("transfer from the zero address")]
    TransferFromZeroAddress,

    #[error("cannot transfer to self")]
    SelfTransfer,

    #[error("approve to the zero address")]
    ApproveToZeroAddress,

    #[error("cannot approve self")]
    SelfApproval,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// The debited account holds less than the amount.
    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        /// Current balance of the debited account.
        available: Amount,
        /// Amount the call tried to move.
        required: Amount,
    },

    /// `transfer_from` beyond the spender's allowance.
    #[error("transfer amount exceeds allowance: allowed {allowed}, requested {requested}")]
    AllowanceExceeded {
        /// Current allowance for (from, caller).
        allowed: Amount,
        /// Amount the spender tried to move.
        requested: Amount,
    },

    /// `decrease_allowance` below zero.
    #[error("decreased allowance below zero: current {current}, requested {requested}")]
    AllowanceBelowZero {
        /// Current allowance.
        current: Amount,
        /// Requested decrease.
        requested: Amount,
    },

    #[error("caller is not the owner")]
    NotOwner,

    #[error("mint to the zero address")]
    MintToZeroAddress,

    #[error("owner cannot mint to self")]
    MintToSelf,

    #[error("new owner is the zero address")]
    NewOwnerIsZeroAddress,

    #[error("new owner is the current owner")]
    NewOwnerIsCurrentOwner,

    /// A checked add/sub failed past the validation rules.
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),
}

impl LedgerError {
    /// Stable reason code (the variant name).
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidSupply => "InvalidSupply",
            LedgerError::InvalidMetadata(_) => "InvalidMetadata",
            LedgerError::SupplyExceedsMaximum { .. } => "SupplyExceedsMaximum",
            LedgerError::TransferToZeroAddress => "TransferToZeroAddress",
            LedgerError::TransferFromZeroAddress => "TransferFromZeroAddress",
            LedgerError::SelfTransfer => "SelfTransfer",
            LedgerError::ApproveToZeroAddress => "ApproveToZeroAddress",
            LedgerError::SelfApproval => "SelfApproval",
            LedgerError::ZeroAmount => "ZeroAmount",
            LedgerError::InsufficientBalance { .. } => "InsufficientBalance",
            LedgerError::AllowanceExceeded { .. } => "AllowanceExceeded",
            LedgerError::AllowanceBelowZero { .. } => "AllowanceBelowZero",
            LedgerError::NotOwner => "NotOwner",
            LedgerError::MintToZeroAddress => "MintToZeroAddress",
            LedgerError::MintToSelf => "MintToSelf",
            LedgerError::NewOwnerIsZeroAddress => "NewOwnerIsZeroAddress",
            LedgerError::NewOwnerIsCurrentOwner => "NewOwnerIsCurrentOwner",
            LedgerError::ArithmeticOverflow(_) => "ArithmeticOverflow",
        }
    }

    /// The class this rejection belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotOwner => ErrorKind::Authorization,
            LedgerError::ArithmeticOverflow(_) => ErrorKind::Arithmetic,
            _ => ErrorKind::Validation,
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// A global accounting invariant does not hold.
///
/// Reported by [`TokenLedger::check_invariants`](crate::TokenLedger::check_invariants)
/// and when a snapshot is loaded. Live operations cannot produce this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Σ balances ≠ total supply.
    #[error("total supply {total_supply} does not equal sum of balances {sum}")]
    SupplyMismatch {
        /// Recorded total supply.
        total_supply: Amount,
        /// Sum over the balance map.
        sum: Amount,
    },

    /// Σ balances does not fit in an [`Amount`], so it cannot equal total supply.
    #[error("sum of balances overflows; total supply is {total_supply}")]
    BalanceSumOverflow {
        /// Recorded total supply.
        total_supply: Amount,
    },

    /// total supply > cap.
    #[error("total supply {total_supply} exceeds maximum {max_supply}")]
    CapExceeded {
        /// Recorded total supply.
        total_supply: Amount,
        /// Recorded cap.
        max_supply: Amount,
    },

    /// The owner is the zero address.
    #[error("owner is the zero address")]
    ZeroOwner,

    /// A balance or allowance is keyed by the zero address.
    #[error("zero address present in {0}")]
    ZeroAddressEntry(&'static str),

    /// The same key appears twice in a snapshot map.
    #[error("duplicate entry in {0}")]
    DuplicateEntry(&'static str),

    /// Metadata failed validation.
    #[error("invalid metadata: {0}")]
    Metadata(String),

    /// The snapshot was written by an incompatible version.
    #[error("unsupported snapshot version {found}, expected {expected}")]
    SnapshotVersion {
        /// Version in the snapshot.
        found: u32,
        /// Version this build writes.
        expected: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variant_names() {
        assert_eq!(LedgerError::ZeroAmount.code(), "ZeroAmount");
        assert_eq!(
            LedgerError::InsufficientBalance {
                available: 1,
                required: 2
            }
            .code(),
            "InsufficientBalance"
        );
        assert_eq!(LedgerError::NotOwner.code(), "NotOwner");
    }

    #[test]
    fn kinds_partition_errors() {
        assert_eq!(LedgerError::NotOwner.kind(), ErrorKind::Authorization);
        assert_eq!(
            LedgerError::ArithmeticOverflow("mint").kind(),
            ErrorKind::Arithmetic
        );
        assert_eq!(LedgerError::SelfTransfer.kind(), ErrorKind::Validation);
    }

    #[test]
    fn display_carries_context() {
        let err = LedgerError::AllowanceExceeded {
            allowed: 50,
            requested: 100,
        };
        assert_eq!(
            err.to_string(),
            "transfer amount exceeds allowance: allowed 50, requested 100"
        );
        let err = LedgerError::AllowanceBelowZero {
            current: 100,
            requested: 150,
        };
        assert!(err.to_string().starts_with("decreased allowance below zero"));
    }

    #[test]
    fn invariant_violation_display() {
        let v = InvariantViolation::SupplyMismatch {
            total_supply: 10,
            sum: 9,
        };
        assert!(v.to_string().contains("10"));
    }
}
