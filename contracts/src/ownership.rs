//! # Ownership Guard
//!
//! Holds the single administrative identity. Privileged operations call
//! [`Ownership::ensure_owner`] before touching anything else, so an
//! unauthorized caller learns nothing beyond `NotOwner`.

use ledger_protocol::Address;

use crate::errors::{LedgerError, LedgerResult};

/// The ledger's administrative owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    /// Creates a guard owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// `true` if `caller` is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Rejects any caller but the owner with [`LedgerError::NotOwner`].
    pub fn ensure_owner(&self, caller: &Address) -> LedgerResult<()> {
        if !self.is_owner(caller) {
            return Err(LedgerError::NotOwner);
        }
        Ok(())
    }

    /// Validates a hand-over from `caller` to `new_owner` without applying it.
    ///
    /// Checked in order: caller is owner, new owner is not zero, new owner
    /// differs from the current one.
    pub fn check_transfer(&self, caller: &Address, new_owner: &Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(LedgerError::NewOwnerIsZeroAddress);
        }
        if self.is_owner(new_owner) {
            return Err(LedgerError::NewOwnerIsCurrentOwner);
        }
        Ok(())
    }

    /// Hands ownership to `new_owner`, returning the previous owner.
    pub fn transfer(&mut self, caller: &Address, new_owner: Address) -> LedgerResult<Address> {
        self.check_transfer(caller, &new_owner)?;
        let previous = self.owner;
        self.owner = new_owner;
        Ok(previous)
    }
}
