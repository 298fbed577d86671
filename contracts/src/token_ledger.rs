//! # Token Ledger Contract
//!
//! A single fungible token with a fixed supply cap and an administrative
//! owner. Any identity can hold, transfer, and delegate spending of its
//! balance. Only the owner can mint new supply or hand ownership over.
//!
//! ## Atomicity
//!
//! Every operation follows the same shape:
//!
//! 1. Check preconditions in the documented order; the first failure is
//!    returned.
//! 2. Compute every new counter value with checked arithmetic.
//! 3. Write the new values and append events.
//!
//! Nothing is written before step 3, so a rejected call (including an
//! internal arithmetic failure) leaves the ledger exactly as it was.
//!
//! ## Invariants
//!
//! - `total_supply == Σ balances`
//! - `total_supply <= max_supply`
//! - balances and allowances are never negative; zero entries are pruned,
//!   so an absent key and a zero value are the same thing.

use ledger_protocol::amount::decimal_str;
use ledger_protocol::config::{
    DEFAULT_MAX_SUPPLY, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH, SNAPSHOT_VERSION, STATE_LEAF_CONTEXT,
    TOKEN_DECIMALS,
};
use ledger_protocol::crypto::{domain_separated_hash, merkle_root};
use ledger_protocol::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{InvariantViolation, LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::ownership::Ownership;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Immutable token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable token name (e.g., "Token").
    pub name: String,
    /// Ticker symbol (e.g., "TKN").
    pub symbol: String,
    /// Decimal places; always [`TOKEN_DECIMALS`].
    pub decimals: u8,
}

impl TokenMetadata {
    fn new(name: &str, symbol: &str) -> Result<Self, String> {
        let metadata = Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: TOKEN_DECIMALS,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    fn validate(&self) -> Result<(), String> {
        check_label("name", &self.name, MAX_NAME_LENGTH)?;
        check_label("symbol", &self.symbol, MAX_SYMBOL_LENGTH)?;
        if self.decimals != TOKEN_DECIMALS {
            return Err(format!(
                "decimals must be {}, got {}",
                TOKEN_DECIMALS, self.decimals
            ));
        }
        Ok(())
    }
}

fn check_label(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(format!(
            "{} is {} characters, limit is {}",
            field, len, max_len
        ));
    }
    Ok(())
}

/// Proof that an operation was applied: the events it appended, in order.
#[must_use = "a receipt signals success; ignoring it hides which events were emitted"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Events appended by this call.
    pub events: Vec<LedgerEvent>,
}

// ---------------------------------------------------------------------------
// TokenLedger
// ---------------------------------------------------------------------------

/// The ledger state and its transition rules.
///
/// All mutation goes through the operation methods; there is no other way to
/// reach the maps. Hosts that share a ledger across threads wrap it in
/// [`SharedLedger`](crate::SharedLedger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "LedgerSnapshot", try_from = "LedgerSnapshot")]
pub struct TokenLedger {
    metadata: TokenMetadata,
    max_supply: Amount,
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    ownership: Ownership,
    events: Vec<LedgerEvent>,
}

impl TokenLedger {
    /// Creates a ledger capped at [`DEFAULT_MAX_SUPPLY`], crediting
    /// `initial_supply` to `creator` and making `creator` the owner.
    ///
    /// # Errors
    ///
    /// See [`with_max_supply`](Self::with_max_supply).
    pub fn new(
        creator: Address,
        name: &str,
        symbol: &str,
        initial_supply: Amount,
    ) -> LedgerResult<Self> {
        Self::with_max_supply(creator, name, symbol, initial_supply, DEFAULT_MAX_SUPPLY)
    }

    /// Creates a ledger with an explicit supply cap.
    ///
    /// # Errors
    ///
    /// Checked in order:
    /// - [`LedgerError::InvalidSupply`] if `initial_supply` is zero.
    /// - [`LedgerError::SupplyExceedsMaximum`] if `initial_supply > max_supply`.
    /// - [`LedgerError::InvalidMetadata`] for an empty or over-long name/symbol.
    /// - [`LedgerError::MintToZeroAddress`] if `creator` is the zero address.
    pub fn with_max_supply(
        creator: Address,
        name: &str,
        symbol: &str,
        initial_supply: Amount,
        max_supply: Amount,
    ) -> LedgerResult<Self> {
        if initial_supply == 0 {
            return Err(LedgerError::InvalidSupply);
        }
        if initial_supply > max_supply {
            return Err(LedgerError::SupplyExceedsMaximum {
                max: max_supply,
                would_have: initial_supply,
            });
        }
        let metadata = TokenMetadata::new(name, symbol).map_err(LedgerError::InvalidMetadata)?;
        if creator.is_zero() {
            return Err(LedgerError::MintToZeroAddress);
        }

        let mut balances = BTreeMap::new();
        balances.insert(creator, initial_supply);

        Ok(Self {
            metadata,
            max_supply,
            total_supply: initial_supply,
            balances,
            allowances: BTreeMap::new(),
            ownership: Ownership::new(creator),
            events: vec![
                LedgerEvent::Transfer {
                    from: Address::ZERO,
                    to: creator,
                    amount: initial_supply,
                },
                LedgerEvent::OwnershipTransferred {
                    previous_owner: Address::ZERO,
                    new_owner: creator,
                },
            ],
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn max_supply(&self) -> Amount {
        self.max_supply
    }

    /// Balance of `account`, zero if it has never held tokens.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// How much `spender` may still move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Accounts with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Number of accounts with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Non-zero allowances as `(owner, spender, amount)`, in key order.
    pub fn allowances(&self) -> impl Iterator<Item = (&Address, &Address, &Amount)> {
        self.allowances
            .iter()
            .map(|((owner, spender), amount)| (owner, spender, amount))
    }

    /// The full event log, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Moves `amount` from `caller` to `to`.
    ///
    /// # Errors
    ///
    /// In order: `TransferToZeroAddress`, `SelfTransfer`, `ZeroAmount`,
    /// `InsufficientBalance`.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> LedgerResult<Receipt> {
        if to.is_zero() {
            return Err(LedgerError::TransferToZeroAddress);
        }
        if to == caller {
            return Err(LedgerError::SelfTransfer);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let (new_from, new_to) = self.plan_move(&caller, &to, amount)?;

        self.write_balance(caller, new_from);
        self.write_balance(to, new_to);
        Ok(self.emit(vec![LedgerEvent::Transfer {
            from: caller,
            to,
            amount,
        }]))
    }

    /// Sets the allowance of `spender` over `caller`'s balance to exactly
    /// `amount`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// In order: `ApproveToZeroAddress`, `SelfApproval`, `ZeroAmount`.
    pub fn approve(&mut self, caller: Address, spender: Address, amount: Amount) -> LedgerResult<Receipt> {
        if spender.is_zero() {
            return Err(LedgerError::ApproveToZeroAddress);
        }
        if spender == caller {
            return Err(LedgerError::SelfApproval);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        self.write_allowance(caller, spender, amount);
        Ok(self.emit(vec![LedgerEvent::Approval {
            owner: caller,
            spender,
            amount,
        }]))
    }

    /// Raises the allowance of `spender` over `caller`'s balance by
    /// `added_value`.
    ///
    /// # Errors
    ///
    /// In order: `ApproveToZeroAddress`, `ZeroAmount`, and
    /// `ArithmeticOverflow` if the result does not fit.
    pub fn increase_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        added_value: Amount,
    ) -> LedgerResult<Receipt> {
        if spender.is_zero() {
            return Err(LedgerError::ApproveToZeroAddress);
        }
        if added_value == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let updated = self
            .allowance(&caller, &spender)
            .checked_add(added_value)
            .ok_or(LedgerError::ArithmeticOverflow("allowance increase"))?;

        self.write_allowance(caller, spender, updated);
        Ok(self.emit(vec![LedgerEvent::Approval {
            owner: caller,
            spender,
            amount: updated,
        }]))
    }

    /// Lowers the allowance of `spender` over `caller`'s balance by
    /// `subtracted_value`.
    ///
    /// # Errors
    ///
    /// In order: `ApproveToZeroAddress`, `ZeroAmount`, `AllowanceBelowZero`.
    pub fn decrease_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        subtracted_value: Amount,
    ) -> LedgerResult<Receipt> {
        if spender.is_zero() {
            return Err(LedgerError::ApproveToZeroAddress);
        }
        if subtracted_value == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let current = self.allowance(&caller, &spender);
        if current < subtracted_value {
            return Err(LedgerError::AllowanceBelowZero {
                current,
                requested: subtracted_value,
            });
        }
        let updated = current
            .checked_sub(subtracted_value)
            .ok_or(LedgerError::ArithmeticOverflow("allowance decrease"))?;

        self.write_allowance(caller, spender, updated);
        Ok(self.emit(vec![LedgerEvent::Approval {
            owner: caller,
            spender,
            amount: updated,
        }]))
    }

    /// Moves `amount` from `from` to `to` on `from`'s behalf, spending
    /// `caller`'s allowance.
    ///
    /// # Errors
    ///
    /// In order: `TransferFromZeroAddress`, `TransferToZeroAddress`,
    /// `SelfTransfer`, `ZeroAmount`, `AllowanceExceeded`,
    /// `InsufficientBalance`.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> LedgerResult<Receipt> {
        if from.is_zero() {
            return Err(LedgerError::TransferFromZeroAddress);
        }
        if to.is_zero() {
            return Err(LedgerError::TransferToZeroAddress);
        }
        if to == from {
            return Err(LedgerError::SelfTransfer);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let allowed = self.allowance(&from, &caller);
        if allowed < amount {
            return Err(LedgerError::AllowanceExceeded {
                allowed,
                requested: amount,
            });
        }
        let new_allowance = allowed
            .checked_sub(amount)
            .ok_or(LedgerError::ArithmeticOverflow("allowance spend"))?;
        let (new_from, new_to) = self.plan_move(&from, &to, amount)?;

        self.write_allowance(from, caller, new_allowance);
        self.write_balance(from, new_from);
        self.write_balance(to, new_to);
        Ok(self.emit(vec![LedgerEvent::Transfer { from, to, amount }]))
    }

    /// Issues `amount` new tokens to `to`. Owner only.
    ///
    /// # Errors
    ///
    /// In order: `NotOwner`, `MintToZeroAddress`, `MintToSelf`, `ZeroAmount`,
    /// `SupplyExceedsMaximum`.
    pub fn mint(&mut self, caller: Address, to: Address, amount: Amount) -> LedgerResult<Receipt> {
        self.ownership.ensure_owner(&caller)?;
        if to.is_zero() {
            return Err(LedgerError::MintToZeroAddress);
        }
        if to == caller {
            return Err(LedgerError::MintToSelf);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let new_total = match self.total_supply.checked_add(amount) {
            Some(total) if total <= self.max_supply => total,
            _ => {
                // `would_have` is only a report; it is clamped when the
                // true sum does not fit in an Amount.
                return Err(LedgerError::SupplyExceedsMaximum {
                    max: self.max_supply,
                    would_have: self.total_supply.saturating_add(amount),
                })
            }
        };
        let new_to = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("mint credit"))?;

        self.total_supply = new_total;
        self.write_balance(to, new_to);
        Ok(self.emit(vec![LedgerEvent::Transfer {
            from: Address::ZERO,
            to,
            amount,
        }]))
    }

    /// Hands ownership to `new_owner`. Owner only.
    ///
    /// # Errors
    ///
    /// In order: `NotOwner`, `NewOwnerIsZeroAddress`, `NewOwnerIsCurrentOwner`.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> LedgerResult<Receipt> {
        let previous_owner = self.ownership.transfer(&caller, new_owner)?;
        Ok(self.emit(vec![LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        }]))
    }

    // -----------------------------------------------------------------------
    // Integrity
    // -----------------------------------------------------------------------

    /// Verifies the global accounting invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.metadata.validate().map_err(InvariantViolation::Metadata)?;

        if self.ownership.owner().is_zero() {
            return Err(InvariantViolation::ZeroOwner);
        }
        if self.balances.contains_key(&Address::ZERO) {
            return Err(InvariantViolation::ZeroAddressEntry("balances"));
        }
        if self
            .allowances
            .keys()
            .any(|(owner, spender)| owner.is_zero() || spender.is_zero())
        {
            return Err(InvariantViolation::ZeroAddressEntry("allowances"));
        }

        let sum = self
            .balances
            .values()
            .try_fold(0 as Amount, |acc, v| acc.checked_add(*v))
            .ok_or(InvariantViolation::BalanceSumOverflow {
                total_supply: self.total_supply,
            })?;
        if sum != self.total_supply {
            return Err(InvariantViolation::SupplyMismatch {
                total_supply: self.total_supply,
                sum,
            });
        }
        if self.total_supply > self.max_supply {
            return Err(InvariantViolation::CapExceeded {
                total_supply: self.total_supply,
                max_supply: self.max_supply,
            });
        }
        Ok(())
    }

    /// Digest of the full ledger state.
    ///
    /// A Merkle root over one leaf per metadata field group, supply pair,
    /// owner, balance, and allowance, plus the event count. Two ledgers have
    /// the same digest exactly when every observable value is equal.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut leaves = Vec::with_capacity(4 + self.balances.len() + self.allowances.len());
        leaves.push(leaf(&[
            b"metadata",
            self.metadata.name.as_bytes(),
            self.metadata.symbol.as_bytes(),
            &[self.metadata.decimals],
        ]));
        leaves.push(leaf(&[
            b"supply",
            &self.total_supply.to_be_bytes(),
            &self.max_supply.to_be_bytes(),
        ]));
        leaves.push(leaf(&[b"owner", self.ownership.owner().as_bytes()]));
        for (account, amount) in &self.balances {
            leaves.push(leaf(&[b"balance", account.as_bytes(), &amount.to_be_bytes()]));
        }
        for ((owner, spender), amount) in &self.allowances {
            leaves.push(leaf(&[
                b"allowance",
                owner.as_bytes(),
                spender.as_bytes(),
                &amount.to_be_bytes(),
            ]));
        }
        leaves.push(leaf(&[b"events", &(self.events.len() as u64).to_be_bytes()]));

        merkle_root(&leaves)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Computes post-move balances for `from` and `to` without writing them.
    fn plan_move(&self, from: &Address, to: &Address, amount: Amount) -> LedgerResult<(Amount, Amount)> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        let new_from = available
            .checked_sub(amount)
            .ok_or(LedgerError::ArithmeticOverflow("balance debit"))?;
        let new_to = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("balance credit"))?;
        Ok((new_from, new_to))
    }

    fn write_balance(&mut self, account: Address, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn write_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn emit(&mut self, events: Vec<LedgerEvent>) -> Receipt {
        self.events.extend(events.iter().cloned());
        Receipt { events }
    }
}

/// Hashes length-prefixed `parts` into one state leaf.
fn leaf(parts: &[&[u8]]) -> [u8; 32] {
    let mut buf = Vec::new();
    for part in parts {
        buf.extend_from_slice(&(part.len() as u32).to_be_bytes());
        buf.extend_from_slice(part);
    }
    domain_separated_hash(STATE_LEAF_CONTEXT, &buf)
}

// ---------------------------------------------------------------------------
// Snapshot form
// ---------------------------------------------------------------------------

/// Wire form of a [`TokenLedger`]. Maps become sorted entry lists and amounts
/// become decimal strings; deserialization re-checks every invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerSnapshot {
    version: u32,
    metadata: TokenMetadata,
    #[serde(with = "decimal_str")]
    max_supply: Amount,
    #[serde(with = "decimal_str")]
    total_supply: Amount,
    owner: Address,
    balances: Vec<BalanceEntry>,
    allowances: Vec<AllowanceEntry>,
    #[serde(default)]
    events: Vec<LedgerEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BalanceEntry {
    account: Address,
    #[serde(with = "decimal_str")]
    amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AllowanceEntry {
    owner: Address,
    spender: Address,
    #[serde(with = "decimal_str")]
    amount: Amount,
}

impl From<TokenLedger> for LedgerSnapshot {
    fn from(ledger: TokenLedger) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            metadata: ledger.metadata,
            max_supply: ledger.max_supply,
            total_supply: ledger.total_supply,
            owner: ledger.ownership.owner(),
            balances: ledger
                .balances
                .into_iter()
                .map(|(account, amount)| BalanceEntry { account, amount })
                .collect(),
            allowances: ledger
                .allowances
                .into_iter()
                .map(|((owner, spender), amount)| AllowanceEntry {
                    owner,
                    spender,
                    amount,
                })
                .collect(),
            events: ledger.events,
        }
    }
}

impl TryFrom<LedgerSnapshot> for TokenLedger {
    type Error = InvariantViolation;

    fn try_from(snapshot: LedgerSnapshot) -> Result<Self, Self::Error> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(InvariantViolation::SnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        // Duplicates are checked before zero entries are pruned, so a key
        // listed twice is rejected even when one copy is zero.
        let mut balances = BTreeMap::new();
        for entry in snapshot.balances {
            if balances.insert(entry.account, entry.amount).is_some() {
                return Err(InvariantViolation::DuplicateEntry("balances"));
            }
        }
        balances.retain(|_, amount| *amount > 0);

        let mut allowances = BTreeMap::new();
        for entry in snapshot.allowances {
            if allowances
                .insert((entry.owner, entry.spender), entry.amount)
                .is_some()
            {
                return Err(InvariantViolation::DuplicateEntry("allowances"));
            }
        }
        allowances.retain(|_, amount| *amount > 0);

        let ledger = TokenLedger {
            metadata: snapshot.metadata,
            max_supply: snapshot.max_supply,
            total_supply: snapshot.total_supply,
            balances,
            allowances,
            ownership: Ownership::new(snapshot.owner),
            events: snapshot.events,
        };
        ledger.check_invariants()?;
        Ok(ledger)
    }
}
