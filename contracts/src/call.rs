//! # Calls
//!
//! A [`Call`] is one ledger operation as data, so hosts can queue, log, or
//! read operations from a file before handing them to
//! [`TokenLedger::execute`]. A [`Submission`] pairs a call with the
//! authenticated identity that issued it.
//!
//! JSON form (amounts are decimal strings or plain integers):
//!
//! ```json
//! {"caller": "0x…", "op": "transfer", "to": "0x…", "amount": "250"}
//! ```

use ledger_protocol::amount::decimal_str;
use ledger_protocol::{Address, Amount};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{ErrorKind, LedgerResult};
use crate::token_ledger::{Receipt, TokenLedger};

/// One state-changing ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    Transfer {
        to: Address,
        #[serde(with = "decimal_str")]
        amount: Amount,
    },
    Approve {
        spender: Address,
        #[serde(with = "decimal_str")]
        amount: Amount,
    },
    IncreaseAllowance {
        spender: Address,
        #[serde(with = "decimal_str")]
        added_value: Amount,
    },
    DecreaseAllowance {
        spender: Address,
        #[serde(with = "decimal_str")]
        subtracted_value: Amount,
    },
    TransferFrom {
        from: Address,
        to: Address,
        #[serde(with = "decimal_str")]
        amount: Amount,
    },
    Mint {
        to: Address,
        #[serde(with = "decimal_str")]
        amount: Amount,
    },
    TransferOwnership {
        new_owner: Address,
    },
}

impl Call {
    /// Operation name as it appears in the `op` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Call::Transfer { .. } => "transfer",
            Call::Approve { .. } => "approve",
            Call::IncreaseAllowance { .. } => "increase_allowance",
            Call::DecreaseAllowance { .. } => "decrease_allowance",
            Call::TransferFrom { .. } => "transfer_from",
            Call::Mint { .. } => "mint",
            Call::TransferOwnership { .. } => "transfer_ownership",
        }
    }

    /// `true` for operations restricted to the owner.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Call::Mint { .. } | Call::TransferOwnership { .. })
    }
}

/// A call together with the identity that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub caller: Address,
    #[serde(flatten)]
    pub call: Call,
}

impl Submission {
    pub fn new(caller: Address, call: Call) -> Self {
        Self { caller, call }
    }
}

impl TokenLedger {
    /// Applies `call` on behalf of `caller`.
    pub fn execute(&mut self, caller: Address, call: &Call) -> LedgerResult<Receipt> {
        let result = match *call {
            Call::Transfer { to, amount } => self.transfer(caller, to, amount),
            Call::Approve { spender, amount } => self.approve(caller, spender, amount),
            Call::IncreaseAllowance {
                spender,
                added_value,
            } => self.increase_allowance(caller, spender, added_value),
            Call::DecreaseAllowance {
                spender,
                subtracted_value,
            } => self.decrease_allowance(caller, spender, subtracted_value),
            Call::TransferFrom { from, to, amount } => self.transfer_from(caller, from, to, amount),
            Call::Mint { to, amount } => self.mint(caller, to, amount),
            Call::TransferOwnership { new_owner } => self.transfer_ownership(caller, new_owner),
        };

        match &result {
            Ok(receipt) => debug!(
                op = call.name(),
                %caller,
                events = receipt.events.len(),
                total_supply = %self.total_supply(),
                "call applied"
            ),
            Err(e) if e.kind() == ErrorKind::Arithmetic => {
                warn!(op = call.name(), %caller, error = %e, "call aborted by arithmetic failure")
            }
            Err(e) => debug!(op = call.name(), %caller, code = e.code(), "call rejected"),
        }
        result
    }

    /// Applies a [`Submission`].
    pub fn execute_submission(&mut self, submission: &Submission) -> LedgerResult<Receipt> {
        self.execute(submission.caller, &submission.call)
    }
}
