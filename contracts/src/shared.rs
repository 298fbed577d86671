//! # Shared Ledger
//!
//! A cloneable handle for hosts that submit calls from several threads.
//!
//! Each [`SharedLedger::submit`] holds the lock for exactly one call: it
//! assigns the next admission sequence number, applies the call, and releases
//! the lock. Calls are therefore applied one at a time in admission order, and
//! no reader ever sees a half-applied call.

use std::sync::Arc;

use ledger_protocol::Address;
use parking_lot::Mutex;
use tracing::trace;

use crate::call::{Call, Submission};
use crate::errors::LedgerResult;
use crate::token_ledger::{Receipt, TokenLedger};

/// Outcome of one admitted call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Position in the admission order, starting at 1.
    pub seq: u64,
    /// What the ledger returned for the call.
    pub result: LedgerResult<Receipt>,
}

#[derive(Debug)]
struct Inner {
    ledger: TokenLedger,
    next_seq: u64,
}

/// Thread-safe handle over a single [`TokenLedger`].
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Inner>>,
}

impl SharedLedger {
    pub fn new(ledger: TokenLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                ledger,
                next_seq: 1,
            })),
        }
    }

    /// Admits and applies one call.
    pub fn submit(&self, caller: Address, call: &Call) -> Admission {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        trace!(seq, op = call.name(), "admitted");
        let result = inner.ledger.execute(caller, call);
        Admission { seq, result }
    }

    /// Admits and applies a [`Submission`].
    pub fn submit_submission(&self, submission: &Submission) -> Admission {
        self.submit(submission.caller, &submission.call)
    }

    /// Runs `f` against the ledger under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.ledger)
    }

    /// Number of calls admitted so far, accepted or rejected.
    pub fn admitted(&self) -> u64 {
        self.inner.lock().next_seq - 1
    }

    /// A copy of the current ledger state.
    pub fn snapshot(&self) -> TokenLedger {
        self.read(TokenLedger::clone)
    }
}
