//! # Ledger Events
//!
//! Notifications appended by successful operations. The log is append-only
//! and ordered; a rejected call appends nothing.
//!
//! - `Transfer` for every balance movement. Issuance uses `from = zero`.
//! - `Approval` for every allowance write, carrying the resulting allowance.
//! - `OwnershipTransferred` when the owner changes (including the initial
//!   assignment at construction, `previous_owner = zero`).

use ledger_protocol::amount::decimal_str;
use ledger_protocol::{Address, Amount};
use serde::{Deserialize, Serialize};

/// A single ledger notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Tokens moved from `from` to `to`.
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "decimal_str")]
        amount: Amount,
    },
    /// `owner` authorized `spender` to move up to `amount`.
    Approval {
        owner: Address,
        spender: Address,
        #[serde(with = "decimal_str")]
        amount: Amount,
    },
    /// Administrative ownership changed hands.
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl LedgerEvent {
    /// Short name of the event, for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "transfer",
            LedgerEvent::Approval { .. } => "approval",
            LedgerEvent::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }

    /// `true` for a `Transfer` whose `from` is the zero address.
    pub fn is_mint(&self) -> bool {
        matches!(self, LedgerEvent::Transfer { from, .. } if from.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_serializes_with_tag_and_string_amount() {
        let event = LedgerEvent::Transfer {
            from: Address::ZERO,
            to: Address::derive("alice"),
            amount: 10u128.pow(27),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "transfer");
        assert_eq!(json["amount"], "1000000000000000000000000000");
        let back: LedgerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn mint_detection() {
        let mint = LedgerEvent::Transfer {
            from: Address::ZERO,
            to: Address::derive("bob"),
            amount: 1,
        };
        let plain = LedgerEvent::Transfer {
            from: Address::derive("alice"),
            to: Address::derive("bob"),
            amount: 1,
        };
        assert!(mint.is_mint());
        assert!(!plain.is_mint());
        assert_eq!(plain.name(), "transfer");
    }

    #[test]
    fn ownership_event_roundtrip() {
        let event = LedgerEvent::OwnershipTransferred {
            previous_owner: Address::derive("alice"),
            new_owner: Address::derive("bob"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"ownership_transferred\""));
        assert_eq!(serde_json::from_str::<LedgerEvent>(&json).unwrap(), event);
    }
}
