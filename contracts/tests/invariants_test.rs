//! Property tests: random call sequences from a small pool of identities.
//!
//! After every call, accepted or not, the accounting invariants must hold.
//! A rejected call must leave the state digest untouched; an accepted one
//! must append exactly the events its receipt reports.

use ledger_contracts::{Call, TokenLedger};
use ledger_protocol::{Address, Amount};
use proptest::prelude::*;

const CAP: Amount = 1_000_000;

fn pool() -> Vec<Address> {
    let mut ids = vec![Address::ZERO];
    ids.extend((0..4).map(|i| Address::derive(&format!("holder-{i}"))));
    ids
}

fn amount() -> impl Strategy<Value = Amount> {
    prop_oneof![
        Just(0 as Amount),
        1..1_000 as Amount,
        1..CAP,
        Just(Amount::MAX),
    ]
}

fn call() -> impl Strategy<Value = (usize, Call)> {
    let ids = pool();
    let n = ids.len();
    let id = move || {
        let ids = ids.clone();
        (0..n).prop_map(move |i| ids[i])
    };
    let ops = prop_oneof![
        (id(), amount()).prop_map(|(to, amount)| Call::Transfer { to, amount }),
        (id(), amount()).prop_map(|(spender, amount)| Call::Approve { spender, amount }),
        (id(), amount()).prop_map(|(spender, added_value)| Call::IncreaseAllowance {
            spender,
            added_value
        }),
        (id(), amount()).prop_map(|(spender, subtracted_value)| Call::DecreaseAllowance {
            spender,
            subtracted_value
        }),
        (id(), id(), amount()).prop_map(|(from, to, amount)| Call::TransferFrom { from, to, amount }),
        (id(), amount()).prop_map(|(to, amount)| Call::Mint { to, amount }),
        id().prop_map(|new_owner| Call::TransferOwnership { new_owner }),
    ];
    (0..n, ops)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_sequences_preserve_invariants(
        calls in prop::collection::vec(call(), 1..64)
    ) {
        let ids = pool();
        let mut ledger = TokenLedger::with_max_supply(ids[1], "Token", "TKN", CAP / 2, CAP).unwrap();

        for (caller_idx, call) in calls {
            let caller = ids[caller_idx];
            let before = ledger.state_digest();
            let events_before = ledger.events().len();

            match ledger.execute(caller, &call) {
                Ok(receipt) => {
                    prop_assert_eq!(ledger.events().len(), events_before + receipt.events.len());
                    prop_assert_eq!(&ledger.events()[events_before..], &receipt.events[..]);
                }
                Err(_) => {
                    prop_assert_eq!(ledger.state_digest(), before);
                    prop_assert_eq!(ledger.events().len(), events_before);
                }
            }

            prop_assert!(ledger.check_invariants().is_ok());
            prop_assert!(ledger.total_supply() <= ledger.max_supply());
            let sum: Amount = ledger.holders().map(|(_, v)| *v).sum();
            prop_assert_eq!(sum, ledger.total_supply());
            prop_assert_eq!(ledger.balance_of(&Address::ZERO), 0);
            prop_assert!(!ledger.owner().is_zero());
        }
    }

    #[test]
    fn snapshot_survives_random_history(
        calls in prop::collection::vec(call(), 1..32)
    ) {
        let ids = pool();
        let mut ledger = TokenLedger::with_max_supply(ids[1], "Token", "TKN", CAP / 2, CAP).unwrap();
        for (caller_idx, call) in calls {
            let _ = ledger.execute(ids[caller_idx], &call);
        }
        let json = serde_json::to_string(&ledger).unwrap();
        let back: TokenLedger = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.state_digest(), ledger.state_digest());
    }
}
