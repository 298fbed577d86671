//! # Identity Module
//!
//! Account identities for the ledger. Authentication (keys, signatures) is
//! done before a call reaches the ledger; by the time an operation runs, the
//! caller is just an [`Address`].

pub mod address;

pub use address::{Address, AddressError};
