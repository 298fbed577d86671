//! # Hashing Primitives
//!
//! The ledger needs exactly one kind of cryptography: hashing. Addresses for
//! tooling are derived from labels, and the ledger state is summarized into a
//! single digest so two states can be compared without walking every map.
//!
//! Everything here is a thin wrapper around the `blake3` crate. No signing
//! lives in this workspace; callers arrive already authenticated.

pub mod hash;

pub use hash::{blake3_hash_multi, domain_separated_hash, merkle_root};
