//! # Protocol Configuration & Constants
//!
//! Every fixed number the ledger relies on lives here: token precision, the
//! default supply cap, metadata limits, and the hashing contexts used for
//! address derivation and state digests.
//!
//! Runtime knobs (file paths, log format) belong to the node's CLI, not here.
//! These values are part of the ledger's observable behavior; changing one
//! changes what a replayed operation log produces.

use crate::amount::Amount;

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// Ledger protocol version. Bumped when state-transition rules change.
pub const PROTOCOL_VERSION: &str = "0.1.0";

/// Version tag written into every state snapshot. Loading a snapshot with a
/// different tag is refused rather than guessed at.
pub const SNAPSHOT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Token Parameters
// ---------------------------------------------------------------------------

/// Decimal places of every token managed by the ledger. Fixed, like ERC-20's
/// conventional 18.
pub const TOKEN_DECIMALS: u8 = 18;

/// Base units in one whole token (`10^TOKEN_DECIMALS`).
pub const BASE_UNITS_PER_TOKEN: Amount = 1_000_000_000_000_000_000;

/// Default supply cap: one billion whole tokens, in base units.
pub const DEFAULT_MAX_SUPPLY: Amount = 1_000_000_000 * BASE_UNITS_PER_TOKEN;

/// Longest accepted token name, in characters.
pub const MAX_NAME_LENGTH: usize = 64;

/// Longest accepted token symbol, in characters.
pub const MAX_SYMBOL_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Width of an [`Address`](crate::identity::Address) in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Prefix of the textual address form.
pub const ADDRESS_PREFIX: &str = "0x";

// ---------------------------------------------------------------------------
// Hashing Contexts
// ---------------------------------------------------------------------------

/// BLAKE3 `derive_key` context for label-derived addresses.
pub const ADDRESS_DERIVATION_CONTEXT: &str = "ledger 2026-10 address derivation v1";

/// BLAKE3 `derive_key` context for state digest leaves.
pub const STATE_LEAF_CONTEXT: &str = "ledger 2026-10 state leaf v1";
