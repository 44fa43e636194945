//! # Network Configuration & Constants
//!
//! Every magic number the transaction pipeline needs lives here, and every
//! number that differs between networks or protocol eras is carried in a
//! value rather than compiled in. The mainnet Shelley figures are exposed as
//! presets ([`NetworkConfig::mainnet`]) so nothing downstream has to know them.
//!
//! ```text
//! NetworkConfig
//! ├── name             "mainnet", "testnet", ...
//! ├── protocol_params  ProtocolParams  (fees, dust threshold, deposits)
//! └── slots            SlotConfig      (epoch start, slot margin for TTL)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TxError};

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 verification key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Blake2b-256 digest length, used for transaction IDs and metadata hashes.
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Fee Parameters
// ---------------------------------------------------------------------------

/// Provisional fee written into a body before its size is measured.
///
/// Any value that encodes at the same width as a realistic final fee works.
/// 200_000 lands in the 4-byte CBOR integer range, the same as every fee the
/// mainnet formula can produce for a transaction within the ledger's size
/// limit, so the measured size matches the final one.
pub const FEE_PLACEHOLDER: u64 = 200_000;

/// Mainnet Shelley dust threshold, in lovelace.
pub const MAINNET_MINIMUM_UTXO_VALUE: u64 = 1_000_000;

/// Mainnet Shelley per-byte fee coefficient.
pub const MAINNET_MIN_FEE_A: u64 = 44;

/// Mainnet Shelley constant fee term.
pub const MAINNET_MIN_FEE_B: u64 = 155_381;

pub const MAINNET_POOL_DEPOSIT: u64 = 500_000_000;
pub const MAINNET_KEY_DEPOSIT: u64 = 2_000_000;

// ---------------------------------------------------------------------------
// Slot Parameters
// ---------------------------------------------------------------------------

/// First slot of the Shelley era on mainnet.
pub const MAINNET_SHELLEY_START_SLOT: u64 = 4_924_800;

/// Unix timestamp (seconds) of [`MAINNET_SHELLEY_START_SLOT`].
pub const MAINNET_SHELLEY_START_TIMESTAMP: i64 = 1_596_491_091;

/// Slots added on top of "now" when no explicit TTL is given. Covers clock
/// skew and propagation; 1200 one-second slots is twenty minutes.
pub const DEFAULT_SLOT_MARGIN: u64 = 1_200;

// ---------------------------------------------------------------------------
// ProtocolParams
// ---------------------------------------------------------------------------

/// Ledger protocol parameters consumed by fee estimation and balancing.
///
/// Field names deserialize from the JSON shape returned by a node's
/// `query protocol-parameters` (`minFeeA`, `minUTxOValue`, ...), so callers
/// can feed the live values straight in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolParams {
    /// Outputs below this many lovelace are dust; leftover change under it is
    /// burned into the fee instead of becoming an output.
    #[serde(rename = "minUTxOValue")]
    pub minimum_utxo_value: u64,
    /// Stake pool registration deposit. Not consulted by the balancer.
    pub pool_deposit: u64,
    /// Stake key registration deposit. Not consulted by the balancer.
    pub key_deposit: u64,
    /// Lovelace per byte of encoded transaction.
    pub min_fee_a: u64,
    /// Constant lovelace added to every fee.
    pub min_fee_b: u64,
}

impl ProtocolParams {
    /// Mainnet parameters as of the Shelley hard fork.
    pub fn mainnet_shelley() -> Self {
        Self {
            minimum_utxo_value: MAINNET_MINIMUM_UTXO_VALUE,
            pool_deposit: MAINNET_POOL_DEPOSIT,
            key_deposit: MAINNET_KEY_DEPOSIT,
            min_fee_a: MAINNET_MIN_FEE_A,
            min_fee_b: MAINNET_MIN_FEE_B,
        }
    }

    /// Minimum fee for a transaction of `encoded_len` bytes:
    /// `min_fee_a * encoded_len + min_fee_b`.
    ///
    /// Saturates instead of wrapping. A saturated fee can never be covered by
    /// any input set, so it surfaces as insufficient funds rather than as a
    /// silently tiny fee.
    pub fn min_fee(&self, encoded_len: usize) -> u64 {
        self.min_fee_a
            .saturating_mul(encoded_len as u64)
            .saturating_add(self.min_fee_b)
    }

    /// Parses parameters from the node's JSON representation.
    ///
    /// Unknown fields (later-era parameters) are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TxError::InvalidConfig(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SlotConfig
// ---------------------------------------------------------------------------

/// Wall-clock to slot mapping used for default TTL assignment.
///
/// Shelley slots are one second long, so a slot number is the era start slot
/// plus the seconds elapsed since the era start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Slot number at which the current era began.
    pub epoch_start_slot: u64,
    /// Unix timestamp (seconds) of `epoch_start_slot`.
    pub epoch_start_timestamp: i64,
    /// Safety buffer added to the current slot.
    pub slot_margin: u64,
}

impl SlotConfig {
    pub fn mainnet() -> Self {
        Self {
            epoch_start_slot: MAINNET_SHELLEY_START_SLOT,
            epoch_start_timestamp: MAINNET_SHELLEY_START_TIMESTAMP,
            slot_margin: DEFAULT_SLOT_MARGIN,
        }
    }
}

// ---------------------------------------------------------------------------
// NetworkConfig
// ---------------------------------------------------------------------------

/// Everything network- or era-specific the builder needs, in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable network name, used in log fields only.
    pub name: String,
    pub protocol_params: ProtocolParams,
    pub slots: SlotConfig,
}

impl NetworkConfig {
    /// Mainnet, Shelley era.
    pub fn mainnet() -> Self {
        Self {
            name: "mainnet".to_string(),
            protocol_params: ProtocolParams::mainnet_shelley(),
            slots: SlotConfig::mainnet(),
        }
    }

    /// A testnet sharing mainnet's fee schedule with a caller-chosen era start.
    pub fn testnet(slots: SlotConfig) -> Self {
        Self {
            name: "testnet".to_string(),
            protocol_params: ProtocolParams::mainnet_shelley(),
            slots,
        }
    }
}
