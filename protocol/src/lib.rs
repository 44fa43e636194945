// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Shelley Transactions: Core Library
//!
//! Builds, fee-balances, canonically encodes and signs Shelley-era UTXO
//! transactions. Given the outputs a wallet wants to spend and where the
//! value should go, it produces the exact bytes a node accepts.
//!
//! ## Architecture
//!
//! - **codec**: Canonical CBOR encoding and strict decoding.
//! - **crypto**: Blake2b-256 for transaction IDs and metadata hashes.
//! - **transaction**: Bodies, balancing, witnesses and the signed transaction.
//! - **config**: Protocol parameters, slot mapping and network presets.
//! - **error**: One error type for everything fallible.
//!
//! ## Design Philosophy
//!
//! 1. Bytes are the contract. Equal values always encode to equal bytes.
//! 2. Network constants are injected values, never compiled-in assumptions.
//! 3. No I/O and no global state. The clock is the only outside input, and
//!    it is injectable.
//! 4. If it touches money, it has tests. Plural.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod transaction;

pub use config::{NetworkConfig, ProtocolParams, SlotConfig};
pub use error::{Result, TxError};
pub use transaction::{Transaction, TransactionBody, TransactionBuilder, TransactionId};
