//! # Transaction Module
//!
//! Construction, fee balancing, encoding and signing of Shelley-era UTXO
//! transactions. A payment goes in as selected UTXOs plus destinations and
//! comes out as canonical CBOR bytes ready for submission.
//!
//! ## Architecture
//!
//! ```text
//! types.rs     Identifiers, addresses, UTXOs, inputs and outputs
//! payload.rs   Opaque certificates, withdrawals and protocol updates
//! metadata.rs  Auxiliary metadata and its hash
//! body.rs      TransactionBody and its sparse-map encoding
//! fee.rs       Size simulation with placeholder witnesses
//! balance.rs   Two-pass fee and change balancing
//! ttl.rs       Clock-derived default TTL
//! builder.rs   Fluent TransactionBuilder producing balanced bodies
//! witness.rs   Witness types and signature attachment
//! signing.rs   Local signing through TransactionSigner
//! signed.rs    The complete Transaction
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] collects inputs and outputs and
//!    returns a balanced [`TransactionBody`].
//! 2. **Sign**: sign [`TransactionBody::id`] externally and call
//!    [`TransactionBody::add_signatures`], or use [`sign_body`].
//! 3. **Attach metadata** (optional): [`Transaction::with_metadata`].
//! 4. **Encode**: [`Transaction::to_bytes`] or [`Transaction::to_hex`].
//!
//! ## Design Decisions
//!
//! - The ID is Blake2b-256 of the body encoding only. Witnesses and
//!   metadata never affect it, so signatures over it stay valid.
//! - All amounts are `u64` lovelace with checked summation. No floating
//!   point anywhere near monetary values.
//! - Fees are priced on the size of the final signed transaction, measured
//!   before signing with same-sized placeholder witnesses.

mod balance;
pub mod body;
pub mod builder;
pub mod fee;
pub mod metadata;
pub mod payload;
pub mod signed;
pub mod signing;
pub mod ttl;
pub mod types;
pub mod witness;

pub use body::TransactionBody;
pub use builder::{new_transaction_body, new_transaction_body_with_ttl, TransactionBuilder};
pub use fee::{estimate_min_fee, simulated_size};
pub use metadata::{Metadata, MetadataHash, Metadatum};
pub use payload::{Certificate, ProtocolUpdate, Withdrawals};
pub use signed::Transaction;
pub use signing::{sign_body, TransactionSigner};
pub use ttl::{live_ttl, Clock, FixedClock, SystemClock};
pub use types::{Address, TransactionId, TransactionInput, TransactionOutput, Utxo};
pub use witness::{VKeyWitness, WitnessSet};
