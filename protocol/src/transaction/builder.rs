//! Transaction body construction via the builder pattern.
//!
//! The [`TransactionBuilder`] collects inputs, payment outputs and a change
//! address, then hands everything to the balancer in one step. What comes
//! out of `.build()` is a fee-paying, value-conserving [`TransactionBody`]
//! ready for signing.
//!
//! The builder does not sign. That happens in [`super::signing`] or through
//! [`TransactionBody::add_signatures`], so construction stays testable
//! without key material.

use tracing::{debug, info};

use super::balance::balance;
use super::body::TransactionBody;
use super::metadata::MetadataHash;
use super::payload::{Certificate, ProtocolUpdate, Withdrawals};
use super::ttl::{live_ttl, Clock, SystemClock};
use super::types::{Address, TransactionOutput, Utxo};
use crate::config::NetworkConfig;
use crate::error::{Result, TxError};

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for balanced [`TransactionBody`] values.
///
/// # Usage
///
/// ```rust,no_run
/// use shelley_tx::config::NetworkConfig;
/// use shelley_tx::transaction::{Address, TransactionBuilder, TransactionId, Utxo};
///
/// let network = NetworkConfig::mainnet();
/// let body = TransactionBuilder::new(&network)
///     .input(Utxo::new(TransactionId::from_bytes([0; 32]), 0, 2_000_000))
///     .output(Address::from_bytes(vec![0x01; 57]), 500_000)
///     .change_address(Address::from_bytes(vec![0x02; 57]))
///     .build()?;
/// # Ok::<(), shelley_tx::error::TxError>(())
/// ```
///
/// Without an explicit [`ttl`](TransactionBuilder::ttl), the body expires
/// `slot_margin` slots after the current slot.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    network: NetworkConfig,
    inputs: Vec<Utxo>,
    outputs: Vec<TransactionOutput>,
    change_address: Option<Address>,
    ttl: Option<u64>,
    certificates: Option<Vec<Certificate>>,
    withdrawals: Option<Withdrawals>,
    update: Option<ProtocolUpdate>,
    metadata_hash: Option<MetadataHash>,
}

impl TransactionBuilder {
    /// Creates an empty builder for `network`.
    pub fn new(network: &NetworkConfig) -> Self {
        Self {
            network: network.clone(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            change_address: None,
            ttl: None,
            certificates: None,
            withdrawals: None,
            update: None,
            metadata_hash: None,
        }
    }

    /// Adds an output to spend. Inputs keep the order they are added in.
    pub fn input(mut self, utxo: Utxo) -> Self {
        self.inputs.push(utxo);
        self
    }

    pub fn inputs(mut self, utxos: impl IntoIterator<Item = Utxo>) -> Self {
        self.inputs.extend(utxos);
        self
    }

    /// Adds a payment of `amount` lovelace to `address`.
    pub fn output(mut self, address: Address, amount: u64) -> Self {
        self.outputs.push(TransactionOutput::new(address, amount));
        self
    }

    /// Where leftover value goes. Required.
    pub fn change_address(mut self, address: Address) -> Self {
        self.change_address = Some(address);
        self
    }

    /// Sets the TTL slot explicitly instead of deriving it from the clock.
    pub fn ttl(mut self, slot: u64) -> Self {
        self.ttl = Some(slot);
        self
    }

    pub fn certificates(mut self, certificates: Vec<Certificate>) -> Self {
        self.certificates = Some(certificates);
        self
    }

    pub fn withdrawals(mut self, withdrawals: Withdrawals) -> Self {
        self.withdrawals = Some(withdrawals);
        self
    }

    pub fn update(mut self, update: ProtocolUpdate) -> Self {
        self.update = Some(update);
        self
    }

    /// Commits the body to metadata that will be attached after signing.
    pub fn metadata_hash(mut self, hash: MetadataHash) -> Self {
        self.metadata_hash = Some(hash);
        self
    }

    /// Balances and returns the body, reading the system clock if no TTL
    /// was set.
    pub fn build(self) -> Result<TransactionBody> {
        self.build_with_clock(&SystemClock)
    }

    /// Like [`build`](Self::build) but with an injected clock.
    ///
    /// # Errors
    ///
    /// - [`TxError::MissingField`] without a change address.
    /// - [`TxError::AmountOverflow`] if input or output amounts overflow.
    /// - [`TxError::Clock`] if the TTL cannot be derived.
    /// - [`TxError::InsufficientFunds`] if the inputs cannot cover outputs
    ///   plus fee.
    pub fn build_with_clock<C: Clock + ?Sized>(self, clock: &C) -> Result<TransactionBody> {
        let change_address = self
            .change_address
            .ok_or(TxError::MissingField("change_address"))?;

        let input_amount = self
            .inputs
            .iter()
            .try_fold(0u64, |acc, utxo| acc.checked_add(utxo.amount))
            .ok_or(TxError::AmountOverflow("inputs"))?;

        let ttl = match self.ttl {
            Some(slot) => slot,
            None => live_ttl(&self.network.slots, clock)?,
        };

        let inputs = self.inputs.iter().map(Utxo::to_input).collect();
        let mut body = TransactionBody::unbalanced(inputs, self.outputs, ttl);
        body.certificates = self.certificates;
        body.withdrawals = self.withdrawals;
        body.update = self.update;
        body.metadata_hash = self.metadata_hash;

        debug!(
            network = %self.network.name,
            inputs = body.inputs().len(),
            outputs = body.outputs().len(),
            input_amount,
            ttl,
            "balancing transaction body"
        );

        let body = balance(
            body,
            input_amount,
            &change_address,
            &self.network.protocol_params,
        )?;

        info!(
            network = %self.network.name,
            id = %body.id(),
            fee = body.fee(),
            outputs = body.outputs().len(),
            "transaction body built"
        );
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Pays `amount` to `receiver` from `utxos`, returning change to `change`.
/// The TTL is derived from the system clock.
pub fn new_transaction_body(
    receiver: &Address,
    utxos: &[Utxo],
    amount: u64,
    change: &Address,
    network: &NetworkConfig,
) -> Result<TransactionBody> {
    single_payment(receiver, utxos, amount, change, network).build()
}

/// [`new_transaction_body`] with an explicit TTL slot.
pub fn new_transaction_body_with_ttl(
    receiver: &Address,
    utxos: &[Utxo],
    amount: u64,
    change: &Address,
    ttl: u64,
    network: &NetworkConfig,
) -> Result<TransactionBody> {
    single_payment(receiver, utxos, amount, change, network)
        .ttl(ttl)
        .build()
}

fn single_payment(
    receiver: &Address,
    utxos: &[Utxo],
    amount: u64,
    change: &Address,
    network: &NetworkConfig,
) -> TransactionBuilder {
    TransactionBuilder::new(network)
        .inputs(utxos.iter().cloned())
        .output(receiver.clone(), amount)
        .change_address(change.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
