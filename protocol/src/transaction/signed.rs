//! The complete transaction: `[body, witness_set, metadata | null]`.

use ciborium::value::Value;

use super::body::TransactionBody;
use super::metadata::Metadata;
use super::types::TransactionId;
use super::witness::WitnessSet;
use crate::codec::{self, CborDecode, CborEncode, DecodeError};
use crate::config::ProtocolParams;
use crate::error::Result;

/// A body together with its witnesses and optional metadata.
///
/// Immutable once assembled: re-signing means calling
/// [`TransactionBody::add_signatures`] again to get a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    body: TransactionBody,
    witness_set: WitnessSet,
    metadata: Option<Metadata>,
}

impl Transaction {
    pub(crate) fn new(
        body: TransactionBody,
        witness_set: WitnessSet,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            body,
            witness_set,
            metadata,
        }
    }

    /// Attaches metadata, replacing any already present.
    ///
    /// The body is not touched: if the ledger should commit to this
    /// metadata, its [`Metadata::hash`] must already be in the body, and the
    /// extra bytes must already be paid for (see
    /// [`Transaction::has_sufficient_fee`]).
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn witness_set(&self) -> &WitnessSet {
        &self.witness_set
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// The body's identifier. Independent of witnesses and metadata.
    pub fn id(&self) -> TransactionId {
        self.body.id()
    }

    /// Canonical CBOR bytes, ready for submission.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_cbor()
    }

    pub fn to_hex(&self) -> String {
        self.to_cbor_hex()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_cbor(bytes)?)
    }

    pub fn from_hex(text: &str) -> Result<Self> {
        Ok(Self::from_cbor_hex(text)?)
    }

    /// Size of the encoded transaction, the quantity fees are charged on.
    pub fn encoded_len(&self) -> usize {
        self.to_cbor().len()
    }

    /// Minimum fee the ledger would demand for this exact transaction.
    pub fn min_fee(&self, params: &ProtocolParams) -> u64 {
        params.min_fee(self.encoded_len())
    }

    /// Whether the body's fee covers [`Transaction::min_fee`].
    pub fn has_sufficient_fee(&self, params: &ProtocolParams) -> bool {
        self.body.fee() >= self.min_fee(params)
    }
}

/// Value tree of a transaction assembled from borrowed parts. Lets fee
/// estimation measure a body with placeholder witnesses without first
/// building an owned [`Transaction`].
pub(crate) fn transaction_value(
    body: &TransactionBody,
    witness_set: &WitnessSet,
    metadata: Option<&Metadata>,
) -> Value {
    Value::Array(vec![
        body.to_cbor_value(),
        witness_set.to_cbor_value(),
        metadata.map_or(Value::Null, CborEncode::to_cbor_value),
    ])
}

impl CborEncode for Transaction {
    fn to_cbor_value(&self) -> Value {
        transaction_value(&self.body, &self.witness_set, self.metadata.as_ref())
    }
}

impl CborDecode for Transaction {
    fn from_cbor_value(value: Value) -> std::result::Result<Self, DecodeError> {
        let [body, witness_set, metadata] = codec::into_record(value, "transaction")?;
        let metadata = match metadata {
            Value::Null => None,
            other => Some(Metadata::from_cbor_value(other)?),
        };
        Ok(Self {
            body: TransactionBody::from_cbor_value(body)?,
            witness_set: WitnessSet::from_cbor_value(witness_set)?,
            metadata,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
