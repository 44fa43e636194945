//! The transaction body: everything a transaction commits to except its
//! witnesses.
//!
//! On the wire the body is a sparse integer-keyed map:
//!
//! ```text
//! 0 inputs        [ [txid, index], ... ]        required
//! 1 outputs       [ [address, amount], ... ]    required
//! 2 fee           uint                          required
//! 3 ttl           uint                          required
//! 4 certificates  [ certificate, ... ]          omitted when absent
//! 5 withdrawals   { account => amount }         omitted when absent
//! 6 update        [ proposals, epoch ]          omitted when absent
//! 7 metadata hash bytes(32)                     omitted when absent
//! ```
//!
//! The body's identifier is the Blake2b-256 hash of exactly this encoding.
//! Fields are private: a body only comes out of the balancer or the decoder,
//! so an unbalanced body is never handed to callers.

use ciborium::value::Value;

use super::metadata::MetadataHash;
use super::payload::{Certificate, ProtocolUpdate, Withdrawals};
use super::types::{total_amount, TransactionId, TransactionInput, TransactionOutput};
use crate::codec::{self, CborDecode, CborEncode, DecodeError, KeyedFields, KeyedMap};
use crate::crypto::blake2b_256;
use crate::error::Result;

const KEY_INPUTS: u64 = 0;
const KEY_OUTPUTS: u64 = 1;
const KEY_FEE: u64 = 2;
const KEY_TTL: u64 = 3;
const KEY_CERTIFICATES: u64 = 4;
const KEY_WITHDRAWALS: u64 = 5;
const KEY_UPDATE: u64 = 6;
const KEY_METADATA_HASH: u64 = 7;

/// A fee-bearing transaction body.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBody {
    pub(crate) inputs: Vec<TransactionInput>,
    pub(crate) outputs: Vec<TransactionOutput>,
    pub(crate) fee: u64,
    pub(crate) ttl: u64,
    pub(crate) certificates: Option<Vec<Certificate>>,
    pub(crate) withdrawals: Option<Withdrawals>,
    pub(crate) update: Option<ProtocolUpdate>,
    pub(crate) metadata_hash: Option<MetadataHash>,
}

impl TransactionBody {
    /// A body with no fee yet, ready for the balancer.
    pub(crate) fn unbalanced(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        ttl: u64,
    ) -> Self {
        Self {
            inputs,
            outputs,
            fee: 0,
            ttl,
            certificates: None,
            withdrawals: None,
            update: None,
            metadata_hash: None,
        }
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    /// Outputs in wire order. A change output, when the balancer added one,
    /// is always first.
    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// Last slot at which the transaction may be included.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    pub fn certificates(&self) -> Option<&[Certificate]> {
        self.certificates.as_deref()
    }

    pub fn withdrawals(&self) -> Option<&Withdrawals> {
        self.withdrawals.as_ref()
    }

    pub fn update(&self) -> Option<&ProtocolUpdate> {
        self.update.as_ref()
    }

    pub fn metadata_hash(&self) -> Option<&MetadataHash> {
        self.metadata_hash.as_ref()
    }

    /// Sum of all output amounts.
    pub fn total_output(&self) -> Result<u64> {
        total_amount(&self.outputs)
    }

    /// The transaction identifier: Blake2b-256 of the canonical encoding.
    ///
    /// Input and output order is part of the hashed bytes, so reordering
    /// either yields a different ID.
    pub fn id(&self) -> TransactionId {
        TransactionId::from_bytes(blake2b_256(&self.to_cbor()))
    }

    /// Canonical CBOR bytes.
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
}

impl CborEncode for TransactionBody {
    fn to_cbor_value(&self) -> Value {
        KeyedMap::new()
            .field(KEY_INPUTS, encode_list(&self.inputs))
            .field(KEY_OUTPUTS, encode_list(&self.outputs))
            .field(KEY_FEE, codec::uint(self.fee))
            .field(KEY_TTL, codec::uint(self.ttl))
            .optional(
                KEY_CERTIFICATES,
                self.certificates.as_deref().map(encode_list),
            )
            .optional(
                KEY_WITHDRAWALS,
                self.withdrawals.as_ref().map(CborEncode::to_cbor_value),
            )
            .optional(KEY_UPDATE, self.update.as_ref().map(CborEncode::to_cbor_value))
            .optional(
                KEY_METADATA_HASH,
                self.metadata_hash.as_ref().map(CborEncode::to_cbor_value),
            )
            .into_value()
    }
}

impl CborDecode for TransactionBody {
    fn from_cbor_value(value: Value) -> std::result::Result<Self, DecodeError> {
        let mut fields = KeyedFields::parse(value, "transaction body", KEY_METADATA_HASH)?;
        Ok(Self {
            inputs: decode_list(fields.require(KEY_INPUTS)?, "body inputs")?,
            outputs: decode_list(fields.require(KEY_OUTPUTS)?, "body outputs")?,
            fee: codec::into_u64(fields.require(KEY_FEE)?, "body fee")?,
            ttl: codec::into_u64(fields.require(KEY_TTL)?, "body ttl")?,
            certificates: fields
                .take(KEY_CERTIFICATES)
                .map(|v| decode_list(v, "body certificates"))
                .transpose()?,
            withdrawals: fields
                .take(KEY_WITHDRAWALS)
                .map(Withdrawals::from_cbor_value)
                .transpose()?,
            update: fields
                .take(KEY_UPDATE)
                .map(ProtocolUpdate::from_cbor_value)
                .transpose()?,
            metadata_hash: fields
                .take(KEY_METADATA_HASH)
                .map(MetadataHash::from_cbor_value)
                .transpose()?,
        })
    }
}

fn encode_list<T: CborEncode>(items: &[T]) -> Value {
    Value::Array(items.iter().map(CborEncode::to_cbor_value).collect())
}

fn decode_list<T: CborDecode>(
    value: Value,
    context: &'static str,
) -> std::result::Result<Vec<T>, DecodeError> {
    codec::into_array(value, context)?
        .into_iter()
        .map(T::from_cbor_value)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TxError;
    use crate::transaction::types::Address;

    fn sample_body() -> TransactionBody {
        let mut body = TransactionBody::unbalanced(
            vec![TransactionInput::new(
                TransactionId::from_bytes([0x11; 32]),
                0,
            )],
            vec![TransactionOutput::new(
                Address::from_bytes(vec![0x61; 29]),
                500_000,
            )],
            50_000_000,
        );
        body.fee = 170_000;
        body
    }

    #[test]
    fn required_keys_only_when_optionals_absent() {
        let encoded = sample_body().to_cbor();
        assert_eq!(encoded[0], 0xa4, "map with exactly four entries");
    }

    #[test]
    fn body_roundtrip() {
        let body = sample_body();
        let decoded = TransactionBody::from_bytes(&body.to_bytes()).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn body_roundtrip_with_optional_fields() {
        let mut body = sample_body();
        body.certificates = Some(vec![Certificate::Unparsed(Value::Array(vec![
            codec::uint(0),
            Value::Array(vec![codec::uint(0), codec::bytes(&[0xAA; 28])]),
        ]))]);
        body.withdrawals = Some(Withdrawals::Unparsed(Value::Map(vec![(
            codec::bytes(&[0xE1; 29]),
            codec::uint(1_000),
        )])));
        body.metadata_hash = Some(MetadataHash::from_bytes([0x42; 32]));

        let encoded = body.to_bytes();
        assert_eq!(encoded[0], 0xa7, "map with seven entries");
        assert_eq!(TransactionBody::from_bytes(&encoded).unwrap(), body);
    }

    #[test]
    fn hex_roundtrip() {
        let body = sample_body();
        let decoded = TransactionBody::from_hex(&body.to_hex()).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn id_is_pure_function_of_encoding() {
        let body = sample_body();
        assert_eq!(body.id(), body.clone().id());
        assert_eq!(body.id().as_bytes(), &blake2b_256(&body.to_bytes()));
    }

    #[test]
    fn every_field_mutation_changes_id() {
        let base = sample_body();
        let base_id = base.id();

        let mut b = base.clone();
        b.fee += 1;
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.ttl += 1;
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.outputs[0].amount += 1;
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.inputs[0].index = 1;
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.inputs[0].transaction_id = TransactionId::from_bytes([0x12; 32]);
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.outputs[0].address = Address::from_bytes(vec![0x62; 29]);
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.certificates = Some(vec![Certificate::Unparsed(Value::Array(vec![codec::uint(0)]))]);
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.withdrawals = Some(Withdrawals::Unparsed(Value::Map(vec![])));
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.update = Some(ProtocolUpdate::Unparsed(Value::Array(vec![
            Value::Map(vec![]),
            codec::uint(210),
        ])));
        assert_ne!(b.id(), base_id);

        let mut b = base.clone();
        b.metadata_hash = Some(MetadataHash::from_bytes([0; 32]));
        assert_ne!(b.id(), base_id);
    }

    #[test]
    fn payload_contents_are_part_of_id() {
        let mut base = sample_body();
        base.withdrawals = Some(Withdrawals::Unparsed(Value::Map(vec![(
            codec::bytes(&[0xE1; 29]),
            codec::uint(1_000),
        )])));
        let mut b = base.clone();
        b.withdrawals = Some(Withdrawals::Unparsed(Value::Map(vec![(
            codec::bytes(&[0xE1; 29]),
            codec::uint(1_001),
        )])));
        assert_ne!(b.id(), base.id());
    }

    #[test]
    fn output_order_is_part_of_id() {
        let mut body = sample_body();
        body.outputs.push(TransactionOutput::new(
            Address::from_bytes(vec![0x71; 29]),
            700_000,
        ));
        let forward = body.id();
        body.outputs.reverse();
        assert_ne!(body.id(), forward);
    }

    #[test]
    fn missing_ttl_is_decode_error() {
        let value = KeyedMap::new()
            .field(KEY_INPUTS, Value::Array(vec![]))
            .field(KEY_OUTPUTS, Value::Array(vec![]))
            .field(KEY_FEE, codec::uint(1))
            .into_value();
        let bytes = codec::encode_value(&value);
        assert!(matches!(
            TransactionBody::from_bytes(&bytes),
            Err(TxError::Decoding(DecodeError::MissingKey { key: 3, .. }))
        ));
    }

    #[test]
    fn unknown_body_key_is_decode_error() {
        let mut value = sample_body().to_cbor_value();
        if let Value::Map(entries) = &mut value {
            entries.push((codec::uint(8), codec::uint(0)));
        }
        let bytes = codec::encode_value(&value);
        assert!(matches!(
            TransactionBody::from_bytes(&bytes),
            Err(TxError::Decoding(DecodeError::UnknownKey { key: 8, .. }))
        ));
    }

    #[test]
    fn fee_of_wrong_type_is_decode_error() {
        let value = KeyedMap::new()
            .field(KEY_INPUTS, Value::Array(vec![]))
            .field(KEY_OUTPUTS, Value::Array(vec![]))
            .field(KEY_FEE, Value::Text("free".into()))
            .field(KEY_TTL, codec::uint(1))
            .into_value();
        let bytes = codec::encode_value(&value);
        assert!(matches!(
            TransactionBody::from_bytes(&bytes),
            Err(TxError::Decoding(DecodeError::UnexpectedType { .. }))
        ));
    }

    #[test]
    fn truncated_body_is_decode_error() {
        let bytes = sample_body().to_bytes();
        for cut in [1, bytes.len() / 2, bytes.len() - 1] {
            assert!(
                TransactionBody::from_bytes(&bytes[..cut]).is_err(),
                "prefix of {} bytes must not decode",
                cut
            );
        }
    }
}
