//! Core value types: identifiers, addresses, UTXOs, inputs and outputs.
//!
//! Inputs and outputs are positional records on the wire (`[a, b]`, no
//! field names) because they are always fully populated.

use std::fmt;
use std::str::FromStr;

use ciborium::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{self, CborDecode, CborEncode, DecodeError};
use crate::config::HASH_LENGTH;
use crate::error::{Result, TxError};

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// Blake2b-256 hash of a transaction body's canonical encoding.
///
/// Displays, parses and serializes as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId([u8; HASH_LENGTH]);

impl TransactionId {
    pub const fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for TransactionId {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| TxError::InvalidTransactionId(e.to_string()))?;
        let bytes = <[u8; HASH_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
            TxError::InvalidTransactionId(format!(
                "expected {} bytes, got {}",
                HASH_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.to_hex())
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A destination address as raw bytes.
///
/// Bech32/Base58 rendering belongs to the wallet layer; the ledger only
/// ever sees these bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address(Vec<u8>);

impl Address {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parses the hex form of the raw address bytes.
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text).map_err(DecodeError::from)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Address {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0))
    }
}

// ---------------------------------------------------------------------------
// Utxo
// ---------------------------------------------------------------------------

/// A spendable output chosen by the caller's coin selection.
///
/// The amount only matters during construction: it feeds the balancer and
/// is then dropped, since the body references inputs by ID and index alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub transaction_id: TransactionId,
    pub index: u64,
    /// Value held by the output, in lovelace.
    pub amount: u64,
}

impl Utxo {
    pub fn new(transaction_id: TransactionId, index: u64, amount: u64) -> Self {
        Self {
            transaction_id,
            index,
            amount,
        }
    }

    /// The input that spends this output.
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput::new(self.transaction_id, self.index)
    }
}

// ---------------------------------------------------------------------------
// TransactionInput
// ---------------------------------------------------------------------------

/// Reference to a previous output: `[transaction_id, index]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionInput {
    pub transaction_id: TransactionId,
    pub index: u64,
}

impl TransactionInput {
    pub fn new(transaction_id: TransactionId, index: u64) -> Self {
        Self {
            transaction_id,
            index,
        }
    }
}

impl CborEncode for TransactionInput {
    fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            codec::bytes(self.transaction_id.as_bytes()),
            codec::uint(self.index),
        ])
    }
}

impl CborDecode for TransactionInput {
    fn from_cbor_value(value: Value) -> std::result::Result<Self, DecodeError> {
        let [id, index] = codec::into_record(value, "transaction input")?;
        Ok(Self {
            transaction_id: TransactionId(codec::into_fixed_bytes(id, "input transaction id")?),
            index: codec::into_u64(index, "input index")?,
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionOutput
// ---------------------------------------------------------------------------

/// Value sent to an address: `[address_bytes, amount]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub address: Address,
    /// Amount in lovelace.
    pub amount: u64,
}

impl TransactionOutput {
    pub fn new(address: Address, amount: u64) -> Self {
        Self { address, amount }
    }
}

impl CborEncode for TransactionOutput {
    fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            codec::bytes(self.address.as_bytes()),
            codec::uint(self.amount),
        ])
    }
}

impl CborDecode for TransactionOutput {
    fn from_cbor_value(value: Value) -> std::result::Result<Self, DecodeError> {
        let [address, amount] = codec::into_record(value, "transaction output")?;
        Ok(Self {
            address: Address(codec::into_bytes(address, "output address")?),
            amount: codec::into_u64(amount, "output amount")?,
        })
    }
}

/// Sums output amounts, failing instead of wrapping.
pub(crate) fn total_amount(outputs: &[TransactionOutput]) -> Result<u64> {
    outputs.iter().try_fold(0u64, |acc, out| {
        acc.checked_add(out.amount)
            .ok_or(TxError::AmountOverflow("outputs"))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ID_HEX: &str = "8561258e210352fba2ac0488afed67b3427a27ccf1d41ec030c98a8199bc22ec";

    #[test]
    fn transaction_id_hex_roundtrip() {
        let id: TransactionId = ID_HEX.parse().unwrap();
        assert_eq!(id.to_hex(), ID_HEX);
        assert_eq!(id.to_string(), ID_HEX);
    }

    #[test]
    fn transaction_id_rejects_bad_hex_and_length() {
        assert!(matches!(
            "zz".parse::<TransactionId>(),
            Err(TxError::InvalidTransactionId(_))
        ));
        assert!(matches!(
            "abcd".parse::<TransactionId>(),
            Err(TxError::InvalidTransactionId(_))
        ));
    }

    #[test]
    fn utxo_serde_uses_hex_id() {
        let utxo = Utxo::new(ID_HEX.parse().unwrap(), 1, 2_000_000);
        let json = serde_json::to_string(&utxo).unwrap();
        assert!(json.contains(ID_HEX));
        let recovered: Utxo = serde_json::from_str(&json).unwrap();
        assert_eq!(utxo, recovered);
    }

    #[test]
    fn input_encodes_as_two_element_array() {
        let input = TransactionInput::new(TransactionId::from_bytes([0xAB; 32]), 3);
        let encoded = input.to_cbor();
        // array(2), bytes(32) header, 32 id bytes, uint 3
        assert_eq!(encoded[0], 0x82);
        assert_eq!(&encoded[1..3], &[0x58, 0x20]);
        assert_eq!(encoded[35], 0x03);
        assert_eq!(encoded.len(), 36);
        assert_eq!(TransactionInput::from_cbor(&encoded).unwrap(), input);
    }

    #[test]
    fn input_with_short_id_is_rejected() {
        let value = Value::Array(vec![codec::bytes(&[1u8; 31]), codec::uint(0)]);
        assert!(matches!(
            TransactionInput::from_cbor_value(value),
            Err(DecodeError::ByteLength {
                expected: 32,
                found: 31,
                ..
            })
        ));
    }

    #[test]
    fn output_roundtrip() {
        let output = TransactionOutput::new(Address::from_bytes(vec![0x61; 29]), 1_500_000);
        let decoded = TransactionOutput::from_cbor(&output.to_cbor()).unwrap();
        assert_eq!(decoded, output);
    }

    #[test]
    fn output_with_negative_amount_is_rejected() {
        let value = Value::Array(vec![codec::bytes(b"addr"), Value::Integer((-5i64).into())]);
        assert!(matches!(
            TransactionOutput::from_cbor_value(value),
            Err(DecodeError::IntegerRange { .. })
        ));
    }

    #[test]
    fn total_amount_detects_overflow() {
        let outputs = vec![
            TransactionOutput::new(Address::from_bytes(vec![1]), u64::MAX),
            TransactionOutput::new(Address::from_bytes(vec![2]), 1),
        ];
        assert!(matches!(
            total_amount(&outputs),
            Err(TxError::AmountOverflow("outputs"))
        ));
    }

    #[test]
    fn address_from_hex() {
        let addr = Address::from_hex("61deadbeef").unwrap();
        assert_eq!(addr.as_bytes(), &[0x61, 0xde, 0xad, 0xbe, 0xef]);
        assert!(Address::from_hex("xyz").is_err());
    }
}
