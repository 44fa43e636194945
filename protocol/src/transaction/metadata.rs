//! Transaction metadata and its hash.
//!
//! Metadata is a map from `u64` labels to [`Metadatum`] trees. It travels
//! as the third element of a transaction, and the body commits to it by
//! carrying its Blake2b-256 hash under key 7. What labels mean is up to the
//! application; this module only guarantees structure and a canonical form.

use std::collections::BTreeMap;
use std::fmt;

use ciborium::value::{Integer, Value};

use crate::codec::{self, CborDecode, CborEncode, DecodeError};
use crate::config::HASH_LENGTH;
use crate::crypto::blake2b_256;

// ---------------------------------------------------------------------------
// MetadataHash
// ---------------------------------------------------------------------------

/// Blake2b-256 hash of encoded [`Metadata`], stored in the body.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetadataHash([u8; HASH_LENGTH]);

impl MetadataHash {
    pub const fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for MetadataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetadataHash({})", hex::encode(self.0))
    }
}

impl CborEncode for MetadataHash {
    fn to_cbor_value(&self) -> Value {
        codec::bytes(&self.0)
    }
}

impl CborDecode for MetadataHash {
    fn from_cbor_value(value: Value) -> Result<Self, DecodeError> {
        Ok(Self(codec::into_fixed_bytes(value, "metadata hash")?))
    }
}

// ---------------------------------------------------------------------------
// Metadatum
// ---------------------------------------------------------------------------

/// One node of a metadata tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadatum {
    /// Any CBOR integer, positive or negative, up to 64 bits of magnitude.
    Int(Integer),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<Metadatum>),
    /// Key/value pairs in their original order.
    Map(Vec<(Metadatum, Metadatum)>),
}

impl From<i64> for Metadatum {
    fn from(n: i64) -> Self {
        Metadatum::Int(n.into())
    }
}

impl From<&str> for Metadatum {
    fn from(text: &str) -> Self {
        Metadatum::Text(text.to_string())
    }
}

impl CborEncode for Metadatum {
    fn to_cbor_value(&self) -> Value {
        match self {
            Metadatum::Int(n) => Value::Integer(*n),
            Metadatum::Bytes(data) => codec::bytes(data),
            Metadatum::Text(text) => Value::Text(text.clone()),
            Metadatum::List(items) => {
                Value::Array(items.iter().map(CborEncode::to_cbor_value).collect())
            }
            Metadatum::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_cbor_value(), v.to_cbor_value()))
                    .collect(),
            ),
        }
    }
}

impl CborDecode for Metadatum {
    fn from_cbor_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Integer(n) => Ok(Metadatum::Int(n)),
            Value::Bytes(data) => Ok(Metadatum::Bytes(data)),
            Value::Text(text) => Ok(Metadatum::Text(text)),
            Value::Array(items) => items
                .into_iter()
                .map(Metadatum::from_cbor_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Metadatum::List),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| {
                    Ok((
                        Metadatum::from_cbor_value(k)?,
                        Metadatum::from_cbor_value(v)?,
                    ))
                })
                .collect::<Result<Vec<_>, DecodeError>>()
                .map(Metadatum::Map),
            other => Err(DecodeError::UnexpectedType {
                context: "metadatum",
                expected: "integer, bytes, text, list or map",
                found: codec::kind(&other),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Label-indexed metadata. Labels encode in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<u64, Metadatum>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `label`, returning the previous value if there was one.
    pub fn insert(&mut self, label: u64, datum: Metadatum) -> Option<Metadatum> {
        self.0.insert(label, datum)
    }

    pub fn get(&self, label: u64) -> Option<&Metadatum> {
        self.0.get(&label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hash to place in the body's metadata hash field.
    pub fn hash(&self) -> MetadataHash {
        MetadataHash(blake2b_256(&self.to_cbor()))
    }
}

impl CborEncode for Metadata {
    fn to_cbor_value(&self) -> Value {
        Value::Map(
            self.0
                .iter()
                .map(|(label, datum)| (codec::uint(*label), datum.to_cbor_value()))
                .collect(),
        )
    }
}

impl CborDecode for Metadata {
    fn from_cbor_value(value: Value) -> Result<Self, DecodeError> {
        let mut labels = BTreeMap::new();
        for (label, datum) in codec::into_map(value, "metadata")? {
            let label = codec::into_u64(label, "metadata label")?;
            let datum = Metadatum::from_cbor_value(datum)?;
            if labels.insert(label, datum).is_some() {
                return Err(DecodeError::DuplicateKey {
                    context: "metadata",
                    key: label,
                });
            }
        }
        Ok(Self(labels))
    }
}
