//! # Canonical CBOR Codec
//!
//! Every wire type in this crate is converted to and from a
//! [`ciborium::Value`] tree, and only the tree is handed to `ciborium` for
//! the actual byte work. Building the tree ourselves is what makes the
//! encoding canonical:
//!
//! - maps are `Vec<(Value, Value)>`, written in the order we push entries,
//!   so keys always come out ascending;
//! - every array, map and byte string is emitted with a definite length;
//! - integers use the shortest header that fits.
//!
//! Canonical bytes matter twice over: the body encoding is hashed into the
//! transaction ID, and the full transaction encoding is measured to price
//! the fee. Two encodings of the same value differing by even one byte
//! would break both.
//!
//! Decoding goes the other way and is strict. Any shape the encoder would
//! never produce (wrong type, wrong record arity, unknown or repeated map
//! key, trailing bytes) is a [`DecodeError`], never a panic.

use std::collections::BTreeMap;

use ciborium::value::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A byte sequence is not a valid encoding of the requested type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not well-formed CBOR (including truncation).
    #[error("malformed CBOR: {0}")]
    Cbor(String),

    /// The textual form is not valid hex.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("{context}: expected {expected}, found {found}")]
    UnexpectedType {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A positional record has the wrong number of fields.
    #[error("{context}: expected {expected} elements, found {found}")]
    ArrayLength {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A fixed-size byte string (hash, transaction ID) has the wrong length.
    #[error("{context}: expected {expected} bytes, found {found}")]
    ByteLength {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{context}: missing required key {key}")]
    MissingKey { context: &'static str, key: u64 },

    #[error("{context}: unknown key {key}")]
    UnknownKey { context: &'static str, key: u64 },

    #[error("{context}: duplicate key {key}")]
    DuplicateKey { context: &'static str, key: u64 },

    /// An integer does not fit the field's range (e.g. negative amount).
    #[error("{context}: integer out of range")]
    IntegerRange { context: &'static str },

    /// Bytes remain after the top-level item.
    #[error("{0} trailing bytes after top-level item")]
    TrailingBytes(usize),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Types with a canonical CBOR encoding.
///
/// Implementors only describe their [`Value`] tree; byte production is
/// shared so every type gets the same canonical form.
pub trait CborEncode {
    fn to_cbor_value(&self) -> Value;

    /// Canonical encoded bytes.
    fn to_cbor(&self) -> Vec<u8> {
        encode_value(&self.to_cbor_value())
    }

    /// Canonical encoding as lowercase hex.
    fn to_cbor_hex(&self) -> String {
        hex::encode(self.to_cbor())
    }
}

/// Types that can be strictly decoded from CBOR.
pub trait CborDecode: Sized {
    fn from_cbor_value(value: Value) -> Result<Self, DecodeError>;

    /// Decodes exactly one item spanning all of `bytes`.
    fn from_cbor(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_cbor_value(decode_value(bytes)?)
    }

    /// Decodes from hex text. Surrounding whitespace is ignored.
    fn from_cbor_hex(text: &str) -> Result<Self, DecodeError> {
        Self::from_cbor(&hex::decode(text.trim())?)
    }
}

// ---------------------------------------------------------------------------
// Byte-level entry points
// ---------------------------------------------------------------------------

/// Serializes a value tree.
///
/// The writer is an in-memory `Vec` and the tree only ever holds integers,
/// byte/text strings, arrays, maps and null, so serialization cannot fail
/// for any tree this crate builds.
pub fn encode_value(value: &Value) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    ciborium::into_writer(value, &mut buf)
        .expect("CBOR serialization into memory is infallible");
    buf
}

/// Parses exactly one CBOR item from `bytes`, rejecting leftovers.
pub fn decode_value(bytes: &[u8]) -> Result<Value, DecodeError> {
    let mut rest = bytes;
    let value: Value =
        ciborium::from_reader(&mut rest).map_err(|e| DecodeError::Cbor(e.to_string()))?;
    if !rest.is_empty() {
        return Err(DecodeError::TrailingBytes(rest.len()));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Value construction helpers
// ---------------------------------------------------------------------------

pub(crate) fn uint(n: u64) -> Value {
    Value::Integer(n.into())
}

pub(crate) fn bytes(data: &[u8]) -> Value {
    Value::Bytes(data.to_vec())
}

/// Builder for integer-keyed sparse maps (body, witness set).
///
/// Keys must be pushed in ascending order; absent optional fields are simply
/// never pushed.
#[derive(Default)]
pub(crate) struct KeyedMap {
    entries: Vec<(Value, Value)>,
    last_key: Option<u64>,
}

impl KeyedMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn field(mut self, key: u64, value: Value) -> Self {
        debug_assert!(
            self.last_key.map_or(true, |last| last < key),
            "keyed map fields must be pushed in ascending key order"
        );
        self.last_key = Some(key);
        self.entries.push((uint(key), value));
        self
    }

    pub(crate) fn optional(self, key: u64, value: Option<Value>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    pub(crate) fn into_value(self) -> Value {
        Value::Map(self.entries)
    }
}

// ---------------------------------------------------------------------------
// Value destructuring helpers
// ---------------------------------------------------------------------------

/// Short type name for error messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "integer",
        Value::Bytes(_) => "bytes",
        Value::Float(_) => "float",
        Value::Text(_) => "text",
        Value::Bool(_) => "bool",
        Value::Null => "null",
        Value::Tag(_, _) => "tag",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        _ => "unknown",
    }
}

fn unexpected(context: &'static str, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::UnexpectedType {
        context,
        expected,
        found: kind(found),
    }
}

pub(crate) fn into_array(value: Value, context: &'static str) -> Result<Vec<Value>, DecodeError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(unexpected(context, "array", &other)),
    }
}

/// Destructures a positional record of exactly `N` fields.
pub(crate) fn into_record<const N: usize>(
    value: Value,
    context: &'static str,
) -> Result<[Value; N], DecodeError> {
    let items = into_array(value, context)?;
    <[Value; N]>::try_from(items).map_err(|items| DecodeError::ArrayLength {
        context,
        expected: N,
        found: items.len(),
    })
}

pub(crate) fn into_bytes(value: Value, context: &'static str) -> Result<Vec<u8>, DecodeError> {
    match value {
        Value::Bytes(data) => Ok(data),
        other => Err(unexpected(context, "bytes", &other)),
    }
}

pub(crate) fn into_fixed_bytes<const N: usize>(
    value: Value,
    context: &'static str,
) -> Result<[u8; N], DecodeError> {
    let data = into_bytes(value, context)?;
    <[u8; N]>::try_from(data.as_slice()).map_err(|_| DecodeError::ByteLength {
        context,
        expected: N,
        found: data.len(),
    })
}

pub(crate) fn into_u64(value: Value, context: &'static str) -> Result<u64, DecodeError> {
    match value {
        Value::Integer(n) => u64::try_from(n).map_err(|_| DecodeError::IntegerRange { context }),
        other => Err(unexpected(context, "unsigned integer", &other)),
    }
}

pub(crate) fn into_map(
    value: Value,
    context: &'static str,
) -> Result<Vec<(Value, Value)>, DecodeError> {
    match value {
        Value::Map(entries) => Ok(entries),
        other => Err(unexpected(context, "map", &other)),
    }
}

/// Reader for integer-keyed sparse maps.
///
/// Construction rejects non-integer, duplicate and out-of-range keys, so
/// callers only have to ask for the keys they know.
pub(crate) struct KeyedFields {
    context: &'static str,
    fields: BTreeMap<u64, Value>,
}

impl KeyedFields {
    pub(crate) fn parse(
        value: Value,
        context: &'static str,
        max_key: u64,
    ) -> Result<Self, DecodeError> {
        let mut fields = BTreeMap::new();
        for (key, value) in into_map(value, context)? {
            let key = into_u64(key, context)?;
            if key > max_key {
                return Err(DecodeError::UnknownKey { context, key });
            }
            if fields.insert(key, value).is_some() {
                return Err(DecodeError::DuplicateKey { context, key });
            }
        }
        Ok(Self { context, fields })
    }

    pub(crate) fn take(&mut self, key: u64) -> Option<Value> {
        self.fields.remove(&key)
    }

    pub(crate) fn require(&mut self, key: u64) -> Result<Value, DecodeError> {
        self.take(key).ok_or(DecodeError::MissingKey {
            context: self.context,
            key,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
