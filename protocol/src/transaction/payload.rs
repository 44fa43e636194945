//! Optional body payloads: certificates (key 4), withdrawals (key 5) and
//! protocol updates (key 6).
//!
//! The builder passes these through untouched. Each is an open tagged union
//! whose only variant keeps the decoded CBOR verbatim, so a body carrying
//! them survives a decode/encode round trip unchanged and typed variants can
//! be added alongside without touching the body codec.

use ciborium::value::Value;

use crate::codec::{self, CborDecode, CborEncode, DecodeError};

/// A delegation, registration or retirement certificate.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Certificate {
    /// Certificate kept as its raw CBOR array.
    Unparsed(Value),
}

impl CborEncode for Certificate {
    fn to_cbor_value(&self) -> Value {
        match self {
            Certificate::Unparsed(value) => value.clone(),
        }
    }
}

impl CborDecode for Certificate {
    fn from_cbor_value(value: Value) -> Result<Self, DecodeError> {
        // Every certificate kind is `[kind, ...fields]`.
        let items = codec::into_array(value, "certificate")?;
        Ok(Certificate::Unparsed(Value::Array(items)))
    }
}

/// Reward withdrawals, a map from reward account to amount.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Withdrawals {
    Unparsed(Value),
}

impl CborEncode for Withdrawals {
    fn to_cbor_value(&self) -> Value {
        match self {
            Withdrawals::Unparsed(value) => value.clone(),
        }
    }
}

impl CborDecode for Withdrawals {
    fn from_cbor_value(value: Value) -> Result<Self, DecodeError> {
        let entries = codec::into_map(value, "withdrawals")?;
        Ok(Withdrawals::Unparsed(Value::Map(entries)))
    }
}

/// A protocol parameter update proposal, `[proposals, epoch]`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProtocolUpdate {
    Unparsed(Value),
}

impl CborEncode for ProtocolUpdate {
    fn to_cbor_value(&self) -> Value {
        match self {
            ProtocolUpdate::Unparsed(value) => value.clone(),
        }
    }
}

impl CborDecode for ProtocolUpdate {
    fn from_cbor_value(value: Value) -> Result<Self, DecodeError> {
        let [proposals, epoch] = codec::into_record(value, "protocol update")?;
        Ok(ProtocolUpdate::Unparsed(Value::Array(vec![proposals, epoch])))
    }
}
