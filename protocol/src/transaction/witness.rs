//! Witness types and the assembly of a signed [`Transaction`] from a body
//! plus externally produced signatures.
//!
//! Nothing here verifies a signature. The layer checks only what it can
//! without key material: counts line up and every signature is the right
//! size. Cryptographic validity is the ledger's call at submission time.

use ciborium::value::Value;
use tracing::debug;

use super::body::TransactionBody;
use super::signed::Transaction;
use crate::codec::{self, CborDecode, CborEncode, DecodeError, KeyedFields, KeyedMap};
use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::error::{Result, TxError};

const KEY_VKEY_WITNESSES: u64 = 0;

// ---------------------------------------------------------------------------
// VKeyWitness
// ---------------------------------------------------------------------------

/// A verification key and its signature over the body ID:
/// `[vkey, signature]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VKeyWitness {
    pub vkey: Vec<u8>,
    pub signature: Vec<u8>,
}

impl VKeyWitness {
    pub fn new(vkey: Vec<u8>, signature: Vec<u8>) -> Self {
        Self { vkey, signature }
    }

    /// A witness with the exact encoded shape of a real Ed25519 witness
    /// (32-byte key, 64-byte signature), all zeros.
    ///
    /// Used only to measure transaction size before anything is signed. It
    /// carries no key material and would never verify.
    pub fn placeholder() -> Self {
        Self {
            vkey: vec![0u8; PUBLIC_KEY_LENGTH],
            signature: vec![0u8; SIGNATURE_LENGTH],
        }
    }
}

impl CborEncode for VKeyWitness {
    fn to_cbor_value(&self) -> Value {
        Value::Array(vec![codec::bytes(&self.vkey), codec::bytes(&self.signature)])
    }
}

impl CborDecode for VKeyWitness {
    fn from_cbor_value(value: Value) -> std::result::Result<Self, DecodeError> {
        let [vkey, signature] = codec::into_record(value, "vkey witness")?;
        Ok(Self {
            vkey: codec::into_bytes(vkey, "witness vkey")?,
            signature: codec::into_bytes(signature, "witness signature")?,
        })
    }
}

// ---------------------------------------------------------------------------
// WitnessSet
// ---------------------------------------------------------------------------

/// Witness set map. Only key 0 (vkey witnesses) is implemented; the other
/// witness kinds are rejected on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessSet {
    vkey_witnesses: Vec<VKeyWitness>,
}

impl WitnessSet {
    pub fn new(vkey_witnesses: Vec<VKeyWitness>) -> Self {
        Self { vkey_witnesses }
    }

    /// `count` placeholder witnesses, one per input to be signed.
    pub fn placeholder(count: usize) -> Self {
        Self {
            vkey_witnesses: vec![VKeyWitness::placeholder(); count],
        }
    }

    pub fn vkey_witnesses(&self) -> &[VKeyWitness] {
        &self.vkey_witnesses
    }

    pub fn len(&self) -> usize {
        self.vkey_witnesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vkey_witnesses.is_empty()
    }
}

impl CborEncode for WitnessSet {
    fn to_cbor_value(&self) -> Value {
        let vkeys = (!self.vkey_witnesses.is_empty()).then(|| {
            Value::Array(
                self.vkey_witnesses
                    .iter()
                    .map(CborEncode::to_cbor_value)
                    .collect(),
            )
        });
        KeyedMap::new()
            .optional(KEY_VKEY_WITNESSES, vkeys)
            .into_value()
    }
}

impl CborDecode for WitnessSet {
    fn from_cbor_value(value: Value) -> std::result::Result<Self, DecodeError> {
        let mut fields = KeyedFields::parse(value, "witness set", KEY_VKEY_WITNESSES)?;
        let vkey_witnesses = match fields.take(KEY_VKEY_WITNESSES) {
            Some(list) => codec::into_array(list, "vkey witnesses")?
                .into_iter()
                .map(VKeyWitness::from_cbor_value)
                .collect::<std::result::Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(Self { vkey_witnesses })
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

impl TransactionBody {
    /// Pairs `public_keys[i]` with `signatures[i]` into a witness set and
    /// returns the signed transaction. The body itself is left untouched, so
    /// the same body can be signed again with other witnesses.
    ///
    /// Checks, in order:
    ///
    /// 1. as many public keys as signatures;
    /// 2. as many signatures as inputs;
    /// 3. every signature exactly [`SIGNATURE_LENGTH`] bytes.
    ///
    /// Witnesses keep the caller's order. Which key spends which input is
    /// not checked.
    ///
    /// # Errors
    ///
    /// [`TxError::WitnessCountMismatch`] or [`TxError::InvalidSignatureLength`].
    pub fn add_signatures<K, S>(
        &self,
        public_keys: &[K],
        signatures: &[S],
    ) -> Result<Transaction>
    where
        K: AsRef<[u8]>,
        S: AsRef<[u8]>,
    {
        if public_keys.len() != signatures.len() {
            return Err(TxError::WitnessCountMismatch {
                context: "signatures per public key",
                expected: public_keys.len(),
                found: signatures.len(),
            });
        }
        if signatures.len() != self.inputs().len() {
            return Err(TxError::WitnessCountMismatch {
                context: "signatures per input",
                expected: self.inputs().len(),
                found: signatures.len(),
            });
        }

        let witnesses = public_keys
            .iter()
            .zip(signatures)
            .enumerate()
            .map(|(index, (vkey, signature))| {
                let signature = signature.as_ref();
                if signature.len() != SIGNATURE_LENGTH {
                    return Err(TxError::InvalidSignatureLength {
                        index,
                        length: signature.len(),
                    });
                }
                Ok(VKeyWitness::new(vkey.as_ref().to_vec(), signature.to_vec()))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(id = %self.id(), witnesses = witnesses.len(), "witnesses attached");
        Ok(Transaction::new(self.clone(), WitnessSet::new(witnesses), None))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
