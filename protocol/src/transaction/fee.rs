//! Fee estimation for bodies that have not been signed yet.
//!
//! The ledger charges `min_fee_a * size + min_fee_b` on the size of the
//! whole signed transaction, witnesses included. Before signing there are no
//! witnesses to measure, so we measure a stand-in: the body plus one
//! [`VKeyWitness::placeholder`](super::witness::VKeyWitness::placeholder)
//! per input. A placeholder encodes to the same number of bytes as a real
//! Ed25519 witness, so the estimate is exact without touching a key.

use super::body::TransactionBody;
use super::signed::transaction_value;
use super::witness::WitnessSet;
use crate::codec::encode_value;
use crate::config::ProtocolParams;

/// Encoded size `body` will have once each input carries one vkey witness
/// and no metadata is attached.
pub fn simulated_size(body: &TransactionBody) -> usize {
    let witnesses = WitnessSet::placeholder(body.inputs().len());
    encode_value(&transaction_value(body, &witnesses, None)).len()
}

/// Minimum fee for `body` once signed with one witness per input.
pub fn estimate_min_fee(body: &TransactionBody, params: &ProtocolParams) -> u64 {
    params.min_fee(simulated_size(body))
}
