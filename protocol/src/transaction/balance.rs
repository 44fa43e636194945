//! Fee and change balancing.
//!
//! The fee depends on the encoded size, and the size depends on whether a
//! change output exists, which in turn depends on the fee. The balancer
//! breaks the cycle in two measured passes:
//!
//! 1. Write a provisional fee ([`FEE_PLACEHOLDER`]) so the body encodes at
//!    its final width, and measure `min_fee` without change.
//! 2. Decide between three outcomes:
//!    - **exact**: inputs equal outputs plus `min_fee`, so the fee is `min_fee`;
//!    - **burn**: the leftover is below the dust threshold and goes into the fee;
//!    - **change**: prepend a change output, measure again, and shrink the
//!      change by however much the fee grew. The adjusted change is kept even
//!      if that pushes it under the dust threshold; only a leftover too small
//!      to pay for its own output at all is burned instead.
//!
//! One re-measurement is enough. Adding a single output grows the encoding
//! by a fixed amount, and the adjusted change is never larger than the
//! provisional one, so its integer width can only stay the same or shrink.
//! The final transaction is therefore never larger than the one that was
//! priced. If it shrinks, the fee overpays by a few bytes' worth.
//!
//! Every path returns a body with `sum(inputs) == sum(outputs) + fee`.

use tracing::debug;

use super::body::TransactionBody;
use super::fee::estimate_min_fee;
use super::types::{Address, TransactionOutput};
use crate::config::{ProtocolParams, FEE_PLACEHOLDER};
use crate::error::{Result, TxError};

/// Balances `body` against `input_amount`, returning the finished body.
///
/// `body` is consumed; callers never observe a half-balanced value. Any
/// change output goes to `change_address` and is placed first.
///
/// # Errors
///
/// - [`TxError::InsufficientFunds`] when `input_amount` cannot cover the
///   outputs plus the minimum fee. Nothing is retried; the caller should
///   select more inputs.
/// - [`TxError::AmountOverflow`] when the output amounts alone overflow
///   `u64`.
pub(crate) fn balance(
    mut body: TransactionBody,
    input_amount: u64,
    change_address: &Address,
    params: &ProtocolParams,
) -> Result<TransactionBody> {
    body.fee = FEE_PLACEHOLDER;
    let min_fee = estimate_min_fee(&body, params);

    let output_amount = body.total_output()?;
    // A total past u64::MAX is beyond any input, so it is a shortfall too.
    let required = match output_amount.checked_add(min_fee) {
        Some(required) if required <= input_amount => required,
        total => {
            let required = total.unwrap_or(u64::MAX);
            debug!(
                available = input_amount,
                required, "insufficient input to cover outputs and fee"
            );
            return Err(TxError::InsufficientFunds {
                available: input_amount,
                required,
            });
        }
    };

    if input_amount == required {
        body.fee = min_fee;
        debug!(fee = min_fee, "inputs exactly cover outputs and fee");
        return Ok(body);
    }

    let change = input_amount - required;
    if change < params.minimum_utxo_value {
        // Below the dust threshold: not worth an output of its own.
        body.fee = min_fee + change;
        debug!(
            fee = body.fee,
            burned = change,
            "change below dust threshold burned into fee"
        );
        return Ok(body);
    }

    body.outputs
        .insert(0, TransactionOutput::new(change_address.clone(), change));
    let new_min_fee = estimate_min_fee(&body, params);

    // change + min_fee <= input_amount, so the addition cannot overflow.
    match (change + min_fee).checked_sub(new_min_fee) {
        Some(amount) => {
            body.outputs[0].amount = amount;
            body.fee = new_min_fee;
            debug!(fee = new_min_fee, change = amount, "change output added");
        }
        None => {
            // The leftover cannot even pay for the bytes of its own output.
            body.outputs.remove(0);
            body.fee = min_fee + change;
            debug!(
                fee = body.fee,
                burned = change,
                "change could not pay for its own output, burned into fee"
            );
        }
    }

    debug_assert_eq!(
        body.total_output().ok().and_then(|out| out.checked_add(body.fee)),
        Some(input_amount),
        "balanced body must conserve value"
    );
    Ok(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::fee::simulated_size;
    use crate::transaction::types::{TransactionId, TransactionInput};

    const PAYMENT: u64 = 500_000;
    /// `[body, witnesses, null]` for one input, one 57-byte output, 4-byte
    /// fee and ttl is 224 bytes: 44 * 224 + 155_381.
    const MIN_FEE_ONE_OUTPUT: u64 = 165_237;
    /// The change output adds 65 bytes: 44 * 289 + 155_381.
    const MIN_FEE_WITH_CHANGE: u64 = 168_097;

    fn receiver() -> Address {
        Address::from_bytes(vec![0x01; 57])
    }

    fn change_address() -> Address {
        Address::from_bytes(vec![0x02; 57])
    }

    fn unbalanced() -> TransactionBody {
        TransactionBody::unbalanced(
            vec![TransactionInput::new(TransactionId::from_bytes([0xEE; 32]), 0)],
            vec![TransactionOutput::new(receiver(), PAYMENT)],
            10_000_000,
        )
    }

    fn params() -> ProtocolParams {
        ProtocolParams::mainnet_shelley()
    }

    fn assert_conserves(body: &TransactionBody, input_amount: u64) {
        assert_eq!(body.total_output().unwrap() + body.fee(), input_amount);
    }

    fn assert_fee_floor(body: &TransactionBody, params: &ProtocolParams) {
        assert!(body.fee() >= params.min_fee(simulated_size(body)));
    }

    #[test]
    fn change_output_is_prepended_and_fee_recomputed() {
        let input = 2_000_000;
        let body = balance(unbalanced(), input, &change_address(), &params()).unwrap();

        assert_eq!(body.outputs().len(), 2);
        assert_eq!(body.outputs()[0].address, change_address());
        assert_eq!(body.outputs()[1].address, receiver());
        assert_eq!(body.outputs()[1].amount, PAYMENT);
        assert_eq!(body.fee(), MIN_FEE_WITH_CHANGE);
        assert_eq!(body.outputs()[0].amount, 1_331_903);
        assert_conserves(&body, input);
        assert_fee_floor(&body, &params());
        // Final fee is exactly the minimum for the final transaction.
        assert_eq!(body.fee(), params().min_fee(simulated_size(&body)));
    }

    #[test]
    fn exact_input_yields_no_change() {
        let input = PAYMENT + MIN_FEE_ONE_OUTPUT;
        let body = balance(unbalanced(), input, &change_address(), &params()).unwrap();

        assert_eq!(body.outputs().len(), 1);
        assert_eq!(body.fee(), MIN_FEE_ONE_OUTPUT);
        assert_conserves(&body, input);
        assert_fee_floor(&body, &params());
    }

    #[test]
    fn dust_surplus_is_burned_into_fee() {
        let input = PAYMENT + MIN_FEE_ONE_OUTPUT + 300_000;
        let body = balance(unbalanced(), input, &change_address(), &params()).unwrap();

        assert_eq!(body.outputs().len(), 1);
        assert_eq!(body.fee(), MIN_FEE_ONE_OUTPUT + 300_000);
        assert_conserves(&body, input);
    }

    #[test]
    fn surplus_just_under_threshold_is_burned() {
        let input = PAYMENT + MIN_FEE_ONE_OUTPUT + params().minimum_utxo_value - 1;
        let body = balance(unbalanced(), input, &change_address(), &params()).unwrap();
        assert_eq!(body.outputs().len(), 1);
        assert_conserves(&body, input);
    }

    #[test]
    fn change_shrunk_under_threshold_is_still_prepended() {
        // Leftover clears the threshold, then pays the 65-byte output's own
        // fee (44 * 65 = 2_860) and ends up just under it.
        let leftover = params().minimum_utxo_value + 500;
        let input = PAYMENT + MIN_FEE_ONE_OUTPUT + leftover;
        let body = balance(unbalanced(), input, &change_address(), &params()).unwrap();

        assert_eq!(body.outputs().len(), 2);
        assert_eq!(body.outputs()[0].address, change_address());
        assert_eq!(body.fee(), MIN_FEE_WITH_CHANGE);
        assert_eq!(
            body.outputs()[0].amount,
            leftover + MIN_FEE_ONE_OUTPUT - MIN_FEE_WITH_CHANGE
        );
        assert!(body.outputs()[0].amount < params().minimum_utxo_value);
        assert_conserves(&body, input);
        assert_fee_floor(&body, &params());
    }

    #[test]
    fn zero_threshold_never_underflows_change() {
        let params = ProtocolParams {
            minimum_utxo_value: 0,
            ..params()
        };
        let input = PAYMENT + MIN_FEE_ONE_OUTPUT + 1_000;
        let body = balance(unbalanced(), input, &change_address(), &params).unwrap();

        assert_eq!(body.outputs().len(), 1, "1_000 cannot cover a 63-byte output");
        assert_eq!(body.fee(), MIN_FEE_ONE_OUTPUT + 1_000);
        assert_conserves(&body, input);
    }

    #[test]
    fn insufficient_input_reports_shortfall() {
        let err = balance(unbalanced(), 600_000, &change_address(), &params()).unwrap_err();
        match err {
            TxError::InsufficientFunds {
                available,
                required,
            } => {
                assert_eq!(available, 600_000);
                assert_eq!(required, PAYMENT + MIN_FEE_ONE_OUTPUT);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn one_lovelace_short_is_insufficient() {
        let input = PAYMENT + MIN_FEE_ONE_OUTPUT - 1;
        assert!(matches!(
            balance(unbalanced(), input, &change_address(), &params()),
            Err(TxError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn required_total_past_u64_max_is_insufficient() {
        let body = TransactionBody::unbalanced(
            vec![TransactionInput::new(TransactionId::from_bytes([0xEE; 32]), 0)],
            vec![TransactionOutput::new(receiver(), u64::MAX - 10)],
            10_000_000,
        );
        for input in [u64::MAX - 5, u64::MAX] {
            match balance(body.clone(), input, &change_address(), &params()) {
                Err(TxError::InsufficientFunds {
                    available,
                    required,
                }) => {
                    assert_eq!(available, input);
                    assert_eq!(required, u64::MAX);
                }
                other => panic!("expected insufficient funds, got {other:?}"),
            }
        }
    }

    #[test]
    fn overflowing_outputs_are_rejected() {
        let body = TransactionBody::unbalanced(
            vec![],
            vec![
                TransactionOutput::new(receiver(), u64::MAX),
                TransactionOutput::new(receiver(), 1),
            ],
            1,
        );
        assert!(matches!(
            balance(body, u64::MAX, &change_address(), &params()),
            Err(TxError::AmountOverflow(_))
        ));
    }

    #[test]
    fn large_change_is_conserved_across_many_inputs() {
        let inputs = (0..5u8)
            .map(|i| TransactionInput::new(TransactionId::from_bytes([i; 32]), i as u64))
            .collect();
        let body = TransactionBody::unbalanced(
            inputs,
            vec![
                TransactionOutput::new(receiver(), 3_000_000),
                TransactionOutput::new(Address::from_bytes(vec![0x03; 29]), 7_000_000),
            ],
            80_000_000,
        );
        let input = 5 * 10_000_000_000;
        let body = balance(body, input, &change_address(), &params()).unwrap();

        assert_eq!(body.outputs().len(), 3);
        assert_eq!(body.outputs()[0].address, change_address());
        assert_conserves(&body, input);
        assert_fee_floor(&body, &params());
    }
}
