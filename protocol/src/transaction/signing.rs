//! Signing a balanced body with local keys.
//!
//! Signing is a separate step from building because the key may not be
//! available at construction time (hardware wallet, remote signer). Every
//! witness signs the same message: the 32-byte transaction ID.
//!
//! Callers holding signatures from elsewhere skip this module and go
//! straight to [`TransactionBody::add_signatures`].

use ed25519_dalek::{Signature, Signer, SigningKey};

use super::body::TransactionBody;
use super::signed::Transaction;
use crate::error::Result;

/// Anything that can produce a vkey witness: a verification key plus a
/// signature over arbitrary bytes.
pub trait TransactionSigner {
    /// Raw verification key bytes placed in the witness.
    fn public_key(&self) -> Vec<u8>;

    /// Signature over `message`.
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

impl TransactionSigner for SigningKey {
    fn public_key(&self) -> Vec<u8> {
        self.verifying_key().to_bytes().to_vec()
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        <Self as Signer<Signature>>::sign(self, message)
            .to_bytes()
            .to_vec()
    }
}

/// Signs `body`'s ID with each signer in order and assembles the
/// transaction.
///
/// One signer per input, in input order. The same validation as
/// [`TransactionBody::add_signatures`] applies, so a signer producing a
/// malformed signature is reported there.
///
/// # Example
///
/// ```rust,no_run
/// use ed25519_dalek::SigningKey;
/// use shelley_tx::transaction::{sign_body, TransactionBody, TransactionSigner};
///
/// # fn demo(body: &TransactionBody) -> shelley_tx::error::Result<()> {
/// let key = SigningKey::from_bytes(&[7u8; 32]);
/// let tx = sign_body(body, &[&key as &dyn TransactionSigner])?;
/// assert_eq!(tx.id(), body.id());
/// # Ok(())
/// # }
/// ```
pub fn sign_body(
    body: &TransactionBody,
    signers: &[&dyn TransactionSigner],
) -> Result<Transaction> {
    let id = body.id();
    let (public_keys, signatures): (Vec<_>, Vec<_>) = signers
        .iter()
        .map(|signer| (signer.public_key(), signer.sign(id.as_bytes())))
        .unzip();
    body.add_signatures(&public_keys, &signatures)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
