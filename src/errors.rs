//! Error types for stoa-pq operations.

use thiserror::Error;

/// Errors that can occur during key handling, encryption, or decryption.
///
/// Within [`decrypt`](crate::multipartybox::Scheme::decrypt), per-slot
/// cryptographic failures are never surfaced individually; the only
/// externally visible failure for a well-formed message is
/// [`Error::Undecryptable`].
#[derive(Debug, Error)]
pub enum Error {
    /// A field, key, or ciphertext has the wrong size or an invalid encoding.
    #[error("malformed field: {0}")]
    Malformed(&'static str),

    /// AEAD authentication failed.
    #[error("aead failure")]
    Aead,

    /// KEM decapsulation failed.
    #[error("decapsulation failure")]
    Decapsulation,

    /// A public key is a degenerate group element.
    #[error("weak public key")]
    WeakPublicKey,

    /// Signature verification failed or the signer is not in the allowed list.
    #[error("signature invalid or signer not allowed")]
    BadSignature,

    /// No slot in the message could be decrypted and authenticated.
    #[error("could not decrypt message")]
    Undecryptable,

    /// The caller-supplied randomness source failed.
    #[error("entropy source failure")]
    Entropy(#[from] rand_core::Error),
}
