//! Authenticated encryption with associated data under single-use 256-bit keys.
//!
//! Sealing is deterministic with an all-zero nonce, so a key must never seal
//! more than one message. Callers derive a fresh key per seal, either from a
//! KEM shared secret or from a per-message data encryption key.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};

use crate::errors::Error;

/// An AEAD keyed by a single-use 256-bit value.
pub trait Scheme {
    /// Encrypts `ptext` bound to `ad`, appending ciphertext and tag to `out`.
    fn seal(&self, out: &mut Vec<u8>, key: &[u8; 32], ptext: &[u8], ad: &[u8]);

    /// Verifies and decrypts `ctext` bound to `ad`, appending the plaintext
    /// to `out`. Nothing is appended on failure.
    fn open(&self, out: &mut Vec<u8>, key: &[u8; 32], ctext: &[u8], ad: &[u8]) -> Result<(), Error>;

    /// Bytes added by `seal` beyond the plaintext length.
    fn overhead(&self) -> usize;
}

/// Poly1305 tag length.
pub const CHACHA20POLY1305_OVERHEAD: usize = 16;

/// ChaCha20-Poly1305 (IETF) with a fixed zero nonce.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChaCha20Poly1305;

impl Scheme for ChaCha20Poly1305 {
    fn seal(&self, out: &mut Vec<u8>, key: &[u8; 32], ptext: &[u8], ad: &[u8]) {
        let cipher = chacha20poly1305::ChaCha20Poly1305::new(key.into());
        let ctext = cipher
            .encrypt(
                &chacha20poly1305::Nonce::default(),
                Payload { msg: ptext, aad: ad },
            )
            .expect("aead seal");
        out.extend_from_slice(&ctext);
    }

    fn open(&self, out: &mut Vec<u8>, key: &[u8; 32], ctext: &[u8], ad: &[u8]) -> Result<(), Error> {
        let cipher = chacha20poly1305::ChaCha20Poly1305::new(key.into());
        let ptext = cipher
            .decrypt(
                &chacha20poly1305::Nonce::default(),
                Payload { msg: ctext, aad: ad },
            )
            .map_err(|_| Error::Aead)?;
        out.extend_from_slice(&ptext);
        Ok(())
    }

    fn overhead(&self) -> usize {
        CHACHA20POLY1305_OVERHEAD
    }
}
