//! # stoa-pq
//!
//! Hybrid multi-recipient authenticated encryption ("multiparty box")
//! built from swappable scheme contracts.
//!
//! A writer encrypts one plaintext for any list of reader public keys.
//! Each reader decrypts independently and learns which writer, from a
//! caller-approved candidate list, produced the message. Failed
//! decryptions are deliberately uninformative: a wrong key, a missing
//! slot, and a tampered ciphertext all fail identically.
//!
//! ## Scheme contracts
//!
//! The crate is organized around four capability contracts, each a trait
//! with swappable instances:
//!
//! - [`xof::Scheme`] -- extendable-output hashing, key derivation, and
//!   deterministic random streams (SHAKE256).
//! - [`kem::Scheme`] -- key encapsulation with 256-bit shared secrets,
//!   including the [`kem::Dual`] hybrid combinator and a
//!   [`kem::DhKem`] built over Diffie-Hellman.
//! - [`aead::Scheme`] -- authenticated encryption under single-use keys
//!   (ChaCha20-Poly1305).
//! - [`sign::Scheme`] -- signatures, including the AND-composed
//!   [`sign::Dual`] and the domain-separating [`sign::Purpose`] wrapper.
//!
//! ## Algorithm suite (v1)
//!
//! - **Key encapsulation:** X25519 DH-KEM dual-combined with ML-KEM-768,
//!   secure while either member holds up
//! - **Writer authentication:** Ed25519 over each per-recipient slot
//! - **Symmetric encryption:** ChaCha20-Poly1305 under single-use keys
//! - **Hashing and key derivation:** SHAKE256
//!
//! ## Example
//!
//! ```rust
//! use rand_core::RngCore;
//! use stoa_pq::v1;
//!
//! # fn main() -> Result<(), stoa_pq::Error> {
//! let scheme = v1::new();
//! let mut rng = rand::rngs::OsRng;
//!
//! let (writer_pub, writer_priv) = scheme.generate(&mut rng)?;
//! let (reader_pub, reader_priv) = scheme.generate(&mut rng)?;
//!
//! let mut seed = [0u8; 32];
//! rng.try_fill_bytes(&mut seed)?;
//!
//! let wire = scheme.encrypt(&writer_priv, &[reader_pub.kem.clone()], &seed, b"hello")?;
//! let (writer, ptext) = scheme.decrypt(&reader_priv, &[writer_pub.sign], &wire)?;
//!
//! assert_eq!(writer, 0);
//! assert_eq!(ptext, b"hello");
//! # Ok(())
//! # }
//! ```
//!
//! ## Security considerations
//!
//! - Key generation draws from the caller-supplied randomness source; use
//!   the operating system source for long-lived keys
//! - Private keys must be destroyed by the caller when no longer needed;
//!   seed-holding key types in this crate zeroize on drop
//! - `encrypt_det` trades unlinkability for byte-for-byte determinism;
//!   see its documentation before using it
//! - Scheme values are configuration, not state; construct them freely and
//!   share them across threads
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0.

pub mod aead;
pub mod dh;
mod errors;
pub mod kem;
pub mod multipartybox;
pub mod sign;
pub mod v1;
pub mod xof;

pub use errors::Error;
