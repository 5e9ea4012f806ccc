//! Version 1 parameter set.
//!
//! Binds the generic multiparty box to concrete primitives. This module is
//! configuration only; changing the suite means editing the aliases and
//! constructor here, not the protocol.

use crate::{aead, dh, kem, multipartybox, sign, xof};

/// Algorithm suite identifier for the version 1 parameter set.
pub const SUITE_V1: &str = "X25519+ML-KEM-768+Ed25519+ChaCha20Poly1305+SHAKE256";

/// Hybrid KEM: X25519 DH-KEM on the left, ML-KEM-768 on the right.
pub type KemV1 = kem::Dual<kem::DhKem<dh::X25519, xof::Shake256>, kem::MlKem768, xof::Shake256>;

pub type KemPrivateKeyV1 = kem::DualKey<dh::X25519PrivateKey, kem::MlKem768PrivateKey>;
pub type KemPublicKeyV1 = kem::DualKey<dh::X25519PublicKey, kem::MlKem768PublicKey>;
pub type SignPrivateKeyV1 = ed25519_dalek::SigningKey;
pub type SignPublicKeyV1 = ed25519_dalek::VerifyingKey;
pub type XofStateV1 = xof::Shake256State;

pub type PrivateKeyV1 = multipartybox::PrivateKey<KemPrivateKeyV1, SignPrivateKeyV1>;
pub type PublicKeyV1 = multipartybox::PublicKey<KemPublicKeyV1, SignPublicKeyV1>;

/// The version 1 multiparty box scheme type.
pub type SchemeV1 = multipartybox::Scheme<KemV1, sign::Ed25519, aead::ChaCha20Poly1305, xof::Shake256>;

/// Returns the version 1 multiparty box scheme.
pub fn new() -> SchemeV1 {
    multipartybox::Scheme {
        kem: kem::Dual {
            left: kem::DhKem { dh: dh::X25519, xof: xof::Shake256 },
            right: kem::MlKem768,
            xof: xof::Shake256,
        },
        sign: sign::Ed25519,
        aead: aead::ChaCha20Poly1305,
        xof: xof::Shake256,
    }
}

/// Serialized v1 KEM public key length.
pub const KEM_PUBLIC_KEY_SIZE: usize =
    dh::X25519_PUBLIC_KEY_SIZE + kem::MLKEM768_PUBLIC_KEY_SIZE;
/// Serialized v1 KEM private key length.
pub const KEM_PRIVATE_KEY_SIZE: usize =
    dh::X25519_PRIVATE_KEY_SIZE + kem::MLKEM768_PRIVATE_KEY_SIZE;
/// v1 KEM ciphertext length (ephemeral X25519 key plus ML-KEM ciphertext).
pub const KEM_CIPHERTEXT_SIZE: usize =
    dh::X25519_PUBLIC_KEY_SIZE + kem::MLKEM768_CIPHERTEXT_SIZE;
/// Serialized v1 multiparty box public key length.
pub const PUBLIC_KEY_SIZE: usize = KEM_PUBLIC_KEY_SIZE + sign::ED25519_PUBLIC_KEY_SIZE;
/// v1 per-recipient slot length.
pub const SLOT_SIZE: usize =
    KEM_CIPHERTEXT_SIZE + sign::ED25519_SIGNATURE_SIZE + 32 + aead::CHACHA20POLY1305_OVERHEAD;

const _: () = assert!(KEM_PUBLIC_KEY_SIZE == 1216);
const _: () = assert!(KEM_PRIVATE_KEY_SIZE == 64);
const _: () = assert!(KEM_CIPHERTEXT_SIZE == 1120);
const _: () = assert!(PUBLIC_KEY_SIZE == 1248);
const _: () = assert!(SLOT_SIZE == 1232);
