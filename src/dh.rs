//! Diffie-Hellman key agreement, the classical half of the hybrid KEM.

use rand_core::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey as XPublic, StaticSecret as XSecret};

use crate::errors::Error;

/// A Diffie-Hellman group with fixed-size keys and shared secrets.
pub trait Scheme {
    type PrivateKey;
    type PublicKey;

    /// Generates a keypair from the supplied randomness source.
    fn generate<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error>;

    /// Recomputes the public key for `private`. Pure and total for every
    /// key produced by `generate`.
    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey;

    /// Writes the agreement for `(private, public)` into `dst`, which must
    /// be exactly `shared_size` bytes. Fails on a degenerate result.
    fn compute_shared(
        &self,
        dst: &mut [u8],
        private: &Self::PrivateKey,
        public: &Self::PublicKey,
    ) -> Result<(), Error>;

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey);
    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error>;
    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey);
    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error>;

    fn shared_size(&self) -> usize;
    fn public_key_size(&self) -> usize;
    fn private_key_size(&self) -> usize;
}

pub const X25519_PRIVATE_KEY_SIZE: usize = 32;
pub const X25519_PUBLIC_KEY_SIZE: usize = 32;
pub const X25519_SHARED_SIZE: usize = 32;

/// Raw X25519 scalar bytes; clamped when used.
pub type X25519PrivateKey = [u8; X25519_PRIVATE_KEY_SIZE];

/// Encoded X25519 group element.
pub type X25519PublicKey = [u8; X25519_PUBLIC_KEY_SIZE];

/// X25519 over curve25519.
#[derive(Clone, Copy, Debug, Default)]
pub struct X25519;

impl Scheme for X25519 {
    type PrivateKey = X25519PrivateKey;
    type PublicKey = X25519PublicKey;

    fn generate<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        let mut private = [0u8; X25519_PRIVATE_KEY_SIZE];
        rng.try_fill_bytes(&mut private)?;
        Ok((self.derive_public(&private), private))
    }

    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey {
        XPublic::from(&XSecret::from(*private)).to_bytes()
    }

    fn compute_shared(
        &self,
        dst: &mut [u8],
        private: &Self::PrivateKey,
        public: &Self::PublicKey,
    ) -> Result<(), Error> {
        assert_eq!(dst.len(), X25519_SHARED_SIZE, "x25519 shared secret buffer");
        let shared = XSecret::from(*private).diffie_hellman(&XPublic::from(*public));
        if !shared.was_contributory() {
            return Err(Error::WeakPublicKey);
        }
        dst.copy_from_slice(shared.as_bytes());
        Ok(())
    }

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey) {
        assert_eq!(dst.len(), X25519_PUBLIC_KEY_SIZE, "x25519 public key buffer");
        dst.copy_from_slice(public);
    }

    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error> {
        input
            .try_into()
            .map_err(|_| Error::Malformed("x25519 public key size"))
    }

    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey) {
        assert_eq!(dst.len(), X25519_PRIVATE_KEY_SIZE, "x25519 private key buffer");
        dst.copy_from_slice(private);
    }

    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error> {
        input
            .try_into()
            .map_err(|_| Error::Malformed("x25519 private key size"))
    }

    fn shared_size(&self) -> usize {
        X25519_SHARED_SIZE
    }

    fn public_key_size(&self) -> usize {
        X25519_PUBLIC_KEY_SIZE
    }

    fn private_key_size(&self) -> usize {
        X25519_PRIVATE_KEY_SIZE
    }
}
