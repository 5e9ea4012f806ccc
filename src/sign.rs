//! Digital signatures: the scheme contract, the dual and purpose
//! combinators, and the Ed25519 member.

use ed25519_dalek::Signer;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::errors::Error;
use crate::xof;

/// A digital signature scheme with fixed-size keys and signatures.
pub trait Scheme {
    type PrivateKey;
    type PublicKey;

    /// Generates a keypair from the supplied randomness source. Fails only
    /// if the source fails.
    fn generate<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error>;

    /// Recomputes the public key for `private`. Pure and total for every
    /// key produced by `generate`.
    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey;

    /// Signs `msg`, writing the signature into `sig`, which must be exactly
    /// `signature_size` bytes.
    fn sign(&self, sig: &mut [u8], private: &Self::PrivateKey, msg: &[u8]);

    /// Total verification: returns false on any mismatch, including
    /// wrong-length signatures.
    fn verify(&self, public: &Self::PublicKey, msg: &[u8], sig: &[u8]) -> bool;

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey);
    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error>;
    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey);
    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error>;

    fn public_key_size(&self) -> usize;
    fn private_key_size(&self) -> usize;
    fn signature_size(&self) -> usize;
}

/// Key material for a dual signature scheme: one key from each member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DualKey<L, R> {
    pub left: L,
    pub right: R,
}

/// Two signature schemes combined with an AND rule.
///
/// Signatures are the member signatures over the same message, concatenated
/// left-then-right, and both must verify. This is deliberately the opposite
/// combination rule from the hybrid KEM: a forger must break both members,
/// while a KEM attacker must break both there too because the secrets are
/// mixed. Weakening AND to OR here would let one broken member forge alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dual<L, R> {
    pub left: L,
    pub right: R,
}

impl<L: Scheme, R: Scheme> Scheme for Dual<L, R> {
    type PrivateKey = DualKey<L::PrivateKey, R::PrivateKey>;
    type PublicKey = DualKey<L::PublicKey, R::PublicKey>;

    fn generate<G: RngCore + CryptoRng>(
        &self,
        rng: &mut G,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        let (left_pub, left_priv) = self.left.generate(rng)?;
        let (right_pub, right_priv) = self.right.generate(rng)?;
        Ok((
            DualKey { left: left_pub, right: right_pub },
            DualKey { left: left_priv, right: right_priv },
        ))
    }

    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey {
        DualKey {
            left: self.left.derive_public(&private.left),
            right: self.right.derive_public(&private.right),
        }
    }

    fn sign(&self, sig: &mut [u8], private: &Self::PrivateKey, msg: &[u8]) {
        assert_eq!(sig.len(), self.signature_size(), "dual signature buffer");
        let (left, right) = sig.split_at_mut(self.left.signature_size());
        self.left.sign(left, &private.left, msg);
        self.right.sign(right, &private.right, msg);
    }

    fn verify(&self, public: &Self::PublicKey, msg: &[u8], sig: &[u8]) -> bool {
        if sig.len() != self.signature_size() {
            return false;
        }
        let (left, right) = sig.split_at(self.left.signature_size());
        self.left.verify(&public.left, msg, left) && self.right.verify(&public.right, msg, right)
    }

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey) {
        assert_eq!(dst.len(), self.public_key_size(), "dual public key buffer");
        let (left, right) = dst.split_at_mut(self.left.public_key_size());
        self.left.marshal_public(left, &public.left);
        self.right.marshal_public(right, &public.right);
    }

    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error> {
        if input.len() != self.public_key_size() {
            return Err(Error::Malformed("dual public key size"));
        }
        let (left, right) = input.split_at(self.left.public_key_size());
        Ok(DualKey {
            left: self.left.parse_public(left)?,
            right: self.right.parse_public(right)?,
        })
    }

    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey) {
        assert_eq!(dst.len(), self.private_key_size(), "dual private key buffer");
        let (left, right) = dst.split_at_mut(self.left.private_key_size());
        self.left.marshal_private(left, &private.left);
        self.right.marshal_private(right, &private.right);
    }

    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error> {
        if input.len() != self.private_key_size() {
            return Err(Error::Malformed("dual private key size"));
        }
        let (left, right) = input.split_at(self.left.private_key_size());
        Ok(DualKey {
            left: self.left.parse_private(left)?,
            right: self.right.parse_private(right)?,
        })
    }

    fn public_key_size(&self) -> usize {
        self.left.public_key_size() + self.right.public_key_size()
    }

    fn private_key_size(&self) -> usize {
        self.left.private_key_size() + self.right.private_key_size()
    }

    fn signature_size(&self) -> usize {
        self.left.signature_size() + self.right.signature_size()
    }
}

/// Binds a signature scheme to a fixed purpose string.
///
/// Sign and verify first reduce `(purpose, message)` to a 256-bit digest
/// through the XOF, so a key used under one purpose cannot produce
/// signatures recognized under another, even with the member scheme
/// otherwise unchanged.
#[derive(Clone, Debug)]
pub struct Purpose<S, X> {
    pub scheme: S,
    pub xof: X,
    pub purpose: String,
}

impl<S: Scheme, X: xof::Scheme> Purpose<S, X> {
    fn digest(&self, msg: &[u8]) -> [u8; 32] {
        let mut digest = [0u8; 32];
        xof::sum_many(&self.xof, &mut digest, &[self.purpose.as_bytes(), msg]);
        digest
    }
}

impl<S: Scheme, X: xof::Scheme> Scheme for Purpose<S, X> {
    type PrivateKey = S::PrivateKey;
    type PublicKey = S::PublicKey;

    fn generate<G: RngCore + CryptoRng>(
        &self,
        rng: &mut G,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        self.scheme.generate(rng)
    }

    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey {
        self.scheme.derive_public(private)
    }

    fn sign(&self, sig: &mut [u8], private: &Self::PrivateKey, msg: &[u8]) {
        self.scheme.sign(sig, private, &self.digest(msg));
    }

    fn verify(&self, public: &Self::PublicKey, msg: &[u8], sig: &[u8]) -> bool {
        self.scheme.verify(public, &self.digest(msg), sig)
    }

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey) {
        self.scheme.marshal_public(dst, public);
    }

    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error> {
        self.scheme.parse_public(input)
    }

    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey) {
        self.scheme.marshal_private(dst, private);
    }

    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error> {
        self.scheme.parse_private(input)
    }

    fn public_key_size(&self) -> usize {
        self.scheme.public_key_size()
    }

    fn private_key_size(&self) -> usize {
        self.scheme.private_key_size()
    }

    fn signature_size(&self) -> usize {
        self.scheme.signature_size()
    }
}

pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;
pub const ED25519_PRIVATE_KEY_SIZE: usize = 32;
pub const ED25519_SIGNATURE_SIZE: usize = 64;

/// Ed25519 with strict verification.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519;

impl Scheme for Ed25519 {
    type PrivateKey = ed25519_dalek::SigningKey;
    type PublicKey = ed25519_dalek::VerifyingKey;

    fn generate<G: RngCore + CryptoRng>(
        &self,
        rng: &mut G,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        let mut seed = [0u8; ED25519_PRIVATE_KEY_SIZE];
        rng.try_fill_bytes(&mut seed)?;
        let private = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok((private.verifying_key(), private))
    }

    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey {
        private.verifying_key()
    }

    fn sign(&self, sig: &mut [u8], private: &Self::PrivateKey, msg: &[u8]) {
        assert_eq!(sig.len(), ED25519_SIGNATURE_SIZE, "ed25519 signature buffer");
        sig.copy_from_slice(&private.sign(msg).to_bytes());
    }

    fn verify(&self, public: &Self::PublicKey, msg: &[u8], sig: &[u8]) -> bool {
        let Ok(sig_bytes) = <[u8; ED25519_SIGNATURE_SIZE]>::try_from(sig) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        public.verify_strict(msg, &signature).is_ok()
    }

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey) {
        assert_eq!(dst.len(), ED25519_PUBLIC_KEY_SIZE, "ed25519 public key buffer");
        dst.copy_from_slice(public.as_bytes());
    }

    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error> {
        let bytes: [u8; ED25519_PUBLIC_KEY_SIZE] = input
            .try_into()
            .map_err(|_| Error::Malformed("ed25519 public key size"))?;
        ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| Error::Malformed("ed25519 public key"))
    }

    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey) {
        assert_eq!(dst.len(), ED25519_PRIVATE_KEY_SIZE, "ed25519 private key buffer");
        dst.copy_from_slice(&private.to_bytes());
    }

    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error> {
        let bytes: [u8; ED25519_PRIVATE_KEY_SIZE] = input
            .try_into()
            .map_err(|_| Error::Malformed("ed25519 private key size"))?;
        Ok(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    fn public_key_size(&self) -> usize {
        ED25519_PUBLIC_KEY_SIZE
    }

    fn private_key_size(&self) -> usize {
        ED25519_PRIVATE_KEY_SIZE
    }

    fn signature_size(&self) -> usize {
        ED25519_SIGNATURE_SIZE
    }
}
