//! Key encapsulation: the scheme contract, the hybrid combinator, a
//! KEM built from Diffie-Hellman, and the ML-KEM-768 member.

use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{EncodedSizeUser, KemCore};
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::dh;
use crate::errors::Error;
use crate::xof;

/// Byte length of every shared secret produced by a [`Scheme`].
pub const SHARED_SECRET_SIZE: usize = 32;

/// A key encapsulation mechanism with 256-bit shared secrets.
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

    /// Encapsulates to `public`, writing the shared secret into `shared` and
    /// the ciphertext into `ct`. Deterministic given `seed`; internal
    /// randomness is derived from the seed through the XOF. `ct` must be
    /// exactly `ciphertext_size` bytes.
    fn encapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        ct: &mut [u8],
        public: &Self::PublicKey,
        seed: &[u8; 32],
    ) -> Result<(), Error>;

    /// Recovers the shared secret from `ct`. A malformed ciphertext and a
    /// valid ciphertext for a different key fail the same way.
    fn decapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        private: &Self::PrivateKey,
        ct: &[u8],
    ) -> Result<(), Error>;

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey);
    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error>;
    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey);
    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error>;

    fn public_key_size(&self) -> usize;
    fn private_key_size(&self) -> usize;
    fn ciphertext_size(&self) -> usize;
}

/// Key material for a hybrid scheme: one key from each member.
///
/// Order is significant; by the convention of the v1 suite the left member
/// is classical and the right member is post-quantum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DualKey<L, R> {
    pub left: L,
    pub right: R,
}

/// Hybrid of two KEMs.
///
/// Ciphertexts are the two member ciphertexts concatenated left-then-right.
/// The combined shared secret is the XOF over both member secrets in that
/// order, so the combination remains secure while either member does.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dual<L, R, X> {
    pub left: L,
    pub right: R,
    pub xof: X,
}

impl<L: Scheme, R: Scheme, X: xof::Scheme> Scheme for Dual<L, R, X> {
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

    fn encapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        ct: &mut [u8],
        public: &Self::PublicKey,
        seed: &[u8; 32],
    ) -> Result<(), Error> {
        assert_eq!(ct.len(), self.ciphertext_size(), "dual kem ciphertext buffer");
        let (left_ct, right_ct) = ct.split_at_mut(self.left.ciphertext_size());
        // Both members receive the same seed; each derives its own internal
        // randomness from it through the XOF, keeping the joint seed space
        // at 256 bits.
        let mut left_shared = [0u8; SHARED_SECRET_SIZE];
        let mut right_shared = [0u8; SHARED_SECRET_SIZE];
        self.left.encapsulate(&mut left_shared, left_ct, &public.left, seed)?;
        self.right.encapsulate(&mut right_shared, right_ct, &public.right, seed)?;
        xof::sum_many(&self.xof, shared, &[&left_shared, &right_shared]);
        left_shared.zeroize();
        right_shared.zeroize();
        Ok(())
    }

    fn decapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        private: &Self::PrivateKey,
        ct: &[u8],
    ) -> Result<(), Error> {
        if ct.len() != self.ciphertext_size() {
            return Err(Error::Malformed("dual kem ciphertext size"));
        }
        let (left_ct, right_ct) = ct.split_at(self.left.ciphertext_size());
        let mut left_shared = [0u8; SHARED_SECRET_SIZE];
        let mut right_shared = [0u8; SHARED_SECRET_SIZE];
        self.left.decapsulate(&mut left_shared, &private.left, left_ct)?;
        self.right.decapsulate(&mut right_shared, &private.right, right_ct)?;
        xof::sum_many(&self.xof, shared, &[&left_shared, &right_shared]);
        left_shared.zeroize();
        right_shared.zeroize();
        Ok(())
    }

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey) {
        assert_eq!(dst.len(), self.public_key_size(), "dual kem public key buffer");
        let (left, right) = dst.split_at_mut(self.left.public_key_size());
        self.left.marshal_public(left, &public.left);
        self.right.marshal_public(right, &public.right);
    }

    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error> {
        if input.len() != self.public_key_size() {
            return Err(Error::Malformed("dual kem public key size"));
        }
        let (left, right) = input.split_at(self.left.public_key_size());
        Ok(DualKey {
            left: self.left.parse_public(left)?,
            right: self.right.parse_public(right)?,
        })
    }

    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey) {
        assert_eq!(dst.len(), self.private_key_size(), "dual kem private key buffer");
        let (left, right) = dst.split_at_mut(self.left.private_key_size());
        self.left.marshal_private(left, &private.left);
        self.right.marshal_private(right, &private.right);
    }

    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error> {
        if input.len() != self.private_key_size() {
            return Err(Error::Malformed("dual kem private key size"));
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

    fn ciphertext_size(&self) -> usize {
        self.left.ciphertext_size() + self.right.ciphertext_size()
    }
}

const DHKEM_EPH_INFO: &[u8] = b"dhkem/eph";

/// A KEM over a Diffie-Hellman scheme.
///
/// The ciphertext is an ephemeral public key. The shared secret is the XOF
/// over the raw agreement bound to the ephemeral and recipient public keys,
/// so it commits to the full exchange transcript.
#[derive(Clone, Copy, Debug, Default)]
pub struct DhKem<D, X> {
    pub dh: D,
    pub xof: X,
}

impl<D: dh::Scheme, X: xof::Scheme> DhKem<D, X> {
    fn combine(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        raw: &[u8],
        eph_pub: &[u8],
        recipient_pub: &D::PublicKey,
    ) {
        let mut pk = vec![0u8; self.dh.public_key_size()];
        self.dh.marshal_public(&mut pk, recipient_pub);
        xof::sum_many(&self.xof, shared, &[raw, eph_pub, &pk]);
    }
}

impl<D: dh::Scheme, X: xof::Scheme> Scheme for DhKem<D, X> {
    type PrivateKey = D::PrivateKey;
    type PublicKey = D::PublicKey;

    fn generate<G: RngCore + CryptoRng>(
        &self,
        rng: &mut G,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        self.dh.generate(rng)
    }

    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey {
        self.dh.derive_public(private)
    }

    fn encapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        ct: &mut [u8],
        public: &Self::PublicKey,
        seed: &[u8; 32],
    ) -> Result<(), Error> {
        assert_eq!(ct.len(), self.ciphertext_size(), "dh kem ciphertext buffer");
        let mut eph_bytes = vec![0u8; self.dh.private_key_size()];
        xof::derive_key256(&self.xof, &mut eph_bytes, seed, DHKEM_EPH_INFO);
        let eph_priv = self.dh.parse_private(&eph_bytes)?;
        eph_bytes.zeroize();
        let eph_pub = self.dh.derive_public(&eph_priv);
        self.dh.marshal_public(ct, &eph_pub);

        let mut raw = vec![0u8; self.dh.shared_size()];
        self.dh.compute_shared(&mut raw, &eph_priv, public)?;
        self.combine(shared, &raw, ct, public);
        raw.zeroize();
        Ok(())
    }

    fn decapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        private: &Self::PrivateKey,
        ct: &[u8],
    ) -> Result<(), Error> {
        if ct.len() != self.ciphertext_size() {
            return Err(Error::Malformed("dh kem ciphertext size"));
        }
        let eph_pub = self.dh.parse_public(ct)?;
        let mut raw = vec![0u8; self.dh.shared_size()];
        self.dh
            .compute_shared(&mut raw, private, &eph_pub)
            .map_err(|_| Error::Decapsulation)?;
        let recipient_pub = self.dh.derive_public(private);
        self.combine(shared, &raw, ct, &recipient_pub);
        raw.zeroize();
        Ok(())
    }

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey) {
        self.dh.marshal_public(dst, public);
    }

    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error> {
        self.dh.parse_public(input)
    }

    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey) {
        self.dh.marshal_private(dst, private);
    }

    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error> {
        self.dh.parse_private(input)
    }

    fn public_key_size(&self) -> usize {
        self.dh.public_key_size()
    }

    fn private_key_size(&self) -> usize {
        self.dh.private_key_size()
    }

    fn ciphertext_size(&self) -> usize {
        self.dh.public_key_size()
    }
}

type MlKemEk = <ml_kem::MlKem768 as KemCore>::EncapsulationKey;
type MlKemDk = <ml_kem::MlKem768 as KemCore>::DecapsulationKey;

pub const MLKEM768_PUBLIC_KEY_SIZE: usize = 1184;
pub const MLKEM768_PRIVATE_KEY_SIZE: usize = 32;
pub const MLKEM768_CIPHERTEXT_SIZE: usize = 1088;

const MLKEM_KEYGEN_INFO: &[u8] = b"mlkem/keygen";
const MLKEM_ENC_INFO: &[u8] = b"mlkem/enc";

/// Encoded ML-KEM-768 encapsulation key.
pub type MlKem768PublicKey = [u8; MLKEM768_PUBLIC_KEY_SIZE];

/// Seed form of an ML-KEM-768 decapsulation key.
///
/// The full keypair is re-expanded from the seed through SHAKE256 on every
/// use, which keeps `derive_public` a pure recomputation and the marshalled
/// form a fixed 32 bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MlKem768PrivateKey {
    seed: [u8; MLKEM768_PRIVATE_KEY_SIZE],
}

/// ML-KEM-768, the post-quantum member of the v1 hybrid.
#[derive(Clone, Copy, Debug, Default)]
pub struct MlKem768;

fn mlkem_expand(seed: &[u8; MLKEM768_PRIVATE_KEY_SIZE]) -> (MlKemDk, MlKemEk) {
    let mut rng = xof::DeterministicRng::with_info(xof::Shake256, seed, MLKEM_KEYGEN_INFO);
    ml_kem::MlKem768::generate(&mut rng)
}

impl Scheme for MlKem768 {
    type PrivateKey = MlKem768PrivateKey;
    type PublicKey = MlKem768PublicKey;

    fn generate<G: RngCore + CryptoRng>(
        &self,
        rng: &mut G,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        let mut seed = [0u8; MLKEM768_PRIVATE_KEY_SIZE];
        rng.try_fill_bytes(&mut seed)?;
        let private = MlKem768PrivateKey { seed };
        Ok((self.derive_public(&private), private))
    }

    fn derive_public(&self, private: &Self::PrivateKey) -> Self::PublicKey {
        let (_, ek) = mlkem_expand(&private.seed);
        let mut public = [0u8; MLKEM768_PUBLIC_KEY_SIZE];
        public.copy_from_slice(ek.as_bytes().as_ref());
        public
    }

    fn encapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        ct: &mut [u8],
        public: &Self::PublicKey,
        seed: &[u8; 32],
    ) -> Result<(), Error> {
        assert_eq!(ct.len(), MLKEM768_CIPHERTEXT_SIZE, "ml-kem ciphertext buffer");
        let ek_bytes: ml_kem::Encoded<MlKemEk> = public
            .as_slice()
            .try_into()
            .map_err(|_| Error::Malformed("ml-kem public key"))?;
        let ek = MlKemEk::from_bytes(&ek_bytes);
        let mut rng = xof::DeterministicRng::with_info(xof::Shake256, seed, MLKEM_ENC_INFO);
        let (kem_ct, ss) = ek
            .encapsulate(&mut rng)
            .map_err(|_| Error::Malformed("ml-kem encapsulation"))?;
        ct.copy_from_slice(kem_ct.as_slice());
        shared.copy_from_slice(ss.as_slice());
        Ok(())
    }

    fn decapsulate(
        &self,
        shared: &mut [u8; SHARED_SECRET_SIZE],
        private: &Self::PrivateKey,
        ct: &[u8],
    ) -> Result<(), Error> {
        if ct.len() != MLKEM768_CIPHERTEXT_SIZE {
            return Err(Error::Malformed("ml-kem ciphertext size"));
        }
        let (dk, _) = mlkem_expand(&private.seed);
        let kem_ct: ml_kem::Ciphertext<ml_kem::MlKem768> = ct
            .try_into()
            .map_err(|_| Error::Malformed("ml-kem ciphertext"))?;
        let ss = dk.decapsulate(&kem_ct).map_err(|_| Error::Decapsulation)?;
        shared.copy_from_slice(ss.as_slice());
        Ok(())
    }

    fn marshal_public(&self, dst: &mut [u8], public: &Self::PublicKey) {
        assert_eq!(dst.len(), MLKEM768_PUBLIC_KEY_SIZE, "ml-kem public key buffer");
        dst.copy_from_slice(public);
    }

    fn parse_public(&self, input: &[u8]) -> Result<Self::PublicKey, Error> {
        if input.len() != MLKEM768_PUBLIC_KEY_SIZE {
            return Err(Error::Malformed("ml-kem public key size"));
        }
        let mut public = [0u8; MLKEM768_PUBLIC_KEY_SIZE];
        public.copy_from_slice(input);
        Ok(public)
    }

    fn marshal_private(&self, dst: &mut [u8], private: &Self::PrivateKey) {
        assert_eq!(dst.len(), MLKEM768_PRIVATE_KEY_SIZE, "ml-kem private key buffer");
        dst.copy_from_slice(&private.seed);
    }

    fn parse_private(&self, input: &[u8]) -> Result<Self::PrivateKey, Error> {
        let seed = input
            .try_into()
            .map_err(|_| Error::Malformed("ml-kem private key size"))?;
        Ok(MlKem768PrivateKey { seed })
    }

    fn public_key_size(&self) -> usize {
        MLKEM768_PUBLIC_KEY_SIZE
    }

    fn private_key_size(&self) -> usize {
        MLKEM768_PRIVATE_KEY_SIZE
    }

    fn ciphertext_size(&self) -> usize {
        MLKEM768_CIPHERTEXT_SIZE
    }
}
