//! Multi-recipient authenticated encryption ("multiparty box").
//!
//! One plaintext is encrypted once for a list of recipient KEM public keys.
//! Each recipient independently recovers the plaintext and learns which of
//! a caller-supplied list of candidate writers produced the message. To an
//! outsider every per-recipient slot looks alike, and a failed decryption
//! never reveals whether the key was wrong, the recipient was not on the
//! list, or the ciphertext was tampered with.
//!
//! Wire layout, big-endian length prefix:
//!
//! ```text
//! ciphertext := u32(len(slots)) || slots || main
//! slots      := slot{0} || slot{1} || ... || slot{n-1}
//! slot       := kem_ct || seal(sig(kem_ct) || dek; key=shared, ad=kem_ct)
//! main       := seal(plaintext; key=dek, ad=slots)
//! ```
//!
//! Sealing the plaintext with the whole slots region as associated data
//! binds the recipient list to the payload; a different slot set cannot be
//! spliced onto the same sealed plaintext.

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::errors::Error;
use crate::{aead, kem, sign, xof};

/// Data encryption key length; one fresh DEK is derived per message.
const DEK_SIZE: usize = 32;

const DEK_INFO: &[u8] = b"dek";
const KEM_INFO: &[u8] = b"kem";

/// Private half of a multiparty box keypair.
#[derive(Clone)]
pub struct PrivateKey<KemPriv, SignPriv> {
    pub kem: KemPriv,
    pub sign: SignPriv,
}

/// Public half of a multiparty box keypair.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey<KemPub, SignPub> {
    pub kem: KemPub,
    pub sign: SignPub,
}

/// A multiparty box scheme assembled from a KEM, a signature scheme, an
/// AEAD, and an XOF.
///
/// The struct is configuration, not state: it holds no key material and no
/// mutable state, so a single instance may serve any number of concurrent
/// calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scheme<K, S, A, X> {
    pub kem: K,
    pub sign: S,
    pub aead: A,
    pub xof: X,
}

impl<K, S, A, X> Scheme<K, S, A, X>
where
    K: kem::Scheme,
    S: sign::Scheme,
    A: aead::Scheme,
    X: xof::Scheme,
{
    /// Generates a keypair (KEM half first, signing half second) from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(PublicKey<K::PublicKey, S::PublicKey>, PrivateKey<K::PrivateKey, S::PrivateKey>), Error>
    {
        let (kem_pub, kem_priv) = self.kem.generate(rng)?;
        let (sign_pub, sign_priv) = self.sign.generate(rng)?;
        Ok((
            PublicKey { kem: kem_pub, sign: sign_pub },
            PrivateKey { kem: kem_priv, sign: sign_priv },
        ))
    }

    /// Recomputes the public keypair half for `private`.
    pub fn derive_public(
        &self,
        private: &PrivateKey<K::PrivateKey, S::PrivateKey>,
    ) -> PublicKey<K::PublicKey, S::PublicKey> {
        PublicKey {
            kem: self.kem.derive_public(&private.kem),
            sign: self.sign.derive_public(&private.sign),
        }
    }

    /// Writes the fixed-size encoding of `public` (KEM half, then signing
    /// half) into `dst`, which must be exactly `public_key_size` bytes.
    pub fn marshal_public(&self, dst: &mut [u8], public: &PublicKey<K::PublicKey, S::PublicKey>) {
        assert_eq!(dst.len(), self.public_key_size(), "public key buffer");
        let (kem_dst, sign_dst) = dst.split_at_mut(self.kem.public_key_size());
        self.kem.marshal_public(kem_dst, &public.kem);
        self.sign.marshal_public(sign_dst, &public.sign);
    }

    /// Parses a public key previously written by `marshal_public`.
    pub fn parse_public(
        &self,
        input: &[u8],
    ) -> Result<PublicKey<K::PublicKey, S::PublicKey>, Error> {
        if input.len() != self.public_key_size() {
            return Err(Error::Malformed("public key size"));
        }
        let (kem_part, sign_part) = input.split_at(self.kem.public_key_size());
        Ok(PublicKey {
            kem: self.kem.parse_public(kem_part)?,
            sign: self.sign.parse_public(sign_part)?,
        })
    }

    /// Encrypts `ptext` for every key in `recipients`, signed by `private`.
    ///
    /// The DEK and the KEM seed are derived from `seed` under distinct
    /// infos, so they are independent even though both come from the one
    /// 256-bit seed. Recipients appear in the output in caller order.
    pub fn encrypt(
        &self,
        private: &PrivateKey<K::PrivateKey, S::PrivateKey>,
        recipients: &[K::PublicKey],
        seed: &[u8; 32],
        ptext: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let slots_len = self.slot_size() * recipients.len();
        let prefix =
            u32::try_from(slots_len).map_err(|_| Error::Malformed("slots region too large"))?;

        let mut dek = [0u8; DEK_SIZE];
        let mut kem_seed = [0u8; 32];
        xof::derive_key256(&self.xof, &mut dek, seed, DEK_INFO);
        xof::derive_key256(&self.xof, &mut kem_seed, seed, KEM_INFO);

        let mut slots = Vec::with_capacity(slots_len);
        for public in recipients {
            self.encrypt_slot(&mut slots, private, public, &kem_seed, &dek)?;
        }

        let mut out = Vec::with_capacity(self.ciphertext_size(recipients.len(), ptext.len()));
        out.extend_from_slice(&prefix.to_be_bytes());
        out.extend_from_slice(&slots);
        self.aead.seal(&mut out, &dek, ptext, &slots);

        dek.zeroize();
        kem_seed.zeroize();
        Ok(out)
    }

    /// Deterministic encryption: the seed is the XOF of the plaintext.
    ///
    /// Re-encrypting an identical plaintext to an identical recipient list
    /// yields an identical ciphertext, which suits content-addressed
    /// storage but lets an observer link equal messages. Use [`encrypt`]
    /// with a fresh random seed when messages must be unlinkable.
    ///
    /// [`encrypt`]: Scheme::encrypt
    pub fn encrypt_det(
        &self,
        private: &PrivateKey<K::PrivateKey, S::PrivateKey>,
        recipients: &[K::PublicKey],
        ptext: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let seed = xof::sum256(&self.xof, ptext);
        self.encrypt(private, recipients, &seed, ptext)
    }

    /// Decrypts `ctext` with `private`, identifying the writer among
    /// `writers`.
    ///
    /// Returns the index of the first writer key that authenticates the
    /// matched slot, along with the plaintext. Slots are tried in order;
    /// a slot that fails decapsulation, fails to open, or authenticates
    /// against none of the writers is skipped without aborting. Apart from
    /// framing errors, the only failure is [`Error::Undecryptable`]; which
    /// slot failed, and why, is deliberately not reported.
    pub fn decrypt(
        &self,
        private: &PrivateKey<K::PrivateKey, S::PrivateKey>,
        writers: &[S::PublicKey],
        ctext: &[u8],
    ) -> Result<(usize, Vec<u8>), Error> {
        let msg = parse_message(ctext)?;
        if msg.slots.len() % self.slot_size() != 0 {
            return Err(Error::Malformed("slot region size"));
        }
        let num_slots = msg.slots.len() / self.slot_size();
        for i in 0..num_slots {
            let slot = &msg.slots[i * self.slot_size()..(i + 1) * self.slot_size()];
            let Ok((writer, mut dek)) = self.decrypt_slot(private, writers, slot) else {
                continue;
            };
            let mut ptext = Vec::with_capacity(msg.main.len());
            let opened = self.aead.open(&mut ptext, &dek, msg.main, msg.slots);
            dek.zeroize();
            return match opened {
                Ok(()) => Ok((writer, ptext)),
                Err(_) => Err(Error::Undecryptable),
            };
        }
        Err(Error::Undecryptable)
    }

    /// Appends one recipient slot to `out`.
    fn encrypt_slot(
        &self,
        out: &mut Vec<u8>,
        private: &PrivateKey<K::PrivateKey, S::PrivateKey>,
        public: &K::PublicKey,
        seed: &[u8; 32],
        dek: &[u8; DEK_SIZE],
    ) -> Result<(), Error> {
        let mut shared = [0u8; kem::SHARED_SECRET_SIZE];
        let mut kem_ct = vec![0u8; self.kem.ciphertext_size()];
        self.kem.encapsulate(&mut shared, &mut kem_ct, public, seed)?;

        let sig_size = self.sign.signature_size();
        let mut payload = vec![0u8; sig_size + DEK_SIZE];
        self.sign.sign(&mut payload[..sig_size], &private.sign, &kem_ct);
        payload[sig_size..].copy_from_slice(dek);

        out.extend_from_slice(&kem_ct);
        self.aead.seal(out, &shared, &payload, &kem_ct);
        shared.zeroize();
        payload.zeroize();
        Ok(())
    }

    /// Attempts to recover the DEK from one slot.
    ///
    /// The caller treats any error as "this slot is not for us, or not from
    /// an accepted writer" and moves on; no distinction is surfaced.
    fn decrypt_slot(
        &self,
        private: &PrivateKey<K::PrivateKey, S::PrivateKey>,
        writers: &[S::PublicKey],
        slot: &[u8],
    ) -> Result<(usize, [u8; DEK_SIZE]), Error> {
        let (kem_ct, sealed) = slot.split_at(self.kem.ciphertext_size());
        let mut shared = [0u8; kem::SHARED_SECRET_SIZE];
        self.kem.decapsulate(&mut shared, &private.kem, kem_ct)?;

        let mut payload = Vec::with_capacity(sealed.len());
        let opened = self.aead.open(&mut payload, &shared, sealed, kem_ct);
        shared.zeroize();
        opened?;

        let sig_size = self.sign.signature_size();
        if payload.len() != sig_size + DEK_SIZE {
            return Err(Error::Malformed("slot payload size"));
        }
        let (sig, dek_bytes) = payload.split_at(sig_size);
        for (i, writer) in writers.iter().enumerate() {
            if self.sign.verify(writer, kem_ct, sig) {
                let mut dek = [0u8; DEK_SIZE];
                dek.copy_from_slice(dek_bytes);
                payload.zeroize();
                return Ok((i, dek));
            }
        }
        payload.zeroize();
        Err(Error::BadSignature)
    }

    /// Serialized public key length.
    pub fn public_key_size(&self) -> usize {
        self.kem.public_key_size() + self.sign.public_key_size()
    }

    /// Per-recipient slot length, constant for a scheme instance.
    pub fn slot_size(&self) -> usize {
        self.kem.ciphertext_size() + self.sign.signature_size() + DEK_SIZE + self.aead.overhead()
    }

    /// Exact ciphertext expansion for `num_recipients` recipients.
    pub fn overhead(&self, num_recipients: usize) -> usize {
        4 + self.slot_size() * num_recipients + self.aead.overhead()
    }

    /// Exact ciphertext length for the given recipient count and plaintext
    /// length.
    pub fn ciphertext_size(&self, num_recipients: usize, ptext_len: usize) -> usize {
        ptext_len + self.overhead(num_recipients)
    }

    /// Plaintext length a well-formed `ctext` would decrypt to.
    pub fn plaintext_size(&self, ctext: &[u8]) -> Result<usize, Error> {
        let msg = parse_message(ctext)?;
        msg.main
            .len()
            .checked_sub(self.aead.overhead())
            .ok_or(Error::Malformed("main ciphertext too short"))
    }
}

/// A ciphertext split into its slots region and main ciphertext.
#[derive(Debug)]
pub struct Message<'a> {
    pub slots: &'a [u8],
    pub main: &'a [u8],
}

/// Splits a ciphertext at the boundary named by its length prefix.
///
/// The prefix makes the boundary self-describing; slot-size validation
/// still happens in [`Scheme::decrypt`].
pub fn parse_message(x: &[u8]) -> Result<Message<'_>, Error> {
    if x.len() > u32::MAX as usize {
        return Err(Error::Malformed("message too large"));
    }
    if x.len() < 4 {
        return Err(Error::Malformed("too short to be a message"));
    }
    let slots_len = u32::from_be_bytes([x[0], x[1], x[2], x[3]]) as usize;
    let end = match 4usize.checked_add(slots_len) {
        Some(end) if end <= x.len() => end,
        _ => return Err(Error::Malformed("length prefix out of bounds")),
    };
    Ok(Message {
        slots: &x[4..end],
        main: &x[end..],
    })
}
