#![allow(clippy::unwrap_used)] // unwrap() is idiomatic in property tests

use proptest::prelude::*;
use stoa_pq::v1::{self, PrivateKeyV1, PublicKeyV1, SchemeV1};
use stoa_pq::{xof, Error};

/// Expands a 32-byte seed into a keypair through the crate's own
/// deterministic RNG, so every case is reproducible from its seed.
fn keypair_from_seed(scheme: &SchemeV1, seed: [u8; 32]) -> (PublicKeyV1, PrivateKeyV1) {
    let mut rng = xof::new_rng256(xof::Shake256, &seed);
    scheme.generate(&mut rng).unwrap()
}

// ============================================================================
// Property: Round-trip encryption/decryption
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_encrypt_decrypt_roundtrip(
        message in prop::collection::vec(any::<u8>(), 0..2000),
        seed in any::<[u8; 32]>(),
        reader_seed in any::<[u8; 32]>(),
        writer_seed in any::<[u8; 32]>(),
    ) {
        prop_assume!(reader_seed != writer_seed);
        let scheme = v1::new();
        let (reader_pub, reader_priv) = keypair_from_seed(&scheme, reader_seed);
        let (writer_pub, writer_priv) = keypair_from_seed(&scheme, writer_seed);

        let wire = scheme.encrypt(&writer_priv, &[reader_pub.kem.clone()], &seed, &message)?;
        let (writer, decrypted) = scheme.decrypt(&reader_priv, &[writer_pub.sign], &wire)?;

        prop_assert_eq!(writer, 0);
        prop_assert_eq!(decrypted, message);
    }

    #[test]
    fn prop_all_readers_can_decrypt(
        message in prop::collection::vec(any::<u8>(), 0..500),
        seed in any::<[u8; 32]>(),
        num_readers in 1usize..6,
    ) {
        let scheme = v1::new();
        let (writer_pub, writer_priv) = keypair_from_seed(&scheme, [0xee; 32]);

        let mut privs = Vec::new();
        let mut kem_pubs = Vec::new();
        for i in 0..num_readers {
            let mut reader_seed = [0u8; 32];
            reader_seed[0] = i as u8;
            let (public, private) = keypair_from_seed(&scheme, reader_seed);
            kem_pubs.push(public.kem.clone());
            privs.push(private);
        }

        let wire = scheme.encrypt(&writer_priv, &kem_pubs, &seed, &message)?;
        for private in &privs {
            let (writer, decrypted) = scheme.decrypt(private, &[writer_pub.sign], &wire)?;
            prop_assert_eq!(writer, 0);
            prop_assert_eq!(&decrypted, &message);
        }
    }
}

// ============================================================================
// Property: Wrong reader key cannot decrypt
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_wrong_key_cannot_decrypt(
        message in prop::collection::vec(any::<u8>(), 1..500),
        seed in any::<[u8; 32]>(),
        reader_seed in any::<[u8; 32]>(),
        wrong_seed in any::<[u8; 32]>(),
    ) {
        prop_assume!(reader_seed != wrong_seed);
        let scheme = v1::new();
        let (reader_pub, _) = keypair_from_seed(&scheme, reader_seed);
        let (_, wrong_priv) = keypair_from_seed(&scheme, wrong_seed);
        let (writer_pub, writer_priv) = keypair_from_seed(&scheme, [0xee; 32]);

        let wire = scheme.encrypt(&writer_priv, &[reader_pub.kem.clone()], &seed, &message)?;
        let result = scheme.decrypt(&wrong_priv, &[writer_pub.sign], &wire);
        prop_assert!(matches!(result, Err(Error::Undecryptable)));
    }

    #[test]
    fn prop_unknown_writer_rejected(
        message in prop::collection::vec(any::<u8>(), 1..500),
        seed in any::<[u8; 32]>(),
        other_writer_seed in any::<[u8; 32]>(),
    ) {
        prop_assume!(other_writer_seed != [0xee; 32]);
        let scheme = v1::new();
        let (reader_pub, reader_priv) = keypair_from_seed(&scheme, [0xaa; 32]);
        let (_, writer_priv) = keypair_from_seed(&scheme, [0xee; 32]);
        let (other_pub, _) = keypair_from_seed(&scheme, other_writer_seed);

        // Only the other writer is accepted
        let wire = scheme.encrypt(&writer_priv, &[reader_pub.kem.clone()], &seed, &message)?;
        let result = scheme.decrypt(&reader_priv, &[other_pub.sign], &wire);
        prop_assert!(matches!(result, Err(Error::Undecryptable)));
    }
}

// ============================================================================
// Property: Any single corrupted byte makes the message undecryptable
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_corrupted_wire_fails(
        message in prop::collection::vec(any::<u8>(), 1..500),
        seed in any::<[u8; 32]>(),
        corruption_pos in any::<prop::sample::Index>(),
        corruption_mask in 1u8..=255,
    ) {
        let scheme = v1::new();
        let (reader_pub, reader_priv) = keypair_from_seed(&scheme, [0xaa; 32]);
        let (writer_pub, writer_priv) = keypair_from_seed(&scheme, [0xee; 32]);

        let wire = scheme.encrypt(&writer_priv, &[reader_pub.kem.clone()], &seed, &message)?;

        let mut corrupted = wire.clone();
        let pos = corruption_pos.index(corrupted.len());
        corrupted[pos] ^= corruption_mask;

        let result = scheme.decrypt(&reader_priv, &[writer_pub.sign], &corrupted);
        prop_assert!(result.is_err());
    }
}

// ============================================================================
// Property: Deterministic encryption is a pure function of its inputs
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_encrypt_det_is_deterministic(
        message in prop::collection::vec(any::<u8>(), 0..500),
    ) {
        let scheme = v1::new();
        let (reader_pub, _) = keypair_from_seed(&scheme, [0xaa; 32]);
        let (_, writer_priv) = keypair_from_seed(&scheme, [0xee; 32]);

        let wire1 = scheme.encrypt_det(&writer_priv, &[reader_pub.kem.clone()], &message)?;
        let wire2 = scheme.encrypt_det(&writer_priv, &[reader_pub.kem.clone()], &message)?;
        prop_assert_eq!(wire1, wire2);
    }

    #[test]
    fn prop_encrypt_det_differs_per_plaintext(
        message1 in prop::collection::vec(any::<u8>(), 1..500),
        message2 in prop::collection::vec(any::<u8>(), 1..500),
    ) {
        prop_assume!(message1 != message2);
        let scheme = v1::new();
        let (reader_pub, _) = keypair_from_seed(&scheme, [0xaa; 32]);
        let (_, writer_priv) = keypair_from_seed(&scheme, [0xee; 32]);

        let wire1 = scheme.encrypt_det(&writer_priv, &[reader_pub.kem.clone()], &message1)?;
        let wire2 = scheme.encrypt_det(&writer_priv, &[reader_pub.kem.clone()], &message2)?;
        prop_assert_ne!(wire1, wire2);
    }
}

// ============================================================================
// Property: Ciphertext size accounting is exact
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_size_accounting_exact(
        message in prop::collection::vec(any::<u8>(), 0..2000),
        seed in any::<[u8; 32]>(),
        num_readers in prop::sample::select(vec![0usize, 1, 10]),
    ) {
        let scheme = v1::new();
        let (_, writer_priv) = keypair_from_seed(&scheme, [0xee; 32]);

        let mut kem_pubs = Vec::new();
        for i in 0..num_readers {
            let mut reader_seed = [0u8; 32];
            reader_seed[0] = i as u8;
            let (public, _) = keypair_from_seed(&scheme, reader_seed);
            kem_pubs.push(public.kem.clone());
        }

        let wire = scheme.encrypt(&writer_priv, &kem_pubs, &seed, &message)?;
        prop_assert_eq!(wire.len(), message.len() + scheme.overhead(num_readers));
        prop_assert_eq!(
            wire.len(),
            scheme.ciphertext_size(num_readers, message.len())
        );
        prop_assert_eq!(scheme.plaintext_size(&wire)?, message.len());
    }
}
