use rand_core::RngCore;
use stoa_pq::v1;
use stoa_pq::Error;

fn random_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    rand::rngs::OsRng.try_fill_bytes(&mut seed).unwrap();
    seed
}

#[test]
fn three_readers_roundtrip() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (pub_a, priv_a) = scheme.generate(&mut rng).unwrap();
    let (pub_b, priv_b) = scheme.generate(&mut rng).unwrap();
    let (pub_c, priv_c) = scheme.generate(&mut rng).unwrap();
    let (s1_pub, s1_priv) = scheme.generate(&mut rng).unwrap();
    let (s2_pub, _) = scheme.generate(&mut rng).unwrap();

    let writers = vec![s1_pub.sign, s2_pub.sign];
    let recipients = vec![pub_a.kem.clone(), pub_b.kem.clone(), pub_c.kem.clone()];

    let msg = b"hybrid hello to A, B, and C!";
    let wire = scheme
        .encrypt(&s1_priv, &recipients, &random_seed(), msg)
        .unwrap();

    // A, B, C can all decrypt, and all identify S1
    for private in [&priv_a, &priv_b, &priv_c] {
        let (writer, ptext) = scheme.decrypt(private, &writers, &wire).unwrap();
        assert_eq!(writer, 0);
        assert_eq!(ptext, msg);
    }
}

#[test]
fn writer_index_follows_candidate_order() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (pub_a, priv_a) = scheme.generate(&mut rng).unwrap();
    let (s1_pub, s1_priv) = scheme.generate(&mut rng).unwrap();
    let (s2_pub, _) = scheme.generate(&mut rng).unwrap();

    let wire = scheme
        .encrypt(&s1_priv, &[pub_a.kem.clone()], &random_seed(), b"who wrote this?")
        .unwrap();

    // The reported index is the position in the caller's candidate list
    let (writer, _) = scheme
        .decrypt(&priv_a, &[s2_pub.sign, s1_pub.sign], &wire)
        .unwrap();
    assert_eq!(writer, 1);
}

#[test]
fn reader_position_does_not_matter() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (pub_a, _) = scheme.generate(&mut rng).unwrap();
    let (pub_b, priv_b) = scheme.generate(&mut rng).unwrap();
    let (pub_c, _) = scheme.generate(&mut rng).unwrap();
    let (s_pub, s_priv) = scheme.generate(&mut rng).unwrap();

    let msg = b"middle of the list";
    for recipients in [
        vec![pub_b.kem.clone(), pub_a.kem.clone(), pub_c.kem.clone()],
        vec![pub_a.kem.clone(), pub_b.kem.clone(), pub_c.kem.clone()],
        vec![pub_a.kem.clone(), pub_c.kem.clone(), pub_b.kem.clone()],
    ] {
        let wire = scheme
            .encrypt(&s_priv, &recipients, &random_seed(), msg)
            .unwrap();
        let (writer, ptext) = scheme.decrypt(&priv_b, &[s_pub.sign], &wire).unwrap();
        assert_eq!(writer, 0);
        assert_eq!(ptext, msg);
    }
}

#[test]
fn empty_plaintext_roundtrip() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (pub_a, priv_a) = scheme.generate(&mut rng).unwrap();
    let (s_pub, s_priv) = scheme.generate(&mut rng).unwrap();

    let wire = scheme
        .encrypt(&s_priv, &[pub_a.kem.clone()], &random_seed(), b"")
        .unwrap();
    let (_, ptext) = scheme.decrypt(&priv_a, &[s_pub.sign], &wire).unwrap();
    assert!(ptext.is_empty());
}

#[test]
fn no_recipients_is_undecryptable() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (_, priv_a) = scheme.generate(&mut rng).unwrap();
    let (s_pub, s_priv) = scheme.generate(&mut rng).unwrap();

    let wire = scheme
        .encrypt(&s_priv, &[], &random_seed(), b"to nobody")
        .unwrap();
    let err = scheme.decrypt(&priv_a, &[s_pub.sign], &wire).unwrap_err();
    assert!(matches!(err, Error::Undecryptable));
}

#[test]
fn non_recipient_is_rejected() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (pub_a, _) = scheme.generate(&mut rng).unwrap();
    let (_, priv_mallory) = scheme.generate(&mut rng).unwrap();
    let (s_pub, s_priv) = scheme.generate(&mut rng).unwrap();

    let wire = scheme
        .encrypt(&s_priv, &[pub_a.kem.clone()], &random_seed(), b"not for you")
        .unwrap();
    let err = scheme
        .decrypt(&priv_mallory, &[s_pub.sign], &wire)
        .unwrap_err();
    assert!(matches!(err, Error::Undecryptable));
}

#[test]
fn unknown_writer_is_rejected() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (pub_a, priv_a) = scheme.generate(&mut rng).unwrap();
    let (_, s1_priv) = scheme.generate(&mut rng).unwrap();
    let (s2_pub, _) = scheme.generate(&mut rng).unwrap();

    // Only S2 accepted, so S1's message must be rejected even though the
    // reader key is correct, and the failure is the generic one.
    let wire = scheme
        .encrypt(&s1_priv, &[pub_a.kem.clone()], &random_seed(), b"nope")
        .unwrap();
    let err = scheme.decrypt(&priv_a, &[s2_pub.sign], &wire).unwrap_err();
    assert!(matches!(err, Error::Undecryptable));
}

#[test]
fn derive_public_matches_generate() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (public, private) = scheme.generate(&mut rng).unwrap();
    let derived = scheme.derive_public(&private);
    assert_eq!(public, derived);
}

#[test]
fn public_key_marshal_parse_roundtrip() {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;
    let (public, _) = scheme.generate(&mut rng).unwrap();

    let mut data = vec![0u8; scheme.public_key_size()];
    scheme.marshal_public(&mut data, &public);
    let parsed = scheme.parse_public(&data).unwrap();
    assert_eq!(public, parsed);

    assert!(matches!(
        scheme.parse_public(&data[1..]),
        Err(Error::Malformed(_))
    ));
}
