//! stoa-pq demo main.rs
//! Demonstrates hybrid multi-recipient encryption using:
//! - X25519 + ML-KEM-768 dual KEM for per-recipient key wrapping
//! - Ed25519 for writer authentication
//! - ChaCha20-Poly1305 for slot and payload encryption

use rand_core::RngCore;
use stoa_pq::v1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheme = v1::new();
    let mut rng = rand::rngs::OsRng;

    // --- 1. Generate reader keypairs (A, B, C) ---
    let (pub_a, priv_a) = scheme.generate(&mut rng)?;
    let (pub_b, priv_b) = scheme.generate(&mut rng)?;
    let (pub_c, priv_c) = scheme.generate(&mut rng)?;

    println!("Suite: {}", v1::SUITE_V1);
    println!("Readers: A, B, C ({} byte public keys)\n", v1::PUBLIC_KEY_SIZE);

    // --- 2. Generate writer keypairs (S1, S2) ---
    let (s1_pub, s1_priv) = scheme.generate(&mut rng)?;
    let (s2_pub, _s2_priv) = scheme.generate(&mut rng)?;
    println!("Writers: S1, S2 (Ed25519)\n");

    // Candidate writer list readers will accept
    let writers = vec![s1_pub.sign, s2_pub.sign];

    // --- 3. Encrypt a message once for A, B, and C ---
    let message = b"Hello hybrid world: one ciphertext, three readers!";
    let recipients = vec![pub_a.kem.clone(), pub_b.kem.clone(), pub_c.kem.clone()];

    let mut seed = [0u8; 32];
    rng.try_fill_bytes(&mut seed)?;
    let wire = scheme.encrypt(&s1_priv, &recipients, &seed, message)?;

    println!("Encrypted message size: {} bytes", wire.len());
    assert_eq!(wire.len(), message.len() + scheme.overhead(recipients.len()));
    println!(
        "Overhead for {} readers: {} bytes ({} per slot)\n",
        recipients.len(),
        scheme.overhead(recipients.len()),
        scheme.slot_size(),
    );

    // --- 4. Each reader decrypts with their private key ---
    for (name, private) in [("A", &priv_a), ("B", &priv_b), ("C", &priv_c)] {
        let (writer, ptext) = scheme.decrypt(private, &writers, &wire)?;
        println!(
            "Reader {name} decrypted (writer index {writer}): {}",
            String::from_utf8_lossy(&ptext)
        );
        assert_eq!(ptext, message);
        assert_eq!(writer, 0);
    }

    // --- 5. A writer outside the candidate list is rejected ---
    println!("\nTesting unknown writer rejection...");
    let unknown_writers = vec![s2_pub.sign];
    let res = scheme.decrypt(&priv_a, &unknown_writers, &wire);
    assert!(res.is_err());
    println!("Unknown writer rejected as expected: {:?}", res.err().unwrap());

    // --- 6. Deterministic encryption for content addressing ---
    let det1 = scheme.encrypt_det(&s1_priv, &recipients, message)?;
    let det2 = scheme.encrypt_det(&s1_priv, &recipients, message)?;
    assert_eq!(det1, det2);
    println!("\nDeterministic mode: identical plaintext gives identical ciphertext.");

    println!("\nAll checks passed.");
    Ok(())
}
