//! Extendable-output function (XOF) abstraction and derived utilities.
//!
//! A [`Scheme`] is an absorb/expand sponge: input is appended with any
//! number of ordered [`absorb`](Scheme::absorb) calls, then output is read
//! out incrementally with [`expand`](Scheme::expand). Every key-derivation
//! and secret-combining step in this crate goes through this interface, so
//! swapping the hash swaps it everywhere at once.

use rand_core::{CryptoRng, RngCore};
use sha3::digest::{ExtendableOutput, Update, XofReader};

/// An extendable-output function with an explicit absorb/expand state.
pub trait Scheme {
    /// Sponge state. Owned by a single caller; not safe for concurrent use
    /// without external synchronization.
    type State;

    /// Creates a state in its initial, empty position.
    fn new_state(&self) -> Self::State;

    /// Appends `data` to the input. Order-significant. Calling this after
    /// the first `expand` is a programming error and panics.
    fn absorb(&self, state: &mut Self::State, data: &[u8]);

    /// Fills `out` with the next output bytes, advancing the state.
    /// Repeated calls continue the output stream; they do not restart it.
    fn expand(&self, state: &mut Self::State, out: &mut [u8]);

    /// Returns the state to its initial position.
    fn reset(&self, state: &mut Self::State);
}

/// Absorbs `input` into a fresh state and expands output into `dst`.
pub fn sum<X: Scheme>(xof: &X, dst: &mut [u8], input: &[u8]) {
    let mut state = xof.new_state();
    xof.absorb(&mut state, input);
    xof.expand(&mut state, dst);
}

/// Absorbs every chunk of `inputs` in order, then expands output into `dst`.
///
/// Absorb boundaries are transparent to the sponge: `sum_many` over
/// `[a, b]` equals [`sum`] over the concatenation of `a` and `b`. Callers
/// that need unambiguous framing between chunks must include lengths or use
/// fixed-size leading chunks, as [`derive_key256`] does.
pub fn sum_many<X: Scheme>(xof: &X, dst: &mut [u8], inputs: &[&[u8]]) {
    let mut state = xof.new_state();
    for input in inputs {
        xof.absorb(&mut state, input);
    }
    xof.expand(&mut state, dst);
}

/// Reads 256 bits of output for `input`.
pub fn sum256<X: Scheme>(xof: &X, input: &[u8]) -> [u8; 32] {
    let mut ret = [0u8; 32];
    sum(xof, &mut ret, input);
    ret
}

/// Reads 512 bits of output for `input`.
pub fn sum512<X: Scheme>(xof: &X, input: &[u8]) -> [u8; 64] {
    let mut ret = [0u8; 64];
    sum(xof, &mut ret, input);
    ret
}

/// Deterministically derives a key from `base` and `info`, filling `dst`.
///
/// `base` must carry 256 bits of entropy and must be kept secret; if the
/// base is weak, every derived key is weak. `info` is not secret, but must
/// be distinct from every other info used with the same base so that the
/// derived keys are independent.
pub fn derive_key256<X: Scheme>(xof: &X, dst: &mut [u8], base: &[u8; 32], info: &[u8]) {
    let mut state = xof.new_state();
    xof.absorb(&mut state, base);
    xof.absorb(&mut state, info);
    xof.expand(&mut state, dst);
}

/// Seeds a deterministic random byte stream from `seed` and returns it.
///
/// The stream is `expand` applied repeatedly to a state that absorbed the
/// seed. This is a deterministic CSPRNG for derandomized operations, not a
/// substitute for the operating system source used during key generation.
pub fn new_rng256<X: Scheme>(xof: X, seed: &[u8; 32]) -> DeterministicRng<X> {
    DeterministicRng::with_info(xof, seed, b"")
}

/// A [`rand_core`] generator reading from an XOF stream.
pub struct DeterministicRng<X: Scheme> {
    xof: X,
    state: X::State,
}

impl<X: Scheme> DeterministicRng<X> {
    /// Seeds a generator by absorbing `seed` and then `info`. Distinct
    /// infos give independent streams from the same seed.
    pub fn with_info(xof: X, seed: &[u8; 32], info: &[u8]) -> Self {
        let mut state = xof.new_state();
        xof.absorb(&mut state, seed);
        xof.absorb(&mut state, info);
        DeterministicRng { xof, state }
    }
}

impl<X: Scheme> RngCore for DeterministicRng<X> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.xof.expand(&mut self.state, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<X: Scheme> CryptoRng for DeterministicRng<X> {}

/// SHAKE256.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shake256;

/// SHAKE256 sponge state: absorbing until the first expand, squeezing after.
pub enum Shake256State {
    /// Input phase; more data may be absorbed.
    Absorbing(sha3::Shake256),
    /// Output phase; the stream continues across reads.
    Squeezing(sha3::Shake256Reader),
}

impl Scheme for Shake256 {
    type State = Shake256State;

    fn new_state(&self) -> Shake256State {
        Shake256State::Absorbing(sha3::Shake256::default())
    }

    fn absorb(&self, state: &mut Shake256State, data: &[u8]) {
        match state {
            Shake256State::Absorbing(hasher) => hasher.update(data),
            Shake256State::Squeezing(_) => panic!("xof: absorb after expand"),
        }
    }

    fn expand(&self, state: &mut Shake256State, out: &mut [u8]) {
        if let Shake256State::Absorbing(hasher) = state {
            let reader = std::mem::take(hasher).finalize_xof();
            *state = Shake256State::Squeezing(reader);
        }
        match state {
            Shake256State::Squeezing(reader) => reader.read(out),
            Shake256State::Absorbing(_) => unreachable!(),
        }
    }

    fn reset(&self, state: &mut Shake256State) {
        *state = self.new_state();
    }
}
