//! The committing side of the protocol: the honest [`Prover`] and the
//! secret-less [`FakeProver`] used to exercise soundness.

use std::fmt;

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;
use uuid::Uuid;

use super::crypto::{
    compute_commitment, compute_public_key, compute_response, generate_nonce_with,
    hash_password_to_secret,
};
use super::{Challenge, Commitment, FieldParameters, PublicKey, Response};

/// The value the reference adversary substitutes for the unknown secret.
pub const REFERENCE_GUESS: u64 = 12345;

/// State owned by one in-flight round: the nonce and the commitment made from it.
///
/// Consumed by [`Committer::respond`], so a nonce answers exactly one challenge.
pub struct CommitmentRound {
    round_id: Uuid,
    nonce: BigUint,
    commitment: Commitment,
}

impl CommitmentRound {
    fn new(params: &FieldParameters, nonce: BigUint) -> Self {
        let t = compute_commitment(params.generator(), &nonce, params.modulus());
        Self { round_id: Uuid::new_v4(), nonce, commitment: Commitment { t } }
    }

    pub fn round_id(&self) -> Uuid {
        self.round_id
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }
}

// The nonce stays out of Debug output.
impl fmt::Debug for CommitmentRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitmentRound")
            .field("round_id", &self.round_id)
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}

/// Anything that can open a round with a commitment and answer its challenge.
pub trait Committer {
    fn params(&self) -> &FieldParameters;

    /// Opens a round with a fresh nonce from `rng`.
    fn commit_with<R: RngCore + CryptoRng>(&self, rng: &mut R) -> CommitmentRound {
        let nonce = generate_nonce_with(rng, self.params().modulus());
        let round = CommitmentRound::new(self.params(), nonce);
        debug!(round = %round.round_id, t = %round.commitment.t, "commitment generated");
        round
    }

    /// Opens a round with a nonce from the operating system RNG.
    fn commit(&self) -> CommitmentRound {
        self.commit_with(&mut OsRng)
    }

    /// Answers `challenge` for `round`, consuming it.
    fn respond(&self, round: CommitmentRound, challenge: &Challenge) -> Response;
}

fn answer(round: CommitmentRound, challenge: &Challenge, exponent: &BigUint) -> Response {
    let s = compute_response(&round.nonce, &challenge.c, exponent);
    debug!(round = %round.round_id, c = %challenge.c, "response computed");
    Response { s }
}

/// Holds a secret derived from a password and proves knowledge of it.
#[derive(Clone)]
pub struct Prover {
    params: FieldParameters,
    secret: BigUint,
}

impl Prover {
    pub fn new(params: FieldParameters, password: &str) -> Self {
        let secret = hash_password_to_secret(password, params.modulus());
        Self { params, secret }
    }

    /// The public key `g^x mod p` to hand to a verifier. Idempotent.
    pub fn register(&self) -> PublicKey {
        let y = compute_public_key(self.params.generator(), &self.secret, self.params.modulus());
        debug!(y = %y, "public key registered");
        PublicKey { y }
    }
}

impl fmt::Debug for Prover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prover").field("params", &self.params).finish_non_exhaustive()
    }
}

impl Committer for Prover {
    fn params(&self) -> &FieldParameters {
        &self.params
    }

    /// `s = r + c * x` with the real secret.
    fn respond(&self, round: CommitmentRound, challenge: &Challenge) -> Response {
        answer(round, challenge, &self.secret)
    }
}

/// An impostor: commits honestly but answers with a guessed exponent.
#[derive(Debug, Clone)]
pub struct FakeProver {
    params: FieldParameters,
    guess: BigUint,
}

impl FakeProver {
    pub fn new(params: FieldParameters) -> Self {
        Self::with_guess(params, BigUint::from(REFERENCE_GUESS))
    }

    pub fn with_guess(params: FieldParameters, guess: BigUint) -> Self {
        Self { params, guess }
    }

    pub fn guess(&self) -> &BigUint {
        &self.guess
    }
}

impl Committer for FakeProver {
    fn params(&self) -> &FieldParameters {
        &self.params
    }

    /// `s = r + c * guess`; fails verification unless the guess is congruent to the secret.
    fn respond(&self, round: CommitmentRound, challenge: &Challenge) -> Response {
        answer(round, challenge, &self.guess)
    }
}
