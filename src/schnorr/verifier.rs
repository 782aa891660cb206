use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info};

use super::crypto::{generate_challenge_with, verify_response};
use super::{Challenge, Commitment, FieldParameters, PublicKey, Response};

/// A commitment paired with the challenge issued against it.
///
/// `verify` consumes it, so a challenge is checked at most once and never
/// against another round's commitment. It cannot be cloned:
///
/// ```compile_fail
/// fn needs_clone<T: Clone>() {}
/// needs_clone::<zkp_schnorr_auth::schnorr::PendingVerification>();
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct PendingVerification {
    commitment: Commitment,
    challenge: Challenge,
}

impl PendingVerification {
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }
}

/// The server side. Knows only the registered public key.
#[derive(Debug, Clone)]
pub struct Verifier {
    params: FieldParameters,
    public_key: PublicKey,
}

impl Verifier {
    pub fn new(params: FieldParameters, public_key: PublicKey) -> Self {
        Self { params, public_key }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn params(&self) -> &FieldParameters {
        &self.params
    }

    pub fn issue_challenge_with<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        commitment: Commitment,
    ) -> PendingVerification {
        let c = generate_challenge_with(rng, self.params.challenge_upper_bound());
        debug!(t = %commitment.t, c = %c, "challenge issued");
        PendingVerification { commitment, challenge: Challenge { c } }
    }

    /// Draws a fresh challenge in `[1, challenge_upper_bound]` for `commitment`.
    pub fn issue_challenge(&self, commitment: Commitment) -> PendingVerification {
        self.issue_challenge_with(&mut OsRng, commitment)
    }

    /// Binds a caller-chosen challenge to `commitment`.
    ///
    /// Only useful for replaying transcripts and fixed-challenge tests; live
    /// rounds should use [`Verifier::issue_challenge`].
    pub fn with_challenge(&self, commitment: Commitment, c: BigUint) -> PendingVerification {
        PendingVerification { commitment, challenge: Challenge { c } }
    }

    /// Checks `g^s == t * y^c (mod p)` for the pending round.
    pub fn verify(&self, pending: PendingVerification, response: &Response) -> bool {
        let accepted = verify_response(
            self.params.generator(),
            &self.public_key.y,
            &pending.commitment.t,
            &pending.challenge.c,
            &response.s,
            self.params.modulus(),
        );
        info!(c = %pending.challenge.c, accepted, "proof checked");
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schnorr::{Committer, FakeProver, Prover};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn setup(password: &str) -> (Prover, Verifier) {
        let params = FieldParameters::reference();
        let prover = Prover::new(params.clone(), password);
        let verifier = Verifier::new(params, prover.register());
        (prover, verifier)
    }

    #[test]
    fn honest_round_accepted() {
        let (prover, verifier) = setup("secret123");
        let round = prover.commit();
        let pending = verifier.issue_challenge(round.commitment().clone());
        let response = prover.respond(round, pending.challenge());
        assert!(verifier.verify(pending, &response));
    }

    #[test]
    fn challenge_within_bound() {
        let (_, verifier) = setup("pw");
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let pending = verifier.issue_challenge_with(&mut rng, Commitment { t: big(1) });
            assert!(pending.challenge().c >= big(1) && pending.challenge().c <= big(100));
        }
    }

    #[test]
    fn tampered_response_rejected() {
        let (prover, verifier) = setup("secret123");
        let round = prover.commit();
        let pending = verifier.with_challenge(round.commitment().clone(), big(7));
        let mut response = prover.respond(round, pending.challenge());
        // g has order p - 1, so any shift that is not a multiple of it changes g^s
        response.s += 1u32;
        assert!(!verifier.verify(pending, &response));
    }

    #[test]
    fn fake_prover_rejected_for_fixed_challenge() {
        // secret("secret123") = 2310; 50 * (12345 - 2310) is not a multiple of 48610
        let (_, verifier) = setup("secret123");
        let fake = FakeProver::new(verifier.params().clone());
        let round = fake.commit();
        let pending = verifier.with_challenge(round.commitment().clone(), big(50));
        let response = fake.respond(round, pending.challenge());
        assert!(!verifier.verify(pending, &response));
    }

    #[test]
    fn mismatched_commitment_rejected() {
        let (prover, verifier) = setup("secret123");
        let mut rng = StdRng::seed_from_u64(5);
        let first = prover.commit_with(&mut rng);
        let second = prover.commit_with(&mut rng);
        assert_ne!(first.commitment(), second.commitment());

        let pending = verifier.with_challenge(second.commitment().clone(), big(9));
        let response = prover.respond(first, pending.challenge());
        assert!(!verifier.verify(pending, &response));
    }
}
