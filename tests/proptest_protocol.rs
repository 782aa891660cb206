//! Property-based tests for completeness and secret derivation.

use num_bigint::BigUint;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use zkp_schnorr_auth::schnorr::{
    Committer, FieldParameters, Prover, Verifier, hash_password_to_secret,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn completeness_for_any_password_and_challenge(
        password in ".{0,64}",
        c in 1u64..=100,
        seed in any::<u64>(),
    ) {
        let params = FieldParameters::reference();
        let prover = Prover::new(params.clone(), &password);
        let verifier = Verifier::new(params, prover.register());

        let round = prover.commit_with(&mut StdRng::seed_from_u64(seed));
        let pending = verifier.with_challenge(round.commitment().clone(), BigUint::from(c));
        let response = prover.respond(round, pending.challenge());
        prop_assert!(verifier.verify(pending, &response));
    }

    #[test]
    fn derivation_is_stable_and_in_range(password in ".*", modulus in 5u64..1_000_000) {
        let m = BigUint::from(modulus);
        let x = hash_password_to_secret(&password, &m);
        prop_assert_eq!(&x, &hash_password_to_secret(&password, &m));
        prop_assert!(x < BigUint::from(modulus - 1));
    }
}
