pub mod crypto;
pub mod prover;
pub mod session;
pub mod verifier;

use std::fmt;

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ZkpError};

pub use crypto::*;
pub use prover::{CommitmentRound, Committer, FakeProver, Prover, REFERENCE_GUESS};
pub use session::{AuthSession, RoundState};
pub use verifier::{PendingVerification, Verifier};

const PRIMALITY_ROUNDS: usize = 40;

/// Group parameters shared by prover and verifier.
///
/// Only obtainable through [`FieldParameters::reference`], [`FieldParameters::new`]
/// or deserialization, and the latter two validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldParameters")]
pub struct FieldParameters {
    modulus: BigUint,               // prime p
    generator: BigUint,             // g in [2, p - 2]
    challenge_upper_bound: BigUint, // challenges drawn from [1, bound]
}

#[derive(Deserialize)]
struct RawFieldParameters {
    modulus: BigUint,
    generator: BigUint,
    challenge_upper_bound: BigUint,
}

impl TryFrom<RawFieldParameters> for FieldParameters {
    type Error = ZkpError;

    fn try_from(raw: RawFieldParameters) -> Result<Self> {
        Self::new(raw.modulus, raw.generator, raw.challenge_upper_bound)
    }
}

impl FieldParameters {
    /// The toy parameters of the interactive demo: p = 48611, g = 19, c <= 100.
    pub fn reference() -> Self {
        Self {
            modulus: BigUint::from(48611u32),
            generator: BigUint::from(19u32),
            challenge_upper_bound: BigUint::from(100u32),
        }
    }

    /// Builds parameters after checking them.
    ///
    /// The modulus must be an odd prime (Miller-Rabin) and the generator must lie
    /// in `[2, p - 2]`. For moduli small enough to factor `p - 1`, the generator
    /// must also be a primitive root; larger moduli only get a warning.
    pub fn new(
        modulus: BigUint,
        generator: BigUint,
        challenge_upper_bound: BigUint,
    ) -> Result<Self> {
        let params = Self { modulus, generator, challenge_upper_bound };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.modulus;
        if p < &BigUint::from(5u32) || !is_probably_prime(p, PRIMALITY_ROUNDS) {
            return Err(ZkpError::InvalidModulus(format!("{p} is not an odd prime >= 5")));
        }

        let g = &self.generator;
        if g < &BigUint::from(2u32) || g > &(p - 2u32) {
            return Err(ZkpError::InvalidGenerator(format!("{g} is outside [2, {}]", p - 2u32)));
        }
        match is_primitive_root(g, p) {
            Some(true) => {}
            Some(false) => {
                return Err(ZkpError::InvalidGenerator(format!(
                    "{g} does not generate the multiplicative group mod {p}"
                )));
            }
            None => warn!(bits = p.bits(), "generator order not verified for large modulus"),
        }

        if self.challenge_upper_bound < BigUint::one() {
            return Err(ZkpError::InvalidChallengeBound);
        }
        Ok(())
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    pub fn challenge_upper_bound(&self) -> &BigUint {
        &self.challenge_upper_bound
    }

    /// Order of the multiplicative group, `p - 1`.
    pub fn group_order(&self) -> BigUint {
        &self.modulus - BigUint::one()
    }
}

impl Default for FieldParameters {
    fn default() -> Self {
        Self::reference()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub y: BigUint, // g^x mod p
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub t: BigUint, // g^r mod p
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub c: BigUint, // uniform in [1, bound]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub s: BigUint, // r + c*x
}

/// The public record of one completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub round_id: Uuid,
    pub commitment: Commitment,
    pub challenge: Challenge,
    pub response: Response,
    pub accepted: bool,
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.y)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.t)
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.c)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.s)
    }
}
