//! Interactive Schnorr proof of knowledge of a password-derived discrete log.
//!
//! A [`Prover`] derives a secret exponent `x` from a password and registers
//! `y = g^x mod p` with a [`Verifier`]. Each login is one commit / challenge /
//! response round:
//!
//! ```
//! use zkp_schnorr_auth::schnorr::{AuthSession, FieldParameters, Prover, Verifier};
//!
//! let params = FieldParameters::reference();
//! let prover = Prover::new(params.clone(), "secret123");
//! let verifier = Verifier::new(params, prover.register());
//!
//! let transcript = AuthSession::new(&prover, &verifier).run_round().unwrap();
//! assert!(transcript.accepted);
//! ```
//!
//! The parameters are toy-sized and responses are not reduced modulo the group
//! order. This crate is a teaching aid, not a production proof system.

pub mod error;
pub mod logging;
pub mod schnorr;

pub use error::{Result, ZkpError};
pub use schnorr::{
    AuthSession, Challenge, Commitment, Committer, FakeProver, FieldParameters, Prover, PublicKey,
    Response, Transcript, Verifier,
};
