//! Round sequencing: `Idle -> Committed -> Challenged -> Responded -> Idle`.
//!
//! [`AuthSession`] pairs one [`Committer`] with one [`Verifier`] and refuses any
//! step taken out of order with [`ZkpError::Sequence`] instead of computing on
//! leftover state.

use std::mem;

use tracing::{debug, info_span};
use uuid::Uuid;

use super::prover::{CommitmentRound, Committer};
use super::verifier::{PendingVerification, Verifier};
use super::{Challenge, Commitment, Response, Transcript};
use crate::error::{Result, ZkpError};

#[derive(Debug, Default)]
pub enum RoundState {
    #[default]
    Idle,
    Committed {
        round: CommitmentRound,
    },
    Challenged {
        round: CommitmentRound,
        pending: PendingVerification,
    },
    Responded {
        round_id: Uuid,
        pending: PendingVerification,
        response: Response,
    },
}

impl RoundState {
    pub fn name(&self) -> &'static str {
        match self {
            RoundState::Idle => "idle",
            RoundState::Committed { .. } => "committed",
            RoundState::Challenged { .. } => "challenged",
            RoundState::Responded { .. } => "responded",
        }
    }
}

#[derive(Debug)]
pub struct AuthSession<'a, C: Committer> {
    committer: &'a C,
    verifier: &'a Verifier,
    state: RoundState,
}

impl<'a, C: Committer> AuthSession<'a, C> {
    pub fn new(committer: &'a C, verifier: &'a Verifier) -> Self {
        Self { committer, verifier, state: RoundState::Idle }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Opens a round. Only allowed from `Idle`.
    pub fn commit(&mut self) -> Result<Commitment> {
        match mem::take(&mut self.state) {
            RoundState::Idle => {
                let round = self.committer.commit();
                let commitment = round.commitment().clone();
                self.state = RoundState::Committed { round };
                Ok(commitment)
            }
            other => self.reject(other, "commit"),
        }
    }

    /// Has the verifier challenge the open commitment.
    pub fn issue_challenge(&mut self) -> Result<Challenge> {
        match mem::take(&mut self.state) {
            RoundState::Committed { round } => {
                let pending = self.verifier.issue_challenge(round.commitment().clone());
                let challenge = pending.challenge().clone();
                self.state = RoundState::Challenged { round, pending };
                Ok(challenge)
            }
            other => self.reject(other, "issue a challenge"),
        }
    }

    pub fn respond(&mut self) -> Result<Response> {
        match mem::take(&mut self.state) {
            RoundState::Challenged { round, pending } => {
                let round_id = round.round_id();
                let response = self.committer.respond(round, pending.challenge());
                self.state =
                    RoundState::Responded { round_id, pending, response: response.clone() };
                Ok(response)
            }
            other => self.reject(other, "respond"),
        }
    }

    /// Checks the answered round and returns the session to `Idle`.
    pub fn verify(&mut self) -> Result<Transcript> {
        match mem::take(&mut self.state) {
            RoundState::Responded { round_id, pending, response } => {
                let commitment = pending.commitment().clone();
                let challenge = pending.challenge().clone();
                let accepted = self.verifier.verify(pending, &response);
                Ok(Transcript { round_id, commitment, challenge, response, accepted })
            }
            other => self.reject(other, "verify"),
        }
    }

    /// Runs commit, challenge, respond and verify in order.
    pub fn run_round(&mut self) -> Result<Transcript> {
        let span = info_span!("auth_round");
        let _guard = span.enter();

        self.commit()?;
        self.issue_challenge()?;
        self.respond()?;
        let transcript = self.verify()?;
        debug!(round = %transcript.round_id, accepted = transcript.accepted, "round complete");
        Ok(transcript)
    }

    /// Drops any half-finished round.
    pub fn abort(&mut self) {
        if !matches!(self.state, RoundState::Idle) {
            debug!(state = self.state.name(), "round aborted");
        }
        self.state = RoundState::Idle;
    }

    // Puts the untouched state back and reports the misuse.
    fn reject<T>(&mut self, state: RoundState, operation: &'static str) -> Result<T> {
        let name = state.name();
        self.state = state;
        Err(ZkpError::Sequence { operation, state: name })
    }
}
