use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    engine::{simulate, Decision, EngineParams},
    error::{FairnessError, Result},
    fairness::ServerSecret,
    paytable::Paytable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    Created,
    Started,
    Revealed,
}

impl RoundStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundStatus::Created => "CREATED",
            RoundStatus::Started => "STARTED",
            RoundStatus::Revealed => "REVEALED",
        }
    }
}

/// Everything fixed once the player drops the ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub client_seed: String,
    pub combined_seed: String,
    pub drop_column: usize,
    pub bet_cents: u64,
    pub peg_map_hash: String,
    pub decisions: Vec<Decision>,
    pub bin_index: usize,
    pub payout_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundReveal {
    pub server_seed: String,
    pub commit_hex: String,
    pub nonce: String,
    pub revealed_at: DateTime<Utc>,
}

/// What may be shown to anyone: the server seed stays `None` until reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRound {
    pub status: RoundStatus,
    pub commit_hex: String,
    pub nonce: String,
    pub rows: usize,
    pub bias_adjustment_per_column: f64,
    pub paytable: Paytable,
    pub created_at: DateTime<Utc>,
    pub server_seed: Option<String>,
    pub outcome: Option<RoundOutcome>,
    pub revealed_at: Option<DateTime<Utc>>,
}

/// One commit/reveal round. Values are derived once at each transition and
/// never recomputed implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    status: RoundStatus,
    secret: ServerSecret,
    commit_hex: String,
    rows: usize,
    bias_adjustment_per_column: f64,
    paytable: Paytable,
    created_at: DateTime<Utc>,
    outcome: Option<RoundOutcome>,
    revealed_at: Option<DateTime<Utc>>,
}

impl Round {
    /// Fresh secret material and its commitment. The board size, bias and
    /// paytable are fixed here and must agree with each other.
    pub fn commit(params: &EngineParams) -> Result<Self> {
        Self::with_secret(ServerSecret::generate(), params, Utc::now())
    }

    pub fn with_secret(
        secret: ServerSecret,
        params: &EngineParams,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        params.validate()?;
        let commit_hex = secret.commitment_hash();
        info!(%commit_hex, rows = params.rows, "round committed");
        Ok(Self {
            status: RoundStatus::Created,
            secret,
            commit_hex,
            rows: params.rows,
            bias_adjustment_per_column: params.bias_adjustment_per_column,
            paytable: params.paytable.clone(),
            created_at,
            outcome: None,
            revealed_at: None,
        })
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn commit_hex(&self) -> &str {
        &self.commit_hex
    }

    pub fn nonce(&self) -> &str {
        &self.secret.nonce
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn paytable(&self) -> &Paytable {
        &self.paytable
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    fn transition_error(&self, action: &'static str) -> FairnessError {
        FairnessError::InvalidTransition {
            from: self.status.as_str(),
            action,
        }
    }

    /// Locks in the player's inputs and computes the outcome. Only valid
    /// from `Created`.
    pub fn start(
        &mut self,
        client_seed: &str,
        drop_column: usize,
        bet_cents: u64,
    ) -> Result<&RoundOutcome> {
        if self.status != RoundStatus::Created {
            return Err(self.transition_error("start"));
        }
        let client_seed = client_seed.trim();
        if client_seed.is_empty() {
            return Err(FairnessError::EmptyRequiredField("client_seed"));
        }
        if bet_cents == 0 {
            return Err(FairnessError::OutOfRangeParameter {
                name: "bet_cents",
                value: 0,
                min: 1,
                max: i64::MAX,
            });
        }

        let combined_seed = self.secret.combined_seed(client_seed)?;
        let sim = simulate(
            &combined_seed,
            self.rows,
            drop_column,
            Some(self.bias_adjustment_per_column),
        )?;
        let payout_multiplier = self.paytable.multiplier(sim.bin_index);
        info!(
            commit_hex = %self.commit_hex,
            drop_column,
            bin_index = sim.bin_index,
            payout_multiplier,
            "round started"
        );

        self.status = RoundStatus::Started;
        Ok(&*self.outcome.insert(RoundOutcome {
            client_seed: client_seed.to_string(),
            combined_seed,
            drop_column,
            bet_cents,
            peg_map_hash: sim.peg_map_hash,
            decisions: sim.decisions,
            bin_index: sim.bin_index,
            payout_multiplier,
        }))
    }

    /// Discloses the server seed. Only valid once started; revealing again
    /// returns the original reveal unchanged.
    pub fn reveal(&mut self, now: DateTime<Utc>) -> Result<RoundReveal> {
        let revealed_at = match (self.status, self.revealed_at) {
            (RoundStatus::Revealed, Some(at)) => at,
            (RoundStatus::Started, _) => {
                self.status = RoundStatus::Revealed;
                self.revealed_at = Some(now);
                info!(commit_hex = %self.commit_hex, "round revealed");
                now
            }
            _ => return Err(self.transition_error("reveal")),
        };
        Ok(RoundReveal {
            server_seed: self.secret.server_seed.clone(),
            commit_hex: self.commit_hex.clone(),
            nonce: self.secret.nonce.clone(),
            revealed_at,
        })
    }

    pub fn public_view(&self) -> PublishedRound {
        PublishedRound {
            status: self.status,
            commit_hex: self.commit_hex.clone(),
            nonce: self.secret.nonce.clone(),
            rows: self.rows,
            bias_adjustment_per_column: self.bias_adjustment_per_column,
            paytable: self.paytable.clone(),
            created_at: self.created_at,
            server_seed: (self.status == RoundStatus::Revealed)
                .then(|| self.secret.server_seed.clone()),
            outcome: self.outcome.clone(),
            revealed_at: self.revealed_at,
        }
    }
}
