use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    engine::{simulate, Decision},
    error::{FairnessError, Result},
    fairness::{compute_combined_seed, compute_commitment_hash},
    round::PublishedRound,
};

/// Everything a third party recomputes from revealed seed material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub commit_hex: String,
    pub combined_seed: String,
    pub peg_map_hash: String,
    pub decisions: Vec<Decision>,
    pub bin_index: usize,
}

pub fn verify(
    server_seed: &str,
    client_seed: &str,
    nonce: &str,
    drop_column: usize,
    rows: usize,
    bias_adjustment_per_column: Option<f64>,
) -> Result<Verification> {
    if server_seed.is_empty() {
        return Err(FairnessError::EmptyRequiredField("server_seed"));
    }
    if nonce.is_empty() {
        return Err(FairnessError::EmptyRequiredField("nonce"));
    }
    let commit_hex = compute_commitment_hash(server_seed, nonce);
    let combined_seed = compute_combined_seed(server_seed, client_seed, nonce)?;
    let sim = simulate(&combined_seed, rows, drop_column, bias_adjustment_per_column)?;
    Ok(Verification {
        commit_hex,
        combined_seed,
        peg_map_hash: sim.peg_map_hash,
        decisions: sim.decisions,
        bin_index: sim.bin_index,
    })
}

/// Values a round claimed at play time. Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub commit_hex: Option<String>,
    pub combined_seed: Option<String>,
    pub peg_map_hash: Option<String>,
    pub decisions: Option<Vec<Decision>>,
    pub bin_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditCheck {
    pub field: String,
    pub claimed: String,
    pub recomputed: String,
    pub matches: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub checks: Vec<AuditCheck>,
}

impl AuditReport {
    fn push(&mut self, field: &str, claimed: String, recomputed: String) {
        let matches = claimed == recomputed;
        if !matches {
            warn!(field, %claimed, %recomputed, "audit mismatch");
        }
        self.checks.push(AuditCheck {
            field: field.to_string(),
            claimed,
            recomputed,
            matches,
        });
    }

    /// True when every claimed value was reproduced. A report with no
    /// checks proves nothing and is not fair.
    pub fn is_fair(&self) -> bool {
        !self.checks.is_empty() && self.checks.iter().all(|c| c.matches)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &AuditCheck> {
        self.checks.iter().filter(|c| !c.matches)
    }
}

fn path_of(decisions: &[Decision]) -> String {
    decisions.iter().map(Decision::to_string).collect()
}

impl Verification {
    pub fn check(&self, claims: &Claims) -> AuditReport {
        let mut report = AuditReport::default();
        if let Some(claimed) = &claims.commit_hex {
            report.push("commitHex", claimed.to_lowercase(), self.commit_hex.clone());
        }
        if let Some(claimed) = &claims.combined_seed {
            report.push(
                "combinedSeed",
                claimed.to_lowercase(),
                self.combined_seed.clone(),
            );
        }
        if let Some(claimed) = &claims.peg_map_hash {
            report.push("pegMapHash", claimed.to_lowercase(), self.peg_map_hash.clone());
        }
        if let Some(claimed) = &claims.decisions {
            report.push("decisions", path_of(claimed), path_of(&self.decisions));
        }
        if let Some(claimed) = claims.bin_index {
            report.push("binIndex", claimed.to_string(), self.bin_index.to_string());
        }
        report
    }
}

/// Replays a published round with its revealed server seed and compares
/// every stored value. The round must have been started.
pub fn audit(published: &PublishedRound, server_seed: &str) -> Result<AuditReport> {
    let outcome = published
        .outcome
        .as_ref()
        .ok_or(FairnessError::InvalidTransition {
            from: published.status.as_str(),
            action: "audit",
        })?;
    let verification = verify(
        server_seed,
        &outcome.client_seed,
        &published.nonce,
        outcome.drop_column,
        published.rows,
        Some(published.bias_adjustment_per_column),
    )?;
    let mut report = verification.check(&Claims {
        commit_hex: Some(published.commit_hex.clone()),
        combined_seed: Some(outcome.combined_seed.clone()),
        peg_map_hash: Some(outcome.peg_map_hash.clone()),
        decisions: Some(outcome.decisions.clone()),
        bin_index: Some(outcome.bin_index),
    });
    report.push(
        "payoutMultiplier",
        outcome.payout_multiplier.to_string(),
        published
            .paytable
            .multiplier(verification.bin_index)
            .to_string(),
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::EngineParams, fairness::ServerSecret, round::Round};
    use chrono::Utc;

    const SERVER_SEED: &str = "b2a5f3f32a4d9c6ee7a8c1d33456677890abcdeffedcba0987654321ffeeddcc";

    #[test]
    fn test_verify_reference() {
        let v = verify(SERVER_SEED, "candidate-hello", "42", 6, 12, None).unwrap();
        assert_eq!(
            v.commit_hex,
            "bb9acdc67f3f18f3345236a01f0e5072596657a9005c7d8a22cff061451a6b34"
        );
        assert_eq!(v.bin_index, 6);
        assert_eq!(path_of(&v.decisions), "LLLRLRLRLRRR");
    }

    #[test]
    fn test_verify_requires_material() {
        assert_eq!(
            verify("", "c", "42", 6, 12, None).unwrap_err(),
            FairnessError::EmptyRequiredField("server_seed")
        );
        assert_eq!(
            verify(SERVER_SEED, "c", "", 6, 12, None).unwrap_err(),
            FairnessError::EmptyRequiredField("nonce")
        );
        assert_eq!(
            verify(SERVER_SEED, "", "42", 6, 12, None).unwrap_err(),
            FairnessError::EmptyRequiredField("client_seed")
        );
    }

    #[test]
    fn test_partial_claims() {
        let v = verify(SERVER_SEED, "candidate-hello", "42", 6, 12, None).unwrap();
        assert!(!v.check(&Claims::default()).is_fair());

        let report = v.check(&Claims {
            commit_hex: Some(
                "BB9ACDC67F3F18F3345236A01F0E5072596657A9005C7D8A22CFF061451A6B34".into(),
            ),
            bin_index: Some(7),
            ..Claims::default()
        });
        assert_eq!(report.checks.len(), 2);
        assert!(!report.is_fair());
        let bad: Vec<_> = report.mismatches().map(|c| c.field.as_str()).collect();
        assert_eq!(bad, vec!["binIndex"]);
    }

    #[test]
    fn test_audit_round() {
        let mut round = Round::with_secret(
            ServerSecret::new(SERVER_SEED, "42"),
            &EngineParams::default(),
            Utc::now(),
        )
        .unwrap();
        assert!(audit(&round.public_view(), SERVER_SEED).is_err());

        round.start("candidate-hello", 3, 250).unwrap();
        let reveal = round.reveal(Utc::now()).unwrap();
        let published = round.public_view();
        let report = audit(&published, &reveal.server_seed).unwrap();
        assert_eq!(report.checks.len(), 6);
        assert!(report.is_fair());

        // a swapped server seed breaks the commitment
        let forged = audit(&published, "00").unwrap();
        assert!(!forged.is_fair());
        assert!(forged.mismatches().any(|c| c.field == "commitHex"));

        // a tampered stored bin is caught
        let mut tampered = published.clone();
        if let Some(outcome) = tampered.outcome.as_mut() {
            outcome.bin_index += 1;
        }
        let report = audit(&tampered, SERVER_SEED).unwrap();
        assert_eq!(
            report.mismatches().map(|c| c.field.as_str()).collect::<Vec<_>>(),
            vec!["binIndex"]
        );

        // so is an inflated payout
        let mut inflated = published.clone();
        if let Some(outcome) = inflated.outcome.as_mut() {
            outcome.payout_multiplier = 15.0;
        }
        let report = audit(&inflated, SERVER_SEED).unwrap();
        assert_eq!(
            report.mismatches().map(|c| c.field.as_str()).collect::<Vec<_>>(),
            vec!["payoutMultiplier"]
        );
    }
}
