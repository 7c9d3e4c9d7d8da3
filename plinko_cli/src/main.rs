use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use plinko_core::{
    audit, compute_combined_seed, parse_path, simulate_with_params, verify, Claims,
    EngineParams, Paytable, Round, ServerSecret, DEFAULT_BIAS_ADJUSTMENT_PER_COLUMN,
    DEFAULT_ROWS,
};
use plinko_shared::{
    CombineResponse, CommitResponse, PlayResponse, SimulateResponse, VerifyRequest,
    VerifyResponse,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plinko-cli", about = "Provably-fair plinko commit/verify tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct EngineArgs {
    /// Board height
    #[arg(long, global = true, env = "PLINKO_ROWS", default_value_t = DEFAULT_ROWS)]
    rows: usize,
    /// Left-bias shift per column away from center
    #[arg(long, global = true, env = "PLINKO_BIAS_PER_COLUMN", default_value_t = DEFAULT_BIAS_ADJUSTMENT_PER_COLUMN)]
    bias_per_column: f64,
    /// JSON array of rows + 1 multipliers, default the 12-row reference table
    #[arg(long, global = true, env = "PLINKO_PAYTABLE")]
    paytable: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a secret server seed, nonce and the commitment to publish
    Commit,
    /// Derive the combined seed from all three contributions
    Combine {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: String,
    },
    /// Run the deterministic drop for a combined seed
    Simulate {
        #[arg(long)]
        combined_seed: String,
        #[arg(long)]
        drop_column: usize,
        /// Include the full peg map in the output
        #[arg(long)]
        pegs: bool,
    },
    /// Recompute a revealed round and optionally audit published values
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: String,
        #[arg(long)]
        drop_column: usize,
        #[arg(long)]
        commit_hex: Option<String>,
        #[arg(long)]
        combined_seed: Option<String>,
        #[arg(long)]
        peg_map_hash: Option<String>,
        /// Published path as an `LR` string, e.g. `LLRLRR`
        #[arg(long)]
        decisions: Option<String>,
        #[arg(long)]
        bin_index: Option<usize>,
    },
    /// Play one in-memory round: commit, drop, reveal, audit
    Play {
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        drop_column: usize,
        #[arg(long, default_value_t = 100)]
        bet_cents: u64,
    },
}

impl EngineArgs {
    fn load(&self) -> anyhow::Result<EngineParams> {
        let paytable = match &self.paytable {
            Some(path) => {
                let data = std::fs::read_to_string(path)
                    .with_context(|| format!("reading paytable {}", path.display()))?;
                let multipliers: Vec<f64> = serde_json::from_str(&data)
                    .with_context(|| format!("parsing paytable {}", path.display()))?;
                Paytable::new(multipliers)?
            }
            None => Paytable::reference(),
        };
        let params = EngineParams {
            rows: self.rows,
            bias_adjustment_per_column: self.bias_per_column,
            paytable,
        };
        params.validate()?;
        Ok(params)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let params = cli.engine.load()?;

    match cli.command {
        Commands::Commit => {
            let secret = ServerSecret::generate();
            let commit_hex = secret.commitment_hash();
            info!(%commit_hex, "generated commitment");
            print_json(&CommitResponse {
                commit_hex,
                nonce: secret.nonce,
                server_seed: Some(secret.server_seed),
            })?;
        }
        Commands::Combine {
            server_seed,
            client_seed,
            nonce,
        } => {
            let combined_seed = compute_combined_seed(&server_seed, client_seed.trim(), &nonce)?;
            print_json(&CombineResponse { combined_seed })?;
        }
        Commands::Simulate {
            combined_seed,
            drop_column,
            pegs,
        } => {
            let sim = simulate_with_params(&combined_seed, drop_column, &params)?;
            print_json(&SimulateResponse {
                drop_column,
                bin_index: sim.bin_index,
                payout_multiplier: params.paytable.multiplier(sim.bin_index),
                peg_map_hash: sim.peg_map_hash,
                decisions: sim.decisions,
                peg_map: pegs.then_some(sim.peg_map),
            })?;
        }
        Commands::Verify {
            server_seed,
            client_seed,
            nonce,
            drop_column,
            commit_hex,
            combined_seed,
            peg_map_hash,
            decisions,
            bin_index,
        } => {
            let req = VerifyRequest {
                server_seed,
                client_seed: client_seed.trim().to_string(),
                nonce,
                drop_column,
                rows: Some(params.rows),
            };
            req.validate()?;
            let verification = verify(
                &req.server_seed,
                &req.client_seed,
                &req.nonce,
                req.drop_column,
                params.rows,
                Some(params.bias_adjustment_per_column),
            )?;
            let claims = Claims {
                commit_hex,
                combined_seed,
                peg_map_hash,
                decisions: decisions.as_deref().map(parse_path).transpose()?,
                bin_index,
            };
            let claimed = claims != Claims::default();
            let report = claimed.then(|| verification.check(&claims));
            let fair = report.as_ref().map(|r| r.is_fair());
            print_json(&VerifyResponse {
                verification,
                audit: report,
            })?;
            if fair == Some(false) {
                bail!("published values do not match the revealed seeds");
            }
        }
        Commands::Play {
            client_seed,
            drop_column,
            bet_cents,
        } => {
            let mut round = Round::commit(&params)?;
            let (bet_cents, bin_index) = {
                let outcome = round.start(&client_seed, drop_column, bet_cents)?;
                (outcome.bet_cents, outcome.bin_index)
            };
            let payout_cents = round.paytable().payout_cents(bet_cents, bin_index);
            let reveal = round.reveal(Utc::now())?;
            let published = round.public_view();
            let report = audit(&published, &reveal.server_seed)?;
            if !report.is_fair() {
                warn!(commit_hex = %reveal.commit_hex, "round failed its own audit");
            }
            print_json(&PlayResponse {
                round: published,
                payout_cents,
                revealed_at: reveal.revealed_at,
                audit: report,
            })?;
        }
    }

    Ok(())
}
