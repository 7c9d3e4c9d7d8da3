use chrono::Utc;
use plinko_core::{audit, EngineParams, Round};

fn main() -> plinko_core::Result<()> {
    // Example end-to-end round: commit, drop, reveal, audit
    let params = EngineParams::default();
    let mut round = Round::commit(&params)?;
    println!("commit={} nonce={}", round.commit_hex(), round.nonce());

    let outcome = round.start("example-client-seed", 6, 100)?;
    let path: String = outcome.decisions.iter().map(|d| d.to_string()).collect();
    println!(
        "bin={} multiplier={} path={}",
        outcome.bin_index, outcome.payout_multiplier, path
    );

    let reveal = round.reveal(Utc::now())?;
    let report = audit(&round.public_view(), &reveal.server_seed)?;
    println!("server_seed={} fair={}", reveal.server_seed, report.is_fair());
    Ok(())
}
