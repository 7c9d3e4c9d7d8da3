use plinko_core::{
    compute_combined_seed, compute_commitment_hash, derive_integer_seed, simulate, verify,
    EngineParams, Paytable, Round, XorShift32,
};

const SERVER_SEED: &str = "b2a5f3f32a4d9c6ee7a8c1d33456677890abcdeffedcba0987654321ffeeddcc";
const NONCE: &str = "42";
const CLIENT_SEED: &str = "candidate-hello";

#[test]
fn reference_commit_and_combined_seed() {
    assert_eq!(
        compute_commitment_hash(SERVER_SEED, NONCE),
        "bb9acdc67f3f18f3345236a01f0e5072596657a9005c7d8a22cff061451a6b34"
    );
    assert_eq!(
        compute_combined_seed(SERVER_SEED, CLIENT_SEED, NONCE).unwrap(),
        "e1dddf77de27d395ea2be2ed49aa2a59bd6bf12ee8d350c16c008abd406c07e0"
    );
}

#[test]
fn reference_prng_stream() {
    let combined = compute_combined_seed(SERVER_SEED, CLIENT_SEED, NONCE).unwrap();
    let rng = XorShift32::new(derive_integer_seed(&combined).unwrap());
    let draws: Vec<f64> = rng.take(5).collect();
    let expected = [0.110616665, 0.762512921, 0.043929218, 0.457867882, 0.343899930];
    for (got, want) in draws.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{got} vs {want}");
    }
}

#[test]
fn reference_center_drop() {
    let combined = compute_combined_seed(SERVER_SEED, CLIENT_SEED, NONCE).unwrap();
    let sim = simulate(&combined, 12, 6, None).unwrap();
    assert_eq!(sim.bin_index, 6);
    assert_eq!(format!("{:.6}", sim.peg_map[0][0].left_bias), "0.422123");
    assert_eq!(format!("{:.6}", sim.peg_map[1][0].left_bias), "0.552503");
    assert_eq!(format!("{:.6}", sim.peg_map[1][1].left_bias), "0.408786");
    assert_eq!(sim.peg_map_hash.len(), 64);
    assert_eq!(sim.decisions.len(), 12);
}

#[test]
fn commitment_ignores_player_inputs() {
    let commit = compute_commitment_hash(SERVER_SEED, NONCE);
    for (client, drop) in [("a", 0), ("b", 6), ("candidate-hello", 12)] {
        let v = verify(SERVER_SEED, client, NONCE, drop, 12, None).unwrap();
        assert_eq!(v.commit_hex, commit);
    }
}

#[test]
fn single_character_changes_combined_seed() {
    let base = compute_combined_seed(SERVER_SEED, CLIENT_SEED, NONCE).unwrap();
    let mut server = SERVER_SEED.to_string();
    server.replace_range(0..1, "c");
    assert_ne!(compute_combined_seed(&server, CLIENT_SEED, NONCE).unwrap(), base);
    assert_ne!(
        compute_combined_seed(SERVER_SEED, "candidate-hellp", NONCE).unwrap(),
        base
    );
    assert_ne!(compute_combined_seed(SERVER_SEED, CLIENT_SEED, "43").unwrap(), base);
}

#[test]
fn drop_column_moves_mean_bin() {
    // adjustment is added to the left bias: right of center lands further left
    let mean_bin = |drop: usize| {
        let total: usize = (0..500u32)
            .map(|i| {
                let combined =
                    compute_combined_seed(SERVER_SEED, &format!("player-{i}"), NONCE).unwrap();
                simulate(&combined, 12, drop, None).unwrap().bin_index
            })
            .sum();
        total as f64 / 500.0
    };
    let left = mean_bin(0);
    let center = mean_bin(6);
    let right = mean_bin(12);
    assert!(left > center, "{left} <= {center}");
    assert!(center > right, "{center} <= {right}");
}

#[test]
fn rtp_simulation_smoke() {
    let params = EngineParams::default();
    let paytable = Paytable::reference();
    let mut total_bet = 0u64;
    let mut total_payout = 0u64;
    for _ in 0..200 {
        let mut round = Round::commit(&params).unwrap();
        let outcome = round.start("client", 6, 100).unwrap();
        total_bet += outcome.bet_cents;
        total_payout += paytable.payout_cents(outcome.bet_cents, outcome.bin_index);
    }
    let rtp = total_payout as f64 / total_bet as f64;
    // very loose bounds: every bin pays between 1x and 15x
    assert!((1.0..=15.0).contains(&rtp));
}
