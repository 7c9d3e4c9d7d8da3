use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{FairnessError, Result};

// Commit/reveal seed material.
// server_seed (secret) + nonce -> SHA-256 -> commitment published before play
// server_seed + client_seed + nonce -> SHA-256 -> combined seed driving the simulation

pub const SERVER_SEED_BYTES: usize = 32;
pub const NONCE_BYTES: usize = 8;

/// Hex characters of the combined seed consumed by [`derive_integer_seed`].
const INTEGER_SEED_HEX_LEN: usize = 8;

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

fn random_hex(len: usize) -> String {
    // ThreadRng is a CSPRNG reseeded from the OS, never a plain deterministic PRNG.
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// 64 lowercase hex characters of secret server entropy.
pub fn generate_server_seed() -> String {
    random_hex(SERVER_SEED_BYTES)
}

/// 16 lowercase hex characters; keeps each commitment unique.
pub fn generate_nonce() -> String {
    random_hex(NONCE_BYTES)
}

/// SHA-256 of `"{server_seed}:{nonce}"`, published before the round starts.
pub fn compute_commitment_hash(server_seed: &str, nonce: &str) -> String {
    derive_hash_hex(format!("{server_seed}:{nonce}").as_bytes())
}

/// SHA-256 of `"{server_seed}:{client_seed}:{nonce}"`, the only entropy the
/// simulation is allowed to consume.
pub fn compute_combined_seed(server_seed: &str, client_seed: &str, nonce: &str) -> Result<String> {
    if client_seed.is_empty() {
        return Err(FairnessError::EmptyRequiredField("client_seed"));
    }
    Ok(derive_hash_hex(
        format!("{server_seed}:{client_seed}:{nonce}").as_bytes(),
    ))
}

/// First four bytes of the combined seed, read big-endian.
pub fn derive_integer_seed(combined_seed: &str) -> Result<u32> {
    let prefix = combined_seed
        .get(..INTEGER_SEED_HEX_LEN)
        .ok_or_else(|| {
            FairnessError::InvalidInputFormat(format!(
                "combined seed needs at least {INTEGER_SEED_HEX_LEN} hex characters, got {}",
                combined_seed.len()
            ))
        })?;
    let mut bytes = [0u8; 4];
    hex::decode_to_slice(prefix, &mut bytes).map_err(|e| {
        FairnessError::InvalidInputFormat(format!("combined seed prefix {prefix:?}: {e}"))
    })?;
    Ok(u32::from_be_bytes(bytes))
}

/// The secret half of a round: everything the server fixes before the
/// player acts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSecret {
    pub server_seed: String, // secret until reveal
    pub nonce: String,
}

impl ServerSecret {
    pub fn new(server_seed: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            server_seed: server_seed.into(),
            nonce: nonce.into(),
        }
    }

    pub fn generate() -> Self {
        Self::new(generate_server_seed(), generate_nonce())
    }

    pub fn commitment_hash(&self) -> String {
        compute_commitment_hash(&self.server_seed, &self.nonce)
    }

    pub fn combined_seed(&self, client_seed: &str) -> Result<String> {
        compute_combined_seed(&self.server_seed, client_seed, &self.nonce)
    }
}
