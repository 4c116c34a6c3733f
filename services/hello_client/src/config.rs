//! Client configuration

use crate::{HelloError, Result};
use solana_sdk::pubkey::{Pubkey, MAX_SEED_LEN};
use std::str::FromStr;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
pub const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";
pub const DEFAULT_PROGRAM_KEYPAIR_PATH: &str = "dist/program/helloworld-keypair.json";
pub const DEFAULT_GREETING_SEED: &str = "hello";

#[derive(Clone, Debug)]
pub struct Config {
    /// RPC endpoint of the cluster
    pub rpc_url: String,

    /// Payer keypair, created here if missing
    pub keypair_path: String,

    /// Explicit program id; takes precedence over the program keypair
    pub program_id: Option<Pubkey>,

    /// Keypair written by `solana program deploy`
    pub program_keypair_path: String,

    /// Seed for the greeting account address
    pub greeting_seed: String,

    /// Payload of the log message instruction
    pub message: String,

    /// Payload of the memo instruction
    pub memo: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            keypair_path: DEFAULT_KEYPAIR_PATH.to_string(),
            program_id: None,
            program_keypair_path: DEFAULT_PROGRAM_KEYPAIR_PATH.to_string(),
            greeting_seed: DEFAULT_GREETING_SEED.to_string(),
            message: "hello from hello-client".to_string(),
            memo: "hello-client memo".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let program_id = lookup("PROGRAM_ID")
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                Pubkey::from_str(s.trim())
                    .map_err(|e| HelloError::Config(format!("invalid PROGRAM_ID {s}: {e}")))
            })
            .transpose()?;

        let greeting_seed = lookup("GREETING_SEED").unwrap_or(defaults.greeting_seed);
        if greeting_seed.len() > MAX_SEED_LEN {
            return Err(HelloError::Config(format!(
                "GREETING_SEED is {} bytes, at most {MAX_SEED_LEN} allowed",
                greeting_seed.len()
            )));
        }

        Ok(Self {
            rpc_url: lookup("RPC_URL").unwrap_or(defaults.rpc_url),
            keypair_path: expand(lookup("KEYPAIR_PATH").unwrap_or(defaults.keypair_path)),
            program_id,
            program_keypair_path: expand(
                lookup("PROGRAM_KEYPAIR_PATH").unwrap_or(defaults.program_keypair_path),
            ),
            greeting_seed,
            message: lookup("HELLO_MESSAGE").unwrap_or(defaults.message),
            memo: lookup("HELLO_MEMO").unwrap_or(defaults.memo),
        })
    }
}

fn expand(path: String) -> String {
    shellexpand::tilde(&path).to_string()
}
