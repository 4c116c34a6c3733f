//! Local keypair store: the payer keypair and the deployed program's keypair

use crate::{Config, HelloError, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signer::{
        keypair::{read_keypair_file, write_keypair_file, Keypair},
        Signer,
    },
};
use std::path::Path;
use tracing::{debug, info};

/// Load the keypair at `path`, generating and persisting a new one if the file does not exist.
pub fn load_or_create(path: impl AsRef<Path>) -> Result<Keypair> {
    let path = path.as_ref();

    if path.exists() {
        let keypair = read_keypair_file(path).map_err(|e| {
            HelloError::Keypair(format!("failed to read {}: {e}", path.display()))
        })?;
        debug!("Loaded payer {} from {}", keypair.pubkey(), path.display());
        return Ok(keypair);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            HelloError::Keypair(format!("failed to create {}: {e}", parent.display()))
        })?;
    }

    let keypair = Keypair::new();
    write_keypair_file(&keypair, path).map_err(|e| {
        HelloError::Keypair(format!("failed to write {}: {e}", path.display()))
    })?;
    info!("Generated new payer {} at {}", keypair.pubkey(), path.display());

    Ok(keypair)
}

/// Resolve the program id: explicit config first, then the deployment keypair.
pub fn program_id(config: &Config) -> Result<Pubkey> {
    if let Some(program_id) = config.program_id {
        return Ok(program_id);
    }

    read_keypair_file(&config.program_keypair_path)
        .map(|keypair| keypair.pubkey())
        .map_err(|e| HelloError::ProgramKeypair {
            path: config.program_keypair_path.clone(),
            reason: e.to_string(),
        })
}
