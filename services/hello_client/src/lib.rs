//! Hello Client
//!
//! Greets a deployed hello world program: funds a payer, makes sure the
//! greeting account exists, sends the four program instructions and reads
//! the greeting counter back.

pub mod config;
pub mod error;
pub mod greeting;
pub mod keypair;
pub mod orchestrator;
pub mod rpc;

pub use config::Config;
pub use error::{HelloError, Result};
pub use greeting::{GreetingAccount, HelloInstruction, GREETING_SIZE, MEMO_PROGRAM_ID};
pub use orchestrator::{check_program, establish_connection, establish_payer, Greeter};
pub use rpc::LedgerRpc;

use tracing::info;

/// Run the whole flow against the configured cluster; returns the final greeting count.
pub async fn run(config: Config) -> Result<u32> {
    let rpc = rpc::connect(config.rpc_url.clone());
    run_with(&rpc, &config).await
}

/// Run the whole flow against any ledger. Stops at the first failing step.
pub async fn run_with<R: LedgerRpc + ?Sized>(rpc: &R, config: &Config) -> Result<u32> {
    info!("Let's say hello to a Solana account...");

    establish_connection(rpc).await?;

    let payer = keypair::load_or_create(&config.keypair_path)?;
    establish_payer(rpc, &payer).await?;

    let program_id = keypair::program_id(config)?;
    let greeted = check_program(rpc, &payer, &program_id, &config.greeting_seed).await?;

    let greeter = Greeter::new(rpc, &payer, program_id, greeted);
    greeter.say_hello().await?;
    greeter.do_nothing().await?;
    greeter.log_message(&config.message).await?;
    greeter.log_memo(&config.memo).await?;

    greeter.report_greetings().await
}
