use solana_client::client_error::ClientError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelloError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Keypair error: {0}")]
    Keypair(String),

    #[error("Connection to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Funding error: {0}")]
    Funding(String),

    #[error("Failed to read program keypair from {path}: {reason}. Deploy the program with `solana program deploy` first")]
    ProgramKeypair { path: String, reason: String },

    #[error("Program {0} is not deployed")]
    ProgramNotDeployed(Pubkey),

    #[error("Program {0} is not executable")]
    ProgramNotExecutable(Pubkey),

    #[error("Greeting account {account} is owned by {owner}, expected {program_id}")]
    GreetingOwnerMismatch {
        account: Pubkey,
        owner: Pubkey,
        program_id: Pubkey,
    },

    #[error("Transaction failed ({context}): {source}")]
    Transaction {
        context: &'static str,
        #[source]
        source: Box<ClientError>,
    },

    #[error("RPC error: {0}")]
    Rpc(Box<ClientError>),

    #[error("Greeting account {0} not found")]
    GreetingAccountMissing(Pubkey),

    #[error("Greeting account {account} holds malformed data: {reason}")]
    MalformedGreeting { account: Pubkey, reason: String },
}

impl HelloError {
    pub(crate) fn transaction(context: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |err| Self::Transaction {
            context,
            source: Box::new(err),
        }
    }
}

impl From<ClientError> for HelloError {
    fn from(err: ClientError) -> Self {
        Self::Rpc(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, HelloError>;
