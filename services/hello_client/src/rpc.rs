//! Ledger access used by the orchestrator

use async_trait::async_trait;
use solana_client::{client_error::Result as ClientResult, nonblocking::rpc_client::RpcClient};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

/// The subset of the cluster RPC surface the hello flow relies on
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Endpoint this handle talks to
    fn url(&self) -> String;

    /// Version string reported by the node
    async fn version(&self) -> ClientResult<String>;

    async fn balance(&self, pubkey: &Pubkey) -> ClientResult<u64>;

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> ClientResult<Signature>;

    /// Block until `signature` is confirmed
    async fn confirm_signature(&self, signature: &Signature) -> ClientResult<()>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64>;

    async fn fee_for_message(&self, message: &Message) -> ClientResult<u64>;

    /// Account at `pubkey`, or `None` if it does not exist
    async fn account(&self, pubkey: &Pubkey) -> ClientResult<Option<Account>>;

    async fn latest_blockhash(&self) -> ClientResult<Hash>;

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> ClientResult<Signature>;
}

/// Open a confirmed-commitment RPC handle. No request is made until first use.
pub fn connect(url: impl Into<String>) -> RpcClient {
    RpcClient::new_with_commitment(url.into(), CommitmentConfig::confirmed())
}

#[async_trait]
impl LedgerRpc for RpcClient {
    fn url(&self) -> String {
        RpcClient::url(self)
    }

    async fn version(&self) -> ClientResult<String> {
        Ok(self.get_version().await?.solana_core)
    }

    async fn balance(&self, pubkey: &Pubkey) -> ClientResult<u64> {
        self.get_balance(pubkey).await
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> ClientResult<Signature> {
        RpcClient::request_airdrop(self, pubkey, lamports).await
    }

    async fn confirm_signature(&self, signature: &Signature) -> ClientResult<()> {
        self.poll_for_signature(signature).await
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        self.get_minimum_balance_for_rent_exemption(data_len).await
    }

    async fn fee_for_message(&self, message: &Message) -> ClientResult<u64> {
        self.get_fee_for_message(message).await
    }

    async fn account(&self, pubkey: &Pubkey) -> ClientResult<Option<Account>> {
        Ok(self
            .get_account_with_commitment(pubkey, self.commitment())
            .await?
            .value)
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        self.get_latest_blockhash().await
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        RpcClient::send_and_confirm_transaction(self, transaction).await
    }
}
