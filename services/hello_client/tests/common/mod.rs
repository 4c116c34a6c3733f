// In-memory ledger for exercising the hello flow without a validator
#![allow(dead_code)]

use async_trait::async_trait;
use borsh::{BorshDeserialize, BorshSerialize};
use hello_client::{GreetingAccount, LedgerRpc, MEMO_PROGRAM_ID};
use solana_client::client_error::{ClientError, ClientErrorKind, Result as ClientResult};
use solana_sdk::{
    account::Account,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_instruction::SystemInstruction,
    system_program,
    transaction::Transaction,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;
pub const LAMPORTS_PER_BYTE_YEAR: u64 = 3_480;
pub const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;

fn rejected(reason: impl Into<String>) -> ClientError {
    ClientError::from(ClientErrorKind::Custom(reason.into()))
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    confirmed: HashSet<Signature>,
    calls: Vec<&'static str>,
    submitted: usize,
    airdrops: usize,
    slot: u64,
}

/// Models a cluster running the hello program and the memo program.
pub struct LocalLedger {
    reachable: bool,
    airdrops_enabled: bool,
    /// Credit this instead of the requested amount
    airdrop_credit: Option<u64>,
    /// Airdrop signatures never reach confirmation
    airdrops_confirm: bool,
    state: Mutex<LedgerState>,
}

impl Default for LocalLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalLedger {
    pub fn new() -> Self {
        let ledger = Self {
            reachable: true,
            airdrops_enabled: true,
            airdrop_credit: None,
            airdrops_confirm: true,
            state: Mutex::new(LedgerState::default()),
        };
        ledger.insert_account(MEMO_PROGRAM_ID, executable_account());
        ledger
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    pub fn without_airdrops() -> Self {
        Self {
            airdrops_enabled: false,
            ..Self::new()
        }
    }

    pub fn with_airdrop_credit(lamports: u64) -> Self {
        Self {
            airdrop_credit: Some(lamports),
            ..Self::new()
        }
    }

    pub fn with_unconfirmed_airdrops() -> Self {
        Self {
            airdrops_confirm: false,
            ..Self::new()
        }
    }

    /// Deploy a hello program at a fresh address.
    pub fn deploy_program(&self) -> Pubkey {
        let program_id = Pubkey::new_unique();
        self.insert_account(program_id, executable_account());
        program_id
    }

    pub fn insert_account(&self, pubkey: Pubkey, account: Account) {
        self.state.lock().unwrap().accounts.insert(pubkey, account);
    }

    pub fn account_of(&self, pubkey: &Pubkey) -> Option<Account> {
        self.state.lock().unwrap().accounts.get(pubkey).cloned()
    }

    pub fn lamports_of(&self, pubkey: &Pubkey) -> u64 {
        self.account_of(pubkey).map_or(0, |a| a.lamports)
    }

    pub fn fund(&self, pubkey: &Pubkey, lamports: u64) {
        let mut state = self.state.lock().unwrap();
        state
            .accounts
            .entry(*pubkey)
            .or_insert_with(|| Account::new(0, 0, &system_program::id()))
            .lamports += lamports;
    }

    pub fn counter_of(&self, greeted: &Pubkey) -> Option<u32> {
        self.account_of(greeted)
            .map(|a| GreetingAccount::try_from_slice(&a.data).unwrap().counter)
    }

    pub fn submitted_transactions(&self) -> usize {
        self.state.lock().unwrap().submitted
    }

    pub fn airdrops(&self) -> usize {
        self.state.lock().unwrap().airdrops
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    fn enter(&self, call: &'static str) -> ClientResult<std::sync::MutexGuard<'_, LedgerState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if !self.reachable {
            return Err(rejected("error sending request: connection refused"));
        }
        Ok(state)
    }

    fn rent(data_len: usize) -> u64 {
        (ACCOUNT_STORAGE_OVERHEAD + data_len as u64) * LAMPORTS_PER_BYTE_YEAR * 2
    }
}

fn executable_account() -> Account {
    Account {
        lamports: 1_141_440,
        data: vec![],
        owner: solana_sdk::bpf_loader_upgradeable::id(),
        executable: true,
        rent_epoch: 0,
    }
}

fn debit(accounts: &mut HashMap<Pubkey, Account>, pubkey: &Pubkey, lamports: u64) -> ClientResult<()> {
    let account = accounts
        .get_mut(pubkey)
        .ok_or_else(|| rejected(format!("account {pubkey} not found")))?;
    account.lamports = account
        .lamports
        .checked_sub(lamports)
        .ok_or_else(|| rejected(format!("insufficient funds in {pubkey}")))?;
    Ok(())
}

fn create_account_with_seed(
    accounts: &mut HashMap<Pubkey, Account>,
    data: &[u8],
    keys: &[Pubkey],
) -> ClientResult<()> {
    let instruction: SystemInstruction =
        bincode::deserialize(data).map_err(|e| rejected(format!("invalid system instruction: {e}")))?;

    let SystemInstruction::CreateAccountWithSeed {
        base,
        seed,
        lamports,
        space,
        owner,
    } = instruction
    else {
        return Err(rejected("unsupported system instruction"));
    };

    let (from, to) = (keys[0], keys[1]);
    let expected = Pubkey::create_with_seed(&base, &seed, &owner)
        .map_err(|e| rejected(format!("invalid seed: {e}")))?;
    if expected != to {
        return Err(rejected("create account: address does not match seed"));
    }
    if accounts.contains_key(&to) {
        return Err(rejected(format!("create account: {to} already in use")));
    }

    debit(accounts, &from, lamports)?;
    accounts.insert(
        to,
        Account {
            lamports,
            data: vec![0; space as usize],
            owner,
            executable: false,
            rent_epoch: 0,
        },
    );
    Ok(())
}

fn process_hello(
    accounts: &mut HashMap<Pubkey, Account>,
    program_id: Pubkey,
    data: &[u8],
    keys: &[Pubkey],
) -> ClientResult<()> {
    if !accounts.get(&program_id).is_some_and(|a| a.executable) {
        return Err(rejected(format!("program {program_id} is not deployed")));
    }

    match data.first() {
        Some(0..=2) => {}
        Some(3) => {
            if keys.first() != Some(&MEMO_PROGRAM_ID) {
                return Err(rejected("memo program account missing"));
            }
        }
        _ => return Err(rejected("invalid instruction data")),
    }

    let greeted = keys
        .iter()
        .find(|k| accounts.get(*k).is_some_and(|a| a.owner == program_id))
        .copied()
        .ok_or_else(|| rejected("greeted account does not have the correct program id"))?;

    let account = accounts.get_mut(&greeted).expect("greeted account exists");
    let mut greeting = GreetingAccount::try_from_slice(&account.data)
        .map_err(|e| rejected(format!("invalid greeting data: {e}")))?;
    greeting.counter += 1;
    account.data = greeting.try_to_vec().unwrap();
    Ok(())
}

#[async_trait]
impl LedgerRpc for LocalLedger {
    fn url(&self) -> String {
        "http://local.ledger".to_string()
    }

    async fn version(&self) -> ClientResult<String> {
        let _state = self.enter("version")?;
        Ok("2.0.0".to_string())
    }

    async fn balance(&self, pubkey: &Pubkey) -> ClientResult<u64> {
        let state = self.enter("balance")?;
        Ok(state.accounts.get(pubkey).map_or(0, |a| a.lamports))
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> ClientResult<Signature> {
        let mut state = self.enter("request_airdrop")?;
        if !self.airdrops_enabled {
            return Err(rejected("airdrop request failed: rate limit reached"));
        }
        state
            .accounts
            .entry(*pubkey)
            .or_insert_with(|| Account::new(0, 0, &system_program::id()))
            .lamports += self.airdrop_credit.unwrap_or(lamports);
        state.airdrops += 1;

        let signature = Signature::new_unique();
        if self.airdrops_confirm {
            state.confirmed.insert(signature);
        }
        Ok(signature)
    }

    async fn confirm_signature(&self, signature: &Signature) -> ClientResult<()> {
        let state = self.enter("confirm_signature")?;
        if state.confirmed.contains(signature) {
            Ok(())
        } else {
            Err(rejected(format!("signature {signature} not found")))
        }
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        let _state = self.enter("minimum_balance_for_rent_exemption")?;
        Ok(Self::rent(data_len))
    }

    async fn fee_for_message(&self, message: &Message) -> ClientResult<u64> {
        let _state = self.enter("fee_for_message")?;
        Ok(LAMPORTS_PER_SIGNATURE * u64::from(message.header.num_required_signatures))
    }

    async fn account(&self, pubkey: &Pubkey) -> ClientResult<Option<Account>> {
        let state = self.enter("account")?;
        Ok(state.accounts.get(pubkey).cloned())
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        let mut state = self.enter("latest_blockhash")?;
        state.slot += 1;
        Ok(solana_sdk::hash::hash(&state.slot.to_le_bytes()))
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        let mut state = self.enter("send_and_confirm_transaction")?;
        transaction
            .verify()
            .map_err(|e| rejected(format!("signature verification failed: {e}")))?;

        let keys = &transaction.message.account_keys;
        let mut accounts = state.accounts.clone();
        debit(
            &mut accounts,
            &keys[0],
            LAMPORTS_PER_SIGNATURE * transaction.signatures.len() as u64,
        )?;

        for ix in &transaction.message.instructions {
            let program_id = keys[ix.program_id_index as usize];
            let ix_keys: Vec<Pubkey> = ix.accounts.iter().map(|i| keys[*i as usize]).collect();

            if program_id == system_program::id() {
                create_account_with_seed(&mut accounts, &ix.data, &ix_keys)?;
            } else {
                process_hello(&mut accounts, program_id, &ix.data, &ix_keys)?;
            }
        }

        state.accounts = accounts;
        state.submitted += 1;
        Ok(transaction.signatures[0])
    }
}

/// A payer holding `lamports`.
pub fn funded_payer(ledger: &LocalLedger, lamports: u64) -> Keypair {
    let payer = Keypair::new();
    ledger.fund(&payer.pubkey(), lamports);
    payer
}
