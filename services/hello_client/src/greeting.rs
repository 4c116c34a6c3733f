//! Greeting account layout, address derivation and hello program instructions

use crate::{HelloError, Result};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// SPL memo program invoked by the memo instruction
pub const MEMO_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

/// Serialized size of [`GreetingAccount`]
pub const GREETING_SIZE: usize = std::mem::size_of::<u32>();

/// State stored in the greeting account
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GreetingAccount {
    /// number of greetings
    pub counter: u32,
}

impl GreetingAccount {
    pub fn decode(account: &Pubkey, data: &[u8]) -> Result<Self> {
        Self::try_from_slice(data).map_err(|e| HelloError::MalformedGreeting {
            account: *account,
            reason: e.to_string(),
        })
    }
}

/// Address of the greeting account owned by `program_id` and based on `payer`.
pub fn greeting_address(payer: &Pubkey, seed: &str, program_id: &Pubkey) -> Result<Pubkey> {
    Pubkey::create_with_seed(payer, seed, program_id)
        .map_err(|e| HelloError::Config(format!("cannot derive greeting account from seed {seed:?}: {e}")))
}

/// Instructions understood by the hello program. The first byte selects the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelloInstruction {
    Nop,
    Incr,
    Message(Vec<u8>),
    Memo(Vec<u8>),
}

impl HelloInstruction {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Nop => 0,
            Self::Incr => 1,
            Self::Message(_) => 2,
            Self::Memo(_) => 3,
        }
    }

    /// Tag byte followed by the raw payload, no length prefix.
    pub fn pack(&self) -> Vec<u8> {
        let mut data = vec![self.tag()];
        match self {
            Self::Nop | Self::Incr => {}
            Self::Message(payload) | Self::Memo(payload) => data.extend_from_slice(payload),
        }
        data
    }

    /// Build the instruction against `greeted`. The memo program comes first for memo instructions.
    pub fn into_instruction(self, program_id: Pubkey, greeted: Pubkey) -> Instruction {
        let mut accounts = Vec::with_capacity(2);
        if matches!(self, Self::Memo(_)) {
            accounts.push(AccountMeta::new_readonly(MEMO_PROGRAM_ID, false));
        }
        accounts.push(AccountMeta::new(greeted, false));

        Instruction {
            program_id,
            accounts,
            data: self.pack(),
        }
    }
}
