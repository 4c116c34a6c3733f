//! The hello flow: connect, fund the payer, check the program, greet, report

use crate::{
    greeting::{greeting_address, GreetingAccount, HelloInstruction, GREETING_SIZE},
    rpc::LedgerRpc,
    HelloError, Result,
};
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    native_token::lamports_to_sol,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_instruction,
    transaction::Transaction,
};
use tracing::{debug, info};

/// The payer must be able to cover this many transaction fees on top of the greeting account rent.
pub const FEE_HEADROOM_MESSAGES: u64 = 100;

/// Confirm the endpoint answers; returns the node version.
pub async fn establish_connection<R: LedgerRpc + ?Sized>(rpc: &R) -> Result<String> {
    let version = rpc.version().await.map_err(|e| HelloError::Connection {
        url: rpc.url(),
        source: Box::new(e),
    })?;
    info!("Connection to cluster established: {} {}", rpc.url(), version);
    Ok(version)
}

/// Lamports the payer needs before the flow can run.
pub async fn required_balance<R: LedgerRpc + ?Sized>(rpc: &R, payer: &Pubkey) -> Result<u64> {
    let rent = rpc.minimum_balance_for_rent_exemption(GREETING_SIZE).await?;
    let blockhash = rpc.latest_blockhash().await?;
    let message = Message::new_with_blockhash(&[], Some(payer), &blockhash);
    let fee = rpc.fee_for_message(&message).await?;

    Ok(rent + fee * FEE_HEADROOM_MESSAGES)
}

/// Airdrop whatever the payer is missing; returns the resulting balance.
pub async fn establish_payer<R: LedgerRpc + ?Sized>(rpc: &R, payer: &Keypair) -> Result<u64> {
    let pubkey = payer.pubkey();
    let required = required_balance(rpc, &pubkey).await?;
    let mut balance = rpc.balance(&pubkey).await?;

    if balance < required {
        let shortfall = required - balance;
        debug!("Requesting airdrop of {} lamports to {}", shortfall, pubkey);

        let signature = rpc
            .request_airdrop(&pubkey, shortfall)
            .await
            .map_err(|e| HelloError::Funding(format!("airdrop of {shortfall} lamports to {pubkey} rejected: {e}")))?;
        rpc.confirm_signature(&signature)
            .await
            .map_err(|e| HelloError::Funding(format!("airdrop {signature} not confirmed: {e}")))?;

        balance = rpc.balance(&pubkey).await?;
        if balance < required {
            return Err(HelloError::Funding(format!(
                "{pubkey} holds {balance} lamports after airdrop, {required} required"
            )));
        }
    }

    info!(
        "Using account {} containing {} SOL to pay for fees",
        pubkey,
        lamports_to_sol(balance)
    );
    Ok(balance)
}

/// Make sure the program is deployed and the greeting account exists; returns the greeting address.
pub async fn check_program<R: LedgerRpc + ?Sized>(
    rpc: &R,
    payer: &Keypair,
    program_id: &Pubkey,
    seed: &str,
) -> Result<Pubkey> {
    let program = rpc
        .account(program_id)
        .await?
        .ok_or(HelloError::ProgramNotDeployed(*program_id))?;
    if !program.executable {
        return Err(HelloError::ProgramNotExecutable(*program_id));
    }
    info!("Using program {}", program_id);

    let greeted = greeting_address(&payer.pubkey(), seed, program_id)?;

    match rpc.account(&greeted).await? {
        Some(account) if account.owner != *program_id => Err(HelloError::GreetingOwnerMismatch {
            account: greeted,
            owner: account.owner,
            program_id: *program_id,
        }),
        Some(_) => {
            debug!("Greeting account {} already exists", greeted);
            Ok(greeted)
        }
        None => {
            info!("Creating account {} to say hello to", greeted);
            let lamports = rpc.minimum_balance_for_rent_exemption(GREETING_SIZE).await?;
            let create = system_instruction::create_account_with_seed(
                &payer.pubkey(),
                &greeted,
                &payer.pubkey(),
                seed,
                lamports,
                GREETING_SIZE as u64,
                program_id,
            );
            submit(rpc, payer, &[create], "create greeting account").await?;
            Ok(greeted)
        }
    }
}

async fn submit<R: LedgerRpc + ?Sized>(
    rpc: &R,
    payer: &Keypair,
    instructions: &[Instruction],
    context: &'static str,
) -> Result<Signature> {
    let blockhash = rpc
        .latest_blockhash()
        .await
        .map_err(HelloError::transaction(context))?;
    let transaction = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &[payer],
        blockhash,
    );

    let signature = rpc
        .send_and_confirm_transaction(&transaction)
        .await
        .map_err(HelloError::transaction(context))?;
    debug!("{} confirmed: {}", context, signature);
    Ok(signature)
}

/// Sends hello program instructions against one greeting account
pub struct Greeter<'a, R: ?Sized> {
    rpc: &'a R,
    payer: &'a Keypair,
    program_id: Pubkey,
    greeted: Pubkey,
}

impl<'a, R: LedgerRpc + ?Sized> Greeter<'a, R> {
    pub fn new(rpc: &'a R, payer: &'a Keypair, program_id: Pubkey, greeted: Pubkey) -> Self {
        Self {
            rpc,
            payer,
            program_id,
            greeted,
        }
    }

    pub fn greeted(&self) -> Pubkey {
        self.greeted
    }

    pub async fn say_hello(&self) -> Result<Signature> {
        info!("Saying hello to {}", self.greeted);
        self.invoke(HelloInstruction::Incr, "say hello").await
    }

    pub async fn do_nothing(&self) -> Result<Signature> {
        info!("Doing nothing with {}", self.greeted);
        self.invoke(HelloInstruction::Nop, "do nothing").await
    }

    pub async fn log_message(&self, message: &str) -> Result<Signature> {
        info!("Logging message {:?}", message);
        self.invoke(HelloInstruction::Message(message.as_bytes().to_vec()), "log message")
            .await
    }

    pub async fn log_memo(&self, memo: &str) -> Result<Signature> {
        info!("Logging memo {:?}", memo);
        self.invoke(HelloInstruction::Memo(memo.as_bytes().to_vec()), "log memo")
            .await
    }

    /// Read back the greeting counter.
    pub async fn report_greetings(&self) -> Result<u32> {
        let account = self
            .rpc
            .account(&self.greeted)
            .await?
            .ok_or(HelloError::GreetingAccountMissing(self.greeted))?;
        let greeting = GreetingAccount::decode(&self.greeted, &account.data)?;

        info!("{} has been greeted {} time(s)", self.greeted, greeting.counter);
        Ok(greeting.counter)
    }

    async fn invoke(&self, instruction: HelloInstruction, context: &'static str) -> Result<Signature> {
        let instruction = instruction.into_instruction(self.program_id, self.greeted);
        submit(self.rpc, self.payer, &[instruction], context).await
    }
}
