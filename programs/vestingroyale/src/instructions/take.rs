use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::VESTING_ROYALE_SEED;
use crate::error::VestingRoyaleError;
use crate::state::{Claim, VestingRoyale};

#[derive(Accounts)]
pub struct Take<'info> {
    /// This is the config for this vesting royale
    #[account(
        mut,
        seeds = [
            VESTING_ROYALE_SEED,
            vesting_royale.initializer.as_ref(),
            &vesting_royale.nonce.to_le_bytes()
        ],
        bump = vesting_royale.bump,
        has_one = vesting_pool @ VestingRoyaleError::InvalidTokenAccount,
        has_one = mint @ VestingRoyaleError::InvalidTokenMint,
    )]
    pub vesting_royale: Account<'info, VestingRoyale>,

    /// A recipient still in the queue, or the initializer once it is empty.
    pub taker: Signer<'info>,

    /// Token account to extract to
    #[account(
        mut,
        constraint = taker_token_account.owner == taker.key() @ VestingRoyaleError::InvalidTokenAccount,
        constraint = taker_token_account.mint == mint.key() @ VestingRoyaleError::InvalidTokenMint,
    )]
    pub taker_token_account: Account<'info, TokenAccount>,

    /// Pool that holds the tokens being vested
    #[account(mut, token::mint = mint)]
    pub vesting_pool: Account<'info, TokenAccount>,

    /// Mint of the vested token
    pub mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
}

impl Take<'_> {
    /// Pays the signer its vested share, or sweeps the remainder to the initializer.
    pub fn handle(ctx: Context<Self>) -> Result<()> {
        let now = Clock::get()?.epoch;
        let taker = ctx.accounts.taker.key();
        let pool_balance = ctx.accounts.vesting_pool.amount;

        // Capture AccountInfo and seeds before the mutable borrow.
        let vesting_royale_ai = ctx.accounts.vesting_royale.to_account_info();
        let vesting_royale_key = ctx.accounts.vesting_royale.key();

        let vr = &mut ctx.accounts.vesting_royale;
        let claim = vr.resolve_take(&taker, pool_balance, now)?;
        let pool_after = vr.commit_take(&claim, pool_balance)?;

        msg!(
            "take at epoch {}: {} of pool {}, {} recipients left",
            now,
            claim.amount(),
            pool_balance,
            vr.recipients.len()
        );

        let initializer = vr.initializer;
        let nonce = vr.nonce.to_le_bytes();
        let bump = vr.bump;
        let remaining = vr.recipients.len() as u32;
        let withdrawn = vr.withdrawn;

        let signer_seeds: &[&[&[u8]]] = &[&[VESTING_ROYALE_SEED, initializer.as_ref(), &nonce, &[bump]]];
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vesting_pool.to_account_info(),
                    to: ctx.accounts.taker_token_account.to_account_info(),
                    authority: vesting_royale_ai,
                },
                signer_seeds,
            ),
            claim.amount(),
        )?;

        ctx.accounts.vesting_pool.reload()?;
        require_eq!(
            ctx.accounts.vesting_pool.amount,
            pool_after,
            VestingRoyaleError::PoolUnderflow
        );

        match claim {
            Claim::Recipient {
                survivors,
                vested_bps,
                amount,
                ..
            } => emit!(Taken {
                vesting_royale: vesting_royale_key,
                taker,
                epoch: now,
                survivors,
                vested_bps,
                amount,
                pool_balance: pool_after,
                remaining_recipients: remaining,
            }),
            Claim::Sweep { amount } => emit!(Swept {
                vesting_royale: vesting_royale_key,
                initializer,
                epoch: now,
                amount,
                total_withdrawn: withdrawn,
            }),
        }

        Ok(())
    }
}

#[event]
pub struct Taken {
    pub vesting_royale: Pubkey,
    pub taker: Pubkey,
    pub epoch: u64,
    pub survivors: u64,
    pub vested_bps: u64,
    pub amount: u64,
    pub pool_balance: u64,
    pub remaining_recipients: u32,
}

#[event]
pub struct Swept {
    pub vesting_royale: Pubkey,
    pub initializer: Pubkey,
    pub epoch: u64,
    pub amount: u64,
    pub total_withdrawn: u64,
}
