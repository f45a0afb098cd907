use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::VESTING_ROYALE_SEED;
use crate::error::VestingRoyaleError;
use crate::state::{Claim, Phase, VestingRoyale};

#[derive(Accounts)]
pub struct EmitTakeQuote<'info> {
    #[account(
        seeds = [
            VESTING_ROYALE_SEED,
            vesting_royale.initializer.as_ref(),
            &vesting_royale.nonce.to_le_bytes()
        ],
        bump = vesting_royale.bump,
        has_one = vesting_pool @ VestingRoyaleError::InvalidTokenAccount,
    )]
    pub vesting_royale: Account<'info, VestingRoyale>,

    pub vesting_pool: Account<'info, TokenAccount>,
}

impl EmitTakeQuote<'_> {
    /// Emits what `take` would pay `taker` at the current epoch. Read-only.
    pub fn handle(ctx: Context<Self>, taker: Pubkey) -> Result<()> {
        let vr = &ctx.accounts.vesting_royale;
        let now = Clock::get()?.epoch;
        let pool_balance = ctx.accounts.vesting_pool.amount;

        let claim = vr.resolve_take(&taker, pool_balance, now)?;
        let (survivors, vested_bps) = match claim {
            Claim::Recipient {
                survivors,
                vested_bps,
                ..
            } => (survivors, vested_bps),
            Claim::Sweep { .. } => (0, 0),
        };

        emit!(TakeQuote {
            vesting_royale: vr.key(),
            taker,
            epoch: now,
            phase: vr.phase(pool_balance),
            survivors,
            vested_bps,
            amount: claim.amount(),
            sweep: claim.is_sweep(),
        });

        Ok(())
    }
}

#[event]
pub struct TakeQuote {
    pub vesting_royale: Pubkey,
    pub taker: Pubkey,
    pub epoch: u64,
    pub phase: Phase,
    pub survivors: u64,
    pub vested_bps: u64,
    pub amount: u64,
    pub sweep: bool,
}
