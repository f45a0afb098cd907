use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Token, TokenAccount};

use crate::constants::VESTING_ROYALE_SEED;
use crate::error::VestingRoyaleError;
use crate::state::{Phase, VestingRoyale};

#[derive(Accounts)]
pub struct ClosePool<'info> {
    /// Stays allocated so the (initializer, nonce) address can never be reused.
    #[account(
        seeds = [
            VESTING_ROYALE_SEED,
            vesting_royale.initializer.as_ref(),
            &vesting_royale.nonce.to_le_bytes()
        ],
        bump = vesting_royale.bump,
        has_one = initializer @ VestingRoyaleError::NotEligible,
        has_one = vesting_pool @ VestingRoyaleError::InvalidTokenAccount,
        constraint = vesting_royale.recipients.is_empty() @ VestingRoyaleError::RecipientsRemaining,
    )]
    pub vesting_royale: Account<'info, VestingRoyale>,

    #[account(mut)]
    pub initializer: Signer<'info>,

    #[account(mut)]
    pub vesting_pool: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl ClosePool<'_> {
    /// Closes the drained pool token account, returning its rent to the initializer.
    pub fn handle(ctx: Context<Self>) -> Result<()> {
        let vr = &ctx.accounts.vesting_royale;
        require!(
            vr.phase(ctx.accounts.vesting_pool.amount) == Phase::Drained,
            VestingRoyaleError::PoolNotEmpty
        );

        let initializer = vr.initializer;
        let nonce = vr.nonce.to_le_bytes();
        let bump = vr.bump;
        let withdrawn = vr.withdrawn;

        let signer_seeds: &[&[&[u8]]] = &[&[VESTING_ROYALE_SEED, initializer.as_ref(), &nonce, &[bump]]];
        token::close_account(CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            CloseAccount {
                account: ctx.accounts.vesting_pool.to_account_info(),
                destination: ctx.accounts.initializer.to_account_info(),
                authority: ctx.accounts.vesting_royale.to_account_info(),
            },
            signer_seeds,
        ))?;

        emit!(PoolClosed {
            vesting_royale: ctx.accounts.vesting_royale.key(),
            vesting_pool: ctx.accounts.vesting_pool.key(),
            initializer,
            total_withdrawn: withdrawn,
        });

        msg!("vesting pool closed, {} withdrawn over its life", withdrawn);
        Ok(())
    }
}

#[event]
pub struct PoolClosed {
    pub vesting_royale: Pubkey,
    pub vesting_pool: Pubkey,
    pub initializer: Pubkey,
    pub total_withdrawn: u64,
}
