#![allow(unexpected_cfgs)]

//! # Vesting Royale
//!
//! Token escrow that pays a fixed set of recipients out of one shared pool:
//!  - cliff (`initial_vest` bps) then linear unlock over epochs
//!  - each take splits the *current* pool evenly across recipients still waiting
//!  - the initializer sweeps whatever is left once everyone has taken

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

pub use instructions::*;
pub use state::*;

declare_id!("2FG7tvMgxAYX3ZF1Zg1Cz36TSwyFrNvN5ipXJd9Yb8Ji");

#[program]
pub mod vestingroyale {
    use super::*;

    /// Fund a new pool and register the recipients passed as remaining accounts.
    pub fn create_vesting(ctx: Context<CreateVesting>, args: CreateVestingArgs) -> Result<()> {
        CreateVesting::handle(ctx, args)
    }

    /// Withdraw the signer's vested share, or the remainder for the initializer.
    pub fn take(ctx: Context<Take>) -> Result<()> {
        Take::handle(ctx)
    }

    /// Emit what `take` would pay `taker` right now.
    pub fn emit_take_quote(ctx: Context<EmitTakeQuote>, taker: Pubkey) -> Result<()> {
        EmitTakeQuote::handle(ctx, taker)
    }

    /// Close the drained pool token account. The record itself is kept.
    pub fn close_pool(ctx: Context<ClosePool>) -> Result<()> {
        ClosePool::handle(ctx)
    }
}
