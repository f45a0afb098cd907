use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount};
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::VESTING_ROYALE_SEED;
use crate::error::VestingRoyaleError;
use crate::state::{RecipientQueue, VestingRoyale};
use crate::utils::vesting::VestingSchedule;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreateVestingArgs {
    /// Distinguishes vestings by the same initializer. Part of the PDA seeds.
    pub nonce: u64,
    /// The epoch that the vesting should start with. If None -> Start immediately
    pub start_epoch: Option<u64>,
    /// Number of Epochs to vest for End = start + delta
    pub end_epoch_delta: u64,
    /// How much of the vest is unlocked immediately in BPS (1% = 100)
    pub initial_vest: u16,
    /// Amount of tokens to vest
    pub amount: u64,
    /// Number of recipient accounts passed as remaining accounts
    pub recipient_count: u64,
}

impl CreateVestingArgs {
    /// Checks the arguments against the supplied recipients and the creator's
    /// token balance before anything is written.
    pub fn validate(
        &self,
        recipients: Vec<Pubkey>,
        creator_balance: u64,
        current_epoch: u64,
    ) -> core::result::Result<(VestingSchedule, RecipientQueue), VestingRoyaleError> {
        let schedule = VestingSchedule::resolve(
            self.start_epoch,
            self.end_epoch_delta,
            self.initial_vest,
            current_epoch,
        )?;
        if self.amount == 0 {
            return Err(VestingRoyaleError::InvalidAmount);
        }
        if creator_balance < self.amount {
            return Err(VestingRoyaleError::InsufficientFunds);
        }
        let queue = RecipientQueue::new(recipients, self.recipient_count)?;
        Ok((schedule, queue))
    }
}

#[derive(Accounts)]
#[instruction(args: CreateVestingArgs)]
pub struct CreateVesting<'info> {
    /// CHECK: allocated by the handler after `VestingRoyale::ensure_vacant`, so a
    /// reused (initializer, nonce) fails with `DuplicateRecord`.
    #[account(
        mut,
        seeds = [VESTING_ROYALE_SEED, initializer.key().as_ref(), &args.nonce.to_le_bytes()],
        bump
    )]
    pub vesting_royale: UncheckedAccount<'info>,

    /// Fee payer, funder and PDA seed.
    #[account(mut)]
    pub initializer: Signer<'info>,

    /// Tokens that will be vested
    #[account(
        mut,
        token::mint = mint,
        token::authority = initializer
    )]
    pub initializer_token_account: Account<'info, TokenAccount>,

    /// Pool that will hold the tokens to be vested
    #[account(
        init_if_needed,
        payer = initializer,
        associated_token::mint = mint,
        associated_token::authority = vesting_royale,
    )]
    pub vesting_pool: Account<'info, TokenAccount>,

    /// Mint of the vested token
    pub mint: Account<'info, Mint>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}

impl CreateVesting<'_> {
    pub fn handle(ctx: Context<Self>, args: CreateVestingArgs) -> Result<()> {
        let record_ai = ctx.accounts.vesting_royale.to_account_info();
        VestingRoyale::ensure_vacant(record_ai.owner, record_ai.data_len())?;

        let now = Clock::get()?.epoch;

        // Recipients arrive as remaining accounts; large sets come through lookup tables.
        let wallets: Vec<Pubkey> = ctx.remaining_accounts.iter().map(|a| a.key()).collect();
        let (schedule, recipients) = args.validate(
            wallets,
            ctx.accounts.initializer_token_account.amount,
            now,
        )?;

        let initializer = ctx.accounts.initializer.key();
        let nonce = args.nonce.to_le_bytes();
        let bump = ctx.bumps.vesting_royale;
        let signer_seeds: &[&[&[u8]]] = &[&[VESTING_ROYALE_SEED, initializer.as_ref(), &nonce, &[bump]]];

        allocate_record(
            &ctx.accounts.initializer.to_account_info(),
            &record_ai,
            &ctx.accounts.system_program.to_account_info(),
            VestingRoyale::space(recipients.capacity as usize),
            signer_seeds,
        )?;

        let vr = VestingRoyale {
            initializer,
            nonce: args.nonce,
            bump,
            start_epoch: schedule.start_epoch,
            end_epoch: schedule.end_epoch,
            initial_vest: schedule.initial_vest,
            vesting_pool: ctx.accounts.vesting_pool.key(),
            mint: ctx.accounts.mint.key(),
            deposited: args.amount,
            withdrawn: 0,
            recipients,
        };
        {
            let mut data = record_ai.try_borrow_mut_data()?;
            vr.try_serialize(&mut &mut data[..])?;
        }

        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.initializer_token_account.to_account_info(),
                    to: ctx.accounts.vesting_pool.to_account_info(),
                    authority: ctx.accounts.initializer.to_account_info(),
                },
            ),
            args.amount,
        )?;

        msg!(
            "vesting created: {} recipients, epochs {}..{}, initial vest {} bps, amount {}",
            vr.recipients.len(),
            vr.start_epoch,
            vr.end_epoch,
            vr.initial_vest,
            args.amount
        );

        emit!(VestingCreated {
            vesting_royale: record_ai.key(),
            initializer,
            nonce: vr.nonce,
            mint: vr.mint,
            vesting_pool: vr.vesting_pool,
            start_epoch: vr.start_epoch,
            end_epoch: vr.end_epoch,
            initial_vest: vr.initial_vest,
            amount: args.amount,
            recipient_count: vr.recipients.capacity,
        });

        Ok(())
    }
}

/// Creates the record PDA owned by this program. An address that was merely
/// pre-funded with lamports is topped up to rent exemption, then allocated and
/// assigned, since `create_account` refuses accounts that hold lamports.
fn allocate_record<'info>(
    payer: &AccountInfo<'info>,
    record: &AccountInfo<'info>,
    system: &AccountInfo<'info>,
    space: usize,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let required = Rent::get()?.minimum_balance(space);
    let current = record.lamports();

    if current == 0 {
        return system_program::create_account(
            CpiContext::new_with_signer(
                system.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: record.clone(),
                },
                signer_seeds,
            ),
            required,
            space as u64,
            &crate::ID,
        );
    }

    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: record.clone(),
                },
            ),
            top_up,
        )?;
    }
    system_program::allocate(
        CpiContext::new_with_signer(
            system.clone(),
            Allocate {
                account_to_allocate: record.clone(),
            },
            signer_seeds,
        ),
        space as u64,
    )?;
    system_program::assign(
        CpiContext::new_with_signer(
            system.clone(),
            Assign {
                account_to_assign: record.clone(),
            },
            signer_seeds,
        ),
        &crate::ID,
    )
}

#[event]
pub struct VestingCreated {
    pub vesting_royale: Pubkey,
    pub initializer: Pubkey,
    pub nonce: u64,
    pub mint: Pubkey,
    pub vesting_pool: Pubkey,
    pub start_epoch: u64,
    pub end_epoch: u64,
    pub initial_vest: u16,
    pub amount: u64,
    pub recipient_count: u32,
}
