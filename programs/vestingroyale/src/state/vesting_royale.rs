use anchor_lang::prelude::*;

use crate::error::VestingRoyaleError;
use crate::state::RecipientQueue;
use crate::utils::vesting::{vested_bps, withdrawable_amount, VestingSchedule};

/// Escrow record (PDA, seeds = [b"vestingroyale", initializer, nonce_le]).
#[account]
#[derive(Debug)]
pub struct VestingRoyale {
    /// Creator. Funded the pool and sweeps what is left once the queue is empty.
    pub initializer: Pubkey,

    /// Creator-chosen discriminator, part of the PDA seeds.
    pub nonce: u64,

    /// Bump
    pub bump: u8,

    /// Epoch at which vesting starts
    pub start_epoch: u64,

    /// Epoch at which vesting ends
    pub end_epoch: u64,

    /// How much BPS unlocks instantly with start of vesting
    pub initial_vest: u16,

    /// The vesting pool ATA.
    pub vesting_pool: Pubkey,

    /// The mint for the tokens in the vesting pool
    pub mint: Pubkey,

    /// Amount moved into the pool at creation.
    pub deposited: u64,

    /// Sum of every successful take, sweeps included.
    pub withdrawn: u64,

    /// Recipients that have not taken yet.
    pub recipients: RecipientQueue,
}

/// Where a record is in its life, derived from the queue and pool balance.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    Exhausted,
    Drained,
}

/// A resolved, not yet applied, withdrawal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Claim {
    Recipient {
        wallet: Pubkey,
        survivors: u64,
        vested_bps: u64,
        amount: u64,
    },
    Sweep {
        amount: u64,
    },
}

impl Claim {
    pub fn amount(&self) -> u64 {
        match *self {
            Claim::Recipient { amount, .. } | Claim::Sweep { amount } => amount,
        }
    }

    pub fn is_sweep(&self) -> bool {
        matches!(self, Claim::Sweep { .. })
    }
}

impl VestingRoyale {
    pub fn space(recipient_count: usize) -> usize {
        8  + // anchor account discriminator
            32 + // initializer
            8  + // nonce
            1  + // bump
            8  + // start_epoch
            8  + // end_epoch
            2  + // initial_vest
            32 + // vesting_pool
            32 + // mint
            8  + // deposited
            8  + // withdrawn
            RecipientQueue::space(recipient_count)
    }

    pub fn schedule(&self) -> VestingSchedule {
        VestingSchedule {
            start_epoch: self.start_epoch,
            end_epoch: self.end_epoch,
            initial_vest: self.initial_vest,
        }
    }

    pub fn phase(&self, pool_balance: u64) -> Phase {
        if !self.recipients.is_empty() {
            Phase::Active
        } else if pool_balance > 0 {
            Phase::Exhausted
        } else {
            Phase::Drained
        }
    }

    /// A record address may be allocated only once. Drained records are never
    /// deallocated, so an (initializer, nonce) pair that was ever used keeps
    /// failing here.
    pub fn ensure_vacant(
        owner: &Pubkey,
        data_len: usize,
    ) -> core::result::Result<(), VestingRoyaleError> {
        if *owner == crate::ID || data_len > 0 {
            return Err(VestingRoyaleError::DuplicateRecord);
        }
        Ok(())
    }

    /// Works out what `taker` may withdraw right now. Does not mutate.
    pub fn resolve_take(
        &self,
        taker: &Pubkey,
        pool_balance: u64,
        current_epoch: u64,
    ) -> core::result::Result<Claim, VestingRoyaleError> {
        if self.recipients.contains(taker) {
            let survivors = self.recipients.len() as u64;
            let schedule = self.schedule();
            let bps = vested_bps(current_epoch, &schedule)?;
            let amount = withdrawable_amount(pool_balance, survivors, current_epoch, &schedule)?;
            if amount == 0 {
                return Err(VestingRoyaleError::NothingVested);
            }
            if amount > pool_balance {
                return Err(VestingRoyaleError::PoolUnderflow);
            }
            return Ok(Claim::Recipient {
                wallet: *taker,
                survivors,
                vested_bps: bps,
                amount,
            });
        }

        if self.recipients.is_empty() && *taker == self.initializer {
            // Everyone has taken; whatever truncation and early takers left behind
            // goes back to the creator.
            if pool_balance == 0 {
                return Err(VestingRoyaleError::NothingVested);
            }
            return Ok(Claim::Sweep {
                amount: pool_balance,
            });
        }

        Err(VestingRoyaleError::NotEligible)
    }

    /// Applies a claim from [`Self::resolve_take`] and returns the pool balance
    /// left behind. Every check runs before the first write.
    pub fn commit_take(
        &mut self,
        claim: &Claim,
        pool_balance: u64,
    ) -> core::result::Result<u64, VestingRoyaleError> {
        let amount = claim.amount();
        let pool_after = pool_balance
            .checked_sub(amount)
            .ok_or(VestingRoyaleError::PoolUnderflow)?;
        let withdrawn = self
            .withdrawn
            .checked_add(amount)
            .ok_or(VestingRoyaleError::ArithmeticOverflow)?;

        // Tokens sent straight to the pool can only raise the left side.
        let accounted = u128::from(pool_after) + u128::from(withdrawn);
        if accounted < u128::from(self.deposited) {
            return Err(VestingRoyaleError::ConservationViolated);
        }

        if let Claim::Recipient { wallet, .. } = claim {
            self.recipients.remove_by_swap(wallet)?;
        }
        self.withdrawn = withdrawn;

        Ok(pool_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(initializer: Pubkey, recipients: Vec<Pubkey>, deposited: u64) -> VestingRoyale {
        let count = recipients.len() as u64;
        VestingRoyale {
            initializer,
            nonce: 0,
            bump: 255,
            start_epoch: 1,
            end_epoch: 11,
            initial_vest: 5_000,
            vesting_pool: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            deposited,
            withdrawn: 0,
            recipients: RecipientQueue::new(recipients, count).unwrap(),
        }
    }

    fn take(vr: &mut VestingRoyale, taker: &Pubkey, pool: u64, epoch: u64) -> (Claim, u64) {
        let claim = vr.resolve_take(taker, pool, epoch).unwrap();
        let pool_after = vr.commit_take(&claim, pool).unwrap();
        assert_eq!(vr.deposited, pool_after + vr.withdrawn);
        (claim, pool_after)
    }

    #[test]
    fn three_recipients_then_creator_sweep() {
        let creator = Pubkey::new_unique();
        let (a, b, c) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let mut vr = record(creator, vec![a, b, c], 600_000_000);
        assert_eq!(vr.phase(600_000_000), Phase::Active);

        let (claim, pool) = take(&mut vr, &a, 600_000_000, 2);
        assert_eq!(
            claim,
            Claim::Recipient {
                wallet: a,
                survivors: 3,
                vested_bps: 5_500,
                amount: 110_000_000,
            }
        );
        assert_eq!(pool, 490_000_000);
        assert_eq!(vr.recipients.as_slice(), &[c, b]);

        let (claim, pool) = take(&mut vr, &b, pool, 6);
        assert_eq!(claim.amount(), 183_750_000);
        assert_eq!(pool, 306_250_000);
        assert_eq!(vr.recipients.as_slice(), &[c]);

        let (claim, pool) = take(&mut vr, &c, pool, 10);
        assert_eq!(claim.amount(), 290_937_500);
        assert_eq!(pool, 15_312_500);
        assert!(vr.recipients.is_empty());
        assert_eq!(vr.phase(pool), Phase::Exhausted);

        let (claim, pool) = take(&mut vr, &creator, pool, 14);
        assert_eq!(claim, Claim::Sweep { amount: 15_312_500 });
        assert!(claim.is_sweep());
        assert_eq!(pool, 0);
        assert_eq!(vr.withdrawn, 600_000_000);
        assert_eq!(vr.phase(pool), Phase::Drained);
    }

    #[test]
    fn second_take_by_same_recipient_is_not_eligible() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut vr = record(Pubkey::new_unique(), vec![a, b], 1_000);
        let (_, pool) = take(&mut vr, &a, 1_000, 3);
        assert!(matches!(
            vr.resolve_take(&a, pool, 20),
            Err(VestingRoyaleError::NotEligible)
        ));
    }

    #[test]
    fn creator_cannot_sweep_while_recipients_remain() {
        let creator = Pubkey::new_unique();
        let vr = record(creator, vec![Pubkey::new_unique()], 1_000);
        assert!(matches!(
            vr.resolve_take(&creator, 1_000, 50),
            Err(VestingRoyaleError::NotEligible)
        ));
    }

    #[test]
    fn creator_listed_as_recipient_claims_a_share_first() {
        let creator = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let mut vr = record(creator, vec![creator, other], 1_000);
        let (claim, pool) = take(&mut vr, &creator, 1_000, 11);
        assert_eq!(claim.amount(), 500);
        assert!(!claim.is_sweep());
        assert!(matches!(
            vr.resolve_take(&creator, pool, 11),
            Err(VestingRoyaleError::NotEligible)
        ));
    }

    #[test]
    fn stranger_is_not_eligible() {
        let vr = record(Pubkey::new_unique(), vec![Pubkey::new_unique()], 1_000);
        assert!(matches!(
            vr.resolve_take(&Pubkey::new_unique(), 1_000, 5),
            Err(VestingRoyaleError::NotEligible)
        ));
    }

    #[test]
    fn nothing_vested_leaves_record_untouched() {
        let a = Pubkey::new_unique();
        let mut vr = record(Pubkey::new_unique(), vec![a, Pubkey::new_unique()], 1_000);
        vr.initial_vest = 0;
        vr.start_epoch = 10;
        vr.end_epoch = 20;
        let before = vr.recipients.clone();
        assert!(matches!(
            vr.resolve_take(&a, 1_000, 10),
            Err(VestingRoyaleError::NothingVested)
        ));
        assert_eq!(vr.recipients, before);
        assert_eq!(vr.withdrawn, 0);
    }

    #[test]
    fn dust_share_truncates_to_nothing() {
        let a = Pubkey::new_unique();
        let vr = record(Pubkey::new_unique(), vec![a, Pubkey::new_unique(), Pubkey::new_unique()], 2);
        // 2 / 3 = 0 per head.
        assert!(matches!(
            vr.resolve_take(&a, 2, 20),
            Err(VestingRoyaleError::NothingVested)
        ));
    }

    #[test]
    fn sweep_of_empty_pool_is_nothing_vested() {
        let creator = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let mut vr = record(creator, vec![a], 100);
        let (_, pool) = take(&mut vr, &a, 100, 11);
        assert_eq!(pool, 0);
        assert!(matches!(
            vr.resolve_take(&creator, pool, 12),
            Err(VestingRoyaleError::NothingVested)
        ));
    }

    #[test]
    fn commit_rejects_claim_larger_than_pool() {
        let a = Pubkey::new_unique();
        let mut vr = record(Pubkey::new_unique(), vec![a], 100);
        let claim = Claim::Recipient {
            wallet: a,
            survivors: 1,
            vested_bps: 10_000,
            amount: 101,
        };
        assert!(matches!(
            vr.commit_take(&claim, 100),
            Err(VestingRoyaleError::PoolUnderflow)
        ));
        assert!(vr.recipients.contains(&a));
    }

    #[test]
    fn commit_rejects_vanished_tokens() {
        let a = Pubkey::new_unique();
        let mut vr = record(Pubkey::new_unique(), vec![a], 1_000);
        let claim = vr.resolve_take(&a, 900, 11).unwrap();
        assert!(matches!(
            vr.commit_take(&claim, 900),
            Err(VestingRoyaleError::ConservationViolated)
        ));
        assert_eq!(vr.withdrawn, 0);
        assert!(vr.recipients.contains(&a));
    }

    #[test]
    fn conservation_over_many_recipients() {
        let creator = Pubkey::new_unique();
        let wallets: Vec<Pubkey> = (0..25).map(|_| Pubkey::new_unique()).collect();
        let deposit = 1_000_000_007;
        let mut vr = record(creator, wallets.clone(), deposit);
        vr.initial_vest = 1_234;
        vr.end_epoch = 40;

        let mut pool = deposit;
        for (i, wallet) in wallets.iter().enumerate() {
            let before = vr.recipients.len();
            let epoch = 1 + i as u64;
            let (_, after) = take(&mut vr, wallet, pool, epoch);
            assert!(after <= pool);
            assert_eq!(vr.recipients.len(), before - 1);
            pool = after;
        }
        let (_, pool) = take(&mut vr, &creator, pool, 60);
        assert_eq!(pool, 0);
        assert_eq!(vr.withdrawn, deposit);
    }

    #[test]
    fn space_covers_full_queue() {
        let wallets: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let vr = record(Pubkey::new_unique(), wallets, 1);
        let mut data = Vec::new();
        vr.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), VestingRoyale::space(3));
    }

    #[test]
    fn drained_record_cannot_be_created_again() {
        let creator = Pubkey::new_unique();
        let wallets: Vec<Pubkey> = (0..2).map(|_| Pubkey::new_unique()).collect();
        let mut vr = record(creator, wallets.clone(), 1_000);

        assert!(VestingRoyale::ensure_vacant(&anchor_lang::system_program::ID, 0).is_ok());

        let (_, pool) = take(&mut vr, &wallets[0], 1_000, 6);
        let (_, pool) = take(&mut vr, &wallets[1], pool, 6);
        assert_eq!(pool, 157);
        let (_, pool) = take(&mut vr, &creator, pool, 6);
        assert_eq!(vr.phase(pool), Phase::Drained);

        // Closing the pool leaves this account allocated and program owned.
        let mut data = Vec::new();
        vr.try_serialize(&mut data).unwrap();
        assert!(matches!(
            VestingRoyale::ensure_vacant(&crate::ID, data.len()),
            Err(VestingRoyaleError::DuplicateRecord)
        ));
        // Reassigned or reallocated addresses are refused too.
        assert!(matches!(
            VestingRoyale::ensure_vacant(&anchor_lang::system_program::ID, data.len()),
            Err(VestingRoyaleError::DuplicateRecord)
        ));
        assert!(matches!(
            VestingRoyale::ensure_vacant(&crate::ID, 0),
            Err(VestingRoyaleError::DuplicateRecord)
        ));
    }
}
