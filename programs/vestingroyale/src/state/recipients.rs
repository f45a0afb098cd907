use anchor_lang::prelude::*;

use crate::constants::MAX_RECIPIENTS;
use crate::error::VestingRoyaleError;

/// Recipients still waiting to take, in queue order.
///
/// Capacity is fixed when the record is created and the account is sized for
/// it; `entries` only ever shrinks. Removal overwrites the slot with the last
/// entry, so surviving recipients are reordered by every take.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientQueue {
    pub capacity: u32,
    pub entries: Vec<Pubkey>,
}

impl RecipientQueue {
    /// Serialized size for a queue of `capacity` entries.
    pub const fn space(capacity: usize) -> usize {
        4 + // capacity
            4 + // vec length prefix
            capacity * 32
    }

    /// Builds the initial queue, in the given order, for exactly
    /// `recipient_count` distinct wallets.
    pub fn new(
        wallets: Vec<Pubkey>,
        recipient_count: u64,
    ) -> core::result::Result<Self, VestingRoyaleError> {
        let capacity = usize::try_from(recipient_count)
            .map_err(|_| VestingRoyaleError::InvalidRecipientCount)?;
        if capacity == 0 || capacity > MAX_RECIPIENTS || wallets.len() != capacity {
            return Err(VestingRoyaleError::InvalidRecipientCount);
        }

        let mut sorted = wallets.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(VestingRoyaleError::DuplicateRecipient);
        }

        Ok(Self {
            capacity: capacity as u32,
            entries: wallets,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, wallet: &Pubkey) -> bool {
        self.position(wallet).is_some()
    }

    pub fn position(&self, wallet: &Pubkey) -> Option<usize> {
        self.entries.iter().position(|e| e == wallet)
    }

    /// Removes `wallet`, moving the last entry into its slot.
    pub fn remove_by_swap(
        &mut self,
        wallet: &Pubkey,
    ) -> core::result::Result<usize, VestingRoyaleError> {
        let index = self.position(wallet).ok_or(VestingRoyaleError::NotEligible)?;
        self.entries.swap_remove(index);
        Ok(index)
    }

    pub fn as_slice(&self) -> &[Pubkey] {
        &self.entries
    }
}
