//! Deterministic addresses for vesting records and their pools.

use anchor_lang::prelude::*;

use crate::constants::VESTING_ROYALE_SEED;

/// Record PDA for `(initializer, nonce)`.
pub fn find_vesting_royale_address(initializer: &Pubkey, nonce: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            VESTING_ROYALE_SEED,
            initializer.as_ref(),
            &nonce.to_le_bytes(),
        ],
        &crate::ID,
    )
}

/// Record PDA under the earlier one-record-per-mint scheme.
#[deprecated(note = "records are keyed by (initializer, nonce); use find_vesting_royale_address")]
pub fn find_legacy_vesting_royale_address(initializer: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VESTING_ROYALE_SEED, initializer.as_ref(), mint.as_ref()],
        &crate::ID,
    )
}

/// Pool: the record's associated token account for `mint`.
pub fn find_vesting_pool_address(vesting_royale: &Pubkey, mint: &Pubkey) -> Pubkey {
    let seeds: &[&[u8]] = &[
        vesting_royale.as_ref(),
        anchor_spl::token::ID.as_ref(),
        mint.as_ref(),
    ];
    let (ata, _) = Pubkey::find_program_address(seeds, &anchor_spl::associated_token::ID);
    ata
}
