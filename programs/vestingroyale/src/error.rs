use anchor_lang::prelude::*;

/// Custom error codes for the vesting royale program.
#[error_code]
pub enum VestingRoyaleError {
    #[msg("Invalid schedule: end epoch must follow start epoch and initial vest must be <= 10000 bps")]
    InvalidSchedule,

    #[msg("Recipient count does not match the supplied recipient accounts")]
    InvalidRecipientCount,

    #[msg("A vesting record already exists at this address")]
    DuplicateRecord,

    #[msg("Duplicate recipient wallet")]
    DuplicateRecipient,

    #[msg("Creator token account cannot fund the pool")]
    InsufficientFunds,

    #[msg("Invalid amount (must be > 0)")]
    InvalidAmount,

    #[msg("Caller is not eligible to take from this vesting")]
    NotEligible,

    #[msg("Nothing is vested for the caller at this epoch")]
    NothingVested,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Withdrawal exceeds pool balance")]
    PoolUnderflow,

    #[msg("Pool balance and withdrawals no longer add up to the deposit")]
    ConservationViolated,

    #[msg("Recipients remain in the queue")]
    RecipientsRemaining,

    #[msg("Vesting pool still holds tokens")]
    PoolNotEmpty,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Invalid token mint")]
    InvalidTokenMint,
}
