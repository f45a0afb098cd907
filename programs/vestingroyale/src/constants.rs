//! Program-wide constants.

/// Seed prefix for every `VestingRoyale` PDA.
pub const VESTING_ROYALE_SEED: &[u8] = b"vestingroyale";

/// 100% expressed in basis points.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Upper bound on recipients per record. Keeps the record under the
/// 10 KiB limit for accounts created through CPI.
pub const MAX_RECIPIENTS: usize = 256;
