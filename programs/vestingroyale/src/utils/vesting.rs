//! Epoch vesting arithmetic (integer only, basis points).
//! - cliff: `initial_vest` bps unlocked at or before `start_epoch`
//! - linear: remainder unlocks evenly until `end_epoch`
//! - share: current pool split evenly across surviving recipients

use crate::constants::BPS_DENOMINATOR;
use crate::error::VestingRoyaleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingSchedule {
    pub start_epoch: u64,
    pub end_epoch: u64,
    pub initial_vest: u16,
}

impl VestingSchedule {
    /// Resolves creation arguments into a concrete schedule.
    ///
    /// `None` starts at `current_epoch`; an explicit start must lie in the
    /// future.
    pub fn resolve(
        start_epoch: Option<u64>,
        end_epoch_delta: u64,
        initial_vest: u16,
        current_epoch: u64,
    ) -> Result<Self, VestingRoyaleError> {
        if end_epoch_delta == 0 || u64::from(initial_vest) > BPS_DENOMINATOR {
            return Err(VestingRoyaleError::InvalidSchedule);
        }
        let start_epoch = match start_epoch {
            Some(epoch) if epoch > current_epoch => epoch,
            Some(_) => return Err(VestingRoyaleError::InvalidSchedule),
            None => current_epoch,
        };
        let end_epoch = start_epoch
            .checked_add(end_epoch_delta)
            .ok_or(VestingRoyaleError::ArithmeticOverflow)?;
        Ok(Self {
            start_epoch,
            end_epoch,
            initial_vest,
        })
    }
}

/// Unlocked fraction at `current_epoch`, in `[initial_vest, 10000]` bps.
pub fn vested_bps(current_epoch: u64, schedule: &VestingSchedule) -> Result<u64, VestingRoyaleError> {
    let initial = u64::from(schedule.initial_vest);
    let locked = BPS_DENOMINATOR
        .checked_sub(initial)
        .ok_or(VestingRoyaleError::InvalidSchedule)?;

    if current_epoch >= schedule.end_epoch {
        return Ok(BPS_DENOMINATOR);
    }
    if current_epoch <= schedule.start_epoch {
        return Ok(initial);
    }

    // start < current < end, so duration is non-zero and elapsed < duration.
    let elapsed = u128::from(current_epoch - schedule.start_epoch);
    let duration = u128::from(schedule.end_epoch - schedule.start_epoch);
    let extra = elapsed
        .checked_mul(u128::from(locked))
        .ok_or(VestingRoyaleError::ArithmeticOverflow)?
        / duration;

    let bps = u128::from(initial)
        .checked_add(extra)
        .ok_or(VestingRoyaleError::ArithmeticOverflow)?;
    u64::try_from(bps).map_err(|_| VestingRoyaleError::ArithmeticOverflow)
}

/// Amount one of `survivors` recipients may take from `pool_balance` now.
/// Both divisions truncate; the remainder stays in the pool.
pub fn withdrawable_amount(
    pool_balance: u64,
    survivors: u64,
    current_epoch: u64,
    schedule: &VestingSchedule,
) -> Result<u64, VestingRoyaleError> {
    if survivors == 0 {
        return Err(VestingRoyaleError::ArithmeticOverflow);
    }
    let share = u128::from(pool_balance / survivors);
    let bps = u128::from(vested_bps(current_epoch, schedule)?);
    let amount = share
        .checked_mul(bps)
        .ok_or(VestingRoyaleError::ArithmeticOverflow)?
        / u128::from(BPS_DENOMINATOR);
    u64::try_from(amount).map_err(|_| VestingRoyaleError::ArithmeticOverflow)
}
