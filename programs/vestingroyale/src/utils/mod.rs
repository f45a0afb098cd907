pub mod address;
pub mod vesting;
