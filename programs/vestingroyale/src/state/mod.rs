pub mod recipients;
pub mod vesting_royale;

pub use recipients::*;
pub use vesting_royale::*;
