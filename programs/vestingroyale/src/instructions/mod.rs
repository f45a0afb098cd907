pub mod close_pool;
pub mod create_vesting;
pub mod emit_take_quote;
pub mod take;

pub use close_pool::*;
pub use create_vesting::*;
pub use emit_take_quote::*;
pub use take::*;
