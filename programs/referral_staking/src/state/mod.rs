//! State structures for the Referral Staking program.
//!
//! This module defines all account structures used to store program state.

pub mod reward;
pub mod stake_pool;
pub mod user_info;
pub mod vesting;

pub use reward::*;
pub use stake_pool::*;
pub use user_info::*;
pub use vesting::*;
