//! Instruction handlers for the Referral Staking program.
//!
//! `ledger` and `promotion` hold the token movements and the referral walk
//! shared by the handlers.

pub mod admin;
pub mod claim_coin;
pub mod get_reward;
pub mod initialize;
pub mod ledger;
pub mod promotion;
pub mod stake;
pub mod views;
pub mod withdraw;

pub use admin::*;
pub use claim_coin::*;
pub use get_reward::*;
pub use initialize::*;
pub use stake::*;
pub use views::*;
pub use withdraw::*;
