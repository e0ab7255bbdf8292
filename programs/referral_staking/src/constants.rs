//! Program constants for the Referral Staking program.
//!
//! This module defines all constant values used throughout the program,
//! including seeds, time periods, the reward schedule, tier capacities and
//! vesting allocations.

use anchor_lang::prelude::*;

/// Seed for deriving the stake pool PDA
pub const STAKE_POOL_SEED: &[u8] = b"stake_pool";

/// Seed for deriving user info PDAs
pub const USER_INFO_SEED: &[u8] = b"user_info";

/// Seed for deriving the program-owned token mint
pub const MINT_SEED: &[u8] = b"mint";

/// Seed for deriving the pool vault PDA
pub const POOL_VAULT_SEED: &[u8] = b"pool_vault";

/// Seed for deriving vesting schedule PDAs
pub const VESTING_SEED: &[u8] = b"vesting";

/// Vesting schedule slot of `lock1`
pub const LOCK1_SLOT: u8 = 0;

/// Vesting schedule slot of `lock2`
pub const LOCK2_SLOT: u8 = 1;

/// Decimals of the program mint
pub const TOKEN_DECIMALS: u8 = 9;

/// One whole token in base units
pub const ONE_TOKEN: u64 = 1_000_000_000;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Lock period of every stake order (30 days)
pub const LOCK_PERIOD: i64 = 30 * SECONDS_PER_DAY;

/// Stake amounts must be a multiple of this unit (20 tokens)
pub const STAKE_UNIT: u64 = 20 * ONE_TOKEN;

/// Withdrawal fee sent to the sink (3% = 300 basis points)
pub const WITHDRAW_FEE_BPS: u64 = 300;

/// Basis points denominator (100% = 10000 basis points)
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

/// Precision multiplier for reward-per-token accounting
pub const PRECISION: u128 = 1_000_000_000_000; // 10^12

/// Length of one halving period (3 years)
pub const REWARD_DURATION: i64 = 3 * 365 * SECONDS_PER_DAY;

/// Rewards emitted over the first halving period
pub const INITIAL_REWARD: u64 = 9_216 * 3 * 365 * ONE_TOKEN;

/// Hard cap on all staking rewards ever paid out
pub const TOTAL_REWARD_CAP: u64 = 19_500_000 * ONE_TOKEN;

/// Number of commission tiers tracked per ancestor
pub const TIER_COUNT: usize = 5;

/// Downline positions each tier can hold
pub const TIER_CAPACITIES: [u8; TIER_COUNT] = [1, 2, 2, 5, 5];

/// Default commission per tier (10% each).
///
/// Commission is paid on `min(downline stake, ancestor stake)` and only while
/// the ancestor's own order is live and unexpired. A minimum ancestor stake
/// (e.g. 100 units) as the eligibility rule would be the alternative reading.
pub const DEFAULT_COMMISSION_RATES_BPS: [u16; TIER_COUNT] = [1000, 1000, 1000, 1000, 1000];

/// Maximum allowed commission rate for a single tier (50%)
pub const MAX_COMMISSION_RATE_BPS: u16 = 5000;

/// Upper bound on ancestors visited by one stake
pub const MAX_PROMOTION_DEPTH: usize = 20;

/// Tokens minted to the root account at initialization
pub const ROOT_INITIAL_ALLOCATION: u64 = 1_000_000 * ONE_TOKEN;

/// Vesting allocation of the first reserved beneficiary
pub const LOCK1_ALLOCATION: u64 = 300_000 * ONE_TOKEN;

/// Vesting allocation of the second reserved beneficiary
pub const LOCK2_ALLOCATION: u64 = 200_000 * ONE_TOKEN;

/// Number of equal tranches in a vesting allocation
pub const VESTING_TRANCHES: u8 = 5;

/// Time before the first tranche unlocks (180 days)
pub const VESTING_CLIFF: i64 = 180 * SECONDS_PER_DAY;

/// Time between two tranches (30 days)
pub const VESTING_PERIOD: i64 = 30 * SECONDS_PER_DAY;

/// Owner of the token account that receives withdrawal fees
pub const BURN_SINK: Pubkey = anchor_lang::solana_program::incinerator::ID;
