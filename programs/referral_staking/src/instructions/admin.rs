//! Governor instruction handlers.
//!
//! ## Security Guarantees
//! - Every handler requires signer == pool.governor
//! - PDA validation ensures the singleton pool
//! - Parameter bounds checking

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::state::StakePool;

/// Accounts required for governor operations.
#[derive(Accounts)]
pub struct GovernorControl<'info> {
    /// The governor. Must sign and match `stake_pool.governor`.
    #[account(mut)]
    pub governor: Signer<'info>,

    /// The stake pool to modify.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED],
        bump = stake_pool.bump,
        has_one = governor @ StakingError::Unauthorized
    )]
    pub stake_pool: Account<'info, StakePool>,
}

/// Set the paused state of the pool.
///
/// Only `stake` is blocked while paused; withdrawals, reward claims and
/// vesting releases stay available.
pub fn set_paused_handler(ctx: Context<GovernorControl>, paused: bool) -> Result<()> {
    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;

    let previous_state = stake_pool.paused;
    stake_pool.paused = paused;
    stake_pool.last_updated = clock.unix_timestamp;

    msg!(
        "Staking {} (was {})",
        if paused { "PAUSED" } else { "RESUMED" },
        if previous_state { "paused" } else { "active" }
    );
    msg!("Governor: {}", ctx.accounts.governor.key());

    Ok(())
}

/// Replace the per-tier commission rates. Existing promotion records keep the
/// commission they were paid with.
///
/// # Arguments
/// * `ctx` - GovernorControl accounts context
/// * `rates_bps` - New commission rate per tier (basis points)
///
/// # Returns
/// Result indicating success or error
pub fn adjust_commission_rates_handler(
    ctx: Context<GovernorControl>,
    rates_bps: [u16; TIER_COUNT],
) -> Result<()> {
    require!(
        rates_bps.iter().all(|rate| *rate <= MAX_COMMISSION_RATE_BPS),
        StakingError::CommissionRateTooHigh
    );

    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;

    msg!("Old commission rates: {:?}bp", stake_pool.commission_rates_bps);

    stake_pool.commission_rates_bps = rates_bps;
    stake_pool.last_updated = clock.unix_timestamp;

    msg!("New commission rates: {:?}bp", rates_bps);
    msg!("Governor: {}", ctx.accounts.governor.key());

    Ok(())
}

/// Update the reward cap.
///
/// The accumulator is brought forward first so that emission up to now is
/// accounted for under the old cap.
pub fn update_reward_cap_handler(ctx: Context<GovernorControl>, new_cap: u64) -> Result<()> {
    let stake_pool = &mut ctx.accounts.stake_pool;
    let now = Clock::get()?.unix_timestamp;

    require!(new_cap > 0, StakingError::InvalidRewardCap);
    require!(
        new_cap >= stake_pool.rewards.total_distributed,
        StakingError::InvalidRewardCap
    );

    let total_staked = stake_pool.total_staked;
    stake_pool.rewards.update(now, total_staked)?;

    let old_cap = stake_pool.rewards.reward_cap;
    stake_pool.rewards.reward_cap = new_cap;
    stake_pool.last_updated = now;

    let remaining = new_cap.saturating_sub(stake_pool.rewards.total_distributed);

    msg!("Reward cap updated: {} -> {}", old_cap, new_cap);
    msg!("Total distributed: {}", stake_pool.rewards.total_distributed);
    msg!("Remaining capacity: {}", remaining);
    msg!("Governor: {}", ctx.accounts.governor.key());

    Ok(())
}

/// Hand the governor role to `new_governor`.
pub fn transfer_governor_handler(
    ctx: Context<GovernorControl>,
    new_governor: Pubkey,
) -> Result<()> {
    require_keys_neq!(new_governor, Pubkey::default(), StakingError::Unauthorized);

    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;

    let old_governor = stake_pool.governor;
    stake_pool.governor = new_governor;
    stake_pool.last_updated = clock.unix_timestamp;

    msg!("Governor transferred: {} -> {}", old_governor, new_governor);

    Ok(())
}
