//! Read-only instructions.
//!
//! Both return their result through Anchor return data and leave every
//! account untouched.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::state::{RewardAccumulator, StakePool, UserInfo, VestingSchedule};

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct Earned<'info> {
    #[account(seeds = [STAKE_POOL_SEED], bump = stake_pool.bump)]
    pub stake_pool: Account<'info, StakePool>,

    /// CHECK: The user's info PDA. It may not exist yet; it is deserialized
    /// only when owned by this program and non-empty.
    #[account(seeds = [USER_INFO_SEED, stake_pool.key().as_ref(), user.as_ref()], bump)]
    pub user_info: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(beneficiary: Pubkey)]
pub struct CheckRelease<'info> {
    #[account(seeds = [STAKE_POOL_SEED], bump = stake_pool.bump)]
    pub stake_pool: Account<'info, StakePool>,

    #[account(
        seeds = [
            VESTING_SEED,
            stake_pool.key().as_ref(),
            &[stake_pool.vesting_slot(&beneficiary)]
        ],
        bump = vesting_schedule.bump,
        constraint = vesting_schedule.beneficiary == beneficiary @ StakingError::InvalidBeneficiary
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,
}

/// `None` for an account the program has never written.
fn load_user_info(account: &AccountInfo) -> Result<Option<UserInfo>> {
    if account.owner != &crate::ID || account.data_is_empty() {
        return Ok(None);
    }
    let data = account.try_borrow_data()?;
    Ok(Some(UserInfo::try_deserialize(&mut &data[..])?))
}

/// Rewards owed to `user_info` at `now`. An unknown account has earned nothing.
pub fn projected_earned(
    rewards: &RewardAccumulator,
    total_staked: u64,
    user_info: Option<&UserInfo>,
    now: i64,
) -> Result<u64> {
    let Some(user_info) = user_info else {
        return Ok(0);
    };

    let rewards = rewards.projected(now, total_staked)?;
    rewards.earned(
        user_info.order.amount,
        user_info.reward_per_token_paid,
        user_info.rewards,
    )
}

/// Rewards `user` could claim right now, before the reward cap clamp.
pub fn earned_handler(ctx: Context<Earned>, _user: Pubkey) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    let stake_pool = &ctx.accounts.stake_pool;
    let user_info = load_user_info(&ctx.accounts.user_info)?;

    projected_earned(
        &stake_pool.rewards,
        stake_pool.total_staked,
        user_info.as_ref(),
        now,
    )
}

/// Vested amount `beneficiary` could claim right now.
pub fn check_release_handler(ctx: Context<CheckRelease>, _beneficiary: Pubkey) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.vesting_schedule.releasable(now)
}
