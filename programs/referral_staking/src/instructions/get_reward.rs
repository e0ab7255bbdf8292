//! Get reward instruction handler.
//!
//! Mints the caller's accrued staking rewards without touching its order.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::RewardPaid;
use crate::instructions::ledger::mint_from_pool;
use crate::state::{StakePool, UserInfo};

/// Accounts required for claiming rewards.
#[derive(Accounts)]
pub struct GetReward<'info> {
    /// The user claiming rewards.
    #[account(mut)]
    pub user: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED],
        bump = stake_pool.bump,
        has_one = mint @ StakingError::MintMismatch
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// User's info account. A caller that never staked simply receives nothing.
    #[account(
        init_if_needed,
        payer = user,
        space = UserInfo::LEN,
        seeds = [USER_INFO_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub user_info: Box<Account<'info, UserInfo>>,

    /// The pool mint; rewards are minted from it.
    #[account(mut)]
    pub mint: Box<Account<'info, Mint>>,

    /// User's token account for receiving rewards.
    #[account(
        mut,
        constraint = user_token_account.mint == mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Claim accumulated rewards.
///
/// The payout is clamped to what the reward cap still allows; the remainder
/// of the owed amount is forfeited.
///
/// # Arguments
/// * `ctx` - GetReward accounts context
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<GetReward>) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let user_key = ctx.accounts.user.key();
    let pool_key = ctx.accounts.stake_pool.key();

    let user_info = &mut ctx.accounts.user_info;
    if user_info.owner == Pubkey::default() {
        user_info.owner = user_key;
        user_info.stake_pool = pool_key;
        user_info.bump = ctx.bumps.user_info;
    }

    // === REWARD CHECKPOINT ===

    let stake_pool = &mut ctx.accounts.stake_pool;
    let total_staked = stake_pool.total_staked;
    stake_pool.rewards.update(now, total_staked)?;
    let reward = user_info.take_reward(&mut stake_pool.rewards)?;
    stake_pool.last_updated = now;

    if reward == 0 {
        msg!("No rewards to claim");
        return Ok(());
    }

    // === TOKEN MINT ===

    mint_from_pool(
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.user_token_account.to_account_info(),
        ctx.accounts.stake_pool.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.stake_pool.bump,
        reward,
    )?;

    let user_info = &ctx.accounts.user_info;
    let stake_pool = &ctx.accounts.stake_pool;

    emit!(RewardPaid {
        user: user_key,
        reward,
    });

    msg!("Claimed {} reward tokens", reward);
    msg!("Total rewards claimed by user: {}", user_info.total_rewards_claimed);
    msg!("Total distributed from pool: {}", stake_pool.rewards.total_distributed);

    Ok(())
}
