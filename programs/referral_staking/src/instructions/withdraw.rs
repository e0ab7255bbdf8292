//! Withdraw instruction handler.
//!
//! Closes a matured stake order: reverses its promotion bookkeeping, sends
//! the 3% fee to the burn sink and returns the rest to the owner.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{TokensTransferred, Withdrawn};
use crate::instructions::ledger::pay_from_vault;
use crate::instructions::promotion;
use crate::state::{StakeOrder, StakePool, UserInfo};

/// Accounts required for withdrawing.
///
/// Remaining accounts: one `user_info (mut)` per promotion record of the
/// order, in the order they were recorded.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The user withdrawing tokens.
    #[account(mut)]
    pub user: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED],
        bump = stake_pool.bump,
        has_one = staking_vault @ StakingError::VaultMismatch,
        has_one = mint @ StakingError::MintMismatch
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// User's info account. Created on demand so that a caller without one
    /// gets `ZeroWithdraw` rather than an account error.
    #[account(
        init_if_needed,
        payer = user,
        space = UserInfo::LEN,
        seeds = [USER_INFO_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub user_info: Box<Account<'info, UserInfo>>,

    /// The pool mint.
    pub mint: Box<Account<'info, Mint>>,

    /// User's token account for receiving the payout.
    #[account(
        mut,
        constraint = user_token_account.mint == mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    /// Pool's staking vault.
    #[account(mut)]
    pub staking_vault: Box<Account<'info, TokenAccount>>,

    /// Token account of the burn sink receiving the withdrawal fee.
    #[account(
        mut,
        constraint = sink_token_account.mint == mint.key() @ StakingError::MintMismatch,
        constraint = sink_token_account.owner == BURN_SINK @ StakingError::InvalidSinkAccount
    )]
    pub sink_token_account: Box<Account<'info, TokenAccount>>,

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Split a withdrawn order into `(fee, payout)`.
pub fn split_withdrawal(amount: u64) -> Result<(u64, u64)> {
    let fee = (amount as u128)
        .checked_mul(WITHDRAW_FEE_BPS as u128)
        .ok_or(StakingError::MathOverflow)?
        / BASIS_POINTS_DENOMINATOR as u128;
    let fee = u64::try_from(fee).map_err(|_| StakingError::MathOverflow)?;
    let payout = amount.checked_sub(fee).ok_or(StakingError::MathUnderflow)?;
    Ok((fee, payout))
}

/// Withdraw a matured stake order.
///
/// # Arguments
/// * `ctx` - Withdraw accounts context
///
/// # Returns
/// Result indicating success or error
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    // === VALIDATION ===

    let order = &ctx.accounts.user_info.order;
    order.ensure_withdrawable(now)?;

    let amount = order.amount;
    let (fee, payout) = split_withdrawal(amount)?;
    require!(
        ctx.accounts.staking_vault.amount >= amount,
        StakingError::InsufficientBalance
    );

    // === REWARD CHECKPOINT ===

    let stake_pool = &mut ctx.accounts.stake_pool;
    let user_info = &mut ctx.accounts.user_info;
    let total_staked = stake_pool.total_staked;
    stake_pool.rewards.update(now, total_staked)?;
    user_info.settle_rewards(&stake_pool.rewards)?;

    // === PROMOTION ROLLBACK ===

    promotion::on_withdraw(
        ctx.remaining_accounts,
        &ctx.accounts.stake_pool.key(),
        &ctx.accounts.user_info.order.promotions,
        amount,
    )?;

    // === TOKEN TRANSFERS ===

    let vault_key = ctx.accounts.staking_vault.key();
    let sink_key = ctx.accounts.sink_token_account.key();
    let user_token_key = ctx.accounts.user_token_account.key();
    let pool_bump = ctx.accounts.stake_pool.bump;

    pay_from_vault(
        ctx.accounts.staking_vault.to_account_info(),
        ctx.accounts.sink_token_account.to_account_info(),
        ctx.accounts.stake_pool.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        pool_bump,
        fee,
    )?;
    emit!(TokensTransferred {
        from: vault_key,
        to: sink_key,
        value: fee,
    });

    pay_from_vault(
        ctx.accounts.staking_vault.to_account_info(),
        ctx.accounts.user_token_account.to_account_info(),
        ctx.accounts.stake_pool.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        pool_bump,
        payout,
    )?;
    emit!(TokensTransferred {
        from: vault_key,
        to: user_token_key,
        value: payout,
    });

    // === STATE UPDATE ===

    let user_info = &mut ctx.accounts.user_info;
    user_info.order = StakeOrder::default();

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.total_staked = stake_pool
        .total_staked
        .checked_sub(amount)
        .ok_or(StakingError::MathUnderflow)?;
    stake_pool.staker_count = stake_pool.staker_count.saturating_sub(1);
    stake_pool.total_burned = stake_pool
        .total_burned
        .checked_add(fee)
        .ok_or(StakingError::MathOverflow)?;
    stake_pool.last_updated = now;

    emit!(Withdrawn {
        user: ctx.accounts.user.key(),
        amount,
    });

    msg!("Withdrew {} tokens: {} burned, {} paid out", amount, fee, payout);
    msg!("Pending rewards: {}", ctx.accounts.user_info.rewards);
    msg!(
        "Pool: {} staked by {} stakers, {} burned in total",
        stake_pool.total_staked,
        stake_pool.staker_count,
        stake_pool.total_burned
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn withdrawal_of_200_burns_6() {
        let (fee, payout) = split_withdrawal(200 * ONE_TOKEN).unwrap();
        assert_eq!(fee, 6 * ONE_TOKEN);
        assert_eq!(payout, 194 * ONE_TOKEN);
    }

    #[test]
    fn fee_rounds_down() {
        assert_eq!(split_withdrawal(33).unwrap(), (0, 33));
        assert_eq!(split_withdrawal(34).unwrap(), (1, 33));
    }

    proptest! {
        #[test]
        fn fee_and_payout_add_up(units in 1u64..1_000_000) {
            let amount = units * STAKE_UNIT;
            let (fee, payout) = split_withdrawal(amount).unwrap();
            prop_assert_eq!(fee + payout, amount);
            prop_assert_eq!(fee, amount * 3 / 100);
        }
    }
}
