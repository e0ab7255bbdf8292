//! Stake instruction handler.
//!
//! Opens a 30-day stake order, links the caller into the referral forest on
//! its first stake, and promotes the stake up the referral chain.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Staked;
use crate::instructions::ledger::pull_into_vault;
use crate::instructions::promotion;
use crate::state::{StakeOrder, StakePool, UserInfo};

/// Accounts required for staking.
///
/// Remaining accounts: one `[user_info (mut), token_account (mut)]` pair per
/// ancestor, starting at the caller's father (or the invitor on a first stake).
///
/// A walk at full `MAX_PROMOTION_DEPTH` needs 40 remaining accounts on top of
/// the 8 fixed ones and up to 20 `mint_to` CPIs. Clients send it as a v0
/// transaction with an address lookup table and a raised compute unit limit.
#[derive(Accounts)]
pub struct Stake<'info> {
    /// The user staking tokens.
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

    /// User's info account (created on first interaction).
    #[account(
        init_if_needed,
        payer = user,
        space = UserInfo::LEN,
        seeds = [USER_INFO_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub user_info: Box<Account<'info, UserInfo>>,

    /// The pool mint; commissions are minted from it.
    #[account(mut)]
    pub mint: Box<Account<'info, Mint>>,

    /// User's token account funding the stake.
    #[account(
        mut,
        constraint = user_token_account.mint == mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    /// Pool's staking vault.
    #[account(mut)]
    pub staking_vault: Box<Account<'info, TokenAccount>>,

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Reject a stake before any account is touched.
///
/// Checks run in a fixed order: invitor, amount, unit, pause, balance, and
/// finally the caller's existing order. A live order blocks a new stake even
/// once it has matured; it has to be withdrawn first.
#[allow(clippy::too_many_arguments)]
pub fn validate_stake(
    amount: u64,
    invitor: Pubkey,
    user: Pubkey,
    linking: bool,
    paused: bool,
    balance: u64,
    order: &StakeOrder,
) -> Result<()> {
    require_keys_neq!(invitor, Pubkey::default(), StakingError::InvalidInvitor);
    if linking {
        require_keys_neq!(invitor, user, StakingError::InvalidInvitor);
    }
    require!(amount > 0, StakingError::ZeroAmount);
    require!(amount % STAKE_UNIT == 0, StakingError::NotUnitMultiple);
    require!(!paused, StakingError::StakingPaused);
    require!(balance >= amount, StakingError::TransferFailed);
    require!(!order.is_live(), StakingError::OrderNotExpired);
    Ok(())
}

/// Stake tokens into the pool.
///
/// # Arguments
/// * `ctx` - Stake accounts context
/// * `amount` - Amount of tokens to stake (multiple of `STAKE_UNIT`)
/// * `invitor` - Referrer recorded as father on the caller's first stake
///
/// # Returns
/// Result indicating success or error
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Stake<'info>>,
    amount: u64,
    invitor: Pubkey,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let user_key = ctx.accounts.user.key();
    let pool_key = ctx.accounts.stake_pool.key();
    let root = ctx.accounts.stake_pool.root;

    // === INPUT VALIDATION ===

    let linking = user_key != root && ctx.accounts.user_info.father.is_none();
    validate_stake(
        amount,
        invitor,
        user_key,
        linking,
        ctx.accounts.stake_pool.paused,
        ctx.accounts.user_token_account.amount,
        &ctx.accounts.user_info.order,
    )?;

    // === REFERRAL LINK ===

    let user_info = &mut ctx.accounts.user_info;
    if user_info.owner == Pubkey::default() {
        user_info.owner = user_key;
        user_info.stake_pool = pool_key;
        user_info.bump = ctx.bumps.user_info;
    }

    let first_ancestor = if user_key == root {
        None
    } else {
        Some(user_info.father.unwrap_or(invitor))
    };

    // === REWARD CHECKPOINT ===

    let stake_pool = &mut ctx.accounts.stake_pool;
    let total_staked = stake_pool.total_staked;
    stake_pool.rewards.update(now, total_staked)?;
    user_info.settle_rewards(&stake_pool.rewards)?;

    // === TOKEN TRANSFER ===

    pull_into_vault(
        ctx.accounts.user_token_account.to_account_info(),
        ctx.accounts.staking_vault.to_account_info(),
        ctx.accounts.user.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
    )?;

    // === PROMOTION ===

    let promotion = match first_ancestor {
        Some(first_ancestor) => promotion::on_stake(
            ctx.remaining_accounts,
            &ctx.accounts.stake_pool,
            &ctx.accounts.mint,
            &ctx.accounts.token_program,
            user_key,
            first_ancestor,
            linking,
            amount,
            now,
        )?,
        None => promotion::StakePromotion {
            records: Vec::new(),
            total_commission: 0,
        },
    };

    // === STATE UPDATE ===

    let user_info = &mut ctx.accounts.user_info;
    if linking {
        user_info.father = Some(invitor);
    }
    user_info.order = StakeOrder::open(amount, now)?;
    user_info.order.promotions = promotion.records;

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.total_staked = stake_pool
        .total_staked
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;
    stake_pool.staker_count = stake_pool.staker_count.saturating_add(1);
    stake_pool.total_promoted = stake_pool
        .total_promoted
        .checked_add(promotion.total_commission)
        .ok_or(StakingError::MathOverflow)?;
    stake_pool.last_updated = now;

    emit!(Staked {
        user: user_key,
        amount,
    });

    msg!("Staked {} tokens until {}", amount, user_info.order.expiry);
    msg!(
        "Ancestors credited: {}, commission minted: {}",
        user_info.order.promotions.len(),
        promotion.total_commission
    );
    msg!(
        "Pool: {} staked by {} stakers, {} commission minted in total",
        stake_pool.total_staked,
        stake_pool.staker_count,
        stake_pool.total_promoted
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAKE: u64 = 200 * ONE_TOKEN;

    fn error_code(result: Result<()>) -> u32 {
        match result {
            Err(anchor_lang::error::Error::AnchorError(err)) => err.error_code_number,
            Err(err) => panic!("unexpected error: {err}"),
            Ok(()) => panic!("expected an error"),
        }
    }

    struct Attempt {
        amount: u64,
        invitor: Pubkey,
        user: Pubkey,
        linking: bool,
        paused: bool,
        balance: u64,
        order: StakeOrder,
    }

    impl Attempt {
        fn valid() -> Self {
            Self {
                amount: STAKE,
                invitor: Pubkey::new_unique(),
                user: Pubkey::new_unique(),
                linking: true,
                paused: false,
                balance: STAKE,
                order: StakeOrder::default(),
            }
        }

        fn check(&self) -> Result<()> {
            validate_stake(
                self.amount,
                self.invitor,
                self.user,
                self.linking,
                self.paused,
                self.balance,
                &self.order,
            )
        }
    }

    #[test]
    fn valid_stake_passes() {
        assert!(Attempt::valid().check().is_ok());
    }

    #[test]
    fn rejections_fire_in_order() {
        // Every check fails at once; fixing them one by one surfaces the next.
        let mut attempt = Attempt {
            amount: 0,
            invitor: Pubkey::default(),
            user: Pubkey::new_unique(),
            linking: true,
            paused: true,
            balance: 0,
            order: StakeOrder::open(STAKE, 0).unwrap(),
        };
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::InvalidInvitor));

        attempt.invitor = Pubkey::new_unique();
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::ZeroAmount));

        attempt.amount = STAKE_UNIT + 1;
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::NotUnitMultiple));

        attempt.amount = STAKE;
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::StakingPaused));

        attempt.paused = false;
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::TransferFailed));

        attempt.balance = STAKE;
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::OrderNotExpired));

        attempt.order = StakeOrder::default();
        assert!(attempt.check().is_ok());
    }

    #[test]
    fn self_invite_rejected_only_when_linking() {
        let mut attempt = Attempt::valid();
        attempt.invitor = attempt.user;
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::InvalidInvitor));

        attempt.linking = false;
        assert!(attempt.check().is_ok());
    }

    #[test]
    fn matured_order_still_blocks_restake() {
        let mut attempt = Attempt::valid();
        attempt.order = StakeOrder::open(STAKE, 0).unwrap();
        assert!(attempt.order.is_matured(LOCK_PERIOD * 10));
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::OrderNotExpired));
    }

    #[test]
    fn paused_pool_rejects_valid_stake() {
        let mut attempt = Attempt::valid();
        attempt.paused = true;
        assert_eq!(error_code(attempt.check()), u32::from(StakingError::StakingPaused));
    }
}
