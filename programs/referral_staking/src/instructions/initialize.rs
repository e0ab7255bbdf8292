//! Initialize instruction handler.
//!
//! Creates the singleton pool together with everything it owns: the program
//! mint, the staking vault, the root's referral record and token account, and
//! the two vesting schedules.
//!
//! ## Security Guarantees
//! - Mint and vault are PDAs whose authority is the pool PDA
//! - Vesting schedules live at fixed slots, so beneficiaries cannot be swapped
//! - A pool initializes exactly once

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::PoolInitialized;
use crate::instructions::ledger::mint_from_pool;
use crate::state::{RewardAccumulator, StakePool, UserInfo, VestingSchedule};

/// Accounts required for pool initialization.
///
/// Every owned account uses `init_if_needed` so a repeated call reaches the
/// handler and fails with `AlreadyInitialized` instead of an account error.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The governor of the pool, paying for every created account.
    #[account(mut)]
    pub governor: Signer<'info>,

    /// CHECK: Referral root. Only its key is recorded.
    pub root: UncheckedAccount<'info>,

    /// CHECK: First vesting beneficiary. Only its key is recorded.
    pub lock1: UncheckedAccount<'info>,

    /// CHECK: Second vesting beneficiary. Only its key is recorded.
    pub lock2: UncheckedAccount<'info>,

    /// The singleton stake pool.
    #[account(
        init_if_needed,
        payer = governor,
        space = StakePool::LEN,
        seeds = [STAKE_POOL_SEED],
        bump
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// The program mint; only the pool PDA can mint.
    #[account(
        init_if_needed,
        payer = governor,
        seeds = [MINT_SEED, stake_pool.key().as_ref()],
        bump,
        mint::decimals = TOKEN_DECIMALS,
        mint::authority = stake_pool
    )]
    pub mint: Box<Account<'info, Mint>>,

    /// Vault holding every open stake.
    #[account(
        init_if_needed,
        payer = governor,
        seeds = [POOL_VAULT_SEED, stake_pool.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = stake_pool
    )]
    pub staking_vault: Box<Account<'info, TokenAccount>>,

    /// Referral record of the root.
    #[account(
        init_if_needed,
        payer = governor,
        space = UserInfo::LEN,
        seeds = [USER_INFO_SEED, stake_pool.key().as_ref(), root.key().as_ref()],
        bump
    )]
    pub root_info: Box<Account<'info, UserInfo>>,

    /// Root's associated token account, receiving the initial allocation.
    #[account(
        init_if_needed,
        payer = governor,
        associated_token::mint = mint,
        associated_token::authority = root
    )]
    pub root_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = governor,
        space = VestingSchedule::LEN,
        seeds = [VESTING_SEED, stake_pool.key().as_ref(), &[LOCK1_SLOT]],
        bump
    )]
    pub lock1_schedule: Box<Account<'info, VestingSchedule>>,

    #[account(
        init_if_needed,
        payer = governor,
        space = VestingSchedule::LEN,
        seeds = [VESTING_SEED, stake_pool.key().as_ref(), &[LOCK2_SLOT]],
        bump
    )]
    pub lock2_schedule: Box<Account<'info, VestingSchedule>>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

/// Reject a repeated initialization or an invalid root, beneficiary or rate setup.
pub fn validate_initialize(
    initialized: bool,
    root: Pubkey,
    lock1: Pubkey,
    lock2: Pubkey,
    commission_rates_bps: &[u16; TIER_COUNT],
) -> Result<()> {
    require!(!initialized, StakingError::AlreadyInitialized);
    require_keys_neq!(root, Pubkey::default(), StakingError::InvalidInvitor);
    require_keys_neq!(lock1, lock2, StakingError::InvalidBeneficiary);
    require_keys_neq!(lock1, root, StakingError::InvalidBeneficiary);
    require_keys_neq!(lock2, root, StakingError::InvalidBeneficiary);
    require!(
        commission_rates_bps
            .iter()
            .all(|rate| *rate <= MAX_COMMISSION_RATE_BPS),
        StakingError::CommissionRateTooHigh
    );
    Ok(())
}

/// Initialize the pool.
///
/// # Arguments
/// * `ctx` - Initialize accounts context
/// * `commission_rates_bps` - Commission rate per tier, in basis points
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<Initialize>, commission_rates_bps: [u16; TIER_COUNT]) -> Result<()> {
    // === INPUT VALIDATION ===

    let root = ctx.accounts.root.key();
    let lock1 = ctx.accounts.lock1.key();
    let lock2 = ctx.accounts.lock2.key();
    validate_initialize(
        ctx.accounts.stake_pool.initialized,
        root,
        lock1,
        lock2,
        &commission_rates_bps,
    )?;

    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let pool_key = ctx.accounts.stake_pool.key();

    // === STATE INITIALIZATION ===

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.governor = ctx.accounts.governor.key();
    stake_pool.root = root;
    stake_pool.mint = ctx.accounts.mint.key();
    stake_pool.staking_vault = ctx.accounts.staking_vault.key();
    stake_pool.lock1 = lock1;
    stake_pool.lock2 = lock2;
    stake_pool.rewards = RewardAccumulator::new(now);
    stake_pool.commission_rates_bps = commission_rates_bps;
    stake_pool.total_staked = 0;
    stake_pool.staker_count = 0;
    stake_pool.total_promoted = 0;
    stake_pool.total_burned = 0;
    stake_pool.paused = false;
    stake_pool.initialized = true;
    stake_pool.created_at = now;
    stake_pool.last_updated = now;
    stake_pool.bump = ctx.bumps.stake_pool;
    stake_pool.mint_bump = ctx.bumps.mint;
    stake_pool.vault_bump = ctx.bumps.staking_vault;

    let root_info = &mut ctx.accounts.root_info;
    root_info.owner = root;
    root_info.stake_pool = pool_key;
    root_info.father = None;
    root_info.bump = ctx.bumps.root_info;

    let lock1_allocation = ctx.accounts.stake_pool.allocation_for(&lock1);
    let lock2_allocation = ctx.accounts.stake_pool.allocation_for(&lock2);
    let schedules = [
        (&mut ctx.accounts.lock1_schedule, lock1, lock1_allocation, ctx.bumps.lock1_schedule),
        (&mut ctx.accounts.lock2_schedule, lock2, lock2_allocation, ctx.bumps.lock2_schedule),
    ];
    for (schedule, beneficiary, allocation, bump) in schedules {
        schedule.beneficiary = beneficiary;
        schedule.stake_pool = pool_key;
        schedule.total_allocation = allocation;
        schedule.tranche = allocation / VESTING_TRANCHES as u64;
        schedule.init_time = now;
        schedule.tranches_released = 0;
        schedule.total_released = 0;
        schedule.last_claim_time = 0;
        schedule.bump = bump;
    }

    // === ROOT ALLOCATION ===

    mint_from_pool(
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.root_token_account.to_account_info(),
        ctx.accounts.stake_pool.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.stake_pool.bump,
        ROOT_INITIAL_ALLOCATION,
    )?;

    let stake_pool = &ctx.accounts.stake_pool;
    emit!(PoolInitialized {
        governor: stake_pool.governor,
        root,
        mint: stake_pool.mint,
        lock1,
        lock2,
        reward_rate: stake_pool.rewards.reward_rate,
        period_finish: stake_pool.rewards.period_finish,
    });

    msg!("Referral staking pool initialized");
    msg!("Governor: {}", stake_pool.governor);
    msg!("Root: {} (allocated {})", root, ROOT_INITIAL_ALLOCATION);
    msg!("Mint: {}", stake_pool.mint);
    msg!("Commission rates: {:?}bp", commission_rates_bps);
    msg!(
        "Created at {} (bumps: pool {}, mint {}, vault {})",
        stake_pool.created_at,
        stake_pool.bump,
        stake_pool.mint_bump,
        stake_pool.vault_bump
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_code(result: Result<()>) -> u32 {
        match result {
            Err(anchor_lang::error::Error::AnchorError(err)) => err.error_code_number,
            Err(err) => panic!("unexpected error: {err}"),
            Ok(()) => panic!("expected an error"),
        }
    }

    struct Keys {
        root: Pubkey,
        lock1: Pubkey,
        lock2: Pubkey,
    }

    fn keys() -> Keys {
        Keys {
            root: Pubkey::new_unique(),
            lock1: Pubkey::new_unique(),
            lock2: Pubkey::new_unique(),
        }
    }

    fn check(initialized: bool, keys: &Keys, rates: [u16; TIER_COUNT]) -> Result<()> {
        validate_initialize(initialized, keys.root, keys.lock1, keys.lock2, &rates)
    }

    #[test]
    fn fresh_pool_with_distinct_keys_passes() {
        assert!(check(false, &keys(), DEFAULT_COMMISSION_RATES_BPS).is_ok());
    }

    #[test]
    fn second_initialization_fails() {
        assert_eq!(
            error_code(check(true, &keys(), DEFAULT_COMMISSION_RATES_BPS)),
            u32::from(StakingError::AlreadyInitialized)
        );
    }

    #[test]
    fn beneficiaries_must_be_distinct_and_differ_from_root() {
        let mut same = keys();
        same.lock2 = same.lock1;
        assert_eq!(
            error_code(check(false, &same, DEFAULT_COMMISSION_RATES_BPS)),
            u32::from(StakingError::InvalidBeneficiary)
        );

        let mut root_lock = keys();
        root_lock.lock1 = root_lock.root;
        assert_eq!(
            error_code(check(false, &root_lock, DEFAULT_COMMISSION_RATES_BPS)),
            u32::from(StakingError::InvalidBeneficiary)
        );

        let mut root_lock = keys();
        root_lock.lock2 = root_lock.root;
        assert_eq!(
            error_code(check(false, &root_lock, DEFAULT_COMMISSION_RATES_BPS)),
            u32::from(StakingError::InvalidBeneficiary)
        );
    }

    #[test]
    fn rate_above_maximum_is_rejected() {
        let mut rates = DEFAULT_COMMISSION_RATES_BPS;
        rates[4] = MAX_COMMISSION_RATE_BPS + 1;
        assert_eq!(
            error_code(check(false, &keys(), rates)),
            u32::from(StakingError::CommissionRateTooHigh)
        );

        rates[4] = MAX_COMMISSION_RATE_BPS;
        assert!(check(false, &keys(), rates).is_ok());
    }

    #[test]
    fn repeated_call_reports_already_initialized_first() {
        let mut bad = keys();
        bad.lock2 = bad.lock1;
        assert_eq!(
            error_code(check(true, &bad, DEFAULT_COMMISSION_RATES_BPS)),
            u32::from(StakingError::AlreadyInitialized)
        );
    }
}
