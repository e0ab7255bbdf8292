//! Claim coin instruction handler.
//!
//! Releases every unlocked vesting tranche of the signing beneficiary.

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::CoinReleased;
use crate::instructions::ledger::mint_from_pool;
use crate::state::{StakePool, VestingSchedule};

/// Accounts required for claiming vested tokens.
#[derive(Accounts)]
pub struct ClaimCoin<'info> {
    /// One of the two vesting beneficiaries.
    #[account(
        mut,
        constraint = stake_pool.is_vesting_beneficiary(&beneficiary.key())
            @ StakingError::InvalidBeneficiarySigner
    )]
    pub beneficiary: Signer<'info>,

    /// The stake pool.
    #[account(
        seeds = [STAKE_POOL_SEED],
        bump = stake_pool.bump,
        has_one = mint @ StakingError::MintMismatch
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// The beneficiary's vesting schedule.
    #[account(
        mut,
        seeds = [
            VESTING_SEED,
            stake_pool.key().as_ref(),
            &[stake_pool.vesting_slot(&beneficiary.key())]
        ],
        bump = vesting_schedule.bump,
        constraint = vesting_schedule.beneficiary == beneficiary.key()
            @ StakingError::InvalidBeneficiarySigner
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,

    /// The pool mint.
    #[account(mut)]
    pub mint: Box<Account<'info, Mint>>,

    /// Beneficiary's associated token account (created on first claim).
    #[account(
        init_if_needed,
        payer = beneficiary,
        associated_token::mint = mint,
        associated_token::authority = beneficiary
    )]
    pub beneficiary_token_account: Box<Account<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}

/// Release all tranches unlocked so far.
///
/// # Arguments
/// * `ctx` - ClaimCoin accounts context
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<ClaimCoin>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let vesting_schedule = &mut ctx.accounts.vesting_schedule;
    let amount = vesting_schedule.release(now)?;

    mint_from_pool(
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.beneficiary_token_account.to_account_info(),
        ctx.accounts.stake_pool.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.stake_pool.bump,
        amount,
    )?;

    let vesting_schedule = &ctx.accounts.vesting_schedule;
    emit!(CoinReleased {
        beneficiary: vesting_schedule.beneficiary,
        amount,
        tranches_released: vesting_schedule.tranches_released,
    });

    msg!(
        "Released {} tokens ({}/{} tranches)",
        amount,
        vesting_schedule.tranches_released,
        VESTING_TRANCHES
    );
    msg!(
        "Total released: {} of {}",
        vesting_schedule.total_released,
        vesting_schedule.total_allocation
    );
    if vesting_schedule.is_exhausted() {
        msg!("Vesting schedule fully released");
    }

    Ok(())
}
