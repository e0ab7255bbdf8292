//! # Referral Staking Program
//!
//! A single-token staking program with a referral forest on top:
//!
//! - **Orders**: one 30-day stake order per account, in multiples of 20 tokens
//! - **Rewards**: a pool-wide emission that halves every three years, capped in total
//! - **Promotion**: each stake is counted in a tier slot of up to 20 ancestors,
//!   who are minted a commission while their own order is live
//! - **Vesting**: two reserved beneficiaries unlock five monthly tranches after a cliff
//!
//! ## Features
//! - Reward-per-token accumulation, settled lazily on every mutating call
//! - 3% withdrawal fee sent to the incinerator
//! - Governor controls for pausing, commission rates and the reward cap
//! - Safe math with overflow protection

use anchor_lang::prelude::*;

declare_id!("CrhBZoWEELqKLwxznDJ5ntBwtqxCHiNKNAVxw9NSahiS");

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;

#[program]
pub mod referral_staking {
    use super::*;

    /// Initializes the pool, its mint and vault, the root account and both
    /// vesting schedules, and mints the root allocation.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `commission_rates_bps` - Commission rate per tier (basis points, e.g. 1000 = 10%)
    ///
    /// # Errors
    /// Returns an error if:
    /// - The pool is already initialized
    /// - The vesting beneficiaries are equal or equal to root
    /// - A commission rate exceeds the maximum
    pub fn initialize(
        ctx: Context<Initialize>,
        commission_rates_bps: [u16; 5],
    ) -> Result<()> {
        instructions::initialize::handler(ctx, commission_rates_bps)
    }

    /// Opens a stake order, linking the caller under `invitor` on its first stake.
    ///
    /// Remaining accounts: `[user_info, token_account]` per ancestor, nearest first.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for staking
    /// * `amount` - Amount to stake, a multiple of 20 tokens
    /// * `invitor` - Referrer; ignored once the caller has a father
    ///
    /// # Errors
    /// Returns an error if:
    /// - The invitor is null, the caller itself, or not linked
    /// - Amount is zero or not a multiple of 20 tokens
    /// - Staking is paused
    /// - Insufficient balance
    /// - The caller already has a live order
    pub fn stake<'info>(
        ctx: Context<'_, '_, 'info, 'info, Stake<'info>>,
        amount: u64,
        invitor: Pubkey,
    ) -> Result<()> {
        instructions::stake::handler(ctx, amount, invitor)
    }

    /// Withdraws the caller's matured order, 3% of it going to the burn sink.
    ///
    /// Remaining accounts: `user_info` per promotion record of the order.
    ///
    /// # Errors
    /// Returns an error if:
    /// - There is no live order
    /// - The order has not expired
    pub fn withdraw<'info>(ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>) -> Result<()> {
        instructions::withdraw::handler(ctx)
    }

    /// Mints the caller's accrued rewards. Claiming nothing is a no-op.
    pub fn get_reward(ctx: Context<GetReward>) -> Result<()> {
        instructions::get_reward::handler(ctx)
    }

    /// Returns the rewards `user` has earned up to now.
    pub fn earned(ctx: Context<Earned>, user: Pubkey) -> Result<u64> {
        instructions::views::earned_handler(ctx, user)
    }

    /// Releases the signing beneficiary's unlocked vesting tranches.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The signer is not a vesting beneficiary
    /// - Nothing is releasable yet
    pub fn claim_coin(ctx: Context<ClaimCoin>) -> Result<()> {
        instructions::claim_coin::handler(ctx)
    }

    /// Returns the amount `beneficiary` could release now.
    pub fn check_release(ctx: Context<CheckRelease>, beneficiary: Pubkey) -> Result<u64> {
        instructions::views::check_release_handler(ctx, beneficiary)
    }

    /// Governor function to pause or unpause staking.
    ///
    /// # Errors
    /// Returns an error if caller is not the governor.
    pub fn set_paused(ctx: Context<GovernorControl>, paused: bool) -> Result<()> {
        instructions::admin::set_paused_handler(ctx, paused)
    }

    /// Governor function to replace the per-tier commission rates.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the governor
    /// - A rate exceeds the maximum
    pub fn adjust_commission_rates(
        ctx: Context<GovernorControl>,
        rates_bps: [u16; 5],
    ) -> Result<()> {
        instructions::admin::adjust_commission_rates_handler(ctx, rates_bps)
    }

    /// Governor function to update the total reward cap.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the governor
    /// - New cap is zero or below already distributed rewards
    pub fn update_reward_cap(ctx: Context<GovernorControl>, new_cap: u64) -> Result<()> {
        instructions::admin::update_reward_cap_handler(ctx, new_cap)
    }

    /// Governor function to hand the role to a new address.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the current governor
    /// - New governor is the default key
    pub fn transfer_governor(ctx: Context<GovernorControl>, new_governor: Pubkey) -> Result<()> {
        instructions::admin::transfer_governor_handler(ctx, new_governor)
    }
}
