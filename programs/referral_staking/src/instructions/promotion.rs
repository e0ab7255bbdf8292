//! Promotion engine.
//!
//! Walks the referral chain above a staker, assigning the stake to a tier
//! slot of every ancestor and paying commission to ancestors that are
//! themselves locked in. The assignment is persisted on the staker's order
//! as `PromotionRecord`s and replayed in reverse when the order is withdrawn.
//!
//! Ancestors arrive through `remaining_accounts`:
//! - stake: `[user_info, token_account]` per ancestor, nearest first
//! - withdraw: `[user_info]` per recorded ancestor, in record order

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::CommissionPaid;
use crate::instructions::ledger::mint_from_pool;
use crate::state::{PromotionRecord, StakePool, UserInfo};

/// Commission on `amount`, with the base capped at the ancestor's own stake.
pub fn commission_for(amount: u64, ancestor_stake: u64, rate_bps: u16) -> Result<u64> {
    let base = amount.min(ancestor_stake) as u128;
    let commission = base
        .checked_mul(rate_bps as u128)
        .ok_or(StakingError::MathOverflow)?
        / BASIS_POINTS_DENOMINATOR as u128;
    u64::try_from(commission).map_err(|_| error!(StakingError::MathOverflow))
}

/// Count a downline stake at one ancestor. `None` when the ancestor has no free slot.
pub fn credit_ancestor(
    ancestor: &mut UserInfo,
    amount: u64,
    rates_bps: &[u16; TIER_COUNT],
    now: i64,
) -> Result<Option<PromotionRecord>> {
    let Some(tier) = ancestor.occupy_slot(amount)? else {
        return Ok(None);
    };

    let commission = if ancestor.earns_commission(now) {
        commission_for(amount, ancestor.order.amount, rates_bps[tier as usize])?
    } else {
        0
    };
    ancestor.promoted = ancestor
        .promoted
        .checked_add(commission)
        .ok_or(StakingError::MathOverflow)?;

    Ok(Some(PromotionRecord {
        ancestor: ancestor.owner,
        tier,
        commission,
    }))
}

pub struct StakePromotion {
    pub records: Vec<PromotionRecord>,
    pub total_commission: u64,
}

/// Credit every ancestor above `staker`, starting at `first_ancestor`.
///
/// With `linking` set, `first_ancestor` is a fresh invitor and any problem
/// with its account is reported as `InvalidInvitor`.
#[allow(clippy::too_many_arguments)]
pub fn on_stake<'info>(
    remaining_accounts: &'info [AccountInfo<'info>],
    stake_pool: &Account<'info, StakePool>,
    mint: &Account<'info, Mint>,
    token_program: &Program<'info, Token>,
    staker: Pubkey,
    first_ancestor: Pubkey,
    linking: bool,
    amount: u64,
    now: i64,
) -> Result<StakePromotion> {
    let mut records = Vec::new();
    let mut total_commission: u64 = 0;
    let mut accounts = remaining_accounts.iter();
    let mut expected = Some(first_ancestor);
    let mut hops = 0;

    while let Some(ancestor_key) = expected {
        if hops >= MAX_PROMOTION_DEPTH {
            msg!("Promotion walk stopped at depth guard ({})", MAX_PROMOTION_DEPTH);
            break;
        }

        let first_hop = hops == 0;
        let hop_error = |fallback: StakingError| {
            if linking && first_hop {
                error!(StakingError::InvalidInvitor)
            } else {
                error!(fallback)
            }
        };

        let info_account = accounts
            .next()
            .ok_or_else(|| hop_error(StakingError::MissingAncestorAccount))?;
        let token_account = accounts
            .next()
            .ok_or_else(|| hop_error(StakingError::MissingAncestorAccount))?;

        require!(info_account.is_writable, StakingError::AncestorMismatch);
        let mut ancestor = Account::<UserInfo>::try_from(info_account)
            .map_err(|_| hop_error(StakingError::AncestorMismatch))?;
        if ancestor.owner != ancestor_key || ancestor.stake_pool != stake_pool.key() {
            return Err(hop_error(StakingError::AncestorMismatch));
        }
        if first_hop && !ancestor.is_linked(&stake_pool.root) {
            return Err(error!(StakingError::InvalidInvitor));
        }

        let ancestor_token = Account::<TokenAccount>::try_from(token_account)?;
        require_keys_eq!(ancestor_token.mint, stake_pool.mint, StakingError::MintMismatch);
        require_keys_eq!(ancestor_token.owner, ancestor_key, StakingError::AncestorMismatch);

        if let Some(record) = credit_ancestor(
            &mut ancestor,
            amount,
            &stake_pool.commission_rates_bps,
            now,
        )? {
            if record.commission > 0 {
                mint_from_pool(
                    mint.to_account_info(),
                    token_account.clone(),
                    stake_pool.to_account_info(),
                    token_program.to_account_info(),
                    stake_pool.bump,
                    record.commission,
                )?;
                total_commission = total_commission
                    .checked_add(record.commission)
                    .ok_or(StakingError::MathOverflow)?;

                emit!(CommissionPaid {
                    ancestor: ancestor_key,
                    staker,
                    tier: record.tier,
                    commission: record.commission,
                });
            }
            records.push(record);
        }

        expected = ancestor.next_ancestor(&stake_pool.root);
        ancestor.exit(&crate::ID)?;
        hops += 1;
    }

    Ok(StakePromotion {
        records,
        total_commission,
    })
}

/// Reverse the tier and commission bookkeeping of a withdrawn order.
pub fn on_withdraw<'info>(
    remaining_accounts: &'info [AccountInfo<'info>],
    stake_pool: &Pubkey,
    records: &[PromotionRecord],
    amount: u64,
) -> Result<()> {
    let mut accounts = remaining_accounts.iter();

    for record in records {
        let info_account = accounts
            .next()
            .ok_or(StakingError::MissingAncestorAccount)?;
        require!(info_account.is_writable, StakingError::AncestorMismatch);

        let mut ancestor = Account::<UserInfo>::try_from(info_account)?;
        require_keys_eq!(ancestor.owner, record.ancestor, StakingError::AncestorMismatch);
        require_keys_eq!(ancestor.stake_pool, *stake_pool, StakingError::AncestorMismatch);

        ancestor.release_slot(record, amount)?;
        ancestor.exit(&crate::ID)?;
    }

    Ok(())
}
