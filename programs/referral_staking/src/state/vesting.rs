use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;

/// Cliff-then-monthly release of a fixed allocation to one reserved beneficiary.
#[account]
pub struct VestingSchedule {
    pub beneficiary: Pubkey,
    pub stake_pool: Pubkey,

    pub total_allocation: u64,
    pub tranche: u64,
    pub init_time: i64,

    pub tranches_released: u8,
    pub total_released: u64,
    pub last_claim_time: i64,

    pub bump: u8,
}

impl VestingSchedule {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 8 + 8 + 1 + 8 + 8 + 1;

    /// Tranches unlocked by `now`, capped at `VESTING_TRANCHES`.
    pub fn tranches_due(&self, now: i64) -> u8 {
        let elapsed = now.saturating_sub(self.init_time);
        if elapsed < VESTING_CLIFF {
            return 0;
        }
        let periods = (elapsed - VESTING_CLIFF) / VESTING_PERIOD + 1;
        periods.min(VESTING_TRANCHES as i64) as u8
    }

    /// Amount that may be claimed at `now`.
    pub fn releasable(&self, now: i64) -> Result<u64> {
        let pending = self.tranches_due(now).saturating_sub(self.tranches_released);
        Ok(self
            .tranche
            .checked_mul(pending as u64)
            .ok_or(StakingError::MathOverflow)?)
    }

    /// Mark every due tranche as released and return the amount to pay out.
    pub fn release(&mut self, now: i64) -> Result<u64> {
        let amount = self.releasable(now)?;
        require!(amount > 0, StakingError::NothingToRelease);

        self.tranches_released = self.tranches_due(now);
        self.total_released = self
            .total_released
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        self.last_claim_time = now;
        Ok(amount)
    }

    pub fn is_exhausted(&self) -> bool {
        self.tranches_released >= VESTING_TRANCHES
    }
}
