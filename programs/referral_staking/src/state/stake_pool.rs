use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::RewardAccumulator;

#[account]
pub struct StakePool {
    pub governor: Pubkey,
    pub root: Pubkey,
    pub mint: Pubkey,
    pub staking_vault: Pubkey,
    pub lock1: Pubkey,
    pub lock2: Pubkey,

    pub rewards: RewardAccumulator,
    pub commission_rates_bps: [u16; TIER_COUNT],

    pub total_staked: u64,
    pub staker_count: u64,
    pub total_promoted: u64,
    pub total_burned: u64,

    pub paused: bool,
    pub initialized: bool,

    pub last_updated: i64,
    pub created_at: i64,

    pub mint_bump: u8,
    pub vault_bump: u8,
    pub bump: u8,
}

impl StakePool {
    pub const LEN: usize = 8
        + (32 * 6)
        + RewardAccumulator::LEN
        + (2 * TIER_COUNT)
        + (8 * 4)
        + 2
        + (8 * 2)
        + 3;

    pub fn is_vesting_beneficiary(&self, key: &Pubkey) -> bool {
        *key == self.lock1 || *key == self.lock2
    }

    pub fn allocation_for(&self, beneficiary: &Pubkey) -> u64 {
        if *beneficiary == self.lock1 {
            LOCK1_ALLOCATION
        } else if *beneficiary == self.lock2 {
            LOCK2_ALLOCATION
        } else {
            0
        }
    }

    /// Seed slot of the vesting schedule held by `beneficiary`.
    pub fn vesting_slot(&self, beneficiary: &Pubkey) -> u8 {
        if *beneficiary == self.lock2 {
            LOCK2_SLOT
        } else {
            LOCK1_SLOT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> StakePool {
        StakePool {
            governor: Pubkey::new_unique(),
            root: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            staking_vault: Pubkey::new_unique(),
            lock1: Pubkey::new_unique(),
            lock2: Pubkey::new_unique(),
            rewards: RewardAccumulator::new(0),
            commission_rates_bps: DEFAULT_COMMISSION_RATES_BPS,
            total_staked: 0,
            staker_count: 0,
            total_promoted: 0,
            total_burned: 0,
            paused: false,
            initialized: true,
            last_updated: 0,
            created_at: 0,
            mint_bump: 0,
            vault_bump: 0,
            bump: 0,
        }
    }

    #[test]
    fn beneficiaries_map_to_their_slot_and_allocation() {
        let pool = pool();
        assert_eq!(pool.vesting_slot(&pool.lock1), LOCK1_SLOT);
        assert_eq!(pool.vesting_slot(&pool.lock2), LOCK2_SLOT);
        assert_eq!(pool.allocation_for(&pool.lock1), LOCK1_ALLOCATION);
        assert_eq!(pool.allocation_for(&pool.lock2), LOCK2_ALLOCATION);
    }

    #[test]
    fn outsiders_are_not_beneficiaries() {
        let pool = pool();
        let outsider = Pubkey::new_unique();
        assert!(!pool.is_vesting_beneficiary(&outsider));
        assert!(!pool.is_vesting_beneficiary(&pool.root));
        assert_eq!(pool.allocation_for(&outsider), 0);
    }
}
