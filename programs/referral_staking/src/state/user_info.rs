use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::state::RewardAccumulator;

/// Tier slot and commission a stake was credited with at one ancestor.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PromotionRecord {
    pub ancestor: Pubkey,
    pub tier: u8,
    pub commission: u64,
}

impl PromotionRecord {
    pub const LEN: usize = 32 + 1 + 8;
}

/// The single stake order an account may hold. `amount == 0` means no live order.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StakeOrder {
    pub amount: u64,
    pub start_time: i64,
    pub expiry: i64,
    pub promotions: Vec<PromotionRecord>,
}

impl StakeOrder {
    pub const LEN: usize = 8 + 8 + 8 + (4 + PromotionRecord::LEN * MAX_PROMOTION_DEPTH);

    pub fn open(amount: u64, now: i64) -> Result<Self> {
        Ok(Self {
            amount,
            start_time: now,
            expiry: now
                .checked_add(LOCK_PERIOD)
                .ok_or(StakingError::MathOverflow)?,
            promotions: Vec::new(),
        })
    }

    pub fn is_live(&self) -> bool {
        self.amount > 0
    }

    pub fn is_matured(&self, now: i64) -> bool {
        now >= self.expiry
    }

    /// `ZeroWithdraw` without a live order, `OrderNotExpired` before `expiry`.
    pub fn ensure_withdrawable(&self, now: i64) -> Result<()> {
        require!(self.is_live(), StakingError::ZeroWithdraw);
        require!(self.is_matured(now), StakingError::OrderNotExpired);
        Ok(())
    }
}

#[account]
pub struct UserInfo {
    pub owner: Pubkey,
    pub stake_pool: Pubkey,

    pub father: Option<Pubkey>,
    pub levels: [u64; TIER_COUNT],
    pub filled: [u8; TIER_COUNT],
    pub promoted: u64,

    pub reward_per_token_paid: u128,
    pub rewards: u64,
    pub total_rewards_claimed: u64,

    pub order: StakeOrder,
    pub bump: u8,
}

impl UserInfo {
    pub const LEN: usize = 8
        + 32 + 32
        + (1 + 32)
        + 8 * TIER_COUNT
        + TIER_COUNT
        + 8
        + 16 + 8 + 8
        + StakeOrder::LEN
        + 1;

    /// Root or any account that already has a father.
    pub fn is_linked(&self, root: &Pubkey) -> bool {
        self.owner == *root || self.father.is_some()
    }

    /// Commissions are only paid to ancestors whose own order is live and still locked.
    pub fn earns_commission(&self, now: i64) -> bool {
        self.order.is_live() && !self.order.is_matured(now)
    }

    /// Next account up the referral chain, or `None` once root is reached.
    pub fn next_ancestor(&self, root: &Pubkey) -> Option<Pubkey> {
        if self.owner == *root {
            None
        } else {
            self.father
        }
    }

    /// Place a downline stake in the first tier with a free slot.
    ///
    /// Returns `None` when all tiers are full; the stake is then not counted here.
    pub fn occupy_slot(&mut self, amount: u64) -> Result<Option<u8>> {
        let Some(tier) = (0..TIER_COUNT).find(|&i| self.filled[i] < TIER_CAPACITIES[i]) else {
            return Ok(None);
        };

        self.levels[tier] = self.levels[tier]
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        self.filled[tier] += 1;
        Ok(Some(tier as u8))
    }

    /// Undo an `occupy_slot` (and its commission bookkeeping) recorded at stake time.
    pub fn release_slot(&mut self, record: &PromotionRecord, amount: u64) -> Result<()> {
        let tier = record.tier as usize;
        require!(tier < TIER_COUNT, StakingError::AncestorMismatch);

        self.levels[tier] = self.levels[tier]
            .checked_sub(amount)
            .ok_or(StakingError::MathUnderflow)?;
        self.filled[tier] = self.filled[tier]
            .checked_sub(1)
            .ok_or(StakingError::MathUnderflow)?;
        self.promoted = self.promoted.saturating_sub(record.commission);
        Ok(())
    }

    /// Fold everything accrued since the last sync into `rewards`.
    pub fn settle_rewards(&mut self, rewards: &RewardAccumulator) -> Result<()> {
        self.rewards = rewards.earned(self.order.amount, self.reward_per_token_paid, self.rewards)?;
        self.reward_per_token_paid = rewards.reward_per_token_stored;
        Ok(())
    }

    /// Settle and empty `rewards`, returning the part the reward cap still allows.
    ///
    /// The payout is booked against `rewards` right away; anything owed beyond
    /// the cap is dropped.
    pub fn take_reward(&mut self, rewards: &mut RewardAccumulator) -> Result<u64> {
        self.settle_rewards(rewards)?;

        let payout = rewards.claimable(self.rewards);
        self.rewards = 0;
        if payout == 0 {
            return Ok(0);
        }

        rewards.record_payout(payout)?;
        self.total_rewards_claimed = self
            .total_rewards_claimed
            .checked_add(payout)
            .ok_or(StakingError::MathOverflow)?;
        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_code<T>(result: Result<T>) -> u32 {
        match result {
            Err(anchor_lang::error::Error::AnchorError(err)) => err.error_code_number,
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    fn user() -> UserInfo {
        UserInfo {
            owner: Pubkey::new_unique(),
            stake_pool: Pubkey::new_unique(),
            father: None,
            levels: [0; TIER_COUNT],
            filled: [0; TIER_COUNT],
            promoted: 0,
            reward_per_token_paid: 0,
            rewards: 0,
            total_rewards_claimed: 0,
            order: StakeOrder::default(),
            bump: 0,
        }
    }

    #[test]
    fn slots_fill_tiers_in_order_then_overflow() {
        let mut info = user();
        let tiers: Vec<Option<u8>> = (0..17).map(|_| info.occupy_slot(10).unwrap()).collect();

        assert_eq!(tiers[0], Some(0));
        assert_eq!(&tiers[1..3], &[Some(1), Some(1)]);
        assert_eq!(&tiers[3..5], &[Some(2), Some(2)]);
        assert!(tiers[5..10].iter().all(|t| *t == Some(3)));
        assert!(tiers[10..15].iter().all(|t| *t == Some(4)));
        assert_eq!(&tiers[15..], &[None, None]);
        assert_eq!(info.levels, [10, 20, 20, 50, 50]);
        assert_eq!(info.filled, TIER_CAPACITIES);
    }

    #[test]
    fn released_slot_is_reused_by_next_stake() {
        let mut info = user();
        info.occupy_slot(10).unwrap();
        info.occupy_slot(10).unwrap();
        info.promoted = 7;

        let record = PromotionRecord {
            ancestor: info.owner,
            tier: 0,
            commission: 7,
        };
        info.release_slot(&record, 10).unwrap();
        assert_eq!(info.levels, [0, 10, 0, 0, 0]);
        assert_eq!(info.promoted, 0);

        assert_eq!(info.occupy_slot(30).unwrap(), Some(0));
        assert_eq!(info.levels, [30, 10, 0, 0, 0]);
    }

    #[test]
    fn releasing_an_empty_tier_underflows() {
        let mut info = user();
        let record = PromotionRecord {
            ancestor: info.owner,
            tier: 2,
            commission: 0,
        };
        assert!(info.release_slot(&record, 10).is_err());
    }

    #[test]
    fn commission_requires_live_unexpired_order() {
        let mut info = user();
        assert!(!info.earns_commission(0));

        info.order = StakeOrder::open(STAKE_UNIT, 100).unwrap();
        assert!(info.earns_commission(100));
        assert!(info.earns_commission(100 + LOCK_PERIOD - 1));
        assert!(!info.earns_commission(100 + LOCK_PERIOD));
    }

    #[test]
    fn walk_stops_at_root() {
        let root = Pubkey::new_unique();
        let mut info = user();
        info.father = Some(Pubkey::new_unique());
        assert_eq!(info.next_ancestor(&root), info.father);

        info.owner = root;
        assert_eq!(info.next_ancestor(&root), None);
        assert!(info.is_linked(&root));
    }

    #[test]
    fn settle_moves_accrual_into_rewards() {
        let mut acc = RewardAccumulator::new(0);
        let mut info = user();
        info.order = StakeOrder::open(200 * ONE_TOKEN, 0).unwrap();

        acc.update(SECONDS_PER_DAY, info.order.amount).unwrap();
        info.settle_rewards(&acc).unwrap();

        assert_eq!(info.rewards, acc.reward_rate * SECONDS_PER_DAY as u64);
        assert_eq!(info.reward_per_token_paid, acc.reward_per_token_stored);
        assert_eq!(acc.earned(info.order.amount, info.reward_per_token_paid, 0).unwrap(), 0);
    }

    #[test]
    fn withdraw_needs_a_live_order() {
        let order = StakeOrder::default();
        assert_eq!(
            error_code(order.ensure_withdrawable(i64::MAX)),
            u32::from(StakingError::ZeroWithdraw)
        );
    }

    #[test]
    fn withdraw_waits_for_expiry() {
        let order = StakeOrder::open(STAKE_UNIT, 1_000).unwrap();
        assert_eq!(
            error_code(order.ensure_withdrawable(1_000)),
            u32::from(StakingError::OrderNotExpired)
        );
        assert_eq!(
            error_code(order.ensure_withdrawable(order.expiry - 1)),
            u32::from(StakingError::OrderNotExpired)
        );
        assert!(order.ensure_withdrawable(order.expiry).is_ok());
    }

    #[test]
    fn take_reward_empties_the_position() {
        let mut acc = RewardAccumulator::new(0);
        let mut info = user();
        info.order = StakeOrder::open(200 * ONE_TOKEN, 0).unwrap();

        let now = 10 * SECONDS_PER_DAY;
        acc.update(now, info.order.amount).unwrap();
        let owed = acc.earned(info.order.amount, info.reward_per_token_paid, 0).unwrap();

        let paid = info.take_reward(&mut acc).unwrap();
        assert_eq!(paid, owed);
        assert_eq!(info.rewards, 0);
        assert_eq!(info.total_rewards_claimed, paid);
        assert_eq!(acc.total_distributed, paid);

        let later = acc.projected(now, info.order.amount).unwrap();
        assert_eq!(
            later.earned(info.order.amount, info.reward_per_token_paid, info.rewards).unwrap(),
            0
        );
    }

    #[test]
    fn take_reward_clamps_to_cap_and_forfeits_the_rest() {
        let mut acc = RewardAccumulator::new(0);
        acc.reward_cap = 1_000;
        let mut info = user();
        info.order = StakeOrder::open(200 * ONE_TOKEN, 0).unwrap();

        acc.update(SECONDS_PER_DAY, info.order.amount).unwrap();
        assert_eq!(info.take_reward(&mut acc).unwrap(), 1_000);
        assert_eq!(info.rewards, 0);
        assert!(acc.is_exhausted());
        assert_eq!(acc.reward_rate, 0);

        assert_eq!(info.take_reward(&mut acc).unwrap(), 0);
        assert_eq!(info.total_rewards_claimed, 1_000);
    }

    #[test]
    fn take_reward_without_stake_is_zero() {
        let mut acc = RewardAccumulator::new(0);
        let mut info = user();
        acc.update(SECONDS_PER_DAY, 0).unwrap();

        assert_eq!(info.take_reward(&mut acc).unwrap(), 0);
        assert_eq!(acc.total_distributed, 0);
    }
}
