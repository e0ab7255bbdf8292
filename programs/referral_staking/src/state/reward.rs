use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;

/// Pool-wide reward-per-token accumulator with a halving emission clock.
///
/// The accumulator is refreshed lazily at the start of every mutating
/// instruction. Crossing `period_finish` halves the emission rate and pushes
/// the boundary out by one `REWARD_DURATION`; several boundaries may be
/// crossed in one refresh, each segment accruing at its own rate.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardAccumulator {
    /// Emission rate in base units per second.
    pub reward_rate: u64,
    /// End of the current halving period.
    pub period_finish: i64,
    /// Accumulated reward per staked base unit, scaled by `PRECISION`.
    pub reward_per_token_stored: u128,
    /// Last time `reward_per_token_stored` was brought forward.
    pub last_update_time: i64,
    /// Rewards actually paid out so far.
    pub total_distributed: u64,
    /// Hard limit on `total_distributed`.
    pub reward_cap: u64,
}

impl RewardAccumulator {
    pub const LEN: usize = 8 + 8 + 16 + 8 + 8 + 8;

    pub fn new(start_time: i64) -> Self {
        Self {
            reward_rate: INITIAL_REWARD / REWARD_DURATION as u64,
            period_finish: start_time + REWARD_DURATION,
            reward_per_token_stored: 0,
            last_update_time: start_time,
            total_distributed: 0,
            reward_cap: TOTAL_REWARD_CAP,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.total_distributed >= self.reward_cap
    }

    /// Bring the accumulator forward to `now`, halving at every period boundary crossed.
    pub fn update(&mut self, now: i64, total_staked: u64) -> Result<()> {
        if self.is_exhausted() {
            self.reward_rate = 0;
        }

        while now >= self.period_finish {
            self.accrue(self.period_finish, total_staked)?;
            self.halve()?;
        }

        self.accrue(now, total_staked)
    }

    /// Copy of the accumulator as it would look after `update(now, total_staked)`.
    pub fn projected(&self, now: i64, total_staked: u64) -> Result<Self> {
        let mut projected = *self;
        projected.update(now, total_staked)?;
        Ok(projected)
    }

    /// Rewards owed to a position of `staked` tokens that last synced at `paid`.
    pub fn earned(&self, staked: u64, paid: u128, pending: u64) -> Result<u64> {
        let delta = self
            .reward_per_token_stored
            .checked_sub(paid)
            .ok_or(StakingError::MathUnderflow)?;

        let accrued = (staked as u128)
            .checked_mul(delta)
            .ok_or(StakingError::MathOverflow)?
            / PRECISION;
        let accrued = u64::try_from(accrued).map_err(|_| StakingError::MathOverflow)?;

        Ok(pending
            .checked_add(accrued)
            .ok_or(StakingError::MathOverflow)?)
    }

    /// Portion of `owed` that can still be paid without breaching the cap.
    pub fn claimable(&self, owed: u64) -> u64 {
        owed.min(self.reward_cap.saturating_sub(self.total_distributed))
    }

    pub fn record_payout(&mut self, amount: u64) -> Result<()> {
        self.total_distributed = self
            .total_distributed
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        if self.is_exhausted() {
            self.reward_rate = 0;
        }
        Ok(())
    }

    fn halve(&mut self) -> Result<()> {
        self.reward_rate = if self.is_exhausted() {
            0
        } else {
            self.reward_rate / 2
        };
        self.period_finish = self
            .period_finish
            .checked_add(REWARD_DURATION)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    fn accrue(&mut self, until: i64, total_staked: u64) -> Result<()> {
        if until <= self.last_update_time {
            return Ok(());
        }

        if total_staked > 0 && self.reward_rate > 0 {
            let elapsed = (until - self.last_update_time) as u128;
            let increment = (self.reward_rate as u128)
                .checked_mul(elapsed)
                .ok_or(StakingError::MathOverflow)?
                .checked_mul(PRECISION)
                .ok_or(StakingError::MathOverflow)?
                / total_staked as u128;
            self.reward_per_token_stored = self
                .reward_per_token_stored
                .checked_add(increment)
                .ok_or(StakingError::MathOverflow)?;
        }

        self.last_update_time = until;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAKE: u64 = 200 * ONE_TOKEN;
    const WEEK: i64 = 7 * SECONDS_PER_DAY;

    #[test]
    fn initial_rate_is_floor_of_first_period_emission() {
        let acc = RewardAccumulator::new(1_000);
        assert_eq!(acc.reward_rate, 106_666_666);
        assert_eq!(acc.period_finish, 1_000 + REWARD_DURATION);
        assert_eq!(acc.reward_cap, TOTAL_REWARD_CAP);
    }

    #[test]
    fn no_accrual_without_stake_but_clock_advances() {
        let mut acc = RewardAccumulator::new(0);
        acc.update(WEEK, 0).unwrap();
        assert_eq!(acc.reward_per_token_stored, 0);
        assert_eq!(acc.last_update_time, WEEK);
    }

    #[test]
    fn single_staker_earns_full_emission() {
        let mut acc = RewardAccumulator::new(0);
        acc.update(WEEK, STAKE).unwrap();
        let earned = acc.earned(STAKE, 0, 0).unwrap();
        assert_eq!(earned, 106_666_666 * WEEK as u64);
    }

    #[test]
    fn two_equal_stakers_split_emission() {
        let mut acc = RewardAccumulator::new(0);
        acc.update(WEEK, 2 * STAKE).unwrap();
        let each = acc.earned(STAKE, 0, 0).unwrap();
        assert_eq!(each, 106_666_666 * WEEK as u64 / 2);
    }

    #[test]
    fn halving_fires_once_per_elapsed_period() {
        let mut acc = RewardAccumulator::new(0);
        acc.update(2 * REWARD_DURATION + 10, STAKE).unwrap();

        assert_eq!(acc.reward_rate, 26_666_666);
        assert_eq!(acc.period_finish, 3 * REWARD_DURATION);

        let expected = 106_666_666 * REWARD_DURATION as u64
            + 53_333_333 * REWARD_DURATION as u64
            + 26_666_666 * 10;
        assert_eq!(acc.earned(STAKE, 0, 0).unwrap(), expected);
    }

    #[test]
    fn halving_is_idempotent_within_a_period() {
        let mut acc = RewardAccumulator::new(0);
        acc.update(REWARD_DURATION, STAKE).unwrap();
        let after_first = acc;
        acc.update(REWARD_DURATION, STAKE).unwrap();
        assert_eq!(acc, after_first);
        assert_eq!(acc.reward_rate, 53_333_333);
    }

    #[test]
    fn exhausted_cap_stops_emission() {
        let mut acc = RewardAccumulator::new(0);
        acc.record_payout(TOTAL_REWARD_CAP).unwrap();
        assert_eq!(acc.reward_rate, 0);

        acc.update(WEEK, STAKE).unwrap();
        assert_eq!(acc.reward_per_token_stored, 0);

        acc.update(REWARD_DURATION + 1, STAKE).unwrap();
        assert_eq!(acc.reward_rate, 0);
        assert_eq!(acc.period_finish, 2 * REWARD_DURATION);
    }

    #[test]
    fn claimable_is_clamped_to_remaining_cap() {
        let mut acc = RewardAccumulator::new(0);
        acc.record_payout(TOTAL_REWARD_CAP - 5).unwrap();
        assert_eq!(acc.claimable(100), 5);
        assert_eq!(acc.claimable(3), 3);
    }

    #[test]
    fn projection_leaves_accumulator_untouched() {
        let acc = RewardAccumulator::new(0);
        let projected = acc.projected(WEEK, STAKE).unwrap();
        assert_eq!(acc.last_update_time, 0);
        assert_eq!(projected.last_update_time, WEEK);
        assert!(projected.reward_per_token_stored > 0);
    }

    #[test]
    fn earned_never_decreases_between_refreshes() {
        let mut acc = RewardAccumulator::new(0);
        let mut last = 0;
        for step in 1..=12 {
            acc.update(step * 90 * SECONDS_PER_DAY, STAKE).unwrap();
            let earned = acc.earned(STAKE, 0, 0).unwrap();
            assert!(earned >= last);
            last = earned;
        }
    }
}
