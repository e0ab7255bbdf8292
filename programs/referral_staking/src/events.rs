use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track staking activity
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when the pool is initialized.
#[event]
pub struct PoolInitialized {
    pub governor: Pubkey,
    pub root: Pubkey,
    pub mint: Pubkey,
    pub lock1: Pubkey,
    pub lock2: Pubkey,
    /// Initial emission rate in base units per second.
    pub reward_rate: u64,
    /// End of the first halving period.
    pub period_finish: i64,
}

/// Emitted when a user opens a stake order.
#[event]
pub struct Staked {
    pub user: Pubkey,
    pub amount: u64,
}

/// Emitted when a matured order is withdrawn. `amount` is the full order size, fee included.
#[event]
pub struct Withdrawn {
    pub user: Pubkey,
    pub amount: u64,
}

/// Emitted for each leg of a withdrawal payout (fee to the sink, remainder to the owner).
#[event]
pub struct TokensTransferred {
    pub from: Pubkey,
    pub to: Pubkey,
    pub value: u64,
}

/// Emitted when accrued staking rewards are paid out.
#[event]
pub struct RewardPaid {
    pub user: Pubkey,
    pub reward: u64,
}

/// Emitted when an ancestor is paid commission for a downline stake.
#[event]
pub struct CommissionPaid {
    pub ancestor: Pubkey,
    pub staker: Pubkey,
    /// Tier slot (0-based) the stake was counted in.
    pub tier: u8,
    pub commission: u64,
}

/// Emitted when a vesting beneficiary claims unlocked tranches.
#[event]
pub struct CoinReleased {
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub tranches_released: u8,
}
