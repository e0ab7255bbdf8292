//! Error types for the Referral Staking program.
//!
//! This module defines all custom error codes that can be returned by the program.
//! Each error has a unique code and descriptive message.
//!
//! ## Error Code Ranges
//! - 6000-6009: Input validation errors
//! - 6010-6019: Funding/balance errors
//! - 6020-6029: Time/lifecycle errors
//! - 6030-6039: Math/overflow errors
//! - 6040-6049: Authorization errors
//! - 6050-6059: Account validation errors

use anchor_lang::prelude::*;

/// Custom error codes for the Referral Staking program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Input Validation Errors (6000-6009) ==========

    /// [6000] The invitor is the null key, the caller itself, or not linked to the referral forest.
    #[msg("Invalid invitor")]
    InvalidInvitor,

    /// [6001] Cannot stake zero tokens.
    #[msg("Cannot stake 0")]
    ZeroAmount,

    /// [6002] Stake amounts must be a multiple of 20 tokens.
    #[msg("Stake amount is not a multiple of 20 tokens")]
    NotUnitMultiple,

    /// [6003] The caller has no live order to withdraw.
    #[msg("Cannot withdraw 0")]
    ZeroWithdraw,

    /// [6004] Nothing is releasable from the vesting schedule right now.
    #[msg("Can not release 0")]
    NothingToRelease,

    /// [6005] Vesting beneficiaries must be distinct from each other and from root.
    #[msg("Vesting beneficiaries must be distinct and differ from root")]
    InvalidBeneficiary,

    /// [6006] A commission rate exceeds the maximum allowed limit (50%).
    #[msg("Commission rate exceeds maximum allowed value of 5000 basis points (50%)")]
    CommissionRateTooHigh,

    /// [6007] The reward cap must be non-zero and not below distributed rewards.
    #[msg("Reward cap must be non-zero and not below distributed rewards")]
    InvalidRewardCap,

    // ========== Funding/Balance Errors (6010-6019) ==========

    /// [6010] The caller cannot fund the stake from its token account.
    #[msg("Transfer failed: insufficient token balance")]
    TransferFailed,

    /// [6011] The vault does not hold enough tokens for the payout.
    #[msg("Insufficient balance for this operation")]
    InsufficientBalance,

    // ========== Time/Lifecycle Errors (6020-6029) ==========

    /// [6020] The order is still locked, or a live order blocks a new stake.
    #[msg("Order not expired")]
    OrderNotExpired,

    /// [6021] The pool has already been initialized.
    #[msg("Contract instance has already been initialized")]
    AlreadyInitialized,

    /// [6022] New stakes are paused by the governor.
    #[msg("Staking is currently paused")]
    StakingPaused,

    // ========== Math/Overflow Errors (6030-6039) ==========

    /// [6030] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6031] Arithmetic underflow occurred during calculation.
    #[msg("Arithmetic underflow occurred during calculation")]
    MathUnderflow,

    // ========== Authorization Errors (6040-6049) ==========

    /// [6040] Unauthorized - caller is not the governor.
    #[msg("Unauthorized: caller is not the pool governor")]
    Unauthorized,

    /// [6041] Unauthorized - signer is not a vesting beneficiary of this pool.
    #[msg("Unauthorized: signer is not the vesting beneficiary")]
    InvalidBeneficiarySigner,

    // ========== Account Validation Errors (6050-6059) ==========

    /// [6050] The provided mint does not match the pool's mint.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,

    /// [6051] The provided vault does not match the pool's staking vault.
    #[msg("Staking vault address mismatch")]
    VaultMismatch,

    /// [6052] The fee sink token account is not owned by the burn sink.
    #[msg("Fee sink token account must be owned by the incinerator")]
    InvalidSinkAccount,

    /// [6053] Fewer ancestor accounts were supplied than the referral walk needs.
    #[msg("Missing ancestor account for the referral walk")]
    MissingAncestorAccount,

    /// [6054] A supplied ancestor account is not the expected one.
    #[msg("Ancestor account does not match the referral chain")]
    AncestorMismatch,
}
