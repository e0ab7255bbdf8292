//! Token movements backing the staking ledger.
//!
//! Every balance change the program makes goes through one of these helpers:
//! pulling a stake into the vault, paying out of the vault, or minting new
//! tokens under the pool PDA's mint authority.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, MintTo, Transfer};

use crate::constants::STAKE_POOL_SEED;

/// Move `amount` from a user-owned token account into the staking vault.
pub fn pull_into_vault<'info>(
    from: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    owner: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    let cpi_accounts = Transfer {
        from,
        to: vault,
        authority: owner,
    };
    token::transfer(CpiContext::new(token_program, cpi_accounts), amount)
}

/// Move `amount` out of the staking vault, signed by the pool PDA.
pub fn pay_from_vault<'info>(
    vault: AccountInfo<'info>,
    to: AccountInfo<'info>,
    stake_pool: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    pool_bump: u8,
    amount: u64,
) -> Result<()> {
    let seeds: &[&[u8]] = &[STAKE_POOL_SEED, &[pool_bump]];
    let signer_seeds = &[seeds];

    let cpi_accounts = Transfer {
        from: vault,
        to,
        authority: stake_pool,
    };
    token::transfer(
        CpiContext::new_with_signer(token_program, cpi_accounts, signer_seeds),
        amount,
    )
}

/// Mint `amount` new tokens into `to`, signed by the pool PDA.
pub fn mint_from_pool<'info>(
    mint: AccountInfo<'info>,
    to: AccountInfo<'info>,
    stake_pool: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    pool_bump: u8,
    amount: u64,
) -> Result<()> {
    let seeds: &[&[u8]] = &[STAKE_POOL_SEED, &[pool_bump]];
    let signer_seeds = &[seeds];

    let cpi_accounts = MintTo {
        mint,
        to,
        authority: stake_pool,
    };
    token::mint_to(
        CpiContext::new_with_signer(token_program, cpi_accounts, signer_seeds),
        amount,
    )
}
