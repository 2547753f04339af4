//! Per-organization balances for the native and token asset classes.
//!
//! Balances hold escrowed funds that have been deposited but not yet
//! allocated. Allocation debits them; claims pay out of the contract's
//! holdings without touching them again.

use soroban_sdk::{token, Address, Env};

use crate::types::{AssetClass, DataKey, DonationEvents, LedgerStats};
use crate::DonationError;

/// Returns the token client backing `asset`.
pub fn asset_client<'a>(
    env: &'a Env,
    asset: AssetClass,
) -> Result<token::Client<'a>, DonationError> {
    let key = match asset {
        AssetClass::Native => DataKey::NativeAsset,
        AssetClass::Token => DataKey::Token,
    };
    let address: Address = env
        .storage()
        .instance()
        .get(&key)
        .ok_or(DonationError::NotInitialized)?;
    Ok(token::Client::new(env, &address))
}

pub fn balance(env: &Env, org: &Address, asset: AssetClass) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(org.clone(), asset))
        .unwrap_or(0)
}

fn set_balance(env: &Env, org: &Address, asset: AssetClass, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Balance(org.clone(), asset), &amount);
}

pub fn stats(env: &Env, asset: AssetClass) -> LedgerStats {
    env.storage()
        .instance()
        .get(&DataKey::Stats(asset))
        .unwrap_or_default()
}

fn update_stats(env: &Env, asset: AssetClass, update: impl FnOnce(&mut LedgerStats)) {
    let mut current = stats(env, asset);
    update(&mut current);
    env.storage().instance().set(&DataKey::Stats(asset), &current);
}

/// Moves `amount` of `asset` from `org` into escrow and credits its balance.
///
/// The caller must already have checked that `org` is registered and has
/// authorized the call.
pub fn deposit(
    env: &Env,
    org: &Address,
    asset: AssetClass,
    amount: i128,
) -> Result<i128, DonationError> {
    let client = asset_client(env, asset)?;
    match client.try_transfer(org, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => {}
        _ => return Err(DonationError::TransferFailed),
    }

    let new_balance = balance(env, org, asset)
        .checked_add(amount)
        .ok_or(DonationError::AmountOverflow)?;
    set_balance(env, org, asset, new_balance);
    update_stats(env, asset, |s| {
        s.deposited = s.deposited.saturating_add(amount);
    });

    DonationEvents::deposit(env, org, asset, amount, new_balance);

    Ok(new_balance)
}

/// Subtracts `amount` from the balance of `org`.
pub fn debit(
    env: &Env,
    org: &Address,
    asset: AssetClass,
    amount: i128,
) -> Result<i128, DonationError> {
    let current = balance(env, org, asset);
    if amount > current {
        return Err(DonationError::InsufficientBalance);
    }
    let remaining = current - amount;
    set_balance(env, org, asset, remaining);
    update_stats(env, asset, |s| {
        s.allocated = s.allocated.saturating_add(amount);
    });
    Ok(remaining)
}

/// Pays `amount` of `asset` out of escrow to `recipient`.
pub fn pay_out(
    env: &Env,
    asset: AssetClass,
    recipient: &Address,
    amount: i128,
) -> Result<(), DonationError> {
    let client = asset_client(env, asset)?;
    match client.try_transfer(&env.current_contract_address(), recipient, &amount) {
        Ok(Ok(())) => {}
        _ => return Err(DonationError::TransferFailed),
    }
    update_stats(env, asset, |s| {
        s.claimed = s.claimed.saturating_add(amount);
    });
    Ok(())
}

/// Records an unclaimed allocation amount that was overwritten and can no
/// longer be paid out.
pub fn strand(env: &Env, asset: AssetClass, amount: i128) {
    update_stats(env, asset, |s| {
        s.stranded = s.stranded.saturating_add(amount);
    });
}
