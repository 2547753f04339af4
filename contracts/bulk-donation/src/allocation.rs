//! Per-(organization, identity) allocation records.

use soroban_sdk::{Address, BytesN, Env, String, Vec};

use crate::types::{Allocation, AllocationBatchResult, AssetClass, DataKey, DonationEvents};
use crate::validation::{validate_amount, validate_batch_shape, validate_wallet};
use crate::{identity, ledger, organization, DonationError};

pub fn get(env: &Env, org: &Address, key: &BytesN<32>) -> Option<Allocation> {
    env.storage()
        .persistent()
        .get(&DataKey::Allocation(org.clone(), key.clone()))
}

pub fn set(env: &Env, org: &Address, key: &BytesN<32>, allocation: &Allocation) {
    env.storage()
        .persistent()
        .set(&DataKey::Allocation(org.clone(), key.clone()), allocation);
}

/// Identity keys allocated by `org`, each listed once.
pub fn recipients(env: &Env, org: &Address) -> Vec<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&DataKey::OrganizationRecipients(org.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn total_recipients(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::TotalRecipients)
        .unwrap_or(0)
}

/// Allocates funds from `org`'s balance to a batch of phone identities.
///
/// The whole batch is validated and the balance debited before any record
/// is written; any failure leaves balances and allocations as they were.
/// A key that already has an allocation under `org` is overwritten, and a
/// key repeated within the batch keeps its last entry. The debit is always
/// the sum of every entry.
pub fn add_bulk(
    env: &Env,
    org: &Address,
    phones: &Vec<String>,
    wallets: &Vec<Address>,
    amounts: &Vec<i128>,
    asset: AssetClass,
) -> Result<AllocationBatchResult, DonationError> {
    organization::require_registered(env, org)?;
    validate_batch_shape(phones.len(), wallets.len(), amounts.len())?;

    // First pass: hash and validate every entry, accumulate the total
    let mut keys: Vec<BytesN<32>> = Vec::new(env);
    let mut total: i128 = 0;
    for (phone, (wallet, amount)) in phones.iter().zip(wallets.iter().zip(amounts.iter())) {
        validate_amount(amount)?;
        validate_wallet(env, &wallet)?;
        keys.push_back(identity::hash_phone(env, &phone)?);
        total = total
            .checked_add(amount)
            .ok_or(DonationError::AmountOverflow)?;
    }

    ledger::debit(env, org, asset, total)?;

    let batch_id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::BatchCounter)
        .unwrap_or(0)
        + 1;

    // Second pass: write allocations in input order
    let mut org_recipients = recipients(env, org);
    let mut new_recipients: u32 = 0;
    for (key, (wallet, amount)) in keys.iter().zip(wallets.iter().zip(amounts.iter())) {
        match get(env, org, &key) {
            Some(previous) => {
                if !previous.claimed {
                    ledger::strand(env, previous.asset, previous.amount);
                }
                DonationEvents::allocation_replaced(env, batch_id, &key, &previous);
            }
            None => {
                org_recipients.push_back(key.clone());
                new_recipients += 1;
            }
        }

        let allocation = Allocation {
            amount,
            asset,
            bound_wallet: wallet,
            claimed: false,
        };
        set(env, org, &key, &allocation);
    }

    env.storage()
        .persistent()
        .set(&DataKey::OrganizationRecipients(org.clone()), &org_recipients);
    env.storage()
        .instance()
        .set(&DataKey::BatchCounter, &batch_id);
    env.storage().instance().set(
        &DataKey::TotalRecipients,
        &(total_recipients(env) + new_recipients as u64),
    );

    DonationEvents::batch_allocated(env, batch_id, org, asset, phones.len(), total);

    Ok(AllocationBatchResult {
        batch_id,
        total_requests: phones.len(),
        total_allocated: total,
        new_recipients,
    })
}

/// Points the allocation for `phone` under `org` at `new_wallet`.
///
/// Only the organization itself may call this. The claimed flag is not
/// checked.
pub fn update_bound_wallet(
    env: &Env,
    org: &Address,
    phone: &String,
    new_wallet: &Address,
) -> Result<Allocation, DonationError> {
    if !organization::is_registered(env, org) {
        return Err(DonationError::NotAuthorized);
    }
    validate_wallet(env, new_wallet)?;

    let key = identity::hash_phone(env, phone)?;
    let mut allocation = get(env, org, &key).ok_or(DonationError::AllocationNotFound)?;
    allocation.bound_wallet = new_wallet.clone();
    set(env, org, &key, &allocation);

    DonationEvents::wallet_updated(env, org, &key, new_wallet);

    Ok(allocation)
}
