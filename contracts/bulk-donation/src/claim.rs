//! Claim payouts and wallet reassignment for allocations.
//!
//! An allocation moves from unclaimed to claimed exactly once. The payout
//! transfer happens first; the claimed flag is only written after it
//! succeeds.

use soroban_sdk::{Address, BytesN, Env, String};

use crate::types::{Allocation, DonationEvents};
use crate::validation::{validate_claim, validate_direct_claim, validate_reassignment};
use crate::{allocation, identity, ledger, organization, DonationError};

/// Pays the allocation for `phone` under `org` to `caller`.
///
/// `caller` must hold the phone binding and be the allocation's bound
/// wallet. Returns the amount paid.
pub fn claim(
    env: &Env,
    caller: &Address,
    org: &Address,
    phone: &String,
) -> Result<i128, DonationError> {
    organization::require_registered(env, org)?;

    let key = identity::hash_phone(env, phone)?;
    let binding = identity::binding(env, &key);
    let existing = allocation::get(env, org, &key);
    validate_claim(binding.as_ref(), existing.as_ref(), caller)?;

    let record = existing.ok_or(DonationError::AllocationNotFound)?;
    settle(env, org, &key, record, caller)
}

/// Pays the allocation for `phone` under `org` to its bound wallet without
/// consulting the phone registry. The bound wallet must authorize the call.
pub fn direct_claim(env: &Env, org: &Address, phone: &String) -> Result<i128, DonationError> {
    organization::require_registered(env, org)?;

    let key = identity::hash_phone(env, phone)?;
    let existing = allocation::get(env, org, &key);
    validate_direct_claim(existing.as_ref())?;

    let record = existing.ok_or(DonationError::AllocationNotFound)?;
    record.bound_wallet.require_auth();
    let recipient = record.bound_wallet.clone();
    settle(env, org, &key, record, &recipient)
}

fn settle(
    env: &Env,
    org: &Address,
    key: &BytesN<32>,
    mut record: Allocation,
    recipient: &Address,
) -> Result<i128, DonationError> {
    ledger::pay_out(env, record.asset, recipient, record.amount)?;

    record.claimed = true;
    allocation::set(env, org, key, &record);

    DonationEvents::claimed(env, org, key, recipient, record.asset, record.amount);

    Ok(record.amount)
}

/// Moves the payout wallet of an unclaimed allocation to `caller`, who must
/// currently hold the phone binding.
pub fn request_reassignment(
    env: &Env,
    caller: &Address,
    org: &Address,
    phone: &String,
) -> Result<Allocation, DonationError> {
    organization::require_registered(env, org)?;

    let key = identity::hash_phone(env, phone)?;
    let existing = allocation::get(env, org, &key);
    let binding = identity::binding(env, &key);
    validate_reassignment(binding.as_ref(), existing.as_ref(), caller)?;

    let mut record = existing.ok_or(DonationError::AllocationNotFound)?;
    let previous = record.bound_wallet.clone();
    record.bound_wallet = caller.clone();
    allocation::set(env, org, &key, &record);

    DonationEvents::reassigned(env, org, &key, &previous, caller);

    Ok(record)
}
