//! Input validation and authorization checks.
//!
//! The check functions take already-loaded state and return the first
//! failing rule, so the order of checks is the order of the error kinds
//! callers observe.

use soroban_sdk::{Address, Env, String};

use crate::types::{Allocation, MAX_BATCH_SIZE, MAX_PHONE_LEN};
use crate::DonationError;

/// Validates an amount. Must be strictly positive.
pub fn validate_amount(amount: i128) -> Result<(), DonationError> {
    if amount <= 0 {
        return Err(DonationError::InvalidAmount);
    }
    Ok(())
}

/// Rejects the contract's own address as a payout wallet.
pub fn validate_wallet(env: &Env, wallet: &Address) -> Result<(), DonationError> {
    if *wallet == env.current_contract_address() {
        return Err(DonationError::InvalidAddress);
    }
    Ok(())
}

pub fn validate_phone(phone: &String) -> Result<(), DonationError> {
    let len = phone.len();
    if len == 0 || len > MAX_PHONE_LEN {
        return Err(DonationError::InvalidPhoneNumber);
    }
    Ok(())
}

/// Validates the shape of a recipient batch given as parallel vectors.
pub fn validate_batch_shape(
    phones: u32,
    wallets: u32,
    amounts: u32,
) -> Result<(), DonationError> {
    if phones == 0 {
        return Err(DonationError::EmptyBatch);
    }
    if phones > MAX_BATCH_SIZE {
        return Err(DonationError::BatchTooLarge);
    }
    if phones != wallets || phones != amounts {
        return Err(DonationError::InvalidBatch);
    }
    Ok(())
}

/// Checks whether `caller` may claim `allocation`.
///
/// # Arguments
/// * `binding` - Wallet currently bound to the phone identity, if any
/// * `allocation` - Allocation under (organization, identity), if any
/// * `caller` - The claiming wallet
pub fn validate_claim(
    binding: Option<&Address>,
    allocation: Option<&Allocation>,
    caller: &Address,
) -> Result<(), DonationError> {
    if binding != Some(caller) {
        return Err(DonationError::PhoneNotRegistered);
    }
    let allocation = allocation.ok_or(DonationError::AllocationNotFound)?;
    if allocation.bound_wallet != *caller {
        return Err(DonationError::WalletMismatch);
    }
    if allocation.claimed {
        return Err(DonationError::AlreadyClaimed);
    }
    Ok(())
}

/// Checks a claim paid to the allocation's own bound wallet. The phone
/// registry is not consulted.
pub fn validate_direct_claim(allocation: Option<&Allocation>) -> Result<(), DonationError> {
    let allocation = allocation.ok_or(DonationError::AllocationNotFound)?;
    if allocation.claimed {
        return Err(DonationError::AlreadyClaimed);
    }
    Ok(())
}

/// Checks whether `caller` may move `allocation` to itself.
pub fn validate_reassignment(
    binding: Option<&Address>,
    allocation: Option<&Allocation>,
    caller: &Address,
) -> Result<(), DonationError> {
    let allocation = allocation.ok_or(DonationError::AllocationNotFound)?;
    if allocation.claimed {
        return Err(DonationError::AlreadyClaimed);
    }
    if binding != Some(caller) {
        return Err(DonationError::PhoneNotRegistered);
    }
    Ok(())
}
