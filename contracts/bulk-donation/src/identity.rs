//! Phone identity hashing and the registry binding identities to wallets.

use soroban_sdk::{Address, Bytes, BytesN, Env, String};

use crate::types::{DataKey, DonationEvents, MAX_PHONE_LEN};
use crate::validation::validate_phone;
use crate::DonationError;

/// Computes the identity key of a phone number: keccak-256 of its UTF-8
/// bytes.
pub fn hash_phone(env: &Env, phone: &String) -> Result<BytesN<32>, DonationError> {
    validate_phone(phone)?;

    let len = phone.len() as usize;
    let mut buf = [0u8; MAX_PHONE_LEN as usize];
    phone.copy_into_slice(&mut buf[..len]);
    let bytes = Bytes::from_slice(env, &buf[..len]);

    Ok(env.crypto().keccak256(&bytes).to_bytes())
}

pub fn binding(env: &Env, key: &BytesN<32>) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::PhoneBinding(key.clone()))
}

/// Binds `phone` to `caller`.
///
/// Succeeds without change if the phone is already bound to `caller`. A
/// phone bound to another wallet moves to `caller` only when `force` is set.
/// Allocations are never touched here.
pub fn register(
    env: &Env,
    caller: &Address,
    phone: &String,
    force: bool,
) -> Result<BytesN<32>, DonationError> {
    let key = hash_phone(env, phone)?;

    match binding(env, &key) {
        Some(current) if current == *caller => return Ok(key),
        Some(current) => {
            if !force {
                return Err(DonationError::PhoneAlreadyBoundToOtherWallet);
            }
            DonationEvents::phone_rebound(env, &key, &current, caller);
        }
        None => DonationEvents::phone_bound(env, &key, caller),
    }

    env.storage()
        .persistent()
        .set(&DataKey::PhoneBinding(key.clone()), caller);

    Ok(key)
}

pub fn lookup(env: &Env, phone: &String) -> Result<Option<Address>, DonationError> {
    let key = hash_phone(env, phone)?;
    Ok(binding(env, &key))
}

pub fn is_bound_to(env: &Env, phone: &String, wallet: &Address) -> Result<bool, DonationError> {
    Ok(lookup(env, phone)?.as_ref() == Some(wallet))
}
