//! Registry of organizations allowed to deposit and allocate funds.

use soroban_sdk::{Address, Env, String, Vec};

use crate::types::{DataKey, DonationEvents, Organization};
use crate::DonationError;

/// Registers `wallet` as an organization.
pub fn register(
    env: &Env,
    wallet: &Address,
    name: String,
    description: String,
) -> Result<Organization, DonationError> {
    if is_registered(env, wallet) {
        return Err(DonationError::AlreadyRegistered);
    }

    let organization = Organization {
        wallet: wallet.clone(),
        name,
        description,
        registered: true,
    };
    env.storage()
        .persistent()
        .set(&DataKey::Organization(wallet.clone()), &organization);

    let mut wallets = list(env);
    wallets.push_back(wallet.clone());
    env.storage()
        .persistent()
        .set(&DataKey::OrganizationList, &wallets);

    DonationEvents::organization_registered(env, wallet, &organization.name);

    Ok(organization)
}

pub fn get(env: &Env, wallet: &Address) -> Option<Organization> {
    env.storage()
        .persistent()
        .get(&DataKey::Organization(wallet.clone()))
}

pub fn is_registered(env: &Env, wallet: &Address) -> bool {
    get(env, wallet).map(|org| org.registered).unwrap_or(false)
}

/// Fails with `NotRegisteredOrganization` unless `wallet` is registered.
pub fn require_registered(env: &Env, wallet: &Address) -> Result<(), DonationError> {
    if !is_registered(env, wallet) {
        return Err(DonationError::NotRegisteredOrganization);
    }
    Ok(())
}

/// Organization wallets in registration order.
pub fn list(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::OrganizationList)
        .unwrap_or(Vec::new(env))
}
