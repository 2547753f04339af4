//! # Bulk Donation Contract
//!
//! Lets organizations deposit funds and allocate them in bulk to recipients
//! identified only by a phone number. Recipients bind their phone number to
//! a wallet and claim their allocation from it.
//!
//! ## Features
//!
//! - **Two asset classes**: native asset and one configured token, tracked
//!   separately per organization
//! - **All-or-nothing batches**: a recipient batch is debited and written as
//!   one unit or not at all
//! - **Phone identities**: recipients are keyed by the keccak-256 hash of
//!   their phone number
//! - **Claim exactly once**: payouts require the phone binding and the
//!   allocation's bound wallet to agree, and are terminal
//! - **Reassignment**: the current phone owner can move an unclaimed
//!   allocation to their own wallet
#![no_std]

mod allocation;
mod claim;
mod identity;
mod ledger;
mod organization;
mod types;
mod validation;

use soroban_sdk::{contract, contractimpl, panic_with_error, Address, BytesN, Env, String, Vec};

pub use crate::types::{
    Allocation, AllocationBatchResult, AssetClass, DataKey, DonationEvents, LedgerStats,
    Organization, MAX_BATCH_SIZE, MAX_PHONE_LEN,
};

/// Error codes for the bulk donation contract.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DonationError {
    /// Contract not initialized
    NotInitialized = 1,
    /// Contract already initialized
    AlreadyInitialized = 2,
    /// Caller is not allowed to perform this operation
    NotAuthorized = 3,
    /// Organization already registered
    AlreadyRegistered = 4,
    /// Address is not a registered organization
    NotRegisteredOrganization = 5,
    /// Organization balance is lower than the requested amount
    InsufficientBalance = 6,
    /// Phone number is bound to a different wallet
    PhoneAlreadyBoundToOtherWallet = 7,
    /// Phone number is not bound to the caller
    PhoneNotRegistered = 8,
    /// No allocation for this organization and phone number
    AllocationNotFound = 9,
    /// Allocation was already paid out
    AlreadyClaimed = 10,
    /// Caller is not the allocation's bound wallet
    WalletMismatch = 11,
    /// Wallet cannot receive allocations
    InvalidAddress = 12,
    /// Asset transfer was rejected
    TransferFailed = 13,
    /// Amount must be positive
    InvalidAmount = 14,
    /// Batch is empty
    EmptyBatch = 15,
    /// Batch exceeds maximum size
    BatchTooLarge = 16,
    /// Batch vectors differ in length
    InvalidBatch = 17,
    /// Phone number is empty or too long
    InvalidPhoneNumber = 18,
    /// Amount arithmetic overflowed
    AmountOverflow = 19,
}

impl From<DonationError> for soroban_sdk::Error {
    fn from(e: DonationError) -> Self {
        soroban_sdk::Error::from_contract_error(e as u32)
    }
}

// Aborts the invocation on error, rolling back every write it made.
fn ok_or_panic<T>(env: &Env, result: Result<T, DonationError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic_with_error!(env, e),
    }
}

#[contract]
pub struct BulkDonationContract;

#[contractimpl]
impl BulkDonationContract {
    /// Initializes the contract with an admin and the two asset contracts.
    ///
    /// # Arguments
    /// * `admin` - Address allowed to change the admin
    /// * `native_asset` - Stellar Asset Contract of the native asset
    /// * `token` - Token contract used for `AssetClass::Token`
    pub fn initialize(env: Env, admin: Address, native_asset: Address, token: Address) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic_with_error!(&env, DonationError::AlreadyInitialized);
        }

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::NativeAsset, &native_asset);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::BatchCounter, &0u64);
        env.storage()
            .instance()
            .set(&DataKey::TotalRecipients, &0u64);
    }

    /// Returns the admin address.
    pub fn get_admin(env: Env) -> Address {
        ok_or_panic(&env, Self::read_config(&env, DataKey::Admin))
    }

    /// Updates the admin address.
    pub fn set_admin(env: Env, current_admin: Address, new_admin: Address) {
        current_admin.require_auth();
        let admin = ok_or_panic(&env, Self::read_config(&env, DataKey::Admin));
        if current_admin != admin {
            panic_with_error!(&env, DonationError::NotAuthorized);
        }
        env.storage().instance().set(&DataKey::Admin, &new_admin);
    }

    pub fn get_native_asset(env: Env) -> Address {
        ok_or_panic(&env, Self::read_config(&env, DataKey::NativeAsset))
    }

    pub fn get_token(env: Env) -> Address {
        ok_or_panic(&env, Self::read_config(&env, DataKey::Token))
    }

    // ---------------------------------------------------------------
    // Organizations
    // ---------------------------------------------------------------

    /// Registers the caller as an organization.
    pub fn register_organization(
        env: Env,
        caller: Address,
        name: String,
        description: String,
    ) -> Organization {
        caller.require_auth();
        ok_or_panic(&env, organization::register(&env, &caller, name, description))
    }

    pub fn is_registered(env: Env, org: Address) -> bool {
        organization::is_registered(&env, &org)
    }

    pub fn get_organization(env: Env, org: Address) -> Option<Organization> {
        organization::get(&env, &org)
    }

    /// Returns all organization wallets in registration order.
    pub fn list_organizations(env: Env) -> Vec<Address> {
        organization::list(&env)
    }

    // ---------------------------------------------------------------
    // Ledger
    // ---------------------------------------------------------------

    /// Deposits native asset from the caller's wallet. Returns the new
    /// native balance.
    pub fn deposit_native(env: Env, caller: Address, amount: i128) -> i128 {
        Self::deposit(&env, &caller, AssetClass::Native, amount)
    }

    /// Deposits the configured token from the caller's wallet. Returns the
    /// new token balance.
    pub fn deposit_token(env: Env, caller: Address, amount: i128) -> i128 {
        Self::deposit(&env, &caller, AssetClass::Token, amount)
    }

    /// Returns the unallocated balance of `org` for `asset` (0 if none).
    pub fn get_balance(env: Env, org: Address, asset: AssetClass) -> i128 {
        ledger::balance(&env, &org, asset)
    }

    pub fn get_native_balance(env: Env, org: Address) -> i128 {
        ledger::balance(&env, &org, AssetClass::Native)
    }

    pub fn get_token_balance(env: Env, org: Address) -> i128 {
        ledger::balance(&env, &org, AssetClass::Token)
    }

    /// Returns deposit, allocation and payout totals for `asset`.
    pub fn get_ledger_stats(env: Env, asset: AssetClass) -> LedgerStats {
        ledger::stats(&env, asset)
    }

    // ---------------------------------------------------------------
    // Allocations
    // ---------------------------------------------------------------

    /// Allocates the caller's balance to a batch of phone numbers.
    ///
    /// `phones`, `wallets` and `amounts` are parallel vectors. The total is
    /// debited from the caller's `asset` balance; if anything in the batch
    /// is invalid or the balance is insufficient, nothing is written.
    ///
    /// # Errors
    /// * `NotRegisteredOrganization` - Caller is not an organization
    /// * `EmptyBatch` / `BatchTooLarge` / `InvalidBatch` - Bad batch shape
    /// * `InvalidAmount` / `InvalidAddress` / `InvalidPhoneNumber` - Bad entry
    /// * `InsufficientBalance` - Total exceeds the caller's balance
    pub fn add_recipients(
        env: Env,
        caller: Address,
        phones: Vec<String>,
        wallets: Vec<Address>,
        amounts: Vec<i128>,
        asset: AssetClass,
    ) -> AllocationBatchResult {
        caller.require_auth();
        ok_or_panic(
            &env,
            allocation::add_bulk(&env, &caller, &phones, &wallets, &amounts, asset),
        )
    }

    /// Returns the allocation for `phone` under `org`.
    pub fn get_allocation(env: Env, org: Address, phone: String) -> Option<Allocation> {
        let key = ok_or_panic(&env, identity::hash_phone(&env, &phone));
        allocation::get(&env, &org, &key)
    }

    /// Sets the payout wallet of one of the caller's allocations.
    pub fn update_recipient_wallet(
        env: Env,
        caller: Address,
        phone: String,
        new_wallet: Address,
    ) {
        caller.require_auth();
        ok_or_panic(
            &env,
            allocation::update_bound_wallet(&env, &caller, &phone, &new_wallet),
        );
    }

    /// Returns `(amount, claimed)` for `phone` under `org`, or `(0, false)`
    /// when there is no allocation.
    pub fn get_claimable_amount(env: Env, phone: String, org: Address) -> (i128, bool) {
        let key = ok_or_panic(&env, identity::hash_phone(&env, &phone));
        allocation::get(&env, &org, &key)
            .map(|a| (a.amount, a.claimed))
            .unwrap_or((0, false))
    }

    /// Returns the identity keys `org` has allocated to, in first-insertion
    /// order.
    pub fn get_allocations_for_organization(env: Env, org: Address) -> Vec<BytesN<32>> {
        allocation::recipients(&env, &org)
    }

    pub fn get_recipient_count(env: Env, org: Address) -> u32 {
        allocation::recipients(&env, &org).len()
    }

    /// Returns the number of distinct (organization, phone) allocations.
    pub fn get_total_recipients(env: Env) -> u64 {
        allocation::total_recipients(&env)
    }

    // ---------------------------------------------------------------
    // Phone identities
    // ---------------------------------------------------------------

    /// Binds `phone` to the caller.
    ///
    /// With `force`, takes over a phone bound to another wallet. Existing
    /// allocations keep their bound wallets; see `request_reassignment`.
    pub fn register_phone(env: Env, caller: Address, phone: String, force: bool) -> BytesN<32> {
        caller.require_auth();
        ok_or_panic(&env, identity::register(&env, &caller, &phone, force))
    }

    pub fn lookup_phone(env: Env, phone: String) -> Option<Address> {
        ok_or_panic(&env, identity::lookup(&env, &phone))
    }

    pub fn is_phone_bound_to(env: Env, phone: String, wallet: Address) -> bool {
        ok_or_panic(&env, identity::is_bound_to(&env, &phone, &wallet))
    }

    /// Returns the identity key used for `phone`.
    pub fn hash_phone(env: Env, phone: String) -> BytesN<32> {
        ok_or_panic(&env, identity::hash_phone(&env, &phone))
    }

    // ---------------------------------------------------------------
    // Claims
    // ---------------------------------------------------------------

    /// Claims the allocation for `phone` under `org` into the caller's
    /// wallet. Returns the amount paid.
    ///
    /// # Errors
    /// * `NotRegisteredOrganization` - `org` is unknown
    /// * `PhoneNotRegistered` - `phone` is not bound to the caller
    /// * `AllocationNotFound` - No allocation for `phone` under `org`
    /// * `WalletMismatch` - Allocation is bound to another wallet
    /// * `AlreadyClaimed` - Allocation was already paid out
    /// * `TransferFailed` - Payout transfer was rejected
    pub fn claim(env: Env, caller: Address, org: Address, phone: String) -> i128 {
        caller.require_auth();
        ok_or_panic(&env, claim::claim(&env, &caller, &org, &phone))
    }

    /// Pays the allocation for `phone` under `org` to its bound wallet,
    /// which must authorize the call. The phone registry is not checked.
    pub fn direct_claim(env: Env, org: Address, phone: String) -> i128 {
        ok_or_panic(&env, claim::direct_claim(&env, &org, &phone))
    }

    /// Moves an unclaimed allocation to the caller, who must hold the phone
    /// binding.
    pub fn request_reassignment(
        env: Env,
        caller: Address,
        org: Address,
        phone: String,
    ) -> Allocation {
        caller.require_auth();
        ok_or_panic(&env, claim::request_reassignment(&env, &caller, &org, &phone))
    }

    fn deposit(env: &Env, caller: &Address, asset: AssetClass, amount: i128) -> i128 {
        caller.require_auth();
        ok_or_panic(
            env,
            organization::require_registered(env, caller)
                .and_then(|_| validation::validate_amount(amount))
                .and_then(|_| ledger::deposit(env, caller, asset, amount)),
        )
    }

    fn read_config(env: &Env, key: DataKey) -> Result<Address, DonationError> {
        env.storage()
            .instance()
            .get(&key)
            .ok_or(DonationError::NotInitialized)
    }
}
