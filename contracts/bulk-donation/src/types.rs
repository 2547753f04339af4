//! Data types, storage keys and events for the bulk donation contract.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, String};

/// Maximum number of recipients in a single `add_recipients` call.
pub const MAX_BATCH_SIZE: u32 = 100;

/// Longest accepted phone number string, in bytes.
pub const MAX_PHONE_LEN: u32 = 32;

/// The two independent asset classes an organization can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub enum AssetClass {
    /// The network's native asset (XLM through its Stellar Asset Contract)
    Native,
    /// The configured fungible token (e.g. USDC)
    Token,
}

/// A registered organization.
#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub struct Organization {
    pub wallet: Address,
    pub name: String,
    pub description: String,
    pub registered: bool,
}

/// Funds earmarked for one phone identity under one organization.
#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub struct Allocation {
    pub amount: i128,
    pub asset: AssetClass,
    /// Wallet the payout goes to
    pub bound_wallet: Address,
    pub claimed: bool,
}

/// Running totals for one asset class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[contracttype]
pub struct LedgerStats {
    /// Total deposited by all organizations
    pub deposited: i128,
    /// Total moved from organization balances into allocations
    pub allocated: i128,
    /// Total paid out to recipients
    pub claimed: i128,
    /// Unclaimed amounts dropped by overwriting an allocation
    pub stranded: i128,
}

/// Summary of an `add_recipients` call.
#[derive(Clone, Debug)]
#[contracttype]
pub struct AllocationBatchResult {
    pub batch_id: u64,
    pub total_requests: u32,
    pub total_allocated: i128,
    /// Entries that created an allocation for a key new to the organization
    pub new_recipients: u32,
}

/// Storage keys for the bulk donation contract.
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Admin address
    Admin,
    /// Stellar Asset Contract used for `AssetClass::Native`
    NativeAsset,
    /// Token contract used for `AssetClass::Token`
    Token,
    /// Organization record by wallet
    Organization(Address),
    /// Wallets of all organizations, in registration order
    OrganizationList,
    /// Escrowed, unallocated balance of an organization
    Balance(Address, AssetClass),
    /// Allocation by (organization, identity key)
    Allocation(Address, BytesN<32>),
    /// Identity keys allocated by an organization, in first-insertion order
    OrganizationRecipients(Address),
    /// Wallet bound to an identity key
    PhoneBinding(BytesN<32>),
    /// Ledger totals per asset class
    Stats(AssetClass),
    /// Counter for allocation batch IDs
    BatchCounter,
    /// Number of distinct (organization, identity key) allocations
    TotalRecipients,
}

/// Event emitters for donation operations.
pub struct DonationEvents;

impl DonationEvents {
    /// Emitted when an organization registers.
    pub fn organization_registered(env: &Env, wallet: &Address, name: &String) {
        let topics = (symbol_short!("org"), symbol_short!("register"));
        env.events().publish(topics, (wallet.clone(), name.clone()));
    }

    /// Emitted when an organization deposits funds.
    pub fn deposit(env: &Env, org: &Address, asset: AssetClass, amount: i128, balance: i128) {
        let topics = (symbol_short!("org"), symbol_short!("deposit"), org.clone());
        env.events().publish(topics, (asset, amount, balance));
    }

    /// Emitted once per successful `add_recipients` call.
    pub fn batch_allocated(
        env: &Env,
        batch_id: u64,
        org: &Address,
        asset: AssetClass,
        count: u32,
        total: i128,
    ) {
        let topics = (symbol_short!("alloc"), symbol_short!("batch"), batch_id);
        env.events().publish(topics, (org.clone(), asset, count, total));
    }

    /// Emitted when an existing allocation is overwritten by a new batch.
    pub fn allocation_replaced(
        env: &Env,
        batch_id: u64,
        key: &BytesN<32>,
        previous: &Allocation,
    ) {
        let topics = (symbol_short!("alloc"), symbol_short!("replaced"), batch_id);
        env.events()
            .publish(topics, (key.clone(), previous.amount, previous.claimed));
    }

    pub fn phone_bound(env: &Env, key: &BytesN<32>, wallet: &Address) {
        let topics = (symbol_short!("phone"), symbol_short!("bound"));
        env.events().publish(topics, (key.clone(), wallet.clone()));
    }

    /// Emitted when `force` moves a binding away from another wallet.
    pub fn phone_rebound(env: &Env, key: &BytesN<32>, previous: &Address, wallet: &Address) {
        let topics = (symbol_short!("phone"), symbol_short!("rebound"));
        env.events()
            .publish(topics, (key.clone(), previous.clone(), wallet.clone()));
    }

    pub fn wallet_updated(env: &Env, org: &Address, key: &BytesN<32>, wallet: &Address) {
        let topics = (symbol_short!("alloc"), symbol_short!("wallet"), org.clone());
        env.events().publish(topics, (key.clone(), wallet.clone()));
    }

    pub fn reassigned(
        env: &Env,
        org: &Address,
        key: &BytesN<32>,
        previous: &Address,
        wallet: &Address,
    ) {
        let topics = (symbol_short!("alloc"), symbol_short!("reassign"), org.clone());
        env.events()
            .publish(topics, (key.clone(), previous.clone(), wallet.clone()));
    }

    /// Emitted when an allocation is paid out.
    pub fn claimed(
        env: &Env,
        org: &Address,
        key: &BytesN<32>,
        recipient: &Address,
        asset: AssetClass,
        amount: i128,
    ) {
        let topics = (symbol_short!("claim"), org.clone());
        env.events()
            .publish(topics, (key.clone(), recipient.clone(), asset, amount));
    }
}
