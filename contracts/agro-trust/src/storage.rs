use soroban_sdk::{contracttype, Address, Env, IntoVal, String, TryFromVal, Val};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    pub batch_id: String,
    pub crop_name: String,
    pub variety: String,
    pub location: String,
    pub harvest_date: u64,
    pub created_at: u64,
    pub exists: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmerInfo {
    pub farmer_name: String,
    pub farm_location: String,
    pub contact: String,
    pub farmer_id: String,
    pub exists: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CultivationDetails {
    pub soil_type: String,
    pub irrigation_type: String,
    pub pesticide_used: String,
    pub sowing_date: u64,
    pub area: u64,
    pub exists: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessingInfo {
    pub processor_name: String,
    pub method: String,
    pub processing_date: u64,
    pub processing_unit_id: String,
    pub exists: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabResult {
    pub lab_name: String,
    pub result: String,
    pub test_date: u64,
    pub report_hash: String,
    pub exists: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate {
    pub issued_by: String,
    pub certificate_type: String,
    pub issue_date: u64,
    pub certificate_id: String,
    pub exists: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRecord {
    pub from: String,
    pub to: String,
    pub purpose: String,
    pub transfer_date: u64,
    pub recorded_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TraceData {
    pub notes: String,
    pub qr_code_hash: String,
    pub exists: bool,
}

/// Single-slot record kinds attached to a batch.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecordKind {
    Farmer,
    Cultivation,
    Processing,
    LabResult,
    Certificate,
    Trace,
}

// Storage key types
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StorageKey {
    Owner,
    Authorized(Address),  // address -> bool
    Batch(String),        // batch_id
    BatchCount,           // u32
    BatchAt(u32),         // creation position -> batch_id
    Farmer(String),
    Cultivation(String),
    Processing(String),
    LabResult(String),
    Certificate(String),
    Trace(String),
    TransferCount(String),     // batch_id -> u32
    Transfer(String, u32),     // (batch_id, index) -> TransferRecord
}

impl RecordKind {
    pub fn key(&self, batch_id: &String) -> StorageKey {
        let id = batch_id.clone();
        match self {
            RecordKind::Farmer => StorageKey::Farmer(id),
            RecordKind::Cultivation => StorageKey::Cultivation(id),
            RecordKind::Processing => StorageKey::Processing(id),
            RecordKind::LabResult => StorageKey::LabResult(id),
            RecordKind::Certificate => StorageKey::Certificate(id),
            RecordKind::Trace => StorageKey::Trace(id),
        }
    }
}

// Placeholders returned for slots that were never written.
impl FarmerInfo {
    pub fn empty(env: &Env) -> Self {
        Self {
            farmer_name: String::from_str(env, ""),
            farm_location: String::from_str(env, ""),
            contact: String::from_str(env, ""),
            farmer_id: String::from_str(env, ""),
            exists: false,
        }
    }
}

impl CultivationDetails {
    pub fn empty(env: &Env) -> Self {
        Self {
            soil_type: String::from_str(env, ""),
            irrigation_type: String::from_str(env, ""),
            pesticide_used: String::from_str(env, ""),
            sowing_date: 0,
            area: 0,
            exists: false,
        }
    }
}

impl ProcessingInfo {
    pub fn empty(env: &Env) -> Self {
        Self {
            processor_name: String::from_str(env, ""),
            method: String::from_str(env, ""),
            processing_date: 0,
            processing_unit_id: String::from_str(env, ""),
            exists: false,
        }
    }
}

impl LabResult {
    pub fn empty(env: &Env) -> Self {
        Self {
            lab_name: String::from_str(env, ""),
            result: String::from_str(env, ""),
            test_date: 0,
            report_hash: String::from_str(env, ""),
            exists: false,
        }
    }
}

impl Certificate {
    pub fn empty(env: &Env) -> Self {
        Self {
            issued_by: String::from_str(env, ""),
            certificate_type: String::from_str(env, ""),
            issue_date: 0,
            certificate_id: String::from_str(env, ""),
            exists: false,
        }
    }
}

impl TraceData {
    pub fn empty(env: &Env) -> Self {
        Self {
            notes: String::from_str(env, ""),
            qr_code_hash: String::from_str(env, ""),
            exists: false,
        }
    }
}

// Owner storage functions
pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&StorageKey::Owner)
}

pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&StorageKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&StorageKey::Owner, owner);
}

// Allowlist storage functions
pub fn is_listed(env: &Env, user: &Address) -> bool {
    let key = StorageKey::Authorized(user.clone());
    env.storage().persistent().get(&key).unwrap_or(false)
}

pub fn set_listed(env: &Env, user: &Address, authorized: bool) {
    let key = StorageKey::Authorized(user.clone());
    env.storage().persistent().set(&key, &authorized);
}

// Batch storage functions
pub fn has_batch(env: &Env, batch_id: &String) -> bool {
    env.storage().persistent().has(&StorageKey::Batch(batch_id.clone()))
}

pub fn get_batch(env: &Env, batch_id: &String) -> Option<Batch> {
    let key = StorageKey::Batch(batch_id.clone());
    env.storage().persistent().get(&key)
}

pub fn set_batch(env: &Env, batch: &Batch) {
    let key = StorageKey::Batch(batch.batch_id.clone());
    env.storage().persistent().set(&key, batch);
}

// The index keeps one entry per batch so creating a batch never rewrites
// the ids recorded before it.
pub fn get_batch_count(env: &Env) -> u32 {
    env.storage()
        .persistent()
        .get(&StorageKey::BatchCount)
        .unwrap_or(0)
}

pub fn get_batch_id_at(env: &Env, position: u32) -> Option<String> {
    env.storage().persistent().get(&StorageKey::BatchAt(position))
}

pub fn add_to_batch_index(env: &Env, batch_id: &String) -> u32 {
    let position = get_batch_count(env);
    env.storage()
        .persistent()
        .set(&StorageKey::BatchAt(position), batch_id);
    env.storage()
        .persistent()
        .set(&StorageKey::BatchCount, &(position + 1));
    position
}

// Attached record storage functions
pub fn has_record(env: &Env, kind: RecordKind, batch_id: &String) -> bool {
    env.storage().persistent().has(&kind.key(batch_id))
}

pub fn get_record<V>(env: &Env, kind: RecordKind, batch_id: &String) -> Option<V>
where
    V: TryFromVal<Env, Val>,
{
    env.storage().persistent().get(&kind.key(batch_id))
}

pub fn set_record<V>(env: &Env, kind: RecordKind, batch_id: &String, record: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(&kind.key(batch_id), record);
}

// Transfer log storage functions, one entry per transfer
pub fn get_transfer_count(env: &Env, batch_id: &String) -> u32 {
    let key = StorageKey::TransferCount(batch_id.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn get_transfer(env: &Env, batch_id: &String, index: u32) -> Option<TransferRecord> {
    let key = StorageKey::Transfer(batch_id.clone(), index);
    env.storage().persistent().get(&key)
}

pub fn get_transfers(env: &Env, batch_id: &String) -> soroban_sdk::Vec<TransferRecord> {
    let mut transfers = soroban_sdk::Vec::new(env);
    for index in 0..get_transfer_count(env, batch_id) {
        if let Some(record) = get_transfer(env, batch_id, index) {
            transfers.push_back(record);
        }
    }
    transfers
}

pub fn push_transfer(env: &Env, batch_id: &String, record: TransferRecord) -> u32 {
    let index = get_transfer_count(env, batch_id);
    env.storage()
        .persistent()
        .set(&StorageKey::Transfer(batch_id.clone(), index), &record);
    env.storage()
        .persistent()
        .set(&StorageKey::TransferCount(batch_id.clone()), &(index + 1));
    index
}
