use crate::access;
use crate::batch;
use crate::error::ContractError;
use crate::events::emit_transfer_recorded;
use crate::storage::{self, TransferRecord};
use soroban_sdk::{Address, Env, String, Vec};

/// Appends a custody change. A zero `transfer_date` falls back to ledger time.
pub fn add_transfer_record(
    env: &Env,
    caller: &Address,
    batch_id: String,
    from: String,
    to: String,
    purpose: String,
    transfer_date: u64,
) -> Result<u32, ContractError> {
    access::require_authorized(env, caller)?;
    batch::ensure_exists(env, &batch_id)?;

    let now = env.ledger().timestamp();
    let record = TransferRecord {
        from: from.clone(),
        to: to.clone(),
        purpose,
        transfer_date: if transfer_date == 0 { now } else { transfer_date },
        recorded_at: now,
    };

    let index = storage::push_transfer(env, &batch_id, record);
    emit_transfer_recorded(env, batch_id, caller.clone(), from, to, index);

    Ok(index)
}

pub fn get_transfer_records(env: &Env, batch_id: String) -> Vec<TransferRecord> {
    storage::get_transfers(env, &batch_id)
}

pub fn get_transfer_record(
    env: &Env,
    batch_id: String,
    index: u32,
) -> Result<TransferRecord, ContractError> {
    storage::get_transfer(env, &batch_id, index).ok_or(ContractError::TransferNotFound)
}

pub fn get_transfer_record_count(env: &Env, batch_id: String) -> u32 {
    storage::get_transfer_count(env, &batch_id)
}
