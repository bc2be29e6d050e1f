use crate::access;
use crate::error::ContractError;
use crate::events::*;
use crate::storage::{self, Batch};
use soroban_sdk::{Address, Env, String, Vec};

pub fn create_batch(
    env: &Env,
    caller: &Address,
    batch_id: String,
    crop_name: String,
    variety: String,
    location: String,
    harvest_date: u64,
) -> Result<(), ContractError> {
    access::require_authorized(env, caller)?;

    if batch_id.len() == 0 {
        return Err(ContractError::EmptyBatchId);
    }
    if storage::has_batch(env, &batch_id) {
        return Err(ContractError::BatchAlreadyExists);
    }

    let batch = Batch {
        batch_id: batch_id.clone(),
        crop_name: crop_name.clone(),
        variety: variety.clone(),
        location,
        harvest_date,
        created_at: env.ledger().timestamp(),
        exists: true,
    };

    storage::set_batch(env, &batch);
    storage::add_to_batch_index(env, &batch_id);

    emit_batch_created(env, batch_id, caller.clone(), crop_name, variety, harvest_date);

    Ok(())
}

/// Fails with `BatchNotFound` unless the batch was created. Empty IDs never exist.
pub fn ensure_exists(env: &Env, batch_id: &String) -> Result<(), ContractError> {
    if batch_id.len() == 0 || !storage::has_batch(env, batch_id) {
        return Err(ContractError::BatchNotFound);
    }
    Ok(())
}

pub fn batch_exists(env: &Env, batch_id: &String) -> bool {
    ensure_exists(env, batch_id).is_ok()
}

pub fn get_batch(env: &Env, batch_id: String) -> Result<Batch, ContractError> {
    storage::get_batch(env, &batch_id).ok_or(ContractError::BatchNotFound)
}

pub fn get_batch_count(env: &Env) -> u32 {
    storage::get_batch_count(env)
}

/// Reads only the requested window of the index.
pub fn list_batches(env: &Env, offset: u32, limit: u32) -> Vec<String> {
    let mut result = Vec::new(env);

    let end = offset.saturating_add(limit).min(storage::get_batch_count(env));
    for position in offset..end {
        if let Some(batch_id) = storage::get_batch_id_at(env, position) {
            result.push_back(batch_id);
        }
    }

    result
}
