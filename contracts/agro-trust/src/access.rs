use crate::error::ContractError;
use crate::events;
use crate::storage;
use soroban_sdk::{Address, Env};

pub fn initialize(env: &Env, owner: &Address) -> Result<(), ContractError> {
    if storage::has_owner(env) {
        return Err(ContractError::AlreadyInitialized);
    }
    owner.require_auth();

    storage::set_owner(env, owner);
    storage::set_listed(env, owner, true);
    Ok(())
}

pub fn get_owner(env: &Env) -> Result<Address, ContractError> {
    storage::get_owner(env).ok_or(ContractError::NotInitialized)
}

/// The owner is always authorized, whatever the allowlist says.
pub fn is_authorized(env: &Env, user: &Address) -> bool {
    match storage::get_owner(env) {
        Some(owner) if owner == *user => true,
        _ => storage::is_listed(env, user),
    }
}

/// Gate for every mutating record operation.
pub fn require_authorized(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if !storage::has_owner(env) {
        return Err(ContractError::NotInitialized);
    }
    caller.require_auth();

    if !is_authorized(env, caller) {
        return Err(ContractError::NotAuthorized);
    }
    Ok(())
}

fn require_owner(env: &Env, caller: &Address) -> Result<Address, ContractError> {
    let owner = get_owner(env)?;
    caller.require_auth();

    if *caller != owner {
        return Err(ContractError::OnlyOwner);
    }
    Ok(owner)
}

pub fn authorize_user(env: &Env, caller: &Address, user: &Address) -> Result<(), ContractError> {
    let owner = require_owner(env, caller)?;
    storage::set_listed(env, user, true);
    events::emit_access_changed(env, owner, user.clone(), true);
    Ok(())
}

pub fn revoke_user(env: &Env, caller: &Address, user: &Address) -> Result<(), ContractError> {
    let owner = require_owner(env, caller)?;
    if *user == owner {
        return Err(ContractError::CannotRevokeOwner);
    }
    storage::set_listed(env, user, false);
    events::emit_access_changed(env, owner, user.clone(), false);
    Ok(())
}
