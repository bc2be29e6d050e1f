#![no_std]

mod access;
mod batch;
mod error;
mod events;
mod records;
mod storage;
mod transfers;

#[cfg(test)]
mod tests;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

pub use error::*;
pub use events::*;
pub use storage::{
    Batch, Certificate, CultivationDetails, FarmerInfo, LabResult, ProcessingInfo, RecordKind,
    StorageKey, TraceData, TransferRecord,
};

#[contract]
pub struct AgroTrust;

#[contractimpl]
impl AgroTrust {
    /// Initialize the record store with its owner
    pub fn initialize(env: Env, owner: Address) -> Result<(), ContractError> {
        access::initialize(&env, &owner)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        access::get_owner(&env)
    }

    /// Add an address to the allowlist (owner only)
    pub fn authorize_user(env: Env, caller: Address, user: Address) -> Result<(), ContractError> {
        access::authorize_user(&env, &caller, &user)
    }

    /// Remove an address from the allowlist (owner only)
    pub fn revoke_user(env: Env, caller: Address, user: Address) -> Result<(), ContractError> {
        access::revoke_user(&env, &caller, &user)
    }

    pub fn is_authorized(env: Env, user: Address) -> bool {
        access::is_authorized(&env, &user)
    }

    /// Create a new batch; IDs are unique and never reassigned
    pub fn create_batch(
        env: Env,
        caller: Address,
        batch_id: String,
        crop_name: String,
        variety: String,
        location: String,
        harvest_date: u64,
    ) -> Result<(), ContractError> {
        batch::create_batch(&env, &caller, batch_id, crop_name, variety, location, harvest_date)
    }

    pub fn batch_exists(env: Env, batch_id: String) -> bool {
        batch::batch_exists(&env, &batch_id)
    }

    pub fn get_batch(env: Env, batch_id: String) -> Result<Batch, ContractError> {
        batch::get_batch(&env, batch_id)
    }

    pub fn get_batch_count(env: Env) -> u32 {
        batch::get_batch_count(&env)
    }

    /// Page through batch IDs in creation order
    pub fn list_batches(env: Env, offset: u32, limit: u32) -> Vec<String> {
        batch::list_batches(&env, offset, limit)
    }

    pub fn add_farmer_info(
        env: Env,
        caller: Address,
        batch_id: String,
        farmer_name: String,
        farm_location: String,
        contact: String,
        farmer_id: String,
    ) -> Result<(), ContractError> {
        records::add_farmer_info(
            &env,
            &caller,
            batch_id,
            farmer_name,
            farm_location,
            contact,
            farmer_id,
        )
    }

    pub fn add_cultivation_details(
        env: Env,
        caller: Address,
        batch_id: String,
        soil_type: String,
        irrigation_type: String,
        pesticide_used: String,
        sowing_date: u64,
        area: u64,
    ) -> Result<(), ContractError> {
        records::add_cultivation_details(
            &env,
            &caller,
            batch_id,
            soil_type,
            irrigation_type,
            pesticide_used,
            sowing_date,
            area,
        )
    }

    pub fn add_processing_info(
        env: Env,
        caller: Address,
        batch_id: String,
        processor_name: String,
        method: String,
        processing_date: u64,
        processing_unit_id: String,
    ) -> Result<(), ContractError> {
        records::add_processing_info(
            &env,
            &caller,
            batch_id,
            processor_name,
            method,
            processing_date,
            processing_unit_id,
        )
    }

    pub fn add_lab_result(
        env: Env,
        caller: Address,
        batch_id: String,
        lab_name: String,
        result: String,
        test_date: u64,
        report_hash: String,
    ) -> Result<(), ContractError> {
        records::add_lab_result(&env, &caller, batch_id, lab_name, result, test_date, report_hash)
    }

    pub fn add_certificate(
        env: Env,
        caller: Address,
        batch_id: String,
        issued_by: String,
        certificate_type: String,
        issue_date: u64,
        certificate_id: String,
    ) -> Result<(), ContractError> {
        records::add_certificate(
            &env,
            &caller,
            batch_id,
            issued_by,
            certificate_type,
            issue_date,
            certificate_id,
        )
    }

    pub fn add_trace_data(
        env: Env,
        caller: Address,
        batch_id: String,
        notes: String,
        qr_code_hash: String,
    ) -> Result<(), ContractError> {
        records::add_trace_data(&env, &caller, batch_id, notes, qr_code_hash)
    }

    /// Append a custody change; returns its position in the transfer log
    pub fn add_transfer_record(
        env: Env,
        caller: Address,
        batch_id: String,
        from: String,
        to: String,
        purpose: String,
        transfer_date: u64,
    ) -> Result<u32, ContractError> {
        transfers::add_transfer_record(&env, &caller, batch_id, from, to, purpose, transfer_date)
    }

    pub fn get_farmer_info(env: Env, batch_id: String) -> FarmerInfo {
        records::get_farmer_info(&env, batch_id)
    }

    pub fn get_cultivation_details(env: Env, batch_id: String) -> CultivationDetails {
        records::get_cultivation_details(&env, batch_id)
    }

    pub fn get_processing_info(env: Env, batch_id: String) -> ProcessingInfo {
        records::get_processing_info(&env, batch_id)
    }

    pub fn get_lab_result(env: Env, batch_id: String) -> LabResult {
        records::get_lab_result(&env, batch_id)
    }

    pub fn get_certificate(env: Env, batch_id: String) -> Certificate {
        records::get_certificate(&env, batch_id)
    }

    pub fn get_trace_data(env: Env, batch_id: String) -> TraceData {
        records::get_trace_data(&env, batch_id)
    }

    pub fn get_transfer_records(env: Env, batch_id: String) -> Vec<TransferRecord> {
        transfers::get_transfer_records(&env, batch_id)
    }

    pub fn get_transfer_record(
        env: Env,
        batch_id: String,
        index: u32,
    ) -> Result<TransferRecord, ContractError> {
        transfers::get_transfer_record(&env, batch_id, index)
    }

    pub fn get_transfer_record_count(env: Env, batch_id: String) -> u32 {
        transfers::get_transfer_record_count(&env, batch_id)
    }
}
