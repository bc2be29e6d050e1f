//! Single-slot records attached to an existing batch.
//!
//! A second add for the same batch and kind replaces the stored value
//! (amendment). The `record_added` event tells the two cases apart.

use crate::access;
use crate::batch;
use crate::error::ContractError;
use crate::events::emit_record_added;
use crate::storage::{
    self, Certificate, CultivationDetails, FarmerInfo, LabResult, ProcessingInfo, RecordKind,
    TraceData,
};
use soroban_sdk::{Address, Env, IntoVal, String, Val};

fn put_record<V>(
    env: &Env,
    caller: &Address,
    batch_id: String,
    kind: RecordKind,
    record: &V,
) -> Result<(), ContractError>
where
    V: IntoVal<Env, Val>,
{
    access::require_authorized(env, caller)?;
    batch::ensure_exists(env, &batch_id)?;

    let amended = storage::has_record(env, kind, &batch_id);
    storage::set_record(env, kind, &batch_id, record);

    emit_record_added(env, batch_id, kind, caller.clone(), amended);
    Ok(())
}

pub fn add_farmer_info(
    env: &Env,
    caller: &Address,
    batch_id: String,
    farmer_name: String,
    farm_location: String,
    contact: String,
    farmer_id: String,
) -> Result<(), ContractError> {
    let record = FarmerInfo {
        farmer_name,
        farm_location,
        contact,
        farmer_id,
        exists: true,
    };
    put_record(env, caller, batch_id, RecordKind::Farmer, &record)
}

pub fn add_cultivation_details(
    env: &Env,
    caller: &Address,
    batch_id: String,
    soil_type: String,
    irrigation_type: String,
    pesticide_used: String,
    sowing_date: u64,
    area: u64,
) -> Result<(), ContractError> {
    let record = CultivationDetails {
        soil_type,
        irrigation_type,
        pesticide_used,
        sowing_date,
        area,
        exists: true,
    };
    put_record(env, caller, batch_id, RecordKind::Cultivation, &record)
}

pub fn add_processing_info(
    env: &Env,
    caller: &Address,
    batch_id: String,
    processor_name: String,
    method: String,
    processing_date: u64,
    processing_unit_id: String,
) -> Result<(), ContractError> {
    let record = ProcessingInfo {
        processor_name,
        method,
        processing_date,
        processing_unit_id,
        exists: true,
    };
    put_record(env, caller, batch_id, RecordKind::Processing, &record)
}

pub fn add_lab_result(
    env: &Env,
    caller: &Address,
    batch_id: String,
    lab_name: String,
    result: String,
    test_date: u64,
    report_hash: String,
) -> Result<(), ContractError> {
    let record = LabResult {
        lab_name,
        result,
        test_date,
        report_hash,
        exists: true,
    };
    put_record(env, caller, batch_id, RecordKind::LabResult, &record)
}

pub fn add_certificate(
    env: &Env,
    caller: &Address,
    batch_id: String,
    issued_by: String,
    certificate_type: String,
    issue_date: u64,
    certificate_id: String,
) -> Result<(), ContractError> {
    let record = Certificate {
        issued_by,
        certificate_type,
        issue_date,
        certificate_id,
        exists: true,
    };
    put_record(env, caller, batch_id, RecordKind::Certificate, &record)
}

pub fn add_trace_data(
    env: &Env,
    caller: &Address,
    batch_id: String,
    notes: String,
    qr_code_hash: String,
) -> Result<(), ContractError> {
    let record = TraceData {
        notes,
        qr_code_hash,
        exists: true,
    };
    put_record(env, caller, batch_id, RecordKind::Trace, &record)
}

// Reads never fail: an unwritten slot comes back with `exists == false`.

pub fn get_farmer_info(env: &Env, batch_id: String) -> FarmerInfo {
    storage::get_record(env, RecordKind::Farmer, &batch_id).unwrap_or(FarmerInfo::empty(env))
}

pub fn get_cultivation_details(env: &Env, batch_id: String) -> CultivationDetails {
    storage::get_record(env, RecordKind::Cultivation, &batch_id)
        .unwrap_or(CultivationDetails::empty(env))
}

pub fn get_processing_info(env: &Env, batch_id: String) -> ProcessingInfo {
    storage::get_record(env, RecordKind::Processing, &batch_id)
        .unwrap_or(ProcessingInfo::empty(env))
}

pub fn get_lab_result(env: &Env, batch_id: String) -> LabResult {
    storage::get_record(env, RecordKind::LabResult, &batch_id).unwrap_or(LabResult::empty(env))
}

pub fn get_certificate(env: &Env, batch_id: String) -> Certificate {
    storage::get_record(env, RecordKind::Certificate, &batch_id)
        .unwrap_or(Certificate::empty(env))
}

pub fn get_trace_data(env: &Env, batch_id: String) -> TraceData {
    storage::get_record(env, RecordKind::Trace, &batch_id).unwrap_or(TraceData::empty(env))
}
