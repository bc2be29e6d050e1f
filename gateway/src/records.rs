//! Record views served by the API and the inputs accepted for writes
//!
//! Views mirror the contract's stored structs with owned strings and
//! camelCase JSON field names.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub batch_id: String,
    pub crop_name: String,
    pub variety: String,
    pub location: String,
    pub harvest_date: u64,
    pub created_at: u64,
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerInfo {
    pub farmer_name: String,
    pub farm_location: String,
    pub contact: String,
    pub farmer_id: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultivationDetails {
    pub soil_type: String,
    pub irrigation_type: String,
    pub pesticide_used: String,
    pub sowing_date: u64,
    pub area: u64,
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingInfo {
    pub processor_name: String,
    pub method: String,
    pub processing_date: u64,
    pub processing_unit_id: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub lab_name: String,
    pub result: String,
    pub test_date: u64,
    pub report_hash: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub issued_by: String,
    pub certificate_type: String,
    pub issue_date: u64,
    pub certificate_id: String,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub index: u32,
    pub from: String,
    pub to: String,
    pub purpose: String,
    pub transfer_date: u64,
    pub recorded_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceData {
    pub notes: String,
    pub qr_code_hash: String,
    pub exists: bool,
}

/// Everything recorded against one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInfo {
    pub batch_id: String,
    pub batch: Batch,
    pub farmer: FarmerInfo,
    pub cultivation: CultivationDetails,
    pub processing: ProcessingInfo,
    pub lab_result: LabResult,
    pub certificate: Certificate,
    pub transfers: Vec<TransferRecord>,
    pub trace_data: TraceData,
}

/// Short form shown on lookup pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: String,
    pub crop: String,
    pub location: String,
    pub harvest_date: u64,
    pub farmer: String,
    pub farm_location: String,
}

impl BatchSummary {
    pub fn new(batch: &Batch, farmer: &FarmerInfo) -> Self {
        Self {
            batch_id: batch.batch_id.clone(),
            crop: format!("{} - {}", batch.crop_name, batch.variety),
            location: batch.location.clone(),
            harvest_date: batch.harvest_date,
            farmer: farmer.farmer_name.clone(),
            farm_location: farmer.farm_location.clone(),
        }
    }
}

// Validated write inputs. Strings are trimmed and non-empty, dates are unix seconds.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBatch {
    pub batch_id: String,
    pub crop_name: String,
    pub variety: String,
    pub location: String,
    pub harvest_date: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFarmerInfo {
    pub farmer_name: String,
    pub farm_location: String,
    pub contact: String,
    pub farmer_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCultivation {
    pub soil_type: String,
    pub irrigation_type: String,
    pub pesticide_used: String,
    pub sowing_date: u64,
    pub area: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProcessing {
    pub processor_name: String,
    pub method: String,
    pub processing_date: u64,
    pub processing_unit_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabResult {
    pub lab_name: String,
    pub result: String,
    pub test_date: u64,
    pub report_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCertificate {
    pub issued_by: String,
    pub certificate_type: String,
    pub issue_date: u64,
    pub certificate_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransfer {
    pub from: String,
    pub to: String,
    pub purpose: String,
    pub transfer_date: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTraceData {
    pub notes: String,
    pub qr_code_hash: String,
}

/// Acknowledgement for a committed ledger invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: String,
    pub ledger_timestamp: u64,
}
