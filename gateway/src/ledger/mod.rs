//! Ledger connection: the call surface of the record-store contract

mod sandbox;
mod snapshot;

pub use sandbox::{SandboxLedger, SandboxOptions};
pub use snapshot::snapshot_path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stellar_strkey::Strkey;

use crate::error::LedgerError;
use crate::records::{
    Batch, BatchInfo, Certificate, CultivationDetails, FarmerInfo, LabResult, NewBatch,
    NewCertificate, NewCultivation, NewFarmerInfo, NewLabResult, NewProcessing, NewTraceData,
    NewTransfer, ProcessingInfo, TraceData, TransferRecord, TxReceipt,
};

/// Connection state reported by the status endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatus {
    pub status: ConnectionState,
    pub network: String,
    pub contract_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_owner: Option<String>,
    pub signer_address: String,
    pub signer_authorized: bool,
    pub transaction_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

impl LedgerStatus {
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionState::Connected
    }
}

/// Operations the gateway performs against the record store.
///
/// Writes are signed by the connection's own identity and resolve once the
/// invocation has committed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Probe the connection, updating its `connected` flag
    async fn test_connection(&self) -> bool;

    /// Current status; a disconnected store is probed exactly once first
    async fn status(&self) -> LedgerStatus;

    async fn create_batch(&self, batch: NewBatch) -> Result<TxReceipt, LedgerError>;

    async fn add_farmer_info(
        &self,
        batch_id: &str,
        info: NewFarmerInfo,
    ) -> Result<TxReceipt, LedgerError>;

    async fn add_cultivation_details(
        &self,
        batch_id: &str,
        details: NewCultivation,
    ) -> Result<TxReceipt, LedgerError>;

    async fn add_processing_info(
        &self,
        batch_id: &str,
        info: NewProcessing,
    ) -> Result<TxReceipt, LedgerError>;

    async fn add_lab_result(
        &self,
        batch_id: &str,
        result: NewLabResult,
    ) -> Result<TxReceipt, LedgerError>;

    async fn add_certificate(
        &self,
        batch_id: &str,
        certificate: NewCertificate,
    ) -> Result<TxReceipt, LedgerError>;

    async fn add_transfer_record(
        &self,
        batch_id: &str,
        transfer: NewTransfer,
    ) -> Result<TxReceipt, LedgerError>;

    async fn add_trace_data(
        &self,
        batch_id: &str,
        trace: NewTraceData,
    ) -> Result<TxReceipt, LedgerError>;

    async fn batch_exists(&self, batch_id: &str) -> Result<bool, LedgerError>;

    /// `None` when the batch was never created
    async fn get_batch(&self, batch_id: &str) -> Result<Option<Batch>, LedgerError>;

    async fn get_batch_count(&self) -> Result<u32, LedgerError>;

    async fn list_batches(&self, offset: u32, limit: u32) -> Result<Vec<String>, LedgerError>;

    async fn get_farmer_info(&self, batch_id: &str) -> Result<FarmerInfo, LedgerError>;

    async fn get_cultivation_details(
        &self,
        batch_id: &str,
    ) -> Result<CultivationDetails, LedgerError>;

    async fn get_processing_info(&self, batch_id: &str) -> Result<ProcessingInfo, LedgerError>;

    async fn get_lab_result(&self, batch_id: &str) -> Result<LabResult, LedgerError>;

    async fn get_certificate(&self, batch_id: &str) -> Result<Certificate, LedgerError>;

    async fn get_trace_data(&self, batch_id: &str) -> Result<TraceData, LedgerError>;

    async fn get_transfer_records(
        &self,
        batch_id: &str,
    ) -> Result<Vec<TransferRecord>, LedgerError>;

    async fn get_transfer_record_count(&self, batch_id: &str) -> Result<u32, LedgerError>;

    /// Allowlist management, signed as the owner
    async fn authorize_user(&self, address: &str) -> Result<TxReceipt, LedgerError>;

    async fn revoke_user(&self, address: &str) -> Result<TxReceipt, LedgerError>;

    async fn is_authorized(&self, address: &str) -> Result<bool, LedgerError>;

    /// Everything recorded for a batch, `None` if it does not exist
    async fn get_batch_info(&self, batch_id: &str) -> Result<Option<BatchInfo>, LedgerError> {
        let Some(batch) = self.get_batch(batch_id).await? else {
            return Ok(None);
        };

        Ok(Some(BatchInfo {
            batch_id: batch_id.to_string(),
            farmer: self.get_farmer_info(batch_id).await?,
            cultivation: self.get_cultivation_details(batch_id).await?,
            processing: self.get_processing_info(batch_id).await?,
            lab_result: self.get_lab_result(batch_id).await?,
            certificate: self.get_certificate(batch_id).await?,
            transfers: self.get_transfer_records(batch_id).await?,
            trace_data: self.get_trace_data(batch_id).await?,
            batch,
        }))
    }
}

/// Account (`G…`) or contract (`C…`) strkey with a valid checksum
pub fn is_valid_address(address: &str) -> bool {
    matches!(
        Strkey::from_string(address),
        Ok(Strkey::PublicKeyEd25519(_) | Strkey::Contract(_))
    )
}
