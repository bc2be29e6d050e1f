//! In-process ledger: the record-store contract on an embedded Soroban host
//!
//! The host is not `Send`, so it lives on a dedicated worker thread. Calls are
//! shipped to it as boxed jobs and answered over oneshot channels, which also
//! serializes every invocation. With a deployment file the ledger is kept in a
//! snapshot beside it, so restarts and other connections share one store.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use agro_trust::{AgroTrust, AgroTrustClient, ContractError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use soroban_ledger_snapshot::LedgerSnapshot;
use soroban_sdk::testutils::Ledger as _;
use soroban_sdk::{Address, Env, InvokeError, String as SorobanString};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::snapshot::{quiet_config, quiet_env, LedgerState};
use super::{is_valid_address, ConnectionState, LedgerStatus, RecordStore};
use crate::deployment::{contract_interface, Deployment};
use crate::error::LedgerError;
use crate::records::{
    Batch, Certificate, CultivationDetails, FarmerInfo, LabResult, NewBatch, NewCertificate,
    NewCultivation, NewFarmerInfo, NewLabResult, NewProcessing, NewTraceData, NewTransfer,
    ProcessingInfo, TraceData, TransferRecord, TxReceipt,
};

#[derive(Debug, Clone)]
pub struct SandboxOptions {
    pub network: String,
    /// Strkey of the signing identity. A fresh deployment makes it the owner;
    /// a random account is used when unset.
    pub signer: Option<String>,
    /// Deployment record to resume from and keep current. Without one the
    /// ledger lives in memory only.
    pub deployment_file: Option<PathBuf>,
}

impl Default for SandboxOptions {
    fn default() -> Self {
        Self {
            network: "sandbox".to_string(),
            signer: None,
            deployment_file: None,
        }
    }
}

type Job = Box<dyn FnOnce(&mut Host) + Send>;

struct Host {
    env: Env,
    client: AgroTrustClient<'static>,
    contract: Address,
    signer: Address,
    transactions: u64,
    state: Option<LedgerState>,
}

fn random_contract() -> String {
    stellar_strkey::Contract(rand::random()).to_string()
}

fn random_account() -> String {
    stellar_strkey::ed25519::PublicKey(rand::random()).to_string()
}

/// Bind the contract code to `contract` on `env`
fn attach(env: Env, contract: &str, signer: &str) -> Result<Host, LedgerError> {
    env.mock_all_auths();
    let contract = parse_address(&env, contract)?;
    env.register_at(&contract, AgroTrust, ());
    let client = AgroTrustClient::new(&env, &contract);
    let signer = parse_address(&env, signer)?;

    Ok(Host {
        env,
        client,
        contract,
        signer,
        transactions: 0,
        state: None,
    })
}

impl Host {
    /// Deploy under a fresh contract id and initialize with the signer as owner
    fn deploy(signer: &str) -> Result<Self, LedgerError> {
        let host = attach(quiet_env(), &random_contract(), signer)?;
        host.sync_clock();
        settle(host.client.try_initialize(&host.signer))?;
        Ok(host)
    }

    /// Reopen a record store from its ledger snapshot
    fn resume(snapshot: LedgerSnapshot, contract: &str, signer: &str) -> Result<Self, LedgerError> {
        let mut env = Env::from_ledger_snapshot(snapshot);
        env.set_config(quiet_config());
        let host = attach(env, contract, signer)?;
        settle(host.client.try_get_owner())?;
        Ok(host)
    }

    fn describe(&self, network: &str) -> Result<Deployment, LedgerError> {
        let owner = settle(self.client.try_get_owner())?;
        Ok(Deployment::new(
            address_text(&self.contract),
            address_text(&owner),
            address_text(&self.signer),
            network.to_string(),
        ))
    }

    /// Pick up a ledger another connection committed since our last look
    fn refresh(&mut self) -> Result<(), LedgerError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        let Some(snapshot) = state.changed()? else {
            return Ok(());
        };

        let reopened = Host::resume(
            snapshot,
            &address_text(&self.contract),
            &address_text(&self.signer),
        )?;
        self.env = reopened.env;
        self.client = reopened.client;
        self.contract = reopened.contract;
        self.signer = reopened.signer;
        debug!("Ledger reloaded from snapshot");
        Ok(())
    }

    fn persist(&mut self) -> Result<(), LedgerError> {
        match &mut self.state {
            Some(state) => state.save(&self.env),
            None => Ok(()),
        }
    }

    /// Move ledger time to the wall clock; never backwards.
    fn sync_clock(&self) {
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        let current = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(now.max(current));
        lift_budget(&self.env);
    }

    fn receipt(&mut self, op: &str, key: &str) -> TxReceipt {
        self.transactions += 1;

        let mut hasher = Sha256::new();
        hasher.update(address_text(&self.contract).as_bytes());
        hasher.update(self.transactions.to_be_bytes());
        hasher.update(rand::random::<[u8; 16]>());
        hasher.update(op.as_bytes());
        hasher.update(key.as_bytes());

        TxReceipt {
            transaction_hash: format!("0x{}", hex::encode(hasher.finalize())),
            ledger_timestamp: self.env.ledger().timestamp(),
        }
    }

    fn text(&self, value: &str) -> SorobanString {
        SorobanString::from_str(&self.env, value)
    }
}

// The host meters every invocation; the gateway is long-lived so lift the cap.
#[allow(deprecated)]
fn lift_budget(env: &Env) {
    env.budget().reset_unlimited();
}

/// Resume the recorded deployment when its snapshot exists, else deploy anew
fn open(options: &SandboxOptions) -> Result<(Host, Deployment), LedgerError> {
    let fresh_signer = || options.signer.clone().unwrap_or_else(random_account);

    let Some(file) = &options.deployment_file else {
        let host = Host::deploy(&fresh_signer())?;
        let deployment = host.describe(&options.network)?;
        return Ok((host, deployment));
    };

    let mut state = LedgerState::new(file);
    let (mut host, deployment) = match state.load()? {
        Some((record, snapshot)) => {
            let signer = options
                .signer
                .clone()
                .unwrap_or_else(|| record.signer.clone());
            let host = Host::resume(snapshot, &record.address, &signer)?;
            if record.network != options.network {
                warn!(
                    recorded = %record.network,
                    configured = %options.network,
                    "Network name differs from the deployment record; keeping the record's"
                );
            }
            info!(contract = %record.address, path = %file.display(), "Resuming recorded deployment");
            let deployment = Deployment {
                signer,
                functions: contract_interface(),
                ..record
            };
            (host, deployment)
        }
        None => {
            let host = Host::deploy(&fresh_signer())?;
            let deployment = host.describe(&options.network)?;
            (host, deployment)
        }
    };

    state.save_record(&deployment)?;
    state.save(&host.env)?;
    host.state = Some(state);
    Ok((host, deployment))
}

fn run_host(
    options: SandboxOptions,
    mut jobs: mpsc::UnboundedReceiver<Job>,
    ready: oneshot::Sender<Result<Deployment, LedgerError>>,
) {
    let (mut host, deployment) = match panic::catch_unwind(AssertUnwindSafe(|| open(&options))) {
        Ok(Ok(opened)) => opened,
        Ok(Err(err)) => {
            let _ = ready.send(Err(LedgerError::Startup(err.to_string())));
            return;
        }
        Err(_) => {
            let _ = ready.send(Err(LedgerError::Startup(
                "contract deployment panicked".to_string(),
            )));
            return;
        }
    };

    if ready.send(Ok(deployment)).is_err() {
        return;
    }

    while let Some(job) = jobs.blocking_recv() {
        // A panicking job drops its reply channel; the caller sees `Aborted`.
        let ran = panic::catch_unwind(AssertUnwindSafe(|| {
            if let Err(err) = host.refresh() {
                warn!(error = %err, "Failed to reload ledger snapshot");
            }
            host.sync_clock();
            job(&mut host)
        }));
        if ran.is_err() {
            warn!("Ledger job panicked");
        }
    }

    debug!("Ledger worker stopped");
}

/// Record-store connection backed by an embedded Soroban host.
///
/// Without a deployment file the host state lives as long as the last clone.
#[derive(Clone)]
pub struct SandboxLedger {
    jobs: mpsc::UnboundedSender<Job>,
    deployment: Arc<Deployment>,
    connected: Arc<AtomicBool>,
}

impl SandboxLedger {
    /// Spawn the worker and open the record store: resumed from the deployment
    /// file when one is recorded, otherwise deployed and initialized
    pub async fn start(options: SandboxOptions) -> Result<Self, LedgerError> {
        let (jobs, receiver) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        thread::Builder::new()
            .name("ledger-worker".to_string())
            .spawn(move || run_host(options, receiver, ready_tx))
            .map_err(|e| LedgerError::Startup(e.to_string()))?;

        let deployment = ready_rx
            .await
            .map_err(|_| LedgerError::Startup("ledger worker exited".to_string()))??;

        info!(
            contract = %deployment.address,
            owner = %deployment.owner,
            network = %deployment.network,
            "Record store ready"
        );

        Ok(Self {
            jobs,
            deployment: Arc::new(deployment),
            connected: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    async fn call<T, F>(&self, op: &'static str, f: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Host) -> Result<T, LedgerError> + Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |host: &mut Host| {
            let _ = reply.send(f(host));
        });

        if self.jobs.send(job).is_err() {
            self.connected.store(false, Ordering::SeqCst);
            return Err(LedgerError::Disconnected);
        }

        response.await.unwrap_or_else(|_| {
            self.connected.store(false, Ordering::SeqCst);
            Err(LedgerError::Aborted(op))
        })
    }

    /// Run a mutating invocation and issue a receipt once it commits
    async fn submit<F>(&self, op: &'static str, key: String, f: F) -> Result<TxReceipt, LedgerError>
    where
        F: FnOnce(&Host) -> Result<(), LedgerError> + Send + 'static,
    {
        let logged_key = key.clone();
        let result = self
            .call(op, move |host| {
                f(&*host)?;
                host.persist()?;
                Ok(host.receipt(op, &key))
            })
            .await;

        match &result {
            Ok(receipt) => info!(
                op,
                key = %logged_key,
                tx = %receipt.transaction_hash,
                "Ledger transaction committed"
            ),
            Err(err) => warn!(op, key = %logged_key, error = %err, "Ledger transaction failed"),
        }
        result
    }

    fn report(
        &self,
        status: ConnectionState,
        owner: Option<String>,
        signer_authorized: bool,
        transaction_count: u64,
        error: Option<String>,
    ) -> LedgerStatus {
        LedgerStatus {
            status,
            network: self.deployment.network.clone(),
            contract_address: self.deployment.address.clone(),
            contract_owner: owner,
            signer_address: self.deployment.signer.clone(),
            signer_authorized,
            transaction_count,
            error,
        }
    }
}

#[async_trait]
impl RecordStore for SandboxLedger {
    async fn test_connection(&self) -> bool {
        let probe = self
            .call("get_owner", |host| {
                settle(host.client.try_get_owner()).map(|owner| address_text(&owner))
            })
            .await;
        let connected = probe.is_ok();
        if let Err(err) = probe {
            warn!(error = %err, "Ledger connection test failed");
        }
        self.connected.store(connected, Ordering::SeqCst);
        connected
    }

    async fn status(&self) -> LedgerStatus {
        if !self.connected.load(Ordering::SeqCst) && !self.test_connection().await {
            return self.report(
                ConnectionState::Disconnected,
                None,
                false,
                0,
                Some("Ledger connection failed".to_string()),
            );
        }

        let probe = self
            .call("status", |host| {
                let owner = settle(host.client.try_get_owner())?;
                let authorized = settle(host.client.try_is_authorized(&host.signer))?;
                Ok((address_text(&owner), authorized, host.transactions))
            })
            .await;

        match probe {
            Ok((owner, authorized, transactions)) => self.report(
                ConnectionState::Connected,
                Some(owner),
                authorized,
                transactions,
                None,
            ),
            Err(err) => {
                self.connected.store(false, Ordering::SeqCst);
                self.report(ConnectionState::Disconnected, None, false, 0, Some(err.to_string()))
            }
        }
    }

    async fn create_batch(&self, batch: NewBatch) -> Result<TxReceipt, LedgerError> {
        self.submit("create_batch", batch.batch_id.clone(), move |host| {
            settle(host.client.try_create_batch(
                &host.signer,
                &host.text(&batch.batch_id),
                &host.text(&batch.crop_name),
                &host.text(&batch.variety),
                &host.text(&batch.location),
                &batch.harvest_date,
            ))
        })
        .await
    }

    async fn add_farmer_info(
        &self,
        batch_id: &str,
        info: NewFarmerInfo,
    ) -> Result<TxReceipt, LedgerError> {
        let id = batch_id.to_string();
        self.submit("add_farmer_info", id.clone(), move |host| {
            settle(host.client.try_add_farmer_info(
                &host.signer,
                &host.text(&id),
                &host.text(&info.farmer_name),
                &host.text(&info.farm_location),
                &host.text(&info.contact),
                &host.text(&info.farmer_id),
            ))
        })
        .await
    }

    async fn add_cultivation_details(
        &self,
        batch_id: &str,
        details: NewCultivation,
    ) -> Result<TxReceipt, LedgerError> {
        let id = batch_id.to_string();
        self.submit("add_cultivation_details", id.clone(), move |host| {
            settle(host.client.try_add_cultivation_details(
                &host.signer,
                &host.text(&id),
                &host.text(&details.soil_type),
                &host.text(&details.irrigation_type),
                &host.text(&details.pesticide_used),
                &details.sowing_date,
                &details.area,
            ))
        })
        .await
    }

    async fn add_processing_info(
        &self,
        batch_id: &str,
        info: NewProcessing,
    ) -> Result<TxReceipt, LedgerError> {
        let id = batch_id.to_string();
        self.submit("add_processing_info", id.clone(), move |host| {
            settle(host.client.try_add_processing_info(
                &host.signer,
                &host.text(&id),
                &host.text(&info.processor_name),
                &host.text(&info.method),
                &info.processing_date,
                &host.text(&info.processing_unit_id),
            ))
        })
        .await
    }

    async fn add_lab_result(
        &self,
        batch_id: &str,
        result: NewLabResult,
    ) -> Result<TxReceipt, LedgerError> {
        let id = batch_id.to_string();
        self.submit("add_lab_result", id.clone(), move |host| {
            settle(host.client.try_add_lab_result(
                &host.signer,
                &host.text(&id),
                &host.text(&result.lab_name),
                &host.text(&result.result),
                &result.test_date,
                &host.text(&result.report_hash),
            ))
        })
        .await
    }

    async fn add_certificate(
        &self,
        batch_id: &str,
        certificate: NewCertificate,
    ) -> Result<TxReceipt, LedgerError> {
        let id = batch_id.to_string();
        self.submit("add_certificate", id.clone(), move |host| {
            settle(host.client.try_add_certificate(
                &host.signer,
                &host.text(&id),
                &host.text(&certificate.issued_by),
                &host.text(&certificate.certificate_type),
                &certificate.issue_date,
                &host.text(&certificate.certificate_id),
            ))
        })
        .await
    }

    async fn add_transfer_record(
        &self,
        batch_id: &str,
        transfer: NewTransfer,
    ) -> Result<TxReceipt, LedgerError> {
        let id = batch_id.to_string();
        self.submit("add_transfer_record", id.clone(), move |host| {
            settle(host.client.try_add_transfer_record(
                &host.signer,
                &host.text(&id),
                &host.text(&transfer.from),
                &host.text(&transfer.to),
                &host.text(&transfer.purpose),
                &transfer.transfer_date,
            ))
            .map(|_index| ())
        })
        .await
    }

    async fn add_trace_data(
        &self,
        batch_id: &str,
        trace: NewTraceData,
    ) -> Result<TxReceipt, LedgerError> {
        let id = batch_id.to_string();
        self.submit("add_trace_data", id.clone(), move |host| {
            settle(host.client.try_add_trace_data(
                &host.signer,
                &host.text(&id),
                &host.text(&trace.notes),
                &host.text(&trace.qr_code_hash),
            ))
        })
        .await
    }

    async fn batch_exists(&self, batch_id: &str) -> Result<bool, LedgerError> {
        let id = batch_id.to_string();
        self.call("batch_exists", move |host| {
            settle(host.client.try_batch_exists(&host.text(&id)))
        })
        .await
    }

    async fn get_batch(&self, batch_id: &str) -> Result<Option<Batch>, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_batch", move |host| {
            match settle(host.client.try_get_batch(&host.text(&id))) {
                Ok(batch) => Ok(Some(batch.into())),
                Err(LedgerError::Contract(ContractError::BatchNotFound)) => Ok(None),
                Err(err) => Err(err),
            }
        })
        .await
    }

    async fn get_batch_count(&self) -> Result<u32, LedgerError> {
        self.call("get_batch_count", |host| {
            settle(host.client.try_get_batch_count())
        })
        .await
    }

    async fn list_batches(&self, offset: u32, limit: u32) -> Result<Vec<String>, LedgerError> {
        self.call("list_batches", move |host| {
            let ids = settle(host.client.try_list_batches(&offset, &limit))?;
            Ok(ids.iter().map(|id| owned(&id)).collect())
        })
        .await
    }

    async fn get_farmer_info(&self, batch_id: &str) -> Result<FarmerInfo, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_farmer_info", move |host| {
            settle(host.client.try_get_farmer_info(&host.text(&id))).map(Into::into)
        })
        .await
    }

    async fn get_cultivation_details(
        &self,
        batch_id: &str,
    ) -> Result<CultivationDetails, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_cultivation_details", move |host| {
            settle(host.client.try_get_cultivation_details(&host.text(&id))).map(Into::into)
        })
        .await
    }

    async fn get_processing_info(&self, batch_id: &str) -> Result<ProcessingInfo, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_processing_info", move |host| {
            settle(host.client.try_get_processing_info(&host.text(&id))).map(Into::into)
        })
        .await
    }

    async fn get_lab_result(&self, batch_id: &str) -> Result<LabResult, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_lab_result", move |host| {
            settle(host.client.try_get_lab_result(&host.text(&id))).map(Into::into)
        })
        .await
    }

    async fn get_certificate(&self, batch_id: &str) -> Result<Certificate, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_certificate", move |host| {
            settle(host.client.try_get_certificate(&host.text(&id))).map(Into::into)
        })
        .await
    }

    async fn get_trace_data(&self, batch_id: &str) -> Result<TraceData, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_trace_data", move |host| {
            settle(host.client.try_get_trace_data(&host.text(&id))).map(Into::into)
        })
        .await
    }

    async fn get_transfer_records(
        &self,
        batch_id: &str,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_transfer_records", move |host| {
            let records = settle(host.client.try_get_transfer_records(&host.text(&id)))?;
            Ok(records
                .iter()
                .zip(0u32..)
                .map(|(record, index)| transfer_view(index, record))
                .collect())
        })
        .await
    }

    async fn get_transfer_record_count(&self, batch_id: &str) -> Result<u32, LedgerError> {
        let id = batch_id.to_string();
        self.call("get_transfer_record_count", move |host| {
            settle(host.client.try_get_transfer_record_count(&host.text(&id)))
        })
        .await
    }

    async fn authorize_user(&self, address: &str) -> Result<TxReceipt, LedgerError> {
        let strkey = address.to_string();
        self.submit("authorize_user", strkey.clone(), move |host| {
            let user = parse_address(&host.env, &strkey)?;
            settle(host.client.try_authorize_user(&host.signer, &user))
        })
        .await
    }

    async fn revoke_user(&self, address: &str) -> Result<TxReceipt, LedgerError> {
        let strkey = address.to_string();
        self.submit("revoke_user", strkey.clone(), move |host| {
            let user = parse_address(&host.env, &strkey)?;
            settle(host.client.try_revoke_user(&host.signer, &user))
        })
        .await
    }

    async fn is_authorized(&self, address: &str) -> Result<bool, LedgerError> {
        let strkey = address.to_string();
        self.call("is_authorized", move |host| {
            let user = parse_address(&host.env, &strkey)?;
            settle(host.client.try_is_authorized(&user))
        })
        .await
    }
}

/// Flatten the nested result of a `try_` client call
fn settle<T, C, E>(
    result: Result<Result<T, C>, Result<E, InvokeError>>,
) -> Result<T, LedgerError>
where
    C: std::fmt::Debug,
    E: Into<LedgerError>,
{
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(conversion)) => Err(LedgerError::Host(format!(
            "unexpected return value: {conversion:?}"
        ))),
        Err(Ok(err)) => Err(err.into()),
        Err(Err(invoke)) => Err(LedgerError::Host(format!("invocation failed: {invoke:?}"))),
    }
}

impl From<soroban_sdk::Error> for LedgerError {
    fn from(err: soroban_sdk::Error) -> Self {
        LedgerError::Host(format!("{err:?}"))
    }
}

fn parse_address(env: &Env, strkey: &str) -> Result<Address, LedgerError> {
    if !is_valid_address(strkey) {
        return Err(LedgerError::InvalidAddress(strkey.to_string()));
    }
    Ok(Address::from_string(&SorobanString::from_str(env, strkey)))
}

fn owned(value: &SorobanString) -> String {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn address_text(address: &Address) -> String {
    owned(&address.to_string())
}

fn transfer_view(index: u32, record: agro_trust::TransferRecord) -> TransferRecord {
    TransferRecord {
        index,
        from: owned(&record.from),
        to: owned(&record.to),
        purpose: owned(&record.purpose),
        transfer_date: record.transfer_date,
        recorded_at: record.recorded_at,
    }
}

impl From<agro_trust::Batch> for Batch {
    fn from(batch: agro_trust::Batch) -> Self {
        Self {
            batch_id: owned(&batch.batch_id),
            crop_name: owned(&batch.crop_name),
            variety: owned(&batch.variety),
            location: owned(&batch.location),
            harvest_date: batch.harvest_date,
            created_at: batch.created_at,
            exists: batch.exists,
        }
    }
}

impl From<agro_trust::FarmerInfo> for FarmerInfo {
    fn from(info: agro_trust::FarmerInfo) -> Self {
        Self {
            farmer_name: owned(&info.farmer_name),
            farm_location: owned(&info.farm_location),
            contact: owned(&info.contact),
            farmer_id: owned(&info.farmer_id),
            exists: info.exists,
        }
    }
}

impl From<agro_trust::CultivationDetails> for CultivationDetails {
    fn from(details: agro_trust::CultivationDetails) -> Self {
        Self {
            soil_type: owned(&details.soil_type),
            irrigation_type: owned(&details.irrigation_type),
            pesticide_used: owned(&details.pesticide_used),
            sowing_date: details.sowing_date,
            area: details.area,
            exists: details.exists,
        }
    }
}

impl From<agro_trust::ProcessingInfo> for ProcessingInfo {
    fn from(info: agro_trust::ProcessingInfo) -> Self {
        Self {
            processor_name: owned(&info.processor_name),
            method: owned(&info.method),
            processing_date: info.processing_date,
            processing_unit_id: owned(&info.processing_unit_id),
            exists: info.exists,
        }
    }
}

impl From<agro_trust::LabResult> for LabResult {
    fn from(result: agro_trust::LabResult) -> Self {
        Self {
            lab_name: owned(&result.lab_name),
            result: owned(&result.result),
            test_date: result.test_date,
            report_hash: owned(&result.report_hash),
            exists: result.exists,
        }
    }
}

impl From<agro_trust::Certificate> for Certificate {
    fn from(certificate: agro_trust::Certificate) -> Self {
        Self {
            issued_by: owned(&certificate.issued_by),
            certificate_type: owned(&certificate.certificate_type),
            issue_date: certificate.issue_date,
            certificate_id: owned(&certificate.certificate_id),
            exists: certificate.exists,
        }
    }
}

impl From<agro_trust::TraceData> for TraceData {
    fn from(trace: agro_trust::TraceData) -> Self {
        Self {
            notes: owned(&trace.notes),
            qr_code_hash: owned(&trace.qr_code_hash),
            exists: trace.exists,
        }
    }
}
