//! Data-entry wizard
//!
//! Replays the nine-step entry flow from a TOML manifest: batch (or a CSV
//! bulk upload), farmer, cultivation, processing, lab, certificate, transfer
//! and trace. Sections are optional; each present one is submitted once, in
//! order, and the run stops at the first failure. Nothing is rolled back, so
//! a failed run is resumed by removing the completed sections.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::csv_import::{self, CsvError, ImportReport};
use crate::deployment::Deployment;
use crate::error::LedgerError;
use crate::forms::{
    BatchForm, CertificateForm, CultivationForm, FarmerForm, FormError, LabResultForm,
    ProcessingForm, TraceForm, TransferForm,
};
use crate::ledger::{LedgerStatus, RecordStore};
use crate::routes::ApiResponse;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("invalid manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with an error envelope
    #[error("{0}")]
    Rejected(String),

    #[error("gateway ledger is disconnected: {0}")]
    Disconnected(String),

    #[error("gateway serves contract {actual}, deployment record names {expected}")]
    ContractMismatch { expected: String, actual: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvSection {
    /// Relative paths resolve against the manifest's directory
    pub path: PathBuf,
}

/// Wizard input; field names follow the API's JSON forms
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// Used by every section that does not name its own batch
    pub batch_id: Option<String>,
    pub batch: Option<BatchForm>,
    pub csv: Option<CsvSection>,
    pub farmer: Option<FarmerForm>,
    pub cultivation: Option<CultivationForm>,
    pub processing: Option<ProcessingForm>,
    pub lab: Option<LabResultForm>,
    pub certificate: Option<CertificateForm>,
    pub transfer: Option<TransferForm>,
    pub trace: Option<TraceForm>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Batch,
    CsvUpload,
    Farmer,
    Cultivation,
    Processing,
    LabResult,
    Certificate,
    Transfer,
    Trace,
}

impl StepKind {
    /// Gateway path, relative to the API base
    pub fn endpoint(&self) -> &'static str {
        match self {
            StepKind::Batch => "/batches/add-batch",
            StepKind::CsvUpload => "/batches/upload-csv",
            StepKind::Farmer => "/batches/add-farmer",
            StepKind::Cultivation => "/batches/add-cultivation",
            StepKind::Processing => "/batches/add-processing",
            StepKind::LabResult => "/batches/add-lab-result",
            StepKind::Certificate => "/batches/add-certificate",
            StepKind::Transfer => "/batches/add-transfer",
            StepKind::Trace => "/batches/add-trace-data",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Batch => "batch",
            StepKind::CsvUpload => "csv upload",
            StepKind::Farmer => "farmer",
            StepKind::Cultivation => "cultivation",
            StepKind::Processing => "processing",
            StepKind::LabResult => "lab result",
            StepKind::Certificate => "certificate",
            StepKind::Transfer => "transfer",
            StepKind::Trace => "trace",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    Batch(BatchForm),
    CsvUpload { file_name: String, content: String },
    Farmer(FarmerForm),
    Cultivation(CultivationForm),
    Processing(ProcessingForm),
    LabResult(LabResultForm),
    Certificate(CertificateForm),
    Transfer(TransferForm),
    Trace(TraceForm),
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Batch(_) => StepKind::Batch,
            Step::CsvUpload { .. } => StepKind::CsvUpload,
            Step::Farmer(_) => StepKind::Farmer,
            Step::Cultivation(_) => StepKind::Cultivation,
            Step::Processing(_) => StepKind::Processing,
            Step::LabResult(_) => StepKind::LabResult,
            Step::Certificate(_) => StepKind::Certificate,
            Step::Transfer(_) => StepKind::Transfer,
            Step::Trace(_) => StepKind::Trace,
        }
    }
}

fn inherit(batch_id: &mut Option<String>, default: &Option<String>) {
    if batch_id.is_none() {
        batch_id.clone_from(default);
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, WizardError> {
        let content = std::fs::read_to_string(path).map_err(|source| WizardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Steps in wizard order; `base_dir` anchors a relative CSV path
    pub fn into_steps(self, base_dir: &Path) -> Result<Vec<Step>, WizardError> {
        let default = &self.batch_id;
        let mut steps = Vec::new();

        match (self.batch, self.csv) {
            (Some(_), Some(_)) => {
                return Err(WizardError::Manifest(
                    "use either [batch] or [csv] for the first step, not both".to_string(),
                ))
            }
            (Some(mut form), None) => {
                inherit(&mut form.batch_id, default);
                steps.push(Step::Batch(form));
            }
            (None, Some(csv)) => {
                let path = base_dir.join(&csv.path);
                let content = std::fs::read_to_string(&path).map_err(|source| WizardError::Io {
                    path: path.clone(),
                    source,
                })?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "batches.csv".to_string());
                steps.push(Step::CsvUpload { file_name, content });
            }
            (None, None) => {}
        }

        if let Some(mut form) = self.farmer {
            inherit(&mut form.batch_id, default);
            steps.push(Step::Farmer(form));
        }
        if let Some(mut form) = self.cultivation {
            inherit(&mut form.batch_id, default);
            steps.push(Step::Cultivation(form));
        }
        if let Some(mut form) = self.processing {
            inherit(&mut form.batch_id, default);
            steps.push(Step::Processing(form));
        }
        if let Some(mut form) = self.lab {
            inherit(&mut form.batch_id, default);
            steps.push(Step::LabResult(form));
        }
        if let Some(mut form) = self.certificate {
            inherit(&mut form.batch_id, default);
            steps.push(Step::Certificate(form));
        }
        if let Some(mut form) = self.transfer {
            inherit(&mut form.batch_id, default);
            steps.push(Step::Transfer(form));
        }
        if let Some(mut form) = self.trace {
            inherit(&mut form.batch_id, default);
            steps.push(Step::Trace(form));
        }

        if steps.is_empty() {
            return Err(WizardError::Manifest("no steps to submit".to_string()));
        }
        Ok(steps)
    }
}

/// Where wizard steps are submitted
#[async_trait]
pub trait WizardBackend: Send + Sync {
    /// Submit one step; returns a short description of what was committed
    async fn submit(&self, step: &Step) -> Result<String, WizardError>;
}

fn csv_summary(report: &ImportReport) -> String {
    format!("{} batches added, {} rows failed", report.successful, report.failed)
}

/// Submits through the gateway's HTTP API
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn envelope<T>(response: reqwest::Response) -> Result<T, WizardError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|_| WizardError::Rejected(format!("unexpected response (HTTP {status})")))?;

        match body {
            ApiResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiResponse { error, .. } => Err(WizardError::Rejected(
                error.unwrap_or_else(|| format!("request failed (HTTP {status})")),
            )),
        }
    }

    pub async fn ledger_status(&self) -> Result<LedgerStatus, WizardError> {
        let response = self
            .client
            .get(format!("{}/ledger/status", self.base_url))
            .send()
            .await?;
        Self::envelope(response).await
    }

    /// Check the gateway is connected and, if given, serves the recorded contract
    pub async fn connect(&self, deployment: Option<&Deployment>) -> Result<LedgerStatus, WizardError> {
        let status = self.ledger_status().await?;
        if !status.is_connected() {
            return Err(WizardError::Disconnected(
                status.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        if let Some(deployment) = deployment {
            if deployment.address != status.contract_address {
                return Err(WizardError::ContractMismatch {
                    expected: deployment.address.clone(),
                    actual: status.contract_address,
                });
            }
        }
        Ok(status)
    }

    async fn post_json<T: Serialize + Sync>(&self, kind: StepKind, form: &T) -> Result<String, WizardError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, kind.endpoint()))
            .json(form)
            .send()
            .await?;
        let data: Value = Self::envelope(response).await?;

        Ok(data
            .get("transactionHash")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}

#[async_trait]
impl WizardBackend for HttpBackend {
    async fn submit(&self, step: &Step) -> Result<String, WizardError> {
        let kind = step.kind();
        match step {
            Step::Batch(form) => self.post_json(kind, form).await,
            Step::CsvUpload { file_name, content } => {
                let part = multipart::Part::bytes(content.clone().into_bytes())
                    .file_name(file_name.clone())
                    .mime_str("text/csv")?;
                let response = self
                    .client
                    .post(format!("{}{}", self.base_url, kind.endpoint()))
                    .multipart(multipart::Form::new().part("csvFile", part))
                    .send()
                    .await?;
                let report: ImportReport = Self::envelope(response).await?;
                Ok(csv_summary(&report))
            }
            Step::Farmer(form) => self.post_json(kind, form).await,
            Step::Cultivation(form) => self.post_json(kind, form).await,
            Step::Processing(form) => self.post_json(kind, form).await,
            Step::LabResult(form) => self.post_json(kind, form).await,
            Step::Certificate(form) => self.post_json(kind, form).await,
            Step::Transfer(form) => self.post_json(kind, form).await,
            Step::Trace(form) => self.post_json(kind, form).await,
        }
    }
}

/// Submits straight to a ledger connection
pub struct DirectBackend {
    store: Arc<dyn RecordStore>,
}

impl DirectBackend {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WizardBackend for DirectBackend {
    async fn submit(&self, step: &Step) -> Result<String, WizardError> {
        let store = self.store.as_ref();
        let receipt = match step {
            Step::Batch(form) => store.create_batch(form.validate()?).await?,
            Step::CsvUpload { content, .. } => {
                let report = csv_import::import(store, content).await?;
                return Ok(csv_summary(&report));
            }
            Step::Farmer(form) => {
                let (batch_id, info) = form.validate()?;
                store.add_farmer_info(&batch_id, info).await?
            }
            Step::Cultivation(form) => {
                let (batch_id, details) = form.validate()?;
                store.add_cultivation_details(&batch_id, details).await?
            }
            Step::Processing(form) => {
                let (batch_id, info) = form.validate()?;
                store.add_processing_info(&batch_id, info).await?
            }
            Step::LabResult(form) => {
                let (batch_id, result) = form.validate()?;
                store.add_lab_result(&batch_id, result).await?
            }
            Step::Certificate(form) => {
                let (batch_id, certificate) = form.validate()?;
                store.add_certificate(&batch_id, certificate).await?
            }
            Step::Transfer(form) => {
                let (batch_id, transfer) = form.validate()?;
                store.add_transfer_record(&batch_id, transfer).await?
            }
            Step::Trace(form) => {
                let (batch_id, trace) = form.validate()?;
                store.add_trace_data(&batch_id, trace).await?
            }
        };
        Ok(receipt.transaction_hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedStep {
    pub step: StepKind,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStep {
    pub step: StepKind,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WizardOutcome {
    pub completed: Vec<CompletedStep>,
    pub failed: Option<FailedStep>,
    /// Steps never attempted because an earlier one failed
    pub remaining: Vec<StepKind>,
}

impl WizardOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }
}

/// Submit `steps` in order, stopping at the first failure
pub async fn run(backend: &dyn WizardBackend, steps: &[Step]) -> WizardOutcome {
    let mut outcome = WizardOutcome::default();

    for (position, step) in steps.iter().enumerate() {
        let kind = step.kind();
        match backend.submit(step).await {
            Ok(detail) => {
                info!(step = %kind, %detail, "Wizard step committed");
                outcome.completed.push(CompletedStep { step: kind, detail });
            }
            Err(err) => {
                warn!(step = %kind, error = %err, "Wizard step failed");
                outcome.failed = Some(FailedStep {
                    step: kind,
                    error: err.to_string(),
                });
                outcome.remaining = steps[position + 1..].iter().map(Step::kind).collect();
                break;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{SandboxLedger, SandboxOptions};

    const MANIFEST: &str = r#"
batchId = "ERD-TUR-2025-001"

[batch]
cropName = "Turmeric"
variety = "Erode Manjal"
location = "Erode, Tamil Nadu"
harvestDate = "2025-01-01"

[farmer]
farmerName = "Dhanasekaran V"
farmLocation = "Perundurai, Erode"
contact = "+91-9443000000"
farmerId = "FARMER-ERD-014"

[cultivation]
soilType = "Red loam"
irrigationType = "Drip"
pesticideUsed = "Organic Neem"
sowingDate = 1725321600
area = "10000"

[transfer]
from = "Dhanasekaran V"
to = "Erode Processing Unit"
purpose = "Processing"
transferDate = "2025-01-07"

[trace]
batchId = "OTHER-BATCH"
notes = "Ready for retail"
qrCodeHash = "QrCodeHash123"
"#;

    #[test]
    fn test_manifest_orders_steps_and_inherits_batch_id() {
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        let steps = manifest.into_steps(Path::new(".")).unwrap();

        let kinds: Vec<_> = steps.iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Batch,
                StepKind::Farmer,
                StepKind::Cultivation,
                StepKind::Transfer,
                StepKind::Trace,
            ]
        );

        match (&steps[1], &steps[4]) {
            (Step::Farmer(farmer), Step::Trace(trace)) => {
                assert_eq!(farmer.batch_id.as_deref(), Some("ERD-TUR-2025-001"));
                assert_eq!(trace.batch_id.as_deref(), Some("OTHER-BATCH"));
            }
            other => panic!("unexpected steps: {other:?}"),
        }
    }

    #[test]
    fn test_manifest_rejects_batch_and_csv_together() {
        let manifest: Manifest = toml::from_str(
            r#"
[batch]
batchId = "B1"

[csv]
path = "batches.csv"
"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.into_steps(Path::new(".")),
            Err(WizardError::Manifest(_))
        ));
    }

    #[test]
    fn test_manifest_reads_csv_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("batches.csv"),
            "batchId,cropName,variety,location,harvestDate\nB1,Turmeric,Erode Manjal,Erode,2025-01-01\n",
        )
        .unwrap();
        let manifest_path = dir.path().join("wizard.toml");
        std::fs::write(&manifest_path, "[csv]\npath = \"batches.csv\"\n").unwrap();

        let steps = Manifest::load(&manifest_path)
            .unwrap()
            .into_steps(dir.path())
            .unwrap();
        match &steps[0] {
            Step::CsvUpload { file_name, content } => {
                assert_eq!(file_name, "batches.csv");
                assert!(content.contains("B1,Turmeric"));
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_sections_are_rejected() {
        assert!(toml::from_str::<Manifest>("[harvest]\ncrop = \"x\"\n").is_err());
        assert!(matches!(
            Manifest::default().into_steps(Path::new(".")),
            Err(WizardError::Manifest(_))
        ));
    }

    #[tokio::test]
    async fn test_direct_run_commits_every_step() {
        let ledger = SandboxLedger::start(SandboxOptions::default()).await.unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(ledger);
        let backend = DirectBackend::new(store.clone());

        let mut manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        manifest.trace.as_mut().unwrap().batch_id = None;
        let steps = manifest.into_steps(Path::new(".")).unwrap();

        let outcome = run(&backend, &steps).await;
        assert!(outcome.is_success(), "{outcome:?}");
        assert_eq!(outcome.completed.len(), 5);

        let info = store.get_batch_info("ERD-TUR-2025-001").await.unwrap().unwrap();
        assert_eq!(info.farmer.farmer_name, "Dhanasekaran V");
        assert_eq!(info.cultivation.area, 10000);
        assert_eq!(info.transfers.len(), 1);
        assert!(info.trace_data.exists);
        assert!(!info.lab_result.exists);
    }

    #[tokio::test]
    async fn test_direct_run_stops_at_first_failure() {
        let ledger = SandboxLedger::start(SandboxOptions::default()).await.unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(ledger);
        let backend = DirectBackend::new(store.clone());

        // The trace section points at a batch that was never created.
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        let mut steps = manifest.into_steps(Path::new(".")).unwrap();
        let trace = steps.pop().unwrap();
        steps.insert(2, trace);

        let outcome = run(&backend, &steps).await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.completed.len(), 2);

        let failed = outcome.failed.unwrap();
        assert_eq!(failed.step, StepKind::Trace);
        assert_eq!(failed.error, "Batch does not exist");
        assert_eq!(outcome.remaining, vec![StepKind::Cultivation, StepKind::Transfer]);

        // Earlier steps stay committed.
        assert!(store.get_farmer_info("ERD-TUR-2025-001").await.unwrap().exists);
        assert!(!store.get_cultivation_details("ERD-TUR-2025-001").await.unwrap().exists);
    }
}
