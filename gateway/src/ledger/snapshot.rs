//! On-disk ledger state: the deployment record plus a ledger snapshot beside it
//!
//! The snapshot is rewritten after every committed transaction and reloaded
//! whenever another process has replaced it, so every connection opened on
//! the same deployment record sees one record store.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use soroban_ledger_snapshot::LedgerSnapshot;
use soroban_sdk::testutils::EnvTestConfig;
use soroban_sdk::Env;
use tracing::debug;

use crate::deployment::Deployment;
use crate::error::LedgerError;

/// A host env that never drops test snapshots into the working directory
pub fn quiet_env() -> Env {
    Env::new_with_config(quiet_config())
}

pub fn quiet_config() -> EnvTestConfig {
    EnvTestConfig {
        capture_snapshot_at_drop: false,
    }
}

/// `deployed-contract.json` keeps its state in `deployed-contract.ledger.json`
pub fn snapshot_path(deployment_file: &Path) -> PathBuf {
    deployment_file.with_extension("ledger.json")
}

#[derive(Debug)]
pub struct LedgerState {
    deployment_file: PathBuf,
    snapshot_file: PathBuf,
    /// Digest of the snapshot this connection last wrote or loaded
    seen: Option<[u8; 32]>,
}

impl LedgerState {
    pub fn new(deployment_file: &Path) -> Self {
        Self {
            deployment_file: deployment_file.to_path_buf(),
            snapshot_file: snapshot_path(deployment_file),
            seen: None,
        }
    }

    fn error(&self, path: &Path, reason: impl ToString) -> LedgerError {
        LedgerError::Snapshot {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// The recorded deployment and its ledger, if both are on disk
    pub fn load(&mut self) -> Result<Option<(Deployment, LedgerSnapshot)>, LedgerError> {
        if !self.deployment_file.is_file() || !self.snapshot_file.is_file() {
            return Ok(None);
        }
        let record = Deployment::load(&self.deployment_file)
            .map_err(|e| self.error(&self.deployment_file, e))?;
        let (snapshot, digest) = self.read()?;
        self.seen = Some(digest);
        Ok(Some((record, snapshot)))
    }

    pub fn save_record(&self, deployment: &Deployment) -> Result<(), LedgerError> {
        deployment
            .save(&self.deployment_file)
            .map_err(|e| self.error(&self.deployment_file, e))
    }

    /// Write the env's ledger; readers never observe a partial file
    pub fn save(&mut self, env: &Env) -> Result<(), LedgerError> {
        let path = self.snapshot_file.clone();
        let mut bytes = Vec::new();
        env.to_ledger_snapshot()
            .write(&mut bytes)
            .map_err(|e| self.error(&path, format!("{e:?}")))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.error(&path, e))?;
        }
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, &bytes).map_err(|e| self.error(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| self.error(&path, e))?;

        self.seen = Some(Sha256::digest(&bytes).into());
        Ok(())
    }

    /// A newer ledger written by another connection, if there is one
    pub fn changed(&mut self) -> Result<Option<LedgerSnapshot>, LedgerError> {
        if !self.snapshot_file.is_file() {
            return Ok(None);
        }
        let (snapshot, digest) = self.read()?;
        if self.seen == Some(digest) {
            return Ok(None);
        }
        self.seen = Some(digest);
        debug!(path = %self.snapshot_file.display(), "Ledger snapshot changed on disk");
        Ok(Some(snapshot))
    }

    fn read(&self) -> Result<(LedgerSnapshot, [u8; 32]), LedgerError> {
        let path = &self.snapshot_file;
        let bytes = fs::read(path).map_err(|e| self.error(path, e))?;
        let snapshot =
            LedgerSnapshot::read(bytes.as_slice()).map_err(|e| self.error(path, format!("{e:?}")))?;
        Ok((snapshot, Sha256::digest(&bytes).into()))
    }
}
