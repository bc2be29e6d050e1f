//! Command-line and environment configuration

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::ledger::SandboxOptions;

const DEPLOYMENT_FILE: &str = "deployed-contract.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid FRONTEND_URL {0:?}: not a valid CORS origin")]
    CorsOrigin(String),
}

#[derive(Parser, Debug)]
#[command(name = "agrotrust-gateway", version)]
#[command(about = "HTTP gateway for the AgroTrust GI provenance ledger")]
pub struct Cli {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: IpAddr,

    /// HTTP port
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Origin allowed by CORS
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
    pub frontend_url: String,

    /// Deployment record to resume from; the ledger snapshot is kept beside it
    #[arg(long, env = "DEPLOYMENT_FILE", default_value = DEPLOYMENT_FILE)]
    pub deployment_file: PathBuf,

    /// Network name recorded in the deployment record
    #[arg(long, env = "NETWORK_NAME", default_value = "sandbox")]
    pub network: String,

    /// Strkey of the signing identity (generated when unset)
    #[arg(long, env = "SIGNER_ADDRESS")]
    pub signer_address: Option<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn cors_origin(&self) -> Result<HeaderValue, ConfigError> {
        let origin = self.frontend_url.trim_end_matches('/');
        HeaderValue::from_str(origin).map_err(|_| ConfigError::CorsOrigin(self.frontend_url.clone()))
    }

    pub fn sandbox_options(&self) -> SandboxOptions {
        SandboxOptions {
            network: self.network.clone(),
            signer: self.signer_address.clone(),
            deployment_file: Some(self.deployment_file.clone()),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP gateway (default)
    Serve,

    /// Submit a data-entry manifest step by step
    Wizard(WizardArgs),
}

#[derive(Args, Debug, Clone)]
pub struct WizardArgs {
    /// TOML manifest with one section per step
    pub manifest: PathBuf,

    /// Gateway API base URL
    #[arg(long, env = "AGROTRUST_API_URL", default_value = "http://localhost:3001/api")]
    pub api_url: String,

    /// Write straight to the recorded record store instead of the gateway
    #[arg(long)]
    pub direct: bool,

    /// Deployment record (or a directory holding one) the gateway's contract
    /// address must match; with `--direct`, the record store to open
    #[arg(long)]
    pub deployment: Option<PathBuf>,
}

impl WizardArgs {
    /// `--deployment` as given, then as a directory holding the record
    pub fn deployment_candidates(&self) -> Option<Vec<PathBuf>> {
        self.deployment
            .as_ref()
            .map(|path| vec![path.clone(), path.join(DEPLOYMENT_FILE)])
    }

    /// Ledger options for `--direct`: the same record store the gateway opens
    pub fn direct_options(&self, server: &ServerConfig) -> SandboxOptions {
        let mut options = server.sandbox_options();
        if let Some(path) = &self.deployment {
            let file = if path.is_dir() {
                path.join(DEPLOYMENT_FILE)
            } else {
                path.clone()
            };
            options.deployment_file = Some(file);
        }
        options
    }
}
