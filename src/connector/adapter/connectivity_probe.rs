use std::time::Duration;

use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::DomainError;

pub const DEFAULT_DATABASE_PORT: u16 = 3306;
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Where the informational startup probe should look for the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseProbeConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl DatabaseProbeConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: PROBE_TIMEOUT,
        }
    }

    /// `DATABASE_HOST` enables the probe; `DATABASE_PORT` defaults to 3306.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("DATABASE_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())?;
        let port = match std::env::var("DATABASE_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid DATABASE_PORT {:?}, using {}", raw, DEFAULT_DATABASE_PORT);
                DEFAULT_DATABASE_PORT
            }),
            Err(_) => DEFAULT_DATABASE_PORT,
        };
        Some(Self::new(host, port))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Open and immediately drop a TCP connection to the database.
pub async fn probe_database(config: &DatabaseProbeConfig) -> Result<(), DomainError> {
    let address = config.address();
    match tokio::time::timeout(config.timeout, TcpStream::connect(&address)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => Err(DomainError::IoError(e)),
        Err(_) => Err(DomainError::internal(format!(
            "no answer from {} within {:?}",
            address, config.timeout
        ))),
    }
}

/// Run [`probe_database`] in the background and log the outcome.
///
/// The result never reaches request handling.
pub fn spawn_database_probe(config: DatabaseProbeConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        match probe_database(&config).await {
            Ok(()) => info!("Database reachable at {}", config.address()),
            Err(e) => warn!("Database not reachable at {}: {}", config.address(), e),
        }
    })
}
