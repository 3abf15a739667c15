//! Entry point that owns a transport and hands out resource facades.
//!
//! # Design
//! `LotrClient` holds only its transport and carries no mutable state
//! between calls, so one client can serve concurrent callers whenever the
//! transport is `Sync`. Credentials are checked when the configuration is
//! built; a client never exists without a token.

use tracing::info;

use crate::resources::{Movies, Quotes};
use crate::transport::{HttpTransport, Transport};

#[cfg(feature = "http")]
use crate::{config::ClientConfig, error::Result};

#[derive(Debug, Clone)]
pub struct LotrClient<T = HttpTransport> {
    transport: T,
}

#[cfg(feature = "http")]
impl LotrClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Self {
        info!(base_url = config.base_url(), "Client initialized");
        Self {
            transport: HttpTransport::new(config),
        }
    }

    /// Build a client from `LOTR_API_ACCESS_TOKEN` (and optionally
    /// `LOTR_API_BASE_URL`), failing when the token is missing.
    pub fn from_env() -> Result<Self> {
        ClientConfig::from_env().map(Self::new)
    }
}

impl<T: Transport> LotrClient<T> {
    pub fn with_transport(transport: T) -> Self {
        info!("Client initialized");
        Self { transport }
    }

    pub fn movies(&self) -> Movies<'_, T> {
        Movies::new(&self.transport)
    }

    pub fn quotes(&self) -> Quotes<'_, T> {
        Quotes::new(&self.transport)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
