//! Runtime settings loaded via OrthoConfig and the server configuration
//! derived from them.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use user_registry::domain::{IdAllocationPolicy, UnknownIdAllocationPolicy};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 3000;

/// Settings layered from CLI flags, `USERS_API_*` environment variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS_API")]
pub struct AppSettings {
    /// Address to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// Port to bind; defaults to 3000.
    pub port: Option<u16>,
    /// JSON snapshot file. Persistence is disabled when absent.
    pub data_file: Option<PathBuf>,
    /// `monotonic` (default) or `max-plus-one`.
    pub id_allocation: Option<String>,
}

impl AppSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Configured id allocation policy, defaulting to monotonic.
    ///
    /// # Errors
    /// [`UnknownIdAllocationPolicy`] when the configured name is not recognised.
    pub fn id_allocation(&self) -> Result<IdAllocationPolicy, UnknownIdAllocationPolicy> {
        self.id_allocation
            .as_deref()
            .map_or(Ok(IdAllocationPolicy::default()), str::parse)
    }
}

/// Resolved configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_file: Option<PathBuf>,
    pub(crate) id_allocation: IdAllocationPolicy,
}

impl TryFrom<&AppSettings> for ServerConfig {
    type Error = UnknownIdAllocationPolicy;

    fn try_from(settings: &AppSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            bind_addr: settings.bind_addr(),
            data_file: settings.data_file.clone(),
            id_allocation: settings.id_allocation()?,
        })
    }
}
