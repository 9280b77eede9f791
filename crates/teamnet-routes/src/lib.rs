//! Client for the Cloudflare tunnel route (teamnet) API
//!
//! Lists, looks up, creates, updates and deletes the network routes that send
//! traffic for a CIDR block through a tunnel.
//!
//! # Example
//!
//! ```rust,ignore
//! use teamnet_routes::{ApiConfig, TunnelRouteClient, TunnelRoutesListParams};
//!
//! let config = ApiConfig::load_and_resolve("teamnet.toml")?;
//! let client = TunnelRouteClient::from_config(&config)?;
//!
//! let routes = client
//!     .list(&TunnelRoutesListParams::new("account-id").with_is_deleted(false))
//!     .await?;
//! ```

mod client;
mod config;
mod envelope;
mod error;
mod params;
mod route;
mod transport;

pub use client::TunnelRouteClient;
pub use config::{ApiConfig, ResolvedApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use envelope::{Envelope, ResponseInfo, ResultInfo};
pub use error::{RouteError, TransportError};
pub use params::{
    escape_path_segment, PaginationOptions, TunnelRoutesCreateParams, TunnelRoutesDeleteParams,
    TunnelRoutesForIpParams, TunnelRoutesListParams, TunnelRoutesUpdateParams,
};
pub use route::TunnelRoute;
pub use transport::{ApiTransport, HttpTransport};

// Re-exported so transports can be implemented without a direct reqwest dependency
pub use reqwest::Method;
