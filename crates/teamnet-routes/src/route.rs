use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of an account's tunnel routing table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelRoute {
    /// CIDR block routed through the tunnel
    pub network: String,
    pub tunnel_id: String,
    pub tunnel_name: String,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Set once the route has been soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TunnelRoute {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
