//! Tunnel route API operations

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::config::ResolvedApiConfig;
use crate::envelope::{Envelope, ResultInfo};
use crate::error::{RouteError, TransportError};
use crate::params::{
    escape_path_segment, TunnelRoutesCreateParams, TunnelRoutesDeleteParams,
    TunnelRoutesForIpParams, TunnelRoutesListParams, TunnelRoutesUpdateParams,
};
use crate::route::TunnelRoute;
use crate::transport::{ApiTransport, HttpTransport};

/// Path prefix for account scoped resources
const ACCOUNT_ROUTE_ROOT: &str = "accounts";

/// Client for an account's tunnel routing table
///
/// Holds no state besides the shared transport, so it can be cloned freely and
/// used from many tasks at once.
#[derive(Clone)]
pub struct TunnelRouteClient {
    transport: Arc<dyn ApiTransport>,
}

impl TunnelRouteClient {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Build a client talking HTTP to the configured API
    pub fn from_config(config: &ResolvedApiConfig) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// List the routes of an account, in the order the API returns them
    pub async fn list(
        &self,
        params: &TunnelRoutesListParams,
    ) -> Result<Vec<TunnelRoute>, RouteError> {
        self.list_page(params).await.map(|(routes, _)| routes)
    }

    /// Like [`list`](Self::list), also returning the page metadata
    pub async fn list_page(
        &self,
        params: &TunnelRoutesListParams,
    ) -> Result<(Vec<TunnelRoute>, Option<ResultInfo>), RouteError> {
        require_account(&params.account_id)?;

        let mut path = routes_path(&params.account_id);
        let query = params.encode();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }

        let envelope: Envelope<Vec<TunnelRoute>> =
            self.call("list", Method::GET, &path, None).await?;
        Ok((envelope.result.unwrap_or_default(), envelope.result_info))
    }

    /// Find the route whose network contains the given IP
    pub async fn get_for_ip(
        &self,
        params: &TunnelRoutesForIpParams,
    ) -> Result<TunnelRoute, RouteError> {
        require_account(&params.account_id)?;

        let path = format!(
            "{}/ip/{}",
            routes_path(&params.account_id),
            escape_path_segment(&params.network)
        );

        let envelope: Envelope<TunnelRoute> =
            self.call("get route for IP", Method::GET, &path, None).await?;
        Ok(envelope.result.unwrap_or_default())
    }

    /// Add a route for `params.network` to the given tunnel
    pub async fn create(
        &self,
        params: &TunnelRoutesCreateParams,
    ) -> Result<TunnelRoute, RouteError> {
        require_account(&params.account_id)?;

        let path = network_path(&params.account_id, &params.network);
        let body = serde_json::to_vec(params).map_err(|e| RouteError::encode("create", e))?;

        tracing::info!(
            network = %params.network,
            tunnel_id = %params.tunnel_id,
            "Creating tunnel route"
        );
        let envelope: Envelope<TunnelRoute> =
            self.call("create", Method::POST, &path, Some(body)).await?;
        Ok(envelope.result.unwrap_or_default())
    }

    /// Replace an existing route
    pub async fn update(
        &self,
        params: &TunnelRoutesUpdateParams,
    ) -> Result<TunnelRoute, RouteError> {
        require_account(&params.account_id)?;

        let path = network_path(&params.account_id, &params.network);
        let body = serde_json::to_vec(params).map_err(|e| RouteError::encode("update", e))?;

        tracing::info!(
            network = %params.network,
            tunnel_id = %params.tunnel_id,
            "Updating tunnel route"
        );
        let envelope: Envelope<TunnelRoute> =
            self.call("update", Method::PATCH, &path, Some(body)).await?;
        Ok(envelope.result.unwrap_or_default())
    }

    /// Remove a route. The echoed route is decoded and then dropped.
    pub async fn delete(&self, params: &TunnelRoutesDeleteParams) -> Result<(), RouteError> {
        require_account(&params.account_id)?;

        let path = network_path(&params.account_id, &params.network);

        tracing::info!(network = %params.network, "Deleting tunnel route");
        let _: Envelope<TunnelRoute> = self.call("delete", Method::DELETE, &path, None).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Envelope<T>, RouteError> {
        tracing::debug!(operation, %method, path, "Calling tunnel route API");

        let response = self.transport.execute(method, path, body).await?;
        serde_json::from_slice(&response).map_err(|e| RouteError::decode(operation, e))
    }
}

fn require_account(account_id: &str) -> Result<(), RouteError> {
    if account_id.is_empty() {
        return Err(RouteError::MissingAccountId);
    }
    Ok(())
}

fn routes_path(account_id: &str) -> String {
    format!("/{}/{}/teamnet/routes", ACCOUNT_ROUTE_ROOT, account_id)
}

fn network_path(account_id: &str, network: &str) -> String {
    format!(
        "{}/network/{}",
        routes_path(account_id),
        escape_path_segment(network)
    )
}
