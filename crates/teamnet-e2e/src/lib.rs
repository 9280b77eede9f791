//! End-to-end test utilities for the teamnet route client
//!
//! Runs the real HTTP transport against a local mock of the Cloudflare API.

pub mod mock_api;

use teamnet_routes::{HttpTransport, TunnelRouteClient};

pub use mock_api::{MockApiServer, RecordedRequest};

/// Token the test client authenticates with
pub const TEST_API_TOKEN: &str = "test-token";

/// Build a route client that talks to `server`
pub fn client_for(server: &MockApiServer) -> TunnelRouteClient {
    let transport =
        HttpTransport::with_client(reqwest::Client::new(), &server.base_url(), TEST_API_TOKEN);
    TunnelRouteClient::new(std::sync::Arc::new(transport))
}
