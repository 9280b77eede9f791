//! Tunnel route client end-to-end tests

use chrono::{TimeZone, Utc};
use hyper::StatusCode;
use teamnet_e2e::{client_for, MockApiServer, TEST_API_TOKEN};
use teamnet_routes::{
    RouteError, TransportError, TunnelRoutesCreateParams, TunnelRoutesDeleteParams,
    TunnelRoutesForIpParams, TunnelRoutesListParams, TunnelRoutesUpdateParams,
};

/// Initialize tracing for tests
fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("teamnet_routes=debug,teamnet_e2e=debug")
        .with_test_writer()
        .try_init();
}

fn route_json(network: &str, tunnel_id: &str) -> serde_json::Value {
    serde_json::json!({
        "network": network,
        "tunnel_id": tunnel_id,
        "tunnel_name": "office",
        "comment": "hq",
        "created_at": "2023-01-01T00:00:00Z",
        "deleted_at": null
    })
}

#[tokio::test]
async fn test_list_routes_with_filters() {
    init_test();

    let server = MockApiServer::start().await;
    server.respond_with_result(serde_json::json!([
        route_json("10.1.0.0/16", "t-1"),
        route_json("10.2.0.0/16", "t-2"),
    ]));

    let params = TunnelRoutesListParams::new("acc")
        .with_tunnel_id("t-1")
        .with_is_deleted(false)
        .with_existed_at(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());

    let routes = client_for(&server)
        .list(&params)
        .await
        .expect("list failed");

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].network, "10.1.0.0/16");
    assert_eq!(routes[1].tunnel_id, "t-2");

    let request = server.last_request().expect("no request recorded");
    assert_eq!(request.method, "GET");
    assert_eq!(
        request.uri,
        "/client/v4/accounts/acc/teamnet/routes?existed_at=2023-01-01T00%3A00%3A00Z&is_deleted=false&tunnel_id=t-1"
    );
    assert_eq!(
        request.header("authorization"),
        Some(format!("Bearer {}", TEST_API_TOKEN).as_str())
    );
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_create_route_escapes_network() {
    init_test();

    let server = MockApiServer::start().await;
    server.respond_with_result(route_json("10.0.0.0/8", "t-1"));

    let params = TunnelRoutesCreateParams::new("acc", "10.0.0.0/8", "t-1").with_comment("hq");
    let route = client_for(&server)
        .create(&params)
        .await
        .expect("create failed");

    assert_eq!(route.network, "10.0.0.0/8");
    assert_eq!(route.comment, "hq");

    let request = server.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.uri,
        "/client/v4/accounts/acc/teamnet/routes/network/10.0.0.0%2F8"
    );
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(
        request.json_body(),
        Some(serde_json::json!({"tunnel_id": "t-1", "comment": "hq"}))
    );
}

#[tokio::test]
async fn test_update_and_delete_route() {
    init_test();

    let server = MockApiServer::start().await;
    let client = client_for(&server);

    server.respond_with_result(route_json("10.0.0.0/8", "t-2"));
    let updated = client
        .update(&TunnelRoutesUpdateParams::new("acc", "10.0.0.0/8", "t-2"))
        .await
        .expect("update failed");
    assert_eq!(updated.tunnel_id, "t-2");

    let request = server.last_request().unwrap();
    assert_eq!(request.method, "PATCH");
    assert_eq!(
        request.json_body(),
        Some(serde_json::json!({"network": "10.0.0.0/8", "tunnel_id": "t-2"}))
    );

    client
        .delete(&TunnelRoutesDeleteParams::new("acc", "10.0.0.0/8"))
        .await
        .expect("delete failed");

    let requests = server.get_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(
        requests[1].uri,
        "/client/v4/accounts/acc/teamnet/routes/network/10.0.0.0%2F8"
    );
    assert!(requests[1].body.is_empty());
}

#[tokio::test]
async fn test_get_route_for_ip() {
    init_test();

    let server = MockApiServer::start().await;
    server.respond_with_result(route_json("10.0.0.0/8", "t-1"));

    let route = client_for(&server)
        .get_for_ip(&TunnelRoutesForIpParams::new("acc", "10.20.30.40"))
        .await
        .expect("lookup failed");
    assert_eq!(route.network, "10.0.0.0/8");

    let request = server.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(
        request.uri,
        "/client/v4/accounts/acc/teamnet/routes/ip/10.20.30.40"
    );
}

#[tokio::test]
async fn test_api_error_becomes_transport_error() {
    init_test();

    let server = MockApiServer::start().await;
    server.respond_with_error(StatusCode::NOT_FOUND, 1003, "route not found");

    let err = client_for(&server)
        .delete(&TunnelRoutesDeleteParams::new("acc", "10.9.0.0/16"))
        .await
        .unwrap_err();

    match err {
        RouteError::Transport(TransportError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "route not found (1003)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    init_test();

    let server = MockApiServer::start().await;
    server.respond_with(StatusCode::OK, "<html>oops</html>");

    let err = client_for(&server)
        .list(&TunnelRoutesListParams::new("acc"))
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::Decode { .. }));
}

#[tokio::test]
async fn test_missing_account_sends_nothing() {
    init_test();

    let server = MockApiServer::start().await;
    let client = client_for(&server);

    let listed = client.list(&TunnelRoutesListParams::new("")).await;
    assert!(matches!(listed, Err(RouteError::MissingAccountId)));

    let found = client
        .get_for_ip(&TunnelRoutesForIpParams::new("", "10.0.0.1"))
        .await;
    assert!(matches!(found, Err(RouteError::MissingAccountId)));

    assert!(server.get_requests().is_empty());
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    init_test();

    let server = MockApiServer::start().await;
    server.respond_with_result(serde_json::json!([]));
    let client = client_for(&server);

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .list(&TunnelRoutesListParams::new(format!("acc-{}", i)))
                .await
        }));
    }

    for handle in handles {
        let routes = handle.await.unwrap().expect("list failed");
        assert!(routes.is_empty());
    }
    assert_eq!(server.get_requests().len(), 8);
}
