//! Mock Cloudflare API server for E2E tests
//!
//! Listens on loopback, records every request it receives and answers with a
//! configurable status and JSON body.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::RwLock;
use tokio::net::TcpListener;

/// A recorded API request for test assertions
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query exactly as received (still percent-encoded)
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

#[derive(Clone)]
struct CannedResponse {
    status: StatusCode,
    body: Vec<u8>,
}

/// A mock API server
pub struct MockApiServer {
    addr: SocketAddr,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    response: Arc<RwLock<CannedResponse>>,
}

impl MockApiServer {
    /// Start the server on an ephemeral port
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API server");
        let addr = listener.local_addr().unwrap();

        let requests: Arc<RwLock<Vec<RecordedRequest>>> = Arc::new(RwLock::new(Vec::new()));
        let response = Arc::new(RwLock::new(CannedResponse {
            status: StatusCode::OK,
            body: br#"{"success": true, "errors": [], "messages": [], "result": null}"#.to_vec(),
        }));

        let requests_clone = requests.clone();
        let response_clone = response.clone();

        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };

                let requests = requests_clone.clone();
                let response = response_clone.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let requests = requests.clone();
                        let response = response.clone();
                        async move {
                            let method = req.method().to_string();
                            let uri = req.uri().to_string();
                            let headers: Vec<(String, String)> = req
                                .headers()
                                .iter()
                                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                                .collect();

                            let body = req
                                .into_body()
                                .collect()
                                .await
                                .map(|b| b.to_bytes().to_vec())
                                .unwrap_or_default();

                            tracing::debug!("MockApiServer: {} {}", method, uri);
                            requests.write().push(RecordedRequest {
                                method,
                                uri,
                                headers,
                                body,
                            });

                            let canned = response.read().clone();
                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(canned.status)
                                    .header("Content-Type", "application/json")
                                    .body(Full::new(Bytes::from(canned.body)))
                                    .unwrap(),
                            )
                        }
                    });

                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            addr,
            requests,
            response,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL to hand to the HTTP transport
    pub fn base_url(&self) -> String {
        format!("http://{}/client/v4", self.addr)
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.read().last().cloned()
    }

    pub fn clear_requests(&self) {
        self.requests.write().clear();
    }

    /// Answer subsequent requests with this status and body
    pub fn respond_with(&self, status: StatusCode, body: impl Into<Vec<u8>>) {
        *self.response.write() = CannedResponse {
            status,
            body: body.into(),
        };
    }

    /// Answer with a successful envelope wrapping `result`
    pub fn respond_with_result(&self, result: serde_json::Value) {
        let envelope = serde_json::json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": result,
        });
        self.respond_with(StatusCode::OK, envelope.to_string());
    }

    /// Answer with a failed envelope carrying one API error
    pub fn respond_with_error(&self, status: StatusCode, code: i64, message: &str) {
        let envelope = serde_json::json!({
            "success": false,
            "errors": [{"code": code, "message": message}],
            "messages": [],
            "result": null,
        });
        self.respond_with(status, envelope.to_string());
    }
}
