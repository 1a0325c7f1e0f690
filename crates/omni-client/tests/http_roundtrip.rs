//! End-to-end tests against a local HTTP server.
//!
//! A hyper HTTP/1 server stands in for the ObjectServer REST API: it answers
//! catalog queries, echoes writes, and fails reads with a filter it doesn't
//! like.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use omni_client::{ClientError, OmniClient, TransportError};
use omni_core::{ColumnValue, OmniConfig, RequestDescriptor, TablePath};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    uri: String,
    authorization: Option<String>,
    connection: Option<String>,
    body: Value,
}

type Log = Arc<Mutex<Vec<Seen>>>;

async fn handle(req: Request<Incoming>, log: Log) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header("authorization");
    let connection = header("connection");
    let bytes = req.into_body().collect().await.map(|c| c.to_bytes()).unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    log.lock().unwrap().push(Seen {
        method: method.clone(),
        uri: uri.clone(),
        authorization,
        connection,
        body: body.clone(),
    });

    let reply = if uri.starts_with("/objectserver/restapi/catalog/columns") {
        json!({"rowset": {"rows": [
            {"ColumnName": "Severity", "DataType": 0},
            {"ColumnName": "Summary", "DataType": 2},
            {"ColumnName": "FirstOccurrence", "DataType": 1}
        ]}})
    } else if uri.contains("filter=broken") {
        json!({"exception": {"message": "bad filter"}})
    } else if method == "GET" {
        json!({"rowset": {"rows": [{"Node": "db01", "Severity": 5}]}})
    } else if method == "POST" {
        json!({"rowset": {"affectedRows": 1, "rows": body["rowset"]["rows"].clone()}})
    } else {
        json!({"rowset": {"affectedRows": 1}})
    };

    Ok(Response::builder()
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(reply.to_string())))
        .unwrap())
}

async fn start_server() -> (SocketAddr, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let server_log = log.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let log = server_log.clone();
            tokio::spawn(async move {
                let svc = service_fn(move |req| handle(req, log.clone()));
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });

    (addr, log)
}

fn client_for(addr: SocketAddr, cache_dir: &std::path::Path) -> OmniClient {
    let config = OmniConfig::new(
        &format!("http://{addr}/objectserver/restapi/"),
        "root",
        "secret",
    )
    .with_timeout(Duration::from_secs(5))
    .with_cache_dir(cache_dir);
    OmniClient::new(&config).unwrap()
}

fn alerts_status() -> TablePath {
    TablePath::parse("alerts/status").unwrap()
}

#[tokio::test]
async fn insert_roundtrip_over_http() {
    let (addr, log) = start_server().await;
    let cache = tempfile::tempdir().unwrap();
    let client = client_for(addr, cache.path());

    let request = RequestDescriptor::insert(alerts_status())
        .column("Severity", "4")
        .column("Summary", "test")
        .column("FirstOccurrence", 1_700_000_000.5);
    let rows = client.send(request).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows()[0]["Severity"], 4);
    assert_eq!(rows.rows()[0]["Summary"], "test");
    assert_eq!(rows.rows()[0]["FirstOccurrence"], 1_700_000_000i64);

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[1].method, "POST");
    assert_eq!(seen[1].uri, "/objectserver/restapi/alerts/status");
    assert_eq!(seen[1].authorization.as_deref(), Some("Basic cm9vdDpzZWNyZXQ="));
    assert_eq!(seen[1].connection.as_deref(), Some("close"));
    assert_eq!(seen[1].body["rowset"]["coldesc"].as_array().unwrap().len(), 3);

    assert!(cache.path().join("alerts.status.json").is_file());
}

#[tokio::test]
async fn read_and_remote_exception() {
    let (addr, log) = start_server().await;
    let cache = tempfile::tempdir().unwrap();
    let client = client_for(addr, cache.path());

    let rows = client
        .send(
            RequestDescriptor::read(alerts_status())
                .projection(["Node", "Severity"])
                .filter("Severity > 4"),
        )
        .await
        .unwrap();
    assert_eq!(rows.rows()[0]["Node"], "db01");

    let err = client
        .send(RequestDescriptor::read(alerts_status()).filter("broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RemoteService(ref m) if m == "bad filter"));

    let seen = log.lock().unwrap().clone();
    assert_eq!(
        seen[0].uri,
        "/objectserver/restapi/alerts/status/?collist=Node,Severity&filter=Severity+%3E+4"
    );
}

#[tokio::test]
async fn update_and_delete_over_http() {
    let (addr, log) = start_server().await;
    let cache = tempfile::tempdir().unwrap();
    let client = client_for(addr, cache.path());

    let columns = BTreeMap::from([("Severity".to_string(), ColumnValue::from(0))]);
    let mut update = RequestDescriptor::update(alerts_status(), "Node = 'db01'");
    update.columns = columns;
    assert!(client.send(update).await.unwrap().is_empty());

    let delete = RequestDescriptor::delete(alerts_status(), "Severity = 0");
    assert!(client.send(delete).await.unwrap().is_empty());

    let seen = log.lock().unwrap().clone();
    let methods: Vec<&str> = seen.iter().map(|s| s.method.as_str()).collect();
    assert_eq!(methods, ["GET", "PATCH", "DELETE"]);
    assert_eq!(
        seen[1].uri,
        "/objectserver/restapi/alerts/status?filter=Node+%3D+%27db01%27"
    );
    assert_eq!(seen[1].body["rowset"]["rows"][0]["Severity"], 0);
    assert_eq!(
        seen[2].uri,
        "/objectserver/restapi/alerts/status/?filter=Severity+%3D+0"
    );
}

#[tokio::test]
async fn unresponsive_server_times_out() {
    // Accepts connections but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let cache = tempfile::tempdir().unwrap();
    let config = OmniConfig::new(&format!("http://{addr}"), "root", "secret")
        .with_timeout(Duration::from_millis(200))
        .with_cache_dir(cache.path());
    let client = OmniClient::new(&config).unwrap();

    let err = client
        .send(RequestDescriptor::read(alerts_status()))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Timeout(_))));
}
