#![allow(missing_docs, clippy::unwrap_used, dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};

use zone_fs::{
    HttpClient, PacerConfig, ZoneClientBuilder, ZoneFs,
};
use zone_client::{HttpClientError, HttpRequest, HttpResponse};

pub const ENDPOINT: &str = "https://storage.example.test";

/// A canned answer for one request.
#[derive(Debug)]
pub enum Script {
    /// Answer with a status and body.
    Respond(StatusCode, Bytes),
    /// Fail at the transport level.
    Fail(HttpClientError),
}

impl Script {
    pub fn status(status: StatusCode) -> Self {
        Self::Respond(status, Bytes::new())
    }

    pub fn listing(records: &[Value]) -> Self {
        Self::Respond(
            StatusCode::OK,
            Bytes::from(Value::Array(records.to_vec()).to_string()),
        )
    }
}

/// Shared state backing a [`ScriptedClient`].
#[derive(Debug, Default)]
pub struct ScriptState {
    script: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<HttpRequest>>,
}

/// A clonable [`HttpClient`] that replays a scripted sequence of answers
/// and records every request it sees.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    state: Arc<ScriptState>,
}

impl ScriptedClient {
    pub fn new(script: impl IntoIterator<Item = Script>) -> Self {
        Self {
            state: Arc::new(ScriptState {
                script: Mutex::new(script.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Every request seen so far, in order.
    pub fn recorded(&self) -> Vec<HttpRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

impl HttpClient for ScriptedClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        self.state.requests.lock().unwrap().push(request.clone());
        match self.state.script.lock().unwrap().pop_front() {
            Some(Script::Respond(status, body)) => Ok(HttpResponse {
                status,
                headers: HeaderMap::new(),
                body,
            }),
            Some(Script::Fail(error)) => Err(error),
            None => panic!(
                "no scripted response left for {} {}",
                request.method, request.url
            ),
        }
    }
}

/// A listing record for a file.
pub fn file_record(name: &str, length: u64, checksum: &str, last_changed: &str) -> Value {
    json!({
        "Guid": "0b7f3e4e-0000-0000-0000-000000000000",
        "StorageZoneName": "my-zone",
        "Path": "/my-zone/",
        "ObjectName": name,
        "Length": length,
        "LastChanged": last_changed,
        "ServerId": 42,
        "ArrayNumber": 0,
        "IsDirectory": false,
        "UserId": "",
        "ContentType": "application/octet-stream",
        "DateCreated": last_changed,
        "StorageZoneId": 7,
        "Checksum": checksum,
        "ReplicatedZones": null,
    })
}

/// A listing record for a subdirectory.
pub fn dir_record(name: &str, last_changed: &str) -> Value {
    json!({
        "Guid": "aa51c6da-0000-0000-0000-000000000000",
        "StorageZoneName": "my-zone",
        "Path": "/my-zone/",
        "ObjectName": name,
        "Length": 0,
        "LastChanged": last_changed,
        "ServerId": 42,
        "ArrayNumber": 0,
        "IsDirectory": true,
        "UserId": "",
        "ContentType": "",
        "DateCreated": last_changed,
        "StorageZoneId": 7,
        "Checksum": null,
        "ReplicatedZones": null,
    })
}

/// Build an adapter for zone `my-zone` with the given root, backed by a
/// scripted client. The pacer is tightened so retry-heavy tests stay fast.
pub fn zone_fs_at(root: &str, script: Vec<Script>) -> (ZoneFs<ScriptedClient>, ScriptedClient) {
    let mock = ScriptedClient::new(script);
    let client = ZoneClientBuilder::new("my-zone", SecretString::from("test-key".to_owned()))
        .endpoint(ENDPOINT)
        .pacer(PacerConfig {
            min_sleep: Duration::from_millis(1),
            max_sleep: Duration::from_millis(5),
            decay_constant: 1,
            max_attempts: 3,
        })
        .build_with(mock.clone())
        .unwrap();
    (ZoneFs::with_client("unit", root, client), mock)
}

/// Root-based adapter.
pub fn zone_fs(script: Vec<Script>) -> (ZoneFs<ScriptedClient>, ScriptedClient) {
    zone_fs_at("", script)
}
