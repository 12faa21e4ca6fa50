#![allow(missing_docs, clippy::unwrap_used, dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use zone_client::{HttpClient, HttpClientError, HttpRequest, HttpResponse};

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

    pub fn ok_json(body: &str) -> Self {
        Self::Respond(StatusCode::OK, Bytes::from(body.to_owned()))
    }
}

/// Shared state backing a [`ScriptedClient`].
#[derive(Debug, Default)]
pub struct ScriptState {
    script: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<HttpRequest>>,
}

/// A clonable [`HttpClient`] that replays a scripted sequence of answers
/// and records every request it sees. Clones share state, so tests can
/// hand one clone to the client under test and keep another for
/// assertions.
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
