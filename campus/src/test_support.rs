//! Scripted transport and fixtures shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::api::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use crate::config::ApiConfig;
use crate::store::MemoryStore;
use crate::types::{RecordId, Role, UserProfile};

pub const BASE_URL: &str = "http://api.test";

pub fn profile(role: Role) -> UserProfile {
    UserProfile {
        id: RecordId::Int(1),
        email: format!("{role}@college.edu"),
        first_name: "Test".to_owned(),
        last_name: role.as_str().to_owned(),
        role,
        student_profile: None,
        staff_profile: None,
    }
}

pub fn profile_json(role: Role) -> serde_json::Value {
    serde_json::to_value(profile(role)).unwrap()
}

pub fn json(status: u16, body: serde_json::Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse { status, body: body.to_string() })
}

pub fn raw(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse { status, body: body.to_owned() })
}

pub fn unreachable() -> Result<HttpResponse, TransportError> {
    Err(TransportError("connection refused".to_owned()))
}

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<HttpRequest>,
    slow: bool,
}

/// Replays queued responses in order and records every request.
/// Clones share the same script.
#[derive(Clone, Default)]
pub struct StubTransport {
    script: Rc<RefCell<Script>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<HttpResponse, TransportError>) -> &Self {
        self.script.borrow_mut().responses.push_back(response);
        self
    }

    /// Make every send yield once before answering, so a concurrently
    /// polled future gets to run while the request is in flight.
    pub fn slow(&self) -> &Self {
        self.script.borrow_mut().slow = true;
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.borrow().requests.len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url.trim_start_matches(BASE_URL).to_owned()).collect()
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let slow = self.script.borrow().slow;
        if slow {
            tokio::task::yield_now().await;
        }
        let mut script = self.script.borrow_mut();
        script.requests.push(request);
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
    }
}

pub fn client() -> (ApiClient<StubTransport, MemoryStore>, StubTransport, MemoryStore) {
    let transport = StubTransport::new();
    let store = MemoryStore::new();
    let api = ApiClient::new(&ApiConfig::new(BASE_URL), transport.clone(), store.clone());
    (api, transport, store)
}
