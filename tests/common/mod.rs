#![allow(dead_code)]
/// Shared fixtures: a scripted transport and controller builders.
use std::cell::RefCell;
use std::collections::VecDeque;

use sentimen::api::{ApiRequest, ApiResponse, Transport, TransportError};
use sentimen::auth::AuthClient;
use sentimen::controller::Controller;
use sentimen::state::AppState;
use sentimen::storage::MemoryStorage;

/// One canned answer.
pub enum Reply {
    Status(u16, &'static str),
    Unreachable,
}

/// Answers requests from a queue and records every request it saw. An empty
/// queue answers `500 {}`.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Reply>>,
    calls: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn ok(&self, body: &'static str) {
        self.push(Reply::Status(200, body));
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.path.clone()).collect()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Status(status, body)) => Ok(ApiResponse::new(status, body)),
            Some(Reply::Unreachable) => Err(TransportError::Network {
                method: request.method.as_str(),
                path: request.path.clone(),
                reason: "connection refused".to_string(),
            }),
            None => Ok(ApiResponse::new(500, "{}")),
        }
    }
}

pub const LOGIN_OK: &str = r#"{"status": "success", "access_token": "tok-123", "user": {"username": "sari", "id": 7}}"#;

/// A fresh anonymous controller over the standard page.
pub fn controller() -> Controller<FakeTransport> {
    let state = AppState::new(
        AuthClient::new(Box::new(MemoryStorage::new())),
        Box::new(MemoryStorage::new()),
    );
    Controller::new(FakeTransport::new(), state)
}

/// A controller that went through a successful login. The login request
/// and the history fetch that follows it are already recorded.
pub fn logged_in_controller() -> Controller<FakeTransport> {
    let mut c = controller();
    c.transport().ok(LOGIN_OK);
    c.transport().ok(r#"{"history": []}"#);
    c.set_field("loginUsername", "sari");
    c.set_field("loginPassword", "rahasia");
    assert!(c.handle_login());
    c
}
