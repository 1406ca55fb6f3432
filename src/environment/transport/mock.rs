//! Mock transport for testing.
//!
//! Serves routed or queued responses and captures every request.

use super::{Method, Request, Transport};
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Route = (Method, String);

#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    requests: Vec<Request>,
    routes: HashMap<Route, Result<Value, ApiError>>,
    queued: HashMap<Route, VecDeque<Result<Value, ApiError>>>,
    delays: HashMap<Route, VecDeque<Duration>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request to `path` with `response`.
    pub fn respond(&self, method: Method, path: &str, response: Result<Value, ApiError>) {
        let mut inner = self.inner.lock().unwrap();
        inner.routes.insert((method, path.to_string()), response);
    }

    /// Answer the next request to `path` with `response`, before any
    /// routed response.
    pub fn respond_once(&self, method: Method, path: &str, response: Result<Value, ApiError>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Delay the next request to `path`.
    pub fn delay_once(&self, method: Method, path: &str, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .delays
            .entry((method, path.to_string()))
            .or_default()
            .push_back(delay);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.inner.lock().unwrap().requests.last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Value, ApiError> {
        let (response, delay) = {
            let mut inner = self.inner.lock().unwrap();
            let route = (request.method, request.path.clone());
            inner.requests.push(request);
            let queued = inner.queued.get_mut(&route).and_then(|q| q.pop_front());
            let response = queued
                .or_else(|| inner.routes.get(&route).cloned())
                .unwrap_or(Err(ApiError::Status {
                    status: 404,
                    body: None,
                }));
            let delay = inner.delays.get_mut(&route).and_then(|q| q.pop_front());
            (response, delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}
