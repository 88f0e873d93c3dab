#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bleed_backend::cache::{CacheError, CacheStore};
use bleed_backend::client::{
    HttpRequest, HttpResponse, HttpTransport, RequestError, RetryNotifier, RetryPolicy,
    RetryingClient,
};
use bleed_backend::models::SearchParameters;

/// 按顺序返回预设结果的网络层，同时记录收到的请求
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, RequestError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, RequestError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Network("script exhausted".to_string())))
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> Result<HttpResponse, RequestError> {
    Ok(HttpResponse {
        status,
        body: body.to_string().into_bytes(),
    })
}

pub fn network_error() -> Result<HttpResponse, RequestError> {
    Err(RequestError::Network("connection refused".to_string()))
}

/// 记录每次重试提示
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(u32, Duration)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(u32, Duration)> {
        self.events.lock().unwrap().clone()
    }
}

impl RetryNotifier for RecordingNotifier {
    fn retrying(&self, attempt: u32, _max_attempts: u32, delay: Duration, _error: &RequestError) {
        self.events.lock().unwrap().push((attempt, delay));
    }
}

/// 永远不可用的缓存存储
pub struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn set_ex(&self, _key: &str, _value: String, _ttl_secs: u64) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn incr_window(&self, _key: &str, _window_secs: u64) -> Result<i64, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }
}

pub fn retrying_client(
    transport: Arc<ScriptedTransport>,
    notifier: Arc<RecordingNotifier>,
) -> RetryingClient {
    RetryingClient::new(transport)
        .with_policy(RetryPolicy::default())
        .with_notifier(notifier)
}

pub fn search_params(lat: f64, lng: f64) -> SearchParameters {
    SearchParameters {
        blood_type: "O+".to_string(),
        lat,
        lng,
        radius: 10.0,
        page: 1,
        limit: 20,
    }
}
