use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::RequestError;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};

/// 单次逻辑请求最多尝试的次数（含首次）
pub const MAX_RETRIES: u32 = 3;

/// 退避基数，第 n 次重试前等待 `RETRY_DELAY * n`
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// 错误响应体里没有 message 时使用
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// 请求配置，调用方的请求头覆盖默认请求头
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// 第 `attempt` 次（从 0 开始）失败后的等待时间，线性增长
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * (attempt + 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, RETRY_DELAY)
    }
}

/// 重试提示，每次进入退避等待前调用一次
pub trait RetryNotifier: Send + Sync {
    fn retrying(&self, attempt: u32, max_attempts: u32, delay: Duration, error: &RequestError);
}

/// 通过日志输出重试提示
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl RetryNotifier for TracingNotifier {
    fn retrying(&self, attempt: u32, max_attempts: u32, delay: Duration, error: &RequestError) {
        tracing::info!(
            "Retrying request ({}/{}) in {}ms: {}",
            attempt,
            max_attempts,
            delay.as_millis(),
            error
        );
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// 带有限次重试的请求客户端
///
/// 每次调用各自持有尝试计数，客户端本身可以在并发请求间共享。
#[derive(Clone)]
pub struct RetryingClient {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
    notifier: Arc<dyn RetryNotifier>,
}

impl RetryingClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn RetryNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, RequestError> {
        let RequestOptions {
            method,
            headers: extra_headers,
            body,
        } = options;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(extra_headers);

        let mut attempt = 0;
        loop {
            let request = HttpRequest {
                url: url.to_string(),
                method: method.clone(),
                headers: headers.clone(),
                body: body.clone(),
            };

            let error = match self.attempt(request).await {
                Ok(data) => return Ok(data),
                Err(e) => e,
            };

            if !error.is_retryable() {
                tracing::debug!("Request to {} failed with client error: {}", url, error);
                return Err(error);
            }
            if attempt + 1 >= self.policy.max_attempts {
                tracing::warn!(
                    "Request to {} failed after {} attempts: {}",
                    url,
                    self.policy.max_attempts,
                    error
                );
                return Err(error);
            }

            let delay = self.policy.delay_for(attempt);
            self.notifier
                .retrying(attempt + 1, self.policy.max_attempts, delay, &error);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, RequestError> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(http_error(&response));
        }

        // 空响应体按 null 解析
        let body: &[u8] = if response.body.is_empty() {
            b"null"
        } else {
            &response.body
        };
        serde_json::from_slice(body).map_err(|e| RequestError::Decode(e.to_string()))
    }
}

fn http_error(response: &HttpResponse) -> RequestError {
    let message = serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
    RequestError::Http {
        status: response.status,
        message,
    }
}
