use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::error::RequestError;
use super::retry::{RequestOptions, RetryingClient};
use super::session::{AUTH_TOKEN_KEY, SessionStore};

/// 自动附带 Bearer 令牌的请求客户端
#[derive(Clone)]
pub struct AuthenticatedClient {
    client: RetryingClient,
    session: Arc<dyn SessionStore>,
}

impl AuthenticatedClient {
    pub fn new(client: RetryingClient, session: Arc<dyn SessionStore>) -> Self {
        Self { client, session }
    }

    /// 会话中的令牌，空字符串视为未登录
    pub fn bearer_token(&self) -> Option<String> {
        self.session
            .get(AUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        mut options: RequestOptions,
    ) -> Result<T, RequestError> {
        let mut headers = HeaderMap::new();
        match self.bearer_token() {
            Some(token) => match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Stored auth token is not a valid header value"),
            },
            // 未登录时匿名请求
            None => tracing::debug!("No auth token in session, requesting {} anonymously", url),
        }

        // 调用方的请求头优先
        headers.extend(std::mem::take(&mut options.headers));
        options.headers = headers;

        self.client.request(url, options).await
    }
}
