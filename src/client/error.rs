use thiserror::Error;

/// 请求失败的分类
///
/// 只有带 4xx 状态码的错误不会重试，其余（网络错误、5xx、响应体异常、请求构造失败）都会重试。
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RequestError {
    /// HTTP 状态码，非 HTTP 错误返回 `None`
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    pub fn is_retryable(&self) -> bool {
        !self.is_client_error()
    }
}
