//! 上游 HTTP 请求客户端
//!
//! [`RetryingClient`] 负责有限次重试与线性退避，[`AuthenticatedClient`] 在其之上
//! 从会话存储读取令牌并注入 `Authorization` 请求头。

pub mod auth;
pub mod error;
pub mod retry;
pub mod session;
pub mod transport;

pub use auth::AuthenticatedClient;
pub use error::RequestError;
pub use retry::{
    FALLBACK_ERROR_MESSAGE, MAX_RETRIES, RETRY_DELAY, RequestOptions, RetryNotifier, RetryPolicy,
    RetryingClient, TracingNotifier,
};
pub use session::{AUTH_TOKEN_KEY, FileSessionStore, MemorySessionStore, SessionStore};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
