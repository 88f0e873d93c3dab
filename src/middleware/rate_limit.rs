use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    cache::{CacheStore, keys::rate_limit_key},
    config::Config,
    utils::{error_codes, error_to_api_response},
};

/// 固定窗口限流器，计数保存在缓存存储（生产环境为 Redis）
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CacheStore>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CacheStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        let ip = client_ip(&req);
        let key = rate_limit_key(&ip);

        // 存储不可用时放行
        let count = match self
            .store
            .incr_window(&key, self.config.rate_limit_window().as_secs())
            .await
        {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Rate limit check skipped for {}: {}", ip, e);
                return next.run(req).await;
            }
        };

        if count > self.config.rate_limit_requests as i64 {
            tracing::debug!("Rate limit exceeded for {} ({} requests)", ip, count);
            return (
                StatusCode::TOO_MANY_REQUESTS,
                error_to_api_response::<()>(
                    error_codes::RATE_LIMIT,
                    format!(
                        "Too many requests, retry in {} seconds",
                        self.config.rate_limit_window().as_secs()
                    ),
                ),
            )
                .into_response();
        }

        next.run(req).await
    }
}

// 优先使用代理头，其次是连接地址
fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}
