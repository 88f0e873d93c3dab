use axum::{Router, routing::get};

use std::sync::Arc;

use crate::{
    AppState,
    middleware::{RateLimiter, log_errors, rate_limit},
    routes,
};

// 献血者相关的路由
pub fn donor_routes() -> Router<AppState> {
    Router::new().route("/donors/search", get(routes::donor::search_donors))
}

// 系统路由
pub fn system_routes() -> Router<AppState> {
    Router::new().route("/ping", get(routes::system::ping))
}

// 创建主路由，挂载在配置的 API 前缀下
pub fn create_router(state: AppState) -> Router {
    let api = Router::new().merge(donor_routes()).merge(system_routes());

    let router = match state.config.api_base_uri.trim_end_matches('/') {
        "" => Router::new().merge(api),
        base => Router::new().nest(base, api),
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}

// 在最外层挂载限流
pub fn with_rate_limit(router: Router, limiter: Arc<RateLimiter>) -> Router {
    router.layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
}
