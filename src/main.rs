use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use bleed_backend::{
    AppState,
    cache::RedisCacheStore,
    client::{FileSessionStore, ReqwestTransport},
    config::Config,
    middleware::RateLimiter,
    router::{create_router, with_rate_limit},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置 Redis 客户端
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let redis_arc = Arc::new(redis_client);

    let store = Arc::new(RedisCacheStore::new(redis_arc));

    // 设置应用状态
    let state = AppState::new(
        config.clone(),
        store.clone(),
        Arc::new(FileSessionStore::new(&config.session_store_path)),
        Arc::new(ReqwestTransport::new()),
    );
    tracing::info!(
        "Donor directory: {}, cache ttl: {}s",
        config.donor_directory_url,
        config.cache_ttl_secs
    );

    // 设置限流器
    let rate_limiter = Arc::new(RateLimiter::new(store, config.clone()));

    let router = with_rate_limit(create_router(state), rate_limiter);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
