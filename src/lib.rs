use std::sync::Arc;

use config::Config;

pub mod cache;
pub mod client;
pub mod config;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod utils;

use cache::{CacheStore, ResultCache};
use client::{
    AuthenticatedClient, HttpTransport, RetryPolicy, RetryingClient, SessionStore,
    TracingNotifier,
};
use routes::donor::DonorSearchService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub donor_search: Arc<DonorSearchService>,
}

impl AppState {
    /// 按配置组装搜索服务，缓存、会话和网络层由调用方注入
    pub fn new(
        config: Config,
        store: Arc<dyn CacheStore>,
        session: Arc<dyn SessionStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let cache = ResultCache::new(store, config.cache_ttl());
        let client = RetryingClient::new(transport)
            .with_policy(RetryPolicy::new(
                config.request_max_retries,
                config.retry_delay(),
            ))
            .with_notifier(Arc::new(TracingNotifier));
        let client = AuthenticatedClient::new(client, session);
        let donor_search = DonorSearchService::new(cache, client, &config.donor_directory_url)
            .with_coord_precision(config.cache_coord_precision);

        Self {
            config,
            donor_search: Arc::new(donor_search),
        }
    }
}
