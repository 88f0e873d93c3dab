use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::error::CacheError;
use crate::cache::store::CacheStore;

/// 搜索结果缓存默认过期时间（秒）
pub const RESULT_CACHE_EXPIRE: u64 = 300; // 5分钟

/// 搜索结果缓存
///
/// 缓存只是性能优化：读写失败都只记录日志，读失败按未命中处理。
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn with_default_ttl(store: Arc<dyn CacheStore>) -> Self {
        Self::new(store, Duration::from_secs(RESULT_CACHE_EXPIRE))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 读取缓存，未命中或出错都返回 `None`
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key).await {
            Ok(Some(value)) => {
                tracing::debug!("Cache hit: {}", key);
                Some(value)
            }
            Ok(None) => {
                tracing::debug!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// 写入缓存，失败时只记录日志
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match self.try_set(key, value).await {
            Ok(()) => tracing::debug!("Set cache: {} (ttl {}s)", key, self.ttl.as_secs()),
            Err(e) => tracing::warn!("Cache write failed for {}: {}", key, e),
        }
    }

    async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        self.store.set_ex(key, json, self.ttl.as_secs()).await
    }
}
