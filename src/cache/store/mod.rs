//! 缓存存储抽象
//!
//! 结果缓存只依赖 [`CacheStore`]，生产环境使用 Redis，测试使用内存实现。

use async_trait::async_trait;

use super::error::CacheError;

pub mod memory;
pub mod redis_store;

pub use self::memory::MemoryCacheStore;
pub use self::redis_store::RedisCacheStore;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 读取字符串值，不存在或已过期时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// 写入字符串值并设置过期时间（秒），同一键后写覆盖先写
    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError>;

    /// 固定窗口计数：窗口内首次计数时设置过期，返回加一后的值
    ///
    /// 建立计数与设置过期必须一起生效，否则计数键可能永久存在。
    async fn incr_window(&self, key: &str, window_secs: u64) -> Result<i64, CacheError>;
}
