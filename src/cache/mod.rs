// 缓存模块
// 包含缓存键、存储后端和结果缓存

pub mod error;
pub mod keys;
pub mod operations;
pub mod store;

// 重新导出常用类型和函数，方便其他模块使用
pub use error::CacheError;
pub use keys::donor_search_key;
pub use operations::{RESULT_CACHE_EXPIRE, ResultCache};
pub use store::{CacheStore, MemoryCacheStore, RedisCacheStore};
