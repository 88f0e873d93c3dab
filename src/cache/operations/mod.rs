/// 缓存操作
/// 提供缓存读写的功能实现

// 搜索结果缓存
pub mod result_cache;

pub use result_cache::{RESULT_CACHE_EXPIRE, ResultCache};
