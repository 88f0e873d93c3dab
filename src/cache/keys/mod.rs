/// 缓存键模块
/// 提供各种缓存键生成函数

// 献血者搜索缓存键
pub mod donor_keys;

pub use donor_keys::{
    DEFAULT_COORD_PRECISION, DONOR_SEARCH_PREFIX, MAX_COORD_PRECISION, donor_search_key,
    round_coord,
};

/// 限流计数键
pub fn rate_limit_key(client_ip: &str) -> String {
    format!("rate_limit:{}", client_ip)
}
