use crate::models::SearchParameters;

/// 献血者搜索缓存键前缀
///
/// 字段顺序或精度变化会让旧键全部失效，调整时需要同步更换前缀
pub const DONOR_SEARCH_PREFIX: &str = "donors:";

/// 坐标默认保留的小数位数
pub const DEFAULT_COORD_PRECISION: u32 = 2;

/// 坐标精度上限，超过后 f64 已无法区分更多小数位
pub const MAX_COORD_PRECISION: u32 = 15;

/// 按指定小数位四舍五入坐标，精度超过 [`MAX_COORD_PRECISION`] 时按上限处理
pub fn round_coord(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_COORD_PRECISION) as i32);
    // 加 0.0 把 -0 归一为 0，避免同一位置生成两个键
    (value * factor).round() / factor + 0.0
}

/// 生成献血者搜索缓存键
///
/// 格式：`donors:{bloodType}:{lat}:{lng}:{radius}:{page}:{limit}`
///
/// 坐标先四舍五入，再按最短十进制形式输出（`40.7`、`-74`），不补零到固定位数。
/// 与其他写入方共享缓存时需要按同样规则生成键。
pub fn donor_search_key(params: &SearchParameters, precision: u32) -> String {
    format!(
        "{}{}:{}:{}:{}:{}:{}",
        DONOR_SEARCH_PREFIX,
        params.blood_type,
        round_coord(params.lat, precision),
        round_coord(params.lng, precision),
        params.radius,
        params.page,
        params.limit
    )
}
