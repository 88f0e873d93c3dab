use std::env;
use std::time::Duration;

use crate::cache::keys::MAX_COORD_PRECISION;

/// 默认缓存地址
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub redis_url: String,
    pub donor_directory_url: String,
    pub session_store_path: String,
    pub cache_ttl_secs: u64,
    pub cache_coord_precision: u32,
    pub request_max_retries: u32,
    pub request_retry_delay_ms: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub max_search_radius: f64,
    pub max_page_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            // 上游献血者目录服务必须显式配置
            donor_directory_url: env::var("DONOR_DIRECTORY_URL")?
                .trim_end_matches('/')
                .to_string(),
            session_store_path: env::var("SESSION_STORE_PATH")
                .unwrap_or_else(|_| "session.json".to_string()),
            cache_ttl_secs: parse_or("CACHE_TTL_SECS", 300),
            cache_coord_precision: parse_or("CACHE_COORD_PRECISION", 2u32)
                .min(MAX_COORD_PRECISION),
            request_max_retries: parse_or("REQUEST_MAX_RETRIES", 3),
            request_retry_delay_ms: parse_or("REQUEST_RETRY_DELAY_MS", 1000),
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW", 60),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", 100),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".to_string()),
            server_port: parse_or("SERVER_PORT", 3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".to_string()),
            max_search_radius: parse_or("MAX_SEARCH_RADIUS", 50.0),
            max_page_limit: parse_or("MAX_PAGE_LIMIT", 100),
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.request_retry_delay_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            donor_directory_url: "http://localhost:4000".to_string(),
            session_store_path: "session.json".to_string(),
            cache_ttl_secs: 300,
            cache_coord_precision: 2,
            request_max_retries: 3,
            request_retry_delay_ms: 1000,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            server_host: "::".to_string(),
            server_port: 3000,
            api_base_uri: "/api".to_string(),
            max_search_radius: 50.0,
            max_page_limit: 100,
        }
    }
}

// 解析失败时回退到默认值
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    parse_value(env::var(name).ok().as_deref(), default)
}

fn parse_value<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
