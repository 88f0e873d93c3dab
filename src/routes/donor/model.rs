use reqwest::Url;
use serde_json::Value;

use crate::cache::ResultCache;
use crate::cache::keys::{DEFAULT_COORD_PRECISION, donor_search_key};
use crate::client::{AuthenticatedClient, RequestError, RequestOptions};
use crate::models::SearchParameters;

/// 上游献血者搜索路径
pub const DONOR_SEARCH_PATH: &str = "/donors/search";

/// 献血者搜索：先查缓存，未命中时请求上游目录服务并回填缓存
#[derive(Clone)]
pub struct DonorSearchService {
    cache: ResultCache,
    client: AuthenticatedClient,
    directory_url: String,
    coord_precision: u32,
}

impl DonorSearchService {
    pub fn new(cache: ResultCache, client: AuthenticatedClient, directory_url: &str) -> Self {
        Self {
            cache,
            client,
            directory_url: directory_url.trim_end_matches('/').to_string(),
            coord_precision: DEFAULT_COORD_PRECISION,
        }
    }

    pub fn with_coord_precision(mut self, precision: u32) -> Self {
        self.coord_precision = precision;
        self
    }

    pub fn cache_key(&self, params: &SearchParameters) -> String {
        donor_search_key(params, self.coord_precision)
    }

    /// 上游搜索地址，查询参数使用原始坐标
    pub fn search_url(&self, params: &SearchParameters) -> String {
        let raw = format!("{}{}", self.directory_url, DONOR_SEARCH_PATH);
        // 无法解析时原样交给客户端，由客户端按同样的重试策略报错
        Url::parse_with_params(&raw, params.query_pairs())
            .map(String::from)
            .unwrap_or(raw)
    }

    pub async fn search(&self, params: &SearchParameters) -> Result<Value, RequestError> {
        let key = self.cache_key(params);
        if let Some(cached) = self.cache.get::<Value>(&key).await {
            tracing::debug!("Get donors from cache: {}", key);
            return Ok(cached);
        }

        let url = self.search_url(params);
        let data: Value = self.client.request(&url, RequestOptions::get()).await?;

        self.cache.set(&key, &data).await;
        Ok(data)
    }
}
