use serde::{Deserialize, Serialize};

/// 支持的血型（ABO + Rh）
pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// 献血者搜索参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    pub blood_type: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl SearchParameters {
    /// 校验请求参数，返回第一个不合法字段的说明
    pub fn validate(&self) -> Result<(), String> {
        if !BLOOD_TYPES.contains(&self.blood_type.as_str()) {
            return Err(format!("Unsupported blood type: {}", self.blood_type));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err("Latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err("Longitude must be between -180 and 180".to_string());
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err("Radius must be a positive number".to_string());
        }
        if self.page == 0 {
            return Err("Page starts at 1".to_string());
        }
        if self.limit == 0 {
            return Err("Limit must be at least 1".to_string());
        }
        Ok(())
    }

    /// 将半径和分页大小限制在配置上限内
    pub fn clamped(mut self, max_radius: f64, max_limit: u32) -> Self {
        self.radius = self.radius.min(max_radius);
        self.limit = self.limit.min(max_limit);
        self
    }

    /// 上游查询参数
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bloodType", self.blood_type.clone()),
            ("lat", self.lat.to_string()),
            ("lng", self.lng.to_string()),
            ("radius", self.radius.to_string()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}
