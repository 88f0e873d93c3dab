use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::client::RequestError;
use crate::models::SearchParameters;
use crate::utils::{error_codes, error_to_api_response, success_to_api_response};

#[axum::debug_handler]
pub async fn search_donors(
    State(state): State<AppState>,
    Query(params): Query<SearchParameters>,
) -> impl IntoResponse {
    if let Err(msg) = params.validate() {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<serde_json::Value>(error_codes::VALIDATION_ERROR, msg),
        );
    }

    let params = params.clamped(state.config.max_search_radius, state.config.max_page_limit);

    match state.donor_search.search(&params).await {
        Ok(data) => (StatusCode::OK, success_to_api_response(data)),
        Err(e) => {
            let (status, code) = error_status(&e);
            (status, error_to_api_response(code, e.to_string()))
        }
    }
}

// 上游 4xx 原样透传，其余失败按网关错误处理
fn error_status(e: &RequestError) -> (StatusCode, i32) {
    match e.status() {
        Some(status) if e.is_client_error() => {
            let code = match status {
                401 => error_codes::AUTH_FAILED,
                403 => error_codes::PERMISSION_DENIED,
                404 => error_codes::NOT_FOUND,
                429 => error_codes::RATE_LIMIT,
                _ => error_codes::VALIDATION_ERROR,
            };
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST),
                code,
            )
        }
        _ => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
    }
}
