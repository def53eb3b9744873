//! # BFF エラーハンドリング
//!
//! ハンドラが返すエラー型と、axum レスポンスへの変換。
//!
//! | 種別 | ステータス | ボディ |
//! |------|-----------|--------|
//! | 入力検証エラー | 400 | `{error}` または `{error, required}` |
//! | リクエスト JSON の形式不正 | 400 | `{error}` |
//! | 上流の取得失敗 | 上流のステータス | `{error, details}` |
//! | 上流の起動失敗 | 500 | `{error, details, api_response, http_status}` |
//! | 予期しないエラー | 500 | `{error}` |
//! | 許可されないメソッド | 405 | `{error}` |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use toolretry_shared::ErrorBody;

use crate::{
    client::{IntegratorError, TriggerFailure},
    usecase::RetryError,
};

/// 起動失敗時の `error`
pub const TRIGGER_FAILED: &str = "Failed to trigger workflow";
/// 取得失敗時の `error`
pub const FETCH_FAILED: &str = "Failed to fetch from Integrator API";

/// ハンドラのエラー
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    body:   ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorBody) -> Self {
        Self { status, body }
    }

    /// 400 Bad Request
    pub fn bad_request(body: ErrorBody) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// 500 Internal Server Error（`{error: message}`）
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(message))
    }

    /// 405 Method Not Allowed
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, ErrorBody::method_not_allowed())
    }

    /// 上流の取得失敗（ステータスをそのまま転送する）
    pub fn upstream_fetch_failed(status: u16, raw_body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        Self::new(status, ErrorBody::new(FETCH_FAILED).with_details(raw_body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<TriggerFailure> for ApiError {
    fn from(failure: TriggerFailure) -> Self {
        tracing::warn!(
            http_status = failure.http_status,
            details = %failure.details,
            "ワークフローの起動に失敗しました"
        );
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new(TRIGGER_FAILED)
                .with_details(failure.details)
                .with_api_response(failure.api_response)
                .with_http_status(failure.http_status),
        )
    }
}

impl From<IntegratorError> for ApiError {
    fn from(err: IntegratorError) -> Self {
        tracing::error!(
            error.category = "external_service",
            error.kind = "integrator",
            "Integrator API の呼び出しで内部エラー: {}",
            err
        );
        Self::internal(err.to_string())
    }
}

impl From<RetryError> for ApiError {
    fn from(err: RetryError) -> Self {
        match err {
            RetryError::Trigger(failure) => failure.into(),
            RetryError::Integrator(err) => err.into(),
            RetryError::Store(err) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "store",
                    span_trace = %err.span_trace(),
                    "バッキングストアの呼び出しで内部エラー: {}",
                    err
                );
                Self::internal(err.to_string())
            }
            RetryError::Domain(err) => {
                tracing::error!(
                    error.category = "domain",
                    error.kind = "invalid_state",
                    "ドメインルール違反: {}",
                    err
                );
                Self::internal(err.to_string())
            }
        }
    }
}

/// リクエストボディの JSON が不正なときは 400 `{error: message}`
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(ErrorBody::new(rejection.body_text()))
    }
}

/// ルートに存在しないメソッドへのフォールバック
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
