//! # ヘルスチェックハンドラ
//!
//! Liveness Check。依存サービスには問い合わせない。

use axum::Json;
use toolretry_shared::HealthResponse;

/// BFF のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
