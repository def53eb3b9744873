//! # Request ID 伝播ミドルウェア
//!
//! BFF → Integrator API 間で Request ID を引き継ぐ。
//!
//! 1. [`store_request_id`] が `SetRequestIdLayer` の付与した
//!    [`RequestId`](tower_http::request_id::RequestId) を task-local に保存する
//! 2. クライアントは [`inject_request_id`] で `X-Request-Id` ヘッダーを付与して送信する
//!
//! ハンドラ・ユースケースのシグネチャに Request ID を通さずに済むよう、
//! task-local で暗黙的に伝播させる。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;
use toolretry_shared::observability::REQUEST_ID_HEADER;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 現在のリクエストの Request ID
///
/// task-local スコープ外（起動処理やテスト）では `None`。
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Request ID を task-local に保存するミドルウェア
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();

    REQUEST_ID.scope(request_id, next.run(request)).await
}

/// 上流へのリクエストに `X-Request-Id` を付与する
pub fn inject_request_id(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match current_request_id() {
        Some(id) => builder.header(REQUEST_ID_HEADER, id),
        None => builder,
    }
}
