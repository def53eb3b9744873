//! # CORS ミドルウェア
//!
//! ダッシュボードは任意のオリジンから呼び出されるため、全レスポンスに
//! 許可ヘッダーを付与する。
//!
//! - `OPTIONS` はハンドラに到達させず、200・空ボディで即座に返す
//! - `Access-Control-Allow-Methods` はルートごとに [`CorsPolicy`] で指定する

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// ルートごとの CORS 設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorsPolicy {
    allow_methods: &'static str,
}

impl CorsPolicy {
    /// 参照系（`GET`）ルート用
    pub const GET: Self = Self {
        allow_methods: "GET, OPTIONS",
    };
    /// 更新系（`POST`）ルート用
    pub const POST: Self = Self {
        allow_methods: "POST, OPTIONS",
    };

    fn apply(&self, response: &mut Response) {
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(self.allow_methods),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
    }
}

/// CORS ヘッダーを付与し、プリフライトに応答する
pub async fn cors(State(policy): State<CorsPolicy>, request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        (StatusCode::OK, Body::empty()).into_response()
    } else {
        next.run(request).await
    };
    policy.apply(&mut response);
    response
}
