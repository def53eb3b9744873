//! # エラーレスポンスボディ
//!
//! ダッシュボード向け API で共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - ブラウザクライアントは `error` フィールドのみを必須として読む
//! - 診断情報（`details` / `required` / `api_response` / `http_status`）は
//!   必要なときだけ付与し、未設定のフィールドは JSON に出力しない
//! - axum の `IntoResponse` 変換は各アプリの責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};

/// エラーレスポンスボディ
///
/// `{ "error": "..." }` を基本形とし、ビルダーメソッドで診断情報を追加する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_response: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl ErrorBody {
    /// `error` のみを持つボディを作成する
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error:        error.into(),
            details:      None,
            required:     None,
            api_response: None,
            http_status:  None,
        }
    }

    /// 405 Method Not Allowed 用の固定ボディ
    pub fn method_not_allowed() -> Self {
        Self::new("Method not allowed")
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// 必須フィールド名の一覧を付与する
    pub fn with_required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// 上流 API の生レスポンスを付与する
    pub fn with_api_response(mut self, api_response: serde_json::Value) -> Self {
        self.api_response = Some(api_response);
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}
