//! # バッキングストア REST クライアント
//!
//! `failed_tools` / `workflows` / `workflow_runs` を公開する PostgREST 形式の
//! REST インターフェース（`{base}/rest/v1/{table}`）への共通接続部分。
//!
//! ## 認証
//!
//! サービスキーを `apikey` ヘッダーと `Authorization: Bearer` の両方に付与する。
//! サービスキーは書き込み権限を持つため、`Debug` 出力には含めない。
//!
//! ## Prefer ヘッダー
//!
//! | 値 | 用途 |
//! |----|------|
//! | [`prefer::RETURN_MINIMAL`] | 書き込み結果のエコーを抑制する |
//! | [`prefer::MERGE_DUPLICATES`] | 一意キー衝突時にマージする（upsert） |

use std::fmt;

use reqwest::Method;

use crate::error::InfraError;

/// `Prefer` ヘッダーの値
pub mod prefer {
    /// 書き込み結果のエコーを抑制する
    pub const RETURN_MINIMAL: &str = "return=minimal";
    /// upsert（一意キー衝突時にマージ）かつエコー抑制
    pub const MERGE_DUPLICATES: &str = "return=minimal,resolution=merge-duplicates";
}

/// テーブル名
pub mod table {
    pub const FAILED_TOOLS: &str = "failed_tools";
    pub const WORKFLOWS: &str = "workflows";
    pub const WORKFLOW_RUNS: &str = "workflow_runs";
}

/// バッキングストア REST クライアント
///
/// `reqwest::Client` は内部で接続プールを共有するため、複製は安価。
/// 各リポジトリはこのクライアントの複製を保持する。
#[derive(Clone)]
pub struct RestStoreClient {
    base_url:    String,
    service_key: String,
    client:      reqwest::Client,
}

impl RestStoreClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: ストアのベース URL（例: `https://xyz.supabase.co`）
    /// - `service_key`: サービスキー
    pub fn new(base_url: &str, service_key: impl Into<String>) -> Self {
        Self {
            base_url:    base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            client:      reqwest::Client::new(),
        }
    }

    /// テーブルのエンドポイント URL
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// 認証ヘッダー付きのリクエストビルダーを作成する
    pub(crate) fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

impl fmt::Debug for RestStoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestStoreClient")
            .field("base_url", &self.base_url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

/// 2xx 以外のレスポンスを [`InfraError`] に変換する
///
/// 成功時はレスポンスをそのまま返し、呼び出し元でボディを読む。
/// 2xx 以外でボディの読み取りに失敗した場合は `Http` エラーになる。
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, InfraError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    Err(InfraError::unexpected_status(status.as_u16(), body))
}
