//! # BFF 設定
//!
//! 環境変数から BFF サーバーの設定を読み込む。
//!
//! | 変数名 | 必須 | デフォルト |
//! |--------|------|-----------|
//! | `BFF_HOST` | No | `0.0.0.0` |
//! | `BFF_PORT` | No | `3000` |
//! | `INTEGRATOR_API_URL` | No | `https://integrations-api.composio.io` |
//! | `SUPABASE_URL` | **Yes** | - |
//! | `SUPABASE_SERVICE_KEY` | **Yes** | - |
//! | `SUPABASE_ANON_KEY` | **Yes** | - |

use std::fmt;

use thiserror::Error;

/// Integrator API のデフォルト URL
pub const DEFAULT_INTEGRATOR_API_URL: &str = "https://integrations-api.composio.io";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定（または空文字）
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// バッキングストアの接続設定
#[derive(Clone)]
pub struct StoreConfig {
    /// ストアのベース URL
    pub url:         String,
    /// 書き込み権限を持つサービスキー（ブラウザには返さない）
    pub service_key: String,
    /// ブラウザに公開してよい匿名キー
    pub anon_key:    String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("anon_key", &self.anon_key)
            .finish()
    }
}

/// BFF サーバーの設定
///
/// 起動時に一度だけ構築し、以降は不変のまま各 State に注入する。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// バインドアドレス
    pub host:           String,
    /// ポート番号
    pub port:           u16,
    /// Integrator API のベース URL
    pub integrator_url: String,
    pub store:          StoreConfig,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストではプロセスの環境変数を書き換えずに検証するためにこちらを使う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let port = match optional("BFF_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name:  "BFF_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: optional("BFF_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            integrator_url: optional("INTEGRATOR_API_URL")
                .unwrap_or_else(|| DEFAULT_INTEGRATOR_API_URL.to_string()),
            store: StoreConfig {
                url:         required("SUPABASE_URL")?,
                service_key: required("SUPABASE_SERVICE_KEY")?,
                anon_key:    required("SUPABASE_ANON_KEY")?,
            },
        })
    }

    /// ブラウザに公開する設定
    pub fn public(&self) -> PublicConfig {
        PublicConfig {
            service_url: self.store.url.clone(),
            public_key:  self.store.anon_key.clone(),
        }
    }
}

/// ブラウザに公開する設定（`GET /api/config` のレスポンス）
///
/// サービスキーは含めない。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub service_url: String,
    pub public_key:  String,
}
