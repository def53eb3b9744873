//! # ダッシュボード BFF サーバー
//!
//! ダッシュボードからの操作（失敗アクションの取得・リトライ）を上流の
//! Integrator API に中継し、結果をバッキングストアに反映する。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────┐
//! │   Browser    │────▶│     BFF      │────▶│ Integrator API │
//! │ (Dashboard)  │     │  port: 3000  │     └────────────────┘
//! └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │ Backing Store│
//!                      │  (REST API)  │
//!                      └──────────────┘
//! ```
//!
//! 環境変数は [`config`](toolretry_dashboard_bff::config) を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p toolretry-dashboard-bff
//!
//! # 本番環境（環境変数を直接指定）
//! LOG_FORMAT=json SUPABASE_URL=... cargo run -p toolretry-dashboard-bff --release
//! ```

use std::net::SocketAddr;

use anyhow::Context as _;
use tokio::net::TcpListener;
use toolretry_dashboard_bff::{
    app_builder::{AppDependencies, build_app},
    config::AppConfig,
};
use toolretry_shared::observability::{TracingConfig, init_tracing};

/// BFF サーバーのエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("dashboard-bff"));
    let _tracing_guard = tracing::info_span!("app", service = "dashboard-bff").entered();

    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(
        integrator_url = %config.integrator_url,
        store_url = %config.store.url,
        "BFF サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let app = build_app(config.public(), AppDependencies::from_config(&config));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("BFF サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
