//! # ToolRetry 共有ユーティリティ
//!
//! ToolRetry の各クレートで共通利用するユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, dashboard-bff）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（`IntoResponse` 変換は各アプリの責務）

pub mod error_body;
pub mod health;
pub mod observability;

pub use error_body::ErrorBody;
pub use health::HealthResponse;
