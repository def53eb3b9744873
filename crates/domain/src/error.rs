//! # ドメイン層エラー定義
//!
//! ドメインルール違反を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## 使用例
//!
//! ```rust
//! use toolretry_domain::{DomainError, value_objects::RunNumber};
//!
//! let err = RunNumber::new(0).unwrap_err();
//! assert!(matches!(err, DomainError::Validation(_)));
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値オブジェクトの生成時に不変条件を満たさない場合に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 不正な状態遷移
    ///
    /// ステートマシンで許可されていない遷移を要求した場合に使用する。
    #[error("不正な状態遷移: {from} → {to}")]
    InvalidTransition {
        /// 遷移元の状態
        from: &'static str,
        /// 遷移先の状態
        to:   &'static str,
    },
}
