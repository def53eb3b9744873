//! # HTTP ハンドラ
//!
//! ダッシュボード向け API のハンドラ。
//!
//! | ルート | メソッド | ハンドラ |
//! |--------|---------|---------|
//! | `/api/config` | GET | [`get_config`] |
//! | `/api/get-failed-actions` | POST | [`get_failed_actions`] |
//! | `/api/retry-actions` | POST | [`retry_actions`] |
//! | `/api/retry` | POST | [`retry_run`] |
//! | `/health` | GET | [`health_check`] |
//!
//! 各ハンドラはリクエスト JSON を `Result<Json<_>, JsonRejection>` で受け取り、
//! 形式不正を 400 `{error}` として返す。

pub mod config;
pub mod failed_actions;
pub mod health;
pub mod retry_actions;
pub mod retry_run;

pub use config::{ConfigState, get_config};
pub use failed_actions::{FailedActionsState, get_failed_actions};
pub use health::health_check;
pub use retry_actions::{RetryActionsState, retry_actions};
pub use retry_run::{RetryRunState, retry_run};

use serde_json::Value;

/// 文字列フィールドが空でなければ取り出す
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// フラグとして渡された JSON 値の真偽
///
/// null・false・0・空文字は偽、それ以外（配列・オブジェクトを含む）は真。
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!("yes"), true)]
    #[case(json!(1), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }
}
