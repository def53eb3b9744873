//! # 共通値オブジェクト
//!
//! 複数のエンティティで共有される値オブジェクトを定義する。
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`WorkflowId`] | `String` | 上流 API が採番するワークフロー ID |
//! | [`RunNumber`] | `u32` | ワークフロー内の実行番号（1 始まり） |
//! | [`Environment`] | `String` | テスト実行環境（`production` など） |
//! | [`LinearTicket`] | `String` | Linear の課題 ID |

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

// =========================================================================
// WorkflowId
// =========================================================================

/// ワークフロー ID
///
/// 上流 API（Integrator）が採番する不透明な文字列。本システムは生成しない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct WorkflowId(String);

impl WorkflowId {
    /// 文字列からワークフロー ID を作成する
    ///
    /// 空文字列は「ID なし」とみなしエラーにする。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation(
                "workflow_id は空にできません".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =========================================================================
// RunNumber
// =========================================================================

/// 実行番号（値オブジェクト）
///
/// 同一ワークフロー内で単調増加する実行の連番。
///
/// # 不変条件
///
/// - 1 以上
///
/// 採番は「既存の最大値 + 1」で行い、トランザクションで保護しない。
/// 同一ワークフローへの並行リトライは同じ番号を得る可能性がある。
///
/// ```rust
/// use toolretry_domain::value_objects::RunNumber;
///
/// assert_eq!(RunNumber::next_after(None).as_u32(), 1);
///
/// let latest = RunNumber::new(4).unwrap();
/// assert_eq!(RunNumber::next_after(Some(latest)).as_u32(), 5);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct RunNumber(u32);

impl RunNumber {
    /// 最初の実行番号（1）
    pub fn first() -> Self {
        Self(1)
    }

    /// 指定した値から実行番号を作成する
    ///
    /// 0 は `DomainError::Validation` になる。
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::Validation(
                "run_number は 1 以上である必要があります".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 既存の最大実行番号から次の番号を求める
    ///
    /// 既存の実行がなければ 1 を返す。
    pub fn next_after(latest: Option<RunNumber>) -> Self {
        match latest {
            Some(RunNumber(n)) => Self(n.saturating_add(1)),
            None => Self::first(),
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RunNumber {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RunNumber> for u32 {
    fn from(value: RunNumber) -> Self {
        value.0
    }
}

// =========================================================================
// Environment
// =========================================================================

/// テスト実行環境
///
/// 上流 API の `env` とワークフロー行の `environment` に書き込まれる。
/// ハンドラによって正規化規則が異なるため、コンストラクタを 2 つ用意する:
///
/// | 入力 | [`normalized`](Environment::normalized) | [`or_default`](Environment::or_default) |
/// |------|------|------|
/// | 未指定 / 空文字 | `production` | `production` |
/// | `prod` | `production` | `prod` |
/// | その他 | そのまま | そのまま |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    /// 既定の環境名
    pub const PRODUCTION: &'static str = "production";

    /// `production` 環境
    pub fn production() -> Self {
        Self(Self::PRODUCTION.to_string())
    }

    /// `prod` を `production` に読み替えたうえで既定値を補う
    pub fn normalized(raw: Option<&str>) -> Self {
        match raw {
            Some("prod") => Self::production(),
            other => Self::or_default(other),
        }
    }

    /// 未指定・空文字のときだけ既定値を補う（別名の読み替えはしない）
    pub fn or_default(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if !value.is_empty() => Self(value.to_string()),
            _ => Self::production(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =========================================================================
// LinearTicket
// =========================================================================

/// Linear の課題 ID（例: `ENG-123`）
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct LinearTicket(String);

impl LinearTicket {
    /// 課題 URL のベース
    pub const ISSUE_BASE_URL: &'static str = "https://linear.app/composio/issue";

    /// ワークフロー行に保存するチケット未指定時のプレースホルダ
    pub const NOT_APPLICABLE: &'static str = "N/A";

    /// 任意入力から課題 ID を作成する（未指定・空文字は `None`）
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
    }

    /// 上流 API に渡す `linear_issue_link` を組み立てる
    ///
    /// チケットがなければ空文字列を返す。
    pub fn issue_link(ticket: Option<&Self>) -> String {
        match ticket {
            Some(ticket) => format!("{}/{}", Self::ISSUE_BASE_URL, ticket.0),
            None => String::new(),
        }
    }

    /// ワークフロー行の `linear_ticket` 列に保存する値
    pub fn column_value(ticket: Option<&Self>) -> String {
        match ticket {
            Some(ticket) => ticket.0.clone(),
            None => Self::NOT_APPLICABLE.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
