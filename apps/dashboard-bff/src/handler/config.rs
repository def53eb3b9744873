//! # 公開設定ハンドラ
//!
//! ブラウザクライアントがストアへ直接接続するための公開設定を返す。

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::config::PublicConfig;

/// 公開設定ハンドラの State
pub struct ConfigState {
    pub public_config: PublicConfig,
}

/// GET /api/config
///
/// 起動時に確定した設定を返すため、何度呼んでも同じ内容になる。
pub async fn get_config(State(state): State<Arc<ConfigState>>) -> Json<PublicConfig> {
    Json(state.public_config.clone())
}
