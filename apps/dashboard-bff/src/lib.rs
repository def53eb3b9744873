//! # ダッシュボード BFF ライブラリ
//!
//! ブラウザのダッシュボードと上流のワークフロー自動化 API（Integrator）の間に立つ
//! API サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: 依存の組み立てとルーター構築
//! - `client`: Integrator API クライアント
//! - `config`: 環境変数からの設定読み込み
//! - `error`: ハンドラエラーとレスポンス変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: CORS・Request ID 伝播
//! - `usecase`: リトライ系のビジネスロジック

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
