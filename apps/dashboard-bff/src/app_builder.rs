//! # BFF アプリケーション構築
//!
//! DI（クライアント・リポジトリ・State）の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{MethodRouter, get, post},
};
use toolretry_domain::clock::{Clock, SystemClock};
use toolretry_infra::{
    RestStoreClient,
    repository::{
        FailedToolRepository,
        RestFailedToolRepository,
        RestWorkflowRepository,
        RestWorkflowRunRepository,
        WorkflowRepository,
        WorkflowRunRepository,
    },
};
use toolretry_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    client::{IntegratorClient, IntegratorClientImpl},
    config::{AppConfig, PublicConfig},
    error::method_not_allowed,
    handler::{
        ConfigState,
        FailedActionsState,
        RetryActionsState,
        RetryRunState,
        get_config,
        get_failed_actions,
        health_check,
        retry_actions,
        retry_run,
    },
    middleware::{CorsPolicy, cors, request_id::store_request_id},
    usecase::{RetryActionsUseCaseImpl, RetryRunUseCaseImpl},
};

/// ルーターが必要とする外部依存
///
/// 本番では [`AppDependencies::from_config`]、テストではスタブ・モックを渡す。
#[derive(Clone)]
pub struct AppDependencies {
    pub integrator:    Arc<dyn IntegratorClient>,
    pub failed_tools:  Arc<dyn FailedToolRepository>,
    pub workflows:     Arc<dyn WorkflowRepository>,
    pub workflow_runs: Arc<dyn WorkflowRunRepository>,
    pub clock:         Arc<dyn Clock>,
}

impl AppDependencies {
    /// 設定から本番用の依存を構築する
    ///
    /// 3 つのリポジトリは同じ `reqwest::Client`（接続プール）を共有する。
    pub fn from_config(config: &AppConfig) -> Self {
        let store = RestStoreClient::new(&config.store.url, config.store.service_key.as_str());

        Self {
            integrator:    Arc::new(IntegratorClientImpl::new(&config.integrator_url)),
            failed_tools:  Arc::new(RestFailedToolRepository::new(store.clone())),
            workflows:     Arc::new(RestWorkflowRepository::new(store.clone())),
            workflow_runs: Arc::new(RestWorkflowRunRepository::new(store)),
            clock:         Arc::new(SystemClock),
        }
    }
}

/// CORS と 405 フォールバックを付与したルートを作る
fn with_cors<S>(route: MethodRouter<S>, policy: CorsPolicy) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route
        .fallback(method_not_allowed)
        .layer(from_fn_with_state(policy, cors))
}

/// State の組み立てとルーター定義を行う
pub fn build_app(public_config: PublicConfig, deps: AppDependencies) -> Router {
    let config_state = Arc::new(ConfigState { public_config });
    let failed_actions_state = Arc::new(FailedActionsState {
        integrator: deps.integrator.clone(),
    });
    let retry_actions_state = Arc::new(RetryActionsState {
        usecase: RetryActionsUseCaseImpl::new(
            deps.integrator.clone(),
            deps.failed_tools,
            deps.workflows,
            deps.workflow_runs.clone(),
            deps.clock.clone(),
        ),
    });
    let retry_run_state = Arc::new(RetryRunState {
        usecase: RetryRunUseCaseImpl::new(deps.integrator, deps.workflow_runs, deps.clock),
    });

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/api/config", with_cors(get(get_config), CorsPolicy::GET))
                .with_state(config_state),
        )
        .merge(
            Router::new()
                .route(
                    "/api/get-failed-actions",
                    with_cors(post(get_failed_actions), CorsPolicy::POST),
                )
                .with_state(failed_actions_state),
        )
        .merge(
            Router::new()
                .route(
                    "/api/retry-actions",
                    with_cors(post(retry_actions), CorsPolicy::POST),
                )
                .with_state(retry_actions_state),
        )
        .merge(
            Router::new()
                .route("/api/retry", with_cors(post(retry_run), CorsPolicy::POST))
                .with_state(retry_run_state),
        )
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそれを使う）
        // 2. TraceLayer: request_id を含むスパンで全ログを囲む
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 4. store_request_id: task-local に保存し、Integrator API への伝播に使う
        .layer(from_fn(store_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
