//! # アプリケーション構築
//!
//! DI（ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::IntakeConfig,
    handler::{QuoteState, health_check, submit_quote},
    usecase::QuoteIntakeUseCase,
};

/// ルーターを構築する
///
/// CORS は許可リスト方式: `allowed_origins` に含まれるオリジンにのみ
/// `Access-Control-Allow-Origin` を返す。ブラウザの preflight
/// （OPTIONS）は CORS レイヤーが処理する。
pub fn build_app(config: &IntakeConfig, usecase: QuoteIntakeUseCase) -> Router {
    let quote_state = Arc::new(QuoteState { usecase });

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/quote", post(submit_quote))
        .with_state(quote_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
