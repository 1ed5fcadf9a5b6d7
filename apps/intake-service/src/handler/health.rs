//! ヘルスチェックハンドラ

use axum::Json;
use quoteflow_shared::HealthResponse;

/// GET /health
///
/// サービスの生存確認。依存サービスの状態は確認しない。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
