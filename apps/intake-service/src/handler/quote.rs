//! 見積もり依頼の受付ハンドラ

use std::sync::Arc;

use axum::{Form, Json, extract::State};
use quoteflow_domain::quote::QuoteForm;
use quoteflow_shared::SubmitResponse;

use crate::{error::IntakeError, usecase::QuoteIntakeUseCase};

/// 見積もり受付ハンドラの State
pub struct QuoteState {
    pub usecase: QuoteIntakeUseCase,
}

/// POST /api/quote
///
/// form-encoded のフォーム送信を受け付け、受付パイプラインを実行する。
/// ベストエフォートの副作用の結果はレスポンスに現れない。
pub async fn submit_quote(
    State(state): State<Arc<QuoteState>>,
    Form(form): Form<QuoteForm>,
) -> Result<Json<SubmitResponse>, IntakeError> {
    let outcome = state.usecase.submit(form).await?;
    Ok(Json(SubmitResponse::ok(outcome.message)))
}
