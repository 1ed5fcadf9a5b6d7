//! # 受付 API エラー定義
//!
//! 見積もり依頼の受付で発生するエラーと HTTP レスポンスへの変換を定義する。
//!
//! ## エラー分類
//!
//! | 種別 | ステータス | レスポンス |
//! |------|----------|-----------|
//! | [`IntakeError::Validation`] | 400 | 違反メッセージをカンマ区切りで連結 |
//! | [`IntakeError::MailDelivery`] | 500 | 電話番号つきのフォールバック案内 |
//!
//! ベストエフォートの副作用（永続化・ダッシュボード通知）の失敗は
//! ここには現れない。ユースケース層でログに記録され、レスポンスは成功する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quoteflow_shared::SubmitResponse;
use thiserror::Error;

/// 受付 API のエラー
#[derive(Debug, Error)]
pub enum IntakeError {
    /// フォームバリデーション違反
    ///
    /// 違反したルールすべてのメッセージをフィールド順で保持する。
    #[error("バリデーション違反: {0:?}")]
    Validation(Vec<String>),

    /// 事業者向けアラートの送信失敗
    ///
    /// 唯一の必須副作用が失敗した場合。送信者には電話での連絡先を案内する。
    #[error("メール送信失敗: {detail}")]
    MailDelivery {
        /// 案内する電話番号
        fallback_phone: String,
        /// 失敗の詳細（レスポンスの `error` フィールドに載せる）
        detail:         String,
    },
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                SubmitResponse::failed(errors.join(", ")),
            ),
            Self::MailDelivery {
                fallback_phone,
                detail,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SubmitResponse::failed_with_error(
                    format!("Failed to send email. Please call us directly at {fallback_phone}."),
                    detail,
                ),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn バリデーション違反は400でメッセージを連結する() {
        let error = IntakeError::Validation(vec![
            "First name is required".to_string(),
            "Valid email is required".to_string(),
        ]);
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["message"],
            "First name is required, Valid email is required"
        );
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn アラート送信失敗は500で電話番号を案内する() {
        let error = IntakeError::MailDelivery {
            fallback_phone: "(770) 555-1234".to_string(),
            detail:         "SMTP 送信失敗: connection refused".to_string(),
        };
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["message"],
            "Failed to send email. Please call us directly at (770) 555-1234."
        );
        assert_eq!(json["error"], "SMTP 送信失敗: connection refused");
    }
}
