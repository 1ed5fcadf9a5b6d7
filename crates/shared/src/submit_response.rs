//! # フォーム送信レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式 `{ "success": bool, "message": string,
//! "error"?: string }` を提供する。フロントエンドのフォームハンドラが
//! この形式を前提にしている。

use serde::{Deserialize, Serialize};

/// フォーム送信 API の統一レスポンス型
///
/// `success` が外部から見える唯一の成否シグナル。`error` は失敗時のみ
/// 付与される診断メッセージで、成功レスポンスには含めない。
///
/// ## 使用例
///
/// ```
/// use quoteflow_shared::SubmitResponse;
///
/// let response = SubmitResponse::ok("Thank you!");
/// assert!(response.success);
/// assert!(response.error.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl SubmitResponse {
    /// 成功レスポンスを作成する
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error:   None,
        }
    }

    /// 失敗レスポンスを作成する（診断メッセージなし）
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error:   None,
        }
    }

    /// 失敗レスポンスを作成する（診断メッセージ付き）
    pub fn failed_with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error:   Some(error.into()),
        }
    }
}
