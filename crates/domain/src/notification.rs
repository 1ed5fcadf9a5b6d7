//! # メール通知
//!
//! 見積もり依頼パイプラインが送信する 3 種類のメールのドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 宛先 |
//! |---|------------|------|
//! | [`QuoteEmail::BusinessAlert`] | 事業者向けアラート | 事業者の受信箱（必須の副作用） |
//! | [`QuoteEmail::CustomerConfirmation`] | 顧客向け確認 | フォーム送信者 |
//! | [`QuoteEmail::DashboardNotification`] | ダッシュボード通知 | オプトイン済みダッシュボードユーザー |
//!
//! ## 設計方針
//!
//! - **enum による通知種別**: 各バリアントが宛先コンテキストを保持する
//! - **HTML / テキスト両形式**: すべてのメールは同じフィールド値から
//!   両形式を生成する（内容は乖離しない、マークアップのみ異なる）
//! - **テンプレート分離**: メール本文の生成はレンダラー（intake-service）が担当

use strum::IntoStaticStr;
use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// メールボックス（アドレス + 表示名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAddress {
    pub address: String,
    pub name:    String,
}

impl MailAddress {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name:    name.into(),
        }
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。`MailTransport` に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信元
    pub from:      MailAddress,
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
    /// 返信先（未指定なら送信元に返信される）
    pub reply_to:  Option<MailAddress>,
}

/// メール種別
///
/// ログの `email.kind` フィールドに使用する。snake_case で出力される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum QuoteEmailKind {
    BusinessAlert,
    CustomerConfirmation,
    DashboardNotification,
}

/// 見積もり依頼メール
///
/// 各バリアントが宛先コンテキストを保持する。レコード本体
/// （`QuoteRequest`）はレンダリング時に別引数で渡される。
#[derive(Debug, Clone)]
pub enum QuoteEmail {
    /// 事業者向けアラート: 全フィールドを掲載。唯一の必須副作用
    BusinessAlert {
        /// 事業者の受信箱
        to: String,
    },
    /// 顧客向け確認: サービス種別 + 希望日の要約を掲載
    CustomerConfirmation {
        /// フォーム送信者のメールアドレス
        to: String,
    },
    /// ダッシュボード通知: 説明文は 200 文字に切り詰めた概要を掲載
    DashboardNotification {
        /// 通知先ユーザーのメールアドレス
        to:             String,
        /// 宛名（未登録の場合は汎用の呼びかけ）
        recipient_name: String,
    },
}

impl QuoteEmail {
    /// メール種別を返す
    pub fn kind(&self) -> QuoteEmailKind {
        match self {
            Self::BusinessAlert { .. } => QuoteEmailKind::BusinessAlert,
            Self::CustomerConfirmation { .. } => QuoteEmailKind::CustomerConfirmation,
            Self::DashboardNotification { .. } => QuoteEmailKind::DashboardNotification,
        }
    }

    /// 宛先メールアドレスを返す
    pub fn recipient_email(&self) -> &str {
        match self {
            Self::BusinessAlert { to }
            | Self::CustomerConfirmation { to }
            | Self::DashboardNotification { to, .. } => to,
        }
    }
}
