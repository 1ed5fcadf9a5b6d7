//! # メール送信
//!
//! メール送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: [`MailTransport`] trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（本番 / Mailpit 開発用）、Noop（送信無効化時）
//! - **環境変数切替**: `MAIL_BACKEND` でランタイム選択
//! - **リトライなし**: 送信は 1 回のみ試行する。失敗の扱い（致命 or
//!   ベストエフォート）は呼び出し側の責務

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopMailTransport;
use quoteflow_domain::notification::{EmailMessage, NotificationError};
pub use smtp::SmtpMailTransport;

/// メール送信トレイト
///
/// 送信能力の中核。`send(from, to, subject, htmlBody, textBody, replyTo)`
/// 相当の単一操作に抽象化し、SMTP / Noop の実装を環境変数で切り替える。
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// メールを 1 通送信する
    async fn send(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
