//! # QuoteFlow インフラ層
//!
//! 外部コラボレータとの通信を担当するインフラストラクチャクレート。
//!
//! ## 提供する能力
//!
//! - [`notification`] — SMTP 経由のメール送信（[`notification::MailTransport`] trait）
//! - [`supabase`] — Supabase REST API への永続化と読み取りクエリ
//!   （[`supabase::QuoteStore`] / [`supabase::DashboardDirectory`] trait）
//! - [`error`] — インフラ層エラー（[`InfraError`]）
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: すべての外部通信は trait 越しに行い、
//!   ユースケース層はモックでテストできる
//! - **短い固定タイムアウト**: 低速な外部依存がレスポンスを
//!   無期限に遅延させないよう、各クライアントは数秒のタイムアウトを持つ

pub mod error;
pub mod notification;
pub mod supabase;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
