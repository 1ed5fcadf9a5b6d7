//! # ユースケース層
//!
//! 受付パイプラインのオーケストレーション（[`quote`]）と
//! 通知コンポーネント（[`notification`]）を提供する。

pub mod notification;
pub mod quote;

pub use notification::{FanoutSummary, NotificationDispatcher, RecipientResolver, TemplateRenderer};
pub use quote::{BestEffortOutcome, QuoteIntakeUseCase, SubmitOutcome, SupabaseIntegration};
