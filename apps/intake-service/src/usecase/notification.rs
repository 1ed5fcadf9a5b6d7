//! # 通知ユースケース
//!
//! メール本文の生成（[`TemplateRenderer`]）、通知先の解決
//! （[`RecipientResolver`]）、ファンアウト実行
//! （[`NotificationDispatcher`]）を提供する。

mod dispatcher;
mod recipient_resolver;
mod template_renderer;

pub use dispatcher::{FanoutSummary, NotificationDispatcher};
pub use recipient_resolver::RecipientResolver;
pub use template_renderer::TemplateRenderer;
