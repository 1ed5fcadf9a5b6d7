//! # ダッシュボード通知ディスパッチャ
//!
//! 通知先の解決からメール送信までのファンアウト全体を実行する。
//!
//! ## 設計方針
//!
//! - **fire-and-forget**: どのステップで失敗してもエラーを返さない。
//!   失敗はログに記録し、集計（[`FanoutSummary`]）にのみ反映する
//! - **逐次送信**: 宛先ごとに順番に処理する。1 人への失敗が他の宛先を
//!   巻き込まない
//! - **重複排除**: 事業者の受信箱と同じアドレスはスキップする
//!   （アラートで既に受信している）

use std::sync::Arc;

use quoteflow_domain::{
    notification::QuoteEmail,
    quote::QuoteRequest,
    user::{BusinessId, DashboardProfile},
};
use quoteflow_infra::{notification::MailTransport, supabase::DashboardDirectory};
use quoteflow_shared::{event_log::event, log_business_event};

use super::{RecipientResolver, TemplateRenderer};

/// ファンアウトの集計結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutSummary {
    /// 解決された通知先の数
    pub attempted: usize,
    /// 送信成功
    pub sent:      usize,
    /// スキップ（アドレス未登録、事業者受信箱と重複）
    pub skipped:   usize,
    /// 失敗（メール取得エラー、レンダリング失敗、送信失敗）
    pub failed:    usize,
}

/// ダッシュボード通知ディスパッチャ
pub struct NotificationDispatcher {
    resolver:       RecipientResolver,
    directory:      Arc<dyn DashboardDirectory>,
    transport:      Arc<dyn MailTransport>,
    renderer:       Arc<TemplateRenderer>,
    /// 事業者の受信箱（このアドレスへの通知はスキップ）
    business_inbox: String,
}

impl NotificationDispatcher {
    pub fn new(
        directory: Arc<dyn DashboardDirectory>,
        transport: Arc<dyn MailTransport>,
        renderer: Arc<TemplateRenderer>,
        business_inbox: String,
    ) -> Self {
        Self {
            resolver: RecipientResolver::new(directory.clone()),
            directory,
            transport,
            renderer,
            business_inbox,
        }
    }

    /// 通知をファンアウトする（fire-and-forget）
    pub async fn fanout(&self, business_id: &BusinessId, request: &QuoteRequest) -> FanoutSummary {
        let recipients = self.resolver.resolve(business_id).await;

        let mut summary = FanoutSummary {
            attempted: recipients.len(),
            ..FanoutSummary::default()
        };

        for profile in &recipients {
            self.notify_one(profile, request, &mut summary).await;
        }

        summary
    }

    /// 1 人の通知先への送信を処理する
    async fn notify_one(
        &self,
        profile: &DashboardProfile,
        request: &QuoteRequest,
        summary: &mut FanoutSummary,
    ) {
        let to = match self.directory.user_email(&profile.id).await {
            Ok(Some(email)) => email,
            Ok(None) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SKIPPED,
                    event.result = event::result::SUCCESS,
                    user.id = %profile.id,
                    "メールアドレス未登録のためスキップ"
                );
                summary.skipped += 1;
                return;
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    user.id = %profile.id,
                    error = %e,
                    "メールアドレスの取得に失敗"
                );
                summary.failed += 1;
                return;
            }
        };

        // 事業者の受信箱はアラートで既に受信している
        if to == self.business_inbox {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.result = event::result::SUCCESS,
                user.id = %profile.id,
                "事業者の受信箱と重複するためスキップ"
            );
            summary.skipped += 1;
            return;
        }

        let email = QuoteEmail::DashboardNotification {
            to:             to.clone(),
            recipient_name: profile.display_name().to_string(),
        };

        let message = match self.renderer.render(&email, request) {
            Ok(message) => message,
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    notification.recipient = %to,
                    error = %e,
                    "通知テンプレートのレンダリングに失敗"
                );
                summary.failed += 1;
                return;
            }
        };

        match self.transport.send(&message).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.result = event::result::SUCCESS,
                    notification.recipient = %to,
                    "ダッシュボード通知を送信"
                );
                summary.sent += 1;
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    notification.recipient = %to,
                    error = %e,
                    "ダッシュボード通知の送信に失敗"
                );
                summary.failed += 1;
            }
        }
    }
}
