//! # 見積もり依頼受付ユースケース
//!
//! 受付パイプライン全体のオーケストレーション。
//!
//! ## パイプライン
//!
//! 1. バリデーション（失敗なら 400）
//! 2. 事業者向けアラート送信（唯一の必須副作用。失敗なら 500）
//! 3. 顧客向け確認送信（ベストエフォート）
//! 4. Supabase への永続化（ベストエフォート。未設定ならスキップ）
//! 5. ダッシュボード通知のファンアウト（ベストエフォート。未設定ならスキップ）
//!
//! ## 設計方針
//!
//! - **アラートが境界**: ステップ 2 の失敗はそれ以降をすべて中断する。
//!   アラートが届かない依頼はビジネス上「受け付けていない」扱い
//! - **ベストエフォートは隠蔽**: ステップ 3 以降の失敗はログと
//!   [`SubmitOutcome`] にのみ現れ、送信者へのレスポンスは成功のまま

use std::sync::Arc;

use quoteflow_domain::{
    notification::QuoteEmail,
    quote::{QuoteForm, QuoteRequest},
};
use quoteflow_infra::{
    notification::MailTransport,
    supabase::{NewQuoteRow, QuoteStore},
};
use quoteflow_shared::{event_log::event, log_business_event};

use super::notification::{FanoutSummary, NotificationDispatcher, TemplateRenderer};
use crate::{config::SupabaseConfig, error::IntakeError};

/// 送信者に返す成功メッセージ
const SUCCESS_MESSAGE: &str = "Thank you! Your consultation request has been sent. \
     We will contact you within 24 hours. A confirmation has been sent to your email.";

/// ベストエフォートの副作用の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffortOutcome {
    /// 実行して成功した
    Completed,
    /// 設定がないため実行しなかった
    Skipped,
    /// 実行して失敗した（レスポンスには影響しない）
    Failed(String),
}

/// 受付処理の結果
///
/// レスポンスに使うのは `message` のみ。残りはテストとログのための
/// 副作用の記録。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// 送信者に返すメッセージ
    pub message:      String,
    /// 顧客向け確認の結果
    pub confirmation: BestEffortOutcome,
    /// 永続化の結果
    pub persistence:  BestEffortOutcome,
    /// ダッシュボード通知の集計（未設定なら `None`）
    pub fanout:       Option<FanoutSummary>,
}

/// Supabase 連携一式
///
/// 永続化とダッシュボード通知は同じ接続設定に依存するため、
/// 揃っているか（`Some`）・いないか（`None`）を一括で扱う。
pub struct SupabaseIntegration {
    pub config:     SupabaseConfig,
    pub store:      Arc<dyn QuoteStore>,
    pub dispatcher: NotificationDispatcher,
}

/// 見積もり依頼受付ユースケース
pub struct QuoteIntakeUseCase {
    transport:      Arc<dyn MailTransport>,
    renderer:       Arc<TemplateRenderer>,
    supabase:       Option<SupabaseIntegration>,
    business_inbox: String,
    contact_phone:  String,
}

impl QuoteIntakeUseCase {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        renderer: Arc<TemplateRenderer>,
        supabase: Option<SupabaseIntegration>,
        business_inbox: String,
        contact_phone: String,
    ) -> Self {
        Self {
            transport,
            renderer,
            supabase,
            business_inbox,
            contact_phone,
        }
    }

    /// フォーム送信を受け付ける
    pub async fn submit(&self, form: QuoteForm) -> Result<SubmitOutcome, IntakeError> {
        // 1. バリデーション
        let request = QuoteRequest::parse(form).map_err(|errors| {
            log_business_event!(
                event.category = event::category::QUOTE,
                event.action = event::action::QUOTE_REJECTED,
                event.result = event::result::FAILURE,
                quote.errors = ?errors,
                "バリデーション違反のため拒否"
            );
            IntakeError::Validation(errors)
        })?;

        log_business_event!(
            event.category = event::category::QUOTE,
            event.action = event::action::QUOTE_RECEIVED,
            event.result = event::result::SUCCESS,
            quote.service = request.service.label(),
            "見積もり依頼を受信"
        );

        // 2. 事業者向けアラート（必須）
        self.send_business_alert(&request).await?;

        // 3. 顧客向け確認（ベストエフォート）
        let confirmation = self.send_customer_confirmation(&request).await;

        // 4. 永続化（ベストエフォート）
        let persistence = self.store_quote(&request).await;

        // 5. ダッシュボード通知（ベストエフォート）
        let fanout = match &self.supabase {
            Some(integration) => Some(
                integration
                    .dispatcher
                    .fanout(&integration.config.business_id, &request)
                    .await,
            ),
            None => None,
        };

        Ok(SubmitOutcome {
            message: SUCCESS_MESSAGE.to_string(),
            confirmation,
            persistence,
            fanout,
        })
    }

    /// 事業者向けアラートを送信する
    ///
    /// 唯一の必須副作用。失敗はパイプライン全体を中断する。
    async fn send_business_alert(&self, request: &QuoteRequest) -> Result<(), IntakeError> {
        let email = QuoteEmail::BusinessAlert {
            to: self.business_inbox.clone(),
        };

        let result = match self.renderer.render(&email, request) {
            Ok(message) => self.transport.send(&message).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::QUOTE,
                    event.action = event::action::ALERT_SENT,
                    event.result = event::result::SUCCESS,
                    "事業者向けアラートを送信"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::QUOTE,
                    event.action = event::action::ALERT_FAILED,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "事業者向けアラートの送信に失敗"
                );
                Err(IntakeError::MailDelivery {
                    fallback_phone: self.contact_phone.clone(),
                    detail:         e.to_string(),
                })
            }
        }
    }

    /// 顧客向け確認を送信する（ベストエフォート）
    async fn send_customer_confirmation(&self, request: &QuoteRequest) -> BestEffortOutcome {
        let email = QuoteEmail::CustomerConfirmation {
            to: request.email.clone(),
        };

        let result = match self.renderer.render(&email, request) {
            Ok(message) => self.transport.send(&message).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::QUOTE,
                    event.action = event::action::CONFIRMATION_SENT,
                    event.result = event::result::SUCCESS,
                    "顧客向け確認を送信"
                );
                BestEffortOutcome::Completed
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::QUOTE,
                    event.action = event::action::CONFIRMATION_FAILED,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "顧客向け確認の送信に失敗"
                );
                BestEffortOutcome::Failed(e.to_string())
            }
        }
    }

    /// 見積もり依頼を永続化する（ベストエフォート）
    async fn store_quote(&self, request: &QuoteRequest) -> BestEffortOutcome {
        let Some(integration) = &self.supabase else {
            return BestEffortOutcome::Skipped;
        };

        let row = NewQuoteRow::from_request(request, integration.config.business_id.clone());
        match integration.store.insert_quote(&row).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::PERSISTENCE,
                    event.action = event::action::QUOTE_STORED,
                    event.result = event::result::SUCCESS,
                    "見積もり依頼を保存"
                );
                BestEffortOutcome::Completed
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::PERSISTENCE,
                    event.action = event::action::QUOTE_STORE_FAILED,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "見積もり依頼の保存に失敗"
                );
                BestEffortOutcome::Failed(e.to_string())
            }
        }
    }
}
