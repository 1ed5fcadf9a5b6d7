//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで 3 種類のメールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **autoescape 無効**: フォーム値はバリデーション時に HTML エスケープ済みの
//!   ため、テンプレート側で再エスケープしない（二重エスケープ防止）
//! - **件名パターン**: 種別ごとに固定の英語フォーマット

use quoteflow_domain::{
    notification::{EmailMessage, MailAddress, NotificationError, QuoteEmail},
    quote::{DESCRIPTION_PREVIEW_CHARS, QuoteRequest},
};
use tera::{Context, Tera};

use crate::config::MailConfig;

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、[`QuoteEmail`] と
/// [`QuoteRequest`] から [`EmailMessage`] を生成する。
pub struct TemplateRenderer {
    engine: Tera,
    mail:   MailConfig,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new(mail: MailConfig) -> Result<Self, NotificationError> {
        let mut engine = Tera::default();
        // フォーム値は検証時にエスケープ済み
        engine.autoescape_on(vec![]);

        engine
            .add_raw_templates(vec![
                (
                    "business_alert.html",
                    include_str!("../../../templates/emails/business_alert.html"),
                ),
                (
                    "business_alert.txt",
                    include_str!("../../../templates/emails/business_alert.txt"),
                ),
                (
                    "customer_confirmation.html",
                    include_str!("../../../templates/emails/customer_confirmation.html"),
                ),
                (
                    "customer_confirmation.txt",
                    include_str!("../../../templates/emails/customer_confirmation.txt"),
                ),
                (
                    "dashboard_notification.html",
                    include_str!("../../../templates/emails/dashboard_notification.html"),
                ),
                (
                    "dashboard_notification.txt",
                    include_str!("../../../templates/emails/dashboard_notification.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine, mail })
    }

    /// メール種別とレコードからメールメッセージを生成する
    pub fn render(
        &self,
        email: &QuoteEmail,
        request: &QuoteRequest,
    ) -> Result<EmailMessage, NotificationError> {
        let template_name: &str = email.kind().into();
        let (subject, context) = self.build_template_params(email, request);

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let (from, reply_to) = self.addressing(email, request);

        Ok(EmailMessage {
            from,
            to: email.recipient_email().to_string(),
            subject,
            html_body,
            text_body,
            reply_to,
        })
    }

    /// 件名とテンプレートコンテキストを構築する
    fn build_template_params(&self, email: &QuoteEmail, request: &QuoteRequest) -> (String, Context) {
        let full_name = request.full_name();
        let service_label = request.service.label();

        let mut context = Context::new();
        context.insert("full_name", &full_name);
        context.insert("email", &request.email);
        context.insert("phone", &request.phone);
        context.insert("address", &request.address);
        context.insert("service_label", service_label);
        context.insert("preferred_date", request.preferred_date_label());
        context.insert("business_name", &self.mail.business_name);

        let subject = match email {
            QuoteEmail::BusinessAlert { .. } => {
                context.insert("description", &request.description);
                format!("New Consultation Request from {full_name} - {service_label}")
            }
            QuoteEmail::CustomerConfirmation { .. } => {
                context.insert("first_name", &request.first_name);
                context.insert("contact_phone", &self.mail.contact_phone);
                context.insert("contact_phone_href", &phone_href(&self.mail.contact_phone));
                format!(
                    "{} - We Received Your Consultation Request",
                    self.mail.business_name
                )
            }
            QuoteEmail::DashboardNotification { recipient_name, .. } => {
                context.insert("recipient_name", recipient_name);
                context.insert(
                    "description_preview",
                    &request.description_preview(DESCRIPTION_PREVIEW_CHARS),
                );
                context.insert("dashboard_name", &self.mail.dashboard_name);
                context.insert("dashboard_url", &self.mail.dashboard_url);
                format!("New Consultation Request — {full_name}")
            }
        };

        (subject, context)
    }

    /// 送信元と返信先を種別ごとに決める
    ///
    /// | 種別 | 送信元 | 返信先 |
    /// |------|--------|--------|
    /// | アラート | 事業者の送信元 | フォーム送信者 |
    /// | 確認 | 事業者の送信元 | 事業者の送信元 |
    /// | ダッシュボード通知 | ダッシュボード名義 | フォーム送信者 |
    fn addressing(
        &self,
        email: &QuoteEmail,
        request: &QuoteRequest,
    ) -> (MailAddress, Option<MailAddress>) {
        let business_from = MailAddress::new(&self.mail.from_address, &self.mail.from_name);
        let customer = MailAddress::new(&request.email, request.full_name());

        match email {
            QuoteEmail::BusinessAlert { .. } => (business_from, Some(customer)),
            QuoteEmail::CustomerConfirmation { .. } => {
                let reply_to = business_from.clone();
                (business_from, Some(reply_to))
            }
            QuoteEmail::DashboardNotification { .. } => {
                // 通知は SMTP 認証ユーザーからダッシュボード名義で送る
                let from = MailAddress::new(&self.mail.smtp_username, &self.mail.dashboard_name);
                (from, Some(customer))
            }
        }
    }
}

/// `tel:` リンク用に電話番号から数字と先頭の `+` だけを残す
fn phone_href(phone: &str) -> String {
    phone
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '+'))
        .map(|(_, c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quoteflow_domain::quote::QuoteForm;

    use super::*;

    fn make_config() -> MailConfig {
        MailConfig {
            backend:        "noop".to_string(),
            smtp_host:      "localhost".to_string(),
            smtp_port:      1025,
            smtp_username:  "dashboard@example.com".to_string(),
            smtp_password:  String::new(),
            from_address:   "noreply@dreamclosets.example.com".to_string(),
            from_name:      "Dream Closets".to_string(),
            business_inbox: "inbox@dreamclosets.example.com".to_string(),
            business_name:  "Dream Closets".to_string(),
            contact_phone:  "(770) 555-1234".to_string(),
            dashboard_name: "IPW Dashboard".to_string(),
            dashboard_url:  "https://example.com/dashboard/".to_string(),
        }
    }

    fn make_request() -> QuoteRequest {
        QuoteRequest::parse(QuoteForm {
            first_name:     Some("Jane".to_string()),
            last_name:      Some("Doe".to_string()),
            email:          Some("jane@x.com".to_string()),
            phone:          Some("4045551212".to_string()),
            address:        Some("12 Peachtree St".to_string()),
            service:        Some("walk-in-closet".to_string()),
            description:    Some("Need shelving & more".to_string()),
            preferred_date: None,
        })
        .unwrap()
    }

    #[test]
    fn newが正常に初期化される() {
        assert!(TemplateRenderer::new(make_config()).is_ok());
    }

    #[test]
    fn 事業者アラートのレンダリングが正しい() {
        let renderer = TemplateRenderer::new(make_config()).unwrap();
        let email = QuoteEmail::BusinessAlert {
            to: "inbox@dreamclosets.example.com".to_string(),
        };

        let message = renderer.render(&email, &make_request()).unwrap();

        assert_eq!(message.to, "inbox@dreamclosets.example.com");
        assert_eq!(
            message.subject,
            "New Consultation Request from Jane Doe - Walk-In Closet Design"
        );
        assert!(message.html_body.contains("Jane Doe"));
        assert!(message.html_body.contains("Walk-In Closet Design"));
        assert!(message.html_body.contains("Not specified"));
        assert!(message.text_body.contains("NEW CONSULTATION REQUEST"));
        // 返信先はフォーム送信者
        assert_eq!(message.reply_to.unwrap().address, "jane@x.com");
    }

    #[test]
    fn 顧客確認のレンダリングが正しい() {
        let renderer = TemplateRenderer::new(make_config()).unwrap();
        let email = QuoteEmail::CustomerConfirmation {
            to: "jane@x.com".to_string(),
        };

        let message = renderer.render(&email, &make_request()).unwrap();

        assert_eq!(message.to, "jane@x.com");
        assert_eq!(
            message.subject,
            "Dream Closets - We Received Your Consultation Request"
        );
        assert!(message.html_body.contains("Thank You, Jane!"));
        assert!(message.html_body.contains("tel:7705551234"));
        assert!(message.text_body.contains("(770) 555-1234"));
        assert_eq!(
            message.reply_to.unwrap().address,
            "noreply@dreamclosets.example.com"
        );
    }

    #[test]
    fn ダッシュボード通知のレンダリングが正しい() {
        let renderer = TemplateRenderer::new(make_config()).unwrap();
        let email = QuoteEmail::DashboardNotification {
            to:             "dana@example.com".to_string(),
            recipient_name: "Dana Whitfield".to_string(),
        };

        let message = renderer.render(&email, &make_request()).unwrap();

        assert_eq!(message.to, "dana@example.com");
        assert_eq!(message.subject, "New Consultation Request — Jane Doe");
        assert!(message.html_body.contains("Hi Dana Whitfield,"));
        assert!(message.html_body.contains("https://example.com/dashboard/"));
        assert!(message.text_body.contains("IPW DASHBOARD"));
        // 送信元はダッシュボード名義
        assert_eq!(message.from.name, "IPW Dashboard");
        assert_eq!(message.from.address, "dashboard@example.com");
    }

    #[test]
    fn ダッシュボード通知の説明文は200文字に切り詰められる() {
        let renderer = TemplateRenderer::new(make_config()).unwrap();
        let request = QuoteRequest::parse(QuoteForm {
            description: Some("x".repeat(300)),
            ..QuoteForm {
                first_name:     Some("Jane".to_string()),
                last_name:      Some("Doe".to_string()),
                email:          Some("jane@x.com".to_string()),
                phone:          Some("4045551212".to_string()),
                address:        None,
                service:        Some("other".to_string()),
                description:    None,
                preferred_date: None,
            }
        })
        .unwrap();
        let email = QuoteEmail::DashboardNotification {
            to:             "dana@example.com".to_string(),
            recipient_name: "Dana".to_string(),
        };

        let message = renderer.render(&email, &request).unwrap();

        let preview = format!("{}...", "x".repeat(200));
        assert!(message.html_body.contains(&preview));
        assert!(!message.html_body.contains(&"x".repeat(201)));
    }

    #[test]
    fn エスケープ済みの値は再エスケープされない() {
        let renderer = TemplateRenderer::new(make_config()).unwrap();
        let email = QuoteEmail::BusinessAlert {
            to: "inbox@dreamclosets.example.com".to_string(),
        };

        let message = renderer.render(&email, &make_request()).unwrap();

        // "Need shelving & more" は検証時に "&amp;" になっている
        assert!(message.html_body.contains("Need shelving &amp; more"));
        assert!(!message.html_body.contains("&amp;amp;"));
    }

    #[test]
    fn phone_hrefが数字のみを残す() {
        assert_eq!(phone_href("(770) 555-1234"), "7705551234");
        assert_eq!(phone_href("+1 770 555 1234"), "+17705551234");
    }
}
