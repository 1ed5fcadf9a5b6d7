//! SMTP メール送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 本番では認証付き STARTTLS リレー、開発環境では Mailpit
//! （ローカル SMTP サーバー）に接続する。

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use quoteflow_domain::notification::{EmailMessage, MailAddress, NotificationError};

use super::MailTransport;

/// SMTP 送信のタイムアウト
///
/// 低速なリレーがレスポンスを無期限に遅延させないための上限。
const SMTP_TIMEOUT: Duration = Duration::from_secs(5);

/// SMTP メール送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    /// 認証付き STARTTLS リレーへの送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP リレーのホスト名（例: "smtp.gmail.com"）
    /// - `port`: ポート番号（例: 587）
    /// - `username` / `password`: リレーの認証情報
    pub fn starttls_relay(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotificationError::SendFailed(format!("SMTP リレー構築失敗: {e}")))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport })
    }

    /// 認証・TLS なしのローカル SMTP への送信インスタンスを作成
    ///
    /// Mailpit 等のローカル SMTP サーバー向け。
    pub fn insecure_local(host: &str, port: u16) -> Self {
        // builder_dangerous: TLS なしで接続（ローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Self { transport }
    }
}

/// `MailAddress` を lettre の `Mailbox` に変換する
fn mailbox(address: &MailAddress) -> Result<Mailbox, NotificationError> {
    format!("{} <{}>", address.name, address.address)
        .parse()
        .map_err(|e| {
            NotificationError::SendFailed(format!("アドレス不正 {}: {e}", address.address))
        })
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let mut builder = Message::builder()
            .from(mailbox(&email.from)?)
            .to(email
                .to
                .parse()
                .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?)
            .subject(&email.subject);

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(mailbox(reply_to)?);
        }

        let message = builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailTransport>();
    }

    #[test]
    fn mailboxが表示名付きアドレスに変換される() {
        let address = MailAddress::new("jane@x.com", "Jane Doe");
        let mb = mailbox(&address).unwrap();
        assert_eq!(mb.email.to_string(), "jane@x.com");
        assert_eq!(mb.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn mailboxが不正なアドレスでエラーを返す() {
        let address = MailAddress::new("not an address", "Jane");
        assert!(mailbox(&address).is_err());
    }
}
