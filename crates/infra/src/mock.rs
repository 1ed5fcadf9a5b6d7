//! # テスト用モック実装
//!
//! ユースケース層のテストで使用する、インフラ trait のインメモリ実装。
//! `test-utils` フィーチャーを有効にしたクレートから利用できる。
//!
//! ## 設計方針
//!
//! - **記録と注入**: 呼び出しを `Arc<Mutex<Vec<_>>>` に記録し、
//!   失敗はフラグで注入する
//! - **clone 共有**: モックを clone してもストレージは共有される。
//!   ハンドラに渡した後からテスト側で検証できる

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use quoteflow_domain::{
    notification::{EmailMessage, NotificationError},
    user::{BusinessId, DashboardProfile, UserId},
};

use crate::{
    error::InfraError,
    notification::MailTransport,
    supabase::{DashboardDirectory, NewQuoteRow, QuoteStore},
};

/// メール送信のモック
///
/// 送信されたメールを記録する。`fail_all` で全送信を失敗させるか、
/// `fail_recipient` で特定宛先のみ失敗させる。
#[derive(Debug, Clone, Default)]
pub struct MockMailTransport {
    sent:            Arc<Mutex<Vec<EmailMessage>>>,
    fail_all:        Arc<Mutex<bool>>,
    fail_recipients: Arc<Mutex<Vec<String>>>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての送信を失敗させる
    pub fn fail_all(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    /// 指定宛先への送信のみ失敗させる
    pub fn fail_recipient(&self, address: impl Into<String>) {
        self.fail_recipients.lock().unwrap().push(address.into());
    }

    /// 送信されたメールのスナップショットを返す
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 指定宛先に送信されたメールを返す
    pub fn sent_to(&self, address: &str) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|email| email.to == address)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if *self.fail_all.lock().unwrap()
            || self.fail_recipients.lock().unwrap().contains(&email.to)
        {
            return Err(NotificationError::SendFailed(format!(
                "モック送信失敗: {}",
                email.to
            )));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// 見積もり永続化のモック
#[derive(Debug, Clone, Default)]
pub struct MockQuoteStore {
    rows: Arc<Mutex<Vec<NewQuoteRow>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// insert を失敗させる
    pub fn fail(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// insert された行のスナップショットを返す
    pub fn rows(&self) -> Vec<NewQuoteRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteStore for MockQuoteStore {
    async fn insert_quote(&self, row: &NewQuoteRow) -> Result<(), InfraError> {
        if *self.fail.lock().unwrap() {
            return Err(InfraError::unexpected_status("quotes", 500));
        }

        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

/// ダッシュボードディレクトリのモック
///
/// 各クエリの結果を事前登録し、クエリ単位で失敗を注入する。
#[derive(Debug, Clone, Default)]
pub struct MockDashboardDirectory {
    profiles:        Arc<Mutex<Vec<DashboardProfile>>>,
    opted_out:       Arc<Mutex<Vec<UserId>>>,
    emails:          Arc<Mutex<HashMap<UserId, String>>>,
    fail_candidates: Arc<Mutex<bool>>,
    fail_opt_outs:   Arc<Mutex<bool>>,
    fail_emails:     Arc<Mutex<Vec<UserId>>>,
}

impl MockDashboardDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 通知対象候補のプロフィールを登録する（メールアドレス付き）
    pub fn add_user(&self, profile: DashboardProfile, email: impl Into<String>) {
        self.emails
            .lock()
            .unwrap()
            .insert(profile.id.clone(), email.into());
        self.profiles.lock().unwrap().push(profile);
    }

    /// メールアドレス未登録の候補プロフィールを登録する
    pub fn add_user_without_email(&self, profile: DashboardProfile) {
        self.profiles.lock().unwrap().push(profile);
    }

    /// オプトアウト行を登録する
    pub fn opt_out(&self, user_id: UserId) {
        self.opted_out.lock().unwrap().push(user_id);
    }

    /// 候補クエリを失敗させる
    pub fn fail_candidates(&self) {
        *self.fail_candidates.lock().unwrap() = true;
    }

    /// オプトアウトクエリを失敗させる
    pub fn fail_opt_outs(&self) {
        *self.fail_opt_outs.lock().unwrap() = true;
    }

    /// 指定ユーザーのメールアドレス取得を失敗させる
    pub fn fail_email(&self, user_id: UserId) {
        self.fail_emails.lock().unwrap().push(user_id);
    }
}

#[async_trait]
impl DashboardDirectory for MockDashboardDirectory {
    async fn notification_candidates(
        &self,
        _business_id: &BusinessId,
    ) -> Result<Vec<DashboardProfile>, InfraError> {
        if *self.fail_candidates.lock().unwrap() {
            return Err(InfraError::unexpected_status("profiles", 500));
        }

        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn opted_out_user_ids(&self, candidates: &[UserId]) -> Result<Vec<UserId>, InfraError> {
        if *self.fail_opt_outs.lock().unwrap() {
            return Err(InfraError::unexpected_status(
                "notification_preferences",
                500,
            ));
        }

        Ok(self
            .opted_out
            .lock()
            .unwrap()
            .iter()
            .filter(|id| candidates.contains(*id))
            .cloned()
            .collect())
    }

    async fn user_email(&self, user_id: &UserId) -> Result<Option<String>, InfraError> {
        if self.fail_emails.lock().unwrap().contains(user_id) {
            return Err(InfraError::unexpected_status("auth users", 500));
        }

        Ok(self.emails.lock().unwrap().get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quoteflow_domain::notification::MailAddress;

    use super::*;

    fn email(to: &str) -> EmailMessage {
        EmailMessage {
            from:      MailAddress::new("noreply@example.com", "QuoteFlow"),
            to:        to.to_string(),
            subject:   "件名".to_string(),
            html_body: "<p>本文</p>".to_string(),
            text_body: "本文".to_string(),
            reply_to:  None,
        }
    }

    #[tokio::test]
    async fn メール送信が記録される() {
        let transport = MockMailTransport::new();
        transport.send(&email("a@example.com")).await.unwrap();
        transport.send(&email("b@example.com")).await.unwrap();

        assert_eq!(transport.sent().len(), 2);
        assert_eq!(transport.sent_to("a@example.com").len(), 1);
    }

    #[tokio::test]
    async fn 特定宛先のみ失敗させられる() {
        let transport = MockMailTransport::new();
        transport.fail_recipient("bad@example.com");

        assert!(transport.send(&email("bad@example.com")).await.is_err());
        assert!(transport.send(&email("ok@example.com")).await.is_ok());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn オプトアウトは候補に含まれるidのみ返す() {
        let directory = MockDashboardDirectory::new();
        let in_candidates = UserId::new();
        let not_in_candidates = UserId::new();
        directory.opt_out(in_candidates.clone());
        directory.opt_out(not_in_candidates);

        let opted_out = directory
            .opted_out_user_ids(std::slice::from_ref(&in_candidates))
            .await
            .unwrap();
        assert_eq!(opted_out, vec![in_candidates]);
    }

    #[tokio::test]
    async fn cloneしてもストレージが共有される() {
        let store = MockQuoteStore::new();
        let shared = store.clone();

        let row = NewQuoteRow {
            business_id: BusinessId::new(),
            name:        "Jane Doe".to_string(),
            email:       "jane@x.com".to_string(),
            phone:       "4045551212".to_string(),
            service:     "Garage Organization".to_string(),
            budget:      String::new(),
            timeline:    "Not specified".to_string(),
            message:     "Need shelving".to_string(),
        };
        shared.insert_quote(&row).await.unwrap();

        assert_eq!(store.rows(), vec![row]);
    }
}
