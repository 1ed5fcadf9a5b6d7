//! Supabase のダッシュボードユーザーディレクトリクライアント
//!
//! 通知先の解決に使う 3 つの読み取りクエリを実装する:
//!
//! 1. profiles テーブルから通知対象候補を取得
//! 2. notification_preferences テーブルからオプトアウト行を取得
//! 3. Auth Admin API から認証メールアドレスを取得

use quoteflow_domain::user::{BusinessId, DashboardProfile, UserId};
use reqwest::Client;
use serde::Deserialize;

use super::{DashboardDirectory, REQUEST_TIMEOUT, quote_store::auth_headers};
use crate::error::InfraError;

/// Supabase REST / Auth Admin API へのディレクトリクライアント
pub struct SupabaseDirectory {
    client:   Client,
    base_url: String,
}

/// notification_preferences のオプトアウト行
#[derive(Debug, Deserialize)]
struct OptOutRow {
    user_id: UserId,
}

/// Auth Admin API のユーザーレスポンス（必要なフィールドのみ）
#[derive(Debug, Deserialize)]
struct AuthUser {
    email: Option<String>,
}

impl SupabaseDirectory {
    /// クライアントを作成する
    ///
    /// 引数は [`super::SupabaseQuoteStore::new`] と同じ。
    pub fn new(base_url: &str, service_role_key: &str) -> Result<Self, InfraError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(auth_headers(service_role_key)?)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET して 200 以外をエラーにする
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        url: String,
    ) -> Result<T, InfraError> {
        let response = self.client.get(url).send().await?;

        if response.status().as_u16() != 200 {
            return Err(InfraError::unexpected_status(
                resource,
                response.status().as_u16(),
            ));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl DashboardDirectory for SupabaseDirectory {
    async fn notification_candidates(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<DashboardProfile>, InfraError> {
        // 事業者に紐づくユーザー、または管理者ロール
        let filter = format!("(business_id.eq.{business_id},role.eq.admin)");
        let url = format!(
            "{}/rest/v1/profiles?select=id,full_name&or={}",
            self.base_url,
            urlencoding::encode(&filter)
        );

        self.get_json("profiles", url).await
    }

    async fn opted_out_user_ids(&self, candidates: &[UserId]) -> Result<Vec<UserId>, InfraError> {
        // in.() は空リストを受け付けないため、候補なしはクエリ不要
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ids = candidates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let filter = format!("in.({ids})");
        let url = format!(
            "{}/rest/v1/notification_preferences?select=user_id&notify_new_quote=eq.false&user_id={}",
            self.base_url,
            urlencoding::encode(&filter)
        );

        let rows: Vec<OptOutRow> = self.get_json("notification_preferences", url).await?;
        Ok(rows.into_iter().map(|row| row.user_id).collect())
    }

    async fn user_email(&self, user_id: &UserId) -> Result<Option<String>, InfraError> {
        let url = format!("{}/auth/v1/admin/users/{user_id}", self.base_url);

        let user: AuthUser = self.get_json("auth users", url).await?;
        Ok(user.email.filter(|email| !email.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn profilesレスポンスがプロフィールにデシリアライズされる() {
        let json = r#"[
            {"id": "018f3b2a-7c4d-7e21-9a30-111111111111", "full_name": "Dana Whitfield"},
            {"id": "018f3b2a-7c4d-7e21-9a30-222222222222", "full_name": null}
        ]"#;
        let profiles: Vec<DashboardProfile> = serde_json::from_str(json).unwrap();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].full_name.as_deref(), Some("Dana Whitfield"));
        assert_eq!(profiles[1].full_name, None);
    }

    #[test]
    fn オプトアウト行がuser_idにデシリアライズされる() {
        let json = r#"[{"user_id": "018f3b2a-7c4d-7e21-9a30-111111111111"}]"#;
        let rows: Vec<OptOutRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].user_id.to_string(), "018f3b2a-7c4d-7e21-9a30-111111111111");
    }

    #[test]
    fn authユーザーの未知フィールドは無視される() {
        let json = r#"{"id": "x", "email": "dana@example.com", "role": "authenticated"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.email.as_deref(), Some("dana@example.com"));
    }
}
