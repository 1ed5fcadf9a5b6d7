//! Supabase quotes テーブルへの永続化クライアント

use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};

use super::{NewQuoteRow, QuoteStore, REQUEST_TIMEOUT};
use crate::error::InfraError;

/// Supabase REST API への quotes insert クライアント
///
/// `POST /rest/v1/quotes` に service role キーで insert する。
/// `Prefer: return=minimal` を指定し、レスポンスボディは読まない。
pub struct SupabaseQuoteStore {
    client:   Client,
    base_url: String,
}

impl SupabaseQuoteStore {
    /// クライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: Supabase プロジェクト URL（例: `https://xyz.supabase.co`）
    /// - `service_role_key`: service role キー（RLS をバイパスする）
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
}

/// apikey / Authorization ヘッダを構築する
pub(crate) fn auth_headers(service_role_key: &str) -> Result<HeaderMap, InfraError> {
    let mut headers = HeaderMap::new();

    let mut api_key = HeaderValue::from_str(service_role_key)
        .map_err(|e| InfraError::unexpected(format!("service role キーが不正: {e}")))?;
    api_key.set_sensitive(true);

    let mut bearer = HeaderValue::from_str(&format!("Bearer {service_role_key}"))
        .map_err(|e| InfraError::unexpected(format!("service role キーが不正: {e}")))?;
    bearer.set_sensitive(true);

    headers.insert("apikey", api_key);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

#[async_trait::async_trait]
impl QuoteStore for SupabaseQuoteStore {
    async fn insert_quote(&self, row: &NewQuoteRow) -> Result<(), InfraError> {
        let response = self
            .client
            .post(format!("{}/rest/v1/quotes", self.base_url))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        // insert 成功は 201 のみ。それ以外はステータスごと報告する
        if response.status().as_u16() != 201 {
            return Err(InfraError::unexpected_status(
                "quotes",
                response.status().as_u16(),
            ));
        }

        Ok(())
    }
}
