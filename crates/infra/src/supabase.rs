//! # Supabase REST クライアント
//!
//! Supabase の PostgREST / Auth Admin API への HTTP クライアントを提供する。
//!
//! ## 提供する能力
//!
//! | trait | 役割 | エンドポイント |
//! |-------|------|--------------|
//! | [`QuoteStore`] | 見積もり依頼の永続化 | `POST /rest/v1/quotes` |
//! | [`DashboardDirectory`] | 通知先ユーザーの解決 | `GET /rest/v1/profiles` ほか |
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: ユースケース層はモックでテストできる
//! - **ベストエフォート前提**: ここでのエラーはすべて呼び出し側で
//!   ログに残して握りつぶされる。このモジュールはエラーを正確に
//!   報告することだけに責任を持つ
//! - **リトライなし**: 各呼び出しは 1 回のみ試行する

mod directory;
mod quote_store;

use async_trait::async_trait;
pub use directory::SupabaseDirectory;
use quoteflow_domain::{
    quote::QuoteRequest,
    user::{BusinessId, DashboardProfile, UserId},
};
pub use quote_store::SupabaseQuoteStore;
use serde::Serialize;

use crate::error::InfraError;

/// HTTP リクエストのタイムアウト
///
/// ベストエフォートの外部依存がレスポンス全体を遅延させないための上限。
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// quotes テーブルへの insert 行
///
/// カラム名は既存テーブルのスキーマに従う。`budget` / `timeline` は
/// レガシーカラムで、それぞれ住所と希望日を格納する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuoteRow {
    pub business_id: BusinessId,
    pub name:        String,
    pub email:       String,
    pub phone:       String,
    /// サービス種別の表示ラベル（コードではない）
    pub service:     String,
    /// 住所（レガシーカラム）
    pub budget:      String,
    /// 希望日（レガシーカラム）。未指定なら "Not specified"
    pub timeline:    String,
    pub message:     String,
}

impl NewQuoteRow {
    /// バリデーション済みレコードから insert 行を構築する
    pub fn from_request(request: &QuoteRequest, business_id: BusinessId) -> Self {
        Self {
            business_id,
            name: request.full_name(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            service: request.service.label().to_string(),
            budget: request.address.clone(),
            timeline: request.preferred_date_label().to_string(),
            message: request.description.clone(),
        }
    }
}

/// 見積もり依頼の永続化
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// 見積もり依頼を 1 行 insert する
    async fn insert_quote(&self, row: &NewQuoteRow) -> Result<(), InfraError>;
}

/// ダッシュボードユーザーのディレクトリ
///
/// 通知先の解決に必要な 3 つの読み取りクエリを提供する。
#[async_trait]
pub trait DashboardDirectory: Send + Sync {
    /// 通知対象候補を取得する
    ///
    /// 事業者に紐づくユーザー、または管理者ロールのユーザー。
    async fn notification_candidates(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<DashboardProfile>, InfraError>;

    /// 候補のうち新着通知をオプトアウトしているユーザー ID を取得する
    ///
    /// 設定行が存在しないユーザーはオプトイン扱い（結果に含まれない）。
    async fn opted_out_user_ids(&self, candidates: &[UserId]) -> Result<Vec<UserId>, InfraError>;

    /// ユーザーの認証メールアドレスを取得する
    ///
    /// アドレス未登録の場合は `None`。
    async fn user_email(&self, user_id: &UserId) -> Result<Option<String>, InfraError>;
}
