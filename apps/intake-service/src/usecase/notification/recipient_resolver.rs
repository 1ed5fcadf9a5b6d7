//! # 通知先リゾルバ
//!
//! ダッシュボード通知の宛先を確定する。
//!
//! ## 解決ルール
//!
//! 1. 候補 = 事業者に紐づくユーザー + 管理者ロールのユーザー
//! 2. 候補から明示的にオプトアウトしたユーザーを除外する
//! 3. 設定行が存在しないユーザーはオプトイン扱い（除外しない）
//!
//! クエリ失敗は空集合に縮退する: 候補クエリの失敗は「通知先なし」、
//! オプトアウトクエリの失敗は「オプトアウトなし」として処理を続ける。

use std::sync::Arc;

use quoteflow_domain::user::{BusinessId, DashboardProfile};
use quoteflow_infra::supabase::DashboardDirectory;
use quoteflow_shared::{event_log::event, log_business_event};

/// 通知先リゾルバ
///
/// ディレクトリへの 2 つのクエリ（候補・オプトアウト）を統合し、
/// 通知すべきプロフィールの一覧を返す。エラーを返さない（縮退のみ）。
pub struct RecipientResolver {
    directory: Arc<dyn DashboardDirectory>,
}

impl RecipientResolver {
    pub fn new(directory: Arc<dyn DashboardDirectory>) -> Self {
        Self { directory }
    }

    /// 通知先プロフィールを解決する
    pub async fn resolve(&self, business_id: &BusinessId) -> Vec<DashboardProfile> {
        let candidates = match self.directory.notification_candidates(business_id).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "通知先候補の取得に失敗"
                );
                return Vec::new();
            }
        };
        if candidates.is_empty() {
            return Vec::new();
        }

        let candidate_ids: Vec<_> = candidates.iter().map(|p| p.id.clone()).collect();
        let opted_out = match self.directory.opted_out_user_ids(&candidate_ids).await {
            Ok(opted_out) => opted_out,
            Err(e) => {
                // オプトアウト不明なら全員に通知する（オプトイン既定に合わせる）
                tracing::warn!(error = %e, "オプトアウト設定の取得に失敗、全候補に通知");
                Vec::new()
            }
        };

        candidates
            .into_iter()
            .filter(|profile| !opted_out.contains(&profile.id))
            .collect()
    }
}
