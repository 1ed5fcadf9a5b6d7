//! # ダッシュボードユーザー
//!
//! 通知先の解決に使用する読み取り専用の識別子・プロフィールを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 役割 |
//! |---|------------|------|
//! | [`UserId`] | ダッシュボードユーザー ID | 外部ディレクトリ（profiles / auth）のキー |
//! | [`BusinessId`] | 事業者 ID | 通知対象ユーザーのクエリフィルタ |
//! | [`DashboardProfile`] | プロフィール | 通知メールの宛名解決に使用 |
//!
//! ## 設計方針
//!
//! - **読み取り専用**: これらはすべて外部ストアのクエリ結果であり、
//!   本パイプラインが書き換えることはない
//! - **リクエスト単位の寿命**: キャッシュせず、1 リクエスト内で消費して破棄する

use serde::{Deserialize, Serialize};

define_uuid_id! {
    /// ダッシュボードユーザー ID
    ///
    /// 外部ディレクトリ（profiles テーブル / Auth Admin API）のキー。
    pub struct UserId;
}

define_uuid_id! {
    /// 事業者 ID
    ///
    /// profiles クエリの `business_id` フィルタにのみ使用し、レコードには保持しない。
    pub struct BusinessId;
}

/// ダッシュボードユーザーのプロフィール
///
/// 通知対象候補のクエリ結果。`full_name` は外部ストア上で NULL の場合がある。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardProfile {
    pub id:        UserId,
    pub full_name: Option<String>,
}

impl DashboardProfile {
    /// メールの宛名に使う表示名を返す
    ///
    /// 氏名が未登録の場合は汎用の呼びかけにフォールバックする。
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "there",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_nameが登録済みの氏名を返す() {
        let profile = DashboardProfile {
            id:        UserId::new(),
            full_name: Some("Dana Whitfield".to_string()),
        };
        assert_eq!(profile.display_name(), "Dana Whitfield");
    }

    #[test]
    fn display_nameが未登録ならフォールバックする() {
        let profile = DashboardProfile {
            id:        UserId::new(),
            full_name: None,
        };
        assert_eq!(profile.display_name(), "there");
    }

    #[test]
    fn display_nameが空文字列でもフォールバックする() {
        let profile = DashboardProfile {
            id:        UserId::new(),
            full_name: Some(String::new()),
        };
        assert_eq!(profile.display_name(), "there");
    }

    #[test]
    fn user_idのfrom_uuidで往復できる() {
        let id = UserId::new();
        assert_eq!(UserId::from_uuid(*id.as_uuid()), id);
    }
}
