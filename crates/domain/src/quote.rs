//! # 見積もり依頼
//!
//! Web フォームから送信された見積もり依頼（consultation request）の
//! バリデーションと正規化を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 役割 |
//! |---|------------|------|
//! | [`QuoteForm`] | 生のフォーム入力 | フィールド名と値のマップ（未検証） |
//! | [`QuoteRequest`] | 見積もり依頼レコード | [`QuoteRequest::parse`] を通過した不変レコード |
//! | [`ServiceCode`] | サービス種別 | 固定の列挙 + 未知コードのフォールバック |
//!
//! ## 設計方針
//!
//! - **全ルール評価**: バリデーションは短絡せず、違反したルールすべての
//!   メッセージを順序付きで返す。送信者は 1 回ですべての問題を確認できる
//! - **HTML エスケープ**: 自由入力フィールドは検証時にエスケープし、
//!   生成されるメール本文へのマークアップ注入を無害化する
//! - **未知コードの通過**: サービス種別の未知コードは拒否せず
//!   そのままラベルとして使用する（graceful degradation）

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// メールアドレスの構文チェック
///
/// `local@domain.tld` 形式。RFC 完全準拠ではなく、許可文字を明示した
/// ホワイトリスト文法。メールアドレスはエスケープせずに本文へ埋め込む
/// ため、`< > " '` などのマークアップ文字はここで拒否する。
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&*+/=?^_`{|}~-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$")
        .expect("メールアドレス正規表現が不正")
});

/// ダッシュボード通知に載せる概要の最大文字数
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// 自由入力フィールドの HTML エスケープ
///
/// `& < > " '` をエンティティに置換する。テンプレートは autoescape を
/// 無効にしているため、エスケープはここで一度だけ行う。
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// サービス種別
///
/// フォームの `service` コードに対応する閉じた列挙。未知のコードは
/// [`ServiceCode::Unrecognized`] として保持し、ラベルにはコードを
/// そのまま使用する（拒否しない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCode {
    WalkInCloset,
    ReachInCloset,
    Pantry,
    Garage,
    MurphyBed,
    Laundry,
    Other,
    /// 固定の列挙にないコード。ラベルはコードの文字列そのまま
    Unrecognized(String),
}

impl ServiceCode {
    /// フォームのコード値から変換する（失敗しない）
    pub fn from_code(code: &str) -> Self {
        match code {
            "walk-in-closet" => Self::WalkInCloset,
            "reach-in-closet" => Self::ReachInCloset,
            "pantry" => Self::Pantry,
            "garage" => Self::Garage,
            "murphy-bed" => Self::MurphyBed,
            "laundry" => Self::Laundry,
            "other" => Self::Other,
            unknown => Self::Unrecognized(unknown.to_string()),
        }
    }

    /// メール本文に表示する人間可読ラベルを返す
    pub fn label(&self) -> &str {
        match self {
            Self::WalkInCloset => "Walk-In Closet Design",
            Self::ReachInCloset => "Reach-In Closet Design",
            Self::Pantry => "Pantry & Kitchen Organization",
            Self::Garage => "Garage Organization",
            Self::MurphyBed => "Home Office & Murphy Bed",
            Self::Laundry => "Laundry Room Solutions",
            Self::Other => "Other",
            Self::Unrecognized(code) => code,
        }
    }
}

/// 生のフォーム入力
///
/// POST される form-encoded フィールドに対応する。すべて未検証の
/// 文字列で、欠落フィールドは `None`。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteForm {
    pub first_name:     Option<String>,
    pub last_name:      Option<String>,
    pub email:          Option<String>,
    pub phone:          Option<String>,
    pub address:        Option<String>,
    pub service:        Option<String>,
    pub description:    Option<String>,
    pub preferred_date: Option<String>,
}

/// バリデーション済みの見積もり依頼レコード
///
/// [`QuoteRequest::parse`] のみが生成する。自由入力フィールドは
/// trim + HTML エスケープ済み。以後不変。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub first_name:     String,
    pub last_name:      String,
    /// 構文チェック済みのメールアドレス。文法がマークアップ文字を
    /// 許容しないためエスケープ不要
    pub email:          String,
    pub phone:          String,
    /// 任意項目。未入力なら空文字列
    pub address:        String,
    pub service:        ServiceCode,
    pub description:    String,
    /// 任意項目
    pub preferred_date: Option<String>,
}

impl QuoteRequest {
    /// フォーム入力を検証し、正規化済みレコードを生成する
    ///
    /// すべてのルールを評価し、違反したルールごとのメッセージを
    /// フィールド順で返す（短絡しない）。副作用なし。
    pub fn parse(form: QuoteForm) -> Result<Self, Vec<String>> {
        let first_name = clean(form.first_name);
        let last_name = clean(form.last_name);
        let email = form.email.as_deref().unwrap_or("").trim().to_string();
        let phone = clean(form.phone);
        let address = clean(form.address);
        let service = clean(form.service);
        let description = clean(form.description);
        let preferred_date = clean(form.preferred_date);

        let mut errors = Vec::new();
        if first_name.is_empty() {
            errors.push("First name is required".to_string());
        }
        if last_name.is_empty() {
            errors.push("Last name is required".to_string());
        }
        if email.is_empty() || !EMAIL_RE.is_match(&email) {
            errors.push("Valid email is required".to_string());
        }
        if phone.is_empty() {
            errors.push("Phone number is required".to_string());
        }
        if service.is_empty() {
            errors.push("Service type is required".to_string());
        }
        if description.is_empty() {
            errors.push("Description is required".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            first_name,
            last_name,
            email,
            phone,
            address,
            service: ServiceCode::from_code(&service),
            description,
            preferred_date: if preferred_date.is_empty() {
                None
            } else {
                Some(preferred_date)
            },
        })
    }

    /// 氏名（"First Last"）を返す
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 希望日。未指定なら表示用の既定値
    pub fn preferred_date_label(&self) -> &str {
        self.preferred_date.as_deref().unwrap_or("Not specified")
    }

    /// ダッシュボード通知用の説明文プレビューを返す
    ///
    /// `max_chars` 文字を超える場合は切り詰めて `...` を付加する。
    /// 以下の場合は原文のまま返す。
    pub fn description_preview(&self, max_chars: usize) -> String {
        if self.description.chars().count() > max_chars {
            let mut preview: String = self.description.chars().take(max_chars).collect();
            preview.push_str("...");
            preview
        } else {
            self.description.clone()
        }
    }
}

/// trim + HTML エスケープ（欠落は空文字列扱い）
fn clean(value: Option<String>) -> String {
    escape_html(value.as_deref().unwrap_or("").trim())
}
