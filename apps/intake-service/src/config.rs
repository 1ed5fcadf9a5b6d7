//! # Intake Service 設定
//!
//! 環境変数から受付サービスの設定を読み込む。
//!
//! ## 設計方針
//!
//! - **設定値のサニタイズ**: ホスティング環境のファイルエディタが不可視文字を
//!   混入させることがあるため、印字可能 ASCII（0x20–0x7E）以外を除去する
//! - **永続化はオプション**: Supabase の接続情報が揃っていない場合、
//!   永続化とダッシュボード通知は無効（スキップ）になる

use std::env;

use quoteflow_domain::user::BusinessId;
use uuid::Uuid;

/// 受付サービスの設定
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// バインドアドレス
    pub host:            String,
    /// ポート番号
    pub port:            u16,
    /// CORS の許可オリジン（カンマ区切りで指定）
    pub allowed_origins: Vec<String>,
    /// メール設定
    pub mail:            MailConfig,
    /// Supabase 設定（未設定なら永続化・ダッシュボード通知は無効）
    pub supabase:        Option<SupabaseConfig>,
}

/// メール送信と本文生成の設定
///
/// `MAIL_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: 認証付き STARTTLS リレー経由で送信（本番）
/// - `smtp-local`: Mailpit 等のローカル SMTP に送信（開発）
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// 送信バックエンド（"smtp" | "smtp-local" | "noop"）
    pub backend:        String,
    /// SMTP ホスト
    pub smtp_host:      String,
    /// SMTP ポート
    pub smtp_port:      u16,
    /// SMTP 認証ユーザー（backend=smtp の場合に使用）
    pub smtp_username:  String,
    /// SMTP 認証パスワード（backend=smtp の場合に使用）
    pub smtp_password:  String,
    /// 送信元メールアドレス
    pub from_address:   String,
    /// 送信元表示名
    pub from_name:      String,
    /// 事業者の受信箱（アラートの宛先）
    pub business_inbox: String,
    /// 事業者名（メール本文に表示）
    pub business_name:  String,
    /// 問い合わせ電話番号（確認メールと送信失敗メッセージに表示）
    pub contact_phone:  String,
    /// ダッシュボードの製品名（通知メールの送信者名に使用）
    pub dashboard_name: String,
    /// ダッシュボードの URL（通知メールのリンク先）
    pub dashboard_url:  String,
}

/// Supabase 接続設定
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// プロジェクト URL（例: `https://xyz.supabase.co`）
    pub url:              String,
    /// service role キー
    pub service_role_key: String,
    /// 見積もり依頼を紐づける事業者 ID
    pub business_id:      BusinessId,
}

impl IntakeConfig {
    /// 環境変数から設定を読み込む
    ///
    /// 必須変数の欠落・不正は panic する（起動時にのみ呼ばれる）。
    pub fn from_env() -> Self {
        Self {
            host:            sanitize(&env::var("INTAKE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string())),
            port:            env::var("INTAKE_PORT")
                .expect("INTAKE_PORT が設定されていません")
                .parse()
                .expect("INTAKE_PORT は有効なポート番号である必要があります"),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|origin| sanitize(origin.trim()))
                .filter(|origin| !origin.is_empty())
                .collect(),
            mail:            MailConfig::from_env(),
            supabase:        SupabaseConfig::from_env(),
        }
    }
}

impl MailConfig {
    /// 環境変数からメール設定を読み込む
    fn from_env() -> Self {
        Self {
            backend:        sanitize(&env::var("MAIL_BACKEND").unwrap_or_else(|_| "noop".to_string())),
            smtp_host:      sanitize(&env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string())),
            smtp_port:      env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .expect("SMTP_PORT は有効なポート番号である必要があります"),
            smtp_username:  sanitize(&env::var("SMTP_USERNAME").unwrap_or_default()),
            smtp_password:  sanitize(&env::var("SMTP_PASSWORD").unwrap_or_default()),
            from_address:   sanitize(
                &env::var("MAIL_FROM_ADDRESS")
                    .unwrap_or_else(|_| "noreply@quoteflow.example.com".to_string()),
            ),
            from_name:      sanitize(
                &env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "QuoteFlow".to_string()),
            ),
            business_inbox: sanitize(
                &env::var("BUSINESS_INBOX").expect("BUSINESS_INBOX が設定されていません"),
            ),
            business_name:  sanitize(
                &env::var("BUSINESS_NAME").expect("BUSINESS_NAME が設定されていません"),
            ),
            contact_phone:  sanitize(
                &env::var("CONTACT_PHONE").expect("CONTACT_PHONE が設定されていません"),
            ),
            dashboard_name: sanitize(
                &env::var("DASHBOARD_NAME").unwrap_or_else(|_| "IPW Dashboard".to_string()),
            ),
            dashboard_url:  sanitize(
                &env::var("DASHBOARD_URL")
                    .unwrap_or_else(|_| "http://localhost:5173/dashboard/".to_string()),
            ),
        }
    }
}

impl SupabaseConfig {
    /// 環境変数から Supabase 設定を読み込む
    ///
    /// 3 つの変数がすべて揃っている場合のみ `Some` を返す。
    fn from_env() -> Option<Self> {
        let url = sanitize(&env::var("SUPABASE_URL").ok()?);
        let service_role_key = sanitize(&env::var("SUPABASE_SERVICE_ROLE_KEY").ok()?);
        let business_id = env::var("SUPABASE_BUSINESS_ID").ok()?;

        let business_id: Uuid = sanitize(&business_id)
            .parse()
            .expect("SUPABASE_BUSINESS_ID は有効な UUID である必要があります");

        Some(Self {
            url,
            service_role_key,
            business_id: BusinessId::from_uuid(business_id),
        })
    }
}

/// 印字可能 ASCII（0x20–0x7E）以外の文字を除去する
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| ('\x20'..='\x7e').contains(c))
        .collect()
}
