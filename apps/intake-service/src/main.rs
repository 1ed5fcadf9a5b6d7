//! # Intake Service サーバー
//!
//! 見積もり依頼フォームの受付サービスのエントリーポイント。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `INTAKE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `INTAKE_PORT` | **Yes** | ポート番号 |
//! | `ALLOWED_ORIGINS` | No | CORS 許可オリジン（カンマ区切り） |
//! | `MAIL_BACKEND` | No | `smtp` / `smtp-local` / `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP 接続先 |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | SMTP 認証情報（backend=smtp） |
//! | `MAIL_FROM_ADDRESS` / `MAIL_FROM_NAME` | No | 送信元 |
//! | `BUSINESS_INBOX` | **Yes** | アラートの宛先 |
//! | `BUSINESS_NAME` | **Yes** | 事業者名 |
//! | `CONTACT_PHONE` | **Yes** | 問い合わせ電話番号 |
//! | `DASHBOARD_NAME` / `DASHBOARD_URL` | No | ダッシュボード通知の表示 |
//! | `SUPABASE_URL` / `SUPABASE_SERVICE_ROLE_KEY` / `SUPABASE_BUSINESS_ID` | No | 揃っている場合のみ永続化・通知が有効 |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p quoteflow-intake-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use quoteflow_infra::{
    notification::{MailTransport, NoopMailTransport, SmtpMailTransport},
    supabase::{SupabaseDirectory, SupabaseQuoteStore},
};
use quoteflow_intake_service::{
    app_builder::build_app,
    config::{IntakeConfig, MailConfig},
    usecase::{NotificationDispatcher, QuoteIntakeUseCase, SupabaseIntegration, TemplateRenderer},
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Intake Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quoteflow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 設定読み込み
    let config = IntakeConfig::from_env();

    tracing::info!(
        "Intake Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // メール送信バックエンドを初期化
    let transport = build_transport(&config.mail)?;
    let renderer = Arc::new(
        TemplateRenderer::new(config.mail.clone())
            .expect("メールテンプレートの初期化に失敗しました"),
    );

    // Supabase 連携（接続情報が揃っている場合のみ）
    let supabase = match &config.supabase {
        Some(supabase_config) => {
            let store = SupabaseQuoteStore::new(&supabase_config.url, &supabase_config.service_role_key)?;
            let directory =
                SupabaseDirectory::new(&supabase_config.url, &supabase_config.service_role_key)?;
            let dispatcher = NotificationDispatcher::new(
                Arc::new(directory),
                transport.clone(),
                renderer.clone(),
                config.mail.business_inbox.clone(),
            );
            tracing::info!("Supabase 連携を有効化しました");
            Some(SupabaseIntegration {
                config: supabase_config.clone(),
                store: Arc::new(store),
                dispatcher,
            })
        }
        None => {
            tracing::warn!("Supabase 未設定のため永続化とダッシュボード通知は無効です");
            None
        }
    };

    let usecase = QuoteIntakeUseCase::new(
        transport,
        renderer,
        supabase,
        config.mail.business_inbox.clone(),
        config.mail.contact_phone.clone(),
    );

    // ルーター構築
    let app = build_app(&config, usecase);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Intake Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `MAIL_BACKEND` に応じた送信バックエンドを構築する
fn build_transport(mail: &MailConfig) -> anyhow::Result<Arc<dyn MailTransport>> {
    let transport: Arc<dyn MailTransport> = match mail.backend.as_str() {
        "smtp" => Arc::new(SmtpMailTransport::starttls_relay(
            &mail.smtp_host,
            mail.smtp_port,
            &mail.smtp_username,
            &mail.smtp_password,
        )?),
        "smtp-local" => Arc::new(SmtpMailTransport::insecure_local(
            &mail.smtp_host,
            mail.smtp_port,
        )),
        _ => {
            tracing::warn!("MAIL_BACKEND=noop のためメールは送信されません");
            Arc::new(NoopMailTransport)
        }
    };

    Ok(transport)
}
