//! 見積もり受付 API の統合テスト
//!
//! モックのインフラ実装でルーター全体を oneshot 実行し、
//! ステータス・レスポンス形状・CORS の動作を検証する。

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use quoteflow_domain::user::{BusinessId, DashboardProfile, UserId};
use quoteflow_infra::mock::{MockDashboardDirectory, MockMailTransport, MockQuoteStore};
use quoteflow_intake_service::{
    app_builder::build_app,
    config::{IntakeConfig, MailConfig, SupabaseConfig},
    usecase::{NotificationDispatcher, QuoteIntakeUseCase, SupabaseIntegration, TemplateRenderer},
};
use tower::ServiceExt;

const BUSINESS_INBOX: &str = "inbox@dreamclosets.example.com";
const ALLOWED_ORIGIN: &str = "https://dreamclosets.example.com";

fn make_mail_config() -> MailConfig {
    MailConfig {
        backend:        "noop".to_string(),
        smtp_host:      "localhost".to_string(),
        smtp_port:      1025,
        smtp_username:  "dashboard@example.com".to_string(),
        smtp_password:  String::new(),
        from_address:   "noreply@dreamclosets.example.com".to_string(),
        from_name:      "Dream Closets".to_string(),
        business_inbox: BUSINESS_INBOX.to_string(),
        business_name:  "Dream Closets".to_string(),
        contact_phone:  "(770) 555-1234".to_string(),
        dashboard_name: "IPW Dashboard".to_string(),
        dashboard_url:  "https://example.com/dashboard/".to_string(),
    }
}

struct TestApp {
    app:       Router,
    transport: MockMailTransport,
    store:     MockQuoteStore,
}

fn make_app(transport: MockMailTransport, directory: MockDashboardDirectory) -> TestApp {
    let mail = make_mail_config();
    let store = MockQuoteStore::new();
    let renderer = Arc::new(TemplateRenderer::new(mail.clone()).unwrap());
    let transport_arc: Arc<dyn quoteflow_infra::notification::MailTransport> =
        Arc::new(transport.clone());

    let supabase_config = SupabaseConfig {
        url:              "https://xyz.supabase.co".to_string(),
        service_role_key: "key".to_string(),
        business_id:      BusinessId::new(),
    };
    let dispatcher = NotificationDispatcher::new(
        Arc::new(directory),
        transport_arc.clone(),
        renderer.clone(),
        BUSINESS_INBOX.to_string(),
    );
    let integration = SupabaseIntegration {
        config:     supabase_config.clone(),
        store:      Arc::new(store.clone()),
        dispatcher,
    };

    let usecase = QuoteIntakeUseCase::new(
        transport_arc,
        renderer,
        Some(integration),
        BUSINESS_INBOX.to_string(),
        mail.contact_phone.clone(),
    );

    let config = IntakeConfig {
        host:            "127.0.0.1".to_string(),
        port:            0,
        allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        mail,
        supabase:        Some(supabase_config),
    };

    TestApp {
        app: build_app(&config, usecase),
        transport,
        store,
    }
}

fn valid_body() -> String {
    "firstName=Jane&lastName=Doe&email=jane%40x.com&phone=4045551212\
     &address=12+Peachtree+St&service=walk-in-closet&description=Need+shelving\
     &preferredDate=2026-09-01"
        .to_string()
}

fn post_quote(body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/quote")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn 有効なフォームは200で成功メッセージを返す() {
    let directory = MockDashboardDirectory::new();
    directory.add_user(
        DashboardProfile {
            id:        UserId::new(),
            full_name: Some("Dana".to_string()),
        },
        "dana@example.com",
    );
    let test = make_app(MockMailTransport::new(), directory);

    let response = test.app.oneshot(post_quote(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(
        json["message"],
        "Thank you! Your consultation request has been sent. \
         We will contact you within 24 hours. A confirmation has been sent to your email."
    );
    assert!(json.get("error").is_none());

    // アラート + 確認 + ダッシュボード通知
    assert_eq!(test.transport.sent().len(), 3);
    assert_eq!(test.store.rows().len(), 1);
}

#[tokio::test]
async fn 空のフォームは400で全メッセージを連結して返す() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());

    let response = test.app.oneshot(post_quote(String::new())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(
        json["message"],
        "First name is required, Last name is required, Valid email is required, \
         Phone number is required, Service type is required, Description is required"
    );
    assert!(test.transport.sent().is_empty());
}

#[tokio::test]
async fn マークアップを含むメールアドレスは400で拒否されメールを組み立てない() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());

    let body = valid_body().replace(
        "email=jane%40x.com",
        "email=a%3Cimg%2Fsrc%3Dx%2Fonerror%3Dalert(1)%40b.co",
    );
    let response = test.app.oneshot(post_quote(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Valid email is required");
    assert!(test.transport.sent().is_empty());
}

#[tokio::test]
async fn アラート送信失敗は500で電話番号を案内する() {
    let transport = MockMailTransport::new();
    transport.fail_recipient(BUSINESS_INBOX);
    let test = make_app(transport, MockDashboardDirectory::new());

    let response = test.app.oneshot(post_quote(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(
        json["message"],
        "Failed to send email. Please call us directly at (770) 555-1234."
    );
    assert!(json["error"].is_string());
    assert!(test.store.rows().is_empty());
}

#[tokio::test]
async fn 永続化の失敗でもレスポンスは成功する() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());
    test.store.fail();

    let response = test.app.oneshot(post_quote(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn getメソッドは405を返す() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/quote")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn 許可オリジンにはcorsヘッダーを返す() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());

    let response = test.app.oneshot(post_quote(valid_body())).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn 未許可オリジンにはcorsヘッダーを返さない() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());

    let mut request = post_quote(valid_body());
    request
        .headers_mut()
        .insert(header::ORIGIN, "https://evil.example.com".parse().unwrap());
    let response = test.app.oneshot(request).await.unwrap();

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn preflightは許可メソッドを返す() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/quote")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .is_some()
    );
}

#[tokio::test]
async fn healthエンドポイントが稼働状態を返す() {
    let test = make_app(MockMailTransport::new(), MockDashboardDirectory::new());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}
