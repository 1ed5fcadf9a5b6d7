//! # ビジネスイベントログの構造化ヘルパー
//!
//! `jq` で効率的に調査できるよう、ログフィールドの命名規約とヘルパーマクロを
//! 提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"`
//! マーカーが自動付与され、`jq 'select(.["event.kind"] == "business_event")'`
//! でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`email.kind`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const QUOTE: &str = "quote";
        pub const NOTIFICATION: &str = "notification";
        pub const PERSISTENCE: &str = "persistence";
    }

    /// イベントアクション
    pub mod action {
        // 見積もり依頼
        pub const QUOTE_RECEIVED: &str = "quote.received";
        pub const QUOTE_REJECTED: &str = "quote.rejected";
        pub const ALERT_SENT: &str = "quote.alert_sent";
        pub const ALERT_FAILED: &str = "quote.alert_failed";
        pub const CONFIRMATION_SENT: &str = "quote.confirmation_sent";
        pub const CONFIRMATION_FAILED: &str = "quote.confirmation_failed";

        // 永続化
        pub const QUOTE_STORED: &str = "persistence.quote_stored";
        pub const QUOTE_STORE_FAILED: &str = "persistence.quote_store_failed";

        // ダッシュボード通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
        pub const NOTIFICATION_SKIPPED: &str = "notification.skipped";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}
