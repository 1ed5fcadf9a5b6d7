//! # QuoteFlow ドメイン層
//!
//! 見積もり依頼（consultation request）パイプラインのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **バリデーション済みレコード**: [`quote::QuoteRequest`] は
//!   [`quote::QuoteRequest::parse`] を通過した不変レコードのみを表す
//! - **閉じた列挙型 + フォールバック**: サービス種別は
//!   [`quote::ServiceCode`] で表現し、未知のコードは失敗させず
//!   そのまま保持する（graceful degradation）
//! - **純粋性**: このクレートは I/O を一切行わない。メール送信・永続化は
//!   インフラ層のトレイト越しに行われる
//!
//! ## 依存関係の方向
//!
//! ```text
//! intake-service → infra → domain
//! ```

#[macro_use]
mod macros;

pub mod notification;
pub mod quote;
pub mod user;
