//! # HTTP ハンドラ
//!
//! axum のルートハンドラと State 定義。
//! ハンドラは薄く保ち、処理はユースケース層に委譲する。

mod health;
mod quote;

pub use health::health_check;
pub use quote::{QuoteState, submit_quote};
