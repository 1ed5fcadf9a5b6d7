//! # QuoteFlow Intake Service
//!
//! 見積もり依頼フォームの受付サービス。
//!
//! ## 役割
//!
//! Web サイトのフォーム送信を受け付け、以下のパイプラインを実行する:
//!
//! 1. **バリデーション**: 必須項目の検証と HTML エスケープ
//! 2. **事業者向けアラート**: 事業者の受信箱へ全フィールドを送信（必須）
//! 3. **顧客向け確認**: 送信者への受付確認（ベストエフォート）
//! 4. **永続化**: Supabase の quotes テーブルへ保存（ベストエフォート）
//! 5. **ダッシュボード通知**: オプトイン済みユーザーへのファンアウト
//!    （ベストエフォート）
//!
//! ## レイヤー構成
//!
//! | モジュール | 役割 |
//! |-----------|------|
//! | [`handler`] | HTTP ハンドラ（薄く保つ） |
//! | [`usecase`] | パイプラインのオーケストレーション |
//! | [`config`] | 環境変数からの設定読み込み |
//! | [`error`] | エラー分類と HTTP レスポンス変換 |

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
