//! # Core Service ライブラリ
//!
//! Q&A フォーラムのアカウント・ロール申請・パスワードリセット・
//! モデレーションを扱うユースケースとハンドラを公開する。
//! テスト用に内部モジュールへのアクセスを提供する。

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;

// テストユーティリティ（内部実装、ドキュメントからは隠す）
#[doc(hidden)]
pub mod test_utils;
