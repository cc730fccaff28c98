//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! 入力文字列の検証失敗は [`crate::validator`] の専用エラー型で表現し、
//! ここではエンティティの生成・状態遷移で発生するエラーのみを扱う。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `Conflict` | 409 Conflict | 終端状態からの不正な遷移 |
//!
//! ## 使用例
//!
//! ```rust
//! use campusqa_domain::DomainError;
//!
//! fn require_reason(reason: &str) -> Result<(), DomainError> {
//!     if reason.is_empty() {
//!         return Err(DomainError::Validation("reason is required".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_reason("").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// サービス層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
   /// バリデーションエラー
   ///
   /// - 必須フィールドが未入力
   /// - 文字数制限の超過
   /// - 永続化レコードの不変条件違反
   #[error("validation error: {0}")]
   Validation(String),

   /// 競合エラー
   ///
   /// 既に解決済みのロール申請を逆方向に解決しようとした場合などに使用する。
   #[error("conflict: {0}")]
   Conflict(String),
}
