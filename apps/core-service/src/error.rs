//! # Core Service エラー定義
//!
//! Core Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | HTTP ステータス |
//! |--------|----------------|
//! | `BadRequest`, `PasswordInvalid`, `NameInvalid`, `CodeMismatch`, `ConfirmationMismatch` | 400 |
//! | `Forbidden` | 403 |
//! | `UserNotFound`, `RequestNotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Database` | 500 |

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use campusqa_domain::{
   DomainError,
   validator::{NameValidationError, PasswordValidationError},
};
use campusqa_infra::InfraError;
use campusqa_shared::ErrorResponse;
use thiserror::Error;

/// Core Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
   /// ユーザーが存在しない
   #[error("user not found: {0}")]
   UserNotFound(String),

   /// 対象の申請が存在しない
   #[error("request not found: {0}")]
   RequestNotFound(String),

   /// 不正なリクエスト
   #[error("bad request: {0}")]
   BadRequest(String),

   /// パスワードが強度要件を満たさない
   #[error(transparent)]
   PasswordInvalid(#[from] PasswordValidationError),

   /// 氏名の形式が不正
   #[error(transparent)]
   NameInvalid(#[from] NameValidationError),

   /// ワンタイムコードが一致しない
   #[error("one-time code does not match")]
   CodeMismatch,

   /// 確認用パスワードが一致しない
   #[error("password confirmation does not match")]
   ConfirmationMismatch,

   /// 権限不足
   #[error("forbidden: {0}")]
   Forbidden(String),

   /// 競合
   #[error("conflict: {0}")]
   Conflict(String),

   /// データベースエラー
   #[error("database error: {0}")]
   Database(#[from] InfraError),
}

impl From<DomainError> for CoreError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => Self::BadRequest(msg),
         DomainError::Conflict(msg) => Self::Conflict(msg),
      }
   }
}

impl CoreError {
   fn to_error_response(&self) -> ErrorResponse {
      match self {
         Self::UserNotFound(username) => ErrorResponse::new(
            "user-not-found",
            "User Not Found",
            404,
            format!("user {username:?} does not exist"),
         ),
         Self::RequestNotFound(msg) => {
            ErrorResponse::new("request-not-found", "Request Not Found", 404, msg)
         }
         Self::BadRequest(msg) => ErrorResponse::bad_request(msg),
         Self::PasswordInvalid(e) => {
            ErrorResponse::new("password-invalid", "Password Invalid", 400, e.to_string())
         }
         Self::NameInvalid(e) => {
            ErrorResponse::new("name-invalid", "Name Invalid", 400, e.to_string())
         }
         Self::CodeMismatch => ErrorResponse::new(
            "code-mismatch",
            "Code Mismatch",
            400,
            "the one-time code does not match",
         ),
         Self::ConfirmationMismatch => ErrorResponse::new(
            "confirmation-mismatch",
            "Confirmation Mismatch",
            400,
            "the confirmation password does not match",
         ),
         Self::Forbidden(msg) => ErrorResponse::forbidden(msg),
         Self::Conflict(msg) => ErrorResponse::conflict(msg),
         Self::Database(e) => {
            tracing::error!(error = %e, span_trace = %e.span_trace(), "database error");
            ErrorResponse::internal_error()
         }
      }
   }
}

impl IntoResponse for CoreError {
   fn into_response(self) -> Response {
      let body = self.to_error_response();
      let status =
         StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

      (status, Json(body)).into_response()
   }
}
