//! # 入力検証ハンドラ
//!
//! 登録フォームなどが送信前に入力を確認するための内部 API。
//! 検証の失敗はエラーではなく、構造化された結果として 200 で返す。
//!
//! ## エンドポイント
//!
//! - `POST /internal/validation/password` - パスワード強度の検証
//! - `POST /internal/validation/name` - 姓・名の形式の検証

use axum::{Json, http::StatusCode, response::IntoResponse};
use campusqa_domain::validator::{
   NameField,
   NameValidationError,
   PasswordValidationError,
   ValidationErrorKind,
   validate_name,
   validate_password,
};
use campusqa_shared::ApiResponse;
use serde::{Deserialize, Serialize};

/// パスワード検証リクエスト
#[derive(Deserialize)]
pub struct ValidatePasswordRequest {
   pub password: String,
}

/// 氏名検証リクエスト
#[derive(Debug, Deserialize)]
pub struct ValidateNameRequest {
   pub value: String,
   pub field: NameField,
}

/// 検証結果 DTO
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ValidationResultDto {
   pub valid:       bool,
   pub kind:        Option<ValidationErrorKind>,
   pub message:     String,
   /// 不正な文字の位置（0 始まり）
   pub position:    Option<usize>,
   /// 満たされなかったパスワード要件
   pub unsatisfied: Vec<String>,
}

impl ValidationResultDto {
   fn valid() -> Self {
      Self {
         valid:       true,
         kind:        None,
         message:     String::new(),
         position:    None,
         unsatisfied: Vec::new(),
      }
   }

   fn from_password_error(err: &PasswordValidationError) -> Self {
      let position = match err {
         PasswordValidationError::InvalidCharacter { position, .. } => Some(*position),
         _ => None,
      };
      Self {
         valid: false,
         kind: Some(err.kind()),
         message: err.to_string(),
         position,
         unsatisfied: err.unsatisfied().iter().map(ToString::to_string).collect(),
      }
   }

   fn from_name_error(err: &NameValidationError) -> Self {
      let position = match err {
         NameValidationError::InvalidCharacter { position, .. } => Some(*position),
         _ => None,
      };
      Self {
         valid: false,
         kind: Some(err.kind()),
         message: err.to_string(),
         position,
         unsatisfied: Vec::new(),
      }
   }
}

/// POST /internal/validation/password
///
/// 入力されたパスワードはスパンに記録しない。
#[tracing::instrument(skip_all)]
pub async fn validate_password_handler(
   Json(req): Json<ValidatePasswordRequest>,
) -> impl IntoResponse {
   let result = match validate_password(&req.password) {
      Ok(()) => ValidationResultDto::valid(),
      Err(e) => ValidationResultDto::from_password_error(&e),
   };
   (StatusCode::OK, Json(ApiResponse::new(result)))
}

/// POST /internal/validation/name
#[tracing::instrument(skip_all, fields(field = ?req.field))]
pub async fn validate_name_handler(Json(req): Json<ValidateNameRequest>) -> impl IntoResponse {
   let result = match validate_name(&req.value, req.field) {
      Ok(()) => ValidationResultDto::valid(),
      Err(e) => ValidationResultDto::from_name_error(&e),
   };
   (StatusCode::OK, Json(ApiResponse::new(result)))
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   fn test_不正な文字の位置が結果に含まれる() {
      let err = validate_password("Abc def1!").unwrap_err();

      let dto = ValidationResultDto::from_password_error(&err);

      assert_eq!(dto.kind, Some(ValidationErrorKind::InvalidCharacter));
      assert_eq!(dto.position, Some(3));
      assert!(dto.unsatisfied.is_empty());
   }

   #[rstest]
   fn test_満たされなかった要件が列挙される() {
      let err = validate_password("abcdefg1").unwrap_err();

      let dto = ValidationResultDto::from_password_error(&err);

      assert!(!dto.valid);
      assert_eq!(dto.kind, Some(ValidationErrorKind::WeakPassword));
      assert_eq!(dto.unsatisfied.len(), 2);
   }

   #[rstest]
   fn test_氏名の長さエラーには位置がない() {
      let err = validate_name("Al", NameField::First).unwrap_err();

      let dto = ValidationResultDto::from_name_error(&err);

      assert_eq!(dto.kind, Some(ValidationErrorKind::LengthOutOfRange));
      assert_eq!(dto.position, None);
   }
}
