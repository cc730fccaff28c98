//! # パスワードリセットハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /internal/password-resets` - ワンタイムコードの発行
//! - `POST /internal/password-resets/complete` - コードによる再設定
//!
//! 発行したコードは呼び出し元（管理画面）に返し、利用者への伝達は呼び出し元が行う。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use campusqa_domain::password::PlainPassword;
use campusqa_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
   error::CoreError,
   usecase::{CompleteResetInput, PasswordResetUseCaseImpl},
};

/// パスワードリセット API の共有状態
pub struct PasswordResetState {
   pub usecase: PasswordResetUseCaseImpl,
}

/// コード発行リクエスト
#[derive(Debug, Deserialize)]
pub struct RequestResetRequest {
   pub username: String,
}

/// 再設定リクエスト
#[derive(Deserialize)]
pub struct CompleteResetRequest {
   pub username:         String,
   pub code:             String,
   pub new_password:     String,
   pub confirm_password: String,
}

/// 発行コード DTO
#[derive(Serialize)]
pub struct IssuedResetCodeDto {
   pub username: String,
   pub code:     String,
   pub reused:   bool,
}

/// POST /internal/password-resets
///
/// 有効な申請があれば同じコードを `reused: true` で返す。
#[tracing::instrument(skip_all, fields(username = %req.username))]
pub async fn request_password_reset(
   State(state): State<Arc<PasswordResetState>>,
   Json(req): Json<RequestResetRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let issued = state.usecase.request_reset(&req.username).await?;

   let response = ApiResponse::new(IssuedResetCodeDto {
      username: req.username,
      code:     issued.code.as_str().to_string(),
      reused:   issued.reused,
   });
   Ok((StatusCode::OK, Json(response)))
}

/// POST /internal/password-resets/complete
///
/// ## レスポンス
///
/// - `204 No Content`: 再設定完了
/// - `400 Bad Request`: コード不一致・強度不足・確認不一致
/// - `404 Not Found`: ユーザーまたは有効な申請が存在しない
#[tracing::instrument(skip_all, fields(username = %req.username))]
pub async fn complete_password_reset(
   State(state): State<Arc<PasswordResetState>>,
   Json(req): Json<CompleteResetRequest>,
) -> Result<impl IntoResponse, CoreError> {
   state
      .usecase
      .complete_reset(CompleteResetInput {
         username:         req.username,
         code:             req.code,
         new_password:     PlainPassword::new(req.new_password),
         confirm_password: PlainPassword::new(req.confirm_password),
      })
      .await?;

   Ok(StatusCode::NO_CONTENT)
}
