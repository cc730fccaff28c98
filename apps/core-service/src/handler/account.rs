//! # アカウントハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /internal/users` - アカウント登録

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use campusqa_domain::{password::PlainPassword, role::RoleSet, user::User};
use campusqa_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
   error::CoreError,
   usecase::{AccountUseCaseImpl, RegisterInput},
};

/// アカウント API の共有状態
pub struct AccountState {
   pub usecase: AccountUseCaseImpl,
}

/// アカウント登録リクエスト
#[derive(Deserialize)]
pub struct RegisterUserRequest {
   pub username:         String,
   pub first_name:       String,
   pub last_name:        String,
   pub password:         String,
   pub confirm_password: String,
}

/// ユーザー DTO
#[derive(Debug, Serialize)]
pub struct UserDto {
   pub username:    String,
   pub first_name:  String,
   pub last_name:   String,
   pub roles:       RoleSet,
   pub roles_label: String,
   pub created_at:  String,
}

impl From<&User> for UserDto {
   fn from(user: &User) -> Self {
      Self {
         username:    user.username().as_str().to_string(),
         first_name:  user.first_name().as_str().to_string(),
         last_name:   user.last_name().as_str().to_string(),
         roles:       user.roles(),
         roles_label: user.roles().to_string(),
         created_at:  user.created_at().to_rfc3339(),
      }
   }
}

/// POST /internal/users
///
/// ## レスポンス
///
/// - `201 Created`: 登録されたユーザー
/// - `400 Bad Request`: 入力形式・パスワード強度・確認不一致
/// - `409 Conflict`: ユーザー名が登録済み
#[tracing::instrument(skip_all, fields(username = %req.username))]
pub async fn register_user(
   State(state): State<Arc<AccountState>>,
   Json(req): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let input = RegisterInput {
      username:         req.username,
      first_name:       req.first_name,
      last_name:        req.last_name,
      password:         PlainPassword::new(req.password),
      confirm_password: PlainPassword::new(req.confirm_password),
   };

   let user = state.usecase.register(input).await?;

   let response = ApiResponse::new(UserDto::from(&user));
   Ok((StatusCode::CREATED, Json(response)))
}
