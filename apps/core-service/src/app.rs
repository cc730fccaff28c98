//! # アプリケーション組み立て
//!
//! 依存コンポーネントからユースケースとハンドラの State を構築し、
//! ルーターを組み立てる。サーバー起動とテストで同じルーティングを使う。

use std::sync::Arc;

use axum::{
   Router,
   routing::{get, post},
};
use campusqa_domain::clock::Clock;
use campusqa_infra::{
   PasswordHasher,
   repository::{
      ModerationRepository,
      PasswordResetRepository,
      RoleRequestRepository,
      UserRepository,
   },
};
use tower_http::trace::TraceLayer;

use crate::{
   handler::{
      AccountState,
      ModerationState,
      PasswordResetState,
      RoleRequestWorkflowState,
      approve_role_request,
      complete_password_reset,
      deny_role_request,
      flag_content,
      get_flag_status,
      get_mute_status,
      health_check,
      hide_content,
      list_flagged,
      list_hidden,
      list_muted_users,
      list_pending_role_requests,
      mute_user,
      register_user,
      request_password_reset,
      submit_role_request,
      unflag_content,
      unhide_content,
      unmute_user,
      validate_name_handler,
      validate_password_handler,
   },
   usecase::{
      AccountUseCaseImpl,
      ModerationUseCaseImpl,
      PasswordResetUseCaseImpl,
      RoleRequestUseCaseImpl,
   },
};

/// ルーター構築に必要な依存コンポーネント
#[derive(Clone)]
pub struct AppDependencies {
   pub user_repository:           Arc<dyn UserRepository>,
   pub role_request_repository:   Arc<dyn RoleRequestRepository>,
   pub password_reset_repository: Arc<dyn PasswordResetRepository>,
   pub moderation_repository:     Arc<dyn ModerationRepository>,
   pub password_hasher:           Arc<dyn PasswordHasher>,
   pub clock:                     Arc<dyn Clock>,
}

/// ルーターを構築する
pub fn build_router(deps: AppDependencies) -> Router {
   let account_state = Arc::new(AccountState {
      usecase: AccountUseCaseImpl::new(
         deps.user_repository.clone(),
         deps.password_hasher.clone(),
         deps.clock.clone(),
      ),
   });

   let role_request_state = Arc::new(RoleRequestWorkflowState {
      usecase: RoleRequestUseCaseImpl::new(
         deps.user_repository.clone(),
         deps.role_request_repository.clone(),
         deps.clock.clone(),
      ),
   });

   let password_reset_state = Arc::new(PasswordResetState {
      usecase: PasswordResetUseCaseImpl::new(
         deps.user_repository.clone(),
         deps.password_reset_repository.clone(),
         deps.password_hasher.clone(),
         deps.clock.clone(),
      ),
   });

   let moderation_state = Arc::new(ModerationState {
      usecase: ModerationUseCaseImpl::new(
         deps.user_repository.clone(),
         deps.moderation_repository.clone(),
      ),
   });

   Router::new()
      .route("/health", get(health_check))
      // 入力検証 API
      .route(
         "/internal/validation/password",
         post(validate_password_handler),
      )
      .route("/internal/validation/name", post(validate_name_handler))
      // アカウント API
      .route("/internal/users", post(register_user))
      .with_state(account_state)
      // ロール申請 API
      .route(
         "/internal/role-requests",
         post(submit_role_request).get(list_pending_role_requests),
      )
      .route(
         "/internal/role-requests/{id}/approve",
         post(approve_role_request),
      )
      .route("/internal/role-requests/{id}/deny", post(deny_role_request))
      .with_state(role_request_state)
      // パスワードリセット API
      .route("/internal/password-resets", post(request_password_reset))
      .route(
         "/internal/password-resets/complete",
         post(complete_password_reset),
      )
      .with_state(password_reset_state)
      // モデレーション API
      .route(
         "/internal/moderation/{kind}/{id}/flag",
         post(flag_content).delete(unflag_content),
      )
      .route(
         "/internal/moderation/{kind}/{id}/hidden",
         post(hide_content).delete(unhide_content),
      )
      .route(
         "/internal/moderation/{kind}/{id}/status",
         get(get_flag_status),
      )
      .route("/internal/moderation/{kind}/flagged", get(list_flagged))
      .route("/internal/moderation/{kind}/hidden", get(list_hidden))
      .route(
         "/internal/moderation/users/{username}/mute",
         post(mute_user).delete(unmute_user).get(get_mute_status),
      )
      .route("/internal/moderation/muted-users", get(list_muted_users))
      .with_state(moderation_state)
      .layer(TraceLayer::new_for_http())
}
