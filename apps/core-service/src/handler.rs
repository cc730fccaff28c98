//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケースに委譲
//! - 操作の実行者（審査担当・モデレーター）はリクエストボディで受け取る

pub mod account;
pub mod health;
pub mod moderation;
pub mod password_reset;
pub mod role_request;
pub mod validation;

pub use account::{AccountState, register_user};
pub use health::health_check;
pub use moderation::{
   ModerationState,
   flag_content,
   get_flag_status,
   get_mute_status,
   hide_content,
   list_flagged,
   list_hidden,
   list_muted_users,
   mute_user,
   unflag_content,
   unhide_content,
   unmute_user,
};
pub use password_reset::{PasswordResetState, complete_password_reset, request_password_reset};
pub use role_request::{
   RoleRequestWorkflowState,
   approve_role_request,
   deny_role_request,
   list_pending_role_requests,
   submit_role_request,
};
pub use validation::{validate_name_handler, validate_password_handler};
