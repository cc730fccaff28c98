//! # ユースケース層
//!
//! Core Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと時刻を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - `account`: アカウント登録
//! - `role_request`: ロール申請の提出・審査
//! - `password_reset`: ワンタイムコードによるパスワード再設定
//! - `moderation`: フラグ・非表示・ミュート

pub(crate) mod helpers;

pub mod account;
pub mod moderation;
pub mod password_reset;
pub mod role_request;

pub use account::{AccountUseCaseImpl, RegisterInput};
pub use moderation::ModerationUseCaseImpl;
pub use password_reset::{CompleteResetInput, IssuedResetCode, PasswordResetUseCaseImpl};
pub use role_request::RoleRequestUseCaseImpl;
