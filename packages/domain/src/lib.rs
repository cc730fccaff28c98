//! # CampusQA ドメイン層
//!
//! 大学の授業 Q&A フォーラムの中核となる検証ロジックとワークフローを定義する。
//!
//! ## 設計方針
//!
//! - **純粋**: I/O を持たず、すべての操作は同期的に完了する
//! - **ADT ステートマシン**: ロール申請の状態は enum で表現し、状態ごとに有効な
//!   フィールドだけを持たせる
//! - **検証済みの型**: 検証を通過した値だけが値オブジェクトになる
//!   （[`user::PersonName`], [`password::NewPassword`] など）
//!
//! ## 依存関係の方向
//!
//! ```text
//! core-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`validator`] - パスワード強度・氏名形式の検証
//! - [`role`] - ロールとロール集合、審査キュー
//! - [`role_request`] - ロール申請のライフサイクル
//! - [`password_reset`] - ワンタイムコードとリセット申請
//! - [`moderation`] - フラグ・非表示・ミュート
//! - [`user`] - ユーザーエンティティ
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー
//!
//! ## 使用例
//!
//! ```rust
//! use campusqa_domain::{
//!     DomainError,
//!     role::{Role, RoleQueue, RoleSet},
//! };
//!
//! let requested = RoleSet::only(Role::Reviewer);
//! assert_eq!(RoleQueue::for_roles(requested), RoleQueue::Instructor);
//!
//! let error = DomainError::Conflict("role request 0190f3c4 is already denied".to_string());
//! assert_eq!(error.to_string(), "conflict: role request 0190f3c4 is already denied");
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod moderation;
pub mod password;
pub mod password_reset;
pub mod role;
pub mod role_request;
pub mod user;
pub mod validator;

pub use error::DomainError;
