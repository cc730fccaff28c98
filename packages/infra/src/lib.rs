//! # CampusQA インフラ層
//!
//! ワークフローが依存するデータアクセスの契約と、その実装を提供する。
//!
//! ## 責務
//!
//! - **リポジトリトレイト**: ユーザー・ロール申請・パスワードリセット・モデレーションの永続化契約
//! - **インメモリ実装**: サービス起動とテストで使用する `InMemory*Repository`
//! - **パスワードハッシュ**: Argon2id によるハッシュ化と検証
//!
//! ## 依存関係
//!
//! ```text
//! core-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`password`] - パスワードハッシュ
//! - [`repository`] - リポジトリトレイトとインメモリ実装
//!
//! ## 使用例
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use campusqa_infra::repository::{InMemoryUserRepository, UserRepository};
//!
//! let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
//! ```

pub mod error;
pub mod password;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordHasher, PasswordHasher};
