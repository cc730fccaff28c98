//! # リポジトリ
//!
//! ワークフローが呼び出すデータアクセスの契約（リポジトリトレイト）と、
//! そのインメモリ実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイト経由でのみ永続化にアクセスする
//! - **at-most-once**: ロール申請の解決とリセット申請の消費は、
//!   リポジトリの条件付き更新で一度だけ成功する
//! - **インメモリ実装**: `Arc<Mutex<_>>` で状態を共有し、`Clone` したインスタンス同士は
//!   同じストアを参照する

use std::sync::{Mutex, MutexGuard};

pub mod moderation_repository;
pub mod password_reset_repository;
pub mod role_request_repository;
pub mod user_repository;

pub use moderation_repository::{InMemoryModerationRepository, ModerationRepository};
pub use password_reset_repository::{InMemoryPasswordResetRepository, PasswordResetRepository};
pub use role_request_repository::{InMemoryRoleRequestRepository, RoleRequestRepository};
pub use user_repository::{InMemoryUserRepository, UserRepository};

use crate::InfraError;

/// ストアのロックを取得する
///
/// poison されたロックは [`InfraError::unexpected`] に変換する。
pub(crate) fn lock<'a, T>(store: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, InfraError> {
   store.lock().map_err(|_| {
      tracing::error!(store = name, "in-memory store lock is poisoned");
      InfraError::unexpected(format!("{name} store lock is poisoned"))
   })
}
