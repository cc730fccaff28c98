//! # PasswordResetRepository
//!
//! パスワードリセット申請の永続化を担当するリポジトリ。
//!
//! ユーザー名ごとに有効な申請は高々1件。申請の消費はコードが一致するときだけ成功し、
//! 同じ申請を二度消費することはできない。

use std::{
   collections::HashMap,
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use campusqa_domain::{
   password_reset::{OneTimeCode, PasswordResetRequest},
   user::Username,
};
use chrono::{DateTime, Utc};

use super::lock;
use crate::error::InfraError;

/// パスワードリセット申請リポジトリトレイト
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
   /// ユーザー名に対する有効な申請を取得
   async fn find_active(
      &self,
      username: &Username,
   ) -> Result<Option<PasswordResetRequest>, InfraError>;

   /// 申請を登録する
   ///
   /// 有効な申請が既に存在する場合は `Conflict`。
   async fn insert(&self, request: &PasswordResetRequest) -> Result<(), InfraError>;

   /// 指定したコードの申請を消費（削除）する
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 削除した
   /// - `Ok(false)`: 有効な申請がない、または保存済みの申請のコードが異なる
   async fn consume(&self, username: &Username, code: &OneTimeCode) -> Result<bool, InfraError>;
}

/// 保存形式の申請
#[derive(Debug, Clone)]
struct StoredResetRequest {
   code:       String,
   created_at: DateTime<Utc>,
}

/// インメモリ実装の PasswordResetRepository
///
/// コードは文字列で保持し、読み出し時に [`OneTimeCode::parse`] で形式を検証する。
#[derive(Debug, Clone, Default)]
pub struct InMemoryPasswordResetRepository {
   requests: Arc<Mutex<HashMap<Username, StoredResetRequest>>>,
}

impl InMemoryPasswordResetRepository {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
   async fn find_active(
      &self,
      username: &Username,
   ) -> Result<Option<PasswordResetRequest>, InfraError> {
      let Some(stored) = lock(&self.requests, "password reset")?.get(username).cloned() else {
         return Ok(None);
      };
      let code = OneTimeCode::parse(stored.code).map_err(|e| {
         InfraError::unexpected(format!(
            "corrupted password reset for {}: {e}",
            username.as_str()
         ))
      })?;
      Ok(Some(PasswordResetRequest::new(
         username.clone(),
         code,
         stored.created_at,
      )))
   }

   async fn insert(&self, request: &PasswordResetRequest) -> Result<(), InfraError> {
      let mut requests = lock(&self.requests, "password reset")?;
      if requests.contains_key(request.username()) {
         return Err(InfraError::conflict(
            "PasswordResetRequest",
            request.username().as_str(),
         ));
      }
      requests.insert(
         request.username().clone(),
         StoredResetRequest {
            code:       request.code().as_str().to_string(),
            created_at: request.created_at(),
         },
      );
      Ok(())
   }

   async fn consume(&self, username: &Username, code: &OneTimeCode) -> Result<bool, InfraError> {
      let mut requests = lock(&self.requests, "password reset")?;
      let matches = requests
         .get(username)
         .is_some_and(|stored| code.matches(&stored.code));
      if matches {
         requests.remove(username);
      }
      Ok(matches)
   }
}
