//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。

use std::{
   collections::HashMap,
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use campusqa_domain::{
   password::PasswordHash,
   role::RoleSet,
   user::{User, Username},
};

use super::lock;
use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
   /// ユーザー名が登録済みかどうか
   async fn exists(&self, username: &Username) -> Result<bool, InfraError>;

   /// ユーザー名でユーザーを検索
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(user))`: ユーザーが見つかった場合
   /// - `Ok(None)`: ユーザーが見つからない場合
   async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError>;

   /// 登録済みユーザー数
   async fn count(&self) -> Result<usize, InfraError>;

   /// ユーザーを登録する
   ///
   /// ユーザー名が既に使われている場合は `Conflict`。
   async fn insert(&self, user: &User) -> Result<(), InfraError>;

   /// ユーザーのロール集合を取得（存在しなければ `None`）
   async fn find_roles(&self, username: &Username) -> Result<Option<RoleSet>, InfraError>;

   /// ユーザーのロール集合を置き換える
   ///
   /// ユーザーが存在しない場合は `NotFound`。
   async fn update_roles(&self, username: &Username, roles: RoleSet) -> Result<(), InfraError>;

   /// パスワードハッシュを置き換える
   ///
   /// ユーザーが存在しない場合は `NotFound`。
   async fn update_password(
      &self,
      username: &Username,
      password_hash: &PasswordHash,
   ) -> Result<(), InfraError>;
}

/// インメモリ実装の UserRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
   users: Arc<Mutex<HashMap<Username, User>>>,
}

impl InMemoryUserRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// 既存ユーザーの値を変換して書き戻す
   fn modify(
      &self,
      username: &Username,
      f: impl FnOnce(User) -> User,
   ) -> Result<(), InfraError> {
      let mut users = lock(&self.users, "user")?;
      let user = users
         .remove(username)
         .ok_or_else(|| InfraError::not_found("User", username.as_str()))?;
      users.insert(username.clone(), f(user));
      Ok(())
   }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
   async fn exists(&self, username: &Username) -> Result<bool, InfraError> {
      Ok(lock(&self.users, "user")?.contains_key(username))
   }

   async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError> {
      Ok(lock(&self.users, "user")?.get(username).cloned())
   }

   async fn count(&self) -> Result<usize, InfraError> {
      Ok(lock(&self.users, "user")?.len())
   }

   async fn insert(&self, user: &User) -> Result<(), InfraError> {
      let mut users = lock(&self.users, "user")?;
      if users.contains_key(user.username()) {
         return Err(InfraError::conflict("User", user.username().as_str()));
      }
      users.insert(user.username().clone(), user.clone());
      Ok(())
   }

   async fn find_roles(&self, username: &Username) -> Result<Option<RoleSet>, InfraError> {
      Ok(lock(&self.users, "user")?.get(username).map(User::roles))
   }

   async fn update_roles(&self, username: &Username, roles: RoleSet) -> Result<(), InfraError> {
      self.modify(username, |user| user.with_roles(roles))
   }

   async fn update_password(
      &self,
      username: &Username,
      password_hash: &PasswordHash,
   ) -> Result<(), InfraError> {
      let password_hash = password_hash.clone();
      self.modify(username, |user| user.with_password_hash(password_hash))
   }
}
