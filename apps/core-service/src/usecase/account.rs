//! アカウント登録ユースケース
//!
//! 新規ユーザーを登録する。空のストアに最初に登録されたアカウントは Admin、
//! 以降のアカウントは Student として作成される。

use std::sync::Arc;

use campusqa_domain::{
   clock::Clock,
   password::{NewPassword, PlainPassword},
   role::{Role, RoleSet},
   user::{NewUser, PersonName, User, Username},
   validator::NameField,
};
use campusqa_infra::{PasswordHasher, repository::UserRepository};

use crate::error::CoreError;

/// アカウント登録の入力
pub struct RegisterInput {
   pub username:         String,
   pub first_name:       String,
   pub last_name:        String,
   pub password:         PlainPassword,
   pub confirm_password: PlainPassword,
}

/// アカウント登録ユースケース
pub struct AccountUseCaseImpl {
   user_repository: Arc<dyn UserRepository>,
   password_hasher: Arc<dyn PasswordHasher>,
   clock:           Arc<dyn Clock>,
}

impl AccountUseCaseImpl {
   pub fn new(
      user_repository: Arc<dyn UserRepository>,
      password_hasher: Arc<dyn PasswordHasher>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         user_repository,
         password_hasher,
         clock,
      }
   }

   /// アカウントを登録する
   ///
   /// 検証順序:
   /// 1. ユーザー名の形式
   /// 2. 名 → 姓の形式
   /// 3. パスワード強度
   /// 4. 確認用パスワードとの一致
   /// 5. ユーザー名の重複（`Conflict`）
   pub async fn register(&self, input: RegisterInput) -> Result<User, CoreError> {
      let username = Username::new(input.username)?;
      let first_name = PersonName::new(input.first_name, NameField::First)?;
      let last_name = PersonName::new(input.last_name, NameField::Last)?;
      let password = NewPassword::new(input.password)?;
      if !password.as_plain().is_same_as(&input.confirm_password) {
         return Err(CoreError::ConfirmationMismatch);
      }

      if self.user_repository.exists(&username).await? {
         tracing::warn!(%username, "登録済みのユーザー名での登録を拒否しました");
         return Err(CoreError::Conflict(format!(
            "username {:?} is already taken",
            username.as_str()
         )));
      }

      let initial_role = if self.user_repository.count().await? == 0 {
         Role::Admin
      } else {
         Role::Student
      };

      let user = User::new(NewUser {
         username,
         first_name,
         last_name,
         roles: RoleSet::only(initial_role),
         password_hash: self.password_hasher.hash(&password)?,
         now: self.clock.now(),
      });

      self.user_repository.insert(&user).await.map_err(|e| {
         if e.as_conflict().is_some() {
            CoreError::Conflict(format!(
               "username {:?} is already taken",
               user.username().as_str()
            ))
         } else {
            CoreError::Database(e)
         }
      })?;

      tracing::info!(username = %user.username(), roles = %user.roles(), "アカウントを登録しました");
      Ok(user)
   }
}
