//! パスワードリセットユースケース
//!
//! ワンタイムコードの発行と、コードを使ったパスワード再設定を提供する。
//!
//! ## 検証順序
//!
//! `complete_reset` はエラー報告を決定的にするため、次の順で検証する。
//!
//! 1. ユーザーの存在（`UserNotFound`）
//! 2. 有効な申請の存在（`RequestNotFound`）
//! 3. コードの一致（`CodeMismatch`）
//! 4. パスワード強度（`PasswordInvalid`）
//! 5. 確認用パスワードの一致（`ConfirmationMismatch`）
//!
//! いずれかで失敗した場合、保存済みパスワードも申請も変更しない。
//!
//! 申請の消費は検証したコードを条件に行う。検証後に申請が使われたり
//! 新しい申請に置き換わったりしていれば `Conflict` を返し、新しい申請は残る。
//!
//! ワンタイムコードはログに出力しない。

use std::sync::Arc;

use campusqa_domain::{
   clock::Clock,
   password::{NewPassword, PlainPassword},
   password_reset::{OneTimeCode, PasswordResetRequest},
   user::Username,
};
use campusqa_infra::{
   PasswordHasher,
   repository::{PasswordResetRepository, UserRepository},
};

use super::helpers::parse_existing_username;
use crate::error::CoreError;

/// 発行されたワンタイムコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedResetCode {
   pub code:   OneTimeCode,
   /// 既存の有効な申請のコードを返した場合 true
   pub reused: bool,
}

/// パスワード再設定の入力
pub struct CompleteResetInput {
   pub username:         String,
   pub code:             String,
   pub new_password:     PlainPassword,
   pub confirm_password: PlainPassword,
}

/// パスワードリセットユースケース
pub struct PasswordResetUseCaseImpl {
   user_repository:           Arc<dyn UserRepository>,
   password_reset_repository: Arc<dyn PasswordResetRepository>,
   password_hasher:           Arc<dyn PasswordHasher>,
   clock:                     Arc<dyn Clock>,
}

impl PasswordResetUseCaseImpl {
   pub fn new(
      user_repository: Arc<dyn UserRepository>,
      password_reset_repository: Arc<dyn PasswordResetRepository>,
      password_hasher: Arc<dyn PasswordHasher>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         user_repository,
         password_reset_repository,
         password_hasher,
         clock,
      }
   }

   /// ワンタイムコードを発行する
   ///
   /// 有効な申請が既にあれば、そのコードをそのまま返す（再生成しない）。
   pub async fn request_reset(&self, username: &str) -> Result<IssuedResetCode, CoreError> {
      let username = self.require_user(username).await?;

      if let Some(active) = self.password_reset_repository.find_active(&username).await? {
         tracing::info!(%username, "有効なリセット申請のコードを再利用します");
         return Ok(IssuedResetCode {
            code:   active.code().clone(),
            reused: true,
         });
      }

      let code = OneTimeCode::generate(&mut rand::rng());
      let request = PasswordResetRequest::new(username.clone(), code, self.clock.now());

      match self.password_reset_repository.insert(&request).await {
         Ok(()) => {
            tracing::info!(%username, "パスワードリセット申請を作成しました");
            Ok(IssuedResetCode {
               code:   request.code().clone(),
               reused: false,
            })
         }
         Err(e) if e.as_conflict().is_some() => {
            // 同時に発行された申請を採用する
            let active = self
               .password_reset_repository
               .find_active(&username)
               .await?
               .ok_or_else(|| {
                  CoreError::Conflict(format!(
                     "password reset for {:?} changed concurrently",
                     username.as_str()
                  ))
               })?;
            Ok(IssuedResetCode {
               code:   active.code().clone(),
               reused: true,
            })
         }
         Err(e) => Err(e.into()),
      }
   }

   /// ワンタイムコードを使ってパスワードを再設定する
   ///
   /// 成功すると申請は削除され、同じコードは再利用できない。
   pub async fn complete_reset(&self, input: CompleteResetInput) -> Result<(), CoreError> {
      let username = self.require_user(&input.username).await?;

      let active = self
         .password_reset_repository
         .find_active(&username)
         .await?
         .ok_or_else(|| {
            CoreError::RequestNotFound(format!(
               "no active password reset for {:?}",
               username.as_str()
            ))
         })?;

      if !active.accepts(&input.code) {
         tracing::warn!(%username, "ワンタイムコードが一致しません");
         return Err(CoreError::CodeMismatch);
      }

      let password = NewPassword::new(input.new_password)?;
      if !password.as_plain().is_same_as(&input.confirm_password) {
         return Err(CoreError::ConfirmationMismatch);
      }

      let password_hash = self.password_hasher.hash(&password)?;

      // 申請の消費は一度しか成功しない。先に消費してから更新する
      if !self
         .password_reset_repository
         .consume(&username, active.code())
         .await?
      {
         tracing::warn!(%username, "リセット申請が検証後に変更されました");
         return Err(CoreError::Conflict(format!(
            "password reset for {:?} was already used or replaced",
            username.as_str()
         )));
      }
      self
         .user_repository
         .update_password(&username, &password_hash)
         .await?;

      tracing::info!(%username, "パスワードを再設定しました");
      Ok(())
   }

   async fn require_user(&self, username: &str) -> Result<Username, CoreError> {
      let username = parse_existing_username(username)?;
      if !self.user_repository.exists(&username).await? {
         return Err(CoreError::UserNotFound(username.into_string()));
      }
      Ok(username)
   }
}
