//! モデレーションユースケース
//!
//! コンテンツのフラグ・非表示と、ユーザーのミュートを扱う。
//! 変更操作はすべて Staff または Instructor ロールを持つモデレーターが行う。
//!
//! すべての操作は冪等な集合操作で、他の状態へ波及しない
//! （ユーザーをミュートしても既存の投稿は非表示にならない）。

use std::sync::Arc;

use campusqa_domain::{
   moderation::{ContentKind, ContentRef, FlagReason, ModerationFlag, MuteStatus},
   role::Role,
   user::Username,
};
use campusqa_infra::repository::{ModerationRepository, UserRepository};

use super::helpers::{parse_existing_username, require_any_role};
use crate::error::CoreError;

/// モデレーション操作を許可されるロール
const MODERATOR_ROLES: [Role; 2] = [Role::Staff, Role::Instructor];

/// モデレーションユースケース
pub struct ModerationUseCaseImpl {
   user_repository:       Arc<dyn UserRepository>,
   moderation_repository: Arc<dyn ModerationRepository>,
}

impl ModerationUseCaseImpl {
   pub fn new(
      user_repository: Arc<dyn UserRepository>,
      moderation_repository: Arc<dyn ModerationRepository>,
   ) -> Self {
      Self {
         user_repository,
         moderation_repository,
      }
   }

   /// コンテンツにフラグを立てる
   ///
   /// フラグ済みのコンテンツは最初の理由を保持する。
   pub async fn flag(
      &self,
      moderator: &str,
      content: ContentRef,
      reason: &str,
   ) -> Result<ModerationFlag, CoreError> {
      self.require_moderator(moderator).await?;
      let reason = FlagReason::new(reason)?;

      let flag = self.moderation_repository.set_flag(content, &reason).await?;
      tracing::info!(%content, moderator, "コンテンツにフラグを立てました");
      Ok(flag)
   }

   /// コンテンツのフラグを外す
   pub async fn unflag(&self, moderator: &str, content: ContentRef) -> Result<ModerationFlag, CoreError> {
      self.require_moderator(moderator).await?;

      let flag = self.moderation_repository.unset_flag(content).await?;
      tracing::info!(%content, moderator, "コンテンツのフラグを外しました");
      Ok(flag)
   }

   /// コンテンツを非表示にする
   pub async fn hide(&self, moderator: &str, content: ContentRef) -> Result<ModerationFlag, CoreError> {
      self.require_moderator(moderator).await?;

      let flag = self.moderation_repository.set_hidden(content).await?;
      tracing::info!(%content, moderator, "コンテンツを非表示にしました");
      Ok(flag)
   }

   /// コンテンツの非表示を解除する
   pub async fn unhide(&self, moderator: &str, content: ContentRef) -> Result<ModerationFlag, CoreError> {
      self.require_moderator(moderator).await?;

      let flag = self.moderation_repository.unset_hidden(content).await?;
      tracing::info!(%content, moderator, "コンテンツの非表示を解除しました");
      Ok(flag)
   }

   /// ユーザーをミュートする
   pub async fn mute(&self, moderator: &str, username: &str) -> Result<MuteStatus, CoreError> {
      self.require_moderator(moderator).await?;
      let username = self.require_user(username).await?;

      self.moderation_repository.set_muted(&username).await?;
      tracing::info!(%username, moderator, "ユーザーをミュートしました");
      Ok(MuteStatus::muted(username))
   }

   /// ユーザーのミュートを解除する
   pub async fn unmute(&self, moderator: &str, username: &str) -> Result<MuteStatus, CoreError> {
      self.require_moderator(moderator).await?;
      let username = self.require_user(username).await?;

      self.moderation_repository.unset_muted(&username).await?;
      tracing::info!(%username, moderator, "ユーザーのミュートを解除しました");
      Ok(MuteStatus::unmuted(username))
   }

   /// コンテンツのモデレーション状態
   ///
   /// 記録がなければフラグも非表示もない状態を返す。
   pub async fn flag_status(&self, content: ContentRef) -> Result<ModerationFlag, CoreError> {
      Ok(self
         .moderation_repository
         .find_flag(content)
         .await?
         .unwrap_or_else(|| ModerationFlag::clear(content)))
   }

   /// 種別ごとのフラグ済みコンテンツ（ID 昇順）
   pub async fn list_flagged(&self, kind: ContentKind) -> Result<Vec<ModerationFlag>, CoreError> {
      Ok(self.moderation_repository.find_flagged(kind).await?)
   }

   /// 種別ごとの非表示コンテンツ（ID 昇順）
   pub async fn list_hidden(&self, kind: ContentKind) -> Result<Vec<ModerationFlag>, CoreError> {
      Ok(self.moderation_repository.find_hidden(kind).await?)
   }

   /// ミュート中のユーザー（ユーザー名順）
   pub async fn list_muted(&self) -> Result<Vec<Username>, CoreError> {
      Ok(self.moderation_repository.find_muted_users().await?)
   }

   /// ユーザーのミュート状態
   pub async fn mute_status(&self, username: &str) -> Result<MuteStatus, CoreError> {
      let username = self.require_user(username).await?;
      let status = if self.moderation_repository.is_muted(&username).await? {
         MuteStatus::muted(username)
      } else {
         MuteStatus::unmuted(username)
      };
      Ok(status)
   }

   /// ユーザーが投稿できることを確認する
   ///
   /// 投稿系の操作は保存前にこのチェックを通すこと。ミュート中なら `Forbidden`。
   pub async fn ensure_can_post(&self, username: &str) -> Result<(), CoreError> {
      let status = self.mute_status(username).await?;
      if status.is_muted {
         tracing::warn!(username = %status.username, "ミュート中のユーザーの投稿を拒否しました");
         return Err(CoreError::Forbidden(format!(
            "user {:?} is muted",
            status.username.as_str()
         )));
      }
      Ok(())
   }

   async fn require_moderator(&self, moderator: &str) -> Result<(), CoreError> {
      let moderator = Username::new(moderator)?;
      require_any_role(
         self.user_repository.as_ref(),
         &moderator,
         &MODERATOR_ROLES,
         "moderation",
      )
      .await?;
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

#[cfg(test)]
mod tests {
   use campusqa_domain::moderation::ContentId;
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;
   use crate::test_utils::{ForumTestBuilder, ForumTestSetup};

   async fn setup() -> ForumTestSetup {
      ForumTestBuilder::new()
         .with_user("staff", &[Role::Staff])
         .with_user("prof", &[Role::Instructor])
         .with_user("alice", &[Role::Student])
         .with_user("bob", &[Role::Student, Role::Reviewer])
         .build()
         .await
   }

   fn question(id: u64) -> ContentRef {
      ContentRef::new(ContentKind::Question, ContentId::new(id))
   }

   #[rstest]
   #[tokio::test]
   async fn test_フラグを立てると理由が記録される() {
      let setup = setup().await;

      let flag = setup
         .moderation
         .flag("staff", question(7), "spam")
         .await
         .unwrap();

      assert!(flag.is_flagged());
      assert_eq!(flag.reason_flagged().map(FlagReason::as_str), Some("spam"));
      assert!(!flag.is_hidden());
   }

   #[rstest]
   #[tokio::test]
   async fn test_二度フラグを立てても最初の理由が残る() {
      let setup = setup().await;
      setup
         .moderation
         .flag("staff", question(7), "spam")
         .await
         .unwrap();

      let flag = setup
         .moderation
         .flag("prof", question(7), "off-topic")
         .await
         .unwrap();

      assert_eq!(flag.reason_flagged().map(FlagReason::as_str), Some("spam"));
      assert_eq!(
         setup
            .moderation
            .list_flagged(ContentKind::Question)
            .await
            .unwrap()
            .len(),
         1
      );
   }

   #[rstest]
   #[tokio::test]
   async fn test_フラグを外すと理由も消える() {
      let setup = setup().await;
      setup
         .moderation
         .flag("staff", question(7), "spam")
         .await
         .unwrap();

      let flag = setup.moderation.unflag("staff", question(7)).await.unwrap();

      assert!(!flag.is_flagged());
      assert_eq!(flag.reason_flagged(), None);
      assert!(
         setup
            .moderation
            .list_flagged(ContentKind::Question)
            .await
            .unwrap()
            .is_empty()
      );
   }

   #[rstest]
   #[tokio::test]
   async fn test_非表示はフラグと独立している() {
      let setup = setup().await;
      setup
         .moderation
         .flag("staff", question(3), "spam")
         .await
         .unwrap();

      let flag = setup.moderation.hide("staff", question(3)).await.unwrap();
      assert!(flag.is_flagged());
      assert!(flag.is_hidden());

      let flag = setup.moderation.unhide("staff", question(3)).await.unwrap();
      assert!(flag.is_flagged());
      assert!(!flag.is_hidden());
      assert_eq!(setup.moderation.flag_status(question(3)).await.unwrap(), flag);
   }

   #[rstest]
   #[tokio::test]
   async fn test_一覧は種別ごとにid昇順() {
      let setup = setup().await;
      let answer = ContentRef::new(ContentKind::Answer, ContentId::new(1));
      for content in [question(9), answer, question(2)] {
         setup.moderation.hide("prof", content).await.unwrap();
      }

      let hidden: Vec<ContentRef> = setup
         .moderation
         .list_hidden(ContentKind::Question)
         .await
         .unwrap()
         .iter()
         .map(ModerationFlag::content)
         .collect();

      assert_eq!(hidden, vec![question(2), question(9)]);
   }

   #[rstest]
   #[tokio::test]
   async fn test_ミュートしても既存コンテンツは非表示にならない() {
      let setup = setup().await;
      setup
         .moderation
         .flag("staff", question(1), "rude")
         .await
         .unwrap();

      let status = setup.moderation.mute("staff", "alice").await.unwrap();

      assert!(status.is_muted);
      assert!(
         setup
            .moderation
            .list_hidden(ContentKind::Question)
            .await
            .unwrap()
            .is_empty()
      );
      assert_eq!(
         setup.moderation.list_muted().await.unwrap(),
         vec![Username::new("alice").unwrap()]
      );
   }

   #[rstest]
   #[tokio::test]
   async fn test_ミュート中のユーザーは投稿できない() {
      let setup = setup().await;
      setup.moderation.mute("prof", "alice").await.unwrap();

      let err = setup.moderation.ensure_can_post("alice").await.unwrap_err();
      assert!(matches!(err, CoreError::Forbidden(_)));
      assert!(setup.moderation.ensure_can_post("bob").await.is_ok());

      setup.moderation.unmute("prof", "alice").await.unwrap();
      assert!(setup.moderation.ensure_can_post("alice").await.is_ok());
   }

   #[rstest]
   #[tokio::test]
   async fn test_ミュート解除は冪等() {
      let setup = setup().await;

      let status = setup.moderation.unmute("staff", "bob").await.unwrap();

      assert_eq!(status, MuteStatus::unmuted(Username::new("bob").unwrap()));
      assert!(setup.moderation.list_muted().await.unwrap().is_empty());
   }

   #[rstest]
   #[case("alice")]
   #[case("bob")]
   #[case("ghost")]
   #[tokio::test]
   async fn test_モデレーター以外は操作できない(#[case] actor: &str) {
      let setup = setup().await;

      let flag = setup.moderation.flag(actor, question(1), "spam").await;
      let mute = setup.moderation.mute(actor, "alice").await;

      assert!(matches!(flag, Err(CoreError::Forbidden(_))));
      assert!(matches!(mute, Err(CoreError::Forbidden(_))));
      assert_eq!(
         setup.moderation.flag_status(question(1)).await.unwrap(),
         ModerationFlag::clear(question(1))
      );
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないユーザーはミュートできない() {
      let setup = setup().await;

      let err = setup.moderation.mute("staff", "ghost").await.unwrap_err();

      assert!(matches!(err, CoreError::UserNotFound(_)));
   }

   #[rstest]
   #[tokio::test]
   async fn test_空の理由ではフラグを立てられない() {
      let setup = setup().await;

      let err = setup
         .moderation
         .flag("staff", question(1), "   ")
         .await
         .unwrap_err();

      assert!(matches!(err, CoreError::BadRequest(_)));
   }
}
