//! # ModerationRepository
//!
//! コンテンツのフラグ・非表示状態と、ユーザーのミュート状態を永続化するリポジトリ。
//!
//! すべての set / unset は冪等で、更新後の状態を返す。

use std::{
   collections::{BTreeMap, BTreeSet},
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use campusqa_domain::{
   moderation::{ContentKind, ContentRef, FlagReason, ModerationFlag},
   user::Username,
};

use super::lock;
use crate::error::InfraError;

/// モデレーションリポジトリトレイト
#[async_trait]
pub trait ModerationRepository: Send + Sync {
   /// コンテンツのモデレーション状態を取得
   ///
   /// フラグも非表示もないコンテンツは `None`。
   async fn find_flag(&self, content: ContentRef) -> Result<Option<ModerationFlag>, InfraError>;

   /// フラグを立てる（既にフラグ付きなら最初の理由を保持）
   async fn set_flag(
      &self,
      content: ContentRef,
      reason: &FlagReason,
   ) -> Result<ModerationFlag, InfraError>;

   /// フラグを外す
   async fn unset_flag(&self, content: ContentRef) -> Result<ModerationFlag, InfraError>;

   /// 非表示にする
   async fn set_hidden(&self, content: ContentRef) -> Result<ModerationFlag, InfraError>;

   /// 非表示を解除する
   async fn unset_hidden(&self, content: ContentRef) -> Result<ModerationFlag, InfraError>;

   /// 種別ごとのフラグ付きコンテンツ（ID 昇順）
   async fn find_flagged(&self, kind: ContentKind) -> Result<Vec<ModerationFlag>, InfraError>;

   /// 種別ごとの非表示コンテンツ（ID 昇順）
   async fn find_hidden(&self, kind: ContentKind) -> Result<Vec<ModerationFlag>, InfraError>;

   /// ユーザーをミュートする
   async fn set_muted(&self, username: &Username) -> Result<(), InfraError>;

   /// ミュートを解除する
   async fn unset_muted(&self, username: &Username) -> Result<(), InfraError>;

   /// ユーザーがミュートされているかどうか
   async fn is_muted(&self, username: &Username) -> Result<bool, InfraError>;

   /// ミュート中のユーザー一覧（ユーザー名昇順）
   async fn find_muted_users(&self) -> Result<Vec<Username>, InfraError>;
}

/// 保存形式のモデレーション状態
#[derive(Debug, Clone)]
struct StoredFlag {
   reason_flagged: Option<FlagReason>,
   is_hidden:      bool,
}

/// インメモリ実装の ModerationRepository
///
/// フラグも非表示もない状態に戻ったコンテンツは記録から取り除く。
#[derive(Debug, Clone, Default)]
pub struct InMemoryModerationRepository {
   flags: Arc<Mutex<BTreeMap<ContentRef, StoredFlag>>>,
   muted: Arc<Mutex<BTreeSet<Username>>>,
}

impl InMemoryModerationRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// モデレーション状態を変換して書き戻す（記録がなければ初期状態から）
   fn modify(
      &self,
      content: ContentRef,
      f: impl FnOnce(ModerationFlag) -> ModerationFlag,
   ) -> Result<ModerationFlag, InfraError> {
      let mut flags = lock(&self.flags, "moderation flag")?;
      let current = flags
         .remove(&content)
         .map_or_else(|| ModerationFlag::clear(content), |stored| restore(content, stored));
      let updated = f(current);
      if !updated.is_clear() {
         flags.insert(
            content,
            StoredFlag {
               reason_flagged: updated.reason_flagged().cloned(),
               is_hidden:      updated.is_hidden(),
            },
         );
      }
      Ok(updated)
   }

   fn filter_flags(
      &self,
      kind: ContentKind,
      predicate: impl Fn(&ModerationFlag) -> bool,
   ) -> Result<Vec<ModerationFlag>, InfraError> {
      Ok(lock(&self.flags, "moderation flag")?
         .iter()
         .filter(|(content, _)| content.kind == kind)
         .map(|(content, stored)| restore(*content, stored.clone()))
         .filter(predicate)
         .collect())
   }
}

fn restore(content: ContentRef, stored: StoredFlag) -> ModerationFlag {
   ModerationFlag::from_parts(content, stored.reason_flagged, stored.is_hidden)
}

#[async_trait]
impl ModerationRepository for InMemoryModerationRepository {
   async fn find_flag(&self, content: ContentRef) -> Result<Option<ModerationFlag>, InfraError> {
      Ok(lock(&self.flags, "moderation flag")?
         .get(&content)
         .cloned()
         .map(|stored| restore(content, stored)))
   }

   async fn set_flag(
      &self,
      content: ContentRef,
      reason: &FlagReason,
   ) -> Result<ModerationFlag, InfraError> {
      let reason = reason.clone();
      self.modify(content, |flag| flag.flagged(reason))
   }

   async fn unset_flag(&self, content: ContentRef) -> Result<ModerationFlag, InfraError> {
      self.modify(content, ModerationFlag::unflagged)
   }

   async fn set_hidden(&self, content: ContentRef) -> Result<ModerationFlag, InfraError> {
      self.modify(content, ModerationFlag::hidden)
   }

   async fn unset_hidden(&self, content: ContentRef) -> Result<ModerationFlag, InfraError> {
      self.modify(content, ModerationFlag::unhidden)
   }

   async fn find_flagged(&self, kind: ContentKind) -> Result<Vec<ModerationFlag>, InfraError> {
      self.filter_flags(kind, ModerationFlag::is_flagged)
   }

   async fn find_hidden(&self, kind: ContentKind) -> Result<Vec<ModerationFlag>, InfraError> {
      self.filter_flags(kind, ModerationFlag::is_hidden)
   }

   async fn set_muted(&self, username: &Username) -> Result<(), InfraError> {
      lock(&self.muted, "mute")?.insert(username.clone());
      Ok(())
   }

   async fn unset_muted(&self, username: &Username) -> Result<(), InfraError> {
      lock(&self.muted, "mute")?.remove(username);
      Ok(())
   }

   async fn is_muted(&self, username: &Username) -> Result<bool, InfraError> {
      Ok(lock(&self.muted, "mute")?.contains(username))
   }

   async fn find_muted_users(&self) -> Result<Vec<Username>, InfraError> {
      Ok(lock(&self.muted, "mute")?.iter().cloned().collect())
   }
}
