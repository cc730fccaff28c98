//! # モデレーション
//!
//! 投稿コンテンツのフラグ・非表示状態と、ユーザーのミュート状態を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`ContentKind`] | コンテンツ種別 | Question / Answer / Review |
//! | [`ContentRef`] | コンテンツ参照 | 種別と ID の組 |
//! | [`ModerationFlag`] | モデレーション状態 | フラグ（理由付き）と非表示の2つの独立したフラグ |
//! | [`MuteStatus`] | ミュート状態 | ユーザー単位の投稿禁止フラグ |
//!
//! ## 設計方針
//!
//! - フラグと非表示は独立。非表示にしてもフラグは立たず、その逆も同様
//! - すべての操作は集合操作として冪等。既にフラグ付きのコンテンツへのフラグは
//!   状態を変えず、最初の理由を保持する
//! - ミュートは既存コンテンツに波及しない

use serde::{Deserialize, Serialize};

use crate::user::Username;

/// コンテンツ種別
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Hash,
   PartialOrd,
   Ord,
   Serialize,
   Deserialize,
   strum::Display,
   strum::EnumString,
   strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
   Question,
   Answer,
   Review,
}

/// コンテンツ ID
///
/// 種別ごとに採番される整数 ID。
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Hash,
   PartialOrd,
   Ord,
   Serialize,
   Deserialize,
   derive_more::Display,
   derive_more::From,
)]
#[serde(transparent)]
pub struct ContentId(u64);

impl ContentId {
   pub fn new(value: u64) -> Self {
      Self(value)
   }

   pub fn as_u64(&self) -> u64 {
      self.0
   }
}

/// コンテンツ参照
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ContentRef {
   pub kind: ContentKind,
   pub id:   ContentId,
}

impl ContentRef {
   pub fn new(kind: ContentKind, id: ContentId) -> Self {
      Self { kind, id }
   }
}

impl std::fmt::Display for ContentRef {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}#{}", self.kind, self.id)
   }
}

define_validated_string! {
   /// フラグ理由（値オブジェクト）
   pub struct FlagReason {
      label: "Flag reason",
      max_length: 255,
   }
}

/// コンテンツのモデレーション状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationFlag {
   content:        ContentRef,
   is_flagged:     bool,
   reason_flagged: Option<FlagReason>,
   is_hidden:      bool,
}

impl ModerationFlag {
   /// フラグも非表示もない状態
   pub fn clear(content: ContentRef) -> Self {
      Self {
         content,
         is_flagged: false,
         reason_flagged: None,
         is_hidden: false,
      }
   }

   /// 永続化された値から復元する
   pub fn from_parts(
      content: ContentRef,
      reason_flagged: Option<FlagReason>,
      is_hidden: bool,
   ) -> Self {
      Self {
         content,
         is_flagged: reason_flagged.is_some(),
         reason_flagged,
         is_hidden,
      }
   }

   pub fn content(&self) -> ContentRef {
      self.content
   }

   pub fn is_flagged(&self) -> bool {
      self.is_flagged
   }

   pub fn reason_flagged(&self) -> Option<&FlagReason> {
      self.reason_flagged.as_ref()
   }

   pub fn is_hidden(&self) -> bool {
      self.is_hidden
   }

   /// フラグも非表示もない
   pub fn is_clear(&self) -> bool {
      !self.is_flagged && !self.is_hidden
   }

   /// フラグを立てる。既にフラグ付きなら最初の理由を保持する
   pub fn flagged(self, reason: FlagReason) -> Self {
      if self.is_flagged {
         return self;
      }
      Self {
         is_flagged: true,
         reason_flagged: Some(reason),
         ..self
      }
   }

   /// フラグを外す
   pub fn unflagged(self) -> Self {
      Self {
         is_flagged: false,
         reason_flagged: None,
         ..self
      }
   }

   pub fn hidden(self) -> Self {
      Self {
         is_hidden: true,
         ..self
      }
   }

   pub fn unhidden(self) -> Self {
      Self {
         is_hidden: false,
         ..self
      }
   }
}

/// ユーザーのミュート状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuteStatus {
   pub username: Username,
   pub is_muted: bool,
}

impl MuteStatus {
   pub fn muted(username: Username) -> Self {
      Self {
         username,
         is_muted: true,
      }
   }

   pub fn unmuted(username: Username) -> Self {
      Self {
         username,
         is_muted: false,
      }
   }
}

#[cfg(test)]
mod tests {
   use std::str::FromStr;

   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};

   use super::*;

   #[fixture]
   fn question() -> ContentRef {
      ContentRef::new(ContentKind::Question, ContentId::new(7))
   }

   fn reason(value: &str) -> FlagReason {
      FlagReason::new(value).unwrap()
   }

   #[rstest]
   fn test_初期状態はフラグも非表示もない(question: ContentRef) {
      let flag = ModerationFlag::clear(question);

      assert!(flag.is_clear());
      assert_eq!(flag.reason_flagged(), None);
   }

   #[rstest]
   fn test_フラグを立てると理由が記録される(question: ContentRef) {
      let flag = ModerationFlag::clear(question).flagged(reason("spam"));

      assert!(flag.is_flagged());
      assert!(!flag.is_hidden());
      assert_eq!(flag.reason_flagged(), Some(&reason("spam")));
   }

   #[rstest]
   fn test_フラグ済みへの再フラグは状態を変えない(question: ContentRef) {
      let flagged = ModerationFlag::clear(question).flagged(reason("spam"));

      let again = flagged.clone().flagged(reason("off topic"));

      assert_eq!(again, flagged);
   }

   #[rstest]
   fn test_フラグを外すと理由も消える(question: ContentRef) {
      let flag = ModerationFlag::clear(question)
         .flagged(reason("spam"))
         .unflagged();

      assert!(flag.is_clear());
      assert_eq!(flag.reason_flagged(), None);
   }

   #[rstest]
   fn test_非表示とフラグは独立している(question: ContentRef) {
      let hidden = ModerationFlag::clear(question).hidden();
      assert!(hidden.is_hidden());
      assert!(!hidden.is_flagged());

      let both = hidden.flagged(reason("abuse")).unhidden();
      assert!(!both.is_hidden());
      assert!(both.is_flagged());
   }

   #[rstest]
   fn test_非表示は冪等(question: ContentRef) {
      let once = ModerationFlag::clear(question).hidden();

      assert_eq!(once.clone().hidden(), once);
   }

   #[rstest]
   fn test_from_partsは理由の有無でフラグ状態を決める(question: ContentRef) {
      let flag = ModerationFlag::from_parts(question, Some(reason("spam")), true);

      assert!(flag.is_flagged());
      assert!(flag.is_hidden());
      assert!(!ModerationFlag::from_parts(question, None, false).is_flagged());
   }

   #[rstest]
   #[case("")]
   #[case("   ")]
   fn test_空のフラグ理由はエラー(#[case] value: &str) {
      assert!(FlagReason::new(value).is_err());
   }

   #[rstest]
   fn test_256文字のフラグ理由はエラー() {
      assert!(FlagReason::new("x".repeat(256)).is_err());
      assert!(FlagReason::new("x".repeat(255)).is_ok());
   }

   #[rstest]
   fn test_コンテンツ種別の文字列変換() {
      assert_eq!(ContentKind::from_str("answer").unwrap(), ContentKind::Answer);
      assert_eq!(ContentKind::Review.to_string(), "review");
      assert!(ContentKind::from_str("message").is_err());
   }

   #[rstest]
   fn test_コンテンツ参照の表示(question: ContentRef) {
      assert_eq!(question.to_string(), "question#7");
   }

   #[rstest]
   fn test_ミュート状態の作成() {
      let username = Username::new("bob").unwrap();

      assert!(MuteStatus::muted(username.clone()).is_muted);
      assert!(!MuteStatus::unmuted(username).is_muted);
   }
}
