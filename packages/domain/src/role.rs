//! # ロール（役割）
//!
//! フォーラム利用者のロールと、その集合を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Role`] | ロール | Admin / Student / Reviewer / Instructor / Staff の閉じた列挙 |
//! | [`RoleSet`] | ロール集合 | ユーザーが保持する、または申請するロールの集合 |
//! | [`RoleQueue`] | 審査キュー | ロール申請を審査する担当（Instructor または Admin） |
//!
//! ## 設計方針
//!
//! - **位置インデックスを使わない**: ロールは enum で表現し、集合はビット集合を
//!   [`RoleSet`] に閉じ込める。呼び出し側が添字を扱うことはない
//! - **表示は集合の走査のみ**: [`RoleSet`] の `Display` は保持しているロールだけを
//!   正規順に連結する
//!
//! ## 使用例
//!
//! ```rust
//! use campusqa_domain::role::{Role, RoleQueue, RoleSet};
//!
//! let requested: RoleSet = [Role::Student, Role::Reviewer].into_iter().collect();
//!
//! assert_eq!(requested.to_string(), "Student, Reviewer");
//! assert_eq!(RoleQueue::for_roles(requested), RoleQueue::Instructor);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// ロール
///
/// 宣言順が正規順となり、[`RoleSet`] の走査・表示はこの順に従う。
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
pub enum Role {
   Admin,
   Student,
   Reviewer,
   Instructor,
   Staff,
}

impl Role {
   /// 全ロール（正規順）
   pub const ALL: [Role; 5] = [
      Role::Admin,
      Role::Student,
      Role::Reviewer,
      Role::Instructor,
      Role::Staff,
   ];

   /// 画面表示用のラベル
   pub fn label(&self) -> &'static str {
      match self {
         Self::Admin => "Admin",
         Self::Student => "Student",
         Self::Reviewer => "Reviewer",
         Self::Instructor => "Instructor",
         Self::Staff => "Staff",
      }
   }

   fn bit(self) -> u8 {
      1 << (self as u8)
   }
}

/// ロール集合（値オブジェクト）
///
/// 5 種類のロールをビット集合で保持する。コピー可能で、比較・ハッシュは集合として行う。
/// JSON ではロール名の配列（正規順）として表現する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(u8);

impl RoleSet {
   /// 空の集合
   pub fn empty() -> Self {
      Self(0)
   }

   /// ロール1つだけの集合
   pub fn only(role: Role) -> Self {
      Self(role.bit())
   }

   /// ロールを追加する。新たに追加された場合は `true`
   pub fn insert(&mut self, role: Role) -> bool {
      let added = !self.contains(role);
      self.0 |= role.bit();
      added
   }

   /// ロールを取り除く。取り除かれた場合は `true`
   pub fn remove(&mut self, role: Role) -> bool {
      let removed = self.contains(role);
      self.0 &= !role.bit();
      removed
   }

   pub fn contains(&self, role: Role) -> bool {
      self.0 & role.bit() != 0
   }

   /// 和集合を返す
   pub fn union(self, other: RoleSet) -> Self {
      Self(self.0 | other.0)
   }

   pub fn is_empty(&self) -> bool {
      self.0 == 0
   }

   pub fn len(&self) -> usize {
      self.0.count_ones() as usize
   }

   /// 保持しているロールを正規順に走査する
   pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
      let set = *self;
      Role::ALL.into_iter().filter(move |role| set.contains(*role))
   }
}

impl FromIterator<Role> for RoleSet {
   fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
      let mut set = Self::empty();
      for role in iter {
         set.insert(role);
      }
      set
   }
}

impl From<Vec<Role>> for RoleSet {
   fn from(roles: Vec<Role>) -> Self {
      roles.into_iter().collect()
   }
}

impl From<RoleSet> for Vec<Role> {
   fn from(set: RoleSet) -> Self {
      set.iter().collect()
   }
}

impl fmt::Display for RoleSet {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      if self.is_empty() {
         return write!(f, "(none)");
      }
      let labels: Vec<&str> = self.iter().map(|role| role.label()).collect();
      write!(f, "{}", labels.join(", "))
   }
}

/// ロール申請の審査キュー
///
/// Reviewer ロールを含む申請は Instructor が審査し、それ以外は Admin が審査する。
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Hash,
   Serialize,
   Deserialize,
   strum::Display,
   strum::EnumString,
   strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleQueue {
   Instructor,
   Admin,
}

impl RoleQueue {
   /// 申請ロールから審査キューを決定する
   ///
   /// Reviewer が含まれていれば、他にどのロールが含まれていても Instructor キュー。
   pub fn for_roles(requested: RoleSet) -> Self {
      if requested.contains(Role::Reviewer) {
         Self::Instructor
      } else {
         Self::Admin
      }
   }

   /// このキューの申請を審査できるロール
   pub fn approver_role(&self) -> Role {
      match self {
         Self::Instructor => Role::Instructor,
         Self::Admin => Role::Admin,
      }
   }
}

#[cfg(test)]
mod tests {
   use std::str::FromStr;

   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   fn set(roles: &[Role]) -> RoleSet {
      roles.iter().copied().collect()
   }

   // RoleSet のテスト

   #[rstest]
   fn test_空集合は何も含まない() {
      let roles = RoleSet::empty();

      assert!(roles.is_empty());
      assert_eq!(roles.len(), 0);
      assert!(Role::ALL.iter().all(|role| !roles.contains(*role)));
   }

   #[rstest]
   fn test_insertは新規追加のときだけtrueを返す() {
      let mut roles = RoleSet::empty();

      assert!(roles.insert(Role::Staff));
      assert!(!roles.insert(Role::Staff));
      assert_eq!(roles.len(), 1);
   }

   #[rstest]
   fn test_removeは保持していたときだけtrueを返す() {
      let mut roles = set(&[Role::Admin, Role::Staff]);

      assert!(roles.remove(Role::Admin));
      assert!(!roles.remove(Role::Admin));
      assert_eq!(roles, RoleSet::only(Role::Staff));
   }

   #[rstest]
   fn test_unionは両方のロールを含む() {
      let merged = set(&[Role::Student]).union(set(&[Role::Reviewer, Role::Student]));

      assert_eq!(merged, set(&[Role::Student, Role::Reviewer]));
      assert!(merged.contains(Role::Reviewer));
      assert!(!merged.contains(Role::Admin));
   }

   #[rstest]
   fn test_iterは挿入順ではなく正規順で返す() {
      let roles = set(&[Role::Staff, Role::Admin, Role::Reviewer]);

      assert_eq!(
         roles.iter().collect::<Vec<_>>(),
         vec![Role::Admin, Role::Reviewer, Role::Staff]
      );
   }

   #[rstest]
   #[case(&[Role::Student], "Student")]
   #[case(&[Role::Reviewer, Role::Student], "Student, Reviewer")]
   #[case(&[Role::Staff, Role::Instructor, Role::Reviewer, Role::Student, Role::Admin], "Admin, Student, Reviewer, Instructor, Staff")]
   #[case(&[], "(none)")]
   fn test_displayは保持しているロールだけを表示する(
      #[case] roles: &[Role],
      #[case] expected: &str,
   ) {
      assert_eq!(set(roles).to_string(), expected);
   }

   #[rstest]
   fn test_jsonではロール名の配列になる() {
      let roles = set(&[Role::Reviewer, Role::Admin]);

      let json = serde_json::to_value(roles).unwrap();
      assert_eq!(json, serde_json::json!(["admin", "reviewer"]));

      let restored: RoleSet = serde_json::from_value(json).unwrap();
      assert_eq!(restored, roles);
   }

   #[rstest]
   fn test_ロール名の文字列変換() {
      assert_eq!(Role::from_str("instructor").unwrap(), Role::Instructor);
      assert_eq!(Role::Staff.to_string(), "staff");
      assert!(Role::from_str("moderator").is_err());
   }

   // RoleQueue のテスト

   #[rstest]
   #[case(&[Role::Reviewer], RoleQueue::Instructor)]
   #[case(&[Role::Reviewer, Role::Student], RoleQueue::Instructor)]
   #[case(&[Role::Reviewer, Role::Admin, Role::Staff], RoleQueue::Instructor)]
   #[case(&[Role::Student], RoleQueue::Admin)]
   #[case(&[Role::Instructor, Role::Staff], RoleQueue::Admin)]
   #[case(&[Role::Admin], RoleQueue::Admin)]
   fn test_reviewerを含む申請はinstructorキューに振り分けられる(
      #[case] roles: &[Role],
      #[case] expected: RoleQueue,
   ) {
      assert_eq!(RoleQueue::for_roles(set(roles)), expected);
   }

   #[rstest]
   #[case(RoleQueue::Instructor, Role::Instructor)]
   #[case(RoleQueue::Admin, Role::Admin)]
   fn test_審査キューごとの審査ロール(#[case] queue: RoleQueue, #[case] expected: Role) {
      assert_eq!(queue.approver_role(), expected);
   }
}
