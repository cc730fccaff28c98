//! # ユーザー
//!
//! フォーラム利用者のエンティティと、それに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Username`] | ユーザー名 | ログイン ID。ユーザーの一意識別子を兼ねる |
//! | [`PersonName`] | 氏名 | 姓・名。英字のみ 3〜32 文字 |
//! | [`User`] | ユーザー | ロールとパスワードハッシュを持つ利用者 |
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use campusqa_domain::{user::{PersonName, Username}, validator::NameField};
//!
//! let username = Username::new("alice")?;
//! let first = PersonName::new("Alice", NameField::First)?;
//!
//! assert_eq!(username.as_str(), "alice");
//! assert_eq!(first.as_str(), "Alice");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
   password::PasswordHash,
   role::RoleSet,
   validator::{NameField, NameValidationError, validate_name},
};

define_validated_string! {
   /// ユーザー名（値オブジェクト）
   ///
   /// 前後の空白を除去し、1〜32 文字を要求する。
   pub struct Username {
      label: "Username",
      max_length: 32,
   }
}

/// 氏名（値オブジェクト）
///
/// [`validate_name`] を通過した姓または名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
   /// 形式を検証して氏名を作成する
   ///
   /// # Errors
   ///
   /// 形式に違反する場合は [`NameValidationError`] を返す。
   pub fn new(value: impl Into<String>, field: NameField) -> Result<Self, NameValidationError> {
      let value = value.into();
      validate_name(&value, field)?;
      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `username` はシステム全体で一意
/// - `password_hash` は強度検証を通過したパスワードから生成されている
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
   username:      Username,
   first_name:    PersonName,
   last_name:     PersonName,
   roles:         RoleSet,
   password_hash: PasswordHash,
   created_at:    DateTime<Utc>,
}

/// ユーザーの新規作成パラメータ
pub struct NewUser {
   pub username:      Username,
   pub first_name:    PersonName,
   pub last_name:     PersonName,
   pub roles:         RoleSet,
   pub password_hash: PasswordHash,
   pub now:           DateTime<Utc>,
}

impl User {
   pub fn new(params: NewUser) -> Self {
      Self {
         username:      params.username,
         first_name:    params.first_name,
         last_name:     params.last_name,
         roles:         params.roles,
         password_hash: params.password_hash,
         created_at:    params.now,
      }
   }

   // Getter メソッド

   pub fn username(&self) -> &Username {
      &self.username
   }

   pub fn first_name(&self) -> &PersonName {
      &self.first_name
   }

   pub fn last_name(&self) -> &PersonName {
      &self.last_name
   }

   pub fn roles(&self) -> RoleSet {
      self.roles
   }

   pub fn password_hash(&self) -> &PasswordHash {
      &self.password_hash
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   // 不変更新メソッド

   /// ロールを置き換える
   pub fn with_roles(self, roles: RoleSet) -> Self {
      Self { roles, ..self }
   }

   /// パスワードハッシュを置き換える
   pub fn with_password_hash(self, password_hash: PasswordHash) -> Self {
      Self {
         password_hash,
         ..self
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};

   use super::*;
   use crate::{DomainError, role::Role};

   #[fixture]
   fn user() -> User {
      User::new(NewUser {
         username:      Username::new("alice").unwrap(),
         first_name:    PersonName::new("Alice", NameField::First).unwrap(),
         last_name:     PersonName::new("Smith", NameField::Last).unwrap(),
         roles:         RoleSet::only(Role::Student),
         password_hash: PasswordHash::new("$argon2id$v=19$..."),
         now:           DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
      })
   }

   #[rstest]
   fn test_ユーザー名は前後の空白を除去する() {
      assert_eq!(Username::new("  bob ").unwrap().as_str(), "bob");
   }

   #[rstest]
   #[case("")]
   #[case("   ")]
   fn test_空のユーザー名はエラー(#[case] value: &str) {
      assert_eq!(
         Username::new(value),
         Err(DomainError::Validation("Username is required".to_string()))
      );
   }

   #[rstest]
   fn test_33文字のユーザー名はエラー() {
      assert!(Username::new("a".repeat(33)).is_err());
      assert!(Username::new("a".repeat(32)).is_ok());
   }

   #[rstest]
   fn test_氏名は形式検証を通過した値のみ作成できる() {
      assert!(PersonName::new("Bob", NameField::First).is_ok());
      assert!(PersonName::new("Al", NameField::First).is_err());
      assert!(PersonName::new("Bob3", NameField::Last).is_err());
   }

   #[rstest]
   fn test_with_rolesでロールだけが置き換わる(user: User) {
      let roles: RoleSet = [Role::Student, Role::Reviewer].into_iter().collect();
      let updated = user.clone().with_roles(roles);

      assert_eq!(updated.roles(), roles);
      assert!(updated.roles().contains(Role::Reviewer));
      assert_eq!(updated.username(), user.username());
      assert_eq!(updated.password_hash(), user.password_hash());
   }

   #[rstest]
   fn test_with_password_hashでハッシュだけが置き換わる(user: User) {
      let updated = user
         .clone()
         .with_password_hash(PasswordHash::new("$argon2id$new"));

      assert_eq!(updated.password_hash().as_str(), "$argon2id$new");
      assert_eq!(updated.roles(), user.roles());
   }
}
