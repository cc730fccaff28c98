//! # パスワード
//!
//! パスワード関連の値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | 画面から受け取った未検証の入力値 |
//! | [`NewPassword`] | 新パスワード | 強度検証を通過した平文パスワード |
//! | [`PasswordHash`] | パスワードハッシュ | 永続化用のハッシュ値 |
//! | [`PasswordVerifyResult`] | 検証結果 | ハッシュとの照合の成否 |

use crate::validator::{PasswordValidationError, validate_password};

/// 平文パスワード（未検証の入力値）
///
/// # セキュリティ
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
   }
}

impl PlainPassword {
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }

   /// 確認入力と一致するかどうか
   pub fn is_same_as(&self, confirmation: &PlainPassword) -> bool {
      self.0 == confirmation.0
   }
}

/// 新パスワード
///
/// [`validate_password`] を通過した平文パスワードだけがこの型になる。
/// ハッシュ化の入力はこの型に限定し、未検証のパスワードが保存される経路をなくす。
#[derive(Clone, Debug)]
pub struct NewPassword(PlainPassword);

impl NewPassword {
   /// 強度を検証して新パスワードを作成する
   ///
   /// # Errors
   ///
   /// 強度要件を満たさない場合は [`PasswordValidationError`] を返す。
   pub fn new(password: PlainPassword) -> Result<Self, PasswordValidationError> {
      validate_password(password.as_str())?;
      Ok(Self(password))
   }

   pub fn as_plain(&self) -> &PlainPassword {
      &self.0
   }
}

/// パスワードハッシュ（永続化用）
///
/// Argon2id の PHC 文字列をラップする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
   pub fn new(hash: impl Into<String>) -> Self {
      Self(hash.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// パスワード検証結果
///
/// bool ではなく専用の型を使うことで、意図が明確になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
   /// パスワードが一致した
   Match,
   /// パスワードが一致しなかった
   Mismatch,
}

impl PasswordVerifyResult {
   pub fn is_match(&self) -> bool {
      matches!(self, Self::Match)
   }
}

impl From<bool> for PasswordVerifyResult {
   fn from(matched: bool) -> Self {
      if matched { Self::Match } else { Self::Mismatch }
   }
}
