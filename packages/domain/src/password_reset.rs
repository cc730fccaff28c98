//! # パスワードリセット
//!
//! ワンタイムコードによるパスワード再設定の申請を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`OneTimeCode`] | ワンタイムコード | 英小文字 10 文字の使い捨てトークン |
//! | [`PasswordResetRequest`] | リセット申請 | ユーザー名ごとに高々1件存在する有効な申請 |
//!
//! ## 使用例
//!
//! ```rust
//! use campusqa_domain::password_reset::OneTimeCode;
//!
//! let code = OneTimeCode::generate(&mut rand::rng());
//!
//! assert_eq!(code.as_str().len(), 10);
//! assert!(code.matches(code.as_str()));
//! assert!(!code.matches("wrongcode!"));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use subtle::ConstantTimeEq;

use crate::{DomainError, user::Username};

/// ワンタイムコードの文字数
pub const ONE_TIME_CODE_LENGTH: usize = 10;

/// ワンタイムコード（値オブジェクト）
///
/// 英小文字 `a`〜`z` ちょうど 10 文字。各文字は一様分布から独立に選ばれる。
///
/// # セキュリティ
///
/// - Debug 出力ではコードをマスクする
/// - 入力値との比較は定数時間で行う
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl fmt::Debug for OneTimeCode {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_tuple("OneTimeCode").field(&"[REDACTED]").finish()
   }
}

impl OneTimeCode {
   /// 乱数生成器から新しいコードを生成する
   pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
      let code = (0..ONE_TIME_CODE_LENGTH)
         .map(|_| char::from(rng.random_range(b'a'..=b'z')))
         .collect();
      Self(code)
   }

   /// 保存済みの値からコードを復元する
   ///
   /// # Errors
   ///
   /// 英小文字 10 文字でない場合は `DomainError::Validation`。
   pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();
      let well_formed = value.len() == ONE_TIME_CODE_LENGTH
         && value.bytes().all(|byte| byte.is_ascii_lowercase());
      if !well_formed {
         return Err(DomainError::Validation(format!(
            "one-time code must be {ONE_TIME_CODE_LENGTH} lowercase letters"
         )));
      }
      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   /// 提出されたコードと一致するかどうか（定数時間比較）
   pub fn matches(&self, submitted: &str) -> bool {
      self.0.as_bytes().ct_eq(submitted.as_bytes()).into()
   }
}

/// パスワードリセット申請エンティティ
///
/// # 不変条件
///
/// - ユーザー名ごとに有効な申請は高々1件
/// - リセット完了時に削除され、同じコードは二度と使えない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
   username:   Username,
   code:       OneTimeCode,
   created_at: DateTime<Utc>,
}

impl PasswordResetRequest {
   pub fn new(username: Username, code: OneTimeCode, now: DateTime<Utc>) -> Self {
      Self {
         username,
         code,
         created_at: now,
      }
   }

   pub fn username(&self) -> &Username {
      &self.username
   }

   pub fn code(&self) -> &OneTimeCode {
      &self.code
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   /// 提出されたコードでこの申請を使えるかどうか
   pub fn accepts(&self, submitted: &str) -> bool {
      self.code.matches(submitted)
   }
}
