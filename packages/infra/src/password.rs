//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。

use argon2::{
   Algorithm,
   Argon2,
   Params,
   PasswordHasher as _,
   PasswordVerifier as _,
   Version,
   password_hash::{PasswordHash as Argon2PasswordHash, SaltString},
};
use campusqa_domain::password::{NewPassword, PasswordHash, PasswordVerifyResult, PlainPassword};
use rand::Rng;

use crate::InfraError;

/// ソルトのバイト長
const SALT_LENGTH: usize = 16;

/// パスワードのハッシュ化と検証を担当するトレイト
///
/// ハッシュ化できるのは強度検証を通過した [`NewPassword`] のみ。
pub trait PasswordHasher: Send + Sync {
   /// パスワードをハッシュ化する
   ///
   /// # Errors
   ///
   /// - ハッシュ計算に失敗した場合
   fn hash(&self, password: &NewPassword) -> Result<PasswordHash, InfraError>;

   /// パスワードを検証する
   ///
   /// # Errors
   ///
   /// - 不正なハッシュ形式の場合
   fn verify(
      &self,
      password: &PlainPassword,
      hash: &PasswordHash,
   ) -> Result<PasswordVerifyResult, InfraError>;
}

/// Argon2id による実装
///
/// OWASP 推奨パラメータ（RFC 9106）を使用:
/// - Memory: 64 MB
/// - Iterations: 1
/// - Parallelism: 1
pub struct Argon2PasswordHasher {
   argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
   /// # Errors
   ///
   /// - Argon2 パラメータが不正な場合
   pub fn new() -> Result<Self, InfraError> {
      let params = Params::new(
         65536, // memory (KB) = 64 MB
         1,     // iterations
         1,     // parallelism
         None,  // output length (default: 32)
      )
      .map_err(|e| InfraError::unexpected(format!("invalid Argon2 parameters: {e}")))?;

      Ok(Self {
         argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
      })
   }
}

impl PasswordHasher for Argon2PasswordHasher {
   fn hash(&self, password: &NewPassword) -> Result<PasswordHash, InfraError> {
      let mut salt_bytes = [0u8; SALT_LENGTH];
      rand::rng().fill(&mut salt_bytes);
      let salt = SaltString::encode_b64(&salt_bytes)
         .map_err(|e| InfraError::unexpected(format!("failed to encode salt: {e}")))?;

      let hash = self
         .argon2
         .hash_password(password.as_plain().as_str().as_bytes(), &salt)
         .map_err(|e| InfraError::unexpected(format!("failed to hash password: {e}")))?;

      Ok(PasswordHash::new(hash.to_string()))
   }

   fn verify(
      &self,
      password: &PlainPassword,
      hash: &PasswordHash,
   ) -> Result<PasswordVerifyResult, InfraError> {
      let parsed = Argon2PasswordHash::new(hash.as_str())
         .map_err(|e| InfraError::unexpected(format!("malformed password hash: {e}")))?;

      let matched = self
         .argon2
         .verify_password(password.as_str().as_bytes(), &parsed)
         .is_ok();

      Ok(PasswordVerifyResult::from(matched))
   }
}

#[cfg(test)]
mod tests {
   use rstest::{fixture, rstest};

   use super::*;

   #[fixture]
   fn hasher() -> Argon2PasswordHasher {
      Argon2PasswordHasher::new().unwrap()
   }

   fn new_password(value: &str) -> NewPassword {
      NewPassword::new(PlainPassword::new(value)).unwrap()
   }

   #[rstest]
   fn test_ハッシュ化したパスワードを検証できる(hasher: Argon2PasswordHasher) {
      let hash = hasher.hash(&new_password("Abcdef1!")).unwrap();

      assert!(hash.as_str().starts_with("$argon2id$v=19$m=65536,t=1,p=1$"));
      let result = hasher
         .verify(&PlainPassword::new("Abcdef1!"), &hash)
         .unwrap();
      assert!(result.is_match());
   }

   #[rstest]
   fn test_異なるパスワードは一致しない(hasher: Argon2PasswordHasher) {
      let hash = hasher.hash(&new_password("Abcdef1!")).unwrap();

      let result = hasher
         .verify(&PlainPassword::new("Abcdef1?"), &hash)
         .unwrap();

      assert_eq!(result, PasswordVerifyResult::Mismatch);
   }

   #[rstest]
   fn test_同じパスワードでもソルトが異なる(hasher: Argon2PasswordHasher) {
      let first = hasher.hash(&new_password("Abcdef1!")).unwrap();
      let second = hasher.hash(&new_password("Abcdef1!")).unwrap();

      assert_ne!(first, second);
   }

   #[rstest]
   fn test_不正なハッシュ形式はエラー(hasher: Argon2PasswordHasher) {
      let result = hasher.verify(
         &PlainPassword::new("Abcdef1!"),
         &PasswordHash::new("not-a-valid-hash"),
      );

      assert!(result.is_err());
   }
}
