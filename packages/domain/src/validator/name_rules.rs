//! # 姓・名の形式の検証
//!
//! 英字（`A-Z`, `a-z`）のみで構成され、3 文字以上 32 文字以下であることを要求する。
//! 英字以外の文字は最初の1文字で検証を打ち切り、その位置を記録する。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ValidationErrorKind;

/// 氏名の最小文字数
pub const NAME_MIN_LENGTH: usize = 3;

/// 氏名の最大文字数
pub const NAME_MAX_LENGTH: usize = 32;

/// 検証対象のフィールド
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NameField {
   /// 名
   First,
   /// 姓
   Last,
}

impl NameField {
   /// エラーメッセージに使うラベル
   pub fn label(&self) -> &'static str {
      match self {
         Self::First => "First name",
         Self::Last => "Last name",
      }
   }
}

/// 氏名検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameValidationError {
   /// 入力が空
   #[error("{} field is empty", .field.label())]
   Empty { field: NameField },

   /// 英字以外の文字を検出した
   #[error(
      "{}: only A-Z, a-z allowed (invalid character {character:?} at position {position})",
      .field.label()
   )]
   InvalidCharacter {
      field:     NameField,
      /// 0 始まりの文字位置
      position:  usize,
      character: char,
   },

   /// 長さが範囲外
   #[error(
      "{} must be between {} and {} characters (got {length})",
      .field.label(),
      NAME_MIN_LENGTH,
      NAME_MAX_LENGTH
   )]
   Length { field: NameField, length: usize },
}

impl NameValidationError {
   /// エラーの分類を返す
   pub fn kind(&self) -> ValidationErrorKind {
      match self {
         Self::Empty { .. } => ValidationErrorKind::EmptyInput,
         Self::InvalidCharacter { .. } => ValidationErrorKind::InvalidCharacter,
         Self::Length { .. } => ValidationErrorKind::LengthOutOfRange,
      }
   }

   /// 検証対象のフィールド
   pub fn field(&self) -> NameField {
      match self {
         Self::Empty { field } | Self::InvalidCharacter { field, .. } | Self::Length { field, .. } => {
            *field
         }
      }
   }
}

/// 姓または名の形式を検証する
///
/// # Errors
///
/// - [`NameValidationError::Empty`]: 入力が空
/// - [`NameValidationError::InvalidCharacter`]: 英字以外を含む
/// - [`NameValidationError::Length`]: 3 文字未満または 32 文字超
pub fn validate_name(candidate: &str, field: NameField) -> Result<(), NameValidationError> {
   if candidate.is_empty() {
      return Err(NameValidationError::Empty { field });
   }

   let mut length = 0;
   for (position, character) in candidate.chars().enumerate() {
      if !character.is_ascii_alphabetic() {
         return Err(NameValidationError::InvalidCharacter {
            field,
            position,
            character,
         });
      }
      length += 1;
   }

   if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&length) {
      return Err(NameValidationError::Length { field, length });
   }

   Ok(())
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case("Bob", NameField::First)]
   #[case("Smith", NameField::Last)]
   #[case("abcdefghijklmnopqrstuvwxyzABCDEF", NameField::Last)]
   fn test_英字のみで長さが範囲内なら成功する(#[case] candidate: &str, #[case] field: NameField) {
      assert_eq!(validate_name(candidate, field), Ok(()));
   }

   #[rstest]
   #[case(NameField::First, "First name field is empty")]
   #[case(NameField::Last, "Last name field is empty")]
   fn test_空入力はフィールド別のメッセージで失敗する(
      #[case] field: NameField,
      #[case] message: &str,
   ) {
      let err = validate_name("", field).unwrap_err();

      assert_eq!(err, NameValidationError::Empty { field });
      assert_eq!(err.to_string(), message);
      assert_eq!(err.kind(), ValidationErrorKind::EmptyInput);
   }

   #[rstest]
   fn test_数字を含む名前は不正文字で失敗する() {
      let err = validate_name("Bob3", NameField::First).unwrap_err();

      assert_eq!(
         err,
         NameValidationError::InvalidCharacter {
            field:     NameField::First,
            position:  3,
            character: '3',
         }
      );
      assert_eq!(
         err.to_string(),
         "First name: only A-Z, a-z allowed (invalid character '3' at position 3)"
      );
   }

   #[rstest]
   #[case("Mary Ann", 4, ' ')]
   #[case("O'Neil", 1, '\'')]
   #[case("Zoë", 2, 'ë')]
   fn test_英字以外は最初の位置を記録する(
      #[case] candidate: &str,
      #[case] position: usize,
      #[case] character: char,
   ) {
      let err = validate_name(candidate, NameField::Last).unwrap_err();

      assert_eq!(
         err,
         NameValidationError::InvalidCharacter {
            field: NameField::Last,
            position,
            character,
         }
      );
   }

   #[rstest]
   fn test_不正文字は長さ違反より優先される() {
      let err = validate_name("A1", NameField::First).unwrap_err();

      assert_eq!(err.kind(), ValidationErrorKind::InvalidCharacter);
   }

   #[rstest]
   #[case("Al", 2)]
   #[case("abcdefghijklmnopqrstuvwxyzABCDEFG", 33)]
   fn test_長さが範囲外なら失敗する(#[case] candidate: &str, #[case] length: usize) {
      let err = validate_name(candidate, NameField::First).unwrap_err();

      assert_eq!(
         err,
         NameValidationError::Length {
            field: NameField::First,
            length,
         }
      );
      assert_eq!(err.kind(), ValidationErrorKind::LengthOutOfRange);
      assert_eq!(err.field(), NameField::First);
   }
}
