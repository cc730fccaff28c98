//! # パスワード強度の検証
//!
//! 入力を1文字ずつ走査し、各文字を次のいずれかに分類する:
//!
//! | 分類 | 文字 |
//! |------|------|
//! | 英大文字 | `A-Z` |
//! | 英小文字 | `a-z` |
//! | 数字 | `0-9` |
//! | 特殊文字 | `` ~`!@#$%^&*()_-+{}[]|:,.?/ `` |
//! | その他の許可文字 | `=\"'<>` |
//!
//! どれにも該当しない文字が現れた時点で検証を打ち切る（fail-fast）。
//! 走査を終えたら、英大文字・英小文字・数字・特殊文字をそれぞれ1つ以上含み、
//! 長さが 8 文字以上 16 文字以下であることを要求する。
//! 「その他の許可文字」は使用できるが、特殊文字の要件は満たさない。

use std::fmt;

use thiserror::Error;

use super::ValidationErrorKind;

/// パスワードの最小文字数
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// パスワードの最大文字数
pub const PASSWORD_MAX_LENGTH: usize = 16;

/// 特殊文字として数える文字
const SPECIAL_CHARACTERS: &str = "~`!@#$%^&*()_-+{}[]|:,.?/";

/// 使用は許可するが特殊文字としては数えない文字
const OTHER_CHARACTERS: &str = "=\\\"'<>";

/// 文字の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
   Upper,
   Lower,
   Digit,
   Special,
   Other,
}

impl CharClass {
   /// 文字を分類する。許可されていない文字は `None`
   fn of(character: char) -> Option<Self> {
      match character {
         'A'..='Z' => Some(Self::Upper),
         'a'..='z' => Some(Self::Lower),
         '0'..='9' => Some(Self::Digit),
         c if SPECIAL_CHARACTERS.contains(c) => Some(Self::Special),
         c if OTHER_CHARACTERS.contains(c) => Some(Self::Other),
         _ => None,
      }
   }
}

/// パスワード強度の要件
///
/// 検証失敗時は満たされなかった要件がこの宣言順に並ぶ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRequirement {
   /// 英大文字を含む
   UpperCase,
   /// 英小文字を含む
   LowerCase,
   /// 数字を含む
   Digit,
   /// 特殊文字を含む
   SpecialCharacter,
   /// 最小文字数以上
   MinimumLength,
   /// 最大文字数以下
   MaximumLengthExceeded,
}

impl PasswordRequirement {
   /// 長さに関する要件かどうか
   pub fn is_length_rule(&self) -> bool {
      matches!(self, Self::MinimumLength | Self::MaximumLengthExceeded)
   }
}

impl fmt::Display for PasswordRequirement {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Self::UpperCase => write!(f, "upper case letter"),
         Self::LowerCase => write!(f, "lower case letter"),
         Self::Digit => write!(f, "numeric digit"),
         Self::SpecialCharacter => write!(f, "special character"),
         Self::MinimumLength => {
            write!(f, "minimum length of {PASSWORD_MIN_LENGTH} characters")
         }
         Self::MaximumLengthExceeded => {
            write!(f, "maximum length of {PASSWORD_MAX_LENGTH} characters exceeded")
         }
      }
   }
}

/// パスワード検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordValidationError {
   /// 入力が空
   #[error("password field empty.")]
   Empty,

   /// 許可されていない文字を検出した（最初の1文字で打ち切る）
   #[error("invalid character {character:?} at position {position}")]
   InvalidCharacter {
      /// 0 始まりの文字位置
      position:  usize,
      character: char,
   },

   /// 走査は完了したが要件を満たさない
   #[error("password requirements not satisfied: {}", join_requirements(.0))]
   Unsatisfied(Vec<PasswordRequirement>),
}

fn join_requirements(requirements: &[PasswordRequirement]) -> String {
   requirements
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(", ")
}

impl PasswordValidationError {
   /// エラーの分類を返す
   pub fn kind(&self) -> ValidationErrorKind {
      match self {
         Self::Empty => ValidationErrorKind::EmptyInput,
         Self::InvalidCharacter { .. } => ValidationErrorKind::InvalidCharacter,
         Self::Unsatisfied(missing) if missing.iter().all(PasswordRequirement::is_length_rule) => {
            ValidationErrorKind::LengthOutOfRange
         }
         Self::Unsatisfied(_) => ValidationErrorKind::WeakPassword,
      }
   }

   /// 満たされなかった要件（`Unsatisfied` 以外は空）
   pub fn unsatisfied(&self) -> &[PasswordRequirement] {
      match self {
         Self::Unsatisfied(missing) => missing,
         _ => &[],
      }
   }
}

/// 走査中の状態
///
/// 呼び出しごとに生成し、呼び出し間で共有しない。
#[derive(Debug, Default)]
struct PasswordScan {
   saw_upper:       bool,
   saw_lower:       bool,
   saw_digit:       bool,
   saw_special:     bool,
   scanned:         usize,
   length_at_least: bool,
   length_over:     bool,
}

impl PasswordScan {
   fn record(&mut self, class: CharClass) {
      match class {
         CharClass::Upper => self.saw_upper = true,
         CharClass::Lower => self.saw_lower = true,
         CharClass::Digit => self.saw_digit = true,
         CharClass::Special => self.saw_special = true,
         CharClass::Other => {}
      }

      self.scanned += 1;
      if self.scanned >= PASSWORD_MIN_LENGTH {
         self.length_at_least = true;
      }
      if self.scanned > PASSWORD_MAX_LENGTH {
         self.length_over = true;
      }
   }

   fn unsatisfied(&self) -> Vec<PasswordRequirement> {
      [
         (!self.saw_upper, PasswordRequirement::UpperCase),
         (!self.saw_lower, PasswordRequirement::LowerCase),
         (!self.saw_digit, PasswordRequirement::Digit),
         (!self.saw_special, PasswordRequirement::SpecialCharacter),
         (!self.length_at_least, PasswordRequirement::MinimumLength),
         (self.length_over, PasswordRequirement::MaximumLengthExceeded),
      ]
      .into_iter()
      .filter_map(|(violated, requirement)| violated.then_some(requirement))
      .collect()
   }
}

/// パスワード強度を検証する
///
/// # Errors
///
/// - [`PasswordValidationError::Empty`]: 入力が空
/// - [`PasswordValidationError::InvalidCharacter`]: 許可されていない文字を含む
/// - [`PasswordValidationError::Unsatisfied`]: 強度要件を満たさない
pub fn validate_password(candidate: &str) -> Result<(), PasswordValidationError> {
   if candidate.is_empty() {
      return Err(PasswordValidationError::Empty);
   }

   let mut scan = PasswordScan::default();
   for (position, character) in candidate.chars().enumerate() {
      let class = CharClass::of(character).ok_or(PasswordValidationError::InvalidCharacter {
         position,
         character,
      })?;
      scan.record(class);
   }

   let missing = scan.unsatisfied();
   if missing.is_empty() {
      Ok(())
   } else {
      Err(PasswordValidationError::Unsatisfied(missing))
   }
}
