//! # 入力バリデータ
//!
//! パスワード強度と氏名形式を検証する、状態を持たない文字走査バリデータ。
//!
//! どちらも入力を先頭から一度だけ走査する有限状態の検証で、
//! 走査中の状態は呼び出しごとのローカル変数に閉じている。
//! 同じ入力には常に同じ結果を返し、スレッド間で共有される可変状態は存在しない。
//!
//! ## モジュール構成
//!
//! - [`password_rules`] - パスワード強度の検証
//! - [`name_rules`] - 姓・名の形式の検証
//!
//! ## 使用例
//!
//! ```rust
//! use campusqa_domain::validator::{NameField, validate_name, validate_password};
//!
//! assert!(validate_password("Abcdef1!").is_ok());
//! assert!(validate_name("Bob", NameField::First).is_ok());
//! ```

pub mod name_rules;
pub mod password_rules;

pub use name_rules::{NameField, NameValidationError, validate_name};
pub use password_rules::{PasswordRequirement, PasswordValidationError, validate_password};

/// 検証失敗の分類
///
/// 呼び出し側（表示層）がメッセージ文字列に依存せず分岐できるようにする。
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValidationErrorKind {
   /// 入力が空
   EmptyInput,
   /// 許可されていない文字を含む
   InvalidCharacter,
   /// 長さが許容範囲外
   LengthOutOfRange,
   /// 長さ以外のパスワード強度要件を満たさない
   WeakPassword,
}
