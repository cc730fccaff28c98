//! ユースケース層の共通ヘルパー
//!
//! 文字列入力の値オブジェクトへの変換や権限チェックなど、
//! 複数のユースケースで繰り返されるパターンを共通化する。

use campusqa_domain::{
   role::{Role, RoleSet},
   user::Username,
};
use campusqa_infra::repository::UserRepository;

use crate::error::CoreError;

/// 入力文字列をユーザー名に変換する
///
/// 形式が不正なユーザー名は登録され得ないため、`UserNotFound` として扱う。
pub(crate) fn parse_existing_username(value: &str) -> Result<Username, CoreError> {
   Username::new(value).map_err(|_| CoreError::UserNotFound(value.to_string()))
}

/// 実行者が指定ロールのいずれかを保持していることを確認する
///
/// 実行者が存在しない場合も `Forbidden` を返す。
///
/// # 戻り値
///
/// 実行者のロール集合
pub(crate) async fn require_any_role(
   users: &dyn UserRepository,
   actor: &Username,
   allowed: &[Role],
   action: &str,
) -> Result<RoleSet, CoreError> {
   let roles = users.find_roles(actor).await?.unwrap_or_default();

   if !allowed.iter().any(|role| roles.contains(*role)) {
      tracing::warn!(actor = %actor, roles = %roles, action, "権限のない操作を拒否しました");
      let required: RoleSet = allowed.iter().copied().collect();
      return Err(CoreError::Forbidden(format!(
         "{action} requires one of: {required}"
      )));
   }
   Ok(roles)
}
