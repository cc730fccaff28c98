//! フォーラムテストビルダー
//!
//! インメモリリポジトリ・固定時刻・登録済みユーザーを揃えた
//! テスト用のユースケース一式を組み立てる。

use std::sync::Arc;

use axum::Router;
use campusqa_domain::{
   clock::ManualClock,
   password::PasswordHash,
   role::{Role, RoleSet},
   user::{NewUser, PersonName, User, Username},
   validator::NameField,
};
use campusqa_infra::{
   Argon2PasswordHasher,
   PasswordHasher,
   repository::{
      InMemoryModerationRepository,
      InMemoryPasswordResetRepository,
      InMemoryRoleRequestRepository,
      InMemoryUserRepository,
      UserRepository,
   },
};
use chrono::{DateTime, Utc};

use crate::{
   app::{AppDependencies, build_router},
   usecase::{
      AccountUseCaseImpl,
      ModerationUseCaseImpl,
      PasswordResetUseCaseImpl,
      RoleRequestUseCaseImpl,
   },
};

/// 事前登録ユーザーに設定するダミーのパスワードハッシュ
const SEEDED_PASSWORD_HASH: &str = "$argon2id$v=19$m=65536,t=1,p=1$seeded$seeded";

/// フォーラムテストのセットアップデータ
///
/// 各ユースケースと、状態を直接確認するためのリポジトリを保持する。
pub struct ForumTestSetup {
   pub account:             AccountUseCaseImpl,
   pub role_requests:       RoleRequestUseCaseImpl,
   pub password_resets:     PasswordResetUseCaseImpl,
   pub moderation:          ModerationUseCaseImpl,
   pub users:               Arc<InMemoryUserRepository>,
   pub role_request_repo:   Arc<InMemoryRoleRequestRepository>,
   pub password_reset_repo: Arc<InMemoryPasswordResetRepository>,
   pub moderation_repo:     Arc<InMemoryModerationRepository>,
   pub hasher:              Arc<dyn PasswordHasher>,
   pub clock:               Arc<ManualClock>,
   pub now:                 DateTime<Utc>,
}

impl ForumTestSetup {
   /// 同じリポジトリを共有するルーターを構築する
   pub fn router(&self) -> Router {
      build_router(AppDependencies {
         user_repository:           self.users.clone(),
         role_request_repository:   self.role_request_repo.clone(),
         password_reset_repository: self.password_reset_repo.clone(),
         moderation_repository:     self.moderation_repo.clone(),
         password_hasher:           self.hasher.clone(),
         clock:                     self.clock.clone(),
      })
   }
}

/// フォーラムテストビルダー
///
/// # 使用例
///
/// ```ignore
/// use campusqa_core_service::test_utils::ForumTestBuilder;
/// use campusqa_domain::role::Role;
///
/// #[tokio::test]
/// async fn test_example() {
///    let setup = ForumTestBuilder::new()
///       .with_user("admin", &[Role::Admin])
///       .build()
///       .await;
///
///    let result = setup.moderation.list_muted().await;
/// }
/// ```
pub struct ForumTestBuilder {
   now:   DateTime<Utc>,
   users: Vec<(String, RoleSet)>,
}

impl ForumTestBuilder {
   /// デフォルト値で新しいビルダーを作成
   pub fn new() -> Self {
      Self {
         now:   DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
         users: Vec::new(),
      }
   }

   /// 現在時刻を指定
   pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
      self.now = now;
      self
   }

   /// 事前登録するユーザーを追加
   ///
   /// 氏名は `Test User`、パスワードハッシュはダミー値で登録される。
   pub fn with_user(mut self, username: &str, roles: &[Role]) -> Self {
      self
         .users
         .push((username.to_string(), roles.iter().copied().collect()));
      self
   }

   /// ビルダーの now を取得
   pub fn now(&self) -> DateTime<Utc> {
      self.now
   }

   /// セットアップを構築する
   ///
   /// # Panics
   ///
   /// 事前登録ユーザーの名前が不正な場合
   pub async fn build(self) -> ForumTestSetup {
      let users = Arc::new(InMemoryUserRepository::new());
      let role_request_repo = Arc::new(InMemoryRoleRequestRepository::new());
      let password_reset_repo = Arc::new(InMemoryPasswordResetRepository::new());
      let moderation_repo = Arc::new(InMemoryModerationRepository::new());
      let hasher: Arc<dyn PasswordHasher> =
         Arc::new(Argon2PasswordHasher::new().expect("Argon2 パラメータが不正です"));
      let clock = Arc::new(ManualClock::new(self.now));

      for (username, roles) in self.users {
         let user = User::new(NewUser {
            username: Username::new(username).expect("ユーザー名が不正です"),
            first_name: PersonName::new("Test", NameField::First).expect("名が不正です"),
            last_name: PersonName::new("User", NameField::Last).expect("姓が不正です"),
            roles,
            password_hash: PasswordHash::new(SEEDED_PASSWORD_HASH),
            now: self.now,
         });
         users
            .insert(&user)
            .await
            .expect("ユーザーの事前登録に失敗しました");
      }

      ForumTestSetup {
         account: AccountUseCaseImpl::new(users.clone(), hasher.clone(), clock.clone()),
         role_requests: RoleRequestUseCaseImpl::new(
            users.clone(),
            role_request_repo.clone(),
            clock.clone(),
         ),
         password_resets: PasswordResetUseCaseImpl::new(
            users.clone(),
            password_reset_repo.clone(),
            hasher.clone(),
            clock.clone(),
         ),
         moderation: ModerationUseCaseImpl::new(users.clone(), moderation_repo.clone()),
         users,
         role_request_repo,
         password_reset_repo,
         moderation_repo,
         hasher,
         clock,
         now: self.now,
      }
   }
}

impl Default for ForumTestBuilder {
   fn default() -> Self {
      Self::new()
   }
}
