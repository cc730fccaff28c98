//! # Core Service サーバー
//!
//! Q&A フォーラムのビジネスロジックを実行する内部サービス。
//!
//! ## 役割
//!
//! - **入力検証**: パスワード強度・氏名形式の検証
//! - **ロール申請**: 申請の受付、審査キューへの振り分け、承認・却下
//! - **パスワードリセット**: ワンタイムコードの発行と再設定
//! - **モデレーション**: フラグ・非表示・ミュート
//!
//! 画面を持つクライアントはこのサービスの内部 API を呼び出す。
//! データはプロセス内のインメモリストアに保持する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CORE_HOST` | No | バインドする IP アドレス（デフォルト: `0.0.0.0`、IPv6 は `::`） |
//! | `CORE_PORT` | **Yes** | ポート番号 |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,campusqa=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! CORE_PORT=13001 cargo run -p campusqa-core-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use campusqa_core_service::{
   app::{AppDependencies, build_router},
   config::CoreConfig,
};
use campusqa_domain::clock::SystemClock;
use campusqa_infra::{
   Argon2PasswordHasher,
   repository::{
      InMemoryModerationRepository,
      InMemoryPasswordResetRepository,
      InMemoryRoleRequestRepository,
      InMemoryUserRepository,
   },
};
use campusqa_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Core Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let config = CoreConfig::from_env()?;

   init_tracing(&TracingConfig::new("core-service", config.log_format));

   let addr = SocketAddr::new(config.host, config.port);
   tracing::info!("Core Service サーバーを起動します: {}", addr);

   let deps = AppDependencies {
      user_repository:           Arc::new(InMemoryUserRepository::new()),
      role_request_repository:   Arc::new(InMemoryRoleRequestRepository::new()),
      password_reset_repository: Arc::new(InMemoryPasswordResetRepository::new()),
      moderation_repository:     Arc::new(InMemoryModerationRepository::new()),
      password_hasher:           Arc::new(Argon2PasswordHasher::new()?),
      clock:                     Arc::new(SystemClock),
   };
   let app = build_router(deps);

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Core Service サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
