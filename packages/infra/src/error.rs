//! # インフラ層エラー定義
//!
//! データアクセス層で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Conflict, NotFound 等）
//!
//! convenience constructor でエラーを生成すると、その時点のスパン情報が
//! 自動的にキャプチャされる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Conflict { entity, id } => { /* 競合処理 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// 競合
   ///
   /// 一意制約違反、または条件付き更新の前提が崩れていた場合
   /// （解決済みのロール申請の再解決、使用済みリセット申請の削除など）。
   #[error("conflict on {entity} (id={id})")]
   Conflict {
      /// エンティティ名（例: "RoleRequest"）
      entity: String,
      /// エンティティの ID
      id:     String,
   },

   /// 更新対象が存在しない
   #[error("{entity} not found (id={id})")]
   NotFound { entity: String, id: String },

   /// 予期しないエラー
   ///
   /// ロックの poison、ハッシュ計算の失敗など。
   #[error("unexpected error: {0}")]
   Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
   /// エラー種別を取得する
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   /// SpanTrace を取得する
   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// Conflict バリアントの場合、entity と id を返す
   pub fn as_conflict(&self) -> Option<(&str, &str)> {
      match &self.kind {
         InfraErrorKind::Conflict { entity, id } => Some((entity, id)),
         _ => None,
      }
   }

   // ===== Convenience constructors =====

   fn capture(kind: InfraErrorKind) -> Self {
      Self {
         kind,
         span_trace: SpanTrace::capture(),
      }
   }

   /// 競合エラーを生成する
   pub fn conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
      Self::capture(InfraErrorKind::Conflict {
         entity: entity.into(),
         id:     id.into(),
      })
   }

   /// 更新対象が存在しないエラーを生成する
   pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
      Self::capture(InfraErrorKind::NotFound {
         entity: entity.into(),
         id:     id.into(),
      })
   }

   /// 予期しないエラーを生成する
   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self::capture(InfraErrorKind::Unexpected(msg.into()))
   }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      self.kind.source()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use tracing_subscriber::layer::SubscriberExt as _;

   use super::*;

   /// テスト用に ErrorLayer 付き subscriber を設定する
   fn with_error_layer(f: impl FnOnce()) {
      let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
      let _guard = tracing::subscriber::set_default(subscriber);
      f();
   }

   #[test]
   fn test_conflictでspan_traceがキャプチャされる() {
      with_error_layer(|| {
         let span = tracing::info_span!("test_update_status");
         let _enter = span.enter();

         let err = InfraError::conflict("RoleRequest", "RR-001");

         assert!(matches!(
            err.kind(),
            InfraErrorKind::Conflict { entity, id }
               if entity == "RoleRequest" && id == "RR-001"
         ));
         let trace_str = format!("{}", err.span_trace());
         assert!(
            trace_str.contains("test_update_status"),
            "SpanTrace がスパン名を含むこと: {trace_str}",
         );
      });
   }

   #[test]
   fn test_not_foundの種別とメッセージ() {
      let err = InfraError::not_found("User", "alice");

      assert!(matches!(err.kind(), InfraErrorKind::NotFound { .. }));
      assert_eq!(err.to_string(), "User not found (id=alice)");
   }

   #[test]
   fn test_unexpectedの種別() {
      let err = InfraError::unexpected("lock poisoned");

      assert!(matches!(
         err.kind(),
         InfraErrorKind::Unexpected(msg) if msg == "lock poisoned"
      ));
   }

   #[test]
   fn test_displayがinfra_error_kindのメッセージを出力する() {
      let err = InfraError::conflict("PasswordResetRequest", "alice");

      assert_eq!(
         format!("{err}"),
         "conflict on PasswordResetRequest (id=alice)"
      );
   }

   #[test]
   fn test_as_conflictでconflictの情報を取得できる() {
      let err = InfraError::conflict("RoleRequest", "RR-001");

      assert_eq!(err.as_conflict(), Some(("RoleRequest", "RR-001")));
      assert!(InfraError::not_found("User", "alice").as_conflict().is_none());
   }
}
