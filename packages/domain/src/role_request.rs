//! # ロール申請
//!
//! ユーザーが追加のロールを申請し、審査担当が承認または却下するまでのライフサイクルを扱う。
//!
//! ## 状態遷移
//!
//! ```text
//! Pending ──approve──▶ Approved
//!    │
//!    └────deny───────▶ Denied
//! ```
//!
//! Approved / Denied は終端状態で、再オープンはない。
//! 同じ終端状態への再遷移は [`Transition::AlreadyApplied`] を返す no-op、
//! 反対側の終端状態への遷移は [`DomainError::Conflict`] になる。
//!
//! ## 審査キュー
//!
//! キューは申請ロールから [`RoleQueue::for_roles`] で導出し、独立には保持しない。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
   DomainError,
   role::{RoleQueue, RoleSet},
   user::Username,
};

define_uuid_id! {
   /// ロール申請 ID
   pub struct RoleRequestId;
}

/// ロール申請ステータス（永続化・API 表現用）
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Hash,
   Serialize,
   Deserialize,
   strum::Display,
   strum::EnumString,
   strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleRequestStatus {
   /// 審査待ち
   Pending,
   /// 承認済み
   Approved,
   /// 却下済み
   Denied,
}

/// ロール申請の状態（ADT ベースステートマシン）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequestState {
   Pending(PendingState),
   Approved(ResolvedState),
   Denied(ResolvedState),
}

/// Pending 状態の固有フィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingState {
   pub submitted_at: DateTime<Utc>,
}

/// Approved / Denied 共通の解決済み状態フィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedState {
   pub submitted_at: DateTime<Utc>,
   pub resolved_at:  DateTime<Utc>,
   /// 解決した審査担当
   pub resolved_by:  Username,
}

/// 状態遷移の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
   /// 状態が変化した
   Applied(RoleRequest),
   /// 既に目的の状態だった（変化なし）
   AlreadyApplied(RoleRequest),
}

impl Transition {
   pub fn request(&self) -> &RoleRequest {
      match self {
         Self::Applied(request) | Self::AlreadyApplied(request) => request,
      }
   }

   pub fn into_request(self) -> RoleRequest {
      match self {
         Self::Applied(request) | Self::AlreadyApplied(request) => request,
      }
   }

   pub fn was_applied(&self) -> bool {
      matches!(self, Self::Applied(_))
   }
}

/// ロール申請エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequest {
   id:              RoleRequestId,
   requested_by:    Username,
   requested_roles: RoleSet,
   state:           RoleRequestState,
}

/// ロール申請の新規作成パラメータ
pub struct NewRoleRequest {
   pub id:              RoleRequestId,
   pub requested_by:    Username,
   pub requested_roles: RoleSet,
   pub now:             DateTime<Utc>,
}

/// 永続化レコード
///
/// フラットな構造で保存される申請を表現する。[`RoleRequest::from_record`] で
/// 状態ごとの不変条件を検証して ADT に変換する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequestRecord {
   pub id:              RoleRequestId,
   pub requested_by:    Username,
   pub requested_roles: RoleSet,
   pub status:          RoleRequestStatus,
   pub submitted_at:    DateTime<Utc>,
   pub resolved_at:     Option<DateTime<Utc>>,
   pub resolved_by:     Option<Username>,
}

impl RoleRequest {
   /// 審査待ちの申請を作成する
   ///
   /// # Errors
   ///
   /// 申請ロールが空の場合は `DomainError::Validation`。
   pub fn new(params: NewRoleRequest) -> Result<Self, DomainError> {
      if params.requested_roles.is_empty() {
         return Err(DomainError::Validation(
            "at least one role must be requested".to_string(),
         ));
      }

      Ok(Self {
         id:              params.id,
         requested_by:    params.requested_by,
         requested_roles: params.requested_roles,
         state:           RoleRequestState::Pending(PendingState {
            submitted_at: params.now,
         }),
      })
   }

   /// 永続化レコードから復元する
   ///
   /// # Errors
   ///
   /// - `DomainError::Validation`: 申請ロールが空、または状態に必要な解決情報が欠損・過剰
   pub fn from_record(record: RoleRequestRecord) -> Result<Self, DomainError> {
      if record.requested_roles.is_empty() {
         return Err(DomainError::Validation(format!(
            "role request {} has no requested roles",
            record.id
         )));
      }

      let state = match record.status {
         RoleRequestStatus::Pending => {
            if record.resolved_at.is_some() || record.resolved_by.is_some() {
               return Err(DomainError::Validation(format!(
                  "pending role request {} must not carry resolution data",
                  record.id
               )));
            }
            RoleRequestState::Pending(PendingState {
               submitted_at: record.submitted_at,
            })
         }
         RoleRequestStatus::Approved | RoleRequestStatus::Denied => {
            let (Some(resolved_at), Some(resolved_by)) = (record.resolved_at, record.resolved_by)
            else {
               return Err(DomainError::Validation(format!(
                  "{} role request {} requires resolved_at and resolved_by",
                  record.status, record.id
               )));
            };
            let resolved = ResolvedState {
               submitted_at: record.submitted_at,
               resolved_at,
               resolved_by,
            };
            if record.status == RoleRequestStatus::Approved {
               RoleRequestState::Approved(resolved)
            } else {
               RoleRequestState::Denied(resolved)
            }
         }
      };

      Ok(Self {
         id: record.id,
         requested_by: record.requested_by,
         requested_roles: record.requested_roles,
         state,
      })
   }

   /// 永続化レコードに変換する
   pub fn to_record(&self) -> RoleRequestRecord {
      let (resolved_at, resolved_by) = match &self.state {
         RoleRequestState::Pending(_) => (None, None),
         RoleRequestState::Approved(resolved) | RoleRequestState::Denied(resolved) => {
            (Some(resolved.resolved_at), Some(resolved.resolved_by.clone()))
         }
      };

      RoleRequestRecord {
         id: self.id,
         requested_by: self.requested_by.clone(),
         requested_roles: self.requested_roles,
         status: self.status(),
         submitted_at: self.submitted_at(),
         resolved_at,
         resolved_by,
      }
   }

   // Getter メソッド

   pub fn id(&self) -> RoleRequestId {
      self.id
   }

   pub fn requested_by(&self) -> &Username {
      &self.requested_by
   }

   pub fn requested_roles(&self) -> RoleSet {
      self.requested_roles
   }

   /// 審査キュー（申請ロールから導出）
   pub fn queue(&self) -> RoleQueue {
      RoleQueue::for_roles(self.requested_roles)
   }

   pub fn state(&self) -> &RoleRequestState {
      &self.state
   }

   pub fn status(&self) -> RoleRequestStatus {
      match &self.state {
         RoleRequestState::Pending(_) => RoleRequestStatus::Pending,
         RoleRequestState::Approved(_) => RoleRequestStatus::Approved,
         RoleRequestState::Denied(_) => RoleRequestStatus::Denied,
      }
   }

   pub fn is_pending(&self) -> bool {
      matches!(self.state, RoleRequestState::Pending(_))
   }

   pub fn submitted_at(&self) -> DateTime<Utc> {
      match &self.state {
         RoleRequestState::Pending(pending) => pending.submitted_at,
         RoleRequestState::Approved(resolved) | RoleRequestState::Denied(resolved) => {
            resolved.submitted_at
         }
      }
   }

   pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
      match &self.state {
         RoleRequestState::Pending(_) => None,
         RoleRequestState::Approved(resolved) | RoleRequestState::Denied(resolved) => {
            Some(resolved.resolved_at)
         }
      }
   }

   pub fn resolved_by(&self) -> Option<&Username> {
      match &self.state {
         RoleRequestState::Pending(_) => None,
         RoleRequestState::Approved(resolved) | RoleRequestState::Denied(resolved) => {
            Some(&resolved.resolved_by)
         }
      }
   }

   // 状態遷移

   /// 承認する
   ///
   /// # Errors
   ///
   /// - `DomainError::Conflict`: 既に却下済み
   pub fn approve(self, now: DateTime<Utc>, approver: Username) -> Result<Transition, DomainError> {
      match self.state {
         RoleRequestState::Pending(pending) => Ok(Transition::Applied(Self {
            state: RoleRequestState::Approved(ResolvedState {
               submitted_at: pending.submitted_at,
               resolved_at:  now,
               resolved_by:  approver,
            }),
            ..self
         })),
         RoleRequestState::Approved(_) => Ok(Transition::AlreadyApplied(self)),
         RoleRequestState::Denied(_) => Err(DomainError::Conflict(format!(
            "role request {} has already been denied",
            self.id
         ))),
      }
   }

   /// 却下する
   ///
   /// # Errors
   ///
   /// - `DomainError::Conflict`: 既に承認済み
   pub fn deny(self, now: DateTime<Utc>, approver: Username) -> Result<Transition, DomainError> {
      match self.state {
         RoleRequestState::Pending(pending) => Ok(Transition::Applied(Self {
            state: RoleRequestState::Denied(ResolvedState {
               submitted_at: pending.submitted_at,
               resolved_at:  now,
               resolved_by:  approver,
            }),
            ..self
         })),
         RoleRequestState::Denied(_) => Ok(Transition::AlreadyApplied(self)),
         RoleRequestState::Approved(_) => Err(DomainError::Conflict(format!(
            "role request {} has already been approved",
            self.id
         ))),
      }
   }
}
