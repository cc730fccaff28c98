//! ロール申請ユースケース
//!
//! ロール申請の提出・承認・却下・審査待ち一覧を提供する。
//!
//! ## 承認時のロール付与
//!
//! 申請ステータスを条件付き更新で確定させてから、申請者のロール集合に
//! 申請ロールを和集合で加える。ステータス更新は一度しか成功しないため、
//! 同じ申請を何度承認してもロール付与は一度だけになる。
//!
//! ステータス確定後にロール付与が失敗した場合、申請は承認済みのまま残り
//! 再承認しても付与は再試行されない。承認操作はエラーを返し、申請 ID と
//! 付与できなかったロールをエラーログに記録する。

use std::sync::Arc;

use campusqa_domain::{
   clock::Clock,
   role::{RoleQueue, RoleSet},
   role_request::{NewRoleRequest, RoleRequest, RoleRequestId, RoleRequestStatus, Transition},
   user::Username,
};
use campusqa_infra::repository::{RoleRequestRepository, UserRepository};

use super::helpers::{parse_existing_username, require_any_role};
use crate::error::CoreError;

/// 解決操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
   Approve,
   Deny,
}

impl Resolution {
   fn apply(
      self,
      request: RoleRequest,
      now: chrono::DateTime<chrono::Utc>,
      approver: Username,
   ) -> Result<Transition, CoreError> {
      let transition = match self {
         Self::Approve => request.approve(now, approver)?,
         Self::Deny => request.deny(now, approver)?,
      };
      Ok(transition)
   }
}

/// ロール申請ユースケース
pub struct RoleRequestUseCaseImpl {
   user_repository:         Arc<dyn UserRepository>,
   role_request_repository: Arc<dyn RoleRequestRepository>,
   clock:                   Arc<dyn Clock>,
}

impl RoleRequestUseCaseImpl {
   pub fn new(
      user_repository: Arc<dyn UserRepository>,
      role_request_repository: Arc<dyn RoleRequestRepository>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         user_repository,
         role_request_repository,
         clock,
      }
   }

   /// ロール申請を提出する
   ///
   /// - 申請者が存在しない場合は `UserNotFound`
   /// - 申請ロールが空の場合は `BadRequest`
   pub async fn submit(&self, username: &str, roles: RoleSet) -> Result<RoleRequest, CoreError> {
      let username = parse_existing_username(username)?;
      if !self.user_repository.exists(&username).await? {
         return Err(CoreError::UserNotFound(username.into_string()));
      }

      let request = RoleRequest::new(NewRoleRequest {
         id:              RoleRequestId::new(),
         requested_by:    username,
         requested_roles: roles,
         now:             self.clock.now(),
      })?;

      self.role_request_repository.insert(&request).await?;

      tracing::info!(
         role_request_id = %request.id(),
         requested_by = %request.requested_by(),
         roles = %request.requested_roles(),
         queue = %request.queue(),
         "ロール申請を受け付けました"
      );
      Ok(request)
   }

   /// ロール申請を承認する
   ///
   /// 承認済みの申請への再承認は何もせず `AlreadyApplied` を返す。
   /// 却下済みの申請は `Conflict`。
   pub async fn approve(&self, id: RoleRequestId, approver: &str) -> Result<Transition, CoreError> {
      let transition = self.resolve(id, approver, Resolution::Approve).await?;

      if let Transition::Applied(request) = &transition
         && let Err(e) = self.grant_roles(request).await
      {
         tracing::error!(
            role_request_id = %request.id(),
            username = %request.requested_by(),
            roles = %request.requested_roles(),
            error = %e,
            "承認済みの申請のロール付与に失敗しました"
         );
         return Err(e);
      }
      Ok(transition)
   }

   /// ロール申請を却下する
   ///
   /// 却下済みの申請への再却下は何もせず `AlreadyApplied` を返す。
   /// 承認済みの申請は `Conflict`。
   pub async fn deny(&self, id: RoleRequestId, approver: &str) -> Result<Transition, CoreError> {
      self.resolve(id, approver, Resolution::Deny).await
   }

   /// キューごとの審査待ち申請（古い順）
   pub async fn list_pending(&self, queue: RoleQueue) -> Result<Vec<RoleRequest>, CoreError> {
      Ok(self
         .role_request_repository
         .find_by_queue_and_status(queue, RoleRequestStatus::Pending)
         .await?)
   }

   async fn find_request(&self, id: RoleRequestId) -> Result<RoleRequest, CoreError> {
      self
         .role_request_repository
         .find_by_id(id)
         .await?
         .ok_or_else(|| CoreError::RequestNotFound(format!("role request {id} does not exist")))
   }

   async fn resolve(
      &self,
      id: RoleRequestId,
      approver: &str,
      resolution: Resolution,
   ) -> Result<Transition, CoreError> {
      let request = self.find_request(id).await?;
      let approver = Username::new(approver)?;
      require_any_role(
         self.user_repository.as_ref(),
         &approver,
         &[request.queue().approver_role()],
         "resolving this role request",
      )
      .await?;

      let resolved = match resolution.apply(request, self.clock.now(), approver.clone())? {
         Transition::Applied(resolved) => resolved,
         unchanged @ Transition::AlreadyApplied(_) => {
            tracing::debug!(role_request_id = %id, ?resolution, "解決済みの申請のため変更しません");
            return Ok(unchanged);
         }
      };

      match self.role_request_repository.update_status(&resolved).await {
         Ok(()) => {
            tracing::info!(
               role_request_id = %id,
               status = %resolved.status(),
               approver = %approver,
               "ロール申請を解決しました"
            );
            Ok(Transition::Applied(resolved))
         }
         Err(e) if e.as_conflict().is_some() => {
            // 他の審査担当が先に解決した。確定した状態に対して同じ操作を評価し直す
            tracing::warn!(role_request_id = %id, "ロール申請の同時解決を検出しました");
            let current = self.find_request(id).await?;
            let transition = resolution.apply(current, self.clock.now(), approver)?;
            match transition {
               Transition::AlreadyApplied(_) => Ok(transition),
               Transition::Applied(_) => Err(CoreError::Conflict(format!(
                  "role request {id} was modified concurrently"
               ))),
            }
         }
         Err(e) => Err(e.into()),
      }
   }

   async fn grant_roles(&self, request: &RoleRequest) -> Result<(), CoreError> {
      let requester = request.requested_by();
      let current = self
         .user_repository
         .find_roles(requester)
         .await?
         .ok_or_else(|| CoreError::UserNotFound(requester.as_str().to_string()))?;
      let merged = current.union(request.requested_roles());

      self.user_repository.update_roles(requester, merged).await?;

      tracing::info!(
         username = %requester,
         roles = %merged,
         "申請ロールを付与しました"
      );
      Ok(())
   }
}
