//! # ロール申請ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /internal/role-requests` - ロール申請の提出
//! - `GET /internal/role-requests?queue={instructor|admin}` - 審査待ち一覧
//! - `POST /internal/role-requests/{id}/approve` - 承認
//! - `POST /internal/role-requests/{id}/deny` - 却下

use std::{str::FromStr, sync::Arc};

use axum::{
   Json,
   extract::{Path, Query, State},
   http::StatusCode,
   response::IntoResponse,
};
use campusqa_domain::{
   role::{RoleQueue, RoleSet},
   role_request::{RoleRequest, RoleRequestId, RoleRequestStatus, Transition},
};
use campusqa_shared::ApiResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::CoreError, usecase::RoleRequestUseCaseImpl};

/// ロール申請 API の共有状態
pub struct RoleRequestWorkflowState {
   pub usecase: RoleRequestUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// ロール申請の提出リクエスト
#[derive(Debug, Deserialize)]
pub struct SubmitRoleRequestRequest {
   pub username: String,
   pub roles:    RoleSet,
}

/// 承認・却下リクエスト
#[derive(Debug, Deserialize)]
pub struct ResolveRoleRequestRequest {
   pub approver: String,
}

/// 審査キュー指定クエリ
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
   pub queue: String,
}

/// ロール申請 DTO
#[derive(Debug, Serialize)]
pub struct RoleRequestDto {
   pub id:           Uuid,
   pub requested_by: String,
   pub roles:        RoleSet,
   pub roles_label:  String,
   pub queue:        RoleQueue,
   pub status:       RoleRequestStatus,
   pub submitted_at: String,
   pub resolved_at:  Option<String>,
   pub resolved_by:  Option<String>,
}

impl From<&RoleRequest> for RoleRequestDto {
   fn from(request: &RoleRequest) -> Self {
      Self {
         id:           *request.id().as_uuid(),
         requested_by: request.requested_by().as_str().to_string(),
         roles:        request.requested_roles(),
         roles_label:  request.requested_roles().to_string(),
         queue:        request.queue(),
         status:       request.status(),
         submitted_at: request.submitted_at().to_rfc3339(),
         resolved_at:  request.resolved_at().map(|t| t.to_rfc3339()),
         resolved_by:  request.resolved_by().map(|u| u.as_str().to_string()),
      }
   }
}

/// 承認・却下結果 DTO
///
/// `applied` が false の場合、申請は既に同じ状態に解決済みで何も変更していない。
#[derive(Debug, Serialize)]
pub struct ResolutionDto {
   pub request: RoleRequestDto,
   pub applied: bool,
}

impl From<&Transition> for ResolutionDto {
   fn from(transition: &Transition) -> Self {
      Self {
         request: RoleRequestDto::from(transition.request()),
         applied: transition.was_applied(),
      }
   }
}

// --- ハンドラ ---

/// POST /internal/role-requests
///
/// ## レスポンス
///
/// - `201 Created`: 作成された申請
/// - `400 Bad Request`: ロールが空
/// - `404 Not Found`: 申請者が存在しない
#[tracing::instrument(skip_all, fields(username = %req.username))]
pub async fn submit_role_request(
   State(state): State<Arc<RoleRequestWorkflowState>>,
   Json(req): Json<SubmitRoleRequestRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let request = state.usecase.submit(&req.username, req.roles).await?;

   let response = ApiResponse::new(RoleRequestDto::from(&request));
   Ok((StatusCode::CREATED, Json(response)))
}

/// GET /internal/role-requests?queue=
///
/// 指定キューの審査待ち申請を提出順に返す。
pub async fn list_pending_role_requests(
   State(state): State<Arc<RoleRequestWorkflowState>>,
   Query(query): Query<QueueQuery>,
) -> Result<impl IntoResponse, CoreError> {
   let queue = RoleQueue::from_str(&query.queue)
      .map_err(|_| CoreError::BadRequest(format!("unknown queue: {:?}", query.queue)))?;

   let requests = state.usecase.list_pending(queue).await?;

   let items: Vec<RoleRequestDto> = requests.iter().map(RoleRequestDto::from).collect();
   Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}

/// POST /internal/role-requests/{id}/approve
///
/// ## レスポンス
///
/// - `200 OK`: 承認結果（承認済みへの再承認は `applied: false`）
/// - `403 Forbidden`: 審査担当がキューの審査ロールを持たない
/// - `404 Not Found`: 申請が存在しない
/// - `409 Conflict`: 却下済み
#[tracing::instrument(skip_all, fields(%id))]
pub async fn approve_role_request(
   State(state): State<Arc<RoleRequestWorkflowState>>,
   Path(id): Path<Uuid>,
   Json(req): Json<ResolveRoleRequestRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let transition = state
      .usecase
      .approve(RoleRequestId::from_uuid(id), &req.approver)
      .await?;

   Ok((StatusCode::OK, Json(ApiResponse::new(ResolutionDto::from(&transition)))))
}

/// POST /internal/role-requests/{id}/deny
///
/// レスポンスは承認と同様。承認済みの申請は `409 Conflict`。
#[tracing::instrument(skip_all, fields(%id))]
pub async fn deny_role_request(
   State(state): State<Arc<RoleRequestWorkflowState>>,
   Path(id): Path<Uuid>,
   Json(req): Json<ResolveRoleRequestRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let transition = state
      .usecase
      .deny(RoleRequestId::from_uuid(id), &req.approver)
      .await?;

   Ok((StatusCode::OK, Json(ApiResponse::new(ResolutionDto::from(&transition)))))
}
