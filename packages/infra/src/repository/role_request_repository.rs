//! # RoleRequestRepository
//!
//! ロール申請の永続化を担当するリポジトリ。
//!
//! ステータス更新は保存済みの申請が Pending のときだけ成功する条件付き更新。
//! 同じ申請を同時に解決しようとした場合、後から来た側は `Conflict` を受け取る。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campusqa_domain::{
   role::RoleQueue,
   role_request::{RoleRequest, RoleRequestId, RoleRequestRecord, RoleRequestStatus},
};

use super::lock;
use crate::error::InfraError;

/// ロール申請リポジトリトレイト
#[async_trait]
pub trait RoleRequestRepository: Send + Sync {
   /// 申請を登録する
   ///
   /// 同じ ID が既に存在する場合は `Conflict`。
   async fn insert(&self, request: &RoleRequest) -> Result<(), InfraError>;

   /// ID で申請を検索
   async fn find_by_id(&self, id: RoleRequestId) -> Result<Option<RoleRequest>, InfraError>;

   /// 解決済みの申請で保存済みの審査待ち申請を置き換える
   ///
   /// # Errors
   ///
   /// - `NotFound`: 申請が存在しない
   /// - `Conflict`: 保存済みの申請が既に Pending ではない
   async fn update_status(&self, request: &RoleRequest) -> Result<(), InfraError>;

   /// キューとステータスで申請を検索（登録順）
   async fn find_by_queue_and_status(
      &self,
      queue: RoleQueue,
      status: RoleRequestStatus,
   ) -> Result<Vec<RoleRequest>, InfraError>;
}

/// インメモリ実装の RoleRequestRepository
///
/// フラットな [`RoleRequestRecord`] を登録順で保持し、読み出すたびに
/// [`RoleRequest::from_record`] で状態ごとの不変条件を検証して復元する。
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleRequestRepository {
   records: Arc<Mutex<Vec<RoleRequestRecord>>>,
}

impl InMemoryRoleRequestRepository {
   pub fn new() -> Self {
      Self::default()
   }
}

/// 保存済みレコードを復元する（不変条件違反は予期しないエラー）
fn restore(record: &RoleRequestRecord) -> Result<RoleRequest, InfraError> {
   RoleRequest::from_record(record.clone()).map_err(|e| {
      InfraError::unexpected(format!("corrupted role request {}: {e}", record.id))
   })
}

#[async_trait]
impl RoleRequestRepository for InMemoryRoleRequestRepository {
   async fn insert(&self, request: &RoleRequest) -> Result<(), InfraError> {
      let mut records = lock(&self.records, "role request")?;
      if records.iter().any(|r| r.id == request.id()) {
         return Err(InfraError::conflict("RoleRequest", request.id().to_string()));
      }
      records.push(request.to_record());
      Ok(())
   }

   async fn find_by_id(&self, id: RoleRequestId) -> Result<Option<RoleRequest>, InfraError> {
      lock(&self.records, "role request")?
         .iter()
         .find(|r| r.id == id)
         .map(restore)
         .transpose()
   }

   async fn update_status(&self, request: &RoleRequest) -> Result<(), InfraError> {
      let mut records = lock(&self.records, "role request")?;
      let stored = records
         .iter_mut()
         .find(|r| r.id == request.id())
         .ok_or_else(|| InfraError::not_found("RoleRequest", request.id().to_string()))?;

      if stored.status != RoleRequestStatus::Pending {
         return Err(InfraError::conflict("RoleRequest", request.id().to_string()));
      }
      *stored = request.to_record();
      Ok(())
   }

   async fn find_by_queue_and_status(
      &self,
      queue: RoleQueue,
      status: RoleRequestStatus,
   ) -> Result<Vec<RoleRequest>, InfraError> {
      lock(&self.records, "role request")?
         .iter()
         .filter(|r| r.status == status && RoleQueue::for_roles(r.requested_roles) == queue)
         .map(restore)
         .collect()
   }
}
