//! InMemoryRoleRequestRepository の統合テスト

use campusqa_domain::{
   role::{Role, RoleQueue, RoleSet},
   role_request::{NewRoleRequest, RoleRequest, RoleRequestId, RoleRequestStatus},
   user::Username,
};
use campusqa_infra::{
   InfraErrorKind,
   repository::{InMemoryRoleRequestRepository, RoleRequestRepository},
};
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use tracing::Instrument as _;
use tracing_subscriber::layer::SubscriberExt as _;

fn now() -> DateTime<Utc> {
   DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn username(value: &str) -> Username {
   Username::new(value).unwrap()
}

fn request(by: &str, roles: &[Role], offset_minutes: i64) -> RoleRequest {
   RoleRequest::new(NewRoleRequest {
      id:              RoleRequestId::new(),
      requested_by:    username(by),
      requested_roles: roles.iter().copied().collect::<RoleSet>(),
      now:             now() + Duration::minutes(offset_minutes),
   })
   .unwrap()
}

#[fixture]
fn sut() -> InMemoryRoleRequestRepository {
   InMemoryRoleRequestRepository::new()
}

#[rstest]
#[tokio::test]
async fn test_登録した申請をidで取得できる(sut: InMemoryRoleRequestRepository) {
   let req = request("alice", &[Role::Reviewer], 0);

   sut.insert(&req).await.unwrap();

   assert_eq!(sut.find_by_id(req.id()).await.unwrap(), Some(req));
   assert_eq!(sut.find_by_id(RoleRequestId::new()).await.unwrap(), None);
}

#[rstest]
#[tokio::test]
async fn test_キューとステータスで登録順に絞り込める(sut: InMemoryRoleRequestRepository) {
   let first = request("alice", &[Role::Reviewer], 0);
   let admin_queue = request("bob", &[Role::Staff], 1);
   let second = request("carol", &[Role::Student, Role::Reviewer], 2);
   for req in [&first, &admin_queue, &second] {
      sut.insert(req).await.unwrap();
   }

   let pending = sut
      .find_by_queue_and_status(RoleQueue::Instructor, RoleRequestStatus::Pending)
      .await
      .unwrap();

   assert_eq!(pending, vec![first, second]);
}

#[rstest]
#[tokio::test]
async fn test_審査待ちの申請は解決済みに更新できる(sut: InMemoryRoleRequestRepository) {
   let req = request("alice", &[Role::Staff], 0);
   sut.insert(&req).await.unwrap();
   let approved = req.approve(now(), username("admin")).unwrap().into_request();

   sut.update_status(&approved).await.unwrap();

   // 解決日時と解決者もレコードから復元される
   let stored = sut.find_by_id(approved.id()).await.unwrap().unwrap();
   assert_eq!(stored, approved);
   assert!(
      sut.find_by_queue_and_status(RoleQueue::Admin, RoleRequestStatus::Pending)
         .await
         .unwrap()
         .is_empty()
   );
}

#[rstest]
#[tokio::test]
async fn test_解決済みの申請の再更新はconflict(sut: InMemoryRoleRequestRepository) {
   let req = request("alice", &[Role::Staff], 0);
   sut.insert(&req).await.unwrap();
   let approved = req
      .clone()
      .approve(now(), username("admin"))
      .unwrap()
      .into_request();
   let denied = req.deny(now(), username("other")).unwrap().into_request();
   sut.update_status(&approved).await.unwrap();

   let err = sut.update_status(&denied).await.unwrap_err();

   assert!(err.as_conflict().is_some());
   let stored = sut.find_by_id(approved.id()).await.unwrap().unwrap();
   assert_eq!(stored.status(), RoleRequestStatus::Approved);
}

#[rstest]
#[tokio::test]
async fn test_存在しない申請の更新はnot_found(sut: InMemoryRoleRequestRepository) {
   let req = request("alice", &[Role::Staff], 0);
   let denied = req.deny(now(), username("admin")).unwrap().into_request();

   let err = sut.update_status(&denied).await.unwrap_err();

   assert!(matches!(err.kind(), InfraErrorKind::NotFound { .. }));
}

#[rstest]
#[tokio::test]
async fn test_競合エラーは呼び出し元のスパンを記録する(sut: InMemoryRoleRequestRepository) {
   let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
   let _guard = tracing::subscriber::set_default(subscriber);
   let req = request("alice", &[Role::Staff], 0);
   sut.insert(&req).await.unwrap();
   let approved = req
      .clone()
      .approve(now(), username("admin"))
      .unwrap()
      .into_request();
   let denied = req.deny(now(), username("other")).unwrap().into_request();
   sut.update_status(&approved).await.unwrap();

   let err = sut
      .update_status(&denied)
      .instrument(tracing::info_span!("resolve_role_request"))
      .await
      .unwrap_err();

   assert_eq!(err.as_conflict(), Some(("RoleRequest", denied.id().to_string().as_str())));
   let trace = err.span_trace().to_string();
   assert!(
      trace.contains("resolve_role_request"),
      "SpanTrace が呼び出し元のスパン名を含むこと: {trace}",
   );
}
