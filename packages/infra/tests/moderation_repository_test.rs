//! InMemoryModerationRepository の統合テスト

use campusqa_domain::{
   moderation::{ContentId, ContentKind, ContentRef, FlagReason},
   user::Username,
};
use campusqa_infra::repository::{InMemoryModerationRepository, ModerationRepository};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

fn content(kind: ContentKind, id: u64) -> ContentRef {
   ContentRef::new(kind, ContentId::new(id))
}

fn reason(value: &str) -> FlagReason {
   FlagReason::new(value).unwrap()
}

fn username(value: &str) -> Username {
   Username::new(value).unwrap()
}

#[fixture]
fn sut() -> InMemoryModerationRepository {
   InMemoryModerationRepository::new()
}

#[rstest]
#[tokio::test]
async fn test_記録のないコンテンツはnone(sut: InMemoryModerationRepository) {
   assert_eq!(
      sut.find_flag(content(ContentKind::Question, 1)).await.unwrap(),
      None
   );
}

#[rstest]
#[tokio::test]
async fn test_フラグは冪等で最初の理由を保持する(sut: InMemoryModerationRepository) {
   let target = content(ContentKind::Answer, 3);

   sut.set_flag(target, &reason("spam")).await.unwrap();
   let again = sut.set_flag(target, &reason("rude")).await.unwrap();

   assert_eq!(again.reason_flagged(), Some(&reason("spam")));
   assert_eq!(sut.find_flag(target).await.unwrap(), Some(again));
}

#[rstest]
#[tokio::test]
async fn test_フラグと非表示は独立して更新される(sut: InMemoryModerationRepository) {
   let target = content(ContentKind::Review, 9);

   sut.set_hidden(target).await.unwrap();
   let flagged = sut.set_flag(target, &reason("abuse")).await.unwrap();
   assert!(flagged.is_hidden());

   let unflagged = sut.unset_flag(target).await.unwrap();
   assert!(unflagged.is_hidden());
   assert!(!unflagged.is_flagged());

   let cleared = sut.unset_hidden(target).await.unwrap();
   assert!(!cleared.is_flagged());
   assert!(!cleared.is_hidden());
   // 何もない状態に戻ったコンテンツは記録に残らない
   assert_eq!(sut.find_flag(target).await.unwrap(), None);
}

#[rstest]
#[tokio::test]
async fn test_種別ごとにフラグ付きと非表示を一覧できる(sut: InMemoryModerationRepository) {
   sut.set_flag(content(ContentKind::Question, 5), &reason("spam"))
      .await
      .unwrap();
   sut.set_flag(content(ContentKind::Question, 2), &reason("spam"))
      .await
      .unwrap();
   sut.set_flag(content(ContentKind::Answer, 1), &reason("spam"))
      .await
      .unwrap();
   sut.set_hidden(content(ContentKind::Question, 7)).await.unwrap();

   let flagged: Vec<ContentRef> = sut
      .find_flagged(ContentKind::Question)
      .await
      .unwrap()
      .iter()
      .map(|flag| flag.content())
      .collect();
   let hidden: Vec<ContentRef> = sut
      .find_hidden(ContentKind::Question)
      .await
      .unwrap()
      .iter()
      .map(|flag| flag.content())
      .collect();

   assert_eq!(
      flagged,
      vec![
         content(ContentKind::Question, 2),
         content(ContentKind::Question, 5)
      ]
   );
   assert_eq!(hidden, vec![content(ContentKind::Question, 7)]);
}

#[rstest]
#[tokio::test]
async fn test_ミュートの設定と解除は冪等(sut: InMemoryModerationRepository) {
   sut.set_muted(&username("mallory")).await.unwrap();
   sut.set_muted(&username("mallory")).await.unwrap();
   sut.set_muted(&username("eve")).await.unwrap();

   assert!(sut.is_muted(&username("mallory")).await.unwrap());
   assert_eq!(
      sut.find_muted_users().await.unwrap(),
      vec![username("eve"), username("mallory")]
   );

   sut.unset_muted(&username("mallory")).await.unwrap();
   sut.unset_muted(&username("mallory")).await.unwrap();

   assert!(!sut.is_muted(&username("mallory")).await.unwrap());
   assert_eq!(sut.find_muted_users().await.unwrap(), vec![username("eve")]);
}
