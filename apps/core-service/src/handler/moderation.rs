//! # モデレーションハンドラ
//!
//! ## エンドポイント
//!
//! - `POST|DELETE /internal/moderation/{kind}/{id}/flag` - フラグの設定・解除
//! - `POST|DELETE /internal/moderation/{kind}/{id}/hidden` - 非表示の設定・解除
//! - `GET /internal/moderation/{kind}/{id}/status` - コンテンツのモデレーション状態
//! - `GET /internal/moderation/{kind}/flagged` - フラグ済み一覧
//! - `GET /internal/moderation/{kind}/hidden` - 非表示一覧
//! - `POST|DELETE /internal/moderation/users/{username}/mute` - ミュートの設定・解除
//! - `GET /internal/moderation/users/{username}/mute` - ミュート状態
//! - `GET /internal/moderation/muted-users` - ミュート中のユーザー一覧
//!
//! `{kind}` は `question` / `answer` / `review`。

use std::{str::FromStr, sync::Arc};

use axum::{
   Json,
   extract::{Path, State},
   http::StatusCode,
   response::IntoResponse,
};
use campusqa_domain::moderation::{ContentId, ContentKind, ContentRef, ModerationFlag};
use campusqa_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{error::CoreError, usecase::ModerationUseCaseImpl};

/// モデレーション API の共有状態
pub struct ModerationState {
   pub usecase: ModerationUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// フラグ設定リクエスト
#[derive(Debug, Deserialize)]
pub struct FlagContentRequest {
   pub moderator: String,
   pub reason:    String,
}

/// 実行者のみを指定するリクエスト
#[derive(Debug, Deserialize)]
pub struct ModeratorRequest {
   pub moderator: String,
}

/// モデレーション状態 DTO
#[derive(Debug, Serialize)]
pub struct ModerationFlagDto {
   pub kind:           ContentKind,
   pub id:             u64,
   pub is_flagged:     bool,
   pub reason_flagged: Option<String>,
   pub is_hidden:      bool,
}

impl From<&ModerationFlag> for ModerationFlagDto {
   fn from(flag: &ModerationFlag) -> Self {
      Self {
         kind:           flag.content().kind,
         id:             flag.content().id.as_u64(),
         is_flagged:     flag.is_flagged(),
         reason_flagged: flag.reason_flagged().map(|r| r.as_str().to_string()),
         is_hidden:      flag.is_hidden(),
      }
   }
}

fn parse_kind(kind: &str) -> Result<ContentKind, CoreError> {
   ContentKind::from_str(kind)
      .map_err(|_| CoreError::BadRequest(format!("unknown content kind: {kind:?}")))
}

fn parse_content(kind: &str, id: u64) -> Result<ContentRef, CoreError> {
   Ok(ContentRef::new(parse_kind(kind)?, ContentId::new(id)))
}

fn flag_response(flag: &ModerationFlag) -> (StatusCode, Json<ApiResponse<ModerationFlagDto>>) {
   (StatusCode::OK, Json(ApiResponse::new(ModerationFlagDto::from(flag))))
}

// --- コンテンツ ---

/// POST /internal/moderation/{kind}/{id}/flag
///
/// フラグ済みのコンテンツは最初の理由を保持したまま `200 OK` を返す。
#[tracing::instrument(skip_all, fields(%kind, id))]
pub async fn flag_content(
   State(state): State<Arc<ModerationState>>,
   Path((kind, id)): Path<(String, u64)>,
   Json(req): Json<FlagContentRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let content = parse_content(&kind, id)?;

   let flag = state
      .usecase
      .flag(&req.moderator, content, &req.reason)
      .await?;

   Ok(flag_response(&flag))
}

/// DELETE /internal/moderation/{kind}/{id}/flag
#[tracing::instrument(skip_all, fields(%kind, id))]
pub async fn unflag_content(
   State(state): State<Arc<ModerationState>>,
   Path((kind, id)): Path<(String, u64)>,
   Json(req): Json<ModeratorRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let content = parse_content(&kind, id)?;

   let flag = state.usecase.unflag(&req.moderator, content).await?;

   Ok(flag_response(&flag))
}

/// POST /internal/moderation/{kind}/{id}/hidden
#[tracing::instrument(skip_all, fields(%kind, id))]
pub async fn hide_content(
   State(state): State<Arc<ModerationState>>,
   Path((kind, id)): Path<(String, u64)>,
   Json(req): Json<ModeratorRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let content = parse_content(&kind, id)?;

   let flag = state.usecase.hide(&req.moderator, content).await?;

   Ok(flag_response(&flag))
}

/// DELETE /internal/moderation/{kind}/{id}/hidden
#[tracing::instrument(skip_all, fields(%kind, id))]
pub async fn unhide_content(
   State(state): State<Arc<ModerationState>>,
   Path((kind, id)): Path<(String, u64)>,
   Json(req): Json<ModeratorRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let content = parse_content(&kind, id)?;

   let flag = state.usecase.unhide(&req.moderator, content).await?;

   Ok(flag_response(&flag))
}

/// GET /internal/moderation/{kind}/{id}/status
///
/// 記録のないコンテンツはフラグも非表示もない状態を返す。
pub async fn get_flag_status(
   State(state): State<Arc<ModerationState>>,
   Path((kind, id)): Path<(String, u64)>,
) -> Result<impl IntoResponse, CoreError> {
   let content = parse_content(&kind, id)?;

   let flag = state.usecase.flag_status(content).await?;

   Ok(flag_response(&flag))
}

/// GET /internal/moderation/{kind}/flagged
pub async fn list_flagged(
   State(state): State<Arc<ModerationState>>,
   Path(kind): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
   let flags = state.usecase.list_flagged(parse_kind(&kind)?).await?;

   let items: Vec<ModerationFlagDto> = flags.iter().map(ModerationFlagDto::from).collect();
   Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}

/// GET /internal/moderation/{kind}/hidden
pub async fn list_hidden(
   State(state): State<Arc<ModerationState>>,
   Path(kind): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
   let flags = state.usecase.list_hidden(parse_kind(&kind)?).await?;

   let items: Vec<ModerationFlagDto> = flags.iter().map(ModerationFlagDto::from).collect();
   Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}

// --- ユーザー ---

/// POST /internal/moderation/users/{username}/mute
#[tracing::instrument(skip_all, fields(%username))]
pub async fn mute_user(
   State(state): State<Arc<ModerationState>>,
   Path(username): Path<String>,
   Json(req): Json<ModeratorRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let status = state.usecase.mute(&req.moderator, &username).await?;

   Ok((StatusCode::OK, Json(ApiResponse::new(status))))
}

/// DELETE /internal/moderation/users/{username}/mute
#[tracing::instrument(skip_all, fields(%username))]
pub async fn unmute_user(
   State(state): State<Arc<ModerationState>>,
   Path(username): Path<String>,
   Json(req): Json<ModeratorRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let status = state.usecase.unmute(&req.moderator, &username).await?;

   Ok((StatusCode::OK, Json(ApiResponse::new(status))))
}

/// GET /internal/moderation/users/{username}/mute
pub async fn get_mute_status(
   State(state): State<Arc<ModerationState>>,
   Path(username): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
   let status = state.usecase.mute_status(&username).await?;

   Ok((StatusCode::OK, Json(ApiResponse::new(status))))
}

/// GET /internal/moderation/muted-users
pub async fn list_muted_users(
   State(state): State<Arc<ModerationState>>,
) -> Result<impl IntoResponse, CoreError> {
   let users = state.usecase.list_muted().await?;

   let items: Vec<String> = users.into_iter().map(|u| u.into_string()).collect();
   Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case("question", ContentKind::Question)]
   #[case("answer", ContentKind::Answer)]
   #[case("review", ContentKind::Review)]
   fn test_種別をパースできる(#[case] input: &str, #[case] expected: ContentKind) {
      assert_eq!(parse_kind(input).unwrap(), expected);
   }

   #[rstest]
   fn test_フラグ応答は借用元より長く生存できる() {
      let (status, Json(body)) = {
         let content = ContentRef::new(ContentKind::Answer, ContentId::new(4));
         let flag = ModerationFlag::clear(content).hidden();
         flag_response(&flag)
      };

      assert_eq!(status, StatusCode::OK);
      assert_eq!(body.data.kind, ContentKind::Answer);
      assert_eq!(body.data.id, 4);
      assert!(body.data.is_hidden);
      assert!(!body.data.is_flagged);
      assert_eq!(body.data.reason_flagged, None);
   }

   #[rstest]
   #[case("Question")]
   #[case("comment")]
   fn test_未知の種別はbad_request(#[case] input: &str) {
      assert!(matches!(parse_kind(input), Err(CoreError::BadRequest(_))));
   }
}
