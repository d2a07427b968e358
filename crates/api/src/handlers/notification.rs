//! Handlers for the in-app notification feed (`/notifications`).
//!
//! Every account kind has a feed. Rows are written alongside push/email
//! delivery by [`crate::services::notify`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use influx_core::types::DbId;
use influx_db::models::notification::Notification;
use influx_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{clamp_limit, clamp_offset};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Feed {
    pub items: Vec<Notification>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

/// GET /api/v1/notifications?unread_only=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<DataResponse<Feed>>> {
    let kind = user.kind.as_str();
    let items = NotificationRepo::list_for_account(
        &state.pool,
        kind,
        user.account_id,
        params.unread_only,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    let unread_count = NotificationRepo::unread_count(&state.pool, kind, user.account_id).await?;
    Ok(Json(DataResponse {
        data: Feed {
            items,
            unread_count,
        },
    }))
}

/// POST /api/v1/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if NotificationRepo::mark_read(&state.pool, id, user.kind.as_str(), user.account_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Notification", id))
    }
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let updated =
        NotificationRepo::mark_all_read(&state.pool, user.kind.as_str(), user.account_id).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { updated },
    }))
}
