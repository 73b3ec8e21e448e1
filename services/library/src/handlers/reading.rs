use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lectern_core::identity::IdentityHeaders;
use lectern_domain::reading::ReadlistStatus;

use crate::domain::types::{ReadingProgress, ReadlistEntry};
use crate::error::LibraryServiceError;
use crate::handlers::{EbookResponse, current_user, page_request};
use crate::state::AppState;
use crate::usecase::reading::{
    DeleteReadlistEntryUseCase, GetProgressUseCase, ListReadingLogsUseCase, ListReadlistUseCase,
    SaveProgressInput, SaveProgressUseCase, SetReadlistStatusUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProgressResponse {
    pub ebook_id: Uuid,
    pub current_location: Option<String>,
    pub progress: f64,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<ReadingProgress> for ProgressResponse {
    fn from(p: ReadingProgress) -> Self {
        Self {
            ebook_id: p.ebook_id,
            current_location: p.current_location,
            progress: p.progress,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ReadlistEntryResponse {
    pub ebook_id: Uuid,
    pub status: ReadlistStatus,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<ReadlistEntry> for ReadlistEntryResponse {
    fn from(e: ReadlistEntry) -> Self {
        Self {
            ebook_id: e.ebook_id,
            status: e.status,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ReadingLogResponse {
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub started_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub last_read_at: DateTime<Utc>,
    pub ebook: EbookResponse,
}

#[derive(Serialize)]
pub struct ReadlistItemResponse {
    #[serde(flatten)]
    pub entry: ReadlistEntryResponse,
    pub ebook: EbookResponse,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ReadingListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub status: Option<ReadlistStatus>,
}

// ── GET /users/@me/reading-logs ──────────────────────────────────────────────

pub async fn list_reading_logs(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<ReadingListQuery>,
) -> Result<Json<Vec<ReadingLogResponse>>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = ListReadingLogsUseCase {
        repo: state.reading_repo(),
    };
    let logs = uc
        .execute(user.id, page_request(query.per_page, query.page))
        .await?;
    let items = logs
        .into_iter()
        .map(|(log, ebook)| ReadingLogResponse {
            started_at: log.started_at,
            last_read_at: log.last_read_at,
            ebook: ebook.into(),
        })
        .collect();
    Ok(Json(items))
}

// ── GET /users/@me/progress/{ebook_id} ───────────────────────────────────────

pub async fn get_progress(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(ebook_id): Path<Uuid>,
) -> Result<Json<ProgressResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = GetProgressUseCase {
        repo: state.reading_repo(),
    };
    let progress = uc.execute(user.id, ebook_id).await?;
    Ok(Json(progress.into()))
}

// ── PUT /users/@me/progress/{ebook_id} ───────────────────────────────────────

#[derive(Deserialize)]
pub struct SaveProgressRequest {
    pub progress: f64,
    pub current_location: Option<String>,
}

#[derive(Serialize)]
pub struct SaveProgressResponse {
    #[serde(flatten)]
    pub progress: ProgressResponse,
    pub readlist: Option<ReadlistEntryResponse>,
}

pub async fn save_progress(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(ebook_id): Path<Uuid>,
    Json(body): Json<SaveProgressRequest>,
) -> Result<Json<SaveProgressResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = SaveProgressUseCase {
        repo: state.reading_repo(),
        catalog: state.catalog_repo(),
    };
    let saved = uc
        .execute(
            user.id,
            ebook_id,
            SaveProgressInput {
                progress: body.progress,
                current_location: body.current_location,
            },
        )
        .await?;
    Ok(Json(SaveProgressResponse {
        progress: saved.progress.into(),
        readlist: saved.readlist.map(Into::into),
    }))
}

// ── GET /users/@me/readlist ──────────────────────────────────────────────────

pub async fn list_readlist(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<ReadingListQuery>,
) -> Result<Json<Vec<ReadlistItemResponse>>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = ListReadlistUseCase {
        repo: state.reading_repo(),
    };
    let entries = uc
        .execute(
            user.id,
            query.status,
            page_request(query.per_page, query.page),
        )
        .await?;
    let items = entries
        .into_iter()
        .map(|(entry, ebook)| ReadlistItemResponse {
            entry: entry.into(),
            ebook: ebook.into(),
        })
        .collect();
    Ok(Json(items))
}

// ── PUT /users/@me/readlist/{ebook_id} ───────────────────────────────────────

#[derive(Deserialize)]
pub struct SetReadlistRequest {
    pub status: ReadlistStatus,
}

pub async fn set_readlist_status(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(ebook_id): Path<Uuid>,
    Json(body): Json<SetReadlistRequest>,
) -> Result<Json<ReadlistEntryResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = SetReadlistStatusUseCase {
        repo: state.reading_repo(),
        catalog: state.catalog_repo(),
    };
    let entry = uc.execute(user.id, ebook_id, body.status).await?;
    Ok(Json(entry.into()))
}

// ── DELETE /users/@me/readlist/{ebook_id} ────────────────────────────────────

pub async fn delete_readlist_entry(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(ebook_id): Path<Uuid>,
) -> Result<StatusCode, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = DeleteReadlistEntryUseCase {
        repo: state.reading_repo(),
    };
    uc.execute(user.id, ebook_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
