use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lectern_core::identity::IdentityHeaders;

use crate::domain::types::{Annotation, AnnotationPatch};
use crate::error::LibraryServiceError;
use crate::handlers::current_user;
use crate::state::AppState;
use crate::usecase::annotation::{
    CreateAnnotationInput, CreateAnnotationUseCase, DeleteAnnotationUseCase,
    ListAnnotationsUseCase, UpdateAnnotationUseCase,
};

#[derive(Serialize)]
pub struct AnnotationResponse {
    pub id: Uuid,
    pub ebook_id: Uuid,
    pub cfi_range: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Option<String>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Annotation> for AnnotationResponse {
    fn from(a: Annotation) -> Self {
        Self {
            id: a.id,
            ebook_id: a.ebook_id,
            cfi_range: a.cfi_range,
            text: a.text,
            kind: a.kind,
            color: a.color,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// ── GET /users/@me/ebooks/{ebook_id}/annotations ─────────────────────────────

pub async fn list_annotations(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(ebook_id): Path<Uuid>,
) -> Result<Json<Vec<AnnotationResponse>>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = ListAnnotationsUseCase {
        repo: state.annotation_repo(),
    };
    let annotations = uc.execute(user.id, ebook_id).await?;
    Ok(Json(annotations.into_iter().map(Into::into).collect()))
}

// ── POST /users/@me/ebooks/{ebook_id}/annotations ────────────────────────────

#[derive(Deserialize)]
pub struct CreateAnnotationRequest {
    pub cfi_range: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Option<String>,
}

pub async fn create_annotation(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(ebook_id): Path<Uuid>,
    Json(body): Json<CreateAnnotationRequest>,
) -> Result<(StatusCode, Json<AnnotationResponse>), LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = CreateAnnotationUseCase {
        repo: state.annotation_repo(),
        catalog: state.catalog_repo(),
    };
    let annotation = uc
        .execute(
            user.id,
            ebook_id,
            CreateAnnotationInput {
                cfi_range: body.cfi_range,
                text: body.text,
                kind: body.kind,
                color: body.color,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(annotation.into())))
}

// ── PATCH /users/@me/annotations/{id} ────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateAnnotationRequest {
    pub text: Option<String>,
    pub color: Option<String>,
}

pub async fn update_annotation(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAnnotationRequest>,
) -> Result<Json<AnnotationResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = UpdateAnnotationUseCase {
        repo: state.annotation_repo(),
    };
    let annotation = uc
        .execute(
            user.id,
            id,
            AnnotationPatch {
                text: body.text,
                color: body.color,
            },
        )
        .await?;
    Ok(Json(annotation.into()))
}

// ── DELETE /users/@me/annotations/{id} ───────────────────────────────────────

pub async fn delete_annotation(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = DeleteAnnotationUseCase {
        repo: state.annotation_repo(),
    };
    uc.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
