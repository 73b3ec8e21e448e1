use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lectern_core::identity::IdentityHeaders;
use lectern_domain::user::UserRole;

use crate::domain::types::{ProfileUpdate, User};
use crate::error::LibraryServiceError;
use crate::handlers::current_user;
use crate::state::AppState;
use crate::usecase::user::{GetMeUseCase, SyncUserInput, SyncUserUseCase, UpdateMeUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub firebase_uid: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            firebase_uid: u.firebase_uid,
            email: u.email,
            name: u.name,
            photo_url: u.photo_url,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub is_premium: bool,
}

// ── POST /users/sync ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SyncUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

pub async fn sync_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    body: Option<Json<SyncUserRequest>>,
) -> Result<Json<UserResponse>, LibraryServiceError> {
    let Json(body) = body.unwrap_or_default();
    let uc = SyncUserUseCase {
        repo: state.user_repo(),
    };
    let user = uc
        .execute(
            &identity.firebase_uid,
            identity.email.clone(),
            SyncUserInput {
                email: body.email,
                name: body.name,
                photo_url: body.photo_url,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = GetMeUseCase {
        subscriptions: state.subscription_repo(),
    };
    let me = uc.execute(user).await?;
    Ok(Json(MeResponse {
        user: me.user.into(),
        is_premium: me.is_premium,
    }))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

pub async fn update_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = UpdateMeUseCase {
        repo: state.user_repo(),
    };
    let user = uc
        .execute(
            user.id,
            ProfileUpdate {
                name: body.name,
                photo_url: body.photo_url,
            },
        )
        .await?;
    Ok(Json(user.into()))
}
