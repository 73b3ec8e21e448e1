use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lectern_core::identity::IdentityHeaders;
use lectern_domain::user::UserRole;

use crate::domain::types::{
    AdminEvent, AdminStats, BannerPatch, CategoryPatch, DailyActivity, Ebook, EbookReaders,
    StatusCount,
};
use crate::error::LibraryServiceError;
use crate::handlers::user::UserResponse;
use crate::handlers::{BannerResponse, CategoryResponse, current_admin, page_request};
use crate::infra::db::{DbCatalogAdminRepository, DbCatalogRepository};
use crate::state::AppState;
use crate::usecase::admin::{
    AdminStatsUseCase, CreateBannerInput, CreateCategoryInput, CreateEbookInput,
    ListAdminEventsUseCase, ManageBannersUseCase, ManageCategoriesUseCase, ManageEbooksUseCase,
    UpdateEbookInput,
};
use crate::usecase::user::SetUserRoleUseCase;

// ── GET /admin/stats ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatusCountResponse {
    pub status: String,
    pub count: u64,
}

#[derive(Serialize)]
pub struct EbookReadersResponse {
    pub ebook_id: Uuid,
    pub title: String,
    pub readers: u64,
}

#[derive(Serialize)]
pub struct DailyActivityResponse {
    pub day: NaiveDate,
    pub readers: u64,
}

#[derive(Serialize)]
pub struct AdminStatsResponse {
    pub total_users: u64,
    pub active_ebooks: u64,
    pub active_subscriptions: u64,
    pub settled_revenue: f64,
    pub subscriptions_by_status: Vec<StatusCountResponse>,
    pub top_ebooks: Vec<EbookReadersResponse>,
    pub daily_activity: Vec<DailyActivityResponse>,
}

impl From<StatusCount> for StatusCountResponse {
    fn from(s: StatusCount) -> Self {
        Self {
            status: s.status,
            count: s.count,
        }
    }
}

impl From<EbookReaders> for EbookReadersResponse {
    fn from(e: EbookReaders) -> Self {
        Self {
            ebook_id: e.ebook_id,
            title: e.title,
            readers: e.readers,
        }
    }
}

impl From<DailyActivity> for DailyActivityResponse {
    fn from(d: DailyActivity) -> Self {
        Self {
            day: d.day,
            readers: d.readers,
        }
    }
}

impl From<AdminStats> for AdminStatsResponse {
    fn from(s: AdminStats) -> Self {
        Self {
            total_users: s.total_users,
            active_ebooks: s.active_ebooks,
            active_subscriptions: s.active_subscriptions,
            settled_revenue: s.settled_revenue,
            subscriptions_by_status: s
                .subscriptions_by_status
                .into_iter()
                .map(Into::into)
                .collect(),
            top_ebooks: s.top_ebooks.into_iter().map(Into::into).collect(),
            daily_activity: s.daily_activity.into_iter().map(Into::into).collect(),
        }
    }
}

pub async fn get_stats(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<AdminStatsResponse>, LibraryServiceError> {
    current_admin(&state, &identity).await?;
    let uc = AdminStatsUseCase {
        repo: state.admin_repo(),
    };
    Ok(Json(uc.execute().await?.into()))
}

// ── GET /admin/events ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EventListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct AdminEventResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<AdminEvent> for AdminEventResponse {
    fn from(e: AdminEvent) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            title: e.title,
            description: e.description,
            metadata: e.metadata,
            created_at: e.created_at,
        }
    }
}

pub async fn list_events(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<AdminEventResponse>>, LibraryServiceError> {
    current_admin(&state, &identity).await?;
    let uc = ListAdminEventsUseCase {
        repo: state.admin_repo(),
    };
    let events = uc.execute(page_request(query.per_page, query.page)).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

// ── /admin/ebooks ────────────────────────────────────────────────────────────

/// Full ebook record, including the storage fields hidden from readers.
#[derive(Serialize)]
pub struct AdminEbookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pdf_url: Option<String>,
    pub public_id: Option<String>,
    pub category: String,
    pub category_id: Option<Uuid>,
    pub is_premium: bool,
    pub is_active: bool,
    pub priority: i32,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Ebook> for AdminEbookResponse {
    fn from(e: Ebook) -> Self {
        Self {
            id: e.id,
            title: e.title,
            author: e.author,
            description: e.description,
            cover_url: e.cover_url,
            pdf_url: e.pdf_url,
            public_id: e.public_id,
            category: e.category,
            category_id: e.category_id,
            is_premium: e.is_premium,
            is_active: e.is_active,
            priority: e.priority,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateEbookRequest {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pdf_url: Option<String>,
    pub public_id: Option<String>,
    pub category_id: Uuid,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Deserialize)]
pub struct UpdateEbookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pdf_url: Option<String>,
    pub public_id: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_premium: Option<bool>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
}

fn default_true() -> bool {
    true
}

fn ebooks_use_case(
    state: &AppState,
) -> ManageEbooksUseCase<DbCatalogRepository, DbCatalogAdminRepository> {
    ManageEbooksUseCase {
        catalog: state.catalog_repo(),
        admin: state.catalog_admin_repo(),
    }
}

pub async fn create_ebook(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateEbookRequest>,
) -> Result<(StatusCode, Json<AdminEbookResponse>), LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let ebook = ebooks_use_case(&state)
        .create(
            &admin,
            CreateEbookInput {
                title: body.title,
                author: body.author,
                description: body.description,
                cover_url: body.cover_url,
                pdf_url: body.pdf_url,
                public_id: body.public_id,
                category_id: body.category_id,
                is_premium: body.is_premium,
                is_active: body.is_active,
                priority: body.priority,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ebook.into())))
}

pub async fn update_ebook(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEbookRequest>,
) -> Result<Json<AdminEbookResponse>, LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let ebook = ebooks_use_case(&state)
        .update(
            &admin,
            id,
            UpdateEbookInput {
                title: body.title,
                author: body.author,
                description: body.description,
                cover_url: body.cover_url,
                pdf_url: body.pdf_url,
                public_id: body.public_id,
                category_id: body.category_id,
                is_premium: body.is_premium,
                is_active: body.is_active,
                priority: body.priority,
            },
        )
        .await?;
    Ok(Json(ebook.into()))
}

pub async fn delete_ebook(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    ebooks_use_case(&state).delete(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /admin/categories ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn create_category(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let uc = ManageCategoriesUseCase {
        admin: state.catalog_admin_repo(),
    };
    let category = uc
        .create(
            &admin,
            CreateCategoryInput {
                name: body.name,
                slug: body.slug,
                icon: body.icon,
                description: body.description,
                display_order: body.display_order,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update_category(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let uc = ManageCategoriesUseCase {
        admin: state.catalog_admin_repo(),
    };
    let category = uc
        .update(
            &admin,
            id,
            CategoryPatch {
                name: body.name,
                slug: body.slug,
                icon: body.icon,
                description: body.description,
                display_order: body.display_order,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Json(category.into()))
}

pub async fn delete_category(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let uc = ManageCategoriesUseCase {
        admin: state.catalog_admin_repo(),
    };
    uc.delete(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /admin/banners ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBannerRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Deserialize)]
pub struct UpdateBannerRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
}

pub async fn create_banner(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateBannerRequest>,
) -> Result<(StatusCode, Json<BannerResponse>), LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let uc = ManageBannersUseCase {
        admin: state.catalog_admin_repo(),
    };
    let banner = uc
        .create(
            &admin,
            CreateBannerInput {
                title: body.title,
                subtitle: body.subtitle,
                cta_label: body.cta_label,
                cta_link: body.cta_link,
                image_url: body.image_url,
                is_active: body.is_active,
                priority: body.priority,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(banner.into())))
}

pub async fn update_banner(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBannerRequest>,
) -> Result<Json<BannerResponse>, LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let uc = ManageBannersUseCase {
        admin: state.catalog_admin_repo(),
    };
    let banner = uc
        .update(
            &admin,
            id,
            BannerPatch {
                title: body.title,
                subtitle: body.subtitle,
                cta_label: body.cta_label,
                cta_link: body.cta_link,
                image_url: body.image_url,
                is_active: body.is_active,
                priority: body.priority,
            },
        )
        .await?;
    Ok(Json(banner.into()))
}

pub async fn delete_banner(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let uc = ManageBannersUseCase {
        admin: state.catalog_admin_repo(),
    };
    uc.delete(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /admin/users/{id}/role ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

pub async fn set_user_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<UserResponse>, LibraryServiceError> {
    let admin = current_admin(&state, &identity).await?;
    let uc = SetUserRoleUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(&admin, id, body.role).await?;
    Ok(Json(user.into()))
}
