pub mod admin;
pub mod annotation;
pub mod catalog;
pub mod payment;
pub mod reading;
pub mod subscription;
pub mod user;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use lectern_core::identity::IdentityHeaders;
use lectern_domain::pagination::PageRequest;

use crate::domain::types::{Banner, Category, Ebook, User};
use crate::error::LibraryServiceError;
use crate::state::AppState;
use crate::usecase::user::ResolveUserUseCase;

/// Load the caller's user record; unsynced callers get 404.
pub(crate) async fn current_user(
    state: &AppState,
    identity: &IdentityHeaders,
) -> Result<User, LibraryServiceError> {
    ResolveUserUseCase {
        repo: state.user_repo(),
    }
    .execute(&identity.firebase_uid)
    .await
}

/// Like [`current_user`], but 403 unless the caller is an admin.
pub(crate) async fn current_admin(
    state: &AppState,
    identity: &IdentityHeaders,
) -> Result<User, LibraryServiceError> {
    ResolveUserUseCase {
        repo: state.user_repo(),
    }
    .execute_admin(&identity.firebase_uid)
    .await
}

pub(crate) fn page_request(per_page: Option<u32>, page: Option<u32>) -> PageRequest {
    PageRequest::from_query(per_page, page)
}

// ── Shared response types ────────────────────────────────────────────────────

/// Public ebook card. Never carries the PDF location.
#[derive(Serialize)]
pub struct EbookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub category: String,
    pub category_id: Option<Uuid>,
    pub is_premium: bool,
    pub priority: i32,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Ebook> for EbookResponse {
    fn from(e: Ebook) -> Self {
        Self {
            id: e.id,
            title: e.title,
            author: e.author,
            description: e.description,
            cover_url: e.cover_url,
            category: e.category,
            category_id: e.category_id,
            is_premium: e.is_premium,
            priority: e.priority,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            icon: c.icon,
            description: c.description,
            display_order: c.display_order,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct BannerResponse {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub priority: i32,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Banner> for BannerResponse {
    fn from(b: Banner) -> Self {
        Self {
            id: b.id,
            title: b.title,
            subtitle: b.subtitle,
            cta_label: b.cta_label,
            cta_link: b.cta_link,
            image_url: b.image_url,
            is_active: b.is_active,
            priority: b.priority,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
