use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lectern_core::identity::IdentityHeaders;
use lectern_domain::ebook::EbookSortBy;

use crate::error::LibraryServiceError;
use crate::handlers::reading::ProgressResponse;
use crate::handlers::{
    BannerResponse, CategoryResponse, EbookResponse, current_user, page_request,
};
use crate::state::AppState;
use crate::usecase::catalog::{
    GetEbookUseCase, ListBannersUseCase, ListCategoriesUseCase, ListCategoryEbooksUseCase,
    ListEbooksInput, ListEbooksUseCase, OpenEbookUseCase,
};

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EbookListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub sort_by: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub premium: Option<bool>,
}

fn sort_by(raw: Option<&str>) -> EbookSortBy {
    raw.and_then(EbookSortBy::from_kebab_case).unwrap_or_default()
}

// ── GET /categories ──────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, LibraryServiceError> {
    let uc = ListCategoriesUseCase {
        catalog: state.catalog_repo(),
    };
    let categories = uc.execute().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

// ── GET /categories/{slug}/ebooks ────────────────────────────────────────────

pub async fn list_category_ebooks(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<EbookListQuery>,
) -> Result<Json<Vec<EbookResponse>>, LibraryServiceError> {
    let uc = ListCategoryEbooksUseCase {
        catalog: state.catalog_repo(),
    };
    let ebooks = uc
        .execute(
            &slug,
            sort_by(query.sort_by.as_deref()),
            page_request(query.per_page, query.page),
        )
        .await?;
    Ok(Json(ebooks.into_iter().map(Into::into).collect()))
}

// ── GET /ebooks ──────────────────────────────────────────────────────────────

pub async fn list_ebooks(
    State(state): State<AppState>,
    Query(query): Query<EbookListQuery>,
) -> Result<Json<Vec<EbookResponse>>, LibraryServiceError> {
    let uc = ListEbooksUseCase {
        catalog: state.catalog_repo(),
    };
    let ebooks = uc
        .execute(ListEbooksInput {
            sort_by: sort_by(query.sort_by.as_deref()),
            page: page_request(query.per_page, query.page),
            category_slug: query.category,
            search: query.q,
            is_premium: query.premium,
        })
        .await?;
    Ok(Json(ebooks.into_iter().map(Into::into).collect()))
}

// ── GET /ebooks/{id} ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EbookDetailResponse {
    #[serde(flatten)]
    pub ebook: EbookResponse,
    pub category_detail: Option<CategoryResponse>,
}

pub async fn get_ebook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EbookDetailResponse>, LibraryServiceError> {
    let uc = GetEbookUseCase {
        catalog: state.catalog_repo(),
    };
    let (ebook, category) = uc.execute(id).await?;
    Ok(Json(EbookDetailResponse {
        ebook: ebook.into(),
        category_detail: category.map(Into::into),
    }))
}

// ── POST /ebooks/{id}/open ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OpenEbookResponse {
    pub ebook_id: Uuid,
    pub pdf_url: Option<String>,
    pub progress: Option<ProgressResponse>,
}

pub async fn open_ebook(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OpenEbookResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = OpenEbookUseCase {
        catalog: state.catalog_repo(),
        reading: state.reading_repo(),
        subscriptions: state.subscription_repo(),
    };
    let opened = uc.execute(&user, id).await?;
    Ok(Json(OpenEbookResponse {
        ebook_id: opened.ebook.id,
        pdf_url: opened.ebook.pdf_url,
        progress: opened.progress.map(Into::into),
    }))
}

// ── GET /banners ─────────────────────────────────────────────────────────────

pub async fn list_banners(
    State(state): State<AppState>,
) -> Result<Json<Vec<BannerResponse>>, LibraryServiceError> {
    let uc = ListBannersUseCase {
        catalog: state.catalog_repo(),
    };
    let banners = uc.execute().await?;
    Ok(Json(banners.into_iter().map(Into::into).collect()))
}
