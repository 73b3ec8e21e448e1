use chrono::Utc;
use uuid::Uuid;

use lectern_domain::ebook::EbookSortBy;
use lectern_domain::pagination::PageRequest;

use crate::domain::reading::is_blank;
use crate::domain::repository::{CatalogRepository, ReadingRepository, SubscriptionRepository};
use crate::domain::types::{Banner, Category, Ebook, EbookFilter, ReadingProgress, User};
use crate::error::LibraryServiceError;

// ── ListCategories ───────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListCategoriesUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Category>, LibraryServiceError> {
        self.catalog.list_categories().await
    }
}

// ── ListEbooks ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ListEbooksInput {
    pub category_slug: Option<String>,
    pub search: Option<String>,
    pub is_premium: Option<bool>,
    pub sort_by: EbookSortBy,
    pub page: PageRequest,
}

pub struct ListEbooksUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListEbooksUseCase<C> {
    /// An unknown or inactive category slug yields an empty page.
    pub async fn execute(&self, input: ListEbooksInput) -> Result<Vec<Ebook>, LibraryServiceError> {
        let category_id = match input.category_slug.as_deref() {
            Some(slug) => match self.catalog.find_category_by_slug(slug).await? {
                Some(category) => Some(category.id),
                None => return Ok(vec![]),
            },
            None => None,
        };
        let filter = EbookFilter {
            category_id,
            search: input.search.filter(|q| !is_blank(q)),
            is_premium: input.is_premium,
        };
        self.catalog
            .list_ebooks(&filter, input.sort_by, input.page)
            .await
    }
}

// ── ListCategoryEbooks ───────────────────────────────────────────────────────

pub struct ListCategoryEbooksUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListCategoryEbooksUseCase<C> {
    pub async fn execute(
        &self,
        slug: &str,
        sort_by: EbookSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ebook>, LibraryServiceError> {
        let category = self
            .catalog
            .find_category_by_slug(slug)
            .await?
            .ok_or(LibraryServiceError::CategoryNotFound)?;
        let filter = EbookFilter {
            category_id: Some(category.id),
            ..Default::default()
        };
        self.catalog.list_ebooks(&filter, sort_by, page).await
    }
}

// ── GetEbook ─────────────────────────────────────────────────────────────────

pub struct GetEbookUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> GetEbookUseCase<C> {
    pub async fn execute(
        &self,
        id: Uuid,
    ) -> Result<(Ebook, Option<Category>), LibraryServiceError> {
        self.catalog
            .find_ebook_with_category(id)
            .await?
            .filter(|(ebook, _)| ebook.is_active)
            .ok_or(LibraryServiceError::EbookNotFound)
    }
}

// ── ListBanners ──────────────────────────────────────────────────────────────

pub struct ListBannersUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListBannersUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Banner>, LibraryServiceError> {
        self.catalog.list_banners().await
    }
}

// ── OpenEbook ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct OpenedEbook {
    pub ebook: Ebook,
    pub progress: Option<ReadingProgress>,
}

pub struct OpenEbookUseCase<C, R, S>
where
    C: CatalogRepository,
    R: ReadingRepository,
    S: SubscriptionRepository,
{
    pub catalog: C,
    pub reading: R,
    pub subscriptions: S,
}

impl<C, R, S> OpenEbookUseCase<C, R, S>
where
    C: CatalogRepository,
    R: ReadingRepository,
    S: SubscriptionRepository,
{
    /// Premium ebooks need a running subscription; admins read everything.
    pub async fn execute(
        &self,
        user: &User,
        ebook_id: Uuid,
    ) -> Result<OpenedEbook, LibraryServiceError> {
        let now = Utc::now();
        let ebook = self
            .catalog
            .find_ebook(ebook_id)
            .await?
            .filter(|e| e.is_active)
            .ok_or(LibraryServiceError::EbookNotFound)?;

        if ebook.is_premium && !user.role.is_admin() {
            let premium = self
                .subscriptions
                .find_by_user(user.id)
                .await?
                .is_some_and(|s| s.is_active_at(now));
            if !premium {
                return Err(LibraryServiceError::PremiumRequired);
            }
        }

        self.reading.touch_reading_log(user.id, ebook.id, now).await?;
        let progress = self.reading.find_progress(user.id, ebook.id).await?;
        Ok(OpenedEbook { ebook, progress })
    }
}
