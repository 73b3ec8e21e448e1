use chrono::Utc;
use uuid::Uuid;

use lectern_domain::pagination::PageRequest;

use crate::domain::reading::{is_blank, validate_slug};
use crate::domain::repository::{AdminRepository, CatalogAdminRepository, CatalogRepository};
use crate::domain::types::{
    AdminEvent, AdminStats, Banner, BannerPatch, Category, CategoryPatch, CategoryRef, Ebook,
    EbookPatch, User,
};
use crate::error::LibraryServiceError;

pub const EBOOK_CREATED: &str = "EBOOK_CREATED";
pub const EBOOK_UPDATED: &str = "EBOOK_UPDATED";
pub const EBOOK_DELETED: &str = "EBOOK_DELETED";
pub const CATEGORY_CREATED: &str = "CATEGORY_CREATED";
pub const CATEGORY_UPDATED: &str = "CATEGORY_UPDATED";
pub const CATEGORY_DELETED: &str = "CATEGORY_DELETED";
pub const BANNER_CREATED: &str = "BANNER_CREATED";
pub const BANNER_UPDATED: &str = "BANNER_UPDATED";
pub const BANNER_DELETED: &str = "BANNER_DELETED";

fn admin_event(kind: &str, title: String, actor: &User, subject_id: Uuid) -> AdminEvent {
    AdminEvent::new(kind, title)
        .with_description(format!("by {}", actor.email))
        .with_metadata(serde_json::json!({
            "subject_id": subject_id,
            "actor_id": actor.id,
        }))
}

fn require_text(field: &'static str, value: &str) -> Result<(), LibraryServiceError> {
    if is_blank(value) {
        return Err(LibraryServiceError::EmptyField(field));
    }
    Ok(())
}

// ── Stats & events ───────────────────────────────────────────────────────────

pub struct AdminStatsUseCase<A: AdminRepository> {
    pub repo: A,
}

impl<A: AdminRepository> AdminStatsUseCase<A> {
    pub async fn execute(&self) -> Result<AdminStats, LibraryServiceError> {
        self.repo.stats(Utc::now()).await
    }
}

pub struct ListAdminEventsUseCase<A: AdminRepository> {
    pub repo: A,
}

impl<A: AdminRepository> ListAdminEventsUseCase<A> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<AdminEvent>, LibraryServiceError> {
        self.repo.list_events(page).await
    }
}

// ── Ebooks ───────────────────────────────────────────────────────────────────

pub struct CreateEbookInput {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pdf_url: Option<String>,
    pub public_id: Option<String>,
    pub category_id: Uuid,
    pub is_premium: bool,
    pub is_active: bool,
    pub priority: i32,
}

pub struct UpdateEbookInput {
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

pub struct ManageEbooksUseCase<C: CatalogRepository, A: CatalogAdminRepository> {
    pub catalog: C,
    pub admin: A,
}

impl<C: CatalogRepository, A: CatalogAdminRepository> ManageEbooksUseCase<C, A> {
    async fn category_ref(&self, id: Uuid) -> Result<CategoryRef, LibraryServiceError> {
        let category = self
            .catalog
            .find_category(id)
            .await?
            .ok_or(LibraryServiceError::CategoryNotFound)?;
        Ok(CategoryRef {
            id: category.id,
            name: category.name,
        })
    }

    pub async fn create(
        &self,
        actor: &User,
        input: CreateEbookInput,
    ) -> Result<Ebook, LibraryServiceError> {
        require_text("title", &input.title)?;
        require_text("author", &input.author)?;
        let category = self.category_ref(input.category_id).await?;
        let now = Utc::now();
        let ebook = Ebook {
            id: Uuid::now_v7(),
            title: input.title,
            author: input.author,
            description: input.description,
            cover_url: input.cover_url,
            pdf_url: input.pdf_url,
            public_id: input.public_id,
            category: category.name,
            category_id: Some(category.id),
            is_premium: input.is_premium,
            is_active: input.is_active,
            priority: input.priority,
            created_at: now,
            updated_at: now,
        };
        let event = admin_event(
            EBOOK_CREATED,
            format!("Ebook \"{}\" created", ebook.title),
            actor,
            ebook.id,
        );
        self.admin.create_ebook(&ebook, &event).await
    }

    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        input: UpdateEbookInput,
    ) -> Result<Ebook, LibraryServiceError> {
        if let Some(title) = &input.title {
            require_text("title", title)?;
        }
        if let Some(author) = &input.author {
            require_text("author", author)?;
        }
        let category = match input.category_id {
            Some(category_id) => Some(self.category_ref(category_id).await?),
            None => None,
        };
        let patch = EbookPatch {
            title: input.title,
            author: input.author,
            description: input.description,
            cover_url: input.cover_url,
            pdf_url: input.pdf_url,
            public_id: input.public_id,
            category,
            is_premium: input.is_premium,
            is_active: input.is_active,
            priority: input.priority,
        };
        if patch.is_empty() {
            return Err(LibraryServiceError::MissingData);
        }
        let event = admin_event(EBOOK_UPDATED, format!("Ebook {id} updated"), actor, id);
        self.admin
            .update_ebook(id, &patch, &event)
            .await?
            .ok_or(LibraryServiceError::EbookNotFound)
    }

    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), LibraryServiceError> {
        let event = admin_event(EBOOK_DELETED, format!("Ebook {id} deleted"), actor, id);
        if !self.admin.delete_ebook(id, &event).await? {
            return Err(LibraryServiceError::EbookNotFound);
        }
        Ok(())
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

pub struct CreateCategoryInput {
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

pub struct ManageCategoriesUseCase<A: CatalogAdminRepository> {
    pub admin: A,
}

impl<A: CatalogAdminRepository> ManageCategoriesUseCase<A> {
    pub async fn create(
        &self,
        actor: &User,
        input: CreateCategoryInput,
    ) -> Result<Category, LibraryServiceError> {
        require_text("name", &input.name)?;
        if !validate_slug(&input.slug) {
            return Err(LibraryServiceError::InvalidSlug);
        }
        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
            icon: input.icon,
            description: input.description,
            display_order: input.display_order,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        let event = admin_event(
            CATEGORY_CREATED,
            format!("Category \"{}\" created", category.name),
            actor,
            category.id,
        );
        self.admin.create_category(&category, &event).await
    }

    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Category, LibraryServiceError> {
        if patch.is_empty() {
            return Err(LibraryServiceError::MissingData);
        }
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if patch.slug.as_deref().is_some_and(|s| !validate_slug(s)) {
            return Err(LibraryServiceError::InvalidSlug);
        }
        let event = admin_event(CATEGORY_UPDATED, format!("Category {id} updated"), actor, id);
        self.admin
            .update_category(id, &patch, &event)
            .await?
            .ok_or(LibraryServiceError::CategoryNotFound)
    }

    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), LibraryServiceError> {
        let event = admin_event(CATEGORY_DELETED, format!("Category {id} deleted"), actor, id);
        if !self.admin.delete_category(id, &event).await? {
            return Err(LibraryServiceError::CategoryNotFound);
        }
        Ok(())
    }
}

// ── Banners ──────────────────────────────────────────────────────────────────

pub struct CreateBannerInput {
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub priority: i32,
}

pub struct ManageBannersUseCase<A: CatalogAdminRepository> {
    pub admin: A,
}

impl<A: CatalogAdminRepository> ManageBannersUseCase<A> {
    pub async fn create(
        &self,
        actor: &User,
        input: CreateBannerInput,
    ) -> Result<Banner, LibraryServiceError> {
        require_text("title", &input.title)?;
        let now = Utc::now();
        let banner = Banner {
            id: Uuid::now_v7(),
            title: input.title,
            subtitle: input.subtitle,
            cta_label: input.cta_label,
            cta_link: input.cta_link,
            image_url: input.image_url,
            is_active: input.is_active,
            priority: input.priority,
            created_at: now,
            updated_at: now,
        };
        let event = admin_event(
            BANNER_CREATED,
            format!("Banner \"{}\" created", banner.title),
            actor,
            banner.id,
        );
        self.admin.create_banner(&banner, &event).await
    }

    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        patch: BannerPatch,
    ) -> Result<Banner, LibraryServiceError> {
        if patch.is_empty() {
            return Err(LibraryServiceError::MissingData);
        }
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        let event = admin_event(BANNER_UPDATED, format!("Banner {id} updated"), actor, id);
        self.admin
            .update_banner(id, &patch, &event)
            .await?
            .ok_or(LibraryServiceError::BannerNotFound)
    }

    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), LibraryServiceError> {
        let event = admin_event(BANNER_DELETED, format!("Banner {id} deleted"), actor, id);
        if !self.admin.delete_banner(id, &event).await? {
            return Err(LibraryServiceError::BannerNotFound);
        }
        Ok(())
    }
}
