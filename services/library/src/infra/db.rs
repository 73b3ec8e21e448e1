use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, FromQueryResult, Order,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use lectern_core::sea_ext::contains_pattern;
use lectern_domain::ebook::EbookSortBy;
use lectern_domain::pagination::{PageRequest, Sort};
use lectern_domain::reading::ReadlistStatus;
use lectern_domain::subscription::{SubscriptionStatus, TransactionStatus};
use lectern_domain::user::UserRole;
use lectern_library_client::{
    AggregateArgs, DataError, FindArgs, GroupByArgs, LibraryClient, ModelAccess,
    TransactionOptions,
};
use lectern_library_schema::{
    admin_events, annotations, banners, categories, ebooks, reading_logs, reading_progress,
    readlists, subscriptions, transactions, users,
};

use crate::domain::payment::{TransactionUpdate, payment_event_kind, transition_subscription};
use crate::domain::reading::advance_readlist;
use crate::domain::repository::{
    AdminRepository, AnnotationRepository, CatalogAdminRepository, CatalogRepository,
    PaymentRepository, ReadingRepository, SubscriptionRepository, UserRepository,
};
use crate::domain::types::{
    AdminEvent, AdminStats, Annotation, AnnotationPatch, Banner, BannerPatch, Category,
    CategoryPatch, Checkout, DailyActivity, Ebook, EbookFilter, EbookPatch, EbookReaders,
    PaymentOutcome, PaymentTransaction, PlanCatalog, ProfileUpdate, ProgressSaved, ReadingLog,
    ReadingProgress, ReadlistEntry, StatusCount, Subscription, SyncUser, User,
};
use crate::error::LibraryServiceError;

/// Map the facade's generic not-found onto a domain-specific one.
fn not_found_as(err: DataError, not_found: LibraryServiceError) -> LibraryServiceError {
    if err.is_not_found() {
        not_found
    } else {
        err.into()
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub client: LibraryClient,
}

impl UserRepository for DbUserRepository {
    async fn find_by_firebase_uid(&self, uid: &str) -> Result<Option<User>, LibraryServiceError> {
        let model = self
            .client
            .user()
            .find_first(FindArgs::new().filter(users::Column::FirebaseUid.eq(uid)))
            .await?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, LibraryServiceError> {
        let model = self.client.user().find_unique(id).await?;
        model.map(user_from_model).transpose()
    }

    async fn sync(&self, user: &SyncUser) -> Result<User, LibraryServiceError> {
        let now = Utc::now();
        let mut refreshed = vec![users::Column::Email, users::Column::UpdatedAt];
        if user.name.is_some() {
            refreshed.push(users::Column::Name);
        }
        if user.photo_url.is_some() {
            refreshed.push(users::Column::PhotoUrl);
        }
        let model = self
            .client
            .user()
            .upsert(
                users::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    firebase_uid: Set(user.firebase_uid.clone()),
                    email: Set(user.email.clone()),
                    name: Set(user.name.clone()),
                    photo_url: Set(user.photo_url.clone()),
                    role: Set(UserRole::default().as_str().to_owned()),
                    created_at: Set(now),
                    updated_at: Set(now),
                },
                &[users::Column::FirebaseUid],
                &refreshed,
            )
            .await?;
        user_from_model(model)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<User, LibraryServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = &update.name {
            am.name = Set(Some(name.clone()));
        }
        if let Some(photo_url) = &update.photo_url {
            am.photo_url = Set(Some(photo_url.clone()));
        }
        am.updated_at = Set(Utc::now());
        let model = self
            .client
            .user()
            .update(am)
            .await
            .map_err(|e| not_found_as(e, LibraryServiceError::UserNotFound))?;
        user_from_model(model)
    }

    async fn set_role(
        &self,
        id: Uuid,
        role: UserRole,
        event: &AdminEvent,
    ) -> Result<Option<User>, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let event = event.clone();
                Box::pin(async move {
                    let updated = tx
                        .user()
                        .update(users::ActiveModel {
                            id: Set(id),
                            role: Set(role.as_str().to_owned()),
                            updated_at: Set(Utc::now()),
                            ..Default::default()
                        })
                        .await;
                    let model = match updated {
                        Ok(model) => model,
                        Err(e) if e.is_not_found() => return Ok(None),
                        Err(e) => return Err(e.into()),
                    };
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(Some(user_from_model(model)?))
                })
            })
            .await
    }
}

fn user_from_model(model: users::Model) -> Result<User, LibraryServiceError> {
    Ok(User {
        id: model.id,
        role: model.role.parse().context("parse users.role")?,
        firebase_uid: model.firebase_uid,
        email: model.email,
        name: model.name,
        photo_url: model.photo_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Catalog repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCatalogRepository {
    pub client: LibraryClient,
}

impl CatalogRepository for DbCatalogRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, LibraryServiceError> {
        let models = self
            .client
            .category()
            .find_many(
                FindArgs::new()
                    .filter(categories::Column::IsActive.eq(true))
                    .order_by(categories::Column::DisplayOrder, Order::Asc)
                    .order_by(categories::Column::Name, Order::Asc),
            )
            .await?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, LibraryServiceError> {
        let model = self
            .client
            .category()
            .find_first(
                FindArgs::new()
                    .filter(categories::Column::Slug.eq(slug))
                    .filter(categories::Column::IsActive.eq(true)),
            )
            .await?;
        Ok(model.map(category_from_model))
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, LibraryServiceError> {
        let model = self.client.category().find_unique(id).await?;
        Ok(model.map(category_from_model))
    }

    async fn list_ebooks(
        &self,
        filter: &EbookFilter,
        sort_by: EbookSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ebook>, LibraryServiceError> {
        let mut args = FindArgs::new().filter(ebooks::Column::IsActive.eq(true));
        if let Some(category_id) = filter.category_id {
            args = args.filter(ebooks::Column::CategoryId.eq(category_id));
        }
        if let Some(is_premium) = filter.is_premium {
            args = args.filter(ebooks::Column::IsPremium.eq(is_premium));
        }
        if let Some(search) = filter.search.as_deref() {
            let pattern = contains_pattern(search);
            args = args.filter(
                Condition::any()
                    .add(Expr::col(ebooks::Column::Title).ilike(pattern.as_str()))
                    .add(Expr::col(ebooks::Column::Author).ilike(pattern.as_str())),
            );
        }
        args = match sort_by {
            EbookSortBy::PriorityDesc => args
                .order_by(ebooks::Column::Priority, Order::Desc)
                .order_by(ebooks::Column::CreatedAt, Order::Desc),
            EbookSortBy::CreatedAt(Sort::Desc) => {
                args.order_by(ebooks::Column::CreatedAt, Order::Desc)
            }
            EbookSortBy::CreatedAt(Sort::Asc) => {
                args.order_by(ebooks::Column::CreatedAt, Order::Asc)
            }
            EbookSortBy::TitleAsc => args.order_by(ebooks::Column::Title, Order::Asc),
            EbookSortBy::Random => args.order_randomly(),
        };
        let models = self.client.ebook().find_many(args.page(page)).await?;
        Ok(models.into_iter().map(ebook_from_model).collect())
    }

    async fn find_ebook(&self, id: Uuid) -> Result<Option<Ebook>, LibraryServiceError> {
        let model = self.client.ebook().find_unique(id).await?;
        Ok(model.map(ebook_from_model))
    }

    async fn find_ebook_with_category(
        &self,
        id: Uuid,
    ) -> Result<Option<(Ebook, Option<Category>)>, LibraryServiceError> {
        let rows = self
            .client
            .ebook()
            .find_many_with_parent(
                FindArgs::new().filter(ebooks::Column::Id.eq(id)).take(1),
                categories::Entity,
            )
            .await?;
        Ok(rows.into_iter().next().map(|(ebook, category)| {
            (ebook_from_model(ebook), category.map(category_from_model))
        }))
    }

    async fn list_banners(&self) -> Result<Vec<Banner>, LibraryServiceError> {
        let models = self
            .client
            .banner()
            .find_many(
                FindArgs::new()
                    .filter(banners::Column::IsActive.eq(true))
                    .order_by(banners::Column::Priority, Order::Desc)
                    .order_by(banners::Column::CreatedAt, Order::Desc),
            )
            .await?;
        Ok(models.into_iter().map(banner_from_model).collect())
    }
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
        icon: model.icon,
        description: model.description,
        display_order: model.display_order,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn ebook_from_model(model: ebooks::Model) -> Ebook {
    Ebook {
        id: model.id,
        title: model.title,
        author: model.author,
        description: model.description,
        cover_url: model.cover_url,
        pdf_url: model.pdf_url,
        public_id: model.public_id,
        category: model.category,
        category_id: model.category_id,
        is_premium: model.is_premium,
        is_active: model.is_active,
        priority: model.priority,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn banner_from_model(model: banners::Model) -> Banner {
    Banner {
        id: model.id,
        title: model.title,
        subtitle: model.subtitle,
        cta_label: model.cta_label,
        cta_link: model.cta_link,
        image_url: model.image_url,
        is_active: model.is_active,
        priority: model.priority,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Catalog admin repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCatalogAdminRepository {
    pub client: LibraryClient,
}

fn category_conflict(err: DataError) -> LibraryServiceError {
    match err {
        DataError::UniqueViolation(_) => LibraryServiceError::CategoryAlreadyExists,
        other => other.into(),
    }
}

impl CatalogAdminRepository for DbCatalogAdminRepository {
    async fn create_ebook(
        &self,
        ebook: &Ebook,
        event: &AdminEvent,
    ) -> Result<Ebook, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let ebook = ebook.clone();
                let event = event.clone();
                Box::pin(async move {
                    let model = tx
                        .ebook()
                        .create(ebooks::ActiveModel {
                            id: Set(ebook.id),
                            title: Set(ebook.title),
                            author: Set(ebook.author),
                            description: Set(ebook.description),
                            cover_url: Set(ebook.cover_url),
                            pdf_url: Set(ebook.pdf_url),
                            public_id: Set(ebook.public_id),
                            category: Set(ebook.category),
                            category_id: Set(ebook.category_id),
                            is_premium: Set(ebook.is_premium),
                            is_active: Set(ebook.is_active),
                            priority: Set(ebook.priority),
                            created_at: Set(ebook.created_at),
                            updated_at: Set(ebook.updated_at),
                        })
                        .await?;
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(ebook_from_model(model))
                })
            })
            .await
    }

    async fn update_ebook(
        &self,
        id: Uuid,
        patch: &EbookPatch,
        event: &AdminEvent,
    ) -> Result<Option<Ebook>, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let patch = patch.clone();
                let event = event.clone();
                Box::pin(async move {
                    let mut am = ebooks::ActiveModel {
                        id: Set(id),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    };
                    if let Some(title) = patch.title {
                        am.title = Set(title);
                    }
                    if let Some(author) = patch.author {
                        am.author = Set(author);
                    }
                    if let Some(description) = patch.description {
                        am.description = Set(Some(description));
                    }
                    if let Some(cover_url) = patch.cover_url {
                        am.cover_url = Set(Some(cover_url));
                    }
                    if let Some(pdf_url) = patch.pdf_url {
                        am.pdf_url = Set(Some(pdf_url));
                    }
                    if let Some(public_id) = patch.public_id {
                        am.public_id = Set(Some(public_id));
                    }
                    if let Some(category) = patch.category {
                        am.category_id = Set(Some(category.id));
                        am.category = Set(category.name);
                    }
                    if let Some(is_premium) = patch.is_premium {
                        am.is_premium = Set(is_premium);
                    }
                    if let Some(is_active) = patch.is_active {
                        am.is_active = Set(is_active);
                    }
                    if let Some(priority) = patch.priority {
                        am.priority = Set(priority);
                    }
                    let model = match tx.ebook().update(am).await {
                        Ok(model) => model,
                        Err(e) if e.is_not_found() => return Ok(None),
                        Err(e) => return Err(e.into()),
                    };
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(Some(ebook_from_model(model)))
                })
            })
            .await
    }

    async fn delete_ebook(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let event = event.clone();
                Box::pin(async move {
                    match tx.ebook().delete(id).await {
                        Ok(_) => {}
                        Err(e) if e.is_not_found() => return Ok(false),
                        Err(e) => return Err(e.into()),
                    }
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(true)
                })
            })
            .await
    }

    async fn create_category(
        &self,
        category: &Category,
        event: &AdminEvent,
    ) -> Result<Category, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let category = category.clone();
                let event = event.clone();
                Box::pin(async move {
                    let model = tx
                        .category()
                        .create(categories::ActiveModel {
                            id: Set(category.id),
                            name: Set(category.name),
                            slug: Set(category.slug),
                            icon: Set(category.icon),
                            description: Set(category.description),
                            display_order: Set(category.display_order),
                            is_active: Set(category.is_active),
                            created_at: Set(category.created_at),
                            updated_at: Set(category.updated_at),
                        })
                        .await
                        .map_err(category_conflict)?;
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(category_from_model(model))
                })
            })
            .await
    }

    async fn update_category(
        &self,
        id: Uuid,
        patch: &CategoryPatch,
        event: &AdminEvent,
    ) -> Result<Option<Category>, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let patch = patch.clone();
                let event = event.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let mut am = categories::ActiveModel {
                        id: Set(id),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    if let Some(name) = patch.name.clone() {
                        am.name = Set(name);
                    }
                    if let Some(slug) = patch.slug {
                        am.slug = Set(slug);
                    }
                    if let Some(icon) = patch.icon {
                        am.icon = Set(Some(icon));
                    }
                    if let Some(description) = patch.description {
                        am.description = Set(Some(description));
                    }
                    if let Some(display_order) = patch.display_order {
                        am.display_order = Set(display_order);
                    }
                    if let Some(is_active) = patch.is_active {
                        am.is_active = Set(is_active);
                    }
                    let model = match tx.category().update(am).await {
                        Ok(model) => model,
                        Err(e) if e.is_not_found() => return Ok(None),
                        Err(e) => return Err(category_conflict(e)),
                    };
                    if let Some(name) = patch.name {
                        let renamed = tx
                            .ebook()
                            .update_many(
                                Condition::all().add(ebooks::Column::CategoryId.eq(id)),
                                vec![
                                    (ebooks::Column::Category, Expr::value(name)),
                                    (ebooks::Column::UpdatedAt, Expr::value(now)),
                                ],
                            )
                            .await?;
                        tracing::debug!(category_id = %id, renamed, "renamed category on ebooks");
                    }
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(Some(category_from_model(model)))
                })
            })
            .await
    }

    async fn delete_category(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let event = event.clone();
                Box::pin(async move {
                    match tx.category().delete(id).await {
                        Ok(_) => {}
                        Err(e) if e.is_not_found() => return Ok(false),
                        Err(e) => return Err(e.into()),
                    }
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(true)
                })
            })
            .await
    }

    async fn create_banner(
        &self,
        banner: &Banner,
        event: &AdminEvent,
    ) -> Result<Banner, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let banner = banner.clone();
                let event = event.clone();
                Box::pin(async move {
                    let model = tx
                        .banner()
                        .create(banners::ActiveModel {
                            id: Set(banner.id),
                            title: Set(banner.title),
                            subtitle: Set(banner.subtitle),
                            cta_label: Set(banner.cta_label),
                            cta_link: Set(banner.cta_link),
                            image_url: Set(banner.image_url),
                            is_active: Set(banner.is_active),
                            priority: Set(banner.priority),
                            created_at: Set(banner.created_at),
                            updated_at: Set(banner.updated_at),
                        })
                        .await?;
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(banner_from_model(model))
                })
            })
            .await
    }

    async fn update_banner(
        &self,
        id: Uuid,
        patch: &BannerPatch,
        event: &AdminEvent,
    ) -> Result<Option<Banner>, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let patch = patch.clone();
                let event = event.clone();
                Box::pin(async move {
                    let mut am = banners::ActiveModel {
                        id: Set(id),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    };
                    if let Some(title) = patch.title {
                        am.title = Set(title);
                    }
                    if let Some(subtitle) = patch.subtitle {
                        am.subtitle = Set(Some(subtitle));
                    }
                    if let Some(cta_label) = patch.cta_label {
                        am.cta_label = Set(Some(cta_label));
                    }
                    if let Some(cta_link) = patch.cta_link {
                        am.cta_link = Set(Some(cta_link));
                    }
                    if let Some(image_url) = patch.image_url {
                        am.image_url = Set(Some(image_url));
                    }
                    if let Some(is_active) = patch.is_active {
                        am.is_active = Set(is_active);
                    }
                    if let Some(priority) = patch.priority {
                        am.priority = Set(priority);
                    }
                    let model = match tx.banner().update(am).await {
                        Ok(model) => model,
                        Err(e) if e.is_not_found() => return Ok(None),
                        Err(e) => return Err(e.into()),
                    };
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(Some(banner_from_model(model)))
                })
            })
            .await
    }

    async fn delete_banner(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let event = event.clone();
                Box::pin(async move {
                    match tx.banner().delete(id).await {
                        Ok(_) => {}
                        Err(e) if e.is_not_found() => return Ok(false),
                        Err(e) => return Err(e.into()),
                    }
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(true)
                })
            })
            .await
    }
}

fn admin_event_model(event: &AdminEvent) -> admin_events::ActiveModel {
    admin_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        title: Set(event.title.clone()),
        description: Set(event.description.clone()),
        metadata: Set(event.metadata.clone()),
        created_at: Set(event.created_at),
    }
}

fn admin_event_from_model(model: admin_events::Model) -> AdminEvent {
    AdminEvent {
        id: model.id,
        kind: model.kind,
        title: model.title,
        description: model.description,
        metadata: model.metadata,
        created_at: model.created_at,
    }
}

// ── Reading repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReadingRepository {
    pub client: LibraryClient,
}

impl ReadingRepository for DbReadingRepository {
    async fn touch_reading_log(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ReadingLog, LibraryServiceError> {
        let model = self
            .client
            .reading_log()
            .upsert(
                reading_logs::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(user_id),
                    ebook_id: Set(ebook_id),
                    started_at: Set(now),
                    last_read_at: Set(now),
                },
                &[reading_logs::Column::UserId, reading_logs::Column::EbookId],
                &[reading_logs::Column::LastReadAt],
            )
            .await?;
        Ok(reading_log_from_model(model))
    }

    async fn list_reading_logs(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<(ReadingLog, Ebook)>, LibraryServiceError> {
        let rows = self
            .client
            .reading_log()
            .find_many_with_parent(
                FindArgs::new()
                    .filter(reading_logs::Column::UserId.eq(user_id))
                    .order_by(reading_logs::Column::LastReadAt, Order::Desc)
                    .page(page),
                ebooks::Entity,
            )
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(log, ebook)| {
                Some((reading_log_from_model(log), ebook_from_model(ebook?)))
            })
            .collect())
    }

    async fn find_progress(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Option<ReadingProgress>, LibraryServiceError> {
        let model = self
            .client
            .reading_progress()
            .find_first(
                FindArgs::new()
                    .filter(reading_progress::Column::UserId.eq(user_id))
                    .filter(reading_progress::Column::EbookId.eq(ebook_id)),
            )
            .await?;
        Ok(model.map(progress_from_model))
    }

    async fn save_progress(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        progress: f64,
        current_location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ProgressSaved, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let current_location = current_location.map(str::to_owned);
                Box::pin(async move {
                    let saved = tx
                        .reading_progress()
                        .upsert(
                            reading_progress::ActiveModel {
                                id: Set(Uuid::now_v7()),
                                user_id: Set(user_id),
                                ebook_id: Set(ebook_id),
                                current_location: Set(current_location),
                                progress: Set(progress),
                                created_at: Set(now),
                                updated_at: Set(now),
                            },
                            &[
                                reading_progress::Column::UserId,
                                reading_progress::Column::EbookId,
                            ],
                            &[
                                reading_progress::Column::CurrentLocation,
                                reading_progress::Column::Progress,
                                reading_progress::Column::UpdatedAt,
                            ],
                        )
                        .await?;

                    let entry = tx
                        .readlist()
                        .find_first(
                            FindArgs::new()
                                .filter(readlists::Column::UserId.eq(user_id))
                                .filter(readlists::Column::EbookId.eq(ebook_id))
                                .lock_for_update(),
                        )
                        .await?;
                    let readlist = match entry {
                        Some(model) => {
                            let current: ReadlistStatus =
                                model.status.parse().context("parse readlists.status")?;
                            let model = match advance_readlist(current, progress) {
                                Some(next) => {
                                    tx.readlist()
                                        .update(readlists::ActiveModel {
                                            id: Set(model.id),
                                            status: Set(next.as_str().to_owned()),
                                            updated_at: Set(now),
                                            ..Default::default()
                                        })
                                        .await?
                                }
                                None => model,
                            };
                            Some(readlist_from_model(model)?)
                        }
                        None => None,
                    };

                    Ok(ProgressSaved {
                        progress: progress_from_model(saved),
                        readlist,
                    })
                })
            })
            .await
    }

    async fn list_readlist(
        &self,
        user_id: Uuid,
        status: Option<ReadlistStatus>,
        page: PageRequest,
    ) -> Result<Vec<(ReadlistEntry, Ebook)>, LibraryServiceError> {
        let mut args = FindArgs::new().filter(readlists::Column::UserId.eq(user_id));
        if let Some(status) = status {
            args = args.filter(readlists::Column::Status.eq(status.as_str()));
        }
        let rows = self
            .client
            .readlist()
            .find_many_with_parent(
                args.order_by(readlists::Column::UpdatedAt, Order::Desc)
                    .page(page),
                ebooks::Entity,
            )
            .await?;
        let mut entries = Vec::with_capacity(rows.len());
        for (entry, ebook) in rows {
            if let Some(ebook) = ebook {
                entries.push((readlist_from_model(entry)?, ebook_from_model(ebook)));
            }
        }
        Ok(entries)
    }

    async fn set_readlist_status(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        status: ReadlistStatus,
        now: DateTime<Utc>,
    ) -> Result<ReadlistEntry, LibraryServiceError> {
        let model = self
            .client
            .readlist()
            .upsert(
                readlists::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(user_id),
                    ebook_id: Set(ebook_id),
                    status: Set(status.as_str().to_owned()),
                    created_at: Set(now),
                    updated_at: Set(now),
                },
                &[readlists::Column::UserId, readlists::Column::EbookId],
                &[readlists::Column::Status, readlists::Column::UpdatedAt],
            )
            .await?;
        readlist_from_model(model)
    }

    async fn delete_readlist_entry(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<bool, LibraryServiceError> {
        let deleted = self
            .client
            .readlist()
            .delete_many(
                Condition::all()
                    .add(readlists::Column::UserId.eq(user_id))
                    .add(readlists::Column::EbookId.eq(ebook_id)),
            )
            .await?;
        Ok(deleted > 0)
    }
}

fn reading_log_from_model(model: reading_logs::Model) -> ReadingLog {
    ReadingLog {
        id: model.id,
        user_id: model.user_id,
        ebook_id: model.ebook_id,
        started_at: model.started_at,
        last_read_at: model.last_read_at,
    }
}

fn progress_from_model(model: reading_progress::Model) -> ReadingProgress {
    ReadingProgress {
        id: model.id,
        user_id: model.user_id,
        ebook_id: model.ebook_id,
        current_location: model.current_location,
        progress: model.progress,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn readlist_from_model(model: readlists::Model) -> Result<ReadlistEntry, LibraryServiceError> {
    Ok(ReadlistEntry {
        id: model.id,
        user_id: model.user_id,
        ebook_id: model.ebook_id,
        status: model.status.parse().context("parse readlists.status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Annotation repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAnnotationRepository {
    pub client: LibraryClient,
}

impl AnnotationRepository for DbAnnotationRepository {
    async fn list(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Vec<Annotation>, LibraryServiceError> {
        let models = self
            .client
            .annotation()
            .find_many(
                FindArgs::new()
                    .filter(annotations::Column::UserId.eq(user_id))
                    .filter(annotations::Column::EbookId.eq(ebook_id))
                    .order_by(annotations::Column::CreatedAt, Order::Asc),
            )
            .await?;
        Ok(models.into_iter().map(annotation_from_model).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Annotation>, LibraryServiceError> {
        let model = self.client.annotation().find_unique(id).await?;
        Ok(model.map(annotation_from_model))
    }

    async fn create(&self, annotation: &Annotation) -> Result<Annotation, LibraryServiceError> {
        let model = self
            .client
            .annotation()
            .create(annotations::ActiveModel {
                id: Set(annotation.id),
                user_id: Set(annotation.user_id),
                ebook_id: Set(annotation.ebook_id),
                cfi_range: Set(annotation.cfi_range.clone()),
                text: Set(annotation.text.clone()),
                kind: Set(annotation.kind.clone()),
                color: Set(annotation.color.clone()),
                created_at: Set(annotation.created_at),
                updated_at: Set(annotation.updated_at),
            })
            .await?;
        Ok(annotation_from_model(model))
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &AnnotationPatch,
        now: DateTime<Utc>,
    ) -> Result<Annotation, LibraryServiceError> {
        let mut am = annotations::ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(text) = &patch.text {
            am.text = Set(text.clone());
        }
        if let Some(color) = &patch.color {
            am.color = Set(Some(color.clone()));
        }
        let model = self
            .client
            .annotation()
            .update(am)
            .await
            .map_err(|e| not_found_as(e, LibraryServiceError::AnnotationNotFound))?;
        Ok(annotation_from_model(model))
    }

    async fn delete(&self, id: Uuid) -> Result<(), LibraryServiceError> {
        self.client
            .annotation()
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, LibraryServiceError::AnnotationNotFound))?;
        Ok(())
    }
}

fn annotation_from_model(model: annotations::Model) -> Annotation {
    Annotation {
        id: model.id,
        user_id: model.user_id,
        ebook_id: model.ebook_id,
        cfi_range: model.cfi_range,
        text: model.text,
        kind: model.kind,
        color: model.color,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Subscription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriptionRepository {
    pub client: LibraryClient,
}

impl SubscriptionRepository for DbSubscriptionRepository {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, LibraryServiceError> {
        let model = self
            .client
            .subscription()
            .find_first(FindArgs::new().filter(subscriptions::Column::UserId.eq(user_id)))
            .await?;
        model.map(subscription_from_model).transpose()
    }

    async fn checkout(
        &self,
        user_id: Uuid,
        plan_name: &str,
        order_id: &str,
        gross_amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Checkout, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let plan_name = plan_name.to_owned();
                let order_id = order_id.to_owned();
                Box::pin(async move {
                    let current = tx
                        .subscription()
                        .find_first(
                            FindArgs::new()
                                .filter(subscriptions::Column::UserId.eq(user_id))
                                .lock_for_update(),
                        )
                        .await?;
                    if let Some(current) = current {
                        if subscription_from_model(current)?.is_active_at(now) {
                            return Err(LibraryServiceError::SubscriptionActive);
                        }
                    }

                    let subscription = tx
                        .subscription()
                        .upsert(
                            subscriptions::ActiveModel {
                                id: Set(Uuid::now_v7()),
                                user_id: Set(user_id),
                                status: Set(SubscriptionStatus::Pending.as_str().to_owned()),
                                plan_name: Set(plan_name),
                                start_date: Set(None),
                                end_date: Set(None),
                                order_id: Set(Some(order_id.clone())),
                                transaction_id: Set(None),
                                gross_amount: Set(Some(gross_amount)),
                                created_at: Set(now),
                                updated_at: Set(now),
                            },
                            &[subscriptions::Column::UserId],
                            &[
                                subscriptions::Column::Status,
                                subscriptions::Column::PlanName,
                                subscriptions::Column::StartDate,
                                subscriptions::Column::EndDate,
                                subscriptions::Column::OrderId,
                                subscriptions::Column::TransactionId,
                                subscriptions::Column::GrossAmount,
                                subscriptions::Column::UpdatedAt,
                            ],
                        )
                        .await?;
                    let transaction = tx
                        .transaction()
                        .create(transactions::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            subscription_id: Set(subscription.id),
                            order_id: Set(order_id),
                            transaction_status: Set(TransactionStatus::Pending.as_str().to_owned()),
                            gross_amount: Set(gross_amount),
                            payment_type: Set(None),
                            transaction_time: Set(None),
                            settlement_time: Set(None),
                            webhook_payload: Set(None),
                            created_at: Set(now),
                            updated_at: Set(now),
                        })
                        .await?;
                    Ok(Checkout {
                        subscription: subscription_from_model(subscription)?,
                        transaction: transaction_from_model(transaction)?,
                    })
                })
            })
            .await
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, LibraryServiceError> {
        let expired = self
            .client
            .subscription()
            .update_many(
                Condition::all()
                    .add(subscriptions::Column::Status.eq(SubscriptionStatus::Active.as_str()))
                    .add(subscriptions::Column::EndDate.lt(now)),
                vec![
                    (
                        subscriptions::Column::Status,
                        Expr::value(SubscriptionStatus::Expired.as_str()),
                    ),
                    (subscriptions::Column::UpdatedAt, Expr::value(now)),
                ],
            )
            .await?;
        Ok(expired)
    }
}

fn subscription_from_model(
    model: subscriptions::Model,
) -> Result<Subscription, LibraryServiceError> {
    Ok(Subscription {
        id: model.id,
        user_id: model.user_id,
        status: model.status.parse().context("parse subscriptions.status")?,
        plan_name: model.plan_name,
        start_date: model.start_date,
        end_date: model.end_date,
        order_id: model.order_id,
        transaction_id: model.transaction_id,
        gross_amount: model.gross_amount,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn subscription_active_model(subscription: &Subscription) -> subscriptions::ActiveModel {
    subscriptions::ActiveModel {
        id: Set(subscription.id),
        status: Set(subscription.status.as_str().to_owned()),
        plan_name: Set(subscription.plan_name.clone()),
        start_date: Set(subscription.start_date),
        end_date: Set(subscription.end_date),
        order_id: Set(subscription.order_id.clone()),
        transaction_id: Set(subscription.transaction_id.clone()),
        gross_amount: Set(subscription.gross_amount),
        updated_at: Set(subscription.updated_at),
        ..Default::default()
    }
}

// ── Payment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPaymentRepository {
    pub client: LibraryClient,
}

impl PaymentRepository for DbPaymentRepository {
    async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<PaymentTransaction>, LibraryServiceError> {
        let model = self
            .client
            .transaction()
            .find_first(FindArgs::new().filter(transactions::Column::OrderId.eq(order_id)))
            .await?;
        model.map(transaction_from_model).transpose()
    }

    async fn apply_notification(
        &self,
        order_id: &str,
        update: &TransactionUpdate,
        plans: &PlanCatalog,
        now: DateTime<Utc>,
    ) -> Result<PaymentOutcome, LibraryServiceError> {
        self.client
            .with_transaction::<_, _, LibraryServiceError>(TransactionOptions::default(), |tx| {
                let order_id = order_id.to_owned();
                let update = update.clone();
                let plans = plans.clone();
                Box::pin(async move {
                    let stored = tx
                        .transaction()
                        .find_first(
                            FindArgs::new()
                                .filter(transactions::Column::OrderId.eq(order_id.as_str()))
                                .lock_for_update(),
                        )
                        .await?
                        .ok_or(LibraryServiceError::TransactionNotFound)?;
                    let stored = transaction_from_model(stored)?;
                    if stored.status.is_final() {
                        return Ok(PaymentOutcome::Ignored);
                    }
                    if stored.gross_amount != update.gross_amount {
                        return Err(LibraryServiceError::GrossAmountMismatch);
                    }

                    // Only the delivery that moves the row off the status read
                    // above may touch the subscription.
                    let claimed = tx
                        .transaction()
                        .update_many(
                            Condition::all()
                                .add(transactions::Column::Id.eq(stored.id))
                                .add(
                                    transactions::Column::TransactionStatus
                                        .eq(stored.status.as_str()),
                                ),
                            vec![
                                (
                                    transactions::Column::TransactionStatus,
                                    Expr::value(update.status.as_str()),
                                ),
                                (
                                    transactions::Column::PaymentType,
                                    Expr::value(update.payment_type.clone().or(stored.payment_type)),
                                ),
                                (
                                    transactions::Column::TransactionTime,
                                    Expr::value(update.transaction_time.or(stored.transaction_time)),
                                ),
                                (
                                    transactions::Column::SettlementTime,
                                    Expr::value(update.settlement_time.or(stored.settlement_time)),
                                ),
                                (
                                    transactions::Column::WebhookPayload,
                                    Expr::value(update.payload.clone()),
                                ),
                                (transactions::Column::UpdatedAt, Expr::value(now)),
                            ],
                        )
                        .await?;
                    if claimed == 0 {
                        tracing::debug!(%order_id, "notification lost the claim, ignoring");
                        return Ok(PaymentOutcome::Ignored);
                    }

                    let subscription = tx
                        .subscription()
                        .find_first_or_throw(
                            FindArgs::new()
                                .filter(subscriptions::Column::Id.eq(stored.subscription_id))
                                .lock_for_update(),
                        )
                        .await?;
                    let subscription = subscription_from_model(subscription)?;
                    let plan = plans.get(&subscription.plan_name);
                    if let Some(next) =
                        transition_subscription(&subscription, &order_id, &update, plan, now)?
                    {
                        tx.subscription()
                            .update(subscription_active_model(&next))
                            .await?;
                        tracing::info!(
                            %order_id,
                            from = %subscription.status,
                            to = %next.status,
                            "subscription transitioned"
                        );
                    }

                    let event = AdminEvent::new(
                        payment_event_kind(update.status),
                        format!("Payment {} for order {order_id}", update.status),
                    )
                    .with_metadata(serde_json::json!({
                        "order_id": order_id,
                        "subscription_id": subscription.id,
                        "user_id": subscription.user_id,
                        "gross_amount": update.gross_amount,
                    }));
                    tx.admin_event().create(admin_event_model(&event)).await?;
                    Ok(PaymentOutcome::Applied)
                })
            })
            .await
    }
}

fn transaction_from_model(
    model: transactions::Model,
) -> Result<PaymentTransaction, LibraryServiceError> {
    Ok(PaymentTransaction {
        id: model.id,
        subscription_id: model.subscription_id,
        status: model
            .transaction_status
            .parse()
            .context("parse transactions.transaction_status")?,
        order_id: model.order_id,
        gross_amount: model.gross_amount,
        payment_type: model.payment_type,
        transaction_time: model.transaction_time,
        settlement_time: model.settlement_time,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Admin repository ─────────────────────────────────────────────────────────

/// Distinct readers per day over the trailing window, oldest day first.
const DAILY_ACTIVITY_SQL: &str = r#"
SELECT CAST("last_read_at" AS DATE) AS "day", COUNT(DISTINCT "user_id") AS "readers"
FROM "reading_logs"
WHERE "last_read_at" >= $1
GROUP BY 1
ORDER BY 1
"#;

const ACTIVITY_WINDOW_DAYS: i64 = 7;
const TOP_EBOOKS: u64 = 10;

#[derive(Debug, FromQueryResult)]
struct DailyActivityRow {
    day: chrono::NaiveDate,
    readers: i64,
}

#[derive(Clone)]
pub struct DbAdminRepository {
    pub client: LibraryClient,
}

impl AdminRepository for DbAdminRepository {
    async fn stats(&self, now: DateTime<Utc>) -> Result<AdminStats, LibraryServiceError> {
        let client = &self.client;

        let (user_rows, ebook_rows, subscription_rows) =
            (client.user(), client.ebook(), client.subscription());
        let (total_users, active_ebooks, active_subscriptions) = futures::try_join!(
            user_rows.count(Condition::all()),
            ebook_rows.count(Condition::all().add(ebooks::Column::IsActive.eq(true))),
            subscription_rows.count(
                Condition::all()
                    .add(subscriptions::Column::Status.eq(SubscriptionStatus::Active.as_str()))
                    .add(subscriptions::Column::EndDate.gt(now)),
            ),
        )?;

        let revenue = client
            .transaction()
            .aggregate(
                AggregateArgs::new()
                    .filter(
                        transactions::Column::TransactionStatus
                            .eq(TransactionStatus::Settlement.as_str()),
                    )
                    .sum(transactions::Column::GrossAmount),
            )
            .await?;

        let subscriptions_by_status = client
            .subscription()
            .group_by(
                GroupByArgs::new([subscriptions::Column::Status])
                    .count()
                    .order_by(subscriptions::Column::Status, Order::Asc),
            )
            .await?
            .into_iter()
            .filter_map(|row| {
                Some(StatusCount {
                    status: row.key_str(subscriptions::Column::Status)?.to_owned(),
                    count: row.count(),
                })
            })
            .collect();

        let top_rows = client
            .reading_log()
            .group_by(
                GroupByArgs::new([reading_logs::Column::EbookId])
                    .count()
                    .order_by_count(Order::Desc)
                    .take(TOP_EBOOKS),
            )
            .await?;
        let top_counts: Vec<(Uuid, u64)> = top_rows
            .iter()
            .filter_map(|row| {
                let id = row.key_str(reading_logs::Column::EbookId)?.parse().ok()?;
                Some((id, row.count()))
            })
            .collect();
        let titles: HashMap<Uuid, String> = client
            .ebook()
            .find_many_select(
                FindArgs::new().filter(
                    ebooks::Column::Id.is_in(top_counts.iter().map(|(id, _)| *id)),
                ),
                &[ebooks::Column::Id, ebooks::Column::Title],
            )
            .await?
            .into_iter()
            .filter_map(|row| {
                let id = row.get("id")?.as_str()?.parse().ok()?;
                let title = row.get("title")?.as_str()?.to_owned();
                Some((id, title))
            })
            .collect();
        let top_ebooks = top_counts
            .into_iter()
            .map(|(ebook_id, readers)| EbookReaders {
                ebook_id,
                title: titles.get(&ebook_id).cloned().unwrap_or_default(),
                readers,
            })
            .collect();

        let since = now - Duration::days(ACTIVITY_WINDOW_DAYS);
        let daily_activity = client
            .raw()
            .query_raw_as::<DailyActivityRow>(DAILY_ACTIVITY_SQL, vec![since.into()])
            .await?
            .into_iter()
            .map(|row| DailyActivity {
                day: row.day,
                readers: u64::try_from(row.readers).unwrap_or(0),
            })
            .collect();

        Ok(AdminStats {
            total_users,
            active_ebooks,
            active_subscriptions,
            settled_revenue: revenue.sum(transactions::Column::GrossAmount).unwrap_or(0.0),
            subscriptions_by_status,
            top_ebooks,
            daily_activity,
        })
    }

    async fn list_events(&self, page: PageRequest) -> Result<Vec<AdminEvent>, LibraryServiceError> {
        let models = self
            .client
            .admin_event()
            .find_many(
                FindArgs::new()
                    .order_by(admin_events::Column::CreatedAt, Order::Desc)
                    .page(page),
            )
            .await?;
        Ok(models.into_iter().map(admin_event_from_model).collect())
    }
}
