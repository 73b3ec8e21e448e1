use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use lectern_domain::ebook::EbookSortBy;
use lectern_domain::pagination::PageRequest;
use lectern_domain::reading::ReadlistStatus;
use lectern_domain::subscription::{SubscriptionStatus, TransactionStatus};
use lectern_domain::user::UserRole;

use lectern_library::domain::reading::advance_readlist;
use lectern_library::domain::repository::{
    AnnotationRepository, CatalogAdminRepository, CatalogRepository, ReadingRepository,
    SubscriptionRepository,
};
use lectern_library::domain::types::{
    AdminEvent, Annotation, AnnotationPatch, Banner, BannerPatch, Category, CategoryPatch,
    Checkout, Ebook, EbookFilter, EbookPatch, PaymentTransaction, ProgressSaved, ReadingLog,
    ReadingProgress, ReadlistEntry, Subscription, User,
};
use lectern_library::error::LibraryServiceError;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        firebase_uid: format!("uid-{}", Uuid::new_v4().simple()),
        email: "reader@example.com".to_owned(),
        name: Some("Reader".to_owned()),
        photo_url: None,
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_category(name: &str, slug: &str) -> Category {
    let now = Utc::now();
    Category {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        slug: slug.to_owned(),
        icon: None,
        description: None,
        display_order: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_ebook(title: &str, category: &Category) -> Ebook {
    let now = Utc::now();
    Ebook {
        id: Uuid::now_v7(),
        title: title.to_owned(),
        author: "Anonymous".to_owned(),
        description: None,
        cover_url: None,
        pdf_url: Some(format!("https://cdn.example.com/{title}.pdf")),
        public_id: None,
        category: category.name.clone(),
        category_id: Some(category.id),
        is_premium: false,
        is_active: true,
        priority: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_subscription(user_id: Uuid, status: SubscriptionStatus, days_left: i64) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: Uuid::now_v7(),
        user_id,
        status,
        plan_name: "monthly".to_owned(),
        start_date: Some(now - Duration::days(30 - days_left)),
        end_date: Some(now + Duration::days(days_left)),
        order_id: Some("SUB-1".to_owned()),
        transaction_id: None,
        gross_amount: Some(49000),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_annotation(user_id: Uuid, ebook_id: Uuid) -> Annotation {
    let now = Utc::now();
    Annotation {
        id: Uuid::now_v7(),
        user_id,
        ebook_id,
        cfi_range: "epubcfi(/6/4!/4/2,/1:0,/1:12)".to_owned(),
        text: "It was a dark and stormy night".to_owned(),
        kind: "highlight".to_owned(),
        color: Some("yellow".to_owned()),
        created_at: now,
        updated_at: now,
    }
}

// ── MockCatalogRepo ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockCatalogRepo {
    pub categories: Vec<Category>,
    pub ebooks: Vec<Ebook>,
    pub banners: Vec<Banner>,
}

impl MockCatalogRepo {
    pub fn new(categories: Vec<Category>, ebooks: Vec<Ebook>) -> Self {
        Self {
            categories,
            ebooks,
            banners: vec![],
        }
    }
}

impl CatalogRepository for MockCatalogRepo {
    async fn list_categories(&self) -> Result<Vec<Category>, LibraryServiceError> {
        let mut categories: Vec<_> = self
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.display_order);
        Ok(categories)
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, LibraryServiceError> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.slug == slug && c.is_active)
            .cloned())
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, LibraryServiceError> {
        Ok(self.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list_ebooks(
        &self,
        filter: &EbookFilter,
        sort_by: EbookSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ebook>, LibraryServiceError> {
        let mut ebooks: Vec<_> = self
            .ebooks
            .iter()
            .filter(|e| e.is_active)
            .filter(|e| filter.category_id.is_none_or(|id| e.category_id == Some(id)))
            .filter(|e| filter.is_premium.is_none_or(|p| e.is_premium == p))
            .filter(|e| {
                filter.search.as_deref().is_none_or(|q| {
                    let q = q.to_lowercase();
                    e.title.to_lowercase().contains(&q) || e.author.to_lowercase().contains(&q)
                })
            })
            .cloned()
            .collect();
        if sort_by == EbookSortBy::TitleAsc {
            ebooks.sort_by(|a, b| a.title.cmp(&b.title));
        } else {
            ebooks.sort_by(|a, b| b.priority.cmp(&a.priority));
        }
        let page = page.clamped();
        Ok(ebooks
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn find_ebook(&self, id: Uuid) -> Result<Option<Ebook>, LibraryServiceError> {
        Ok(self.ebooks.iter().find(|e| e.id == id).cloned())
    }

    async fn find_ebook_with_category(
        &self,
        id: Uuid,
    ) -> Result<Option<(Ebook, Option<Category>)>, LibraryServiceError> {
        Ok(self.ebooks.iter().find(|e| e.id == id).map(|e| {
            let category = self
                .categories
                .iter()
                .find(|c| Some(c.id) == e.category_id)
                .cloned();
            (e.clone(), category)
        }))
    }

    async fn list_banners(&self) -> Result<Vec<Banner>, LibraryServiceError> {
        Ok(self.banners.iter().filter(|b| b.is_active).cloned().collect())
    }
}

// ── MockCatalogAdminRepo ─────────────────────────────────────────────────────

/// Records every mutation together with its admin event.
#[derive(Default)]
pub struct MockCatalogAdminRepo {
    pub ebooks: Arc<Mutex<Vec<Ebook>>>,
    pub categories: Arc<Mutex<Vec<Category>>>,
    pub banners: Arc<Mutex<Vec<Banner>>>,
    pub events: Arc<Mutex<Vec<AdminEvent>>>,
}

impl MockCatalogAdminRepo {
    pub fn with_ebooks(ebooks: Vec<Ebook>) -> Self {
        Self {
            ebooks: Arc::new(Mutex::new(ebooks)),
            ..Default::default()
        }
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            categories: Arc::new(Mutex::new(categories)),
            ..Default::default()
        }
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<AdminEvent>>> {
        Arc::clone(&self.events)
    }

    pub fn ebooks_handle(&self) -> Arc<Mutex<Vec<Ebook>>> {
        Arc::clone(&self.ebooks)
    }

    fn record(&self, event: &AdminEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

impl CatalogAdminRepository for MockCatalogAdminRepo {
    async fn create_ebook(
        &self,
        ebook: &Ebook,
        event: &AdminEvent,
    ) -> Result<Ebook, LibraryServiceError> {
        self.ebooks.lock().unwrap().push(ebook.clone());
        self.record(event);
        Ok(ebook.clone())
    }

    async fn update_ebook(
        &self,
        id: Uuid,
        patch: &EbookPatch,
        event: &AdminEvent,
    ) -> Result<Option<Ebook>, LibraryServiceError> {
        let mut ebooks = self.ebooks.lock().unwrap();
        let Some(ebook) = ebooks.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            ebook.title = title.clone();
        }
        if let Some(category) = &patch.category {
            ebook.category_id = Some(category.id);
            ebook.category = category.name.clone();
        }
        if let Some(is_premium) = patch.is_premium {
            ebook.is_premium = is_premium;
        }
        if let Some(priority) = patch.priority {
            ebook.priority = priority;
        }
        let updated = ebook.clone();
        drop(ebooks);
        self.record(event);
        Ok(Some(updated))
    }

    async fn delete_ebook(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError> {
        let mut ebooks = self.ebooks.lock().unwrap();
        let before = ebooks.len();
        ebooks.retain(|e| e.id != id);
        let deleted = ebooks.len() < before;
        drop(ebooks);
        if deleted {
            self.record(event);
        }
        Ok(deleted)
    }

    async fn create_category(
        &self,
        category: &Category,
        event: &AdminEvent,
    ) -> Result<Category, LibraryServiceError> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.slug == category.slug) {
            return Err(LibraryServiceError::CategoryAlreadyExists);
        }
        categories.push(category.clone());
        drop(categories);
        self.record(event);
        Ok(category.clone())
    }

    async fn update_category(
        &self,
        id: Uuid,
        patch: &CategoryPatch,
        event: &AdminEvent,
    ) -> Result<Option<Category>, LibraryServiceError> {
        let mut categories = self.categories.lock().unwrap();
        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            category.name = name.clone();
        }
        if let Some(slug) = &patch.slug {
            category.slug = slug.clone();
        }
        if let Some(is_active) = patch.is_active {
            category.is_active = is_active;
        }
        let updated = category.clone();
        drop(categories);
        if let Some(name) = &patch.name {
            for ebook in self.ebooks.lock().unwrap().iter_mut() {
                if ebook.category_id == Some(id) {
                    ebook.category = name.clone();
                }
            }
        }
        self.record(event);
        Ok(Some(updated))
    }

    async fn delete_category(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        let deleted = categories.len() < before;
        drop(categories);
        if deleted {
            self.record(event);
        }
        Ok(deleted)
    }

    async fn create_banner(
        &self,
        banner: &Banner,
        event: &AdminEvent,
    ) -> Result<Banner, LibraryServiceError> {
        self.banners.lock().unwrap().push(banner.clone());
        self.record(event);
        Ok(banner.clone())
    }

    async fn update_banner(
        &self,
        id: Uuid,
        patch: &BannerPatch,
        event: &AdminEvent,
    ) -> Result<Option<Banner>, LibraryServiceError> {
        let mut banners = self.banners.lock().unwrap();
        let Some(banner) = banners.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            banner.title = title.clone();
        }
        if let Some(is_active) = patch.is_active {
            banner.is_active = is_active;
        }
        let updated = banner.clone();
        drop(banners);
        self.record(event);
        Ok(Some(updated))
    }

    async fn delete_banner(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError> {
        let mut banners = self.banners.lock().unwrap();
        let before = banners.len();
        banners.retain(|b| b.id != id);
        let deleted = banners.len() < before;
        drop(banners);
        if deleted {
            self.record(event);
        }
        Ok(deleted)
    }
}

// ── MockReadingRepo ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockReadingRepo {
    pub logs: Arc<Mutex<Vec<ReadingLog>>>,
    pub progress: Arc<Mutex<Vec<ReadingProgress>>>,
    pub readlist: Arc<Mutex<Vec<ReadlistEntry>>>,
}

impl MockReadingRepo {
    pub fn with_readlist(entries: Vec<ReadlistEntry>) -> Self {
        Self {
            readlist: Arc::new(Mutex::new(entries)),
            ..Default::default()
        }
    }

    pub fn logs_handle(&self) -> Arc<Mutex<Vec<ReadingLog>>> {
        Arc::clone(&self.logs)
    }
}

pub fn readlist_entry(user_id: Uuid, ebook_id: Uuid, status: ReadlistStatus) -> ReadlistEntry {
    let now = Utc::now();
    ReadlistEntry {
        id: Uuid::now_v7(),
        user_id,
        ebook_id,
        status,
        created_at: now,
        updated_at: now,
    }
}

impl ReadingRepository for MockReadingRepo {
    async fn touch_reading_log(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ReadingLog, LibraryServiceError> {
        let mut logs = self.logs.lock().unwrap();
        if let Some(log) = logs
            .iter_mut()
            .find(|l| l.user_id == user_id && l.ebook_id == ebook_id)
        {
            log.last_read_at = now;
            return Ok(log.clone());
        }
        let log = ReadingLog {
            id: Uuid::now_v7(),
            user_id,
            ebook_id,
            started_at: now,
            last_read_at: now,
        };
        logs.push(log.clone());
        Ok(log)
    }

    async fn list_reading_logs(
        &self,
        _user_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<(ReadingLog, Ebook)>, LibraryServiceError> {
        Ok(vec![])
    }

    async fn find_progress(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Option<ReadingProgress>, LibraryServiceError> {
        Ok(self
            .progress
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.ebook_id == ebook_id)
            .cloned())
    }

    async fn save_progress(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        progress: f64,
        current_location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ProgressSaved, LibraryServiceError> {
        let saved = ReadingProgress {
            id: Uuid::now_v7(),
            user_id,
            ebook_id,
            current_location: current_location.map(str::to_owned),
            progress,
            created_at: now,
            updated_at: now,
        };
        let mut stored = self.progress.lock().unwrap();
        stored.retain(|p| !(p.user_id == user_id && p.ebook_id == ebook_id));
        stored.push(saved.clone());
        drop(stored);

        let mut readlist = self.readlist.lock().unwrap();
        let entry = readlist
            .iter_mut()
            .find(|e| e.user_id == user_id && e.ebook_id == ebook_id)
            .map(|entry| {
                if let Some(next) = advance_readlist(entry.status, progress) {
                    entry.status = next;
                    entry.updated_at = now;
                }
                entry.clone()
            });
        Ok(ProgressSaved {
            progress: saved,
            readlist: entry,
        })
    }

    async fn list_readlist(
        &self,
        _user_id: Uuid,
        _status: Option<ReadlistStatus>,
        _page: PageRequest,
    ) -> Result<Vec<(ReadlistEntry, Ebook)>, LibraryServiceError> {
        Ok(vec![])
    }

    async fn set_readlist_status(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        status: ReadlistStatus,
        now: DateTime<Utc>,
    ) -> Result<ReadlistEntry, LibraryServiceError> {
        let mut readlist = self.readlist.lock().unwrap();
        if let Some(entry) = readlist
            .iter_mut()
            .find(|e| e.user_id == user_id && e.ebook_id == ebook_id)
        {
            entry.status = status;
            entry.updated_at = now;
            return Ok(entry.clone());
        }
        let entry = readlist_entry(user_id, ebook_id, status);
        readlist.push(entry.clone());
        Ok(entry)
    }

    async fn delete_readlist_entry(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<bool, LibraryServiceError> {
        let mut readlist = self.readlist.lock().unwrap();
        let before = readlist.len();
        readlist.retain(|e| !(e.user_id == user_id && e.ebook_id == ebook_id));
        Ok(readlist.len() < before)
    }
}

// ── MockAnnotationRepo ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockAnnotationRepo {
    pub annotations: Arc<Mutex<Vec<Annotation>>>,
}

impl MockAnnotationRepo {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations: Arc::new(Mutex::new(annotations)),
        }
    }

    pub fn annotations_handle(&self) -> Arc<Mutex<Vec<Annotation>>> {
        Arc::clone(&self.annotations)
    }
}

impl AnnotationRepository for MockAnnotationRepo {
    async fn list(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Vec<Annotation>, LibraryServiceError> {
        Ok(self
            .annotations
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && a.ebook_id == ebook_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Annotation>, LibraryServiceError> {
        Ok(self
            .annotations
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn create(&self, annotation: &Annotation) -> Result<Annotation, LibraryServiceError> {
        self.annotations.lock().unwrap().push(annotation.clone());
        Ok(annotation.clone())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &AnnotationPatch,
        now: DateTime<Utc>,
    ) -> Result<Annotation, LibraryServiceError> {
        let mut annotations = self.annotations.lock().unwrap();
        let annotation = annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(LibraryServiceError::AnnotationNotFound)?;
        if let Some(text) = &patch.text {
            annotation.text = text.clone();
        }
        if let Some(color) = &patch.color {
            annotation.color = Some(color.clone());
        }
        annotation.updated_at = now;
        Ok(annotation.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), LibraryServiceError> {
        let mut annotations = self.annotations.lock().unwrap();
        let before = annotations.len();
        annotations.retain(|a| a.id != id);
        if annotations.len() == before {
            return Err(LibraryServiceError::AnnotationNotFound);
        }
        Ok(())
    }
}

// ── MockSubscriptionRepo ─────────────────────────────────────────────────────

pub struct MockSubscriptionRepo {
    pub subscription: Option<Subscription>,
}

impl MockSubscriptionRepo {
    pub fn new(subscription: Option<Subscription>) -> Self {
        Self { subscription }
    }

    pub fn empty() -> Self {
        Self { subscription: None }
    }
}

impl SubscriptionRepository for MockSubscriptionRepo {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, LibraryServiceError> {
        Ok(self
            .subscription
            .clone()
            .filter(|s| s.user_id == user_id))
    }

    async fn checkout(
        &self,
        user_id: Uuid,
        plan_name: &str,
        order_id: &str,
        gross_amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Checkout, LibraryServiceError> {
        if self
            .subscription
            .as_ref()
            .is_some_and(|s| s.user_id == user_id && s.is_active_at(now))
        {
            return Err(LibraryServiceError::SubscriptionActive);
        }
        let subscription = Subscription {
            id: Uuid::now_v7(),
            user_id,
            status: SubscriptionStatus::Pending,
            plan_name: plan_name.to_owned(),
            start_date: None,
            end_date: None,
            order_id: Some(order_id.to_owned()),
            transaction_id: None,
            gross_amount: Some(gross_amount),
            created_at: now,
            updated_at: now,
        };
        let transaction = PaymentTransaction {
            id: Uuid::now_v7(),
            subscription_id: subscription.id,
            order_id: order_id.to_owned(),
            status: TransactionStatus::Pending,
            gross_amount,
            payment_type: None,
            transaction_time: None,
            settlement_time: None,
            created_at: now,
            updated_at: now,
        };
        Ok(Checkout {
            subscription,
            transaction,
        })
    }

    async fn expire_overdue(&self, _now: DateTime<Utc>) -> Result<u64, LibraryServiceError> {
        Ok(0)
    }
}
