#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lectern_domain::ebook::EbookSortBy;
use lectern_domain::pagination::PageRequest;
use lectern_domain::reading::ReadlistStatus;
use lectern_domain::user::UserRole;

use crate::domain::payment::TransactionUpdate;
use crate::domain::types::{
    AdminEvent, AdminStats, Annotation, AnnotationPatch, Banner, BannerPatch, Category,
    CategoryPatch, Checkout, Ebook, EbookFilter, EbookPatch, PaymentOutcome, PaymentTransaction,
    PlanCatalog, ProfileUpdate, ProgressSaved, ReadingLog, ReadingProgress, ReadlistEntry,
    Subscription, SyncUser, User,
};
use crate::error::LibraryServiceError;

/// Repository for reader accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_firebase_uid(&self, uid: &str) -> Result<Option<User>, LibraryServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, LibraryServiceError>;

    /// Create the user, or refresh email and the given profile fields of the
    /// user with the same Firebase uid.
    async fn sync(&self, user: &SyncUser) -> Result<User, LibraryServiceError>;

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<User, LibraryServiceError>;

    /// Change the role and append `event` atomically. `None` if no such user.
    async fn set_role(
        &self,
        id: Uuid,
        role: UserRole,
        event: &AdminEvent,
    ) -> Result<Option<User>, LibraryServiceError>;
}

/// Read side of the public catalog.
pub trait CatalogRepository: Send + Sync {
    /// Active categories by display order.
    async fn list_categories(&self) -> Result<Vec<Category>, LibraryServiceError>;
    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, LibraryServiceError>;
    /// Any category, active or not.
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, LibraryServiceError>;
    async fn list_ebooks(
        &self,
        filter: &EbookFilter,
        sort_by: EbookSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ebook>, LibraryServiceError>;
    async fn find_ebook(&self, id: Uuid) -> Result<Option<Ebook>, LibraryServiceError>;
    async fn find_ebook_with_category(
        &self,
        id: Uuid,
    ) -> Result<Option<(Ebook, Option<Category>)>, LibraryServiceError>;
    /// Active banners by priority, highest first.
    async fn list_banners(&self) -> Result<Vec<Banner>, LibraryServiceError>;
}

/// Write side of the catalog. Every mutation stores its admin event in the
/// same transaction.
pub trait CatalogAdminRepository: Send + Sync {
    async fn create_ebook(
        &self,
        ebook: &Ebook,
        event: &AdminEvent,
    ) -> Result<Ebook, LibraryServiceError>;
    async fn update_ebook(
        &self,
        id: Uuid,
        patch: &EbookPatch,
        event: &AdminEvent,
    ) -> Result<Option<Ebook>, LibraryServiceError>;
    async fn delete_ebook(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError>;

    async fn create_category(
        &self,
        category: &Category,
        event: &AdminEvent,
    ) -> Result<Category, LibraryServiceError>;
    /// Renaming a category also renames it on its ebooks.
    async fn update_category(
        &self,
        id: Uuid,
        patch: &CategoryPatch,
        event: &AdminEvent,
    ) -> Result<Option<Category>, LibraryServiceError>;
    async fn delete_category(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError>;

    async fn create_banner(
        &self,
        banner: &Banner,
        event: &AdminEvent,
    ) -> Result<Banner, LibraryServiceError>;
    async fn update_banner(
        &self,
        id: Uuid,
        patch: &BannerPatch,
        event: &AdminEvent,
    ) -> Result<Option<Banner>, LibraryServiceError>;
    async fn delete_banner(
        &self,
        id: Uuid,
        event: &AdminEvent,
    ) -> Result<bool, LibraryServiceError>;
}

/// Reading logs, progress and readlists of one user.
pub trait ReadingRepository: Send + Sync {
    /// Record that the user opened the ebook now; keeps the first `started_at`.
    async fn touch_reading_log(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ReadingLog, LibraryServiceError>;

    /// Most recently read first.
    async fn list_reading_logs(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<(ReadingLog, Ebook)>, LibraryServiceError>;

    async fn find_progress(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Option<ReadingProgress>, LibraryServiceError>;

    /// Upsert progress and advance the matching readlist entry in one
    /// transaction.
    async fn save_progress(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        progress: f64,
        current_location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ProgressSaved, LibraryServiceError>;

    async fn list_readlist(
        &self,
        user_id: Uuid,
        status: Option<ReadlistStatus>,
        page: PageRequest,
    ) -> Result<Vec<(ReadlistEntry, Ebook)>, LibraryServiceError>;

    async fn set_readlist_status(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        status: ReadlistStatus,
        now: DateTime<Utc>,
    ) -> Result<ReadlistEntry, LibraryServiceError>;

    /// Returns `true` if an entry was removed.
    async fn delete_readlist_entry(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<bool, LibraryServiceError>;
}

pub trait AnnotationRepository: Send + Sync {
    /// Oldest first.
    async fn list(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Vec<Annotation>, LibraryServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<Annotation>, LibraryServiceError>;
    async fn create(&self, annotation: &Annotation) -> Result<Annotation, LibraryServiceError>;
    async fn update(
        &self,
        id: Uuid,
        patch: &AnnotationPatch,
        now: DateTime<Utc>,
    ) -> Result<Annotation, LibraryServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), LibraryServiceError>;
}

pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, LibraryServiceError>;

    /// Reset the user's subscription to PENDING for `order_id` and record
    /// the pending payment, atomically. Fails with `SubscriptionActive` when
    /// the subscription still runs at `now`.
    async fn checkout(
        &self,
        user_id: Uuid,
        plan_name: &str,
        order_id: &str,
        gross_amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Checkout, LibraryServiceError>;

    /// Mark ACTIVE subscriptions that ended before `now` as EXPIRED.
    /// Returns how many changed.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, LibraryServiceError>;
}

pub trait PaymentRepository: Send + Sync {
    async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<PaymentTransaction>, LibraryServiceError>;

    /// Store `update` on the order's transaction and move its subscription,
    /// in one transaction. Final transactions are left untouched, including
    /// when a concurrent delivery of the same notification got there first.
    async fn apply_notification(
        &self,
        order_id: &str,
        update: &TransactionUpdate,
        plans: &PlanCatalog,
        now: DateTime<Utc>,
    ) -> Result<PaymentOutcome, LibraryServiceError>;
}

pub trait AdminRepository: Send + Sync {
    async fn stats(&self, now: DateTime<Utc>) -> Result<AdminStats, LibraryServiceError>;
    /// Newest first.
    async fn list_events(&self, page: PageRequest) -> Result<Vec<AdminEvent>, LibraryServiceError>;
}
