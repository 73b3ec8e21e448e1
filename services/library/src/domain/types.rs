use chrono::{DateTime, Utc};
use uuid::Uuid;

use lectern_domain::reading::ReadlistStatus;
use lectern_domain::subscription::{SubscriptionStatus, TransactionStatus};
use lectern_domain::user::UserRole;

/// Reader account, keyed externally by its Firebase uid.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub firebase_uid: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: SubscriptionStatus,
    pub plan_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub order_id: Option<String>,
    pub transaction_id: Option<String>,
    pub gross_amount: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Active and not yet past its end date.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date.is_some_and(|end| end > now)
    }
}

/// One payment attempt of a subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub order_id: String,
    pub status: TransactionStatus,
    pub gross_amount: i64,
    pub payment_type: Option<String>,
    pub transaction_time: Option<DateTime<Utc>>,
    pub settlement_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ebook {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub current_location: Option<String>,
    /// Percent read, `0.0..=100.0`.
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub status: ReadlistStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub cfi_range: String,
    pub text: String,
    pub kind: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit trail entry written alongside admin mutations and payments.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminEvent {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AdminEvent {
    pub fn new(kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: kind.into(),
            title: title.into(),
            description: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ── Plans ────────────────────────────────────────────────────────────────────

/// A purchasable subscription plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionPlan {
    pub name: String,
    pub duration_days: u32,
    pub amount: i64,
}

impl SubscriptionPlan {
    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.duration_days))
    }
}

/// The configured set of plans, looked up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCatalog {
    plans: Vec<SubscriptionPlan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<SubscriptionPlan>) -> Self {
        Self { plans }
    }

    pub fn get(&self, name: &str) -> Option<&SubscriptionPlan> {
        self.plans.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionPlan> {
        self.plans.iter()
    }
}

// ── Inputs ───────────────────────────────────────────────────────────────────

/// Profile fields received when a user signs in.
#[derive(Debug, Clone)]
pub struct SyncUser {
    pub firebase_uid: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// Filter of the public ebook listing. Only active ebooks are ever listed.
#[derive(Debug, Clone, Default)]
pub struct EbookFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub is_premium: Option<bool>,
}

/// Category an ebook is filed under, with its name denormalized onto the ebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct EbookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pdf_url: Option<String>,
    pub public_id: Option<String>,
    pub category: Option<CategoryRef>,
    pub is_premium: Option<bool>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
}

impl EbookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.cover_url.is_none()
            && self.pdf_url.is_none()
            && self.public_id.is_none()
            && self.category.is_none()
            && self.is_premium.is_none()
            && self.is_active.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.icon.is_none()
            && self.description.is_none()
            && self.display_order.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BannerPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
}

impl BannerPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.cta_label.is_none()
            && self.cta_link.is_none()
            && self.image_url.is_none()
            && self.is_active.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationPatch {
    pub text: Option<String>,
    pub color: Option<String>,
}

// ── Outputs ──────────────────────────────────────────────────────────────────

/// Result of saving progress: the stored progress and the readlist entry if
/// one exists for the same ebook.
#[derive(Debug, Clone)]
pub struct ProgressSaved {
    pub progress: ReadingProgress,
    pub readlist: Option<ReadlistEntry>,
}

/// A started checkout: the pending subscription and its payment.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub subscription: Subscription,
    pub transaction: PaymentTransaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Transaction (and possibly subscription) updated.
    Applied,
    /// Transaction was already final, or a concurrent delivery of the same
    /// notification claimed it; nothing changed.
    Ignored,
}

impl PaymentOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Ignored => "ignored",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EbookReaders {
    pub ebook_id: Uuid,
    pub title: String,
    pub readers: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyActivity {
    pub day: chrono::NaiveDate,
    pub readers: u64,
}

/// Dashboard numbers for the admin surface.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_ebooks: u64,
    pub active_subscriptions: u64,
    pub settled_revenue: f64,
    pub subscriptions_by_status: Vec<StatusCount>,
    pub top_ebooks: Vec<EbookReaders>,
    pub daily_activity: Vec<DailyActivity>,
}
