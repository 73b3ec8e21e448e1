use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use lectern_core::error::error_response;
use lectern_library_client::DataError;

/// Library service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum LibraryServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("ebook not found")]
    EbookNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("banner not found")]
    BannerNotFound,
    #[error("reading progress not found")]
    ProgressNotFound,
    #[error("readlist entry not found")]
    ReadlistEntryNotFound,
    #[error("annotation not found")]
    AnnotationNotFound,
    #[error("subscription not found")]
    SubscriptionNotFound,
    #[error("transaction not found")]
    TransactionNotFound,
    #[error("{0} not found")]
    RecordNotFound(&'static str),
    #[error("category already exists")]
    CategoryAlreadyExists,
    #[error("subscription already active")]
    SubscriptionActive,
    #[error("conflict")]
    Conflict,
    #[error("missing data")]
    MissingData,
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("progress must be a number between 0 and 100")]
    InvalidProgress,
    #[error("invalid slug")]
    InvalidSlug,
    #[error("unknown plan")]
    UnknownPlan,
    #[error("unknown transaction status")]
    UnknownTransactionStatus,
    #[error("invalid gross amount")]
    InvalidGrossAmount,
    #[error("gross amount does not match the order")]
    GrossAmountMismatch,
    #[error("invalid reference")]
    InvalidReference,
    #[error("invalid input")]
    InvalidInput,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("forbidden")]
    Forbidden,
    #[error("premium subscription required")]
    PremiumRequired,
    #[error("service unavailable")]
    Unavailable,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl LibraryServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EbookNotFound => "EBOOK_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::BannerNotFound => "BANNER_NOT_FOUND",
            Self::ProgressNotFound => "PROGRESS_NOT_FOUND",
            Self::ReadlistEntryNotFound => "READLIST_ENTRY_NOT_FOUND",
            Self::AnnotationNotFound => "ANNOTATION_NOT_FOUND",
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::CategoryAlreadyExists => "CATEGORY_ALREADY_EXISTS",
            Self::SubscriptionActive => "SUBSCRIPTION_ACTIVE",
            Self::Conflict => "CONFLICT",
            Self::MissingData => "MISSING_DATA",
            Self::EmptyField(_) => "EMPTY_FIELD",
            Self::InvalidProgress => "INVALID_PROGRESS",
            Self::InvalidSlug => "INVALID_SLUG",
            Self::UnknownPlan => "UNKNOWN_PLAN",
            Self::UnknownTransactionStatus => "UNKNOWN_TRANSACTION_STATUS",
            Self::InvalidGrossAmount => "INVALID_GROSS_AMOUNT",
            Self::GrossAmountMismatch => "GROSS_AMOUNT_MISMATCH",
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::Forbidden => "FORBIDDEN",
            Self::PremiumRequired => "PREMIUM_REQUIRED",
            Self::Unavailable => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::EbookNotFound
            | Self::CategoryNotFound
            | Self::BannerNotFound
            | Self::ProgressNotFound
            | Self::ReadlistEntryNotFound
            | Self::AnnotationNotFound
            | Self::SubscriptionNotFound
            | Self::TransactionNotFound
            | Self::RecordNotFound(_) => StatusCode::NOT_FOUND,
            Self::CategoryAlreadyExists | Self::SubscriptionActive | Self::Conflict => {
                StatusCode::CONFLICT
            }
            Self::MissingData
            | Self::EmptyField(_)
            | Self::InvalidProgress
            | Self::InvalidSlug
            | Self::UnknownPlan
            | Self::UnknownTransactionStatus
            | Self::InvalidGrossAmount
            | Self::GrossAmountMismatch
            | Self::InvalidReference
            | Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::PremiumRequired => StatusCode::FORBIDDEN,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DataError> for LibraryServiceError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound { model } => Self::RecordNotFound(model),
            DataError::UniqueViolation(detail) => {
                tracing::debug!(%detail, "unique constraint violated");
                Self::Conflict
            }
            DataError::ForeignKeyViolation(detail) => {
                tracing::debug!(%detail, "foreign key constraint violated");
                Self::InvalidReference
            }
            DataError::Validation(detail) => {
                tracing::warn!(%detail, "rejected query input");
                Self::InvalidInput
            }
            DataError::Connection(detail) => {
                tracing::warn!(%detail, "database unavailable");
                Self::Unavailable
            }
            DataError::Timeout(what) => {
                tracing::warn!(what, "database operation timed out");
                Self::Unavailable
            }
            DataError::Database(e) => Self::Internal(anyhow::Error::new(e).context("database")),
        }
    }
}

impl IntoResponse for LibraryServiceError {
    fn into_response(self) -> Response {
        // 4xx are expected client errors; TraceLayer already records them.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
