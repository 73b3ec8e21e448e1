use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use lectern_library_client::LibraryClient;

use crate::domain::types::PlanCatalog;
use crate::infra::db::{
    DbAdminRepository, DbAnnotationRepository, DbCatalogAdminRepository, DbCatalogRepository,
    DbPaymentRepository, DbReadingRepository, DbSubscriptionRepository, DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub client: LibraryClient,
    pub plans: Arc<PlanCatalog>,
    pub payment_server_key: Arc<str>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            client: self.client.clone(),
        }
    }

    pub fn catalog_repo(&self) -> DbCatalogRepository {
        DbCatalogRepository {
            client: self.client.clone(),
        }
    }

    pub fn catalog_admin_repo(&self) -> DbCatalogAdminRepository {
        DbCatalogAdminRepository {
            client: self.client.clone(),
        }
    }

    pub fn reading_repo(&self) -> DbReadingRepository {
        DbReadingRepository {
            client: self.client.clone(),
        }
    }

    pub fn annotation_repo(&self) -> DbAnnotationRepository {
        DbAnnotationRepository {
            client: self.client.clone(),
        }
    }

    pub fn subscription_repo(&self) -> DbSubscriptionRepository {
        DbSubscriptionRepository {
            client: self.client.clone(),
        }
    }

    pub fn payment_repo(&self) -> DbPaymentRepository {
        DbPaymentRepository {
            client: self.client.clone(),
        }
    }

    pub fn admin_repo(&self) -> DbAdminRepository {
        DbAdminRepository {
            client: self.client.clone(),
        }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.client.connection().clone()
    }
}
