use chrono::Utc;
use uuid::Uuid;

use lectern_domain::pagination::PageRequest;
use lectern_domain::reading::{ReadlistStatus, is_valid_progress};

use crate::domain::repository::{CatalogRepository, ReadingRepository};
use crate::domain::types::{Ebook, ProgressSaved, ReadingLog, ReadingProgress, ReadlistEntry};
use crate::error::LibraryServiceError;

// ── ListReadingLogs ──────────────────────────────────────────────────────────

pub struct ListReadingLogsUseCase<R: ReadingRepository> {
    pub repo: R,
}

impl<R: ReadingRepository> ListReadingLogsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<(ReadingLog, Ebook)>, LibraryServiceError> {
        self.repo.list_reading_logs(user_id, page).await
    }
}

// ── GetProgress ──────────────────────────────────────────────────────────────

pub struct GetProgressUseCase<R: ReadingRepository> {
    pub repo: R,
}

impl<R: ReadingRepository> GetProgressUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<ReadingProgress, LibraryServiceError> {
        self.repo
            .find_progress(user_id, ebook_id)
            .await?
            .ok_or(LibraryServiceError::ProgressNotFound)
    }
}

// ── SaveProgress ─────────────────────────────────────────────────────────────

pub struct SaveProgressInput {
    pub progress: f64,
    pub current_location: Option<String>,
}

pub struct SaveProgressUseCase<R: ReadingRepository, C: CatalogRepository> {
    pub repo: R,
    pub catalog: C,
}

impl<R: ReadingRepository, C: CatalogRepository> SaveProgressUseCase<R, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        input: SaveProgressInput,
    ) -> Result<ProgressSaved, LibraryServiceError> {
        if !is_valid_progress(input.progress) {
            return Err(LibraryServiceError::InvalidProgress);
        }
        if self.catalog.find_ebook(ebook_id).await?.is_none() {
            return Err(LibraryServiceError::EbookNotFound);
        }
        self.repo
            .save_progress(
                user_id,
                ebook_id,
                input.progress,
                input.current_location.as_deref(),
                Utc::now(),
            )
            .await
    }
}

// ── ListReadlist ─────────────────────────────────────────────────────────────

pub struct ListReadlistUseCase<R: ReadingRepository> {
    pub repo: R,
}

impl<R: ReadingRepository> ListReadlistUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        status: Option<ReadlistStatus>,
        page: PageRequest,
    ) -> Result<Vec<(ReadlistEntry, Ebook)>, LibraryServiceError> {
        self.repo.list_readlist(user_id, status, page).await
    }
}

// ── SetReadlistStatus ────────────────────────────────────────────────────────

pub struct SetReadlistStatusUseCase<R: ReadingRepository, C: CatalogRepository> {
    pub repo: R,
    pub catalog: C,
}

impl<R: ReadingRepository, C: CatalogRepository> SetReadlistStatusUseCase<R, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        status: ReadlistStatus,
    ) -> Result<ReadlistEntry, LibraryServiceError> {
        if self.catalog.find_ebook(ebook_id).await?.is_none() {
            return Err(LibraryServiceError::EbookNotFound);
        }
        self.repo
            .set_readlist_status(user_id, ebook_id, status, Utc::now())
            .await
    }
}

// ── DeleteReadlistEntry ──────────────────────────────────────────────────────

pub struct DeleteReadlistEntryUseCase<R: ReadingRepository> {
    pub repo: R,
}

impl<R: ReadingRepository> DeleteReadlistEntryUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, ebook_id: Uuid) -> Result<(), LibraryServiceError> {
        let deleted = self.repo.delete_readlist_entry(user_id, ebook_id).await?;
        if !deleted {
            return Err(LibraryServiceError::ReadlistEntryNotFound);
        }
        Ok(())
    }
}
