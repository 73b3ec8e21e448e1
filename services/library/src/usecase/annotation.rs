use chrono::Utc;
use uuid::Uuid;

use crate::domain::reading::is_blank;
use crate::domain::repository::{AnnotationRepository, CatalogRepository};
use crate::domain::types::{Annotation, AnnotationPatch};
use crate::error::LibraryServiceError;

// ── ListAnnotations ──────────────────────────────────────────────────────────

pub struct ListAnnotationsUseCase<A: AnnotationRepository> {
    pub repo: A,
}

impl<A: AnnotationRepository> ListAnnotationsUseCase<A> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Vec<Annotation>, LibraryServiceError> {
        self.repo.list(user_id, ebook_id).await
    }
}

// ── CreateAnnotation ─────────────────────────────────────────────────────────

pub struct CreateAnnotationInput {
    pub cfi_range: String,
    pub text: String,
    pub kind: String,
    pub color: Option<String>,
}

pub struct CreateAnnotationUseCase<A: AnnotationRepository, C: CatalogRepository> {
    pub repo: A,
    pub catalog: C,
}

impl<A: AnnotationRepository, C: CatalogRepository> CreateAnnotationUseCase<A, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        input: CreateAnnotationInput,
    ) -> Result<Annotation, LibraryServiceError> {
        for (field, value) in [
            ("cfi_range", &input.cfi_range),
            ("text", &input.text),
            ("type", &input.kind),
        ] {
            if is_blank(value) {
                return Err(LibraryServiceError::EmptyField(field));
            }
        }
        if self.catalog.find_ebook(ebook_id).await?.is_none() {
            return Err(LibraryServiceError::EbookNotFound);
        }
        let now = Utc::now();
        let annotation = Annotation {
            id: Uuid::now_v7(),
            user_id,
            ebook_id,
            cfi_range: input.cfi_range,
            text: input.text,
            kind: input.kind,
            color: input.color.filter(|c| !is_blank(c)),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&annotation).await
    }
}

// ── UpdateAnnotation ─────────────────────────────────────────────────────────

pub struct UpdateAnnotationUseCase<A: AnnotationRepository> {
    pub repo: A,
}

impl<A: AnnotationRepository> UpdateAnnotationUseCase<A> {
    /// Annotations of other users are reported as missing.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: AnnotationPatch,
    ) -> Result<Annotation, LibraryServiceError> {
        if patch.text.is_none() && patch.color.is_none() {
            return Err(LibraryServiceError::MissingData);
        }
        if patch.text.as_deref().is_some_and(is_blank) {
            return Err(LibraryServiceError::EmptyField("text"));
        }
        owned_annotation(&self.repo, user_id, id).await?;
        self.repo.update(id, &patch, Utc::now()).await
    }
}

// ── DeleteAnnotation ─────────────────────────────────────────────────────────

pub struct DeleteAnnotationUseCase<A: AnnotationRepository> {
    pub repo: A,
}

impl<A: AnnotationRepository> DeleteAnnotationUseCase<A> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), LibraryServiceError> {
        owned_annotation(&self.repo, user_id, id).await?;
        self.repo.delete(id).await
    }
}

async fn owned_annotation<A: AnnotationRepository>(
    repo: &A,
    user_id: Uuid,
    id: Uuid,
) -> Result<Annotation, LibraryServiceError> {
    repo.find(id)
        .await?
        .filter(|a| a.user_id == user_id)
        .ok_or(LibraryServiceError::AnnotationNotFound)
}
