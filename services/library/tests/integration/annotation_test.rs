use uuid::Uuid;

use lectern_library::domain::types::AnnotationPatch;
use lectern_library::error::LibraryServiceError;
use lectern_library::usecase::annotation::{
    CreateAnnotationInput, CreateAnnotationUseCase, DeleteAnnotationUseCase,
    ListAnnotationsUseCase, UpdateAnnotationUseCase,
};

use crate::helpers::{MockAnnotationRepo, MockCatalogRepo, test_annotation, test_category, test_ebook};

fn create_input() -> CreateAnnotationInput {
    CreateAnnotationInput {
        cfi_range: "epubcfi(/6/4!/4/2,/1:0,/1:12)".to_owned(),
        text: "Fear is the mind-killer".to_owned(),
        kind: "highlight".to_owned(),
        color: Some("  ".to_owned()),
    }
}

// ── CreateAnnotation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_annotation_for_existing_ebook() {
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let user_id = Uuid::now_v7();
    let repo = MockAnnotationRepo::default();
    let stored = repo.annotations_handle();

    let uc = CreateAnnotationUseCase {
        repo,
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
    };
    let annotation = uc.execute(user_id, dune.id, create_input()).await.unwrap();

    assert_eq!(annotation.user_id, user_id);
    assert_eq!(annotation.kind, "highlight");
    assert!(annotation.color.is_none(), "blank color should be dropped");
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_blank_required_fields() {
    let uc = CreateAnnotationUseCase {
        repo: MockAnnotationRepo::default(),
        catalog: MockCatalogRepo::default(),
    };
    let mut input = create_input();
    input.kind = " ".to_owned();
    let result = uc.execute(Uuid::now_v7(), Uuid::now_v7(), input).await;
    assert!(
        matches!(result, Err(LibraryServiceError::EmptyField("type"))),
        "expected EmptyField(type), got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_annotation_on_unknown_ebook() {
    let uc = CreateAnnotationUseCase {
        repo: MockAnnotationRepo::default(),
        catalog: MockCatalogRepo::default(),
    };
    let result = uc.execute(Uuid::now_v7(), Uuid::now_v7(), create_input()).await;
    assert!(matches!(result, Err(LibraryServiceError::EbookNotFound)));
}

// ── ListAnnotations ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_callers_annotations() {
    let user_id = Uuid::now_v7();
    let ebook_id = Uuid::now_v7();
    let mine = test_annotation(user_id, ebook_id);
    let theirs = test_annotation(Uuid::now_v7(), ebook_id);
    let uc = ListAnnotationsUseCase {
        repo: MockAnnotationRepo::new(vec![mine.clone(), theirs]),
    };
    let listed = uc.execute(user_id, ebook_id).await.unwrap();
    assert_eq!(listed, vec![mine]);
}

// ── UpdateAnnotation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_own_annotation() {
    let user_id = Uuid::now_v7();
    let annotation = test_annotation(user_id, Uuid::now_v7());
    let uc = UpdateAnnotationUseCase {
        repo: MockAnnotationRepo::new(vec![annotation.clone()]),
    };
    let updated = uc
        .execute(
            user_id,
            annotation.id,
            AnnotationPatch {
                text: Some("Edited".to_owned()),
                color: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.text, "Edited");
    assert_eq!(updated.color, annotation.color);
}

#[tokio::test]
async fn should_hide_other_users_annotation_on_update() {
    let annotation = test_annotation(Uuid::now_v7(), Uuid::now_v7());
    let uc = UpdateAnnotationUseCase {
        repo: MockAnnotationRepo::new(vec![annotation.clone()]),
    };
    let result = uc
        .execute(
            Uuid::now_v7(),
            annotation.id,
            AnnotationPatch {
                text: None,
                color: Some("blue".to_owned()),
            },
        )
        .await;
    assert!(
        matches!(result, Err(LibraryServiceError::AnnotationNotFound)),
        "expected AnnotationNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_some_field_on_update() {
    let uc = UpdateAnnotationUseCase {
        repo: MockAnnotationRepo::default(),
    };
    let result = uc
        .execute(Uuid::now_v7(), Uuid::now_v7(), AnnotationPatch::default())
        .await;
    assert!(matches!(result, Err(LibraryServiceError::MissingData)));
}

// ── DeleteAnnotation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_own_annotation_only() {
    let owner = Uuid::now_v7();
    let annotation = test_annotation(owner, Uuid::now_v7());
    let repo = MockAnnotationRepo::new(vec![annotation.clone()]);
    let stored = repo.annotations_handle();
    let uc = DeleteAnnotationUseCase { repo };

    let result = uc.execute(Uuid::now_v7(), annotation.id).await;
    assert!(matches!(result, Err(LibraryServiceError::AnnotationNotFound)));
    assert_eq!(stored.lock().unwrap().len(), 1);

    uc.execute(owner, annotation.id).await.unwrap();
    assert!(stored.lock().unwrap().is_empty());
}
