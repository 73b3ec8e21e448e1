use uuid::Uuid;

use lectern_domain::reading::ReadlistStatus;

use lectern_library::error::LibraryServiceError;
use lectern_library::usecase::reading::{
    DeleteReadlistEntryUseCase, GetProgressUseCase, SaveProgressInput, SaveProgressUseCase,
    SetReadlistStatusUseCase,
};

use crate::helpers::{
    MockCatalogRepo, MockReadingRepo, readlist_entry, test_category, test_ebook,
};

fn input(progress: f64) -> SaveProgressInput {
    SaveProgressInput {
        progress,
        current_location: Some("epubcfi(/6/2)".to_owned()),
    }
}

// ── SaveProgress ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_out_of_range_progress() {
    let uc = SaveProgressUseCase {
        repo: MockReadingRepo::default(),
        catalog: MockCatalogRepo::default(),
    };
    for progress in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
        let result = uc.execute(Uuid::now_v7(), Uuid::now_v7(), input(progress)).await;
        assert!(
            matches!(result, Err(LibraryServiceError::InvalidProgress)),
            "expected InvalidProgress for {progress}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_progress_for_unknown_ebook() {
    let uc = SaveProgressUseCase {
        repo: MockReadingRepo::default(),
        catalog: MockCatalogRepo::default(),
    };
    let result = uc.execute(Uuid::now_v7(), Uuid::now_v7(), input(10.0)).await;
    assert!(matches!(result, Err(LibraryServiceError::EbookNotFound)));
}

#[tokio::test]
async fn should_save_progress_without_readlist_entry() {
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let user_id = Uuid::now_v7();
    let uc = SaveProgressUseCase {
        repo: MockReadingRepo::default(),
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
    };

    let saved = uc.execute(user_id, dune.id, input(42.5)).await.unwrap();
    assert_eq!(saved.progress.progress, 42.5);
    assert_eq!(
        saved.progress.current_location.as_deref(),
        Some("epubcfi(/6/2)")
    );
    assert!(saved.readlist.is_none());

    let got = GetProgressUseCase { repo: uc.repo }
        .execute(user_id, dune.id)
        .await
        .unwrap();
    assert_eq!(got.progress, 42.5);
}

#[tokio::test]
async fn should_move_want_to_read_entry_to_reading() {
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let user_id = Uuid::now_v7();
    let uc = SaveProgressUseCase {
        repo: MockReadingRepo::with_readlist(vec![readlist_entry(
            user_id,
            dune.id,
            ReadlistStatus::WantToRead,
        )]),
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
    };

    let saved = uc.execute(user_id, dune.id, input(1.0)).await.unwrap();
    assert_eq!(
        saved.readlist.map(|e| e.status),
        Some(ReadlistStatus::Reading)
    );
}

#[tokio::test]
async fn should_finish_entry_at_full_progress() {
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let user_id = Uuid::now_v7();
    let uc = SaveProgressUseCase {
        repo: MockReadingRepo::with_readlist(vec![readlist_entry(
            user_id,
            dune.id,
            ReadlistStatus::WantToRead,
        )]),
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
    };

    let saved = uc.execute(user_id, dune.id, input(100.0)).await.unwrap();
    assert_eq!(
        saved.readlist.map(|e| e.status),
        Some(ReadlistStatus::Finished)
    );
}

// ── GetProgress ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_missing_progress() {
    let uc = GetProgressUseCase {
        repo: MockReadingRepo::default(),
    };
    let result = uc.execute(Uuid::now_v7(), Uuid::now_v7()).await;
    assert!(matches!(result, Err(LibraryServiceError::ProgressNotFound)));
}

// ── Readlist ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_upsert_readlist_status() {
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let user_id = Uuid::now_v7();
    let uc = SetReadlistStatusUseCase {
        repo: MockReadingRepo::default(),
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
    };

    let first = uc
        .execute(user_id, dune.id, ReadlistStatus::WantToRead)
        .await
        .unwrap();
    let second = uc
        .execute(user_id, dune.id, ReadlistStatus::Finished)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.status, ReadlistStatus::Finished);
}

#[tokio::test]
async fn should_reject_readlist_for_unknown_ebook() {
    let uc = SetReadlistStatusUseCase {
        repo: MockReadingRepo::default(),
        catalog: MockCatalogRepo::default(),
    };
    let result = uc
        .execute(Uuid::now_v7(), Uuid::now_v7(), ReadlistStatus::Reading)
        .await;
    assert!(matches!(result, Err(LibraryServiceError::EbookNotFound)));
}

#[tokio::test]
async fn should_delete_readlist_entry_once() {
    let user_id = Uuid::now_v7();
    let ebook_id = Uuid::now_v7();
    let uc = DeleteReadlistEntryUseCase {
        repo: MockReadingRepo::with_readlist(vec![readlist_entry(
            user_id,
            ebook_id,
            ReadlistStatus::Reading,
        )]),
    };

    uc.execute(user_id, ebook_id).await.unwrap();
    let result = uc.execute(user_id, ebook_id).await;
    assert!(
        matches!(result, Err(LibraryServiceError::ReadlistEntryNotFound)),
        "expected ReadlistEntryNotFound, got {result:?}"
    );
}
