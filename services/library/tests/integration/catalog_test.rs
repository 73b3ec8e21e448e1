use lectern_domain::ebook::EbookSortBy;
use lectern_domain::pagination::PageRequest;
use lectern_domain::subscription::SubscriptionStatus;
use lectern_domain::user::UserRole;

use lectern_library::error::LibraryServiceError;
use lectern_library::usecase::catalog::{
    GetEbookUseCase, ListCategoriesUseCase, ListCategoryEbooksUseCase, ListEbooksInput,
    ListEbooksUseCase, OpenEbookUseCase,
};

use crate::helpers::{
    MockCatalogRepo, MockReadingRepo, MockSubscriptionRepo, test_category, test_ebook,
    test_subscription, test_user,
};

// ── ListCategories ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_active_categories_in_display_order() {
    let mut fiction = test_category("Fiction", "fiction");
    fiction.display_order = 2;
    let mut history = test_category("History", "history");
    history.display_order = 1;
    let mut hidden = test_category("Hidden", "hidden");
    hidden.is_active = false;

    let uc = ListCategoriesUseCase {
        catalog: MockCatalogRepo::new(vec![fiction, history, hidden], vec![]),
    };
    let slugs: Vec<_> = uc
        .execute()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.slug)
        .collect();
    assert_eq!(slugs, ["history", "fiction"]);
}

// ── ListEbooks ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_filter_ebooks_by_category_slug() {
    let fiction = test_category("Fiction", "fiction");
    let history = test_category("History", "history");
    let dune = test_ebook("Dune", &fiction);
    let rome = test_ebook("SPQR", &history);

    let uc = ListEbooksUseCase {
        catalog: MockCatalogRepo::new(vec![fiction, history], vec![dune.clone(), rome]),
    };
    let ebooks = uc
        .execute(ListEbooksInput {
            category_slug: Some("fiction".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ebooks.len(), 1);
    assert_eq!(ebooks[0].id, dune.id);
}

#[tokio::test]
async fn should_return_empty_page_for_unknown_category_slug() {
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let uc = ListEbooksUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune]),
    };
    let ebooks = uc
        .execute(ListEbooksInput {
            category_slug: Some("poetry".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(ebooks.is_empty());
}

#[tokio::test]
async fn should_ignore_blank_search_and_match_case_insensitively() {
    let fiction = test_category("Fiction", "fiction");
    let mut dune = test_ebook("Dune", &fiction);
    dune.author = "Frank Herbert".to_owned();
    let emma = test_ebook("Emma", &fiction);
    let catalog = MockCatalogRepo::new(vec![fiction], vec![dune.clone(), emma]);
    let uc = ListEbooksUseCase { catalog };

    let all = uc
        .execute(ListEbooksInput {
            search: Some("   ".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let found = uc
        .execute(ListEbooksInput {
            search: Some("herBERT".to_owned()),
            sort_by: EbookSortBy::TitleAsc,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, dune.id);
}

// ── ListCategoryEbooks ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_unknown_category_listing() {
    let uc = ListCategoryEbooksUseCase {
        catalog: MockCatalogRepo::default(),
    };
    let result = uc
        .execute("missing", EbookSortBy::default(), PageRequest::default())
        .await;
    assert!(
        matches!(result, Err(LibraryServiceError::CategoryNotFound)),
        "expected CategoryNotFound, got {result:?}"
    );
}

// ── GetEbook ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_ebook_with_its_category() {
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let uc = GetEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction.clone()], vec![dune.clone()]),
    };
    let (ebook, category) = uc.execute(dune.id).await.unwrap();
    assert_eq!(ebook.id, dune.id);
    assert_eq!(category.map(|c| c.id), Some(fiction.id));
}

#[tokio::test]
async fn should_hide_inactive_ebook_detail() {
    let fiction = test_category("Fiction", "fiction");
    let mut dune = test_ebook("Dune", &fiction);
    dune.is_active = false;
    let uc = GetEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
    };
    let result = uc.execute(dune.id).await;
    assert!(
        matches!(result, Err(LibraryServiceError::EbookNotFound)),
        "expected EbookNotFound, got {result:?}"
    );
}

// ── OpenEbook ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_open_free_ebook_and_record_reading_log() {
    let user = test_user(UserRole::User);
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let reading = MockReadingRepo::default();
    let logs = reading.logs_handle();

    let uc = OpenEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
        reading,
        subscriptions: MockSubscriptionRepo::empty(),
    };
    let opened = uc.execute(&user, dune.id).await.unwrap();
    assert_eq!(opened.ebook.pdf_url, dune.pdf_url);
    assert!(opened.progress.is_none());

    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, user.id);
    assert_eq!(logs[0].ebook_id, dune.id);
}

#[tokio::test]
async fn should_keep_started_at_when_reopening() {
    let user = test_user(UserRole::User);
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let reading = MockReadingRepo::default();
    let logs = reading.logs_handle();
    let uc = OpenEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
        reading,
        subscriptions: MockSubscriptionRepo::empty(),
    };

    uc.execute(&user, dune.id).await.unwrap();
    let first_started = logs.lock().unwrap()[0].started_at;
    uc.execute(&user, dune.id).await.unwrap();

    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].started_at, first_started);
    assert!(logs[0].last_read_at >= first_started);
}

#[tokio::test]
async fn should_require_subscription_for_premium_ebook() {
    let user = test_user(UserRole::User);
    let fiction = test_category("Fiction", "fiction");
    let mut dune = test_ebook("Dune", &fiction);
    dune.is_premium = true;
    let reading = MockReadingRepo::default();
    let logs = reading.logs_handle();

    let uc = OpenEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
        reading,
        subscriptions: MockSubscriptionRepo::new(Some(test_subscription(
            user.id,
            SubscriptionStatus::Expired,
            -1,
        ))),
    };
    let result = uc.execute(&user, dune.id).await;
    assert!(
        matches!(result, Err(LibraryServiceError::PremiumRequired)),
        "expected PremiumRequired, got {result:?}"
    );
    assert!(logs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_open_premium_ebook_with_active_subscription() {
    let user = test_user(UserRole::User);
    let fiction = test_category("Fiction", "fiction");
    let mut dune = test_ebook("Dune", &fiction);
    dune.is_premium = true;

    let uc = OpenEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
        reading: MockReadingRepo::default(),
        subscriptions: MockSubscriptionRepo::new(Some(test_subscription(
            user.id,
            SubscriptionStatus::Active,
            10,
        ))),
    };
    assert!(uc.execute(&user, dune.id).await.is_ok());
}

#[tokio::test]
async fn should_treat_overdue_active_subscription_as_lapsed() {
    let user = test_user(UserRole::User);
    let fiction = test_category("Fiction", "fiction");
    let mut dune = test_ebook("Dune", &fiction);
    dune.is_premium = true;

    let uc = OpenEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
        reading: MockReadingRepo::default(),
        subscriptions: MockSubscriptionRepo::new(Some(test_subscription(
            user.id,
            SubscriptionStatus::Active,
            -2,
        ))),
    };
    let result = uc.execute(&user, dune.id).await;
    assert!(matches!(result, Err(LibraryServiceError::PremiumRequired)));
}

#[tokio::test]
async fn should_let_admin_open_premium_ebook_without_subscription() {
    let admin = test_user(UserRole::Admin);
    let fiction = test_category("Fiction", "fiction");
    let mut dune = test_ebook("Dune", &fiction);
    dune.is_premium = true;

    let uc = OpenEbookUseCase {
        catalog: MockCatalogRepo::new(vec![fiction], vec![dune.clone()]),
        reading: MockReadingRepo::default(),
        subscriptions: MockSubscriptionRepo::empty(),
    };
    assert!(uc.execute(&admin, dune.id).await.is_ok());
}
