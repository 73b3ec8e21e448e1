use uuid::Uuid;

use lectern_domain::user::UserRole;

use lectern_library::domain::types::{BannerPatch, CategoryPatch};
use lectern_library::error::LibraryServiceError;
use lectern_library::usecase::admin::{
    CATEGORY_CREATED, CATEGORY_UPDATED, CreateBannerInput, CreateCategoryInput, CreateEbookInput,
    EBOOK_CREATED, EBOOK_DELETED, EBOOK_UPDATED, ManageBannersUseCase, ManageCategoriesUseCase,
    ManageEbooksUseCase, UpdateEbookInput,
};

use crate::helpers::{
    MockCatalogAdminRepo, MockCatalogRepo, test_category, test_ebook, test_user,
};

fn ebook_input(category_id: Uuid) -> CreateEbookInput {
    CreateEbookInput {
        title: "Dune".to_owned(),
        author: "Frank Herbert".to_owned(),
        description: None,
        cover_url: None,
        pdf_url: Some("https://cdn.example.com/dune.pdf".to_owned()),
        public_id: Some("ebooks/dune".to_owned()),
        category_id,
        is_premium: true,
        is_active: true,
        priority: 3,
    }
}

fn empty_update() -> UpdateEbookInput {
    UpdateEbookInput {
        title: None,
        author: None,
        description: None,
        cover_url: None,
        pdf_url: None,
        public_id: None,
        category_id: None,
        is_premium: None,
        is_active: None,
        priority: None,
    }
}

// ── Ebooks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_ebook_with_denormalized_category_name() {
    let admin = test_user(UserRole::Admin);
    let fiction = test_category("Science Fiction", "science-fiction");
    let repo = MockCatalogAdminRepo::default();
    let events = repo.events_handle();

    let uc = ManageEbooksUseCase {
        catalog: MockCatalogRepo::new(vec![fiction.clone()], vec![]),
        admin: repo,
    };
    let ebook = uc.create(&admin, ebook_input(fiction.id)).await.unwrap();

    assert_eq!(ebook.category, "Science Fiction");
    assert_eq!(ebook.category_id, Some(fiction.id));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EBOOK_CREATED);
    assert_eq!(events[0].metadata.as_ref().unwrap()["subject_id"], ebook.id.to_string());
}

#[tokio::test]
async fn should_reject_ebook_with_unknown_category() {
    let admin = test_user(UserRole::Admin);
    let repo = MockCatalogAdminRepo::default();
    let events = repo.events_handle();
    let uc = ManageEbooksUseCase {
        catalog: MockCatalogRepo::default(),
        admin: repo,
    };
    let result = uc.create(&admin, ebook_input(Uuid::now_v7())).await;
    assert!(
        matches!(result, Err(LibraryServiceError::CategoryNotFound)),
        "expected CategoryNotFound, got {result:?}"
    );
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_blank_ebook_title() {
    let admin = test_user(UserRole::Admin);
    let fiction = test_category("Fiction", "fiction");
    let uc = ManageEbooksUseCase {
        catalog: MockCatalogRepo::new(vec![fiction.clone()], vec![]),
        admin: MockCatalogAdminRepo::default(),
    };
    let mut input = ebook_input(fiction.id);
    input.title = "  ".to_owned();
    let result = uc.create(&admin, input).await;
    assert!(matches!(result, Err(LibraryServiceError::EmptyField("title"))));
}

#[tokio::test]
async fn should_move_ebook_to_another_category() {
    let admin = test_user(UserRole::Admin);
    let fiction = test_category("Fiction", "fiction");
    let history = test_category("History", "history");
    let dune = test_ebook("Dune", &fiction);
    let repo = MockCatalogAdminRepo::with_ebooks(vec![dune.clone()]);
    let events = repo.events_handle();

    let uc = ManageEbooksUseCase {
        catalog: MockCatalogRepo::new(vec![fiction, history.clone()], vec![]),
        admin: repo,
    };
    let mut input = empty_update();
    input.category_id = Some(history.id);
    let updated = uc.update(&admin, dune.id, input).await.unwrap();

    assert_eq!(updated.category, "History");
    assert_eq!(updated.category_id, Some(history.id));
    assert_eq!(events.lock().unwrap()[0].kind, EBOOK_UPDATED);
}

#[tokio::test]
async fn should_reject_empty_ebook_update() {
    let admin = test_user(UserRole::Admin);
    let uc = ManageEbooksUseCase {
        catalog: MockCatalogRepo::default(),
        admin: MockCatalogAdminRepo::default(),
    };
    let result = uc.update(&admin, Uuid::now_v7(), empty_update()).await;
    assert!(matches!(result, Err(LibraryServiceError::MissingData)));
}

#[tokio::test]
async fn should_report_missing_ebook_on_update_and_delete() {
    let admin = test_user(UserRole::Admin);
    let uc = ManageEbooksUseCase {
        catalog: MockCatalogRepo::default(),
        admin: MockCatalogAdminRepo::default(),
    };
    let mut input = empty_update();
    input.priority = Some(9);
    let result = uc.update(&admin, Uuid::now_v7(), input).await;
    assert!(matches!(result, Err(LibraryServiceError::EbookNotFound)));

    let result = uc.delete(&admin, Uuid::now_v7()).await;
    assert!(matches!(result, Err(LibraryServiceError::EbookNotFound)));
}

#[tokio::test]
async fn should_delete_ebook_and_record_event() {
    let admin = test_user(UserRole::Admin);
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let repo = MockCatalogAdminRepo::with_ebooks(vec![dune.clone()]);
    let ebooks = repo.ebooks_handle();
    let events = repo.events_handle();
    let uc = ManageEbooksUseCase {
        catalog: MockCatalogRepo::default(),
        admin: repo,
    };

    uc.delete(&admin, dune.id).await.unwrap();
    assert!(ebooks.lock().unwrap().is_empty());
    assert_eq!(events.lock().unwrap()[0].kind, EBOOK_DELETED);
}

// ── Categories ───────────────────────────────────────────────────────────────

fn category_input(slug: &str) -> CreateCategoryInput {
    CreateCategoryInput {
        name: "Poetry".to_owned(),
        slug: slug.to_owned(),
        icon: None,
        description: None,
        display_order: 4,
        is_active: true,
    }
}

#[tokio::test]
async fn should_create_category_and_record_event() {
    let admin = test_user(UserRole::Admin);
    let repo = MockCatalogAdminRepo::default();
    let events = repo.events_handle();
    let uc = ManageCategoriesUseCase { admin: repo };

    let category = uc.create(&admin, category_input("poetry")).await.unwrap();
    assert_eq!(category.slug, "poetry");
    assert_eq!(events.lock().unwrap()[0].kind, CATEGORY_CREATED);
}

#[tokio::test]
async fn should_reject_malformed_slug() {
    let admin = test_user(UserRole::Admin);
    let uc = ManageCategoriesUseCase {
        admin: MockCatalogAdminRepo::default(),
    };
    for slug in ["", "Poetry", "two words", "-lead", "double--dash"] {
        let result = uc.create(&admin, category_input(slug)).await;
        assert!(
            matches!(result, Err(LibraryServiceError::InvalidSlug)),
            "expected InvalidSlug for {slug:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_duplicate_slug() {
    let admin = test_user(UserRole::Admin);
    let uc = ManageCategoriesUseCase {
        admin: MockCatalogAdminRepo::with_categories(vec![test_category("Poetry", "poetry")]),
    };
    let result = uc.create(&admin, category_input("poetry")).await;
    assert!(
        matches!(result, Err(LibraryServiceError::CategoryAlreadyExists)),
        "expected CategoryAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_rename_category_on_its_ebooks() {
    let admin = test_user(UserRole::Admin);
    let fiction = test_category("Fiction", "fiction");
    let dune = test_ebook("Dune", &fiction);
    let repo = MockCatalogAdminRepo::with_categories(vec![fiction.clone()]);
    repo.ebooks.lock().unwrap().push(dune);
    let ebooks = repo.ebooks_handle();
    let events = repo.events_handle();
    let uc = ManageCategoriesUseCase { admin: repo };

    let renamed = uc
        .update(
            &admin,
            fiction.id,
            CategoryPatch {
                name: Some("Novels".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Novels");
    assert_eq!(ebooks.lock().unwrap()[0].category, "Novels");
    assert_eq!(events.lock().unwrap()[0].kind, CATEGORY_UPDATED);
}

#[tokio::test]
async fn should_reject_empty_category_update() {
    let admin = test_user(UserRole::Admin);
    let uc = ManageCategoriesUseCase {
        admin: MockCatalogAdminRepo::default(),
    };
    let result = uc
        .update(&admin, Uuid::now_v7(), CategoryPatch::default())
        .await;
    assert!(matches!(result, Err(LibraryServiceError::MissingData)));
}

// ── Banners ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_manage_banner_lifecycle() {
    let admin = test_user(UserRole::Admin);
    let repo = MockCatalogAdminRepo::default();
    let events = repo.events_handle();
    let uc = ManageBannersUseCase { admin: repo };

    let banner = uc
        .create(
            &admin,
            CreateBannerInput {
                title: "Summer sale".to_owned(),
                subtitle: None,
                cta_label: Some("Subscribe".to_owned()),
                cta_link: Some("/subscribe".to_owned()),
                image_url: None,
                is_active: true,
                priority: 1,
            },
        )
        .await
        .unwrap();

    let hidden = uc
        .update(
            &admin,
            banner.id,
            BannerPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!hidden.is_active);

    uc.delete(&admin, banner.id).await.unwrap();
    let result = uc.delete(&admin, banner.id).await;
    assert!(matches!(result, Err(LibraryServiceError::BannerNotFound)));
    assert_eq!(events.lock().unwrap().len(), 3);
}
