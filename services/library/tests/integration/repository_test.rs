use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use uuid::Uuid;

use lectern_domain::reading::ReadlistStatus;
use lectern_domain::subscription::{SubscriptionStatus, TransactionStatus};
use lectern_library::domain::payment::TransactionUpdate;
use lectern_library::domain::repository::{
    PaymentRepository, ReadingRepository, SubscriptionRepository,
};
use lectern_library::domain::types::{PaymentOutcome, PlanCatalog, SubscriptionPlan};
use lectern_library::error::LibraryServiceError;
use lectern_library::infra::db::{
    DbPaymentRepository, DbReadingRepository, DbSubscriptionRepository,
};
use lectern_library_client::LibraryClient;
use lectern_library_schema::{
    admin_events, reading_progress, readlists, subscriptions, transactions,
};

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// SQL of every statement the mock saw, `BEGIN`/`COMMIT` included.
fn statements(db: &DatabaseConnection) -> Vec<String> {
    db.clone()
        .into_transaction_log()
        .iter()
        .flat_map(|t| t.statements().iter().map(|s| s.sql.clone()))
        .collect()
}

fn touches(sql: &[String], prefix: &str) -> bool {
    sql.iter().any(|s| s.starts_with(prefix))
}

fn select_from<'a>(sql: &'a [String], table: &str) -> &'a str {
    let from = format!(r#"FROM "{table}""#);
    sql.iter()
        .find(|s| s.starts_with("SELECT") && s.contains(&from))
        .unwrap_or_else(|| panic!("no select from {table}: {sql:?}"))
}

fn subscription_row(
    user_id: Uuid,
    status: SubscriptionStatus,
    end_date: Option<DateTime<Utc>>,
    order_id: &str,
) -> subscriptions::Model {
    let now = Utc::now();
    subscriptions::Model {
        id: Uuid::now_v7(),
        user_id,
        status: status.as_str().to_owned(),
        plan_name: "monthly".to_owned(),
        start_date: end_date.map(|end| end - Duration::days(30)),
        end_date,
        order_id: Some(order_id.to_owned()),
        transaction_id: Some("gw-1".to_owned()),
        gross_amount: Some(49_000),
        created_at: now,
        updated_at: now,
    }
}

fn transaction_row(
    subscription_id: Uuid,
    order_id: &str,
    status: TransactionStatus,
) -> transactions::Model {
    let now = Utc::now();
    transactions::Model {
        id: Uuid::now_v7(),
        subscription_id,
        order_id: order_id.to_owned(),
        transaction_status: status.as_str().to_owned(),
        gross_amount: 49_000,
        payment_type: None,
        transaction_time: None,
        settlement_time: None,
        webhook_payload: None,
        created_at: now,
        updated_at: now,
    }
}

fn event_row() -> admin_events::Model {
    admin_events::Model {
        id: Uuid::now_v7(),
        kind: "PAYMENT_SETTLEMENT".to_owned(),
        title: "Payment settlement".to_owned(),
        description: None,
        metadata: None,
        created_at: Utc::now(),
    }
}

fn settlement() -> TransactionUpdate {
    TransactionUpdate {
        status: TransactionStatus::Settlement,
        gross_amount: 49_000,
        transaction_id: Some("gw-2".to_owned()),
        payment_type: Some("bank_transfer".to_owned()),
        transaction_time: None,
        settlement_time: Some(Utc::now()),
        payload: serde_json::json!({ "order_id": "SUB-B" }),
    }
}

fn plans() -> PlanCatalog {
    PlanCatalog::new(vec![SubscriptionPlan {
        name: "monthly".to_owned(),
        duration_days: 30,
        amount: 49_000,
    }])
}

fn rows_affected(n: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: n,
    }
}

// ── Checkout ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_refuse_checkout_over_running_subscription_inside_transaction() {
    let user_id = Uuid::now_v7();
    let running = subscription_row(
        user_id,
        SubscriptionStatus::Active,
        Some(Utc::now() + Duration::days(10)),
        "SUB-A",
    );
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![running]])
        .into_connection();
    let repo = DbSubscriptionRepository {
        client: LibraryClient::new(db.clone()),
    };

    let result = repo
        .checkout(user_id, "monthly", "SUB-B", 49_000, Utc::now())
        .await;
    assert!(
        matches!(result, Err(LibraryServiceError::SubscriptionActive)),
        "expected SubscriptionActive, got {result:?}"
    );

    let sql = statements(&db);
    assert!(select_from(&sql, "subscriptions").ends_with("FOR UPDATE"), "{sql:?}");
    assert!(!touches(&sql, "INSERT"), "{sql:?}");
    assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn should_reset_lapsed_subscription_terms_on_checkout() {
    let user_id = Uuid::now_v7();
    let now = Utc::now();
    let lapsed = subscription_row(
        user_id,
        SubscriptionStatus::Active,
        Some(now - Duration::days(1)),
        "SUB-A",
    );
    let reset = subscriptions::Model {
        status: SubscriptionStatus::Pending.as_str().to_owned(),
        start_date: None,
        end_date: None,
        order_id: Some("SUB-B".to_owned()),
        transaction_id: None,
        ..lapsed.clone()
    };
    let pending = transaction_row(reset.id, "SUB-B", TransactionStatus::Pending);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![lapsed]])
        .append_query_results([vec![reset]])
        .append_query_results([vec![pending]])
        .into_connection();
    let repo = DbSubscriptionRepository {
        client: LibraryClient::new(db.clone()),
    };

    let checkout = repo
        .checkout(user_id, "monthly", "SUB-B", 49_000, now)
        .await
        .unwrap();
    assert_eq!(checkout.subscription.status, SubscriptionStatus::Pending);
    assert_eq!(checkout.subscription.transaction_id, None);
    assert_eq!(checkout.transaction.order_id, "SUB-B");

    let sql = statements(&db);
    let upsert = sql
        .iter()
        .find(|s| s.starts_with(r#"INSERT INTO "subscriptions""#))
        .expect("subscription upsert");
    for column in ["start_date", "end_date", "transaction_id", "order_id", "status"] {
        assert!(
            upsert.contains(&format!(r#""{column}" = "excluded"."{column}""#)),
            "{column} not reset: {upsert}"
        );
    }
    assert!(touches(&sql, r#"INSERT INTO "transactions""#), "{sql:?}");
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
}

// ── Payment notifications ────────────────────────────────────────────────────

#[tokio::test]
async fn should_claim_pending_transaction_before_crediting_subscription() {
    let user_id = Uuid::now_v7();
    let pending_sub = subscription_row(user_id, SubscriptionStatus::Pending, None, "SUB-B");
    let active_sub = subscriptions::Model {
        status: SubscriptionStatus::Active.as_str().to_owned(),
        ..pending_sub.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![transaction_row(
            pending_sub.id,
            "SUB-B",
            TransactionStatus::Pending,
        )]])
        .append_exec_results([rows_affected(1)])
        .append_query_results([vec![pending_sub]])
        .append_query_results([vec![active_sub]])
        .append_query_results([vec![event_row()]])
        .into_connection();
    let repo = DbPaymentRepository {
        client: LibraryClient::new(db.clone()),
    };

    let outcome = repo
        .apply_notification("SUB-B", &settlement(), &plans(), Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, PaymentOutcome::Applied);

    let sql = statements(&db);
    assert!(select_from(&sql, "transactions").ends_with("FOR UPDATE"), "{sql:?}");
    let claim = sql
        .iter()
        .find(|s| s.starts_with(r#"UPDATE "transactions""#))
        .expect("transaction claim");
    assert!(
        claim.contains(r#""transactions"."transaction_status" = $"#),
        "claim is not conditional on the stored status: {claim}"
    );
    assert!(select_from(&sql, "subscriptions").ends_with("FOR UPDATE"), "{sql:?}");
    assert!(touches(&sql, r#"UPDATE "subscriptions""#), "{sql:?}");
    assert!(touches(&sql, r#"INSERT INTO "admin_events""#), "{sql:?}");
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
}

#[tokio::test]
async fn should_ignore_duplicate_delivery_that_loses_the_claim() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![transaction_row(
            Uuid::now_v7(),
            "SUB-B",
            TransactionStatus::Pending,
        )]])
        .append_exec_results([rows_affected(0)])
        .into_connection();
    let repo = DbPaymentRepository {
        client: LibraryClient::new(db.clone()),
    };

    let outcome = repo
        .apply_notification("SUB-B", &settlement(), &plans(), Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, PaymentOutcome::Ignored);

    let sql = statements(&db);
    assert!(!sql.iter().any(|s| s.contains(r#""subscriptions""#)), "{sql:?}");
    assert!(!touches(&sql, r#"INSERT INTO "admin_events""#), "{sql:?}");
}

#[tokio::test]
async fn should_ignore_notification_for_final_transaction() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![transaction_row(
            Uuid::now_v7(),
            "SUB-B",
            TransactionStatus::Settlement,
        )]])
        .into_connection();
    let repo = DbPaymentRepository {
        client: LibraryClient::new(db.clone()),
    };

    let outcome = repo
        .apply_notification("SUB-B", &settlement(), &plans(), Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, PaymentOutcome::Ignored);
    assert!(!touches(&statements(&db), "UPDATE"));
}

// ── Reading progress ─────────────────────────────────────────────────────────

fn progress_row(user_id: Uuid, ebook_id: Uuid, progress: f64) -> reading_progress::Model {
    let now = Utc::now();
    reading_progress::Model {
        id: Uuid::now_v7(),
        user_id,
        ebook_id,
        current_location: None,
        progress,
        created_at: now,
        updated_at: now,
    }
}

fn readlist_row(user_id: Uuid, ebook_id: Uuid, status: ReadlistStatus) -> readlists::Model {
    let now = Utc::now();
    readlists::Model {
        id: Uuid::now_v7(),
        user_id,
        ebook_id,
        status: status.as_str().to_owned(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn should_finish_locked_readlist_entry_with_full_progress() {
    let (user_id, ebook_id) = (Uuid::now_v7(), Uuid::now_v7());
    let entry = readlist_row(user_id, ebook_id, ReadlistStatus::WantToRead);
    let finished = readlists::Model {
        status: ReadlistStatus::Finished.as_str().to_owned(),
        ..entry.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![progress_row(user_id, ebook_id, 100.0)]])
        .append_query_results([vec![entry]])
        .append_query_results([vec![finished]])
        .into_connection();
    let repo = DbReadingRepository {
        client: LibraryClient::new(db.clone()),
    };

    let saved = repo
        .save_progress(user_id, ebook_id, 100.0, None, Utc::now())
        .await
        .unwrap();
    assert_eq!(saved.progress.progress, 100.0);
    assert_eq!(
        saved.readlist.map(|e| e.status),
        Some(ReadlistStatus::Finished)
    );

    let sql = statements(&db);
    assert!(select_from(&sql, "readlists").ends_with("FOR UPDATE"), "{sql:?}");
    assert!(touches(&sql, r#"UPDATE "readlists""#), "{sql:?}");
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
}

#[tokio::test]
async fn should_save_progress_without_creating_readlist_entry() {
    let (user_id, ebook_id) = (Uuid::now_v7(), Uuid::now_v7());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![progress_row(user_id, ebook_id, 40.0)]])
        .append_query_results([Vec::<readlists::Model>::new()])
        .into_connection();
    let repo = DbReadingRepository {
        client: LibraryClient::new(db.clone()),
    };

    let saved = repo
        .save_progress(user_id, ebook_id, 40.0, None, Utc::now())
        .await
        .unwrap();
    assert!(saved.readlist.is_none());

    let sql = statements(&db);
    assert!(touches(&sql, r#"INSERT INTO "reading_progress""#), "{sql:?}");
    assert!(!touches(&sql, r#"INSERT INTO "readlists""#), "{sql:?}");
    assert!(!touches(&sql, r#"UPDATE "readlists""#), "{sql:?}");
}
