use axum::{
    Router,
    routing::{get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use lectern_core::health::{healthz, readyz};
use lectern_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{
        create_banner, create_category, create_ebook, delete_banner, delete_category,
        delete_ebook, get_stats, list_events, set_user_role, update_banner, update_category,
        update_ebook,
    },
    annotation::{create_annotation, delete_annotation, list_annotations, update_annotation},
    catalog::{
        get_ebook, list_banners, list_categories, list_category_ebooks, list_ebooks, open_ebook,
    },
    payment::receive_notification,
    reading::{
        delete_readlist_entry, get_progress, list_readlist, list_reading_logs, save_progress,
        set_readlist_status,
    },
    subscription::{checkout, get_subscription},
    user::{get_me, sync_user, update_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users/sync", post(sync_user))
        .route("/users/@me", get(get_me).patch(update_me))
        // Catalog
        .route("/categories", get(list_categories))
        .route("/categories/{slug}/ebooks", get(list_category_ebooks))
        .route("/ebooks", get(list_ebooks))
        .route("/ebooks/{id}", get(get_ebook))
        .route("/ebooks/{id}/open", post(open_ebook))
        .route("/banners", get(list_banners))
        // Reading
        .route("/users/@me/reading-logs", get(list_reading_logs))
        .route(
            "/users/@me/progress/{ebook_id}",
            get(get_progress).put(save_progress),
        )
        .route("/users/@me/readlist", get(list_readlist))
        .route(
            "/users/@me/readlist/{ebook_id}",
            put(set_readlist_status).delete(delete_readlist_entry),
        )
        // Annotations
        .route(
            "/users/@me/ebooks/{ebook_id}/annotations",
            get(list_annotations).post(create_annotation),
        )
        .route(
            "/users/@me/annotations/{id}",
            patch(update_annotation).delete(delete_annotation),
        )
        // Subscriptions & payments
        .route("/users/@me/subscription", get(get_subscription))
        .route("/subscriptions/checkout", post(checkout))
        .route("/payments/notifications", post(receive_notification))
        // Admin
        .route("/admin/stats", get(get_stats))
        .route("/admin/events", get(list_events))
        .route("/admin/ebooks", post(create_ebook))
        .route("/admin/ebooks/{id}", patch(update_ebook).delete(delete_ebook))
        .route("/admin/categories", post(create_category))
        .route(
            "/admin/categories/{id}",
            patch(update_category).delete(delete_category),
        )
        .route("/admin/banners", post(create_banner))
        .route(
            "/admin/banners/{id}",
            patch(update_banner).delete(delete_banner),
        )
        .route("/admin/users/{id}/role", patch(set_user_role))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
