// ABOUTME: Library root for the OIA website API: shared state and the HTTP router
// ABOUTME: Both the server binary and the create_admin tool build on these modules

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;
pub mod uploads;
pub mod validate;

#[cfg(test)]
mod storage_tests;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use auth::TokenAuthority;
use config::Config;
use handlers::{
    contacts, events, faqs, gallery, news, partnerships, programs, search, static_content, stats,
    system, team,
};
use session::SessionStore;
use storage::Storage;
use uploads::{UploadKind, UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub auth: Arc<TokenAuthority>,
    pub sessions: SessionStore,
    pub uploads: Arc<UploadStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(storage: Arc<Storage>, config: Config) -> Self {
        Self {
            storage,
            auth: Arc::new(TokenAuthority::new(
                &config.jwt_secret,
                config.token_ttl_minutes,
            )),
            sessions: SessionStore::new(),
            uploads: Arc::new(UploadStore::new(config.upload_dir.clone())),
            config: Arc::new(config),
        }
    }
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(system::wake_up))
        .route("/api/", get(system::wake_up))
        .route("/api/health", get(system::health))
        .route("/api/programs", get(programs::list_programs))
        .route("/api/programs/:id", get(programs::get_program))
        .route("/api/news", get(news::list_news))
        .route("/api/news/:id", get(news::get_news))
        .route("/api/partnerships", get(partnerships::list_partnerships))
        .route("/api/partnerships/:id", get(partnerships::get_partnership))
        .route("/api/team", get(team::list_team))
        .route("/api/team/:id", get(team::get_team_member))
        .route("/api/events", get(events::list_events))
        .route("/api/events/:id", get(events::get_event))
        .route("/api/gallery", get(gallery::list_gallery))
        .route("/api/gallery/:id", get(gallery::get_gallery_image))
        .route("/api/faqs", get(faqs::list_faqs))
        .route("/api/static-content", get(static_content::list_static_content))
        .route("/api/static-content/:key", get(static_content::get_static_content))
        .route("/api/search", get(search::search))
        .route("/api/stats", get(stats::get_stats))
        .route("/api/stats/extended", get(stats::get_extended_stats))
        .route("/api/contact", post(contacts::submit_contact))
        .route("/api/forms/:form_type", post(contacts::submit_form))
        .route("/docs", get(system::docs))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/logout", post(auth::logout))
        .route(
            "/api/admin/stats-config",
            get(stats::get_stats_config).put(stats::update_stats_config),
        )
        .route(
            "/api/admin/programs",
            get(programs::list_all_programs).post(programs::create_program),
        )
        .route(
            "/api/admin/programs/:id",
            put(programs::update_program).delete(programs::delete_program),
        )
        .route("/api/admin/news", post(news::create_news))
        .route(
            "/api/admin/news/:id",
            put(news::update_news).delete(news::delete_news),
        )
        .route("/api/admin/partnerships", post(partnerships::create_partnership))
        .route(
            "/api/admin/partnerships/:id",
            put(partnerships::update_partnership).delete(partnerships::delete_partnership),
        )
        .route("/api/admin/team", post(team::create_team_member))
        .route(
            "/api/admin/team/:id",
            put(team::update_team_member).delete(team::delete_team_member),
        )
        .route("/api/admin/events", post(events::create_event))
        .route(
            "/api/admin/events/:id",
            put(events::update_event).delete(events::delete_event),
        )
        .route("/api/admin/gallery", post(gallery::upload_gallery_image))
        .route(
            "/api/admin/gallery/:id",
            put(gallery::update_gallery_image).delete(gallery::delete_gallery_image),
        )
        .route("/api/admin/faqs", post(faqs::create_faq))
        .route(
            "/api/admin/faqs/:id",
            put(faqs::update_faq).delete(faqs::delete_faq),
        )
        .route(
            "/api/admin/static-content",
            post(static_content::create_static_content),
        )
        .route(
            "/api/admin/static-content/:key",
            put(static_content::update_static_content).delete(static_content::delete_static_content),
        )
        .route("/api/admin/contacts", get(contacts::list_contacts))
        .route(
            "/api/admin/contacts/:id/read",
            put(contacts::mark_contact_read),
        )
        .route("/api/admin/contacts/:id", delete(contacts::delete_contact))
}

pub fn build_router(state: AppState) -> Router {
    let uploads = state.uploads.clone();

    Router::new()
        .merge(public_routes())
        .merge(admin_routes())
        .nest_service("/uploads", ServeDir::new(uploads.root()))
        .nest_service("/gallery", ServeDir::new(uploads.dir(UploadKind::Gallery)))
        .nest_service("/team", ServeDir::new(uploads.dir(UploadKind::Team)))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(middleware::cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
