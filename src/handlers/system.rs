// ABOUTME: Service endpoints: wake-up ping, health check and the route catalogue at /docs

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

pub const SERVICE_NAME: &str = "OIA Website API v2.0";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub auth: bool,
    pub summary: &'static str,
}

const fn route(method: &'static str, path: &'static str, auth: bool, summary: &'static str) -> RouteDoc {
    RouteDoc {
        method,
        path,
        auth,
        summary,
    }
}

pub const ROUTES: &[RouteDoc] = &[
    route("GET", "/api/", false, "Wake-up ping"),
    route("GET", "/api/health", false, "Health check"),
    route("GET", "/api/programs", false, "Active exchange programs (page, page_size)"),
    route("GET", "/api/programs/{id}", false, "Program detail"),
    route("GET", "/api/news", false, "News (category, featured_only, page, page_size)"),
    route("GET", "/api/news/{id}", false, "News article"),
    route("GET", "/api/partnerships", false, "Partnerships (type, country, page, page_size)"),
    route("GET", "/api/partnerships/{id}", false, "Partnership detail"),
    route("GET", "/api/team", false, "Team members ordered for display"),
    route("GET", "/api/team/{id}", false, "Team member detail"),
    route("GET", "/api/events", false, "Events (type, upcoming_only, page, page_size)"),
    route("GET", "/api/events/{id}", false, "Event detail"),
    route("GET", "/api/gallery", false, "Gallery images (category, page, page_size)"),
    route("GET", "/api/gallery/{id}", false, "Gallery image detail"),
    route("GET", "/api/faqs", false, "FAQs (category)"),
    route("GET", "/api/static-content", false, "Static pages (section)"),
    route("GET", "/api/static-content/{key}", false, "Static page by key"),
    route("GET", "/api/search", false, "Global search (q, sections)"),
    route("GET", "/api/stats", false, "Site statistics"),
    route("GET", "/api/stats/extended", false, "Extended site statistics"),
    route("POST", "/api/contact", false, "Submit the contact form"),
    route("POST", "/api/forms/{form_type}", false, "Submit a typed form"),
    route("POST", "/api/admin/login", false, "Exchange credentials for a bearer token"),
    route("POST", "/api/admin/logout", true, "Revoke the current token"),
    route("GET", "/api/admin/stats-config", true, "Editable statistics"),
    route("PUT", "/api/admin/stats-config", true, "Update editable statistics"),
    route("GET", "/api/admin/programs", true, "All programs including inactive"),
    route("POST", "/api/admin/programs", true, "Create program"),
    route("PUT", "/api/admin/programs/{id}", true, "Update program"),
    route("DELETE", "/api/admin/programs/{id}", true, "Delete program"),
    route("POST", "/api/admin/news", true, "Create news"),
    route("PUT", "/api/admin/news/{id}", true, "Update news"),
    route("DELETE", "/api/admin/news/{id}", true, "Delete news"),
    route("POST", "/api/admin/partnerships", true, "Create partnership"),
    route("PUT", "/api/admin/partnerships/{id}", true, "Update partnership"),
    route("DELETE", "/api/admin/partnerships/{id}", true, "Delete partnership"),
    route("POST", "/api/admin/team", true, "Create team member (multipart)"),
    route("PUT", "/api/admin/team/{id}", true, "Update team member (multipart)"),
    route("DELETE", "/api/admin/team/{id}", true, "Delete team member"),
    route("POST", "/api/admin/events", true, "Create event"),
    route("PUT", "/api/admin/events/{id}", true, "Update event"),
    route("DELETE", "/api/admin/events/{id}", true, "Delete event"),
    route("POST", "/api/admin/gallery", true, "Upload gallery image (multipart)"),
    route("PUT", "/api/admin/gallery/{id}", true, "Update gallery image (multipart)"),
    route("DELETE", "/api/admin/gallery/{id}", true, "Delete gallery image"),
    route("POST", "/api/admin/faqs", true, "Create FAQ"),
    route("PUT", "/api/admin/faqs/{id}", true, "Update FAQ"),
    route("DELETE", "/api/admin/faqs/{id}", true, "Delete FAQ"),
    route("POST", "/api/admin/static-content", true, "Create static page"),
    route("PUT", "/api/admin/static-content/{key}", true, "Update static page"),
    route("DELETE", "/api/admin/static-content/{key}", true, "Delete static page"),
    route("GET", "/api/admin/contacts", true, "Contact submissions (form_type)"),
    route("PUT", "/api/admin/contacts/{id}/read", true, "Mark submission as read"),
    route("DELETE", "/api/admin/contacts/{id}", true, "Delete submission"),
    route("GET", "/docs", false, "This catalogue"),
];

pub async fn wake_up() -> Json<Value> {
    tracing::info!("Wake-up ping received");
    Json(json!({
        "status": "ok",
        "message": "OIA Website API - Medi-Caps University",
        "version": "2.0",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

pub async fn docs(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "title": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.storage.backend_name(),
        "authentication": "Send `Authorization: Bearer <access_token>` from POST /api/admin/login to routes marked auth",
        "routes": ROUTES,
    }))
}
