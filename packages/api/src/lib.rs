//! # API crate: HTTP surface of the engineering diary
//!
//! Builds the axum [`Router`] around a [`diary_store::Journal`] and provides everything
//! the binary needs to run it against PostgreSQL.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Password hashing, credential authentication, session layer and the route gate |
//! | [`db`] | PostgreSQL pool, migrations and the [`db::PgStore`] backend |
//! | [`error`] | [`ApiError`] and its JSON response mapping |
//! | [`models`] | Database rows and the client-safe [`UserInfo`] |
//! | [`routes`] | Request handlers |
//! | [`settings`] | Layered configuration |
//! | [`state`] | Shared router state |
//!
//! ## Routes
//!
//! Everything lives under `/api`. Registration, login and logout are open; the rest
//! (`/auth/me`, `/projects`, `/entries`, `/dashboard`) requires a signed-in session and
//! answers `401` otherwise. `/health` sits outside `/api`.
//!
//! The session layer is not part of [`app`]: the caller wraps the router with
//! [`auth::session_layer`] over the session store of its choice.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use diary_store::JournalStore;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod settings;
pub mod state;

pub use error::ApiError;
pub use models::UserInfo;
pub use settings::Settings;
pub use state::AppState;

async fn health() -> &'static str {
    "OK"
}

/// Build the application router.
pub fn app<S: JournalStore + 'static>(state: AppState<S>) -> Router {
    let journal = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/dashboard", get(routes::dashboard::show::<S>))
        .merge(routes::projects::router())
        .merge(routes::entries::router())
        .route_layer(middleware::from_fn(auth::require_user));

    let api = Router::new()
        .route("/auth/register", post(routes::auth::register::<S>))
        .route("/auth/login", post(routes::auth::login::<S>))
        .route("/auth/logout", post(routes::auth::logout))
        .merge(journal);

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use diary_store::testing::UnlinkFailingStore;
    use diary_store::MemoryStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::settings::{Database, Server, Session};

    fn settings() -> Settings {
        Settings {
            database: Database {
                url: "postgres://localhost".to_string(),
                name: "test_diary".to_string(),
                max_connections: 1,
            },
            session: Session {
                secret: "s".repeat(64),
                expiry_days: 7,
            },
            server: Server {
                bind: "127.0.0.1:0".to_string(),
                public_url: "http://localhost".to_string(),
            },
        }
    }

    fn app_with<S: JournalStore + 'static>(store: S) -> Router {
        let layer = auth::session_layer(tower_sessions::MemoryStore::default(), &settings())
            .expect("64-byte secret");
        app(AppState::new(store)).layer(layer)
    }

    fn test_app() -> Router {
        app_with(MemoryStore::new())
    }

    struct Reply {
        status: StatusCode,
        cookie: Option<String>,
        body: Value,
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Reply {
            status,
            cookie,
            body,
        }
    }

    /// Register and log in, returning the session cookie.
    async fn sign_in(app: &Router, email: &str) -> String {
        let credentials = json!({ "email": email, "password": "correct horse" });
        let reply = send(app, "POST", "/api/auth/register", None, Some(credentials.clone())).await;
        assert_eq!(reply.status, StatusCode::OK);

        let reply = send(app, "POST", "/api/auth/login", None, Some(credentials)).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.cookie.expect("login sets a session cookie")
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_register_login_me_logout() {
        let app = test_app();
        let credentials = json!({ "email": " Ada@Example.com", "password": "correct horse" });

        let registered = send(&app, "POST", "/api/auth/register", None, Some(credentials)).await;
        assert_eq!(registered.status, StatusCode::OK);
        let id = registered.body["id"].as_str().unwrap().to_string();

        let login = json!({ "email": "ada@example.com", "password": "correct horse" });
        let reply = send(&app, "POST", "/api/auth/login", None, Some(login)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({ "id": id, "email": "ada@example.com" }));
        let cookie = reply.cookie.unwrap();

        let me = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
        assert_eq!(me.status, StatusCode::OK);
        assert_eq!(me.body["email"], "ada@example.com");

        let out = send(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
        assert_eq!(out.status, StatusCode::OK);
        assert_eq!(out.body, json!({ "ok": true }));

        let me = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
        assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = test_app();
        sign_in(&app, "dup@example.com").await;

        let again = json!({ "email": "DUP@example.com", "password": "another one" });
        let reply = send(&app, "POST", "/api/auth/register", None, Some(again)).await;
        assert_eq!(reply.status, StatusCode::CONFLICT);
        assert!(reply.body["error"].is_string());
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_and_bad_json() {
        let app = test_app();

        let short = json!({ "email": "a@example.com", "password": "short" });
        let reply = send(&app, "POST", "/api/auth/register", None, Some(short)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);

        let request = Request::post("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = test_app();
        sign_in(&app, "eve@example.com").await;

        let wrong = json!({ "email": "eve@example.com", "password": "wrong horse" });
        let reply = send(&app, "POST", "/api/auth/login", None, Some(wrong)).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert!(reply.cookie.is_none());

        let unknown = json!({ "email": "nobody@example.com", "password": "correct horse" });
        let other = send(&app, "POST", "/api/auth/login", None, Some(unknown)).await;
        assert_eq!(other.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body, other.body);
    }

    #[tokio::test]
    async fn test_journal_requires_session() {
        let app = test_app();
        for uri in [
            "/api/projects",
            "/api/projects/options",
            "/api/entries",
            "/api/dashboard",
            "/api/auth/me",
        ] {
            let reply = send(&app, "GET", uri, None, None).await;
            assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(reply.body, json!({ "error": "Unauthorized" }));
        }

        let reply = send(
            &app,
            "POST",
            "/api/projects",
            Some("id=forged"),
            Some(json!({ "name": "x" })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_project_patch_replaces_entry_patch_merges() {
        let app = test_app();
        let cookie = sign_in(&app, "dev@example.com").await;

        let created = send(
            &app,
            "POST",
            "/api/projects",
            Some(&cookie),
            Some(json!({
                "name": "Compiler",
                "description": "toy compiler",
                "status": "on-hold",
                "tech_stack": ["rust"],
                "repo_url": "https://example.com/c.git"
            })),
        )
        .await;
        assert_eq!(created.status, StatusCode::OK);
        let project = created.body["id"].as_str().unwrap().to_string();

        let uri = format!("/api/projects/{project}");
        let reply = send(&app, "PATCH", &uri, Some(&cookie), Some(json!({ "name": "Renamed" }))).await;
        assert_eq!(reply.body, json!({ "ok": true }));

        let detail = send(&app, "GET", &uri, Some(&cookie), None).await;
        assert_eq!(detail.status, StatusCode::OK);
        assert_eq!(detail.body["project"]["name"], "Renamed");
        assert_eq!(detail.body["project"]["status"], "active");
        assert_eq!(detail.body["project"]["description"], Value::Null);
        assert_eq!(detail.body["project"]["tech_stack"], json!([]));
        assert_eq!(detail.body["project"]["repo_url"], Value::Null);

        let entry = send(
            &app,
            "POST",
            "/api/entries",
            Some(&cookie),
            Some(json!({
                "title": "Parser",
                "content": "Pratt parsing works",
                "entry_type": "idea",
                "mood": "excited",
                "tags": ["parsing"],
                "project_id": project
            })),
        )
        .await;
        let entry = entry.body["id"].as_str().unwrap().to_string();

        let uri = format!("/api/entries/{entry}");
        let reply = send(&app, "PATCH", &uri, Some(&cookie), Some(json!({ "pinned": true }))).await;
        assert_eq!(reply.status, StatusCode::OK);

        let view = send(&app, "GET", &uri, Some(&cookie), None).await;
        assert_eq!(view.body["title"], "Parser");
        assert_eq!(view.body["entry_type"], "idea");
        assert_eq!(view.body["mood"], "excited");
        assert_eq!(view.body["tags"], json!(["parsing"]));
        assert_eq!(view.body["pinned"], true);
        assert_eq!(view.body["project"], json!({ "id": project, "name": "Renamed" }));

        let reply = send(&app, "PATCH", &uri, Some(&cookie), Some(json!({ "mood": null }))).await;
        assert_eq!(reply.status, StatusCode::OK);
        let view = send(&app, "GET", &uri, Some(&cookie), None).await;
        assert_eq!(view.body["mood"], Value::Null);
        assert_eq!(view.body["pinned"], true);
    }

    #[tokio::test]
    async fn test_delete_project_unlinks_entries() {
        let app = test_app();
        let cookie = sign_in(&app, "dev@example.com").await;

        let project = send(
            &app,
            "POST",
            "/api/projects",
            Some(&cookie),
            Some(json!({ "name": "Doomed" })),
        )
        .await
        .body["id"]
            .as_str()
            .unwrap()
            .to_string();
        let entry = send(
            &app,
            "POST",
            "/api/entries",
            Some(&cookie),
            Some(json!({ "title": "t", "content": "c", "project_id": project })),
        )
        .await
        .body["id"]
            .as_str()
            .unwrap()
            .to_string();

        let uri = format!("/api/projects/{project}");
        let reply = send(&app, "DELETE", &uri, Some(&cookie), None).await;
        assert_eq!(reply.body, json!({ "ok": true }));

        let gone = send(&app, "GET", &uri, Some(&cookie), None).await;
        assert_eq!(gone.status, StatusCode::NOT_FOUND);

        let view = send(&app, "GET", &format!("/api/entries/{entry}"), Some(&cookie), None).await;
        assert_eq!(view.status, StatusCode::OK);
        assert_eq!(view.body["project_id"], Value::Null);
        assert_eq!(view.body["project"], Value::Null);

        let again = send(&app, "DELETE", &uri, Some(&cookie), None).await;
        assert_eq!(again.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_users_records_are_not_found() {
        let app = test_app();
        let alice = sign_in(&app, "alice@example.com").await;
        let bob = sign_in(&app, "bob@example.com").await;

        let project = send(
            &app,
            "POST",
            "/api/projects",
            Some(&alice),
            Some(json!({ "name": "Private" })),
        )
        .await
        .body["id"]
            .as_str()
            .unwrap()
            .to_string();
        let uri = format!("/api/projects/{project}");

        let read = send(&app, "GET", &uri, Some(&bob), None).await;
        assert_eq!(read.status, StatusCode::NOT_FOUND);
        let write = send(&app, "PATCH", &uri, Some(&bob), Some(json!({ "name": "Mine" }))).await;
        assert_eq!(write.status, StatusCode::NOT_FOUND);
        let delete = send(&app, "DELETE", &uri, Some(&bob), None).await;
        assert_eq!(delete.status, StatusCode::NOT_FOUND);

        let listed = send(&app, "GET", "/api/projects", Some(&bob), None).await;
        assert_eq!(listed.body, json!([]));

        let still = send(&app, "GET", &uri, Some(&alice), None).await;
        assert_eq!(still.body["project"]["name"], "Private");
    }

    #[tokio::test]
    async fn test_malformed_ids() {
        let app = test_app();
        let cookie = sign_in(&app, "dev@example.com").await;

        let reply = send(
            &app,
            "POST",
            "/api/entries",
            Some(&cookie),
            Some(json!({ "title": "t", "content": "c", "project_id": "not-an-id" })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);

        let reply = send(&app, "DELETE", "/api/entries/not-an-id", Some(&cookie), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);

        let reply = send(&app, "GET", "/api/entries/not-an-id", Some(&cookie), None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_entry_filters_and_dashboard() {
        let app = test_app();
        let cookie = sign_in(&app, "dev@example.com").await;

        for (title, entry_type, pinned) in [
            ("Async traits", "idea", false),
            ("Flaky test", "bug", true),
            ("Weekly notes", "note", false),
        ] {
            let reply = send(
                &app,
                "POST",
                "/api/entries",
                Some(&cookie),
                Some(json!({
                    "title": title,
                    "content": "body",
                    "entry_type": entry_type,
                    "pinned": pinned
                })),
            )
            .await;
            assert_eq!(reply.status, StatusCode::OK);
        }

        let all = send(&app, "GET", "/api/entries", Some(&cookie), None).await;
        let titles: Vec<_> = all.body.as_array().unwrap().iter().map(|e| e["title"].clone()).collect();
        assert_eq!(titles, vec![json!("Flaky test"), json!("Weekly notes"), json!("Async traits")]);

        let ideas = send(&app, "GET", "/api/entries?type=idea", Some(&cookie), None).await;
        assert_eq!(ideas.body.as_array().unwrap().len(), 1);

        let search = send(&app, "GET", "/api/entries?search=FLAKY", Some(&cookie), None).await;
        assert_eq!(search.body[0]["title"], "Flaky test");

        let dashboard = send(&app, "GET", "/api/dashboard", Some(&cookie), None).await;
        assert_eq!(dashboard.status, StatusCode::OK);
        assert_eq!(dashboard.body["email"], "dev@example.com");
        assert_eq!(dashboard.body["entry_count"], 3);
        assert_eq!(dashboard.body["pinned_count"], 1);
        assert_eq!(dashboard.body["project_count"], 0);
    }

    #[tokio::test]
    async fn test_bad_query_string_is_json_error() {
        let app = test_app();
        let cookie = sign_in(&app, "dev@example.com").await;

        for uri in ["/api/entries?type=a&type=b", "/api/projects?search=a&search=b"] {
            let response = app
                .clone()
                .oneshot(
                    Request::get(uri)
                        .header(header::COOKIE, &cookie)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "application/json",
                "{uri}"
            );
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert!(body["error"].as_str().unwrap().contains("duplicate field"));
        }
    }

    #[tokio::test]
    async fn test_failed_unlink_still_deletes_project() {
        let app = app_with(UnlinkFailingStore::new());
        let cookie = sign_in(&app, "dev@example.com").await;

        let project = send(
            &app,
            "POST",
            "/api/projects",
            Some(&cookie),
            Some(json!({ "name": "API Gateway" })),
        )
        .await
        .body["id"]
            .as_str()
            .unwrap()
            .to_string();
        let entry = send(
            &app,
            "POST",
            "/api/entries",
            Some(&cookie),
            Some(json!({ "title": "Day 1", "content": "wrote router", "project_id": project })),
        )
        .await
        .body["id"]
            .as_str()
            .unwrap()
            .to_string();

        let uri = format!("/api/projects/{project}");
        let reply = send(&app, "DELETE", &uri, Some(&cookie), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({ "ok": true }));

        let gone = send(&app, "GET", &uri, Some(&cookie), None).await;
        assert_eq!(gone.status, StatusCode::NOT_FOUND);

        let view = send(&app, "GET", &format!("/api/entries/{entry}"), Some(&cookie), None).await;
        assert_eq!(view.body["project_id"], json!(project));
        assert_eq!(view.body["project"], json!({ "id": project, "name": "" }));
    }
}
