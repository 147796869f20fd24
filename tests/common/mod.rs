use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use storefront_api::{
    auth::hash_password,
    config::AppConfig,
    db,
    entities::{category, product, user},
    events::{self, EventSender},
    handlers::AppServices,
    session::SessionLayer,
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

const SESSION_COOKIE: &str = "storefront_session";

/// Helper harness for spinning up an application backed by a throwaway
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: tempfile::TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::TempDir::new().expect("create temp dir for test database");
        let db_path = db_dir.path().join("storefront_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let session_layer = SessionLayer::new(SESSION_COOKIE);
        let router = storefront_api::app_router(state.clone(), session_layer);

        Self {
            router,
            state,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// A fresh "browser": no session cookie until the first request.
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Insert a category directly into the database.
    #[allow(dead_code)]
    pub async fn seed_category(&self, name: &str, slug: &str) -> category::Model {
        category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed category for tests")
    }

    /// Insert a product directly into the database.
    pub async fn seed_product(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        category_id: Option<Uuid>,
    ) -> product::Model {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            category_id: Set(category_id),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed product for tests")
    }

    /// Insert an account directly into the database.
    #[allow(dead_code)]
    pub async fn seed_user(&self, username: &str, password: &str) -> user::Model {
        let now = Utc::now();
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            email: Set(format!("{}@example.com", username)),
            password_hash: Set(hash_password(password).expect("hash test password")),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed user for tests")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// One browser session against the test application. Carries the session
/// cookie across requests the way a real browser would.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Send a request, persisting any session cookie the server sets.
    pub async fn request(&mut self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        let body = if let Some(json) = body {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("build test request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let cookie = set_cookie
                .to_str()
                .expect("cookie header is ascii")
                .split(';')
                .next()
                .expect("cookie pair")
                .to_string();
            self.cookie = Some(cookie);
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    #[allow(dead_code)]
    pub async fn post(&mut self, uri: &str, body: Option<Value>) -> Response {
        self.request(Method::POST, uri, body).await
    }

    /// Log in through the HTTP surface, binding the account to this
    /// client's session.
    #[allow(dead_code)]
    pub async fn login(&mut self, username: &str, password: &str) {
        let response = self
            .post(
                "/login",
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    }
}

/// Read a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
