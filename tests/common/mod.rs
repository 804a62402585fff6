#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, Set};
use serde_json::Value;
use tower::ServiceExt;

use bookstore_pos_api::{
    auth::hash_password,
    build_router,
    config::AppConfig,
    db,
    entities::{category, item, user},
    AppState,
};

pub const TEST_PASSWORD: &str = "password123";
pub const TEST_JWT_SECRET: &str = "integration_test_signing_key_4b8e2d6f_bookstore";

/// Argon2 is slow in debug builds; hash the shared test password once per binary.
fn shared_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hash test password"))
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        TEST_JWT_SECRET.to_string(),
        "127.0.0.1".to_string(),
        0,
        "test".to_string(),
    );
    cfg.cors_allow_any_origin = true;
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg.db_acquire_timeout_secs = 30;
    cfg.rate_limit_api_requests = 10_000;
    cfg.rate_limit_auth_requests = 10_000;
    cfg
}

/// Application backed by a fresh in-memory SQLite database with one user per role.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub admin: user::Model,
    pub staff: user::Model,
    pub manager: user::Model,
    admin_token: String,
    staff_token: String,
    manager_token: String,
    db_file: Option<PathBuf>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(cfg: AppConfig) -> Self {
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);

        let admin = insert_user(&state, "admin", "Admin User", "admin").await;
        let staff = insert_user(&state, "staff", "Staff User", "staff").await;
        let manager = insert_user(&state, "manager", "Manager User", "manager").await;

        let admin_token = state.auth.issue_token(&admin).expect("admin token");
        let staff_token = state.auth.issue_token(&staff).expect("staff token");
        let manager_token = state.auth.issue_token(&manager).expect("manager token");

        Self {
            router: build_router(state.clone()),
            state,
            admin,
            staff,
            manager,
            admin_token,
            staff_token,
            manager_token,
            db_file: None,
        }
    }

    /// Application on a temporary WAL-mode SQLite file with a multi-connection
    /// pool, so concurrent requests run in overlapping transactions.
    pub async fn file_backed(max_connections: u32) -> Self {
        let path = std::env::temp_dir().join(format!(
            "bookstore-pos-test-{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        let url = format!("sqlite://{}?mode=rwc", path.display());

        // journal_mode is stored in the file, so set it before the pool opens
        let bootstrap = Database::connect(url.as_str())
            .await
            .expect("failed to create test database file");
        bootstrap
            .execute_unprepared("PRAGMA journal_mode=WAL")
            .await
            .expect("failed to enable WAL");
        bootstrap.close().await.expect("failed to close bootstrap connection");

        let mut cfg = test_config();
        cfg.database_url = url;
        cfg.db_max_connections = max_connections;
        cfg.db_min_connections = 1;

        let mut app = Self::with_config(cfg).await;
        app.db_file = Some(path);
        app
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    pub fn staff_token(&self) -> &str {
        &self.staff_token
    }

    pub fn manager_token(&self) -> &str {
        &self.manager_token
    }

    pub fn token_for(&self, role: &str) -> &str {
        match role {
            "admin" => self.admin_token(),
            "staff" => self.staff_token(),
            "manager" => self.manager_token(),
            other => panic!("no seeded user for role {other}"),
        }
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        self.request_with_headers(method, uri, body, token, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Request expecting `status`; returns the parsed JSON body.
    pub async fn expect_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
        status: StatusCode,
    ) -> Value {
        let response = self.request(method.clone(), uri, body, token).await;
        let actual = response.status();
        let json = response_json(response).await;
        assert_eq!(actual, status, "{} {} returned {}", method, uri, json);
        json
    }

    pub async fn seed_category(&self, name: &str) -> category::Model {
        let now = Utc::now();
        category::ActiveModel {
            name: Set(name.to_string()),
            description: Set(String::new()),
            color: Set(category::DEFAULT_COLOR.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed category")
    }

    pub async fn seed_item(&self, name: &str, price: Decimal, stock: i32) -> item::Model {
        let now = Utc::now();
        item::ActiveModel {
            name: Set(name.to_string()),
            description: Set(String::new()),
            price: Set(price),
            cost_price: Set(None),
            stock_quantity: Set(stock),
            min_stock_level: Set(item::DEFAULT_MIN_STOCK_LEVEL),
            category_id: Set(None),
            sku: Set(None),
            barcode: Set(None),
            supplier_id: Set(None),
            image_url: Set(String::new()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed item")
    }

    pub async fn stock_of(&self, item_id: i32) -> i32 {
        use sea_orm::EntityTrait;
        item::Entity::find_by_id(item_id)
            .one(&*self.state.db)
            .await
            .expect("load item")
            .expect("item exists")
            .stock_quantity
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(path) = self.db_file.take() {
            for suffix in ["", "-wal", "-shm"] {
                let mut file = path.clone().into_os_string();
                file.push(suffix);
                let _ = std::fs::remove_file(file);
            }
        }
    }
}

async fn insert_user(state: &AppState, username: &str, name: &str, role: &str) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(shared_password_hash().to_string()),
        name: Set(name.to_string()),
        email: Set(format!("{username}@bookstore.test")),
        role: Set(role.to_string()),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&*state.db)
    .await
    .expect("seed user")
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json response")
}

/// Money fields come back as JSON strings or numbers depending on the backend.
pub fn decimal_field(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("not a money value: {other}"),
    }
}
