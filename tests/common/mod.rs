#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
static RUT_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // Rate limiting off: parallel tests hammer the same endpoints
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        // Object storage: point at a local endpoint; presign does not
        // require the server to be up.
        std::env::set_var("S3_ENDPOINT", "http://127.0.0.1:9000");
        std::env::set_var("S3_ACCESS_KEY", "test-access");
        std::env::set_var("S3_SECRET_KEY", "test-secret");
        std::env::set_var("S3_BUCKET", "denuncias-test");
        let config = denuncias::config::jwt::JwtConfig::from_env().unwrap();
        let _ = denuncias::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // Run migrations only once globally (using atomic bool for thread safety)
    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        denuncias::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    // Clean data tables (reverse dependency order); catalogs stay seeded
    cleanup_tables(&db).await;

    let hub = denuncias::websocket::hub::NotificationHub::new();
    let storage_config = denuncias::config::storage::StorageConfig::from_env().unwrap();
    let storage = denuncias::services::storage::StorageService::new(&storage_config).await;
    let email_service = denuncias::services::email::EmailService::from_env();

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(denuncias::routes::create_routes())
        .layer(axum::middleware::from_fn(
            denuncias::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(hub))
        .layer(axum::extract::Extension(storage))
        .layer(axum::extract::Extension(email_service));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let addr_str = format!("http://{}", addr);
    let client = Client::new();

    TestApp {
        addr: addr_str,
        db,
        client,
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    let tables = [
        "notifications",
        "measure_requests",
        "technical_reports",
        "evidence_files",
        "participants",
        "state_history",
        "complaints",
        "persons",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Produce a fresh valid RUT (modulus 11) for each call.
pub fn next_rut() -> String {
    let counter = RUT_COUNTER.fetch_add(1, Ordering::SeqCst);
    let body = 30_000_000 + counter as u32;
    format!("{}-{}", body, check_digit(body))
}

fn check_digit(body: u32) -> char {
    let mut sum: u32 = 0;
    let mut factor: u32 = 2;
    let mut rest = body;
    while rest > 0 {
        sum += (rest % 10) * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
        rest /= 10;
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        n => char::from_digit(n, 10).unwrap(),
    }
}

pub const TEST_PASSWORD: &str = "test_password_123";

/// Insert an account holder directly and log in through the API.
/// Returns (person_id, rut, token).
pub async fn create_account(app: &TestApp, roles: &str) -> (i32, String, String) {
    let rut = next_rut();
    let hash = denuncias::utils::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    let result = app
        .db
        .query_one(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "INSERT INTO persons (rut, name, email, password_hash, roles, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING id",
            vec![
                rut.clone().into(),
                format!("Test {}", rut).into(),
                format!("{}@test.cl", rut.replace('-', "")).into(),
                hash.into(),
                roles.into(),
            ],
        ))
        .await
        .expect("Failed to insert person")
        .expect("Insert returned no row");
    let person_id: i32 = result.try_get("", "id").expect("Missing id column");

    let token = login(app, &rut, TEST_PASSWORD).await;
    (person_id, rut, token)
}

pub async fn login(app: &TestApp, rut: &str, password: &str) -> String {
    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({ "rut": rut, "password": password }))
        .send()
        .await
        .expect("Failed to call login");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Login failed for {}: status={}, body={}", rut, status, body);
    }

    body["data"]["token"]
        .as_str()
        .expect("Response missing token field")
        .to_string()
}

/// File a minimal complaint through the API and return its id.
pub async fn create_test_complaint(app: &TestApp, reporter_rut: Option<&str>) -> i32 {
    let mut payload = serde_json::json!({
        "type_id": 1,
        "incident_date": "2026-03-15",
        "narrative": "Relato de prueba con un largo suficiente para pasar validación.",
        "location": "Campus Central",
    });
    if let Some(rut) = reporter_rut {
        payload["reporter_rut"] = serde_json::json!(rut);
        payload["reporter_name"] = serde_json::json!("Denunciante de Prueba");
    }

    let resp = app
        .client
        .post(app.url("/denuncias"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to create complaint");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Complaint creation failed: status={}, body={}", status, body);
    }

    body["data"]["complaint"]["id"]
        .as_i64()
        .expect("Response missing complaint id") as i32
}
