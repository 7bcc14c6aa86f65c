//! Shared helpers for integration tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use ilms_server::{
    config::{AppConfig, LendingConfig},
    models::book::{Book, CreateBook},
    models::member::{CreateMember, Member},
    repository::Repository,
    services::Services,
    AppState,
};

/// Fresh in-memory database with migrations applied. A single connection
/// keeps every handle on the same database.
pub async fn test_setup() -> (Repository, Services) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), LendingConfig::default());
    (repository, services)
}

/// Fresh file-backed database in WAL mode with a multi-connection pool,
/// matching the production setup. Races between writer transactions only
/// show up with more than one connection, which in-memory databases
/// cannot provide.
#[allow(dead_code)]
pub async fn test_setup_multi_conn() -> (Repository, Services) {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let path = std::env::temp_dir().join(format!(
        "ilms-test-{}-{}.db",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = std::fs::remove_file(&path);

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to open file-backed database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), LendingConfig::default());
    (repository, services)
}

/// Full application router over a fresh in-memory database
#[allow(dead_code)]
pub async fn test_app() -> axum::Router {
    let (_, services) = test_setup().await;
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    };
    ilms_server::api::router(state)
}

#[allow(dead_code)]
pub async fn seed_book(services: &Services, title: &str, isbn: &str, copies: i64) -> Book {
    services
        .catalog
        .add_book(CreateBook {
            title: title.to_string(),
            author: "Test Author".to_string(),
            isbn: isbn.to_string(),
            publisher: None,
            publication_year: Some(2001),
            category: Some("Fiction".to_string()),
            total_copies: copies,
        })
        .await
        .expect("Failed to seed book")
}

#[allow(dead_code)]
pub async fn seed_member(services: &Services, name: &str) -> Member {
    services
        .members
        .register(CreateMember {
            name: name.to_string(),
            email: None,
            phone: None,
            address: None,
        })
        .await
        .expect("Failed to seed member")
}
