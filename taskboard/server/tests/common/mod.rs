use sea_orm::DatabaseConnection;

/// Opens a fresh in-memory SQLite database with migrations applied.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    taskboard_server::web::connect_database("sqlite::memory:").await
}
