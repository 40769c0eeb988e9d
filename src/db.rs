//! Global database connection pool

use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect to the database and store the pool for the lifetime of the
/// process. Called once at startup, or once per test binary.
pub async fn init_db(database_url: String) {
    let pool = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database.");

    if DB_POOL.set(pool).is_err() {
        log::warn!("init_db called more than once; keeping the existing pool");
    }
}

pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("Database pool is not initialized.")
}
