use actix_session::{config::PersistentSession, storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use env_logger::Env;
use greenhouse::db::{get_db_pool, init_db};
use greenhouse::generator::{ContentGenerator, TemplateGenerator};
use greenhouse::middleware::ClientCtx;
use greenhouse::storage::StorageBackend;
use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();
    init_our_mods();
    init_db(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set.")).await;

    // A fresh deployment gets a working admin login and a non-empty staff
    // directory before the first request is served.
    greenhouse::user::seed_bootstrap_admin(get_db_pool())
        .await
        .expect("Failed to seed the bootstrap admin account");

    let config = greenhouse::app_config::get_config();

    let storage: Arc<dyn StorageBackend> = greenhouse::storage::from_config(&config.storage)
        .expect("Storage backend failed to initialize.");
    let generator: Arc<dyn ContentGenerator> = Arc::new(TemplateGenerator);

    let secret_key = match std::env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(err) => {
            let random_string: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(128)
                .map(char::from)
                .collect();
            log::warn!("SECRET_KEY was invalid. Reason: {:?}\r\nThis means the key used for signing session cookies will invalidate every time the application is restarted. A secret key must be at least 64 bytes to be accepted.\r\n\r\nNeed a key? How about:\r\n{}", err, random_string);
            Key::from(random_string.as_bytes())
        }
    };

    let session_ttl = Duration::minutes(i64::from(config.security.session_timeout_minutes));
    let bind = config.server.bind.clone();
    log::info!("Listening on {}", bind);

    HttpServer::new(move || {
        let storage_data: Data<dyn StorageBackend> = Data::from(storage.clone());
        let generator_data: Data<dyn ContentGenerator> = Data::from(generator.clone());

        // Order of middleware IS IMPORTANT and is in REVERSE EXECUTION ORDER.
        // However, services are read top->down, higher traffic routes should
        // be placed higher
        App::new()
            .app_data(storage_data)
            .app_data(generator_data)
            // Security headers - applied to all responses
            .wrap(
                DefaultHeaders::new()
                    .add((header::X_FRAME_OPTIONS, "DENY"))
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin")),
            )
            .wrap(ClientCtx::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_same_site(SameSite::Lax)
                    .cookie_secure(false) // Allow HTTP for development
                    .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
                    .build(),
            )
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(greenhouse::web::configure)
    })
    .bind(&bind)?
    .run()
    .await
}

/// Initialize third party crates we rely on but don't have control over.
pub fn init_lib_mods() {
    // This should be calls to crates without any transformative work applied.
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Initialize all local mods.
/// Panics
pub fn init_our_mods() {
    // This should be a list of simple function calls.
    // Each module should work mostly independent of others.
    // This way, we can unit test individual modules without loading the entire application.
    greenhouse::app_config::init();
    greenhouse::session::init();
}
