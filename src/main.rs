use actix_web::{web, App, HttpServer};
use sea_orm::DatabaseConnection;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookstore_backend::models::users::{self as users, Role};
use bookstore_backend::services::account_service::AccountService;
use bookstore_backend::utils::{password, sessions::SessionStore};
use bookstore_backend::{db, routes};

/// Seed the admin account from ADMIN_EMAIL / ADMIN_PASSWORD when no admin
/// exists yet. Non-interactive stand-in for a bootstrap prompt.
async fn ensure_admin(db: &DatabaseConnection) {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    let existing = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Admin))
        .one(db)
        .await;

    match existing {
        Ok(Some(_)) => {
            tracing::info!("Admin user already exists");
        }
        Ok(None) => {
            let (email, admin_password) = match (
                std::env::var("ADMIN_EMAIL"),
                std::env::var("ADMIN_PASSWORD"),
            ) {
                (Ok(email), Ok(password)) => (email, password),
                _ => {
                    tracing::warn!(
                        "No admin user exists and ADMIN_EMAIL/ADMIN_PASSWORD are not set"
                    );
                    return;
                }
            };

            let password_hash = match password::hash_password(&admin_password) {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to hash admin password");
                    return;
                }
            };

            match AccountService::create_account(db, "admin", &email, &password_hash, Role::Admin)
                .await
            {
                Ok(_) => tracing::info!("Admin user created successfully"),
                Err(e) => tracing::error!(error = %e, "Failed to create admin user"),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to check for admin user");
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bookstore_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    db::migrate(&db).await.expect("Failed to migrate database");
    println!("✅ Database connected!");

    ensure_admin(&db).await;

    let sessions = web::Data::new(SessionStore::new());

    let app_port: u16 = std::env::var("APP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    println!("🚀 Starting server on http://127.0.0.1:{}", app_port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(sessions.clone())
            .configure(routes::configure_routes)
    })
    .bind(("127.0.0.1", app_port))?
    .run()
    .await
}
