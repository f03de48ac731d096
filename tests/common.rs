//! Common utilities for the integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use tempfile::TempDir;

use bookstore_backend::db;
use bookstore_backend::models::{book, book_download};

/// Fresh SQLite database in a temporary directory. The directory must be
/// kept alive for the duration of the test.
pub async fn setup_db() -> (DatabaseConnection, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("bookstore.sqlite");
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let db = Database::connect(&url)
        .await
        .expect("Failed to open test database");
    db::migrate(&db).await.expect("Failed to migrate test database");

    (db, dir)
}

/// Insert a book plus its download record directly, bypassing the admin API.
pub async fn seed_book(
    db: &DatabaseConnection,
    isbn: &str,
    price: i64,
    download_link: &str,
) -> book::Model {
    let now = Utc::now();

    let created = book::ActiveModel {
        isbn: Set(isbn.to_string()),
        title: Set(format!("Book {}", isbn)),
        author: Set("Test Author".to_string()),
        description: Set("A seeded test book".to_string()),
        published_year: Set(2020),
        price: Set(Decimal::from(price)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed book");

    book_download::ActiveModel {
        isbn: Set(isbn.to_string()),
        download_link: Set(download_link.to_string()),
    }
    .insert(db)
    .await
    .expect("Failed to seed download link");

    created
}

/// Pull the session cookie out of a login response.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    let header = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("No session cookie in response")
        .to_str()
        .expect("Invalid Set-Cookie header")
        .to_string();

    Cookie::parse_encoded(header)
        .expect("Unparseable session cookie")
        .into_owned()
}

/// Log in through the API and return the session cookie.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": email,
            "password": password,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "login failed");

    session_cookie(&resp)
}

/// Register a user through the API and log them in.
pub async fn register_and_login<S, B>(
    app: &S,
    username: &str,
    email: &str,
    password: &str,
) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "registration failed");

    login(app, email, password).await
}

/// Current balance of the session user, read through the API.
pub async fn balance_of<S, B>(app: &S, cookie: &Cookie<'static>) -> f64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri("/api/getBalance")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    body["balance"].as_f64().expect("balance is not a number")
}
