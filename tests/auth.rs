//! Registration, login, logout and soft-delete lifecycle.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use bookstore_backend::routes;
use bookstore_backend::utils::sessions::SessionStore;

#[actix_web::test]
async fn register_login_logout_lifecycle() {
    let (db, _dir) = common::setup_db().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(SessionStore::new()))
            .configure(routes::configure_routes),
    )
    .await;

    let cookie = common::register_and_login(&app, "alice", "alice@example.com", "hunter22").await;

    // A fresh account starts with the fixed balance
    assert_eq!(common::balance_of(&app, &cookie).await, 5000.0);

    // Logout invalidates the session server-side
    let req = test::TestRequest::get()
        .uri("/api/auth/logout")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/getBalance")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Logging out twice finds no active user
    let req = test::TestRequest::get().uri("/api/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let (db, _dir) = common::setup_db().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(SessionStore::new()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Same email
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": "bob2",
            "email": "bob@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Same username, different email
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": "bob",
            "email": "bob2@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (db, _dir) = common::setup_db().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(SessionStore::new()))
            .configure(routes::configure_routes),
    )
    .await;

    let _ = common::register_and_login(&app, "carol", "carol@example.com", "correct-horse").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": "carol@example.com",
            "password": "battery-staple",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn soft_deleted_account_cannot_return() {
    let (db, _dir) = common::setup_db().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(SessionStore::new()))
            .configure(routes::configure_routes),
    )
    .await;

    let cookie = common::register_and_login(&app, "dave", "dave@example.com", "hunter22").await;

    let req = test::TestRequest::delete()
        .uri("/api/auth/delete-account")
        .set_json(serde_json::json!({
            "email": "dave@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Deleting revokes the live session
    let req = test::TestRequest::get()
        .uri("/api/getBalance")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Login is refused with the neutral message
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": "dave@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Re-registration on the soft-deleted email is a conflict, not a
    // silent success
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": "dave-reborn",
            "email": "dave@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Deleting again is reported as already deleted
    let req = test::TestRequest::delete()
        .uri("/api/auth/delete-account")
        .set_json(serde_json::json!({
            "email": "dave@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
