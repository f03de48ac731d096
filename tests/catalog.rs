//! Catalog CRUD, the admin gate and reviews.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use bookstore_backend::models::users::Role;
use bookstore_backend::routes;
use bookstore_backend::services::account_service::AccountService;
use bookstore_backend::utils::password;
use bookstore_backend::utils::sessions::SessionStore;

fn book_payload(isbn: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "title": "The Test Book",
        "author": "A. Writer",
        "description": "About testing",
        "isbn": isbn,
        "published_year": 2021,
        "price": price,
        "download_link": format!("https://downloads.example.com/{}", isbn),
    })
}

#[actix_web::test]
async fn book_crud_requires_admin_role() {
    let (db, _dir) = common::setup_db().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(SessionStore::new()))
            .configure(routes::configure_routes),
    )
    .await;

    // Anonymous caller
    let req = test::TestRequest::post()
        .uri("/api/books")
        .set_json(book_payload("978-10", 900.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Regular user
    let cookie = common::register_and_login(&app, "kate", "kate@example.com", "hunter22").await;
    let req = test::TestRequest::post()
        .uri("/api/books")
        .cookie(cookie)
        .set_json(book_payload("978-10", 900.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_can_create_update_and_delete_books() {
    let (db, _dir) = common::setup_db().await;

    let hash = password::hash_password("admin-pass").unwrap();
    AccountService::create_account(&db, "admin", "admin@example.com", &hash, Role::Admin)
        .await
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(SessionStore::new()))
            .configure(routes::configure_routes),
    )
    .await;

    let cookie = common::login(&app, "admin@example.com", "admin-pass").await;

    // Create
    let req = test::TestRequest::post()
        .uri("/api/books")
        .cookie(cookie.clone())
        .set_json(book_payload("978-11", 1500.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let book_id = body["data"]["id"].as_i64().expect("no book id") as i32;

    // Duplicate ISBN is a conflict
    let req = test::TestRequest::post()
        .uri("/api/books")
        .cookie(cookie.clone())
        .set_json(book_payload("978-11", 1500.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Negative price is rejected
    let req = test::TestRequest::post()
        .uri("/api/books")
        .cookie(cookie.clone())
        .set_json(book_payload("978-12", -5.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Public listing and detail
    let req = test::TestRequest::get().uri("/api/books").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));

    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", book_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["isbn"], serde_json::json!("978-11"));

    let req = test::TestRequest::get().uri("/api/books/not-a-number").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Update
    let req = test::TestRequest::put()
        .uri("/api/books/978-11")
        .cookie(cookie.clone())
        .set_json(book_payload("978-11", 1800.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", book_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["price"].as_f64(), Some(1800.0));

    // Delete
    let req = test::TestRequest::delete()
        .uri("/api/books/978-11")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", book_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Updating a deleted book is not found
    let req = test::TestRequest::put()
        .uri("/api/books/978-11")
        .cookie(cookie)
        .set_json(book_payload("978-11", 1800.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn review_roundtrip() {
    let (db, _dir) = common::setup_db().await;
    common::seed_book(&db, "978-20", 1000, "https://downloads.example.com/978-20").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(SessionStore::new()))
            .configure(routes::configure_routes),
    )
    .await;

    let cookie = common::register_and_login(&app, "leo", "leo@example.com", "hunter22").await;

    // Reviews require a session
    let req = test::TestRequest::post()
        .uri("/api/post-review/978-20")
        .set_json(serde_json::json!({ "rating": 4, "comment": "Solid read" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Rating is clamped to 1..=5
    let req = test::TestRequest::post()
        .uri("/api/post-review/978-20")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "rating": 6, "comment": "Too good" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Posting does not require ownership of the book
    let req = test::TestRequest::post()
        .uri("/api/post-review/978-20")
        .cookie(cookie)
        .set_json(serde_json::json!({ "rating": 4, "comment": "Solid read" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/getReview/978-20").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let reviews = body.as_array().expect("reviews is not an array");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["userName"], serde_json::json!("leo"));
    assert_eq!(reviews[0]["rating"], serde_json::json!(4));

    // Unknown ISBN
    let req = test::TestRequest::get().uri("/api/getReview/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
