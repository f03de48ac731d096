pub mod health;
pub mod auth;
pub mod books;
pub mod admin;
pub mod reviews;
pub mod purchases;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .service(
                web::scope("/books")
                    .service(books::get_books)
                    .service(admin::create_book)
                    .service(admin::update_book)
                    .service(admin::delete_book)
                    .service(books::get_book_details),
            )
            .service(reviews::get_reviews)
            .service(reviews::post_review)
            .service(purchases::buy_book)
            .service(purchases::get_balance)
            .service(purchases::ownership_status)
            .service(purchases::get_download_link)
            .service(purchases::get_transactions),
    );
}
