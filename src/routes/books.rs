use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::models::book::Entity as Book;
use crate::models::dto::BookResponse;

/// GET /api/books - List the whole catalog (PUBLIC)
#[get("")]
pub async fn get_books(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match Book::find().all(db.get_ref()).await {
        Ok(books) => {
            let response: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch books");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch books"
            }))
        }
    }
}

/// GET /api/books/{id} - Book details by numeric id (PUBLIC)
#[get("/{id}")]
pub async fn get_book_details(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let book_id: i32 = match path.into_inner().parse() {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid book ID"
            }));
        }
    };

    match Book::find_by_id(book_id).one(db.get_ref()).await {
        Ok(Some(book)) => HttpResponse::Ok().json(BookResponse::from(book)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Book not found"
        })),
        Err(e) => {
            tracing::error!(error = %e, book_id, "Failed to fetch book");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch book"
            }))
        }
    }
}
