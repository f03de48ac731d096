use actix_web::{delete, post, put, web, HttpResponse};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::*;
use serde::Deserialize;
use validator::Validate;

use crate::middleware::AdminUser;
use crate::models::dto::BookResponse;
use crate::models::{book, book_download, review};

// Admin book payload; one input covers create and update, like the
// public API expects.
#[derive(Deserialize, Validate)]
pub struct BookInput {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    pub isbn: String,
    #[serde(default)]
    pub published_year: i32,
    pub price: f64,
    #[validate(length(min = 1))]
    pub download_link: String,
}

fn parse_price(price: f64) -> Option<Decimal> {
    let price = Decimal::from_f64_retain(price)?;
    if price.is_sign_negative() {
        return None;
    }
    Some(price.round_dp(2))
}

/// POST /api/books - Create a book plus its download record (ADMIN).
/// Both rows are written in one transaction so a book can never exist
/// without its download link.
#[post("")]
pub async fn create_book(
    _admin: AdminUser,
    body: web::Json<BookInput>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        tracing::warn!(error = %e, "Invalid book payload");
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    let price = match parse_price(body.price) {
        Some(price) => price,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Price must be a non-negative amount"
            }));
        }
    };

    // Duplicate ISBN check (the column is unique; this gives a clean 409
    // instead of a storage error)
    match book::Entity::find()
        .filter(book::Column::Isbn.eq(&body.isbn))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "Book with this ISBN already exists"
            }));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to check ISBN");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create book"
            }));
        }
    }

    let input = body.into_inner();
    let result = db
        .transaction::<_, book::Model, DbErr>(|txn| {
            Box::pin(async move {
                let now = Utc::now();

                let new_book = book::ActiveModel {
                    title: Set(input.title),
                    author: Set(input.author),
                    description: Set(input.description),
                    isbn: Set(input.isbn.clone()),
                    published_year: Set(input.published_year),
                    price: Set(price),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                let created = new_book.insert(txn).await?;

                let download = book_download::ActiveModel {
                    isbn: Set(input.isbn),
                    download_link: Set(input.download_link),
                };
                download.insert(txn).await?;

                Ok(created)
            })
        })
        .await;

    match result {
        Ok(created) => {
            tracing::info!(isbn = %created.isbn, "Book created successfully");
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Book created successfully",
                "data": BookResponse::from(created)
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create book");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create book"
            }))
        }
    }
}

/// PUT /api/books/{isbn} - Update a book and upsert its download record (ADMIN)
#[put("/{isbn}")]
pub async fn update_book(
    _admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<BookInput>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let isbn = path.into_inner();

    if let Err(e) = body.validate() {
        tracing::warn!(error = %e, "Invalid book payload");
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    let price = match parse_price(body.price) {
        Some(price) => price,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Price must be a non-negative amount"
            }));
        }
    };

    let existing = match book::Entity::find()
        .filter(book::Column::Isbn.eq(&isbn))
        .one(db.get_ref())
        .await
    {
        Ok(Some(book)) => book,
        Ok(None) => {
            tracing::warn!(%isbn, "Book not found");
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Book not found"
            }));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch book");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to update book"
            }));
        }
    };

    let input = body.into_inner();
    let result = db
        .transaction::<_, book::Model, DbErr>(|txn| {
            Box::pin(async move {
                let mut active: book::ActiveModel = existing.into();
                active.title = Set(input.title);
                active.author = Set(input.author);
                active.description = Set(input.description);
                active.isbn = Set(input.isbn.clone());
                active.published_year = Set(input.published_year);
                active.price = Set(price);
                active.updated_at = Set(Utc::now());
                let updated = active.update(txn).await?;

                // Upsert the download record; older catalogs may miss it
                let download = book_download::Entity::find()
                    .filter(book_download::Column::Isbn.eq(&input.isbn))
                    .one(txn)
                    .await?;

                match download {
                    Some(existing_download) => {
                        let mut active: book_download::ActiveModel = existing_download.into();
                        active.download_link = Set(input.download_link);
                        active.update(txn).await?;
                    }
                    None => {
                        let new_download = book_download::ActiveModel {
                            isbn: Set(input.isbn),
                            download_link: Set(input.download_link),
                        };
                        new_download.insert(txn).await?;
                    }
                }

                Ok(updated)
            })
        })
        .await;

    match result {
        Ok(updated) => {
            tracing::info!(isbn = %updated.isbn, "Book updated successfully");
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Book updated successfully",
                "data": BookResponse::from(updated)
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update book");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to update book"
            }))
        }
    }
}

/// DELETE /api/books/{isbn} - Remove a book from the catalog (ADMIN).
/// Past transactions keep referencing the deleted book id, so purchase
/// history survives.
#[delete("/{isbn}")]
pub async fn delete_book(
    _admin: AdminUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let isbn = path.into_inner();

    let existing = match book::Entity::find()
        .filter(book::Column::Isbn.eq(&isbn))
        .one(db.get_ref())
        .await
    {
        Ok(Some(book)) => book,
        Ok(None) => {
            tracing::warn!(%isbn, "Book not found");
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Book not found"
            }));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch book");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to delete book"
            }));
        }
    };

    let book_id = existing.id;
    let result = db
        .transaction::<_, (), DbErr>(|txn| {
            Box::pin(async move {
                // Reviews go with the book; ledger rows stay so purchase
                // history survives
                review::Entity::delete_many()
                    .filter(review::Column::BookId.eq(book_id))
                    .exec(txn)
                    .await?;
                book::Entity::delete_by_id(book_id).exec(txn).await?;
                Ok(())
            })
        })
        .await;

    match result {
        Ok(()) => {
            tracing::info!(%isbn, "Book deleted successfully");
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Book deleted successfully"
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete book");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to delete book"
            }))
        }
    }
}
