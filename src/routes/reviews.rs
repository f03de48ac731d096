use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::dto::ReviewDetail;
use crate::models::{book, review, users};

#[derive(Deserialize)]
pub struct ReviewInput {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// GET /api/getReview/{isbn} - All reviews of a book with reviewer names (PUBLIC)
#[get("/getReview/{isbn}")]
pub async fn get_reviews(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let isbn = path.into_inner();

    let book = match book::Entity::find()
        .filter(book::Column::Isbn.eq(&isbn))
        .one(db.get_ref())
        .await
    {
        Ok(Some(book)) => book,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Book not found"
            }));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch book");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch reviews"
            }));
        }
    };

    let reviews = match review::Entity::find()
        .filter(review::Column::BookId.eq(book.id))
        .order_by_desc(review::Column::CreatedAt)
        .all(db.get_ref())
        .await
    {
        Ok(reviews) => reviews,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch reviews");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch reviews"
            }));
        }
    };

    // Join each review with its reviewer's username
    let mut details = Vec::with_capacity(reviews.len());
    for review in reviews {
        let user = match users::Entity::find_by_id(review.user_id).one(db.get_ref()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Failed to fetch user details"
                }));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch user details");
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Failed to fetch user details"
                }));
            }
        };

        details.push(ReviewDetail {
            user_name: user.username,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        });
    }

    HttpResponse::Ok().json(details)
}

/// POST /api/post-review/{isbn} - Post a review (AUTHENTICATED).
/// Reviews are independent of purchases; owning the book is not required.
#[post("/post-review/{isbn}")]
pub async fn post_review(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<ReviewInput>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let isbn = path.into_inner();

    if !(1..=5).contains(&body.rating) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Rating must be between 1 and 5"
        }));
    }

    let book = match book::Entity::find()
        .filter(book::Column::Isbn.eq(&isbn))
        .one(db.get_ref())
        .await
    {
        Ok(Some(book)) => book,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Book not found"
            }));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch book");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to post review"
            }));
        }
    };

    let new_review = review::ActiveModel {
        book_id: Set(book.id),
        user_id: Set(auth_user.user_id),
        rating: Set(body.rating),
        comment: Set(body.comment.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_review.insert(db.get_ref()).await {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "message": "Review posted successfully"
        })),
        Err(e) => {
            tracing::error!(error = %e, "Failed to post review");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to post review"
            }))
        }
    }
}
