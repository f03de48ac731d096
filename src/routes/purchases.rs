use actix_web::{get, post, web, HttpResponse};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::middleware::AuthUser;
use crate::services::purchase_service::{PurchaseError, PurchaseService};

// DTO for one ledger entry in the history response
#[derive(Serialize)]
pub struct TransactionResponse {
    pub id: i32,
    pub book_id: i32,
    pub amount: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// POST /api/buy-book/{isbn} - Purchase a book (AUTHENTICATED).
/// Already-owned attempts short-circuit before any state changes; the
/// debit + ledger append themselves are atomic in the service.
#[post("/buy-book/{isbn}")]
pub async fn buy_book(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let isbn = path.into_inner();

    match PurchaseService::buy_book(db.get_ref(), auth_user.user_id, &isbn).await {
        Ok(receipt) => {
            tracing::info!(
                user_id = auth_user.user_id,
                %isbn,
                amount = %receipt.transaction.amount,
                "Book purchased"
            );
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Book purchased successfully",
                "balance": decimal_to_f64(receipt.new_balance)
            }))
        }
        Err(PurchaseError::AlreadyOwned) => HttpResponse::Conflict().json(serde_json::json!({
            "message": "Already bought"
        })),
        Err(PurchaseError::BookNotFound) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Book not found"
        })),
        Err(PurchaseError::InsufficientFunds { .. }) => {
            HttpResponse::Forbidden().json(serde_json::json!({
                "error": "Insufficient balance"
            }))
        }
        Err(PurchaseError::BalanceNotFound) => {
            tracing::error!(user_id = auth_user.user_id, "Balance row missing");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch balance"
            }))
        }
        Err(PurchaseError::Db(e)) => {
            tracing::error!(error = %e, "Purchase failed");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to complete purchase"
            }))
        }
    }
}

/// GET /api/getBalance - Current balance of the session user (AUTHENTICATED)
#[get("/getBalance")]
pub async fn get_balance(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match PurchaseService::get_balance(db.get_ref(), auth_user.user_id).await {
        Ok(amount) => HttpResponse::Ok().json(serde_json::json!({
            "balance": decimal_to_f64(amount)
        })),
        Err(e) => {
            tracing::error!(error = %e, user_id = auth_user.user_id, "Failed to fetch balance");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch balance"
            }))
        }
    }
}

/// GET /api/ownershipStatus/{isbn} - Has the session user bought this book? (AUTHENTICATED)
#[get("/ownershipStatus/{isbn}")]
pub async fn ownership_status(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let isbn = path.into_inner();

    match PurchaseService::has_purchased(db.get_ref(), auth_user.user_id, &isbn).await {
        Ok(owned) => HttpResponse::Ok().json(serde_json::json!({
            "status": owned
        })),
        Err(e) => {
            tracing::error!(error = %e, "Failed to check ownership");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to check ownership"
            }))
        }
    }
}

/// GET /api/getDownloadLink/{isbn} - Download link for owners.
/// Anonymous callers, non-owners and missing download rows all get the
/// same neutral `{"message": false}` body.
#[get("/getDownloadLink/{isbn}")]
pub async fn get_download_link(
    auth_user: Option<AuthUser>,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let isbn = path.into_inner();

    let user = match auth_user {
        Some(user) => user,
        None => {
            return HttpResponse::Ok().json(serde_json::json!({
                "message": false
            }));
        }
    };

    match PurchaseService::download_link(db.get_ref(), user.user_id, &isbn).await {
        Ok(Some(link)) => HttpResponse::Ok().json(serde_json::json!({
            "message": link
        })),
        Ok(None) => HttpResponse::Ok().json(serde_json::json!({
            "message": false
        })),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch download link");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch download link"
            }))
        }
    }
}

/// GET /api/transactions - Purchase history of the session user (AUTHENTICATED)
#[get("/transactions")]
pub async fn get_transactions(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match PurchaseService::transactions_for_user(db.get_ref(), auth_user.user_id).await {
        Ok(transactions) => {
            let response: Vec<TransactionResponse> = transactions
                .into_iter()
                .map(|t| TransactionResponse {
                    id: t.id,
                    book_id: t.book_id,
                    amount: decimal_to_f64(t.amount),
                    created_at: t.created_at,
                })
                .collect();

            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch transactions");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch transactions"
            }))
        }
    }
}
