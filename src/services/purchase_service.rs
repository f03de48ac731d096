use sea_orm::*;
use sea_orm::sea_query::Expr;
use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{balance, book, book_download, transaction};

/// Errors of the purchase core. Handlers translate these to HTTP statuses;
/// `Db` is the only internal-class variant.
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("book not found")]
    BookNotFound,

    /// Should be unreachable after registration, but a missing ledger row is
    /// reported as an error, never a panic.
    #[error("balance record not found for user")]
    BalanceNotFound,

    #[error("insufficient balance: {available} available, {required} required")]
    InsufficientFunds {
        available: Decimal,
        required: Decimal,
    },

    #[error("book already owned")]
    AlreadyOwned,

    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Outcome of a successful purchase.
#[derive(Debug)]
pub struct PurchaseReceipt {
    pub transaction: transaction::Model,
    pub new_balance: Decimal,
}

pub struct PurchaseService;

impl PurchaseService {
    /// Purchase a book by ISBN for a user.
    ///
    /// Checks run in order: already owned -> book exists -> funds. The
    /// balance debit and the ledger append run inside one database
    /// transaction, and the debit itself is a guarded single statement
    /// (`amount = amount - price WHERE user_id = ? AND amount >= price`),
    /// so two concurrent attempts can never both spend against a stale
    /// balance read. No partial effects on any error path.
    pub async fn buy_book(
        db: &DatabaseConnection,
        user_id: i32,
        isbn: &str,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        if Self::has_purchased(db, user_id, isbn).await? {
            return Err(PurchaseError::AlreadyOwned);
        }

        let book = book::Entity::find()
            .filter(book::Column::Isbn.eq(isbn))
            .one(db)
            .await?
            .ok_or(PurchaseError::BookNotFound)?;

        let book_id = book.id;
        let price = book.price;

        let result = db
            .transaction::<_, PurchaseReceipt, PurchaseError>(|txn| {
                Box::pin(async move {
                    let balance = balance::Entity::find()
                        .filter(balance::Column::UserId.eq(user_id))
                        .one(txn)
                        .await?
                        .ok_or(PurchaseError::BalanceNotFound)?;

                    if balance.amount < price {
                        return Err(PurchaseError::InsufficientFunds {
                            available: balance.amount,
                            required: price,
                        });
                    }

                    // Guarded debit: the amount predicate re-checks the funds
                    // at write time, so a concurrent debit that landed after
                    // the read above makes this a no-op instead of an
                    // overdraft.
                    let debit = balance::Entity::update_many()
                        .col_expr(
                            balance::Column::Amount,
                            Expr::col(balance::Column::Amount).sub(price),
                        )
                        .col_expr(balance::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(balance::Column::UserId.eq(user_id))
                        .filter(balance::Column::Amount.gte(price))
                        .exec(txn)
                        .await?;

                    if debit.rows_affected == 0 {
                        return Err(PurchaseError::InsufficientFunds {
                            available: balance.amount,
                            required: price,
                        });
                    }

                    let row = transaction::ActiveModel {
                        user_id: Set(user_id),
                        book_id: Set(book_id),
                        amount: Set(price),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    };
                    let saved = row.insert(txn).await?;

                    Ok(PurchaseReceipt {
                        transaction: saved,
                        new_balance: balance.amount - price,
                    })
                })
            })
            .await;

        match result {
            Ok(receipt) => Ok(receipt),
            Err(TransactionError::Connection(e)) => Err(PurchaseError::Db(e)),
            Err(TransactionError::Transaction(e)) => Err(e),
        }
    }

    /// Ownership query: has the user a recorded purchase of this ISBN?
    /// Unknown ISBN and no matching ledger row are both "not owned", not
    /// errors.
    pub async fn has_purchased(
        db: &DatabaseConnection,
        user_id: i32,
        isbn: &str,
    ) -> Result<bool, DbErr> {
        let book = match book::Entity::find()
            .filter(book::Column::Isbn.eq(isbn))
            .one(db)
            .await?
        {
            Some(book) => book,
            None => return Ok(false),
        };

        let count = transaction::Entity::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .filter(transaction::Column::BookId.eq(book.id))
            .count(db)
            .await?;

        Ok(count > 0)
    }

    /// Current balance for a user.
    pub async fn get_balance(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Decimal, PurchaseError> {
        let balance = balance::Entity::find()
            .filter(balance::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or(PurchaseError::BalanceNotFound)?;

        Ok(balance.amount)
    }

    /// Download link for an ISBN, only when the user owns the book.
    /// `None` covers non-owner and missing-download-row alike; the caller
    /// renders both as the same neutral response.
    pub async fn download_link(
        db: &DatabaseConnection,
        user_id: i32,
        isbn: &str,
    ) -> Result<Option<String>, DbErr> {
        if !Self::has_purchased(db, user_id, isbn).await? {
            return Ok(None);
        }

        let download = book_download::Entity::find()
            .filter(book_download::Column::Isbn.eq(isbn))
            .one(db)
            .await?;

        Ok(download.map(|d| d.download_link))
    }

    /// Purchase history for a user, newest first.
    pub async fn transactions_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<transaction::Model>, DbErr> {
        transaction::Entity::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .order_by_desc(transaction::Column::CreatedAt)
            .order_by_desc(transaction::Column::Id)
            .all(db)
            .await
    }
}
