use sea_orm::*;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::models::users::{AccountStatus, Role};
use crate::models::{balance, users};

/// Credit every new account starts with.
pub const STARTING_BALANCE: i64 = 5000;

pub struct AccountService;

impl AccountService {
    /// Create a user row together with its starting-balance row, in one
    /// database transaction. Used by registration and by the startup admin
    /// seed; the purchase flow may assume the ledger row exists afterwards.
    pub async fn create_account(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<users::Model, DbErr> {
        let username = username.to_string();
        let email = email.to_string();
        let password_hash = password_hash.to_string();

        let result = db
            .transaction::<_, users::Model, DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();

                    let user = users::ActiveModel {
                        username: Set(username),
                        email: Set(email),
                        password_hash: Set(password_hash),
                        role: Set(role),
                        status: Set(AccountStatus::Active),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    let user = user.insert(txn).await?;

                    let initial_balance = balance::ActiveModel {
                        user_id: Set(user.id),
                        amount: Set(Decimal::from(STARTING_BALANCE)),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    initial_balance.insert(txn).await?;

                    Ok(user)
                })
            })
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(TransactionError::Connection(e)) => Err(e),
            Err(TransactionError::Transaction(e)) => Err(e),
        }
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Soft delete: status Active -> Deleted. History (transactions,
    /// reviews) is kept.
    pub async fn soft_delete(
        db: &DatabaseConnection,
        user: users::Model,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.status = Set(AccountStatus::Deleted);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
