// Database connection + schema bootstrap

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::env;

use crate::models::{balance, book, book_download, review, transaction, users};

pub async fn establish_connection() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in .env file");

    Database::connect(&database_url).await
}

/// Create every table that does not exist yet. Also used by the test
/// harness against SQLite.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(book::Entity),
        schema.create_table_from_entity(book_download::Entity),
        schema.create_table_from_entity(balance::Entity),
        schema.create_table_from_entity(transaction::Entity),
        schema.create_table_from_entity(review::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(statement)).await?;
    }

    Ok(())
}
