use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Append-only purchase ledger. A row here is the proof of ownership for
/// (user_id, book_id); rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub amount: Decimal,
    pub created_at: DateTimeUtc,
}

// No foreign key to books: ledger rows must outlive catalog deletions so
// purchase history survives. Users are only ever soft-deleted, so the
// user_id key is safe to enforce.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
