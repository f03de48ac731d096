use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Download link for a book, keyed by ISBN. Deliberately loose coupling
/// with `books` (shared ISBN string, no foreign key); the admin create
/// and update paths write both rows in one transaction so they cannot
/// diverge.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book_downloads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub isbn: String,
    pub download_link: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
