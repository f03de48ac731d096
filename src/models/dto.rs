// Structured API responses shared between route modules.
use serde::Serialize;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;

use crate::models::book;

// 1 review joined with the reviewer's username
#[derive(Debug, Serialize)]
pub struct ReviewDetail {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// 1 catalog entry; price crosses the JSON boundary as f64
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub published_year: i32,
    pub price: f64,
}

impl From<book::Model> for BookResponse {
    fn from(book: book::Model) -> Self {
        Self {
            id: book.id,
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            description: book.description,
            published_year: book.published_year,
            price: book.price.to_f64().unwrap_or(0.0),
        }
    }
}
