// ============================================================================
// MODELS
// ============================================================================
//
// Entry point for all data models. Each model maps one relational table
// with SeaORM.
//
// Modules:
//   - health : health check API
//   - users : accounts (role + status enums, credential hash)
//   - book : catalog entries keyed by ISBN
//   - book_download : ISBN -> download link (loose coupling with book)
//   - balance : one spendable-credit row per user
//   - transaction : append-only purchase ledger (ownership proof)
//   - review : book reviews, independent of purchases
//   - dto : structured API response objects
//
// Relations between tables are defined in each model file.
//
// ============================================================================

pub mod health;
pub mod users;
pub mod book;
pub mod book_download;
pub mod balance;
pub mod transaction;
pub mod review;
pub mod dto;
