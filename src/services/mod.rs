pub mod account_service;
pub mod purchase_service;
