pub mod account;
pub mod error;
pub mod listing;
pub mod platform;
