use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account as persisted.
///
/// The web-login hash (`password`) is carried so the write path can
/// compare against it, but it is never serialized.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub password: String,
    pub clearpw: Option<String>,
    pub emailpw: Option<String>,
    pub active: bool,
    pub gid: i64,
    pub uid: i64,
    pub home: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable columns of an account row.
#[derive(Clone, PartialEq)]
pub struct AccountEntry {
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub password: String,
    pub clearpw: Option<String>,
    pub emailpw: Option<String>,
    pub active: bool,
    pub gid: i64,
    pub uid: i64,
    pub home: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BatchDeleteReport {
    pub success: bool,
    pub deleted: usize,
    pub failed: usize,
    pub message: String,
    pub errors: Vec<String>,
}

mod impls;
pub mod traits;

pub use impls::{DEFAULT_GID, DEFAULT_UID};
