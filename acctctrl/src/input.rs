//! Client-submitted account fields and their validation.
//!
//! Field types are deliberately loose so that a wrongly typed value is
//! reported against its field rather than failing the whole request.
use serde::Deserialize;
use serde_json::Value;

pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 127;
pub const HOME_MAX: usize = 127;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Textish {
    Text(String),
    Other(Value),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Boolish {
    Bool(bool),
    Int(i64),
    Text(String),
    Other(Value),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Intish {
    Int(i64),
    Text(String),
    Other(Value),
}

/// An id as listed in a batch request.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BatchId {
    Id(i64),
    Text(String),
    Other(Value),
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountInput {
    pub name: Option<Textish>,
    pub email: Option<Textish>,
    pub password: Option<Textish>,
    pub clearpw: Option<Textish>,
    pub active: Option<Boolish>,
    pub gid: Option<Intish>,
    pub uid: Option<Intish>,
    pub home: Option<Textish>,
}

pub type CreateAccount = AccountInput;
pub type UpdateAccount = AccountInput;

/// The validated subset of changes carried by an [`AccountInput`].
#[derive(Clone, Default, PartialEq)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    /// The new plaintext, from either `password` or `clearpw`.
    pub secret: Option<String>,
    pub active: Option<bool>,
    pub gid: Option<i64>,
    pub uid: Option<i64>,
    /// `Some(None)` clears the home directory.
    pub home: Option<Option<String>>,
}

mod impls;
