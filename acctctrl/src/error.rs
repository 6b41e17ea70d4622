use acctac::error::PasswordError;
use acctcore::error::BackendError;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt,
};
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    BackendError(#[from] BackendError),
    #[error(transparent)]
    PasswordError(#[from] PasswordError),
    #[error(transparent)]
    ValidationErrors(#[from] ValidationErrors),
    #[error("account not found: {0}")]
    NotFound(i64),
}

/// Field-level validation messages, keyed by the submitted field name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Turn into an `Err` if anything was collected.
    pub fn check(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// The first message, followed by a count of the rest.
    pub fn summary(&self) -> String {
        let mut messages = self.0.values().flatten();
        match messages.next() {
            None => "The given data was invalid.".to_string(),
            Some(first) => match messages.count() {
                0 => first.clone(),
                1 => format!("{first} (and 1 more error)"),
                n => format!("{first} (and {n} more errors)"),
            },
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}
