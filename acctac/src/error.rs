use std::time::Duration;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum PasswordError {
    #[error(transparent)]
    Argon2(#[from] argon2::password_hash::Error),
    #[error("Empty Password")]
    Empty,
    #[error("Wrong Password")]
    Wrong,
    #[error("Not Verifiable")]
    NotVerifiable,
}

/// Failures from the external mail password utility.  None of these
/// carry the plaintext.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MailHashError {
    #[error("failed to invoke mail password utility: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("mail password utility exited with {code:?}: {stderr}")]
    NonZero {
        code: Option<i32>,
        stderr: String,
    },
    #[error("mail password utility produced no output")]
    EmptyOutput,
    #[error("mail password utility produced non UTF-8 output")]
    InvalidOutput,
    #[error("mail password utility did not finish within {0:?}")]
    Timeout(Duration),
}
