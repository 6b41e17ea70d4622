use async_trait::async_trait;

use crate::{
    error::{
        MailHashError,
        PasswordError,
    },
    mailpw::Doveadm,
    password::Password,
};

/// Produces the two derived representations of a plaintext secret.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialEncoder: Send + Sync {
    /// Salted one-way hash for interactive web login.
    fn web_hash(&self, plaintext: &str) -> Result<String, PasswordError>;
    /// Crypt-formatted hash consumed by the mail server.
    async fn mail_hash(&self, plaintext: &str) -> Result<String, MailHashError>;
}

/// argon2 for web login, `doveadm pw` for mail.
#[derive(Clone, Debug, Default)]
pub struct DoveadmEncoder {
    doveadm: Doveadm,
}

impl DoveadmEncoder {
    pub fn new(doveadm: Doveadm) -> Self {
        Self { doveadm }
    }

    pub fn doveadm(&self) -> &Doveadm {
        &self.doveadm
    }
}

#[async_trait]
impl CredentialEncoder for DoveadmEncoder {
    fn web_hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Password::new(plaintext).to_database()
    }

    async fn mail_hash(&self, plaintext: &str) -> Result<String, MailHashError> {
        self.doveadm.hash(plaintext).await
    }
}
