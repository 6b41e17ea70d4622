//! Keeps the three representations of an account's secret in step.
//!
//! Any write that carries a new plaintext (whether submitted as the
//! password or as the plaintext mirror) goes through [`synchronize`],
//! and the returned [`SecretFields`] are applied to the entry before
//! it is persisted in a single write.
use acctcore::account::AccountEntry;

use crate::{
    encoder::CredentialEncoder,
    error::PasswordError,
};

#[derive(Clone, PartialEq)]
pub struct SecretFields {
    pub password: String,
    pub clearpw: String,
    pub emailpw: Option<String>,
}

impl SecretFields {
    pub fn apply(self, entry: &mut AccountEntry) {
        entry.password = self.password;
        entry.clearpw = Some(self.clearpw);
        entry.emailpw = self.emailpw;
    }
}

/// Derive the secret fields for `candidate`.
///
/// Returns `None` when `candidate` is exactly the stored web-login hash,
/// as hashing it again would store a hash of a hash.  A mail hash
/// failure is logged and yields `emailpw: None` rather than an error.
pub async fn synchronize(
    encoder: &dyn CredentialEncoder,
    stored_password: Option<&str>,
    candidate: &str,
) -> Result<Option<SecretFields>, PasswordError> {
    if stored_password == Some(candidate) {
        log::info!("submitted password matches the stored hash; leaving secrets unchanged");
        return Ok(None);
    }
    if candidate.is_empty() {
        return Err(PasswordError::Empty);
    }

    let password = encoder.web_hash(candidate)?;
    let emailpw = match encoder.mail_hash(candidate).await {
        Ok(hash) => Some(hash),
        Err(e) => {
            log::error!("failed to generate emailpw: {e}");
            None
        }
    };
    Ok(Some(SecretFields {
        password,
        clearpw: candidate.to_string(),
        emailpw,
    }))
}

#[cfg(test)]
mod test {
    use acctcore::account::AccountEntry;
    use mockall::predicate::eq;
    use crate::{
        encoder::MockCredentialEncoder,
        error::{
            MailHashError,
            PasswordError,
        },
    };
    use super::*;

    #[tokio::test]
    async fn all_three_from_one_plaintext() -> anyhow::Result<()> {
        let mut encoder = MockCredentialEncoder::new();
        encoder.expect_web_hash()
            .with(eq("hunter22"))
            .times(1)
            .returning(|_| Ok("web(hunter22)".to_string()));
        encoder.expect_mail_hash()
            .with(eq("hunter22"))
            .times(1)
            .returning(|_| Ok("{SHA512-CRYPT}mail(hunter22)".to_string()));

        let fields = synchronize(&encoder, Some("web(old)"), "hunter22").await?
            .expect("fields to be derived");
        let mut entry = AccountEntry::new("name", "name@example.com");
        entry.emailpw = Some("{SHA512-CRYPT}mail(old)".into());
        fields.apply(&mut entry);
        assert_eq!(entry.password, "web(hunter22)");
        assert_eq!(entry.clearpw.as_deref(), Some("hunter22"));
        assert_eq!(entry.emailpw.as_deref(), Some("{SHA512-CRYPT}mail(hunter22)"));
        Ok(())
    }

    #[tokio::test]
    async fn mail_failure_clears_emailpw() -> anyhow::Result<()> {
        let mut encoder = MockCredentialEncoder::new();
        encoder.expect_web_hash()
            .returning(|_| Ok("web(new)".to_string()));
        encoder.expect_mail_hash()
            .times(1)
            .returning(|_| Err(MailHashError::EmptyOutput));

        let fields = synchronize(&encoder, None, "new-secret").await?
            .expect("fields to be derived");
        let mut entry = AccountEntry::new("name", "name@example.com");
        entry.password = "web(old)".into();
        entry.clearpw = Some("old-secret".into());
        entry.emailpw = Some("{SHA512-CRYPT}mail(old)".into());
        fields.apply(&mut entry);
        assert_eq!(entry.password, "web(new)");
        assert_eq!(entry.clearpw.as_deref(), Some("new-secret"));
        assert_eq!(entry.emailpw, None);
        Ok(())
    }

    #[tokio::test]
    async fn stored_hash_is_not_rehashed() -> anyhow::Result<()> {
        let mut encoder = MockCredentialEncoder::new();
        encoder.expect_web_hash().times(0);
        encoder.expect_mail_hash().times(0);
        let stored = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g";
        assert!(synchronize(&encoder, Some(stored), stored).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn near_match_is_rehashed() -> anyhow::Result<()> {
        let mut encoder = MockCredentialEncoder::new();
        encoder.expect_web_hash()
            .times(1)
            .returning(|_| Ok("web".to_string()));
        encoder.expect_mail_hash()
            .times(1)
            .returning(|_| Ok("mail".to_string()));
        // only exact equality with the stored hash short-circuits
        let fields = synchronize(&encoder, Some("stored-hash"), "stored-hash ").await?;
        assert!(fields.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn empty_rejected() {
        let mut encoder = MockCredentialEncoder::new();
        encoder.expect_web_hash().times(0);
        encoder.expect_mail_hash().times(0);
        assert!(matches!(
            synchronize(&encoder, Some("stored"), "").await,
            Err(PasswordError::Empty)
        ));
    }

    #[tokio::test]
    async fn web_hash_failure_aborts() {
        let mut encoder = MockCredentialEncoder::new();
        encoder.expect_web_hash()
            .returning(|_| Err(PasswordError::NotVerifiable));
        encoder.expect_mail_hash().times(0);
        assert!(matches!(
            synchronize(&encoder, None, "hunter22").await,
            Err(PasswordError::NotVerifiable)
        ));
    }
}
