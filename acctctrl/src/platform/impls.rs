use acctac::{
    encoder::CredentialEncoder,
    password::{
        generate,
        Password,
    },
    sync::synchronize,
};
use acctcore::{
    account::{
        Account,
        AccountEntry,
        BatchDeleteReport,
        DeleteOutcome,
    },
    error::BackendError,
    listing::{
        ListingParams,
        Page,
    },
    platform::AccountPlatform,
};
use std::sync::Arc;

use crate::{
    error::{
        PlatformError,
        ValidationErrors,
    },
    input::{
        AccountChanges,
        AccountInput,
        BatchId,
    },
};
use super::Platform;

/// Uniqueness rejections from the backend are reported like any other
/// validation failure.
fn from_backend(e: BackendError) -> PlatformError {
    match e {
        BackendError::Conflict(field) => {
            let mut errors = ValidationErrors::new();
            errors.add(&field, format!("The {field} has already been taken."));
            errors.into()
        }
        e => e.into(),
    }
}

impl Platform {
    pub fn new(
        backend: Arc<dyn AccountPlatform>,
        encoder: Arc<dyn CredentialEncoder>,
    ) -> Self {
        Self { backend, encoder }
    }

    async fn check_email(
        &self,
        changes: &AccountChanges,
        own_id: Option<i64>,
    ) -> Result<(), PlatformError> {
        let Some(email) = changes.email.as_deref() else {
            return Ok(());
        };
        match self.backend.get_account_by_email(email).await? {
            Some(existing) if Some(existing.id) != own_id => {
                let mut errors = ValidationErrors::new();
                errors.add("email", "The email has already been taken.");
                Err(errors.into())
            }
            _ => Ok(()),
        }
    }

    async fn sync_secret(
        &self,
        entry: &mut AccountEntry,
        stored_password: Option<&str>,
        secret: &str,
    ) -> Result<(), PlatformError> {
        if let Some(fields) = synchronize(
            self.encoder.as_ref(),
            stored_password,
            secret,
        ).await? {
            fields.apply(entry);
        }
        Ok(())
    }
}

// Account management

impl Platform {
    pub async fn get_account(
        &self,
        id: i64,
    ) -> Result<Account, PlatformError> {
        self.backend.get_account_by_id(id).await?
            .ok_or(PlatformError::NotFound(id))
    }

    pub async fn list_accounts(
        &self,
        params: &ListingParams,
    ) -> Result<Page<Account>, PlatformError> {
        Ok(self.backend.list_accounts(params).await?)
    }

    /// Create an account.  When no secret is submitted a random one is
    /// generated so that all three secret fields are always populated.
    pub async fn create_account(
        &self,
        input: AccountInput,
    ) -> Result<Account, PlatformError> {
        let changes = input.validate_create()?;
        self.check_email(&changes, None).await?;

        let (Some(name), Some(email)) = (&changes.name, &changes.email) else {
            // validate_create guarantees both
            return Err(BackendError::AppInvariantViolation(
                "name and email missing after validation".into()
            ).into());
        };
        let mut entry = AccountEntry::new(name, email);
        changes.apply(&mut entry);

        let secret = match changes.secret {
            Some(secret) => secret,
            None => {
                log::info!("no password supplied for {email}; generating one");
                generate()
            }
        };
        self.sync_secret(&mut entry, None, &secret).await?;

        let id = self.backend.add_account(&entry).await
            .map_err(from_backend)?;
        log::info!("created account id={id}");
        if entry.emailpw.is_some() {
            log::info!("generated mail password hash for account id={id}");
        }
        self.get_account(id).await
    }

    /// Apply a partial update.  A new secret, whether submitted as
    /// `password` or `clearpw`, is synchronized into all three fields.
    pub async fn update_account(
        &self,
        id: i64,
        input: AccountInput,
    ) -> Result<Account, PlatformError> {
        let account = self.get_account(id).await?;
        let changes = input.validate_update()?;
        self.check_email(&changes, Some(id)).await?;

        let mut entry = account.entry();
        changes.apply(&mut entry);
        if let Some(secret) = &changes.secret {
            log::info!("password synchronization triggered for account id={id}");
            self.sync_secret(&mut entry, Some(&account.password), secret).await?;
            if entry.emailpw.is_some() {
                log::info!("generated mail password hash for account id={id}");
            }
        }

        if !self.backend.store_account(id, &entry).await
            .map_err(from_backend)?
        {
            return Err(PlatformError::NotFound(id));
        }
        log::info!("updated account id={id}");
        self.get_account(id).await
    }

    /// Force a new secret for the account.
    pub async fn set_password(
        &self,
        id: i64,
        password: &str,
    ) -> Result<Account, PlatformError> {
        self.update_account(id, AccountInput::new().password(password)).await
    }

    /// Verify the plaintext against the stored web-login hash.
    pub async fn verify_password(
        &self,
        id: i64,
        password: &str,
    ) -> Result<(), PlatformError> {
        let account = self.get_account(id).await?;
        Ok(Password::from_database(&account.password)
            .verify(&Password::new(password))?)
    }
}

// Deletion

impl Platform {
    pub async fn delete_account(
        &self,
        id: i64,
    ) -> Result<DeleteOutcome, PlatformError> {
        if self.backend.delete_account(id).await? {
            log::info!("deleted account id={id}");
            Ok(DeleteOutcome::Deleted)
        } else {
            log::info!("account id={id} not found for deletion");
            Ok(DeleteOutcome::NotFound)
        }
    }

    /// Delete each id independently; a failure never undoes the
    /// deletions before it.
    pub async fn batch_delete(
        &self,
        ids: &[BatchId],
    ) -> BatchDeleteReport {
        let mut deleted = 0;
        let mut errors = Vec::new();
        for raw in ids {
            let Some(id) = raw.resolve() else {
                log::info!("batch delete: invalid id {raw}");
                errors.push(format!("User with ID {raw} not found or could not be deleted"));
                continue;
            };
            match self.delete_account(id).await {
                Ok(DeleteOutcome::Deleted) => deleted += 1,
                Ok(DeleteOutcome::NotFound) => errors.push(
                    format!("User with ID {id} not found or could not be deleted")
                ),
                Err(e) => {
                    log::error!("batch delete: failed to delete account id={id}: {e}");
                    errors.push(format!("Error deleting user {id}: {e}"));
                }
            }
        }
        let report = BatchDeleteReport::new(deleted, ids.len() - deleted, errors);
        log::info!(
            "batch delete: {} requested, {} deleted, {} failed",
            ids.len(),
            report.deleted,
            report.failed,
        );
        report
    }
}
