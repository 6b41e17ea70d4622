use async_trait::async_trait;
use crate::{
    error::BackendError,
    listing::{
        ListingParams,
        Page,
    },
};
use super::{
    Account,
    AccountEntry,
};

#[async_trait]
pub trait AccountBackend {
    async fn add_account(
        &self,
        entry: &AccountEntry,
    ) -> Result<i64, BackendError>;
    async fn get_account_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Account>, BackendError>;
    async fn get_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account>, BackendError>;
    /// Writes every column of the entry to the row in a single statement.
    /// Returns false if no row exists for the id.
    async fn store_account(
        &self,
        id: i64,
        entry: &AccountEntry,
    ) -> Result<bool, BackendError>;
    async fn delete_account(
        &self,
        id: i64,
    ) -> Result<bool, BackendError>;
    async fn list_accounts(
        &self,
        params: &ListingParams,
    ) -> Result<Page<Account>, BackendError>;
}
