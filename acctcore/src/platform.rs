use async_trait::async_trait;

use crate::account::traits::AccountBackend;

pub trait PlatformUrl {
    fn url(&self) -> &str;
}

/// AccountPlatform - persistence for the account administration.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
#[async_trait]
pub trait AccountPlatform: AccountBackend
    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn AccountPlatform;
}

pub trait DefaultAccountPlatform: AccountPlatform {}

impl<P: AccountBackend
    + PlatformUrl

    + DefaultAccountPlatform

    + Send
    + Sync
> AccountPlatform for P {
    fn as_dyn(&self) -> &(dyn AccountPlatform) {
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConnectorOption {
    pub auto_create_db: bool,
    pub url: String,
}

impl ConnectorOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_create_db(mut self, auto_create_db: bool) -> Self {
        self.auto_create_db = auto_create_db;
        self
    }

    pub fn url(mut self, url: String) -> Self {
        self.url = url;
        self
    }
}

impl<T> From<T> for ConnectorOption
where
    T: ToString
{
    fn from(v: T) -> Self {
        Self::new().url(v.to_string())
    }
}
