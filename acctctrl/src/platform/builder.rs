use acctac::{
    mailpw::{
        Doveadm,
        DEFAULT_BIN_PATH,
        DEFAULT_SCHEME,
    },
    DoveadmEncoder,
};
use acctcore::platform::ConnectorOption;
use acctdb_sqlite::SqliteBackend;
use clap::{ArgAction, Parser};
use std::{
    error::Error,
    sync::Arc,
    time::Duration,
};

use super::Platform;

#[derive(Clone, Debug, Parser)]
pub struct Builder {
    #[clap(
        long,
        value_name = "ACCT_AUTO_CREATE_DB",
        env = "ACCT_AUTO_CREATE_DB",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub acct_auto_create_db: bool,
    #[clap(long, value_name = "ACCT_DB_URL", env = "ACCT_DB_URL")]
    pub acct_db_url: String,
    #[clap(
        long,
        value_name = "ACCT_DOVEADM_PATH",
        env = "ACCT_DOVEADM_PATH",
        default_value = DEFAULT_BIN_PATH,
    )]
    pub acct_doveadm_path: String,
    #[clap(
        long,
        value_name = "ACCT_DOVEADM_SCHEME",
        env = "ACCT_DOVEADM_SCHEME",
        default_value = DEFAULT_SCHEME,
    )]
    pub acct_doveadm_scheme: String,
    /// Seconds to wait for the mail hash utility.
    #[clap(
        long,
        value_name = "ACCT_DOVEADM_TIMEOUT",
        env = "ACCT_DOVEADM_TIMEOUT",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub acct_doveadm_timeout: u64,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            acct_auto_create_db: true,
            acct_db_url: String::new(),
            acct_doveadm_path: DEFAULT_BIN_PATH.to_string(),
            acct_doveadm_scheme: DEFAULT_SCHEME.to_string(),
            acct_doveadm_timeout: 5,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acct_auto_create_db(mut self, value: bool) -> Self {
        self.acct_auto_create_db = value;
        self
    }

    pub fn acct_db_url(mut self, value: String) -> Self {
        self.acct_db_url = value;
        self
    }

    pub fn acct_doveadm_path(mut self, value: String) -> Self {
        self.acct_doveadm_path = value;
        self
    }

    pub fn acct_doveadm_scheme(mut self, value: String) -> Self {
        self.acct_doveadm_scheme = value;
        self
    }

    pub fn acct_doveadm_timeout(mut self, value: u64) -> Self {
        self.acct_doveadm_timeout = value.max(1);
        self
    }

    pub fn doveadm(&self) -> Doveadm {
        Doveadm::new()
            .bin_path(&self.acct_doveadm_path)
            .scheme(&self.acct_doveadm_scheme)
            .timeout(Duration::from_secs(self.acct_doveadm_timeout))
    }

    pub async fn build(self) -> Result<Platform, Box<dyn Error + Send + Sync>> {
        Ok(Platform::new(
            Arc::new(
                SqliteBackend::platform(
                    ConnectorOption::from(&self.acct_db_url)
                        .auto_create_db(self.acct_auto_create_db)
                )
                    .await?
            ),
            Arc::new(DoveadmEncoder::new(self.doveadm())),
        ))
    }
}
