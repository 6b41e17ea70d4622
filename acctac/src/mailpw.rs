use std::{
    path::PathBuf,
    process::Stdio,
    time::Duration,
};
use tokio::{
    process::Command,
    time::timeout,
};

use crate::error::MailHashError;

pub const DEFAULT_BIN_PATH: &str = "/usr/bin/doveadm";
pub const DEFAULT_SCHEME: &str = "SHA512-CRYPT";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Generates mail-server password hashes by running `doveadm pw`.
///
/// The plaintext is handed to the child as a single argv element; no
/// shell is involved, so its content is never interpreted.
#[derive(Clone, Debug)]
pub struct Doveadm {
    bin_path: PathBuf,
    scheme: String,
    timeout: Duration,
}

impl Default for Doveadm {
    fn default() -> Self {
        Self {
            bin_path: DEFAULT_BIN_PATH.into(),
            scheme: DEFAULT_SCHEME.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Doveadm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bin_path(mut self, val: impl Into<PathBuf>) -> Self {
        self.bin_path = val.into();
        self
    }

    pub fn scheme(mut self, val: impl Into<String>) -> Self {
        self.scheme = val.into();
        self
    }

    pub fn timeout(mut self, val: Duration) -> Self {
        self.timeout = val;
        self
    }

    /// The tag the utility prefixes its output with, e.g.
    /// `{SHA512-CRYPT}`.
    pub fn format_tag(&self) -> String {
        format!("{{{}}}", self.scheme)
    }

    pub fn has_format_tag(&self, hash: &str) -> bool {
        hash.starts_with(&self.format_tag())
    }

    fn command(&self, plaintext: &str) -> Command {
        let mut command = Command::new(&self.bin_path);
        command
            .arg("pw")
            .arg("-s")
            .arg(&self.scheme)
            .arg("-p")
            .arg(plaintext)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Run the utility once.  The trimmed output is returned only when
    /// the child exits successfully with something on stdout.
    pub async fn hash(&self, plaintext: &str) -> Result<String, MailHashError> {
        log::trace!(
            "executing: {} pw -s {} -p [MASKED]",
            self.bin_path.display(),
            self.scheme,
        );
        let output = timeout(self.timeout, self.command(plaintext).output())
            .await
            .map_err(|_| MailHashError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(MailHashError::NonZero {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let hash = String::from_utf8(output.stdout)
            .map_err(|_| MailHashError::InvalidOutput)?
            .trim()
            .to_string();
        if hash.is_empty() {
            return Err(MailHashError::EmptyOutput);
        }
        if !self.has_format_tag(&hash) {
            log::warn!(
                "mail password hash does not start with the expected {} tag",
                self.format_tag(),
            );
        }
        Ok(hash)
    }
}
