use std::fmt;

use super::*;

pub const DEFAULT_GID: i64 = 1000;
pub const DEFAULT_UID: i64 = 1000;

const REDACTED: &str = "<redacted>";

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| REDACTED)
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("email_verified_at", &self.email_verified_at)
            .field("password", &REDACTED)
            .field("clearpw", &redact(&self.clearpw))
            .field("emailpw", &self.emailpw)
            .field("active", &self.active)
            .field("gid", &self.gid)
            .field("uid", &self.uid)
            .field("home", &self.home)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl fmt::Debug for AccountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountEntry")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("email_verified_at", &self.email_verified_at)
            .field("password", &REDACTED)
            .field("clearpw", &redact(&self.clearpw))
            .field("emailpw", &self.emailpw)
            .field("active", &self.active)
            .field("gid", &self.gid)
            .field("uid", &self.uid)
            .field("home", &self.home)
            .finish()
    }
}

impl AccountEntry {
    /// A fresh entry with the POSIX-style defaults applied; the secret
    /// fields are left empty for the synchronizer to fill in.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            email_verified_at: None,
            password: String::new(),
            clearpw: None,
            emailpw: None,
            active: true,
            gid: DEFAULT_GID,
            uid: DEFAULT_UID,
            home: None,
        }
    }
}

impl Account {
    pub fn entry(&self) -> AccountEntry {
        self.clone().into()
    }
}

impl From<Account> for AccountEntry {
    fn from(account: Account) -> Self {
        Self {
            name: account.name,
            email: account.email,
            email_verified_at: account.email_verified_at,
            password: account.password,
            clearpw: account.clearpw,
            emailpw: account.emailpw,
            active: account.active,
            gid: account.gid,
            uid: account.uid,
            home: account.home,
        }
    }
}

impl BatchDeleteReport {
    pub fn new(deleted: usize, failed: usize, errors: Vec<String>) -> Self {
        let message = if deleted > 0 {
            format!("{deleted} users deleted successfully")
        } else {
            "No users were deleted".to_string()
        };
        Self {
            success: deleted > 0,
            deleted,
            failed,
            message,
            errors,
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::DateTime;
    use crate::account::{
        Account,
        AccountEntry,
        BatchDeleteReport,
    };

    fn account() -> Account {
        let ts = DateTime::from_timestamp(1234567890, 0).expect("valid timestamp");
        Account {
            id: 7,
            name: "Test User".into(),
            email: "test@example.com".into(),
            email_verified_at: None,
            password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            clearpw: Some("hunter22".into()),
            emailpw: Some("{SHA512-CRYPT}$6$salt$hash".into()),
            active: true,
            gid: 1000,
            uid: 1000,
            home: Some("/var/mail/test".into()),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn serialized_shape() -> anyhow::Result<()> {
        let value = serde_json::to_value(account())?;
        let object = value.as_object().expect("an object");
        assert!(!object.contains_key("password"));
        let mut keys = object.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort();
        assert_eq!(keys, [
            "active", "clearpw", "created_at", "email", "email_verified_at",
            "emailpw", "gid", "home", "id", "name", "uid", "updated_at",
        ]);
        assert_eq!(object["created_at"], "2009-02-13T23:31:30Z");
        assert_eq!(object["clearpw"], "hunter22");
        Ok(())
    }

    #[test]
    fn debug_redacts_secrets() {
        let output = format!("{:?}", account());
        assert!(!output.contains("hunter22"));
        assert!(!output.contains("argon2id"));
        assert!(output.contains("test@example.com"));
        let output = format!("{:?}", account().entry());
        assert!(!output.contains("hunter22"));
    }

    #[test]
    fn entry_defaults() {
        let entry = AccountEntry::new("name", "name@example.com");
        assert!(entry.active);
        assert_eq!(entry.gid, 1000);
        assert_eq!(entry.uid, 1000);
        assert_eq!(entry.home, None);
        assert_eq!(entry.emailpw, None);
    }

    #[test]
    fn batch_report_message() {
        let report = BatchDeleteReport::new(2, 1, vec!["User with ID 999 not found".into()]);
        assert!(report.success);
        assert_eq!(report.message, "2 users deleted successfully");
        let report = BatchDeleteReport::new(0, 3, vec![]);
        assert!(!report.success);
        assert_eq!(report.message, "No users were deleted");
    }
}
