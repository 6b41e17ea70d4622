use acctcore::account::AccountEntry;
use regex::Regex;
use std::{
    fmt,
    sync::LazyLock,
};

use crate::error::ValidationErrors;
use super::*;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$")
        .expect("email pattern is a valid regex")
});

impl fmt::Debug for AccountInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let masked = |v: &Option<Textish>| v.as_ref().map(|_| "[MASKED]");
        f.debug_struct("AccountInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &masked(&self.password))
            .field("clearpw", &masked(&self.clearpw))
            .field("active", &self.active)
            .field("gid", &self.gid)
            .field("uid", &self.uid)
            .field("home", &self.home)
            .finish()
    }
}

impl fmt::Debug for AccountChanges {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AccountChanges")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "[MASKED]"))
            .field("active", &self.active)
            .field("gid", &self.gid)
            .field("uid", &self.uid)
            .field("home", &self.home)
            .finish()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BatchId::Id(id) => id.fmt(f),
            BatchId::Text(s) => s.fmt(f),
            BatchId::Other(v) => v.fmt(f),
        }
    }
}

impl From<i64> for BatchId {
    fn from(id: i64) -> Self {
        BatchId::Id(id)
    }
}

impl BatchId {
    pub fn resolve(&self) -> Option<i64> {
        match self {
            BatchId::Id(id) => Some(*id),
            BatchId::Text(s) => s.trim().parse().ok(),
            BatchId::Other(_) => None,
        }
    }
}

impl Textish {
    pub fn into_text(self) -> Option<String> {
        match self {
            Textish::Text(s) => Some(s),
            Textish::Other(_) => None,
        }
    }
}

impl From<String> for Textish {
    fn from(value: String) -> Self {
        Textish::Text(value)
    }
}

impl From<&str> for Textish {
    fn from(value: &str) -> Self {
        Textish::Text(value.to_string())
    }
}

impl Boolish {
    pub fn resolve(&self) -> Option<bool> {
        match self {
            Boolish::Bool(b) => Some(*b),
            Boolish::Int(1) => Some(true),
            Boolish::Int(0) => Some(false),
            Boolish::Text(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<bool> for Boolish {
    fn from(value: bool) -> Self {
        Boolish::Bool(value)
    }
}

impl From<&str> for Boolish {
    fn from(value: &str) -> Self {
        Boolish::Text(value.to_string())
    }
}

impl Intish {
    pub fn resolve(&self) -> Option<i64> {
        match self {
            Intish::Int(n) => Some(*n),
            Intish::Text(s) => s.trim().parse().ok(),
            Intish::Other(_) => None,
        }
    }
}

impl From<i64> for Intish {
    fn from(value: i64) -> Self {
        Intish::Int(value)
    }
}

impl From<&str> for Intish {
    fn from(value: &str) -> Self {
        Intish::Text(value.to_string())
    }
}

fn too_long(field: &str, max: usize) -> String {
    format!("The {field} field must not be greater than {max} characters.")
}

/// `Err(())` when the field was submitted with a non-string value, which
/// has already been recorded in `errors`.
fn string(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Textish>,
) -> Result<Option<String>, ()> {
    match value.map(Textish::into_text) {
        None => Ok(None),
        Some(Some(s)) => Ok(Some(s)),
        Some(None) => {
            errors.add(field, format!("The {field} field must be a string."));
            Err(())
        }
    }
}

fn text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Textish>,
    required: bool,
    max: usize,
) -> Option<String> {
    let value = string(errors, field, value).ok()?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    match value {
        None => {
            if required {
                errors.add(field, format!("The {field} field is required."));
            }
            None
        }
        Some(s) if s.chars().count() > max => {
            errors.add(field, too_long(field, max));
            None
        }
        Some(s) => Some(s),
    }
}

fn secret(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Textish>,
) -> Option<String> {
    // submitted verbatim; only the empty string counts as absent
    let value = string(errors, field, value).ok()?
        .filter(|s| !s.is_empty())?;
    let len = value.chars().count();
    if len < PASSWORD_MIN {
        errors.add(field, format!(
            "The {field} field must be at least {PASSWORD_MIN} characters."
        ));
        None
    } else if len > PASSWORD_MAX {
        errors.add(field, too_long(field, PASSWORD_MAX));
        None
    } else {
        Some(value)
    }
}

fn integer(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Intish>,
) -> Option<i64> {
    let value = value?;
    let resolved = value.resolve();
    if resolved.is_none() {
        errors.add(field, format!("The {field} field must be an integer."));
    }
    resolved
}

impl AccountInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, value: impl Into<Textish>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<Textish>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn password(mut self, value: impl Into<Textish>) -> Self {
        self.password = Some(value.into());
        self
    }

    pub fn clearpw(mut self, value: impl Into<Textish>) -> Self {
        self.clearpw = Some(value.into());
        self
    }

    pub fn active(mut self, value: impl Into<Boolish>) -> Self {
        self.active = Some(value.into());
        self
    }

    pub fn gid(mut self, value: impl Into<Intish>) -> Self {
        self.gid = Some(value.into());
        self
    }

    pub fn uid(mut self, value: impl Into<Intish>) -> Self {
        self.uid = Some(value.into());
        self
    }

    pub fn home(mut self, value: impl Into<Textish>) -> Self {
        self.home = Some(value.into());
        self
    }

    /// Validate for a new account; name and email are required.
    pub fn validate_create(self) -> Result<AccountChanges, ValidationErrors> {
        self.validate(true)
    }

    /// Validate a partial update; absent fields are left alone.
    pub fn validate_update(self) -> Result<AccountChanges, ValidationErrors> {
        self.validate(false)
    }

    fn validate(self, creating: bool) -> Result<AccountChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        // on update a submitted but blank name or email is still an error
        let name = text(
            &mut errors, "name", self.name.clone(),
            creating || self.name.is_some(), NAME_MAX,
        );
        let email = text(
            &mut errors, "email", self.email.clone(),
            creating || self.email.is_some(), EMAIL_MAX,
        );
        let email = email.filter(|email| {
            let valid = EMAIL.is_match(email);
            if !valid {
                errors.add("email", "The email field must be a valid email address.");
            }
            valid
        });

        let password = secret(&mut errors, "password", self.password);
        let clearpw = secret(&mut errors, "clearpw", self.clearpw);
        let secret = match (password, clearpw) {
            (Some(password), Some(clearpw)) if password != clearpw => {
                errors.add("clearpw", "The clearpw field must match password.");
                None
            }
            (password, clearpw) => password.or(clearpw),
        };

        let active = self.active.and_then(|value| {
            let resolved = value.resolve();
            if resolved.is_none() {
                errors.add("active", "The active field must be true or false.");
            }
            resolved
        });
        let gid = integer(&mut errors, "gid", self.gid);
        let uid = integer(&mut errors, "uid", self.uid);

        let home = match string(&mut errors, "home", self.home) {
            Err(()) | Ok(None) => None,
            Ok(Some(s)) => {
                let s = s.trim().to_string();
                if s.is_empty() {
                    Some(None)
                } else if s.chars().count() > HOME_MAX {
                    errors.add("home", too_long("home", HOME_MAX));
                    None
                } else {
                    Some(Some(s))
                }
            }
        };

        errors.check()?;
        Ok(AccountChanges { name, email, secret, active, gid, uid, home })
    }
}

impl AccountChanges {
    /// Apply everything except the secret, which must go through the
    /// synchronizer.
    pub fn apply(&self, entry: &mut AccountEntry) {
        if let Some(name) = &self.name {
            entry.name = name.clone();
        }
        if let Some(email) = &self.email {
            entry.email = email.clone();
        }
        if let Some(active) = self.active {
            entry.active = active;
        }
        if let Some(gid) = self.gid {
            entry.gid = gid;
        }
        if let Some(uid) = self.uid {
            entry.uid = uid;
        }
        if let Some(home) = &self.home {
            entry.home = home.clone();
        }
    }
}

#[cfg(test)]
mod test {
    use acctcore::account::AccountEntry;
    use serde_json::json;
    use super::*;

    fn parse(value: serde_json::Value) -> AccountInput {
        serde_json::from_value(value).expect("a valid account input")
    }

    #[test]
    fn create_minimal() -> anyhow::Result<()> {
        let changes = parse(json!({
            "name": " Test User ",
            "email": "test@example.com",
        })).validate_create()?;
        assert_eq!(changes.name.as_deref(), Some("Test User"));
        assert_eq!(changes.email.as_deref(), Some("test@example.com"));
        assert_eq!(changes.secret, None);
        assert_eq!(changes.active, None);
        assert_eq!(changes.home, None);
        Ok(())
    }

    #[test]
    fn create_requires_name_email() {
        let errors = parse(json!({})).validate_create()
            .expect_err("name and email are required");
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["email", "name"]);
        assert_eq!(
            errors.get("name"),
            Some(&["The name field is required.".to_string()][..]),
        );

        // but an update may omit both
        assert!(parse(json!({})).validate_update().is_ok());
        // unless they are submitted blank
        let errors = parse(json!({"name": "  "})).validate_update()
            .expect_err("blank name");
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn email_shape() {
        for email in ["plain", "user@host", "two@@example.com", "sp ace@example.com"] {
            let errors = parse(json!({"email": email})).validate_update()
                .expect_err("invalid email");
            assert_eq!(
                errors.get("email"),
                Some(&["The email field must be a valid email address.".to_string()][..]),
                "{email}",
            );
        }
        let long = format!("{}@example.com", "a".repeat(250));
        let errors = parse(json!({"email": long})).validate_update()
            .expect_err("too long");
        assert_eq!(
            errors.get("email"),
            Some(&["The email field must not be greater than 255 characters.".to_string()][..]),
        );
    }

    #[test]
    fn secret_lengths() -> anyhow::Result<()> {
        let errors = parse(json!({"password": "short"})).validate_update()
            .expect_err("too short");
        assert_eq!(
            errors.get("password"),
            Some(&["The password field must be at least 8 characters.".to_string()][..]),
        );
        let errors = parse(json!({"clearpw": "x".repeat(128)})).validate_update()
            .expect_err("too long");
        assert_eq!(
            errors.get("clearpw"),
            Some(&["The clearpw field must not be greater than 127 characters.".to_string()][..]),
        );
        let changes = parse(json!({"password": "x".repeat(127)})).validate_update()?;
        assert_eq!(changes.secret.map(|s| s.len()), Some(127));

        // surrounding whitespace is part of the secret
        let changes = parse(json!({"clearpw": " spaced secret "})).validate_update()?;
        assert_eq!(changes.secret.as_deref(), Some(" spaced secret "));

        // an empty string is the same as not submitting one
        let changes = parse(json!({"password": ""})).validate_update()?;
        assert_eq!(changes.secret, None);
        Ok(())
    }

    #[test]
    fn password_and_clearpw() -> anyhow::Result<()> {
        let changes = parse(json!({
            "password": "hunter2222",
            "clearpw": "hunter2222",
        })).validate_update()?;
        assert_eq!(changes.secret.as_deref(), Some("hunter2222"));

        let errors = parse(json!({
            "password": "hunter2222",
            "clearpw": "hunter3333",
        })).validate_update().expect_err("mismatch");
        assert_eq!(
            errors.get("clearpw"),
            Some(&["The clearpw field must match password.".to_string()][..]),
        );
        Ok(())
    }

    #[test]
    fn active_boolish() -> anyhow::Result<()> {
        for (value, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!("true"), true),
            (json!("false"), false),
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
        ] {
            let changes = parse(json!({"active": value.clone()})).validate_update()?;
            assert_eq!(changes.active, Some(expected), "{value}");
        }
        for value in [json!("yes"), json!(2), json!(1.5), json!([true])] {
            let errors = parse(json!({"active": value})).validate_update()
                .expect_err("not boolish");
            assert_eq!(
                errors.get("active"),
                Some(&["The active field must be true or false.".to_string()][..]),
            );
        }
        assert_eq!(parse(json!({"active": null})).validate_update()?.active, None);
        Ok(())
    }

    #[test]
    fn ids_intish() -> anyhow::Result<()> {
        let changes = parse(json!({"gid": 2000, "uid": "2001"})).validate_update()?;
        assert_eq!(changes.gid, Some(2000));
        assert_eq!(changes.uid, Some(2001));
        let errors = parse(json!({"gid": "staff", "uid": 1.5})).validate_update()
            .expect_err("not integers");
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["gid", "uid"]);
        Ok(())
    }

    #[test]
    fn text_fields_must_be_strings() -> anyhow::Result<()> {
        let errors = parse(json!({
            "name": 123,
            "email": ["a@example.com"],
            "password": 12345678,
            "clearpw": {"secret": true},
            "home": false,
        })).validate_create().expect_err("mistyped fields");
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["clearpw", "email", "home", "name", "password"],
        );
        assert_eq!(
            errors.get("name"),
            Some(&["The name field must be a string.".to_string()][..]),
        );
        assert_eq!(
            errors.get("password"),
            Some(&["The password field must be a string.".to_string()][..]),
        );

        // null is the same as leaving the field out
        let changes = parse(json!({"name": null, "home": null})).validate_update()?;
        assert_eq!(changes.name, None);
        assert_eq!(changes.home, None);
        Ok(())
    }

    #[test]
    fn home() -> anyhow::Result<()> {
        let changes = parse(json!({"home": "/home/test"})).validate_update()?;
        assert_eq!(changes.home, Some(Some("/home/test".to_string())));
        let changes = parse(json!({"home": ""})).validate_update()?;
        assert_eq!(changes.home, Some(None));
        let errors = parse(json!({"home": "/".repeat(128)})).validate_update()
            .expect_err("too long");
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["home"]);
        Ok(())
    }

    #[test]
    fn apply_leaves_secrets() -> anyhow::Result<()> {
        let mut entry = AccountEntry::new("old", "old@example.com");
        entry.password = "stored".into();
        entry.home = Some("/home/old".into());
        parse(json!({
            "name": "new",
            "password": "brand new secret",
            "active": "0",
            "uid": 1500,
            "home": "",
        })).validate_update()?.apply(&mut entry);
        assert_eq!(entry.name, "new");
        assert_eq!(entry.email, "old@example.com");
        assert_eq!(entry.password, "stored");
        assert!(!entry.active);
        assert_eq!(entry.uid, 1500);
        assert_eq!(entry.gid, 1000);
        assert_eq!(entry.home, None);
        Ok(())
    }

    #[test]
    fn batch_ids() {
        let ids: Vec<BatchId> = serde_json::from_value(json!([1, "2", "x", null, 3.5]))
            .expect("any json values");
        assert_eq!(
            ids.iter().map(BatchId::resolve).collect::<Vec<_>>(),
            [Some(1), Some(2), None, None, None],
        );
        assert_eq!(ids[2].to_string(), "x");
        assert_eq!(ids[3].to_string(), "null");
    }

    #[test]
    fn debug_masks_secrets() {
        let input = AccountInput::new()
            .name("name")
            .password("hunter2222")
            .clearpw("hunter2222");
        let debug = format!("{input:?}");
        assert!(!debug.contains("hunter2222"));
        assert!(debug.contains("[MASKED]"));
    }
}
