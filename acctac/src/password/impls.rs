use argon2::{
    password_hash::{
        rand_core::OsRng,
        PasswordHash,
        PasswordHasher,
        PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use rand::{
    distributions::Alphanumeric,
    Rng,
};

use crate::error::PasswordError;
use super::{
    Password,
    GENERATED_LENGTH,
};

impl<'a> Password<'a> {
    pub fn new(s: &'a str) -> Self {
        Password::Raw(s)
    }

    pub fn from_database(s: &'a str) -> Self {
        PasswordHash::new(s)
            .map(Password::Hash)
            .unwrap_or(Password::Misconfigured)
    }

    pub fn to_database(self) -> Result<String, PasswordError> {
        match self {
            Password::Hash(h) => Ok(h.to_string()),
            Password::Raw("") => Err(PasswordError::Empty),
            Password::Raw(s) => {
                let salt = SaltString::generate(&mut OsRng);
                Ok(Argon2::default()
                    .hash_password(s.as_bytes(), &salt)?
                    .to_string()
                )
            },
            Password::Misconfigured => Err(PasswordError::NotVerifiable),
        }
    }

    pub fn verify(&'a self, other: &Self) -> Result<(), PasswordError> {
        match (self, other) {
            (Password::Hash(hash), Password::Raw(raw)) |
            (Password::Raw(raw), Password::Hash(hash)) => {
                Argon2::default()
                    .verify_password(raw.as_bytes(), hash)
                    .map_err(|_| PasswordError::Wrong)
            },
            _ => Err(PasswordError::NotVerifiable)?,
        }
    }
}

/// A random alphanumeric password for accounts created without one.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod test {
    use crate::{
        error::PasswordError,
        password::{
            generate,
            Password,
        },
    };

    #[test]
    fn hash_and_verify() -> anyhow::Result<()> {
        let stored = Password::new("hunter22").to_database()?;
        assert!(stored.starts_with("$argon2"));
        assert!(!stored.contains("hunter22"));

        let hash = Password::from_database(&stored);
        assert!(matches!(hash, Password::Hash(_)));
        assert_eq!(hash.verify(&Password::new("hunter22")), Ok(()));
        assert_eq!(Password::new("hunter22").verify(&hash), Ok(()));
        assert_eq!(hash.verify(&Password::new("hunter2")), Err(PasswordError::Wrong));
        assert_eq!(
            Password::new("a").verify(&Password::new("a")),
            Err(PasswordError::NotVerifiable),
        );

        // salted, so hashing again never produces the same value
        assert_ne!(Password::new("hunter22").to_database()?, stored);
        // an existing hash is stored as is
        assert_eq!(Password::from_database(&stored).to_database()?, stored);
        Ok(())
    }

    #[test]
    fn misconfigured() {
        let stored = Password::from_database("not a hash");
        assert!(matches!(stored, Password::Misconfigured));
        assert_eq!(
            stored.verify(&Password::new("not a hash")),
            Err(PasswordError::NotVerifiable),
        );
        assert_eq!(Password::new("").to_database(), Err(PasswordError::Empty));
    }

    #[test]
    fn generated() {
        let password = generate();
        assert_eq!(password.len(), 10);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate(), password);
    }
}
