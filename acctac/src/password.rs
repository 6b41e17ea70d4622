use argon2::password_hash::PasswordHash;

/// A web-login password, either as submitted or as stored.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum Password<'a> {
    /// The stored value could not be parsed as a password hash.
    Misconfigured,
    Hash(PasswordHash<'a>),
    Raw(&'a str),
}

/// Length of generated passwords for accounts created without one.
pub const GENERATED_LENGTH: usize = 10;

mod impls;
pub use impls::generate;
