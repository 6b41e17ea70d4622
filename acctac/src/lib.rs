pub mod encoder;
pub mod error;
pub mod mailpw;
pub mod password;
pub mod sync;

pub use encoder::{CredentialEncoder, DoveadmEncoder};
