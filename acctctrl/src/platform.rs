use acctac::encoder::CredentialEncoder;
use acctcore::platform::AccountPlatform;
use std::sync::Arc;

/// The account administration platform.
///
/// Every write that carries a new secret goes through the credential
/// synchronizer before the single backend write.
#[derive(Clone)]
pub struct Platform {
    backend: Arc<dyn AccountPlatform>,
    encoder: Arc<dyn CredentialEncoder>,
}

mod builder;
mod impls;

pub use builder::Builder;
