pub mod error;
pub mod input;
pub mod platform;

pub use platform::Platform;
