pub mod errors;
pub mod loader;

pub use errors::KeyLoadError;
pub use loader::KeyPair;
