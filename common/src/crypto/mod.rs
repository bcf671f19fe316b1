pub mod error;
pub mod hash;
pub mod keys;

pub use error::CryptoError;
pub use hash::Hash;
pub use keys::{PrivateKey, PublicKey, Signature};

/// Anything with a canonical, content-derived identity.
pub trait Hashable {
    fn hash(&self) -> Hash;
}
