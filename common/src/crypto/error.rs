use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("invalid public key bytes")]
    InvalidPublicKey,
    #[error("invalid private key bytes")]
    InvalidPrivateKey,
    #[error("invalid signature bytes")]
    InvalidSignature,
    #[error("invalid hash length, expected {expected}, got {got}")]
    InvalidHashLength { expected: usize, got: usize },
}
