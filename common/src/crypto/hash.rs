use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::CryptoError;

pub const HASH_SIZE: usize = 32; // SHA-256, 256 bits

/// A SHA-256 digest, displayed and serialized as lower-case hex.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    pub const fn zero() -> Self {
        Hash([0u8; HASH_SIZE])
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Does this hash satisfy proof of work at the given difficulty
    /// (number of leading hex zero characters)?
    pub fn has_leading_zero_hex_chars(&self, difficulty: u32) -> bool {
        let needed = difficulty as usize;
        let hex = self.to_hex();
        hex.as_bytes()
            .iter()
            .take(needed)
            .all(|&b| b == b'0')
            && hex.len() >= needed
    }
}

/// SHA-256 over raw bytes.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut bytes = [0u8; HASH_SIZE];
    bytes.copy_from_slice(&digest);
    Hash(bytes)
}

impl FromStr for Hash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        if bytes.len() != HASH_SIZE {
            return Err(CryptoError::InvalidHashLength {
                expected: HASH_SIZE,
                got: bytes.len(),
            });
        }
        let mut array = [0u8; HASH_SIZE];
        array.copy_from_slice(&bytes);
        Ok(Hash(array))
    }
}

impl TryFrom<String> for Hash {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hash> for String {
    fn from(value: Hash) -> Self {
        value.to_hex()
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Hash({})", self.to_hex())
    }
}
