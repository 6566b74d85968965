//! 钱包地址类型
//!
//! 地址由 Ed25519 公钥派生：取公钥字节 SHA-256 摘要的前 20 字节，
//! 以 `0x` 前缀的小写十六进制表示。

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 地址字节长度
pub const ADDRESS_LEN: usize = 20;

/// 钱包地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

/// 地址解析错误
#[derive(Debug, Error)]
pub enum AddressParseError {
    #[error("Address must start with 0x")]
    MissingPrefix,

    #[error("Invalid hex in address: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Address must be {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

impl Address {
    /// 从原始字节构造地址
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// 从 Ed25519 公钥派生地址
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[..ADDRESS_LEN]);
        Self(bytes)
    }

    /// 地址的原始字节
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or(AddressParseError::MissingPrefix)?;
        let bytes = hex::decode(hex_part)?;
        if bytes.len() != ADDRESS_LEN {
            return Err(AddressParseError::WrongLength {
                expected: ADDRESS_LEN,
                actual: bytes.len(),
            });
        }
        let mut array = [0u8; ADDRESS_LEN];
        array.copy_from_slice(&bytes);
        Ok(Self(array))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    #[test]
    fn test_roundtrip_display_parse() {
        let addr = Address::from_bytes([0xab; ADDRESS_LEN]);
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + ADDRESS_LEN * 2);
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn test_derivation_is_stable() {
        let key = SigningKey::generate(&mut OsRng);
        let a = Address::from_public_key(&key.verifying_key());
        let b = Address::from_public_key(&key.verifying_key());
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("abcdef".parse::<Address>().is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz".repeat(10).parse::<Address>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let addr = Address::from_bytes([1u8; ADDRESS_LEN]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
