//! Calldata encoding and call-result decoding.
//!
//! Layout: 4-byte selector, then arguments in order. Addresses are a u16
//! big-endian length followed by UTF-8 bytes; u256 values are 32 bytes
//! big-endian.

use sha2::{Digest, Sha256};

use crate::core::Amount;
use crate::error::RpcError;

/// First four bytes of `sha256(name)`, big-endian.
pub fn selector(name: &str) -> [u8; 4] {
    let digest = Sha256::digest(name.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata(Vec<u8>);

impl Calldata {
    pub fn new(method: &str) -> Self { Self(selector(method).to_vec()) }

    pub fn address(mut self, address: &str) -> Result<Self, RpcError> {
        let len = u16::try_from(address.len())
            .map_err(|_| RpcError::Encode(format!("address too long: {} bytes", address.len())))?;
        self.0.extend_from_slice(&len.to_be_bytes());
        self.0.extend_from_slice(address.as_bytes());
        Ok(self)
    }

    pub fn u256(mut self, amount: &Amount) -> Result<Self, RpcError> {
        let word = amount.to_u256_be().map_err(|e| RpcError::Encode(e.to_string()))?;
        self.0.extend_from_slice(&word);
        Ok(self)
    }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }
    pub fn into_bytes(self) -> Vec<u8> { self.0 }
}

/// Sequential reader over a decoded call result.
pub struct AbiReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> AbiReader<'a> {
    pub fn new(data: &'a [u8]) -> Self { Self { data, offset: 0 } }

    fn take(&mut self, n: usize) -> Result<&'a [u8], RpcError> {
        let end = self.offset.checked_add(n).filter(|end| *end <= self.data.len()).ok_or_else(|| {
            RpcError::Decode(format!(
                "result truncated: need {} bytes at offset {}, have {}",
                n,
                self.offset,
                self.data.len()
            ))
        })?;
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    pub fn read_u256(&mut self) -> Result<Amount, RpcError> {
        Ok(Amount::from_be_bytes(self.take(32)?))
    }

    pub fn read_address(&mut self) -> Result<String, RpcError> {
        let len_bytes = self.take(2)?;
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|e| RpcError::Decode(format!("address is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_sha256_prefix() {
        // sha256("") = e3b0c442...
        assert_eq!(selector(""), [0xe3, 0xb0, 0xc4, 0x42]);
        assert_ne!(selector("transfer"), selector("balanceOf"));
    }

    #[test]
    fn transfer_calldata_layout() {
        let data = Calldata::new("transfer").address("bcrt1pxyz").unwrap().u256(&Amount::from_sats(50_000_000)).unwrap();
        let bytes = data.as_bytes();
        assert_eq!(&bytes[..4], &selector("transfer"));
        assert_eq!(&bytes[4..6], &[0, 9]);
        assert_eq!(&bytes[6..15], b"bcrt1pxyz");
        assert_eq!(bytes.len(), 15 + 32);

        let mut reader = AbiReader::new(&bytes[4..]);
        assert_eq!(reader.read_address().unwrap(), "bcrt1pxyz");
        assert_eq!(reader.read_u256().unwrap(), Amount::from_sats(50_000_000));
    }

    #[test]
    fn short_result_is_a_decode_error() {
        let mut reader = AbiReader::new(&[0u8; 31]);
        assert!(matches!(reader.read_u256(), Err(RpcError::Decode(_))));
    }
}
