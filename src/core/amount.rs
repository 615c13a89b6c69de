//! Token amounts in base units (1 wBTC = 10^8 units). Never floating point.

use num::{BigUint, ToPrimitive, Zero};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::AmountError;

/// Fractional digits of one whole token.
pub const DECIMALS: usize = 8;
/// Fractional digits shown when formatting.
pub const DISPLAY_DECIMALS: usize = 7;

const UNIT: u64 = 100_000_000;
const DISPLAY_UNIT: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self { Self(BigUint::zero()) }

    pub fn from_sats(sats: u64) -> Self { Self(BigUint::from(sats)) }

    pub fn from_biguint(value: BigUint) -> Self { Self(value) }

    /// Decode an unsigned big-endian integer (u256 call results).
    pub fn from_be_bytes(bytes: &[u8]) -> Self { Self(BigUint::from_bytes_be(bytes)) }

    pub fn as_biguint(&self) -> &BigUint { &self.0 }

    pub fn is_zero(&self) -> bool { self.0.is_zero() }

    /// Parse a decimal token string into base units, truncating toward zero.
    ///
    /// Digits past the eighth fractional place are dropped, matching
    /// `floor(value * 10^8)`. Dropping a non-zero remainder is logged.
    pub fn parse_btc(text: &str) -> Result<Self, AmountError> {
        let trimmed = text.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if unsigned.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
            return Err(AmountError::Invalid(text.to_string()));
        }

        let kept = &frac[..frac.len().min(DECIMALS)];
        if frac.len() > DECIMALS && frac[DECIMALS..].bytes().any(|b| b != b'0') {
            tracing::warn!(input = %text, "sub-unit precision dropped from amount");
        }

        let mut digits = String::with_capacity(whole.len() + DECIMALS);
        digits.push_str(whole);
        digits.push_str(kept);
        digits.extend(std::iter::repeat('0').take(DECIMALS - kept.len()));

        BigUint::parse_bytes(digits.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| AmountError::Invalid(text.to_string()))
    }

    /// Whole-token string: rounded half-up to 7 places, trailing zeros
    /// trimmed, no decimal point for integral values.
    pub fn to_btc_string(&self) -> String {
        let unit = BigUint::from(UNIT);
        let mut whole = &self.0 / &unit;
        let frac = (&self.0 % &unit).to_u64().unwrap_or(0);

        let mut shown = frac / 10;
        if frac % 10 >= 5 {
            shown += 1;
        }
        if shown == DISPLAY_UNIT {
            whole += 1u32;
            shown = 0;
        }

        let mut out = whole.to_str_radix(10);
        if shown != 0 {
            let padded = format!("{:0width$}", shown, width = DISPLAY_DECIMALS);
            out.push('.');
            out.push_str(padded.trim_end_matches('0'));
        }
        out
    }

    /// 32-byte big-endian encoding for u256 calldata arguments.
    pub fn to_u256_be(&self) -> Result<[u8; 32], AmountError> {
        let bytes = self.0.to_bytes_be();
        if bytes.len() > 32 {
            return Err(AmountError::Overflow);
        }
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        Ok(out)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(sats: u64) -> Self { Self::from_sats(sats) }
}

/// Serialized as a decimal string of base units so u256 values survive JSON.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_tokens() {
        assert_eq!(Amount::parse_btc("0.5").unwrap(), Amount::from_sats(50_000_000));
        assert_eq!(Amount::parse_btc("2.0").unwrap(), Amount::from_sats(200_000_000));
        assert_eq!(Amount::parse_btc("1").unwrap(), Amount::from_sats(100_000_000));
        assert_eq!(Amount::parse_btc(".25").unwrap(), Amount::from_sats(25_000_000));
        assert_eq!(Amount::parse_btc("3.").unwrap(), Amount::from_sats(300_000_000));
        assert_eq!(Amount::parse_btc(" +0.00000001 ").unwrap(), Amount::from_sats(1));
    }

    #[test]
    fn truncates_sub_unit_digits() {
        assert_eq!(Amount::parse_btc("0.123456789").unwrap(), Amount::from_sats(12_345_678));
        assert_eq!(Amount::parse_btc("0.000000019").unwrap(), Amount::from_sats(1));
        assert_eq!(Amount::parse_btc("0.000000009").unwrap(), Amount::zero());
    }

    #[test]
    fn exact_where_floats_drift() {
        // floor(0.29 * 1e8) is 28999999 in binary floating point
        assert_eq!(Amount::parse_btc("0.29").unwrap(), Amount::from_sats(29_000_000));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Amount::parse_btc(""), Err(AmountError::Empty));
        assert_eq!(Amount::parse_btc("   "), Err(AmountError::Empty));
        for bad in ["-1", "abc", "1e-3", "1.2.3", ".", "1,5", "0x10"] {
            assert!(matches!(Amount::parse_btc(bad), Err(AmountError::Invalid(_))), "{bad}");
        }
    }

    #[test]
    fn formats_with_trimmed_zeros() {
        assert_eq!(Amount::from_sats(100_000_000).to_btc_string(), "1");
        assert_eq!(Amount::from_sats(50_000_000).to_btc_string(), "0.5");
        assert_eq!(Amount::from_sats(125_000_000).to_btc_string(), "1.25");
        assert_eq!(Amount::from_sats(105_000_000).to_btc_string(), "1.05");
        assert_eq!(Amount::from_sats(10).to_btc_string(), "0.0000001");
        assert_eq!(Amount::zero().to_btc_string(), "0");
    }

    #[test]
    fn formatting_rounds_eighth_digit() {
        assert_eq!(Amount::from_sats(1).to_btc_string(), "0");
        assert_eq!(Amount::from_sats(5).to_btc_string(), "0.0000001");
        assert_eq!(Amount::from_sats(199_999_995).to_btc_string(), "2");
    }

    #[test]
    fn whole_unit_round_trips_are_exact() {
        for sats in [0u64, 10, 1_230, 50_000_000, 100_000_000, 2_100_000_000_000_000] {
            let amount = Amount::from_sats(sats);
            assert_eq!(Amount::parse_btc(&amount.to_btc_string()).unwrap(), amount);
        }
    }

    #[test]
    fn u256_encoding() {
        let bytes = Amount::from_sats(0x0102).to_u256_be().unwrap();
        assert_eq!(bytes[30..], [0x01, 0x02]);
        assert!(bytes[..30].iter().all(|b| *b == 0));
        assert_eq!(Amount::from_be_bytes(&bytes), Amount::from_sats(0x0102));

        let too_big = Amount::from_biguint(BigUint::from(1u8) << 256usize);
        assert_eq!(too_big.to_u256_be(), Err(AmountError::Overflow));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Amount::from_sats(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
