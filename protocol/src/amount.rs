//! # Amounts
//!
//! Every quantity on the ledger is an [`Amount`]: an unsigned 128-bit count
//! of base units. There is no floating point anywhere near balances. A whole
//! token is `10^decimals` base units; [`format_units`] and [`parse_units`]
//! convert between the two for humans.
//!
//! On the wire amounts are written as decimal strings. JSON numbers lose
//! precision past 2^53 in most consumers, and an 18-decimal token crosses
//! that at a handful of whole tokens. See [`decimal_str`].

use thiserror::Error;

/// A quantity of base units.
pub type Amount = u128;

/// Errors from parsing a human-entered token quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Nothing to parse.
    #[error("empty amount")]
    Empty,

    /// A character other than an ASCII digit or a single decimal point.
    #[error("invalid amount '{0}': expected digits with at most one '.'")]
    InvalidFormat(String),

    /// More fractional digits than the token has decimals.
    #[error("too many decimal places: token supports at most {max}")]
    TooManyDecimals {
        /// The token's decimal precision.
        max: u8,
    },

    /// The scaled value does not fit in an [`Amount`].
    #[error("amount '{0}' does not fit in 128 bits")]
    Overflow(String),
}

/// Render `amount` base units as a decimal token quantity.
///
/// Trailing fractional zeros are trimmed; whole quantities have no point.
///
/// ```
/// use ledger_protocol::amount::format_units;
///
/// assert_eq!(format_units(1_500_000_000_000_000_000, 18), "1.5");
/// assert_eq!(format_units(100, 2), "1");
/// assert_eq!(format_units(7, 0), "7");
/// ```
pub fn format_units(amount: Amount, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let divisor = 10u128.pow(decimals as u32);
    let whole = amount / divisor;
    let frac = amount % divisor;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Parse a decimal token quantity (`"12"`, `"0.25"`, `".5"`) into base units.
///
/// # Errors
///
/// Returns [`AmountError`] for empty input, stray characters, more fractional
/// digits than `decimals`, or a result wider than 128 bits.
pub fn parse_units(input: &str, decimals: u8) -> Result<Amount, AmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(AmountError::InvalidFormat(s.to_string()));
    }
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) {
        return Err(AmountError::InvalidFormat(s.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals { max: decimals });
    }

    let overflow = || AmountError::Overflow(s.to_string());
    let scale = 10u128.pow(decimals as u32);
    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<Amount>().map_err(|_| overflow())?
    };
    let frac_units = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse::<Amount>().map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Serde helper: write an [`Amount`] as a decimal string, read it back from
/// either a string or a JSON integer.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Entry {
///     #[serde(with = "ledger_protocol::amount::decimal_str")]
///     amount: Amount,
/// }
/// ```
pub mod decimal_str {
    use super::Amount;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string of base units")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(v as Amount)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Amount::try_from(v).map_err(|_| E::custom(format!("negative amount: {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
                return Err(E::custom(format!("invalid amount string: '{}'", v)));
            }
            v.parse::<Amount>()
                .map_err(|_| E::custom(format!("amount out of range: '{}'", v)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapped {
        #[serde(with = "decimal_str")]
        amount: Amount,
    }

    #[test]
    fn format_trims_fraction() {
        assert_eq!(format_units(0, 18), "0");
        assert_eq!(format_units(1, 18), "0.000000000000000001");
        assert_eq!(format_units(90 * 10u128.pow(18), 18), "90");
        assert_eq!(format_units(1050, 2), "10.5");
    }

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(parse_units("100", 18).unwrap(), 100 * 10u128.pow(18));
        assert_eq!(parse_units("0.5", 2).unwrap(), 50);
        assert_eq!(parse_units(".25", 2).unwrap(), 25);
        assert_eq!(parse_units(" 7 ", 0).unwrap(), 7);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_units("", 18), Err(AmountError::Empty));
        assert!(matches!(parse_units("1.2.3", 18), Err(AmountError::InvalidFormat(_))));
        assert!(matches!(parse_units("-4", 18), Err(AmountError::InvalidFormat(_))));
        assert!(matches!(parse_units(".", 18), Err(AmountError::InvalidFormat(_))));
        assert_eq!(
            parse_units("0.001", 2),
            Err(AmountError::TooManyDecimals { max: 2 })
        );
    }

    #[test]
    fn parse_rejects_overflow() {
        let too_big = "1000000000000000000000000000000";
        assert!(matches!(parse_units(too_big, 18), Err(AmountError::Overflow(_))));
    }

    #[test]
    fn format_parse_agree() {
        let amount = 123_456_789_000_000_000_001;
        assert_eq!(parse_units(&format_units(amount, 18), 18).unwrap(), amount);
    }

    #[test]
    fn decimal_str_writes_strings() {
        let json = serde_json::to_string(&Wrapped { amount: u128::MAX }).unwrap();
        assert_eq!(json, format!("{{\"amount\":\"{}\"}}", u128::MAX));
    }

    #[test]
    fn decimal_str_reads_strings_and_numbers() {
        let a: Wrapped = serde_json::from_str(r#"{"amount":"42"}"#).unwrap();
        let b: Wrapped = serde_json::from_str(r#"{"amount":42}"#).unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":"-1"}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":-1}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":"1e3"}"#).is_err());
    }
}
