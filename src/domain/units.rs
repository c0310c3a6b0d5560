//! Conversion between ether amounts as people type them and wei.

use thiserror::Error;

/// An amount of currency in wei, the smallest unit.
pub type Amount = u128;

pub const ETHER_DECIMALS: usize = 18;
pub const WEI_PER_ETHER: Amount = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("Amount is empty")]
    Empty,
    #[error("Invalid character {0:?} in amount")]
    InvalidCharacter(char),
    #[error("Amount has more than 18 fractional digits")]
    TooPrecise,
    #[error("Amount does not fit in 128 bits of wei")]
    Overflow,
}

/// Parses a decimal ether amount such as `"1"` or `"0.5"` into wei.
pub fn parse_ether(input: &str) -> Result<Amount, UnitError> {
    let input = input.trim();
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitError::Empty);
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(UnitError::TooPrecise);
    }

    let whole_wei = parse_digits(whole)?
        .checked_mul(WEI_PER_ETHER)
        .ok_or(UnitError::Overflow)?;
    let scale = 10u128.pow((ETHER_DECIMALS - fraction.len()) as u32);
    let fraction_wei = parse_digits(fraction)? * scale;

    whole_wei.checked_add(fraction_wei).ok_or(UnitError::Overflow)
}

/// Formats wei as a decimal ether amount without trailing zeros.
pub fn format_ether(wei: Amount) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = ETHER_DECIMALS);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

fn parse_digits(digits: &str) -> Result<Amount, UnitError> {
    digits.chars().try_fold(0u128, |acc, c| {
        let digit = c.to_digit(10).ok_or(UnitError::InvalidCharacter(c))?;
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(digit as Amount))
            .ok_or(UnitError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_whole_and_fractional_ether() {
        assert_eq!(parse_ether("1"), Ok(WEI_PER_ETHER));
        assert_eq!(parse_ether("0.5"), Ok(WEI_PER_ETHER / 2));
        assert_eq!(parse_ether(".25"), Ok(WEI_PER_ETHER / 4));
        assert_eq!(parse_ether(" 2. "), Ok(2 * WEI_PER_ETHER));
        assert_eq!(parse_ether("0.000000000000000001"), Ok(1));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_ether(""), Err(UnitError::Empty));
        assert_eq!(parse_ether("."), Err(UnitError::Empty));
        assert_eq!(parse_ether("-1"), Err(UnitError::InvalidCharacter('-')));
        assert_eq!(parse_ether("1.2.3"), Err(UnitError::InvalidCharacter('.')));
        assert_eq!(parse_ether("0.0000000000000000001"), Err(UnitError::TooPrecise));
        assert_eq!(parse_ether("999999999999999999999999"), Err(UnitError::Overflow));
    }

    #[test]
    fn formats_like_a_wallet() {
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(WEI_PER_ETHER), "1");
        assert_eq!(format_ether(WEI_PER_ETHER / 2), "0.5");
        assert_eq!(format_ether(1), "0.000000000000000001");
        assert_eq!(format_ether(3 * WEI_PER_ETHER + 250_000_000_000_000_000), "3.25");
    }

    proptest! {
        #[test]
        fn formatted_amounts_parse_back(wei in any::<u64>().prop_map(Amount::from)) {
            prop_assert_eq!(parse_ether(&format_ether(wei)), Ok(wei));
        }

        #[test]
        fn whole_ether_scales_by_decimals(ether in 0u64..1_000_000) {
            prop_assert_eq!(parse_ether(&ether.to_string()), Ok(Amount::from(ether) * WEI_PER_ETHER));
        }
    }
}
