//! Fixed-point money amounts.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;

use crate::Error;

/// The maximum number of digits in an amount, including the decimal places.
pub const MAX_AMOUNT_DIGITS: u32 = 12;

/// The number of decimal places kept for an amount.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// A money amount with two decimal places, stored as a whole number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    /// Create an amount from a decimal value.
    ///
    /// Trailing zeros do not count towards the decimal places, so `1.500` is accepted.
    ///
    /// # Errors
    ///
    /// Returns [Error::AmountTooPrecise] if `value` has more than two decimal
    /// places, or [Error::AmountTooLarge] if it has more than twelve digits.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        let mut value = value.normalize();

        if value.scale() > AMOUNT_DECIMAL_PLACES {
            return Err(Error::AmountTooPrecise(AMOUNT_DECIMAL_PLACES));
        }

        let integer_digits = MAX_AMOUNT_DIGITS - AMOUNT_DECIMAL_PLACES;
        if value.abs() >= Decimal::from(10_i64.pow(integer_digits)) {
            return Err(Error::AmountTooLarge(MAX_AMOUNT_DIGITS));
        }

        value.rescale(AMOUNT_DECIMAL_PLACES);
        let cents =
            i64::try_from(value.mantissa()).map_err(|_| Error::AmountTooLarge(MAX_AMOUNT_DIGITS))?;

        Ok(Self(cents))
    }

    #[cfg(test)]
    pub(crate) fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a decimal with exactly two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, AMOUNT_DECIMAL_PLACES)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| Error::InvalidAmount)?;

        Amount::new(value)
    }
}

/// Formats with two decimal places, e.g. "1234.50".
impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{Error, cash_flow::Amount};

    #[test]
    fn parses_amount_with_cents() {
        assert_eq!("1234.56".parse::<Amount>(), Ok(Amount::from_cents(123_456)));
    }

    #[test]
    fn parses_whole_and_negative_amounts() {
        assert_eq!(" 42 ".parse::<Amount>(), Ok(Amount::from_cents(4_200)));
        assert_eq!("-0.5".parse::<Amount>(), Ok(Amount::from_cents(-50)));
    }

    #[test]
    fn ignores_trailing_zeros() {
        assert_eq!(Amount::new(dec!(1.500)), Ok(Amount::from_cents(150)));
    }

    #[test]
    fn rejects_text() {
        assert_eq!("twelve".parse::<Amount>(), Err(Error::InvalidAmount));
        assert_eq!("".parse::<Amount>(), Err(Error::InvalidAmount));
    }

    #[test]
    fn rejects_third_decimal_place() {
        assert_eq!(Amount::new(dec!(0.125)), Err(Error::AmountTooPrecise(2)));
    }

    #[test]
    fn accepts_largest_amount() {
        assert_eq!(
            Amount::new(dec!(9999999999.99)),
            Ok(Amount::from_cents(999_999_999_999))
        );
    }

    #[test]
    fn rejects_thirteen_digits() {
        assert_eq!(Amount::new(dec!(10000000000)), Err(Error::AmountTooLarge(12)));
        assert_eq!(Amount::new(dec!(-10000000000)), Err(Error::AmountTooLarge(12)));
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(Amount::from_cents(150).to_string(), "1.50");
        assert_eq!(Amount::from_cents(-7).to_string(), "-0.07");
    }
}
