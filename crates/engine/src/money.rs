use std::fmt;

use crate::Currency;

/// A signed amount in **minor units** tagged with its currency.
///
/// Balances, deltas and transaction amounts are always integers; this type
/// only exists to render them for humans.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(7_500, Currency::Php);
/// assert_eq!(amount.to_string(), "75.00 PHP");
/// assert_eq!(Money::new(-1, Currency::Php).to_string(), "-0.01 PHP");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    #[must_use]
    pub const fn new(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.minor
    }

    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let digits = u32::from(self.currency.minor_units());
        let scale = 10u64.pow(digits);
        let abs = self.minor.unsigned_abs();
        let major = abs / scale;
        let fraction = abs % scale;
        let width = digits as usize;
        write!(
            f,
            "{sign}{major}.{fraction:0width$} {}",
            self.currency.code()
        )
    }
}
