//! Monetary amounts with ISO-4217 currencies.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("invalid currency code '{code}'")]
    InvalidCurrency { code: String },
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },
    #[error("could not parse money value '{text}'")]
    InvalidAmount { text: String },
}

/// An ISO-4217 currency code with its conventional fraction digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    code: [u8; 3],
    fraction_digits: u8,
}

impl Currency {
    pub const USD: Currency = Currency::known(*b"USD", 2);
    pub const EUR: Currency = Currency::known(*b"EUR", 2);
    pub const GBP: Currency = Currency::known(*b"GBP", 2);
    pub const PLN: Currency = Currency::known(*b"PLN", 2);
    pub const CHF: Currency = Currency::known(*b"CHF", 2);
    pub const JPY: Currency = Currency::known(*b"JPY", 0);
    pub const CNY: Currency = Currency::known(*b"CNY", 2);
    pub const CAD: Currency = Currency::known(*b"CAD", 2);
    pub const AUD: Currency = Currency::known(*b"AUD", 2);
    pub const SEK: Currency = Currency::known(*b"SEK", 2);
    pub const NOK: Currency = Currency::known(*b"NOK", 2);

    const KNOWN: [Currency; 11] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::PLN,
        Currency::CHF,
        Currency::JPY,
        Currency::CNY,
        Currency::CAD,
        Currency::AUD,
        Currency::SEK,
        Currency::NOK,
    ];

    const fn known(code: [u8; 3], fraction_digits: u8) -> Self {
        Self {
            code,
            fraction_digits,
        }
    }

    /// Parse a three-letter currency code. Unknown codes are accepted with
    /// two fraction digits.
    pub fn parse(code: &str) -> Result<Self, MoneyError> {
        let error = || MoneyError::InvalidCurrency {
            code: code.to_string(),
        };
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(error());
        }
        let mut upper = [0u8; 3];
        for (dst, src) in upper.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }
        for currency in Currency::KNOWN {
            if currency.code == upper {
                return Ok(currency);
            }
        }
        Ok(Currency {
            code: upper,
            fraction_digits: 2,
        })
    }

    pub fn code(&self) -> &str {
        // Codes are validated ASCII on construction.
        str::from_utf8(&self.code).unwrap_or("???")
    }

    pub fn fraction_digits(&self) -> u8 {
        self.fraction_digits
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::parse(&code).map_err(D::Error::custom)
    }
}

/// A currency-tagged amount.
///
/// Arithmetic is guarded by same-currency checks; mixing currencies is an
/// error, never a silent conversion.
///
/// # Example
///
/// ```
/// use polyglot::{Currency, Money};
///
/// let price = Money::new(12.5, Currency::USD);
/// let total = price.add(Money::new(2.5, Currency::USD)).unwrap();
/// assert_eq!(total.to_string(), "15.00 USD");
/// assert!(price.add(Money::new(1.0, Currency::EUR)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Money {
    amount: f64,
    currency: Currency,
}

impl Money {
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Parse `"12.50 USD"` or `"USD 12.50"`.
    pub fn parse(text: &str) -> Result<Self, MoneyError> {
        let error = || MoneyError::InvalidAmount {
            text: text.to_string(),
        };
        let mut parts = text.split_whitespace();
        let (first, second) = match (parts.next(), parts.next(), parts.next()) {
            (Some(first), Some(second), None) => (first, second),
            _ => return Err(error()),
        };
        let (amount, code) = if first.as_bytes().first().is_some_and(u8::is_ascii_alphabetic) {
            (second, first)
        } else {
            (first, second)
        };
        let amount: f64 = amount.parse().map_err(|_| error())?;
        Ok(Money::new(amount, Currency::parse(code)?))
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0.0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0.0
    }

    pub fn add(&self, other: Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    pub fn subtract(&self, other: Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount - other.amount, self.currency))
    }

    fn check_currency(&self, other: Money) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = usize::from(self.currency.fraction_digits());
        write!(f, "{:.digits$} {}", self.amount, self.currency)
    }
}
