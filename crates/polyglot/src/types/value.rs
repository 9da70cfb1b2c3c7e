//! Runtime argument values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::types::money::Money;

/// A runtime value passed as a message argument.
///
/// Values are what filters receive and what typed formatters dispatch on.
/// Conversion from common Rust types goes through `From` impls so call sites
/// can pass plain literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    Money(Money),
}

/// The kind of a [`Value`], used as a formatter and transformer dispatch key.
///
/// Kinds form a small fixed hierarchy: `Int` and `Float` are `Number`s, the
/// date-like kinds are `Temporal`, and everything is `Any`. Dispatch walks
/// [`ValueKind::ancestors`] most-specific-first and takes the first
/// registered entry, replacing a runtime type-hierarchy search with an
/// explicit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Int,
    Float,
    Str,
    Date,
    Time,
    DateTime,
    Instant,
    Money,
    Number,
    Temporal,
    Any,
}

impl ValueKind {
    /// The dispatch chain for this kind, starting with the kind itself.
    pub fn ancestors(self) -> &'static [ValueKind] {
        match self {
            ValueKind::Int => &[ValueKind::Int, ValueKind::Number, ValueKind::Any],
            ValueKind::Float => &[ValueKind::Float, ValueKind::Number, ValueKind::Any],
            ValueKind::Str => &[ValueKind::Str, ValueKind::Any],
            ValueKind::Date => &[ValueKind::Date, ValueKind::Temporal, ValueKind::Any],
            ValueKind::Time => &[ValueKind::Time, ValueKind::Temporal, ValueKind::Any],
            ValueKind::DateTime => &[ValueKind::DateTime, ValueKind::Temporal, ValueKind::Any],
            ValueKind::Instant => &[ValueKind::Instant, ValueKind::Temporal, ValueKind::Any],
            ValueKind::Money => &[ValueKind::Money, ValueKind::Any],
            ValueKind::Number => &[ValueKind::Number, ValueKind::Any],
            ValueKind::Temporal => &[ValueKind::Temporal, ValueKind::Any],
            ValueKind::Any => &[ValueKind::Any],
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "dateTime",
            ValueKind::Instant => "instant",
            ValueKind::Money => "money",
            ValueKind::Number => "number",
            ValueKind::Temporal => "temporal",
            ValueKind::Any => "any",
        };
        write!(f, "{name}")
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Instant(_) => ValueKind::Instant,
            Value::Money(_) => ValueKind::Money,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Money(_))
    }

    /// The value as an integer, if it has an exact integral reading.
    ///
    /// Strings are parsed; floats and money amounts qualify only when their
    /// fractional part is zero.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Money(m) if m.amount().fract() == 0.0 => Some(m.amount() as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Money(m) => Some(m.amount()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Instant(i) => write!(f, "{i}"),
            Value::Money(m) => write!(f, "{m}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Instant(value)
    }
}

impl From<Money> for Value {
    fn from(value: Money) -> Self {
        Value::Money(value)
    }
}
