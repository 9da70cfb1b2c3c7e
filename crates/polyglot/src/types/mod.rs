//! Core value types shared across the crate.

pub mod key;
pub mod locale;
pub mod money;
pub mod path;
pub mod value;

pub use key::Key;
pub use locale::{Locale, LocaleError};
pub use money::{Currency, Money, MoneyError};
pub use path::{Path, PathError};
pub use value::{Value, ValueKind};
