//! Locale and path fallback strategies.

mod keys;
mod locales;

pub use keys::{KeyGenerator, LocaleFallback, PathFallback};
pub use locales::LocaleResolver;
