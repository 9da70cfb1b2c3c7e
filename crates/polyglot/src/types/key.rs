//! Locale-qualified message keys.

use serde::{Deserialize, Serialize};

use crate::types::locale::Locale;
use crate::types::path::Path;

/// A `(locale, path)` pair identifying one stored template.
///
/// Keys are immutable; the `with_*` methods derive copies. The fallback key
/// generator produces ordered candidate keys from a requested one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    locale: Locale,
    path: Path,
}

impl Key {
    pub fn new(locale: Locale, path: Path) -> Self {
        Self { locale, path }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn with_locale(&self, locale: Locale) -> Key {
        Key {
            locale,
            path: self.path.clone(),
        }
    }

    pub fn with_path(&self, path: Path) -> Key {
        Key {
            locale: self.locale.clone(),
            path,
        }
    }

    /// The key with `prefix` prepended to its path.
    pub fn prefixed(&self, prefix: &Path) -> Key {
        self.with_path(prefix.child(&self.path))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.locale, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_copies_without_mutation() {
        let key = Key::new(Locale::new("en"), Path::parse("a.b").unwrap());
        let moved = key.with_locale(Locale::new("pl"));
        assert_eq!(key.locale(), &Locale::new("en"));
        assert_eq!(moved.locale(), &Locale::new("pl"));
        assert_eq!(moved.path(), key.path());
    }

    #[test]
    fn prefixed_prepends_path() {
        let key = Key::new(Locale::new("en"), Path::parse("msg").unwrap());
        let prefixed = key.prefixed(&Path::parse("mails").unwrap());
        assert_eq!(prefixed.path().as_str(), "mails.msg");
    }
}
