//! Formatting-locale resolution.

use std::collections::HashSet;

use crate::cache::LruCache;
use crate::types::Locale;

/// Resolved-locale cache size. Resolution walks a short generalization
/// chain, so the cache exists to skip repeated walks for hot locales, not
/// because the walk is expensive.
const RESOLVED_LOCALE_CACHE_CAPACITY: usize = 128;

/// Maps a requested locale onto one that actually has templates.
///
/// Formatters look up their patterns in the template tree; formatting with
/// the raw requested locale would miss every pattern when that locale has
/// no templates of its own. Resolution walks the generalization chain to
/// the closest available locale, then falls back to the default locale,
/// then gives up and keeps the requested one.
pub struct LocaleResolver {
    available: HashSet<Locale>,
    default_locale: Option<Locale>,
    cache: LruCache<Locale, Locale>,
}

impl LocaleResolver {
    pub fn new(
        available: impl IntoIterator<Item = Locale>,
        default_locale: Option<Locale>,
    ) -> Self {
        Self {
            available: available.into_iter().collect(),
            default_locale,
            cache: LruCache::new(RESOLVED_LOCALE_CACHE_CAPACITY),
        }
    }

    pub fn resolve(&self, locale: &Locale) -> Locale {
        if self.available.contains(locale) {
            return locale.clone();
        }
        self.cache
            .get_or_insert_with(locale.clone(), || self.resolve_uncached(locale))
    }

    fn resolve_uncached(&self, locale: &Locale) -> Locale {
        let mut current = locale.generalize();
        while let Some(candidate) = current {
            if self.available.contains(&candidate) {
                return candidate;
            }
            current = candidate.generalize();
        }
        self.default_locale
            .clone()
            .unwrap_or_else(|| locale.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    #[test]
    fn available_locales_resolve_to_themselves() {
        let resolver = LocaleResolver::new([locale("en"), locale("pl-PL")], None);
        assert_eq!(resolver.resolve(&locale("pl-PL")), locale("pl-PL"));
    }

    #[test]
    fn generalizes_to_closest_available() {
        let resolver = LocaleResolver::new([locale("en")], Some(locale("pl")));
        assert_eq!(resolver.resolve(&locale("en-US")), locale("en"));
    }

    #[test]
    fn unavailable_chain_falls_back_to_default() {
        let resolver = LocaleResolver::new([locale("en")], Some(locale("pl")));
        assert_eq!(resolver.resolve(&locale("fr-FR")), locale("pl"));
    }

    #[test]
    fn no_default_keeps_requested_locale() {
        let resolver = LocaleResolver::new([locale("en")], None);
        assert_eq!(resolver.resolve(&locale("fr")), locale("fr"));
    }
}
