//! Fallback key generation.
//!
//! A requested key expands into an ordered candidate list by composing two
//! independent strategies: path-prefix expansion and locale generalization.
//! The list is locale-major: every path candidate is tried under the exact
//! locale before the locale generalizes, so a prefixed match in the
//! requested locale beats an exact-path match in a fallback locale.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::{Key, Locale, Path};

/// How locales expand into a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleFallback {
    /// Only the requested locale.
    Strict,
    /// The requested locale, its generalizations, then the default locale
    /// and its generalizations.
    Relaxed { default_locale: Option<Locale> },
}

/// How paths expand under the active prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFallback {
    /// Anchor to the most specific prefix only.
    Strict,
    /// Every active prefix in order, then the bare path.
    Relaxed,
}

/// Expands a requested key into its ordered fallback candidates.
///
/// Locale chains are memoized per requested locale; candidate lists are
/// deduplicated preserving first occurrence.
pub struct KeyGenerator {
    locale_fallback: LocaleFallback,
    path_fallback: PathFallback,
    global_prefixes: Vec<Path>,
    locale_chains: Mutex<HashMap<Locale, Arc<Vec<Locale>>>>,
}

impl KeyGenerator {
    pub fn new(
        locale_fallback: LocaleFallback,
        path_fallback: PathFallback,
        global_prefixes: Vec<Path>,
    ) -> Self {
        Self {
            locale_fallback,
            path_fallback,
            global_prefixes,
            locale_chains: Mutex::new(HashMap::new()),
        }
    }

    /// Ordered candidate keys for `key` under the given view prefixes.
    pub fn keys(&self, key: &Key, prefixes: &[Path]) -> Vec<Key> {
        let paths = self.paths(key.path(), prefixes);
        let locales = self.locales(key.locale());
        let mut out: Vec<Key> = Vec::with_capacity(paths.len() * locales.len());
        for locale in locales.iter() {
            for path in &paths {
                let candidate = Key::new(locale.clone(), path.clone());
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
        out
    }

    fn paths(&self, path: &Path, prefixes: &[Path]) -> Vec<Path> {
        match self.path_fallback {
            PathFallback::Strict => {
                let anchor = prefixes.first().or_else(|| self.global_prefixes.first());
                match anchor {
                    Some(prefix) => vec![prefix.child(path)],
                    None => vec![path.clone()],
                }
            }
            PathFallback::Relaxed => {
                let mut out: Vec<Path> = Vec::with_capacity(
                    prefixes.len() + self.global_prefixes.len() + 1,
                );
                for prefix in prefixes.iter().chain(&self.global_prefixes) {
                    let candidate = prefix.child(path);
                    if !out.contains(&candidate) {
                        out.push(candidate);
                    }
                }
                if !out.contains(path) {
                    out.push(path.clone());
                }
                out
            }
        }
    }

    fn locales(&self, locale: &Locale) -> Arc<Vec<Locale>> {
        if let Some(chain) = self.locale_chains.lock().get(locale) {
            return Arc::clone(chain);
        }
        let chain = Arc::new(self.build_locale_chain(locale));
        self.locale_chains
            .lock()
            .insert(locale.clone(), Arc::clone(&chain));
        chain
    }

    fn build_locale_chain(&self, locale: &Locale) -> Vec<Locale> {
        match &self.locale_fallback {
            LocaleFallback::Strict => vec![locale.clone()],
            LocaleFallback::Relaxed { default_locale } => {
                let mut chain = Vec::new();
                push_generalizations(&mut chain, locale);
                if let Some(default) = default_locale {
                    push_generalizations(&mut chain, default);
                }
                chain
            }
        }
    }
}

fn push_generalizations(chain: &mut Vec<Locale>, locale: &Locale) {
    let mut current = Some(locale.clone());
    while let Some(candidate) = current {
        current = candidate.generalize();
        if !chain.contains(&candidate) {
            chain.push(candidate);
        }
    }
}
