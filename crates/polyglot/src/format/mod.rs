//! Value formatters: named providers and typed dispatch.
//!
//! Formatters turn values into locale-appropriate text. They come in two
//! flavors sharing one provider contract:
//!
//! - **Named** formatters (`number`, `money`, `date`, ...) are invoked
//!   explicitly in filter pipelines, optionally with a style argument.
//! - **Typed** formatters are registered against a [`ValueKind`] and run
//!   automatically over whatever value an expression produces, walking the
//!   kind's ancestor chain most-specific-first.
//!
//! Providers may read custom patterns out of the pack's own template tree
//! (`formats.<name>.<style>` → `formats.<name>.default` → `formats.<name>`),
//! so message authors can override formats per locale without code. Built
//! formatters are cached per resolved locale.

mod pattern;
mod providers;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::fallback::KeyGenerator;
use crate::filter::Filter;
use crate::render::{Expression, FilterContext, RenderError};
use crate::types::{Key, Locale, Path, Value, ValueKind};

pub use pattern::{DecimalPattern, DecimalSymbols, symbols_for};
pub use providers::{
    DateTimeFormatterProvider, MoneyFormatterProvider, NumberFormatterProvider,
};

/// An error raised while building or applying a formatter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unknown formatter '{name}'")]
    UnknownFormatter { name: String },

    #[error("formatter '{name}' does not support style '{style}'")]
    UnknownStyle { name: String, style: String },

    #[error("invalid format pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// A built formatter, ready to apply to values. Cheap to clone and share.
pub type ValueFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Builds formatters for one locale, optionally honoring a style.
pub trait FormatterProvider: Send + Sync {
    fn formatter(
        &self,
        templates: &LocaleTemplates<'_>,
        style: Option<&str>,
    ) -> Result<ValueFormatter, FormatError>;
}

/// Raw template text by key, with fallback-aware lookup.
///
/// Providers read their custom patterns from here; the store shares the
/// pack's key generator so pattern lookup follows the same fallback rules
/// as message lookup.
pub struct TemplateStore {
    templates: HashMap<Key, String>,
    keys: Arc<KeyGenerator>,
}

impl TemplateStore {
    pub(crate) fn new(templates: HashMap<Key, String>, keys: Arc<KeyGenerator>) -> Self {
        Self { templates, keys }
    }

    pub fn for_locale(&self, locale: &Locale) -> LocaleTemplates<'_> {
        LocaleTemplates {
            store: self,
            locale: locale.clone(),
        }
    }
}

/// A locale-bound view over the raw templates.
pub struct LocaleTemplates<'a> {
    store: &'a TemplateStore,
    locale: Locale,
}

impl LocaleTemplates<'_> {
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The template at `path`, following the fallback chain.
    pub fn find(&self, path: &Path) -> Option<&str> {
        let key = Key::new(self.locale.clone(), path.clone());
        for candidate in self.store.keys.keys(&key, &[]) {
            if let Some(template) = self.store.templates.get(&candidate) {
                return Some(template);
            }
        }
        None
    }

    /// The custom pattern for a named formatter, trying
    /// `formats.<name>.<style>`, `formats.<name>.default`, `formats.<name>`.
    pub fn style_template(&self, name: &str, style: Option<&str>) -> Option<&str> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(style) = style {
            candidates.push(Path::from_segments(["formats", name, style]));
        }
        candidates.push(Path::from_segments(["formats", name, "default"]));
        candidates.push(Path::from_segments(["formats", name]));
        for candidate in candidates {
            // Styles with non-path characters simply have no template.
            let Ok(path) = candidate else { continue };
            if let Some(template) = self.find(&path) {
                return Some(template);
            }
        }
        None
    }
}

type NamedCacheKey = (Locale, String, Option<String>);

/// Provider registries plus per-locale caches of built formatters.
pub struct FormatterRegistry {
    named: HashMap<String, Arc<dyn FormatterProvider>>,
    typed: HashMap<ValueKind, Arc<dyn FormatterProvider>>,
    store: TemplateStore,
    named_cache: Mutex<HashMap<NamedCacheKey, ValueFormatter>>,
    typed_cache: Mutex<HashMap<(Locale, ValueKind), Option<ValueFormatter>>>,
}

impl FormatterRegistry {
    pub(crate) fn new(
        named: HashMap<String, Arc<dyn FormatterProvider>>,
        typed: HashMap<ValueKind, Arc<dyn FormatterProvider>>,
        store: TemplateStore,
    ) -> Self {
        Self {
            named,
            typed,
            store,
            named_cache: Mutex::new(HashMap::new()),
            typed_cache: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn contains_named(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Build (or fetch the cached) named formatter for a resolved locale.
    pub(crate) fn by_name(
        &self,
        locale: &Locale,
        name: &str,
        style: Option<&str>,
    ) -> Result<ValueFormatter, FormatError> {
        let cache_key = (
            locale.clone(),
            name.to_string(),
            style.map(str::to_string),
        );
        if let Some(formatter) = self.named_cache.lock().get(&cache_key) {
            return Ok(Arc::clone(formatter));
        }
        let provider = self
            .named
            .get(name)
            .ok_or_else(|| FormatError::UnknownFormatter {
                name: name.to_string(),
            })?;
        let formatter = provider.formatter(&self.store.for_locale(locale), style)?;
        self.named_cache
            .lock()
            .insert(cache_key, Arc::clone(&formatter));
        Ok(formatter)
    }

    /// The typed formatter for a value kind, if one is registered anywhere
    /// along the kind's ancestor chain. Negative results are cached too.
    pub(crate) fn by_kind(
        &self,
        locale: &Locale,
        kind: ValueKind,
    ) -> Result<Option<ValueFormatter>, FormatError> {
        let cache_key = (locale.clone(), kind);
        if let Some(cached) = self.typed_cache.lock().get(&cache_key) {
            return Ok(cached.clone());
        }
        let mut built = None;
        for ancestor in kind.ancestors() {
            if let Some(provider) = self.typed.get(ancestor) {
                built = Some(provider.formatter(&self.store.for_locale(locale), None)?);
                break;
            }
        }
        self.typed_cache.lock().insert(cache_key, built.clone());
        Ok(built)
    }
}

/// Adapter exposing a named formatter as a pipeline filter, so templates
/// can write `{0 | date short}`.
pub(crate) struct FormatterFilter {
    name: String,
}

impl FormatterFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Filter for FormatterFilter {
    fn validate(&self, args: &[Expression]) -> Result<(), String> {
        if args.len() > 1 {
            return Err(format!(
                "expected at most one style argument, got {}",
                args.len()
            ));
        }
        Ok(())
    }

    fn apply(&self, ctx: FilterContext<'_, '_>) -> Result<Value, RenderError> {
        let style = match ctx.args().first() {
            Some(arg) => Some(ctx.resolve_to_string(arg)?),
            None => None,
        };
        let formatter =
            ctx.render()
                .pack
                .named_formatter(ctx.locale(), &self.name, style.as_deref())?;
        Ok(Value::Str(formatter(ctx.value())))
    }
}
