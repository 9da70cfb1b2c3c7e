//! Message packs: the user-facing rendering surface.

mod builder;
mod reloadable;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::args::ArgumentResolver;
use crate::cache::LruCache;
use crate::fallback::{KeyGenerator, LocaleResolver};
use crate::filter::FilterRegistry;
use crate::format::{FormatterRegistry, ValueFormatter};
use crate::parser::ParseError;
use crate::render::compiler::Compiler;
use crate::render::evaluator;
use crate::render::{CompiledTemplate, RenderContext, RenderError};
use crate::types::{Key, Locale, Path, PathError, Value};

pub use builder::{MessageBundle, MessagePackBuilder};
pub use reloadable::ReloadableMessagePack;

/// An error raised while building a message pack.
///
/// Construction is fail-fast: any bad template, dangling reference or
/// reference cycle aborts the build before a pack exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("template {key} failed to parse: {source}")]
    Parse {
        key: Key,
        #[source]
        source: ParseError,
    },

    #[error("missing reference '{path}' in template {key}")]
    MissingReference { key: Key, path: Path },

    #[error("reference cycle detected in template {key}")]
    ReferenceCycleDetected { key: Key },

    #[error("invalid reference '{text}' in template {key}")]
    InvalidReference { key: Key, text: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// What `render` does when no template matches the key or any fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedMessagePolicy {
    /// Surface [`RenderError::UnresolvedMessage`].
    #[default]
    Fail,
    /// Render the literal path string, so missing translations are visible
    /// but not fatal.
    PathEcho,
}

/// Everything a built pack owns. Shared immutably behind an `Arc`; the
/// interior mutability is confined to the caches.
pub(crate) struct PackCore {
    templates: HashMap<Key, Arc<CompiledTemplate>>,
    key_generator: Arc<KeyGenerator>,
    locale_resolver: LocaleResolver,
    filters: FilterRegistry,
    formatters: FormatterRegistry,
    args: ArgumentResolver,
    policy: UnresolvedMessagePolicy,
    expression_cache: LruCache<String, Arc<CompiledTemplate>>,
    max_reference_depth: usize,
}

impl PackCore {
    #[expect(clippy::too_many_arguments, reason = "assembled once by the builder")]
    pub(crate) fn new(
        templates: HashMap<Key, Arc<CompiledTemplate>>,
        key_generator: Arc<KeyGenerator>,
        locale_resolver: LocaleResolver,
        filters: FilterRegistry,
        formatters: FormatterRegistry,
        args: ArgumentResolver,
        policy: UnresolvedMessagePolicy,
        expression_cache_capacity: usize,
        max_reference_depth: usize,
    ) -> Self {
        Self {
            templates,
            key_generator,
            locale_resolver,
            filters,
            formatters,
            args,
            policy,
            expression_cache: LruCache::new(expression_cache_capacity),
            max_reference_depth,
        }
    }

    pub(crate) fn template_count(&self) -> usize {
        self.templates.len()
    }

    fn lookup(
        &self,
        locale: &Locale,
        path: &Path,
        prefixes: &[Path],
    ) -> Option<Arc<CompiledTemplate>> {
        let key = Key::new(locale.clone(), path.clone());
        for candidate in self.key_generator.keys(&key, prefixes) {
            if let Some(template) = self.templates.get(&candidate) {
                return Some(Arc::clone(template));
            }
            trace!(candidate = %candidate, "fallback candidate missing");
        }
        None
    }

    fn render_template(
        &self,
        template: &CompiledTemplate,
        locale: &Locale,
        positional: &[Value],
        named: Option<&HashMap<String, Value>>,
        prefixes: &[Path],
    ) -> Result<String, RenderError> {
        let positional = self.args.resolve_positional(positional, template.used_args())?;
        let named = named
            .map(|named| self.args.resolve_named(named, template.used_args()))
            .transpose()?;
        let ctx = RenderContext::new(
            self,
            locale,
            &positional,
            named.as_ref().map(|cow| &**cow),
            prefixes,
        );
        evaluator::eval_template(template, &ctx)
    }

    /// Render a `${path | ...}` reference encountered during evaluation.
    pub(crate) fn resolve_reference(
        &self,
        path: &Path,
        ctx: &RenderContext<'_>,
    ) -> Result<String, RenderError> {
        if ctx.depth >= self.max_reference_depth {
            return Err(RenderError::MaxReferenceDepth {
                path: path.clone(),
                limit: self.max_reference_depth,
            });
        }
        let template = self
            .lookup(ctx.locale, path, ctx.prefixes)
            .ok_or_else(|| RenderError::MissingReference { path: path.clone() })?;
        let child = ctx.descend();
        evaluator::eval_template(&template, &child)
    }

    /// Apply the typed formatter for the value's kind, if any.
    pub(crate) fn format_typed(
        &self,
        locale: &Locale,
        value: &Value,
    ) -> Result<Option<String>, RenderError> {
        let resolved = self.locale_resolver.resolve(locale);
        match self.formatters.by_kind(&resolved, value.kind())? {
            Some(formatter) => Ok(Some(formatter(value))),
            None => Ok(None),
        }
    }

    /// Build a named formatter against the resolved formatting locale.
    pub(crate) fn named_formatter(
        &self,
        locale: &Locale,
        name: &str,
        style: Option<&str>,
    ) -> Result<ValueFormatter, RenderError> {
        let resolved = self.locale_resolver.resolve(locale);
        Ok(self.formatters.by_name(&resolved, name, style)?)
    }
}

/// An immutable, thread-safe message pack.
///
/// Cloning is cheap; clones share one [`PackCore`]. Views created with
/// [`MessagePack::with_path_prefix`] and [`MessagePack::for_locale`] share
/// it too.
///
/// # Example
///
/// ```
/// use polyglot::{Locale, MessagePack};
///
/// let pack = MessagePack::builder()
///     .add_message(Locale::new("en"), "hello", "Hello {0}!")
///     .build()
///     .unwrap();
///
/// let text = pack.render(&Locale::new("en"), "hello", &["World".into()]).unwrap();
/// assert_eq!(text, "Hello World!");
/// ```
#[derive(Clone)]
pub struct MessagePack {
    core: Arc<PackCore>,
    prefixes: Vec<Path>,
}

impl MessagePack {
    pub fn builder() -> MessagePackBuilder {
        MessagePackBuilder::new()
    }

    pub(crate) fn from_core(core: Arc<PackCore>) -> Self {
        Self {
            core,
            prefixes: Vec::new(),
        }
    }

    /// Render the message at `path` with positional arguments.
    ///
    /// Unresolved keys follow the pack's [`UnresolvedMessagePolicy`].
    pub fn render(
        &self,
        locale: &Locale,
        path: &str,
        args: &[Value],
    ) -> Result<String, RenderError> {
        let path = parse_path(path)?;
        match self.find_internal(locale, &path, args, None)? {
            Some(text) => Ok(text),
            None => self.unresolved(locale, &path, format_positional(args)),
        }
    }

    /// Render with named arguments.
    pub fn render_named(
        &self,
        locale: &Locale,
        path: &str,
        args: &HashMap<String, Value>,
    ) -> Result<String, RenderError> {
        let path = parse_path(path)?;
        match self.find_internal(locale, &path, &[], Some(args))? {
            Some(text) => Ok(text),
            None => self.unresolved(locale, &path, format_named(args)),
        }
    }

    /// Like [`MessagePack::render`], but an unresolved key is `Ok(None)`
    /// regardless of policy.
    pub fn find(
        &self,
        locale: &Locale,
        path: &str,
        args: &[Value],
    ) -> Result<Option<String>, RenderError> {
        let path = parse_path(path)?;
        self.find_internal(locale, &path, args, None)
    }

    pub fn find_named(
        &self,
        locale: &Locale,
        path: &str,
        args: &HashMap<String, Value>,
    ) -> Result<Option<String>, RenderError> {
        let path = parse_path(path)?;
        self.find_internal(locale, &path, &[], Some(args))
    }

    /// Render an ad hoc template against this pack.
    ///
    /// The template is compiled through the pack's filter registry and
    /// cached by source text, so repeated calls skip parsing. Unlike stored
    /// templates, no construction-time reference pass runs here; use
    /// `${path | filters}` expressions to pull in other messages.
    pub fn render_expression(
        &self,
        locale: &Locale,
        template: &str,
        args: &[Value],
    ) -> Result<String, RenderError> {
        let compiled = self.compile_expression(template)?;
        self.core
            .render_template(&compiled, locale, args, None, &self.prefixes)
    }

    pub fn render_expression_named(
        &self,
        locale: &Locale,
        template: &str,
        args: &HashMap<String, Value>,
    ) -> Result<String, RenderError> {
        let compiled = self.compile_expression(template)?;
        self.core
            .render_template(&compiled, locale, &[], Some(args), &self.prefixes)
    }

    /// A locale-bound view of this pack.
    pub fn for_locale(&self, locale: Locale) -> Messages {
        Messages {
            pack: self.clone(),
            locale,
        }
    }

    /// A view resolving relative paths under `prefix` first.
    ///
    /// Lookups try the composed prefix, then any enclosing view's prefix,
    /// then the pack's global prefixes and the bare path (subject to the
    /// path-fallback strategy). Views nest; prefixes compose.
    pub fn with_path_prefix(&self, prefix: Path) -> MessagePack {
        let composed = match self.prefixes.first() {
            Some(outer) => outer.child(&prefix),
            None => prefix,
        };
        let mut prefixes = Vec::with_capacity(self.prefixes.len() + 1);
        prefixes.push(composed);
        prefixes.extend(self.prefixes.iter().cloned());
        MessagePack {
            core: Arc::clone(&self.core),
            prefixes,
        }
    }

    /// The number of stored templates.
    pub fn len(&self) -> usize {
        self.core.template_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn compile_expression(&self, template: &str) -> Result<Arc<CompiledTemplate>, RenderError> {
        Ok(self
            .core
            .expression_cache
            .try_get_or_insert_with(template.to_string(), || {
                Compiler::new(&self.core.filters)
                    .compile(template)
                    .map(Arc::new)
            })?)
    }

    fn find_internal(
        &self,
        locale: &Locale,
        path: &Path,
        positional: &[Value],
        named: Option<&HashMap<String, Value>>,
    ) -> Result<Option<String>, RenderError> {
        match self.core.lookup(locale, path, &self.prefixes) {
            Some(template) => self
                .core
                .render_template(&template, locale, positional, named, &self.prefixes)
                .map(Some),
            None => Ok(None),
        }
    }

    fn unresolved(
        &self,
        locale: &Locale,
        path: &Path,
        args: String,
    ) -> Result<String, RenderError> {
        match self.core.policy {
            UnresolvedMessagePolicy::Fail => Err(RenderError::UnresolvedMessage {
                key: Key::new(locale.clone(), path.clone()),
                args,
            }),
            UnresolvedMessagePolicy::PathEcho => Ok(path.to_string()),
        }
    }
}

impl std::fmt::Debug for MessagePack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePack")
            .field("templates", &self.len())
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}

/// A pack bound to one locale, sparing call sites the locale argument.
#[derive(Clone)]
pub struct Messages {
    pack: MessagePack,
    locale: Locale,
}

impl Messages {
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn render(&self, path: &str, args: &[Value]) -> Result<String, RenderError> {
        self.pack.render(&self.locale, path, args)
    }

    pub fn render_named(
        &self,
        path: &str,
        args: &HashMap<String, Value>,
    ) -> Result<String, RenderError> {
        self.pack.render_named(&self.locale, path, args)
    }

    pub fn find(&self, path: &str, args: &[Value]) -> Result<Option<String>, RenderError> {
        self.pack.find(&self.locale, path, args)
    }

    pub fn render_expression(&self, template: &str, args: &[Value]) -> Result<String, RenderError> {
        self.pack.render_expression(&self.locale, template, args)
    }

    /// A view with `prefix` prepended, still bound to this locale.
    pub fn with_path_prefix(&self, prefix: Path) -> Messages {
        Messages {
            pack: self.pack.with_path_prefix(prefix),
            locale: self.locale.clone(),
        }
    }
}

fn parse_path(path: &str) -> Result<Path, RenderError> {
    Ok(Path::parse(path)?)
}

fn format_positional(args: &[Value]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

fn format_named(args: &HashMap<String, Value>) -> String {
    if args.is_empty() {
        return String::new();
    }
    let sorted: BTreeMap<&String, &Value> = args.iter().collect();
    let parts: Vec<String> = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("({})", parts.join(", "))
}
