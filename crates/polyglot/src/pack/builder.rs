//! Message pack construction.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::args::{
    ArgTransformer, ArgumentResolver, DEFAULT_MAX_TRANSFORM_DEPTH, default_transformers,
};
use crate::fallback::{KeyGenerator, LocaleFallback, LocaleResolver, PathFallback};
use crate::filter::{Filter, builtin};
use crate::format::{
    DateTimeFormatterProvider, FormatterFilter, FormatterProvider, FormatterRegistry,
    MoneyFormatterProvider, NumberFormatterProvider, TemplateStore,
};
use crate::pack::{BuildError, MessagePack, PackCore, UnresolvedMessagePolicy};
use crate::reference::{DEFAULT_MAX_REFERENCE_DEPTH, ReferenceResolver};
use crate::render::compiler::Compiler;
use crate::render::CompiledTemplate;
use crate::types::{Key, Locale, Path, ValueKind};

/// Compiled ad hoc templates kept per pack.
const DEFAULT_EXPRESSION_CACHE_CAPACITY: usize = 256;

/// A batch of raw templates sharing a path prefix.
///
/// Bundles are how loaders hand templates to the builder: one bundle per
/// source file or translation domain, with the prefix applied to every
/// entry. References inside a bundle resolve against its prefix first.
#[derive(Debug, Clone)]
pub struct MessageBundle {
    prefix: Path,
    entries: Vec<(Locale, String, String)>,
}

impl MessageBundle {
    pub fn new() -> Self {
        Self::with_prefix(Path::root())
    }

    pub fn with_prefix(prefix: Path) -> Self {
        Self {
            prefix,
            entries: Vec::new(),
        }
    }

    /// Add one template. Paths are validated when the pack builds.
    pub fn add(
        mut self,
        locale: Locale,
        path: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.entries.push((locale, path.into(), template.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MessageBundle {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent, consuming builder for [`MessagePack`].
///
/// The builder is itself an immutable configuration value once assembled:
/// `build(&self)` does not consume or mutate it, so the same builder can
/// produce fresh packs repeatedly, which is what
/// [`ReloadableMessagePack`](crate::pack::ReloadableMessagePack) relies on.
#[derive(Clone)]
pub struct MessagePackBuilder {
    root: MessageBundle,
    bundles: Vec<MessageBundle>,
    default_locale: Option<Locale>,
    strict_locale_fallback: bool,
    strict_path_fallback: bool,
    global_prefixes: Vec<Path>,
    policy: UnresolvedMessagePolicy,
    filters: Vec<(String, Arc<dyn Filter>)>,
    named_formatters: Vec<(String, Arc<dyn FormatterProvider>)>,
    typed_formatters: Vec<(ValueKind, Arc<dyn FormatterProvider>)>,
    transformers: Vec<ArgTransformer>,
    resolve_references: bool,
    max_reference_depth: usize,
    max_transform_depth: usize,
    expression_cache_capacity: usize,
}

impl MessagePackBuilder {
    pub(crate) fn new() -> Self {
        Self {
            root: MessageBundle::new(),
            bundles: Vec::new(),
            default_locale: None,
            strict_locale_fallback: false,
            strict_path_fallback: false,
            global_prefixes: Vec::new(),
            policy: UnresolvedMessagePolicy::default(),
            filters: Vec::new(),
            named_formatters: Vec::new(),
            typed_formatters: Vec::new(),
            transformers: Vec::new(),
            resolve_references: true,
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            max_transform_depth: DEFAULT_MAX_TRANSFORM_DEPTH,
            expression_cache_capacity: DEFAULT_EXPRESSION_CACHE_CAPACITY,
        }
    }

    /// Add one template outside any bundle.
    pub fn add_message(
        mut self,
        locale: Locale,
        path: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        let root = std::mem::take(&mut self.root);
        self.root = root.add(locale, path, template);
        self
    }

    pub fn add_bundle(mut self, bundle: MessageBundle) -> Self {
        self.bundles.push(bundle);
        self
    }

    /// Replace every bundle (and loose message) with a fresh set.
    pub fn bundles(mut self, bundles: Vec<MessageBundle>) -> Self {
        self.root = MessageBundle::new();
        self.bundles = bundles;
        self
    }

    /// The locale the relaxed fallback chain ends on.
    pub fn default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = Some(locale);
        self
    }

    /// Disable locale fallback: only exact locales match.
    pub fn strict_locale_fallback(mut self) -> Self {
        self.strict_locale_fallback = true;
        self
    }

    /// Disable path fallback: lookups anchor to the most specific prefix.
    pub fn strict_path_fallback(mut self) -> Self {
        self.strict_path_fallback = true;
        self
    }

    /// A prefix every lookup may fall back to.
    pub fn add_global_prefix(mut self, prefix: Path) -> Self {
        self.global_prefixes.push(prefix);
        self
    }

    pub fn unresolved_message_policy(mut self, policy: UnresolvedMessagePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register a filter, shadowing any built-in with the same name.
    pub fn add_filter(mut self, name: impl Into<String>, filter: Arc<dyn Filter>) -> Self {
        self.filters.push((name.into(), filter));
        self
    }

    /// Register a named formatter, usable as a filter by its name.
    pub fn add_named_formatter(
        mut self,
        name: impl Into<String>,
        provider: Arc<dyn FormatterProvider>,
    ) -> Self {
        self.named_formatters.push((name.into(), provider));
        self
    }

    /// Register a typed formatter applied to values of `kind`.
    pub fn add_typed_formatter(
        mut self,
        kind: ValueKind,
        provider: Arc<dyn FormatterProvider>,
    ) -> Self {
        self.typed_formatters.push((kind, provider));
        self
    }

    pub fn add_arg_transformer(mut self, transformer: ArgTransformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Leave `$path` references in template text untouched.
    pub fn skip_reference_resolution(mut self) -> Self {
        self.resolve_references = false;
        self
    }

    pub fn max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth.max(1);
        self
    }

    pub fn max_transform_depth(mut self, depth: usize) -> Self {
        self.max_transform_depth = depth.max(1);
        self
    }

    pub fn expression_cache_capacity(mut self, capacity: usize) -> Self {
        self.expression_cache_capacity = capacity.max(1);
        self
    }

    /// Build an immutable pack from this configuration.
    ///
    /// Construction is single-threaded and fail-fast: bundles merge (later
    /// entries win), plain references substitute, every template parses
    /// and binds its filters. Only then does the pack publish.
    pub fn build(&self) -> Result<MessagePack, BuildError> {
        let mut raw: BTreeMap<Key, String> = BTreeMap::new();
        let mut bundle_prefixes: HashMap<Key, Path> = HashMap::new();
        for bundle in std::iter::once(&self.root).chain(&self.bundles) {
            for (locale, path_text, template) in &bundle.entries {
                let path = Path::parse(path_text)?;
                let key = Key::new(locale.clone(), bundle.prefix.child(&path));
                bundle_prefixes.insert(key.clone(), bundle.prefix.clone());
                raw.insert(key, template.clone());
            }
        }

        let locales: BTreeSet<Locale> = raw.keys().map(|key| key.locale().clone()).collect();
        let locale_fallback = if self.strict_locale_fallback {
            LocaleFallback::Strict
        } else {
            LocaleFallback::Relaxed {
                default_locale: self.default_locale.clone(),
            }
        };
        let path_fallback = if self.strict_path_fallback {
            PathFallback::Strict
        } else {
            PathFallback::Relaxed
        };
        let key_generator = Arc::new(KeyGenerator::new(
            locale_fallback,
            path_fallback,
            self.global_prefixes.clone(),
        ));

        let resolved = if self.resolve_references {
            ReferenceResolver::new(
                &raw,
                &bundle_prefixes,
                &key_generator,
                self.max_reference_depth,
            )
            .resolve_all()?
        } else {
            raw
        };

        let named_providers = self.named_providers();
        let mut filters = builtin::default_filters();
        for (name, _) in &named_providers {
            filters.insert(name.clone(), Arc::new(FormatterFilter::new(name.clone())));
        }
        for (name, filter) in &self.filters {
            filters.insert(name.clone(), Arc::clone(filter));
        }

        let compiler = Compiler::new(&filters);
        let mut by_source: HashMap<String, Arc<CompiledTemplate>> = HashMap::new();
        let mut templates: HashMap<Key, Arc<CompiledTemplate>> = HashMap::new();
        for (key, source) in &resolved {
            let compiled = match by_source.get(source) {
                Some(shared) => Arc::clone(shared),
                None => {
                    let compiled = Arc::new(compiler.compile(source).map_err(|source| {
                        BuildError::Parse {
                            key: key.clone(),
                            source,
                        }
                    })?);
                    by_source.insert(source.clone(), Arc::clone(&compiled));
                    compiled
                }
            };
            templates.insert(key.clone(), compiled);
        }

        let store = TemplateStore::new(
            resolved.into_iter().collect(),
            Arc::clone(&key_generator),
        );
        let formatters = FormatterRegistry::new(
            named_providers.into_iter().collect(),
            self.typed_providers().into_iter().collect(),
            store,
        );
        let locale_resolver = LocaleResolver::new(
            locales.iter().cloned(),
            self.default_locale.clone(),
        );
        let mut transformers = default_transformers();
        transformers.extend(self.transformers.iter().cloned());
        let args = ArgumentResolver::new(transformers, self.max_transform_depth);

        debug!(
            templates = templates.len(),
            locales = locales.len(),
            "message pack built"
        );
        let core = PackCore::new(
            templates,
            key_generator,
            locale_resolver,
            filters,
            formatters,
            args,
            self.policy,
            self.expression_cache_capacity,
            self.max_reference_depth,
        );
        Ok(MessagePack::from_core(Arc::new(core)))
    }

    fn named_providers(&self) -> Vec<(String, Arc<dyn FormatterProvider>)> {
        let mut providers: Vec<(String, Arc<dyn FormatterProvider>)> = vec![
            ("number".to_string(), Arc::new(NumberFormatterProvider)),
            ("money".to_string(), Arc::new(MoneyFormatterProvider)),
            ("date".to_string(), Arc::new(DateTimeFormatterProvider::date())),
            ("time".to_string(), Arc::new(DateTimeFormatterProvider::time())),
            (
                "dateTime".to_string(),
                Arc::new(DateTimeFormatterProvider::date_time()),
            ),
        ];
        providers.extend(self.named_formatters.iter().cloned());
        providers
    }

    fn typed_providers(&self) -> Vec<(ValueKind, Arc<dyn FormatterProvider>)> {
        let mut providers: Vec<(ValueKind, Arc<dyn FormatterProvider>)> = vec![
            (ValueKind::Number, Arc::new(NumberFormatterProvider)),
            (
                ValueKind::Temporal,
                Arc::new(DateTimeFormatterProvider::date_time()),
            ),
            (ValueKind::Money, Arc::new(MoneyFormatterProvider)),
        ];
        providers.extend(self.typed_formatters.iter().cloned());
        providers
    }
}

impl Default for MessagePackBuilder {
    fn default() -> Self {
        Self::new()
    }
}
