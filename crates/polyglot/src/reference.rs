//! Construction-time reference resolution.
//!
//! Stored templates may embed other messages with `$path` or `${path}`.
//! Plain references are substituted textually while the pack is built, so
//! rendering never pays for them; only `${path | filters}` expressions
//! survive to the parser and resolve at render time.
//!
//! Substitution iterates until a pass changes nothing. Templates whose
//! references never settle (`a -> b -> a`) exhaust the iteration ceiling
//! and fail construction.

use std::collections::{BTreeMap, HashMap};

use crate::fallback::KeyGenerator;
use crate::pack::BuildError;
use crate::types::{Key, Path};

/// Default substitution-pass ceiling. Each pass inlines one level of
/// references, so this bounds how deep reference chains may nest.
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 10;

pub(crate) struct ReferenceResolver<'a> {
    templates: &'a BTreeMap<Key, String>,
    bundle_prefixes: &'a HashMap<Key, Path>,
    keys: &'a KeyGenerator,
    max_depth: usize,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        templates: &'a BTreeMap<Key, String>,
        bundle_prefixes: &'a HashMap<Key, Path>,
        keys: &'a KeyGenerator,
        max_depth: usize,
    ) -> Self {
        Self {
            templates,
            bundle_prefixes,
            keys,
            max_depth,
        }
    }

    /// Substitute references in every template.
    pub fn resolve_all(&self) -> Result<BTreeMap<Key, String>, BuildError> {
        let mut out = BTreeMap::new();
        for (key, template) in self.templates {
            out.insert(key.clone(), self.resolve(key, template)?);
        }
        Ok(out)
    }

    fn resolve(&self, key: &Key, template: &str) -> Result<String, BuildError> {
        let mut current = template.to_string();
        for _ in 0..self.max_depth {
            let (next, modified) = self.substitute(key, &current)?;
            if !modified {
                return Ok(next);
            }
            current = next;
        }
        let (_, modified) = self.substitute(key, &current)?;
        if modified {
            return Err(BuildError::ReferenceCycleDetected { key: key.clone() });
        }
        Ok(current)
    }

    /// One substitution pass. Returns the rewritten template and whether
    /// anything was inlined.
    fn substitute(&self, key: &Key, template: &str) -> Result<(String, bool), BuildError> {
        let mut out = String::with_capacity(template.len());
        let mut modified = false;
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                // Copy escape pairs verbatim; the parser unescapes later.
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
                continue;
            }
            if c != '$' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'{') {
                chars.next();
                let mut inner = String::new();
                let mut closed = false;
                for ic in chars.by_ref() {
                    if ic == '}' {
                        closed = true;
                        break;
                    }
                    inner.push(ic);
                }
                if !closed {
                    return Err(BuildError::InvalidReference {
                        key: key.clone(),
                        text: format!("${{{inner}"),
                    });
                }
                if inner.contains('|') {
                    // Filtered reference, resolved at render time.
                    out.push_str("${");
                    out.push_str(&inner);
                    out.push('}');
                    continue;
                }
                out.push_str(&self.lookup(key, inner.trim())?);
                modified = true;
            } else {
                let mut ident = String::new();
                while let Some(&ic) = chars.peek() {
                    if !is_reference_char(ic) {
                        break;
                    }
                    ident.push(ic);
                    chars.next();
                }
                if ident.is_empty() {
                    out.push('$');
                    continue;
                }
                out.push_str(&self.lookup(key, &ident)?);
                modified = true;
            }
        }
        Ok((out, modified))
    }

    /// Find the referenced template, scoped to the source bundle's prefix.
    fn lookup(&self, key: &Key, path_text: &str) -> Result<String, BuildError> {
        let path = Path::parse(path_text).map_err(|_| BuildError::InvalidReference {
            key: key.clone(),
            text: path_text.to_string(),
        })?;
        let prefixes: &[Path] = match self.bundle_prefixes.get(key) {
            Some(prefix) if !prefix.is_root() => std::slice::from_ref(prefix),
            _ => &[],
        };
        let target = Key::new(key.locale().clone(), path.clone());
        for candidate in self.keys.keys(&target, prefixes) {
            if let Some(template) = self.templates.get(&candidate) {
                return Ok(template.clone());
            }
        }
        Err(BuildError::MissingReference {
            key: key.clone(),
            path,
        })
    }
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}
