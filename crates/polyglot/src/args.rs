//! Argument normalization.
//!
//! Before a template evaluates, its arguments pass through kind-keyed
//! transformers. The defaults normalize date-like values onto
//! `NaiveDateTime` so one typed formatter covers them all; applications can
//! register their own to coerce domain types into message-friendly ones.
//!
//! A transformer's output may itself match a transformer, so chains run
//! until no transformer matches, up to a fixed depth. A chain that never
//! stabilizes is an error rather than a hang.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveTime;

use crate::render::{RenderError, UsedArgs};
use crate::types::{Value, ValueKind};

/// Default transform-chain ceiling.
pub const DEFAULT_MAX_TRANSFORM_DEPTH: usize = 10;

type TransformFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A value transformer registered for a [`ValueKind`].
///
/// Lookup walks the kind's ancestor chain, so a transformer registered for
/// `Temporal` catches every date-like kind without its own entry.
#[derive(Clone)]
pub struct ArgTransformer {
    kind: ValueKind,
    transform: TransformFn,
}

impl ArgTransformer {
    pub fn new(kind: ValueKind, transform: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            kind,
            transform: Arc::new(transform),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// The built-in transformers: `Date` to midnight `DateTime`, `Instant` to
/// its naive UTC `DateTime`.
pub fn default_transformers() -> Vec<ArgTransformer> {
    vec![
        ArgTransformer::new(ValueKind::Date, |value| match value {
            Value::Date(date) => Value::DateTime(date.and_time(NaiveTime::MIN)),
            other => other.clone(),
        }),
        ArgTransformer::new(ValueKind::Instant, |value| match value {
            Value::Instant(instant) => Value::DateTime(instant.naive_utc()),
            other => other.clone(),
        }),
    ]
}

pub(crate) struct ArgumentResolver {
    transformers: HashMap<ValueKind, TransformFn>,
    max_depth: usize,
}

impl ArgumentResolver {
    /// Later transformers win on kind collisions.
    pub fn new(transformers: Vec<ArgTransformer>, max_depth: usize) -> Self {
        let mut map: HashMap<ValueKind, TransformFn> = HashMap::new();
        for transformer in transformers {
            map.insert(transformer.kind, transformer.transform);
        }
        Self {
            transformers: map,
            max_depth: max_depth.max(1),
        }
    }

    fn lookup(&self, kind: ValueKind) -> Option<&TransformFn> {
        kind.ancestors()
            .iter()
            .find_map(|ancestor| self.transformers.get(ancestor))
    }

    /// Run the transform chain for one value. `Ok(None)` means no
    /// transformer matched and the value stands as-is.
    fn transform(&self, value: &Value) -> Result<Option<Value>, RenderError> {
        let Some(transform) = self.lookup(value.kind()) else {
            return Ok(None);
        };
        let mut current = transform(value);
        for _ in 1..self.max_depth {
            match self.lookup(current.kind()) {
                Some(transform) => current = transform(&current),
                None => return Ok(Some(current)),
            }
        }
        if self.lookup(current.kind()).is_some() {
            return Err(RenderError::TooManyTransformations {
                kind: current.kind(),
            });
        }
        Ok(Some(current))
    }

    /// Transform the positional arguments a template actually uses.
    ///
    /// Borrows the input untouched when nothing needs transforming, which
    /// is the common case.
    pub fn resolve_positional<'v>(
        &self,
        args: &'v [Value],
        used: &UsedArgs,
    ) -> Result<Cow<'v, [Value]>, RenderError> {
        let untouched = !used
            .indexes
            .iter()
            .any(|&i| args.get(i).is_some_and(|v| self.lookup(v.kind()).is_some()));
        if untouched {
            return Ok(Cow::Borrowed(args));
        }
        let mut out = args.to_vec();
        for &index in &used.indexes {
            if let Some(slot) = out.get_mut(index)
                && let Some(transformed) = self.transform(slot)?
            {
                *slot = transformed;
            }
        }
        Ok(Cow::Owned(out))
    }

    /// Named-argument variant of [`ArgumentResolver::resolve_positional`].
    pub fn resolve_named<'v>(
        &self,
        args: &'v HashMap<String, Value>,
        used: &UsedArgs,
    ) -> Result<Cow<'v, HashMap<String, Value>>, RenderError> {
        let untouched = !used
            .names
            .iter()
            .any(|name| args.get(name).is_some_and(|v| self.lookup(v.kind()).is_some()));
        if untouched {
            return Ok(Cow::Borrowed(args));
        }
        let mut out = args.clone();
        for name in &used.names {
            if let Some(slot) = out.get_mut(name)
                && let Some(transformed) = self.transform(slot)?
            {
                *slot = transformed;
            }
        }
        Ok(Cow::Owned(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn used(indexes: &[usize]) -> UsedArgs {
        UsedArgs {
            indexes: indexes.iter().copied().collect(),
            names: Default::default(),
        }
    }

    #[test]
    fn untouched_arguments_stay_borrowed() {
        let resolver = ArgumentResolver::new(default_transformers(), DEFAULT_MAX_TRANSFORM_DEPTH);
        let args = vec![Value::Int(1), Value::from("x")];
        let resolved = resolver.resolve_positional(&args, &used(&[0, 1])).unwrap();
        assert!(matches!(resolved, Cow::Borrowed(_)));
    }

    #[test]
    fn dates_normalize_to_midnight_datetimes() {
        let resolver = ArgumentResolver::new(default_transformers(), DEFAULT_MAX_TRANSFORM_DEPTH);
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let args = vec![Value::Date(date)];
        let resolved = resolver.resolve_positional(&args, &used(&[0])).unwrap();
        assert_eq!(
            resolved[0],
            Value::DateTime(date.and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn unused_arguments_are_not_transformed() {
        let resolver = ArgumentResolver::new(default_transformers(), DEFAULT_MAX_TRANSFORM_DEPTH);
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let args = vec![Value::Date(date)];
        let resolved = resolver.resolve_positional(&args, &used(&[])).unwrap();
        assert_eq!(resolved[0], Value::Date(date));
    }

    #[test]
    fn diverging_chain_errors_out() {
        let spin = ArgTransformer::new(ValueKind::Int, |value| match value {
            Value::Int(n) => Value::Int(n + 1),
            other => other.clone(),
        });
        let resolver = ArgumentResolver::new(vec![spin], DEFAULT_MAX_TRANSFORM_DEPTH);
        let args = vec![Value::Int(0)];
        let error = resolver.resolve_positional(&args, &used(&[0])).unwrap_err();
        assert!(matches!(error, RenderError::TooManyTransformations { .. }));
    }

    #[test]
    fn single_step_chain_applies() {
        let upper = ArgTransformer::new(ValueKind::Int, |value| match value {
            Value::Int(n) => Value::Str(format!("#{n}")),
            other => other.clone(),
        });
        let resolver = ArgumentResolver::new(vec![upper], DEFAULT_MAX_TRANSFORM_DEPTH);
        let args = vec![Value::Int(3)];
        let resolved = resolver.resolve_positional(&args, &used(&[0])).unwrap();
        assert_eq!(resolved[0], Value::from("#3"));
    }
}
