//! Built-in formatter providers.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::format::pattern::{DecimalPattern, symbols_for};
use crate::format::{FormatError, FormatterProvider, LocaleTemplates, ValueFormatter};
use crate::types::Value;

/// `number`: decimal formatting with locale symbols.
///
/// With a style, the pattern must come from the template tree; without one,
/// a missing template falls back to grouped `#,##0.###`.
pub struct NumberFormatterProvider;

impl FormatterProvider for NumberFormatterProvider {
    fn formatter(
        &self,
        templates: &LocaleTemplates<'_>,
        style: Option<&str>,
    ) -> Result<ValueFormatter, FormatError> {
        let symbols = symbols_for(templates.locale());
        let pattern = match templates.style_template("number", style) {
            Some(text) => DecimalPattern::parse(text)?,
            None => match style {
                None => DecimalPattern::default_number(),
                Some(style) => {
                    return Err(FormatError::UnknownStyle {
                        name: "number".to_string(),
                        style: style.to_string(),
                    });
                }
            },
        };
        Ok(Arc::new(move |value| match value {
            Value::Int(n) => pattern.format_int(*n, symbols),
            other => match other.as_float() {
                Some(f) => pattern.format(f, symbols),
                None => other.to_string(),
            },
        }))
    }
}

/// `money`: amount formatted like `number`, plus the currency code.
///
/// Without a custom pattern the amount uses the currency's own fraction
/// digits and the code is appended; a pattern may place the code itself
/// with a `¤` placeholder.
pub struct MoneyFormatterProvider;

impl FormatterProvider for MoneyFormatterProvider {
    fn formatter(
        &self,
        templates: &LocaleTemplates<'_>,
        style: Option<&str>,
    ) -> Result<ValueFormatter, FormatError> {
        let symbols = symbols_for(templates.locale());
        let pattern = match templates.style_template("money", style) {
            Some(text) => Some(DecimalPattern::parse(text)?),
            None => match style {
                None => None,
                Some(style) => {
                    return Err(FormatError::UnknownStyle {
                        name: "money".to_string(),
                        style: style.to_string(),
                    });
                }
            },
        };
        Ok(Arc::new(move |value| {
            let Value::Money(money) = value else {
                return value.to_string();
            };
            let pattern = pattern.clone().unwrap_or_else(|| {
                DecimalPattern::with_fraction_digits(usize::from(
                    money.currency().fraction_digits(),
                ))
            });
            let amount = pattern.format(money.amount(), symbols);
            if pattern.has_currency_placeholder() {
                amount.replace('¤', money.currency().code())
            } else {
                format!("{amount} {}", money.currency().code())
            }
        }))
    }
}

/// `date`, `time` and `dateTime`: chrono formatting with
/// `short`/`medium`/`long`/`full` styles or custom strftime patterns from
/// the template tree.
pub struct DateTimeFormatterProvider {
    name: &'static str,
}

impl DateTimeFormatterProvider {
    pub fn date() -> Self {
        Self { name: "date" }
    }

    pub fn time() -> Self {
        Self { name: "time" }
    }

    pub fn date_time() -> Self {
        Self { name: "dateTime" }
    }

    fn builtin_style(&self, style: &str) -> Option<&'static str> {
        let pattern = match (self.name, style) {
            ("date", "short") => "%Y-%m-%d",
            ("date", "medium") => "%b %-d, %Y",
            ("date", "long") => "%B %-d, %Y",
            ("date", "full") => "%A, %B %-d, %Y",
            ("time", "short") => "%H:%M",
            ("time", "medium" | "long" | "full") => "%H:%M:%S",
            ("dateTime", "short") => "%Y-%m-%d %H:%M",
            ("dateTime", "medium") => "%b %-d, %Y %H:%M",
            ("dateTime", "long") => "%B %-d, %Y %H:%M:%S",
            ("dateTime", "full") => "%A, %B %-d, %Y %H:%M:%S",
            _ => return None,
        };
        Some(pattern)
    }
}

impl FormatterProvider for DateTimeFormatterProvider {
    fn formatter(
        &self,
        templates: &LocaleTemplates<'_>,
        style: Option<&str>,
    ) -> Result<ValueFormatter, FormatError> {
        let format = match templates.style_template(self.name, style) {
            Some(pattern) => pattern.to_string(),
            None => {
                let style = style.unwrap_or("medium");
                self.builtin_style(style)
                    .ok_or_else(|| FormatError::UnknownStyle {
                        name: self.name.to_string(),
                        style: style.to_string(),
                    })?
                    .to_string()
            }
        };
        Ok(Arc::new(move |value| match as_date_time(value) {
            Some(dt) => dt.format(&format).to_string(),
            None => value.to_string(),
        }))
    }
}

/// Normalize any temporal value to a `NaiveDateTime` so every strftime
/// specifier has something to print.
fn as_date_time(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
        Value::Time(t) => NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(*t)),
        Value::DateTime(dt) => Some(*dt),
        Value::Instant(i) => Some(i.naive_utc()),
        _ => None,
    }
}
