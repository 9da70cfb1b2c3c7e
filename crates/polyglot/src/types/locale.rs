//! Locale identifiers and generalization.

use bon::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error produced when parsing an invalid locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid locale '{tag}': {reason}")]
pub struct LocaleError {
    pub tag: String,
    pub reason: String,
}

/// A language tag with optional region and variant subtags.
///
/// Locales are normalized on construction: language and variant are
/// lowercased, region is uppercased, so `en-us`, `EN_US` and `en-US` compare
/// equal. The canonical form joins subtags with `-`.
///
/// Generalization drops the most specific subtag present, walking
/// `language-REGION-variant` down to a bare language. Fallback key generation
/// and formatting-locale resolution both use this chain.
///
/// # Example
///
/// ```
/// use polyglot::Locale;
///
/// let locale = Locale::builder().language("EN").region("us").build();
/// assert_eq!(locale.to_string(), "en-US");
/// assert_eq!(locale.generalize(), Some(Locale::parse("en").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Builder, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// ISO-639 language code, e.g. `en`, `pl`.
    #[builder(with = |s: impl Into<String>| s.into().to_ascii_lowercase())]
    language: String,

    /// ISO-3166 region code, e.g. `US`, `PL`.
    #[builder(with = |s: impl Into<String>| s.into().to_ascii_uppercase())]
    region: Option<String>,

    /// Free-form variant subtag.
    #[builder(with = |s: impl Into<String>| s.into().to_ascii_lowercase())]
    variant: Option<String>,
}

impl Locale {
    /// A language-only locale.
    pub fn new(language: impl Into<String>) -> Self {
        Locale::builder().language(language).build()
    }

    /// Parse a locale tag with `-` or `_` separators, such as `pl-PL` or
    /// `en_US_posix`.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let error = |reason: &str| LocaleError {
            tag: tag.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = tag.split(['-', '_']).collect();
        for part in &parts {
            if part.is_empty() {
                return Err(error("blank subtag"));
            }
            if !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(error("subtags must be alphanumeric"));
            }
        }
        match parts.as_slice() {
            [language] => Ok(Locale::builder().language(*language).build()),
            [language, region] => Ok(Locale::builder()
                .language(*language)
                .region(*region)
                .build()),
            [language, region, variant] => Ok(Locale::builder()
                .language(*language)
                .region(*region)
                .variant(*variant)
                .build()),
            _ => Err(error("too many subtags")),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Whether this locale carries no region or variant subtag.
    pub fn is_language_only(&self) -> bool {
        self.region.is_none() && self.variant.is_none()
    }

    /// The locale with only its language subtag.
    pub fn language_locale(&self) -> Locale {
        if self.is_language_only() {
            return self.clone();
        }
        Locale {
            language: self.language.clone(),
            region: None,
            variant: None,
        }
    }

    /// Drop the most specific subtag, or return `None` for a bare language.
    pub fn generalize(&self) -> Option<Locale> {
        if self.variant.is_some() {
            return Some(Locale {
                language: self.language.clone(),
                region: self.region.clone(),
                variant: None,
            });
        }
        if self.region.is_some() {
            return Some(self.language_locale());
        }
        None
    }

    /// The canonical `-`-joined tag.
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        if let Some(region) = &self.region {
            tag.push('-');
            tag.push_str(region);
        }
        if let Some(variant) = &self.variant {
            tag.push('-');
            tag.push_str(variant);
        }
        tag
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}
