//! Decimal format patterns.
//!
//! Implements the subset of `DecimalFormat` pattern syntax the message
//! packs actually use: literal prefix/suffix, `,` grouping, `0` minimum
//! digits and `#` optional digits, e.g. `#,##0.00` or `$#,##0.##`.

use crate::format::FormatError;
use crate::types::Locale;

/// Locale-dependent decimal and grouping separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSymbols {
    pub decimal: char,
    pub group: char,
}

/// Default separators by language. A small table covers the languages the
/// packs ship; everything else gets the `en` convention.
pub fn symbols_for(locale: &Locale) -> DecimalSymbols {
    match locale.language() {
        "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" | "da" => DecimalSymbols {
            decimal: ',',
            group: '.',
        },
        "fr" | "pl" | "ru" | "cs" | "sk" | "sv" | "nb" | "fi" | "uk" => DecimalSymbols {
            decimal: ',',
            group: '\u{a0}',
        },
        _ => DecimalSymbols {
            decimal: '.',
            group: ',',
        },
    }
}

/// A parsed decimal pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalPattern {
    prefix: String,
    suffix: String,
    group_size: usize,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
}

impl DecimalPattern {
    /// The `#,##0.###` pattern: grouped, up to three fraction digits.
    pub fn default_number() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            group_size: 3,
            min_int: 1,
            min_frac: 0,
            max_frac: 3,
        }
    }

    /// A grouped pattern with a fixed number of fraction digits.
    pub fn with_fraction_digits(digits: usize) -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            group_size: 3,
            min_int: 1,
            min_frac: digits,
            max_frac: digits,
        }
    }

    pub fn parse(pattern: &str) -> Result<Self, FormatError> {
        let error = |reason: &str| FormatError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };
        let body_start = pattern
            .find(['#', '0'])
            .ok_or_else(|| error("no digit placeholders"))?;
        let prefix = pattern[..body_start].to_string();
        let rest = &pattern[body_start..];
        let body_len = rest
            .find(|c| !matches!(c, '#' | '0' | ',' | '.'))
            .unwrap_or(rest.len());
        let body = &rest[..body_len];
        let suffix = rest[body_len..].to_string();

        let (int_part, frac_part) = match body.find('.') {
            Some(pos) => {
                let frac = &body[pos + 1..];
                if frac.contains(['.', ',']) {
                    return Err(error("malformed fraction part"));
                }
                (&body[..pos], frac)
            }
            None => (body, ""),
        };

        let group_size = match int_part.rfind(',') {
            Some(pos) => int_part.len() - pos - 1,
            None => 0,
        };
        if int_part.contains(',') && group_size == 0 {
            return Err(error("grouping separator at end of integer part"));
        }
        let min_int = int_part.chars().filter(|&c| c == '0').count().max(1);
        let min_frac = frac_part.chars().filter(|&c| c == '0').count();
        let max_frac = frac_part.len();

        Ok(Self {
            prefix,
            suffix,
            group_size,
            min_int,
            min_frac,
            max_frac,
        })
    }

    /// Whether the pattern carries a `¤` currency placeholder in its
    /// literal prefix or suffix.
    pub fn has_currency_placeholder(&self) -> bool {
        self.prefix.contains('¤') || self.suffix.contains('¤')
    }

    pub fn format(&self, value: f64, symbols: DecimalSymbols) -> String {
        let negative = value < 0.0;
        let rounded = format!("{:.*}", self.max_frac, value.abs());
        let (int_digits, frac_digits) = match rounded.split_once('.') {
            Some((int, frac)) => (int.to_string(), frac.to_string()),
            None => (rounded, String::new()),
        };
        self.assemble(negative, &int_digits, &frac_digits, symbols)
    }

    pub fn format_int(&self, value: i64, symbols: DecimalSymbols) -> String {
        let negative = value < 0;
        let int_digits = value.unsigned_abs().to_string();
        self.assemble(negative, &int_digits, "", symbols)
    }

    fn assemble(
        &self,
        negative: bool,
        int_digits: &str,
        frac_digits: &str,
        symbols: DecimalSymbols,
    ) -> String {
        let mut int_digits = int_digits.to_string();
        while int_digits.len() < self.min_int {
            int_digits.insert(0, '0');
        }

        let mut frac = frac_digits.trim_end_matches('0').to_string();
        while frac.len() < self.min_frac {
            frac.push('0');
        }

        let mut out = String::new();
        if negative && (!int_digits.chars().all(|c| c == '0') || !frac.chars().all(|c| c == '0')) {
            out.push('-');
        }
        out.push_str(&self.prefix);

        let digits: Vec<char> = int_digits.chars().collect();
        for (i, c) in digits.iter().enumerate() {
            if self.group_size > 0 && i > 0 && (digits.len() - i) % self.group_size == 0 {
                out.push(symbols.group);
            }
            out.push(*c);
        }

        if !frac.is_empty() {
            out.push(symbols.decimal);
            out.push_str(&frac);
        }
        out.push_str(&self.suffix);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: DecimalSymbols = DecimalSymbols {
        decimal: '.',
        group: ',',
    };

    #[test]
    fn default_number_groups_thousands() {
        let pattern = DecimalPattern::default_number();
        assert_eq!(pattern.format_int(1234567, EN), "1,234,567");
        assert_eq!(pattern.format(1234.5, EN), "1,234.5");
    }

    #[test]
    fn respects_min_and_max_fraction_digits() {
        let pattern = DecimalPattern::parse("0.00##").unwrap();
        assert_eq!(pattern.format(1.0, EN), "1.00");
        assert_eq!(pattern.format(1.23456, EN), "1.2346");
    }

    #[test]
    fn keeps_literal_prefix_and_suffix() {
        let pattern = DecimalPattern::parse("$#,##0.00").unwrap();
        assert_eq!(pattern.format(1234.5, EN), "$1,234.50");
        let pattern = DecimalPattern::parse("#0%").unwrap();
        assert_eq!(pattern.format_int(85, EN), "85%");
    }

    #[test]
    fn negative_sign_precedes_prefix() {
        let pattern = DecimalPattern::parse("$0.00").unwrap();
        assert_eq!(pattern.format(-1.5, EN), "-$1.50");
    }

    #[test]
    fn localized_symbols_apply() {
        let symbols = symbols_for(&Locale::new("de"));
        let pattern = DecimalPattern::parse("#,##0.00").unwrap();
        assert_eq!(pattern.format(1234.5, symbols), "1.234,50");
    }

    #[test]
    fn rejects_patterns_without_digits() {
        assert!(DecimalPattern::parse("abc").is_err());
    }
}
