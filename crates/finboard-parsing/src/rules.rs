use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use finboard_core::{DEFAULT_AZURE, DEFAULT_INCOME, DEFAULT_REVENUE, ExtractionError};

/// Name of the total revenue rule.
pub const REVENUE: &str = "revenue";
/// Name of the operating income rule.
pub const OPERATING_INCOME: &str = "operating_income";
/// Name of the Azure segment rule.
pub const AZURE: &str = "azure";

/// `Revenue was $281.7`
pub const REVENUE_PATTERN: &str = r"Revenue\s*was\s*\$([\d.]+)";
/// `Operating income grew 17% to $128.5` (anything but a newline between)
pub const OPERATING_INCOME_PATTERN: &str = r"Operating\s*income\s*grew.*?\$([\d.]+)";
/// `Azure surpassed $75.0`
pub const AZURE_PATTERN: &str = r"Azure\s*surpassed\s*\$([\d.]+)";

static REVENUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(REVENUE_PATTERN).unwrap());
static OPERATING_INCOME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(OPERATING_INCOME_PATTERN).unwrap());
static AZURE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(AZURE_PATTERN).unwrap());

/// Where a figure in the record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FigureSource {
    /// The rule matched; `raw` is the captured numeral as it appeared.
    Matched { raw: String },
    /// The rule did not match and the rule's default was used.
    Defaulted,
}

/// A base figure together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub value: Decimal,
    pub source: FigureSource,
}

impl Figure {
    pub fn is_default(&self) -> bool {
        self.source == FigureSource::Defaulted
    }
}

/// A named rule that locates one figure in free text: a phrase anchor
/// followed by a `$<number>` capture, plus the value to use when the phrase
/// is absent.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    name: String,
    pattern: Regex,
    default: Decimal,
}

impl ExtractionRule {
    /// Build a rule. `pattern` must have at least one capture group; the
    /// first group is the figure.
    pub fn new(name: impl Into<String>, pattern: Regex, default: Decimal) -> Self {
        Self {
            name: name.into(),
            pattern,
            default,
        }
    }

    /// The built-in total revenue rule.
    pub fn revenue() -> Self {
        Self::new(REVENUE, REVENUE_RE.clone(), DEFAULT_REVENUE)
    }

    /// The built-in operating income rule.
    pub fn operating_income() -> Self {
        Self::new(OPERATING_INCOME, OPERATING_INCOME_RE.clone(), DEFAULT_INCOME)
    }

    /// The built-in Azure segment revenue rule.
    pub fn azure() -> Self {
        Self::new(AZURE, AZURE_RE.clone(), DEFAULT_AZURE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn default_value(&self) -> Decimal {
        self.default
    }

    /// Return a copy of this rule with a different fallback value.
    pub fn with_default(mut self, default: Decimal) -> Self {
        self.default = default;
        self
    }

    /// The raw numeral captured by the first match in `text`, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Locate this rule's figure in `text`, falling back to the default.
    pub fn apply(&self, text: &str) -> Result<Figure, ExtractionError> {
        match self.find(text) {
            Some(raw) => {
                let value = parse_figure(&self.name, raw)?;
                tracing::debug!(rule = %self.name, raw, %value, "rule matched");
                Ok(Figure {
                    value,
                    source: FigureSource::Matched {
                        raw: raw.to_string(),
                    },
                })
            }
            None => {
                tracing::debug!(
                    rule = %self.name,
                    default = %self.default,
                    "rule missed, using default"
                );
                Ok(Figure {
                    value: self.default,
                    source: FigureSource::Defaulted,
                })
            }
        }
    }
}

/// Parse a captured numeral exactly as captured. Anything that is not a plain
/// ASCII decimal, including a sentence period swallowed after the figure
/// (`281.7.`), is an error.
pub fn parse_figure(rule: &str, raw: &str) -> Result<Decimal, ExtractionError> {
    let invalid = || ExtractionError::InvalidNumber {
        rule: rule.to_string(),
        raw: raw.to_string(),
    };

    if !raw.bytes().any(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    Decimal::from_str(raw).map_err(|_| invalid())
}
