use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use finboard_core::config_file::ConfigFile;

use crate::rules::{self, ExtractionRule};

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid pattern for rule `{rule}`: {source}")]
    Regex {
        rule: &'static str,
        source: regex::Error,
    },
    #[error("pattern for rule `{rule}` has no capture group for the figure")]
    MissingCapture { rule: &'static str },
    #[error("default for rule `{rule}` is not a finite number: {value}")]
    InvalidDefault { rule: &'static str, value: f64 },
}

/// Configuration for the metrics extraction pipeline: one rule per figure.
///
/// Use [`ExtractionConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub(crate) revenue: ExtractionRule,
    pub(crate) income: ExtractionRule,
    pub(crate) azure: ExtractionRule,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            revenue: ExtractionRule::revenue(),
            income: ExtractionRule::operating_income(),
            azure: ExtractionRule::azure(),
        }
    }
}

impl ExtractionConfig {
    pub fn revenue_rule(&self) -> &ExtractionRule {
        &self.revenue
    }

    pub fn income_rule(&self) -> &ExtractionRule {
        &self.income
    }

    pub fn azure_rule(&self) -> &ExtractionRule {
        &self.azure
    }

    /// All three rules, in record order.
    pub fn rules(&self) -> [&ExtractionRule; 3] {
        [&self.revenue, &self.income, &self.azure]
    }
}

/// Builder for [`ExtractionConfig`].
///
/// Accepts string patterns that are compiled in [`build()`](Self::build).
/// Fails fast if a pattern is invalid or has no capture group.
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfigBuilder {
    revenue_re: Option<String>,
    income_re: Option<String>,
    azure_re: Option<String>,
    revenue_default: Option<Decimal>,
    income_default: Option<Decimal>,
    azure_default: Option<Decimal>,
    // `[defaults]` from a config file, checked for finiteness in `build()`.
    revenue_float: Option<f64>,
    income_float: Option<f64>,
    azure_float: Option<f64>,
}

impl ExtractionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from the `[rules]` and `[defaults]` tables of a config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let mut builder = Self::new();
        if let Some(rules) = &config.rules {
            builder.revenue_re = rules.revenue_pattern.clone();
            builder.income_re = rules.income_pattern.clone();
            builder.azure_re = rules.azure_pattern.clone();
        }
        if let Some(defaults) = &config.defaults {
            builder.revenue_float = defaults.revenue;
            builder.income_float = defaults.income;
            builder.azure_float = defaults.azure;
        }
        builder
    }

    // ── Patterns ──

    pub fn revenue_regex(mut self, pattern: &str) -> Self {
        self.revenue_re = Some(pattern.to_string());
        self
    }

    pub fn income_regex(mut self, pattern: &str) -> Self {
        self.income_re = Some(pattern.to_string());
        self
    }

    pub fn azure_regex(mut self, pattern: &str) -> Self {
        self.azure_re = Some(pattern.to_string());
        self
    }

    // ── Defaults ──

    pub fn revenue_default(mut self, value: Decimal) -> Self {
        self.revenue_default = Some(value);
        self
    }

    pub fn income_default(mut self, value: Decimal) -> Self {
        self.income_default = Some(value);
        self
    }

    pub fn azure_default(mut self, value: Decimal) -> Self {
        self.azure_default = Some(value);
        self
    }

    /// Compile all patterns and produce an [`ExtractionConfig`].
    pub fn build(self) -> Result<ExtractionConfig, RuleError> {
        let revenue = compile_rule(rules::REVENUE, self.revenue_re, ExtractionRule::revenue())?;
        let income = compile_rule(
            rules::OPERATING_INCOME,
            self.income_re,
            ExtractionRule::operating_income(),
        )?;
        let azure = compile_rule(rules::AZURE, self.azure_re, ExtractionRule::azure())?;

        let mut revenue = apply_float_default(rules::REVENUE, revenue, self.revenue_float)?;
        let mut income = apply_float_default(rules::OPERATING_INCOME, income, self.income_float)?;
        let mut azure = apply_float_default(rules::AZURE, azure, self.azure_float)?;

        // Typed defaults set on the builder win over config-file floats.
        if let Some(v) = self.revenue_default {
            revenue = revenue.with_default(v);
        }
        if let Some(v) = self.income_default {
            income = income.with_default(v);
        }
        if let Some(v) = self.azure_default {
            azure = azure.with_default(v);
        }

        Ok(ExtractionConfig {
            revenue,
            income,
            azure,
        })
    }
}

fn apply_float_default(
    name: &'static str,
    rule: ExtractionRule,
    value: Option<f64>,
) -> Result<ExtractionRule, RuleError> {
    let Some(value) = value else {
        return Ok(rule);
    };
    let default =
        Decimal::try_from(value).map_err(|_| RuleError::InvalidDefault { rule: name, value })?;
    Ok(rule.with_default(default))
}

fn compile_rule(
    name: &'static str,
    pattern: Option<String>,
    builtin: ExtractionRule,
) -> Result<ExtractionRule, RuleError> {
    let Some(pattern) = pattern else {
        return Ok(builtin);
    };
    let re = Regex::new(&pattern).map_err(|source| RuleError::Regex { rule: name, source })?;
    // captures_len counts the implicit whole-match group.
    if re.captures_len() < 2 {
        return Err(RuleError::MissingCapture { rule: name });
    }
    Ok(ExtractionRule::new(name, re, builtin.default_value()))
}

#[cfg(test)]
mod tests {
    use finboard_core::config_file::{DefaultsConfig, RulesConfig};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        let names: Vec<&str> = config.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["revenue", "operating_income", "azure"]);
        assert_eq!(config.revenue_rule().default_value(), dec!(281.7));
        assert_eq!(config.income_rule().default_value(), dec!(128.5));
        assert_eq!(config.azure_rule().default_value(), dec!(75.0));
    }

    #[test]
    fn test_builder_custom_regex() {
        let config = ExtractionConfigBuilder::new()
            .azure_regex(r"Intelligent Cloud revenue was \$([\d.]+)")
            .build()
            .unwrap();
        assert_eq!(
            config
                .azure_rule()
                .find("Intelligent Cloud revenue was $106.3 billion"),
            Some("106.3")
        );
        // The other rules and the default are untouched.
        assert_eq!(config.azure_rule().default_value(), dec!(75.0));
        assert_eq!(config.revenue_rule().pattern().as_str(), rules::REVENUE_PATTERN);
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ExtractionConfigBuilder::new()
            .revenue_regex(r"[invalid")
            .build();
        assert!(matches!(
            result,
            Err(RuleError::Regex {
                rule: "revenue",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_requires_capture_group() {
        let result = ExtractionConfigBuilder::new()
            .income_regex(r"Operating income grew")
            .build();
        assert!(matches!(
            result,
            Err(RuleError::MissingCapture {
                rule: "operating_income"
            })
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ExtractionConfigBuilder::new()
            .revenue_default(dec!(211.9))
            .build()
            .unwrap();
        assert_eq!(config.revenue_rule().default_value(), dec!(211.9));
        assert_eq!(config.income_rule().default_value(), dec!(128.5));
    }

    #[test]
    fn test_from_config_file() {
        let file = ConfigFile {
            rules: Some(RulesConfig {
                revenue_pattern: Some(r"Total revenue: \$([\d.]+)".to_string()),
                ..Default::default()
            }),
            defaults: Some(DefaultsConfig {
                azure: Some(80.5),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = ExtractionConfigBuilder::from_config_file(&file)
            .build()
            .unwrap();
        assert_eq!(config.revenue_rule().find("Total revenue: $12.5"), Some("12.5"));
        assert_eq!(config.azure_rule().default_value(), dec!(80.5));
    }

    #[test]
    fn test_config_defaults_land_on_their_own_rules() {
        let file = ConfigFile {
            defaults: Some(DefaultsConfig {
                revenue: Some(300.0),
                income: Some(120.5),
                azure: Some(90.25),
            }),
            ..Default::default()
        };
        let config = ExtractionConfigBuilder::from_config_file(&file)
            .azure_default(dec!(91))
            .build()
            .unwrap();
        assert_eq!(config.revenue_rule().default_value(), dec!(300));
        assert_eq!(config.income_rule().default_value(), dec!(120.5));
        // A typed builder default wins over the config file.
        assert_eq!(config.azure_rule().default_value(), dec!(91));
    }

    #[test]
    fn test_non_finite_default_is_rejected() {
        let file = ConfigFile {
            defaults: Some(DefaultsConfig {
                income: Some(f64::NAN),
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = ExtractionConfigBuilder::from_config_file(&file).build();
        assert!(matches!(
            result,
            Err(RuleError::InvalidDefault {
                rule: "operating_income",
                ..
            })
        ));
    }
}
