//! The metrics record and the arithmetic that derives its ratio fields.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::ExtractionError;

/// Revenue used when the report text has no revenue sentence ($B).
pub const DEFAULT_REVENUE: Decimal = dec!(281.7);
/// Operating income used when the report text has no income sentence ($B).
pub const DEFAULT_INCOME: Decimal = dec!(128.5);
/// Azure revenue used when the report text has no Azure sentence ($B).
pub const DEFAULT_AZURE: Decimal = dec!(75.0);

const HUNDRED: Decimal = dec!(100);
const RATIO_DP: u32 = 2;

/// Headline figures for one reporting period plus the values derived from them.
///
/// Built once by [`MetricsRecord::derive`] and never mutated afterwards.
/// The base figures are not checked for plausibility: a negative figure or
/// an Azure figure larger than revenue is carried through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricsRecord {
    revenue: Decimal,
    income: Decimal,
    azure: Decimal,
    margin: Decimal,
    azure_mix: Decimal,
    other: Decimal,
}

impl MetricsRecord {
    /// Compute margin, cloud mix and non-Azure revenue from the three base figures.
    ///
    /// Zero revenue is rejected with [`ExtractionError::ArithmeticAnomaly`]
    /// since both ratios divide by it.
    pub fn derive(
        revenue: Decimal,
        income: Decimal,
        azure: Decimal,
    ) -> Result<Self, ExtractionError> {
        if revenue.is_zero() {
            return Err(ExtractionError::ArithmeticAnomaly(
                "revenue is zero; operating margin and cloud mix are undefined".to_string(),
            ));
        }

        let margin = percent_of(income, revenue)?;
        let azure_mix = percent_of(azure, revenue)?;
        let other = revenue.checked_sub(azure).ok_or_else(|| {
            ExtractionError::ArithmeticAnomaly(format!(
                "revenue {revenue} minus azure {azure} overflows"
            ))
        })?;

        Ok(Self {
            revenue,
            income,
            azure,
            margin,
            azure_mix,
            other,
        })
    }

    /// The record built entirely from the fallback figures.
    pub fn with_defaults() -> Self {
        Self {
            revenue: DEFAULT_REVENUE,
            income: DEFAULT_INCOME,
            azure: DEFAULT_AZURE,
            margin: dec!(45.62),
            azure_mix: dec!(26.62),
            other: dec!(206.7),
        }
    }

    /// Total revenue, $B.
    pub fn revenue(&self) -> Decimal {
        self.revenue
    }

    /// Operating income, $B.
    pub fn income(&self) -> Decimal {
        self.income
    }

    /// Azure segment revenue, $B.
    pub fn azure(&self) -> Decimal {
        self.azure
    }

    /// Operating margin in percent, two decimal places.
    pub fn margin(&self) -> Decimal {
        self.margin
    }

    /// Azure share of revenue in percent, two decimal places.
    pub fn azure_mix(&self) -> Decimal {
        self.azure_mix
    }

    /// Revenue outside Azure, $B. Negative when Azure exceeds revenue.
    pub fn other(&self) -> Decimal {
        self.other
    }
}

/// `part / whole * 100`, rounded half-to-even at two places.
fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal, ExtractionError> {
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(HUNDRED))
        .map(|p| p.round_dp_with_strategy(RATIO_DP, RoundingStrategy::MidpointNearestEven))
        .ok_or_else(|| {
            ExtractionError::ArithmeticAnomaly(format!(
                "{part} / {whole} is out of range for a percentage"
            ))
        })
}
