use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use finboard_core::{LoadOutcome, MetricsRecord};

pub const DASHBOARD_TITLE: &str = "Microsoft Corp: Financial Research Dashboard";
pub const DASHBOARD_SUBTITLE: &str = "Academic Review of FY2025 Performance Metrics";

/// Net profit shown in the data grid. This is a fixed estimate and is not
/// extracted from the report, unlike every other figure on the page.
pub const NET_PROFIT_ESTIMATE: Decimal = dec!(101.8);

/// Output format for [`export_results`](crate::export_results).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown format '{other}' (expected text, markdown or json)"
            )),
        }
    }
}

/// One headline number with its static caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub caption: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: &'static str,
    pub value: Decimal,
}

/// A titled list of labelled values, drawn as bars, slices or a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub title: &'static str,
    pub points: Vec<Point>,
}

impl Series {
    /// Largest value in the series, or zero when it is empty or all negative.
    pub fn max(&self) -> Decimal {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(Decimal::ZERO, Decimal::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub metric: &'static str,
    pub value: Decimal,
    pub status: &'static str,
}

/// Static sidebar content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchContext {
    pub researcher: &'static str,
    pub focus: &'static str,
    pub version: &'static str,
    pub source_label: &'static str,
    pub source_url: &'static str,
    pub caption: &'static str,
}

impl Default for ResearchContext {
    fn default() -> Self {
        Self {
            researcher: "Beta Analyst",
            focus: "Cloud Economics",
            version: "1.0",
            source_label: "Official Microsoft 2025 Annual Report",
            source_url: "https://www.microsoft.com/en-us/investor/annual-reports.aspx",
            caption: "Extracted and analyzed for academic review.",
        }
    }
}

/// Everything drawn when a record is available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panels {
    pub record: MetricsRecord,
    pub cards: Vec<MetricCard>,
    pub brief: String,
    pub pillars: Series,
    pub mix: Series,
    pub trend: Series,
    pub grid: Vec<GridRow>,
}

impl Panels {
    pub fn from_record(record: &MetricsRecord) -> Self {
        let cards = vec![
            MetricCard {
                label: "Total Revenue",
                value: format!("${}B", record.revenue()),
                caption: "15% YoY",
            },
            MetricCard {
                label: "Operating Margin",
                value: format!("{}%", record.margin()),
                caption: "Efficiency",
            },
            MetricCard {
                label: "Azure Segment",
                value: format!("${}B", record.azure()),
                caption: "34% Growth",
            },
            MetricCard {
                label: "Cloud Mix",
                value: format!("{}%", record.azure_mix()),
                caption: "Core Driver",
            },
        ];

        let brief = format!(
            "FY2025 analysis confirms Microsoft's pivot to an AI-first cloud architecture. \
             With Azure now contributing {}% of total revenue, the scalability is reflected \
             in a healthy {}% operating margin despite aggressive infrastructure spending.",
            record.azure_mix(),
            record.margin()
        );

        let pillars = Series {
            title: "Core Financial Pillars ($B)",
            points: vec![
                Point {
                    label: "Total Revenue",
                    value: record.revenue(),
                },
                Point {
                    label: "Op. Income",
                    value: record.income(),
                },
                Point {
                    label: "Azure Revenue",
                    value: record.azure(),
                },
            ],
        };

        let mix = Series {
            title: "Revenue Diversification Mix",
            points: vec![
                Point {
                    label: "Azure Cloud",
                    value: record.azure(),
                },
                Point {
                    label: "Other Business",
                    value: record.other(),
                },
            ],
        };

        let trend = Series {
            title: "Performance Scaling FY25",
            points: vec![
                Point {
                    label: "Revenue",
                    value: record.revenue(),
                },
                Point {
                    label: "Operating Income",
                    value: record.income(),
                },
                Point {
                    label: "Azure",
                    value: record.azure(),
                },
            ],
        };

        let grid = vec![
            GridRow {
                metric: "Gross Revenue",
                value: record.revenue(),
                status: "Record High",
            },
            GridRow {
                metric: "Op. Profit",
                value: record.income(),
                status: "Healthy",
            },
            GridRow {
                metric: "Azure Cloud",
                value: record.azure(),
                status: "Market Leader",
            },
            GridRow {
                metric: "Net Profit (Est)",
                value: NET_PROFIT_ESTIMATE,
                status: "Consistent",
            },
        ];

        Self {
            record: record.clone(),
            cards,
            brief,
            pillars,
            mix,
            trend,
            grid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewBody {
    Ready(Box<Panels>),
    Error { message: String },
}

/// The whole page: header, body and sidebar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub body: ViewBody,
    pub context: ResearchContext,
}

impl DashboardView {
    pub fn from_outcome(outcome: &LoadOutcome) -> Self {
        let body = match outcome {
            LoadOutcome::Ready(record) => ViewBody::Ready(Box::new(Panels::from_record(record))),
            LoadOutcome::Unavailable(message) => ViewBody::Error {
                message: message.clone(),
            },
        };
        Self {
            title: DASHBOARD_TITLE,
            subtitle: DASHBOARD_SUBTITLE,
            body,
            context: ResearchContext::default(),
        }
    }

    pub fn panels(&self) -> Option<&Panels> {
        match &self.body {
            ViewBody::Ready(panels) => Some(panels),
            ViewBody::Error { .. } => None,
        }
    }

    /// The line shown in place of the panels when there is no record.
    pub fn error_line(&self) -> Option<String> {
        match &self.body {
            ViewBody::Ready(_) => None,
            ViewBody::Error { message } => {
                Some(format!("\u{26a0}\u{fe0f} Data Source Error: {message}"))
            }
        }
    }
}
