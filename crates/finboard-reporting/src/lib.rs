//! Presentation of a loaded metrics record: a view model describing the
//! dashboard page and exports of it. Nothing here computes metrics; it only
//! formats what [`finboard_core::LoadOutcome`] carries.

pub mod export;
pub mod types;

pub use export::{
    BAR_WIDTH, PlainStyle, TextStyle, bar, export_results, mix_shares, render, render_text,
};
pub use types::{
    DashboardView, ExportFormat, GridRow, MetricCard, NET_PROFIT_ESTIMATE, Panels, Point,
    ResearchContext, Series, ViewBody,
};
