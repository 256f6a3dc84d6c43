use std::io::Write;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::types::{DashboardView, ExportFormat, Panels, Series};

/// Width of the longest bar in text charts, in cells.
pub const BAR_WIDTH: usize = 40;

/// Decoration hooks for the text layout. Every method receives text that is
/// already padded, so styles that add escape codes do not disturb alignment.
/// The defaults produce plain text.
pub trait TextStyle {
    fn title(&self, s: &str) -> String {
        format!("{s}\n{}", "=".repeat(s.chars().count()))
    }

    fn heading(&self, s: &str) -> String {
        format!("{s}\n{}", "-".repeat(s.chars().count()))
    }

    fn subtle(&self, s: &str) -> String {
        s.to_string()
    }

    fn value(&self, s: &str) -> String {
        s.to_string()
    }

    fn caption(&self, s: &str) -> String {
        s.to_string()
    }

    fn label(&self, s: &str) -> String {
        s.to_string()
    }

    fn bar(&self, s: &str) -> String {
        s.to_string()
    }

    fn error(&self, s: &str) -> String {
        s.to_string()
    }
}

/// Undecorated text, used for file exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl TextStyle for PlainStyle {}

/// Render `view` and write it to `path`.
pub fn export_results(
    view: &DashboardView,
    format: ExportFormat,
    path: &Path,
) -> Result<(), String> {
    let content = render(view, format)?;

    let mut file =
        std::fs::File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| format!("Failed to write: {}", e))?;
    Ok(())
}

/// Render `view` in the given format.
pub fn render(view: &DashboardView, format: ExportFormat) -> Result<String, String> {
    match format {
        ExportFormat::Text => Ok(render_text(view, &PlainStyle)),
        ExportFormat::Markdown => Ok(export_markdown(view)),
        ExportFormat::Json => export_json(view),
    }
}

/// A horizontal bar of `value / max * width` cells. Zero, negative and
/// out-of-range values draw nothing.
pub fn bar(value: Decimal, max: Decimal, width: usize) -> String {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return String::new();
    }
    let cells = (value / max * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    "\u{2588}".repeat(cells)
}

/// Share of revenue for each mix slice, in percent. The Azure slice is the
/// record's own `azure_mix`; the rest of revenue is its complement.
pub fn mix_shares(panels: &Panels) -> Vec<(&'static str, Decimal, Decimal)> {
    let azure_mix = panels.record.azure_mix();
    let shares = [azure_mix, Decimal::ONE_HUNDRED - azure_mix];
    panels
        .mix
        .points
        .iter()
        .zip(shares)
        .map(|(p, share)| (p.label, p.value, share))
        .collect()
}

fn export_json(view: &DashboardView) -> Result<String, String> {
    serde_json::to_string_pretty(view).map_err(|e| format!("Failed to serialize: {}", e))
}

fn write_bars(out: &mut String, series: &Series, style: &dyn TextStyle) {
    let max = series.max();
    let label_width = series.points.iter().map(|p| p.label.len()).max().unwrap_or(0);
    out.push_str(series.title);
    out.push('\n');
    for p in &series.points {
        let cells = format!("{:<bar_width$}", bar(p.value, max, BAR_WIDTH), bar_width = BAR_WIDTH);
        out.push_str(&format!(
            "  {:<label_width$}  {}  {}\n",
            p.label,
            style.bar(&cells),
            p.value,
        ));
    }
}

/// The dashboard as a text page, decorated by `style`.
pub fn render_text(view: &DashboardView, style: &dyn TextStyle) -> String {
    let mut out = style.title(view.title);
    out.push('\n');
    out.push_str(&style.subtle(view.subtitle));
    out.push_str("\n\n");

    let Some(panels) = view.panels() else {
        if let Some(line) = view.error_line() {
            out.push_str(&style.error(&line));
            out.push('\n');
        }
        return out;
    };

    for card in &panels.cards {
        out.push_str(&format!(
            "  {:<18} {}   {}\n",
            card.label,
            style.value(&format!("{:>10}", card.value)),
            style.caption(card.caption)
        ));
    }
    out.push_str(&format!("\n{} {}\n\n", style.label("Brief:"), panels.brief));

    out.push_str(&style.heading("Performance Snapshot"));
    out.push('\n');
    write_bars(&mut out, &panels.pillars, style);
    out.push('\n');
    out.push_str(panels.mix.title);
    out.push('\n');
    for (label, value, share) in mix_shares(panels) {
        out.push_str(&format!("  {:<16} {:>8}  {:>6}%\n", label, value, share));
    }

    out.push('\n');
    out.push_str(&style.heading("Strategic Trends & Data Grid"));
    out.push('\n');
    write_bars(&mut out, &panels.trend, style);
    out.push('\n');
    out.push_str(&format!("  {:<18} {:>12}  {}\n", "Metric", "FY2025 ($B)", "Status"));
    for row in &panels.grid {
        out.push_str(&format!(
            "  {:<18} {:>12}  {}\n",
            row.metric, row.value, row.status
        ));
    }

    let ctx = &view.context;
    out.push('\n');
    out.push_str(&style.heading("Research Context"));
    out.push('\n');
    out.push_str(&format!("  Researcher: {}\n", ctx.researcher));
    out.push_str(&format!("  Focus: {}\n", ctx.focus));
    out.push_str(&format!("  Version: {}\n", ctx.version));
    out.push_str(&format!("  Source: {} <{}>\n", ctx.source_label, ctx.source_url));
    out.push_str(&format!("  {}\n", style.subtle(ctx.caption)));
    out
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

fn export_markdown(view: &DashboardView) -> String {
    let mut out = format!("# {}\n\n_{}_\n\n", view.title, view.subtitle);

    let Some(panels) = view.panels() else {
        if let Some(line) = view.error_line() {
            out.push_str(&format!("> **{}**\n", line));
        }
        return out;
    };

    out.push_str("| Metric | Value | Note |\n|---|---:|---|\n");
    for card in &panels.cards {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            card.label,
            md_escape(&card.value),
            card.caption
        ));
    }
    out.push_str(&format!("\n> **Brief:** {}\n\n", panels.brief));

    out.push_str("## Performance Snapshot\n\n");
    out.push_str(&format!("### {}\n\n", panels.pillars.title));
    for p in &panels.pillars.points {
        out.push_str(&format!("- **{}:** {}\n", p.label, p.value));
    }
    out.push_str(&format!("\n### {}\n\n", panels.mix.title));
    for (label, value, share) in mix_shares(panels) {
        out.push_str(&format!("- **{}:** {} ({}%)\n", label, value, share));
    }

    out.push_str("\n## Strategic Trends & Data Grid\n\n");
    let trend: Vec<String> = panels
        .trend
        .points
        .iter()
        .map(|p| format!("{} {}", p.label, p.value))
        .collect();
    out.push_str(&format!("**{}:** {}\n\n", panels.trend.title, trend.join(" \u{2192} ")));

    out.push_str("| Metric | FY2025 ($B) | Status |\n|---|---:|---|\n");
    for row in &panels.grid {
        out.push_str(&format!("| {} | {} | {} |\n", row.metric, row.value, row.status));
    }

    let ctx = &view.context;
    out.push_str("\n## Research Context\n\n");
    out.push_str(&format!("- **Researcher:** {}\n", ctx.researcher));
    out.push_str(&format!("- **Focus:** {}\n", ctx.focus));
    out.push_str(&format!("- **Version:** {}\n", ctx.version));
    out.push_str(&format!("- [{}]({})\n\n", ctx.source_label, ctx.source_url));
    out.push_str(&format!("_{}_\n", ctx.caption));
    out
}
