use std::io::Write;

use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use finboard_parsing::{Extraction, ExtractionConfig, Figure, FigureSource};
use finboard_reporting::{DashboardView, PlainStyle, TextStyle, render_text};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Terminal decoration for the shared dashboard layout.
struct TerminalStyle;

impl TextStyle for TerminalStyle {
    fn title(&self, s: &str) -> String {
        s.bold().to_string()
    }

    fn heading(&self, s: &str) -> String {
        s.bold().underline().to_string()
    }

    fn subtle(&self, s: &str) -> String {
        s.dimmed().to_string()
    }

    fn value(&self, s: &str) -> String {
        s.bold().to_string()
    }

    fn caption(&self, s: &str) -> String {
        s.green().to_string()
    }

    fn label(&self, s: &str) -> String {
        s.bold().blue().to_string()
    }

    fn bar(&self, s: &str) -> String {
        s.blue().to_string()
    }

    fn error(&self, s: &str) -> String {
        s.red().bold().to_string()
    }
}

/// Print the dashboard to the terminal.
pub fn print_dashboard(
    w: &mut dyn Write,
    view: &DashboardView,
    color: ColorMode,
) -> std::io::Result<()> {
    let style: &dyn TextStyle = if color.enabled() {
        &TerminalStyle
    } else {
        &PlainStyle
    };
    write!(w, "{}", render_text(view, style))
}

/// Print a load failure for `inspect`.
pub fn print_error(
    w: &mut dyn Write,
    name: &str,
    message: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}: {}", "ERROR".red().bold(), name.bold(), message)
    } else {
        writeln!(w, "ERROR {}: {}", name, message)
    }
}

/// Print the raw text the rules were run against.
pub fn print_text(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} ({} chars)", "EXTRACTED TEXT".bold().cyan(), text.chars().count())?;
    } else {
        writeln!(w, "EXTRACTED TEXT ({} chars)", text.chars().count())?;
    }
    writeln!(w, "{}", text)?;
    writeln!(w)?;
    Ok(())
}

/// Print per-rule provenance and the derived values.
pub fn print_inspection(
    w: &mut dyn Write,
    name: &str,
    config: &ExtractionConfig,
    extraction: &Extraction,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "INSPECT:".bold().cyan(), name.bold())?;
    } else {
        writeln!(w, "INSPECT: {}", name)?;
    }
    writeln!(w)?;

    let figures = [&extraction.revenue, &extraction.income, &extraction.azure];
    for (rule, figure) in config.rules().into_iter().zip(figures) {
        writeln!(w, "  {} /{}/", rule.name(), rule.pattern().as_str())?;
        print_figure(w, figure, color)?;
    }
    writeln!(w)?;

    let record = &extraction.record;
    let derived: [(&str, Decimal, &str); 3] = [
        ("margin", record.margin(), "%"),
        ("azure_mix", record.azure_mix(), "%"),
        ("other", record.other(), " $B"),
    ];
    for (label, value, unit) in derived {
        writeln!(w, "  {:<10} {}{}", label, value, unit)?;
    }

    let defaulted = extraction.defaulted();
    if defaulted > 0 {
        let msg = format!("{} of 3 figures fell back to defaults", defaulted);
        if color.enabled() {
            writeln!(w, "\n{}", msg.yellow())?;
        } else {
            writeln!(w, "\n{}", msg)?;
        }
    }
    Ok(())
}

fn print_figure(w: &mut dyn Write, figure: &Figure, color: ColorMode) -> std::io::Result<()> {
    match &figure.source {
        FigureSource::Matched { raw } => {
            if color.enabled() {
                writeln!(w, "    -> {} {} (captured {:?})", "MATCHED".green(), figure.value, raw)
            } else {
                writeln!(w, "    -> MATCHED {} (captured {:?})", figure.value, raw)
            }
        }
        FigureSource::Defaulted => {
            if color.enabled() {
                writeln!(w, "    -> {} {}", "DEFAULT".yellow(), figure.value)
            } else {
                writeln!(w, "    -> DEFAULT {}", figure.value)
            }
        }
    }
}
