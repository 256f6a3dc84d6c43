//! Loading real PDF reports through the MuPDF backend.
#![cfg(feature = "pdf")]

use std::path::PathBuf;

use finboard_core::mock::write_text_pdf;
use finboard_core::MetricsRecord;
use finboard_ingest::ReportLoader;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn write_report(dir: &TempDir, pages: &[&[&str]]) -> PathBuf {
    let path = dir.path().join("2025_AnnualReport1.pdf");
    write_text_pdf(&path, pages).unwrap();
    path
}

#[test]
fn pdf_report_is_read_through_mupdf() {
    let dir = tempfile::tempdir().unwrap();
    let pages: [&[&str]; 2] = [
        &["Dear shareholders,", "Revenue was $245.1 billion"],
        &[
            "Operating income grew 24% to $109.4 billion",
            "Azure surpassed $90.5 billion",
        ],
    ];
    let path = write_report(&dir, &pages);

    let extraction = ReportLoader::new().extract(&path).unwrap();
    assert_eq!(extraction.defaulted(), 0);
    assert_eq!(extraction.record.revenue(), dec!(245.1));
    assert_eq!(extraction.record.income(), dec!(109.4));
    assert_eq!(extraction.record.azure(), dec!(90.5));
    assert_eq!(extraction.record.other(), dec!(154.6));
}

#[test]
fn figures_past_the_page_limit_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let pages: [&[&str]; 3] = [
        &["Revenue was $245.1 billion"],
        &["Letter continues"],
        &["Azure surpassed $90.5 billion"],
    ];
    let path = write_report(&dir, &pages);

    let record = ReportLoader::new().load(&path).unwrap();
    assert_eq!(record.azure(), dec!(75.0));

    let record = ReportLoader::new().with_max_pages(0).load(&path).unwrap();
    assert_eq!(record.azure(), dec!(90.5));
}

#[test]
fn income_sentence_split_across_lines_is_not_matched() {
    let dir = tempfile::tempdir().unwrap();
    let pages: [&[&str]; 1] = [&["Operating income grew strongly", "to $109.4 billion"]];
    let path = write_report(&dir, &pages);

    let extraction = ReportLoader::new().extract(&path).unwrap();
    assert!(extraction.income.is_default());
    assert_eq!(extraction.record.income(), dec!(128.5));
}

#[test]
fn pdf_without_figures_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let pages: [&[&str]; 1] = [&["Annual Report 2025"]];
    let path = write_report(&dir, &pages);
    assert_eq!(
        ReportLoader::new().load(&path).unwrap(),
        MetricsRecord::with_defaults()
    );
}
