//! Human-facing renderings of a [`QaReport`]: size labels, the one-line
//! summary, a plain-text report and the per-column metrics CSV.

use serde::Serialize;
use std::fmt::Write as _;
use std::io;

use crate::analysis::stats::round2;
use crate::models::{ColumnProfile, QaReport};

use super::score::{is_high_duplication, is_high_missing, qa_status, QualityScores};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `0 Bytes`, `1 KB`, `1.5 MB`: base 1024, at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", round2(value), SIZE_UNITS[unit])
}

/// One-line digest used in listings and API responses.
pub fn summary_line(report: &QaReport) -> String {
    if !report.is_valid {
        return format!("QA Failed: {}", report.errors.join(", "));
    }

    let mut line = format!(
        "{} rows, {} columns, {:.1}% missing, {} duplicates",
        report.total_rows,
        report.total_columns,
        report.missing_values_percentage,
        report.duplicate_rows_count
    );
    if report.has_warnings() {
        let _ = write!(line, ", {} warning(s)", report.warnings.len());
    }
    line
}

fn format_column(column: &ColumnProfile) -> String {
    let mut line = format!(
        "  [{}] {} ({}) unique={} missing={} ({:.2}%)",
        column.index,
        column.name,
        column.data_type(),
        column.unique_values,
        column.missing_values,
        column.missing_percentage
    );
    if is_high_missing(column) {
        line.push_str(" !");
    }
    if let Some(stats) = column.stats.numeric_stats() {
        let _ = write!(
            line,
            "\n      min={} max={} mean={:.2} median={} stdDev={:.2}",
            stats.min, stats.max, stats.mean, stats.median, stats.std_dev
        );
    }
    if let Some(stats) = column.stats.string_stats() {
        let _ = write!(
            line,
            "\n      length min={} max={} avg={:.2}",
            stats.min_length, stats.max_length, stats.avg_length
        );
    }
    if !column.sample_values.is_empty() {
        let _ = write!(line, "\n      samples: {}", column.sample_values.join(", "));
    }
    line
}

/// Multi-line plain-text report for terminals.
pub fn render_text(report: &QaReport) -> String {
    let mut out = String::new();
    let scores = QualityScores::from_report(report);

    let _ = writeln!(out, "QA report: {}", report.file_name);
    let _ = writeln!(out, "Status: {}", qa_status(report));
    let _ = writeln!(out, "Summary: {}", summary_line(report));
    let _ = writeln!(
        out,
        "Size: {}  Encoding: {}  Delimiter: {:?}",
        format_file_size(report.file_size),
        report.encoding,
        report.delimiter
    );
    if let Some(file_type) = report.file_type {
        let _ = writeln!(out, "File type: {}", file_type);
    }
    let _ = writeln!(
        out,
        "Scores: overall {:.1} ({}), completeness {:.1}, uniqueness {:.1}",
        scores.overall, scores.grade, scores.completeness, scores.uniqueness
    );
    let _ = writeln!(
        out,
        "Rows: {} total, {} complete, {} empty",
        report.total_rows, report.summary.complete_rows, report.summary.empty_rows
    );
    let _ = writeln!(
        out,
        "Missing values: {} ({:.2}%)",
        report.missing_values_count, report.missing_values_percentage
    );
    let duplicate_marker = if is_high_duplication(report) { " !" } else { "" };
    let _ = writeln!(
        out,
        "Duplicate rows: {} ({:.2}%){}",
        report.duplicate_rows_count, report.duplicate_rows_percentage, duplicate_marker
    );

    if !report.errors.is_empty() {
        let _ = writeln!(out, "\nErrors:");
        for error in &report.errors {
            let _ = writeln!(out, "  - {}", error);
        }
    }
    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in &report.warnings {
            let _ = writeln!(out, "  - {}", warning);
        }
    }
    if !report.column_metrics.is_empty() {
        let _ = writeln!(out, "\nColumns:");
        for column in &report.column_metrics {
            let _ = writeln!(out, "{}", format_column(column));
        }
    }

    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ColumnMetricsRow<'a> {
    name: &'a str,
    index: usize,
    data_type: String,
    unique_values: usize,
    missing_values: usize,
    missing_percentage: f64,
    min: Option<f64>,
    max: Option<f64>,
    mean: Option<f64>,
    median: Option<f64>,
    std_dev: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    avg_length: Option<f64>,
    sample_values: String,
}

impl<'a> From<&'a ColumnProfile> for ColumnMetricsRow<'a> {
    fn from(column: &'a ColumnProfile) -> Self {
        let numeric = column.stats.numeric_stats();
        let string = column.stats.string_stats();

        Self {
            name: &column.name,
            index: column.index,
            data_type: column.data_type().to_string(),
            unique_values: column.unique_values,
            missing_values: column.missing_values,
            missing_percentage: column.missing_percentage,
            min: numeric.map(|s| s.min),
            max: numeric.map(|s| s.max),
            mean: numeric.map(|s| s.mean),
            median: numeric.map(|s| s.median),
            std_dev: numeric.map(|s| s.std_dev),
            min_length: string.map(|s| s.min_length),
            max_length: string.map(|s| s.max_length),
            avg_length: string.map(|s| s.avg_length),
            sample_values: column.sample_values.join("; "),
        }
    }
}

/// Write one CSV row per column profile, header included.
pub fn write_column_metrics_csv<W: io::Write>(report: &QaReport, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if report.column_metrics.is_empty() {
        wtr.write_record([
            "name",
            "index",
            "dataType",
            "uniqueValues",
            "missingValues",
            "missingPercentage",
            "min",
            "max",
            "mean",
            "median",
            "stdDev",
            "minLength",
            "maxLength",
            "avgLength",
            "sampleValues",
        ])?;
    }
    for column in &report.column_metrics {
        wtr.serialize(ColumnMetricsRow::from(column))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileMeta;
    use crate::report::analyze_content;

    fn analyze(content: &str) -> QaReport {
        analyze_content(content, &FileMeta::new("t.csv", 2048), None)
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_summary_line_passed() {
        let report = analyze("a,b\n1,x\n2,y\n");
        assert_eq!(summary_line(&report), "2 rows, 2 columns, 0.0% missing, 0 duplicates");
    }

    #[test]
    fn test_summary_line_with_warnings() {
        let report = analyze("a,b\n1,x\n1,x\n");
        assert_eq!(
            summary_line(&report),
            "2 rows, 2 columns, 0.0% missing, 1 duplicates, 1 warning(s)"
        );
    }

    #[test]
    fn test_summary_line_failed() {
        assert_eq!(summary_line(&analyze("")), "QA Failed: File is empty");
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&analyze("id,name\n1,alice\n1,alice\n"));

        assert!(text.starts_with("QA report: t.csv\n"));
        assert!(text.contains("Status: passed_with_warnings"));
        assert!(text.contains("Size: 2 KB"));
        assert!(text.contains("Warnings:\n  - Found 1 duplicate row(s)"));
        assert!(text.contains("[0] id (number)"));
        assert!(text.contains("[1] name (string)"));
        assert!(!text.contains("Errors:"));
    }

    #[test]
    fn test_column_metrics_csv() {
        let report = analyze("id,name\n1,alice\n3,bob\n");
        let mut buf = Vec::new();
        write_column_metrics_csv(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "name,index,dataType,uniqueValues,missingValues,missingPercentage,min,max,mean,median,stdDev,minLength,maxLength,avgLength,sampleValues"
        );
        assert!(lines[1].starts_with("id,0,number,2,0,0.0,1.0,3.0,2.0,2.0,1.0,,,,"));
        assert!(lines[2].starts_with("name,1,string,2,0,0.0,,,,,,3,5,4.0,"));
        assert!(lines[2].ends_with("alice; bob"));
    }

    #[test]
    fn test_column_metrics_csv_without_columns() {
        let report = analyze("");
        let mut buf = Vec::new();
        write_column_metrics_csv(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
