use crate::core::{Probability, Result, RiskLevel};
use crate::gap::{CategoryScore, ChecklistItem, ComplianceBand, GapScore};
use crate::risk::{CategorySummary, RiskMatrix, RiskRegisterRow};
use colored::*;
use comfy_table::{Cell, Color, Table};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

/// Register with the reports derived from it
#[derive(Debug, Clone, Serialize)]
pub struct RegisterReport {
    pub rows: Vec<RiskRegisterRow>,
    pub high_priority_threshold: u8,
    pub high_priority: Vec<RiskRegisterRow>,
    pub category_summary: Vec<CategorySummary>,
}

/// Gap score with its breakdown and must-fix items
#[derive(Debug, Clone, Serialize)]
pub struct GapReport {
    pub score: GapScore,
    pub categories: Vec<CategoryScore>,
    pub critical_gaps: Vec<ChecklistItem>,
}

pub trait ReportWriter {
    fn write_register(&mut self, report: &RegisterReport) -> Result<()>;
    fn write_gap(&mut self, report: &GapReport) -> Result<()>;
    fn write_matrix(&mut self, matrix: &RiskMatrix) -> Result<()>;

    /// Flush buffered output so write failures surface as errors.
    fn finish(&mut self) -> Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_register(&mut self, report: &RegisterReport) -> Result<()> {
        self.write_json(report)
    }

    fn write_gap(&mut self, report: &GapReport) -> Result<()> {
        self.write_json(report)
    }

    fn write_matrix(&mut self, matrix: &RiskMatrix) -> Result<()> {
        let rows: Vec<MatrixRow> = matrix
            .rows()
            .map(|(severity, cells)| MatrixRow {
                severity: severity.name(),
                cells: cells.to_vec(),
            })
            .collect();
        self.write_json(&rows)
    }
}

#[derive(Serialize)]
struct MatrixRow {
    severity: &'static str,
    cells: Vec<RiskLevel>,
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_register_table(&mut self, rows: &[RiskRegisterRow]) -> Result<()> {
        writeln!(
            self.writer,
            "| Hazard | Category | Severity | Probability | Initial | Residual | Controls | Status |"
        )?;
        writeln!(
            self.writer,
            "|--------|----------|----------|-------------|---------|----------|----------|--------|"
        )?;
        for row in rows {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} ({}) | {} ({}) | {}/{} | {} |",
                row.hazard_id,
                row.category,
                row.severity,
                row.probability,
                row.initial_risk_score,
                row.initial_risk_level,
                row.residual_risk_score,
                row.residual_risk_level,
                row.implemented_controls,
                row.control_measures,
                row.status
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for MarkdownWriter<W> {
    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_register(&mut self, report: &RegisterReport) -> Result<()> {
        writeln!(self.writer, "# Risk Register")?;
        writeln!(self.writer)?;
        self.write_register_table(&report.rows)?;

        writeln!(
            self.writer,
            "## High Priority Risks (score >= {})",
            report.high_priority_threshold
        )?;
        writeln!(self.writer)?;
        if report.high_priority.is_empty() {
            writeln!(self.writer, "None.")?;
            writeln!(self.writer)?;
        } else {
            self.write_register_table(&report.high_priority)?;
        }

        writeln!(self.writer, "## Category Summary")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Category | Hazards | Mean Initial | Max Initial | Mean Residual | Max Residual |"
        )?;
        writeln!(
            self.writer,
            "|----------|---------|--------------|-------------|---------------|--------------|"
        )?;
        for summary in &report.category_summary {
            writeln!(
                self.writer,
                "| {} | {} | {:.2} | {} | {:.2} | {} |",
                summary.category,
                summary.count,
                summary.mean_initial_score,
                summary.max_initial_score,
                summary.mean_residual_score,
                summary.max_residual_score
            )?;
        }
        Ok(())
    }

    fn write_gap(&mut self, report: &GapReport) -> Result<()> {
        let score = &report.score;
        writeln!(self.writer, "# Compliance Gap Analysis")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "**Score:** {}% ({})",
            score.score_percent, score.band
        )?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Category | Items | Compliant | Partial | Non-compliant | Not assessed | Score |"
        )?;
        writeln!(
            self.writer,
            "|----------|-------|-----------|---------|---------------|--------------|-------|"
        )?;
        for category in &report.categories {
            let s = &category.score;
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} | {}% |",
                category.category,
                s.total,
                s.compliant_count,
                s.partial_count,
                s.non_compliant_count,
                s.not_assessed_count,
                s.score_percent
            )?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Critical Gaps ({})", report.critical_gaps.len())?;
        writeln!(self.writer)?;
        for item in &report.critical_gaps {
            writeln!(
                self.writer,
                "- [ ] `{}` {} (clause {})",
                item.id, item.item, item.clause
            )?;
        }
        Ok(())
    }

    fn write_matrix(&mut self, matrix: &RiskMatrix) -> Result<()> {
        writeln!(self.writer, "# Risk Acceptability Matrix")?;
        writeln!(self.writer)?;
        write!(self.writer, "| Severity \\ Probability |")?;
        for probability in Probability::ALL {
            write!(self.writer, " {} |", probability.name())?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "|---|---|---|---|---|---|")?;
        for (severity, cells) in matrix.rows().rev() {
            write!(self.writer, "| {} |", severity.name())?;
            for level in cells {
                write!(self.writer, " {level} |")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        if !self.color {
            table.force_no_tty();
        }
        table
    }

    fn register_table(&self, rows: &[RiskRegisterRow]) -> Table {
        let mut table = self.table();
        table.set_header(vec![
            "Hazard",
            "Category",
            "Description",
            "S",
            "P",
            "Initial",
            "Controls",
            "Residual",
            "Status",
        ]);
        for row in rows {
            table.add_row(vec![
                Cell::new(&row.hazard_id),
                Cell::new(row.category),
                Cell::new(&row.hazard_description),
                Cell::new(row.severity_score),
                Cell::new(row.probability_score),
                level_cell(row.initial_risk_score, row.initial_risk_level),
                Cell::new(format!("{}/{}", row.implemented_controls, row.control_measures)),
                level_cell(row.residual_risk_score, row.residual_risk_level),
                Cell::new(row.status),
            ]);
        }
        table
    }
}

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Acceptable => Color::Green,
        RiskLevel::Undesirable => Color::Yellow,
        RiskLevel::Unacceptable => Color::Red,
    }
}

fn level_cell(score: u8, level: RiskLevel) -> Cell {
    Cell::new(format!("{score} {level}")).fg(level_color(level))
}

fn band_text(band: ComplianceBand) -> ColoredString {
    match band {
        ComplianceBand::FullyCompliant => band.label().green(),
        ComplianceBand::SubstantiallyCompliant => band.label().cyan(),
        ComplianceBand::PartiallyCompliant => band.label().yellow(),
        ComplianceBand::NonCompliant => band.label().red(),
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_register(&mut self, report: &RegisterReport) -> Result<()> {
        let table = self.register_table(&report.rows);
        writeln!(self.writer, "{}", "Risk Register".bold().blue())?;
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        writeln!(
            self.writer,
            "{}",
            format!(
                "High Priority Risks (score >= {})",
                report.high_priority_threshold
            )
            .bold()
            .red()
        )?;
        if report.high_priority.is_empty() {
            writeln!(self.writer, "  none")?;
        } else {
            let table = self.register_table(&report.high_priority);
            writeln!(self.writer, "{table}")?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", "Category Summary".bold().blue())?;
        let mut table = self.table();
        table.set_header(vec![
            "Category",
            "Hazards",
            "Mean initial",
            "Max initial",
            "Mean residual",
            "Max residual",
        ]);
        for summary in &report.category_summary {
            table.add_row(vec![
                Cell::new(summary.category),
                Cell::new(summary.count),
                Cell::new(format!("{:.2}", summary.mean_initial_score)),
                Cell::new(summary.max_initial_score),
                Cell::new(format!("{:.2}", summary.mean_residual_score)),
                Cell::new(summary.max_residual_score),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    fn write_gap(&mut self, report: &GapReport) -> Result<()> {
        let score = &report.score;
        writeln!(self.writer, "{}", "Compliance Gap Analysis".bold().blue())?;
        writeln!(
            self.writer,
            "  Score: {}% {}",
            score.score_percent.to_string().bold(),
            band_text(score.band)
        )?;
        writeln!(
            self.writer,
            "  {} compliant, {} partial, {} non-compliant, {} not assessed of {}",
            score.compliant_count,
            score.partial_count,
            score.non_compliant_count,
            score.not_assessed_count,
            score.total
        )?;
        writeln!(self.writer)?;

        let mut table = self.table();
        table.set_header(vec!["Category", "Items", "C", "P", "NC", "NA", "Score"]);
        for category in &report.categories {
            let s = &category.score;
            table.add_row(vec![
                Cell::new(&category.category),
                Cell::new(s.total),
                Cell::new(s.compliant_count),
                Cell::new(s.partial_count),
                Cell::new(s.non_compliant_count),
                Cell::new(s.not_assessed_count),
                Cell::new(format!("{}%", s.score_percent)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        writeln!(
            self.writer,
            "{}",
            format!("Critical Gaps ({})", report.critical_gaps.len())
                .bold()
                .red()
        )?;
        for item in &report.critical_gaps {
            writeln!(
                self.writer,
                "  {} {} (clause {})",
                item.id.yellow(),
                item.item,
                item.clause
            )?;
        }
        Ok(())
    }

    fn write_matrix(&mut self, matrix: &RiskMatrix) -> Result<()> {
        writeln!(self.writer, "{}", "Risk Acceptability Matrix".bold().blue())?;
        let mut table = self.table();
        let mut header = vec![Cell::new("Severity \\ Probability")];
        header.extend(Probability::ALL.iter().map(|p| Cell::new(p.name())));
        table.set_header(header);
        for (severity, cells) in matrix.rows().rev() {
            let mut row = vec![Cell::new(severity.name())];
            row.extend(
                cells
                    .iter()
                    .map(|level| Cell::new(level).fg(level_color(*level))),
            );
            table.add_row(row);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

pub fn create_writer<'a>(
    format: OutputFormat,
    writer: Box<dyn Write + 'a>,
    color: bool,
) -> Box<dyn ReportWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, color)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::build_matrix;

    fn render_matrix(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        create_writer(format, Box::new(&mut buffer), false)
            .write_matrix(&build_matrix())
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("no space left on device"))
        }
    }

    #[test]
    fn test_finish_reports_flush_failure() {
        for format in [OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Terminal] {
            let mut writer = create_writer(format, Box::new(FullDisk), false);
            writer.write_matrix(&build_matrix()).unwrap();
            assert!(matches!(writer.finish(), Err(crate::core::Error::Io(_))));
        }
    }

    #[test]
    fn test_json_matrix_rows() {
        let json: serde_json::Value =
            serde_json::from_str(&render_matrix(OutputFormat::Json)).unwrap();
        assert_eq!(json[4]["severity"], "CATASTROPHIC");
        assert_eq!(json[4]["cells"][4], "UNACCEPTABLE");
        assert_eq!(json[0]["cells"][0], "ACCEPTABLE");
    }

    #[test]
    fn test_markdown_matrix_starts_with_highest_severity() {
        let text = render_matrix(OutputFormat::Markdown);
        let first_row = text
            .lines()
            .find(|l| l.starts_with("| CATASTROPHIC"))
            .unwrap();
        assert!(first_row.ends_with("UNACCEPTABLE |"));
        assert!(text.find("CATASTROPHIC").unwrap() < text.find("NEGLIGIBLE").unwrap());
    }

    #[test]
    fn test_terminal_matrix_without_color_has_no_escapes() {
        colored::control::set_override(false);
        let text = render_matrix(OutputFormat::Terminal);
        assert!(text.contains("FREQUENT"));
        assert!(!text.contains('\u{1b}'));
    }
}
