//! Course progress reports.
//!
//! A [`ReportRenderer`] turns one stored record plus its statistics into a
//! document. [`TextReportRenderer`] writes plain text; other formats plug in
//! through the same trait.

use std::fmt::Write as _;

use crate::error::{Result, TrackerError};
use crate::identity::Identity;
use crate::progress::{ProgressRecord, Remark, RemarkTier, Score, Summary};

const FILE_TIMESTAMP: &str = "%Y%m%d_%H%M%S";
const DISPLAY_DATE: &str = "%B %d, %Y";

/// Renders a report document for one progress record.
pub trait ReportRenderer: Send + Sync {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &str;

    /// MIME type of the produced document.
    fn content_type(&self) -> &str;

    fn render(
        &self,
        identity: &Identity,
        record: &ProgressRecord,
        summary: &Summary,
        remark: &Remark,
    ) -> Result<Vec<u8>>;
}

/// A rendered report, ready to hand to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// `Report_<Name_With_Underscores>_<YYYYmmdd_HHMMSS>.<ext>`, stamped with the
/// record's creation time.
///
/// Every character of the name other than a letter, digit or `-` becomes
/// `_`, so the result is a single path component.
pub fn report_file_name(trainee_name: &str, created_at: u64, extension: &str) -> String {
    let name: String = trainee_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!(
        "Report_{}_{}.{}",
        name,
        crate::time::format_micros(created_at, FILE_TIMESTAMP),
        extension
    )
}

/// The closing remark sentence for a tier, in upper case.
pub fn remark_text(remark: &Remark) -> String {
    let name = remark.trainee_name.to_uppercase();
    match remark.tier {
        RemarkTier::FullCompletion => format!(
            "{name} HAS EXHIBITED GREAT FOCUS AND PERSEVERANCE TO COMPLETE THE COURSE \
             WITH AN OVERALL PASS RATE OF {:.1}%. CONTINUED GROWTH AND APPLICATION OF \
             THESE SKILLS WILL ENSURE FURTHER SUCCESS.",
            remark.completion_rate
        ),
        RemarkTier::Partial => format!(
            "{name} HAS COMPLETED {} OUT OF {} CHAPTERS WITH AN OVERALL COMPLETION RATE \
             OF {:.1}%. CONTINUED EFFORT AND FOCUS WILL SUPPORT SUCCESSFUL COMPLETION OF \
             THE REMAINING MODULES.",
            remark.completed_count, remark.total_count, remark.completion_rate
        ),
        RemarkTier::NotStarted => format!(
            "{name} HAS INITIATED THE TRAINING PROGRAM. CONSISTENT ENGAGEMENT AND \
             APPLICATION OF TRAINING MATERIAL WILL SUPPORT SKILL DEVELOPMENT AND COURSE \
             COMPLETION."
        ),
    }
}

fn score_cell(score: Score) -> String {
    match score {
        Score::Points(p) => p.to_string(),
        Score::NotAttempted => "N/A".to_string(),
    }
}

/// Plain-text report: header, trainee details, chapter table, remarks.
#[derive(Debug, Clone)]
pub struct TextReportRenderer {
    /// Second header line, the course name.
    pub course_title: String,
}

impl Default for TextReportRenderer {
    fn default() -> Self {
        Self {
            course_title: "PIPER ALPHA".to_string(),
        }
    }
}

impl TextReportRenderer {
    fn write_report(
        &self,
        out: &mut String,
        identity: &Identity,
        record: &ProgressRecord,
        summary: &Summary,
        remark: &Remark,
    ) -> std::fmt::Result {
        writeln!(out, "COURSE PROGRESS REPORT")?;
        writeln!(out, "{}", self.course_title)?;
        writeln!(out)?;

        writeln!(out, "TRAINEE DETAILS")?;
        writeln!(out, "Name: {}", identity.name)?;
        writeln!(out, "Email: {}", identity.email)?;
        writeln!(
            out,
            "Date: {}",
            crate::time::format_micros(record.created_at, DISPLAY_DATE)
        )?;
        writeln!(out, "Record ID: {}", record.id)?;
        writeln!(out)?;

        let width = record
            .chapters
            .iter()
            .map(|r| r.chapter.as_str().chars().count())
            .chain(std::iter::once("Chapter".len()))
            .max()
            .unwrap_or(0);
        writeln!(out, "{:<width$}  {:<5}  Status", "Chapter", "Score")?;
        writeln!(out, "{}", "-".repeat(width + 2 + 5 + 2 + "Not Completed".len()))?;
        for result in &record.chapters {
            writeln!(
                out,
                "{:<width$}  {:<5}  {}",
                result.chapter.as_str(),
                score_cell(result.score),
                result.status
            )?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "Completed: {}/{}  Average score: {:.1}",
            summary.completed_count, summary.total_count, summary.average_score
        )?;
        writeln!(out)?;

        writeln!(out, "REMARKS")?;
        writeln!(out, "{}", remark_text(remark))?;
        Ok(())
    }
}

impl ReportRenderer for TextReportRenderer {
    fn extension(&self) -> &str {
        "txt"
    }

    fn content_type(&self) -> &str {
        "text/plain; charset=utf-8"
    }

    fn render(
        &self,
        identity: &Identity,
        record: &ProgressRecord,
        summary: &Summary,
        remark: &Remark,
    ) -> Result<Vec<u8>> {
        let mut out = String::new();
        self.write_report(&mut out, identity, record, summary, remark)
            .map_err(|e| TrackerError::RenderFailed(e.to_string()))?;
        Ok(out.into_bytes())
    }
}
