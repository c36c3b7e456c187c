use crate::attendance::{self, AttendanceLog};
use crate::export;
use crate::roster::StudentRecord;
use anyhow::Context;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const MANIFEST_ENTRY: &str = "manifest.json";
pub const STUDENTS_ENTRY: &str = "students.csv";
pub const ATTENDANCE_ENTRY: &str = "attendance.csv";
pub const BUNDLE_FORMAT: &str = "asistencia-report-v1";
const EXPORTED_BY: &str = "Sistema de Asistencia";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Daily,
    Weekly,
    Monthly,
}

impl ReportType {
    pub fn parse(s: &str) -> Option<ReportType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(ReportType::Daily),
            "weekly" => Some(ReportType::Weekly),
            "monthly" => Some(ReportType::Monthly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Daily => "daily",
            ReportType::Weekly => "weekly",
            ReportType::Monthly => "monthly",
        }
    }

    fn window_days(self) -> i64 {
        match self {
            ReportType::Daily => 1,
            ReportType::Weekly => 7,
            ReportType::Monthly => 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub bundle_id: String,
    pub entry_count: usize,
    pub total_records: usize,
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Writes a zip with the full student export, the attendance report for the
/// window ending on the latest recorded date, and a manifest of both.
pub fn export_report_bundle(
    out_path: &Path,
    report_type: ReportType,
    students: &[StudentRecord],
    log: &AttendanceLog,
) -> anyhow::Result<BundleSummary> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let students_csv = export::export_students(students);
    // An empty log yields a header-only report whatever the window.
    let to = log.latest_date().unwrap_or_default();
    let from = to - Duration::days(report_type.window_days() - 1);
    let attendance_csv = attendance::export_attendance_report(students, log, from, to, None);

    let bundle_id = Uuid::new_v4().to_string();
    let manifest = json!({
        "format": BUNDLE_FORMAT,
        "bundleId": bundle_id,
        "reportType": report_type.as_str(),
        "exportDate": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "exportedBy": EXPORTED_BY,
        "totalRecords": students.len(),
        "entries": [
            { "name": STUDENTS_ENTRY, "sha256": sha256_hex(students_csv.as_bytes()) },
            { "name": ATTENDANCE_ENTRY, "sha256": sha256_hex(attendance_csv.as_bytes()) },
        ],
    });

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (name, body) in [(STUDENTS_ENTRY, &students_csv), (ATTENDANCE_ENTRY, &attendance_csv)] {
        zip.start_file(name, opts)
            .with_context(|| format!("failed to start {} entry", name))?;
        zip.write_all(body.as_bytes())
            .with_context(|| format!("failed to write {} entry", name))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;
    tracing::info!(
        path = %out_path.to_string_lossy(),
        report_type = report_type.as_str(),
        students = students.len(),
        "report bundle written"
    );

    Ok(BundleSummary {
        bundle_id,
        entry_count: 3,
        total_records: students.len(),
    })
}
