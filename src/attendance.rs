use crate::csv;
use crate::export::{ExportFormat, ExportPayload};
use crate::roster::StudentRecord;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const REPORT_HEADERS: [&str; 7] = [
    "Fecha",
    "Estudiante",
    "Grado",
    "Sección",
    "Aula",
    "Estado",
    "Observaciones",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Presente,
    Ausente,
    Tardanza,
    Justificado,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<AttendanceStatus> {
        match s.trim().to_ascii_lowercase().as_str() {
            "presente" => Some(AttendanceStatus::Presente),
            "ausente" => Some(AttendanceStatus::Ausente),
            "tardanza" => Some(AttendanceStatus::Tardanza),
            "justificado" => Some(AttendanceStatus::Justificado),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Presente => "presente",
            AttendanceStatus::Ausente => "ausente",
            AttendanceStatus::Tardanza => "tardanza",
            AttendanceStatus::Justificado => "justificado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: u64,
    pub student_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub classroom: String,
    pub registered_by: u32,
    pub registered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub struct Mark {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub registered_by: u32,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct AttendanceLog {
    records: Vec<AttendanceRecord>,
    next_id: u64,
}

impl AttendanceLog {
    pub fn new() -> AttendanceLog {
        AttendanceLog {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records a mark for `student`, replacing any mark the student already
    /// has for that date. A replaced entry keeps its id.
    pub fn record(&mut self, student: &StudentRecord, mark: Mark) -> &AttendanceRecord {
        let notes = mark
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let existing = self
            .records
            .iter()
            .position(|r| r.student_id == student.id && r.date == mark.date);
        let id = match existing {
            Some(i) => self.records[i].id,
            None => {
                let id = self.next_id.max(1);
                self.next_id = id + 1;
                id
            }
        };
        let entry = AttendanceRecord {
            id,
            student_id: student.id,
            date: mark.date,
            status: mark.status,
            classroom: student.classroom_code.clone(),
            registered_by: mark.registered_by,
            registered_at: mark.registered_at,
            notes,
        };
        let idx = match existing {
            Some(i) => {
                self.records[i] = entry;
                i
            }
            None => {
                self.records.push(entry);
                self.records.len() - 1
            }
        };
        &self.records[idx]
    }

    pub fn list(&self, date: Option<NaiveDate>, classroom: Option<&str>) -> Vec<&AttendanceRecord> {
        self.records
            .iter()
            .filter(|r| date.map(|d| r.date == d).unwrap_or(true))
            .filter(|r| classroom.map(|c| r.classroom == c).unwrap_or(true))
            .collect()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }
}

/// Notes end up inside a quoted report field, where a quote or a line
/// break cannot be represented.
pub fn notes_fit_report(notes: &str) -> bool {
    !notes.contains(|c: char| matches!(c, '"' | '\n' | '\r'))
}

/// Attendance report for `[from, to]`, one row per recorded mark, ordered
/// by date and then by the student's position in `students`.
pub fn export_attendance_report(
    students: &[StudentRecord],
    log: &AttendanceLog,
    from: NaiveDate,
    to: NaiveDate,
    classroom: Option<&str>,
) -> String {
    csv::write_quoted(
        &REPORT_HEADERS,
        &report_rows(students, log, from, to, classroom),
    )
}

fn report_rows(
    students: &[StudentRecord],
    log: &AttendanceLog,
    from: NaiveDate,
    to: NaiveDate,
    classroom: Option<&str>,
) -> Vec<Vec<String>> {
    let mut marks = log
        .records
        .iter()
        .filter(|r| r.date >= from && r.date <= to)
        .filter(|r| classroom.map(|c| r.classroom == c).unwrap_or(true))
        .filter_map(|r| {
            let pos = students.iter().position(|s| s.id == r.student_id)?;
            Some((r, pos))
        })
        .collect::<Vec<_>>();
    marks.sort_by_key(|(r, pos)| (r.date, *pos));

    marks
        .into_iter()
        .map(|(r, pos)| {
            let s = &students[pos];
            let notes = match (&r.notes, r.status) {
                (Some(n), _) => n.clone(),
                (None, AttendanceStatus::Ausente) => "Sin justificación".to_string(),
                (None, _) => String::new(),
            };
            vec![
                r.date.format("%d/%m/%Y").to_string(),
                s.full_name(),
                s.grade.to_string(),
                s.section.to_string(),
                s.classroom_code.clone(),
                r.status.as_str().to_string(),
                notes,
            ]
        })
        .collect()
}

/// The report payload together with its data row count.
pub fn export_attendance_report_as(
    format: ExportFormat,
    students: &[StudentRecord],
    log: &AttendanceLog,
    from: NaiveDate,
    to: NaiveDate,
    classroom: Option<&str>,
) -> (ExportPayload, usize) {
    let rows = report_rows(students, log, from, to, classroom);
    let text = csv::write_quoted(&REPORT_HEADERS, &rows);
    (ExportPayload::new(format, text), rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::sample_roster;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn mark(d: u32, status: AttendanceStatus, notes: Option<&str>) -> Mark {
        Mark {
            date: day(d),
            status,
            notes: notes.map(str::to_string),
            registered_by: 2,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn recording_twice_replaces_and_keeps_id() {
        let roster = sample_roster();
        let mut log = AttendanceLog::new();
        let first = log.record(&roster[0], mark(3, AttendanceStatus::Ausente, None)).id;
        let again = log
            .record(&roster[0], mark(3, AttendanceStatus::Presente, Some("  ")))
            .clone();
        assert_eq!(log.len(), 1);
        assert_eq!(again.id, first);
        assert_eq!(again.status, AttendanceStatus::Presente);
        assert_eq!(again.notes, None);
    }

    #[test]
    fn report_orders_by_date_then_roster_position() {
        let roster = sample_roster();
        let mut log = AttendanceLog::new();
        log.record(&roster[3], mark(4, AttendanceStatus::Tardanza, None));
        log.record(&roster[1], mark(4, AttendanceStatus::Ausente, None));
        log.record(&roster[0], mark(3, AttendanceStatus::Justificado, Some("cita médica")));
        log.record(&roster[0], mark(9, AttendanceStatus::Presente, None));

        let out = export_attendance_report(&roster, &log, day(3), day(4), None);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "\"03/03/2025\",\"Juan Pérez García\",\"1\",\"A\",\"100\",\"justificado\",\"cita médica\""
        );
        assert!(lines[2].contains("\"Ana López Mendoza\""));
        assert!(lines[2].ends_with("\"ausente\",\"Sin justificación\""));
        assert!(lines[3].contains("\"María González Torres\""));
    }

    #[test]
    fn report_filters_by_classroom() {
        let roster = sample_roster();
        let mut log = AttendanceLog::new();
        log.record(&roster[0], mark(3, AttendanceStatus::Presente, None));
        log.record(&roster[3], mark(3, AttendanceStatus::Presente, None));
        let out = export_attendance_report(&roster, &log, day(1), day(31), Some("101"));
        assert_eq!(out.lines().count(), 2);
        assert_eq!(log.list(Some(day(3)), Some("100")).len(), 1);
        assert_eq!(log.latest_date(), Some(day(3)));
    }

    #[test]
    fn status_parse_round_trips() {
        for s in ["presente", "ausente", "tardanza", "justificado"] {
            assert_eq!(AttendanceStatus::parse(s).map(|v| v.as_str()), Some(s));
        }
        assert_eq!(AttendanceStatus::parse("late"), None);
    }

    #[test]
    fn notes_with_quotes_or_line_breaks_do_not_fit() {
        assert!(notes_fit_report("cita médica, 9am"));
        assert!(!notes_fit_report("linea1\nlinea2"));
        assert!(!notes_fit_report("dijo \"no\""));
        assert!(!notes_fit_report("a\r"));
    }

    #[test]
    fn report_row_count_matches_marks() {
        let roster = sample_roster();
        let mut log = AttendanceLog::new();
        log.record(&roster[1], mark(5, AttendanceStatus::Ausente, Some("fiebre")));
        log.record(&roster[2], mark(5, AttendanceStatus::Presente, None));
        let (payload, rows) = export_attendance_report_as(
            ExportFormat::Csv,
            &roster,
            &log,
            day(5),
            day(5),
            None,
        );
        assert_eq!(rows, 2);
        assert_eq!(csv::tokenize(&payload.text()).len(), rows + 1);
    }
}
