use crate::csv;
use crate::roster::StudentRecord;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
/// Declared for the "Excel" variants even though the payload is CSV text.
pub const EXCEL_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const FULL_HEADERS: [&str; 10] = [
    "ID",
    "Nombres",
    "Apellidos",
    "Grado",
    "Sección",
    "Aula",
    "DNI",
    "Nombre del Padre/Madre",
    "Teléfono",
    "Fecha de Nacimiento",
];

const SHORT_HEADERS: [&str; 6] = ["ID", "Nombres", "Apellidos", "Grado", "Sección", "Aula"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<ExportFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "excel" | "xlsx" => Some(ExportFormat::Excel),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_CONTENT_TYPE,
            ExportFormat::Excel => EXCEL_CONTENT_TYPE,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    pub fn new(format: ExportFormat, text: String) -> ExportPayload {
        ExportPayload {
            content_type: format.content_type(),
            bytes: text.into_bytes(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

fn short_columns(s: &StudentRecord) -> Vec<String> {
    vec![
        s.id.to_string(),
        s.first_name.clone(),
        s.last_name.clone(),
        s.grade.to_string(),
        s.section.to_string(),
        s.classroom_code.clone(),
    ]
}

/// Full ten-column export. Absent optional fields render as `""`.
pub fn export_students(records: &[StudentRecord]) -> String {
    let rows = records
        .iter()
        .map(|s| {
            let mut row = short_columns(s);
            for opt in [&s.dni, &s.parent_name, &s.parent_phone, &s.birth_date] {
                row.push(opt.clone().unwrap_or_default());
            }
            row
        })
        .collect::<Vec<_>>();
    csv::write_quoted(&FULL_HEADERS, &rows)
}

/// Six-column export declared as a spreadsheet.
pub fn export_students_excel(records: &[StudentRecord]) -> ExportPayload {
    let rows = records.iter().map(short_columns).collect::<Vec<_>>();
    ExportPayload::new(
        ExportFormat::Excel,
        csv::write_quoted(&SHORT_HEADERS, &rows),
    )
}

pub fn export_students_as(format: ExportFormat, records: &[StudentRecord]) -> ExportPayload {
    match format {
        ExportFormat::Csv => ExportPayload::new(ExportFormat::Csv, export_students(records)),
        ExportFormat::Excel => export_students_excel(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::sample_roster;

    #[test]
    fn full_export_keeps_order_and_quotes_everything() {
        let mut roster = sample_roster();
        roster.swap(0, 9);
        roster[0].dni = Some("71234567".to_string());
        let out = export_students(&roster);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("\"ID\",\"Nombres\""));
        assert_eq!(
            lines[1],
            "\"10\",\"Elena\",\"Vásquez Morales\",\"5\",\"A\",\"500\",\"71234567\",\"\",\"\",\"\""
        );
        assert!(lines[10].starts_with("\"1\",\"Juan\""));
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn excel_export_is_short_schema_with_spreadsheet_type() {
        let payload = export_students_excel(&sample_roster()[..1]);
        assert_eq!(payload.content_type, EXCEL_CONTENT_TYPE);
        assert_eq!(
            payload.text(),
            "\"ID\",\"Nombres\",\"Apellidos\",\"Grado\",\"Sección\",\"Aula\"\n\"1\",\"Juan\",\"Pérez García\",\"1\",\"A\",\"100\""
        );
    }

    #[test]
    fn empty_export_is_header_only() {
        let payload = export_students_as(ExportFormat::Csv, &[]);
        assert_eq!(payload.content_type, CSV_CONTENT_TYPE);
        assert_eq!(payload.text().lines().count(), 1);
    }

    #[test]
    fn format_parse() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("xlsx"), Some(ExportFormat::Excel));
        assert_eq!(ExportFormat::parse("pdf"), None);
    }
}
