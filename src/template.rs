use crate::export::{ExportFormat, ExportPayload};

pub const TEMPLATE_HEADERS: [&str; 3] = ["Nombres", "Apellidos", "Aula (Código)"];
const SAMPLE_ROW: [&str; 3] = ["Juan Carlos", "Pérez García", "100"];

/// Import template: header plus one sample row that imports cleanly.
pub fn generate_template() -> String {
    [TEMPLATE_HEADERS.join(","), SAMPLE_ROW.join(",")].join("\n")
}

/// Spreadsheet-flavoured template with `blank_rows` empty `,,` fill-in rows.
/// The blank rows do not validate until filled.
pub fn generate_excel_template(blank_rows: usize) -> ExportPayload {
    let mut lines = vec![TEMPLATE_HEADERS.join(","), SAMPLE_ROW.join(",")];
    lines.extend(std::iter::repeat(",,".to_string()).take(blank_rows));
    ExportPayload::new(ExportFormat::Excel, lines.join("\n"))
}

pub fn template_as(format: ExportFormat, blank_rows: usize) -> ExportPayload {
    match format {
        ExportFormat::Csv => ExportPayload::new(ExportFormat::Csv, generate_template()),
        ExportFormat::Excel => generate_excel_template(blank_rows),
    }
}
