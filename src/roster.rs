use crate::csv;
use crate::registry::{self, ClassroomEntry};
use anyhow::anyhow;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const MSG_NO_DATA_ROWS: &str =
    "El archivo debe contener al menos una fila de datos además de los encabezados";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub classroom_code: String,
    /// Always copied from the registry entry for `classroom_code`.
    pub grade: u8,
    pub section: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl StudentRecord {
    fn enrolled(
        id: u64,
        first_name: &str,
        last_name: &str,
        classroom: &ClassroomEntry,
    ) -> StudentRecord {
        StudentRecord {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            classroom_code: classroom.code.to_string(),
            grade: classroom.grade,
            section: classroom.section,
            dni: None,
            parent_name: None,
            parent_phone: None,
            birth_date: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportResult {
    pub success: bool,
    pub data: Vec<StudentRecord>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn failed(message: impl Into<String>) -> ImportResult {
        ImportResult {
            success: false,
            data: Vec::new(),
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }
}

pub trait IdAllocator {
    fn next_id(&mut self) -> anyhow::Result<u64>;
}

/// Hands out increasing ids, starting above every id it was seeded with.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> SequentialIds {
        SequentialIds { next }
    }

    pub fn after<'a, I>(existing: I) -> SequentialIds
    where
        I: IntoIterator<Item = &'a StudentRecord>,
    {
        let max = existing.into_iter().map(|s| s.id).max().unwrap_or(0);
        SequentialIds::starting_at(max.saturating_add(1))
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> anyhow::Result<u64> {
        if self.next == u64::MAX {
            return Err(anyhow!("student id space exhausted"));
        }
        let id = self.next;
        self.next += 1;
        Ok(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    MissingFields,
    MissingFirstName,
    MissingLastName,
    MissingClassroom,
    UnknownClassroom(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::MissingFields => f.write_str("Faltan datos obligatorios"),
            RowError::MissingFirstName => f.write_str("El nombre es obligatorio"),
            RowError::MissingLastName => f.write_str("El apellido es obligatorio"),
            RowError::MissingClassroom => f.write_str("El código de aula es obligatorio"),
            RowError::UnknownClassroom(code) => write!(f, "El aula \"{}\" no existe", code),
        }
    }
}

struct ValidRow<'a> {
    first_name: &'a str,
    last_name: &'a str,
    classroom: &'static ClassroomEntry,
    optional: [Option<String>; 4],
}

// Positions 4..=7 carry dni, parent name, parent phone and birth date.
const OPTIONAL_FIELDS_START: usize = 3;

fn check_row(row: &[String]) -> Result<ValidRow<'_>, RowError> {
    if row.len() < 3 {
        return Err(RowError::MissingFields);
    }
    let first_name = row[0].trim();
    if first_name.is_empty() {
        return Err(RowError::MissingFirstName);
    }
    let last_name = row[1].trim();
    if last_name.is_empty() {
        return Err(RowError::MissingLastName);
    }
    let code = row[2].trim();
    if code.is_empty() {
        return Err(RowError::MissingClassroom);
    }
    let classroom =
        registry::find(code).ok_or_else(|| RowError::UnknownClassroom(row[2].clone()))?;

    let optional = std::array::from_fn(|i| {
        row.get(OPTIONAL_FIELDS_START + i)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    });

    Ok(ValidRow {
        first_name,
        last_name,
        classroom,
        optional,
    })
}

/// Validates tokenized rows; `rows[0]` is the header and is skipped.
///
/// Row errors are collected and never stop the run. `Err` is reserved for
/// failures outside the data itself, such as the id allocator giving out.
pub fn validate_rows(
    rows: &[Vec<String>],
    ids: &mut dyn IdAllocator,
) -> anyhow::Result<ImportResult> {
    if rows.len() < 2 {
        return Ok(ImportResult::failed(MSG_NO_DATA_ROWS));
    }

    let mut data = Vec::new();
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(1) {
        let row_number = index + 1;
        match check_row(row) {
            Ok(valid) => {
                let mut student = StudentRecord::enrolled(
                    ids.next_id()?,
                    valid.first_name,
                    valid.last_name,
                    valid.classroom,
                );
                let [dni, parent_name, parent_phone, birth_date] = valid.optional;
                student.dni = dni;
                student.parent_name = parent_name;
                student.parent_phone = parent_phone;
                student.birth_date = birth_date;
                data.push(student);
            }
            Err(e) => {
                tracing::debug!(row = row_number, reason = %e, "rejected import row");
                errors.push(format!("Fila {}: {}", row_number, e));
            }
        }
    }

    Ok(ImportResult {
        success: errors.is_empty(),
        data,
        errors,
        warnings: Vec::new(),
    })
}

/// Tokenizes and validates a roster file. Never fails: anything unexpected
/// comes back as a single-error result.
pub fn import_students(text: &str, ids: &mut dyn IdAllocator) -> ImportResult {
    let rows = csv::tokenize(text);
    match validate_rows(&rows, ids) {
        Ok(result) => {
            tracing::info!(
                rows = rows.len().saturating_sub(1),
                imported = result.data.len(),
                rejected = result.errors.len(),
                "student import validated"
            );
            result
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "student import aborted");
            ImportResult::failed(format!("Error al procesar el archivo: {e:#}"))
        }
    }
}

/// One message per classroom in `touched` whose head-count exceeds its capacity.
pub fn capacity_warnings(students: &[StudentRecord], touched: &[StudentRecord]) -> Vec<String> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for s in students {
        *counts.entry(s.classroom_code.as_str()).or_default() += 1;
    }

    let mut codes = touched
        .iter()
        .map(|s| s.classroom_code.as_str())
        .collect::<Vec<_>>();
    codes.sort();
    codes.dedup();

    codes
        .into_iter()
        .filter_map(|code| {
            let room = registry::find(code)?;
            let count = counts.get(code).copied().unwrap_or(0);
            (count > room.capacity).then(|| {
                format!(
                    "El aula \"{}\" excede su capacidad ({}/{})",
                    code, count, room.capacity
                )
            })
        })
        .collect()
}

/// The demo roster the portal starts with.
pub fn sample_roster() -> Vec<StudentRecord> {
    const SAMPLE: [(u64, &str, &str, &str); 10] = [
        (1, "Juan", "Pérez García", "100"),
        (2, "Ana", "López Mendoza", "100"),
        (3, "Luis", "Rodríguez Silva", "100"),
        (4, "María", "González Torres", "101"),
        (5, "Carlos", "Mendoza Ruiz", "101"),
        (6, "Rosa", "Silva Vargas", "200"),
        (7, "Pedro", "Ramírez Castro", "200"),
        (8, "Carmen", "Flores Díaz", "300"),
        (9, "Miguel", "Torres Herrera", "400"),
        (10, "Elena", "Vásquez Morales", "500"),
    ];
    SAMPLE
        .iter()
        .filter_map(|&(id, first, last, code)| {
            registry::find(code).map(|room| StudentRecord::enrolled(id, first, last, room))
        })
        .collect()
}
