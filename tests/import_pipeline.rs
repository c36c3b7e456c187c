#[path = "../src/csv.rs"]
mod csv;
#[path = "../src/registry.rs"]
mod registry;
#[path = "../src/roster.rs"]
mod roster;

use roster::{import_students, IdAllocator, SequentialIds};

fn fresh_ids() -> SequentialIds {
    SequentialIds::starting_at(1000)
}

#[test]
fn scenario_all_valid() {
    let r = import_students("Nombres,Apellidos,Aula\nJuan,Pérez,100", &mut fresh_ids());
    assert!(r.success);
    assert_eq!(r.data.len(), 1);
    assert_eq!(r.data[0].grade, 1);
    assert_eq!(r.data[0].section, 'A');
    assert_eq!(r.data[0].first_name, "Juan");
    assert_eq!(r.data[0].classroom_code, "100");
    assert!(r.errors.is_empty());
    assert!(r.warnings.is_empty());
}

#[test]
fn scenario_missing_first_name() {
    let r = import_students("Nombres,Apellidos,Aula\n,Pérez,100", &mut fresh_ids());
    assert!(!r.success);
    assert_eq!(r.errors.len(), 1);
    assert!(r.errors[0].contains("Fila 2"));
    assert!(r.errors[0].contains("nombre"));
    assert!(r.data.is_empty());
}

#[test]
fn scenario_unknown_classroom() {
    let r = import_students("Nombres,Apellidos,Aula\nJuan,Pérez,999", &mut fresh_ids());
    assert!(!r.success);
    assert_eq!(r.errors, vec!["Fila 2: El aula \"999\" no existe"]);
}

#[test]
fn scenario_header_only() {
    let r = import_students("Nombres,Apellidos,Aula", &mut fresh_ids());
    assert!(!r.success);
    assert!(r.data.is_empty());
    assert_eq!(r.errors, vec![roster::MSG_NO_DATA_ROWS]);
}

#[test]
fn empty_text_is_a_file_level_error() {
    let r = import_students("   \n\n", &mut fresh_ids());
    assert!(!r.success);
    assert_eq!(r.errors.len(), 1);
}

#[test]
fn scenario_mixed_rows_is_partial() {
    let r = import_students(
        "Nombres,Apellidos,Aula\nJuan,Pérez,100\nAna,,101",
        &mut fresh_ids(),
    );
    assert!(!r.success);
    assert_eq!(r.data.len(), 1);
    assert_eq!(r.errors, vec!["Fila 3: El apellido es obligatorio"]);
}

#[test]
fn error_row_numbers_count_from_header() {
    let mut text = String::from("Nombres,Apellidos,Aula");
    for k in 1..=6 {
        if k == 5 {
            text.push_str("\nSolo,Dos");
        } else {
            text.push_str(&format!("\nAlumno{},Apellido{},20{}", k, k, k % 7));
        }
    }
    let r = import_students(&text, &mut fresh_ids());
    assert_eq!(r.errors, vec!["Fila 6: Faltan datos obligatorios"]);
    assert_eq!(r.data.len(), 5);
}

#[test]
fn blank_line_between_rows_is_reported_not_dropped() {
    let r = import_students("h1,h2,h3\nJuan,Pérez,100\n\nAna,Ruiz,200", &mut fresh_ids());
    assert_eq!(r.errors, vec!["Fila 3: Faltan datos obligatorios"]);
    assert_eq!(r.data.len(), 2);
}

#[test]
fn grade_and_section_never_come_from_the_file() {
    // Extra columns that look like a grade and section are not used for them.
    let r = import_students(
        "Nombres,Apellidos,Aula,Grado,Sección\nRosa,Silva,304,1,Z",
        &mut fresh_ids(),
    );
    assert!(r.success);
    let s = &r.data[0];
    let room = registry::find(&s.classroom_code).expect("registry entry");
    assert_eq!((s.grade, s.section), (room.grade, room.section));
    assert_eq!((s.grade, s.section), (3, 'E'));
}

#[test]
fn quoted_names_with_commas_import() {
    let r = import_students(
        "Nombres,Apellidos,Aula\n\"María, José\",\"de la Cruz\", 506 ",
        &mut fresh_ids(),
    );
    assert!(r.success);
    assert_eq!(r.data[0].first_name, "María, José");
    assert_eq!(r.data[0].last_name, "de la Cruz");
    assert_eq!(r.data[0].classroom_code, "506");
}

#[test]
fn ids_are_unique_within_and_across_batches() {
    let mut ids = fresh_ids();
    let text = "h\nA,B,100\nC,D,100\nE,F,101";
    let first = import_students(text, &mut ids);
    let second = import_students(text, &mut ids);
    let mut all = first
        .data
        .iter()
        .chain(second.data.iter())
        .map(|s| s.id)
        .collect::<Vec<_>>();
    assert_eq!(all, vec![1000, 1001, 1002, 1003, 1004, 1005]);
    all.dedup();
    assert_eq!(all.len(), 6);
    assert_eq!(ids.next_id().expect("next id"), 1006);
}
