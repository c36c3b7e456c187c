use crate::export;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    export_response, get_bool, get_format, get_optional_str, require_admin, visible_classroom,
};
use crate::ipc::types::{AppState, Request};
use crate::roster::{self, StudentRecord};
use crate::template;
use serde_json::{json, Value};

fn visible_students<'a>(
    state: &'a AppState,
    classroom: Option<&str>,
) -> Vec<&'a StudentRecord> {
    state
        .students
        .iter()
        .filter(|s| visible_classroom(state, classroom, &s.classroom_code))
        .collect()
}

fn handle_students_list(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let classroom = get_optional_str(&req.params, "classroom")?;
    let students = visible_students(state, classroom.as_deref());
    Ok(json!({ "students": students }))
}

/// The caller supplies either the file text or a path to read it from; the
/// import itself never touches the filesystem.
fn read_import_text(params: &Value) -> Result<String, HandlerErr> {
    match params.get("text") {
        None | Some(Value::Null) => {}
        Some(Value::String(text)) => return Ok(text.clone()),
        Some(_) => return Err(HandlerErr::bad_params("text must be string")),
    }
    let Some(path) = get_optional_str(params, "inPath")? else {
        return Err(HandlerErr::bad_params("missing text or inPath"));
    };
    std::fs::read_to_string(&path).map_err(|e| {
        HandlerErr::new("read_failed", e.to_string()).with_details(json!({ "path": path }))
    })
}

fn handle_students_import(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let commit = get_bool(&req.params, "commit", false)?;
    if commit {
        require_admin(state)?;
    }
    let text = read_import_text(&req.params)?;

    let result = roster::import_students(&text, &mut state.ids);

    let mut committed = false;
    let mut capacity_warnings = Vec::new();
    if commit && result.success {
        state.students.extend(result.data.iter().cloned());
        capacity_warnings = roster::capacity_warnings(&state.students, &result.data);
        committed = true;
        tracing::info!(
            added = result.data.len(),
            total = state.students.len(),
            "imported students committed"
        );
    }

    Ok(json!({
        "success": result.success,
        "data": result.data,
        "errors": result.errors,
        "warnings": result.warnings,
        "committed": committed,
        "capacityWarnings": capacity_warnings,
    }))
}

fn handle_students_export(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let format = get_format(&req.params)?;
    let classroom = get_optional_str(&req.params, "classroom")?;
    let out_path = get_optional_str(&req.params, "outPath")?;

    let records = visible_students(state, classroom.as_deref())
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let payload = export::export_students_as(format, &records);
    export_response(
        payload,
        format!("estudiantes.{}", format.extension()),
        records.len(),
        out_path,
    )
}

fn handle_students_template(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let format = get_format(&req.params)?;
    let payload = template::template_as(format, state.config.excel_template_blank_rows);
    Ok(json!({
        "contentType": payload.content_type,
        "filename": format!("plantilla_estudiantes.{}", format.extension()),
        "content": payload.text(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "students.list" => handle_students_list(state, req),
        "students.import" => handle_students_import(state, req),
        "students.export" => handle_students_export(state, req),
        "students.template" => handle_students_template(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
