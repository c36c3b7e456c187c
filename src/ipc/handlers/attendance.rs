use crate::attendance::{self, AttendanceStatus, Mark};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    export_response, get_date, get_format, get_optional_date, get_optional_str, require_user,
    visible_classroom,
};
use crate::ipc::types::{AppState, Request};
use chrono::Utc;
use serde_json::{json, Value};

fn handle_attendance_record(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let user = require_user(state)?.clone();
    let student_id = req
        .params
        .get("studentId")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params("missing studentId"))?;
    let date = get_date(&req.params, "date")?;
    let status_raw = get_optional_str(&req.params, "status")?
        .ok_or_else(|| HandlerErr::bad_params("missing status"))?;
    let status = AttendanceStatus::parse(&status_raw).ok_or_else(|| {
        HandlerErr::bad_params("status must be one of: presente, ausente, tardanza, justificado")
    })?;
    let notes = get_optional_str(&req.params, "notes")?;
    if let Some(n) = notes.as_deref() {
        if !attendance::notes_fit_report(n) {
            return Err(HandlerErr::bad_params(
                "notes must not contain double quotes or line breaks",
            ));
        }
    }

    let Some(student) = state.students.iter().find(|s| s.id == student_id) else {
        return Err(HandlerErr::new("not_found", format!("student {} not found", student_id)));
    };
    if !user.can_access_classroom(&student.classroom_code) {
        return Err(HandlerErr::new(
            "forbidden",
            format!("{} is not assigned to classroom {}", user.username, student.classroom_code),
        ));
    }

    let entry = state.attendance.record(
        student,
        Mark {
            date,
            status,
            notes,
            registered_by: user.id,
            registered_at: Utc::now(),
        },
    );
    tracing::debug!(student_id, date = %date, status = status.as_str(), "attendance recorded");
    Ok(json!({ "attendance": entry }))
}

fn handle_attendance_list(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let date = get_optional_date(&req.params, "date")?;
    let classroom = get_optional_str(&req.params, "classroom")?;
    let records = state
        .attendance
        .list(date, classroom.as_deref())
        .into_iter()
        .filter(|r| visible_classroom(state, None, &r.classroom))
        .collect::<Vec<_>>();
    Ok(json!({ "records": records }))
}

fn handle_attendance_export_report(
    state: &mut AppState,
    req: &Request,
) -> Result<Value, HandlerErr> {
    let from = get_date(&req.params, "from")?;
    let to = get_date(&req.params, "to")?;
    if to < from {
        return Err(HandlerErr::bad_params("to must not be before from"));
    }
    let format = get_format(&req.params)?;
    let classroom = get_optional_str(&req.params, "classroom")?;
    let out_path = get_optional_str(&req.params, "outPath")?;

    let students = state
        .students
        .iter()
        .filter(|s| visible_classroom(state, None, &s.classroom_code))
        .cloned()
        .collect::<Vec<_>>();
    let (payload, rows) = attendance::export_attendance_report_as(
        format,
        &students,
        &state.attendance,
        from,
        to,
        classroom.as_deref(),
    );
    export_response(
        payload,
        format!(
            "reporte_asistencia_{}_{}.{}",
            from.format("%Y%m%d"),
            to.format("%Y%m%d"),
            format.extension()
        ),
        rows,
        out_path,
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "attendance.record" => handle_attendance_record(state, req),
        "attendance.list" => handle_attendance_list(state, req),
        "attendance.exportReport" => handle_attendance_export_report(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
