use crate::export::{ExportFormat, ExportPayload};
use crate::ipc::error::HandlerErr;
use crate::ipc::types::AppState;
use crate::session::User;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::path::Path;

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Absent, null or blank is `None`; any other non-string is an error.
pub fn get_optional_str(params: &Value, key: &str) -> Result<Option<String>, HandlerErr> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string()).filter(|s| !s.is_empty())),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be string", key))),
    }
}

pub fn get_bool(params: &Value, key: &str, default: bool) -> Result<bool, HandlerErr> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| HandlerErr::bad_params(format!("{} must be boolean", key))),
    }
}

pub fn get_date(params: &Value, key: &str) -> Result<NaiveDate, HandlerErr> {
    let raw = get_required_str(params, key)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| HandlerErr::bad_params(format!("{} must be YYYY-MM-DD", key)))
}

pub fn get_optional_date(params: &Value, key: &str) -> Result<Option<NaiveDate>, HandlerErr> {
    match get_optional_str(params, key)? {
        None => Ok(None),
        Some(_) => get_date(params, key).map(Some),
    }
}

pub fn get_format(params: &Value) -> Result<ExportFormat, HandlerErr> {
    match get_optional_str(params, "format")? {
        None => Ok(ExportFormat::Csv),
        Some(s) => ExportFormat::parse(&s)
            .ok_or_else(|| HandlerErr::bad_params("format must be one of: csv, excel")),
    }
}

pub fn require_user(state: &AppState) -> Result<&User, HandlerErr> {
    state
        .session
        .current()
        .ok_or_else(|| HandlerErr::new("no_session", "log in first"))
}

pub fn require_admin(state: &AppState) -> Result<&User, HandlerErr> {
    let user = require_user(state)?;
    if !user.is_admin() {
        return Err(HandlerErr::new(
            "forbidden",
            format!("{} may not modify the roster", user.username),
        ));
    }
    Ok(user)
}

/// Classroom filter requested by the caller, narrowed by what the session
/// user may see.
pub fn visible_classroom(state: &AppState, requested: Option<&str>, code: &str) -> bool {
    if let Some(r) = requested {
        if r != code {
            return false;
        }
    }
    state
        .session
        .current()
        .map(|u| u.can_access_classroom(code))
        .unwrap_or(true)
}

pub fn write_output(path: &str, bytes: &[u8]) -> Result<(), HandlerErr> {
    let p = Path::new(path);
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            HandlerErr::new("write_failed", e.to_string())
                .with_details(json!({ "path": parent.to_string_lossy() }))
        })?;
    }
    std::fs::write(p, bytes).map_err(|e| {
        HandlerErr::new("write_failed", e.to_string()).with_details(json!({ "path": path }))
    })
}

/// Either writes the payload to `out_path` or returns it inline.
pub fn export_response(
    payload: ExportPayload,
    filename: String,
    rows: usize,
    out_path: Option<String>,
) -> Result<Value, HandlerErr> {
    match out_path {
        Some(path) => {
            write_output(&path, &payload.bytes)?;
            Ok(json!({
                "contentType": payload.content_type,
                "filename": filename,
                "rows": rows,
                "path": path,
            }))
        }
        None => Ok(json!({
            "contentType": payload.content_type,
            "filename": filename,
            "rows": rows,
            "content": payload.text(),
        })),
    }
}
