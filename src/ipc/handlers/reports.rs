use crate::bundle::{self, ReportType};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_optional_str, get_required_str, require_user};
use crate::ipc::types::{AppState, Request};
use serde_json::{json, Value};
use std::path::PathBuf;

fn handle_export_bundle(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    require_user(state)?;
    let out_path = get_required_str(&req.params, "outPath")?;
    let report_type = match get_optional_str(&req.params, "reportType")? {
        None => ReportType::Daily,
        Some(s) => ReportType::parse(&s).ok_or_else(|| {
            HandlerErr::bad_params("reportType must be one of: daily, weekly, monthly")
        })?,
    };

    let summary = bundle::export_report_bundle(
        &PathBuf::from(&out_path),
        report_type,
        &state.students,
        &state.attendance,
    )
    .map_err(|e| {
        HandlerErr::new("export_failed", format!("{e:#}")).with_details(json!({ "path": out_path }))
    })?;

    Ok(json!({
        "path": out_path,
        "bundleId": summary.bundle_id,
        "reportType": report_type.as_str(),
        "entryCount": summary.entry_count,
        "totalRecords": summary.total_records,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "reports.exportBundle" => Some(respond(&req.id, handle_export_bundle(state, req))),
        _ => None,
    }
}
