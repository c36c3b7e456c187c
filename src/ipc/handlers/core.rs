use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::registry;
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "studentCount": state.students.len(),
            "classroomCount": registry::all().len(),
            "attendanceCount": state.attendance.len(),
            "user": state.session.current(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
